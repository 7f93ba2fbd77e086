//! Partitioned Rice residual reading.

use crate::core::bitstream::Bitstream;
use crate::core::error::{Error, Result};

/// undo the zigzag fold applied before Rice coding
#[inline]
fn unfold(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// read one Rice-coded value with the given parameter
#[inline]
pub fn read_rice(bits: &mut Bitstream, param: u32) -> Result<i64> {
    let quotient = bits.read_unary_zeros()? as u64;
    let remainder = if param > 0 {
        bits.read_long(param)?
    } else {
        0
    };
    Ok(unfold((quotient << param) | remainder))
}

/// Read a partitioned residual section into `residual[order..block_size]`.
///
/// The partition order divides the block into 2^order equal ranges; the
/// first range is shortened by the predictor's warm-up samples. An all-ones
/// parameter escapes to raw fixed-width values.
pub fn read_residual(
    bits: &mut Bitstream,
    block_size: usize,
    order: usize,
    residual: &mut Vec<i64>,
) -> Result<()> {
    let method = bits.read(2)?;
    let (param_bits, escape) = match method {
        0 => (4u32, 0b1111u32),
        1 => (5u32, 0b11111u32),
        _ => return Err(Error::Malformed("flac: reserved residual method")),
    };
    let partition_order = bits.read(4)? as usize;
    let partitions = 1usize << partition_order;
    if block_size % partitions != 0 || block_size >> partition_order < order {
        return Err(Error::Malformed("flac: bad partition order"));
    }

    for partition in 0..partitions {
        let mut count = block_size >> partition_order;
        if partition == 0 {
            count -= order;
        }
        let param = bits.read(param_bits)?;
        if param == escape {
            let raw_bits = bits.read(5)?;
            for _ in 0..count {
                residual.push(if raw_bits == 0 {
                    0
                } else {
                    bits.read_signed_long(raw_bits)?
                });
            }
        } else {
            for _ in 0..count {
                residual.push(read_rice(bits, param)?);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitstream(bytes: &[u8]) -> Bitstream {
        let mut bits = Bitstream::new();
        bits.append(bytes.to_vec());
        bits.mark_ended();
        bits
    }

    #[test]
    fn unfold_alternates_sign() {
        assert_eq!(unfold(0), 0);
        assert_eq!(unfold(1), -1);
        assert_eq!(unfold(2), 1);
        assert_eq!(unfold(3), -2);
        assert_eq!(unfold(4), 2);
    }

    #[test]
    fn rice_param_zero_is_pure_unary() {
        // 001 0000001 1 -> folded 2, 6, 0
        let mut bits = bitstream(&[0b0010_0000, 0b0110_0000]);
        assert_eq!(read_rice(&mut bits, 0).unwrap(), 1);
        assert_eq!(read_rice(&mut bits, 0).unwrap(), 3);
        assert_eq!(read_rice(&mut bits, 0).unwrap(), 0);
    }

    #[test]
    fn rice_quotient_and_remainder_combine() {
        // param 2: quotient 1 (0b01), remainder 0b11 -> folded 7 -> -4
        let mut bits = bitstream(&[0b0111_0000]);
        assert_eq!(read_rice(&mut bits, 2).unwrap(), -4);
    }

    /// MSB-first packer for composing residual sections
    #[derive(Default)]
    struct Writer {
        bytes: Vec<u8>,
        bit: u8,
    }

    impl Writer {
        fn put(&mut self, value: u64, bits: u32) {
            for i in (0..bits).rev() {
                if self.bit == 0 {
                    self.bytes.push(0);
                }
                let last = self.bytes.len() - 1;
                self.bytes[last] |= (((value >> i) & 1) as u8) << (7 - self.bit);
                self.bit = (self.bit + 1) % 8;
            }
        }

        fn put_rice(&mut self, param: u32, value: i64) {
            let folded = if value >= 0 {
                (value as u64) << 1
            } else {
                (((-value) as u64) << 1) - 1
            };
            let quotient = folded >> param;
            self.put(1, quotient as u32 + 1);
            if param > 0 {
                self.put(folded & ((1 << param) - 1), param);
            }
        }
    }

    #[test]
    fn partitioned_residual_round_trips() {
        // block of 16, predictor order 2, four partitions with distinct
        // parameters; the last escapes to 5-bit raw values
        let expected: [&[i64]; 4] = [&[1, -1], &[0, -2, 3, 0], &[-4, 2, 0, -1], &[9, -12, 5, -16]];
        let mut w = Writer::default();
        w.put(0, 2); // 4-bit parameter method
        w.put(2, 4); // partition order 2
        for (params, values) in [1u32, 0, 2].iter().zip(&expected[..3]) {
            w.put(*params as u64, 4);
            for &v in *values {
                w.put_rice(*params, v);
            }
        }
        w.put(0b1111, 4); // escape
        w.put(5, 5); // raw width
        for &v in expected[3] {
            w.put((v as u64) & 0b11111, 5);
        }

        let mut bits = bitstream(&w.bytes);
        let mut residual = Vec::new();
        read_residual(&mut bits, 16, 2, &mut residual).unwrap();
        let flat: Vec<i64> = expected.iter().flat_map(|p| p.iter().copied()).collect();
        assert_eq!(residual, flat);
    }

    #[test]
    fn indivisible_partition_order_is_malformed() {
        // 12 samples cannot split into 8 partitions
        let mut w = Writer::default();
        w.put(0, 2);
        w.put(3, 4);
        let mut bits = bitstream(&w.bytes);
        let mut residual = Vec::new();
        assert!(matches!(
            read_residual(&mut bits, 12, 2, &mut residual),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn truncated_residual_underflows() {
        let mut bits = Bitstream::new();
        bits.append(vec![0b0000_0000]); // endless quotient zeros
        let err = read_rice(&mut bits, 0).unwrap_err();
        assert!(err.is_underflow());
    }
}
