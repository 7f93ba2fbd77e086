//! Huffman decoding for the spectrum and scalefactor codebooks.
//!
//! Books ship as parallel codeword/length columns. Within one length the
//! codeword assignment follows symbol frequency, not symbol order, so the
//! stored codewords are authoritative and nothing is re-derived. Decoding
//! walks bit by bit and matches the accumulated value against the codewords
//! of that length; a code truncated by the buffer end surfaces as
//! `Underflow` and the access unit can be retried.

use crate::core::bitstream::Bitstream;
use crate::core::error::{Error, Result};

const MAX_CODE_LEN: usize = 19;

#[derive(Debug, Clone)]
pub(super) struct Codebook {
    /// (codeword, symbol), sorted by codeword within each length segment
    entries: Vec<(u32, u16)>,
    /// entry range per code length
    by_len: [(u32, u32); MAX_CODE_LEN + 1],
    /// per-symbol (codeword, length), in table order
    pairs: Vec<(u32, u8)>,
    max_len: usize,
}

impl Codebook {
    pub fn from_pairs(codes: &[u32], lengths: &[u8]) -> Self {
        debug_assert_eq!(codes.len(), lengths.len());
        let mut max_len = 0usize;
        let mut entries: Vec<(u32, u16)> = Vec::with_capacity(codes.len());
        for (symbol, (&code, &len)) in codes.iter().zip(lengths).enumerate() {
            let len = len as usize;
            debug_assert!(len > 0 && len <= MAX_CODE_LEN);
            debug_assert!((code as u64) < (1u64 << len));
            entries.push((code, symbol as u16));
            max_len = max_len.max(len);
        }
        entries.sort_by_key(|&(code, symbol)| (lengths[symbol as usize], code));

        let mut by_len = [(0u32, 0u32); MAX_CODE_LEN + 1];
        let mut start = 0u32;
        for len in 1..=max_len {
            let count = lengths.iter().filter(|&&l| l as usize == len).count() as u32;
            by_len[len] = (start, start + count);
            start += count;
        }

        let pairs = codes.iter().zip(lengths).map(|(&c, &l)| (c, l)).collect();

        Self {
            entries,
            by_len,
            pairs,
            max_len,
        }
    }

    /// read one codeword, returning its symbol index
    pub fn decode(&self, bits: &mut Bitstream) -> Result<u16> {
        let mut code = 0u32;
        for len in 1..=self.max_len {
            code = (code << 1) | bits.read_bit()?;
            let (start, end) = self.by_len[len];
            if start < end {
                let segment = &self.entries[start as usize..end as usize];
                if let Ok(pos) = segment.binary_search_by_key(&code, |entry| entry.0) {
                    return Ok(segment[pos].1);
                }
            }
        }
        Err(Error::Malformed("aac: invalid huffman code"))
    }

    /// codeword and length for a symbol; used by tests to build bitstreams
    /// that decode deterministically
    #[cfg(test)]
    pub fn encode(&self, symbol: u16) -> Option<(u32, usize)> {
        let &(code, len) = self.pairs.get(symbol as usize)?;
        Some((code, len as usize))
    }
}

#[cfg(test)]
pub(super) mod testutil {
    /// MSB-first bit packer for building decoder inputs in tests
    #[derive(Default)]
    pub struct BitWriter {
        bytes: Vec<u8>,
        bit: u8,
    }

    impl BitWriter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn put(&mut self, value: u64, bits: u32) {
            for i in (0..bits).rev() {
                if self.bit == 0 {
                    self.bytes.push(0);
                }
                let b = ((value >> i) & 1) as u8;
                let last = self.bytes.len() - 1;
                self.bytes[last] |= b << (7 - self.bit);
                self.bit = (self.bit + 1) % 8;
            }
        }

        pub fn finish(self) -> Vec<u8> {
            self.bytes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::BitWriter;
    use super::*;
    use crate::codec::aac::tables;

    #[test]
    fn decode_follows_stored_codewords() {
        // symbol 1 holds the 1-bit code even though symbol 0 comes first
        let book = Codebook::from_pairs(&[0b10, 0b0, 0b110, 0b111], &[2, 1, 3, 3]);
        assert_eq!(book.encode(1), Some((0b0, 1)));
        let mut bits = Bitstream::new();
        bits.append(vec![0b10_0_110_11, 0b1_0000000]);
        bits.mark_ended();
        assert_eq!(book.decode(&mut bits).unwrap(), 0);
        assert_eq!(book.decode(&mut bits).unwrap(), 1);
        assert_eq!(book.decode(&mut bits).unwrap(), 2);
        assert_eq!(book.decode(&mut bits).unwrap(), 3);
    }

    #[test]
    fn decode_inverts_encode() {
        let book = Codebook::from_pairs(&[0b110, 0b111, 0b00, 0b01, 0b10], &[3, 3, 2, 2, 2]);
        let mut writer = BitWriter::new();
        for symbol in [4u16, 0, 3, 1, 2] {
            let (code, len) = book.encode(symbol).unwrap();
            writer.put(code as u64, len as u32);
        }
        let mut bits = Bitstream::new();
        bits.append(writer.finish());
        bits.mark_ended();
        for expected in [4u16, 0, 3, 1, 2] {
            assert_eq!(book.decode(&mut bits).unwrap(), expected);
        }
    }

    #[test]
    fn truncated_codeword_underflows() {
        let book = Codebook::from_pairs(&[0b0, 0b10, 0b11], &[1, 2, 2]);
        let mut bits = Bitstream::new();
        bits.append(vec![0b1000_0000]); // one bit of a 2-bit code, rest zero
        bits.mark_ended();
        assert_eq!(book.decode(&mut bits).unwrap(), 1);
        // 6 zero bits remain: "0" decodes symbol 0 each time
        for _ in 0..6 {
            assert_eq!(book.decode(&mut bits).unwrap(), 0);
        }
        assert!(book.decode(&mut bits).unwrap_err().is_underflow());
    }

    #[test]
    fn scalefactor_book_matches_published_codewords() {
        let book = Codebook::from_pairs(&tables::HCB_SF_CODES, &tables::HCB_SF_LENGTHS);
        // delta 0 (index 60) owns the single-bit codeword "0"
        assert_eq!(book.encode(60), Some((0x00, 1)));
        // neighbours are frequency-ordered, not index-ordered
        assert_eq!(book.encode(61), Some((0x0a, 4)));
        assert_eq!(book.encode(58), Some((0x0b, 4)));
        // rarest deltas run out to 19 bits
        assert_eq!(book.encode(13), Some((0x7ffff, 19)));
        assert_eq!(tables::HCB_SF_LENGTHS.iter().copied().max(), Some(19));
        let mut bits = Bitstream::new();
        bits.append(vec![0b0_1010_000]); // "0" then "1010"
        bits.mark_ended();
        assert_eq!(book.decode(&mut bits).unwrap(), 60);
        assert_eq!(book.decode(&mut bits).unwrap(), 61);
    }

    #[test]
    fn every_book_is_a_complete_prefix_code() {
        let mut all: Vec<(&[u32], &[u8])> =
            vec![(&tables::HCB_SF_CODES, &tables::HCB_SF_LENGTHS)];
        for book in 1..=11u8 {
            let spec = tables::spectrum_codebook(book).unwrap();
            all.push((spec.codes, spec.lengths));
        }
        for (codes, lengths) in all {
            assert_eq!(codes.len(), lengths.len());
            // kraft sum of a complete prefix code is exactly one
            let mut kraft = 0u64;
            for &len in lengths {
                assert!(len >= 1 && len as usize <= MAX_CODE_LEN);
                kraft += 1u64 << (MAX_CODE_LEN - len as usize);
            }
            assert_eq!(kraft, 1u64 << MAX_CODE_LEN);
            // no codeword is a prefix of another
            let mut padded: Vec<u64> = codes
                .iter()
                .zip(lengths)
                .map(|(&c, &l)| {
                    ((c as u64) << (MAX_CODE_LEN - l as usize)) | ((l as u64) << 32)
                })
                .collect();
            padded.sort_by_key(|&p| p & 0xffff_ffff);
            for pair in padded.windows(2) {
                let (a, la) = (pair[0] & 0xffff_ffff, pair[0] >> 32);
                let b = pair[1] & 0xffff_ffff;
                assert!(b >> (MAX_CODE_LEN as u64 - la) != a >> (MAX_CODE_LEN as u64 - la));
            }
        }
    }

    #[test]
    fn all_zero_quads_take_one_bit_in_the_primary_books() {
        // books 1 and 5 give their silent center symbol the 1-bit code
        for (book, center) in [(1u8, 40u16), (5u8, 40u16)] {
            let spec = tables::spectrum_codebook(book).unwrap();
            let codebook = Codebook::from_pairs(spec.codes, spec.lengths);
            assert_eq!(codebook.encode(center), Some((0, 1)), "book {book}");
        }
    }
}
