//! FLAC frame decoding.
//!
//! Frames arrive from the native or Ogg demuxer as a raw byte run; each
//! decode attempt parses one frame from the buffered bits and rewinds to the
//! frame's sync word when the buffer ends mid-frame, so a retry after more
//! input re-reads nothing twice.

use log::{debug, warn};

use crate::core::bitstream::Bitstream;
use crate::core::error::{Error, Result};
use crate::core::sample::depth_scale;
use crate::core::types::{Format, PcmFrame};

use super::AudioDecoder;

mod predict;
mod rice;

/// sample rate codes 1..=11 of the frame header
const RATE_CODES: [u32; 11] = [
    88_200, 176_400, 192_000, 8_000, 16_000, 22_050, 24_000, 32_000, 44_100, 48_000, 96_000,
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum ChannelMode {
    Independent(u8),
    LeftSide,
    RightSide,
    MidSide,
}

impl ChannelMode {
    fn count(self) -> usize {
        match self {
            ChannelMode::Independent(n) => n as usize,
            _ => 2,
        }
    }

    /// the side channel carries one extra bit
    fn channel_bps(self, channel: usize, bps: u32) -> u32 {
        match (self, channel) {
            (ChannelMode::LeftSide, 1)
            | (ChannelMode::RightSide, 0)
            | (ChannelMode::MidSide, 1) => bps + 1,
            _ => bps,
        }
    }
}

#[derive(Debug)]
struct FrameHeader {
    block_size: usize,
    sample_rate: u32,
    mode: ChannelMode,
    bps: u32,
}

pub struct FlacDecoder {
    input: Bitstream,
    stream_rate: u32,
    stream_bps: u8,
    frame_position: u64,
}

impl FlacDecoder {
    pub fn factory(format: &Format, cookie: Option<&[u8]>) -> Result<Box<dyn AudioDecoder>> {
        // a STREAMINFO cookie overrides the format's defaults
        let resolved = match cookie {
            Some(c) if c.len() >= 34 => crate::demux::flac::parse_streaminfo(c)?.0,
            _ => format.clone(),
        };
        Ok(Box::new(Self::new(&resolved)?))
    }

    pub fn new(format: &Format) -> Result<Self> {
        if format.sample_rate == 0 {
            return Err(Error::Malformed("flac: zero sample rate"));
        }
        Ok(Self {
            input: Bitstream::new(),
            stream_rate: format.sample_rate,
            stream_bps: format.bits_per_channel,
            frame_position: 0,
        })
    }

    fn read_frame_header(&mut self) -> Result<FrameHeader> {
        let sync = self.input.read(16)?;
        if sync & 0xFFFE != 0xFFF8 {
            return Err(Error::Malformed("flac: lost frame sync"));
        }
        let block_size_code = self.input.read(4)?;
        let rate_code = self.input.read(4)?;
        let channel_code = self.input.read(4)?;
        let size_code = self.input.read(3)?;
        if self.input.read_bit()? != 0 {
            return Err(Error::Malformed("flac: reserved header bit set"));
        }
        let _coded_number = read_coded_number(&mut self.input)?;

        let block_size = match block_size_code {
            0 => return Err(Error::Malformed("flac: reserved block size code")),
            1 => 192,
            2..=5 => 576usize << (block_size_code - 2),
            6 => self.input.read(8)? as usize + 1,
            7 => self.input.read(16)? as usize + 1,
            _ => 256usize << (block_size_code - 8),
        };
        let sample_rate = match rate_code {
            0 => self.stream_rate,
            1..=11 => RATE_CODES[rate_code as usize - 1],
            12 => self.input.read(8)? * 1000,
            13 => self.input.read(16)?,
            14 => self.input.read(16)? * 10,
            _ => return Err(Error::Malformed("flac: invalid sample rate code")),
        };
        let mode = match channel_code {
            0..=7 => ChannelMode::Independent(channel_code as u8 + 1),
            8 => ChannelMode::LeftSide,
            9 => ChannelMode::RightSide,
            10 => ChannelMode::MidSide,
            _ => return Err(Error::Malformed("flac: reserved channel assignment")),
        };
        let bps = match size_code {
            0 => self.stream_bps as u32,
            1 => 8,
            2 => 12,
            4 => 16,
            5 => 20,
            6 => 24,
            7 => 32,
            _ => return Err(Error::Malformed("flac: reserved sample size code")),
        };
        if sample_rate == 0 || bps == 0 {
            return Err(Error::Malformed("flac: header fields unresolved"));
        }
        // header CRC-8, not verified
        let _crc = self.input.read(8)?;

        Ok(FrameHeader {
            block_size,
            sample_rate,
            mode,
            bps,
        })
    }

    fn read_subframe(&mut self, block_size: usize, bps: u32) -> Result<Vec<i64>> {
        if self.input.read_bit()? != 0 {
            return Err(Error::Malformed("flac: subframe padding bit set"));
        }
        let subframe_type = self.input.read(6)?;
        let wasted = if self.input.read_bool()? {
            self.input.read_unary_zeros()? + 1
        } else {
            0
        };
        if wasted >= bps {
            return Err(Error::Malformed("flac: wasted bits exceed depth"));
        }
        let eff_bps = bps - wasted;

        let mut samples: Vec<i64> = match subframe_type {
            0 => {
                let value = self.input.read_signed_long(eff_bps)?;
                vec![value; block_size]
            }
            1 => {
                let mut out = Vec::with_capacity(block_size);
                for _ in 0..block_size {
                    out.push(self.input.read_signed_long(eff_bps)?);
                }
                out
            }
            8..=12 => {
                let order = (subframe_type & 0x07) as usize;
                if order > block_size {
                    return Err(Error::Malformed("flac: order exceeds block"));
                }
                let mut out = Vec::with_capacity(block_size);
                for _ in 0..order {
                    out.push(self.input.read_signed_long(eff_bps)?);
                }
                rice::read_residual(&mut self.input, block_size, order, &mut out)?;
                predict::reconstruct_fixed(&mut out, order);
                out
            }
            32..=63 => {
                let order = ((subframe_type & 0x1F) + 1) as usize;
                if order > block_size {
                    return Err(Error::Malformed("flac: order exceeds block"));
                }
                let mut out = Vec::with_capacity(block_size);
                for _ in 0..order {
                    out.push(self.input.read_signed_long(eff_bps)?);
                }
                let precision = self.input.read(4)? + 1;
                if precision == 16 {
                    return Err(Error::Malformed("flac: invalid coefficient precision"));
                }
                let shift = self.input.read_signed(5)?;
                if shift < 0 {
                    return Err(Error::Malformed("flac: negative predictor shift"));
                }
                let mut coeffs = Vec::with_capacity(order);
                for _ in 0..order {
                    coeffs.push(self.input.read_signed(precision)?);
                }
                rice::read_residual(&mut self.input, block_size, order, &mut out)?;
                predict::reconstruct_lpc(&mut out, &coeffs, shift as u32);
                out
            }
            _ => return Err(Error::Malformed("flac: reserved subframe type")),
        };

        if wasted > 0 {
            for s in &mut samples {
                *s <<= wasted;
            }
        }
        Ok(samples)
    }

    fn decode_frame(&mut self) -> Result<PcmFrame> {
        let header = self.read_frame_header()?;
        let channels = header.mode.count();

        let mut planes: Vec<Vec<i64>> = Vec::with_capacity(channels);
        for ch in 0..channels {
            let bps = header.mode.channel_bps(ch, header.bps);
            planes.push(self.read_subframe(header.block_size, bps)?);
        }
        decorrelate(header.mode, &mut planes);

        self.input.align()?;
        // frame CRC-16, not verified
        let _crc = self.input.read(16)?;
        debug!(
            "flac: frame of {} samples x{} ch, crc unchecked",
            header.block_size, channels
        );

        let scale = depth_scale(header.bps as u8);
        let mut samples = Vec::with_capacity(header.block_size * channels);
        for i in 0..header.block_size {
            for plane in &planes {
                samples.push(plane[i] as f32 * scale);
            }
        }

        let timestamp_ms = self.frame_position * 1000 / header.sample_rate as u64;
        self.frame_position += header.block_size as u64;
        Ok(PcmFrame {
            samples,
            channels: channels as u8,
            timestamp_ms,
        })
    }
}

impl AudioDecoder for FlacDecoder {
    fn queue(&mut self, data: &[u8]) {
        self.input.append(data.to_vec());
    }

    fn end_of_input(&mut self) {
        self.input.mark_ended();
    }

    fn decode_next(&mut self) -> Result<Option<PcmFrame>> {
        // hunt for the next sync word, discarding inter-frame junk
        loop {
            if !self.input.aligned() {
                match self.input.align() {
                    Ok(()) => {}
                    Err(e) if e.is_underflow() => return Ok(None),
                    Err(e) => return Err(e),
                }
            }
            match self.input.peek(16) {
                Ok(sync) if sync & 0xFFFE == 0xFFF8 => break,
                Ok(_) => {
                    self.input.advance(8)?;
                    self.input.commit();
                }
                Err(e) if e.is_underflow() => return Ok(None),
                Err(e) => return Err(e),
            }
        }

        let start = self.input.bit_position();
        match self.decode_frame() {
            Ok(frame) => {
                self.input.commit();
                Ok(Some(frame))
            }
            Err(e) if e.is_underflow() && !self.input.ended() => {
                // not enough buffered; retry from the sync word later
                self.input.seek_bits(start)?;
                Ok(None)
            }
            Err(e) if e.is_underflow() => {
                warn!("flac: dropping truncated final frame");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn flush(&mut self, frame_position: u64) {
        self.input = Bitstream::new();
        self.frame_position = frame_position;
    }
}

/// undo inter-channel decorrelation in place
fn decorrelate(mode: ChannelMode, planes: &mut [Vec<i64>]) {
    match mode {
        ChannelMode::Independent(_) => {}
        ChannelMode::LeftSide => {
            let (left, side) = planes.split_at_mut(1);
            for (l, s) in left[0].iter().zip(side[0].iter_mut()) {
                *s = l - *s;
            }
        }
        ChannelMode::RightSide => {
            let (side, right) = planes.split_at_mut(1);
            for (s, r) in side[0].iter_mut().zip(right[0].iter()) {
                *s += r;
            }
        }
        ChannelMode::MidSide => {
            let (mid, side) = planes.split_at_mut(1);
            for (m, s) in mid[0].iter_mut().zip(side[0].iter_mut()) {
                let mid2 = (*m << 1) | (*s & 1);
                *m = (mid2 + *s) >> 1;
                *s = (mid2 - *s) >> 1;
            }
        }
    }
}

/// UTF-8-style variable length frame/sample number
fn read_coded_number(bits: &mut Bitstream) -> Result<u64> {
    let first = bits.read(8)? as u8;
    let ones = first.leading_ones();
    let (mut value, continuations) = match ones {
        0 => (first as u64, 0),
        1 | 8 => return Err(Error::Malformed("flac: bad coded number prefix")),
        n => ((first & (0x7F >> n)) as u64, n - 1),
    };
    for _ in 0..continuations {
        let byte = bits.read(8)?;
        if byte >> 6 != 0b10 {
            return Err(Error::Malformed("flac: bad coded number continuation"));
        }
        value = (value << 6) | (byte & 0x3F) as u64;
    }
    Ok(value)
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
    fn coded_number_single_byte() {
        let mut bits = bitstream(&[0x41]);
        assert_eq!(read_coded_number(&mut bits).unwrap(), 0x41);
    }

    #[test]
    fn coded_number_multi_byte() {
        // 1110xxxx 10xxxxxx 10xxxxxx encoding of 0x1234
        let mut bits = bitstream(&[0xE1, 0x88, 0xB4]);
        assert_eq!(read_coded_number(&mut bits).unwrap(), 0x1234);
    }

    #[test]
    fn coded_number_rejects_stray_continuation() {
        let mut bits = bitstream(&[0x80]);
        assert!(read_coded_number(&mut bits).is_err());
    }

    #[test]
    fn mid_side_reconstruction() {
        // left 100, right 60 -> mid (truncated) 80, side 40
        let mut planes = vec![vec![80i64], vec![40i64]];
        decorrelate(ChannelMode::MidSide, &mut planes);
        assert_eq!(planes[0][0], 100);
        assert_eq!(planes[1][0], 60);
    }

    #[test]
    fn left_side_reconstruction() {
        let mut planes = vec![vec![100i64], vec![40i64]];
        decorrelate(ChannelMode::LeftSide, &mut planes);
        assert_eq!(planes[0][0], 100);
        assert_eq!(planes[1][0], 60);
    }

    #[test]
    fn side_channel_gets_extra_bit() {
        assert_eq!(ChannelMode::MidSide.channel_bps(1, 16), 17);
        assert_eq!(ChannelMode::MidSide.channel_bps(0, 16), 16);
        assert_eq!(ChannelMode::RightSide.channel_bps(0, 16), 17);
        assert_eq!(ChannelMode::Independent(2).channel_bps(1, 16), 16);
    }
}
