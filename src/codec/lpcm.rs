//! Linear PCM and G.711 companded (µ-law / A-law) decoding.
//!
//! Nothing here is entropy coded; decoding is a per-sample format
//! conversion. Output is produced in blocks of at most `MAX_BLOCK_FRAMES`
//! whole frames so a long stream never turns into one giant allocation.

use crate::core::error::{Error, Result};
use crate::core::sample::{depth_scale, i16_to_f32, sign_extend};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format, PcmFrame};

use super::AudioDecoder;

const MAX_BLOCK_FRAMES: u64 = 4096;

/// sample layout resolved once at construction
#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    Int8Unsigned,
    Int8Signed,
    Int16 { le: bool },
    Int24 { le: bool },
    Int32 { le: bool },
    Float32 { le: bool },
    Float64 { le: bool },
    Companded,
}

pub struct LpcmDecoder {
    input: ByteStream,
    layout: Layout,
    channels: usize,
    bytes_per_sample: usize,
    sample_rate: u32,
    /// G.711 expansion table, identity-unused for linear layouts
    expand: Option<[i16; 256]>,
    frame_position: u64,
    ended: bool,
}

impl LpcmDecoder {
    pub fn factory(format: &Format, _cookie: Option<&[u8]>) -> Result<Box<dyn AudioDecoder>> {
        Ok(Box::new(Self::new(format)?))
    }

    pub fn new(format: &Format) -> Result<Self> {
        if format.channels == 0 {
            return Err(Error::Malformed("lpcm: zero channels"));
        }
        if format.sample_rate == 0 {
            return Err(Error::Malformed("lpcm: zero sample rate"));
        }
        let (layout, expand) = match format.codec {
            CodecId::Ulaw => (Layout::Companded, Some(build_table(ulaw_expand))),
            CodecId::Alaw => (Layout::Companded, Some(build_table(alaw_expand))),
            CodecId::Lpcm => (Self::linear_layout(format)?, None),
            _ => return Err(Error::Unsupported("lpcm: non-pcm codec")),
        };
        let bytes_per_sample = match layout {
            Layout::Int8Unsigned | Layout::Int8Signed | Layout::Companded => 1,
            Layout::Int16 { .. } => 2,
            Layout::Int24 { .. } => 3,
            Layout::Int32 { .. } | Layout::Float32 { .. } => 4,
            Layout::Float64 { .. } => 8,
        };
        Ok(Self {
            input: ByteStream::new(),
            layout,
            channels: format.channels as usize,
            bytes_per_sample,
            sample_rate: format.sample_rate,
            expand,
            frame_position: 0,
            ended: false,
        })
    }

    fn linear_layout(format: &Format) -> Result<Layout> {
        let le = format.little_endian;
        if format.float {
            return match format.bits_per_channel {
                32 => Ok(Layout::Float32 { le }),
                64 => Ok(Layout::Float64 { le }),
                _ => Err(Error::Unsupported("lpcm: odd float width")),
            };
        }
        match format.bits_per_channel {
            // WAVE stores 8-bit PCM unsigned; the big-endian containers
            // (AIFF, AU, CAF) store it signed
            8 if le => Ok(Layout::Int8Unsigned),
            8 => Ok(Layout::Int8Signed),
            16 => Ok(Layout::Int16 { le }),
            24 => Ok(Layout::Int24 { le }),
            32 => Ok(Layout::Int32 { le }),
            bits if bits > 0 && bits < 8 => Ok(Layout::Int8Signed),
            _ => Err(Error::Unsupported("lpcm: odd integer width")),
        }
    }

    fn convert(&self, raw: &[u8], out: &mut Vec<f32>) {
        let scale24 = depth_scale(24);
        let scale32 = depth_scale(32);
        match self.layout {
            Layout::Int8Unsigned => {
                for &b in raw {
                    out.push((b as i32 - 128) as f32 / 128.0);
                }
            }
            Layout::Int8Signed => {
                for &b in raw {
                    out.push(b as i8 as f32 / 128.0);
                }
            }
            Layout::Int16 { le } => {
                for pair in raw.chunks_exact(2) {
                    let bytes = [pair[0], pair[1]];
                    let v = if le {
                        i16::from_le_bytes(bytes)
                    } else {
                        i16::from_be_bytes(bytes)
                    };
                    out.push(i16_to_f32(v));
                }
            }
            Layout::Int24 { le } => {
                for triple in raw.chunks_exact(3) {
                    let v = if le {
                        (triple[0] as u32) | (triple[1] as u32) << 8 | (triple[2] as u32) << 16
                    } else {
                        (triple[2] as u32) | (triple[1] as u32) << 8 | (triple[0] as u32) << 16
                    };
                    out.push(sign_extend(v, 24) as f32 * scale24);
                }
            }
            Layout::Int32 { le } => {
                for quad in raw.chunks_exact(4) {
                    let bytes = [quad[0], quad[1], quad[2], quad[3]];
                    let v = if le {
                        i32::from_le_bytes(bytes)
                    } else {
                        i32::from_be_bytes(bytes)
                    };
                    out.push(v as f32 * scale32);
                }
            }
            Layout::Float32 { le } => {
                for quad in raw.chunks_exact(4) {
                    let bytes = [quad[0], quad[1], quad[2], quad[3]];
                    out.push(if le {
                        f32::from_le_bytes(bytes)
                    } else {
                        f32::from_be_bytes(bytes)
                    });
                }
            }
            Layout::Float64 { le } => {
                for oct in raw.chunks_exact(8) {
                    let bytes: [u8; 8] = oct.try_into().unwrap_or([0; 8]);
                    let v = if le {
                        f64::from_le_bytes(bytes)
                    } else {
                        f64::from_be_bytes(bytes)
                    };
                    out.push(v as f32);
                }
            }
            Layout::Companded => {
                if let Some(table) = &self.expand {
                    for &b in raw {
                        out.push(i16_to_f32(table[b as usize]));
                    }
                }
            }
        }
    }
}

impl AudioDecoder for LpcmDecoder {
    fn queue(&mut self, data: &[u8]) {
        self.input.append(data.to_vec());
    }

    fn end_of_input(&mut self) {
        self.ended = true;
        self.input.mark_ended();
    }

    fn decode_next(&mut self) -> Result<Option<PcmFrame>> {
        let bytes_per_frame = (self.bytes_per_sample * self.channels) as u64;
        let whole_frames = self.input.remaining() / bytes_per_frame;
        if whole_frames == 0 {
            // a trailing partial frame after end of input is dropped
            return Ok(None);
        }
        let frames = whole_frames.min(MAX_BLOCK_FRAMES);
        let raw = self.input.read_exact((frames * bytes_per_frame) as usize)?;
        self.input.commit();

        let mut samples = Vec::with_capacity((frames as usize) * self.channels);
        self.convert(&raw, &mut samples);

        let timestamp_ms = self.frame_position * 1000 / self.sample_rate as u64;
        self.frame_position += frames;
        Ok(Some(PcmFrame {
            samples,
            channels: self.channels as u8,
            timestamp_ms,
        }))
    }

    fn flush(&mut self, frame_position: u64) {
        self.input = ByteStream::new();
        self.ended = false;
        self.frame_position = frame_position;
    }
}

fn build_table(expand: fn(u8) -> i16) -> [i16; 256] {
    let mut table = [0i16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = expand(code as u8);
    }
    table
}

/// G.711 µ-law expansion
fn ulaw_expand(code: u8) -> i16 {
    const BIAS: i32 = 0x84;
    let code = !code;
    let mut t = (((code & 0x0F) as i32) << 3) + BIAS;
    t <<= (code & 0x70) >> 4;
    (if code & 0x80 != 0 { BIAS - t } else { t - BIAS }) as i16
}

/// G.711 A-law expansion
fn alaw_expand(code: u8) -> i16 {
    let code = code ^ 0x55;
    let mut t = ((code & 0x0F) as i32) << 4;
    let seg = (code & 0x70) >> 4;
    match seg {
        0 => t += 8,
        1 => t += 0x108,
        _ => {
            t += 0x108;
            t <<= seg - 1;
        }
    }
    (if code & 0x80 != 0 { t } else { -t }) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm_format(bits: u8, float: bool, le: bool) -> Format {
        Format {
            codec: CodecId::Lpcm,
            sample_rate: 48000,
            channels: 2,
            bits_per_channel: bits,
            frames_per_packet: 1,
            bytes_per_packet: (bits as u32 / 8) * 2,
            float,
            little_endian: le,
        }
    }

    #[test]
    fn int16_le_round_values() {
        let mut dec = LpcmDecoder::new(&pcm_format(16, false, true)).unwrap();
        let samples: [i16; 4] = [0, 16384, -16384, -32768];
        let mut bytes = Vec::new();
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        dec.queue(&bytes);
        dec.end_of_input();
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.samples, vec![0.0, 0.5, -0.5, -1.0]);
        assert_eq!(frame.frame_count(), 2);
        assert!(dec.decode_next().unwrap().is_none());
    }

    #[test]
    fn unsigned_8bit_centers_on_zero() {
        let mut fmt = pcm_format(8, false, true);
        fmt.channels = 1;
        let mut dec = LpcmDecoder::new(&fmt).unwrap();
        dec.queue(&[128, 0, 255]);
        dec.end_of_input();
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.samples[0], 0.0);
        assert!(frame.samples[1] < -0.99);
        assert!(frame.samples[2] > 0.98);
    }

    #[test]
    fn partial_frame_defers_until_completed() {
        let mut dec = LpcmDecoder::new(&pcm_format(16, false, false)).unwrap();
        dec.queue(&[0x40, 0x00, 0x40]); // 3 of 4 bytes of a stereo frame
        assert!(dec.decode_next().unwrap().is_none());
        dec.queue(&[0x00]);
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.samples, vec![0.5, 0.5]);
    }

    #[test]
    fn ulaw_silence_code() {
        let fmt = Format {
            codec: CodecId::Ulaw,
            sample_rate: 8000,
            channels: 1,
            bits_per_channel: 8,
            frames_per_packet: 1,
            bytes_per_packet: 1,
            float: false,
            little_endian: false,
        };
        let mut dec = LpcmDecoder::new(&fmt).unwrap();
        dec.queue(&[0xFF, 0x7F]); // +0 and -0 codes
        dec.end_of_input();
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.samples[0], 0.0);
        assert_eq!(frame.samples[1], 0.0);
    }

    #[test]
    fn ulaw_expansion_is_odd_symmetric() {
        for code in 0u8..128 {
            assert_eq!(ulaw_expand(code) as i32, -(ulaw_expand(code | 0x80) as i32));
        }
    }

    #[test]
    fn flush_restarts_timestamps() {
        let mut dec = LpcmDecoder::new(&pcm_format(16, false, true)).unwrap();
        dec.queue(&[0u8; 16]);
        dec.decode_next().unwrap().unwrap();
        dec.flush(48000);
        dec.queue(&[0u8; 8]);
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.timestamp_ms, 1000);
    }
}
