//! AIFF / AIFC container parser.

use log::debug;

use super::{put_text, ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format, Metadata, SeekPoint};

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "aiff",
        probe,
        factory: || Box::new(AiffParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    initial.len() >= 12
        && &initial[0..4] == b"FORM"
        && (&initial[8..12] == b"AIFF" || &initial[8..12] == b"AIFC")
}

/// decode an 80-bit IEEE 754 extended float (the COMM sample rate field)
fn read_extended(bytes: &[u8; 10]) -> f64 {
    let exp_raw = u16::from_be_bytes([bytes[0], bytes[1]]);
    let mantissa = u64::from_be_bytes([
        bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7], bytes[8], bytes[9],
    ]);
    let sign = if exp_raw & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = (exp_raw & 0x7FFF) as i32;
    if exponent == 0 && mantissa == 0 {
        return 0.0;
    }
    sign * (mantissa as f64) * 2f64.powi(exponent - 16383 - 63)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    FormHeader,
    ChunkHeader,
    CommChunk { size: u32 },
    SsndHeader { size: u32 },
    SoundBody,
    SkipChunk { remaining: u64 },
    TextChunk { id: [u8; 4], size: u32 },
    Ended,
}

pub struct AiffParser {
    state: State,
    /// AIFC (true) adds a compression-type field to COMM
    aifc: bool,
    format: Option<Format>,
    total_frames: u64,
    data_remaining: u64,
    data_start: Option<u64>,
    data_end: Option<u64>,
    meta: Metadata,
}

impl AiffParser {
    pub fn new() -> Self {
        Self {
            state: State::FormHeader,
            aifc: false,
            format: None,
            total_frames: 0,
            data_remaining: 0,
            data_start: None,
            data_end: None,
            meta: Metadata::new(),
        }
    }

    fn parse_comm(&mut self, stream: &mut ByteStream, size: u32, sink: &mut EventSink) -> Result<()> {
        if size < 18 {
            return Err(Error::Malformed("AIFF COMM: chunk shorter than its fields"));
        }
        let start = stream.position();
        let channels = stream.read_u16_be()?;
        let num_frames = stream.read_u32_be()?;
        let sample_size = stream.read_u16_be()?;
        let mut rate_bytes = [0u8; 10];
        stream.peek_into(0, &mut rate_bytes)?;
        stream.advance(10)?;
        let sample_rate = read_extended(&rate_bytes);

        let (codec, float, little_endian, bits) = if self.aifc {
            let compression = stream.read_fourcc()?;
            match &compression {
                b"NONE" | b"twos" => (CodecId::Lpcm, false, false, sample_size as u8),
                b"sowt" => (CodecId::Lpcm, false, true, sample_size as u8),
                b"fl32" | b"FL32" => (CodecId::Lpcm, true, false, 32),
                b"fl64" | b"FL64" => (CodecId::Lpcm, true, false, 64),
                b"ulaw" | b"ULAW" => (CodecId::Ulaw, false, false, 8),
                b"alaw" | b"ALAW" => (CodecId::Alaw, false, false, 8),
                _ => return Err(Error::Unsupported("AIFC compression type")),
            }
        } else {
            (CodecId::Lpcm, false, false, sample_size as u8)
        };

        if channels == 0 || !(sample_rate > 0.0) {
            return Err(Error::Malformed("AIFF COMM: zero channels or rate"));
        }

        let bytes_per_frame = channels as u32 * (bits as u32 / 8).max(1);
        let format = Format {
            codec,
            sample_rate: sample_rate.round() as u32,
            channels: channels as u8,
            bits_per_channel: bits,
            frames_per_packet: 1,
            bytes_per_packet: bytes_per_frame,
            float,
            little_endian,
        };
        debug!("aiff: COMM resolved {:?}", format);
        self.total_frames = num_frames as u64;
        self.format = Some(format.clone());
        sink.format(format);
        sink.duration(num_frames as u64);

        let consumed = stream.position() - start;
        let left = (size as u64)
            .checked_sub(consumed)
            .ok_or(Error::Malformed("AIFF COMM: chunk shorter than its fields"))?;
        stream.advance(left)?;
        Ok(())
    }
}

impl ContainerParser for AiffParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            match self.state {
                State::FormHeader => {
                    if !stream.available(12) {
                        break;
                    }
                    let form = stream.read_fourcc()?;
                    let _size = stream.read_u32_be()?;
                    let kind = stream.read_fourcc()?;
                    if &form != b"FORM" {
                        return Err(Error::Malformed("AIFF: bad FORM header"));
                    }
                    self.aifc = match &kind {
                        b"AIFF" => false,
                        b"AIFC" => true,
                        _ => return Err(Error::Malformed("AIFF: unknown form type")),
                    };
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::ChunkHeader => {
                    if !stream.available(8) {
                        break;
                    }
                    let id = stream.read_fourcc()?;
                    let size = stream.read_u32_be()?;
                    self.state = match &id {
                        b"COMM" => State::CommChunk { size },
                        b"SSND" => {
                            if self.format.is_none() {
                                return Err(Error::Malformed("AIFF: SSND before COMM"));
                            }
                            State::SsndHeader { size }
                        }
                        b"NAME" | b"AUTH" | b"(c) " | b"ANNO" => State::TextChunk { id, size },
                        _ => State::SkipChunk {
                            remaining: size as u64 + (size as u64 & 1),
                        },
                    };
                }
                State::CommChunk { size } => {
                    if !stream.available(size as u64) {
                        break;
                    }
                    self.parse_comm(stream, size, sink)?;
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::TextChunk { id, size } => {
                    if !stream.available(size as u64 + (size as u64 & 1)) {
                        break;
                    }
                    let body = stream.read_exact(size as usize)?;
                    let key = match &id {
                        b"NAME" => "title",
                        b"AUTH" => "artist",
                        b"(c) " => "copyright",
                        _ => "annotation",
                    };
                    put_text(&mut self.meta, key, &body);
                    if size & 1 == 1 {
                        stream.advance(1)?;
                    }
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::SsndHeader { size } => {
                    if !stream.available(8) {
                        break;
                    }
                    let mut head = [0u8; 4];
                    stream.peek_into(0, &mut head)?;
                    let offset = u32::from_be_bytes(head);
                    // wait for the alignment pad too before entering the body
                    if !stream.available(8 + offset as u64) {
                        break;
                    }
                    stream.advance(8 + offset as u64)?;
                    // metadata is complete once sound data begins
                    sink.metadata(std::mem::take(&mut self.meta));
                    self.data_remaining = size as u64 - 8 - offset as u64;
                    self.data_start = Some(stream.position());
                    self.data_end = Some(stream.position() + self.data_remaining);
                    sink.seek_point(SeekPoint {
                        byte_offset: stream.position(),
                        timestamp_ms: 0,
                    });
                    stream.commit();
                    self.state = State::SoundBody;
                }
                State::SoundBody => {
                    if self.data_remaining == 0 {
                        sink.metadata(std::mem::take(&mut self.meta));
                        self.state = State::ChunkHeader;
                        continue;
                    }
                    if !stream.available(1) {
                        break;
                    }
                    let take = self.data_remaining.min(stream.remaining()).min(1 << 16);
                    let payload = stream.read_exact(take as usize)?;
                    self.data_remaining -= take;
                    stream.commit();
                    sink.data(payload);
                    if self.data_remaining > 0 {
                        break;
                    }
                }
                State::SkipChunk { remaining } => {
                    let skipped = stream.consume_up_to(remaining);
                    stream.commit();
                    if skipped < remaining {
                        self.state = State::SkipChunk {
                            remaining: remaining - skipped,
                        };
                        break;
                    }
                    self.state = State::ChunkHeader;
                }
                State::Ended => break,
            }
        }

        if stream.ended() && self.state != State::Ended && !stream.available(1) {
            self.state = State::Ended;
            sink.metadata(std::mem::take(&mut self.meta));
            sink.end();
        }
        Ok(())
    }

    fn handle_seek(&mut self, container_offset: u64) {
        if let (Some(start), Some(end)) = (self.data_start, self.data_end) {
            if container_offset >= start {
                self.state = State::SoundBody;
                self.data_remaining = end.saturating_sub(container_offset);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comm_chunk_shorter_than_its_fields_is_malformed() {
        let mut bytes = b"FORM".to_vec();
        bytes.extend_from_slice(&30u32.to_be_bytes());
        bytes.extend_from_slice(b"AIFF");
        bytes.extend_from_slice(b"COMM");
        bytes.extend_from_slice(&0u32.to_be_bytes()); // declared empty
        // the eighteen field bytes a well-formed chunk would carry
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&100u32.to_be_bytes());
        bytes.extend_from_slice(&16u16.to_be_bytes());
        bytes.extend_from_slice(&[0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]);
        let mut stream = ByteStream::new();
        stream.append(bytes);
        stream.mark_ended();
        let mut sink = EventSink::new();
        assert!(matches!(
            AiffParser::new().advance(&mut stream, &mut sink),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn extended_float_decodes_common_rates() {
        // 44100.0 in 80-bit extended
        let raw = [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0];
        assert_eq!(read_extended(&raw).round() as u32, 44100);

        // 48000.0
        let raw = [0x40, 0x0E, 0xBB, 0x80, 0, 0, 0, 0, 0, 0];
        assert_eq!(read_extended(&raw).round() as u32, 48000);
    }
}
