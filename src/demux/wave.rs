//! RIFF/WAVE container parser.

use log::{debug, warn};

use super::{put_text, ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format, Metadata, SeekPoint};

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "wave",
        probe,
        factory: || Box::new(WaveParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    initial.len() >= 12 && &initial[0..4] == b"RIFF" && &initial[8..12] == b"WAVE"
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    RiffHeader,
    ChunkHeader,
    FmtChunk { size: u32 },
    ListChunk { remaining: u32 },
    DataBody,
    SkipChunk { remaining: u64 },
    Ended,
}

pub struct WaveParser {
    state: State,
    format: Option<Format>,
    /// bytes of the current data chunk still to forward
    data_remaining: u64,
    /// container offsets of the data body
    data_start: Option<u64>,
    data_end: Option<u64>,
    sent_duration: bool,
}

impl WaveParser {
    pub fn new() -> Self {
        Self {
            state: State::RiffHeader,
            format: None,
            data_remaining: 0,
            data_start: None,
            data_end: None,
            sent_duration: false,
        }
    }

    fn parse_fmt(&mut self, stream: &mut ByteStream, size: u32, sink: &mut EventSink) -> Result<()> {
        if size < 16 {
            return Err(Error::Malformed("WAVE fmt: chunk shorter than its fields"));
        }
        let start = stream.position();
        let encoding = stream.read_u16_le()?;
        let channels = stream.read_u16_le()?;
        let sample_rate = stream.read_u32_le()?;
        let _byte_rate = stream.read_u32_le()?;
        let block_align = stream.read_u16_le()?;
        let bits = stream.read_u16_le()?;

        // WAVE_FORMAT_EXTENSIBLE wraps the real code in a GUID
        let encoding = if encoding == 0xFFFE {
            let _cb_size = stream.read_u16_le()?;
            let _valid_bits = stream.read_u16_le()?;
            let _channel_mask = stream.read_u32_le()?;
            stream.read_u16_le()? // first two GUID bytes carry the code
        } else {
            encoding
        };

        let (codec, float) = match encoding {
            1 => (CodecId::Lpcm, false),
            3 => (CodecId::Lpcm, true),
            6 => (CodecId::Alaw, false),
            7 => (CodecId::Ulaw, false),
            _ => return Err(Error::Unsupported("WAVE encoding tag")),
        };

        if channels == 0 || sample_rate == 0 {
            return Err(Error::Malformed("WAVE fmt: zero channels or rate"));
        }

        let format = Format {
            codec,
            sample_rate,
            channels: channels as u8,
            bits_per_channel: bits as u8,
            frames_per_packet: 1,
            bytes_per_packet: block_align as u32,
            float,
            little_endian: true,
        };
        debug!("wave: fmt resolved {:?}", format);
        self.format = Some(format.clone());
        sink.format(format);

        // skip any fmt extension bytes we did not interpret
        let consumed = stream.position() - start;
        let left = (size as u64)
            .checked_sub(consumed)
            .ok_or(Error::Malformed("WAVE fmt: chunk shorter than its fields"))?;
        stream.advance(left)?;
        Ok(())
    }

    fn parse_list(&mut self, stream: &mut ByteStream, remaining: u32, sink: &mut EventSink) -> Result<()> {
        // LIST/INFO: sequence of fourcc + size + text
        let list_type = stream.read_fourcc()?;
        let mut left = remaining as u64 - 4;
        let mut meta = Metadata::new();
        if &list_type == b"INFO" {
            while left >= 8 {
                let id = stream.read_fourcc()?;
                let size = stream.read_u32_le()? as u64;
                let body = stream.read_exact(size as usize)?;
                let key = match &id {
                    b"INAM" => "title",
                    b"IART" => "artist",
                    b"IPRD" => "album",
                    b"ICRD" => "date",
                    b"IGNR" => "genre",
                    b"ICMT" => "comment",
                    _ => std::str::from_utf8(&id).unwrap_or("info"),
                };
                put_text(&mut meta, key, &body);
                let padded = size + (size & 1);
                if padded > size {
                    stream.advance(1)?;
                }
                left = left.saturating_sub(8 + padded);
            }
        } else {
            stream.advance(left)?;
            left = 0;
        }
        stream.advance(left)?;
        sink.metadata(meta);
        Ok(())
    }
}

impl ContainerParser for WaveParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            match self.state {
                State::RiffHeader => {
                    if !stream.available(12) {
                        break;
                    }
                    let riff = stream.read_fourcc()?;
                    let _file_size = stream.read_u32_le()?;
                    let wave = stream.read_fourcc()?;
                    if &riff != b"RIFF" || &wave != b"WAVE" {
                        return Err(Error::Malformed("WAVE: bad RIFF header"));
                    }
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::ChunkHeader => {
                    if !stream.available(8) {
                        break;
                    }
                    let id = stream.read_fourcc()?;
                    let size = stream.read_u32_le()?;
                    self.state = match &id {
                        b"fmt " => State::FmtChunk { size },
                        b"LIST" => State::ListChunk { remaining: size },
                        b"data" => {
                            if self.format.is_none() {
                                return Err(Error::Malformed("WAVE: data before fmt"));
                            }
                            self.data_remaining = size as u64;
                            self.data_start = Some(stream.position());
                            self.data_end = Some(stream.position() + size as u64);
                            sink.seek_point(SeekPoint {
                                byte_offset: stream.position(),
                                timestamp_ms: 0,
                            });
                            if !self.sent_duration {
                                if let Some(fmt) = &self.format {
                                    if fmt.bytes_per_packet > 0 && size != u32::MAX {
                                        sink.duration(size as u64 / fmt.bytes_per_packet as u64);
                                        self.sent_duration = true;
                                    }
                                }
                            }
                            State::DataBody
                        }
                        _ => {
                            debug!("wave: skipping chunk {:?}", String::from_utf8_lossy(&id));
                            // chunks are padded to even sizes
                            State::SkipChunk {
                                remaining: size as u64 + (size as u64 & 1),
                            }
                        }
                    };
                }
                State::FmtChunk { size } => {
                    if !stream.available(size as u64) {
                        break;
                    }
                    self.parse_fmt(stream, size, sink)?;
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::ListChunk { remaining } => {
                    if !stream.available(remaining as u64) {
                        break;
                    }
                    if let Err(e) = self.parse_list(stream, remaining, sink) {
                        // metadata is best-effort; a truncated INFO list is
                        // not fatal for decode
                        warn!("wave: LIST parse failed: {e}");
                    }
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::DataBody => {
                    if self.data_remaining == 0 {
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
            sink.end();
        }
        Ok(())
    }

    fn handle_seek(&mut self, container_offset: u64) {
        // a seek can only target the data body; recompute what is left of it
        if let (Some(start), Some(end)) = (self.data_start, self.data_end) {
            if container_offset >= start {
                self.state = State::DataBody;
                self.data_remaining = end.saturating_sub(container_offset);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance_all(bytes: Vec<u8>) -> Result<()> {
        let mut stream = ByteStream::new();
        stream.append(bytes);
        stream.mark_ended();
        let mut sink = EventSink::new();
        WaveParser::new().advance(&mut stream, &mut sink)
    }

    fn riff_prefix() -> Vec<u8> {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&36u32.to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes
    }

    #[test]
    fn fmt_chunk_shorter_than_its_fields_is_malformed() {
        let mut bytes = riff_prefix();
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&0u32.to_le_bytes()); // declared empty
        // the sixteen field bytes a well-formed chunk would carry
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        assert!(matches!(
            advance_all(bytes),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn extensible_fmt_overrunning_its_size_is_malformed() {
        // declares the 16-byte plain layout but carries the extensible tag,
        // so the fields read past the declared chunk end
        let mut bytes = riff_prefix();
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&0xFFFEu16.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&44100u32.to_le_bytes());
        bytes.extend_from_slice(&176400u32.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(&22u16.to_le_bytes()); // cbSize
        bytes.extend_from_slice(&16u16.to_le_bytes()); // valid bits
        bytes.extend_from_slice(&3u32.to_le_bytes()); // channel mask
        bytes.extend_from_slice(&1u16.to_le_bytes()); // GUID code
        assert!(matches!(
            advance_all(bytes),
            Err(Error::Malformed(_))
        ));
    }
}
