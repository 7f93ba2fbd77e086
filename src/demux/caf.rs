//! Apple Core Audio Format (CAF) container parser.

use log::debug;

use super::{ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format, MetaValue, Metadata, SeekPoint};

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "caf",
        probe,
        factory: || Box::new(CafParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    initial.len() >= 4 && &initial[0..4] == b"caff"
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    FileHeader,
    ChunkHeader,
    DescChunk,
    SmallChunk { id: [u8; 4], size: u64 },
    DataBody,
    SkipChunk { remaining: u64 },
    Ended,
}

pub struct CafParser {
    state: State,
    format: Option<Format>,
    /// remaining data body; u64::MAX when the chunk size was -1 (to EOF)
    data_remaining: u64,
    data_start: Option<u64>,
}

impl CafParser {
    pub fn new() -> Self {
        Self {
            state: State::FileHeader,
            format: None,
            data_remaining: 0,
            data_start: None,
        }
    }

    fn parse_desc(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        let sample_rate = stream.read_f64_be()?;
        let format_id = stream.read_fourcc()?;
        let format_flags = stream.read_u32_be()?;
        let bytes_per_packet = stream.read_u32_be()?;
        let frames_per_packet = stream.read_u32_be()?;
        let channels = stream.read_u32_be()?;
        let bits = stream.read_u32_be()?;

        let codec = CodecId::from_fourcc(format_id)
            .ok_or(Error::Unsupported("CAF format id"))?;

        // lpcm flag bits: 0 = float, 1 = little endian
        let (float, little_endian) = if codec == CodecId::Lpcm {
            (format_flags & 1 != 0, format_flags & 2 != 0)
        } else {
            (false, false)
        };

        if channels == 0 || channels > 64 || !(sample_rate > 0.0) {
            return Err(Error::Malformed("CAF desc: bad channels or rate"));
        }

        let format = Format {
            codec,
            sample_rate: sample_rate.round() as u32,
            channels: channels as u8,
            bits_per_channel: bits as u8,
            frames_per_packet,
            bytes_per_packet,
            float,
            little_endian,
        };
        debug!("caf: desc resolved {:?}", format);
        self.format = Some(format.clone());
        sink.format(format);
        Ok(())
    }

    fn parse_info(&self, body: &[u8], sink: &mut EventSink) {
        let mut meta = Metadata::new();
        if body.len() < 4 {
            return;
        }
        let entries = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
        let mut strings = body[4..].split(|&b| b == 0);
        for _ in 0..entries {
            let (Some(key), Some(value)) = (strings.next(), strings.next()) else {
                break;
            };
            meta.insert(
                String::from_utf8_lossy(key).to_string(),
                MetaValue::Text(String::from_utf8_lossy(value).to_string()),
            );
        }
        sink.metadata(meta);
    }

    fn parse_pakt(&self, body: &[u8], sink: &mut EventSink) -> Result<()> {
        if body.len() < 24 {
            return Err(Error::Malformed("CAF pakt: short table header"));
        }
        let total_frames = i64::from_be_bytes(body[8..16].try_into().unwrap());
        if total_frames > 0 {
            sink.duration(total_frames as u64);
        }
        Ok(())
    }
}

impl ContainerParser for CafParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            match self.state {
                State::FileHeader => {
                    if !stream.available(8) {
                        break;
                    }
                    let magic = stream.read_fourcc()?;
                    let _version = stream.read_u16_be()?;
                    let _flags = stream.read_u16_be()?;
                    if &magic != b"caff" {
                        return Err(Error::Malformed("CAF: bad magic"));
                    }
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::ChunkHeader => {
                    if !stream.available(12) {
                        break;
                    }
                    let id = stream.read_fourcc()?;
                    let size = stream.read_u64_be()? as i64;
                    if &id == b"data" {
                        // the body begins with a 4-byte edit count; -1 means
                        // the chunk grows to EOF
                        if size != -1 && size < 4 {
                            return Err(Error::Malformed("CAF: bad data chunk size"));
                        }
                        if !stream.available(4) {
                            stream.rewind(12)?;
                            break;
                        }
                        let body = if size == -1 { u64::MAX } else { size as u64 };
                        self.state = self.begin_data(stream, body, sink)?;
                        continue;
                    }
                    self.state = match (&id, size) {
                        (b"desc", _) => State::DescChunk,
                        (b"kuki", n) | (b"info", n) | (b"pakt", n) if n >= 0 => {
                            State::SmallChunk {
                                id,
                                size: n as u64,
                            }
                        }
                        (_, n) if n >= 0 => State::SkipChunk { remaining: n as u64 },
                        _ => return Err(Error::Malformed("CAF: negative chunk size")),
                    };
                }
                State::DescChunk => {
                    if !stream.available(32) {
                        break;
                    }
                    self.parse_desc(stream, sink)?;
                    stream.commit();
                    self.state = State::ChunkHeader;
                }
                State::SmallChunk { id, size } => {
                    if !stream.available(size) {
                        break;
                    }
                    let body = stream.read_exact(size as usize)?;
                    match &id {
                        b"kuki" => sink.cookie(body),
                        b"info" => self.parse_info(&body, sink),
                        b"pakt" => self.parse_pakt(&body, sink)?,
                        _ => {}
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
                    if self.data_remaining != u64::MAX {
                        self.data_remaining -= take;
                    }
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
        if let Some(start) = self.data_start {
            if container_offset >= start {
                self.state = State::DataBody;
                self.data_remaining = u64::MAX;
            }
        }
    }
}

impl CafParser {
    fn begin_data(
        &mut self,
        stream: &mut ByteStream,
        size: u64,
        sink: &mut EventSink,
    ) -> Result<State> {
        if self.format.is_none() {
            return Err(Error::Malformed("CAF: data before desc"));
        }
        let _edit_count = stream.read_u32_be()?;
        self.data_remaining = if size == u64::MAX { u64::MAX } else { size - 4 };
        self.data_start = Some(stream.position());
        sink.seek_point(SeekPoint {
            byte_offset: stream.position(),
            timestamp_ms: 0,
        });
        if let Some(fmt) = &self.format {
            if self.data_remaining != u64::MAX
                && fmt.bytes_per_packet > 0
                && fmt.frames_per_packet > 0
                && fmt.codec == CodecId::Lpcm
            {
                sink.duration(
                    self.data_remaining / fmt.bytes_per_packet as u64
                        * fmt.frames_per_packet as u64,
                );
            }
        }
        stream.commit();
        Ok(State::DataBody)
    }
}
