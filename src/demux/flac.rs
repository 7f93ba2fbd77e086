//! Native FLAC container parser: `fLaC` magic, metadata blocks, then the
//! frame section forwarded as codec payload.

use log::debug;

use super::{ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format, MetaValue, Metadata, SeekPoint};

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "flac",
        probe,
        factory: || Box::new(FlacParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    initial.len() >= 4 && &initial[0..4] == b"fLaC"
}

const BLOCK_STREAMINFO: u8 = 0;
const BLOCK_SEEKTABLE: u8 = 3;
const BLOCK_VORBIS_COMMENT: u8 = 4;

/// parse the 34-byte STREAMINFO body into a Format and total sample count
pub(crate) fn parse_streaminfo(body: &[u8]) -> Result<(Format, u64)> {
    if body.len() < 34 {
        return Err(Error::Malformed("FLAC: short STREAMINFO"));
    }
    // min/max block size (16+16), min/max frame size (24+24)
    let sample_rate = ((body[10] as u32) << 12)
        | ((body[11] as u32) << 4)
        | ((body[12] as u32) >> 4);
    let channels = ((body[12] >> 1) & 0x7) + 1;
    let bps = (((body[12] & 1) << 4) | (body[13] >> 4)) + 1;
    let total_samples = (((body[13] & 0xF) as u64) << 32)
        | ((body[14] as u64) << 24)
        | ((body[15] as u64) << 16)
        | ((body[16] as u64) << 8)
        | (body[17] as u64);
    if sample_rate == 0 {
        return Err(Error::Malformed("FLAC: STREAMINFO zero sample rate"));
    }
    let max_block = u16::from_be_bytes([body[2], body[3]]);
    let min_block = u16::from_be_bytes([body[0], body[1]]);
    let format = Format {
        codec: CodecId::Flac,
        sample_rate,
        channels,
        bits_per_channel: bps,
        frames_per_packet: if min_block == max_block { max_block as u32 } else { 0 },
        bytes_per_packet: 0,
        float: false,
        little_endian: false,
    };
    Ok((format, total_samples))
}

/// parse a Vorbis comment block (little-endian lengths) into metadata
pub(crate) fn parse_vorbis_comment(body: &[u8]) -> Metadata {
    let mut meta = Metadata::new();
    let mut pos = 0usize;
    let read_u32 = |b: &[u8], p: usize| -> Option<u32> {
        b.get(p..p + 4)
            .map(|s| u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
    };
    let Some(vendor_len) = read_u32(body, pos) else {
        return meta;
    };
    pos += 4 + vendor_len as usize;
    let Some(count) = read_u32(body, pos) else {
        return meta;
    };
    pos += 4;
    for _ in 0..count {
        let Some(len) = read_u32(body, pos) else { break };
        pos += 4;
        let Some(entry) = body.get(pos..pos + len as usize) else {
            break;
        };
        pos += len as usize;
        if let Some(eq) = entry.iter().position(|&b| b == b'=') {
            let key = String::from_utf8_lossy(&entry[..eq]).to_lowercase();
            let value = String::from_utf8_lossy(&entry[eq + 1..]).to_string();
            meta.insert(key, MetaValue::Text(value));
        }
    }
    meta
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Magic,
    BlockHeader,
    Block { last: bool, kind: u8, size: u32 },
    SkipBlock { last: bool, remaining: u64 },
    Frames,
    Ended,
}

pub struct FlacParser {
    state: State,
    format: Option<Format>,
    /// seek table entries buffered until the frame-section offset is known
    pending_seeks: Vec<(u64, u64)>, // (sample, byte offset relative to frames)
    frames_start: Option<u64>,
}

impl FlacParser {
    pub fn new() -> Self {
        Self {
            state: State::Magic,
            format: None,
            pending_seeks: Vec::new(),
            frames_start: None,
        }
    }

    fn begin_frames(&mut self, stream: &ByteStream, sink: &mut EventSink) {
        let start = stream.position();
        self.frames_start = Some(start);
        let Some(fmt) = &self.format else { return };
        sink.seek_point(SeekPoint {
            byte_offset: start,
            timestamp_ms: 0,
        });
        for &(sample, offset) in &self.pending_seeks {
            sink.seek_point(SeekPoint {
                byte_offset: start + offset,
                timestamp_ms: sample * 1000 / fmt.sample_rate as u64,
            });
        }
        self.pending_seeks.clear();
    }
}

impl ContainerParser for FlacParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            match self.state {
                State::Magic => {
                    if !stream.available(4) {
                        break;
                    }
                    let magic = stream.read_fourcc()?;
                    if &magic != b"fLaC" {
                        return Err(Error::Malformed("FLAC: bad magic"));
                    }
                    stream.commit();
                    self.state = State::BlockHeader;
                }
                State::BlockHeader => {
                    if !stream.available(4) {
                        break;
                    }
                    let head = stream.read_u8()?;
                    let size = stream.read_u24_be()?;
                    let last = head & 0x80 != 0;
                    let kind = head & 0x7F;
                    self.state = match kind {
                        BLOCK_STREAMINFO | BLOCK_SEEKTABLE | BLOCK_VORBIS_COMMENT => {
                            State::Block { last, kind, size }
                        }
                        0x7F => return Err(Error::Malformed("FLAC: invalid block type")),
                        _ => {
                            debug!("flac: skipping metadata block type {kind}");
                            State::SkipBlock {
                                last,
                                remaining: size as u64,
                            }
                        }
                    };
                }
                State::Block { last, kind, size } => {
                    if !stream.available(size as u64) {
                        break;
                    }
                    let body = stream.read_exact(size as usize)?;
                    match kind {
                        BLOCK_STREAMINFO => {
                            let (format, total_samples) = parse_streaminfo(&body)?;
                            debug!("flac: STREAMINFO resolved {:?}", format);
                            self.format = Some(format.clone());
                            sink.format(format);
                            sink.cookie(body);
                            if total_samples > 0 {
                                sink.duration(total_samples);
                            }
                        }
                        BLOCK_SEEKTABLE => {
                            for entry in body.chunks_exact(18) {
                                let sample =
                                    u64::from_be_bytes(entry[0..8].try_into().unwrap());
                                if sample == u64::MAX {
                                    continue; // placeholder point
                                }
                                let offset =
                                    u64::from_be_bytes(entry[8..16].try_into().unwrap());
                                self.pending_seeks.push((sample, offset));
                            }
                        }
                        BLOCK_VORBIS_COMMENT => {
                            sink.metadata(parse_vorbis_comment(&body));
                        }
                        _ => unreachable!(),
                    }
                    stream.commit();
                    self.state = if last {
                        if self.format.is_none() {
                            return Err(Error::Malformed("FLAC: no STREAMINFO"));
                        }
                        self.begin_frames(stream, sink);
                        State::Frames
                    } else {
                        State::BlockHeader
                    };
                }
                State::SkipBlock { last, remaining } => {
                    let skipped = stream.consume_up_to(remaining);
                    stream.commit();
                    if skipped < remaining {
                        self.state = State::SkipBlock {
                            last,
                            remaining: remaining - skipped,
                        };
                        break;
                    }
                    self.state = if last {
                        if self.format.is_none() {
                            return Err(Error::Malformed("FLAC: no STREAMINFO"));
                        }
                        self.begin_frames(stream, sink);
                        State::Frames
                    } else {
                        State::BlockHeader
                    };
                }
                State::Frames => {
                    if !stream.available(1) {
                        break;
                    }
                    let payload = stream.read_available(1 << 16);
                    stream.commit();
                    sink.data(payload);
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
        if let Some(start) = self.frames_start {
            if container_offset >= start {
                self.state = State::Frames;
            }
        }
    }
}
