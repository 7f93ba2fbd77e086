//! Sun AU (.snd) container parser.

use log::debug;

use super::{ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format, SeekPoint};

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "au",
        probe,
        factory: || Box::new(AuParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    initial.len() >= 4 && &initial[0..4] == b".snd"
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Header,
    SkipToData { remaining: u64 },
    Body,
    Ended,
}

pub struct AuParser {
    state: State,
    data_remaining: u64,
}

impl AuParser {
    pub fn new() -> Self {
        Self {
            state: State::Header,
            data_remaining: 0,
        }
    }
}

impl ContainerParser for AuParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            match self.state {
                State::Header => {
                    if !stream.available(24) {
                        break;
                    }
                    let magic = stream.read_fourcc()?;
                    if &magic != b".snd" {
                        return Err(Error::Malformed("AU: bad magic"));
                    }
                    let data_offset = stream.read_u32_be()?;
                    let data_size = stream.read_u32_be()?;
                    let encoding = stream.read_u32_be()?;
                    let sample_rate = stream.read_u32_be()?;
                    let channels = stream.read_u32_be()?;

                    if data_offset < 24 {
                        return Err(Error::Malformed("AU: data offset inside header"));
                    }
                    if channels == 0 || channels > 64 || sample_rate == 0 {
                        return Err(Error::Malformed("AU: bad channel count or rate"));
                    }

                    let (codec, bits, float) = match encoding {
                        1 => (CodecId::Ulaw, 8, false),
                        2 => (CodecId::Lpcm, 8, false),
                        3 => (CodecId::Lpcm, 16, false),
                        4 => (CodecId::Lpcm, 24, false),
                        5 => (CodecId::Lpcm, 32, false),
                        6 => (CodecId::Lpcm, 32, true),
                        7 => (CodecId::Lpcm, 64, true),
                        27 => (CodecId::Alaw, 8, false),
                        _ => return Err(Error::Unsupported("AU encoding")),
                    };

                    let bytes_per_frame = channels * (bits as u32 / 8);
                    let format = Format {
                        codec,
                        sample_rate,
                        channels: channels as u8,
                        bits_per_channel: bits,
                        frames_per_packet: 1,
                        bytes_per_packet: bytes_per_frame,
                        float,
                        little_endian: false,
                    };
                    debug!("au: header resolved {:?}", format);
                    sink.format(format);
                    if data_size != u32::MAX && bytes_per_frame > 0 {
                        sink.duration(data_size as u64 / bytes_per_frame as u64);
                        self.data_remaining = data_size as u64;
                    } else {
                        self.data_remaining = u64::MAX;
                    }
                    sink.seek_point(SeekPoint {
                        byte_offset: data_offset as u64,
                        timestamp_ms: 0,
                    });
                    stream.commit();
                    self.state = State::SkipToData {
                        remaining: data_offset as u64 - 24,
                    };
                }
                State::SkipToData { remaining } => {
                    let skipped = stream.consume_up_to(remaining);
                    stream.commit();
                    if skipped < remaining {
                        self.state = State::SkipToData {
                            remaining: remaining - skipped,
                        };
                        break;
                    }
                    self.state = State::Body;
                }
                State::Body => {
                    if self.data_remaining == 0 || !stream.available(1) {
                        break;
                    }
                    let take = self.data_remaining.min(stream.remaining()).min(1 << 16);
                    let payload = stream.read_exact(take as usize)?;
                    self.data_remaining -= take;
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

    fn handle_seek(&mut self, _container_offset: u64) {
        self.state = State::Body;
        self.data_remaining = u64::MAX;
    }
}
