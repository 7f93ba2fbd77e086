//! Bare ADTS elementary stream parser (AAC over ADTS framing).
//!
//! Each ADTS frame carries a 7- or 9-byte header followed by one or more raw
//! data blocks; the header is stripped here and the raw AAC payload is
//! forwarded, with an AudioSpecificConfig cookie synthesized from the first
//! header.

use log::{debug, warn};

use super::{ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format};

/// MPEG-4 sampling frequency index table
pub(crate) const SAMPLE_RATES: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "adts",
        probe,
        factory: || Box::new(AdtsParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    // 12-bit sync, layer must be zero
    initial.len() >= 2 && initial[0] == 0xFF && initial[1] & 0xF6 == 0xF0
}

struct AdtsHeader {
    header_len: u16,
    frame_len: u16,
    profile: u8,
    sampling_index: u8,
    channel_config: u8,
}

fn parse_header(bytes: &[u8; 7]) -> Result<AdtsHeader> {
    if bytes[0] != 0xFF || bytes[1] & 0xF6 != 0xF0 {
        return Err(Error::Malformed("ADTS: lost sync"));
    }
    let protection_absent = bytes[1] & 1;
    let profile = (bytes[2] >> 6) & 0x3;
    let sampling_index = (bytes[2] >> 2) & 0xF;
    let channel_config = ((bytes[2] & 1) << 2) | (bytes[3] >> 6);
    let frame_len = (((bytes[3] & 0x3) as u16) << 11)
        | ((bytes[4] as u16) << 3)
        | ((bytes[5] as u16) >> 5);
    if sampling_index as usize >= SAMPLE_RATES.len() {
        return Err(Error::Malformed("ADTS: reserved sampling index"));
    }
    let header_len = if protection_absent == 1 { 7 } else { 9 };
    if frame_len < header_len {
        return Err(Error::Malformed("ADTS: frame shorter than header"));
    }
    Ok(AdtsHeader {
        header_len,
        frame_len,
        profile,
        sampling_index,
        channel_config,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Sync,
    Frame,
    Ended,
}

pub struct AdtsParser {
    state: State,
    sent_format: bool,
}

impl AdtsParser {
    pub fn new() -> Self {
        Self {
            state: State::Sync,
            sent_format: false,
        }
    }

    fn emit_format(&mut self, hdr: &AdtsHeader, sink: &mut EventSink) {
        let sample_rate = SAMPLE_RATES[hdr.sampling_index as usize];
        let channels = match hdr.channel_config {
            7 => 8,
            c => c,
        };
        let format = Format {
            codec: CodecId::Aac,
            sample_rate,
            channels,
            bits_per_channel: 16,
            frames_per_packet: 1024,
            bytes_per_packet: 0,
            float: false,
            little_endian: false,
        };
        debug!("adts: stream resolved {:?}", format);
        sink.format(format);

        // AudioSpecificConfig: 5-bit object type, 4-bit rate index,
        // 4-bit channel config, 3 trailing zero flags
        let object_type = hdr.profile + 1;
        let cookie = vec![
            (object_type << 3) | (hdr.sampling_index >> 1),
            ((hdr.sampling_index & 1) << 7) | (hdr.channel_config << 3),
        ];
        sink.cookie(cookie);
        self.sent_format = true;
    }
}

impl ContainerParser for AdtsParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            match self.state {
                State::Sync => {
                    // scan forward for the next sync word
                    let mut found = false;
                    while stream.available(2) {
                        let b0 = stream.peek_byte(0)?;
                        let b1 = stream.peek_byte(1)?;
                        if b0 == 0xFF && b1 & 0xF6 == 0xF0 {
                            found = true;
                            break;
                        }
                        stream.advance(1)?;
                    }
                    stream.commit();
                    if !found {
                        break;
                    }
                    self.state = State::Frame;
                }
                State::Frame => {
                    if !stream.available(7) {
                        break;
                    }
                    let mut raw = [0u8; 7];
                    stream.peek_into(0, &mut raw)?;
                    let hdr = match parse_header(&raw) {
                        Ok(h) => h,
                        Err(e) => {
                            // noise between frames: resynchronize
                            warn!("adts: resync after header error: {e}");
                            stream.advance(1)?;
                            self.state = State::Sync;
                            continue;
                        }
                    };
                    if !stream.available(hdr.frame_len as u64) {
                        break;
                    }
                    if !self.sent_format {
                        self.emit_format(&hdr, sink);
                    }
                    stream.advance(hdr.header_len as u64)?;
                    let payload =
                        stream.read_exact((hdr.frame_len - hdr.header_len) as usize)?;
                    stream.commit();
                    sink.data(payload);
                }
                State::Ended => break,
            }
        }

        if stream.ended() && self.state != State::Ended && !stream.available(7) {
            self.state = State::Ended;
            sink.end();
        }
        Ok(())
    }

    fn handle_seek(&mut self, _container_offset: u64) {
        self.state = State::Sync;
    }
}
