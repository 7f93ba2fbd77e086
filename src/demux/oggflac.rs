//! FLAC-in-Ogg parser: unwraps Ogg pages and feeds the mapped payload to
//! the same STREAMINFO/frame path as native FLAC.
//!
//! The FLAC-to-Ogg mapping puts a `\x7fFLAC` identification header in the
//! first packet, followed by the native STREAMINFO block; later pages carry
//! metadata blocks and then audio frames verbatim.

use log::debug;

use super::flac::{parse_streaminfo, parse_vorbis_comment};
use super::{ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::SeekPoint;

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "oggflac",
        probe,
        factory: || Box::new(OggFlacParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    // OggS capture pattern; the mapping is confirmed by the first packet
    initial.len() >= 4 && &initial[0..4] == b"OggS"
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    PageHeader,
    /// identification packet not yet fully assembled
    Identification,
    /// metadata blocks carried in packets after identification; a zero
    /// count means the muxer did not know it, and headers end on the
    /// last-metadata-block flag instead
    Headers { remaining_blocks: u16 },
    Frames,
    Ended,
}

pub struct OggFlacParser {
    state: State,
    /// payload assembled from page segments, pending interpretation
    assembled: Vec<u8>,
    sent_format: bool,
}

impl OggFlacParser {
    pub fn new() -> Self {
        Self {
            state: State::PageHeader,
            assembled: Vec::new(),
            sent_format: false,
        }
    }

    /// read one full Ogg page body if buffered; None defers
    fn read_page(&mut self, stream: &mut ByteStream) -> Result<Option<Vec<u8>>> {
        if !stream.available(27) {
            return Ok(None);
        }
        let mut fixed = [0u8; 27];
        stream.peek_into(0, &mut fixed)?;
        if &fixed[0..4] != b"OggS" || fixed[4] != 0 {
            return Err(Error::Malformed("Ogg: bad page header"));
        }
        let segments = fixed[26] as u64;
        if !stream.available(27 + segments) {
            return Ok(None);
        }
        let lacing = stream.peek_bytes(27, segments as usize)?;
        let body_len: u64 = lacing.iter().map(|&b| b as u64).sum();
        if !stream.available(27 + segments + body_len) {
            return Ok(None);
        }
        // page CRC (bytes 22..26) is not verified; see DESIGN notes
        stream.advance(27 + segments)?;
        let body = stream.read_exact(body_len as usize)?;
        stream.commit();
        Ok(Some(body))
    }

    /// returns the declared header-packet count and whether STREAMINFO was
    /// flagged as the last metadata block
    fn handle_identification(&mut self, sink: &mut EventSink) -> Result<(u16, bool)> {
        let pkt = &self.assembled;
        // \x7fFLAC, 2 version bytes, 2-byte header count, "fLaC", STREAMINFO
        if pkt.len() < 51 {
            return Err(Error::Malformed("OggFLAC: short identification packet"));
        }
        if &pkt[0..5] != b"\x7fFLAC" {
            return Err(Error::Malformed("OggFLAC: not a FLAC mapping"));
        }
        let header_count = u16::from_be_bytes([pkt[7], pkt[8]]);
        if &pkt[9..13] != b"fLaC" {
            return Err(Error::Malformed("OggFLAC: missing fLaC magic"));
        }
        // native metadata block header (4 bytes) then STREAMINFO
        let body = &pkt[17..];
        let (format, total_samples) = parse_streaminfo(body)?;
        debug!("oggflac: STREAMINFO resolved {:?}", format);
        sink.format(format);
        sink.cookie(body[..34].to_vec());
        if total_samples > 0 {
            sink.duration(total_samples);
        }
        self.sent_format = true;
        Ok((header_count, pkt[13] & 0x80 != 0))
    }
}

impl ContainerParser for OggFlacParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            let Some(body) = self.read_page(stream)? else {
                break;
            };
            match self.state {
                State::PageHeader | State::Identification => {
                    self.assembled.extend_from_slice(&body);
                    // the identification packet always fits one page in
                    // practice; parse as soon as the magic + block arrive
                    if self.assembled.len() >= 51 {
                        let (remaining_blocks, streaminfo_last) =
                            self.handle_identification(sink)?;
                        self.assembled.clear();
                        self.state = if streaminfo_last {
                            sink.seek_point(SeekPoint {
                                byte_offset: stream.position(),
                                timestamp_ms: 0,
                            });
                            State::Frames
                        } else {
                            // a zero count does not mean zero headers
                            State::Headers { remaining_blocks }
                        };
                    } else {
                        self.state = State::Identification;
                    }
                }
                State::Headers { remaining_blocks } => {
                    // a frame arriving early ends an unknown-count header run
                    if remaining_blocks == 0 && body.first() == Some(&0xFF) {
                        sink.seek_point(SeekPoint {
                            byte_offset: stream.position(),
                            timestamp_ms: 0,
                        });
                        sink.data(body);
                        self.state = State::Frames;
                        continue;
                    }
                    // each header packet is one native metadata block
                    if body.len() >= 4 && body[0] & 0x7F == 4 {
                        sink.metadata(parse_vorbis_comment(&body[4..]));
                    }
                    let done = if remaining_blocks == 0 {
                        // count unknown: the last block announces itself
                        body.first().is_some_and(|&b| b & 0x80 != 0)
                    } else {
                        remaining_blocks == 1
                    };
                    self.state = if done {
                        sink.seek_point(SeekPoint {
                            byte_offset: stream.position(),
                            timestamp_ms: 0,
                        });
                        State::Frames
                    } else {
                        State::Headers {
                            remaining_blocks: remaining_blocks.saturating_sub(1),
                        }
                    };
                }
                State::Frames => {
                    sink.data(body);
                }
                State::Ended => break,
            }
        }

        if stream.ended() && self.state != State::Ended && !stream.available(27) {
            self.state = State::Ended;
            sink.end();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demux::DemuxEvent;

    /// one Ogg page with a single-segment body
    fn page(body: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(28 + body.len());
        out.extend_from_slice(b"OggS");
        out.extend_from_slice(&[0u8; 22]); // version, type, granule, serial, sequence, crc
        out.push(1);
        out.push(body.len() as u8);
        out.extend_from_slice(body);
        out
    }

    /// 44.1 kHz mono 16-bit, zero total samples
    fn streaminfo() -> Vec<u8> {
        let mut si = vec![0x10, 0x00, 0x10, 0x00]; // min/max block size 4096
        si.extend_from_slice(&[0u8; 6]); // min/max frame size unknown
        si.extend_from_slice(&[0x0A, 0xC4, 0x40, 0xF0]);
        si.extend_from_slice(&[0u8; 4]); // total samples
        si.extend_from_slice(&[0u8; 16]); // md5
        si
    }

    fn identification(header_count: u16, streaminfo_last: bool) -> Vec<u8> {
        let mut pkt = b"\x7fFLAC\x01\x00".to_vec();
        pkt.extend_from_slice(&header_count.to_be_bytes());
        pkt.extend_from_slice(b"fLaC");
        pkt.push(if streaminfo_last { 0x80 } else { 0x00 });
        pkt.extend_from_slice(&[0, 0, 34]);
        pkt.extend_from_slice(&streaminfo());
        pkt
    }

    fn comment_block(last: bool) -> Vec<u8> {
        let mut body = 0u32.to_le_bytes().to_vec(); // empty vendor string
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(&7u32.to_le_bytes());
        body.extend_from_slice(b"TITLE=x");
        let mut pkt = vec![if last { 0x84 } else { 0x04 }];
        pkt.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
        pkt.extend_from_slice(&body);
        pkt
    }

    fn run(pages: &[Vec<u8>]) -> EventSink {
        let mut stream = ByteStream::new();
        stream.append(pages.concat());
        stream.mark_ended();
        let mut sink = EventSink::new();
        OggFlacParser::new()
            .advance(&mut stream, &mut sink)
            .unwrap();
        sink
    }

    const FRAME: [u8; 4] = [0xFF, 0xF8, 0xC9, 0x08];

    #[test]
    fn unknown_header_count_waits_for_the_last_block_flag() {
        let mut sink = run(&[
            page(&identification(0, false)),
            page(&comment_block(true)),
            page(&FRAME),
        ]);
        assert!(matches!(sink.pop(), Some(DemuxEvent::Format(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::Cookie(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::Metadata(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::SeekPoint(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::Data(d)) if d == FRAME));
        assert!(matches!(sink.pop(), Some(DemuxEvent::End)));
    }

    #[test]
    fn early_frame_sync_ends_an_unknown_count_header_run() {
        let mut sink = run(&[page(&identification(0, false)), page(&FRAME)]);
        assert!(matches!(sink.pop(), Some(DemuxEvent::Format(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::Cookie(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::SeekPoint(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::Data(d)) if d == FRAME));
    }

    #[test]
    fn streaminfo_flagged_last_goes_straight_to_frames() {
        let mut sink = run(&[page(&identification(0, true)), page(&FRAME)]);
        assert!(matches!(sink.pop(), Some(DemuxEvent::Format(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::Cookie(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::SeekPoint(_))));
        assert!(matches!(sink.pop(), Some(DemuxEvent::Data(d)) if d == FRAME));
    }
}
