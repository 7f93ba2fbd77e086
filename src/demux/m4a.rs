//! ISO-BMFF / M4A container parser.
//!
//! Walks the atom tree incrementally: container atoms are descended into by
//! consuming only their headers, leaf atoms are buffered whole. Sample-table
//! atoms (`stts`/`stsc`/`stsz`/`stco`) are retained and converted into seek
//! points only once all four are present. An `mdat` that precedes `moov` is
//! buffered until the movie box resolves the format.

use log::{debug, warn};

use super::{put_text, ContainerParser, ContainerSpec, EventSink};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{CodecId, Format, MetaValue, Metadata, SeekPoint};

pub fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "m4a",
        probe,
        factory: || Box::new(M4aParser::new()),
    }
}

fn probe(initial: &[u8]) -> bool {
    initial.len() >= 8 && &initial[4..8] == b"ftyp"
}

/// atoms that contain other atoms and are descended into header-by-header
const CONTAINERS: [&[u8; 4]; 7] = [b"moov", b"trak", b"mdia", b"minf", b"stbl", b"udta", b"ilst"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    AtomHeader,
    LeafBody { fourcc: [u8; 4], size: u64 },
    MdatBody { remaining: u64 },
    SkipBody { remaining: u64 },
    Ended,
}

/// per-track accumulation while a `trak` atom is open
#[derive(Debug, Default)]
struct TrackInfo {
    codec: Option<CodecId>,
    sample_rate: u32,
    channels: u8,
    bits: u8,
    float: bool,
    little_endian: bool,
    cookie: Option<Vec<u8>>,
    timescale: u32,
    duration_units: u64,
    stts: Vec<(u32, u32)>,
    stsc: Vec<(u32, u32)>,
    stsz_uniform: u32,
    stsz: Vec<u32>,
    stco: Vec<u64>,
}

pub struct M4aParser {
    state: State,
    /// open container atoms with their end offsets
    stack: Vec<([u8; 4], u64)>,
    track: TrackInfo,
    adopted: Option<TrackInfo>,
    meta: Metadata,
    /// mdat payload seen before moov resolved the format
    early_mdat: Vec<u8>,
    resolved: bool,
    mdat_start: Option<u64>,
}

impl M4aParser {
    pub fn new() -> Self {
        Self {
            state: State::AtomHeader,
            stack: Vec::new(),
            track: TrackInfo::default(),
            adopted: None,
            meta: Metadata::new(),
            early_mdat: Vec::new(),
            resolved: false,
            mdat_start: None,
        }
    }

    fn close_containers(&mut self, pos: u64, sink: &mut EventSink) {
        while let Some(&(fourcc, end)) = self.stack.last() {
            if pos < end {
                break;
            }
            self.stack.pop();
            match &fourcc {
                b"trak" => {
                    if self.adopted.is_none() && self.track.codec.is_some() {
                        self.adopted = Some(std::mem::take(&mut self.track));
                    } else {
                        self.track = TrackInfo::default();
                    }
                }
                b"moov" => self.resolve(sink),
                _ => {}
            }
        }
    }

    /// moov closed: emit format/cookie/duration/seek points and flush any
    /// buffered mdat payload
    fn resolve(&mut self, sink: &mut EventSink) {
        if self.resolved {
            return;
        }
        let Some(track) = self.adopted.take() else {
            return;
        };
        let Some(codec) = track.codec else { return };
        let format = Format {
            codec,
            sample_rate: track.sample_rate,
            channels: track.channels,
            bits_per_channel: track.bits,
            frames_per_packet: if codec == CodecId::Aac { 1024 } else { 1 },
            bytes_per_packet: 0,
            float: track.float,
            little_endian: track.little_endian,
        };
        debug!("m4a: track resolved {:?}", format);
        sink.format(format);
        if let Some(cookie) = &track.cookie {
            sink.cookie(cookie.clone());
        }
        if track.timescale > 0 && track.duration_units > 0 {
            let total_frames =
                track.duration_units * track.sample_rate as u64 / track.timescale as u64;
            sink.duration(total_frames);
        }
        self.emit_seek_points(&track, sink);
        sink.metadata(std::mem::take(&mut self.meta));
        self.resolved = true;
        if !self.early_mdat.is_empty() {
            sink.data(std::mem::take(&mut self.early_mdat));
        }
    }

    /// seek points from the four sample tables, one per chunk
    fn emit_seek_points(&self, track: &TrackInfo, sink: &mut EventSink) {
        if track.stts.is_empty() || track.stsc.is_empty() || track.stco.is_empty() {
            return;
        }
        if track.stsz.is_empty() && track.stsz_uniform == 0 {
            return;
        }
        if track.timescale == 0 {
            return;
        }

        // expand stsc: samples-per-chunk for each chunk index
        let chunk_count = track.stco.len();
        let mut samples_per_chunk = vec![0u32; chunk_count];
        for (i, &(first, per)) in track.stsc.iter().enumerate() {
            let start = first.saturating_sub(1) as usize;
            let end = track
                .stsc
                .get(i + 1)
                .map(|&(next_first, _)| next_first.saturating_sub(1) as usize)
                .unwrap_or(chunk_count);
            for slot in samples_per_chunk
                .iter_mut()
                .take(end.min(chunk_count))
                .skip(start)
            {
                *slot = per;
            }
        }

        // cumulative stts walk gives each sample's start in time units
        let mut stts_iter = track.stts.iter().copied();
        let mut run = stts_iter.next().unwrap_or((0, 0));
        let mut run_left = run.0;
        let mut units: u64 = 0;
        let mut sample_index: u64 = 0;

        for (chunk, &offset) in track.stco.iter().enumerate() {
            sink.seek_point(SeekPoint {
                byte_offset: offset,
                timestamp_ms: units * 1000 / track.timescale as u64,
            });
            for _ in 0..samples_per_chunk[chunk] {
                units += run.1 as u64;
                sample_index += 1;
                if run_left > 0 {
                    run_left -= 1;
                    if run_left == 0 {
                        run = stts_iter.next().unwrap_or((0, run.1));
                        run_left = run.0;
                    }
                }
            }
        }
        let _ = sample_index;
    }

    fn parse_leaf(&mut self, fourcc: [u8; 4], body: &[u8], sink: &mut EventSink) -> Result<()> {
        match &fourcc {
            b"mdhd" => self.parse_mdhd(body)?,
            b"stsd" => self.parse_stsd(body)?,
            b"stts" => {
                let entries = table_entries(body)?;
                for chunk in entry_slice(body, entries, 8)? {
                    let count = u32::from_be_bytes(chunk[0..4].try_into().unwrap());
                    let delta = u32::from_be_bytes(chunk[4..8].try_into().unwrap());
                    self.track.stts.push((count, delta));
                }
            }
            b"stsc" => {
                let entries = table_entries(body)?;
                for chunk in entry_slice(body, entries, 12)? {
                    let first = u32::from_be_bytes(chunk[0..4].try_into().unwrap());
                    let per = u32::from_be_bytes(chunk[4..8].try_into().unwrap());
                    self.track.stsc.push((first, per));
                }
            }
            b"stsz" => {
                if body.len() < 12 {
                    return Err(Error::Malformed("m4a: short stsz"));
                }
                self.track.stsz_uniform =
                    u32::from_be_bytes(body[4..8].try_into().unwrap());
                if self.track.stsz_uniform == 0 {
                    let count = u32::from_be_bytes(body[8..12].try_into().unwrap());
                    for chunk in entry_slice(&body[4..], count, 4)? {
                        self.track
                            .stsz
                            .push(u32::from_be_bytes(chunk.try_into().unwrap()));
                    }
                }
            }
            b"stco" => {
                let entries = table_entries(body)?;
                for chunk in entry_slice(body, entries, 4)? {
                    self.track
                        .stco
                        .push(u32::from_be_bytes(chunk.try_into().unwrap()) as u64);
                }
            }
            b"co64" => {
                let entries = table_entries(body)?;
                for chunk in entry_slice(body, entries, 8)? {
                    self.track
                        .stco
                        .push(u64::from_be_bytes(chunk.try_into().unwrap()));
                }
            }
            // ilst item atoms carry a nested `data` atom
            b"\xa9nam" => self.parse_ilst_item(body, "title"),
            b"\xa9ART" => self.parse_ilst_item(body, "artist"),
            b"\xa9alb" => self.parse_ilst_item(body, "album"),
            b"\xa9day" => self.parse_ilst_item(body, "date"),
            b"\xa9gen" | b"gnre" => self.parse_ilst_item(body, "genre"),
            b"\xa9wrt" => self.parse_ilst_item(body, "composer"),
            b"\xa9cmt" => self.parse_ilst_item(body, "comment"),
            b"covr" => self.parse_ilst_item(body, "cover"),
            _ => {
                let _ = sink;
            }
        }
        Ok(())
    }

    fn parse_mdhd(&mut self, body: &[u8]) -> Result<()> {
        if body.is_empty() {
            return Err(Error::Malformed("m4a: empty mdhd"));
        }
        let version = body[0];
        if version == 1 {
            if body.len() < 32 {
                return Err(Error::Malformed("m4a: short mdhd v1"));
            }
            self.track.timescale = u32::from_be_bytes(body[20..24].try_into().unwrap());
            self.track.duration_units = u64::from_be_bytes(body[24..32].try_into().unwrap());
        } else {
            if body.len() < 24 {
                return Err(Error::Malformed("m4a: short mdhd"));
            }
            self.track.timescale = u32::from_be_bytes(body[12..16].try_into().unwrap());
            self.track.duration_units =
                u32::from_be_bytes(body[16..20].try_into().unwrap()) as u64;
        }
        Ok(())
    }

    fn parse_stsd(&mut self, body: &[u8]) -> Result<()> {
        if body.len() < 16 {
            return Err(Error::Malformed("m4a: short stsd"));
        }
        // version/flags + entry count, then the first sample entry
        let entry = &body[8..];
        let fourcc: [u8; 4] = entry[4..8].try_into().unwrap();
        let Some(codec) = CodecId::from_fourcc(fourcc) else {
            debug!(
                "m4a: ignoring sample entry {:?}",
                String::from_utf8_lossy(&fourcc)
            );
            return Ok(());
        };
        if entry.len() < 36 {
            return Err(Error::Malformed("m4a: short audio sample entry"));
        }
        let version = u16::from_be_bytes(entry[16..18].try_into().unwrap());
        self.track.channels = u16::from_be_bytes(entry[24..26].try_into().unwrap()) as u8;
        self.track.bits = u16::from_be_bytes(entry[26..28].try_into().unwrap()) as u8;
        // 16.16 fixed point
        self.track.sample_rate = u32::from_be_bytes(entry[32..36].try_into().unwrap()) >> 16;
        self.track.codec = Some(codec);
        self.track.float = matches!(&fourcc, b"fl32" | b"fl64");
        self.track.little_endian = matches!(&fourcc, b"sowt" | b"lpcm");

        // children follow the fixed part; version 1 adds 16 bytes
        let mut pos = match version {
            1 => 52,
            2 => return Err(Error::Unsupported("m4a: v2 sample entries")),
            _ => 36,
        };
        while pos + 8 <= entry.len() {
            let size = u32::from_be_bytes(entry[pos..pos + 4].try_into().unwrap()) as usize;
            if size < 8 || pos + size > entry.len() {
                break;
            }
            let child: [u8; 4] = entry[pos + 4..pos + 8].try_into().unwrap();
            let child_body = &entry[pos + 8..pos + size];
            match &child {
                b"esds" => {
                    if let Some(asc) = parse_esds(child_body) {
                        self.track.cookie = Some(asc);
                    }
                }
                b"alac" | b"wave" => {
                    self.track.cookie = Some(child_body.to_vec());
                }
                _ => {}
            }
            pos += size;
        }
        Ok(())
    }

    fn parse_ilst_item(&mut self, body: &[u8], key: &str) {
        // item body is a `data` atom: size, 'data', type, locale, value
        if body.len() < 16 || &body[4..8] != b"data" {
            return;
        }
        let type_code = u32::from_be_bytes(body[8..12].try_into().unwrap());
        let value = &body[16..];
        if type_code == 1 {
            put_text(&mut self.meta, key, value);
        } else {
            self.meta
                .insert(key.to_string(), MetaValue::Blob(value.to_vec()));
        }
    }
}

/// version/flags + 4-byte entry count header common to the sample tables
fn table_entries(body: &[u8]) -> Result<u32> {
    if body.len() < 8 {
        return Err(Error::Malformed("m4a: short table atom"));
    }
    Ok(u32::from_be_bytes(body[4..8].try_into().unwrap()))
}

fn entry_slice(body: &[u8], entries: u32, width: usize) -> Result<std::slice::ChunksExact<'_, u8>> {
    let need = 8 + entries as usize * width;
    if body.len() < need {
        return Err(Error::Malformed("m4a: truncated table atom"));
    }
    Ok(body[8..need].chunks_exact(width))
}

/// walk the esds descriptor chain down to the AudioSpecificConfig
fn parse_esds(body: &[u8]) -> Option<Vec<u8>> {
    // skip version/flags
    let mut pos = 4usize;
    let read_descriptor = |b: &[u8], p: &mut usize| -> Option<(u8, usize)> {
        let tag = *b.get(*p)?;
        *p += 1;
        // expandable length: 7 bits per byte, high bit continues
        let mut len = 0usize;
        for _ in 0..4 {
            let byte = *b.get(*p)?;
            *p += 1;
            len = (len << 7) | (byte & 0x7F) as usize;
            if byte & 0x80 == 0 {
                break;
            }
        }
        Some((tag, len))
    };

    let (tag, _) = read_descriptor(body, &mut pos)?;
    if tag != 0x03 {
        return None;
    }
    // ES_ID and stream flags
    let flags = *body.get(pos + 2)?;
    pos += 3;
    if flags & 0x80 != 0 {
        pos += 2; // dependsOn ES
    }
    if flags & 0x40 != 0 {
        let url_len = *body.get(pos)? as usize;
        pos += 1 + url_len;
    }

    let (tag, _) = read_descriptor(body, &mut pos)?;
    if tag != 0x04 {
        return None;
    }
    pos += 13; // object type, stream type, buffer size, bitrates

    let (tag, len) = read_descriptor(body, &mut pos)?;
    if tag != 0x05 {
        return None;
    }
    body.get(pos..pos + len).map(|s| s.to_vec())
}

impl ContainerParser for M4aParser {
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()> {
        loop {
            match self.state {
                State::AtomHeader => {
                    self.close_containers(stream.position(), sink);
                    if !stream.available(8) {
                        break;
                    }
                    let size32 = stream.read_u32_be()?;
                    let fourcc = stream.read_fourcc()?;
                    let (header_len, size) = if size32 == 1 {
                        if !stream.available(8) {
                            stream.rewind(8)?;
                            break;
                        }
                        (16u64, stream.read_u64_be()?)
                    } else if size32 == 0 {
                        (8u64, u64::MAX) // atom extends to EOF
                    } else {
                        (8u64, size32 as u64)
                    };
                    if size != u64::MAX && size < header_len {
                        return Err(Error::Malformed("m4a: atom smaller than header"));
                    }
                    let body = if size == u64::MAX {
                        u64::MAX
                    } else {
                        size - header_len
                    };

                    if CONTAINERS.contains(&&fourcc) {
                        self.stack
                            .push((fourcc, stream.position().saturating_add(body)));
                        stream.commit();
                        continue;
                    }
                    if &fourcc == b"meta" {
                        // meta is a full atom: version/flags precede children
                        if !stream.available(4) {
                            stream.rewind(header_len)?;
                            break;
                        }
                        stream.advance(4)?;
                        self.stack
                            .push((fourcc, stream.position() + (body - 4)));
                        stream.commit();
                        continue;
                    }
                    if &fourcc == b"mdat" {
                        self.mdat_start = Some(stream.position());
                        self.state = State::MdatBody { remaining: body };
                        stream.commit();
                        continue;
                    }

                    // leaf atoms we parse are buffered whole; everything
                    // else is skipped without buffering
                    const PARSED: [&[u8; 4]; 14] = [
                        b"mdhd", b"stsd", b"stts", b"stsc", b"stsz", b"stco", b"co64",
                        b"\xa9nam", b"\xa9ART", b"\xa9alb", b"\xa9day", b"\xa9gen",
                        b"\xa9cmt", b"covr",
                    ];
                    let inside_ilst = self.stack.last().map(|&(cc, _)| cc == *b"ilst") == Some(true);
                    if PARSED.contains(&&fourcc) || inside_ilst {
                        self.state = State::LeafBody { fourcc, size: body };
                    } else {
                        self.state = State::SkipBody { remaining: body };
                    }
                }
                State::LeafBody { fourcc, size } => {
                    if !stream.available(size) {
                        break;
                    }
                    let body = stream.read_exact(size as usize)?;
                    if let Err(e) = self.parse_leaf(fourcc, &body, sink) {
                        warn!(
                            "m4a: atom {:?} parse failed: {e}",
                            String::from_utf8_lossy(&fourcc)
                        );
                        return Err(e);
                    }
                    stream.commit();
                    self.state = State::AtomHeader;
                }
                State::MdatBody { remaining } => {
                    if remaining == 0 {
                        self.state = State::AtomHeader;
                        continue;
                    }
                    if !stream.available(1) {
                        break;
                    }
                    let take = remaining.min(stream.remaining()).min(1 << 16);
                    let payload = stream.read_exact(take as usize)?;
                    stream.commit();
                    if self.resolved {
                        sink.data(payload);
                    } else {
                        // moov has not arrived yet; hold the payload
                        self.early_mdat.extend_from_slice(&payload);
                    }
                    self.state = State::MdatBody {
                        remaining: if remaining == u64::MAX {
                            u64::MAX
                        } else {
                            remaining - take
                        },
                    };
                    if stream.remaining() == 0 {
                        break;
                    }
                }
                State::SkipBody { remaining } => {
                    let skipped = stream.consume_up_to(remaining);
                    stream.commit();
                    if skipped < remaining {
                        self.state = State::SkipBody {
                            remaining: remaining - skipped,
                        };
                        break;
                    }
                    self.state = State::AtomHeader;
                }
                State::Ended => break,
            }
        }

        if stream.ended() && self.state != State::Ended && !stream.available(1) {
            self.close_containers(u64::MAX, sink);
            self.resolve(sink);
            self.state = State::Ended;
            sink.end();
        }
        Ok(())
    }

    fn handle_seek(&mut self, container_offset: u64) {
        if let Some(start) = self.mdat_start {
            if container_offset >= start {
                self.state = State::MdatBody { remaining: u64::MAX };
            }
        }
    }
}
