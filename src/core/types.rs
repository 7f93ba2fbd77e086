//! Shared descriptive types: codec identifiers, resolved formats, metadata,
//! seek points and decoded frames.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// codec identifier, fourcc-convertible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CodecId {
    /// linear PCM, layout described by the rest of the format
    Lpcm,
    /// MPEG-4 AAC (low complexity)
    Aac,
    Flac,
    Alac,
    /// µ-law companded 8-bit
    Ulaw,
    /// A-law companded 8-bit
    Alaw,
}

impl CodecId {
    /// canonical fourcc spelling
    pub fn fourcc(self) -> [u8; 4] {
        match self {
            CodecId::Lpcm => *b"lpcm",
            CodecId::Aac => *b"mp4a",
            CodecId::Flac => *b"flac",
            CodecId::Alac => *b"alac",
            CodecId::Ulaw => *b"ulaw",
            CodecId::Alaw => *b"alaw",
        }
    }

    pub fn from_fourcc(cc: [u8; 4]) -> Option<Self> {
        match &cc {
            b"lpcm" | b"sowt" | b"twos" | b"raw " | b"NONE" | b"in24" | b"in32" | b"fl32"
            | b"fl64" => Some(CodecId::Lpcm),
            b"mp4a" | b"aac " => Some(CodecId::Aac),
            b"flac" | b"fLaC" => Some(CodecId::Flac),
            b"alac" => Some(CodecId::Alac),
            b"ulaw" | b"ULAW" => Some(CodecId::Ulaw),
            b"alaw" | b"ALAW" => Some(CodecId::Alaw),
            _ => None,
        }
    }
}

/// resolved stream format; immutable once emitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    pub codec: CodecId,
    pub sample_rate: u32,
    pub channels: u8,
    /// bits per channel of the *source* representation
    pub bits_per_channel: u8,
    /// PCM frames per compressed packet (0 when variable)
    pub frames_per_packet: u32,
    /// bytes per compressed packet (0 when variable)
    pub bytes_per_packet: u32,
    pub float: bool,
    pub little_endian: bool,
}

impl Format {
    /// constant-bitrate byte offset for a frame index, when packets are
    /// fixed size; None for variable-rate codecs
    pub fn byte_offset_for_frame(&self, frame: u64) -> Option<u64> {
        if self.bytes_per_packet == 0 || self.frames_per_packet == 0 {
            return None;
        }
        let packet = frame / self.frames_per_packet as u64;
        Some(packet * self.bytes_per_packet as u64)
    }
}

/// flat metadata value, text or raw blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Text(String),
    Blob(Vec<u8>),
}

/// flat string-keyed dictionary (Vorbis comments, M4A ilst, CAF info)
pub type Metadata = BTreeMap<String, MetaValue>;

/// byte-offset / timestamp pair for seeking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekPoint {
    /// offset within the codec payload stream
    pub byte_offset: u64,
    pub timestamp_ms: u64,
}

/// timestamp-sorted seek point table
#[derive(Debug, Default, Clone)]
pub struct SeekTable {
    points: Vec<SeekPoint>,
}

impl SeekTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// insert keeping timestamp order; duplicates replace in place
    pub fn insert(&mut self, point: SeekPoint) {
        match self
            .points
            .binary_search_by_key(&point.timestamp_ms, |p| p.timestamp_ms)
        {
            Ok(i) => self.points[i] = point,
            Err(i) => self.points.insert(i, point),
        }
    }

    /// latest point at or before the target timestamp
    pub fn lookup(&self, timestamp_ms: u64) -> Option<SeekPoint> {
        match self
            .points
            .binary_search_by_key(&timestamp_ms, |p| p.timestamp_ms)
        {
            Ok(i) => Some(self.points[i]),
            Err(0) => None,
            Err(i) => Some(self.points[i - 1]),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeekPoint] {
        &self.points
    }
}

/// decoded PCM block, channel-interleaved f32 in [-1, 1]
#[derive(Debug, Clone)]
pub struct PcmFrame {
    pub samples: Vec<f32>,
    pub channels: u8,
    /// presentation timestamp of the first sample
    pub timestamp_ms: u64,
}

impl PcmFrame {
    /// frames (samples per channel) in this block
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// summary info surfaced once a format and duration are known
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_channel: u8,
    /// total PCM frames when the container declares them
    pub total_frames: Option<u64>,
}

impl AudioInfo {
    pub fn duration_secs(&self) -> Option<f64> {
        self.total_frames
            .map(|frames| frames as f64 / self.sample_rate as f64)
    }
}
