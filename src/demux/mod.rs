//! Container demuxing: a probe registry selects a parser, and each parser is
//! a resumable state machine over its container's native chunking.
//!
//! The resumable-parse contract: a parser reads a chunk header only when the
//! stream has it fully buffered, and returns without consuming otherwise, so
//! the same machine can be invoked repeatedly as bytes trickle in. Emission
//! order is `format`, then at most one `cookie`, then any number of
//! `duration`/`metadata`/`seekpoint` interleaved with `data`, then `end`.

use std::collections::VecDeque;

use crate::core::error::Result;
use crate::core::stream::ByteStream;
use crate::core::types::{Format, MetaValue, Metadata, SeekPoint};

pub mod adts;
pub mod aiff;
pub mod au;
pub mod caf;
pub mod flac;
pub mod m4a;
pub mod oggflac;
pub mod wave;

/// events a container parser emits while consuming the stream
#[derive(Debug, Clone)]
pub enum DemuxEvent {
    Format(Format),
    /// opaque codec-initialization payload, at most one, before any data
    Cookie(Vec<u8>),
    Duration { total_frames: u64 },
    Metadata(Metadata),
    SeekPoint(SeekPoint),
    /// raw compressed payload
    Data(Vec<u8>),
    End,
}

/// collects parser output for the orchestration layer
#[derive(Debug, Default)]
pub struct EventSink {
    events: VecDeque<DemuxEvent>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&mut self, format: Format) {
        self.events.push_back(DemuxEvent::Format(format));
    }

    pub fn cookie(&mut self, cookie: Vec<u8>) {
        self.events.push_back(DemuxEvent::Cookie(cookie));
    }

    pub fn duration(&mut self, total_frames: u64) {
        self.events.push_back(DemuxEvent::Duration { total_frames });
    }

    pub fn metadata(&mut self, metadata: Metadata) {
        if !metadata.is_empty() {
            self.events.push_back(DemuxEvent::Metadata(metadata));
        }
    }

    pub fn seek_point(&mut self, point: SeekPoint) {
        self.events.push_back(DemuxEvent::SeekPoint(point));
    }

    pub fn data(&mut self, payload: Vec<u8>) {
        if !payload.is_empty() {
            self.events.push_back(DemuxEvent::Data(payload));
        }
    }

    pub fn end(&mut self) {
        self.events.push_back(DemuxEvent::End);
    }

    pub fn pop(&mut self) -> Option<DemuxEvent> {
        self.events.pop_front()
    }
}

/// store raw bytes as a trimmed text metadata entry
pub(crate) fn put_text(meta: &mut Metadata, key: &str, value: &[u8]) {
    let text = String::from_utf8_lossy(value)
        .trim_end_matches('\0')
        .to_string();
    meta.insert(key.to_string(), MetaValue::Text(text));
}

/// a resumable container parser
pub trait ContainerParser {
    /// consume as much buffered structure as possible, emitting events;
    /// returns without consuming when a unit is not fully buffered
    fn advance(&mut self, stream: &mut ByteStream, sink: &mut EventSink) -> Result<()>;

    /// notify the parser that the source will resume at `container_offset`
    /// after a seek; parsers that stream a payload body re-anchor here
    fn handle_seek(&mut self, container_offset: u64) {
        let _ = container_offset;
    }
}

/// registry entry: a cheap pure probe plus a parser factory
#[derive(Clone, Copy)]
pub struct ContainerSpec {
    pub name: &'static str,
    /// pure predicate over the leading bytes, no side effects
    pub probe: fn(&[u8]) -> bool,
    pub factory: fn() -> Box<dyn ContainerParser>,
}

/// ordered set of candidate container parsers; an explicit value, not a
/// process-wide singleton
#[derive(Clone)]
pub struct FormatRegistry {
    specs: Vec<ContainerSpec>,
}

impl FormatRegistry {
    /// empty registry
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// all built-in containers, in probe order; ADTS goes last because its
    /// sync-word probe is the most permissive
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(wave::spec());
        reg.register(aiff::spec());
        reg.register(caf::spec());
        reg.register(m4a::spec());
        reg.register(au::spec());
        reg.register(flac::spec());
        reg.register(oggflac::spec());
        reg.register(adts::spec());
        reg
    }

    pub fn register(&mut self, spec: ContainerSpec) {
        self.specs.push(spec);
    }

    /// first registered parser whose probe accepts the leading bytes
    pub fn select(&self, initial: &[u8]) -> Option<&ContainerSpec> {
        self.specs.iter().find(|spec| (spec.probe)(initial))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
