//! pcmflow: a streaming audio decode pipeline.
//!
//! Bytes go in through an [`Asset`] in whatever chunk sizes the source
//! delivers them; interleaved f32 PCM comes out. A probe registry picks the
//! container (WAVE, AIFF, CAF, M4A, AU, ADTS, FLAC, FLAC-in-Ogg), the
//! demuxer emits codec payload plus format/metadata/seek events, and the
//! codec layer (AAC-LC, FLAC, LPCM, G.711) decodes incrementally, suspending
//! on underflow instead of failing.
//!
//! ```no_run
//! use pcmflow::{Asset, AssetEvent, CodecRegistry, FormatRegistry};
//!
//! let mut asset = Asset::new(&FormatRegistry::with_defaults(), &CodecRegistry::with_defaults());
//! # let chunk: Vec<u8> = Vec::new();
//! asset.push(asset.epoch(), chunk);
//! for event in asset.poll() {
//!     if let AssetEvent::Frame(frame) = event {
//!         // hand frame.samples to the output device
//!     }
//! }
//! ```

pub mod codec;
pub mod core;
pub mod demux;
pub mod playback;

pub use crate::core::{
    AudioInfo, Bitstream, ByteStream, CodecId, Error, Format, MetaValue, Metadata, PcmFrame,
    Result, SeekPoint, SeekTable,
};
pub use codec::{AudioDecoder, CodecRegistry};
pub use demux::{ContainerParser, DemuxEvent, FormatRegistry};
pub use playback::{Asset, AssetEvent, PlaybackQueue, QueueSignal, Resampler};
