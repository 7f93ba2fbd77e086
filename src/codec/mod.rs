//! Codec decoders and their registry.
//!
//! Decoders consume the payload the demuxers emit, buffered in a [`Bitstream`]
//! so a decode attempt that runs out of bits can rewind to the start of the
//! access unit and report "not yet" instead of failing.

use std::collections::BTreeMap;

use crate::core::error::{Error, Result};
use crate::core::types::{CodecId, Format, PcmFrame};

pub mod aac;
pub mod flac;
pub mod lpcm;

/// Streaming audio decoder.
///
/// Input arrives through [`queue`](AudioDecoder::queue) in arbitrary-sized
/// pieces; [`decode_next`](AudioDecoder::decode_next) yields `Ok(None)` when
/// the buffered input does not yet hold a whole access unit, leaving the
/// input untouched so the caller can queue more and retry.
pub trait AudioDecoder {
    /// Queue demuxed codec payload.
    fn queue(&mut self, data: &[u8]);

    /// No further input will arrive; a trailing partial packet becomes final.
    fn end_of_input(&mut self);

    /// Decode one access unit. `Ok(None)` means more input is needed, or the
    /// stream is exhausted after [`end_of_input`](AudioDecoder::end_of_input).
    fn decode_next(&mut self) -> Result<Option<PcmFrame>>;

    /// Discard buffered input and inter-frame state (overlap buffers,
    /// predictors), then restart output timestamps at the given PCM frame.
    /// Rescinds a prior [`end_of_input`](AudioDecoder::end_of_input): after a
    /// seek, new input follows.
    fn flush(&mut self, frame_position: u64);
}

pub type DecoderFactory = fn(&Format, Option<&[u8]>) -> Result<Box<dyn AudioDecoder>>;

/// Maps codec identifiers to decoder constructors.
#[derive(Clone)]
pub struct CodecRegistry {
    factories: BTreeMap<CodecId, DecoderFactory>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// All built-in decoders. ALAC is recognized by the containers but has
    /// no decoder; creating it reports the codec as unsupported.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(CodecId::Lpcm, lpcm::LpcmDecoder::factory);
        reg.register(CodecId::Ulaw, lpcm::LpcmDecoder::factory);
        reg.register(CodecId::Alaw, lpcm::LpcmDecoder::factory);
        reg.register(CodecId::Flac, flac::FlacDecoder::factory);
        reg.register(CodecId::Aac, aac::AacDecoder::factory);
        reg
    }

    pub fn register(&mut self, codec: CodecId, factory: DecoderFactory) {
        self.factories.insert(codec, factory);
    }

    pub fn create(
        &self,
        format: &Format,
        cookie: Option<&[u8]>,
    ) -> Result<Box<dyn AudioDecoder>> {
        let factory = self
            .factories
            .get(&format.codec)
            .ok_or(Error::Unsupported("no decoder for codec"))?;
        factory(format, cookie)
    }

    pub fn supports(&self, codec: CodecId) -> bool {
        self.factories.contains_key(&codec)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
