//! Playback orchestration: asset decoding, the buffered output queue, and
//! sample-rate conversion to the output device rate.

pub mod asset;
pub mod queue;
pub mod resample;

pub use asset::{Asset, AssetEvent};
pub use queue::{PlaybackQueue, QueueSignal};
pub use resample::Resampler;
