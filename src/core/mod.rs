pub mod bitstream;
pub mod buffer;
pub mod error;
pub mod sample;
pub mod stream;
pub mod types;

pub use bitstream::Bitstream;
pub use buffer::BufferChain;
pub use error::{Error, Result};
pub use stream::ByteStream;
pub use types::{
    AudioInfo, CodecId, Format, MetaValue, Metadata, PcmFrame, SeekPoint, SeekTable,
};
