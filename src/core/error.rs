//! Error taxonomy for the decode pipeline.
//!
//! `Underflow` is the one recoverable variant: it means "not enough bytes
//! buffered yet", and callers react by rewinding to the start of the unit
//! they were parsing and waiting for more data. Everything else is fatal
//! for the asset that hit it.

use thiserror::Error;

/// result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Not enough buffered data to finish the current parse. Recoverable:
    /// rewind and retry once more bytes arrive.
    #[error("not enough data buffered")]
    Underflow,

    /// Structurally invalid container or codec bitstream. Fatal for the
    /// asset; surfaced exactly once.
    #[error("malformed stream: {0}")]
    Malformed(&'static str),

    /// Structurally valid bitstream using a feature this pipeline does not
    /// implement. Fatal and explicit rather than silently wrong.
    #[error("unsupported feature: {0}")]
    Unsupported(&'static str),

    /// No registered container parser recognized the leading bytes.
    #[error("unrecognized container format")]
    UnknownFormat,

    /// Propagated verbatim from the source, never interpreted here.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// is this the recoverable wait-for-more-data signal?
    pub fn is_underflow(&self) -> bool {
        matches!(self, Error::Underflow)
    }
}
