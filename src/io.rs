// File-oriented convenience layer.
//
// The decoder itself is a pure function over an in-memory buffer; this
// module only supplies the read-the-whole-file-then-parse wrapper so
// callers do not have to wire it up themselves.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::decoder;
use crate::error::DecodeError;
use crate::model::Usmap;

/// Error type for file-based parsing.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem error reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file content failed to decode.
    #[error("decode error: {0}")]
    Decode(DecodeError),
}

// DecodeError carries an io::Error for decompression failures, so a
// blanket #[from] on both variants would be ambiguous; map explicitly.
impl From<DecodeError> for IoError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

/// Read and parse a `.usmap` file.
///
/// The complete file is read into memory before parsing begins; there
/// is no incremental decoding across I/O boundaries.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Usmap, IoError> {
    let bytes = fs::read(path)?;
    Ok(decoder::parse(&bytes)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
