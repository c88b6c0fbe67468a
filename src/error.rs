// Decoder error type.
//
// Every error aborts the parse in progress; the decoder never retries,
// recovers, or returns a partial model.

use thiserror::Error;

/// Error produced while decoding a `.usmap` container.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The leading magic did not match [`USMAP_MAGIC`](crate::header::USMAP_MAGIC).
    #[error("invalid usmap magic: expected 0x30C4, got {found:#06X}")]
    InvalidMagic { found: u16 },

    /// Format version beyond the highest ordinal this crate knows.
    #[error("unsupported usmap format version: {0}")]
    UnsupportedVersion(u8),

    /// Oodle, an unknown compression tag, or a method whose backend
    /// feature is disabled.
    #[error("unsupported compression method: {0}")]
    UnsupportedCompression(u8),

    /// `None` compression with differing declared sizes.
    #[error("size mismatch for uncompressed body: compressed {compressed}, decompressed {decompressed}")]
    SizeMismatch { compressed: u32, decompressed: u32 },

    /// A fixed-width read past the end of the current buffer.
    #[error("read of {requested} byte(s) at offset {offset} exceeds buffer of {len} byte(s)")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        len: usize,
    },

    /// A property type tag outside the fixed 31-entry enumeration.
    #[error("invalid property type tag: {0}")]
    InvalidPropertyTag(u8),

    /// A name index that must resolve (struct name, property name, enum
    /// name, enum member) landed outside the name table.
    #[error("name index {index} for {site} is not in the name table")]
    MissingRequiredName { index: i32, site: &'static str },

    /// The external decompressor rejected the body bytes.
    #[error("body decompression failed: {0}")]
    Decompress(#[from] std::io::Error),
}
