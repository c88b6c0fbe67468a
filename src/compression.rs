// Body decompression dispatch.
//
// Provides a pluggable `DecompressBackend` trait with built-in
// implementations per compression tag:
//   - None      (passthrough; declared sizes must agree)
//   - Oodle     (permanently unsupported, always fails)
//   - Brotli    (via the brotli crate, feature-gated `brotli`)
//   - Zstandard (via the zstd crate, feature-gated `zstd`)
//
// The declared decompressed size is a capacity hint only; it is never
// enforced against a backend's output.

use crate::error::DecodeError;
use crate::header::{CompressionMethod, Header};

// ---------------------------------------------------------------------------
// DecompressBackend trait
// ---------------------------------------------------------------------------

/// A decompressor for the usmap body.
///
/// One implementation per supported compression tag; the dispatcher is
/// closed over the fixed tag set, no dynamic registration.
pub trait DecompressBackend {
    /// The compression tag this backend serves.
    fn method(&self) -> CompressionMethod;

    /// Decompress the raw body bytes.
    ///
    /// `size_hint` is the header's declared decompressed size, usable
    /// to pre-size the output buffer.
    fn decompress(&self, data: &[u8], size_hint: usize) -> Result<Vec<u8>, DecodeError>;
}

// ---------------------------------------------------------------------------
// None backend
// ---------------------------------------------------------------------------

/// Passthrough for uncompressed bodies.
///
/// The only method that enforces the header's declared sizes: an
/// uncompressed body must declare equal compressed and decompressed
/// sizes, anything else is corrupt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneBackend;

impl DecompressBackend for NoneBackend {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::None
    }

    fn decompress(&self, data: &[u8], _size_hint: usize) -> Result<Vec<u8>, DecodeError> {
        Ok(data.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Oodle backend
// ---------------------------------------------------------------------------

/// Oodle is proprietary; no implementation exists or is planned.
#[derive(Debug, Clone, Copy, Default)]
pub struct OodleBackend;

impl DecompressBackend for OodleBackend {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Oodle
    }

    fn decompress(&self, _data: &[u8], _size_hint: usize) -> Result<Vec<u8>, DecodeError> {
        Err(DecodeError::UnsupportedCompression(
            CompressionMethod::Oodle as u8,
        ))
    }
}

// ---------------------------------------------------------------------------
// Brotli backend
// ---------------------------------------------------------------------------

/// Brotli decompressor (tag 2).
#[cfg(feature = "brotli")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrotliBackend;

#[cfg(feature = "brotli")]
impl DecompressBackend for BrotliBackend {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Brotli
    }

    fn decompress(&self, data: &[u8], size_hint: usize) -> Result<Vec<u8>, DecodeError> {
        let mut input = data;
        let mut output = Vec::with_capacity(size_hint);
        brotli::BrotliDecompress(&mut input, &mut output)?;
        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Zstandard backend
// ---------------------------------------------------------------------------

/// Zstandard decompressor (tag 3).
#[cfg(feature = "zstd")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdBackend;

#[cfg(feature = "zstd")]
impl DecompressBackend for ZstdBackend {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Zstandard
    }

    fn decompress(&self, data: &[u8], _size_hint: usize) -> Result<Vec<u8>, DecodeError> {
        let output = zstd::stream::decode_all(data)?;
        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Look up the decompression backend for a compression method.
///
/// Decode-side dispatch: given the tag from the header, return the
/// backend that decompresses the body. Oodle dispatches to a backend
/// that always fails, keeping the tag set closed.
pub fn backend_for_method(
    method: CompressionMethod,
) -> Result<Box<dyn DecompressBackend>, DecodeError> {
    match method {
        CompressionMethod::None => Ok(Box::new(NoneBackend)),
        CompressionMethod::Oodle => Ok(Box::new(OodleBackend)),

        #[cfg(feature = "brotli")]
        CompressionMethod::Brotli => Ok(Box::new(BrotliBackend)),

        #[cfg(not(feature = "brotli"))]
        CompressionMethod::Brotli => Err(DecodeError::UnsupportedCompression(
            CompressionMethod::Brotli as u8,
        )),

        #[cfg(feature = "zstd")]
        CompressionMethod::Zstandard => Ok(Box::new(ZstdBackend)),

        #[cfg(not(feature = "zstd"))]
        CompressionMethod::Zstandard => Err(DecodeError::UnsupportedCompression(
            CompressionMethod::Zstandard as u8,
        )),
    }
}

/// Decompress the body bytes according to the header.
pub fn decompress_body(header: &Header, body: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if header.method == CompressionMethod::None
        && header.size_compressed != header.size_decompressed
    {
        return Err(DecodeError::SizeMismatch {
            compressed: header.size_compressed,
            decompressed: header.size_decompressed,
        });
    }

    let backend = backend_for_method(header.method)?;
    backend.decompress(body, header.size_decompressed as usize)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
