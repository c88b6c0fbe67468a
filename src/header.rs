// Usmap file header decoding.
//
// The header is a sequential fixed grammar: magic, format version, an
// optional package-versioning block (version 1 and later), then the
// compression method and the compressed/decompressed body sizes. All
// remaining bytes after the header are the (possibly compressed) body.

use crate::error::DecodeError;
use crate::reader::ByteReader;

// ---------------------------------------------------------------------------
// Magic and format versions
// ---------------------------------------------------------------------------

/// The two-byte magic at the start of every usmap file.
pub const USMAP_MAGIC: u16 = 0x30C4;

/// Usmap container format version.
///
/// Ordinals are the on-wire values; versions above [`FormatVersion::LATEST`]
/// are rejected. Two field widths depend on the version: name lengths grow
/// from u8 to u16 at `LongFName`, and enum member counts grow from u8 to
/// u16 at `LargeEnums`. Every other field width is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum FormatVersion {
    /// Original format.
    Initial = 0,
    /// Adds the optional package-versioning block.
    PackageVersioning = 1,
    /// Name lengths widen from u8 to u16.
    LongFName = 2,
    /// Enum member counts widen from u8 to u16.
    LargeEnums = 3,
}

impl FormatVersion {
    /// Highest version this crate decodes.
    pub const LATEST: FormatVersion = FormatVersion::LargeEnums;

    /// Map an on-wire ordinal to a version.
    pub fn from_ordinal(ordinal: u8) -> Result<Self, DecodeError> {
        match ordinal {
            0 => Ok(Self::Initial),
            1 => Ok(Self::PackageVersioning),
            2 => Ok(Self::LongFName),
            3 => Ok(Self::LargeEnums),
            other => Err(DecodeError::UnsupportedVersion(other)),
        }
    }

    /// Width gate for name-table entry lengths.
    pub fn has_long_names(self) -> bool {
        self >= Self::LongFName
    }

    /// Width gate for enum member counts.
    pub fn has_large_enums(self) -> bool {
        self >= Self::LargeEnums
    }
}

// ---------------------------------------------------------------------------
// Compression methods
// ---------------------------------------------------------------------------

/// Body compression method tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionMethod {
    None = 0,
    /// Never decodable; no Oodle implementation exists or is planned.
    Oodle = 1,
    Brotli = 2,
    Zstandard = 3,
}

impl CompressionMethod {
    /// Map an on-wire tag to a method. Tags outside the fixed set are
    /// rejected here, before any body byte is consumed.
    pub fn from_tag(tag: u8) -> Result<Self, DecodeError> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Oodle),
            2 => Ok(Self::Brotli),
            3 => Ok(Self::Zstandard),
            other => Err(DecodeError::UnsupportedCompression(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Package versioning block
// ---------------------------------------------------------------------------

/// A 128-bit GUID, stored as raw bytes in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guid(pub [u8; 16]);

/// A GUID-keyed schema version stamp. Opaque to the decoder beyond storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomVersion {
    pub key: Guid,
    pub version: i32,
}

/// Engine file versions carried by the optional versioning block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileVersion {
    pub ue4: i32,
    pub ue5: i32,
}

/// Optional package-versioning metadata (format version 1 and later).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersioning {
    pub file_version: FileVersion,
    pub custom_versions: Vec<CustomVersion>,
    pub net_cl: u32,
}

impl PackageVersioning {
    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let ue4 = reader.read_i32()?;
        let ue5 = reader.read_i32()?;

        let count = reader.read_i32()?.max(0) as usize;
        let mut custom_versions = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let mut key = [0u8; 16];
            key.copy_from_slice(reader.read_bytes(16)?);
            let version = reader.read_i32()?;
            custom_versions.push(CustomVersion {
                key: Guid(key),
                version,
            });
        }

        let net_cl = reader.read_u32()?;

        Ok(Self {
            file_version: FileVersion { ue4, ue5 },
            custom_versions,
            net_cl,
        })
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Parsed usmap header. Everything after it is the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: FormatVersion,
    pub package_versioning: Option<PackageVersioning>,
    pub method: CompressionMethod,
    pub size_compressed: u32,
    pub size_decompressed: u32,
}

impl Header {
    /// Decode the header, leaving the cursor at the first body byte.
    ///
    /// Layout:
    /// 1. magic (u16, = 0x30C4)
    /// 2. format version (u8, 0..=3)
    /// 3. [version >= 1] versioning flag (i32, 1 = present) and block
    /// 4. compression method (u8), compressed size (u32), decompressed size (u32)
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let magic = reader.read_u16()?;
        if magic != USMAP_MAGIC {
            return Err(DecodeError::InvalidMagic { found: magic });
        }

        let version = FormatVersion::from_ordinal(reader.read_u8()?)?;

        let package_versioning = if version >= FormatVersion::PackageVersioning {
            let has_versioning = reader.read_i32()?;
            if has_versioning == 1 {
                Some(PackageVersioning::decode(reader)?)
            } else {
                None
            }
        } else {
            None
        };

        let method = CompressionMethod::from_tag(reader.read_u8()?)?;
        let size_compressed = reader.read_u32()?;
        let size_decompressed = reader.read_u32()?;

        log::debug!(
            "usmap header: version {version:?}, method {method:?}, \
             {size_compressed} -> {size_decompressed} bytes"
        );

        Ok(Self {
            version,
            package_versioning,
            method,
            size_compressed,
            size_decompressed,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
