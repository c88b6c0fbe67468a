// Usmap body decoding and the top-level parse entry point.
//
// The body is decoded with a fresh cursor over the decompressed bytes,
// in three fixed stages: name table, enum table, struct table. The
// struct table recursively decodes the property-type grammar.
//
// Deduplication is deliberately asymmetric and matches the writer:
//   - enums keep the FIRST entry per name, later duplicates are dropped
//   - structs keep the LAST entry per name, at the FIRST occurrence's
//     position in the output sequence

use std::collections::{HashMap, HashSet};

use crate::compression;
use crate::error::DecodeError;
use crate::header::{FormatVersion, Header};
use crate::model::{EnumEntry, PropertyInfo, PropertyKind, PropertyType, StructEntry, Usmap};
use crate::reader::ByteReader;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Parse a complete usmap container from memory.
///
/// `bytes` is the whole file: header, then the (possibly compressed)
/// body. Parsing is a pure function of the input; identical bytes
/// always yield a structurally identical [`Usmap`].
///
/// # Example
///
/// ```no_run
/// let bytes = std::fs::read("Mappings.usmap").unwrap();
/// let mappings = usmap::parse(&bytes).unwrap();
/// println!("{} structs, {} enums", mappings.structs.len(), mappings.enums.len());
/// ```
pub fn parse(bytes: &[u8]) -> Result<Usmap, DecodeError> {
    let mut reader = ByteReader::new(bytes);
    let header = Header::decode(&mut reader)?;

    let body = compression::decompress_body(&header, reader.remaining())?;

    let mut body_reader = ByteReader::new(&body);
    let names = decode_name_table(&mut body_reader, header.version)?;
    let enums = decode_enum_table(&mut body_reader, header.version, &names)?;
    let structs = decode_struct_table(&mut body_reader, &names)?;

    Ok(Usmap {
        package_versioning: header.package_versioning,
        names,
        enums,
        structs,
    })
}

/// Promote an absent name at a structurally-required site to an error.
fn require_name(
    resolved: (i32, Option<&str>),
    site: &'static str,
) -> Result<String, DecodeError> {
    let (index, name) = resolved;
    name.map(str::to_owned)
        .ok_or(DecodeError::MissingRequiredName { index, site })
}

// ---------------------------------------------------------------------------
// Name table
// ---------------------------------------------------------------------------

fn decode_name_table(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
) -> Result<Vec<String>, DecodeError> {
    let count = reader.read_u32()? as usize;
    let mut names = Vec::with_capacity(count.min(1 << 20));

    for _ in 0..count {
        // Name length widened from u8 to u16 at LongFName.
        let len = if version.has_long_names() {
            reader.read_u16()? as usize
        } else {
            reader.read_u8()? as usize
        };
        names.push(reader.read_ascii_string(len)?);
    }

    log::trace!("decoded name table: {} entries", names.len());
    Ok(names)
}

// ---------------------------------------------------------------------------
// Enum table
// ---------------------------------------------------------------------------

fn decode_enum_table(
    reader: &mut ByteReader<'_>,
    version: FormatVersion,
    names: &[String],
) -> Result<Vec<EnumEntry>, DecodeError> {
    let count = reader.read_u32()? as usize;
    let mut enums: Vec<EnumEntry> = Vec::with_capacity(count.min(1 << 20));
    let mut seen: HashSet<String> = HashSet::with_capacity(count.min(1 << 20));

    for _ in 0..count {
        let name = require_name(reader.read_name(names)?, "enum name")?;

        // Member count widened from u8 to u16 at LargeEnums.
        let member_count = if version.has_large_enums() {
            reader.read_u16()? as usize
        } else {
            reader.read_u8()? as usize
        };

        let mut members = Vec::with_capacity(member_count);
        for _ in 0..member_count {
            members.push(require_name(reader.read_name(names)?, "enum member")?);
        }

        // First occurrence wins; later duplicates are dropped, but their
        // bytes have already been consumed so the cursor stays in sync.
        if seen.insert(name.clone()) {
            enums.push(EnumEntry { name, members });
        }
    }

    log::trace!("decoded enum table: {} entries", enums.len());
    Ok(enums)
}

// ---------------------------------------------------------------------------
// Struct table
// ---------------------------------------------------------------------------

fn decode_struct_table(
    reader: &mut ByteReader<'_>,
    names: &[String],
) -> Result<Vec<StructEntry>, DecodeError> {
    let count = reader.read_u32()? as usize;
    let mut structs: Vec<StructEntry> = Vec::with_capacity(count.min(1 << 20));
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(count.min(1 << 20));

    for _ in 0..count {
        let entry = decode_struct_entry(reader, names)?;

        // Last occurrence wins, but the entry stays at the position the
        // name first appeared at. This is the opposite of the enum
        // policy and matches the writer exactly.
        match positions.get(&entry.name) {
            Some(&pos) => structs[pos] = entry,
            None => {
                positions.insert(entry.name.clone(), structs.len());
                structs.push(entry);
            }
        }
    }

    log::trace!("decoded struct table: {} entries", structs.len());
    Ok(structs)
}

fn decode_struct_entry(
    reader: &mut ByteReader<'_>,
    names: &[String],
) -> Result<StructEntry, DecodeError> {
    let name = require_name(reader.read_name(names)?, "struct name")?;
    // Super type is genuinely optional; absent stays absent.
    let (_, super_type) = reader.read_name(names)?;
    let super_type = super_type.map(str::to_owned);

    let property_count = reader.read_u16()?;
    let serializable_count = reader.read_u16()?;

    let mut properties = Vec::with_capacity(serializable_count as usize);
    for _ in 0..serializable_count {
        properties.push(decode_property_info(reader, names)?);
    }

    Ok(StructEntry {
        name,
        super_type,
        property_count,
        properties,
    })
}

fn decode_property_info(
    reader: &mut ByteReader<'_>,
    names: &[String],
) -> Result<PropertyInfo, DecodeError> {
    let index = reader.read_u16()?;
    let array_size = reader.read_u8()?;
    let name = require_name(reader.read_name(names)?, "property name")?;
    let property_type = decode_property_type(reader, names)?;

    Ok(PropertyInfo {
        index,
        name,
        array_size,
        property_type,
    })
}

// ---------------------------------------------------------------------------
// Property type grammar
// ---------------------------------------------------------------------------

/// Recursive-descent decode of a property type, keyed by the leading tag.
fn decode_property_type(
    reader: &mut ByteReader<'_>,
    names: &[String],
) -> Result<PropertyType, DecodeError> {
    let tag = reader.read_u8()?;
    let kind = PropertyKind::from_tag(tag).ok_or(DecodeError::InvalidPropertyTag(tag))?;

    Ok(match kind {
        PropertyKind::Enum => {
            let inner = decode_property_type(reader, names)?;
            let enum_name = require_name(reader.read_name(names)?, "enum name")?;
            PropertyType::Enum {
                inner: Box::new(inner),
                enum_name,
            }
        }
        PropertyKind::Struct => {
            let struct_type = require_name(reader.read_name(names)?, "struct type")?;
            PropertyType::Struct { struct_type }
        }
        // Array, set, and optional all describe a sequence of one inner
        // type and must flow through the same recursion.
        PropertyKind::Array | PropertyKind::Set | PropertyKind::Optional => {
            let inner = decode_property_type(reader, names)?;
            PropertyType::Sequence {
                inner: Box::new(inner),
            }
        }
        PropertyKind::Map => {
            let key = decode_property_type(reader, names)?;
            let value = decode_property_type(reader, names)?;
            PropertyType::Map {
                key: Box::new(key),
                value: Box::new(value),
            }
        }
        atomic => PropertyType::Atomic(atomic),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
