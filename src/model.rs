// Decoded output model.
//
// Plain immutable data: once `parse` returns, nothing here mutates.
// All strings are owned copies resolved from the name table during
// decoding, so the model carries no indices that could dangle.

// ---------------------------------------------------------------------------
// Property kind tags
// ---------------------------------------------------------------------------

/// On-wire property type tag. Numbering matches the usmap writer.
///
/// `Array`, `Set`, `Optional`, `Map`, `Enum`, and `Struct` carry a
/// recursive payload; every other kind is atomic (the tag is the whole
/// type description).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PropertyKind {
    Byte = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    Object = 4,
    Name = 5,
    Delegate = 6,
    Double = 7,
    Array = 8,
    Struct = 9,
    Str = 10,
    Text = 11,
    Interface = 12,
    MulticastDelegate = 13,
    WeakObject = 14,
    LazyObject = 15,
    AssetObject = 16,
    SoftObject = 17,
    UInt64 = 18,
    UInt32 = 19,
    UInt16 = 20,
    Int64 = 21,
    Int16 = 22,
    Int8 = 23,
    Map = 24,
    Set = 25,
    Enum = 26,
    FieldPath = 27,
    Optional = 28,
    Utf8Str = 29,
    AnsiStr = 30,
}

impl PropertyKind {
    /// Map an on-wire tag to a kind. Tags outside 0..=30 are invalid.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Byte,
            1 => Self::Bool,
            2 => Self::Int,
            3 => Self::Float,
            4 => Self::Object,
            5 => Self::Name,
            6 => Self::Delegate,
            7 => Self::Double,
            8 => Self::Array,
            9 => Self::Struct,
            10 => Self::Str,
            11 => Self::Text,
            12 => Self::Interface,
            13 => Self::MulticastDelegate,
            14 => Self::WeakObject,
            15 => Self::LazyObject,
            16 => Self::AssetObject,
            17 => Self::SoftObject,
            18 => Self::UInt64,
            19 => Self::UInt32,
            20 => Self::UInt16,
            21 => Self::Int64,
            22 => Self::Int16,
            23 => Self::Int8,
            24 => Self::Map,
            25 => Self::Set,
            26 => Self::Enum,
            27 => Self::FieldPath,
            28 => Self::Optional,
            29 => Self::Utf8Str,
            30 => Self::AnsiStr,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Recursive property type
// ---------------------------------------------------------------------------

/// Recursively-structured property type description.
///
/// Array, set, and optional properties all describe "a sequence of T"
/// and collapse into the single [`PropertyType::Sequence`] variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    /// A bare kind with no payload.
    Atomic(PropertyKind),
    /// Enum-typed property: the underlying storage type plus the enum name.
    Enum {
        inner: Box<PropertyType>,
        enum_name: String,
    },
    /// Struct-typed property, referencing a struct by name.
    Struct { struct_type: String },
    /// Array, set, or optional of an inner type.
    Sequence { inner: Box<PropertyType> },
    /// Map from a key type to a value type.
    Map {
        key: Box<PropertyType>,
        value: Box<PropertyType>,
    },
}

// ---------------------------------------------------------------------------
// Table entries
// ---------------------------------------------------------------------------

/// A single field descriptor within a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Schema index within the owning struct.
    pub index: u16,
    pub name: String,
    pub array_size: u8,
    pub property_type: PropertyType,
}

/// An enumeration and its members, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub members: Vec<String>,
}

/// A struct (class) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructEntry {
    pub name: String,
    pub super_type: Option<String>,
    /// Declared total property count; may exceed `properties.len()`
    /// because only the serializable subset is written to the file.
    pub property_count: u16,
    pub properties: Vec<PropertyInfo>,
}

// ---------------------------------------------------------------------------
// Top-level model
// ---------------------------------------------------------------------------

/// Fully decoded usmap model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usmap {
    pub package_versioning: Option<crate::header::PackageVersioning>,
    /// Positional name table; entry order is file order.
    pub names: Vec<String>,
    /// Enum entries in first-seen order (duplicates keep the first).
    pub enums: Vec<EnumEntry>,
    /// Struct entries in first-seen order (duplicates keep the last
    /// content at the first occurrence's position).
    pub structs: Vec<StructEntry>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
