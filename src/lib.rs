//! usmap: reader for Unreal Engine `.usmap` type-mapping files.
//!
//! A usmap container carries reflection metadata (a name table, enum
//! definitions, and struct property layouts) that lets external tools
//! interpret otherwise-opaque serialized game object data. This crate
//! decodes the container into an immutable [`Usmap`] model; it does not
//! write the format and does not validate the reflected types against a
//! running engine.
//!
//! The crate provides:
//! - The single-call decoder ([`parse`])
//! - Wire-level building blocks (`reader`, `header`, `compression`, `decoder`)
//! - The decoded model types (`model`)
//! - A file helper (`io`, behind the `file-io` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! let bytes = std::fs::read("Mappings.usmap").unwrap();
//! let mappings = usmap::parse(&bytes).unwrap();
//!
//! for entry in &mappings.structs {
//!     println!("{} ({} properties)", entry.name, entry.properties.len());
//! }
//! ```

pub mod compression;
pub mod decoder;
pub mod error;
pub mod header;
pub mod model;
pub mod reader;

#[cfg(feature = "file-io")]
pub mod io;

pub use decoder::parse;
pub use error::DecodeError;
pub use model::{EnumEntry, PropertyInfo, PropertyKind, PropertyType, StructEntry, Usmap};
