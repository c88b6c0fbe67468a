// End-to-end tests for usmap container decoding.
//
// These tests verify:
//   - Complete header + body scenarios, including the versioning block
//   - Compressed bodies (Brotli / Zstandard, feature-gated)
//   - The dedup asymmetry between enum and struct tables
//   - Decoder robustness against malformed input
//   - Determinism and name-table fidelity over generated inputs

use proptest::prelude::*;
use usmap::header::USMAP_MAGIC;
use usmap::{DecodeError, PropertyKind, PropertyType, parse};

// ===========================================================================
// Helpers
// ===========================================================================

/// Little-endian byte builder for crafting containers.
#[derive(Default)]
struct Builder(Vec<u8>);

impl Builder {
    fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }
    fn u16(mut self, v: u16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn u32(mut self, v: u32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn i32(mut self, v: i32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn bytes(mut self, v: &[u8]) -> Self {
        self.0.extend_from_slice(v);
        self
    }
    fn build(self) -> Vec<u8> {
        self.0
    }
}

/// A version-0 body: u8 name lengths, u8 enum member counts.
fn v0_body(names: &[&[u8]], enums: &[(i32, &[i32])], structs: &[(i32, i32, &[u8])]) -> Vec<u8> {
    let mut b = Builder::default().u32(names.len() as u32);
    for name in names {
        b = b.u8(name.len() as u8).bytes(name);
    }
    b = b.u32(enums.len() as u32);
    for (name_idx, members) in enums {
        b = b.i32(*name_idx).u8(members.len() as u8);
        for m in *members {
            b = b.i32(*m);
        }
    }
    b = b.u32(structs.len() as u32);
    for (name_idx, super_idx, extra) in structs {
        b = b.i32(*name_idx).i32(*super_idx).bytes(extra);
    }
    b.build()
}

/// Wrap a body in an uncompressed container at the given format version.
fn container(version: u8, body: &[u8]) -> Vec<u8> {
    let mut b = Builder::default().u16(USMAP_MAGIC).u8(version);
    if version >= 1 {
        b = b.i32(0); // no versioning block
    }
    b.u8(0) // None compression
        .u32(body.len() as u32)
        .u32(body.len() as u32)
        .bytes(body)
        .build()
}

fn empty_body() -> Vec<u8> {
    Builder::default().u32(0).u32(0).u32(0).build()
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn empty_model_all_versions() {
    for version in 0..=3u8 {
        let model = parse(&container(version, &empty_body())).unwrap();
        assert!(model.names.is_empty(), "version {version}");
        assert!(model.enums.is_empty());
        assert!(model.structs.is_empty());
        assert!(model.package_versioning.is_none());
    }
}

#[test]
fn full_container_with_versioning_block() {
    let body = v0_body(&[b"Actor"], &[], &[(0, -1, &[0, 0, 0, 0])]);

    // LongFName changes name widths, so rebuild the name entry as u16.
    let mut long_body = Builder::default().u32(1).u16(5).bytes(b"Actor").build();
    long_body.extend_from_slice(&body[4 + 1 + 5..]); // reuse enum/struct sections

    let guid = [0x11u8; 16];
    let data = Builder::default()
        .u16(USMAP_MAGIC)
        .u8(2) // LongFName
        .i32(1) // versioning present
        .i32(522)
        .i32(1008)
        .i32(2) // two custom versions
        .bytes(&guid)
        .i32(3)
        .bytes(&[0x22u8; 16])
        .i32(-4)
        .u32(987654)
        .u8(0)
        .u32(long_body.len() as u32)
        .u32(long_body.len() as u32)
        .bytes(&long_body)
        .build();

    let model = parse(&data).unwrap();
    let pv = model.package_versioning.expect("versioning block");
    assert_eq!(pv.file_version.ue4, 522);
    assert_eq!(pv.file_version.ue5, 1008);
    assert_eq!(pv.custom_versions.len(), 2);
    assert_eq!(pv.custom_versions[0].key.0, guid);
    assert_eq!(pv.custom_versions[1].version, -4);
    assert_eq!(pv.net_cl, 987654);
    assert_eq!(model.structs.len(), 1);
    assert_eq!(model.structs[0].name, "Actor");
}

#[test]
fn dedup_policies_are_asymmetric() {
    // Same duplicate pattern for an enum and a struct: the enum keeps
    // its first definition, the struct keeps its last.
    let body = v0_body(
        &[b"EKind", b"A", b"B", b"Widget", b"Base"],
        &[(0, &[1]), (0, &[2])],
        &[(3, -1, &[0, 0, 0, 0]), (3, 4, &[9, 0, 0, 0])],
    );
    let model = parse(&container(0, &body)).unwrap();

    assert_eq!(model.enums.len(), 1);
    assert_eq!(model.enums[0].members, vec!["A"]); // first wins

    assert_eq!(model.structs.len(), 1);
    assert_eq!(model.structs[0].super_type.as_deref(), Some("Base")); // last wins
    assert_eq!(model.structs[0].property_count, 9);
}

#[test]
fn deeply_nested_property_type() {
    // Map< Name, Map< Int, Optional< Struct > > >
    let prop = Builder::default()
        .u16(0) // schema index
        .u8(1) // array size
        .i32(1) // property name
        .u8(PropertyKind::Map as u8)
        .u8(PropertyKind::Name as u8)
        .u8(PropertyKind::Map as u8)
        .u8(PropertyKind::Int as u8)
        .u8(PropertyKind::Optional as u8)
        .u8(PropertyKind::Struct as u8)
        .i32(2) // struct type name
        .build();
    let struct_tail = Builder::default().u16(1).u16(1).bytes(&prop).build();
    let body = v0_body(
        &[b"Outer", b"Lookup", b"Inner"],
        &[],
        &[(0, -1, &struct_tail)],
    );

    let model = parse(&container(0, &body)).unwrap();
    let expected = PropertyType::Map {
        key: Box::new(PropertyType::Atomic(PropertyKind::Name)),
        value: Box::new(PropertyType::Map {
            key: Box::new(PropertyType::Atomic(PropertyKind::Int)),
            value: Box::new(PropertyType::Sequence {
                inner: Box::new(PropertyType::Struct {
                    struct_type: "Inner".to_string(),
                }),
            }),
        }),
    };
    assert_eq!(model.structs[0].properties[0].property_type, expected);
}

#[test]
fn declared_count_can_exceed_serialized_count() {
    // propertyCount 12, serializable 1.
    let prop = Builder::default()
        .u16(4)
        .u8(1)
        .i32(1)
        .u8(PropertyKind::Bool as u8)
        .build();
    let tail = Builder::default().u16(12).u16(1).bytes(&prop).build();
    let body = v0_body(&[b"Actor", b"bHidden"], &[], &[(0, -1, &tail)]);

    let model = parse(&container(0, &body)).unwrap();
    let entry = &model.structs[0];
    assert_eq!(entry.property_count, 12);
    assert_eq!(entry.properties.len(), 1);
    assert_eq!(entry.properties[0].index, 4);
    assert_eq!(entry.properties[0].name, "bHidden");
}

// ===========================================================================
// Malformed input
// ===========================================================================

#[test]
fn bad_magic_rejected() {
    let mut data = container(0, &empty_body());
    data[0] ^= 0xFF;
    assert!(matches!(
        parse(&data).unwrap_err(),
        DecodeError::InvalidMagic { .. }
    ));
}

#[test]
fn future_version_rejected() {
    let mut data = container(0, &empty_body());
    data[2] = 9;
    assert!(matches!(
        parse(&data).unwrap_err(),
        DecodeError::UnsupportedVersion(9)
    ));
}

#[test]
fn unknown_compression_tag_rejected_without_body_decode() {
    // Method byte 99 with a body that would also be invalid: the
    // compression tag must fail first, proving the body is untouched.
    let data = Builder::default()
        .u16(USMAP_MAGIC)
        .u8(0)
        .u8(99)
        .u32(4)
        .u32(4)
        .bytes(&[0xFF; 4])
        .build();
    assert!(matches!(
        parse(&data).unwrap_err(),
        DecodeError::UnsupportedCompression(99)
    ));
}

#[test]
fn oodle_rejected() {
    let data = Builder::default()
        .u16(USMAP_MAGIC)
        .u8(0)
        .u8(1) // Oodle
        .u32(4)
        .u32(100)
        .bytes(&[0u8; 4])
        .build();
    assert!(matches!(
        parse(&data).unwrap_err(),
        DecodeError::UnsupportedCompression(1)
    ));
}

#[test]
fn size_mismatch_fails_before_body_decode() {
    let data = Builder::default()
        .u16(USMAP_MAGIC)
        .u8(0)
        .u8(0) // None
        .u32(4)
        .u32(5) // declared sizes disagree
        .bytes(&[0xFF; 4]) // not a decodable body either
        .build();
    assert!(matches!(
        parse(&data).unwrap_err(),
        DecodeError::SizeMismatch {
            compressed: 4,
            decompressed: 5
        }
    ));
}

#[test]
fn empty_input_is_out_of_bounds() {
    assert!(matches!(
        parse(&[]).unwrap_err(),
        DecodeError::OutOfBounds { .. }
    ));
}

// ===========================================================================
// Compressed bodies
// ===========================================================================

#[cfg(feature = "brotli")]
#[test]
fn brotli_compressed_container() {
    let body = v0_body(&[b"Actor", b"Pawn"], &[], &[(0, 1, &[0, 0, 0, 0])]);

    let mut compressed = Vec::new();
    let params = brotli::enc::BrotliEncoderParams::default();
    brotli::BrotliCompress(&mut &body[..], &mut compressed, &params).unwrap();

    let data = Builder::default()
        .u16(USMAP_MAGIC)
        .u8(0)
        .u8(2) // Brotli
        .u32(compressed.len() as u32)
        .u32(body.len() as u32)
        .bytes(&compressed)
        .build();

    let model = parse(&data).unwrap();
    assert_eq!(model.names, vec!["Actor", "Pawn"]);
    assert_eq!(model.structs[0].super_type.as_deref(), Some("Pawn"));
}

#[cfg(feature = "zstd")]
#[test]
fn zstd_compressed_container() {
    let body = v0_body(&[b"Actor", b"Pawn"], &[], &[(0, 1, &[0, 0, 0, 0])]);
    let compressed = zstd::stream::encode_all(&body[..], 3).unwrap();

    let data = Builder::default()
        .u16(USMAP_MAGIC)
        .u8(0)
        .u8(3) // Zstandard
        .u32(compressed.len() as u32)
        .u32(body.len() as u32)
        .bytes(&compressed)
        .build();

    let model = parse(&data).unwrap();
    assert_eq!(model.names, vec!["Actor", "Pawn"]);
    assert_eq!(model.structs.len(), 1);
}

// ===========================================================================
// Properties over generated inputs
// ===========================================================================

proptest! {
    /// Any byte string of length <= 255 survives the name table intact,
    /// with positional indices preserved.
    #[test]
    fn name_table_roundtrip(raw_names in prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..=255), 0..32,
    )) {
        let mut b = Builder::default().u32(raw_names.len() as u32);
        for name in &raw_names {
            b = b.u8(name.len() as u8).bytes(name);
        }
        let body = b.u32(0).u32(0).build();

        let model = parse(&container(0, &body)).unwrap();
        prop_assert_eq!(model.names.len(), raw_names.len());
        for (decoded, raw) in model.names.iter().zip(&raw_names) {
            let expected: String = raw.iter().map(|&byte| char::from(byte)).collect();
            prop_assert_eq!(decoded, &expected);
        }
    }

    /// Identical bytes always decode to a structurally identical model.
    #[test]
    fn parse_is_deterministic(raw_names in prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..16), 0..8,
    )) {
        // Version 3 uses u16 name lengths.
        let mut b = Builder::default().u32(raw_names.len() as u32);
        for name in &raw_names {
            b = b.u16(name.len() as u16).bytes(name);
        }
        let body = b.u32(0).u32(0).build();
        let data = container(3, &body);

        let first = parse(&data).unwrap();
        let second = parse(&data).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Arbitrary garbage never panics; it either parses or returns an error.
    #[test]
    fn arbitrary_input_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = parse(&data);
    }
}
