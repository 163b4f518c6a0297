//! Integration tests for the TXD nested-container parser
//!
//! Fixtures are built section by section, so every offset the parser
//! reports can be checked against a known byte layout.

use rwscene_core::Error;
use rwscene_parsers::txd::{TxdArchive, TEXTURE_NAME_LEAD};

const DATA: i32 = 1;
const EXTENSION: i32 = 3;
const TEXTURE_NATIVE: i32 = 21;
const DICTIONARY: i32 = 22;

/// Section header length: type + length + reserved field
const HEADER: usize = 40;

/// Wrap a payload in a section header
fn section(tag: i32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER + payload.len());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&(payload.len() as i32).to_le_bytes());
    out.extend_from_slice(&[0u8; 32]);
    out.extend_from_slice(payload);
    out
}

/// Payload of a texture data section: lead field, two names, pixel data
fn texture_payload(diffuse: &str, alpha: &str, pixel_bytes: usize) -> Vec<u8> {
    let mut payload = vec![0u8; TEXTURE_NAME_LEAD];
    let mut name_field = |name: &str| {
        let mut field = [0u8; 32];
        field[..name.len()].copy_from_slice(name.as_bytes());
        payload.extend_from_slice(&field);
    };
    name_field(diffuse);
    name_field(alpha);
    payload.extend(std::iter::repeat(0xAB).take(pixel_bytes));
    payload
}

#[test]
fn three_level_tree_yields_two_aliases_per_data_section() {
    // Dictionary -> TextureNative -> Data
    let data_section = section(DATA, &texture_payload("Diffuse", "Alpha", 64));
    let native = section(TEXTURE_NATIVE, &data_section);
    let image = section(DICTIONARY, &native);

    let archive = TxdArchive::parse("Base", &image).unwrap();
    let entries = archive.entries();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "base/diffuse.gtatexture");
    assert_eq!(entries[1].name, "base/alpha.gtatexture");

    // Both aliases cover the same byte range: the data section body.
    let body_start = (3 * HEADER) as u32;
    let body_len = (TEXTURE_NAME_LEAD + 32 + 32 + 64) as u32;
    for entry in &entries {
        assert_eq!(entry.offset, body_start);
        assert_eq!(entry.size, body_len);
    }
}

#[test]
fn names_decode_at_documented_offset() {
    // The diffuse name must begin exactly TEXTURE_NAME_LEAD bytes into the
    // section body; a fixture with a poison lead field proves the constant.
    assert_eq!(TEXTURE_NAME_LEAD, 4);

    let mut payload = vec![0xFFu8; TEXTURE_NAME_LEAD]; // poison, must be skipped
    let mut diffuse = [0u8; 32];
    diffuse[..4].copy_from_slice(b"Grid");
    payload.extend_from_slice(&diffuse);
    payload.extend_from_slice(&[0u8; 32]);

    let image = section(TEXTURE_NATIVE, &section(DATA, &payload));
    let archive = TxdArchive::parse("fix", &image).unwrap();

    assert_eq!(archive.records()[0].diffuse_name, "fix/grid.gtatexture");
}

#[test]
fn unknown_sections_are_skipped_by_length() {
    let mut image = section(777, &[0u8; 10]);
    image.extend(section(
        DICTIONARY,
        &section(TEXTURE_NATIVE, &section(DATA, &texture_payload("One", "Two", 8))),
    ));

    let archive = TxdArchive::parse("mix", &image).unwrap();
    assert_eq!(archive.entries().len(), 2);
    assert_eq!(archive.records()[0].diffuse_name, "mix/one.gtatexture");
}

#[test]
fn data_outside_texture_native_is_opaque() {
    let image = section(DICTIONARY, &section(DATA, &texture_payload("Nope", "Nada", 8)));

    let archive = TxdArchive::parse("d", &image).unwrap();
    assert!(archive.entries().is_empty());
}

#[test]
fn extension_sections_are_recursed_into() {
    let inner = section(TEXTURE_NATIVE, &section(DATA, &texture_payload("Deep", "Mask", 0)));
    let image = section(EXTENSION, &inner);

    let archive = TxdArchive::parse("ext", &image).unwrap();
    assert_eq!(archive.entries().len(), 2);
}

#[test]
fn sibling_texture_natives_each_contribute() {
    let mut dictionary_payload = section(
        TEXTURE_NATIVE,
        &section(DATA, &texture_payload("First", "FirstA", 16)),
    );
    dictionary_payload.extend(section(
        TEXTURE_NATIVE,
        &section(DATA, &texture_payload("Second", "SecondA", 16)),
    ));
    let image = section(DICTIONARY, &dictionary_payload);

    let archive = TxdArchive::parse("city", &image).unwrap();
    let names: Vec<_> = archive.entries().iter().map(|e| e.name.clone()).collect();
    assert_eq!(
        names,
        [
            "city/first.gtatexture",
            "city/firsta.gtatexture",
            "city/second.gtatexture",
            "city/seconda.gtatexture",
        ]
    );
}

#[test]
fn trailing_sector_padding_is_not_corruption() {
    // A TXD pulled out of an IMG comes back whole-sector sized, with zero
    // padding after the last section.
    let mut image = section(
        DICTIONARY,
        &section(TEXTURE_NATIVE, &section(DATA, &texture_payload("Pad", "PadA", 8))),
    );
    image.resize(2048, 0);

    let archive = TxdArchive::parse("sector", &image).unwrap();
    let names: Vec<_> = archive.entries().iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, ["sector/pad.gtatexture", "sector/pada.gtatexture"]);
}

#[test]
fn overrunning_child_section_is_corruption() {
    // Child claims 1000 bytes but the parent body holds far less.
    let mut image = section(DICTIONARY, &[0u8; 48]);
    image[HEADER..HEADER + 4].copy_from_slice(&TEXTURE_NATIVE.to_le_bytes());
    image[HEADER + 4..HEADER + 8].copy_from_slice(&1000i32.to_le_bytes());

    let err = TxdArchive::parse("bad", &image).unwrap_err();
    assert!(matches!(err, Error::ArchiveCorrupted { .. }));
}

#[test]
fn short_texture_record_is_corruption() {
    let image = section(TEXTURE_NATIVE, &section(DATA, &[0u8; 16]));

    let err = TxdArchive::parse("short", &image).unwrap_err();
    assert!(matches!(err, Error::ArchiveCorrupted { .. }));
}
