//! TXD texture dictionary parser
//!
//! A TXD file is a tree of typed, length-prefixed sections:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ i32 section type | i32 length | [u8; 32]     │  section header
//! ├──────────────────────────────────────────────┤
//! │ payload: child sections or raw data          │  `length` bytes
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Only Data sections nested directly under a TextureNative parent carry
//! texture records; everything else is either recursed into (Extension,
//! Dictionary, TextureNative) or skipped by its declared length. The walk
//! passes explicit byte ranges down the recursion, so a sibling's skip
//! offset never depends on stream position left behind by a child.

use std::ops::Range;
use std::path::Path;

use tracing::debug;

use rwscene_core::{Error, Result};

use crate::entry::ArchiveEntry;

/// Size of a section header: type + length + reserved/version field
const SECTION_HEADER_LEN: usize = 4 + 4 + 32;

/// Bytes between the start of a texture data section and the diffuse name
/// field. Locked by `names_decode_at_documented_offset` in the test suite;
/// every fixture in this format family places the name pair 4 bytes in.
pub const TEXTURE_NAME_LEAD: usize = 4;

/// Length of each fixed, NUL-padded texture name field
const NAME_FIELD_LEN: usize = 32;

/// Extension given to extracted texture resources
pub const TEXTURE_EXTENSION: &str = "gtatexture";

/// Section type tags; anything else is opaque and skipped by length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionType {
    Data,
    Extension,
    TextureNative,
    Dictionary,
    Unknown(i32),
}

impl From<i32> for SectionType {
    fn from(value: i32) -> Self {
        match value {
            1 => SectionType::Data,
            3 => SectionType::Extension,
            21 => SectionType::TextureNative,
            22 => SectionType::Dictionary,
            other => SectionType::Unknown(other),
        }
    }
}

/// One texture data block and its two name aliases.
///
/// The diffuse and alpha names both resolve to the same byte range; the
/// record stores the range once and materializes the pair on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRecord {
    /// Full diffuse resource name, `<container>/<name>.gtatexture`
    pub diffuse_name: String,
    /// Full alpha/mask resource name over the same payload
    pub alpha_name: String,
    /// Byte offset of the data section body in the backing file
    pub offset: u32,
    /// Declared section length in bytes
    pub size: u32,
}

impl TextureRecord {
    /// Materialize the two aliased archive entries for this record
    pub fn aliases(&self) -> [ArchiveEntry; 2] {
        [
            ArchiveEntry::new(self.diffuse_name.clone(), self.offset, self.size),
            ArchiveEntry::new(self.alpha_name.clone(), self.offset, self.size),
        ]
    }
}

/// Parsed TXD archive: texture records located inside one backing file
#[derive(Debug)]
pub struct TxdArchive {
    base_name: String,
    records: Vec<TextureRecord>,
}

impl TxdArchive {
    /// Read and parse a TXD file from disk.
    ///
    /// The container base name (file stem, lowercased) prefixes every
    /// resource name found inside.
    pub fn open(path: &Path) -> Result<Self> {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))?;
        let data = std::fs::read(path)?;
        Self::parse(&base_name, &data)
    }

    /// Parse a TXD image already in memory
    pub fn parse(base_name: &str, data: &[u8]) -> Result<Self> {
        let mut records = Vec::new();
        walk(data, 0..data.len(), SectionType::Unknown(0), base_name, &mut records)?;
        debug!(base_name, records = records.len(), "Parsed TXD archive");
        Ok(Self {
            base_name: base_name.to_string(),
            records,
        })
    }

    /// Container base name
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Texture records in file order
    pub fn records(&self) -> &[TextureRecord] {
        &self.records
    }

    /// All archive entries, two aliases per record
    pub fn entries(&self) -> Vec<ArchiveEntry> {
        self.records.iter().flat_map(|r| r.aliases()).collect()
    }
}

/// Walk the sections inside `range`, collecting texture records.
///
/// `range` is the bound of the current parent section; children whose
/// declared length overruns it are treated as corruption.
fn walk(
    data: &[u8],
    range: Range<usize>,
    parent: SectionType,
    base_name: &str,
    out: &mut Vec<TextureRecord>,
) -> Result<()> {
    let mut cursor = range.start;

    while cursor < range.end {
        // Containers lifted out of sector-aligned archives carry zero
        // padding after the last section; stop there.
        if data[cursor..range.end].iter().all(|b| *b == 0) {
            break;
        }

        if cursor + SECTION_HEADER_LEN > range.end {
            return Err(Error::corrupted(
                cursor as u64,
                format!("truncated section header ({} bytes left)", range.end - cursor),
            ));
        }

        let tag = read_i32(data, cursor);
        let length = read_i32(data, cursor + 4);
        if length < 0 {
            return Err(Error::corrupted(cursor as u64, format!("negative section length {}", length)));
        }

        let body_start = cursor + SECTION_HEADER_LEN;
        let body_end = body_start
            .checked_add(length as usize)
            .filter(|end| *end <= range.end)
            .ok_or_else(|| {
                Error::corrupted(
                    cursor as u64,
                    format!("section length {} overruns parent bound {}", length, range.end),
                )
            })?;

        let section = SectionType::from(tag);
        match section {
            SectionType::Data if parent == SectionType::TextureNative => {
                out.push(decode_texture_record(data, body_start..body_end, base_name)?);
            }
            SectionType::Extension | SectionType::Dictionary | SectionType::TextureNative => {
                walk(data, body_start..body_end, section, base_name, out)?;
            }
            // Data outside TextureNative and unknown tags: skip by length
            _ => {}
        }

        cursor = body_end;
    }

    Ok(())
}

/// Decode a texture record inside a Data section under TextureNative.
///
/// Layout: `[u8; TEXTURE_NAME_LEAD] | [u8; 32] diffuse | [u8; 32] alpha |
/// rest ignored`. The recorded entry spans the whole section body, so both
/// names alias one payload.
fn decode_texture_record(data: &[u8], body: Range<usize>, base_name: &str) -> Result<TextureRecord> {
    let needed = TEXTURE_NAME_LEAD + 2 * NAME_FIELD_LEN;
    if body.len() < needed {
        return Err(Error::corrupted(
            body.start as u64,
            format!("texture record needs {} bytes, section has {}", needed, body.len()),
        ));
    }

    let names_at = body.start + TEXTURE_NAME_LEAD;
    let diffuse = &data[names_at..names_at + NAME_FIELD_LEN];
    let alpha = &data[names_at + NAME_FIELD_LEN..names_at + 2 * NAME_FIELD_LEN];

    Ok(TextureRecord {
        diffuse_name: resource_name(base_name, diffuse),
        alpha_name: resource_name(base_name, alpha),
        offset: body.start as u32,
        size: body.len() as u32,
    })
}

/// Build `lowercase(<base>/<trimmed name>.gtatexture)` from a raw name field
fn resource_name(base_name: &str, raw: &[u8]) -> String {
    let nul = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    let trimmed = String::from_utf8_lossy(&raw[..nul]);
    format!("{}/{}.{}", base_name, trimmed.trim(), TEXTURE_EXTENSION).to_lowercase()
}

fn read_i32(data: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
