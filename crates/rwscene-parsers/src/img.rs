//! IMG flat archive parser
//!
//! The IMG format is a flat, indexed container of packed resources. The
//! directory layout is a fixed table keyed by game version:
//!
//! - v1 (GTA III / Vice City): the directory lives in a companion `.dir`
//!   file of 32-byte records `u32 offset | u32 size | [u8; 24] name`, both
//!   counts in 2048-byte sectors;
//! - v2 (San Andreas): the directory sits at the head of the `.img` itself
//!   behind a `VER2` magic and an entry count, records being
//!   `u32 offset | u16 streaming size | u16 archive size | [u8; 24] name`.
//!
//! Entries surface with byte offsets/sizes and are bounds-checked against
//! the backing file when the archive is opened.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use rwscene_core::{Error, Result};

use crate::entry::ArchiveEntry;
use crate::version::GameVersion;

/// Directory offsets and sizes count in sectors of this many bytes
const SECTOR_SIZE: u32 = 2048;

/// Fixed length of one directory record in either layout
const DIR_RECORD_LEN: u64 = 32;

/// Length of the NUL-padded name field
const NAME_FIELD_LEN: usize = 24;

/// Magic of the v2 embedded directory
const V2_MAGIC: &[u8; 4] = b"VER2";

/// An opened flat archive: directory of entries over one backing file
#[derive(Debug)]
pub struct ImgArchive {
    path: PathBuf,
    version: GameVersion,
    entries: Vec<ArchiveEntry>,
    name_index: HashMap<String, usize>,
}

impl ImgArchive {
    /// Open an archive and read its directory.
    ///
    /// For v1 archives the companion `.dir` file next to `path` is read;
    /// for v2 the directory is parsed from the head of the `.img`. Every
    /// entry is validated to lie within the backing file.
    pub fn open(path: &Path, version: GameVersion) -> Result<Self> {
        let img_len = std::fs::metadata(path)
            .map_err(|_| Error::FileNotFound(path.to_path_buf()))?
            .len();

        let entries = match version {
            GameVersion::Gta3 | GameVersion::ViceCity => {
                let dir_path = path.with_extension("dir");
                let dir_file = File::open(&dir_path)
                    .map_err(|_| Error::FileNotFound(dir_path.clone()))?;
                parse_v1_directory(BufReader::new(dir_file))?
            }
            GameVersion::SanAndreas => {
                let img_file = File::open(path)?;
                parse_v2_directory(BufReader::new(img_file))?
            }
        };

        for entry in &entries {
            if entry.end() > img_len {
                return Err(Error::EntryOutOfBounds {
                    name: entry.name.clone(),
                    offset: u64::from(entry.offset),
                    size: u64::from(entry.size),
                    file_len: img_len,
                });
            }
        }

        let mut name_index = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            name_index.insert(entry.name.to_lowercase(), idx);
        }

        debug!(path = %path.display(), entries = entries.len(), "Opened IMG archive");

        Ok(Self {
            path: path.to_path_buf(),
            version,
            entries,
            name_index,
        })
    }

    /// Directory entries in archive order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Game version this directory was decoded with
    pub fn version(&self) -> GameVersion {
        self.version
    }

    /// Look up an entry by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.name_index
            .get(&name.to_lowercase())
            .map(|idx| &self.entries[*idx])
    }

    /// Read exactly `entry.size` bytes starting at `entry.offset`
    pub fn read_entry(&self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(u64::from(entry.offset)))?;
        let mut data = vec![0u8; entry.size as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }

    /// Read an entry by name
    pub fn read_by_name(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .get(name)
            .ok_or_else(|| Error::EntryNotFound { name: name.to_string() })?
            .clone();
        self.read_entry(&entry)
    }
}

/// Parse a v1 companion `.dir` directory
fn parse_v1_directory<R: Read>(mut reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();
    let mut record = [0u8; DIR_RECORD_LEN as usize];

    loop {
        match reader.read_exact(&mut record) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }

        let mut cursor = &record[..];
        let offset_sectors = cursor.read_u32::<LittleEndian>()?;
        let size_sectors = cursor.read_u32::<LittleEndian>()?;
        let name = read_name_field(&record[8..8 + NAME_FIELD_LEN]);

        entries.push(ArchiveEntry::new(
            name,
            sectors_to_bytes(offset_sectors, entries.len())?,
            sectors_to_bytes(size_sectors, entries.len())?,
        ));
    }

    Ok(entries)
}

/// Parse a v2 directory embedded at the head of the `.img`
fn parse_v2_directory<R: Read>(mut reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != V2_MAGIC {
        return Err(Error::InvalidMagic {
            expected: V2_MAGIC.to_vec(),
            found: magic.to_vec(),
        });
    }

    let count = reader.read_u32::<LittleEndian>()? as usize;
    let mut entries = Vec::with_capacity(count);
    let mut record = [0u8; DIR_RECORD_LEN as usize];

    for _ in 0..count {
        reader.read_exact(&mut record)?;

        let mut cursor = &record[..];
        let offset_sectors = cursor.read_u32::<LittleEndian>()?;
        let streaming_sectors = cursor.read_u16::<LittleEndian>()?;
        let _archive_size = cursor.read_u16::<LittleEndian>()?;
        let name = read_name_field(&record[8..8 + NAME_FIELD_LEN]);

        entries.push(ArchiveEntry::new(
            name,
            sectors_to_bytes(offset_sectors, entries.len())?,
            sectors_to_bytes(u32::from(streaming_sectors), entries.len())?,
        ));
    }

    Ok(entries)
}

/// Decode a NUL-padded directory name field
fn read_name_field(raw: &[u8]) -> String {
    let nul = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..nul]).trim().to_string()
}

fn sectors_to_bytes(sectors: u32, record_index: usize) -> Result<u32> {
    sectors.checked_mul(SECTOR_SIZE).ok_or_else(|| {
        Error::corrupted(
            record_index as u64 * DIR_RECORD_LEN,
            format!("sector count {} overflows byte addressing", sectors),
        )
    })
}
