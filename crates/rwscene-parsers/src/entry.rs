//! Archive entry structure shared by the IMG and TXD parsers

use serde::{Deserialize, Serialize};

/// A resource locator inside a backing archive file.
///
/// Describes a byte range only; the entry never owns the data it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Resource name, possibly with a `dir/`-style prefix
    pub name: String,
    /// Byte offset of the payload in the backing file
    pub offset: u32,
    /// Payload size in bytes
    pub size: u32,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, offset: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// One past the last byte of the payload
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    /// Directory component of the entry name, if any
    pub fn parent_dir(&self) -> Option<&str> {
        self.name.rfind('/').map(|idx| &self.name[..idx])
    }

    /// Name component after the last `/`
    pub fn filename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Extension after the last `.` of the filename
    pub fn extension(&self) -> Option<&str> {
        let filename = self.filename();
        filename.rfind('.').map(|idx| &filename[idx + 1..])
    }
}
