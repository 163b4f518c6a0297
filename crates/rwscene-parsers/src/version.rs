//! Game version detection
//!
//! The supported titles are told apart by the executable each install ships.
//! Markers are probed in a fixed order and the first match wins, so an
//! install carrying several markers resolves deterministically.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use rwscene_core::{Error, Result};

/// The closed set of supported game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameVersion {
    Gta3,
    ViceCity,
    SanAndreas,
}

/// Marker files probed in precedence order
const VERSION_MARKERS: [(GameVersion, &str); 3] = [
    (GameVersion::Gta3, "gta3.exe"),
    (GameVersion::ViceCity, "gta-vc.exe"),
    (GameVersion::SanAndreas, "gta_sa.exe"),
];

impl GameVersion {
    /// Detect the installed game version by probing marker files in `root`.
    ///
    /// Returns `Error::UnsupportedVersion` when no marker is present.
    pub fn detect(root: &Path) -> Result<Self> {
        for (version, marker) in VERSION_MARKERS {
            if root.join(marker).is_file() {
                info!(?version, marker, "Detected game version");
                return Ok(version);
            }
        }
        Err(Error::UnsupportedVersion {
            root: root.to_path_buf(),
        })
    }

    /// Path of the version-specific manifest, relative to the install root
    pub fn manifest_path(&self) -> &'static str {
        match self {
            GameVersion::Gta3 => "data/gta3.dat",
            GameVersion::ViceCity => "data/gta_vc.dat",
            GameVersion::SanAndreas => "data/gta_sa.dat",
        }
    }

    /// Path of the root manifest every version loads first
    pub fn root_manifest_path() -> &'static str {
        "data/default.dat"
    }
}

impl std::fmt::Display for GameVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameVersion::Gta3 => "GTA III",
            GameVersion::ViceCity => "Vice City",
            GameVersion::SanAndreas => "San Andreas",
        };
        write!(f, "{}", name)
    }
}
