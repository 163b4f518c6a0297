//! rwscene-parsers
//!
//! Parsers for the archive and definition formats of RenderWare-era
//! open-world titles.
//!
//! # Supported formats
//!
//! | Format | Extension | Description |
//! |--------|-----------|-------------|
//! | TXD    | `.txd`    | Nested-section texture dictionary archive |
//! | IMG    | `.img`    | Flat indexed resource archive (v1 `.dir` / v2 `VER2`) |
//! | DAT    | `.dat`    | Top-level load manifest |
//! | IDE    | `.ide`    | Object definition records |
//! | IPL    | `.ipl`    | Object placement records |
//!
//! # Example
//!
//! ```rust,ignore
//! use rwscene_parsers::{img::ImgArchive, version::GameVersion};
//!
//! let archive = ImgArchive::open("models/gta3.img".as_ref(), GameVersion::Gta3)?;
//! println!("{} entries", archive.entries().len());
//! ```

pub mod entry;
pub mod img;
pub mod text;
pub mod txd;
pub mod unpack;
pub mod version;

pub use entry::ArchiveEntry;
pub use img::ImgArchive;
pub use text::dat::ManifestInterpreter;
pub use text::ide::SceneItemDefinition;
pub use text::ipl::SceneItemPlacement;
pub use txd::{TextureRecord, TxdArchive};
pub use unpack::{ItemOutcome, UnpackReport};
pub use version::GameVersion;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
