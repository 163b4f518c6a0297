//! DAT manifest interpreter
//!
//! The manifest is a line-oriented command file driving the load: each
//! `IDE`/`IPL` line pulls one definition or placement file into the
//! interpreter's accumulated tables. A root manifest and a version-specific
//! manifest are interpreted in that order, before assembly.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use rwscene_core::{Error, Result};

use crate::text::ide::{self, SceneItemDefinition};
use crate::text::ipl::{self, SceneItemPlacement};
use crate::version::GameVersion;

/// Commands recognized but deliberately not acted upon
const IGNORED_COMMANDS: [&str; 4] = ["SPLASH", "COLFILE", "MAPZONE", "MODELFILE"];

/// Line dispatcher accumulating definition and placement tables
#[derive(Debug)]
pub struct ManifestInterpreter {
    root: PathBuf,
    version: GameVersion,
    definitions: HashMap<i32, SceneItemDefinition>,
    placements: Vec<SceneItemPlacement>,
    unsupported_commands: Vec<String>,
    duplicate_definitions: usize,
}

impl ManifestInterpreter {
    /// Create an interpreter resolving manifest arguments against `root`
    pub fn new(root: impl Into<PathBuf>, version: GameVersion) -> Self {
        Self {
            root: root.into(),
            version,
            definitions: HashMap::new(),
            placements: Vec::new(),
            unsupported_commands: Vec::new(),
            duplicate_definitions: 0,
        }
    }

    /// Interpret one manifest, given relative to the install root.
    ///
    /// Unknown commands are warned about and recorded; failures inside a
    /// delegated IDE/IPL load propagate.
    pub fn interpret(&mut self, manifest: &str) -> Result<()> {
        let path = self.root.join(normalize(manifest));
        info!(manifest = %path.display(), "Reading manifest");

        let file = File::open(&path).map_err(|_| Error::FileNotFound(path.clone()))?;
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            self.dispatch(&path, idx + 1, line.trim())?;
        }
        Ok(())
    }

    fn dispatch(&mut self, manifest: &Path, line_no: usize, line: &str) -> Result<()> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match command {
            "TEXDICTION" => {
                warn!(line, "TEXDICTION: not implemented yet");
            }
            "IDE" => {
                let path = self.resolve(manifest, line_no, command, argument)?;
                let (loaded, duplicates) = ide::load_definitions(&path, self.version)?;
                self.duplicate_definitions += duplicates;
                for (id, def) in loaded {
                    if let Some(previous) = self.definitions.insert(id, def) {
                        self.duplicate_definitions += 1;
                        warn!(id, model = %previous.model_name, "Duplicate definition id, keeping later record");
                    }
                }
            }
            "IPL" => {
                let path = self.resolve(manifest, line_no, command, argument)?;
                self.placements.extend(ipl::load_placements(&path, self.version)?);
            }
            _ if IGNORED_COMMANDS.contains(&command) => {}
            _ => {
                warn!(command, line_no, "Unsupported command in manifest");
                self.unsupported_commands.push(command.to_string());
            }
        }

        Ok(())
    }

    fn resolve(
        &self,
        manifest: &Path,
        line_no: usize,
        command: &str,
        argument: &str,
    ) -> Result<PathBuf> {
        if argument.is_empty() {
            return Err(Error::ManifestParse {
                path: manifest.to_path_buf(),
                line: line_no,
                message: format!("{} command without a path argument", command),
            });
        }
        Ok(self.root.join(normalize(argument)))
    }

    /// Accumulated definitions, keyed by id
    pub fn definitions(&self) -> &HashMap<i32, SceneItemDefinition> {
        &self.definitions
    }

    /// Accumulated placements, in manifest and file order
    pub fn placements(&self) -> &[SceneItemPlacement] {
        &self.placements
    }

    /// Commands that were neither handled nor on the ignore list
    pub fn unsupported_commands(&self) -> &[String] {
        &self.unsupported_commands
    }

    /// How many definition ids were overwritten by later records
    pub fn duplicate_definitions(&self) -> usize {
        self.duplicate_definitions
    }

    /// Consume the interpreter, yielding its tables for assembly
    pub fn into_tables(self) -> (HashMap<i32, SceneItemDefinition>, Vec<SceneItemPlacement>) {
        (self.definitions, self.placements)
    }
}

/// Manifests written on the original platform use backslash separators
fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}
