//! IDE object definition parser
//!
//! An IDE file is a sequence of named sections (`objs`, `tobj`, `cars`,
//! ...), each closed by `end`. Only `objs` records become scene item
//! definitions; other sections are consumed and ignored. Records are
//! comma-separated, with a version-specific field layout.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rwscene_core::{Error, Result};

use crate::version::GameVersion;

/// Object definition: maps an object id to model/texture metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneItemDefinition {
    pub id: i32,
    pub model_name: String,
    pub texture_folder: Option<String>,
}

/// Minimum `objs` record fields: id, model, txd, then version-dependent
/// trailing columns (III/VC carry a mesh count the SA layout dropped).
fn min_fields(version: GameVersion) -> usize {
    match version {
        GameVersion::Gta3 | GameVersion::ViceCity => 6,
        GameVersion::SanAndreas => 5,
    }
}

/// Load all object definitions from one IDE file, keyed by id.
///
/// Returns the table together with the number of ids that appeared more
/// than once within the file; the later record wins each time.
pub fn load_definitions(
    path: &Path,
    version: GameVersion,
) -> Result<(HashMap<i32, SceneItemDefinition>, usize)> {
    let file = File::open(path).map_err(|_| Error::FileNotFound(path.to_path_buf()))?;
    let reader = BufReader::new(file);

    let mut definitions = HashMap::new();
    let mut duplicates = 0;
    let mut section: Option<String> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match section.as_deref() {
            None => section = Some(line.to_lowercase()),
            Some("objs") if line.eq_ignore_ascii_case("end") => section = None,
            Some("objs") => {
                let def = parse_objs_record(line, version, path, line_no)?;
                if let Some(previous) = definitions.insert(def.id, def) {
                    duplicates += 1;
                    warn!(
                        id = previous.id,
                        model = %previous.model_name,
                        line = line_no,
                        "Duplicate definition id within file, keeping later record"
                    );
                }
            }
            Some(_) if line.eq_ignore_ascii_case("end") => section = None,
            Some(_) => {} // inside a section we do not interpret
        }
    }

    debug!(path = %path.display(), definitions = definitions.len(), "Loaded IDE file");
    Ok((definitions, duplicates))
}

fn parse_objs_record(
    line: &str,
    version: GameVersion,
    path: &Path,
    line_no: usize,
) -> Result<SceneItemDefinition> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < min_fields(version) {
        return Err(Error::InvalidRecord {
            path: path.to_path_buf(),
            line: line_no,
            message: format!(
                "objs record has {} fields, {} expects at least {}",
                fields.len(),
                version,
                min_fields(version)
            ),
        });
    }

    let id = fields[0].parse::<i32>().map_err(|_| Error::InvalidRecord {
        path: path.to_path_buf(),
        line: line_no,
        message: format!("invalid object id '{}'", fields[0]),
    })?;

    let texture_folder = match fields[2] {
        "" => None,
        txd => Some(txd.to_string()),
    };

    Ok(SceneItemDefinition {
        id,
        model_name: fields[1].to_string(),
        texture_folder,
    })
}
