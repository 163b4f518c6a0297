//! IPL object placement parser
//!
//! Placement files share the sectioned layout of IDE files; only the `inst`
//! section is interpreted. Field layout per version:
//!
//! - GTA III: `id, model, x, y, z, sx, sy, sz, rx, ry, rz, rw`
//! - Vice City: as III with an `interior` field after the model name
//! - San Andreas: `id, model, interior, x, y, z, rx, ry, rz, rw, lod`
//!   (no explicit scale; it defaults to one)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rwscene_core::{Error, Quat, Result, Vec3};

use crate::version::GameVersion;

/// One placed instance of a named model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItemPlacement {
    pub id: i32,
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// Load all placements from one IPL file, in file order
pub fn load_placements(path: &Path, version: GameVersion) -> Result<Vec<SceneItemPlacement>> {
    let file = File::open(path).map_err(|_| Error::FileNotFound(path.to_path_buf()))?;
    let reader = BufReader::new(file);

    let mut placements = Vec::new();
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
            Some("inst") if line.eq_ignore_ascii_case("end") => section = None,
            Some("inst") => placements.push(parse_inst_record(line, version, path, line_no)?),
            Some(_) if line.eq_ignore_ascii_case("end") => section = None,
            Some(_) => {}
        }
    }

    debug!(path = %path.display(), placements = placements.len(), "Loaded IPL file");
    Ok(placements)
}

fn parse_inst_record(
    line: &str,
    version: GameVersion,
    path: &Path,
    line_no: usize,
) -> Result<SceneItemPlacement> {
    let invalid = |message: String| Error::InvalidRecord {
        path: path.to_path_buf(),
        line: line_no,
        message,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let expected = match version {
        GameVersion::Gta3 => 12,
        GameVersion::ViceCity => 13,
        GameVersion::SanAndreas => 11,
    };
    if fields.len() != expected {
        return Err(invalid(format!(
            "inst record has {} fields, {} expects {}",
            fields.len(),
            version,
            expected
        )));
    }

    let id = fields[0]
        .parse::<i32>()
        .map_err(|_| invalid(format!("invalid placement id '{}'", fields[0])))?;
    let name = fields[1].to_string();

    let float = |raw: &str| {
        raw.parse::<f32>()
            .map_err(|_| invalid(format!("invalid float '{}'", raw)))
    };
    let vec3 = |raw: &[&str]| -> Result<Vec3> {
        Ok(Vec3::new(float(raw[0])?, float(raw[1])?, float(raw[2])?))
    };
    let quat = |raw: &[&str]| -> Result<Quat> {
        Ok(Quat::new(float(raw[0])?, float(raw[1])?, float(raw[2])?, float(raw[3])?))
    };

    let (position, rotation, scale) = match version {
        GameVersion::Gta3 => (vec3(&fields[2..5])?, quat(&fields[8..12])?, vec3(&fields[5..8])?),
        GameVersion::ViceCity => (vec3(&fields[3..6])?, quat(&fields[9..13])?, vec3(&fields[6..9])?),
        GameVersion::SanAndreas => (vec3(&fields[3..6])?, quat(&fields[6..10])?, Vec3::ONE),
    };

    Ok(SceneItemPlacement {
        id,
        name,
        position,
        rotation,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_ipl(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_gta3_inst_record() {
        let file = write_ipl(
            "inst\n\
             101, LODcounts01, 10.5, -20.0, 3.0, 1, 1, 1, 0, 0, 0, 1\n\
             end\n",
        );

        let placements = load_placements(file.path(), GameVersion::Gta3).unwrap();
        assert_eq!(placements.len(), 1);
        let p = &placements[0];
        assert_eq!(p.id, 101);
        assert_eq!(p.name, "LODcounts01");
        assert_eq!(p.position, Vec3::new(10.5, -20.0, 3.0));
        assert_eq!(p.rotation, Quat::IDENTITY);
        assert_eq!(p.scale, Vec3::ONE);
    }

    #[test]
    fn test_vice_city_interior_field() {
        let file = write_ipl("inst\n200, lodmall, 0, 1.0, 2.0, 3.0, 2, 2, 2, 0, 0, 0, 1\nend\n");

        let placements = load_placements(file.path(), GameVersion::ViceCity).unwrap();
        assert_eq!(placements[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(placements[0].scale, Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_san_andreas_defaults_scale() {
        let file = write_ipl("inst\n3050, lodvgs01, 0, 5.0, 6.0, 7.0, 0, 0, 0, 1, -1\nend\n");

        let placements = load_placements(file.path(), GameVersion::SanAndreas).unwrap();
        assert_eq!(placements[0].scale, Vec3::ONE);
        assert_eq!(placements[0].position, Vec3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_wrong_field_count_is_invalid() {
        let file = write_ipl("inst\n101, LODx, 1, 2, 3\nend\n");

        let err = load_placements(file.path(), GameVersion::Gta3).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_order_preserved() {
        let file = write_ipl(
            "inst\n\
             1, loda, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1\n\
             2, lodb, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1\n\
             3, lodc, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1\n\
             end\n",
        );

        let placements = load_placements(file.path(), GameVersion::Gta3).unwrap();
        let names: Vec<_> = placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["loda", "lodb", "lodc"]);
    }
}
