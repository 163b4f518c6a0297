//! End-to-end scene loading
//!
//! Orchestrates one full load: detect the game version, interpret the root
//! and version manifests, then assemble placements into a scene. The
//! statistics collected so far are reported even when the load fails, so a
//! partial run still tells what happened.

use std::path::PathBuf;

use tracing::{error, info};

use rwscene_core::Result;
use rwscene_parsers::{GameVersion, ManifestInterpreter};

use crate::assembler::{Scene, SceneAssembler};
use crate::model::ModelSource;
use crate::stats::LoadStats;

/// Drives a complete load from an install root
#[derive(Debug)]
pub struct SceneLoader {
    root: PathBuf,
}

impl SceneLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load the scene, returning it together with the load statistics.
    ///
    /// On failure the statistics accumulated up to that point are logged
    /// before the error propagates.
    pub fn load(&self, source: &mut dyn ModelSource) -> Result<(Scene, LoadStats)> {
        let mut stats = LoadStats::default();
        match self.run(source, &mut stats) {
            Ok(scene) => {
                stats.report();
                Ok((scene, stats))
            }
            Err(err) => {
                error!(%err, "Scene load failed");
                stats.report();
                Err(err)
            }
        }
    }

    fn run(&self, source: &mut dyn ModelSource, stats: &mut LoadStats) -> Result<Scene> {
        let version = GameVersion::detect(&self.root)?;
        info!(%version, root = %self.root.display(), "Loading scene");

        let mut interpreter = ManifestInterpreter::new(&self.root, version);
        interpreter.interpret(GameVersion::root_manifest_path())?;
        interpreter.interpret(version.manifest_path())?;

        stats.duplicate_definitions = interpreter.duplicate_definitions();
        stats.unsupported_commands = interpreter.unsupported_commands().len();

        let (definitions, placements) = interpreter.into_tables();
        SceneAssembler::new(&definitions, &placements).assemble(source, stats)
    }
}
