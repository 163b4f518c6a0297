//! Model loading boundary
//!
//! Geometry construction belongs to the renderer; the assembler only needs
//! a way to turn a model name plus texture folder into a shareable handle.
//! `ModelSource` is that seam.

use std::path::PathBuf;

use serde::Serialize;

use rwscene_core::{Error, Result};

use crate::stats::LoadStats;

/// A loaded 3D model handle, shared between every placement using it
#[derive(Debug, Clone, Serialize)]
pub struct Model3D {
    /// Model name as referenced by placements
    pub name: String,
    /// Texture folder resolved from the definition, if any
    pub texture_folder: Option<String>,
    /// Bytes held by vertex data
    pub vertex_buffer_bytes: usize,
    /// Bytes held by index data
    pub index_buffer_bytes: usize,
}

/// Boundary trait: resolves a model name into a loaded model.
///
/// Implementations may record texture misses and memory usage in `stats`.
pub trait ModelSource {
    fn load(
        &mut self,
        name: &str,
        texture_folder: Option<&str>,
        stats: &mut LoadStats,
    ) -> Result<Model3D>;
}

/// Loads raw model payloads from `<models_dir>/<name>.dff`.
///
/// Geometry is not interpreted here; the payload size stands in for the
/// vertex buffer footprint until a renderer-side loader takes over.
#[derive(Debug)]
pub struct RawDffSource {
    models_dir: PathBuf,
}

impl RawDffSource {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }
}

impl ModelSource for RawDffSource {
    fn load(
        &mut self,
        name: &str,
        texture_folder: Option<&str>,
        stats: &mut LoadStats,
    ) -> Result<Model3D> {
        let path = self.models_dir.join(format!("{}.dff", name));
        let data = std::fs::read(&path).map_err(|_| Error::FileNotFound(path))?;

        stats.vertex_buffer_bytes += data.len();

        Ok(Model3D {
            name: name.to_string(),
            texture_folder: texture_folder.map(str::to_string),
            vertex_buffer_bytes: data.len(),
            index_buffer_bytes: 0,
        })
    }
}
