//! Load statistics
//!
//! One explicit collector travels through the whole load instead of a
//! process-wide store, so parsers and assembly stay testable in isolation.

use serde::Serialize;
use tracing::{info, warn};

/// Counters and memory totals accumulated across one scene load
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoadStats {
    /// Placements whose definition id had no record
    pub missed_definitions: usize,
    /// Texture lookups that found no backing resource. Fed by model
    /// sources that resolve textures; `RawDffSource` reads geometry only
    /// and never increments it.
    pub missed_textures: usize,
    /// Definition ids overwritten by later manifest entries
    pub duplicate_definitions: usize,
    /// Manifest commands that were neither handled nor ignored
    pub unsupported_commands: usize,
    /// Distinct models loaded
    pub models_loaded: usize,
    /// Scene objects placed
    pub objects_placed: usize,
    /// Bytes held by vertex buffers
    pub vertex_buffer_bytes: usize,
    /// Bytes held by index buffers
    pub index_buffer_bytes: usize,
    /// Bytes held by texture payloads
    pub texture_bytes: usize,
}

impl LoadStats {
    /// Emit the end-of-load summary: warnings for misses, confirmations
    /// otherwise, and the memory totals.
    pub fn report(&self) {
        if self.missed_definitions != 0 {
            warn!(count = self.missed_definitions, "Missed definitions");
        } else {
            info!("No definition was missed");
        }

        if self.missed_textures != 0 {
            warn!(count = self.missed_textures, "Missed textures");
        } else {
            info!("No texture was missed");
        }

        info!(
            objects = self.objects_placed,
            models = self.models_loaded,
            "Objects located on scene"
        );
        info!(
            vertex_buffers = self.vertex_buffer_bytes,
            index_buffers = self.index_buffer_bytes,
            textures = self.texture_bytes,
            "Memory used (bytes)"
        );
    }

    /// Total bytes across all tracked buffers
    pub fn total_memory(&self) -> usize {
        self.vertex_buffer_bytes + self.index_buffer_bytes + self.texture_bytes
    }
}
