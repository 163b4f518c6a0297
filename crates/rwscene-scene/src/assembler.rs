//! Scene assembly
//!
//! Merges the accumulated placement list with the definition table. Only
//! level-of-detail placements are materialized; each distinct model name
//! loads once and the handle is shared by every placement using it. A
//! placement whose definition id is unknown still yields an object, with
//! no texture folder and a counted miss.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use rwscene_core::{Mat4x4, Result};
use rwscene_parsers::{SceneItemDefinition, SceneItemPlacement};

use crate::model::{Model3D, ModelSource};
use crate::stats::LoadStats;

/// One placed object: a shared model and its world transform
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub model: Arc<Model3D>,
    pub world: Mat4x4,
}

/// The assembled scene, owned by the caller once returned
#[derive(Debug, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Merges placements with definitions and loads models through a source
pub struct SceneAssembler<'a> {
    definitions: &'a HashMap<i32, SceneItemDefinition>,
    placements: &'a [SceneItemPlacement],
}

impl<'a> SceneAssembler<'a> {
    pub fn new(
        definitions: &'a HashMap<i32, SceneItemDefinition>,
        placements: &'a [SceneItemPlacement],
    ) -> Self {
        Self {
            definitions,
            placements,
        }
    }

    /// Run the placement pass, producing the scene.
    ///
    /// Model-load failures propagate; cross-reference misses only count.
    pub fn assemble(&self, source: &mut dyn ModelSource, stats: &mut LoadStats) -> Result<Scene> {
        let mut cache: HashMap<&str, Arc<Model3D>> = HashMap::new();
        let mut scene = Scene::default();

        for placement in self.placements {
            if !is_lod_name(&placement.name) {
                continue;
            }

            let model = match cache.get(placement.name.as_str()) {
                Some(model) => Arc::clone(model),
                None => {
                    let texture_folder = match self.definitions.get(&placement.id) {
                        Some(def) => def.texture_folder.as_deref(),
                        None => {
                            stats.missed_definitions += 1;
                            None
                        }
                    };

                    debug!(name = %placement.name, id = placement.id, "Loading model");
                    let model = Arc::new(source.load(&placement.name, texture_folder, stats)?);
                    stats.models_loaded += 1;
                    cache.insert(&placement.name, Arc::clone(&model));
                    model
                }
            };

            let world = Mat4x4::from_scale(placement.scale)
                .mul(&Mat4x4::from_quat(placement.rotation))
                .mul(&Mat4x4::from_translation(placement.position));

            scene.objects.push(SceneObject { model, world });
            stats.objects_placed += 1;
        }

        Ok(scene)
    }
}

/// Placements outside the level-of-detail naming convention are skipped.
/// `get` keeps names starting with a multi-byte character from panicking.
fn is_lod_name(name: &str) -> bool {
    name.get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("lod"))
}
