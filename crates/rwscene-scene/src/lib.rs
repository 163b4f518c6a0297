//! rwscene-scene
//!
//! Assembles the tables produced by the parsers into an in-memory scene:
//! placements are cross-referenced with definitions, each distinct model is
//! loaded once through the `ModelSource` boundary, and misses are counted
//! rather than fatal.

pub mod assembler;
pub mod loader;
pub mod model;
pub mod stats;

pub use assembler::{Scene, SceneAssembler, SceneObject};
pub use loader::SceneLoader;
pub use model::{Model3D, ModelSource, RawDffSource};
pub use stats::LoadStats;
