//! Content import data model
//!
//! Aggregates produced by the content tools and consumed by the engine.

pub mod geometry;

pub use geometry::{
    Mesh, LodGroup, Scene,
    GeometryImportSettings, ImportFlags, SceneData,
};
