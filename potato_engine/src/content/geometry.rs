//! Geometry import data model.
//!
//! Plain aggregates filled by the content tools while importing a scene.
//!
//! # Hierarchy
//!
//! ```text
//! Scene "level_01"
//! └── lod_groups
//!     ├── LodGroup "rock"
//!     │   └── meshes[0..n] → Mesh (lod 0 = most detailed)
//!     └── LodGroup "tree"
//!         └── ...
//! ```

use bitflags::bitflags;
use glam::{Vec2, Vec3, Vec4};

use crate::engine_bail;
use crate::error::Result;
use crate::utils::math::clamp;
use crate::utils::vector::{GrowableArray, NoDestruct};

// ============================================================================
// MESH
// ============================================================================

/// Raw mesh data as read from the source asset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: GrowableArray<Vec3>,
    pub normals: GrowableArray<Vec3>,
    pub tangents: GrowableArray<Vec4>,
    /// One texture coordinate layer per UV set
    pub uv_sets: GrowableArray<GrowableArray<Vec2>>,
    /// Triangle list indices into `positions`
    pub raw_indices: GrowableArray<u32>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices (positions)
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles, from the index list if present, else from positions
    pub fn triangle_count(&self) -> usize {
        if self.raw_indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.raw_indices.len() / 3
        }
    }

    /// Positions as tightly packed bytes (3 x f32 per vertex)
    pub fn positions_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.positions.as_slice())
    }

    /// Check that the attribute arrays describe a consistent triangle list.
    ///
    /// Optional attributes (normals, tangents, UV sets) may be empty, but if
    /// present they must have one entry per position.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.positions.len();

        if vertex_count == 0 {
            engine_bail!("potato::Mesh", "Mesh has no positions");
        }

        if self.raw_indices.len() % 3 != 0 {
            engine_bail!("potato::Mesh", "Index count {} is not a multiple of 3",
                self.raw_indices.len());
        }

        if let Some(index) = self.raw_indices.iter().find(|&&index| index as usize >= vertex_count) {
            engine_bail!("potato::Mesh", "Index {} out of range for {} vertices",
                index, vertex_count);
        }

        check_attribute("normals", self.normals.len(), vertex_count)?;
        check_attribute("tangents", self.tangents.len(), vertex_count)?;
        for (set, uvs) in self.uv_sets.iter().enumerate() {
            check_attribute(&format!("uv set {}", set), uvs.len(), vertex_count)?;
        }

        Ok(())
    }
}

fn check_attribute(name: &str, len: usize, vertex_count: usize) -> Result<()> {
    if len != 0 && len != vertex_count {
        engine_bail!("potato::Mesh", "Mesh has {} {} but {} positions",
            len, name, vertex_count);
    }
    Ok(())
}

// ============================================================================
// LOD GROUP / SCENE
// ============================================================================

/// Named set of meshes, one per level of detail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LodGroup {
    pub name: String,
    pub meshes: GrowableArray<Mesh>,
}

impl LodGroup {
    /// Create an empty LOD group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meshes: GrowableArray::new(),
        }
    }
}

/// Imported scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub name: String,
    pub lod_groups: GrowableArray<LodGroup>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lod_groups: GrowableArray::new(),
        }
    }

    /// Find a LOD group by name
    pub fn lod_group(&self, name: &str) -> Option<&LodGroup> {
        self.lod_groups.iter().find(|group| group.name == name)
    }

    /// Total number of meshes across all LOD groups
    pub fn mesh_count(&self) -> usize {
        self.lod_groups.iter().map(|group| group.meshes.len()).sum()
    }

    /// Validate every mesh of every LOD group
    pub fn validate(&self) -> Result<()> {
        for group in self.lod_groups.iter() {
            for mesh in group.meshes.iter() {
                mesh.validate()?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// IMPORT SETTINGS
// ============================================================================

bitflags! {
    /// Optional processing steps requested for a geometry import
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImportFlags: u8 {
        const CALCULATE_NORMALS = 1 << 0;
        const CALCULATE_TANGENTS = 1 << 1;
        const REVERSE_HANDEDNESS = 1 << 2;
        const IMPORT_EMBEDDED_TEXTURES = 1 << 3;
        const IMPORT_ANIMATIONS = 1 << 4;
    }
}

/// Settings passed alongside the raw scene bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryImportSettings {
    /// Degrees, always within [0, 180]
    smoothing_angle: f32,
    pub flags: ImportFlags,
}

impl GeometryImportSettings {
    pub const MAX_SMOOTHING_ANGLE: f32 = 180.0;

    /// Create settings; `smoothing_angle` is clamped to [0, 180]
    pub fn new(smoothing_angle: f32, flags: ImportFlags) -> Self {
        let mut settings = Self { smoothing_angle: 0.0, flags };
        settings.set_smoothing_angle(smoothing_angle);
        settings
    }

    pub fn smoothing_angle(&self) -> f32 {
        self.smoothing_angle
    }

    pub fn set_smoothing_angle(&mut self, degrees: f32) {
        self.smoothing_angle = clamp(degrees, 0.0, Self::MAX_SMOOTHING_ANGLE);
    }
}

impl Default for GeometryImportSettings {
    fn default() -> Self {
        Self::new(178.0, ImportFlags::CALCULATE_NORMALS | ImportFlags::CALCULATE_TANGENTS)
    }
}

/// Raw scene bytes handed over by the editor, plus how to import them
#[derive(Debug, Clone, Default)]
pub struct SceneData {
    buffer: GrowableArray<u8, NoDestruct>,
    pub settings: GeometryImportSettings,
}

impl SceneData {
    /// Copy `bytes` into a new scene buffer
    pub fn new(bytes: &[u8], settings: GeometryImportSettings) -> Self {
        Self {
            buffer: GrowableArray::from(bytes),
            settings,
        }
    }

    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Replace the buffer contents, reusing the existing allocation
    pub fn set_buffer(&mut self, bytes: &[u8]) {
        self.buffer.clear();
        self.buffer.extend(bytes.iter().copied());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
