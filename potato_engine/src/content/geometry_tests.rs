//! Unit tests for geometry.rs
//!
//! Tests the mesh/scene import aggregates and their validation.

use super::*;
use crate::error::Error;
use glam::{Vec2, Vec3, Vec4};

// ============================================================================
// HELPERS
// ============================================================================

fn triangle() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.positions.push(Vec3::new(0.0, 0.0, 0.0));
    mesh.positions.push(Vec3::new(1.0, 0.0, 0.0));
    mesh.positions.push(Vec3::new(0.0, 1.0, 0.0));
    mesh.raw_indices.extend([0, 1, 2]);
    mesh
}

fn invalid_resource_message(result: crate::error::Result<()>) -> String {
    match result {
        Err(Error::InvalidResource(message)) => message,
        other => panic!("expected InvalidResource, got {:?}", other),
    }
}

// ============================================================================
// MESH TESTS
// ============================================================================

#[test]
fn test_new_mesh_is_empty() {
    let mesh = Mesh::new();
    assert_eq!(mesh.vertex_count(), 0);
    assert_eq!(mesh.triangle_count(), 0);
    assert!(mesh.uv_sets.is_empty());
}

#[test]
fn test_triangle_counts() {
    let mut mesh = triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);

    mesh.raw_indices.clear();
    assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn test_positions_as_bytes() {
    let mesh = triangle();
    let bytes = mesh.positions_as_bytes();
    assert_eq!(bytes.len(), 3 * 3 * 4);
    assert_eq!(&bytes[12..16], &1.0_f32.to_ne_bytes());
}

#[test]
fn test_valid_mesh_with_all_attributes() {
    let mut mesh = triangle();
    mesh.normals.resize(3, Vec3::Z);
    mesh.tangents.resize(3, Vec4::X);
    mesh.uv_sets.push(GrowableArray::from_elem(3, Vec2::ZERO));
    mesh.uv_sets.push(GrowableArray::from_elem(3, Vec2::ONE));

    assert_eq!(mesh.validate(), Ok(()));
}

#[test]
fn test_validate_rejects_empty_positions() {
    let message = invalid_resource_message(Mesh::new().validate());
    assert!(message.contains("no positions"));
}

#[test]
fn test_validate_rejects_partial_triangle() {
    let mut mesh = triangle();
    mesh.raw_indices.push(0);
    let message = invalid_resource_message(mesh.validate());
    assert!(message.contains("not a multiple of 3"));
}

#[test]
fn test_validate_rejects_out_of_range_index() {
    let mut mesh = triangle();
    mesh.raw_indices[2] = 3;
    let message = invalid_resource_message(mesh.validate());
    assert_eq!(message, "Index 3 out of range for 3 vertices");
}

#[test]
fn test_validate_rejects_mismatched_uv_set() {
    let mut mesh = triangle();
    mesh.uv_sets.push(GrowableArray::from_elem(3, Vec2::ZERO));
    mesh.uv_sets.push(GrowableArray::from_elem(2, Vec2::ZERO));
    let message = invalid_resource_message(mesh.validate());
    assert_eq!(message, "Mesh has 2 uv set 1 but 3 positions");
}

#[test]
fn test_mesh_clone_is_deep() {
    let original = triangle();
    let mut copy = original.clone();
    copy.positions[0] = Vec3::ONE;
    copy.uv_sets.push(GrowableArray::new());

    assert_eq!(original.positions[0], Vec3::ZERO);
    assert!(original.uv_sets.is_empty());
    assert_ne!(original, copy);
}

// ============================================================================
// SCENE TESTS
// ============================================================================

#[test]
fn test_scene_lookup_and_counts() {
    let mut rock = LodGroup::new("rock");
    rock.meshes.push(triangle());
    rock.meshes.push(triangle());
    let mut tree = LodGroup::new("tree");
    tree.meshes.push(triangle());

    let mut scene = Scene::new("level_01");
    scene.lod_groups.push(rock);
    scene.lod_groups.push(tree);

    assert_eq!(scene.mesh_count(), 3);
    assert_eq!(scene.lod_group("rock").map(|group| group.meshes.len()), Some(2));
    assert!(scene.lod_group("bush").is_none());
    assert_eq!(scene.validate(), Ok(()));
}

#[test]
fn test_scene_validate_reports_bad_mesh() {
    let mut group = LodGroup::new("broken");
    group.meshes.push(triangle());
    group.meshes.push(Mesh::new());

    let mut scene = Scene::new("level_02");
    scene.lod_groups.push(group);

    assert!(matches!(scene.validate(), Err(Error::InvalidResource(_))));
}

// ============================================================================
// IMPORT SETTINGS TESTS
// ============================================================================

#[test]
fn test_default_import_settings() {
    let settings = GeometryImportSettings::default();
    assert_eq!(settings.smoothing_angle(), 178.0);
    assert!(settings.flags.contains(ImportFlags::CALCULATE_NORMALS));
    assert!(settings.flags.contains(ImportFlags::CALCULATE_TANGENTS));
    assert!(!settings.flags.contains(ImportFlags::IMPORT_ANIMATIONS));
}

#[test]
fn test_smoothing_angle_is_clamped() {
    let mut settings = GeometryImportSettings::new(270.0, ImportFlags::empty());
    assert_eq!(settings.smoothing_angle(), 180.0);

    settings.set_smoothing_angle(-15.0);
    assert_eq!(settings.smoothing_angle(), 0.0);

    settings.set_smoothing_angle(45.0);
    assert_eq!(settings.smoothing_angle(), 45.0);
}

#[test]
fn test_scene_data_owns_copy_of_bytes() {
    let mut bytes = vec![1u8, 2, 3, 4];
    let mut data = SceneData::new(&bytes, GeometryImportSettings::default());
    bytes[0] = 99;

    assert_eq!(data.buffer_size(), 4);
    assert_eq!(data.buffer(), &[1, 2, 3, 4]);

    data.set_buffer(&[7, 8]);
    assert_eq!(data.buffer(), &[7, 8]);
    assert_eq!(data.buffer_size(), 2);
}
