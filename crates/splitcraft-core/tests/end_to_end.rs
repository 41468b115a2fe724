//! End-to-end scenarios for the split/suggest pipeline, run against a real
//! registered STL file rather than in-process meshes.

use splitcraft_core::{perform_split, split_mesh, suggest_split, FileStore, InMemoryFileStore};
use splitcraft_math::{Point3, Vec3};
use splitcraft_mesh::{stl, TriangleMesh};

fn axis_cube(size: f64) -> TriangleMesh {
    let s = size as f32;
    #[rustfmt::skip]
    let vertices: Vec<f32> = vec![
        0.0, 0.0, 0.0,  s, 0.0, 0.0,  s, s, 0.0,  0.0, s, 0.0,
        0.0, 0.0, s,    s, 0.0, s,    s, s, s,    0.0, s, s,
    ];
    #[rustfmt::skip]
    let indices: Vec<u32> = vec![
        0, 2, 1,  0, 3, 2,
        4, 5, 6,  4, 6, 7,
        0, 5, 4,  0, 1, 5,
        1, 6, 5,  1, 2, 6,
        2, 7, 6,  2, 3, 7,
        3, 4, 7,  3, 0, 4,
    ];
    TriangleMesh::from_vertices_indices(vertices, indices)
}

fn temp_dir(label: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("splitcraft-e2e-{label}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Scenario 1: axis-aligned 20mm cube, auto axis.
#[test]
fn cube_auto_axis_splits_into_equal_halves_and_registers_both_parts() {
    let dir = temp_dir("cube-auto");
    let input_path = dir.join("cube.stl");
    stl::save_file(&input_path, &axis_cube(20.0)).unwrap();

    let store = InMemoryFileStore::new();
    let file_id = store.put(input_path);

    let suggestion = suggest_split(&store, file_id, None).unwrap();
    assert_eq!(suggestion.normal.into_inner(), Vec3::x());
    assert!((suggestion.origin.x - 10.0).abs() < 1e-9);

    let normal = Vec3::new(
        suggestion.normal.x,
        suggestion.normal.y,
        suggestion.normal.z,
    );
    let output = perform_split(&store, file_id, &suggestion.origin, &normal, false, &dir).unwrap();

    assert!((output.volume_a - 4000.0).abs() < 1e-2);
    assert!((output.volume_b - 4000.0).abs() < 1e-2);
    assert_eq!(store.get(output.id_a), Some(output.path_a));
    assert_eq!(store.get(output.id_b), Some(output.path_b));

    std::fs::remove_dir_all(&dir).ok();
}

/// Scenario 6: a non-unit normal must normalize to the same result as its
/// unit-length equivalent.
#[test]
fn non_unit_normal_normalizes_to_the_same_split_as_the_unit_normal() {
    let cube = axis_cube(20.0);
    let origin = Point3::new(10.0, 10.0, 10.0);

    let unit = split_mesh(&cube, &origin, &Vec3::x(), false).unwrap();
    let scaled = split_mesh(&cube, &origin, &Vec3::new(2.0, 0.0, 0.0), false).unwrap();

    assert!((unit.volume_a - scaled.volume_a).abs() < 1e-9);
    assert!((unit.volume_b - scaled.volume_b).abs() < 1e-9);
}
