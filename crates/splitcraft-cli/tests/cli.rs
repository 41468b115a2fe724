//! End-to-end CLI scenarios, driving the compiled `splitcraft` binary
//! against a real STL file on disk.

use splitcraft_mesh::{stl, TriangleMesh};
use std::path::PathBuf;
use std::process::Command;

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

fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "splitcraft-cli-test-{label}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn splitcraft() -> Command {
    Command::new(env!("CARGO_BIN_EXE_splitcraft"))
}

#[test]
fn printers_lists_the_catalog() {
    let output = splitcraft().arg("printers").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Bambu Lab X1C"));
    assert!(stdout.contains("Prusa MK4"));
}

#[test]
fn suggest_split_then_split_round_trips_through_real_files() {
    let dir = temp_dir("suggest-then-split");
    let cube_path = dir.join("cube.stl");
    stl::save_file(&cube_path, &axis_cube(20.0)).unwrap();

    let suggest_output = splitcraft()
        .args(["suggest-split", cube_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(suggest_output.status.success());
    let stdout = String::from_utf8(suggest_output.stdout).unwrap();
    assert!(stdout.contains("origin:"));
    assert!(stdout.contains("normal:"));

    let split_output = splitcraft()
        .args([
            "split",
            cube_path.to_str().unwrap(),
            "--origin",
            "10,10,10",
            "--normal",
            "1,0,0",
            "--no-keys",
            "--out-dir",
            dir.to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();
    assert!(split_output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&split_output.stdout).expect("split --json prints valid JSON");
    let volume_a = report["volume_a"].as_f64().unwrap();
    let volume_b = report["volume_b"].as_f64().unwrap();
    assert!((volume_a - 4000.0).abs() < 1e-2);
    assert!((volume_b - 4000.0).abs() < 1e-2);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn split_on_missing_file_exits_nonzero() {
    let dir = temp_dir("missing-file");
    let missing = dir.join("does-not-exist.stl");

    let output = splitcraft()
        .args([
            "split",
            missing.to_str().unwrap(),
            "--origin",
            "0,0,0",
            "--normal",
            "1,0,0",
            "--out-dir",
            dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());

    std::fs::remove_dir_all(&dir).ok();
}
