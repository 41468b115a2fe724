#![warn(missing_docs)]

//! Split orchestrator, plane-suggestion heuristic, and the peripheral
//! request surface (file registry, printer catalog) that sits in front
//! of the geometry pipeline.

pub mod error;
pub mod printer;
pub mod split;
pub mod store;
pub mod suggest;

pub use error::{CoreError, Fallback, Result};
pub use printer::{list_printers, Printer};
pub use split::{split_mesh, SplitResult, HOLE_TOLERANCE};
pub use store::{FileStore, InMemoryFileStore};
pub use suggest::{suggest_plane, PlaneSuggestion};

use splitcraft_math::{Axis, Vec3};
use splitcraft_mesh::{stl, TriangleMesh};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Parse an axis hint string (`"x"`, `"y"`, `"z"`, case-insensitive); any
/// other value (including absent/unknown upstream) means "auto".
pub fn parse_axis_hint(hint: Option<&str>) -> Option<Axis> {
    match hint?.to_lowercase().as_str() {
        "x" => Some(Axis::X),
        "y" => Some(Axis::Y),
        "z" => Some(Axis::Z),
        _ => None,
    }
}

/// `suggest_split(file_id, axis?)`: load the registered mesh and propose
/// a cutting plane for it.
pub fn suggest_split(
    store: &dyn FileStore,
    file_id: Uuid,
    axis_hint: Option<&str>,
) -> Result<PlaneSuggestion> {
    let mesh = load_registered(store, file_id)?;
    let axis = parse_axis_hint(axis_hint);
    suggest_plane(&mesh, axis).ok_or_else(|| CoreError::InvalidMesh("mesh has no vertices".into()))
}

/// The result of `perform_split`: each output half's assigned id, path,
/// and volume.
pub struct SplitOutput {
    /// `half_a`'s registry id.
    pub id_a: Uuid,
    /// `half_a`'s on-disk path.
    pub path_a: PathBuf,
    /// `half_a`'s volume in cubic millimeters.
    pub volume_a: f64,
    /// `half_b`'s registry id.
    pub id_b: Uuid,
    /// `half_b`'s on-disk path.
    pub path_b: PathBuf,
    /// `half_b`'s volume in cubic millimeters.
    pub volume_b: f64,
    /// Non-fatal outcomes recorded while producing this split.
    pub fallbacks: Vec<Fallback>,
}

/// `perform_split(file_id, origin, normal, add_keys)`: load the
/// registered mesh, split it, write both halves as binary STL into
/// `output_dir`, and register the new files.
pub fn perform_split(
    store: &dyn FileStore,
    file_id: Uuid,
    origin: &splitcraft_math::Point3,
    normal: &Vec3,
    add_keys: bool,
    output_dir: &Path,
) -> Result<SplitOutput> {
    let mesh = load_registered(store, file_id)?;
    let result = split_mesh(&mesh, origin, normal, add_keys)?;

    let base = file_id.simple().to_string();
    let path_a = output_dir.join(format!("{base}_part_a_{}.stl", Uuid::new_v4()));
    let path_b = output_dir.join(format!("{base}_part_b_{}.stl", Uuid::new_v4()));

    stl::save_file(&path_a, &result.half_a).map_err(|e| CoreError::InvalidMesh(e.to_string()))?;
    stl::save_file(&path_b, &result.half_b).map_err(|e| CoreError::InvalidMesh(e.to_string()))?;

    let id_a = store.put(path_a.clone());
    let id_b = store.put(path_b.clone());

    Ok(SplitOutput {
        id_a,
        path_a,
        volume_a: result.volume_a,
        id_b,
        path_b,
        volume_b: result.volume_b,
        fallbacks: result.fallbacks,
    })
}

fn load_registered(store: &dyn FileStore, file_id: Uuid) -> Result<TriangleMesh> {
    let path = store
        .get(file_id)
        .ok_or_else(|| CoreError::FileNotFound(file_id.to_string()))?;
    stl::load_file(&path).map_err(|e| CoreError::InvalidMesh(e.to_string()))
}
