//! Error types for plane slicing and cut-surface extraction.

use thiserror::Error;

/// Errors that can occur while slicing a mesh by a plane or extracting its cap.
#[derive(Error, Debug)]
pub enum SlicerError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// The cutting plane's normal could not be normalized (zero-length input).
    #[error("degenerate cutting plane: {0}")]
    DegeneratePlane(String),

    /// Slicing operation failed.
    #[error("slicing failed: {0}")]
    SliceFailed(String),
}

/// Result type for slicer operations.
pub type Result<T> = std::result::Result<T, SlicerError>;
