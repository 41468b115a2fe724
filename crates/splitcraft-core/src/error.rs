//! Error taxonomy for the split pipeline.
//!
//! Fatal variants abort the request; non-fatal ones are recorded with
//! `tracing::warn!` and the orchestrator continues with a documented
//! fallback.

/// Errors surfaced by the core pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The input mesh could not be loaded or is structurally invalid.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    /// The cutting plane's normal has zero length.
    #[error("degenerate cutting plane: normal has zero length")]
    DegeneratePlane,
    /// A file id was not present in the registry.
    #[error("file not found: {0}")]
    FileNotFound(String),
}

/// Non-fatal outcomes recorded during a split, for callers that want to
/// inspect what was skipped or worked around.
#[derive(Debug, Clone)]
pub enum Fallback {
    /// The cut-surface extractor found no triangles on the plane; keying
    /// was skipped and the raw halves were returned.
    NoCapFound,
    /// One or more pin centers fell outside the cap polygon and were
    /// dropped.
    PlacementWarning {
        /// How many candidate centers were dropped.
        dropped: usize,
    },
    /// The boolean compositor could not carve/weld and used its
    /// documented fallback instead.
    BooleanFailure {
        /// Which half the failure occurred on ("half_a" or "half_b").
        half: &'static str,
        /// The fallback reason reported by the compositor.
        reason: String,
    },
}

/// Result type for fallible core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
