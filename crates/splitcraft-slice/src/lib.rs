#![warn(missing_docs)]

//! Plane slicing and cut-surface extraction for the mesh-splitting pipeline.
//!
//! Given a mesh and a cutting plane, this crate answers two questions:
//! which triangles survive on the kept side of the plane, capped into a
//! watertight half ([`slice::slice`]), and what the flat cap looks like as
//! a 2D polygon in a plane-local frame ([`cut_surface::extract_cut_surface`]).

pub mod cut_surface;
pub mod error;
pub mod slice;

pub use cut_surface::{extract_cut_surface, CutSurface, CAP_TOLERANCE};
pub use error::{Result, SlicerError};
pub use slice::{plane_local_frame, section, slice};
