//! Approximate geodesic distances on triangle surfaces with the heat method.
//!
//! Heat is diffused for a short time from the sources, the normalized negative
//! heat gradient is taken as the direction of the distance gradient and the
//! distance is recovered from a Poisson equation matching that field's divergence.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod error;
pub mod field;
pub mod geometry;
pub mod heat;
pub mod io;
pub mod linalg;
pub mod mesh;
pub mod operators;
pub mod report;
pub mod sparse;

pub use error::{Error, Result};
pub use heat::{compute_geodesic, compute_geodesic_verbose, GradientScheme, HeatMethodConfig};
pub use mesh::SurfaceMesh;

pub type VertexIdx = usize;
pub type FaceIdx = usize;
