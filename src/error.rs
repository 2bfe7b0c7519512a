use crate::{FaceIdx, VertexIdx};

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// The two linear systems of the heat method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearSystem {
  /// `M - t L`, diffusing the initial heat.
  Heat,
  /// `eps I - L`, recovering the distance from the divergence.
  Poisson,
}
impl fmt::Display for LinearSystem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Heat => write!(f, "heat flow"),
      Self::Poisson => write!(f, "poisson"),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("mesh has no faces")]
  EmptyMesh,
  #[error("face {face} references vertex {vertex}, which does not exist")]
  VertexOutOfBounds { face: FaceIdx, vertex: VertexIdx },
  #[error("vertex {vertex} is not part of any face")]
  IsolatedVertex { vertex: VertexIdx },
  #[error("edge {edge:?} is shared by more than two faces")]
  NonManifoldEdge { edge: [VertexIdx; 2] },
  #[error("faces sharing edge {edge:?} have opposite orientation")]
  InconsistentOrientation { edge: [VertexIdx; 2] },
  #[error("triangle fan around vertex {vertex} does not close")]
  OpenFan { vertex: VertexIdx },
  #[error("expected {expected} values (one per vertex), found {found}")]
  DimensionMismatch { expected: usize, found: usize },
  #[error("{system} system is not positive definite: {reason}")]
  NotPositiveDefinite {
    system: LinearSystem,
    reason: String,
  },
  #[error("invalid OBJ data on line {line}: {reason}")]
  ObjParse { line: usize, reason: String },
  #[error(transparent)]
  Io(#[from] std::io::Error),
}
