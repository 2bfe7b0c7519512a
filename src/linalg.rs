use crate::{error::LinearSystem, Error, Result};

use faer::solvers::SpSolver;

type SparseMatrixFaer = faer::sparse::SparseColMat<usize, f64>;

pub fn nalgebra2faer(m: nas::CscMatrix<f64>) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (col_ptrs, row_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseColMat::new_checked(nrows, ncols, col_ptrs, None, row_indices);
  faer::sparse::SparseColMat::new(symbolic, values)
}

/// Sparse Cholesky factorization of a symmetric positive definite matrix.
/// Only the upper triangle is read.
pub struct FaerCholesky {
  raw: faer::sparse::linalg::solvers::Cholesky<usize, f64>,
}
impl FaerCholesky {
  pub fn new(a: nas::CscMatrix<f64>, system: LinearSystem) -> Result<Self> {
    if let Some(v) = a.values().iter().find(|v| !v.is_finite()) {
      return Err(Error::NotPositiveDefinite {
        system,
        reason: format!("matrix has a non-finite entry ({v})"),
      });
    }
    let raw = nalgebra2faer(a)
      .sp_cholesky(faer::Side::Upper)
      .map_err(|err| Error::NotPositiveDefinite {
        system,
        reason: format!("{err:?}"),
      })?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> na::DVector<f64> {
    let b = faer::Col::from_fn(b.nrows(), |i| b[i]);
    let x = self.raw.solve(b.as_ref());
    na::DVector::from_fn(x.nrows(), |i, _| x[i])
  }
}
