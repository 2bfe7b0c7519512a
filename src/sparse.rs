/// Sparse matrix under assembly, stored as a list of triplets.
/// Duplicate entries are summed on conversion.
#[derive(Default, Debug, Clone)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self::new(nrows, ncols, Vec::new())
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Self {
    Self {
      nrows,
      ncols,
      triplets,
    }
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn triplets(&self) -> &[(usize, usize, f64)] {
    &self.triplets
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    assert!(r < self.nrows() && c < self.ncols());
    if v != 0.0 {
      self.triplets.push((r, c, v));
    }
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let mut coo = nas::CooMatrix::new(self.nrows, self.ncols);
    for &(r, c, v) in &self.triplets {
      coo.push(r, c, v);
    }
    coo
  }

  pub fn to_nalgebra_csc(&self) -> nas::CscMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  /// Returns `None` if matrix is not diagonal.
  pub fn try_to_diagonal(&self) -> Option<na::DVector<f64>> {
    let mut diagonal = na::DVector::zeros(self.nrows.max(self.ncols));
    for &(r, c, v) in &self.triplets {
      if r != c {
        return None;
      }
      diagonal[r] += v;
    }
    Some(diagonal)
  }
}

#[cfg(test)]
mod test {
  use super::SparseMatrix;

  #[test]
  fn duplicates_are_summed() {
    let mut m = SparseMatrix::zeros(2, 2);
    m.push(0, 1, 1.5);
    m.push(0, 1, 0.5);
    m.push(1, 1, 0.0);
    assert_eq!(m.triplets().len(), 2);

    let dense = m.to_nalgebra_dense();
    assert_eq!(dense, na::DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 0.0, 0.0]));
    assert_eq!(m.to_nalgebra_csc().nnz(), 1);
    assert!(m.try_to_diagonal().is_none());
  }

  #[test]
  fn diagonal_extraction() {
    let mut m = SparseMatrix::zeros(3, 3);
    m.push(0, 0, 1.0);
    m.push(2, 2, 3.0);
    m.push(2, 2, 1.0);
    assert_eq!(m.try_to_diagonal(), Some(na::dvector![1.0, 0.0, 4.0]));
  }
}
