use super::SurfaceMesh;
use crate::{Result, VertexIdx};

/// Raw triangle soup: vertex coordinates and counter-clockwise triangles,
/// without any adjacency. This is what files and generators produce.
#[derive(Debug, Clone)]
pub struct TriangleSurface3D {
  triangles: Vec<[VertexIdx; 3]>,
  coords: na::Matrix3xX<f64>,
}
impl TriangleSurface3D {
  pub fn new(triangles: Vec<[VertexIdx; 3]>, coords: na::Matrix3xX<f64>) -> Self {
    Self { triangles, coords }
  }
  pub fn triangles(&self) -> &[[VertexIdx; 3]] {
    &self.triangles
  }
  pub fn vertex_coords(&self) -> &na::Matrix3xX<f64> {
    &self.coords
  }
  pub fn vertex_coords_mut(&mut self) -> &mut na::Matrix3xX<f64> {
    &mut self.coords
  }
  pub fn nvertices(&self) -> usize {
    self.coords.ncols()
  }
  pub fn into_parts(self) -> (Vec<[VertexIdx; 3]>, na::Matrix3xX<f64>) {
    (self.triangles, self.coords)
  }

  /// Builds the adjacency and validates the surface.
  pub fn into_mesh(self) -> Result<SurfaceMesh> {
    SurfaceMesh::new(self.coords, self.triangles)
  }

  /// Renumbers the vertices: old vertex `i` becomes vertex `permutation[i]`.
  pub fn relabel_vertices(&self, permutation: &[VertexIdx]) -> Self {
    assert_eq!(permutation.len(), self.nvertices());
    let mut coords = na::Matrix3xX::zeros(self.nvertices());
    for (old, &new) in permutation.iter().enumerate() {
      coords.set_column(new, &self.coords.column(old));
    }
    let triangles = self
      .triangles
      .iter()
      .map(|t| t.map(|v| permutation[v]))
      .collect();
    Self::new(triangles, coords)
  }
}
