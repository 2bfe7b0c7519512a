//! Gradient, normalization and divergence of fields on a triangle surface.
//!
//! Two discretizations are provided. The per-face one is the usual piecewise
//! linear gradient with the matching cotangent divergence. The vertex-star one
//! assigns a vector to every vertex from the faces around it. It is kept for
//! comparison and does not converge to the true gradient.

use crate::{geometry::cotangent, mesh::SurfaceMesh};

pub type VectorField = Vec<na::Vector3<f64>>;

/// Per-vertex vector field from the faces in each vertex's star.
///
/// For every incident face, the unit edge opposite the vertex is rotated into the
/// face by the face normal and weighted with `heat[vertex] / (2 area)`.
pub fn vertex_gradient(
  mesh: &SurfaceMesh,
  face_areas: &[f64],
  heat: &na::DVector<f64>,
) -> VectorField {
  (0..mesh.nvertices())
    .map(|vertex| {
      let mut gradient = na::Vector3::zeros();
      for corner in mesh.star(vertex) {
        let [p0, p1, p2] = mesh.face_coords(corner.face);
        // counter-clockwise edge opposite the corner
        let edge = match corner.local {
          0 => p2 - p1,
          1 => p0 - p2,
          _ => p1 - p0,
        };
        let edge = edge / edge.norm();
        let normal = mesh.face(corner.face).normal();
        let normal = normal / normal.norm();
        gradient += normal.cross(&edge) * (heat[vertex] / (2.0 * face_areas[corner.face]));
      }
      gradient
    })
    .collect()
}

/// Gradient of the piecewise linear interpolant of `u`, constant on every face.
///
/// `grad u = 1/(2A) sum_i u_i (N x e_i)` with `e_i` the counter-clockwise edge
/// opposite vertex `i`.
pub fn face_gradient(mesh: &SurfaceMesh, face_areas: &[f64], u: &na::DVector<f64>) -> VectorField {
  mesh
    .faces()
    .iter()
    .enumerate()
    .map(|(iface, face)| {
      let [p0, p1, p2] = mesh.face_coords(iface);
      let [u0, u1, u2] = face.vertices().map(|v| u[v]);
      let normal = face.normal();
      let sum = normal.cross(&(p2 - p1)) * u0
        + normal.cross(&(p0 - p2)) * u1
        + normal.cross(&(p1 - p0)) * u2;
      sum / (2.0 * face_areas[iface])
    })
    .collect()
}

/// Scales every vector to unit length. Vectors without a finite, non-zero norm
/// become zero.
pub fn normalize_field(field: &[na::Vector3<f64>]) -> VectorField {
  field
    .iter()
    .map(|v| {
      let norm = v.norm();
      if norm > 0.0 && norm.is_finite() {
        v / norm
      } else {
        na::Vector3::zeros()
      }
    })
    .collect()
}

/// Divergence of a per-vertex vector field, integrated over each vertex's star.
pub fn vertex_divergence(mesh: &SurfaceMesh, field: &[na::Vector3<f64>]) -> na::DVector<f64> {
  let divergence = na::DVector::from_fn(mesh.nvertices(), |vertex, _| {
    let x = &field[vertex];
    let mut divergence = 0.0;
    for corner in mesh.star(vertex) {
      let [p0, p1, p2] = mesh.face_coords(corner.face);
      // left, right and opposite edge
      let (mut el, mut er, eo) = match corner.local {
        0 => (p2 - p0, p1 - p0, p1 - p2),
        1 => (p0 - p1, p2 - p1, p0 - p2),
        _ => (p1 - p2, p0 - p2, p0 - p1),
      };
      let cotl = cotangent(&el, &eo);
      let cotr = cotangent(&er, &eo);
      el /= el.norm();
      er /= er.norm();
      divergence += (cotl * er.dot(x) + cotr * el.dot(x)) / 2.0;
    }
    divergence
  });
  sanitize(divergence)
}

/// Integrated divergence of a per-face vector field.
///
/// `div X (v) = 1/2 sum_f cot(b) (a - v).X_f + cot(a) (b - v).X_f` where `a`, `b`
/// are the other two corners of `f` and `cot(a)`, `cot(b)` the cotangents of
/// their angles.
pub fn face_divergence(mesh: &SurfaceMesh, field: &[na::Vector3<f64>]) -> na::DVector<f64> {
  let divergence = na::DVector::from_fn(mesh.nvertices(), |vertex, _| {
    let mut divergence = 0.0;
    for corner in mesh.star(vertex) {
      let x = &field[corner.face];
      let p = mesh.face_coords(corner.face);
      let v = p[corner.local];
      let a = p[(corner.local + 1) % 3];
      let b = p[(corner.local + 2) % 3];
      let cot_a = cotangent(&(v - a), &(b - a));
      let cot_b = cotangent(&(v - b), &(a - b));
      divergence += (cot_b * (a - v).dot(x) + cot_a * (b - v).dot(x)) / 2.0;
    }
    divergence
  });
  sanitize(divergence)
}

/// Zeroes NaN and infinite entries coming from degenerate triangles.
fn sanitize(mut divergence: na::DVector<f64>) -> na::DVector<f64> {
  let mut nsanitized = 0;
  for d in divergence.iter_mut().filter(|d| !d.is_finite()) {
    *d = 0.0;
    nsanitized += 1;
  }
  if nsanitized > 0 {
    tracing::warn!("divergence was not finite at {nsanitized} vertices, set to zero");
  }
  divergence
}
