//! Procedural surfaces.

use super::TriangleSurface3D;
use crate::VertexIdx;

use std::{collections::HashMap, f64::consts::TAU, sync::LazyLock};

/// Geodesic sphere from subdividing a icosahedron
pub fn icosphere(nsubdivisions: usize) -> TriangleSurface3D {
  let triangles = ICOSAHEDRON_SURFACE.triangles().to_vec();
  let vertex_coords = ICOSAHEDRON_SURFACE
    .vertex_coords()
    .column_iter()
    .map(|c| c.into_owned())
    .collect();

  let (triangles, vertex_coords) = subdivide(triangles, vertex_coords, nsubdivisions);

  let vertex_coords = na::Matrix3xX::from_columns(&vertex_coords);
  TriangleSurface3D::new(triangles, vertex_coords)
}

fn subdivide(
  triangles: Vec<[VertexIdx; 3]>,
  mut vertex_coords: Vec<na::Vector3<f64>>,
  depth: usize,
) -> (Vec<[VertexIdx; 3]>, Vec<na::Vector3<f64>>) {
  if depth == 0 {
    return (triangles, vertex_coords);
  }

  let mut midpoints = HashMap::new();

  let triangles = triangles
    .into_iter()
    .flat_map(|[v0, v1, v2]| {
      let v01 = get_midpoint(v0, v1, &mut vertex_coords, &mut midpoints);
      let v12 = get_midpoint(v1, v2, &mut vertex_coords, &mut midpoints);
      let v20 = get_midpoint(v2, v0, &mut vertex_coords, &mut midpoints);

      [
        [v0, v01, v20],
        [v1, v12, v01],
        [v2, v20, v12],
        [v01, v12, v20],
      ]
    })
    .collect();

  subdivide(triangles, vertex_coords, depth - 1)
}

fn get_midpoint(
  v0: VertexIdx,
  v1: VertexIdx,
  vertices: &mut Vec<na::Vector3<f64>>,
  midpoints: &mut HashMap<(VertexIdx, VertexIdx), VertexIdx>,
) -> VertexIdx {
  let edge = if v0 < v1 { (v0, v1) } else { (v1, v0) };
  if let Some(&midpoint) = midpoints.get(&edge) {
    return midpoint;
  }

  // projected back onto the unit sphere
  let midpoint = ((vertices[v0] + vertices[v1]) / 2.0).normalize();
  vertices.push(midpoint);
  let index = vertices.len() - 1;
  midpoints.insert(edge, index);
  index
}

static ICOSAHEDRON_SURFACE: LazyLock<TriangleSurface3D> = LazyLock::new(|| {
  let phi = (1.0 + 5.0f64.sqrt()) / 2.0;

  #[rustfmt::skip]
  let vertices = [
    [-1.0, phi, 0.0],
    [ 1.0, phi, 0.0],
    [-1.0,-phi, 0.0],
    [ 1.0,-phi, 0.0],
    [ 0.0,-1.0, phi],
    [ 0.0, 1.0, phi],
    [ 0.0,-1.0,-phi],
    [ 0.0, 1.0,-phi],
    [ phi, 0.0,-1.0],
    [ phi, 0.0, 1.0],
    [-phi, 0.0,-1.0],
    [-phi, 0.0, 1.0],
  ];

  let vertices: Vec<_> = vertices
    .into_iter()
    .map(|v| na::Vector3::new(v[0], v[1], v[2]).normalize())
    .collect();
  let vertex_coords = na::Matrix3xX::from_columns(&vertices);

  #[rustfmt::skip]
  let triangles = vec![
    [ 0,11, 5],
    [ 0, 5, 1],
    [ 0, 1, 7],
    [ 0, 7,10],
    [ 0,10,11],
    [ 1, 5, 9],
    [ 5,11, 4],
    [11,10, 2],
    [10, 7, 6],
    [ 7, 1, 8],
    [ 3, 9, 4],
    [ 3, 4, 2],
    [ 3, 2, 6],
    [ 3, 6, 8],
    [ 3, 8, 9],
    [ 4, 9, 5],
    [ 2, 4,11],
    [ 6, 2,10],
    [ 8, 6, 7],
    [ 9, 8, 1],
  ];

  TriangleSurface3D::new(triangles, vertex_coords)
});

/// Planar disk in the xy-plane, centered at the origin.
///
/// Vertex 0 is the center, followed by `nrings` concentric rings where ring `k`
/// has `6k` vertices at radius `k * spacing`. The outermost ring is the boundary.
/// Adjacent rings are zipped together by angle, giving nearly equilateral triangles.
pub fn flat_disk(nrings: usize, spacing: f64) -> TriangleSurface3D {
  let ring_start = |k: usize| if k == 0 { 0 } else { 1 + 3 * k * (k - 1) };
  let ring_len = |k: usize| if k == 0 { 1 } else { 6 * k };

  let mut vertices = vec![na::Vector3::zeros()];
  for k in 1..=nrings {
    let radius = k as f64 * spacing;
    vertices.extend((0..ring_len(k)).map(|j| {
      let angle = TAU * j as f64 / ring_len(k) as f64;
      na::Vector3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
    }));
  }

  let mut triangles = Vec::new();
  for j in 0..ring_len(1) {
    let b = |j: usize| ring_start(1) + j % ring_len(1);
    triangles.push([0, b(j), b(j + 1)]);
  }
  for k in 1..nrings {
    let (n, m) = (ring_len(k), ring_len(k + 1));
    let a = |i: usize| ring_start(k) + i % n;
    let b = |j: usize| ring_start(k + 1) + j % m;

    // Advance on whichever ring has the smaller next angle: (i+1)/n < (j+1)/m.
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
      let advance_inner = j == m || (i < n && (i + 1) * m < (j + 1) * n);
      if advance_inner {
        triangles.push([a(i), b(j), a(i + 1)]);
        i += 1;
      } else {
        triangles.push([a(i), b(j), b(j + 1)]);
        j += 1;
      }
    }
  }

  TriangleSurface3D::new(triangles, na::Matrix3xX::from_columns(&vertices))
}

#[cfg(test)]
mod test {
  use super::{flat_disk, icosphere};

  use approx::assert_relative_eq;

  #[test]
  fn icosphere_counts() {
    for n in 0..=3 {
      let sphere = icosphere(n);
      let nfaces = 20 * 4usize.pow(n as u32);
      assert_eq!(sphere.triangles().len(), nfaces);
      // Euler characteristic 2, every face has 3 edges shared by 2 faces
      assert_eq!(sphere.nvertices(), 2 + nfaces / 2);
      for c in sphere.vertex_coords().column_iter() {
        assert_relative_eq!(c.norm(), 1.0, epsilon = 1e-12);
      }
    }
  }

  #[test]
  fn disk_counts_and_orientation() {
    for nrings in 1..=5 {
      let disk = flat_disk(nrings, 0.1);
      assert_eq!(disk.nvertices(), 1 + 3 * nrings * (nrings + 1));
      assert_eq!(disk.triangles().len(), 6 * nrings * nrings);

      let coords = disk.vertex_coords();
      for t in disk.triangles() {
        let [p0, p1, p2] = t.map(|v| coords.column(v).into_owned());
        let normal = (p1 - p0).cross(&(p2 - p0));
        assert!(normal.z > 0.0, "triangle {t:?} is not counter-clockwise");
      }
    }
  }

  #[test]
  fn disk_is_a_valid_mesh() {
    let mesh = flat_disk(6, 0.2).into_mesh().unwrap();
    assert_eq!(mesh.boundary_vertices().len(), 36);
  }
}
