//! Discrete operators of a triangle surface: lumped mass and cotangent Laplacian.

use crate::{
  geometry::{cotangent, edge_lengths, heron_area, semi_perimeter},
  mesh::{FacePose, SurfaceMesh},
  sparse::SparseMatrix,
  Error, Result, VertexIdx,
};

/// Area of every face, indexed by face.
pub fn face_areas(mesh: &SurfaceMesh) -> Vec<f64> {
  (0..mesh.nfaces())
    .map(|iface| heron_area(edge_lengths(mesh.face_coords(iface))))
    .collect()
}

/// Lumped mass matrix: each vertex gets a third of the area of its incident faces.
pub fn mass_matrix(mesh: &SurfaceMesh, face_areas: &[f64]) -> SparseMatrix {
  let nvertices = mesh.nvertices();
  let mut mass = SparseMatrix::zeros(nvertices, nvertices);
  for vertex in 0..nvertices {
    let area: f64 = mesh.star(vertex).iter().map(|c| face_areas[c.face]).sum();
    mass.push(vertex, vertex, area / 3.0);
  }
  mass
}

/// An edge `(center, other)` of a vertex fan with the apices of the one or two
/// triangles sharing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanEdge {
  pub other: VertexIdx,
  pub left: VertexIdx,
  /// `None` for a boundary edge.
  pub right: Option<VertexIdx>,
}

/// Walks the triangle fan around `vertex` and lists its edges in order.
///
/// A fan with boundary is first rewound to its boundary and then walked to
/// the other end of it, where both boundary edges only have a left apex.
/// Fails if the walk does not visit every face of the star exactly once.
pub fn vertex_fan(mesh: &SurfaceMesh, vertex: VertexIdx) -> Result<Vec<FanEdge>> {
  let open_fan = || Error::OpenFan { vertex };
  let nstar = mesh.star(vertex).len();
  let start = FacePose::new(mesh, mesh.incident_face(vertex), vertex).ok_or_else(open_fan)?;

  let mut first = start;
  let mut is_open = None;
  for _ in 0..nstar {
    match first.next_edge_at_vertex(mesh).across_edge(mesh) {
      None => {
        is_open = Some(true);
        break;
      }
      Some(prev) if prev == start => {
        first = start;
        is_open = Some(false);
        break;
      }
      Some(prev) => first = prev,
    }
  }
  let is_open = is_open.ok_or_else(open_fan)?;

  let mut fan = Vec::with_capacity(nstar + 1);
  if is_open {
    let behind = first.next_edge_at_vertex(mesh);
    fan.push(FanEdge {
      other: behind.other_vertex_on_edge(mesh).vertex(),
      left: behind.apex(mesh),
      right: None,
    });
  }

  let mut pose = first;
  let mut nvisited = 0;
  loop {
    nvisited += 1;
    if nvisited > nstar {
      return Err(open_fan());
    }
    let other = pose.other_vertex_on_edge(mesh).vertex();
    let left = pose.apex(mesh);
    match pose.across_edge(mesh) {
      Some(across) => {
        fan.push(FanEdge {
          other,
          left,
          right: Some(across.apex(mesh)),
        });
        pose = across.next_edge_at_vertex(mesh);
        if pose == first {
          break;
        }
      }
      None => {
        fan.push(FanEdge {
          other,
          left,
          right: None,
        });
        break;
      }
    }
  }
  if nvisited != nstar {
    return Err(open_fan());
  }
  Ok(fan)
}

/// Cotangent Laplacian.
///
/// `L[v,o] = (cot(alpha) + cot(beta)) / 2` for the angles `alpha`, `beta` opposite
/// the edge `(v,o)` and `L[v,v] = -sum_o L[v,o]`, so every row sums to zero.
/// This is negative semi-definite. Boundary edges only carry the cotangent of their
/// single triangle.
pub fn cotan_laplacian(mesh: &SurfaceMesh) -> Result<SparseMatrix> {
  let nvertices = mesh.nvertices();
  let mut laplace = SparseMatrix::zeros(nvertices, nvertices);

  let half_cotan = |apex: VertexIdx, v0: VertexIdx, v1: VertexIdx| {
    let apex = mesh.vertex_coord(apex);
    cotangent(&(mesh.vertex_coord(v0) - apex), &(mesh.vertex_coord(v1) - apex)) / 2.0
  };

  for vertex in 0..nvertices {
    let mut row_sum = 0.0;
    for edge in vertex_fan(mesh, vertex)? {
      let left = half_cotan(edge.left, edge.other, vertex);
      let right = edge
        .right
        .map_or(0.0, |right| half_cotan(right, vertex, edge.other));
      let weight = left + right;
      laplace.push(vertex, edge.other, weight);
      row_sum += weight;
    }
    laplace.push(vertex, vertex, -row_sum);
  }
  Ok(laplace)
}

/// Mean edge length, estimated from the face perimeters.
///
/// On a closed mesh every edge is shared by two faces, so there are `1.5` edges
/// per face and the semi-perimeters sum to the total edge length.
pub fn average_edge_length(mesh: &SurfaceMesh) -> f64 {
  let total: f64 = (0..mesh.nfaces())
    .map(|iface| semi_perimeter(edge_lengths(mesh.face_coords(iface))))
    .sum();
  total / (1.5 * mesh.nfaces() as f64)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::gen;

  use approx::assert_relative_eq;
  use std::f64::consts::PI;

  fn assert_zero_row_sums(laplace: &SparseMatrix) {
    let dense = laplace.to_nalgebra_dense();
    for (irow, row) in dense.row_iter().enumerate() {
      let scale = row.abs().max().max(1.0);
      assert!(row.sum().abs() <= 1e-12 * scale, "row {irow} sums to {}", row.sum());
    }
  }

  #[test]
  fn hexagon_laplacian() {
    // center vertex 0 with 6 equilateral triangles around it
    let mesh = gen::flat_disk(1, 1.0).into_mesh().unwrap();
    let laplace = cotan_laplacian(&mesh).unwrap().to_nalgebra_dense();

    let cot60 = 1.0 / 3f64.sqrt();
    assert_relative_eq!(laplace[(0, 0)], -6.0 * cot60, epsilon = 1e-12);
    for v in 1..=6 {
      assert_relative_eq!(laplace[(0, v)], cot60, epsilon = 1e-12);
      assert_relative_eq!(laplace[(v, 0)], cot60, epsilon = 1e-12);
      // boundary edges only see one triangle
      let next = 1 + v % 6;
      assert_relative_eq!(laplace[(v, next)], cot60 / 2.0, epsilon = 1e-12);
      assert_relative_eq!(laplace[(v, v)], -2.0 * cot60, epsilon = 1e-12);
    }
  }

  #[test]
  fn laplacian_rows_sum_to_zero() {
    assert_zero_row_sums(&cotan_laplacian(&gen::icosphere(3).into_mesh().unwrap()).unwrap());
    assert_zero_row_sums(&cotan_laplacian(&gen::flat_disk(8, 0.3).into_mesh().unwrap()).unwrap());
  }

  #[test]
  fn laplacian_is_symmetric() {
    for mesh in [gen::icosphere(2), gen::flat_disk(5, 1.0)] {
      let laplace = cotan_laplacian(&mesh.into_mesh().unwrap())
        .unwrap()
        .to_nalgebra_dense();
      assert_relative_eq!(laplace, laplace.transpose(), epsilon = 1e-12);
    }
  }

  #[test]
  fn laplacian_annihilates_linear_functions_on_interior() {
    let mesh = gen::flat_disk(4, 0.5).into_mesh().unwrap();
    let laplace = cotan_laplacian(&mesh).unwrap().to_nalgebra_dense();
    let f = na::DVector::from_fn(mesh.nvertices(), |v, _| {
      let p = mesh.position(v);
      2.0 * p.x - 0.5 * p.y + 1.0
    });
    let lf = laplace * f;
    let boundary = mesh.boundary_vertices();
    for v in (0..mesh.nvertices()).filter(|v| !boundary.contains(v)) {
      assert!(lf[v].abs() < 1e-12, "(L f)[{v}] = {}", lf[v]);
    }
  }

  #[test]
  fn bowtie_vertex_is_an_open_fan() {
    let coords = na::Matrix3xX::from_columns(&[
      na::Vector3::new(0.0, 0.0, 0.0),
      na::Vector3::new(1.0, 0.0, 0.0),
      na::Vector3::new(0.0, 1.0, 0.0),
      na::Vector3::new(-1.0, 0.0, 0.0),
      na::Vector3::new(0.0, -1.0, 0.0),
    ]);
    let mesh = SurfaceMesh::new(coords, vec![[0, 1, 2], [0, 3, 4]]).unwrap();
    assert!(matches!(vertex_fan(&mesh, 0), Err(Error::OpenFan { vertex: 0 })));
    assert!(matches!(cotan_laplacian(&mesh), Err(Error::OpenFan { vertex: 0 })));
    assert_eq!(vertex_fan(&mesh, 1).unwrap().len(), 2);
  }

  #[test]
  fn fan_covers_every_neighbor_once() {
    let mesh = gen::icosphere(2).into_mesh().unwrap();
    for v in 0..mesh.nvertices() {
      let fan = vertex_fan(&mesh, v).unwrap();
      assert_eq!(fan.len(), mesh.star(v).len());
      let mut others: Vec<_> = fan.iter().map(|e| e.other).collect();
      others.sort_unstable();
      others.dedup();
      assert_eq!(others.len(), fan.len());
    }
  }

  #[test]
  fn mass_sums_to_total_area() {
    let mesh = gen::icosphere(3).into_mesh().unwrap();
    let areas = face_areas(&mesh);
    let mass = mass_matrix(&mesh, &areas).try_to_diagonal().unwrap();
    assert!(mass.iter().all(|&m| m >= 0.0));
    assert_relative_eq!(mass.sum(), areas.iter().sum::<f64>(), epsilon = 1e-12);
    // close to the area of the unit sphere
    assert_relative_eq!(mass.sum(), 4.0 * PI, max_relative = 0.02);

    let hexagon = gen::flat_disk(1, 1.0).into_mesh().unwrap();
    let mass = mass_matrix(&hexagon, &face_areas(&hexagon)).try_to_diagonal().unwrap();
    let triangle_area = 3f64.sqrt() / 4.0;
    assert_relative_eq!(mass[0], 2.0 * triangle_area, epsilon = 1e-12);
    assert_relative_eq!(mass[1], 2.0 / 3.0 * triangle_area, epsilon = 1e-12);
  }

  #[test]
  fn average_edge_length_of_uniform_mesh() {
    let mesh = gen::flat_disk(1, 0.25).into_mesh().unwrap();
    assert_relative_eq!(average_edge_length(&mesh), 0.25, epsilon = 1e-12);
  }
}
