//! Arena-indexed triangle surface.
//!
//! Vertices and faces are identified by dense indices. The vertex stars and the
//! face-face adjacency are computed once on construction and are read-only
//! afterwards, the numerical operators only ever borrow the mesh.

pub mod gen;
pub mod pose;
pub mod surface;

pub use pose::FacePose;
pub use surface::TriangleSurface3D;

use crate::{geometry::to_vector3, Error, FaceIdx, Result, VertexIdx};

use itertools::Itertools;
use std::collections::{hash_map::Entry, HashMap};

/// A corner of a face: the `local`-th vertex of `face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
  pub face: FaceIdx,
  pub local: usize,
}

/// Edge `edge` of face `face`, running from `vertices[edge]` to `vertices[edge + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceEdge {
  pub face: FaceIdx,
  pub edge: usize,
}

#[derive(Debug, Clone)]
pub struct Face {
  vertices: [VertexIdx; 3],
  normal: na::Vector3<f64>,
  /// `neighbors[k]` is the face across edge `k`, `None` on the boundary.
  neighbors: [Option<FaceEdge>; 3],
}
impl Face {
  /// Vertices in counter-clockwise order.
  pub fn vertices(&self) -> [VertexIdx; 3] {
    self.vertices
  }
  pub fn vertex(&self, local: usize) -> VertexIdx {
    self.vertices[local % 3]
  }
  /// Unit normal. Zero for degenerate faces.
  pub fn normal(&self) -> &na::Vector3<f64> {
    &self.normal
  }
  pub fn neighbor(&self, edge: usize) -> Option<FaceEdge> {
    self.neighbors[edge]
  }
  pub fn local_index(&self, vertex: VertexIdx) -> Option<usize> {
    self.vertices.iter().position(|&v| v == vertex)
  }
  /// Endpoints of edge `edge`.
  pub fn edge_vertices(&self, edge: usize) -> [VertexIdx; 2] {
    [self.vertex(edge), self.vertex(edge + 1)]
  }
}

/// A consistently oriented 2-manifold triangle mesh embedded in 3D.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
  positions: Vec<na::Point3<f64>>,
  faces: Vec<Face>,
  /// Incident faces of every vertex.
  stars: Vec<Vec<Corner>>,
}

impl SurfaceMesh {
  pub fn new(coords: na::Matrix3xX<f64>, triangles: Vec<[VertexIdx; 3]>) -> Result<Self> {
    if triangles.is_empty() {
      return Err(Error::EmptyMesh);
    }
    let nvertices = coords.ncols();
    let positions: Vec<_> = coords.column_iter().map(|c| na::Point3::from(c.into_owned())).collect();

    let mut stars = vec![Vec::new(); nvertices];
    for (face, triangle) in triangles.iter().enumerate() {
      for (local, &vertex) in triangle.iter().enumerate() {
        if vertex >= nvertices {
          return Err(Error::VertexOutOfBounds { face, vertex });
        }
        stars[vertex].push(Corner { face, local });
      }
    }
    if let Some(vertex) = stars.iter().position(|star| star.is_empty()) {
      return Err(Error::IsolatedVertex { vertex });
    }

    let nfaces_per_edge = triangles
      .iter()
      .flat_map(|t| (0..3).map(move |k| sorted_edge(t[k], t[(k + 1) % 3])))
      .counts();
    if let Some((&edge, _)) = nfaces_per_edge.iter().find(|&(_, &n)| n > 2) {
      return Err(Error::NonManifoldEdge { edge });
    }

    let mut half_edges = HashMap::new();
    for (face, triangle) in triangles.iter().enumerate() {
      for edge in 0..3 {
        let directed = (triangle[edge], triangle[(edge + 1) % 3]);
        match half_edges.entry(directed) {
          Entry::Vacant(slot) => {
            slot.insert(FaceEdge { face, edge });
          }
          Entry::Occupied(_) => {
            return Err(Error::InconsistentOrientation {
              edge: sorted_edge(directed.0, directed.1),
            })
          }
        }
      }
    }

    let faces = triangles
      .iter()
      .enumerate()
      .map(|(iface, &vertices)| {
        let neighbors =
          [0, 1, 2].map(|k| half_edges.get(&(vertices[(k + 1) % 3], vertices[k])).copied());
        let [p0, p1, p2] = vertices.map(|v| to_vector3(&positions[v]));
        let normal = (p1 - p0)
          .cross(&(p2 - p0))
          .try_normalize(0.0)
          .unwrap_or_else(|| {
            tracing::warn!("face {iface} is degenerate, its normal is set to zero");
            na::Vector3::zeros()
          });
        Face {
          vertices,
          normal,
          neighbors,
        }
      })
      .collect();

    Ok(Self {
      positions,
      faces,
      stars,
    })
  }

  pub fn nvertices(&self) -> usize {
    self.positions.len()
  }
  pub fn nfaces(&self) -> usize {
    self.faces.len()
  }
  pub fn position(&self, vertex: VertexIdx) -> &na::Point3<f64> {
    &self.positions[vertex]
  }
  pub fn vertex_coord(&self, vertex: VertexIdx) -> na::Vector3<f64> {
    to_vector3(&self.positions[vertex])
  }
  pub fn faces(&self) -> &[Face] {
    &self.faces
  }
  pub fn face(&self, face: FaceIdx) -> &Face {
    &self.faces[face]
  }
  /// Vertex coordinates of a face, in face order.
  pub fn face_coords(&self, face: FaceIdx) -> [na::Vector3<f64>; 3] {
    self.faces[face].vertices.map(|v| self.vertex_coord(v))
  }
  /// All faces incident to `vertex`, together with the local index of `vertex`.
  pub fn star(&self, vertex: VertexIdx) -> &[Corner] {
    &self.stars[vertex]
  }
  /// One incident face, where fan walks around `vertex` start.
  pub fn incident_face(&self, vertex: VertexIdx) -> FaceIdx {
    // construction rejects isolated vertices
    self.stars[vertex][0].face
  }

  pub fn has_boundary(&self) -> bool {
    self
      .faces
      .iter()
      .any(|f| f.neighbors.iter().any(Option::is_none))
  }

  /// The vertices lying on a boundary edge, in no particular order.
  pub fn boundary_vertices(&self) -> Vec<VertexIdx> {
    self
      .faces
      .iter()
      .flat_map(|f| {
        (0..3)
          .filter(move |&k| f.neighbors[k].is_none())
          .flat_map(move |k| f.edge_vertices(k))
      })
      .unique()
      .collect()
  }

  pub fn to_surface(&self) -> TriangleSurface3D {
    let coords = na::Matrix3xX::from_columns(
      &self.positions.iter().map(to_vector3).collect::<Vec<_>>(),
    );
    let triangles = self.faces.iter().map(|f| f.vertices).collect();
    TriangleSurface3D::new(triangles, coords)
  }
}

fn sorted_edge(a: VertexIdx, b: VertexIdx) -> [VertexIdx; 2] {
  if a < b {
    [a, b]
  } else {
    [b, a]
  }
}

#[cfg(test)]
mod test {
  use super::{gen, SurfaceMesh};
  use crate::Error;

  fn coords(n: usize) -> na::Matrix3xX<f64> {
    na::Matrix3xX::from_fn(n, |r, c| if r == c % 3 { 1.0 + c as f64 } else { 0.0 })
  }

  #[test]
  fn rejects_malformed_input() {
    assert!(matches!(SurfaceMesh::new(coords(3), vec![]), Err(Error::EmptyMesh)));
    assert!(matches!(
      SurfaceMesh::new(coords(3), vec![[0, 1, 3]]),
      Err(Error::VertexOutOfBounds { face: 0, vertex: 3 })
    ));
    assert!(matches!(
      SurfaceMesh::new(coords(4), vec![[0, 1, 2]]),
      Err(Error::IsolatedVertex { vertex: 3 })
    ));
    assert!(matches!(
      SurfaceMesh::new(coords(5), vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]]),
      Err(Error::NonManifoldEdge { edge: [0, 1] })
    ));
    assert!(matches!(
      SurfaceMesh::new(coords(4), vec![[0, 1, 2], [0, 1, 3]]),
      Err(Error::InconsistentOrientation { edge: [0, 1] })
    ));
  }

  #[test]
  fn face_adjacency_is_symmetric() {
    let mesh = gen::icosphere(2).into_mesh().unwrap();
    assert!(!mesh.has_boundary());
    for (iface, face) in mesh.faces().iter().enumerate() {
      for k in 0..3 {
        let across = face.neighbor(k).unwrap();
        let back = mesh.face(across.face).neighbor(across.edge).unwrap();
        assert_eq!(back.face, iface);
        assert_eq!(back.edge, k);

        let mut shared = face.edge_vertices(k);
        shared.reverse();
        assert_eq!(mesh.face(across.face).edge_vertices(across.edge), shared);
      }
    }
  }

  #[test]
  fn stars_and_normals() {
    let mesh = gen::icosphere(1).into_mesh().unwrap();
    let nstar_total: usize = (0..mesh.nvertices()).map(|v| mesh.star(v).len()).sum();
    assert_eq!(nstar_total, 3 * mesh.nfaces());
    for v in 0..mesh.nvertices() {
      for corner in mesh.star(v) {
        assert_eq!(mesh.face(corner.face).vertex(corner.local), v);
      }
    }
    // outward normals on the unit sphere
    for iface in 0..mesh.nfaces() {
      let [p0, p1, p2] = mesh.face_coords(iface);
      let centroid = (p0 + p1 + p2) / 3.0;
      let normal = mesh.face(iface).normal();
      approx::assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
      assert!(normal.dot(&centroid) > 0.0);
    }
  }

  #[test]
  fn disk_boundary() {
    let nrings = 4;
    let mesh = gen::flat_disk(nrings, 0.5).into_mesh().unwrap();
    assert!(mesh.has_boundary());
    let mut boundary = mesh.boundary_vertices();
    boundary.sort_unstable();
    let expected: Vec<_> = (mesh.nvertices() - 6 * nrings..mesh.nvertices()).collect();
    assert_eq!(boundary, expected);
  }
}
