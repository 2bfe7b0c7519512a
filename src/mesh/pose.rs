use super::SurfaceMesh;
use crate::{FaceIdx, VertexIdx};

/// A cursor on a (face, edge, vertex) flag of a [`SurfaceMesh`].
///
/// The vertex always lies on the edge and the edge always belongs to the face.
/// Each move changes exactly one of the three and is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacePose {
  face: FaceIdx,
  edge: usize,
  vertex: VertexIdx,
}

impl FacePose {
  /// Pose at `vertex` on the edge of `face` that starts at `vertex`.
  pub fn new(mesh: &SurfaceMesh, face: FaceIdx, vertex: VertexIdx) -> Option<Self> {
    let edge = mesh.face(face).local_index(vertex)?;
    Some(Self { face, edge, vertex })
  }

  pub fn face(&self) -> FaceIdx {
    self.face
  }
  pub fn edge(&self) -> usize {
    self.edge
  }
  pub fn vertex(&self) -> VertexIdx {
    self.vertex
  }

  /// Moves to the other endpoint of the current edge.
  pub fn other_vertex_on_edge(self, mesh: &SurfaceMesh) -> Self {
    let [a, b] = mesh.face(self.face).edge_vertices(self.edge);
    let vertex = if self.vertex == a { b } else { a };
    Self { vertex, ..self }
  }

  /// Moves to the other edge of the current face incident to the current vertex.
  pub fn next_edge_at_vertex(self, mesh: &SurfaceMesh) -> Self {
    let face = mesh.face(self.face);
    let edge = if face.vertex(self.edge) == self.vertex {
      (self.edge + 2) % 3
    } else {
      (self.edge + 1) % 3
    };
    Self { edge, ..self }
  }

  /// Moves to the face on the other side of the current edge.
  /// Returns `None` on a boundary edge.
  pub fn across_edge(self, mesh: &SurfaceMesh) -> Option<Self> {
    let across = mesh.face(self.face).neighbor(self.edge)?;
    Some(Self {
      face: across.face,
      edge: across.edge,
      vertex: self.vertex,
    })
  }

  /// The vertex of the current face not on the current edge.
  pub fn apex(&self, mesh: &SurfaceMesh) -> VertexIdx {
    mesh.face(self.face).vertex(self.edge + 2)
  }
}

#[cfg(test)]
mod test {
  use super::FacePose;
  use crate::mesh::gen;

  #[test]
  fn moves_are_involutions() {
    let mesh = gen::icosphere(1).into_mesh().unwrap();
    for face in 0..mesh.nfaces() {
      for vertex in mesh.face(face).vertices() {
        let pose = FacePose::new(&mesh, face, vertex).unwrap();
        let v = pose.other_vertex_on_edge(&mesh);
        assert_ne!(v.vertex(), pose.vertex());
        assert_eq!(v.other_vertex_on_edge(&mesh), pose);

        let e = pose.next_edge_at_vertex(&mesh);
        assert_ne!(e.edge(), pose.edge());
        assert_eq!(e.next_edge_at_vertex(&mesh), pose);

        let f = pose.across_edge(&mesh).unwrap();
        assert_ne!(f.face(), pose.face());
        assert_eq!(f.across_edge(&mesh), Some(pose));
        assert!(mesh.face(f.face()).local_index(vertex).is_some());
      }
    }
  }

  #[test]
  fn rotation_closes_after_star() {
    let mesh = gen::icosphere(2).into_mesh().unwrap();
    for vertex in 0..mesh.nvertices() {
      let start = FacePose::new(&mesh, mesh.incident_face(vertex), vertex).unwrap();
      let mut pose = start;
      let mut nsteps = 0;
      loop {
        pose = pose.across_edge(&mesh).unwrap().next_edge_at_vertex(&mesh);
        nsteps += 1;
        if pose == start {
          break;
        }
        assert!(nsteps <= mesh.star(vertex).len());
      }
      assert_eq!(nsteps, mesh.star(vertex).len());
    }
  }

  #[test]
  fn apex_is_opposite_the_edge() {
    let mesh = gen::flat_disk(2, 1.0).into_mesh().unwrap();
    for face in 0..mesh.nfaces() {
      for vertex in mesh.face(face).vertices() {
        let pose = FacePose::new(&mesh, face, vertex).unwrap();
        let apex = pose.apex(&mesh);
        assert_ne!(apex, pose.vertex());
        assert_ne!(apex, pose.other_vertex_on_edge(&mesh).vertex());
      }
    }
  }
}
