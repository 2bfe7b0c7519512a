//! Wavefront OBJ input and output.
//!
//! Only vertex positions (`v`) and triangular faces (`f`) are interpreted.
//! Texture coordinates, normals, groups and materials are skipped.

use crate::{mesh::surface::TriangleSurface3D, Error, Result, SurfaceMesh, VertexIdx};

use std::str::SplitWhitespace;

pub fn read_obj(source: &str) -> Result<SurfaceMesh> {
  parse_obj(source)?.into_mesh()
}

pub fn parse_obj(source: &str) -> Result<TriangleSurface3D> {
  let mut positions = Vec::new();
  let mut triangles = Vec::new();

  for (iline, line) in source.lines().enumerate() {
    let line_number = iline + 1;
    let err = |reason: String| Error::ObjParse {
      line: line_number,
      reason,
    };

    let line = line.split('#').next().unwrap_or_default();
    let mut tokens = line.split_whitespace();
    match tokens.next() {
      Some("v") => {
        let position = parse_position(&mut tokens).map_err(err)?;
        positions.push(position);
      }
      Some("f") => {
        let corners = tokens
          .map(|token| parse_face_index(token, positions.len()))
          .collect::<std::result::Result<Vec<_>, _>>()
          .map_err(err)?;
        let triangle: [VertexIdx; 3] = corners
          .try_into()
          .map_err(|corners: Vec<_>| err(format!("face has {} vertices", corners.len())))?;
        triangles.push(triangle);
      }
      _ => {}
    }
  }

  let coords = na::Matrix3xX::from_iterator(
    positions.len(),
    positions.iter().flat_map(|p| p.iter().copied()),
  );
  Ok(TriangleSurface3D::new(triangles, coords))
}

fn parse_position(tokens: &mut SplitWhitespace) -> std::result::Result<na::Vector3<f64>, String> {
  let mut position = na::Vector3::zeros();
  for i in 0..3 {
    let token = tokens
      .next()
      .ok_or_else(|| "vertex has fewer than 3 coordinates".to_owned())?;
    position[i] = token
      .parse()
      .map_err(|_| format!("invalid coordinate `{token}`"))?;
  }
  Ok(position)
}

/// `f` entries are 1-based, negative values count back from the last vertex.
/// Only the position part of `v/vt/vn` is used.
fn parse_face_index(token: &str, nvertices: usize) -> std::result::Result<VertexIdx, String> {
  let position = token.split('/').next().unwrap_or_default();
  let index: isize = position
    .parse()
    .map_err(|_| format!("invalid face index `{token}`"))?;
  let resolved = match index {
    0 => None,
    i if i > 0 => Some(i as usize - 1),
    i => nvertices.checked_sub(i.unsigned_abs()),
  };
  resolved.ok_or_else(|| format!("face index `{token}` does not refer to a vertex"))
}

pub fn write_obj(mesh: &SurfaceMesh) -> String {
  write_surface_obj(&mesh.to_surface())
}

pub fn write_surface_obj(surface: &TriangleSurface3D) -> String {
  let vertices = surface
    .vertex_coords()
    .column_iter()
    .map(|v| format!("v {} {} {}\n", v.x, v.y, v.z));
  // .obj uses 1-indexing.
  let faces = surface
    .triangles()
    .iter()
    .map(|t| format!("f {} {} {}\n", t[0] + 1, t[1] + 1, t[2] + 1));
  vertices.chain(faces).collect()
}

/// One value per line, in vertex order.
pub fn write_vertex_scalars(values: &na::DVector<f64>) -> String {
  values.iter().map(|v| format!("{v}\n")).collect()
}
