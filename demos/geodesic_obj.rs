extern crate nalgebra as na;

use heatgeo::{
  compute_geodesic, compute_geodesic_verbose,
  heat::{anchor_at, initial_conditions},
  io,
  mesh::gen,
  HeatMethodConfig, SurfaceMesh,
};

fn main() -> heatgeo::Result<()> {
  tracing_subscriber::fmt::init();

  let mesh = match std::env::var("HEATGEO_OBJ_PATH") {
    Ok(path) => {
      tracing::info!("loading {path}");
      io::read_obj(&std::fs::read_to_string(path)?)?
    }
    Err(_) => gen::icosphere(4).into_mesh()?,
  };
  tracing::info!("mesh with {} vertices, {} faces", mesh.nvertices(), mesh.nfaces());

  let source = 0;
  let initial = initial_conditions(mesh.nvertices(), &[source]);
  let config = HeatMethodConfig::default();

  std::fs::create_dir_all("out")?;
  let distances = if std::env::var_os("HEATGEO_VERBOSE").is_some() {
    let log = std::io::BufWriter::new(std::fs::File::create("out/heat_method.log")?);
    compute_geodesic_verbose(&mesh, &initial, &config, log)?
  } else {
    compute_geodesic(&mesh, &initial, &config)?
  };
  let distances = anchor_at(&distances, source);
  tracing::info!("max distance from vertex {source}: {}", distances.max());

  std::fs::write("out/geodesic_mesh.obj", io::write_obj(&mesh))?;
  std::fs::write("out/geodesic_dist.txt", io::write_vertex_scalars(&distances))?;
  std::fs::write("out/geodesic_level.obj", displaced(&mesh, &distances))?;
  Ok(())
}

/// Pushes every vertex along its averaged face normal by the scaled distance,
/// making the distance field visible in any OBJ viewer.
fn displaced(mesh: &SurfaceMesh, distances: &na::DVector<f64>) -> String {
  let scale = 0.1 / distances.amax().max(f64::EPSILON);
  let mut surface = mesh.to_surface();
  for v in 0..mesh.nvertices() {
    let normal = mesh
      .star(v)
      .iter()
      .map(|corner| mesh.face(corner.face).normal())
      .sum::<na::Vector3<f64>>()
      .try_normalize(0.0)
      .unwrap_or_else(na::Vector3::zeros);
    let mut coord = surface.vertex_coords_mut().column_mut(v);
    coord += normal * (scale * distances[v]);
  }
  io::write_surface_obj(&surface)
}
