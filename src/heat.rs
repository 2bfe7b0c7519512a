//! The heat method pipeline.
//!
//! mesh -> {M, L} -> h -> heat = (M - t L)^-1 u0 -> X = -grad heat / |grad heat|
//! -> div X -> distance = (eps I - L)^-1 (-div X)

use crate::{
  error::LinearSystem,
  field::{self, VectorField},
  linalg::FaerCholesky,
  operators,
  report::Report,
  Error, Result, SurfaceMesh, VertexIdx,
};

use std::io::Write;

/// Discretization of the gradient and divergence steps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GradientScheme {
  /// Piecewise linear gradient on faces with the matching cotangent divergence.
  #[default]
  PerFace,
  /// One vector per vertex accumulated over the vertex star, see
  /// [`field::vertex_gradient`]. Distances computed with it are not accurate.
  VertexStar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatMethodConfig {
  /// Diffusion time in units of the squared average edge length.
  pub time_multiplier: f64,
  /// Multiple of the identity added to make the Poisson system definite.
  pub regularization: f64,
  pub gradient: GradientScheme,
}
impl Default for HeatMethodConfig {
  fn default() -> Self {
    Self {
      time_multiplier: 1.0,
      regularization: 1e-6,
      gradient: GradientScheme::default(),
    }
  }
}
impl HeatMethodConfig {
  pub fn with_time_multiplier(mut self, m: f64) -> Self {
    self.time_multiplier = m;
    self
  }
  pub fn with_regularization(mut self, epsilon: f64) -> Self {
    self.regularization = epsilon;
    self
  }
  pub fn with_gradient(mut self, gradient: GradientScheme) -> Self {
    self.gradient = gradient;
    self
  }
}

/// Unit heat at every source, zero elsewhere. Repeated sources add up.
pub fn initial_conditions(nvertices: usize, sources: &[VertexIdx]) -> na::DVector<f64> {
  let mut initial = na::DVector::zeros(nvertices);
  for &source in sources {
    initial[source] += 1.0;
  }
  initial
}

/// Shifts the distances such that `source` is at zero.
pub fn anchor_at(distances: &na::DVector<f64>, source: VertexIdx) -> na::DVector<f64> {
  distances.add_scalar(-distances[source])
}

/// `t = m h^2` for the average edge length `h`.
pub fn diffusion_timestep(mesh: &SurfaceMesh, time_multiplier: f64) -> f64 {
  time_multiplier * operators::average_edge_length(mesh).powi(2)
}

/// Backward Euler step of the heat equation: `M - t L`.
pub fn heat_system(
  mass: &nas::CscMatrix<f64>,
  laplace: &nas::CscMatrix<f64>,
  timestep: f64,
) -> nas::CscMatrix<f64> {
  let diffusion = laplace * timestep;
  mass - &diffusion
}

/// Regularized negative Laplacian `eps I - L`.
///
/// `L` is negative semi-definite with the constants as kernel,
/// so adding `eps I` on this side makes the system positive definite.
pub fn poisson_system(laplace: &nas::CscMatrix<f64>, epsilon: f64) -> nas::CscMatrix<f64> {
  let identity = &nas::CscMatrix::identity(laplace.nrows()) * epsilon;
  &identity - laplace
}

pub fn solve_heat_flow(
  mass: &nas::CscMatrix<f64>,
  laplace: &nas::CscMatrix<f64>,
  timestep: f64,
  initial_conditions: &na::DVector<f64>,
) -> Result<na::DVector<f64>> {
  let system = heat_system(mass, laplace, timestep);
  solve_spd(system, LinearSystem::Heat, initial_conditions)
}

/// Solves `L phi = div` through the regularized system, `phi` is determined up
/// to a constant.
pub fn solve_geodesic(
  laplace: &nas::CscMatrix<f64>,
  divergence: &na::DVector<f64>,
  epsilon: f64,
) -> Result<na::DVector<f64>> {
  let system = poisson_system(laplace, epsilon);
  solve_spd(system, LinearSystem::Poisson, &-divergence)
}

fn solve_spd(
  matrix: nas::CscMatrix<f64>,
  system: LinearSystem,
  rhs: &na::DVector<f64>,
) -> Result<na::DVector<f64>> {
  let solution = FaerCholesky::new(matrix, system)?.solve(rhs);
  if solution.iter().any(|x| !x.is_finite()) {
    return Err(Error::NotPositiveDefinite {
      system,
      reason: "solution is not finite".to_owned(),
    });
  }
  Ok(solution)
}

/// Geodesic distance from the heat sources in `initial_conditions`.
///
/// The result is defined up to an additive constant, see [`anchor_at`].
pub fn compute_geodesic(
  mesh: &SurfaceMesh,
  initial_conditions: &na::DVector<f64>,
  config: &HeatMethodConfig,
) -> Result<na::DVector<f64>> {
  run(mesh, initial_conditions, config, &mut Report::silent())
}

/// Same as [`compute_geodesic`], additionally writing every intermediate matrix
/// and field to `sink`.
pub fn compute_geodesic_verbose<W: Write>(
  mesh: &SurfaceMesh,
  initial_conditions: &na::DVector<f64>,
  config: &HeatMethodConfig,
  sink: W,
) -> Result<na::DVector<f64>> {
  run(mesh, initial_conditions, config, &mut Report::new(sink))
}

fn run<W: Write>(
  mesh: &SurfaceMesh,
  initial_conditions: &na::DVector<f64>,
  config: &HeatMethodConfig,
  report: &mut Report<W>,
) -> Result<na::DVector<f64>> {
  let nvertices = mesh.nvertices();
  if initial_conditions.len() != nvertices {
    return Err(Error::DimensionMismatch {
      expected: nvertices,
      found: initial_conditions.len(),
    });
  }
  let _span = tracing::debug_span!("heat_method", nvertices, nfaces = mesh.nfaces()).entered();

  report.stage("Computing Mass")?;
  let face_areas = operators::face_areas(mesh);
  let mass = operators::mass_matrix(mesh, &face_areas).to_nalgebra_csc();
  report.sparse_matrix(&mass)?;

  report.stage("Computing Cotan")?;
  let laplace = operators::cotan_laplacian(mesh)?.to_nalgebra_csc();
  report.sparse_matrix(&laplace)?;

  report.stage("Computing Edge Length")?;
  report.value("Average Edge", operators::average_edge_length(mesh))?;
  let timestep = diffusion_timestep(mesh, config.time_multiplier);
  report.value("Timestep", timestep)?;
  let system = heat_system(&mass, &laplace, timestep);
  report.sparse_matrix(&system)?;

  report.stage("Solving Heat Flow")?;
  let heat = solve_spd(system, LinearSystem::Heat, initial_conditions)?;
  report.scalar_field(&heat)?;

  let divergence = match config.gradient {
    GradientScheme::PerFace => {
      report.stage("Computing Face Gradient")?;
      let gradient = field::face_gradient(mesh, &face_areas, &heat);
      report.vector_field(&gradient)?;

      report.stage("Normalizing Gradient")?;
      let normalized = field::normalize_field(&negated(&gradient));
      report.vector_field(&normalized)?;

      report.stage("Computing Divergence")?;
      field::face_divergence(mesh, &normalized)
    }
    GradientScheme::VertexStar => {
      report.stage("Computing Vertex Gradient")?;
      let gradient = field::vertex_gradient(mesh, &face_areas, &heat);
      report.vector_field(&gradient)?;

      report.stage("Normalizing Gradient")?;
      let normalized = field::normalize_field(&negated(&gradient));
      report.vector_field(&normalized)?;

      report.stage("Computing Divergence")?;
      field::vertex_divergence(mesh, &normalized)
    }
  };
  report.scalar_field(&divergence)?;

  report.stage("Solving Poisson")?;
  let system = poisson_system(&laplace, config.regularization);
  report.sparse_matrix(&system)?;
  let distance = solve_spd(system, LinearSystem::Poisson, &-divergence)?;
  report.scalar_field(&distance)?;

  Ok(distance)
}

fn negated(field: &[na::Vector3<f64>]) -> VectorField {
  field.iter().map(|v| -v).collect()
}
