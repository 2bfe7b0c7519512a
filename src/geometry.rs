//! Small vector helpers on embedded triangles.

/// Position vector of a stored point.
pub fn to_vector3(point: &na::Point3<f64>) -> na::Vector3<f64> {
  point.coords
}

/// Cotangent of the angle between `v0` and `v1`.
///
/// Parallel vectors (degenerate triangles) give an infinite or NaN value,
/// which is passed on to the caller.
pub fn cotangent(v0: &na::Vector3<f64>, v1: &na::Vector3<f64>) -> f64 {
  v0.dot(v1) / v0.cross(v1).norm()
}

/// Edge lengths `[|p1-p0|, |p2-p0|, |p2-p1|]`.
pub fn edge_lengths(p: [na::Vector3<f64>; 3]) -> [f64; 3] {
  [(p[1] - p[0]).norm(), (p[2] - p[0]).norm(), (p[2] - p[1]).norm()]
}

pub fn semi_perimeter(lengths: [f64; 3]) -> f64 {
  lengths.iter().sum::<f64>() / 2.0
}

/// Area of a triangle from its edge lengths (Heron's formula).
///
/// Rounding on needle triangles can make the radicand slightly negative,
/// it is clamped to zero.
pub fn heron_area(lengths: [f64; 3]) -> f64 {
  let s = semi_perimeter(lengths);
  let [e0, e1, e2] = lengths;
  (s * (s - e0) * (s - e1) * (s - e2)).max(0.0).sqrt()
}
