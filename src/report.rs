//! Plain-text dump of the intermediate results of a heat method solve.

use std::io::{self, Write};

/// Writes pipeline intermediates to a sink, or nothing at all when silent.
pub struct Report<W> {
  sink: Option<W>,
}

impl Report<io::Sink> {
  pub fn silent() -> Self {
    Self { sink: None }
  }
}

impl<W: Write> Report<W> {
  pub fn new(sink: W) -> Self {
    Self { sink: Some(sink) }
  }

  pub fn is_silent(&self) -> bool {
    self.sink.is_none()
  }

  pub fn into_inner(self) -> Option<W> {
    self.sink
  }

  pub fn stage(&mut self, title: &str) -> io::Result<()> {
    tracing::debug!("{title}");
    match &mut self.sink {
      Some(sink) => writeln!(sink, "{title}..."),
      None => Ok(()),
    }
  }

  pub fn value(&mut self, label: &str, value: f64) -> io::Result<()> {
    tracing::debug!("{label}: {value}");
    match &mut self.sink {
      Some(sink) => writeln!(sink, "{label}: {value}"),
      None => Ok(()),
    }
  }

  /// One `(row,col) = value` line per stored entry, column by column.
  pub fn sparse_matrix(&mut self, matrix: &nas::CscMatrix<f64>) -> io::Result<()> {
    let Some(sink) = &mut self.sink else {
      return Ok(());
    };
    for (r, c, v) in matrix.triplet_iter() {
      writeln!(sink, "({r},{c}) = {v}")?;
    }
    Ok(())
  }

  pub fn scalar_field(&mut self, field: &na::DVector<f64>) -> io::Result<()> {
    let Some(sink) = &mut self.sink else {
      return Ok(());
    };
    for v in field.iter() {
      writeln!(sink, "{v}")?;
    }
    Ok(())
  }

  pub fn vector_field(&mut self, field: &[na::Vector3<f64>]) -> io::Result<()> {
    let Some(sink) = &mut self.sink else {
      return Ok(());
    };
    for v in field {
      writeln!(sink, "{} {} {}", v.x, v.y, v.z)?;
    }
    Ok(())
  }
}
