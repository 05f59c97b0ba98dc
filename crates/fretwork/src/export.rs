//! Export functionality for Fretwork diagrams.
//!
//! This module provides the [`Exporter`] trait that turns a [`Diagram`] into
//! an output format. Rendering itself is pure; only
//! [`Exporter::export_diagram`] touches a writer.
//!
//! # Available Backends
//!
//! - [`svg`]: SVG 1.1 output via [`svg::Svg`]
//! - [`xaml`]: placeholder, every operation returns [`Error::Render`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`FretworkError::Export`] at the crate
//! boundary. Style resolution failures pass through as
//! [`FretworkError::Style`].

/// SVG export backend.
pub mod svg;

/// XAML export backend.
pub mod xaml;

use std::io;

use crate::{diagram::Diagram, error::FretworkError};

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Human readable name of the output format.
    fn format_name(&self) -> &'static str;

    /// Render `diagram` to the backend's output format.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`Error::Render`] for backends
    /// that cannot render yet.
    fn render_diagram(&self, _diagram: &Diagram) -> Result<String, FretworkError> {
        Err(Error::Render(format!("{} export not implemented", self.format_name())).into())
    }

    /// Render `diagram` and write the result to `writer`.
    ///
    /// # Errors
    ///
    /// Returns the rendering error, or [`Error::Io`] if writing fails.
    fn export_diagram(
        &self,
        diagram: &Diagram,
        writer: &mut dyn io::Write,
    ) -> Result<(), FretworkError> {
        let output = self.render_diagram(diagram)?;
        writer.write_all(output.as_bytes()).map_err(Error::Io)?;
        writer.flush().map_err(Error::Io)?;
        Ok(())
    }
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
