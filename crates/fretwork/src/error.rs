//! Error types for Fretwork operations.
//!
//! This module provides the main error type [`FretworkError`] which wraps
//! the error conditions of diagram editing, XML I/O and rendering.

use std::io;

use thiserror::Error;

use fretwork_core::style::StyleError;

/// The main error type for Fretwork operations.
///
/// Every editing operation validates before it mutates, so an error always
/// leaves the diagram exactly as it was.
///
/// # Diagnostic Variants
///
/// The `Xml` variant keeps the source text next to the parser error so the
/// failing position can be shown in context.
#[derive(Debug, Error)]
pub enum FretworkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("{what} {value} is out of range, expected {expected}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        expected: &'static str,
    },

    #[error("Cannot resize diagram to {strings} strings and {frets} frets: {reason}")]
    CantResizeDiagram {
        strings: u32,
        frets: u32,
        reason: String,
    },

    #[error("An element already exists at {0}")]
    ElementAlreadyExistsAtPosition(String),

    #[error("Position {0} is off the fretboard")]
    ElementPositionOffFretboard(String),

    #[error("No element found at {0}")]
    ElementNotFound(String),

    #[error("XML error: {err}")]
    Xml { err: roxmltree::Error, src: String },

    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for FretworkError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl FretworkError {
    /// Create a new `Xml` error with the associated source text.
    pub fn new_xml_error(err: roxmltree::Error, src: impl Into<String>) -> Self {
        Self::Xml {
            err,
            src: src.into(),
        }
    }
}
