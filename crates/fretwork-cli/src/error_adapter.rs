//! Error adapter for converting FretworkError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. XML syntax errors
//! carry their source text and are shown with a labeled snippet; every other
//! error is reported with a code per variant.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use fretwork::FretworkError;

/// Adapter for an XML syntax error with its source text.
pub struct XmlDiagnosticAdapter<'a> {
    /// The parser's message
    message: String,
    /// 1-based row and column of the failure
    row: u32,
    col: u32,
    /// Source text for displaying snippets
    src: &'a str,
}

impl<'a> XmlDiagnosticAdapter<'a> {
    /// Create a new adapter for an error at `row`, `col` in `src`.
    pub fn new(message: impl Into<String>, row: u32, col: u32, src: &'a str) -> Self {
        Self {
            message: message.into(),
            row,
            col,
            src,
        }
    }

    fn span(&self) -> SourceSpan {
        SourceSpan::new(text_pos_to_offset(self.src, self.row, self.col).into(), 0)
    }
}

impl fmt::Debug for XmlDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDiagnosticAdapter")
            .field("message", &self.message)
            .field("row", &self.row)
            .field("col", &self.col)
            .finish()
    }
}

impl fmt::Display for XmlDiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for XmlDiagnosticAdapter<'_> {}

impl MietteDiagnostic for XmlDiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("fretwork::xml"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), self.span()),
        )))
    }
}

/// Adapter for [`FretworkError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a FretworkError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            FretworkError::Io(_) => "fretwork::io",
            FretworkError::Style(_) => "fretwork::style",
            FretworkError::OutOfRange { .. } => "fretwork::out_of_range",
            FretworkError::CantResizeDiagram { .. } => "fretwork::cant_resize",
            FretworkError::ElementAlreadyExistsAtPosition(_) => "fretwork::element_exists",
            FretworkError::ElementPositionOffFretboard(_) => "fretwork::off_fretboard",
            FretworkError::ElementNotFound(_) => "fretwork::element_not_found",
            FretworkError::Xml { .. } => "fretwork::xml",
            FretworkError::MalformedXml(_) => "fretwork::malformed_xml",
            FretworkError::Config(_) => "fretwork::config",
            FretworkError::Export(_) => "fretwork::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            FretworkError::MalformedXml(_) => {
                "a diagram needs `strings` and `frets` attributes on its <diagram> root"
            }
            FretworkError::Config(_) => "check the configuration file passed with --config",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// An XML syntax error with source location information.
    Xml(XmlDiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Xml(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Xml(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Xml(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Xml(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Xml(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Xml(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Byte offset of a 1-based row and column (in characters) in `src`.
///
/// Positions past the end of a line clamp to the line end, positions past
/// the last line to the end of the text.
fn text_pos_to_offset(src: &str, row: u32, col: u32) -> usize {
    let mut offset = 0;
    for (index, line) in src.split_inclusive('\n').enumerate() {
        if index + 1 == row as usize {
            let content = line.trim_end_matches(['\n', '\r']);
            let column = content
                .char_indices()
                .nth(col.saturating_sub(1) as usize)
                .map_or(content.len(), |(byte, _)| byte);
            return offset + column;
        }
        offset += line.len();
    }
    src.len()
}

/// Convert a [`FretworkError`] into a list of reportable errors.
pub fn to_reportables(err: &FretworkError) -> Vec<Reportable<'_>> {
    match err {
        FretworkError::Xml { err: xml_err, src } => {
            let pos = xml_err.pos();
            vec![Reportable::Xml(XmlDiagnosticAdapter::new(
                xml_err.to_string(),
                pos.row,
                pos.col,
                src,
            ))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
