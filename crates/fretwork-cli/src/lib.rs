//! CLI logic for the Fretwork diagram tool.
//!
//! Reads a diagram XML file, applies the discovered configuration and either
//! writes the rendered SVG or prints the colors the diagram uses.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io};

use log::info;

use fretwork::{DiagramBuilder, FretworkError};

/// Run the Fretwork CLI application
///
/// The color report, when requested, is printed to standard output.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `FretworkError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - XML errors
/// - Invalid diagrams
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), FretworkError> {
    run_with_output(args, &mut io::stdout().lock())
}

/// Run the Fretwork CLI application, writing any report to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_output(args: &Args, out: &mut dyn io::Write) -> Result<(), FretworkError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config)?;
    let diagram = builder.load_xml(&source)?;

    if args.colors {
        let colors = builder.colors_in_use(&diagram)?;
        for color in &colors {
            writeln!(out, "{color}")?;
        }
        info!(count = colors.len(); "Color report written");
        return Ok(());
    }

    let svg = builder.render_svg(&diagram)?;
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
