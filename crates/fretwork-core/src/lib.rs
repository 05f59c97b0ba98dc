//! Fretwork Core Types and Definitions
//!
//! This crate provides the foundational types for Fretwork fretboard
//! diagrams. It includes:
//!
//! - **Colors**: the color literals accepted by styles ([`color::Color`])
//! - **Style**: the hierarchical style cascade and its typed schema
//!   ([`style::StyleStore`], [`style::DiagramStyle`])
//! - **Geometry**: basic geometric types ([`geometry`] module)
//! - **Draw**: layered SVG output and mark shapes ([`draw`] module)

pub mod color;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod style;
