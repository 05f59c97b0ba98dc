use crate::export::Exporter;

/// XAML exporter. Rendering is not implemented.
#[derive(Debug, Default, Clone, Copy)]
pub struct Xaml;

impl Exporter for Xaml {
    fn format_name(&self) -> &'static str {
        "XAML"
    }
}
