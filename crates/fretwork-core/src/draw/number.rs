use ryu_js::Buffer;

/// Number of decimals kept in emitted coordinates and style values.
const DECIMALS: f64 = 1e3;

/// Format `value` for SVG and XML output.
///
/// The value is rounded to three decimals and written with `.` as the decimal
/// separator, without thousands separators and without a trailing `.0`.
/// Non-finite values are written as `0`.
///
/// ```
/// # use fretwork_core::draw::format_number;
/// assert_eq!(format_number(30.0), "30");
/// assert_eq!(format_number(0.1 + 0.2), "0.3");
/// assert_eq!(format_number(-0.0001), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut rounded = (value * DECIMALS).round() / DECIMALS;
    if rounded == -0.0 {
        rounded = 0.0;
    }
    Buffer::new().format_finite(rounded).to_string()
}
