/// Nominal width of a ZIP code.
pub const ZIP_WIDTH: usize = 5;

/// Left-pad a postal code with zeros to [`ZIP_WIDTH`] characters.
///
/// No validation: longer input is returned unchanged and will simply never
/// match a table key.
pub fn normalize(raw: &str) -> String {
    format!("{raw:0>ZIP_WIDTH$}")
}
