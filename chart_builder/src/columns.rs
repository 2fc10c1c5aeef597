use crate::config::{BuildError, Grid};

/// The values of the column selectors that mean "no column".
pub const UNSELECTED: [&str; 3] = ["[None]", "[Required]", "Please select"];

/// Normalizes a column selection: empty names and placeholders become `None`.
pub fn selected(name: Option<&str>) -> Option<&str> {
    match name {
        Some(n) if !n.trim().is_empty() && !UNSELECTED.contains(&n.trim()) => Some(n),
        _ => None,
    }
}

/// Finds the position of a column.
///
/// `headers_lower` must already be trimmed and lowercased. Returns `None` for
/// an empty name or a name that is not among the headers.
pub fn index_of_column_named(headers_lower: &[String], name: Option<&str>) -> Option<usize> {
    let name = name?.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }
    headers_lower.iter().position(|h| *h == name)
}

/// The content of a cell, or an empty string for cells past the end of a
/// short row.
pub fn cell<R: AsRef<[String]>>(row: &R, index: usize) -> &str {
    row.as_ref().get(index).map(|s| s.as_str()).unwrap_or("")
}

/// Resolves a column that must be mapped and present.
pub(crate) fn required_column(
    grid: &Grid,
    headers_lower: &[String],
    name: Option<&str>,
    setting: &str,
) -> Result<usize, BuildError> {
    let name = selected(name).ok_or_else(|| BuildError::MissingSetting(setting.to_string()))?;
    index_of_column_named(headers_lower, Some(name)).ok_or_else(|| {
        log::debug!(
            "required_column: {:?} not in headers {:?}",
            name,
            grid.header()
        );
        BuildError::UnknownColumn(name.to_string())
    })
}

/// Resolves a column that may be left unmapped. A mapped column that is not
/// present is still an error.
pub(crate) fn optional_column(
    headers_lower: &[String],
    name: Option<&str>,
) -> Result<Option<usize>, BuildError> {
    match selected(name) {
        None => Ok(None),
        Some(n) => index_of_column_named(headers_lower, Some(n))
            .map(Some)
            .ok_or_else(|| BuildError::UnknownColumn(n.to_string())),
    }
}
