use log::{debug, info};

use std::collections::{HashMap, HashSet};

use crate::columns::{cell, index_of_column_named, selected};
use crate::config::{Grid, ValidationError};
use crate::ordering::unique_maintain_order;

/// True if every row has as many cells as the header.
pub fn is_rectangular(grid: &Grid) -> bool {
    let width = grid.header().len();
    grid.rows().iter().all(|r| r.len() == width)
}

/// True if one of the headers contains `substr` (case-insensitive).
pub fn has_header(substr: &str, grid: &Grid) -> bool {
    find_header(substr, grid).is_some()
}

/// The first header containing `substr` (case-insensitive), as written in
/// the data.
pub fn find_header(substr: &str, grid: &Grid) -> Option<String> {
    let needle = substr.to_lowercase();
    grid.header()
        .iter()
        .find(|h| h.to_lowercase().contains(&needle))
        .cloned()
}

/// Structural checks. All the problems are reported together, in a fixed
/// order: ethnicity column, value column, rectangular shape.
pub fn validate_chart(grid: &Grid) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !has_header("ethnicity", grid) {
        errors.push(ValidationError::Ethnicity);
    }
    if !has_header("value", grid) {
        errors.push(ValidationError::Value);
    }
    if !is_rectangular(grid) {
        errors.push(ValidationError::Rectangle);
    }
    debug!("validate_chart: {:?}", errors);
    errors
}

/// Checks that the data has exactly one row per category, or per
/// (category, group) pair when a group column is given.
///
/// A column that cannot be found stops the validation with a single
/// settings error.
pub fn validate_data(
    grid: &Grid,
    category_column: &str,
    group_column: Option<&str>,
) -> Vec<ValidationError> {
    let headers = grid.lower_headers();
    let category_idx = match index_of_column_named(&headers, Some(category_column)) {
        Some(idx) => idx,
        None => {
            return vec![ValidationError::Settings {
                column: category_column.to_string(),
            }]
        }
    };
    match selected(group_column) {
        None => validate_simple_data(grid.data_rows(), category_idx),
        Some(group_name) => match index_of_column_named(&headers, Some(group_name)) {
            Some(group_idx) => validate_grouped_data(grid.data_rows(), category_idx, group_idx),
            None => vec![ValidationError::Settings {
                column: group_name.to_string(),
            }],
        },
    }
}

fn validate_simple_data(rows: &[Vec<String>], category_idx: usize) -> Vec<ValidationError> {
    let categories = unique_maintain_order(rows, category_idx);
    if categories.len() == rows.len() {
        return vec![];
    }
    // Every category repeated the same number of times: most likely a second
    // dimension that was not mapped.
    if rows.len() % categories.len() == 0 {
        debug!(
            "validate_simple_data: {} rows for {} categories",
            rows.len(),
            categories.len()
        );
        return vec![ValidationError::ComplexData];
    }
    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    let mut errors = Vec::new();
    for row in rows.iter() {
        let c = cell(row, category_idx);
        if !seen.insert(c) && reported.insert(c) {
            errors.push(ValidationError::Duplication {
                category: c.to_string(),
                group: None,
            });
        }
    }
    errors
}

fn validate_grouped_data(
    rows: &[Vec<String>],
    category_idx: usize,
    group_idx: usize,
) -> Vec<ValidationError> {
    let mut errors = validate_grouped_completeness(rows, category_idx, group_idx);
    errors.extend(validate_grouped_duplicates(rows, category_idx, group_idx));
    errors
}

fn validate_grouped_completeness(
    rows: &[Vec<String>],
    category_idx: usize,
    group_idx: usize,
) -> Vec<ValidationError> {
    let present: HashSet<(&str, &str)> = rows
        .iter()
        .map(|r| (cell(r, category_idx), cell(r, group_idx)))
        .collect();
    let categories = unique_maintain_order(rows, category_idx);
    let groups = unique_maintain_order(rows, group_idx);
    let mut errors = Vec::new();
    for category in categories.iter() {
        for group in groups.iter() {
            if !present.contains(&(category.as_str(), group.as_str())) {
                errors.push(ValidationError::MissingData {
                    category: category.clone(),
                    group: group.clone(),
                });
            }
        }
    }
    errors
}

fn validate_grouped_duplicates(
    rows: &[Vec<String>],
    category_idx: usize,
    group_idx: usize,
) -> Vec<ValidationError> {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    let mut errors = Vec::new();
    for row in rows.iter() {
        let key = (cell(row, category_idx), cell(row, group_idx));
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        // Report on the second occurrence only.
        if *count == 2 {
            errors.push(ValidationError::Duplication {
                category: key.0.to_string(),
                group: Some(key.1.to_string()),
            });
        }
    }
    errors
}

/// The complete gate run before a build: structure, then the mapped columns,
/// then the shape of the data. The first stage reporting anything stops the
/// validation.
///
/// `other_columns` lists the columns mapped besides the category and the
/// group (see `ChartMapping::mapped_columns`). Placeholders are skipped. The
/// first column that cannot be found is reported as a settings error.
pub fn validate_for_build(
    grid: &Grid,
    category_column: Option<&str>,
    group_column: Option<&str>,
    other_columns: &[&str],
) -> Vec<ValidationError> {
    let structural = validate_chart(grid);
    if !structural.is_empty() {
        info!("validate_for_build: {} structural errors", structural.len());
        return structural;
    }
    let category = match selected(category_column) {
        Some(c) => c,
        None => {
            return vec![ValidationError::Settings {
                column: category_column.unwrap_or_default().to_string(),
            }]
        }
    };
    let headers = grid.lower_headers();
    let unresolved = std::iter::once(category)
        .chain(selected(group_column))
        .chain(other_columns.iter().filter_map(|c| selected(Some(*c))))
        .find(|c| index_of_column_named(&headers, Some(*c)).is_none());
    if let Some(column) = unresolved {
        info!("validate_for_build: unknown column {:?}", column);
        return vec![ValidationError::Settings {
            column: column.to_string(),
        }];
    }
    let errors = validate_data(grid, category, group_column);
    info!("validate_for_build: {} data errors", errors.len());
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<&str>>) -> Grid {
        Grid::from(rows)
    }

    #[test]
    fn rectangular() {
        assert!(is_rectangular(&grid(vec![vec!["a", "b"], vec!["1", "2"]])));
        assert!(!is_rectangular(&grid(vec![vec!["a", "b"], vec!["1"]])));
        assert!(is_rectangular(&Grid::default()));
    }

    #[test]
    fn headers_match_by_substring() {
        let g = grid(vec![vec!["Ethnicity group", "Value (%)"]]);
        assert!(has_header("ethnicity", &g));
        assert!(has_header("value", &g));
        assert!(!has_header("time", &g));
        assert_eq!(find_header("value", &g), Some("Value (%)".to_string()));
    }

    #[test]
    fn structural_errors_in_order() {
        let g = grid(vec![vec!["Ethnicity", "Count"], vec!["White"]]);
        assert_eq!(
            validate_chart(&g),
            vec![ValidationError::Value, ValidationError::Rectangle]
        );
        let g = grid(vec![vec!["Time", "Count"], vec!["2000", "1"]]);
        assert_eq!(
            validate_chart(&g),
            vec![ValidationError::Ethnicity, ValidationError::Value]
        );
    }

    #[test]
    fn structural_errors_stop_the_gate() {
        // The duplicate is not reported: the data checks never run.
        let g = grid(vec![
            vec!["Ethnicity", "Count"],
            vec!["White", "1"],
            vec!["White", "2", "3"],
        ]);
        assert_eq!(
            validate_for_build(&g, Some("Ethnicity"), None, &[]),
            vec![ValidationError::Value, ValidationError::Rectangle]
        );
    }

    #[test]
    fn duplicate_reported_once() {
        let g = grid(vec![
            vec!["Ethnicity", "Value"],
            vec!["White", "10"],
            vec!["Black", "20"],
            vec!["White", "10"],
        ]);
        assert_eq!(
            validate_data(&g, "Ethnicity", None),
            vec![ValidationError::Duplication {
                category: "White".to_string(),
                group: None
            }]
        );
    }

    #[test]
    fn many_repeats_reported_once() {
        let g = grid(vec![
            vec!["Ethnicity", "Value"],
            vec!["White", "1"],
            vec!["White", "2"],
            vec!["White", "3"],
            vec!["Black", "4"],
            vec!["Asian", "5"],
        ]);
        assert_eq!(
            validate_data(&g, "ethnicity", None),
            vec![ValidationError::Duplication {
                category: "White".to_string(),
                group: None
            }]
        );
    }

    #[test]
    fn evenly_repeated_categories_are_complex() {
        let g = grid(vec![
            vec!["Ethnicity", "Value"],
            vec!["White", "1"],
            vec!["Black", "2"],
            vec!["White", "3"],
            vec!["Black", "4"],
        ]);
        assert_eq!(
            validate_data(&g, "Ethnicity", None),
            vec![ValidationError::ComplexData]
        );
    }

    #[test]
    fn unique_categories_pass() {
        let g = grid(vec![
            vec!["Ethnicity", "Value"],
            vec!["White", "1"],
            vec!["Black", "2"],
        ]);
        assert!(validate_data(&g, "Ethnicity", None).is_empty());
        assert!(validate_data(&g, "Ethnicity", Some("[None]")).is_empty());
    }

    #[test]
    fn grouped_missing_pair() {
        let g = grid(vec![
            vec!["Ethnicity", "Sex", "Value"],
            vec!["A", "X", "1"],
            vec!["A", "Y", "2"],
            vec!["B", "X", "3"],
        ]);
        assert_eq!(
            validate_data(&g, "Ethnicity", Some("Sex")),
            vec![ValidationError::MissingData {
                category: "B".to_string(),
                group: "Y".to_string()
            }]
        );
    }

    #[test]
    fn grouped_completeness_before_duplicates() {
        let g = grid(vec![
            vec!["Ethnicity", "Sex", "Value"],
            vec!["A", "X", "1"],
            vec!["A", "X", "2"],
            vec!["A", "X", "2"],
            vec!["B", "Y", "3"],
        ]);
        assert_eq!(
            validate_data(&g, "Ethnicity", Some("Sex")),
            vec![
                ValidationError::MissingData {
                    category: "A".to_string(),
                    group: "Y".to_string()
                },
                ValidationError::MissingData {
                    category: "B".to_string(),
                    group: "X".to_string()
                },
                ValidationError::Duplication {
                    category: "A".to_string(),
                    group: Some("X".to_string())
                },
            ]
        );
    }

    #[test]
    fn unknown_columns_are_settings_errors() {
        let g = grid(vec![vec!["Ethnicity", "Value"], vec!["A", "1"]]);
        assert_eq!(
            validate_data(&g, "Race", None),
            vec![ValidationError::Settings {
                column: "Race".to_string()
            }]
        );
        assert_eq!(
            validate_data(&g, "Ethnicity", Some("Sex")),
            vec![ValidationError::Settings {
                column: "Sex".to_string()
            }]
        );
        assert_eq!(
            validate_for_build(&g, Some("[Required]"), None, &[]),
            vec![ValidationError::Settings {
                column: "[Required]".to_string()
            }]
        );
    }

    #[test]
    fn unknown_mapped_columns_stop_the_gate() {
        let g = grid(vec![
            vec!["Ethnicity", "Value", "Parent"],
            vec!["White", "1", "White"],
            vec!["White", "2", "White"],
        ]);
        assert_eq!(
            validate_for_build(&g, Some("Ethnicity"), None, &["Valeur", "Parnt"]),
            vec![ValidationError::Settings {
                column: "Valeur".to_string()
            }]
        );
        assert_eq!(
            validate_for_build(&g, Some("Ethnicity"), Some("Sex"), &["Value"]),
            vec![ValidationError::Settings {
                column: "Sex".to_string()
            }]
        );
        // Placeholders are not columns, the data checks run.
        assert_eq!(
            validate_for_build(&g, Some("Ethnicity"), None, &["value", "[None]", ""]),
            vec![ValidationError::ComplexData]
        );
    }
}
