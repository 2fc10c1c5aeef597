use log::{debug, warn};

use std::collections::HashMap;

use crate::columns::{cell, optional_column, required_column};
use crate::config::{BuildError, Grid, Preset, PresetEntry};

pub const PRESET_CATEGORY_HEADER: &str = "Ethnicity";
pub const PRESET_PARENT_HEADER: &str = "Ethnicity-parent";
pub const PRESET_ORDER_HEADER: &str = "Ethnicity-order";

/// Replaces the category column of the data by the classification of a
/// preset.
///
/// The new grid starts with the display value, the parent and the order of
/// each row, followed by the requested data columns. Rows whose category has
/// no entry in the preset are dropped.
pub fn merge_preset(
    grid: &Grid,
    category_column: &str,
    preset: &Preset,
    data_columns: &[String],
) -> Result<Grid, BuildError> {
    let headers = grid.lower_headers();
    let category_idx = required_column(grid, &headers, Some(category_column), "category_column")?;
    let mut data_idx: Vec<usize> = Vec::new();
    let mut data_headers: Vec<String> = Vec::new();
    for name in data_columns.iter() {
        if let Some(idx) = optional_column(&headers, Some(name))? {
            data_idx.push(idx);
            data_headers.push(grid.header()[idx].clone());
        }
    }

    let entries: HashMap<String, &PresetEntry> = preset
        .data
        .iter()
        .map(|e| (e.value.trim().to_lowercase(), e))
        .collect();
    debug!(
        "merge_preset: preset {:?} with {} entries",
        preset.code,
        entries.len()
    );

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(grid.data_rows().len() + 1);
    let mut header = vec![
        PRESET_CATEGORY_HEADER.to_string(),
        PRESET_PARENT_HEADER.to_string(),
        PRESET_ORDER_HEADER.to_string(),
    ];
    header.extend(data_headers);
    rows.push(header);

    for row in grid.data_rows().iter() {
        let value = cell(row, category_idx);
        match entries.get(&value.trim().to_lowercase()) {
            Some(entry) => {
                let mut merged = vec![
                    entry.display_value.clone(),
                    entry.parent.clone(),
                    entry.order.to_string(),
                ];
                merged.extend(data_idx.iter().map(|idx| cell(row, *idx).to_string()));
                rows.push(merged);
            }
            None => warn!(
                "merge_preset: no entry for {:?} in preset {:?}, dropping the row",
                value, preset.code
            ),
        }
    }
    Ok(Grid::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: &str, display: &str, parent: &str, order: i64) -> PresetEntry {
        PresetEntry {
            value: value.to_string(),
            display_value: display.to_string(),
            parent: parent.to_string(),
            order,
        }
    }

    fn preset() -> Preset {
        Preset {
            code: "5+1".to_string(),
            name: "ONS 2011 5+1".to_string(),
            data: vec![
                entry("White British", "White", "White", 1),
                entry("Indian", "Indian", "Asian", 3),
                entry("asian", "Asian", "Asian", 2),
            ],
        }
    }

    #[test]
    fn rows_are_classified() {
        let g = Grid::from(vec![
            vec!["Ethnic group", "Value", "Notes"],
            vec!["White British", "10", "a"],
            vec![" INDIAN ", "20", "b"],
            vec!["Asian", "30", "c"],
        ]);
        let merged = merge_preset(&g, "ethnic group", &preset(), &["Value".to_string()]).unwrap();
        assert_eq!(
            merged,
            Grid::from(vec![
                vec!["Ethnicity", "Ethnicity-parent", "Ethnicity-order", "Value"],
                vec!["White", "White", "1", "10"],
                vec!["Indian", "Asian", "3", "20"],
                vec!["Asian", "Asian", "2", "30"],
            ])
        );
    }

    #[test]
    fn unmapped_rows_are_dropped() {
        let g = Grid::from(vec![
            vec!["Ethnicity", "Value"],
            vec!["Other", "10"],
            vec!["Indian", "20"],
        ]);
        let merged = merge_preset(&g, "Ethnicity", &preset(), &["Value".to_string()]).unwrap();
        assert_eq!(merged.data_rows().len(), 1);
        assert_eq!(merged.data_rows()[0][0], "Indian");
    }

    #[test]
    fn unknown_columns() {
        let g = Grid::from(vec![vec!["Ethnicity", "Value"], vec!["Indian", "20"]]);
        assert_eq!(
            merge_preset(&g, "Race", &preset(), &[]),
            Err(BuildError::UnknownColumn("Race".to_string()))
        );
        assert_eq!(
            merge_preset(&g, "Ethnicity", &preset(), &["Count".to_string()]),
            Err(BuildError::UnknownColumn("Count".to_string()))
        );
    }
}
