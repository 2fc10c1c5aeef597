use log::{debug, info};

use std::collections::HashSet;

use crate::columns::{cell, optional_column, required_column, selected};
use crate::config::*;
use crate::ordering::{ordered_unique, sorted_by_column, OrderPolicy};
use crate::parent_child::{relationships_for, resolve_parent_child, synthesized_parent};
use crate::series_format::{
    format_number_with_decimal_places, series_could_be_year, series_decimal_places,
    to_sort_value,
};

type Row = Vec<String>;

#[derive(Debug, Clone)]
struct TableColumns {
    category: usize,
    parent: Option<usize>,
    group: Option<usize>,
    order: Option<usize>,
    group_order: Option<usize>,
    data: Vec<usize>,
}

fn resolve_columns(grid: &Grid, mapping: &TableMapping) -> Result<TableColumns, BuildError> {
    let headers = grid.lower_headers();
    let mut data = Vec::new();
    for name in mapping.data_columns.iter() {
        if let Some(idx) = optional_column(&headers, Some(name))? {
            data.push(idx);
        }
    }
    let cols = TableColumns {
        category: required_column(
            grid,
            &headers,
            mapping.category_column.as_deref(),
            "category_column",
        )?,
        parent: optional_column(&headers, mapping.parent_column.as_deref())?,
        group: optional_column(&headers, mapping.group_column.as_deref())?,
        order: optional_column(&headers, mapping.order_column.as_deref())?,
        group_order: optional_column(&headers, mapping.group_order_column.as_deref())?,
        data,
    };
    debug!("resolve_columns: {:?}", cols);
    Ok(cols)
}

/// Builds a simple table, or a grouped table when a group column is mapped.
///
/// The values of every data column are formatted with the number of decimal
/// places of their most precise value, except for the columns that look like
/// years.
pub fn build_table_object(grid: &Grid, mapping: &TableMapping) -> Result<TableObject, BuildError> {
    let cols = resolve_columns(grid, mapping)?;
    let rows: Vec<&Row> = grid.data_rows().iter().collect();
    let header = grid.header();
    let width = cols.data.len();

    let columns: Vec<String> = cols
        .data
        .iter()
        .enumerate()
        .map(|(pos, idx)| match mapping.column_captions.get(pos) {
            Some(caption) if !caption.trim().is_empty() => caption.clone(),
            _ => header[*idx].clone(),
        })
        .collect();
    let category = header[cols.category].clone();
    let category_caption = if mapping.category_caption.trim().is_empty() {
        category.clone()
    } else {
        mapping.category_caption.clone()
    };

    let mut table = TableObject {
        kind: TableKind::Simple,
        header: mapping.title.clone(),
        subtitle: mapping.subtitle.clone(),
        footer: mapping.footer.clone(),
        category,
        category_caption,
        columns,
        parent_child: cols.parent.is_some(),
        data: vec![],
        groups: None,
        group_columns: None,
    };

    match cols.group {
        None => {
            info!("build_table_object: simple table over {} rows", rows.len());
            let mut data = table_rows(&rows, &cols);
            format_data_columns(&mut [data.as_mut_slice()], width);
            table.data = data;
        }
        Some(group_idx) => {
            let names = ordered_unique(
                &rows,
                group_idx,
                OrderPolicy::from_order_column(cols.group_order),
            );
            info!(
                "build_table_object: grouped table over {} rows, {} groups",
                rows.len(),
                names.len()
            );
            let mut groups: Vec<TableGroup> = names
                .into_iter()
                .map(|group| {
                    let scoped: Vec<&Row> = rows
                        .iter()
                        .copied()
                        .filter(|r| cell(*r, group_idx) == group.as_str())
                        .collect();
                    TableGroup {
                        data: table_rows(&scoped, &cols),
                        group,
                    }
                })
                .collect();
            let mut sets: Vec<&mut [TableRow]> =
                groups.iter_mut().map(|g| g.data.as_mut_slice()).collect();
            format_data_columns(&mut sets, width);

            let mut group_columns = vec![String::new()];
            group_columns.extend(groups.iter().map(|g| g.group.clone()));
            table.kind = TableKind::Grouped;
            table.data = flatten_groups(&groups, width);
            table.groups = Some(groups);
            table.group_columns = Some(group_columns);
        }
    }
    Ok(table)
}

// One row per category, with parents placed before their children when a
// parent column is mapped.
fn table_rows(rows: &[&Row], cols: &TableColumns) -> Vec<TableRow> {
    let ordered: Vec<&Row> = match cols.order {
        Some(order_idx) => sorted_by_column(rows, order_idx).into_iter().copied().collect(),
        None => rows.to_vec(),
    };
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<TableRow> = Vec::new();
    for row in ordered.into_iter() {
        let category = cell(row, cols.category);
        if !seen.insert(category) {
            continue;
        }
        let values: Vec<String> = cols.data.iter().map(|idx| cell(row, *idx).to_string()).collect();
        let order = match cols.order {
            Some(order_idx) => to_sort_value(cell(row, order_idx)),
            None => SortValue::Number(res.len() as f64),
        };
        res.push(TableRow {
            category: category.to_string(),
            relationships: relationships_for(category, cols.parent.map(|idx| cell(row, idx))),
            order,
            sort_values: values.iter().map(|v| to_sort_value(v)).collect(),
            values,
        });
    }
    if cols.parent.is_none() {
        return res;
    }
    let width = cols.data.len();
    resolve_parent_child(
        res,
        |r: &TableRow| r.category.as_str(),
        |r: &TableRow| r.relationships.parent.as_str(),
        |p, children| synthesized_row(p, children, width),
    )
}

fn synthesized_row(parent: &str, children: &[&TableRow], width: usize) -> TableRow {
    let first = children
        .iter()
        .filter_map(|c| match c.order {
            SortValue::Number(x) => Some(x),
            SortValue::Text(_) => None,
        })
        .fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.min(x))))
        .unwrap_or(0.0);
    TableRow {
        category: parent.to_string(),
        relationships: synthesized_parent(parent),
        order: SortValue::Number(first - 1.0),
        values: vec![String::new(); width],
        sort_values: vec![SortValue::Text(String::new()); width],
    }
}

// Rows keyed by category: the categories of the first group come first, then
// the ones only found in later groups. A category absent from a group gets
// blank values for that group.
fn flatten_groups(groups: &[TableGroup], width: usize) -> Vec<TableRow> {
    let mut order: Vec<&TableRow> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for r in groups.iter().flat_map(|g| g.data.iter()) {
        if seen.insert(r.category.as_str()) {
            order.push(r);
        }
    }
    order
        .into_iter()
        .map(|first| {
            let mut values = Vec::with_capacity(width * groups.len());
            let mut sort_values = Vec::with_capacity(width * groups.len());
            for g in groups.iter() {
                match g.data.iter().find(|r| r.category == first.category) {
                    Some(r) => {
                        values.extend(r.values.iter().cloned());
                        sort_values.extend(r.sort_values.iter().cloned());
                    }
                    None => {
                        values.extend(std::iter::repeat(String::new()).take(width));
                        sort_values
                            .extend(std::iter::repeat(SortValue::Text(String::new())).take(width));
                    }
                }
            }
            TableRow {
                category: first.category.clone(),
                relationships: first.relationships.clone(),
                order: first.order.clone(),
                values,
                sort_values,
            }
        })
        .collect()
}

fn format_data_columns(row_sets: &mut [&mut [TableRow]], width: usize) {
    for column in 0..width {
        let values: Vec<&str> = row_sets
            .iter()
            .flat_map(|rows| rows.iter())
            .filter_map(|r| r.values.get(column))
            .map(|v| v.as_str())
            .collect();
        if series_could_be_year(&values) {
            debug!("format_data_columns: column {} holds years", column);
            continue;
        }
        let dp = series_decimal_places(&values);
        debug!("format_data_columns: column {}: {} decimal places", column, dp);
        for rows in row_sets.iter_mut() {
            for r in rows.iter_mut() {
                if let Some(v) = r.values.get_mut(column) {
                    *v = format_number_with_decimal_places(v, dp);
                }
            }
        }
    }
}

/// True when the group selector is set to a column.
pub fn is_grouped(mapping: &TableMapping) -> bool {
    selected(mapping.group_column.as_deref()).is_some()
}
