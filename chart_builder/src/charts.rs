use log::{debug, info, warn};

use std::cmp::Ordering;

use crate::columns::{cell, optional_column, required_column};
use crate::config::*;
use crate::ordering::*;
use crate::parent_child::{
    parents_in_order, relationships_for, resolve_parent_child, synthesized_parent,
};
use crate::series_format::{parse_number, parse_number_lenient, series_decimal_places};

pub const CHART_VERSION: &str = "1.1";
pub const PARENT_COLOR: &str = "#2B8CC4";
pub const CHILD_COLOR: &str = "#B3CBD9";
/// The `text` of a point read from a numeric cell.
pub const NUMBER_TEXT: &str = "number";

type Row = Vec<String>;

// The resolved positions of the mapped columns.
#[derive(Debug, Clone)]
struct ChartColumns {
    category: usize,
    category_name: String,
    value: usize,
    secondary: Option<usize>,
    parent: Option<usize>,
    order: Option<usize>,
    secondary_order: Option<usize>,
}

fn resolve_columns(grid: &Grid, mapping: &ChartMapping) -> Result<ChartColumns, BuildError> {
    let headers = grid.lower_headers();
    let category = required_column(
        grid,
        &headers,
        mapping.category_column.as_deref(),
        "category_column",
    )?;
    let cols = ChartColumns {
        category,
        category_name: grid.header()[category].clone(),
        value: required_column(
            grid,
            &headers,
            mapping.value_column.as_deref(),
            "value_column",
        )?,
        secondary: optional_column(&headers, mapping.secondary_column.as_deref())?,
        parent: optional_column(&headers, mapping.parent_column.as_deref())?,
        order: optional_column(&headers, mapping.order_column.as_deref())?,
        secondary_order: optional_column(&headers, mapping.secondary_order_column.as_deref())?,
    };
    debug!("resolve_columns: {:?}", cols);
    Ok(cols)
}

fn secondary_column(cols: &ChartColumns) -> Result<usize, BuildError> {
    cols.secondary
        .ok_or_else(|| BuildError::MissingSetting("secondary_column".to_string()))
}

/// Builds a chart from the name of its type.
///
/// Returns `Ok(None)` when the type is not one of the known chart types:
/// there is nothing to render in that case.
pub fn build_chart_object(
    grid: &Grid,
    chart_type: &str,
    mapping: &ChartMapping,
    format: &NumberFormat,
) -> Result<Option<ChartObject>, BuildError> {
    match ChartKind::parse(chart_type) {
        Some(kind) => build_chart(grid, kind, mapping, format).map(Some),
        None => {
            warn!("build_chart_object: unknown chart type {:?}", chart_type);
            Ok(None)
        }
    }
}

/// Builds the chart object for the given kind, then runs the preprocessing
/// step (decimal places and missing-data markers).
pub fn build_chart(
    grid: &Grid,
    kind: ChartKind,
    mapping: &ChartMapping,
    format: &NumberFormat,
) -> Result<ChartObject, BuildError> {
    let cols = resolve_columns(grid, mapping)?;
    let rows: Vec<&Row> = grid.data_rows().iter().collect();
    info!("build_chart: {:?} chart over {} rows", kind, rows.len());

    let mut chart = match kind {
        ChartKind::Bar => {
            ChartObject::Single(bar_chart(&rows, &cols, mapping, format, &mapping.title))
        }
        ChartKind::Line => ChartObject::Single(line_chart(&rows, &cols, mapping, format)?),
        ChartKind::Component => {
            ChartObject::Single(component_chart(&rows, &cols, mapping, format)?)
        }
        ChartKind::PanelBar => ChartObject::Panel(panel_bar_chart(&rows, &cols, mapping, format)?),
        ChartKind::PanelLine => {
            ChartObject::Panel(panel_line_chart(&rows, &cols, mapping, format)?)
        }
    };
    preprocess_chart(&mut chart);
    Ok(chart)
}

/// Annotates a chart just before rendering: the number of decimal places
/// shared by all the values, and the marker of every non-numeric point.
pub fn preprocess_chart(chart: &mut ChartObject) {
    match chart {
        ChartObject::Single(c) => preprocess_single(c),
        ChartObject::Panel(p) => {
            for panel in p.panels.iter_mut() {
                preprocess_single(panel);
            }
            p.decimal_places = p
                .panels
                .iter()
                .map(|c| c.decimal_places)
                .max()
                .unwrap_or(0);
        }
    }
}

fn preprocess_single(chart: &mut SingleChart) {
    let values: Vec<String> = chart
        .series
        .iter()
        .flat_map(|s| s.data.iter())
        .filter(|p| p.text == NUMBER_TEXT)
        .map(|p| p.y.to_string())
        .collect();
    chart.decimal_places = series_decimal_places(&values);
    for point in chart.series.iter_mut().flat_map(|s| s.data.iter_mut()) {
        if point.text != NUMBER_TEXT && !point.text.is_empty() {
            point.marker = Some(MissingMarker::from_text(&point.text));
        }
    }
}

/// Sorts the series by the numeric value of their names.
///
/// A name may start with one character that is not part of the number (a
/// currency sign for instance). If any name cannot be read as a number, the
/// series keep their order.
pub fn sort_chart_series(series: Vec<Series>) -> Vec<Series> {
    let keys: Option<Vec<f64>> = series
        .iter()
        .map(|s| to_number_sort_value(&s.name))
        .collect();
    match keys {
        None => series,
        Some(keys) => {
            let mut keyed: Vec<(f64, Series)> = keys.into_iter().zip(series).collect();
            keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            keyed.into_iter().map(|(_, s)| s).collect()
        }
    }
}

fn to_number_sort_value(name: &str) -> Option<f64> {
    parse_number(name).or_else(|| {
        let mut chars = name.trim().chars();
        chars.next()?;
        parse_number(chars.as_str())
    })
}

// A category on the x-axis, with its place in the hierarchy.
#[derive(Debug, Clone)]
struct CategoryEntry {
    name: String,
    relationships: Option<Relationships>,
    // Added for a parent that has no row.
    synthesized: bool,
}

impl CategoryEntry {
    fn parent_name(&self) -> &str {
        self.relationships
            .as_ref()
            .map(|r| r.parent.as_str())
            .unwrap_or(self.name.as_str())
    }
}

fn category_entries(
    rows: &[&Row],
    cols: &ChartColumns,
    policy: OrderPolicy,
) -> Vec<CategoryEntry> {
    let names = ordered_unique(rows, cols.category, policy);
    let parent_idx = match cols.parent {
        None => {
            return names
                .into_iter()
                .map(|name| CategoryEntry {
                    name,
                    relationships: None,
                    synthesized: false,
                })
                .collect()
        }
        Some(idx) => idx,
    };
    let entries: Vec<CategoryEntry> = names
        .into_iter()
        .map(|name| {
            let parent = rows
                .iter()
                .find(|r| cell(**r, cols.category) == name)
                .map(|r| cell(*r, parent_idx))
                .unwrap_or(name.as_str())
                .to_string();
            CategoryEntry {
                relationships: Some(relationships_for(&name, Some(&parent))),
                name,
                synthesized: false,
            }
        })
        .collect();
    resolve_parent_child(
        entries,
        |e: &CategoryEntry| e.name.as_str(),
        |e: &CategoryEntry| e.parent_name(),
        |p, _| CategoryEntry {
            name: p.to_string(),
            relationships: Some(synthesized_parent(p)),
            synthesized: true,
        },
    )
}

// The first row satisfying the predicate. Duplicates should have been
// reported by the validation, the first one wins.
fn find_row<'a, F>(rows: &[&'a Row], matches: F) -> Option<&'a Row>
where
    F: Fn(&Row) -> bool,
{
    let mut found = rows.iter().copied().filter(|r| matches(*r));
    let first = found.next();
    if first.is_some() && found.next().is_some() {
        warn!("find_row: several rows match, using the first one: {:?}", first);
    }
    first
}

fn value_point(
    row: Option<&Row>,
    category: &str,
    value_idx: usize,
    format: &NumberFormat,
) -> DataPoint {
    let (y, text) = match row {
        None => (0.0, String::new()),
        Some(r) => {
            let raw = cell(r, value_idx);
            match parse_number_lenient(raw) {
                Some(x) => (format.apply_multiplier(x), NUMBER_TEXT.to_string()),
                None => (0.0, raw.to_string()),
            }
        }
    };
    DataPoint {
        y,
        category: category.to_string(),
        text,
        relationships: None,
        color: None,
        marker: None,
    }
}

fn entry_point(
    rows: &[&Row],
    cols: &ChartColumns,
    entry: &CategoryEntry,
    series: Option<(usize, &str)>,
    format: &NumberFormat,
) -> DataPoint {
    let mut point = if entry.synthesized {
        value_point(None, &entry.name, cols.value, format)
    } else {
        let row = find_row(rows, |r| {
            cell(r, cols.category) == entry.name
                && series.map_or(true, |(idx, name)| cell(r, idx) == name)
        });
        value_point(row, &entry.name, cols.value, format)
    };
    if let Some(rel) = &entry.relationships {
        let color = if rel.is_parent {
            PARENT_COLOR
        } else {
            CHILD_COLOR
        };
        point.color = Some(color.to_string());
        point.relationships = Some(rel.clone());
    }
    point
}

fn single_chart(
    kind: ChartKind,
    title: &str,
    mapping: &ChartMapping,
    categories: Vec<String>,
    series: Vec<Series>,
    format: &NumberFormat,
    parents: Option<Vec<String>>,
) -> SingleChart {
    SingleChart {
        kind,
        title: title.to_string(),
        x_axis_label: mapping.x_axis_label.clone(),
        y_axis_label: mapping.y_axis_label.clone(),
        categories,
        series,
        number_format: format.clone(),
        parents,
        decimal_places: 0,
        version: CHART_VERSION.to_string(),
    }
}

fn bar_chart(
    rows: &[&Row],
    cols: &ChartColumns,
    mapping: &ChartMapping,
    format: &NumberFormat,
    title: &str,
) -> SingleChart {
    let entries = category_entries(rows, cols, OrderPolicy::from_order_column(cols.order));
    let categories: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
    debug!("bar_chart: categories: {:?}", categories);

    let series = match cols.secondary {
        None => vec![Series {
            name: cols.category_name.clone(),
            data: entries
                .iter()
                .map(|e| entry_point(rows, cols, e, None, format))
                .collect(),
        }],
        Some(secondary_idx) => {
            let series: Vec<Series> = unique_maintain_order(rows, secondary_idx)
                .into_iter()
                .map(|name| {
                    let data = entries
                        .iter()
                        .map(|e| {
                            let key = Some((secondary_idx, name.as_str()));
                            entry_point(rows, cols, e, key, format)
                        })
                        .collect();
                    Series { name, data }
                })
                .collect();
            sort_chart_series(series)
        }
    };

    let parents = cols
        .parent
        .map(|_| parents_in_order(&entries, |e: &CategoryEntry| e.parent_name()));
    single_chart(
        ChartKind::Bar,
        title,
        mapping,
        categories,
        series,
        format,
        parents,
    )
}

// Stable sort of names by the raw value found in `order_idx` on the first
// row of each name.
fn sort_by_first_row_value(
    rows: &[&Row],
    names: Vec<String>,
    name_idx: usize,
    order_idx: usize,
) -> Vec<String> {
    let mut keyed: Vec<(String, String)> = names
        .into_iter()
        .map(|name| {
            let key = rows
                .iter()
                .find(|r| cell(**r, name_idx) == name)
                .map(|r| cell(*r, order_idx).to_string())
                .unwrap_or_default();
            (key, name)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, name)| name).collect()
}

fn aligned_series(
    rows: &[&Row],
    cols: &ChartColumns,
    categories: &[String],
    series_idx: usize,
    name: String,
    format: &NumberFormat,
) -> Series {
    let data = categories
        .iter()
        .map(|c| {
            let row = find_row(rows, |r| {
                cell(r, cols.category) == c.as_str() && cell(r, series_idx) == name.as_str()
            });
            value_point(row, c, cols.value, format)
        })
        .collect();
    Series { name, data }
}

fn line_chart(
    rows: &[&Row],
    cols: &ChartColumns,
    mapping: &ChartMapping,
    format: &NumberFormat,
) -> Result<SingleChart, BuildError> {
    let series_idx = secondary_column(cols)?;
    let categories = unique_maintain_order(rows, cols.category);
    let names = match cols.secondary_order {
        Some(order_idx) => sort_by_first_row_value(
            rows,
            unique_maintain_order(rows, series_idx),
            series_idx,
            order_idx,
        ),
        None => unique_in_column(rows, series_idx),
    };
    debug!("line_chart: categories: {:?} series: {:?}", categories, names);
    let series = names
        .into_iter()
        .map(|name| aligned_series(rows, cols, &categories, series_idx, name, format))
        .collect();
    Ok(single_chart(
        ChartKind::Line,
        &mapping.title,
        mapping,
        categories,
        series,
        format,
        None,
    ))
}

fn component_chart(
    rows: &[&Row],
    cols: &ChartColumns,
    mapping: &ChartMapping,
    format: &NumberFormat,
) -> Result<SingleChart, BuildError> {
    let series_idx = secondary_column(cols)?;
    let groups = ordered_unique(rows, cols.category, OrderPolicy::from_order_column(cols.order));
    let mut names = match cols.secondary_order {
        Some(order_idx) => unique_ordered_by(rows, series_idx, order_idx),
        None => unique_maintain_order(rows, series_idx),
    };
    // The first declared segment is drawn on top of the stack.
    names.reverse();
    debug!("component_chart: groups: {:?} series: {:?}", groups, names);
    let series = names
        .into_iter()
        .map(|name| aligned_series(rows, cols, &groups, series_idx, name, format))
        .collect();
    Ok(single_chart(
        ChartKind::Component,
        &mapping.title,
        mapping,
        groups,
        series,
        format,
        None,
    ))
}

fn panel_rows<'a>(rows: &[&'a Row], panel_idx: usize, panel: &str) -> Vec<&'a Row> {
    rows.iter()
        .copied()
        .filter(|r| cell(*r, panel_idx) == panel)
        .collect()
}

fn panel_chart(
    kind: ChartKind,
    mapping: &ChartMapping,
    panels: Vec<SingleChart>,
    format: &NumberFormat,
) -> PanelChart {
    PanelChart {
        kind,
        title: mapping.title.clone(),
        panels,
        number_format: format.clone(),
        decimal_places: 0,
        version: CHART_VERSION.to_string(),
    }
}

fn panel_bar_chart(
    rows: &[&Row],
    cols: &ChartColumns,
    mapping: &ChartMapping,
    format: &NumberFormat,
) -> Result<PanelChart, BuildError> {
    let panel_idx = secondary_column(cols)?;
    let names = ordered_unique(
        rows,
        panel_idx,
        OrderPolicy::from_order_column(cols.secondary_order),
    );
    debug!("panel_bar_chart: panels: {:?}", names);
    let inner = ChartColumns {
        secondary: None,
        secondary_order: None,
        ..cols.clone()
    };
    let panels = names
        .iter()
        .map(|name| {
            let scoped = panel_rows(rows, panel_idx, name);
            bar_chart(&scoped, &inner, mapping, format, name)
        })
        .collect();
    Ok(panel_chart(ChartKind::PanelBar, mapping, panels, format))
}

fn panel_line_chart(
    rows: &[&Row],
    cols: &ChartColumns,
    mapping: &ChartMapping,
    format: &NumberFormat,
) -> Result<PanelChart, BuildError> {
    let panel_idx = secondary_column(cols)?;
    let names = ordered_unique(
        rows,
        panel_idx,
        OrderPolicy::from_order_column(cols.secondary_order),
    );
    // All the panels share the same x-axis.
    let categories = ordered_unique(rows, cols.category, OrderPolicy::from_order_column(cols.order));
    debug!(
        "panel_line_chart: panels: {:?} categories: {:?}",
        names, categories
    );
    let panels = names
        .into_iter()
        .map(|name| {
            let scoped = panel_rows(rows, panel_idx, &name);
            let series = aligned_series(&scoped, cols, &categories, panel_idx, name.clone(), format);
            single_chart(
                ChartKind::Line,
                &name,
                mapping,
                categories.clone(),
                vec![series],
                format,
                None,
            )
        })
        .collect();
    Ok(panel_chart(ChartKind::PanelLine, mapping, panels, format))
}
