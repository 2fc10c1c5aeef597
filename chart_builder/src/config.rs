// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Tabular data as pasted by an editor.
///
/// The first row holds the column names, every following row holds the
/// cells. Rows are not required to have the same length: this is checked
/// by the validation step, not on construction.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Grid {
        Grid { rows }
    }

    /// All the rows, including the header row.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The header row. Empty if the grid is empty.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// The rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The trimmed, lowercased headers used for column lookups.
    pub fn lower_headers(&self) -> Vec<String> {
        self.header()
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect()
    }
}

impl<S: Into<String>> From<Vec<Vec<S>>> for Grid {
    fn from(rows: Vec<Vec<S>>) -> Grid {
        Grid::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(|c| c.into()).collect())
                .collect(),
        )
    }
}

/// An externally supplied classification of category values.
///
/// It gives every raw value a display name, a parent and a position.
#[derive(PartialEq, Debug, Clone)]
pub struct Preset {
    pub code: String,
    pub name: String,
    pub data: Vec<PresetEntry>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct PresetEntry {
    /// The raw value as it appears in the pasted data.
    pub value: String,
    pub display_value: String,
    pub parent: String,
    pub order: i64,
}

// ******** Output data structures *********

/// Position of a category value in a parent/child hierarchy.
///
/// A value is its own parent exactly when `is_parent` is set.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Relationships {
    pub is_parent: bool,
    pub is_child: bool,
    pub parent: String,
}

/// A value used for sorting: numeric when the cell could be read as a
/// number, the raw text otherwise.
#[derive(PartialEq, Debug, Clone)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

/// The kind of marker shown by the renderer in place of a non-numeric value.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MissingMarker {
    /// `N/A` or `-`
    NotApplicable,
    /// `!`: withheld because of a small sample.
    Withheld,
    /// `?`
    Missing,
    /// `*`: the estimate is not reliable.
    Unreliable,
    /// `~`: the value rounds to zero.
    RoundsToZero,
    Unknown,
}

impl MissingMarker {
    pub fn from_text(text: &str) -> MissingMarker {
        match text.trim() {
            "N/A" | "n/a" | "-" => MissingMarker::NotApplicable,
            "!" => MissingMarker::Withheld,
            "?" => MissingMarker::Missing,
            "*" => MissingMarker::Unreliable,
            "~" => MissingMarker::RoundsToZero,
            _ => MissingMarker::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MissingMarker::NotApplicable => "not_applicable",
            MissingMarker::Withheld => "withheld",
            MissingMarker::Missing => "missing",
            MissingMarker::Unreliable => "unreliable",
            MissingMarker::RoundsToZero => "rounds_to_zero",
            MissingMarker::Unknown => "unknown",
        }
    }
}

/// One value of a chart series.
#[derive(PartialEq, Debug, Clone)]
pub struct DataPoint {
    pub y: f64,
    pub category: String,
    /// `"number"` for numeric cells, the original cell text otherwise.
    pub text: String,
    pub relationships: Option<Relationships>,
    pub color: Option<String>,
    /// Filled in by the preprocessing step for non-numeric cells.
    pub marker: Option<MissingMarker>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Series {
    pub name: String,
    pub data: Vec<DataPoint>,
}

/// The chart kinds that can be built.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    Component,
    PanelBar,
    PanelLine,
}

impl ChartKind {
    /// Reads the chart type as sent by the editor. Both the short names and
    /// the names of the chart selector are accepted.
    pub fn parse(name: &str) -> Option<ChartKind> {
        match name.trim() {
            "bar" | "bar_chart" => Some(ChartKind::Bar),
            "line" | "line_chart" | "line_graph" => Some(ChartKind::Line),
            "component" | "component_chart" => Some(ChartKind::Component),
            "panel_bar" | "panel_bar_chart" => Some(ChartKind::PanelBar),
            "panel_line" | "panel_line_chart" => Some(ChartKind::PanelLine),
            _ => None,
        }
    }

    /// The `type` tag written in the chart object.
    pub fn type_name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Component => "component",
            ChartKind::PanelBar => "panel_bar_chart",
            ChartKind::PanelLine => "panel_line_chart",
        }
    }
}

/// A chart with a single plotting area.
#[derive(PartialEq, Debug, Clone)]
pub struct SingleChart {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub number_format: NumberFormat,
    /// Set when a parent column was mapped: the parents in display order.
    pub parents: Option<Vec<String>>,
    pub decimal_places: usize,
    pub version: String,
}

/// A set of small charts, one per value of the panel column.
#[derive(PartialEq, Debug, Clone)]
pub struct PanelChart {
    pub kind: ChartKind,
    pub title: String,
    pub panels: Vec<SingleChart>,
    pub number_format: NumberFormat,
    pub decimal_places: usize,
    pub version: String,
}

#[derive(PartialEq, Debug, Clone)]
pub enum ChartObject {
    Single(SingleChart),
    Panel(PanelChart),
}

impl ChartObject {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartObject::Single(c) => c.kind,
            ChartObject::Panel(p) => p.kind,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TableKind {
    Simple,
    Grouped,
}

impl TableKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            TableKind::Simple => "simple",
            TableKind::Grouped => "grouped",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct TableRow {
    pub category: String,
    pub relationships: Relationships,
    pub order: SortValue,
    pub values: Vec<String>,
    pub sort_values: Vec<SortValue>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TableGroup {
    pub group: String,
    pub data: Vec<TableRow>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TableObject {
    pub kind: TableKind,
    pub header: String,
    pub subtitle: String,
    pub footer: String,
    pub category: String,
    pub category_caption: String,
    pub columns: Vec<String>,
    pub parent_child: bool,
    /// For grouped tables, one row per category with the values of every
    /// group concatenated in group order.
    pub data: Vec<TableRow>,
    pub groups: Option<Vec<TableGroup>>,
    pub group_columns: Option<Vec<String>>,
}

// ******** Errors *********

/// A problem found while validating the data. These are reported to the
/// editor, they never abort the program.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum ValidationError {
    /// A configured column does not exist in the data.
    Settings { column: String },
    /// No column looks like an ethnicity column.
    Ethnicity,
    /// No column looks like a value column.
    Value,
    /// Some rows do not have as many cells as the header.
    Rectangle,
    /// A (category, group) combination has no row.
    MissingData { category: String, group: String },
    /// A category, or a (category, group) combination, has several rows.
    Duplication {
        category: String,
        group: Option<String>,
    },
    /// The number of rows is a multiple of the number of categories: there is
    /// probably a second dimension hidden in the data.
    ComplexData,
}

impl ValidationError {
    /// The name of the error, as understood by the editor.
    pub fn error_type(&self) -> &'static str {
        match self {
            ValidationError::Settings { .. } => "SettingsError",
            ValidationError::Ethnicity => "EthnicityError",
            ValidationError::Value => "ValueError",
            ValidationError::Rectangle => "RectangleError",
            ValidationError::MissingData { .. } => "MissingDataError",
            ValidationError::Duplication { .. } => "DuplicationError",
            ValidationError::ComplexData => "ComplexDataError",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Settings { column } => {
                write!(f, "column '{}' could not be found in the data", column)
            }
            ValidationError::Ethnicity => write!(f, "no column named like 'ethnicity'"),
            ValidationError::Value => write!(f, "no column named like 'value'"),
            ValidationError::Rectangle => {
                write!(f, "all the rows must have the same number of cells")
            }
            ValidationError::MissingData { category, group } => {
                write!(f, "no data for '{}' in '{}'", category, group)
            }
            ValidationError::Duplication {
                category,
                group: Some(group),
            } => write!(f, "'{}' appears more than once in '{}'", category, group),
            ValidationError::Duplication {
                category,
                group: None,
            } => write!(f, "'{}' appears more than once", category),
            ValidationError::ComplexData => write!(
                f,
                "the data repeats every category: it may have a second dimension"
            ),
        }
    }
}

/// Errors that prevent a chart or a table from being built.
#[derive(PartialEq, Debug, Clone)]
pub enum BuildError {
    /// The column is mapped but not present in the headers.
    UnknownColumn(String),
    /// A required mapping was left empty.
    MissingSetting(String),
    /// The validation gate did not pass.
    InvalidData(Vec<ValidationError>),
}

impl Error for BuildError {}

impl Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnknownColumn(c) => write!(f, "unknown column: {}", c),
            BuildError::MissingSetting(s) => write!(f, "missing setting: {}", s),
            BuildError::InvalidData(errs) => {
                write!(f, "{} validation error(s)", errs.len())?;
                for e in errs {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
        }
    }
}

// ********* Configuration **********

/// How values are displayed: resolved from a [NumberFormatPreset].
#[derive(PartialEq, Debug, Clone)]
pub struct NumberFormat {
    pub multiplier: f64,
    pub prefix: String,
    pub suffix: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// The closed set of number formats offered to editors.
#[derive(PartialEq, Debug, Clone)]
pub enum NumberFormatPreset {
    None,
    Percent,
    Other {
        prefix: String,
        suffix: String,
        min: Option<f64>,
        max: Option<f64>,
    },
}

/// The mapping between the pasted columns and the parts of a chart.
///
/// Column names are matched without regard to case or surrounding spaces.
/// `None`, empty strings and the selector placeholders (`[None]`,
/// `[Required]`, `Please select`) all mean "not mapped".
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ChartMapping {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    /// The x-axis (bar, line), the groups of a component chart.
    pub category_column: Option<String>,
    pub value_column: Option<String>,
    /// Series for bar, line and component charts, panels for panel charts.
    pub secondary_column: Option<String>,
    pub parent_column: Option<String>,
    /// Orders the categories.
    pub order_column: Option<String>,
    /// Orders the series or the panels.
    pub secondary_order_column: Option<String>,
}

impl ChartMapping {
    /// The column names set in the mapping, besides the category. They may
    /// still hold placeholders.
    pub fn mapped_columns(&self) -> Vec<&str> {
        [
            self.value_column.as_deref(),
            self.secondary_column.as_deref(),
            self.parent_column.as_deref(),
            self.order_column.as_deref(),
            self.secondary_order_column.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// The mapping between the pasted columns and the parts of a table.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TableMapping {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub category_column: Option<String>,
    pub parent_column: Option<String>,
    pub group_column: Option<String>,
    pub order_column: Option<String>,
    pub data_columns: Vec<String>,
    /// Display names for the data columns. Missing or empty captions fall
    /// back to the column name.
    pub column_captions: Vec<String>,
    pub category_caption: String,
    pub group_order_column: Option<String>,
}

impl TableMapping {
    /// The column names set in the mapping, besides the category. The data
    /// columns come last.
    pub fn mapped_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = [
            self.parent_column.as_deref(),
            self.group_column.as_deref(),
            self.order_column.as_deref(),
            self.group_order_column.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        columns.extend(self.data_columns.iter().map(|c| c.as_str()));
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_of_missing_data() {
        let cases = [
            ("N/A", MissingMarker::NotApplicable),
            ("n/a", MissingMarker::NotApplicable),
            ("-", MissingMarker::NotApplicable),
            ("!", MissingMarker::Withheld),
            ("?", MissingMarker::Missing),
            ("*", MissingMarker::Unreliable),
            ("~", MissingMarker::RoundsToZero),
            (" ~ ", MissingMarker::RoundsToZero),
            ("unavailable", MissingMarker::Unknown),
        ];
        for (text, marker) in cases.iter() {
            assert_eq!(MissingMarker::from_text(text), *marker, "{:?}", text);
        }
        assert_eq!(MissingMarker::Missing.name(), "missing");
        assert_eq!(MissingMarker::Unreliable.name(), "unreliable");
        assert_eq!(MissingMarker::RoundsToZero.name(), "rounds_to_zero");
        assert_eq!(MissingMarker::Unknown.name(), "unknown");
    }

    #[test]
    fn mapped_columns() {
        let chart = ChartMapping {
            category_column: Some("Ethnicity".to_string()),
            value_column: Some("Value".to_string()),
            order_column: Some("[None]".to_string()),
            ..ChartMapping::default()
        };
        assert_eq!(chart.mapped_columns(), vec!["Value", "[None]"]);

        let table = TableMapping {
            group_column: Some("Sex".to_string()),
            data_columns: vec!["Value".to_string(), "Count".to_string()],
            ..TableMapping::default()
        };
        assert_eq!(table.mapped_columns(), vec!["Sex", "Value", "Count"]);
    }

    #[test]
    fn chart_kinds() {
        assert_eq!(ChartKind::parse("line_graph"), Some(ChartKind::Line));
        assert_eq!(ChartKind::parse("pie_chart"), None);
        assert_eq!(ChartKind::PanelLine.type_name(), "panel_line_chart");
    }
}
