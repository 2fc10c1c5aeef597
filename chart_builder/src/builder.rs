pub use crate::config::*;

use log::debug;

use crate::charts::build_chart;
use crate::columns::selected;
use crate::tables::build_table_object;
use crate::text::parse_text;
use crate::validation::{find_header, validate_for_build};

/// A builder for charts and tables.
///
/// It holds the data and the column mapping, and runs the validation gate
/// before building anything.
///
/// ```
/// use chart_builder::builder::Builder;
/// use chart_builder::{BuildError, ChartKind, ChartObject};
///
/// let chart = Builder::from_text("Ethnicity|Value\nWhite|10\nBlack|20")
///     .title("Income")
///     .value("Value")
///     .chart(ChartKind::Bar)?;
///
/// if let ChartObject::Single(c) = chart {
///     assert_eq!(c.categories, vec!["White", "Black"]);
/// }
/// # Ok::<(), BuildError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    pub(crate) _grid: Grid,
    pub(crate) _chart: ChartMapping,
    pub(crate) _table: TableMapping,
    pub(crate) _format: NumberFormat,
}

fn column(name: &str) -> Option<String> {
    Some(name.to_string())
}

impl Builder {
    pub fn new(grid: &Grid) -> Builder {
        Builder {
            _grid: grid.clone(),
            _chart: ChartMapping::default(),
            _table: TableMapping::default(),
            _format: NumberFormat::NONE,
        }
    }

    /// Starts from pasted text, see [crate::text::parse_text].
    pub fn from_text(raw: &str) -> Builder {
        Builder::new(&parse_text(raw))
    }

    /// The title of the chart, or the header of the table.
    pub fn title(mut self, title: &str) -> Builder {
        self._chart.title = title.to_string();
        self._table.title = title.to_string();
        self
    }

    pub fn subtitle(mut self, subtitle: &str) -> Builder {
        self._table.subtitle = subtitle.to_string();
        self
    }

    pub fn footer(mut self, footer: &str) -> Builder {
        self._table.footer = footer.to_string();
        self
    }

    pub fn axis_labels(mut self, x: &str, y: &str) -> Builder {
        self._chart.x_axis_label = x.to_string();
        self._chart.y_axis_label = y.to_string();
        self
    }

    /// The category column. When it is not set, the first column whose
    /// name contains "ethnicity" is used.
    pub fn category(mut self, name: &str) -> Builder {
        self._chart.category_column = column(name);
        self._table.category_column = column(name);
        self
    }

    pub fn value(mut self, name: &str) -> Builder {
        self._chart.value_column = column(name);
        self
    }

    /// The series or panels of a chart, the groups of a table. The data is
    /// validated per (category, secondary) pair.
    pub fn secondary(mut self, name: &str) -> Builder {
        self._chart.secondary_column = column(name);
        self._table.group_column = column(name);
        self
    }

    pub fn parent(mut self, name: &str) -> Builder {
        self._chart.parent_column = column(name);
        self._table.parent_column = column(name);
        self
    }

    pub fn order(mut self, name: &str) -> Builder {
        self._chart.order_column = column(name);
        self._table.order_column = column(name);
        self
    }

    pub fn secondary_order(mut self, name: &str) -> Builder {
        self._chart.secondary_order_column = column(name);
        self._table.group_order_column = column(name);
        self
    }

    pub fn data_columns(mut self, names: &[&str]) -> Builder {
        self._table.data_columns = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn column_captions(mut self, captions: &[&str]) -> Builder {
        self._table.column_captions = captions.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn category_caption(mut self, caption: &str) -> Builder {
        self._table.category_caption = caption.to_string();
        self
    }

    pub fn number_format(mut self, preset: &NumberFormatPreset) -> Builder {
        self._format = NumberFormat::from_preset(preset);
        self
    }

    /// Scales every chart value, see [NumberFormat::apply_multiplier].
    pub fn multiplier(mut self, multiplier: f64) -> Builder {
        self._format.multiplier = multiplier;
        self
    }

    fn category_column(&self) -> Option<String> {
        match selected(self._chart.category_column.as_deref()) {
            Some(c) => Some(c.to_string()),
            None => {
                let found = find_header("ethnicity", &self._grid);
                debug!("category_column: not set, detected {:?}", found);
                found
            }
        }
    }

    /// Runs the validation gate for a chart. An empty list means the data
    /// can be built.
    pub fn validate(&self) -> Vec<ValidationError> {
        self.validate_columns(&self._chart.mapped_columns())
    }

    /// Runs the validation gate for a table.
    pub fn validate_table(&self) -> Vec<ValidationError> {
        self.validate_columns(&self._table.mapped_columns())
    }

    fn validate_columns(&self, columns: &[&str]) -> Vec<ValidationError> {
        let category = self.category_column();
        validate_for_build(
            &self._grid,
            category.as_deref(),
            self._chart.secondary_column.as_deref(),
            columns,
        )
    }

    fn checked(&self, errors: Vec<ValidationError>) -> Result<Option<String>, BuildError> {
        if errors.is_empty() {
            Ok(self.category_column())
        } else {
            Err(BuildError::InvalidData(errors))
        }
    }

    pub fn chart(&self, kind: ChartKind) -> Result<ChartObject, BuildError> {
        let category_column = self.checked(self.validate())?;
        let mapping = ChartMapping {
            category_column,
            ..self._chart.clone()
        };
        build_chart(&self._grid, kind, &mapping, &self._format)
    }

    pub fn table(&self) -> Result<TableObject, BuildError> {
        let category_column = self.checked(self.validate_table())?;
        let mapping = TableMapping {
            category_column,
            ..self._table.clone()
        };
        build_table_object(&self._grid, &mapping)
    }
}
