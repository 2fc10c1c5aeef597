use log::{debug, info, warn};

use chart_builder::columns::selected;
use chart_builder::presets::{PRESET_CATEGORY_HEADER, PRESET_ORDER_HEADER, PRESET_PARENT_HEADER};
use chart_builder::validation::find_header;
use chart_builder::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_text;
mod output;

use crate::build::config_reader::*;
use crate::build::output::*;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The worksheet {name} could not be found"))]
    MissingWorksheet { name: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error reading file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No input: pass --input or set the input in the configuration"))]
    MissingInput {},
    #[snafu(display("Unknown input type {name}"))]
    UnknownInputType { name: String },
    #[snafu(display("No category column is selected and none looks like an ethnicity"))]
    MissingCategory {},
    #[snafu(display("Could not build: {source}"))]
    Building { source: BuildError },
    #[snafu(display("The data did not pass the validation ({} errors)", errors.len()))]
    Validation { errors: Vec<ValidationError> },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CliResult<T> = Result<T, CliError>;
pub type BCliResult<T> = Result<T, Box<CliError>>;

/// What a build produced, written as JSON in every case.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Chart(ChartObject),
    /// The chart type is not known: there is nothing to render.
    Nothing,
    Table(TableObject),
    Invalid(Vec<ValidationError>),
}

impl BuildOutcome {
    pub fn to_json(&self) -> JSValue {
        match self {
            BuildOutcome::Chart(c) => chart_to_json(c),
            BuildOutcome::Nothing => JSValue::Null,
            BuildOutcome::Table(t) => table_to_json(t),
            BuildOutcome::Invalid(errors) => errors_to_json(errors),
        }
    }
}

fn read_input(source: &InputSource) -> BCliResult<Grid> {
    info!(
        "Attempting to read {} file {:?}",
        source.provider, source.file_path
    );
    let grid = match source.provider.as_str() {
        "text" | "txt" => io_text::read_text_grid(&source.file_path)?,
        "csv" => io_csv::read_csv_grid(&source.file_path)?,
        "xlsx" | "excel" => io_excel::read_excel_grid(
            &source.file_path,
            source.excel_worksheet_name.as_deref(),
        )?,
        x => {
            return Err(Box::new(CliError::UnknownInputType {
                name: x.to_string(),
            }))
        }
    };
    debug!("read_input: {} rows", grid.rows().len());
    Ok(grid)
}

// The category column, defaulting to the first column named like an
// ethnicity.
fn category_or_detected(grid: &Grid, category: &Option<String>) -> Option<String> {
    match selected(category.as_deref()) {
        Some(c) => Some(c.to_string()),
        None => find_header("ethnicity", grid),
    }
}

fn selected_columns(columns: &[&Option<String>]) -> Vec<String> {
    columns
        .iter()
        .filter_map(|c| selected(c.as_deref()))
        .map(|c| c.to_string())
        .collect()
}

fn merged_with_preset(
    grid: &Grid,
    category: &Option<String>,
    preset: &Preset,
    data_columns: &[String],
) -> CliResult<Grid> {
    let category = category_or_detected(grid, category).context(MissingCategorySnafu {})?;
    info!(
        "merged_with_preset: merging preset {:?} on column {:?}",
        preset.code, category
    );
    merge_preset(grid, &category, preset, data_columns).context(BuildingSnafu {})
}

fn preset_column(name: &str) -> Option<String> {
    Some(name.to_string())
}

fn build_chart_outcome(
    grid: &Grid,
    chart: &ChartSettings,
    preset: Option<&Preset>,
) -> CliResult<BuildOutcome> {
    let format = chart.number_format()?;
    let mut mapping = chart.mapping();
    let grid = match preset {
        Some(p) => {
            let data_columns = selected_columns(&[
                &mapping.value_column,
                &mapping.secondary_column,
                &mapping.secondary_order_column,
            ]);
            let merged = merged_with_preset(grid, &mapping.category_column, p, &data_columns)?;
            mapping.category_column = preset_column(PRESET_CATEGORY_HEADER);
            mapping.parent_column = preset_column(PRESET_PARENT_HEADER);
            mapping.order_column = preset_column(PRESET_ORDER_HEADER);
            merged
        }
        None => grid.clone(),
    };
    mapping.category_column = category_or_detected(&grid, &mapping.category_column);

    let errors = validate_for_build(
        &grid,
        mapping.category_column.as_deref(),
        mapping.secondary_column.as_deref(),
        &mapping.mapped_columns(),
    );
    if !errors.is_empty() {
        warn!("build_chart_outcome: {} validation errors", errors.len());
        return Ok(BuildOutcome::Invalid(errors));
    }

    let chart_o = build_chart_object(&grid, &chart.chart_type, &mapping, &format)
        .context(BuildingSnafu {})?;
    Ok(match chart_o {
        Some(c) => {
            info!("build_chart_outcome: built a {} chart", c.kind().type_name());
            BuildOutcome::Chart(c)
        }
        None => BuildOutcome::Nothing,
    })
}

fn build_table_outcome(
    grid: &Grid,
    table: &TableSettings,
    preset: Option<&Preset>,
) -> CliResult<BuildOutcome> {
    let mut mapping = validate_table_settings(table)?;
    let grid = match preset {
        Some(p) => {
            let mut data_columns = mapping.data_columns.clone();
            data_columns.extend(selected_columns(&[
                &mapping.group_column,
                &mapping.group_order_column,
            ]));
            let merged = merged_with_preset(grid, &mapping.category_column, p, &data_columns)?;
            mapping.category_column = preset_column(PRESET_CATEGORY_HEADER);
            mapping.parent_column = preset_column(PRESET_PARENT_HEADER);
            mapping.order_column = preset_column(PRESET_ORDER_HEADER);
            merged
        }
        None => grid.clone(),
    };
    mapping.category_column = category_or_detected(&grid, &mapping.category_column);

    let errors = validate_for_build(
        &grid,
        mapping.category_column.as_deref(),
        mapping.group_column.as_deref(),
        &mapping.mapped_columns(),
    );
    if !errors.is_empty() {
        warn!("build_table_outcome: {} validation errors", errors.len());
        return Ok(BuildOutcome::Invalid(errors));
    }

    let table = build_table_object(&grid, &mapping).context(BuildingSnafu {})?;
    Ok(BuildOutcome::Table(table))
}

/// Validates and builds the object described by the configuration.
pub fn build_object(grid: &Grid, config: &BuildConfig) -> CliResult<BuildOutcome> {
    let preset = config.preset.as_ref().map(|p| p.preset());
    match (&config.chart, &config.table) {
        (Some(chart), None) => build_chart_outcome(grid, chart, preset.as_ref()),
        (None, Some(table)) => build_table_outcome(grid, table, preset.as_ref()),
        (Some(_), Some(_)) => {
            whatever!("The configuration has both a chart and a table section")
        }
        (None, None) => whatever!("The configuration has no chart or table section"),
    }
}

fn write_output(out: Option<&str>, pretty_js: &str) -> CliResult<()> {
    match out {
        None | Some("stdout") | Some("") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("write_output: writing to {:?}", path);
            fs::write(path, pretty_js).context(WritingFileSnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(reference_path: &str, result_js: &JSValue) -> CliResult<()> {
    let reference = read_reference(reference_path)?;
    debug!("check_reference: reference: {:?}", reference);
    if &reference != result_js {
        warn!("Found differences with the reference");
        let pretty_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        let pretty_js = serde_json::to_string_pretty(result_js).context(ParsingJsonSnafu {})?;
        print_diff(pretty_ref.as_str(), pretty_js.as_str(), "\n");
        whatever!("Difference detected between the built object and the reference")
    }
    Ok(())
}

pub fn run_build(args: &Args) -> BCliResult<()> {
    let config = read_config(&args.config)?;
    info!("config: {:?}", config);

    let source = match &args.input {
        Some(path) => InputSource {
            provider: args.input_type.clone().unwrap_or_else(|| "text".to_string()),
            file_path: path.clone(),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        },
        None => {
            let root_p = Path::new(args.config.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?;
            config
                .input
                .as_ref()
                .context(MissingInputSnafu {})?
                .relative_to(root_p)
        }
    };
    let grid = read_input(&source)?;

    let outcome = build_object(&grid, &config)?;
    let result_js = outcome.to_json();
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty_js)?;

    // The reference object, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &result_js)?;
    }

    match outcome {
        BuildOutcome::Invalid(errors) => Err(Box::new(CliError::Validation { errors })),
        _ => Ok(()),
    }
}

#[cfg(test)]
fn test_wrapper(test_name: &str) -> BCliResult<()> {
    let test_dir = option_env!("CHARTBUILD_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"));
    info!("Running test {}", test_name);
    let args = Args {
        config: format!("{}/{}/{}_config.json", test_dir, test_name, test_name),
        reference: Some(format!(
            "{}/{}/{}_expected.json",
            test_dir, test_name, test_name
        )),
        out: None,
        input: None,
        input_type: None,
        excel_worksheet_name: None,
        verbose: false,
    };
    let res = run_build(&args);
    if let Err(e) = &res {
        eprintln!("An error occured {}", e);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_built(test_name: &str) {
        let res = test_wrapper(test_name);
        assert!(res.is_ok(), "{:?}", res);
    }

    fn assert_invalid(test_name: &str) {
        let res = test_wrapper(test_name);
        match res {
            Err(e) => assert!(matches!(*e, CliError::Validation { .. }), "{:?}", e),
            Ok(()) => panic!("{} should not pass the validation", test_name),
        }
    }

    #[test]
    fn bar_simple() {
        assert_built("bar_simple");
    }

    #[test]
    fn bar_parents() {
        assert_built("bar_parents");
    }

    #[test]
    fn line_series() {
        assert_built("line_series");
    }

    #[test]
    fn panel_bar() {
        assert_built("panel_bar");
    }

    #[test]
    fn table_grouped() {
        assert_built("table_grouped");
    }

    #[test]
    fn table_csv() {
        assert_built("table_csv");
    }

    #[test]
    fn table_preset() {
        assert_built("table_preset");
    }

    #[test]
    fn invalid_duplicates() {
        assert_invalid("invalid_duplicates");
    }

    #[test]
    fn invalid_structure() {
        assert_invalid("invalid_structure");
    }

    #[test]
    fn unknown_chart_type() {
        assert_built("unknown_chart_type");
    }

    #[test]
    fn both_sections_rejected() {
        let grid = parse_text("Ethnicity|Value\nWhite|1");
        let config: BuildConfig = serde_json::from_str(
            r#"{"chart": {"chartType": "bar_chart"}, "table": {"dataColumns": []}}"#,
        )
        .unwrap();
        assert!(build_object(&grid, &config).is_err());
    }

    #[test]
    fn unknown_value_column_is_reported() {
        let grid = parse_text("Ethnicity|Value\nWhite|1\nBlack|2");
        let config: BuildConfig = serde_json::from_str(
            r#"{"chart": {"chartType": "bar_chart", "categoryColumn": "Ethnicity",
                "valueColumn": "Valeur"}}"#,
        )
        .unwrap();
        let outcome = build_object(&grid, &config).unwrap();
        assert_eq!(
            outcome,
            BuildOutcome::Invalid(vec![ValidationError::Settings {
                column: "Valeur".to_string()
            }])
        );
        assert_eq!(outcome.to_json()["errors"][0]["error_type"], "SettingsError");
        assert_eq!(outcome.to_json()["errors"][0]["column"], "Valeur");
    }

    #[test]
    fn grouped_table_needs_group() {
        let grid = parse_text("Ethnicity|Value\nWhite|1");
        let config: BuildConfig = serde_json::from_str(
            r#"{"table": {"tableType": "grouped", "dataColumns": ["Value"]}}"#,
        )
        .unwrap();
        assert!(build_object(&grid, &config).is_err());
    }
}
