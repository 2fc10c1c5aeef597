use crate::build::*;

use chart_builder::tables::is_grouped;

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl InputSource {
    /// The same source, with a path resolved against the directory of the
    /// configuration file.
    pub fn relative_to(&self, root: &Path) -> InputSource {
        InputSource {
            file_path: root.join(&self.file_path).display().to_string(),
            ..self.clone()
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct NumberFormatSettings {
    pub preset: String,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub multiplier: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(rename = "chartType")]
    pub chart_type: String,
    pub title: Option<String>,
    #[serde(rename = "xAxisLabel")]
    pub x_axis_label: Option<String>,
    #[serde(rename = "yAxisLabel")]
    pub y_axis_label: Option<String>,
    #[serde(rename = "categoryColumn")]
    pub category_column: Option<String>,
    #[serde(rename = "valueColumn")]
    pub value_column: Option<String>,
    #[serde(rename = "secondaryColumn")]
    pub secondary_column: Option<String>,
    #[serde(rename = "parentColumn")]
    pub parent_column: Option<String>,
    #[serde(rename = "orderColumn")]
    pub order_column: Option<String>,
    #[serde(rename = "secondaryOrderColumn")]
    pub secondary_order_column: Option<String>,
    #[serde(rename = "numberFormat")]
    pub number_format: Option<NumberFormatSettings>,
}

impl ChartSettings {
    pub fn mapping(&self) -> ChartMapping {
        ChartMapping {
            title: self.title.clone().unwrap_or_default(),
            x_axis_label: self.x_axis_label.clone().unwrap_or_default(),
            y_axis_label: self.y_axis_label.clone().unwrap_or_default(),
            category_column: self.category_column.clone(),
            value_column: self.value_column.clone(),
            secondary_column: self.secondary_column.clone(),
            parent_column: self.parent_column.clone(),
            order_column: self.order_column.clone(),
            secondary_order_column: self.secondary_order_column.clone(),
        }
    }

    pub fn number_format(&self) -> CliResult<NumberFormat> {
        let nf = match &self.number_format {
            None => return Ok(NumberFormat::NONE),
            Some(nf) => nf,
        };
        let preset = match NumberFormatPreset::parse(
            &nf.preset,
            nf.prefix.as_deref().unwrap_or_default(),
            nf.suffix.as_deref().unwrap_or_default(),
            nf.min.as_deref().unwrap_or_default(),
            nf.max.as_deref().unwrap_or_default(),
        ) {
            Some(p) => p,
            None => whatever!("Unknown number format {:?}", nf.preset),
        };
        let mut format = NumberFormat::from_preset(&preset);
        if let Some(multiplier) = nf.multiplier {
            if !multiplier.is_finite() || multiplier == 0.0 {
                whatever!("Invalid multiplier {:?}", multiplier)
            }
            format.multiplier = multiplier;
        }
        Ok(format)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    #[serde(rename = "tableType")]
    pub table_type: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
    #[serde(rename = "categoryColumn")]
    pub category_column: Option<String>,
    #[serde(rename = "parentColumn")]
    pub parent_column: Option<String>,
    #[serde(rename = "groupColumn")]
    pub group_column: Option<String>,
    #[serde(rename = "orderColumn")]
    pub order_column: Option<String>,
    #[serde(rename = "groupOrderColumn")]
    pub group_order_column: Option<String>,
    #[serde(rename = "dataColumns", default)]
    pub data_columns: Vec<String>,
    #[serde(rename = "columnCaptions")]
    pub column_captions: Option<Vec<String>>,
    #[serde(rename = "categoryCaption")]
    pub category_caption: Option<String>,
}

pub fn validate_table_settings(ts: &TableSettings) -> CliResult<TableMapping> {
    let mapping = TableMapping {
        title: ts.title.clone().unwrap_or_default(),
        subtitle: ts.subtitle.clone().unwrap_or_default(),
        footer: ts.footer.clone().unwrap_or_default(),
        category_column: ts.category_column.clone(),
        parent_column: ts.parent_column.clone(),
        group_column: ts.group_column.clone(),
        order_column: ts.order_column.clone(),
        data_columns: ts.data_columns.clone(),
        column_captions: ts.column_captions.clone().unwrap_or_default(),
        category_caption: ts.category_caption.clone().unwrap_or_default(),
        group_order_column: ts.group_order_column.clone(),
    };
    let grouped = is_grouped(&mapping);
    match ts.table_type.as_deref() {
        None => {}
        Some("simple") if !grouped => {}
        Some("grouped") if grouped => {}
        Some("simple") => whatever!(
            "A simple table cannot have a group column: {:?}",
            ts.group_column
        ),
        Some("grouped") => whatever!("A grouped table needs a group column"),
        Some(x) => whatever!("Unknown table type {:?}", x),
    }
    Ok(mapping)
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PresetEntrySettings {
    pub value: String,
    #[serde(rename = "displayValue")]
    pub display_value: String,
    pub parent: String,
    pub order: i64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PresetSettings {
    pub code: String,
    pub name: String,
    pub data: Vec<PresetEntrySettings>,
}

impl PresetSettings {
    pub fn preset(&self) -> Preset {
        Preset {
            code: self.code.clone(),
            name: self.name.clone(),
            data: self
                .data
                .iter()
                .map(|e| PresetEntry {
                    value: e.value.clone(),
                    display_value: e.display_value.clone(),
                    parent: e.parent.clone(),
                    order: e.order,
                })
                .collect(),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub input: Option<InputSource>,
    pub chart: Option<ChartSettings>,
    pub table: Option<TableSettings>,
    pub preset: Option<PresetSettings>,
}

pub fn read_config(path: &str) -> CliResult<BuildConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: BuildConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_reference(path: &str) -> CliResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_settings(js: &str) -> ChartSettings {
        serde_json::from_str(js).unwrap()
    }

    #[test]
    fn chart_mapping() {
        let cs = chart_settings(
            r#"{"chartType": "bar_chart", "title": "Income", "categoryColumn": "Ethnicity",
                "valueColumn": "Value", "secondaryColumn": "[None]"}"#,
        );
        let m = cs.mapping();
        assert_eq!(m.title, "Income");
        assert_eq!(m.category_column.as_deref(), Some("Ethnicity"));
        assert_eq!(m.secondary_column.as_deref(), Some("[None]"));
        assert_eq!(m.parent_column, None);
        assert_eq!(cs.number_format().unwrap(), NumberFormat::NONE);
    }

    #[test]
    fn number_formats() {
        let cs = chart_settings(
            r#"{"chartType": "bar_chart", "numberFormat": {"preset": "percent", "multiplier": 100.0}}"#,
        );
        let nf = cs.number_format().unwrap();
        assert_eq!(nf.suffix, "%");
        assert_eq!(nf.max, Some(100.0));
        assert_eq!(nf.multiplier, 100.0);

        let cs = chart_settings(
            r#"{"chartType": "bar_chart", "numberFormat": {"preset": "other", "prefix": "£", "min": "0", "max": ""}}"#,
        );
        let nf = cs.number_format().unwrap();
        assert_eq!(nf.prefix, "£");
        assert_eq!(nf.min, Some(0.0));
        assert_eq!(nf.max, None);

        let cs = chart_settings(r#"{"chartType": "bar_chart", "numberFormat": {"preset": "euro"}}"#);
        assert!(cs.number_format().is_err());
    }

    #[test]
    fn table_types() {
        let ts: TableSettings = serde_json::from_str(
            r#"{"tableType": "simple", "groupColumn": "[None]", "dataColumns": ["Value"]}"#,
        )
        .unwrap();
        let m = validate_table_settings(&ts).unwrap();
        assert_eq!(m.data_columns, vec!["Value"]);

        let ts: TableSettings = serde_json::from_str(
            r#"{"tableType": "simple", "groupColumn": "Sex", "dataColumns": ["Value"]}"#,
        )
        .unwrap();
        assert!(validate_table_settings(&ts).is_err());

        let ts: TableSettings =
            serde_json::from_str(r#"{"tableType": "pivot", "dataColumns": []}"#).unwrap();
        assert!(validate_table_settings(&ts).is_err());
    }

    #[test]
    fn relative_input() {
        let source = InputSource {
            provider: "text".to_string(),
            file_path: "data.txt".to_string(),
            excel_worksheet_name: None,
        };
        let resolved = source.relative_to(Path::new("/tmp/tests"));
        assert_eq!(resolved.file_path, "/tmp/tests/data.txt");
        assert_eq!(resolved.provider, "text");
    }
}
