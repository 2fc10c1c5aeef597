// The JSON objects consumed by the renderer.

use chart_builder::*;
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

fn relationships_to_json(r: &Relationships) -> JSValue {
    json!({
        "is_parent": r.is_parent,
        "is_child": r.is_child,
        "parent": r.parent,
    })
}

// Unset bounds are written as empty strings.
fn bound_to_json(b: Option<f64>) -> JSValue {
    match b {
        Some(x) => json!(x),
        None => json!(""),
    }
}

fn number_format_to_json(f: &NumberFormat) -> JSValue {
    json!({
        "multiplier": f.multiplier,
        "prefix": f.prefix,
        "suffix": f.suffix,
        "min": bound_to_json(f.min),
        "max": bound_to_json(f.max),
    })
}

fn point_to_json(p: &DataPoint) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    js.insert("y".to_string(), json!(p.y));
    js.insert("category".to_string(), json!(p.category));
    js.insert("text".to_string(), json!(p.text));
    if let Some(r) = &p.relationships {
        js.insert("relationships".to_string(), relationships_to_json(r));
    }
    if let Some(color) = &p.color {
        js.insert("color".to_string(), json!(color));
    }
    if let Some(marker) = &p.marker {
        js.insert("marker".to_string(), json!(marker.name()));
    }
    JSValue::Object(js)
}

fn single_chart_to_json(c: &SingleChart) -> JSValue {
    let series: Vec<JSValue> = c
        .series
        .iter()
        .map(|s| {
            let data: Vec<JSValue> = s.data.iter().map(point_to_json).collect();
            json!({"name": s.name, "data": data})
        })
        .collect();
    let mut js = json!({
        "type": c.kind.type_name(),
        "title": {"text": c.title},
        "xAxis": {"title": {"text": c.x_axis_label}, "categories": c.categories},
        "yAxis": {"title": {"text": c.y_axis_label}},
        "series": series,
        "number_format": number_format_to_json(&c.number_format),
        "decimalPlaces": c.decimal_places,
        "version": c.version,
    });
    if let Some(parents) = &c.parents {
        js["parents"] = json!(parents);
    }
    js
}

pub fn chart_to_json(chart: &ChartObject) -> JSValue {
    match chart {
        ChartObject::Single(c) => single_chart_to_json(c),
        ChartObject::Panel(p) => {
            let panels: Vec<JSValue> = p.panels.iter().map(single_chart_to_json).collect();
            json!({
                "type": p.kind.type_name(),
                "title": {"text": p.title},
                "panels": panels,
                "number_format": number_format_to_json(&p.number_format),
                "decimalPlaces": p.decimal_places,
                "version": p.version,
            })
        }
    }
}

fn sort_value_to_json(v: &SortValue) -> JSValue {
    match v {
        SortValue::Number(x) => json!(x),
        SortValue::Text(s) => json!(s),
    }
}

fn row_to_json(r: &TableRow) -> JSValue {
    let sort_values: Vec<JSValue> = r.sort_values.iter().map(sort_value_to_json).collect();
    json!({
        "category": r.category,
        "relationships": relationships_to_json(&r.relationships),
        "order": sort_value_to_json(&r.order),
        "values": r.values,
        "sort_values": sort_values,
    })
}

pub fn table_to_json(t: &TableObject) -> JSValue {
    let data: Vec<JSValue> = t.data.iter().map(row_to_json).collect();
    let mut js = json!({
        "type": t.kind.type_name(),
        "header": t.header,
        "subtitle": t.subtitle,
        "footer": t.footer,
        "category": t.category,
        "category_caption": t.category_caption,
        "columns": t.columns,
        "parent_child": t.parent_child,
        "data": data,
    });
    if let Some(groups) = &t.groups {
        let groups_js: Vec<JSValue> = groups
            .iter()
            .map(|g| {
                let rows: Vec<JSValue> = g.data.iter().map(row_to_json).collect();
                json!({"group": g.group, "data": rows})
            })
            .collect();
        js["groups"] = json!(groups_js);
    }
    if let Some(group_columns) = &t.group_columns {
        js["group_columns"] = json!(group_columns);
    }
    js
}

fn error_to_json(e: &ValidationError) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    js.insert("error_type".to_string(), json!(e.error_type()));
    js.insert("message".to_string(), json!(e.to_string()));
    match e {
        ValidationError::Settings { column } => {
            js.insert("column".to_string(), json!(column));
        }
        ValidationError::MissingData { category, group } => {
            js.insert("category".to_string(), json!(category));
            js.insert("group".to_string(), json!(group));
        }
        ValidationError::Duplication { category, group } => {
            js.insert("category".to_string(), json!(category));
            if let Some(g) = group {
                js.insert("group".to_string(), json!(g));
            }
        }
        _ => {}
    }
    JSValue::Object(js)
}

pub fn errors_to_json(errors: &[ValidationError]) -> JSValue {
    let errors_js: Vec<JSValue> = errors.iter().map(error_to_json).collect();
    json!({ "errors": errors_js })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format_bounds() {
        let js = number_format_to_json(&NumberFormat::NONE);
        assert_eq!(
            js,
            json!({"multiplier": 1.0, "prefix": "", "suffix": "", "min": "", "max": ""})
        );
        let percent = NumberFormat::from_preset(&NumberFormatPreset::Percent);
        let js = number_format_to_json(&percent);
        assert_eq!(js["min"], json!(0.0));
        assert_eq!(js["max"], json!(100.0));
    }

    #[test]
    fn points_skip_unset_fields() {
        let p = DataPoint {
            y: 0.0,
            category: "White".to_string(),
            text: "!".to_string(),
            relationships: None,
            color: None,
            marker: Some(MissingMarker::Withheld),
        };
        assert_eq!(
            point_to_json(&p),
            json!({"y": 0.0, "category": "White", "text": "!", "marker": "withheld"})
        );
    }

    #[test]
    fn errors() {
        let js = errors_to_json(&[
            ValidationError::Duplication {
                category: "White".to_string(),
                group: None,
            },
            ValidationError::Rectangle,
        ]);
        assert_eq!(js["errors"][0]["error_type"], json!("DuplicationError"));
        assert_eq!(js["errors"][0]["category"], json!("White"));
        assert!(js["errors"][0].get("group").is_none());
        assert_eq!(js["errors"][1]["error_type"], json!("RectangleError"));
    }
}
