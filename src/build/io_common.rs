use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Drops the rows in which every cell is empty. Spreadsheets often carry a
/// few of them after the data.
pub fn non_empty_rows(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/data/income.csv"), "income.csv");
        assert_eq!(simplify_file_name("income.csv"), "income.csv");
    }

    #[test]
    fn empty_rows_are_dropped() {
        let rows = vec![
            vec!["Ethnicity".to_string(), "Value".to_string()],
            vec!["".to_string(), " ".to_string()],
            vec!["White".to_string(), "".to_string()],
        ];
        let kept = non_empty_rows(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1][0], "White");
    }
}
