use log::debug;

use crate::config::Grid;

/// Turns pasted text into a grid.
///
/// The delimiter is decided once for the whole text: tabs if the text
/// contains any tab, pipes otherwise. A text mixing both delimiters is
/// therefore split on tabs only. Cells are trimmed. Rows of different
/// lengths are kept as they are and reported later by the validation.
pub fn parse_text(raw: &str) -> Grid {
    let trimmed = raw.trim_matches(|c: char| c == '\n' || c == '\r' || c == ' ');
    if trimmed.trim().is_empty() {
        return Grid::default();
    }
    let delimiter = if trimmed.contains('\t') { '\t' } else { '|' };
    debug!("parse_text: delimiter: {:?}", delimiter);

    let rows: Vec<Vec<String>> = trimmed
        .split('\n')
        .map(|line| {
            line.trim_end_matches('\r')
                .split(delimiter)
                .map(|cell| cell.trim().to_string())
                .collect()
        })
        .collect();
    debug!("parse_text: {} rows", rows.len());
    Grid::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_separated() {
        let g = parse_text("Ethnicity\tValue\nWhite\t10\nBlack\t20\n");
        assert_eq!(
            g,
            Grid::from(vec![
                vec!["Ethnicity", "Value"],
                vec!["White", "10"],
                vec!["Black", "20"]
            ])
        );
    }

    #[test]
    fn pipe_separated_when_no_tab() {
        let g = parse_text("Ethnicity|Value\r\nWhite|10\r\n");
        assert_eq!(g.header(), &["Ethnicity".to_string(), "Value".to_string()]);
        assert_eq!(g.data_rows(), &[vec!["White".to_string(), "10".to_string()]]);
    }

    #[test]
    fn any_tab_forces_tab_delimiter() {
        // The pipe row is not split.
        let g = parse_text("A\tB\nx|y");
        assert_eq!(g.data_rows()[0], vec!["x|y".to_string()]);
    }

    #[test]
    fn ragged_rows_are_kept() {
        let g = parse_text("A\tB\n1\n2\t3\t4");
        assert_eq!(g.rows()[1].len(), 1);
        assert_eq!(g.rows()[2].len(), 3);
    }

    #[test]
    fn empty_text() {
        assert!(parse_text("").is_empty());
        assert!(parse_text("  \n\n").is_empty());
        assert!(parse_text("").header().is_empty());
    }
}
