// Primitives for reading CSV files.

use log::debug;

use crate::build::{
    io_common::{non_empty_rows, simplify_file_name},
    *,
};

pub fn read_csv_grid(path: &str) -> BCliResult<Grid> {
    // The rows are not required to have the same length: this is reported by
    // the validation with a better message.
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_grid: lineno: {:?} row: {:?}", lineno, line);
        rows.push(line.iter().map(|s| s.trim().to_string()).collect());
    }
    debug!(
        "read_csv_grid: {} rows from {:?}",
        rows.len(),
        simplify_file_name(path)
    );
    Ok(Grid::new(non_empty_rows(rows)))
}
