// Primitives for reading pasted text.

use log::debug;
use std::fs;

use crate::build::{io_common::simplify_file_name, *};

pub fn read_text_grid(path: &str) -> BCliResult<Grid> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!(
        "read_text_grid: {} bytes from {:?}",
        contents.len(),
        simplify_file_name(path)
    );
    Ok(parse_text(&contents))
}
