//! Turns pasted tabular data into chart and table objects.
//!
//! See the [manual] for the full description of the settings and of the
//! validation rules.

mod config;
mod number_format;

pub mod builder;
pub mod charts;
pub mod columns;
pub mod manual;
pub mod ordering;
pub mod parent_child;
pub mod presets;
pub mod series_format;
pub mod tables;
pub mod text;
pub mod validation;

pub use crate::config::*;
pub use crate::number_format::apply_multiplier;

pub use crate::charts::{build_chart, build_chart_object};
pub use crate::presets::merge_preset;
pub use crate::tables::build_table_object;
pub use crate::text::parse_text;
pub use crate::validation::{validate_chart, validate_data, validate_for_build};
