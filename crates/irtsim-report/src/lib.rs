//! File-backed output for irtsim.
//!
//! - [`csv`]: delimited-text tables
//! - [`svg`]: standalone SVG line charts
//! - [`json`]: pretty-printed run summaries

pub mod csv;
pub mod json;
pub mod svg;

pub use csv::CsvDirectorySink;
pub use svg::SvgDirectorySink;
