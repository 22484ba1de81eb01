//! Feature extraction
//!
//! Converts raw play records into model-ready feature rows.

pub mod extract;

pub use extract::{extract_row, slugging_value};
