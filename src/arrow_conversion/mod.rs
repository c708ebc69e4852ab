//! Arrow data format conversion utilities.
//!
//! This module converts result cursor rows into Apache Arrow columnar format.

mod builders;
mod converter;

pub use builders::build_string_array;
pub use converter::ArrowConverter;
