//! Value types exposed to callers.

pub mod value;

pub use value::RowValue;
