//! Tabular data model.

mod table;
mod value;

pub use table::{Dataset, DatasetBuilder};
pub use value::{Value, ValueKind};
