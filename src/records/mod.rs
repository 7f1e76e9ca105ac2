//! Line-oriented input records: a header naming the fields, then one
//! comma-delimited record per line.
mod field_table;
mod reader;

pub use field_table::{Column, FieldTable, Record};
pub use reader::RecordReader;

/// Delimiter between fields of a header or record line.
pub const FIELD_DELIMITER: char = ',';
