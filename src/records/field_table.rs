use std::collections::HashMap;

use tracing::debug;

use crate::error::{PayloadError, RecordError};

use super::FIELD_DELIMITER;

/// Header name to column index mapping for one input source.
#[derive(Debug, Clone)]
pub struct FieldTable {
    source_name: String,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FieldTable {
    #[must_use]
    pub fn parse(source_name: &str, header_line: &str) -> Self {
        let names: Vec<String> = header_line
            .trim_end_matches(['\r', '\n'])
            .split(FIELD_DELIMITER)
            .map(str::to_owned)
            .collect();
        let mut index = HashMap::with_capacity(names.len());
        for (column, name) in names.iter().enumerate() {
            if index.contains_key(name) {
                debug!(
                    "Ignoring duplicate field '{}' at column {} of '{}'",
                    name, column, source_name
                );
                continue;
            }
            index.insert(name.clone(), column);
        }
        Self {
            source_name: source_name.to_owned(),
            names,
            index,
        }
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Binds a known field name to its column.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` when the header does not name the field.
    pub fn column(&self, name: &'static str) -> Result<Column, RecordError> {
        self.index_of(name)
            .map(|index| Column { name, index })
            .ok_or_else(|| RecordError::UnknownField {
                field: name.to_owned(),
                source_name: self.source_name.clone(),
            })
    }
}

/// A field resolved against a [`FieldTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    name: &'static str,
    index: usize,
}

impl Column {
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Reads this column from a record.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` when the record is shorter than the header.
    pub fn value(self, record: &Record) -> Result<&str, PayloadError> {
        record
            .value(self.index)
            .ok_or_else(|| PayloadError::MissingField {
                field: self.name.to_owned(),
                sequence: record.sequence(),
            })
    }
}

/// One data line split into its field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    sequence: u64,
    values: Vec<String>,
}

impl Record {
    #[must_use]
    pub fn parse(sequence: u64, line: &str) -> Self {
        let values = line
            .trim_end_matches(['\r', '\n'])
            .split(FIELD_DELIMITER)
            .map(str::to_owned)
            .collect();
        Self { sequence, values }
    }

    /// 1-based position of the record within its input pass.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub fn value(&self, column: usize) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
