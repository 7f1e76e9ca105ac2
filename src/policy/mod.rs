//! Field-copy policies: which record fields are copied into which section of
//! an event, selected by the event's type discriminator.
mod tables;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::error::{PayloadError, RecordError};
use crate::payload::{Document, MULTI_VALUE_DELIMITER};
use crate::records::{Column, FieldTable, Record};

pub use tables::{POLICY_TABLES, SAP_R3, WSS};

/// Child of an event node that receives copied fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    BusinessData,
    PolicyData,
}

impl Section {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Section::BusinessData => "businessdata",
            Section::PolicyData => "policydata",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyRule {
    /// Copied only when the value is non-empty.
    SkipEmpty,
    /// Copied even when the value is empty.
    Always,
    /// Split on the multi-value delimiter and stored as one multi-valued
    /// attribute, empty or not.
    MultiValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub section: Section,
    pub rule: CopyRule,
}

impl FieldRule {
    pub(crate) const fn copy(field: &'static str, section: Section) -> Self {
        Self {
            field,
            section,
            rule: CopyRule::SkipEmpty,
        }
    }

    pub(crate) const fn always(field: &'static str, section: Section) -> Self {
        Self {
            field,
            section,
            rule: CopyRule::Always,
        }
    }

    pub(crate) const fn multi(field: &'static str, section: Section) -> Self {
        Self {
            field,
            section,
            rule: CopyRule::MultiValue,
        }
    }
}

#[derive(Debug)]
pub struct PolicyTable {
    /// Lower-case type discriminator value selecting this table.
    pub discriminator: &'static str,
    pub rules: &'static [FieldRule],
}

/// A policy table whose fields were resolved against one input header.
#[derive(Debug, Clone)]
pub struct BoundPolicy {
    discriminator: &'static str,
    columns: Vec<(FieldRule, Column)>,
}

impl BoundPolicy {
    /// Resolves every field of `table` against `fields`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` for the first field the header does not name.
    pub fn bind(table: &'static PolicyTable, fields: &FieldTable) -> Result<Self, RecordError> {
        let mut columns = Vec::with_capacity(table.rules.len());
        for rule in table.rules {
            columns.push((*rule, fields.column(rule.field)?));
        }
        Ok(Self {
            discriminator: table.discriminator,
            columns,
        })
    }

    #[must_use]
    pub const fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// Copies the record's fields into the sections under `event_path`.
    ///
    /// # Errors
    ///
    /// Returns an error when a field is missing from the record or a section
    /// cannot be resolved.
    pub fn apply(
        &self,
        document: &mut Document,
        event_path: &str,
        record: &Record,
    ) -> Result<(), PayloadError> {
        let business = format!("{}/{}", event_path, Section::BusinessData.tag());
        let policy = format!("{}/{}", event_path, Section::PolicyData.tag());
        for (rule, column) in &self.columns {
            let value = column.value(record)?;
            let target = match rule.section {
                Section::BusinessData => business.as_str(),
                Section::PolicyData => policy.as_str(),
            };
            match rule.rule {
                CopyRule::SkipEmpty if value.is_empty() => {}
                CopyRule::SkipEmpty | CopyRule::Always => {
                    document.add_attr_pair(target, rule.field, value)?;
                }
                CopyRule::MultiValue => {
                    let values: Vec<&str> = value.split(MULTI_VALUE_DELIMITER).collect();
                    document.add_multi_value_attr(target, rule.field, &values)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Binding {
    Ready(BoundPolicy),
    Unusable { field: String },
}

/// All policy tables bound against one input source.
#[derive(Debug)]
pub struct PolicySet {
    source_name: String,
    bindings: Vec<(&'static str, Binding)>,
}

impl PolicySet {
    #[must_use]
    pub fn bind(tables: &[&'static PolicyTable], fields: &FieldTable) -> Self {
        let bindings = tables
            .iter()
            .copied()
            .map(|table| {
                let binding = match BoundPolicy::bind(table, fields) {
                    Ok(bound) => Binding::Ready(bound),
                    Err(err) => {
                        debug!(
                            "Policy '{}' is unusable for '{}': {}",
                            table.discriminator,
                            fields.source_name(),
                            err
                        );
                        Binding::Unusable {
                            field: unknown_field(err),
                        }
                    }
                };
                (table.discriminator, binding)
            })
            .collect();
        Self {
            source_name: fields.source_name().to_owned(),
            bindings,
        }
    }

    /// Policy for a raw discriminator value (matched case-insensitively).
    /// `None` means the discriminator is unknown.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` when the matching policy could not be bound to
    /// this source's header.
    pub fn lookup(&self, discriminator: &str) -> Option<Result<&BoundPolicy, RecordError>> {
        let wanted = discriminator.trim().to_lowercase();
        self.bindings
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, binding)| match binding {
                Binding::Ready(bound) => Ok(bound),
                Binding::Unusable { field } => Err(RecordError::UnknownField {
                    field: field.clone(),
                    source_name: self.source_name.clone(),
                }),
            })
    }
}

fn unknown_field(err: RecordError) -> String {
    if let RecordError::UnknownField { field, .. } = err {
        field
    } else {
        err.to_string()
    }
}
