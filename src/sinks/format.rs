use std::fmt::Write as _;

use crate::error::SinkError;

pub(super) fn write_line(output: &mut String, line: &str) -> Result<(), SinkError> {
    writeln!(output, "{}", line).map_err(|err| SinkError::WriteLine { source: err })
}

/// Makes free text safe for a single CSV field.
pub(super) fn csv_field(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            ',' | '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}

/// Escapes a Prometheus label value.
pub(super) fn label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_field_flattens_separators() {
        assert_eq!(csv_field("a,b\r\nc"), "a b  c");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn label_value_escapes_quotes_and_backslashes() {
        assert_eq!(label_value("C:\\in \"x\""), "C:\\\\in \\\"x\\\"");
    }
}
