use std::fmt;

use crate::error::PayloadError;

/// `[@name='value']` selector on a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub tag: String,
    pub predicate: Option<Predicate>,
}

/// Parsed path expression: `segment ('/' segment)*` where a segment is
/// `tag` or `tag[@name='value']`.
///
/// The first segment is matched against the whole document, later segments
/// against the children of the previous match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for empty segments, unterminated predicates or
    /// unquoted predicate values.
    pub fn parse(expr: &str) -> Result<Self, PayloadError> {
        let raw = expr.trim();
        if raw.is_empty() {
            return Err(invalid(raw, "empty path"));
        }
        let mut segments = Vec::new();
        for part in split_segments(raw)? {
            segments.push(parse_segment(raw, part)?);
        }
        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Builds `tag[@name='value']`.
    #[must_use]
    pub fn keyed(tag: &str, name: &str, value: &str) -> String {
        format!("{}[@{}='{}']", tag, name, value)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn invalid(path: &str, reason: &'static str) -> PayloadError {
    PayloadError::InvalidPath {
        path: path.to_owned(),
        reason,
    }
}

fn split_segments(raw: &str) -> Result<Vec<&str>, PayloadError> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (pos, ch) in raw.char_indices() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '/') => {
                parts.push(raw.get(start..pos).unwrap_or_default());
                start = pos.saturating_add(1);
            }
            (None, _) => {}
        }
    }
    if quote.is_some() {
        return Err(invalid(raw, "unterminated quote"));
    }
    parts.push(raw.get(start..).unwrap_or_default());
    if parts.iter().any(|part| part.trim().is_empty()) {
        return Err(invalid(raw, "empty segment"));
    }
    Ok(parts)
}

fn parse_segment(raw: &str, part: &str) -> Result<PathSegment, PayloadError> {
    let part = part.trim();
    let Some((tag, rest)) = part.split_once('[') else {
        return Ok(PathSegment {
            tag: part.to_owned(),
            predicate: None,
        });
    };
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(invalid(raw, "missing tag before predicate"));
    }
    let body = rest
        .strip_suffix(']')
        .ok_or_else(|| invalid(raw, "unterminated predicate"))?;
    let body = body
        .trim()
        .strip_prefix('@')
        .ok_or_else(|| invalid(raw, "predicate must start with '@'"))?;
    let (name, value) = body
        .split_once('=')
        .ok_or_else(|| invalid(raw, "predicate must compare with '='"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid(raw, "empty predicate attribute"));
    }
    let value = value.trim();
    let unquoted = value
        .strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
        .or_else(|| {
            value
                .strip_prefix('"')
                .and_then(|inner| inner.strip_suffix('"'))
        })
        .ok_or_else(|| invalid(raw, "predicate value must be quoted"))?;
    Ok(PathSegment {
        tag: tag.to_owned(),
        predicate: Some(Predicate {
            name: name.to_owned(),
            value: unquoted.to_owned(),
        }),
    })
}
