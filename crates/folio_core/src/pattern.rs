use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width used by [`FilenamePattern::default`] and by the `{num}` slot of
/// patterns built with [`FilenamePattern::from_parts`] when no width is given.
pub const DEFAULT_NUMBER_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unknown placeholder `{{{0}}}`")]
    UnknownPlaceholder(String),
    #[error("invalid number format `{0}`, expected e.g. `03d`")]
    InvalidNumberFormat(String),
    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),
    #[error("unmatched `}}` at byte {0}")]
    UnmatchedClose(usize),
    #[error("pattern has no `{{num}}` slot")]
    MissingNumber,
}

/// One slot of a filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Prefix,
    /// Page number, zero-padded to `width` digits. Wider numbers are not truncated.
    Number { width: usize },
    Suffix,
}

/// Closed filename template with prefix, page number and suffix slots.
///
/// Parsed from strings such as `{prefix}_{num:03d}{suffix}.jpg`. Rendering is
/// pure and total: any prefix, suffix and page number produce a filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilenamePattern {
    segments: Vec<Segment>,
}

impl FilenamePattern {
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(PatternError::UnmatchedClose(pos)),
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        body.push(inner);
                    }
                    if !closed {
                        return Err(PatternError::Unterminated(pos));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&body)?);
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self::from_segments(segments)
    }

    /// Builds `{prefix}<separator>{num:0W}{suffix}.<extension>`.
    pub fn from_parts(separator: &str, width: usize, extension: &str) -> Self {
        let mut segments = vec![Segment::Prefix];
        if !separator.is_empty() {
            segments.push(Segment::Literal(separator.to_string()));
        }
        segments.push(Segment::Number { width });
        segments.push(Segment::Suffix);
        let extension = extension.trim_start_matches('.');
        if !extension.is_empty() {
            segments.push(Segment::Literal(format!(".{extension}")));
        }
        Self { segments }
    }

    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, PatternError> {
        if !segments
            .iter()
            .any(|segment| matches!(segment, Segment::Number { .. }))
        {
            return Err(PatternError::MissingNumber);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Zero-padding width of the first page-number slot.
    pub fn number_width(&self) -> usize {
        self.segments
            .iter()
            .find_map(|segment| match segment {
                Segment::Number { width } => Some(*width),
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn render(&self, prefix: &str, number: u32, suffix: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Prefix => out.push_str(prefix),
                Segment::Number { width } => out.push_str(&pad_number(number, *width)),
                Segment::Suffix => out.push_str(suffix),
            }
        }
        out
    }
}

impl Default for FilenamePattern {
    fn default() -> Self {
        Self::from_parts("_", DEFAULT_NUMBER_WIDTH, "jpg")
    }
}

impl fmt::Display for FilenamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    write!(f, "{}", text.replace('{', "{{").replace('}', "}}"))?
                }
                Segment::Prefix => f.write_str("{prefix}")?,
                Segment::Number { width: 0 } => f.write_str("{num}")?,
                Segment::Number { width } => write!(f, "{{num:0{width}d}}")?,
                Segment::Suffix => f.write_str("{suffix}")?,
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for FilenamePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FilenamePattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FilenamePattern> for String {
    fn from(pattern: FilenamePattern) -> Self {
        pattern.to_string()
    }
}

/// Zero-pads `number` to `width` digits; wider numbers keep all their digits.
pub fn pad_number(number: u32, width: usize) -> String {
    format!("{number:0width$}")
}

fn parse_placeholder(body: &str) -> Result<Segment, PatternError> {
    let (name, format) = match body.split_once(':') {
        Some((name, format)) => (name.trim(), Some(format.trim())),
        None => (body.trim(), None),
    };
    match (name, format) {
        ("prefix", None) => Ok(Segment::Prefix),
        ("suffix", None) => Ok(Segment::Suffix),
        ("num", None) => Ok(Segment::Number { width: 0 }),
        ("num", Some(format)) => parse_number_format(format).map(|width| Segment::Number { width }),
        _ => Err(PatternError::UnknownPlaceholder(body.to_string())),
    }
}

// Accepts `d`, `0Nd` and `0N`.
fn parse_number_format(format: &str) -> Result<usize, PatternError> {
    let invalid = || PatternError::InvalidNumberFormat(format.to_string());
    let digits = format.strip_suffix('d').unwrap_or(format);
    if digits.is_empty() {
        return Ok(0);
    }
    let width = digits.strip_prefix('0').ok_or_else(invalid)?;
    if width.is_empty() || !width.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    width.parse().map_err(|_| invalid())
}
