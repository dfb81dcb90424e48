//! Record Format
//!
//! Text encoding shared by the index file and the per-post files.
//!
//! ## Line Formats
//! ```text
//! Post-00010.txt
//! ┌────────────────────────────────────────────────────────────┐
//! │ 00010 2021-11-30T23:38:23.085Z Mason Did stuff.            │  post line
//! │ 2021-12-01T08:18:21.055Z Luke It's late...                 │  comment line
//! │ 2021-12-01T09:22:03.142Z Kathryn And it wasn't the right...│  comment line
//! └────────────────────────────────────────────────────────────┘
//!
//! posts.txt
//! ┌───────┐
//! │ 10    │  one live post id per line, insertion order
//! │ 11    │
//! └───────┘
//! ```
//!
//! Fields are separated by a single space. Only the trailing text field
//! may contain spaces; it never contains a line break.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use thiserror::Error;

use crate::error::{Result, TextBookError};

/// Post identifier, assigned monotonically starting at 1
pub type PostId = u32;

/// Creation time of a post or comment
pub type Timestamp = DateTime<Utc>;

/// Canonical timestamp layout, e.g. `2021-11-30T23:38:23.085Z`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Length of a canonical timestamp
const TIMESTAMP_LEN: usize = "2021-11-30T23:38:23.085Z".len();

/// Width the post id is zero-padded to in names and lines
pub const ID_WIDTH: usize = 5;

// =============================================================================
// Record Errors
// =============================================================================

/// Reason a single line failed to decode
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is empty")]
    Empty,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("malformed post id '{0}'")]
    BadId(String),

    #[error("malformed timestamp '{0}'")]
    BadTimestamp(String),
}

// =============================================================================
// Timestamps
// =============================================================================

/// Current UTC time, truncated to the precision that survives a round trip
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

/// Render a timestamp in the canonical layout
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp written by [`format_timestamp`]
pub fn parse_timestamp(s: &str) -> std::result::Result<Timestamp, RecordError> {
    // chrono treats the fraction as optional and variable-width when parsing
    if s.len() != TIMESTAMP_LEN || s.as_bytes()[19] != b'.' {
        return Err(RecordError::BadTimestamp(s.to_string()));
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| RecordError::BadTimestamp(s.to_string()))
}

// =============================================================================
// Identifiers
// =============================================================================

/// Zero-padded id as it appears in post lines and file names
pub fn format_id(id: PostId) -> String {
    format!("{:0width$}", id, width = ID_WIDTH)
}

/// Parse a post id; zero is never assigned and is rejected
pub fn parse_id(s: &str) -> std::result::Result<PostId, RecordError> {
    match s.parse::<PostId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RecordError::BadId(s.to_string())),
    }
}

/// Per-post file name: prefix + 5-digit id + suffix
///
/// Padding never truncates, so the mapping stays injective above 99999.
pub fn post_filename(prefix: &str, id: PostId, suffix: &str) -> String {
    format!("{}{}{}", prefix, format_id(id), suffix)
}

// =============================================================================
// Field Validation
// =============================================================================

/// Authors are a single non-empty token
pub fn validate_author(author: &str) -> Result<()> {
    if author.is_empty() {
        return Err(TextBookError::invalid("author must not be empty"));
    }
    if author.chars().any(char::is_whitespace) {
        return Err(TextBookError::invalid(format!(
            "author '{}' must be a single word",
            author
        )));
    }
    Ok(())
}

/// Text is non-blank and fits on one line
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(TextBookError::invalid("text must not be empty"));
    }
    if text.contains(['\n', '\r']) {
        return Err(TextBookError::invalid("text must not contain line breaks"));
    }
    Ok(())
}

// =============================================================================
// Line Splitting
// =============================================================================

/// Split a record line into exactly `names.len()` fields.
///
/// The last field takes the remainder of the line, spaces included.
pub(crate) fn split_fields<'a>(
    line: &'a str,
    names: &[&'static str],
) -> std::result::Result<Vec<&'a str>, RecordError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return Err(RecordError::Empty);
    }

    let fields: Vec<&str> = line.splitn(names.len(), ' ').collect();
    for (i, name) in names.iter().enumerate() {
        match fields.get(i) {
            Some(field) if !field.is_empty() => {}
            _ => return Err(RecordError::MissingField(name)),
        }
    }
    Ok(fields)
}
