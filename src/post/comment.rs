//! Comment definitions
//!
//! A comment is a value triple rendered as a single line.

use std::fmt;

use crate::error::Result;
use crate::format::{self, RecordError, Timestamp};

/// A timestamped, authored reply attached to one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// When the comment was made (UTC, millisecond precision)
    timestamp: Timestamp,

    /// Single-word author name
    author: String,

    /// Comment body, one line
    text: String,
}

impl Comment {
    /// Create a comment stamped with the current time
    pub fn new(author: &str, text: &str) -> Result<Self> {
        format::validate_author(author)?;
        format::validate_text(text)?;

        Ok(Self {
            timestamp: format::now(),
            author: author.to_string(),
            text: text.to_string(),
        })
    }

    /// Parse a comment line: `{timestamp} {author} {text}`
    pub fn parse_line(line: &str) -> std::result::Result<Self, RecordError> {
        let fields = format::split_fields(line, &["timestamp", "author", "text"])?;

        Ok(Self {
            timestamp: format::parse_timestamp(fields[0])?,
            author: fields[1].to_string(),
            text: fields[2].to_string(),
        })
    }

    /// Encode as a single line (no trailing newline)
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {}",
            format::format_timestamp(&self.timestamp),
            self.author,
            self.text
        )
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
