//! Tests for record formatting
//!
//! These tests verify:
//! - Canonical timestamp layout and strict parsing
//! - Zero-padded ids and file names
//! - Author/text validation
//! - Comment line encoding and decoding

use chrono::{TimeZone, Utc};
use textbook::format::{self, RecordError};
use textbook::{Comment, TextBookError};

// =============================================================================
// Timestamps
// =============================================================================

#[test]
fn test_timestamp_canonical_layout() {
    let ts = Utc.with_ymd_and_hms(2021, 11, 30, 23, 38, 23).unwrap()
        + chrono::Duration::milliseconds(85);

    assert_eq!(format::format_timestamp(&ts), "2021-11-30T23:38:23.085Z");
}

#[test]
fn test_timestamp_parse_roundtrip() {
    let parsed = format::parse_timestamp("2021-12-01T09:22:03.142Z").unwrap();

    assert_eq!(format::format_timestamp(&parsed), "2021-12-01T09:22:03.142Z");
}

#[test]
fn test_timestamp_parse_rejects_other_layouts() {
    for bad in [
        "2021-12-01 09:22:03.142Z",
        "2021-12-01T09:22:03Z",
        "2021-12-01T09:22:03.142",
        "yesterday",
        "",
    ] {
        assert!(
            matches!(format::parse_timestamp(bad), Err(RecordError::BadTimestamp(_))),
            "accepted {:?}",
            bad
        );
    }
}

// =============================================================================
// Identifiers
// =============================================================================

#[test]
fn test_format_id_pads_to_five_digits() {
    assert_eq!(format::format_id(10), "00010");
    assert_eq!(format::format_id(99999), "99999");
    assert_eq!(format::format_id(123456), "123456");
}

#[test]
fn test_post_filename() {
    assert_eq!(format::post_filename("Post-", 10, ".txt"), "Post-00010.txt");
    assert_ne!(
        format::post_filename("Post-", 1, ".txt"),
        format::post_filename("Post-", 10, ".txt")
    );
}

#[test]
fn test_parse_id_rejects_zero_and_garbage() {
    assert_eq!(format::parse_id("00010"), Ok(10));
    assert_eq!(format::parse_id("0"), Err(RecordError::BadId("0".to_string())));
    assert!(format::parse_id("-1").is_err());
    assert!(format::parse_id("ten").is_err());
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_author() {
    assert!(format::validate_author("AdaLovelace").is_ok());
    assert!(matches!(
        format::validate_author(""),
        Err(TextBookError::InvalidArgument(_))
    ));
    assert!(matches!(
        format::validate_author("Ada Lovelace"),
        Err(TextBookError::InvalidArgument(_))
    ));
}

#[test]
fn test_validate_text() {
    assert!(format::validate_text("Did stuff.").is_ok());
    assert!(format::validate_text("   ").is_err());
    assert!(format::validate_text("two\nlines").is_err());
    assert!(format::validate_text("carriage\rreturn").is_err());
}

// =============================================================================
// Comment Lines
// =============================================================================

#[test]
fn test_comment_line_keeps_spaces_in_text() {
    let comment = Comment::parse_line("2021-12-01T08:18:21.055Z Luke It's late...").unwrap();

    assert_eq!(comment.author(), "Luke");
    assert_eq!(comment.text(), "It's late...");
    assert_eq!(comment.to_line(), "2021-12-01T08:18:21.055Z Luke It's late...");
}

#[test]
fn test_comment_line_missing_text() {
    assert_eq!(
        Comment::parse_line("2021-12-01T08:18:21.055Z Luke"),
        Err(RecordError::MissingField("text"))
    );
}

#[test]
fn test_comment_new_validates() {
    assert!(Comment::new("", "text").is_err());
    assert!(Comment::new("Luke", "").is_err());

    let comment = Comment::new("Luke", "Heckled Mason.").unwrap();
    assert_eq!(comment.to_string(), comment.to_line());
}
