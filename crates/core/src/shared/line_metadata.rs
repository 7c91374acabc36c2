//! The fixed-offset line framing shared by lyric files and translation
//! responses.
//!
//! Every line starts with a `[mm:ss.cc]` tag, exactly [`LINE_METADATA_WIDTH`]
//! characters wide, and the translation service is asked to echo the tag in
//! front of each translated line. Both sides are trimmed by position here and
//! nowhere else. Positions count characters, not bytes, so multi-byte lyrics
//! never split a code point.

use super::constants::{LINE_METADATA_WIDTH, TIMESTAMP_START, TIMESTAMP_WIDTH};

/// Drops the metadata prefix, returning the visible part of the line.
///
/// Lines shorter than the prefix have no visible part and yield `""`.
pub fn strip_line_metadata(line: &str) -> &str {
    match line.char_indices().nth(LINE_METADATA_WIDTH) {
        Some((byte_idx, _)) => &line[byte_idx..],
        None => "",
    }
}

/// Extracts the timestamp token embedded in the metadata prefix, or `None`
/// when the line is too short to hold one.
pub fn timestamp_token(line: &str) -> Option<&str> {
    let mut indices = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let start = indices.nth(TIMESTAMP_START)?;
    let end = indices.nth(TIMESTAMP_WIDTH - 1)?;
    Some(&line[start..end])
}
