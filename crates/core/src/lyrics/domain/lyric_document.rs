use super::lyric_line::LyricLine;
use super::timestamp::parse_timestamp;
use crate::shared::error::FormatError;
use crate::shared::line_metadata::{strip_line_metadata, timestamp_token};

/// Parses the contents of a timestamped lyric file.
///
/// Blank lines are dropped and file order is kept. A line whose timestamp
/// does not parse aborts the whole document.
pub fn parse_lyric_document(text: &str) -> Result<Vec<LyricLine>, FormatError> {
    let mut lines = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let token = timestamp_token(line).ok_or_else(|| FormatError::LyricLine {
            line_number: idx + 1,
            token: line.to_string(),
        })?;
        let offset_ms = parse_timestamp(token).map_err(|_| FormatError::LyricLine {
            line_number: idx + 1,
            token: token.to_string(),
        })?;

        lines.push(LyricLine {
            offset_ms,
            text: strip_line_metadata(line).to_string(),
            raw: line.to_string(),
        });
    }

    Ok(lines)
}
