use crate::shared::error::{AlignmentError, FormatError};
use crate::shared::line_metadata::strip_line_metadata;

/// Splits a batched translation response into its lines.
///
/// Trailing line breaks at the end of the block and `\r` before each `\n`
/// are framing, not lines. Blank lines inside the block are kept and
/// count toward alignment.
pub fn split_response(block: &str) -> Result<Vec<String>, FormatError> {
    if block.trim().is_empty() {
        return Err(FormatError::EmptyResponse);
    }
    Ok(block
        .trim_end_matches(['\n', '\r'])
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect())
}

/// Checks that `translated` lines up one-to-one with `source` and strips the
/// echoed metadata prefix from each translated line.
///
/// Only cardinality is checked; any mismatch is fatal.
pub fn validate(source: &[String], translated: &[String]) -> Result<Vec<String>, AlignmentError> {
    if translated.len() != source.len() {
        return Err(AlignmentError {
            expected: source.len(),
            actual: translated.len(),
        });
    }
    Ok(translated
        .iter()
        .map(|line| strip_line_metadata(line).to_string())
        .collect())
}
