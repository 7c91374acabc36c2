use std::path::PathBuf;

use crate::shared::constants::CLIP_FILE_PREFIX;

/// One exported slice of a song, between two consecutive lyric offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    /// 1-based position; clip `n` belongs to lyric line `n - 1`.
    pub index: usize,
    /// Encoded file content as written to `path`.
    pub bytes: Vec<u8>,
    pub path: PathBuf,
}

/// Clips available for a song after segmentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipSet {
    pub dir: PathBuf,
    /// Ordered by clip index.
    pub paths: Vec<PathBuf>,
    /// True when an existing clip directory was reused without slicing.
    pub reused: bool,
}

/// File name for clip `index`: `clip_<index>.<extension>`.
pub fn clip_file_name(index: usize, extension: &str) -> String {
    format!("{CLIP_FILE_PREFIX}{index}.{extension}")
}

/// Parses the clip index back out of a file name produced by
/// [`clip_file_name`].
pub fn clip_index(file_name: &str) -> Option<usize> {
    let rest = file_name.strip_prefix(CLIP_FILE_PREFIX)?;
    let digits = rest.split('.').next()?;
    digits.parse().ok()
}
