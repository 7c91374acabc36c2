use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::lyrics::domain::lyric_document::parse_lyric_document;
use crate::lyrics::domain::lyric_line::LyricLine;
use crate::shared::error::SongError;

/// Loads `.lrc` lyric files from disk.
pub struct LrcFileLoader;

impl LrcFileLoader {
    /// Reads and parses a lyric file.
    ///
    /// A missing file is reported as `SongError::NotFound` so the caller can
    /// skip the song; malformed lines abort with a `FormatError`.
    pub fn load(&self, path: &Path) -> Result<Vec<LyricLine>, SongError> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SongError::NotFound {
                what: "lyric file",
                path: path.to_path_buf(),
            },
            _ => SongError::io(path, e),
        })?;

        let lines = parse_lyric_document(&text)?;
        log::debug!("Loaded {} lyric lines from {}", lines.len(), path.display());
        Ok(lines)
    }
}
