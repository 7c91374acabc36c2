use std::path::Path;

use super::deck_package::DeckPackage;
use crate::shared::error::SongError;

/// Domain interface for serializing a deck and its media into one artifact.
pub trait DeckWriter: Send {
    /// Writes the package to `path`, replacing any existing file.
    fn write(&self, package: &DeckPackage, path: &Path) -> Result<(), SongError>;
}
