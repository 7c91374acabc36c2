use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::deck_package::DeckPackage;
use super::flashcard::FlashcardRecord;
use crate::audio::domain::audio_clip::{clip_file_name, clip_index};
use crate::shared::error::{AlignmentError, SongError};

/// Pairs lyric lines, translations and audio clips into a deck.
pub struct DeckAssembler;

impl DeckAssembler {
    /// Builds one card per line except the last, which has no clip.
    ///
    /// Card `i` takes the clip numbered `i + 1`, looked up by the index in its
    /// file name rather than its position in `clip_paths`. Files that are not
    /// clips are ignored. All referenced clips must exist on disk before
    /// anything is produced.
    pub fn assemble(
        song_id: &str,
        lines: &[String],
        translations: &[String],
        clip_paths: &[PathBuf],
    ) -> Result<DeckPackage, SongError> {
        if lines.len() != translations.len() {
            return Err(AlignmentError {
                expected: lines.len(),
                actual: translations.len(),
            }
            .into());
        }

        let by_index: HashMap<usize, &PathBuf> = clip_paths
            .iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy();
                Some((clip_index(&name)?, path))
            })
            .collect();

        let card_count = lines.len().saturating_sub(1);
        let mut records = Vec::with_capacity(card_count);
        let mut media = Vec::with_capacity(card_count);

        for i in 0..card_count {
            let index = i + 1;
            let path = match by_index.get(&index) {
                Some(path) if path.is_file() => *path,
                Some(path) => {
                    return Err(SongError::MissingMedia {
                        index,
                        path: (*path).clone(),
                    })
                }
                None => {
                    return Err(SongError::MissingMedia {
                        index,
                        path: expected_clip_path(clip_paths, index),
                    })
                }
            };

            let audio_file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            records.push(FlashcardRecord {
                audio_file,
                front: lines[i].clone(),
                back: translations[i].clone(),
            });
            media.push(path.clone());
        }

        Ok(DeckPackage::new(song_id, records, media))
    }
}

/// Where clip `index` would live, judged from its siblings. Empty when there
/// are no siblings to go by.
fn expected_clip_path(clip_paths: &[PathBuf], index: usize) -> PathBuf {
    let Some(sibling) = clip_paths.first() else {
        return PathBuf::new();
    };
    let extension = sibling
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling
        .parent()
        .unwrap_or(Path::new(""))
        .join(clip_file_name(index, &extension))
}
