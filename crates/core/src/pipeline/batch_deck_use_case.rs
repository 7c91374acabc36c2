use std::fs;
use std::path::Path;

use crate::shared::config::AppConfig;
use crate::shared::constants::{AUDIO_EXTENSION, LYRICS_EXTENSION};
use crate::shared::error::SongError;
use crate::shared::song_paths::SongPaths;

use super::pipeline_logger::{PipelineLogger, SongOutcome};
use super::song_deck_use_case::{BuiltDeck, SongDeckUseCase};

/// What happened to each song of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub built: Vec<BuiltDeck>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, SongError)>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Builds decks for a list of songs, one at a time.
///
/// A song whose deck already exists is skipped unless `force` is set. A
/// failing song is logged and recorded; the batch moves on.
pub struct BatchDeckUseCase {
    song_deck: SongDeckUseCase,
    force: bool,
}

impl BatchDeckUseCase {
    pub fn new(song_deck: SongDeckUseCase, force: bool) -> Self {
        Self { song_deck, force }
    }

    pub fn execute(
        &self,
        config: &AppConfig,
        song_ids: &[String],
        logger: &mut dyn PipelineLogger,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for song_id in song_ids {
            let paths = SongPaths::new(config, song_id);

            if paths.deck.exists() && !self.force {
                log::info!(
                    "Deck for '{song_id}' already exists at {}. Skipping",
                    paths.deck.display()
                );
                logger.song_finished(song_id, SongOutcome::Skipped);
                report.skipped.push(song_id.clone());
                continue;
            }

            log::info!("Building deck for '{song_id}'");
            logger.song_started(song_id);
            match self.song_deck.execute(&paths, logger) {
                Ok(built) => {
                    log::info!(
                        "Created deck for '{song_id}' with {} cards",
                        built.cards
                    );
                    logger.song_finished(
                        song_id,
                        SongOutcome::Built {
                            cards: built.cards,
                            clips: built.clips,
                            clips_reused: built.clips_reused,
                        },
                    );
                    report.built.push(built);
                }
                Err(e) => {
                    log::error!("Failed to build deck for '{song_id}': {e}");
                    logger.song_finished(song_id, SongOutcome::Failed(e.to_string()));
                    report.failed.push((song_id.clone(), e));
                }
            }
        }

        report
    }
}

/// Song ids in `music_dir` that have both an audio and a lyric file, sorted.
pub fn discover_songs(music_dir: &Path) -> Result<Vec<String>, SongError> {
    let entries = fs::read_dir(music_dir).map_err(|e| SongError::io(music_dir, e))?;

    let mut songs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SongError::io(music_dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(LYRICS_EXTENSION) {
            continue;
        }
        if !path.with_extension(AUDIO_EXTENSION).is_file() {
            log::debug!("Ignoring {}: no matching audio file", path.display());
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            songs.push(stem.to_string());
        }
    }
    songs.sort();
    Ok(songs)
}
