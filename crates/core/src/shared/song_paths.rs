use std::path::PathBuf;

use super::config::AppConfig;
use super::constants::{AUDIO_EXTENSION, DECK_FILE_SUFFIX, LYRICS_EXTENSION};

/// Filesystem locations for one song, derived from its identifier.
///
/// The identifier is the file stem shared by `<song>.mp3` and `<song>.lrc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongPaths {
    pub song_id: String,
    pub audio: PathBuf,
    pub lyrics: PathBuf,
    pub clip_dir: PathBuf,
    pub deck: PathBuf,
}

impl SongPaths {
    pub fn new(config: &AppConfig, song_id: &str) -> Self {
        Self {
            song_id: song_id.to_string(),
            audio: config
                .music_dir
                .join(format!("{song_id}.{AUDIO_EXTENSION}")),
            lyrics: config
                .music_dir
                .join(format!("{song_id}.{LYRICS_EXTENSION}")),
            clip_dir: config.clips_dir.join(song_id),
            deck: config.decks_dir.join(format!("{song_id}{DECK_FILE_SUFFIX}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_song_id() {
        let config = AppConfig::default();
        let paths = SongPaths::new(&config, "Again - Yui");
        assert_eq!(paths.audio, PathBuf::from("music/Again - Yui.mp3"));
        assert_eq!(paths.lyrics, PathBuf::from("music/Again - Yui.lrc"));
        assert_eq!(paths.clip_dir, PathBuf::from("audio_clips/Again - Yui"));
        assert_eq!(paths.deck, PathBuf::from("anki_decks/Again - Yui.deck.zip"));
    }

    #[test]
    fn test_song_id_with_dots_keeps_full_name() {
        let config = AppConfig::default();
        let paths = SongPaths::new(&config, "Mr. Blue Sky");
        assert_eq!(paths.audio, PathBuf::from("music/Mr. Blue Sky.mp3"));
        assert_eq!(paths.deck, PathBuf::from("anki_decks/Mr. Blue Sky.deck.zip"));
    }
}
