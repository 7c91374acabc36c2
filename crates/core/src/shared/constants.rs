pub const DEFAULT_MUSIC_DIR: &str = "music";
pub const DEFAULT_CLIPS_DIR: &str = "audio_clips";
pub const DEFAULT_DECKS_DIR: &str = "anki_decks";
pub const DEFAULT_CONTEXT_DIR: &str = "anki_context_files";

pub const AUDIO_EXTENSION: &str = "mp3";
pub const LYRICS_EXTENSION: &str = "lrc";
pub const DECK_FILE_SUFFIX: &str = ".deck.zip";

/// Clip files are named `clip_<n>.<ext>` with a 1-based `n`.
pub const CLIP_FILE_PREFIX: &str = "clip_";

/// `[mm:ss.cc]` prefix carried by every lyric line and echoed by the
/// translation service.
pub const LINE_METADATA_WIDTH: usize = 10;
pub const TIMESTAMP_START: usize = 1;
pub const TIMESTAMP_WIDTH: usize = 8;

pub const DECK_ID: i64 = 2059400111;
pub const NOTE_MODEL_ID: i64 = 1607392319;
pub const NOTE_MODEL_NAME: &str = "Song Lyrics Model";
pub const DECK_NAME_PREFIX: &str = "Song Lyrics::";

pub const DEEPSEEK_CHAT_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4o";

pub const ANKI_CONNECT_URL: &str = "http://localhost:8765";
pub const ANKI_CONNECT_VERSION: u32 = 6;

pub const DEFAULT_TRANSLATION_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;
