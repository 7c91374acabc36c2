use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use songdeck_core::audio::domain::audio_segmenter::AudioSegmenter;
use songdeck_core::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use songdeck_core::audio::infrastructure::wav_clip_encoder::WavClipEncoder;
use songdeck_core::deck::infrastructure::zip_deck_writer::ZipDeckWriter;
use songdeck_core::pipeline::batch_deck_use_case::{discover_songs, BatchDeckUseCase};
use songdeck_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use songdeck_core::pipeline::review_context_use_case::ReviewContextUseCase;
use songdeck_core::pipeline::song_deck_use_case::SongDeckUseCase;
use songdeck_core::review::infrastructure::anki_connect_store::AnkiConnectStore;
use songdeck_core::shared::config::{AppConfig, TranslationProvider};
use songdeck_core::shared::retry::RetryPolicy;
use songdeck_core::translation::domain::lyric_translator::LyricTranslator;
use songdeck_core::translation::infrastructure::chat_completion_model::ChatCompletionModel;

/// Build listening flashcard decks from songs with timed lyrics.
#[derive(Parser)]
#[command(name = "songdeck")]
struct Cli {
    /// JSON config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a deck for each song (every song in the music directory if none given).
    Build(BuildArgs),
    /// Write the review context document for a deck in the flashcard store.
    Context {
        /// Deck name, e.g. "Song Lyrics::Again - Yui".
        deck: String,

        /// Directory for the context document.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List deck names in the flashcard store.
    Decks,
}

#[derive(Args)]
struct BuildArgs {
    /// Song ids: file stems shared by <song>.mp3 and <song>.lrc.
    songs: Vec<String>,

    /// Rebuild decks that already exist.
    #[arg(long)]
    force: bool,

    /// Translation provider: deepseek or openai.
    #[arg(long)]
    provider: Option<TranslationProvider>,

    /// Model name (defaults to the provider's chat model).
    #[arg(long)]
    model: Option<String>,

    /// API key (defaults to DEEPSEEK_API_KEY or OPENAI_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Translation request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Attempts per external call (1 = no retry).
    #[arg(long)]
    retries: Option<u32>,

    /// Directory holding <song>.mp3 and <song>.lrc.
    #[arg(long)]
    music_dir: Option<PathBuf>,

    /// Directory for exported clips.
    #[arg(long)]
    clips_dir: Option<PathBuf>,

    /// Directory for deck packages.
    #[arg(long)]
    decks_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Build(args) => run_build(config, args),
        Command::Context { deck, output_dir } => run_context(&config, &deck, output_dir),
        Command::Decks => run_decks(&config),
    }
}

fn run_build(mut config: AppConfig, args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate(&args)?;
    apply_overrides(&mut config, &args);

    let songs = if args.songs.is_empty() {
        discover_songs(&config.music_dir)?
    } else {
        args.songs
    };
    if songs.is_empty() {
        return Err(format!(
            "No songs with both audio and lyrics found in {}",
            config.music_dir.display()
        )
        .into());
    }

    let model = ChatCompletionModel::new(&config.translation)?;
    let song_deck = SongDeckUseCase::new(
        Box::new(FfmpegAudioReader),
        AudioSegmenter::new(Box::new(WavClipEncoder)),
        LyricTranslator::new(Box::new(model), config.retry),
        Box::new(ZipDeckWriter),
    );
    let use_case = BatchDeckUseCase::new(song_deck, args.force);

    let mut logger = StdoutPipelineLogger::default();
    let report = use_case.execute(&config, &songs, &mut logger);
    logger.summary();

    log::info!(
        "{} built, {} skipped, {} failed",
        report.built.len(),
        report.skipped.len(),
        report.failed.len()
    );
    if report.has_failures() {
        let names: Vec<&str> = report.failed.iter().map(|(s, _)| s.as_str()).collect();
        return Err(format!("Failed to build: {}", names.join(", ")).into());
    }
    Ok(())
}

fn run_context(
    config: &AppConfig,
    deck: &str,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = AnkiConnectStore::new(&config.flashcard_store)?;
    let use_case = ReviewContextUseCase::new(Box::new(store), config.retry);
    let output_dir = output_dir.unwrap_or_else(|| config.context_dir.clone());

    match use_case.execute(deck, &output_dir)? {
        Some(path) => println!("{}", path.display()),
        None => log::warn!("Nothing written for '{deck}'"),
    }
    Ok(())
}

fn run_decks(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = AnkiConnectStore::new(&config.flashcard_store)?;
    let use_case = ReviewContextUseCase::new(Box::new(store), config.retry);

    let decks = use_case.deck_names()?;
    if decks.is_empty() {
        println!("No decks available.");
        return Ok(());
    }
    for (i, deck) in decks.iter().enumerate() {
        println!("{}. {deck}", i + 1);
    }
    Ok(())
}

/// Command-line flags win over the config file. The API key falls back to
/// the provider's environment variable, read here and nowhere else.
fn apply_overrides(config: &mut AppConfig, args: &BuildArgs) {
    if let Some(dir) = &args.music_dir {
        config.music_dir = dir.clone();
    }
    if let Some(dir) = &args.clips_dir {
        config.clips_dir = dir.clone();
    }
    if let Some(dir) = &args.decks_dir {
        config.decks_dir = dir.clone();
    }

    let translation = &mut config.translation;
    if let Some(provider) = args.provider {
        if provider != translation.provider {
            translation.endpoint = None;
            translation.model = None;
        }
        translation.provider = provider;
    }
    if let Some(model) = &args.model {
        translation.model = Some(model.clone());
    }
    if let Some(timeout) = args.timeout {
        translation.timeout_secs = timeout;
    }
    if let Some(key) = &args.api_key {
        translation.api_key = Some(key.clone());
    }
    if translation.api_key.is_none() {
        translation.api_key = std::env::var(translation.provider.api_key_env())
            .ok()
            .filter(|k| !k.is_empty());
    }

    if let Some(retries) = args.retries {
        let policy = RetryPolicy::with_attempts(retries);
        config.retry.max_attempts = policy.max_attempts;
    }
}

fn validate(args: &BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.timeout == Some(0) {
        return Err("Timeout must be at least 1 second".into());
    }
    if args.retries == Some(0) {
        return Err("Retries must be at least 1 (1 = single attempt)".into());
    }
    if let Some(dir) = &args.music_dir {
        if !dir.is_dir() {
            return Err(format!("Music directory not found: {}", dir.display()).into());
        }
    }
    Ok(())
}
