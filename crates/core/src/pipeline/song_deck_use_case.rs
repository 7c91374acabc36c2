use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_segmenter::AudioSegmenter;
use crate::deck::domain::deck_assembler::DeckAssembler;
use crate::deck::domain::deck_writer::DeckWriter;
use crate::lyrics::domain::lyric_line::LyricLine;
use crate::lyrics::infrastructure::lrc_file_loader::LrcFileLoader;
use crate::shared::error::SongError;
use crate::shared::song_paths::SongPaths;
use crate::translation::domain::lyric_translator::LyricTranslator;

use super::pipeline_logger::{PipelineLogger, Stage};

/// Outcome of building one song's deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltDeck {
    pub song_id: String,
    pub deck_path: PathBuf,
    pub cards: usize,
    /// Clips available in the song's clip directory.
    pub clips: usize,
    pub clips_reused: bool,
}

/// Turns one song (audio + timed lyrics) into a flashcard deck.
///
/// Translation runs on a scoped thread while the main thread decodes and
/// segments the audio. Both must succeed before anything is assembled.
pub struct SongDeckUseCase {
    loader: LrcFileLoader,
    reader: Box<dyn AudioReader>,
    segmenter: AudioSegmenter,
    translator: LyricTranslator,
    writer: Box<dyn DeckWriter>,
}

impl SongDeckUseCase {
    pub fn new(
        reader: Box<dyn AudioReader>,
        segmenter: AudioSegmenter,
        translator: LyricTranslator,
        writer: Box<dyn DeckWriter>,
    ) -> Self {
        Self {
            loader: LrcFileLoader,
            reader,
            segmenter,
            translator,
            writer,
        }
    }

    pub fn execute(
        &self,
        paths: &SongPaths,
        logger: &mut dyn PipelineLogger,
    ) -> Result<BuiltDeck, SongError> {
        let lines = self.loader.load(&paths.lyrics)?;
        log::debug!("Loaded {} lyric lines for '{}'", lines.len(), paths.song_id);
        let offsets = LyricLine::offsets(&lines);

        let translator = &self.translator;
        let (clips, translated) = thread::scope(|s| {
            let translation = s.spawn(|| {
                let start = Instant::now();
                let result = translate_lines(translator, &lines);
                (result, start.elapsed())
            });

            let start = Instant::now();
            let mut on_progress = |current: usize, total: usize| logger.progress(current, total);
            let clips = self.segmenter.prepare_clips(
                self.reader.as_ref(),
                &paths.audio,
                &offsets,
                &paths.clip_dir,
                Some(&mut on_progress),
            );
            let segment_elapsed = start.elapsed();

            let translated = match translation.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            ((clips, segment_elapsed), translated)
        });

        let (clips, segment_elapsed) = clips;
        let (translations, translate_elapsed) = translated;
        logger.stage(Stage::Segment, segment_elapsed);
        logger.stage(Stage::Translate, translate_elapsed);

        let clips = clips?;
        let translations = translations?;

        let texts = LyricLine::texts(&lines);
        let package =
            DeckAssembler::assemble(&paths.song_id, &texts, &translations, &clips.paths)?;

        let start = Instant::now();
        self.writer.write(&package, &paths.deck)?;
        logger.stage(Stage::Package, start.elapsed());

        Ok(BuiltDeck {
            song_id: paths.song_id.clone(),
            deck_path: paths.deck.clone(),
            cards: package.records.len(),
            clips: clips.paths.len(),
            clips_reused: clips.reused,
        })
    }
}

fn translate_lines(
    translator: &LyricTranslator,
    lines: &[LyricLine],
) -> Result<Vec<String>, SongError> {
    if lines.is_empty() {
        log::warn!("No lyric lines to translate");
        return Ok(Vec::new());
    }
    translator.translate(lines)
}
