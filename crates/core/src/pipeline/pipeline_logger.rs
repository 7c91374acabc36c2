use std::time::{Duration, Instant};

/// Timed steps of building one song's deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Segment,
    Translate,
    Package,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Segment, Stage::Translate, Stage::Package];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Segment => "segment",
            Stage::Translate => "translate",
            Stage::Package => "package",
        }
    }
}

/// How one song of a batch ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SongOutcome {
    Built {
        cards: usize,
        clips: usize,
        clips_reused: bool,
    },
    /// The deck already existed.
    Skipped,
    Failed(String),
}

/// Observer for deck-building events.
///
/// Messages go through the `log` macros; this trait carries the structured
/// side: clip progress, stage timings and per-song outcomes.
pub trait PipelineLogger: Send {
    fn song_started(&mut self, song_id: &str);

    /// Clip export progress for the current song.
    fn progress(&mut self, current: usize, total: usize);

    fn stage(&mut self, stage: Stage, elapsed: Duration);

    fn song_finished(&mut self, song_id: &str, outcome: SongOutcome);

    /// Emit an end-of-batch summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn song_started(&mut self, _song_id: &str) {}
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn stage(&mut self, _stage: Stage, _elapsed: Duration) {}
    fn song_finished(&mut self, _song_id: &str, _outcome: SongOutcome) {}
}

/// One finished song as the summary table shows it.
#[derive(Clone, Debug, PartialEq)]
pub struct SongRecord {
    pub song_id: String,
    pub outcome: SongOutcome,
    pub stages: Vec<(Stage, Duration)>,
    pub elapsed: Duration,
}

impl SongRecord {
    pub fn stage_elapsed(&self, stage: Stage) -> Option<Duration> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, elapsed)| *elapsed)
    }
}

/// CLI logger: throttled clip progress while a song runs, then a per-song
/// table once the batch is done.
pub struct StdoutPipelineLogger {
    throttle_clips: usize,
    batch_start: Instant,
    current: Option<(String, Instant)>,
    pending: Vec<(Stage, Duration)>,
    songs: Vec<SongRecord>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_clips: usize) -> Self {
        Self {
            throttle_clips: throttle_clips.max(1),
            batch_start: Instant::now(),
            current: None,
            pending: Vec::new(),
            songs: Vec::new(),
        }
    }

    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    /// Returns the formatted summary, or `None` before any song finished.
    pub fn summary_string(&self) -> Option<String> {
        if self.songs.is_empty() {
            return None;
        }

        let count = |f: fn(&SongOutcome) -> bool| {
            self.songs.iter().filter(|s| f(&s.outcome)).count()
        };
        let built = count(|o| matches!(o, SongOutcome::Built { .. }));
        let skipped = count(|o| matches!(o, SongOutcome::Skipped));
        let failed = count(|o| matches!(o, SongOutcome::Failed(_)));

        let mut lines = vec![format!(
            "Batch summary ({} songs, {:.1}s): {built} built, {skipped} skipped, {failed} failed",
            self.songs.len(),
            self.batch_start.elapsed().as_secs_f64()
        )];
        lines.push(format!(
            "  {:<28} {:<8} {:>5} {:>10} {:>10} {:>10} {:>10}",
            "song", "outcome", "cards", "clips", "segment", "translate", "package"
        ));
        for song in &self.songs {
            lines.push(table_row(song));
        }

        let (exported, segment_time) = self.exported_clips();
        let reused: usize = self
            .songs
            .iter()
            .filter_map(|s| match s.outcome {
                SongOutcome::Built {
                    clips,
                    clips_reused: true,
                    ..
                } => Some(clips),
                _ => None,
            })
            .sum();
        let rate = if exported > 0 && segment_time > Duration::ZERO {
            format!(" ({:.1} clips/s)", exported as f64 / segment_time.as_secs_f64())
        } else {
            String::new()
        };
        lines.push(format!(
            "  Clips: {exported} exported{rate}, {reused} reused from cache"
        ));

        for song in &self.songs {
            if let SongOutcome::Failed(reason) = &song.outcome {
                lines.push(format!("  Failed {}: {reason}", song.song_id));
            }
        }

        Some(lines.join("\n"))
    }

    /// Clips cut in this batch and the segment time spent cutting them.
    /// Songs served from the clip cache are left out so the rate stays honest.
    fn exported_clips(&self) -> (usize, Duration) {
        self.songs
            .iter()
            .filter_map(|s| match s.outcome {
                SongOutcome::Built {
                    clips,
                    clips_reused: false,
                    ..
                } => Some((clips, s.stage_elapsed(Stage::Segment).unwrap_or_default())),
                _ => None,
            })
            .fold((0, Duration::ZERO), |(n, t), (clips, elapsed)| {
                (n + clips, t + elapsed)
            })
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

fn table_row(song: &SongRecord) -> String {
    let (outcome, cards, clips) = match &song.outcome {
        SongOutcome::Built {
            cards,
            clips,
            clips_reused,
        } => {
            let clips = if *clips_reused {
                format!("{clips} cached")
            } else {
                format!("{clips} new")
            };
            ("built", cards.to_string(), clips)
        }
        SongOutcome::Skipped => ("skipped", "-".to_string(), "-".to_string()),
        SongOutcome::Failed(_) => ("failed", "-".to_string(), "-".to_string()),
    };

    let stages: Vec<String> = Stage::ALL
        .iter()
        .map(|stage| match song.stage_elapsed(*stage) {
            Some(elapsed) => format!("{:.0}ms", elapsed.as_secs_f64() * 1000.0),
            None => "-".to_string(),
        })
        .collect();

    format!(
        "  {:<28} {outcome:<8} {cards:>5} {clips:>10} {:>10} {:>10} {:>10}",
        song.song_id, stages[0], stages[1], stages[2]
    )
}

impl PipelineLogger for StdoutPipelineLogger {
    fn song_started(&mut self, song_id: &str) {
        self.current = Some((song_id.to_string(), Instant::now()));
        self.pending.clear();
    }

    fn progress(&mut self, current: usize, total: usize) {
        if total > 0 && (current % self.throttle_clips == 0 || current == total) {
            let song = self.current.as_ref().map_or("", |(id, _)| id.as_str());
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Exporting {song}: {current}/{total} clips ({pct:.1}%)");
        }
    }

    fn stage(&mut self, stage: Stage, elapsed: Duration) {
        self.pending.push((stage, elapsed));
    }

    fn song_finished(&mut self, song_id: &str, outcome: SongOutcome) {
        let (stages, elapsed) = match self.current.take() {
            Some((id, start)) if id == song_id => {
                (std::mem::take(&mut self.pending), start.elapsed())
            }
            _ => (Vec::new(), Duration::ZERO),
        };
        self.songs.push(SongRecord {
            song_id: song_id.to_string(),
            outcome,
            stages,
            elapsed,
        });
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn built(cards: usize, clips_reused: bool) -> SongOutcome {
        SongOutcome::Built {
            cards,
            clips: cards,
            clips_reused,
        }
    }

    fn run_song(logger: &mut StdoutPipelineLogger, id: &str, segment: u64, outcome: SongOutcome) {
        logger.song_started(id);
        logger.stage(Stage::Segment, ms(segment));
        logger.stage(Stage::Translate, ms(900));
        logger.song_finished(id, outcome);
    }

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.song_started("a");
        logger.progress(1, 10);
        logger.stage(Stage::Segment, ms(5));
        logger.song_finished("a", SongOutcome::Skipped);
        logger.summary();
    }

    #[test]
    fn test_stages_are_attached_to_the_finished_song() {
        let mut logger = StdoutPipelineLogger::new(10);
        run_song(&mut logger, "Again", 120, built(3, false));
        run_song(&mut logger, "Departure", 40, built(5, false));

        let songs = logger.songs();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].stage_elapsed(Stage::Segment), Some(ms(120)));
        assert_eq!(songs[1].stage_elapsed(Stage::Segment), Some(ms(40)));
        assert_eq!(songs[1].stage_elapsed(Stage::Package), None);
    }

    #[test]
    fn test_skipped_song_has_no_stages() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.song_finished("Old", SongOutcome::Skipped);

        assert_eq!(logger.songs()[0].outcome, SongOutcome::Skipped);
        assert!(logger.songs()[0].stages.is_empty());
    }

    #[test]
    fn test_summary_lists_every_outcome() {
        let mut logger = StdoutPipelineLogger::new(10);
        run_song(&mut logger, "Again", 500, built(10, false));
        logger.song_finished("Old", SongOutcome::Skipped);
        run_song(
            &mut logger,
            "Broken",
            5,
            SongOutcome::Failed("expected 4 translated lines, got 3".into()),
        );

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("1 built, 1 skipped, 1 failed"));
        assert!(summary.contains("10 new"));
        assert!(summary.contains("500ms"));
        assert!(summary.contains("Failed Broken: expected 4 translated lines, got 3"));
    }

    #[test]
    fn test_cache_reused_clips_are_reported_apart_from_exported() {
        let mut logger = StdoutPipelineLogger::new(10);
        run_song(&mut logger, "Fresh", 1000, built(20, false));
        run_song(&mut logger, "Cached", 1, built(12, true));

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("12 cached"));
        assert!(summary.contains("Clips: 20 exported (20.0 clips/s), 12 reused from cache"));
    }

    #[test]
    fn test_only_cached_songs_print_no_rate() {
        let mut logger = StdoutPipelineLogger::new(10);
        run_song(&mut logger, "Cached", 2, built(8, true));

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Clips: 0 exported, 8 reused from cache"));
        assert!(!summary.contains("clips/s"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_default_throttle() {
        let logger = StdoutPipelineLogger::default();
        assert_eq!(logger.throttle_clips, 10);
    }
}
