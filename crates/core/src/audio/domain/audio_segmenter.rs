use std::fs;
use std::path::{Path, PathBuf};

use super::audio_clip::{clip_file_name, clip_index, AudioClip, ClipSet};
use super::audio_reader::AudioReader;
use super::audio_track::AudioTrack;
use super::clip_encoder::ClipEncoder;
use crate::shared::error::{FormatError, SongError};

/// Progress callback: `(clips_written, clips_total)`.
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize);

/// Cuts a song into one clip per lyric line.
///
/// Clip `i + 1` spans `[offsets[i], offsets[i + 1])`. The last offset has no
/// successor and therefore no clip, so the final lyric line never gets a card.
pub struct AudioSegmenter {
    encoder: Box<dyn ClipEncoder>,
}

impl AudioSegmenter {
    pub fn new(encoder: Box<dyn ClipEncoder>) -> Self {
        Self { encoder }
    }

    pub fn extension(&self) -> &str {
        self.encoder.extension()
    }

    /// Returns the clip listing of `dir` if it already holds files.
    ///
    /// This is a cache hit on directory contents alone: the clips are not
    /// checked against the current lyric offsets, so an edited lyric file
    /// keeps its stale clips until the directory is removed. Only files named
    /// `clip_<n>.<ext>` are listed, in index order; gaps are left for the
    /// deck assembler to report.
    pub fn cached_clips(dir: &Path) -> Result<Option<ClipSet>, SongError> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut holds_files = false;
        let mut clips: Vec<(usize, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| SongError::io(dir, e))? {
            let entry = entry.map_err(|e| SongError::io(dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            holds_files = true;
            match clip_index(&entry.file_name().to_string_lossy()) {
                Some(index) => clips.push((index, path)),
                None => log::debug!("Ignoring {} in clip cache", path.display()),
            }
        }

        if !holds_files {
            return Ok(None);
        }

        clips.sort_by_key(|(index, _)| *index);
        Ok(Some(ClipSet {
            dir: dir.to_path_buf(),
            paths: clips.into_iter().map(|(_, path)| path).collect(),
            reused: true,
        }))
    }

    /// Reuses the clip directory if populated, otherwise decodes the song and
    /// segments it. The cache check happens before decoding.
    pub fn prepare_clips(
        &self,
        reader: &dyn AudioReader,
        audio_path: &Path,
        offsets: &[u64],
        dir: &Path,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<ClipSet, SongError> {
        if let Some(cached) = Self::cached_clips(dir)? {
            log::info!(
                "Skipping {}: {} clips already exported",
                dir.display(),
                cached.paths.len()
            );
            return Ok(cached);
        }

        if !audio_path.exists() {
            return Err(SongError::NotFound {
                what: "audio file",
                path: audio_path.to_path_buf(),
            });
        }

        let track = reader
            .read_audio(audio_path)
            .map_err(|e| SongError::AudioDecode {
                path: audio_path.to_path_buf(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| SongError::AudioDecode {
                path: audio_path.to_path_buf(),
                reason: "no audio stream".to_string(),
            })?;
        log::debug!(
            "Decoded {} ({} Hz, {} ch, {} ms)",
            audio_path.display(),
            track.sample_rate(),
            track.channels(),
            track.duration_ms()
        );

        let clips = self.segment(&track, offsets, dir, on_progress)?;
        Ok(ClipSet {
            dir: dir.to_path_buf(),
            paths: clips.into_iter().map(|c| c.path).collect(),
            reused: false,
        })
    }

    /// Slices `track` at `offsets` and exports every clip into `dir`.
    ///
    /// Clips are written to a sibling `.part` directory that is renamed into
    /// place once all of them exist, so a failed run leaves no partial cache.
    pub fn segment(
        &self,
        track: &AudioTrack,
        offsets: &[u64],
        dir: &Path,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> Result<Vec<AudioClip>, SongError> {
        check_offset_order(offsets)?;

        let staging = staging_dir(dir);
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| SongError::io(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| SongError::io(&staging, e))?;

        let result = self.write_clips(track, offsets, dir, &staging, &mut on_progress);
        if result.is_err() {
            let _ = fs::remove_dir_all(&staging);
        }
        let clips = result?;

        if dir.exists() {
            // Only an empty directory reaches this point; populated ones are
            // served from the cache.
            fs::remove_dir(dir).map_err(|e| SongError::io(dir, e))?;
        }
        fs::rename(&staging, dir).map_err(|e| SongError::io(dir, e))?;

        log::info!("Exported {} clips to {}", clips.len(), dir.display());
        Ok(clips)
    }

    fn write_clips(
        &self,
        track: &AudioTrack,
        offsets: &[u64],
        dir: &Path,
        staging: &Path,
        on_progress: &mut Option<ProgressFn<'_>>,
    ) -> Result<Vec<AudioClip>, SongError> {
        let total = offsets.len().saturating_sub(1);
        let mut clips = Vec::with_capacity(total);

        for (i, pair) in offsets.windows(2).enumerate() {
            let index = i + 1;
            let name = clip_file_name(index, self.encoder.extension());
            let path = dir.join(&name);

            let slice = track.slice_ms(pair[0], pair[1]);
            let bytes = self
                .encoder
                .encode(&slice)
                .map_err(|e| SongError::AudioEncode {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

            let staged = staging.join(&name);
            fs::write(&staged, &bytes).map_err(|e| SongError::io(&staged, e))?;
            log::debug!("Exported clip {index} to {}", path.display());

            clips.push(AudioClip { index, bytes, path });
            if let Some(cb) = on_progress.as_mut() {
                cb(index, total);
            }
        }

        Ok(clips)
    }
}

fn check_offset_order(offsets: &[u64]) -> Result<(), FormatError> {
    match offsets.windows(2).find(|pair| pair[1] < pair[0]) {
        Some(pair) => Err(FormatError::OffsetOrder {
            previous: pair[0],
            next: pair[1],
        }),
        None => Ok(()),
    }
}

fn staging_dir(dir: &Path) -> PathBuf {
    let mut name = dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dir.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // ─── Stubs ───

    /// Records every slice it is asked to encode; the encoded bytes are the
    /// first sample of the slice followed by its length.
    struct RecordingEncoder {
        slices: Arc<Mutex<Vec<AudioTrack>>>,
    }

    impl RecordingEncoder {
        fn new() -> Self {
            Self {
                slices: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ClipEncoder for RecordingEncoder {
        fn extension(&self) -> &str {
            "raw"
        }

        fn encode(&self, clip: &AudioTrack) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
            self.slices.lock().unwrap().push(clip.clone());
            let first = clip.samples().first().copied().unwrap_or(-1.0);
            Ok(format!("{first}:{}", clip.samples().len()).into_bytes())
        }
    }

    struct FailingEncoder;

    impl ClipEncoder for FailingEncoder {
        fn extension(&self) -> &str {
            "raw"
        }

        fn encode(&self, _: &AudioTrack) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
            Err("encoder exploded".into())
        }
    }

    struct StubAudioReader {
        track: Option<AudioTrack>,
        reads: Arc<Mutex<usize>>,
    }

    impl StubAudioReader {
        fn new(track: Option<AudioTrack>) -> Self {
            Self {
                track,
                reads: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl AudioReader for StubAudioReader {
        fn read_audio(&self, _: &Path) -> Result<Option<AudioTrack>, Box<dyn std::error::Error>> {
            *self.reads.lock().unwrap() += 1;
            Ok(self.track.clone())
        }
    }

    struct FailingReader;

    impl AudioReader for FailingReader {
        fn read_audio(&self, _: &Path) -> Result<Option<AudioTrack>, Box<dyn std::error::Error>> {
            Err("invalid data found when processing input".into())
        }
    }

    // ─── Helpers ───

    /// 1 kHz mono ramp, so sample index == millisecond offset.
    fn ramp_track(ms: usize) -> AudioTrack {
        AudioTrack::new((0..ms).map(|i| i as f32).collect(), 1000, 1)
    }

    fn fake_audio_file(tmp: &TempDir) -> PathBuf {
        let path = tmp.path().join("song.mp3");
        fs::write(&path, b"not really mp3").unwrap();
        path
    }

    // ─── Segmentation ───

    #[test]
    fn test_segment_produces_one_clip_per_offset_pair() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("song");
        let encoder = RecordingEncoder::new();
        let slices = encoder.slices.clone();
        let segmenter = AudioSegmenter::new(Box::new(encoder));

        let clips = segmenter
            .segment(&ramp_track(5000), &[0, 1000, 2500, 4000], &dir, None)
            .unwrap();

        assert_eq!(clips.len(), 3);
        let indices: Vec<usize> = clips.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        let slices = slices.lock().unwrap();
        let spans: Vec<(f32, usize)> = slices
            .iter()
            .map(|s| (s.samples()[0], s.samples().len()))
            .collect();
        assert_eq!(spans, vec![(0.0, 1000), (1000.0, 1500), (2500.0, 1500)]);
    }

    #[test]
    fn test_segment_writes_clips_named_by_position() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("song");
        let segmenter = AudioSegmenter::new(Box::new(RecordingEncoder::new()));

        let clips = segmenter
            .segment(&ramp_track(3000), &[0, 1000, 2000], &dir, None)
            .unwrap();

        assert_eq!(clips[0].path, dir.join("clip_1.raw"));
        assert_eq!(clips[1].path, dir.join("clip_2.raw"));
        assert_eq!(fs::read(&clips[1].path).unwrap(), clips[1].bytes);
        assert_eq!(fs::read(dir.join("clip_2.raw")).unwrap(), b"1000:1000");
        assert!(!dir.join("clip_3.raw").exists());
        assert!(!staging_dir(&dir).exists());
    }

    #[test]
    fn test_single_offset_produces_no_clips() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("song");
        let segmenter = AudioSegmenter::new(Box::new(RecordingEncoder::new()));

        let clips = segmenter.segment(&ramp_track(1000), &[0], &dir, None).unwrap();
        assert!(clips.is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_segment_reports_progress() {
        let tmp = TempDir::new().unwrap();
        let segmenter = AudioSegmenter::new(Box::new(RecordingEncoder::new()));
        let mut seen = Vec::new();
        let mut progress = |current: usize, total: usize| seen.push((current, total));

        segmenter
            .segment(
                &ramp_track(3000),
                &[0, 1000, 2000],
                &tmp.path().join("song"),
                Some(&mut progress),
            )
            .unwrap();

        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_decreasing_offsets_rejected_before_writing() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("song");
        let segmenter = AudioSegmenter::new(Box::new(RecordingEncoder::new()));

        let result = segmenter.segment(&ramp_track(3000), &[0, 2000, 1000], &dir, None);
        assert!(matches!(
            result,
            Err(SongError::Format(FormatError::OffsetOrder {
                previous: 2000,
                next: 1000
            }))
        ));
        assert!(!dir.exists());
    }

    #[test]
    fn test_encoder_failure_leaves_no_partial_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("song");
        let segmenter = AudioSegmenter::new(Box::new(FailingEncoder));

        let result = segmenter.segment(&ramp_track(3000), &[0, 1000, 2000], &dir, None);
        assert!(matches!(result, Err(SongError::AudioEncode { .. })));
        assert!(!dir.exists());
        assert!(!staging_dir(&dir).exists());
    }

    // ─── Cache ───

    #[test]
    fn test_cached_clips_none_for_missing_or_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("song");
        assert!(AudioSegmenter::cached_clips(&dir).unwrap().is_none());

        fs::create_dir_all(&dir).unwrap();
        assert!(AudioSegmenter::cached_clips(&dir).unwrap().is_none());
    }

    #[test]
    fn test_cached_clips_lists_numbered_clips_in_index_order() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        for name in ["clip_10.wav", "clip_2.wav", "notes.txt", "clip_1.wav"] {
            fs::write(dir.join(name), b"x").unwrap();
        }

        let cached = AudioSegmenter::cached_clips(&dir).unwrap().unwrap();
        let names: Vec<String> = cached
            .paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["clip_1.wav", "clip_2.wav", "clip_10.wav"]);
        assert!(cached.reused);
    }

    #[test]
    fn test_cached_dir_with_only_stray_files_is_still_a_hit() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("cover.jpg"), b"jpg").unwrap();

        let cached = AudioSegmenter::cached_clips(tmp.path()).unwrap().unwrap();
        assert!(cached.paths.is_empty());
        assert!(cached.reused);
    }

    #[test]
    fn test_prepare_twice_reuses_clips_even_if_offsets_change() {
        let tmp = TempDir::new().unwrap();
        let audio = fake_audio_file(&tmp);
        let dir = tmp.path().join("clips").join("song");
        let encoder = RecordingEncoder::new();
        let slices = encoder.slices.clone();
        let segmenter = AudioSegmenter::new(Box::new(encoder));
        let reader = StubAudioReader::new(Some(ramp_track(5000)));
        let reads = reader.reads.clone();

        let first = segmenter
            .prepare_clips(&reader, &audio, &[0, 1000, 2500, 4000], &dir, None)
            .unwrap();
        assert!(!first.reused);

        // Lyrics edited since the first run: different offsets, same cache.
        let second = segmenter
            .prepare_clips(&reader, &audio, &[0, 500], &dir, None)
            .unwrap();

        assert!(second.reused);
        assert_eq!(second.paths, first.paths);
        assert_eq!(*reads.lock().unwrap(), 1);
        assert_eq!(slices.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_prepare_missing_audio_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let segmenter = AudioSegmenter::new(Box::new(RecordingEncoder::new()));
        let reader = StubAudioReader::new(Some(ramp_track(1000)));

        let result = segmenter.prepare_clips(
            &reader,
            &tmp.path().join("absent.mp3"),
            &[0, 500],
            &tmp.path().join("song"),
            None,
        );
        assert!(matches!(
            result,
            Err(SongError::NotFound {
                what: "audio file",
                ..
            })
        ));
    }

    #[test]
    fn test_prepare_decode_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let audio = fake_audio_file(&tmp);
        let dir = tmp.path().join("song");
        let segmenter = AudioSegmenter::new(Box::new(RecordingEncoder::new()));

        let result = segmenter.prepare_clips(&FailingReader, &audio, &[0, 500], &dir, None);
        assert!(matches!(result, Err(SongError::AudioDecode { .. })));
        assert!(!dir.exists());
    }

    #[test]
    fn test_prepare_without_audio_stream_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let audio = fake_audio_file(&tmp);
        let segmenter = AudioSegmenter::new(Box::new(RecordingEncoder::new()));
        let reader = StubAudioReader::new(None);

        let result =
            segmenter.prepare_clips(&reader, &audio, &[0, 500], &tmp.path().join("song"), None);
        match result {
            Err(SongError::AudioDecode { reason, .. }) => assert_eq!(reason, "no audio stream"),
            other => panic!("expected AudioDecode, got {other:?}"),
        }
    }
}
