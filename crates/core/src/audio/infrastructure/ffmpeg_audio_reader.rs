use std::path::Path;

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_track::AudioTrack;

/// Decodes a compressed song (mp3, m4a, ogg, ...) using ffmpeg-next.
///
/// Output is packed f32 at the stream's native sample rate and channel
/// layout, so slicing never resamples.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(&self, path: &Path) -> Result<Option<AudioTrack>, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;

        let audio_stream = match ictx.streams().best(ffmpeg_next::media::Type::Audio) {
            Some(stream) => stream,
            None => return Ok(None),
        };

        let audio_stream_index = audio_stream.index();
        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())?;
        let mut decoder = codec_ctx.decoder().audio()?;

        let channels = (decoder.channels() as u16).max(1);
        let sample_rate = decoder.rate();
        let mut layout = decoder.channel_layout();
        if layout.is_empty() {
            layout = ffmpeg_next::ChannelLayout::default(channels as i32);
        }

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            layout,
            sample_rate,
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
            layout,
            sample_rate,
        )?;

        let mut all_samples: Vec<f32> = Vec::new();
        let mut decoded_frame = ffmpeg_next::util::frame::audio::Audio::empty();
        let mut resampled_frame = ffmpeg_next::util::frame::audio::Audio::empty();

        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                resampler.run(&decoded_frame, &mut resampled_frame)?;
                extract_packed_samples(&resampled_frame, channels as usize, &mut all_samples);
            }
        }

        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            resampler.run(&decoded_frame, &mut resampled_frame)?;
            extract_packed_samples(&resampled_frame, channels as usize, &mut all_samples);
        }

        // The resampler may still hold buffered samples.
        if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
            if delay.output > 0 {
                extract_packed_samples(&resampled_frame, channels as usize, &mut all_samples);
            }
        }

        Ok(Some(AudioTrack::new(all_samples, sample_rate, channels)))
    }
}

/// Extract interleaved f32 samples from a packed resampled frame.
fn extract_packed_samples(
    frame: &ffmpeg_next::util::frame::audio::Audio,
    channels: usize,
    out: &mut Vec<f32>,
) {
    let count = frame.samples() * channels;
    if count == 0 {
        return;
    }
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, count) };
    out.extend_from_slice(floats);
}
