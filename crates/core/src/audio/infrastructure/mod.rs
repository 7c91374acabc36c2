pub mod ffmpeg_audio_reader;
pub mod wav_clip_encoder;
