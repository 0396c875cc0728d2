pub mod ffmpeg_normalizer;
pub mod wav_clip_encoder;
