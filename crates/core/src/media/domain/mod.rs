pub mod clip_encoder;
pub mod media_normalizer;
pub mod media_stream;
pub mod segment;
pub mod segmenter;
