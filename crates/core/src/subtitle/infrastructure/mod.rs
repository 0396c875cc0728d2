pub mod srt_codec;
