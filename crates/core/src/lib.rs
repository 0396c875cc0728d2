//! Long-media transcription: split a recording into fixed-length clips,
//! send each clip to a Whisper-compatible backend, and stitch the results
//! into one globally timed subtitle track.

pub mod media;
pub mod pipeline;
pub mod shared;
pub mod subtitle;
pub mod transcription;
