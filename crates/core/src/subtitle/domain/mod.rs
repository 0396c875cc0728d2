pub mod codec_error;
pub mod cue;
pub mod renumber;
pub mod timestamp_shifter;
