pub mod infrastructure;
pub mod output_target;
pub mod output_track;
pub mod pipeline_error;
pub mod pipeline_logger;
pub mod retry_policy;
pub mod run_report;
pub mod segment_executor;
pub mod transcribe_media_use_case;
pub mod transcription_config;
