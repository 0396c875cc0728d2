/// Backends reject long uploads, so media is cut into 3 minute clips.
pub const DEFAULT_SEGMENT_DURATION_MS: u64 = 180_000;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "whisper-1";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Whisper resamples everything to 16 kHz mono internally.
pub const NORMALIZED_SAMPLE_RATE: u32 = 16_000;

pub const SUBTITLE_EXTENSION: &str = "srt";
pub const PLAIN_TEXT_EXTENSION: &str = "txt";
