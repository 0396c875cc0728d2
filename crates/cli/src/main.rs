use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use media2srt_core::media::infrastructure::ffmpeg_normalizer::FfmpegNormalizer;
use media2srt_core::media::infrastructure::wav_clip_encoder::WavClipEncoder;
use media2srt_core::pipeline::infrastructure::executor_for;
use media2srt_core::pipeline::infrastructure::file_output_target::FileOutputTarget;
use media2srt_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use media2srt_core::pipeline::retry_policy::RetryPolicy;
use media2srt_core::pipeline::run_report::RunState;
use media2srt_core::pipeline::transcribe_media_use_case::TranscribeMediaUseCase;
use media2srt_core::pipeline::transcription_config::TranscriptionConfig;
use media2srt_core::shared::settings::Settings;
use media2srt_core::transcription::domain::response_kind::ResponseKind;
use media2srt_core::transcription::infrastructure::openai_transcriber::OpenAiTranscriber;

/// Transcribe long audio or video files into SRT subtitles.
#[derive(Parser)]
#[command(name = "media2srt")]
struct Cli {
    /// Input audio or video file.
    input: PathBuf,

    /// Output file (defaults to the input path with .srt or .txt).
    output: Option<PathBuf>,

    /// Output format: srt or text.
    #[arg(long, default_value = "srt")]
    format: ResponseKind,

    /// Segment length in seconds.
    #[arg(long)]
    segment_secs: Option<u64>,

    /// Attempts per segment before it is skipped.
    #[arg(long, env = "MAX_RETRIES")]
    max_retries: Option<u32>,

    /// Base delay between attempts, grows linearly per retry.
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Segments transcribed concurrently (1 = sequential).
    #[arg(long)]
    workers: Option<usize>,

    /// Transcription model name.
    #[arg(long)]
    model: Option<String>,

    /// Spoken language hint (ISO-639-1, e.g. "en").
    #[arg(long)]
    language: Option<String>,

    /// Context prompt passed to every segment.
    #[arg(long)]
    prompt: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long, env = "OPENAI_API_BASE")]
    api_base: Option<String>,

    /// API key for the transcription backend.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Re-transcribe even if the output already exists.
    #[arg(long)]
    force: bool,
}

fn main() {
    logger(env_logger::DEFAULT_FILTER_ENV).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A .env file in the working directory may supply the OPENAI_* and
    // MAX_RETRIES variables; real environment variables take precedence.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            log::warn!("Ignoring .env: {e}");
        }
    }
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli, Settings::load());
    let output = output_path(&cli.input, cli.output.as_deref(), config.response_kind);

    if cli.force && output.exists() {
        log::info!("Removing existing {}", output.display());
        fs::remove_file(&output)?;
    }

    let transcriber = OpenAiTranscriber::new(config.backend.clone(), Box::new(WavClipEncoder))?;
    let mut use_case = TranscribeMediaUseCase::new(
        Box::new(FfmpegNormalizer::new()),
        Arc::new(transcriber),
        executor_for(config.workers),
        Box::new(StdoutPipelineLogger::new()),
        config,
    )?;

    let mut target = FileOutputTarget::new(&output);
    let report = use_case.execute(&cli.input, &mut target)?;

    eprintln!("{}", report.describe());
    if report.status != RunState::AlreadyDone {
        log::info!("Output written to {}", output.display());
    }
    Ok(())
}

/// Progress, retries and the run summary are shown at `info` unless the
/// filter variable says otherwise.
fn logger(filter_var: &str) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or(filter_var, "info"));
    builder.format_timestamp(None).format_target(false);
    builder
}

/// Flags win over the settings file, which wins over built-in defaults.
fn build_config(cli: &Cli, settings: Settings) -> TranscriptionConfig {
    let mut config =
        TranscriptionConfig::from_settings(&settings, cli.api_key.clone().unwrap_or_default());
    config.response_kind = cli.format;

    if let Some(secs) = cli.segment_secs {
        config.segment_duration_ms = secs.saturating_mul(1000);
    }
    if cli.max_retries.is_some() || cli.retry_delay_ms.is_some() {
        config.retry = RetryPolicy::new(
            cli.max_retries.unwrap_or(settings.max_retries),
            Duration::from_millis(cli.retry_delay_ms.unwrap_or(settings.retry_delay_ms)),
        );
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(model) = &cli.model {
        config.backend.model = model.clone();
    }
    if let Some(language) = &cli.language {
        config.backend.language = Some(language.clone());
    }
    if let Some(base) = &cli.api_base {
        config.backend.base_url = base.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.backend.request_timeout = Duration::from_secs(secs);
    }
    config.backend.prompt = cli.prompt.clone();
    config
}

fn output_path(input: &Path, output: Option<&Path>, kind: ResponseKind) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(kind.file_extension()),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.is_file() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.segment_secs == Some(0) {
        return Err("Segment length must be at least 1 second".into());
    }
    if cli.max_retries == Some(0) {
        return Err("Max retries must be at least 1".into());
    }
    if cli.workers == Some(0) {
        return Err("Workers must be at least 1".into());
    }
    if cli.timeout_secs == Some(0) {
        return Err("Timeout must be at least 1 second".into());
    }
    if cli.api_key.as_deref().map_or(true, str::is_empty) {
        return Err("No API key: pass --api-key or set OPENAI_API_KEY".into());
    }
    if let Some(output) = &cli.output {
        if output == &cli.input {
            return Err("Output must differ from the input file".into());
        }
    }
    Ok(())
}
