use std::time::Duration;

use crate::pipeline::pipeline_error::PipelineError;
use crate::pipeline::retry_policy::RetryPolicy;
use crate::shared::constants::DEFAULT_SEGMENT_DURATION_MS;
use crate::shared::settings::Settings;
use crate::transcription::domain::backend_config::BackendConfig;
use crate::transcription::domain::response_kind::ResponseKind;

/// Everything one run needs, passed in explicitly at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptionConfig {
    pub backend: BackendConfig,
    pub segment_duration_ms: u64,
    pub retry: RetryPolicy,
    pub response_kind: ResponseKind,
    /// Segments transcribed concurrently. 1 = strictly sequential.
    pub workers: usize,
}

impl TranscriptionConfig {
    /// Build from persisted settings plus the credential, which is never
    /// stored in the settings file.
    pub fn from_settings(settings: &Settings, api_key: impl Into<String>) -> Self {
        Self {
            backend: BackendConfig {
                base_url: settings.api_base.clone(),
                api_key: api_key.into(),
                model: settings.model.clone(),
                language: settings.language.clone(),
                prompt: None,
                request_timeout: Duration::from_secs(settings.request_timeout_secs),
            },
            segment_duration_ms: settings.segment_duration_ms,
            retry: RetryPolicy::new(
                settings.max_retries,
                Duration::from_millis(settings.retry_delay_ms),
            ),
            response_kind: ResponseKind::Subtitle,
            workers: settings.workers,
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.segment_duration_ms == 0 {
            return Err(PipelineError::Config(
                "segment duration must be > 0".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::Config("workers must be >= 1".to_string()));
        }
        if self.backend.request_timeout.is_zero() {
            return Err(PipelineError::Config(
                "request timeout must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            segment_duration_ms: DEFAULT_SEGMENT_DURATION_MS,
            retry: RetryPolicy::default(),
            response_kind: ResponseKind::Subtitle,
            workers: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_carries_fields() {
        let settings = Settings {
            api_base: "http://localhost:9000/v1".to_string(),
            max_retries: 5,
            segment_duration_ms: 60_000,
            workers: 2,
            ..Settings::default()
        };
        let config = TranscriptionConfig::from_settings(&settings, "sk-x");
        assert_eq!(config.backend.api_key, "sk-x");
        assert_eq!(config.backend.base_url, "http://localhost:9000/v1");
        assert_eq!(config.retry.max_attempts(), 5);
        assert_eq!(config.segment_duration_ms, 60_000);
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_default_is_valid() {
        assert!(TranscriptionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_segment_duration_rejected() {
        let config = TranscriptionConfig {
            segment_duration_ms: 0,
            ..TranscriptionConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = TranscriptionConfig {
            workers: 0,
            ..TranscriptionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
