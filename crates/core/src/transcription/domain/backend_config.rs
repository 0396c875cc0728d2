use std::time::Duration;

use crate::shared::constants::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Where and how to reach the speech-to-text service.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub language: Option<String>,
    /// Optional vocabulary / style hint passed through to the model.
    pub prompt: Option<String>,
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn transcriptions_url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            language: None,
            prompt: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = BackendConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..BackendConfig::default()
        };
        assert_eq!(
            config.transcriptions_url(),
            "http://localhost:8080/v1/audio/transcriptions"
        );
    }

    #[test]
    fn test_new_keeps_defaults() {
        let config = BackendConfig::new("sk-test");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.request_timeout, Duration::from_secs(300));
    }
}
