use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{PLAIN_TEXT_EXTENSION, SUBTITLE_EXTENSION};

/// What the backend is asked to return for each clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// SubRip cues timed against the clip.
    #[default]
    Subtitle,
    /// Untimed transcript text.
    PlainText,
}

impl ResponseKind {
    /// Value of the backend's `response_format` field.
    pub fn response_format(&self) -> &'static str {
        match self {
            ResponseKind::Subtitle => "srt",
            ResponseKind::PlainText => "json",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ResponseKind::Subtitle => SUBTITLE_EXTENSION,
            ResponseKind::PlainText => PLAIN_TEXT_EXTENSION,
        }
    }
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseKind::Subtitle => write!(f, "srt"),
            ResponseKind::PlainText => write!(f, "text"),
        }
    }
}

impl FromStr for ResponseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "srt" | "subtitle" => Ok(ResponseKind::Subtitle),
            "text" | "txt" | "plain_text" => Ok(ResponseKind::PlainText),
            other => Err(format!(
                "Format must be 'srt' or 'text', got '{other}'"
            )),
        }
    }
}
