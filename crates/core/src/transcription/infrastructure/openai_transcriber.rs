use std::time::{Duration, Instant};

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::media::domain::clip_encoder::ClipEncoder;
use crate::media::domain::media_stream::MediaStream;
use crate::shared::constants::CONNECT_TIMEOUT_SECS;
use crate::transcription::domain::backend_config::BackendConfig;
use crate::transcription::domain::response_kind::ResponseKind;
use crate::transcription::domain::transcriber::{Transcriber, Transcription};
use crate::transcription::domain::transcription_error::TranscriptionError;

/// Client for OpenAI-compatible `POST /audio/transcriptions` endpoints
/// (OpenAI, Groq, local whisper servers).
pub struct OpenAiTranscriber {
    config: BackendConfig,
    encoder: Box<dyn ClipEncoder>,
    client: Client,
}

#[derive(Deserialize)]
struct JsonTranscription {
    text: String,
}

impl OpenAiTranscriber {
    pub fn new(
        config: BackendConfig,
        encoder: Box<dyn ClipEncoder>,
    ) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(http_error)?;
        Ok(Self {
            config,
            encoder,
            client,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn build_form(&self, clip: &MediaStream, kind: ResponseKind) -> Result<Form, TranscriptionError> {
        let encoded = self.encoder.encode(clip)?;
        let file = Part::bytes(encoded.bytes)
            .file_name(encoded.file_name)
            .mime_str(encoded.mime)
            .map_err(http_error)?;

        let mut form = Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("response_format", kind.response_format());
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }
        if let Some(prompt) = &self.config.prompt {
            form = form.text("prompt", prompt.clone());
        }
        Ok(form)
    }
}

impl Transcriber for OpenAiTranscriber {
    fn transcribe(
        &self,
        clip: &MediaStream,
        kind: ResponseKind,
    ) -> Result<Transcription, TranscriptionError> {
        let form = self.build_form(clip, kind)?;
        let started = Instant::now();

        let mut request = self
            .client
            .post(self.config.transcriptions_url())
            .multipart(form);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().map_err(http_error)?;
        let status = response.status();
        let body = response.text().map_err(http_error)?;
        if !status.is_success() {
            return Err(TranscriptionError::Backend {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        log::debug!(
            "Transcribed {}ms clip in {:.2}s",
            clip.duration_ms(),
            started.elapsed().as_secs_f64()
        );

        match kind {
            ResponseKind::Subtitle => Ok(Transcription::Subtitle(body)),
            ResponseKind::PlainText => extract_text(&body).map(Transcription::PlainText),
        }
    }
}

fn http_error(e: reqwest::Error) -> TranscriptionError {
    TranscriptionError::Http(e.to_string())
}

fn extract_text(body: &str) -> Result<String, TranscriptionError> {
    serde_json::from_str::<JsonTranscription>(body)
        .map(|json| json.text)
        .map_err(|e| TranscriptionError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::infrastructure::wav_clip_encoder::WavClipEncoder;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Accept one connection, capture the raw request, reply with `status`
    /// and `body`. Returns the base URL and a handle yielding the request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (base_url, handle)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            if request_complete(&data) {
                break;
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn request_complete(data: &[u8]) -> bool {
        let text = String::from_utf8_lossy(data);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let headers = text[..header_end].to_ascii_lowercase();
        let body_len = data.len() - (header_end + 4);
        match headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            Some(len) => body_len >= len,
            None => text.ends_with("0\r\n\r\n"),
        }
    }

    fn transcriber(base_url: String) -> OpenAiTranscriber {
        let config = BackendConfig {
            base_url,
            api_key: "sk-test".to_string(),
            language: Some("en".to_string()),
            request_timeout: Duration::from_secs(5),
            ..BackendConfig::default()
        };
        OpenAiTranscriber::new(config, Box::new(WavClipEncoder)).unwrap()
    }

    fn clip() -> MediaStream {
        MediaStream::new(vec![0.0; 1_600], 16_000, 1)
    }

    #[test]
    fn test_subtitle_response_returned_unchanged() {
        let srt = "1\n00:00:00,000 --> 00:00:01,000\nhello\n\n";
        let (url, server) = serve_once("200 OK", srt);
        let result = transcriber(url)
            .transcribe(&clip(), ResponseKind::Subtitle)
            .unwrap();
        assert_eq!(result, Transcription::Subtitle(srt.to_string()));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /audio/transcriptions"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains("name=\"response_format\"\r\n\r\nsrt"));
        assert!(request.contains("name=\"model\"\r\n\r\nwhisper-1"));
        assert!(request.contains("name=\"language\"\r\n\r\nen"));
        assert!(request.contains("filename=\"segment.wav\""));
    }

    #[test]
    fn test_plain_text_extracts_json_text() {
        let (url, server) = serve_once("200 OK", r#"{"text":"hello world"}"#);
        let result = transcriber(url)
            .transcribe(&clip(), ResponseKind::PlainText)
            .unwrap();
        assert_eq!(result, Transcription::PlainText("hello world".to_string()));
        let request = server.join().unwrap();
        assert!(request.contains("name=\"response_format\"\r\n\r\njson"));
    }

    #[test]
    fn test_error_status_is_backend_error() {
        let (url, server) = serve_once("429 Too Many Requests", "slow down");
        let err = transcriber(url)
            .transcribe(&clip(), ResponseKind::Subtitle)
            .unwrap_err();
        server.join().unwrap();
        match err {
            TranscriptionError::Backend { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let (url, server) = serve_once("200 OK", "not json");
        let err = transcriber(url)
            .transcribe(&clip(), ResponseKind::PlainText)
            .unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, TranscriptionError::MalformedResponse(_)));
    }

    #[test]
    fn test_unreachable_backend_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let err = transcriber(url)
            .transcribe(&clip(), ResponseKind::Subtitle)
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::Http(_)));
    }

    #[test]
    fn test_extract_text_ignores_extra_fields() {
        let text = extract_text(r#"{"text":"hi","language":"en","duration":1.5}"#).unwrap();
        assert_eq!(text, "hi");
    }
}
