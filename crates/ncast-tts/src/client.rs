//! Speech service HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::{TtsError, TtsResult};
use crate::subtitle::SubtitleCue;
use crate::synthesizer::{SpeechRequest, Synthesizer};

/// Configuration for the speech service client.
#[derive(Debug, Clone)]
pub struct SpeechClientConfig {
    /// Base URL of the speech service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Max retries for retryable failures.
    pub max_retries: u32,
}

impl Default for SpeechClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8753".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }
}

impl SpeechClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("NCAST_TTS_URL")
                .unwrap_or_else(|_| "http://localhost:8753".to_string()),
            timeout: Duration::from_secs(
                std::env::var("NCAST_TTS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("NCAST_TTS_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// HTTP client for the speech synthesis service.
pub struct HttpSynthesizer {
    http: Client,
    config: SpeechClientConfig,
}

impl HttpSynthesizer {
    /// Create a new client.
    pub fn new(config: SpeechClientConfig) -> TtsResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TtsError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> TtsResult<Self> {
        Self::new(SpeechClientConfig::from_env())
    }

    async fn post_synthesize(&self, request: &SpeechRequest) -> TtsResult<Vec<u8>> {
        let url = format!("{}/synthesize", self.config.base_url);
        debug!(voice = %request.voice, rate = %request.rate, "requesting synthesis from {url}");

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(request)
                    .send()
                    .await
                    .map_err(TtsError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::service_status(status, body));
        }

        let audio = response.bytes().await.map_err(TtsError::Network)?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }

    async fn post_captions(&self, request: &SpeechRequest) -> TtsResult<Vec<SubtitleCue>> {
        let url = format!("{}/captions", self.config.base_url);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(request)
                    .send()
                    .await
                    .map_err(TtsError::Network)
            })
            .await?;

        // Older service builds do not expose the captions endpoint.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TtsError::CaptionsUnsupported);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::service_status(status, body));
        }

        let cues: Vec<SubtitleCue> = response.json().await.map_err(TtsError::Network)?;
        Ok(cues)
    }

    /// Execute with bounded exponential-backoff retries.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> TtsResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = TtsResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "speech request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(TtsError::EmptyAudio))
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest, output: &Path) -> TtsResult<()> {
        let audio = self.post_synthesize(request).await?;
        tokio::fs::write(output, &audio).await?;
        Ok(())
    }

    async fn captions(&self, request: &SpeechRequest) -> TtsResult<Vec<SubtitleCue>> {
        self.post_captions(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpSynthesizer {
        HttpSynthesizer::new(SpeechClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
        })
        .unwrap()
    }

    fn request() -> SpeechRequest {
        SpeechRequest::new("第一章", "zh-CN-YunxiNeural", "+0%")
    }

    #[tokio::test]
    async fn synthesize_writes_audio_to_the_given_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-audio".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("0001.mp3");

        client_for(&server).synthesize(&request(), &out).await.unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"ID3-audio");
    }

    #[tokio::test]
    async fn non_success_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .respond_with(ResponseTemplate::new(400).set_body_string("unknown voice"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let err = client_for(&server)
            .synthesize(&request(), &dir.path().join("x.mp3"))
            .await
            .unwrap_err();

        match err {
            TtsError::ServiceStatus { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "unknown voice");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_audio_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let err = client_for(&server)
            .synthesize(&request(), &dir.path().join("x.mp3"))
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::EmptyAudio));
    }

    #[tokio::test]
    async fn missing_captions_endpoint_maps_to_unsupported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/captions"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).captions(&request()).await.unwrap_err();
        assert!(matches!(err, TtsError::CaptionsUnsupported));
    }

    #[tokio::test]
    async fn captions_deserialize_into_cues() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            { "start_ms": 0, "end_ms": 1200, "text": "第一句" },
            { "start_ms": 1200, "end_ms": 2400, "text": "第二句" }
        ]);
        Mock::given(method("POST"))
            .and(path("/captions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let cues = client_for(&server).captions(&request()).await.unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "第一句");
        assert_eq!(cues[1].start_ms, 1200);
    }
}
