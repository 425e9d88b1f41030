// src/ai/gemini_client.rs
use super::types::{
    ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleSearch, Tool,
};
use super::{GeneratedText, GenerationRequest, GroundingSource, TextGenerator};
use crate::config::ExtractorConfig;
use crate::error::{ExtractionError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Gemini `generateContent` client with optional Google Search grounding.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let timeout = config.timeout_seconds.map(Duration::from_secs);
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            ExtractionError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub(crate) fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        let tools = if request.options.web_search {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            system_instruction: Content::text(None, &request.system_instruction),
            contents: vec![Content::text(Some("user"), &request.prompt)],
            generation_config: GenerationConfig {
                temperature: request.options.temperature,
            },
            tools,
        }
    }

    /// Flatten the first candidate into text plus its grounding entries.
    pub(crate) fn into_generated_text(response: GenerateContentResponse) -> Result<GeneratedText> {
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            ExtractionError::UpstreamFailure("Gemini returned no candidates".to_string())
        })?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "unknown".to_string());
            return Err(ExtractionError::UpstreamFailure(format!(
                "Gemini returned an empty response (finish reason: {})",
                reason
            )));
        }

        let sources = candidate
            .grounding_metadata
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .into_iter()
                    .map(|chunk| {
                        let web = chunk.web.unwrap_or_default();
                        GroundingSource {
                            uri: web.uri,
                            title: web.title,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GeneratedText { text, sources })
    }

    fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.status {
                Some(code) => format!(
                    "Gemini API error {} ({}): {}",
                    status, code, envelope.error.message
                ),
                None => format!("Gemini API error {}: {}", status, envelope.error.message),
            },
            Err(_) => format!("Gemini API returned error {}: {}", status, body),
        }
    }

    fn describe_transport_error(&self, action: &str, e: &reqwest::Error) -> String {
        match self.timeout {
            Some(timeout) if e.is_timeout() => format!(
                "Gemini request timed out after {} s",
                timeout.as_secs()
            ),
            _ => format!("{}: {}", action, e),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedText> {
        let body = Self::build_body(request);

        info!(
            "Calling Gemini model {} (web search: {})",
            self.model, request.options.web_search
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Gemini: {}", e);
                ExtractionError::UpstreamFailure(
                    self.describe_transport_error("Failed to reach Gemini", &e),
                )
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!("Failed to read Gemini response body: {}", e);
            ExtractionError::UpstreamFailure(
                self.describe_transport_error("Failed to read Gemini response body", &e),
            )
        })?;

        if !status.is_success() {
            let message = Self::describe_error(status, &response_text);
            error!("{}", message);
            return Err(ExtractionError::UpstreamFailure(message));
        }

        let decoded: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                warn!("Undecodable Gemini response: {}", e);
                debug!("Raw Gemini response: {}", response_text);
                ExtractionError::UpstreamFailure(format!(
                    "Failed to decode Gemini response: {}",
                    e
                ))
            })?;

        let generated = Self::into_generated_text(decoded)?;
        info!(
            "Received {} characters and {} grounding sources from Gemini",
            generated.text.len(),
            generated.sources.len()
        );

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GenerationOptions;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Read one HTTP request: headers, then `Content-Length` bytes of body.
    async fn read_request(socket: &mut TcpStream) {
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            received.extend_from_slice(&buf[..n]);

            let head_end = match received.windows(4).position(|w| w == b"\r\n\r\n") {
                Some(pos) => pos + 4,
                None => continue,
            };
            let head = String::from_utf8_lossy(&received[..head_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);

            if received.len() >= head_end + content_length {
                return;
            }
        }
    }

    /// Serve a single canned response on a local port and return its base URL.
    async fn serve_once(status_line: &'static str, body: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(delay).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    fn local_client(base_url: &str, timeout_seconds: Option<u64>) -> GeminiClient {
        let config = ExtractorConfig::new("test-key")
            .with_base_url(base_url)
            .with_timeout_seconds(timeout_seconds);
        GeminiClient::new(&config).unwrap()
    }

    fn request(web_search: bool) -> GenerationRequest {
        GenerationRequest {
            prompt: "Find https://www.linkedin.com/in/jdoe".to_string(),
            system_instruction: "You find contact details.".to_string(),
            options: GenerationOptions {
                temperature: 0.0,
                web_search,
            },
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GeminiClient::build_body(&request(true))).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You find contact details."
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Find https://www.linkedin.com/in/jdoe"
        );
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(body["tools"], serde_json::json!([{ "googleSearch": {} }]));
    }

    #[test]
    fn test_request_body_without_search_has_no_tools() {
        let body = serde_json::to_value(GeminiClient::build_body(&request(false))).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_endpoint_uses_model_and_trims_base_url() {
        let config = ExtractorConfig::new("k")
            .with_base_url("http://localhost:9999/")
            .with_model("gemini-test");
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_decode_text_and_grounding() {
        let raw = r#"{
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "```json\n{\"name\":" }, { "text": "\"Jane\"}\n```" }] },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "webSearchQueries": ["jane doe contact"],
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com/jane", "title": "example.com" } },
                        { "web": { "title": "no uri here" } },
                        { "retrievedContext": {} }
                    ]
                }
            }]
        }"#;
        let decoded: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let generated = GeminiClient::into_generated_text(decoded).unwrap();

        assert_eq!(generated.text, "```json\n{\"name\":\"Jane\"}\n```");
        assert_eq!(generated.sources.len(), 3);
        assert_eq!(
            generated.sources[0].uri.as_deref(),
            Some("https://example.com/jane")
        );
        assert_eq!(generated.sources[1].uri, None);
        assert_eq!(generated.sources[2], GroundingSource::default());
    }

    #[test]
    fn test_decode_without_grounding_metadata() {
        let raw = r#"{ "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }] }"#;
        let decoded: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let generated = GeminiClient::into_generated_text(decoded).unwrap();
        assert_eq!(generated.text, "{}");
        assert!(generated.sources.is_empty());
    }

    #[test]
    fn test_no_candidates_is_upstream_failure() {
        let decoded: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let err = GeminiClient::into_generated_text(decoded).unwrap_err();
        assert!(matches!(err, ExtractionError::UpstreamFailure(_)));
    }

    #[test]
    fn test_empty_text_reports_finish_reason() {
        let raw = r#"{ "candidates": [{ "finishReason": "SAFETY" }] }"#;
        let decoded: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = GeminiClient::into_generated_text(decoded).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_describe_error_prefers_api_message() {
        let body = r#"{ "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" } }"#;
        let message = GeminiClient::describe_error(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(message.contains("API key not valid."));
        assert!(message.contains("INVALID_ARGUMENT"));

        let plain = GeminiClient::describe_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(plain.contains("upstream down"));
    }

    #[tokio::test]
    async fn test_generate_returns_text_and_sources() {
        let base_url = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"name\":\"A\"}"}]},"groundingMetadata":{"groundingChunks":[{"web":{"uri":"https://a","title":"A"}}]}}]}"#,
            Duration::ZERO,
        )
        .await;

        let generated = local_client(&base_url, None)
            .generate(&request(true))
            .await
            .unwrap();

        assert_eq!(generated.text, r#"{"name":"A"}"#);
        assert_eq!(generated.sources[0].uri.as_deref(), Some("https://a"));
    }

    #[tokio::test]
    async fn test_generate_maps_api_error_status() {
        let base_url = serve_once(
            "403 Forbidden",
            r#"{"error":{"code":403,"message":"API key not valid.","status":"PERMISSION_DENIED"}}"#,
            Duration::ZERO,
        )
        .await;

        let err = local_client(&base_url, None)
            .generate(&request(true))
            .await
            .unwrap_err();

        match err {
            ExtractionError::UpstreamFailure(message) => {
                assert!(message.contains("403"));
                assert!(message.contains("PERMISSION_DENIED"));
                assert!(message.contains("API key not valid."));
            }
            other => panic!("expected UpstreamFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_reports_timeout() {
        let base_url = serve_once("200 OK", "{}", Duration::from_secs(3)).await;

        let err = local_client(&base_url, Some(1))
            .generate(&request(true))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExtractionError::UpstreamFailure("Gemini request timed out after 1 s".to_string())
        );
    }

    #[tokio::test]
    async fn test_generate_rejects_undecodable_body() {
        let base_url = serve_once("200 OK", "<html>not json</html>", Duration::ZERO).await;

        let err = local_client(&base_url, None)
            .generate(&request(true))
            .await
            .unwrap_err();

        match err {
            ExtractionError::UpstreamFailure(message) => {
                assert!(message.starts_with("Failed to decode Gemini response"));
            }
            other => panic!("expected UpstreamFailure, got {:?}", other),
        }
    }
}
