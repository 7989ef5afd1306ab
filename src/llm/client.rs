// Generation provider client using reqwest.
//
// Sends one non-streaming `generateContent` request per user-initiated
// generate action (prompt + JSON response schema), pulls the text payload
// out of the response envelope, and hands it to the normalizer. The
// spawned-task entry point reports the outcome as an `LlmEvent` over an
// mpsc channel, tagged with the generation counter so the app orchestrator
// can discard events from superseded requests.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::deck::{Flashcard, GenerationRequest};
use crate::protocol::LlmEvent;

use super::{prompt, response, GenerationError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// How much of an error body to keep for the log.
const ERROR_BODY_LIMIT: usize = 300;

// ---------------------------------------------------------------------------
// GenerationBackend
// ---------------------------------------------------------------------------

/// The provider seam: one call in, one validated deck (or error) out.
/// Tests substitute this to drive the state machine without the network.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, topic: &str, count: u8)
        -> Result<Vec<Flashcard>, GenerationError>;
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Low-level Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client for the given API key and model identifier.
    pub fn new(api_key: String, model: String, max_output_tokens: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            max_output_tokens,
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at a different endpoint base. Tests use this to
    /// target a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate_inner(
        &self,
        topic: &str,
        count: u8,
    ) -> Result<Vec<Flashcard>, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::NotConfigured);
        }

        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt::build_generation_prompt(topic, count) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": prompt::response_schema(),
                "maxOutputTokens": self.max_output_tokens,
            }
        });

        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body),
            });
        }

        let envelope: Value = response.json().await?;
        let payload =
            extract_text_payload(&envelope).ok_or(GenerationError::MissingPayload)?;

        response::normalize_cards(payload)
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        topic: &str,
        count: u8,
    ) -> Result<Vec<Flashcard>, GenerationError> {
        self.generate_inner(topic, count).await
    }
}

// ---------------------------------------------------------------------------
// LlmClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that is either an active provider backend or disabled.
pub enum LlmClient {
    /// A backend is configured and ready.
    Active(Box<dyn GenerationBackend>),
    /// Generation is disabled (no API key configured).
    Disabled,
}

impl LlmClient {
    /// Build an `LlmClient` from the application config.
    ///
    /// Returns `Active` when an API key is present, otherwise `Disabled`.
    /// A disabled client fails every request through the normal error path,
    /// so the UI needs no special case.
    pub fn from_config(config: &Config) -> Self {
        match &config.credentials.gemini_api_key {
            Some(key) if !key.is_empty() => LlmClient::Active(Box::new(GeminiClient::new(
                key.clone(),
                config.llm.model.clone(),
                config.llm.max_output_tokens,
            ))),
            _ => LlmClient::Disabled,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LlmClient::Active(_))
    }

    /// Run one generation round trip and report the outcome over `tx`.
    ///
    /// Exactly one event is sent: `DeckReady` on success, `Failed` with the
    /// user-safe message otherwise. The cause of a failure is logged here
    /// and goes no further.
    pub async fn generate_deck(
        &self,
        request: GenerationRequest,
        tx: mpsc::Sender<LlmEvent>,
        generation: u64,
    ) {
        let result = match self {
            LlmClient::Active(backend) => {
                backend.generate(&request.topic, request.count).await
            }
            LlmClient::Disabled => Err(GenerationError::NotConfigured),
        };

        let event = match result {
            Ok(cards) => {
                info!(
                    "generated {} cards for \"{}\" (requested {}, gen: {})",
                    cards.len(),
                    request.topic,
                    request.count,
                    generation
                );
                LlmEvent::DeckReady { cards, generation }
            }
            Err(err) => {
                warn!("flashcard generation failed: {err}");
                LlmEvent::Failed {
                    message: err.user_message().to_string(),
                    generation,
                }
            }
        };

        let _ = tx.send(event).await;
    }
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

/// Extract the generated text from a `generateContent` response envelope.
///
/// Expected shape: `{ "candidates": [{ "content": { "parts": [{ "text": "..." }] } }] }`
pub(crate) fn extract_text_payload(envelope: &Value) -> Option<&str> {
    envelope
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

fn truncate_for_log(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < ERROR_BODY_LIMIT)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &body[..cut])
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialsConfig;
    use crate::llm::GENERATION_FAILED_MESSAGE;

    // -- Envelope parsing tests --

    #[test]
    fn extract_text_payload_from_full_envelope() {
        let envelope = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "[{\"term\":\"a\",\"definition\":\"b\"}]" }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 40 }
        });
        let payload = extract_text_payload(&envelope).unwrap();
        assert!(payload.starts_with('['));
    }

    #[test]
    fn extract_text_payload_missing_candidates() {
        let envelope = serde_json::json!({ "usageMetadata": {} });
        assert!(extract_text_payload(&envelope).is_none());
    }

    #[test]
    fn extract_text_payload_empty_parts() {
        let envelope = serde_json::json!({
            "candidates": [{ "content": { "parts": [] } }]
        });
        assert!(extract_text_payload(&envelope).is_none());
    }

    #[test]
    fn truncate_for_log_short_body_untouched() {
        assert_eq!(truncate_for_log("oops"), "oops");
    }

    #[test]
    fn truncate_for_log_long_body_cut() {
        let long = "x".repeat(1000);
        let cut = truncate_for_log(&long);
        assert!(cut.len() < long.len());
        assert!(cut.ends_with("..."));
    }

    // -- LlmClient::Disabled path --

    #[tokio::test]
    async fn disabled_client_sends_failed_event() {
        let client = LlmClient::Disabled;
        let (tx, mut rx) = mpsc::channel(8);
        let request = GenerationRequest::new("Baroque Art", 5).unwrap();

        client.generate_deck(request, tx, 1).await;

        let event = rx.recv().await.expect("should receive an event");
        assert_eq!(
            event,
            LlmEvent::Failed {
                message: GENERATION_FAILED_MESSAGE.to_string(),
                generation: 1,
            }
        );
        assert!(rx.try_recv().is_err());
    }

    // -- GeminiClient with empty API key --

    #[tokio::test]
    async fn empty_api_key_is_not_configured() {
        let client = GeminiClient::new(String::new(), "model".to_string(), 4096);
        let err = client.generate("Rust", 5).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured));
    }

    // -- LlmClient::from_config --

    fn config_with_key(key: Option<&str>) -> Config {
        let mut config = Config::default();
        config.credentials = CredentialsConfig {
            gemini_api_key: key.map(String::from),
        };
        config
    }

    #[test]
    fn from_config_with_api_key_returns_active() {
        let client = LlmClient::from_config(&config_with_key(Some("test-key")));
        assert!(client.is_active());
    }

    #[test]
    fn from_config_without_api_key_returns_disabled() {
        let client = LlmClient::from_config(&config_with_key(None));
        assert!(!client.is_active());
    }

    #[test]
    fn from_config_with_empty_api_key_returns_disabled() {
        let client = LlmClient::from_config(&config_with_key(Some("")));
        assert!(!client.is_active());
    }

    // -- Mock HTTP server tests --

    /// Serve one HTTP response on a local listener and return its address.
    async fn spawn_mock_server(status_line: &'static str, body: String) -> std::net::SocketAddr {
        use tokio::io::AsyncWriteExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Read the request (discard it).
            let mut buf = vec![0u8; 8192];
            let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut buf).await;

            let response = format!(
                "{status_line}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len(),
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();

            // Keep the connection alive briefly so the client reads it all.
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        });

        addr
    }

    fn envelope_with_text(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    fn mock_client(addr: std::net::SocketAddr) -> GeminiClient {
        GeminiClient::new("test-key".to_string(), "test-model".to_string(), 4096)
            .with_base_url(format!("http://{addr}"))
    }

    #[tokio::test]
    async fn mock_server_valid_payload_yields_cards() {
        let payload = r#"[
            {"term": "Borrowing", "definition": "Temporary access without ownership."},
            {"term": "Lifetime", "definition": "How long a reference is valid."}
        ]"#;
        let addr = spawn_mock_server("HTTP/1.1 200 OK", envelope_with_text(payload)).await;

        let cards = mock_client(addr).generate("Rust", 2).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].term, "Borrowing");
        assert_ne!(cards[0].id, cards[1].id);
    }

    #[tokio::test]
    async fn mock_server_auth_failure_maps_to_status_error() {
        let body = r#"{"error":{"code":401,"message":"API key not valid","status":"UNAUTHENTICATED"}}"#;
        let addr = spawn_mock_server("HTTP/1.1 401 Unauthorized", body.to_string()).await;

        let err = mock_client(addr).generate("Rust", 3).await.unwrap_err();
        match err {
            GenerationError::Status { status, ref body } => {
                assert_eq!(status, 401);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("expected Status error, got: {other:?}"),
        }
        // Whatever the cause, the user sees only the canonical message.
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn mock_server_non_json_payload_maps_to_parse_error() {
        let addr = spawn_mock_server(
            "HTTP/1.1 200 OK",
            envelope_with_text("Sure! Here are your flashcards:"),
        )
        .await;

        let err = mock_client(addr).generate("Rust", 3).await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse { .. }));
    }

    #[tokio::test]
    async fn mock_server_envelope_without_text_is_missing_payload() {
        let body = serde_json::json!({ "candidates": [] }).to_string();
        let addr = spawn_mock_server("HTTP/1.1 200 OK", body).await;

        let err = mock_client(addr).generate("Rust", 3).await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingPayload));
    }

    #[tokio::test]
    async fn generate_deck_through_active_backend() {
        let payload = r#"[{"term": "Ownership", "definition": "Every value has one owner."}]"#;
        let addr = spawn_mock_server("HTTP/1.1 200 OK", envelope_with_text(payload)).await;

        let client = LlmClient::Active(Box::new(mock_client(addr)));
        let (tx, mut rx) = mpsc::channel(8);
        let request = GenerationRequest::new("Rust", 1).unwrap();

        client.generate_deck(request, tx, 7).await;

        match rx.recv().await.expect("should receive an event") {
            LlmEvent::DeckReady { cards, generation } => {
                assert_eq!(generation, 7);
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].term, "Ownership");
            }
            other => panic!("expected DeckReady, got: {other:?}"),
        }
    }
}
