use invenai_core::producer::{parse_description, parse_recognition, parse_suggestions};
use invenai_core::{Described, InventoryItem, Recognition};
use tracing::{debug, instrument};

use crate::convert::{build_request_body, error_message, normalize_image, parse_response};
use crate::error::AssistError;
use crate::prompt;
use crate::types::{Completion, CompletionRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const FALLBACK_REPLY: &str = "I'm not sure how to help with that.";

/// Client for an OpenAI-compatible chat-completions API.
pub struct AssistClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AssistClient {
    /// Creates a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Executes a completion request.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AssistError> {
        let body = build_request_body(request);

        debug!("Sending completion request");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_body: serde_json::Value = response.json().await?;

        if !status.is_success() {
            return Err(AssistError::Api {
                status: status.as_u16(),
                message: error_message(&response_body),
            });
        }

        let completion = parse_response(&response_body)?;
        debug!(finish_reason = ?completion.finish_reason, "Received completion");
        Ok(completion)
    }

    /// Item names related to a free-text query.
    #[instrument(skip(self))]
    pub async fn suggest(&self, query: &str) -> Result<Vec<String>, AssistError> {
        let completion = self.complete(&prompt::suggestions(&self.model, query)).await?;
        Ok(parse_suggestions(&completion.text))
    }

    /// Raw "Description: ... Category: ..." text for an item name.
    #[instrument(skip(self))]
    pub async fn describe_text(&self, item_name: &str) -> Result<String, AssistError> {
        let completion = self
            .complete(&prompt::description(&self.model, item_name))
            .await?;
        Ok(completion.text)
    }

    /// Parsed description and category for an item name.
    pub async fn describe(&self, item_name: &str) -> Result<Described, AssistError> {
        Ok(parse_description(&self.describe_text(item_name).await?))
    }

    /// Recognizes the item in an image given as a `data:` URL or bare base64.
    ///
    /// Missing fields in the answer are filled with defaults.
    #[instrument(skip(self, image), fields(image_len = image.len()))]
    pub async fn recognize(&self, image: &str) -> Result<Recognition, AssistError> {
        let request = prompt::recognition(&self.model, &normalize_image(image));
        let completion = self.complete(&request).await?;
        Ok(parse_recognition(&completion.text).normalized())
    }

    /// Answers a question about the given inventory.
    #[instrument(skip(self, inventory), fields(items = inventory.len()))]
    pub async fn chat(
        &self,
        message: &str,
        inventory: &[InventoryItem],
    ) -> Result<String, AssistError> {
        let completion = self
            .complete(&prompt::chat(&self.model, message, inventory))
            .await?;
        if completion.text.is_empty() {
            return Ok(FALLBACK_REPLY.to_string());
        }
        Ok(completion.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    #[test]
    fn test_client_creation() {
        let client = AssistClient::new("test-key");
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_client_custom_base_url() {
        let client =
            AssistClient::with_base_url("test-key", "https://custom.api.com/v1/").with_model("m");
        assert_eq!(client.base_url, "https://custom.api.com/v1");
        assert_eq!(client.model(), "m");
    }

    /// Serves a fixed chat-completions reply and returns the base URL.
    async fn mock_upstream(content: Value, status: u16) -> String {
        let app = Router::new().route(
            "/chat/completions",
            post(move |Json(_body): Json<Value>| {
                let content = content.clone();
                async move {
                    let status = axum::http::StatusCode::from_u16(status).unwrap();
                    if status.is_success() {
                        (status, Json(json!({ "choices": [{ "message": { "content": content } }] })))
                    } else {
                        (status, Json(json!({ "error": { "message": content } })))
                    }
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_suggest_parses_list() {
        let base = mock_upstream(json!("Stapler, Paper clips, Tape"), 200).await;
        let client = AssistClient::with_base_url("k", base);

        let suggestions = client.suggest("office").await.unwrap();
        assert_eq!(suggestions, ["Stapler", "Paper clips", "Tape"]);
    }

    #[tokio::test]
    async fn test_describe_parses_labels() {
        let base = mock_upstream(json!("Description: A desk lamp.\nCategory: Lighting"), 200).await;
        let client = AssistClient::with_base_url("k", base);

        let described = client.describe("Lamp").await.unwrap();
        assert_eq!(described.description, "A desk lamp");
        assert_eq!(described.category, "Lighting");
    }

    #[tokio::test]
    async fn test_recognize_fills_defaults() {
        let base = mock_upstream(json!("```json\n{\"name\": \"Mug\"}\n```"), 200).await;
        let client = AssistClient::with_base_url("k", base);

        let recognition = client.recognize("AAAA").await.unwrap();
        assert_eq!(recognition.name.as_deref(), Some("Mug"));
        assert_eq!(
            recognition.description.as_deref(),
            Some("No description available")
        );
        assert_eq!(recognition.category.as_deref(), Some("Uncategorized"));
    }

    #[tokio::test]
    async fn test_chat_falls_back_on_empty_reply() {
        let base = mock_upstream(Value::Null, 200).await;
        let client = AssistClient::with_base_url("k", base);

        assert_eq!(client.chat("hi", &[]).await.unwrap(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let base = mock_upstream(json!("invalid api key"), 401).await;
        let client = AssistClient::with_base_url("bad", base);

        match client.suggest("x").await {
            Err(AssistError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("Expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    #[ignore = "requires OPENAI_API_KEY env var"]
    async fn test_live_api() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let client = AssistClient::new(api_key);

        let suggestions = client.suggest("office supplies").await.unwrap();
        assert!(!suggestions.is_empty());
    }
}
