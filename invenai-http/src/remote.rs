//! HTTP clients for a running InvenAI server.

use invenai_core::producer::parse_description;
use invenai_core::{AsyncItemCollection, DeleteOutcome, Described, InventoryItem, ItemId, Recognition};
use reqwest::{Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::RemoteError;
use crate::wire::{
    ChatRequest, ChatResponse, DeleteRequest, DescriptionRequest, DescriptionResponse,
    MessageResponse, RecognizeRequest, SuggestionsResponse,
};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// Turns a non-2xx response into [`RemoteError::Status`] with the server's `{error}` text.
async fn check(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

/// The server's item collection, used as the sync gateway.
#[derive(Debug, Clone)]
pub struct RemoteCollection {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteCollection {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Shares an existing connection pool.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self) -> String {
        format!("{}/api/inventory/items", self.base_url)
    }

    /// URL of one item, with the id percent-encoded as a single path segment.
    fn item_url(&self, id: &ItemId) -> Result<Url, RemoteError> {
        let mut url =
            Url::parse(&self.items_url()).map_err(|e| RemoteError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.base_url.clone()))?
            .push(id.as_str());
        Ok(url)
    }
}

impl AsyncItemCollection for RemoteCollection {
    type Error = RemoteError;

    #[instrument(skip(self), fields(server = %self.base_url))]
    async fn list_all(&self) -> Result<Vec<InventoryItem>, RemoteError> {
        let response = check(self.http.get(self.items_url()).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_one(&self, id: &ItemId) -> Result<Option<InventoryItem>, RemoteError> {
        let response = self
            .http
            .get(self.item_url(id)?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check(response).await?.json().await?))
    }

    async fn upsert_one(&self, item: &InventoryItem) -> Result<(), RemoteError> {
        self.upsert_many(std::slice::from_ref(item)).await
    }

    async fn remove_one(&self, id: &ItemId) -> Result<bool, RemoteError> {
        Ok(self.delete_one(id).await? == DeleteOutcome::Deleted)
    }

    /// One POST for the whole batch.
    #[instrument(skip_all, fields(server = %self.base_url, count = items.len()))]
    async fn upsert_many(&self, items: &[InventoryItem]) -> Result<(), RemoteError> {
        let response = self.http.post(self.items_url()).json(items).send().await?;
        let body: MessageResponse = check(response).await?.json().await?;
        debug!(message = %body.message, "upsert confirmed");
        Ok(())
    }

    /// The server checks existence before deleting.
    #[instrument(skip(self), fields(server = %self.base_url))]
    async fn delete_one(&self, id: &ItemId) -> Result<DeleteOutcome, RemoteError> {
        let request = DeleteRequest { id: id.clone() };
        let response = self
            .http
            .delete(self.items_url())
            .json(&request)
            .send()
            .await?;
        let body: MessageResponse = check(response).await?.json().await?;
        let outcome = match body.outcome {
            Some(outcome) => outcome,
            None if body.message == DeleteOutcome::NotFound.message() => DeleteOutcome::NotFound,
            None => DeleteOutcome::Deleted,
        };
        Ok(outcome)
    }
}

/// The server's assistant endpoints.
#[derive(Debug, Clone)]
pub struct RemoteAssistant {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteAssistant {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn suggest(&self, query: &str) -> Result<Vec<String>, RemoteError> {
        let response = self
            .http
            .get(format!("{}/api/autocomplete", self.base_url))
            .query(&[("query", query)])
            .send()
            .await?;
        let body: SuggestionsResponse = check(response).await?.json().await?;
        Ok(body.suggestions)
    }

    #[instrument(skip(self))]
    pub async fn describe(&self, item_name: &str) -> Result<Described, RemoteError> {
        let request = DescriptionRequest {
            item_name: Some(item_name.to_string()),
        };
        let response = self
            .http
            .post(format!("{}/api/get-description", self.base_url))
            .json(&request)
            .send()
            .await?;
        let body: DescriptionResponse = check(response).await?.json().await?;
        Ok(parse_description(&body.description))
    }

    /// `image` is a `data:` URL or bare base64.
    #[instrument(skip_all)]
    pub async fn recognize(&self, image: String) -> Result<Recognition, RemoteError> {
        let request = RecognizeRequest { image: Some(image) };
        let response = self
            .http
            .post(format!("{}/api/recognize", self.base_url))
            .json(&request)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    #[instrument(skip(self))]
    pub async fn chat(&self, message: &str) -> Result<String, RemoteError> {
        let request = ChatRequest {
            message: Some(message.to_string()),
        };
        let response = self
            .http
            .post(format!("{}/api/chatbot", self.base_url))
            .json(&request)
            .send()
            .await?;
        let body: ChatResponse = check(response).await?.json().await?;
        Ok(body.reply)
    }
}
