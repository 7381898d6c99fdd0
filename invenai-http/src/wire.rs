//! JSON bodies shared by the server handlers and the HTTP clients.

use invenai_core::{DeleteOutcome, ItemId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: ItemId,
}

/// Confirmation body. Deletes also report the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DeleteOutcome>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRequest {
    #[serde(default)]
    pub item_name: Option<String>,
}

/// Raw assistant text containing `Description:` and `Category:` labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionResponse {
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognizeRequest {
    /// `data:` URL or bare base64 PNG.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Treats absent and blank fields alike.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
