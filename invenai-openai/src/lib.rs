//! Inventory assistant backed by an OpenAI-compatible chat-completions API.
//!
//! The assistant feeds the item producers in `invenai-core`: autocomplete
//! suggestions, description lookup and image recognition. It also answers
//! free-form questions about the current inventory.
//!
//! # Example
//!
//! ```ignore
//! use invenai_core::ItemDraft;
//! use invenai_openai::AssistClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AssistClient::new("your-api-key");
//!
//!     let suggestions = client.suggest("office").await.unwrap();
//!     let draft = ItemDraft::from_suggestion(&suggestions[0]);
//!
//!     let recognized = client.recognize("data:image/png;base64,...").await.unwrap();
//!     let draft = ItemDraft::from_recognition(recognized);
//! }
//! ```

mod client;
mod convert;
mod error;
pub mod prompt;
mod types;

pub use client::{AssistClient, DEFAULT_BASE_URL, DEFAULT_MODEL, FALLBACK_REPLY};
pub use convert::{build_request_body, image_data_url, media_type_for, normalize_image, parse_response};
pub use error::AssistError;
pub use types::{ChatMessage, Completion, CompletionRequest, ContentPart, Role, TokenUsage};
