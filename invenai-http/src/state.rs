use std::sync::Arc;

use invenai_openai::AssistClient;

use crate::error::ApiError;

/// Shared handles passed to every request handler.
///
/// Built once at startup; cloning only bumps reference counts.
pub struct AppState<C> {
    pub collection: Arc<C>,
    pub assistant: Option<Arc<AssistClient>>,
}

impl<C> AppState<C> {
    pub fn new(collection: C) -> Self {
        Self {
            collection: Arc::new(collection),
            assistant: None,
        }
    }

    pub fn with_assistant(mut self, assistant: AssistClient) -> Self {
        self.assistant = Some(Arc::new(assistant));
        self
    }

    /// The configured assistant, or 503 when the server runs without one.
    pub fn assistant(&self) -> Result<&AssistClient, ApiError> {
        self.assistant.as_deref().ok_or(ApiError::Unconfigured)
    }
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
            assistant: self.assistant.clone(),
        }
    }
}
