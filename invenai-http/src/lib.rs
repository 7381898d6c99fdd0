//! HTTP surface for InvenAI.
//!
//! The server exposes any [`AsyncItemCollection`] as the remote item
//! collection and proxies the assistant endpoints to an [`AssistClient`].
//! [`RemoteCollection`] is the matching client: it implements the gateway
//! trait against a running server, so the sync operations in `invenai-core`
//! work over the network unchanged.
//!
//! [`AssistClient`]: invenai_openai::AssistClient

mod error;
mod handlers;
mod remote;
mod state;
pub mod wire;

use std::future::Future;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use invenai_core::AsyncItemCollection;
use tokio::net::TcpListener;
use tracing::info;

pub use error::{ApiError, RemoteError};
pub use handlers::SAVED;
pub use remote::{DEFAULT_SERVER, RemoteAssistant, RemoteCollection};
pub use state::AppState;

/// Request body cap; recognition requests carry whole images.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Builds the application router.
pub fn router<C>(state: AppState<C>) -> Router
where
    C: AsyncItemCollection + 'static,
{
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/api/inventory/items",
            get(handlers::list_items::<C>)
                .post(handlers::upsert_items::<C>)
                .delete(handlers::delete_item::<C>),
        )
        .route("/api/inventory/items/:id", get(handlers::get_item::<C>))
        .route("/api/inventory/stats", get(handlers::stats::<C>))
        .route("/api/autocomplete", get(handlers::autocomplete::<C>))
        .route("/api/get-description", post(handlers::describe::<C>))
        .route("/api/recognize", post(handlers::recognize::<C>))
        .route("/api/chatbot", post(handlers::chatbot::<C>))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Serves the router on an already bound listener until `shutdown` resolves.
pub async fn serve<C, F>(listener: TcpListener, state: AppState<C>, shutdown: F) -> std::io::Result<()>
where
    C: AsyncItemCollection + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
