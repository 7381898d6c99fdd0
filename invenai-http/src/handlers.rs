use axum::Json;
use axum::extract::{Path, Query, State};
use invenai_core::{AsyncItemCollection, InventoryItem, InventoryStats, ItemId, Recognition};
use tracing::{error, info, instrument, warn};

use crate::error::{ApiError, DELETE_FAILED, FETCH_FAILED, ITEM_NOT_FOUND, SAVE_FAILED};
use crate::state::AppState;
use crate::wire::{
    AutocompleteQuery, ChatRequest, ChatResponse, DeleteRequest, DescriptionRequest,
    DescriptionResponse, MessageResponse, RecognizeRequest, SuggestionsResponse, required,
};

pub const SAVED: &str = "Inventory items processed successfully";

pub async fn healthz() -> &'static str {
    "ok"
}

#[instrument(skip_all)]
pub async fn list_items<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let items = state.collection.list_all().await.map_err(|e| {
        error!(error = %e, "list failed");
        ApiError::Internal(FETCH_FAILED)
    })?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_item<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<Json<InventoryItem>, ApiError> {
    let item = state
        .collection
        .get_one(&ItemId::new(id))
        .await
        .map_err(|e| {
            error!(error = %e, "get failed");
            ApiError::Internal(FETCH_FAILED)
        })?;
    item.map(Json).ok_or(ApiError::NotFound(ITEM_NOT_FOUND))
}

/// Bulk upsert: each item replaces the stored record with its id, or creates it.
#[instrument(skip_all, fields(count = items.len()))]
pub async fn upsert_items<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
    Json(items): Json<Vec<InventoryItem>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.collection.upsert_many(&items).await.map_err(|e| {
        error!(error = %e, "bulk upsert failed");
        ApiError::Internal(SAVE_FAILED)
    })?;
    info!("upserted items");
    Ok(Json(MessageResponse {
        message: SAVED.to_string(),
        outcome: None,
    }))
}

#[instrument(skip_all, fields(id = %request.id))]
pub async fn delete_item<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let outcome = state.collection.delete_one(&request.id).await.map_err(|e| {
        error!(error = %e, "delete failed");
        ApiError::Internal(DELETE_FAILED)
    })?;
    info!(?outcome, "delete handled");
    Ok(Json(MessageResponse {
        message: outcome.message().to_string(),
        outcome: Some(outcome),
    }))
}

pub async fn stats<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
) -> Result<Json<InventoryStats>, ApiError> {
    let items = state.collection.list_all().await.map_err(|e| {
        error!(error = %e, "list for stats failed");
        ApiError::Internal(FETCH_FAILED)
    })?;
    Ok(Json(InventoryStats::from_items(&items)))
}

#[instrument(skip(state))]
pub async fn autocomplete<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
    Query(params): Query<AutocompleteQuery>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let query = required(params.query).ok_or(ApiError::BadRequest("Query is required"))?;
    let suggestions = state.assistant()?.suggest(&query).await.map_err(|e| {
        error!(error = %e, "suggestion lookup failed");
        ApiError::Internal("Error fetching autocomplete suggestions")
    })?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

#[instrument(skip(state))]
pub async fn describe<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
    Json(request): Json<DescriptionRequest>,
) -> Result<Json<DescriptionResponse>, ApiError> {
    let name = required(request.item_name).ok_or(ApiError::BadRequest("Item name is required"))?;
    let description = state.assistant()?.describe_text(&name).await.map_err(|e| {
        error!(error = %e, "description lookup failed");
        ApiError::Internal("Error fetching description and category")
    })?;
    Ok(Json(DescriptionResponse { description }))
}

#[instrument(skip_all)]
pub async fn recognize<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
    Json(request): Json<RecognizeRequest>,
) -> Result<Json<Recognition>, ApiError> {
    let image = required(request.image).ok_or(ApiError::BadRequest("Image is required"))?;
    let recognition = state.assistant()?.recognize(&image).await.map_err(|e| {
        error!(error = %e, "image recognition failed");
        ApiError::Internal("Failed to recognize image")
    })?;
    Ok(Json(recognition))
}

/// Answers with the current stored inventory as context.
#[instrument(skip_all)]
pub async fn chatbot<C: AsyncItemCollection>(
    State(state): State<AppState<C>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = required(request.message).ok_or(ApiError::BadRequest("Message is required"))?;
    let assistant = state.assistant()?;
    let inventory = match state.collection.list_all().await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "answering without inventory context");
            Vec::new()
        }
    };
    let reply = assistant.chat(&message, &inventory).await.map_err(|e| {
        error!(error = %e, "chat failed");
        ApiError::Internal("Failed to get a response from the AI.")
    })?;
    Ok(Json(ChatResponse { reply }))
}
