//! Inventory endpoints under /api/v1/inventory.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use common::OrderId;
use saga::{InventoryItem, ReservationResult};
use serde::{Deserialize, Serialize};
use statestore::StateStore;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Deserialize)]
pub struct ReserveRequest {
    pub item: String,
    pub id: OrderId,
}

#[derive(Serialize)]
pub struct AckResponse {
    pub message: &'static str,
}

/// GET /api/v1/inventory: list stocked catalog items.
#[tracing::instrument(skip(state))]
pub async fn list<S: StateStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let items = state.inventory.list().await?;
    Ok(Json(items))
}

/// POST /api/v1/inventory/restock: reset every item to the default quantity.
#[tracing::instrument(skip(state))]
pub async fn restock<S: StateStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<AckResponse>, ApiError> {
    state.inventory.restock().await?;
    Ok(Json(AckResponse {
        message: "Inventory has been restocked.",
    }))
}

/// DELETE /api/v1/inventory: remove every item entry.
#[tracing::instrument(skip(state))]
pub async fn clear<S: StateStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<AckResponse>, ApiError> {
    state.inventory.clear().await?;
    Ok(Json(AckResponse {
        message: "Inventory has been cleared.",
    }))
}

/// POST /api/v1/inventory/reserve: capacity check for one item.
///
/// Business rejections (not found, out of stock) come back as a 200
/// with `success: false`; only transport faults are error responses.
#[tracing::instrument(skip(state, payload))]
pub async fn reserve<S: StateStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<ReserveRequest>, JsonRejection>,
) -> Result<Json<ReservationResult>, ApiError> {
    let Json(req) = payload?;
    let result = state.inventory.reserve(&req.item, &req.id).await?;
    Ok(Json(result))
}
