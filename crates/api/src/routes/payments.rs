//! Payment endpoints under /api/v1/payments.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::Order;
use saga::ChargeOutcome;
use serde::Serialize;
use statestore::StateStore;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Serialize)]
pub struct ChargeResponse {
    pub id: OrderId,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct RefundResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /api/v1/payments: charge an order total once.
///
/// Each request is one logical charge attempt with a fresh idempotency
/// key; saga-driven retries of a single attempt go through the
/// coordinator, which holds the key stable.
#[tracing::instrument(skip(state, payload))]
pub async fn charge<S: StateStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Order>, JsonRejection>,
) -> Result<(StatusCode, Json<ChargeResponse>), ApiError> {
    let Json(order) = payload?;
    order.validate().map_err(saga::SagaError::InvalidOrder)?;

    match state.payments.charge(&order, Uuid::new_v4()).await? {
        ChargeOutcome::Accepted { .. } => Ok((
            StatusCode::CREATED,
            Json(ChargeResponse {
                id: order.id,
                success: true,
                message: "Payment processed successfully".to_string(),
            }),
        )),
        ChargeOutcome::Declined { reason } => Ok((
            StatusCode::OK,
            Json(ChargeResponse {
                id: order.id,
                success: false,
                message: reason,
            }),
        )),
    }
}

/// POST /api/v1/payments/{id}/refunds: best-effort reversal.
#[tracing::instrument(skip(state, payload))]
pub async fn refund<S: StateStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(payment_id): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<RefundResponse>, ApiError> {
    let Json(_body) = payload?;
    state.payments.refund(&payment_id).await?;
    Ok(Json(RefundResponse {
        status: "success",
        message: "Refund processed successfully",
    }))
}
