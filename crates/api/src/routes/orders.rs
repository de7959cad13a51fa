//! Order submission endpoint: the saga trigger.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use domain::OrderOutcome;
use statestore::StateStore;

use crate::error::ApiError;
use crate::routes::AppState;

/// POST /api/v1/orders: run the fulfillment saga for one order.
///
/// Terminal business outcomes (fulfilled, out of stock, declined) are
/// 200 responses carrying the outcome. A retryable gateway outage is
/// reported as 502 with the same outcome body, so an outer retry layer
/// can resubmit safely.
#[tracing::instrument(skip(state, payload))]
pub async fn submit<S: StateStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<domain::Order>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderOutcome>), ApiError> {
    let Json(order) = payload?;

    let outcome = state.coordinator.submit(order).await?;
    let status = if outcome.is_retryable() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };

    Ok((status, Json(outcome)))
}
