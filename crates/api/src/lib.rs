//! HTTP surface for the order fulfillment pipeline.
//!
//! Exposes the saga trigger plus thin inventory and payment endpoints,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use statestore::{InMemoryStateStore, StateStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: StateStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/healthz", get(routes::health::check))
        .route(
            "/api/v1/inventory",
            get(routes::inventory::list::<S>).delete(routes::inventory::clear::<S>),
        )
        .route(
            "/api/v1/inventory/restock",
            post(routes::inventory::restock::<S>),
        )
        .route(
            "/api/v1/inventory/reserve",
            post(routes::inventory::reserve::<S>),
        )
        .route("/api/v1/payments", post(routes::payments::charge::<S>))
        .route(
            "/api/v1/payments/{id}/refunds",
            post(routes::payments::refund::<S>),
        )
        .route("/api/v1/orders", post(routes::orders::submit::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over in-memory infrastructure
/// and the simulated payment gateway.
pub fn create_default_state(
    config: &Config,
) -> (Arc<AppState<InMemoryStateStore>>, InMemoryStateStore) {
    use saga::{
        InMemoryPublisher, InventoryService, PaymentConfig, PaymentService, SagaCoordinator,
        SimulatedGateway,
    };

    let store = InMemoryStateStore::new(&config.statestore_name);
    let gateway = SimulatedGateway::new();
    let publisher = InMemoryPublisher::new();

    let inventory = InventoryService::new(store.clone(), config.catalog.clone());
    let payments = PaymentService::new(
        gateway.clone(),
        PaymentConfig::new(&config.payment_source_token, &config.payment_currency),
    );
    let coordinator = SagaCoordinator::new(
        inventory.clone(),
        payments.clone(),
        publisher,
        &config.topic,
    );

    let state = Arc::new(AppState {
        coordinator,
        inventory,
        payments,
    });

    (state, store)
}
