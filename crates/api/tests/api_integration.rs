//! HTTP-level integration tests over the in-memory pipeline.

use api::{Config, create_app, create_default_state};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use saga::TEST_SOURCE_DECLINE;
use tower::ServiceExt;

fn app_with(config: Config) -> Router {
    let (state, _store) = create_default_state(&config);
    // A detached recorder handle; nothing is installed globally.
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .build_recorder()
        .handle();
    create_app(state, handle)
}

fn app() -> Router {
    app_with(Config::default())
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn apple_order() -> serde_json::Value {
    serde_json::json!({
        "id": "o1",
        "customer": "c1",
        "items": [{"item": "apple", "quantity": 1}],
        "total": {"amount": 500, "currency": "USD"}
    })
}

#[tokio::test]
async fn health_reports_service_identity() {
    let response = app().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "order-processor");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn healthz_is_an_alias() {
    let response = app().oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn restock_list_clear_lifecycle() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/inventory/restock", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_request("/api/v1/inventory")).await.unwrap();
    let body = body_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|i| i["quantity"] == 100));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/inventory")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/api/v1/inventory")).await.unwrap();
    let body = body_json(response).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reserve_requires_json_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/inventory/reserve")
        .body(Body::from("not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn reserve_rejects_missing_fields() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/inventory/reserve",
            serde_json::json!({"item": "apple"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reserve_reports_business_rejection_in_body() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/inventory/reserve",
            serde_json::json!({"item": "apple", "id": "o1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], "o1");
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn order_submission_fulfills_stocked_order() {
    let app = app();
    app.clone()
        .oneshot(json_request("POST", "/api/v1/inventory/restock", serde_json::json!({})))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("POST", "/api/v1/orders", apple_order()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["order_id"], "o1");
    assert_eq!(body["success"], true);
    assert_eq!(body["stage"], "notified");
}

#[tokio::test]
async fn order_submission_fails_at_reservation_when_unstocked() {
    let response = app()
        .oneshot(json_request("POST", "/api/v1/orders", apple_order()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["stage"], "reservation");
}

#[tokio::test]
async fn order_submission_reports_decline() {
    let app = app_with(Config {
        payment_source_token: TEST_SOURCE_DECLINE.to_string(),
        ..Config::default()
    });
    app.clone()
        .oneshot(json_request("POST", "/api/v1/inventory/restock", serde_json::json!({})))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("POST", "/api/v1/orders", apple_order()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["stage"], "payment");
    assert_eq!(body["reason"], "declined");
}

#[tokio::test]
async fn empty_order_is_rejected_with_structured_error() {
    let order = serde_json::json!({
        "id": "o1",
        "customer": "c1",
        "items": [],
        "total": {"amount": 0, "currency": "USD"}
    });

    let response = app()
        .oneshot(json_request("POST", "/api/v1/orders", order))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("no line items"));
}

#[tokio::test]
async fn charge_endpoint_accepts_valid_order() {
    let response = app()
        .oneshot(json_request("POST", "/api/v1/payments", apple_order()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["id"], "o1");
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn refund_endpoint_acknowledges() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments/PAY-0001/refunds",
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let response = app().oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
