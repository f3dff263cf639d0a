use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;

use retention_ai::workflows::refunds::{refund_router, RefundEngine};
use tower::ServiceExt;

fn build_router() -> axum::Router {
    refund_router(Arc::new(RefundEngine::default()))
}

fn evaluate_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/refunds/evaluate")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&payload).expect("serialize payload"),
        ))
        .expect("request")
}

fn purchase_payload(total_units: u64, consumed_units: u64) -> Value {
    json!({
        "id": "ord-api-001",
        "total_units": total_units,
        "consumed_units": consumed_units,
        "price_paid": 79.99,
        "purchased_at": "2025-06-01T10:00:00Z",
    })
}

#[tokio::test]
async fn evaluate_returns_a_full_decision() {
    let router = build_router();
    let response = router
        .oneshot(evaluate_request(json!({
            "purchase": purchase_payload(50_000, 2_500),
            "customer": { "id": "cust-api", "lifetime_value": 150.0 },
            "reason": "unused",
            "now": "2025-06-01T12:00:00Z",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");

    assert_eq!(payload["approved"], json!(true));
    assert!((payload["final_rate"].as_f64().expect("rate") - 0.75).abs() < 1e-9);
    assert_eq!(payload["refund_amount"], json!(59.99));
    assert_eq!(
        payload["recommendation"],
        json!("partial_refund_or_alternatives")
    );
    assert_eq!(
        payload["adjustments"]
            .as_array()
            .expect("adjustment trail")
            .len(),
        4
    );
}

#[tokio::test]
async fn unknown_reason_code_falls_back_conservatively() {
    let router = build_router();
    let response = router
        .oneshot(evaluate_request(json!({
            "purchase": purchase_payload(50_000, 0),
            "customer": { "id": "cust-api", "lifetime_value": 150.0 },
            "reason": "changed_my_mind",
            "now": "2025-06-01T12:00:00Z",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");

    assert_eq!(payload["reason"], Value::Null);
    assert!((payload["final_rate"].as_f64().expect("rate") - 0.3).abs() < 1e-9);
}

#[tokio::test]
async fn invalid_purchase_data_is_unprocessable() {
    let router = build_router();
    let response = router
        .oneshot(evaluate_request(json!({
            "purchase": purchase_payload(0, 0),
            "customer": { "id": "cust-api", "lifetime_value": 150.0 },
            "reason": "unused",
            "now": "2025-06-01T12:00:00Z",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("total units"));
}

#[tokio::test]
async fn evaluation_instant_defaults_to_the_server_clock() {
    let router = build_router();
    // Purchase stamped in 2025; with the real clock "now", the purchase is
    // long past the seven-day tier, so decay lands at x0.7.
    let response = router
        .oneshot(evaluate_request(json!({
            "purchase": purchase_payload(50_000, 0),
            "customer": { "id": "cust-api", "lifetime_value": 150.0 },
            "reason": "quality_issue",
        })))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");
    assert!((payload["final_rate"].as_f64().expect("rate") - 0.35).abs() < 1e-9);
}
