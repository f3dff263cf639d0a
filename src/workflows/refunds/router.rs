use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{CustomerRecord, PurchaseRecord, RefundReason};
use super::evaluation::{RefundEngine, RefundError};

/// Router builder exposing the refund evaluation endpoint.
pub fn refund_router(engine: Arc<RefundEngine>) -> Router {
    Router::new()
        .route("/api/v1/refunds/evaluate", post(evaluate_handler))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRefundRequest {
    pub purchase: PurchaseRecord,
    pub customer: CustomerRecord,
    /// Loose upstream reason code; unrecognized values fall back to the
    /// conservative default rate.
    pub reason: String,
    /// Evaluation instant, defaulting to the server clock.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

pub(crate) async fn evaluate_handler(
    State(engine): State<Arc<RefundEngine>>,
    Json(request): Json<EvaluateRefundRequest>,
) -> Response {
    let now = request.now.unwrap_or_else(Utc::now);

    let result = match RefundReason::from_code(&request.reason) {
        Some(reason) => engine.evaluate(&request.purchase, &request.customer, reason, now),
        None => {
            warn!(
                code = %request.reason,
                purchase = %request.purchase.id.0,
                "unrecognized refund reason code, applying fallback base rate"
            );
            engine.evaluate_unrecognized(&request.purchase, &request.customer, now)
        }
    };

    match result {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(error @ RefundError::InvalidPurchase { .. }) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}
