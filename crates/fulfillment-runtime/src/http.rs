use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use shared::models::{FulfillmentResponse, IntentEvent};
use shared::top_intent::TopIntentHandler;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<TopIntentHandler>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    query_backend: &'static str,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/fulfillment", post(fulfill))
        .with_state(app_state)
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        query_backend: state.handler.backend().status(),
    })
}

async fn fulfill(
    State(state): State<AppState>,
    Json(event): Json<IntentEvent>,
) -> Json<FulfillmentResponse> {
    Json(state.handler.handle(event).await)
}
