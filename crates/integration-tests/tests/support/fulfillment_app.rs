#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use fulfillment_runtime::http::{AppState, build_router};
use serde_json::{Value, json};
use shared::config::QueryServiceConfig;
use shared::dimensions::DimensionRegistry;
use shared::query_engine::HttpQueryEngine;
use shared::top_intent::{QueryBackend, TopIntentHandler};
use tower::ServiceExt;

pub const TEST_DATABASE: &str = "tickit_it";

pub fn build_test_router(endpoint_url: &str) -> axum::Router {
    let engine = HttpQueryEngine::new(QueryServiceConfig {
        endpoint_url: endpoint_url.to_string(),
        database: TEST_DATABASE.to_string(),
        api_key: None,
        timeout_ms: 2_000,
    })
    .expect("query engine should build");

    build_router_with_backend(QueryBackend::Ready(Arc::new(engine)))
}

pub fn build_router_with_backend(backend: QueryBackend) -> axum::Router {
    build_router(AppState {
        handler: Arc::new(TopIntentHandler::new(DimensionRegistry::standard(), backend)),
    })
}

pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl JsonResponse {
    pub fn content(&self) -> &str {
        self.body["dialogAction"]["message"]["content"]
            .as_str()
            .unwrap_or_default()
    }

    pub fn fulfillment_state(&self) -> &str {
        self.body["dialogAction"]["fulfillmentState"]
            .as_str()
            .unwrap_or_default()
    }

    pub fn session_attributes(&self) -> Value {
        self.body["sessionAttributes"].clone()
    }

    pub fn remembered_slots(&self) -> Value {
        self.body["sessionAttributes"]["slot_values"]
            .as_str()
            .map(|raw| serde_json::from_str(raw).expect("slot snapshot should be json"))
            .unwrap_or(Value::Null)
    }
}

pub async fn send_json(app: &axum::Router, request: Request<Body>) -> JsonResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should read");
    let body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| json!({}));

    JsonResponse { status, body }
}

pub fn fulfillment_request(slots: Value, session_attributes: Option<Value>) -> Request<Body> {
    intent_request("Top_Intent", slots, session_attributes)
}

pub fn intent_request(
    intent_name: &str,
    slots: Value,
    session_attributes: Option<Value>,
) -> Request<Body> {
    let mut event = json!({
        "messageVersion": "1.0",
        "invocationSource": "FulfillmentCodeHook",
        "userId": "integration-user",
        "currentIntent": { "name": intent_name, "slots": slots },
    });
    if let Some(attributes) = session_attributes {
        event["sessionAttributes"] = attributes;
    }

    Request::builder()
        .method(Method::POST)
        .uri("/v1/fulfillment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .expect("request should build")
}

pub async fn fulfill(
    app: &axum::Router,
    slots: Value,
    session_attributes: Option<Value>,
) -> JsonResponse {
    send_json(app, fulfillment_request(slots, session_attributes)).await
}
