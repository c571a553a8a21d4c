#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

/// What the mock query service answers for one request.
#[derive(Debug, Clone)]
pub enum ScriptedAnswer {
    Rows(&'static str, Vec<&'static str>),
    Status(StatusCode),
}

#[derive(Clone, Default)]
struct MockState {
    answers: Arc<Mutex<VecDeque<ScriptedAnswer>>>,
    seen_queries: Arc<Mutex<Vec<String>>>,
    seen_databases: Arc<Mutex<Vec<String>>>,
}

pub struct MockQueryService {
    pub endpoint_url: String,
    state: MockState,
    handle: tokio::task::JoinHandle<()>,
}

impl MockQueryService {
    pub async fn start(answers: Vec<ScriptedAnswer>) -> Self {
        let state = MockState {
            answers: Arc::new(Mutex::new(VecDeque::from(answers))),
            ..MockState::default()
        };
        let app = Router::new()
            .route("/query", post(answer_query))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock query service listener should bind");
        let bind_addr = listener
            .local_addr()
            .expect("mock query service local address should exist");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock query service should run");
        });

        Self {
            endpoint_url: format!("http://{bind_addr}/query"),
            state,
            handle,
        }
    }

    pub async fn seen_queries(&self) -> Vec<String> {
        self.state.seen_queries.lock().await.clone()
    }

    pub async fn seen_databases(&self) -> Vec<String> {
        self.state.seen_databases.lock().await.clone()
    }
}

impl Drop for MockQueryService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn answer_query(
    State(state): State<MockState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(query) = payload["QueryString"].as_str() {
        state.seen_queries.lock().await.push(query.to_string());
    }
    if let Some(database) = payload["Database"].as_str() {
        state.seen_databases.lock().await.push(database.to_string());
    }

    match state.answers.lock().await.pop_front() {
        Some(ScriptedAnswer::Rows(header, values)) => {
            let rows = std::iter::once(header)
                .chain(values)
                .map(|value| json!({ "Data": [{ "VarCharValue": value }, { "VarCharValue": "100.00" }] }))
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "ResultSet": { "Rows": rows } })))
        }
        Some(ScriptedAnswer::Status(status)) => (status, Json(json!({ "error": "scripted" }))),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "exhausted_scripted_answers" })),
        ),
    }
}
