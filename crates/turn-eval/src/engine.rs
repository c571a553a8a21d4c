use std::sync::{Arc, Mutex, PoisonError};

use shared::dimensions::DimensionRegistry;
use shared::models::{FulfillmentResponse, IntentEvent};
use shared::query_engine::{QueryEngine, QueryEngineError, QueryEngineFuture, ResultSet};
use shared::top_intent::{QueryBackend, TopIntentHandler};
use thiserror::Error;

use crate::case::{ConversationFixture, ExpectedQuery, TurnFixture};
use crate::cli::CliOptions;
use crate::fixture_io::{FixtureIoError, default_fixture_root, load_conversations};

#[derive(Debug)]
pub struct EvalSummary {
    results: Vec<CaseResult>,
}

impl EvalSummary {
    pub fn has_failures(&self) -> bool {
        self.results
            .iter()
            .any(|result| !result.failures.is_empty())
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }

    fn render(&self) -> String {
        let mut report = String::from("Turn Eval Harness\n");

        let mut passed = 0usize;
        for result in &self.results {
            let CaseResult {
                case_id,
                description,
                failures,
            } = result;
            if failures.is_empty() {
                passed += 1;
                report.push_str(&format!("[PASS] {case_id}: {description}\n"));
            } else {
                report.push_str(&format!("[FAIL] {case_id}: {description}\n"));
                for failure in failures {
                    report.push_str(&format!("  - {failure}\n"));
                }
            }
        }

        let total = self.results.len();
        let failed = total.saturating_sub(passed);
        report.push_str(&format!(
            "Summary: {total} total, {passed} passed, {failed} failed\n"
        ));
        report
    }
}

#[derive(Debug)]
struct CaseResult {
    case_id: String,
    description: String,
    failures: Vec<String>,
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Fixtures(#[from] FixtureIoError),
    #[error("no conversation fixture has case_id {0}")]
    UnknownCase(String),
    #[error("no conversation fixtures found")]
    NoCases,
}

pub async fn run_eval(options: &CliOptions) -> Result<EvalSummary, EvalError> {
    let fixtures_dir = options
        .fixtures_dir
        .clone()
        .unwrap_or_else(default_fixture_root);
    let mut conversations = load_conversations(&fixtures_dir)?;
    conversations.sort_by(|left, right| left.case_id.cmp(&right.case_id));

    if let Some(case_id) = &options.case_id {
        conversations.retain(|conversation| &conversation.case_id == case_id);
        if conversations.is_empty() {
            return Err(EvalError::UnknownCase(case_id.clone()));
        }
    }
    if conversations.is_empty() {
        return Err(EvalError::NoCases);
    }

    let mut results = Vec::with_capacity(conversations.len());
    for conversation in &conversations {
        results.push(replay_conversation(conversation).await);
    }

    Ok(EvalSummary { results })
}

async fn replay_conversation(conversation: &ConversationFixture) -> CaseResult {
    let engine = Arc::new(ReplayEngine::default());
    let handler = TopIntentHandler::new(
        DimensionRegistry::standard(),
        QueryBackend::Ready(engine.clone()),
    );

    let mut failures = Vec::new();
    let mut attributes = conversation.session_attributes.clone();

    for (index, turn) in conversation.turns.iter().enumerate() {
        engine.script(scripted_reply(turn));

        let mut event =
            IntentEvent::new(turn.intent.as_str()).with_session_attributes(attributes.clone());
        event.current_intent.slots = turn.slots.clone();

        let response = handler.handle(event).await;
        let queries = engine.take_queries();

        check_turn(index + 1, turn, &response, &queries, &mut failures);
        attributes = response.session_attributes;
    }

    CaseResult {
        case_id: conversation.case_id.clone(),
        description: conversation.description.clone(),
        failures,
    }
}

fn scripted_reply(turn: &TurnFixture) -> Option<Result<ResultSet, QueryEngineError>> {
    if turn.query_fails {
        return Some(Err(QueryEngineError::ServiceFailure(
            "scripted_failure".to_string(),
        )));
    }

    turn.result_rows
        .as_ref()
        .map(|rows| Ok(ResultSet::with_header("value", rows.iter().map(String::as_str))))
}

fn check_turn(
    turn_number: usize,
    turn: &TurnFixture,
    response: &FulfillmentResponse,
    queries: &[String],
    failures: &mut Vec<String>,
) {
    let content = response.content();

    match &turn.expect_query {
        Some(ExpectedQuery::Issued(false)) if !queries.is_empty() => failures.push(format!(
            "turn {turn_number} query: expected none, got {}",
            queries.join(" | ")
        )),
        Some(ExpectedQuery::Issued(true)) if queries.is_empty() => {
            failures.push(format!("turn {turn_number} query: expected one, got none"))
        }
        Some(ExpectedQuery::Exact(expected)) if queries.first() != Some(expected) => {
            failures.push(format!(
                "turn {turn_number} query: expected={expected}, actual={}",
                queries.first().map(String::as_str).unwrap_or("<none>")
            ))
        }
        _ => {}
    }

    if let Some(expected) = turn.expect_content.as_deref().filter(|expected| *expected != content) {
        failures.push(format!(
            "turn {turn_number} content: expected={expected:?}, actual={content:?}"
        ));
    }

    for fragment in &turn.expect_contains {
        if !content.contains(fragment.as_str()) {
            failures.push(format!(
                "turn {turn_number} content: missing {fragment:?} in {content:?}"
            ));
        }
    }

    let actual_state = response.fulfillment_state();
    if let Some(expected) = turn.expect_state.filter(|expected| *expected != actual_state) {
        failures.push(format!(
            "turn {turn_number} state: expected={}, actual={}",
            expected.as_str(),
            actual_state.as_str()
        ));
    }
}

/// Serves one scripted reply per turn and records every query it receives.
#[derive(Default)]
struct ReplayEngine {
    next_reply: Mutex<Option<Result<ResultSet, QueryEngineError>>>,
    seen_queries: Mutex<Vec<String>>,
}

impl ReplayEngine {
    fn script(&self, reply: Option<Result<ResultSet, QueryEngineError>>) {
        *self
            .next_reply
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = reply;
    }

    fn take_queries(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .seen_queries
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl QueryEngine for ReplayEngine {
    fn execute<'a>(&'a self, query: &'a str) -> QueryEngineFuture<'a> {
        self.seen_queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
        let reply = self
            .next_reply
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| {
                Err(QueryEngineError::ServiceFailure(
                    "no scripted result_rows for this turn".to_string(),
                ))
            });

        Box::pin(async move { reply })
    }
}
