use std::collections::BTreeMap;

use serde::Deserialize;
use shared::models::{FulfillmentState, SessionAttributes};
use shared::top_intent::TOP_INTENT_NAME;

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationFixture {
    pub case_id: String,
    pub description: String,
    #[serde(default)]
    pub session_attributes: SessionAttributes,
    pub turns: Vec<TurnFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TurnFixture {
    #[serde(default = "default_intent")]
    pub intent: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Option<String>>,
    /// Leading-column values the query service returns, header row excluded.
    #[serde(default)]
    pub result_rows: Option<Vec<String>>,
    #[serde(default)]
    pub query_fails: bool,
    #[serde(default)]
    pub expect_query: Option<ExpectedQuery>,
    #[serde(default)]
    pub expect_content: Option<String>,
    #[serde(default)]
    pub expect_contains: Vec<String>,
    #[serde(default)]
    pub expect_state: Option<FulfillmentState>,
}

/// `false` asserts that no query ran; a string asserts the exact SQL.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExpectedQuery {
    Issued(bool),
    Exact(String),
}

fn default_intent() -> String {
    TOP_INTENT_NAME.to_string()
}
