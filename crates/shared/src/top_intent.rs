use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::compose::compose;
use crate::dimensions::DimensionRegistry;
use crate::models::{FulfillmentResponse, FulfillmentState, IntentEvent, SessionAttributes};
use crate::query_builder::{QueryBuildError, build_query};
use crate::query_engine::{QueryEngine, QueryEngineError};
use crate::slot_memory::{
    InvalidCountError, clarification_prompt, merge, read_current_slots, remember,
    requested_count,
};
use crate::slots::SlotName;

pub const TOP_INTENT_NAME: &str = "Top_Intent";

const CONFIGURATION_APOLOGY: &str =
    "Sorry, I'm not set up to answer that right now. Please check my configuration and try again.";
const QUERY_FAILURE_APOLOGY: &str =
    "Sorry, I couldn't get an answer from the ticket sales data. Please try again.";
const UNSUPPORTED_INTENT_MESSAGE: &str = "Sorry, I can only answer \"top\" questions right now.";

/// Where queries go. A misconfigured backend still answers every turn, with an apology.
#[derive(Clone)]
pub enum QueryBackend {
    Ready(Arc<dyn QueryEngine>),
    Misconfigured(String),
}

impl QueryBackend {
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Misconfigured(_) => "misconfigured",
        }
    }
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("query backend is misconfigured: {0}")]
    Configuration(String),
    #[error("unsupported intent {0}")]
    UnsupportedIntent(String),
    #[error(transparent)]
    InvalidCount(#[from] InvalidCountError),
    #[error("unknown dimension {0}")]
    UnknownDimension(String),
    #[error(transparent)]
    QueryExecution(#[from] QueryEngineError),
}

impl From<QueryBuildError> for TurnError {
    fn from(err: QueryBuildError) -> Self {
        match err {
            QueryBuildError::UnknownDimension(name) => Self::UnknownDimension(name),
        }
    }
}

impl TurnError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(_) => CONFIGURATION_APOLOGY.to_string(),
            Self::UnsupportedIntent(_) => UNSUPPORTED_INTENT_MESSAGE.to_string(),
            Self::InvalidCount(InvalidCountError(value)) => format!(
                "Sorry, I didn't understand \"{value}\" as a number of results. Try \"top 5 states\"."
            ),
            Self::UnknownDimension(name) => {
                format!("Sorry, I don't know what you mean by {name}")
            }
            Self::QueryExecution(_) => QUERY_FAILURE_APOLOGY.to_string(),
        }
    }

    pub fn fulfillment_state(&self) -> FulfillmentState {
        match self {
            Self::UnsupportedIntent(_) | Self::QueryExecution(_) => FulfillmentState::Failed,
            Self::Configuration(_) | Self::InvalidCount(_) | Self::UnknownDimension(_) => {
                FulfillmentState::Fulfilled
            }
        }
    }
}

#[derive(Clone)]
pub struct TopIntentHandler {
    registry: DimensionRegistry,
    backend: QueryBackend,
}

impl TopIntentHandler {
    pub fn new(registry: DimensionRegistry, backend: QueryBackend) -> Self {
        Self { registry, backend }
    }

    pub fn backend(&self) -> &QueryBackend {
        &self.backend
    }

    /// Runs one conversational turn. Every recoverable failure becomes a
    /// polite message in a normal fulfillment response.
    pub async fn handle(&self, event: IntentEvent) -> FulfillmentResponse {
        let turn_id = Uuid::new_v4();
        let span = info_span!(
            "top_intent_turn",
            turn_id = %turn_id,
            intent = event.current_intent.name.as_str()
        );

        async move {
            let started = Instant::now();
            let mut attributes = event.session_attributes.clone().unwrap_or_default();
            debug!(?attributes, "received session attributes");

            let (state, content) = match self.run_turn(&event, &mut attributes).await {
                Ok(content) => (FulfillmentState::Fulfilled, content),
                Err(err) => {
                    warn!(error = %err, "turn ended with a recoverable error");
                    (err.fulfillment_state(), err.user_message())
                }
            };

            info!(
                fulfillment_state = state.as_str(),
                duration_ms = started.elapsed().as_millis() as u64,
                "top intent turn completed"
            );
            debug!(content = content.as_str(), "response text");

            FulfillmentResponse::close(attributes, state, content)
        }
        .instrument(span)
        .await
    }

    async fn run_turn(
        &self,
        event: &IntentEvent,
        attributes: &mut SessionAttributes,
    ) -> Result<String, TurnError> {
        let engine = match &self.backend {
            QueryBackend::Ready(engine) => engine,
            QueryBackend::Misconfigured(reason) => {
                return Err(TurnError::Configuration(reason.clone()));
            }
        };

        if event.current_intent.name != TOP_INTENT_NAME {
            return Err(TurnError::UnsupportedIntent(
                event.current_intent.name.clone(),
            ));
        }

        stamp_turn_markers(attributes);

        let current = read_current_slots(&event.current_intent.slots);
        debug!(?current, "slot values from current turn");

        let mut slots = merge(current, attributes, &self.registry);
        debug!(?slots, "slot values after merging remembered values");

        let Some(dimension_name) = slots.get(SlotName::Dimension).map(ToString::to_string) else {
            return Ok(clarification_prompt(&self.registry));
        };
        let dimension = *self
            .registry
            .get(&dimension_name)
            .ok_or_else(|| TurnError::UnknownDimension(dimension_name.clone()))?;
        let count = requested_count(&slots)?;

        remember(&slots, attributes);

        let query = build_query(&self.registry, dimension.name, &slots, count)?;
        let result_set = engine.execute(&query).await?;
        result_set.ensure_well_formed()?;

        let composition = compose(&dimension, &self.registry, &slots, &result_set, count);

        if let Some(value) = composition.sole_value {
            debug!(
                slot = dimension.slot.as_str(),
                value = value.as_str(),
                "remembering sole result for drill-down"
            );
            slots.set(dimension.slot, Some(value));
            remember(&slots, attributes);
        }

        Ok(composition.text)
    }
}

fn stamp_turn_markers(attributes: &mut SessionAttributes) {
    for (key, value) in [
        ("greetingCount", "1"),
        ("resetCount", "0"),
        ("finishedCount", "0"),
        ("lastIntent", TOP_INTENT_NAME),
    ] {
        attributes.insert(key.to_string(), value.to_string());
    }
}
