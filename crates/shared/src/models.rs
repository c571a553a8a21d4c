use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type SessionAttributes = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentEvent {
    pub current_intent: CurrentIntent,
    #[serde(default)]
    pub session_attributes: Option<SessionAttributes>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub input_transcript: Option<String>,
    #[serde(default)]
    pub invocation_source: Option<String>,
    #[serde(default)]
    pub message_version: Option<String>,
}

impl IntentEvent {
    pub fn new(intent_name: impl Into<String>) -> Self {
        Self {
            current_intent: CurrentIntent {
                name: intent_name.into(),
                slots: BTreeMap::new(),
            },
            session_attributes: None,
            user_id: None,
            input_transcript: None,
            invocation_source: None,
            message_version: None,
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.current_intent
            .slots
            .insert(name.into(), value.map(ToString::to_string));
        self
    }

    pub fn with_session_attributes(mut self, attributes: SessionAttributes) -> Self {
        self.session_attributes = Some(attributes);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentIntent {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentState {
    Fulfilled,
    Failed,
}

impl FulfillmentState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fulfilled => "Fulfilled",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogActionType {
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentMessage {
    pub content_type: ContentType,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub action_type: DialogActionType,
    pub fulfillment_state: FulfillmentState,
    pub message: FulfillmentMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResponse {
    pub session_attributes: SessionAttributes,
    pub dialog_action: DialogAction,
}

impl FulfillmentResponse {
    pub fn close(
        session_attributes: SessionAttributes,
        fulfillment_state: FulfillmentState,
        content: impl Into<String>,
    ) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction {
                action_type: DialogActionType::Close,
                fulfillment_state,
                message: FulfillmentMessage {
                    content_type: ContentType::PlainText,
                    content: content.into(),
                },
            },
        }
    }

    pub fn content(&self) -> &str {
        self.dialog_action.message.content.as_str()
    }

    pub fn fulfillment_state(&self) -> FulfillmentState {
        self.dialog_action.fulfillment_state
    }
}
