use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::dimensions::DimensionRegistry;
use crate::models::SessionAttributes;
use crate::normalize::normalize_slot_value;
use crate::slots::{SlotName, SlotValues};

pub const SLOT_VALUES_ATTRIBUTE: &str = "slot_values";
pub const DEFAULT_TOP_COUNT: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("count slot value {0:?} is not a positive integer")]
pub struct InvalidCountError(pub String);

/// Reads the slots recognized in the current turn. Blank values count as absent.
pub fn read_current_slots(platform_slots: &BTreeMap<String, Option<String>>) -> SlotValues {
    let mut slots = SlotValues::default();

    for (name, value) in platform_slots {
        let Some(slot) = SlotName::parse(name) else {
            debug!(slot = name.as_str(), "ignoring unrecognized slot");
            continue;
        };

        let value = value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| normalize_slot_value(slot, value));
        slots.set(slot, value);
    }

    slots
}

pub fn remembered_slot_values(attributes: &SessionAttributes) -> Option<SlotValues> {
    let raw = attributes.get(SLOT_VALUES_ATTRIBUTE)?;

    match serde_json::from_str::<SlotValues>(raw) {
        Ok(slots) => Some(slots),
        Err(err) => {
            warn!(error = %err, "discarding unreadable remembered slot values");
            None
        }
    }
}

/// Overlays remembered values onto the current turn's slots. Fresh values win;
/// a remembered drill-down value for the dimension being reported is dropped.
pub fn merge(
    current: SlotValues,
    attributes: &SessionAttributes,
    registry: &DimensionRegistry,
) -> SlotValues {
    let Some(remembered) = remembered_slot_values(attributes) else {
        return with_default_count(current);
    };

    let mut merged = current.clone();
    for slot in SlotName::ALL {
        if merged.get(slot).is_none() {
            merged.set(slot, remembered.get(slot).map(ToString::to_string));
        }
    }

    if let Some(dimension) = merged.get(SlotName::Dimension).and_then(|name| registry.get(name)) {
        let drill_down = dimension.slot;
        if current.get(drill_down).is_none() && merged.get(drill_down).is_some() {
            debug!(
                dimension = dimension.name,
                slot = drill_down.as_str(),
                "cleared remembered drill-down value for reported dimension"
            );
            merged.set(drill_down, None);
        }
    }

    with_default_count(merged)
}

pub fn remember(slots: &SlotValues, attributes: &mut SessionAttributes) {
    match serde_json::to_string(slots) {
        Ok(encoded) => {
            attributes.insert(SLOT_VALUES_ATTRIBUTE.to_string(), encoded);
        }
        Err(err) => warn!(error = %err, "failed to encode slot values for session state"),
    }
}

pub fn requested_count(slots: &SlotValues) -> Result<u32, InvalidCountError> {
    let Some(raw) = slots.get(SlotName::Count) else {
        return Ok(DEFAULT_TOP_COUNT);
    };

    match raw.trim().parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(InvalidCountError(raw.to_string())),
    }
}

/// Prompt listing every reportable dimension, used when no dimension is known.
pub fn clarification_prompt(registry: &DimensionRegistry) -> String {
    let names = registry.names().collect::<Vec<_>>();
    let Some((first, rest)) = names.split_first() else {
        return "Please tell me a dimension, for example, \"top five months\".".to_string();
    };

    let mut prompt = format!("Please tell me a dimension, for example, \"top five {first}\".");
    match rest {
        [] => {}
        [only] => prompt.push_str(&format!(" I can also report on {only}.")),
        [leading @ .., last] => prompt.push_str(&format!(
            " I can also report on {}, and {last}.",
            leading.join(", ")
        )),
    }

    prompt
}

fn with_default_count(mut slots: SlotValues) -> SlotValues {
    if slots.get(SlotName::Count).is_none() {
        slots.set(SlotName::Count, Some(DEFAULT_TOP_COUNT.to_string()));
    }
    slots
}
