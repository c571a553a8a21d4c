use crate::dimensions::{Dimension, DimensionRegistry};
use crate::normalize::{render_dimension_output, slot_formatter};
use crate::query_engine::ResultSet;
use crate::slots::SlotValues;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub text: String,
    /// Display value when exactly one row came back; becomes the drill-down filter.
    pub sole_value: Option<String>,
}

/// Renders a result set as one English sentence, e.g.
/// "The top 3 states in the month of July were 1, California; 2, Texas; and 3, Ohio."
pub fn compose(
    dimension: &Dimension,
    registry: &DimensionRegistry,
    slots: &SlotValues,
    result_set: &ResultSet,
    requested_count: u32,
) -> Composition {
    let result_count = result_set.result_count();
    let mut text = String::new();

    if result_count < requested_count as usize {
        match result_count {
            0 => text.push_str(&format!("There weren't any {} ", dimension.name)),
            1 => text.push_str("There was only 1. "),
            n => text.push_str(&format!("There were only {n}. ")),
        }
    }

    match result_count {
        0 => {}
        1 => text.push_str(&format!("The top {}", dimension.singular_label())),
        n => text.push_str(&format!("The top {n} {}", dimension.name)),
    }

    for filter in registry.iter() {
        let Some(value) = slots.get(filter.slot) else {
            continue;
        };
        if let Some(formatter) = slot_formatter(filter.slot) {
            text.push(' ');
            text.push_str(&formatter.describe(value));
        }
    }

    match result_count {
        0 => {}
        1 => text.push_str(" was "),
        _ => text.push_str(" were "),
    }

    let mut last_value = None;
    for (index, row) in result_set.data_rows().iter().enumerate() {
        let position = index + 1;
        if position > 1 {
            text.push_str(if position == result_count { "; and " } else { "; " });
        }
        if result_count > 1 {
            text.push_str(&format!("{position}, "));
        }

        let value = render_dimension_output(dimension.name, row.leading_value().unwrap_or_default());
        text.push_str(&value);
        last_value = Some(value);
    }

    text.push('.');

    Composition {
        text,
        sole_value: if result_count == 1 { last_value } else { None },
    }
}
