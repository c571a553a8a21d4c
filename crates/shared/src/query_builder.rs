use thiserror::Error;
use tracing::debug;

use crate::dimensions::DimensionRegistry;
use crate::normalize::normalize_query_value;
use crate::slots::SlotValues;

const TOP_SELECT: &str = "SUM(s.amount) ticket_sales FROM sales s, event e, venue v, category c, date_dim d ";
const TOP_JOIN: &str = " WHERE e.event_id = s.event_id AND v.venue_id = e.venue_id AND c.cat_id = e.cat_id AND d.date_id = e.date_id ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryBuildError {
    #[error("unknown dimension {0}")]
    UnknownDimension(String),
}

/// Builds the "top N" ticket sales query for a dimension, filtered by every
/// drill-down slot that currently holds a value.
pub fn build_query(
    registry: &DimensionRegistry,
    dimension_name: &str,
    slots: &SlotValues,
    count: u32,
) -> Result<String, QueryBuildError> {
    let dimension = registry
        .get(dimension_name)
        .ok_or_else(|| QueryBuildError::UnknownDimension(dimension_name.to_string()))?;

    let mut query = format!("SELECT {}, {TOP_SELECT}{TOP_JOIN}", dimension.column);

    for filter in registry.iter() {
        if let Some(value) = slots.get(filter.slot) {
            let value = normalize_query_value(filter.slot, value);
            query.push_str(&format!(
                " AND LOWER({}) LIKE LOWER('%{value}%') ",
                filter.column
            ));
        }
    }

    query.push_str(&format!(
        " GROUP BY {} ORDER BY ticket_sales desc LIMIT {count}",
        dimension.column
    ));

    debug!(dimension = dimension.name, query = query.as_str(), "built top query");
    Ok(query)
}
