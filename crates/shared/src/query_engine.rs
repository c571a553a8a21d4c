use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, QueryServiceConfig};

pub type QueryEngineFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ResultSet, QueryEngineError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum QueryEngineError {
    #[error("query service request timed out")]
    Timeout,
    #[error("query service request failed: {0}")]
    ServiceFailure(String),
    #[error("query service returned an invalid payload: {0}")]
    InvalidPayload(String),
    #[error("query service returned a malformed result set: {0}")]
    MalformedResult(String),
}

/// Executes one SQL string and returns the engine's row set. Row 0 is a header.
pub trait QueryEngine: Send + Sync {
    fn execute<'a>(&'a self, query: &'a str) -> QueryEngineFuture<'a>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCell {
    #[serde(rename = "VarCharValue", default, skip_serializing_if = "Option::is_none")]
    pub var_char_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Data", default)]
    pub data: Vec<ResultCell>,
}

impl ResultRow {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: values
                .into_iter()
                .map(|value| ResultCell {
                    var_char_value: Some(value.into()),
                })
                .collect(),
        }
    }

    /// Value of the first column, which carries the dimension value.
    pub fn leading_value(&self) -> Option<&str> {
        self.data.first()?.var_char_value.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(rename = "Rows", default)]
    pub rows: Vec<ResultRow>,
}

impl ResultSet {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    /// Header row plus one single-column data row per value.
    pub fn with_header<I, S>(header: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows = vec![ResultRow::from_values([header])];
        rows.extend(values.into_iter().map(|value| ResultRow::from_values([value])));
        Self { rows }
    }

    pub fn data_rows(&self) -> &[ResultRow] {
        self.rows.get(1..).unwrap_or_default()
    }

    pub fn result_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Every data row must carry a value in its first cell.
    pub fn ensure_well_formed(&self) -> Result<(), QueryEngineError> {
        for (index, row) in self.data_rows().iter().enumerate() {
            if row.leading_value().is_none() {
                return Err(QueryEngineError::MalformedResult(format!(
                    "row {} has no leading value",
                    index + 1
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct QueryServiceResponse {
    #[serde(rename = "ResultSet")]
    result_set: ResultSet,
}

/// Query service reached over HTTP: one POST per query, no retries.
#[derive(Clone)]
pub struct HttpQueryEngine {
    client: reqwest::Client,
    config: QueryServiceConfig,
}

impl HttpQueryEngine {
    pub fn new(config: QueryServiceConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    async fn send(&self, query: &str) -> Result<ResultSet, QueryEngineError> {
        let mut request = self.client.post(&self.config.endpoint_url).json(&json!({
            "QueryString": query,
            "Database": self.config.database,
        }));
        if let Some(api_key) = self.config.api_key.as_deref() {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                QueryEngineError::Timeout
            } else {
                QueryEngineError::ServiceFailure("request_unavailable".to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|_| QueryEngineError::InvalidPayload("response_body_read_failed".to_string()))?;

        if !status.is_success() {
            return Err(QueryEngineError::ServiceFailure(format!(
                "status={}",
                status.as_u16()
            )));
        }

        let parsed: QueryServiceResponse = serde_json::from_str(&body).map_err(|_| {
            QueryEngineError::InvalidPayload("response_json_parse_failed".to_string())
        })?;

        debug!(
            rows = parsed.result_set.rows.len(),
            "query service returned result set"
        );
        Ok(parsed.result_set)
    }
}

impl QueryEngine for HttpQueryEngine {
    fn execute<'a>(&'a self, query: &'a str) -> QueryEngineFuture<'a> {
        Box::pin(self.send(query))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{QueryEngineError, ResultRow, ResultSet};

    #[test]
    fn result_set_parses_engine_shape_and_skips_header() {
        let result_set: ResultSet = serde_json::from_value(json!({
            "Rows": [
                { "Data": [{ "VarCharValue": "venue_state" }, { "VarCharValue": "ticket_sales" }] },
                { "Data": [{ "VarCharValue": "CA" }, { "VarCharValue": "1200.00" }] },
                { "Data": [{ "VarCharValue": "NY" }, { "VarCharValue": "900.00" }] }
            ]
        }))
        .expect("result set should parse");

        assert_eq!(result_set.result_count(), 2);
        assert_eq!(result_set.data_rows()[0].leading_value(), Some("CA"));
        assert!(result_set.ensure_well_formed().is_ok());
    }

    #[test]
    fn empty_result_set_has_no_data_rows() {
        let result_set = ResultSet::default();
        assert_eq!(result_set.result_count(), 0);
        assert!(result_set.data_rows().is_empty());

        let header_only = ResultSet::with_header("venue_state", Vec::<String>::new());
        assert_eq!(header_only.result_count(), 0);
    }

    #[test]
    fn rows_without_leading_value_are_malformed() {
        let result_set = ResultSet::new(vec![
            ResultRow::from_values(["venue_state"]),
            ResultRow::default(),
        ]);

        let err = result_set
            .ensure_well_formed()
            .expect_err("missing cell should be rejected");
        assert!(matches!(err, QueryEngineError::MalformedResult(_)));
    }
}
