//! # RSI Indicator Reading
//!
//! The indicator model deliberately mirrors what the upstream actually
//! guarantees: nothing. Fields are extracted with optional accessors, and a
//! payload missing `date` or `rsi` (or carrying the wrong type) yields
//! `None` in that position rather than an error. Downstream, an absent RSI
//! fails the threshold comparison and no alert is sent. A malformed
//! payload degrades to "no alert" instead of failing the invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::configs::config_alerter::AlerterConfig;
use crate::markets::rsifeed::apicall::{ApiCallRsi, FeedError};

/// One reading from the upstream indicator endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    /// Civil date the reading refers to, as reported upstream.
    pub date: Option<String>,
    /// The RSI value, when the payload carries a numeric `rsi` field.
    pub rsi: Option<f64>,
}

impl RsiReading {
    /// Lenient extraction from an arbitrary JSON payload.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            date: payload
                .get("date")
                .and_then(Value::as_str)
                .map(str::to_owned),
            rsi: payload.get("rsi").and_then(Value::as_f64),
        }
    }
}

/// Client fetching and normalizing the latest indicator reading.
pub struct RsiFeed {
    api_call: ApiCallRsi,
}

impl RsiFeed {
    pub fn new(config: &AlerterConfig) -> anyhow::Result<Self> {
        Ok(Self {
            api_call: ApiCallRsi::new(&config.rsi_api_url)?,
        })
    }

    /// Fetches the latest reading.
    ///
    /// Transport and HTTP-status failures propagate as [`FeedError`];
    /// payload-shape problems do not (see the module docs).
    pub async fn fetch_reading(&self) -> Result<RsiReading, FeedError> {
        let payload = self.api_call.fetch().await?;
        Ok(RsiReading::from_payload(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_both_fields_when_present() {
        let reading = RsiReading::from_payload(&json!({
            "date": "2025-06-01",
            "rsi": 25.37
        }));
        assert_eq!(reading.date.as_deref(), Some("2025-06-01"));
        assert_eq!(reading.rsi, Some(25.37));
    }

    #[test]
    fn integer_rsi_is_accepted() {
        let reading = RsiReading::from_payload(&json!({ "date": "2025-06-01", "rsi": 25 }));
        assert_eq!(reading.rsi, Some(25.0));
    }

    #[test]
    fn missing_fields_become_none() {
        let reading = RsiReading::from_payload(&json!({}));
        assert_eq!(reading, RsiReading::default());
    }

    #[test]
    fn wrong_typed_fields_become_none() {
        // A stringly-typed rsi or a numeric date must not error out.
        let reading = RsiReading::from_payload(&json!({ "date": 20250601, "rsi": "25" }));
        assert_eq!(reading.date, None);
        assert_eq!(reading.rsi, None);
    }

    #[test]
    fn non_object_payload_becomes_empty_reading() {
        let reading = RsiReading::from_payload(&json!([1, 2, 3]));
        assert_eq!(reading, RsiReading::default());
    }
}
