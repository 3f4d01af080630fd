//! Batch sort request envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::value::Number;

fn current_version() -> String {
    SortRequest::CURRENT_VERSION.to_string()
}

/// One array to be sorted by one or more named algorithms.
///
/// Every request carries:
/// - a protocol version for forward/backward compatibility
/// - a request ID for correlating the response and log lines
/// - a creation timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortRequest {
    /// Protocol version (e.g., "1.0").
    #[serde(default = "current_version")]
    pub version: String,

    /// Unique identifier for this request.
    #[serde(default = "Uuid::new_v4")]
    pub request_id: Uuid,

    /// When this request was created.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// The values to sort. Each algorithm gets its own copy.
    pub array: Vec<Number>,

    /// Requested algorithm identifiers, in request order.
    pub algorithms: Vec<String>,
}

impl SortRequest {
    /// Current protocol version.
    pub const CURRENT_VERSION: &'static str = "1.0";

    /// Creates a new request.
    pub fn new<I, S>(array: Vec<Number>, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            array,
            algorithms: algorithms.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets a custom request ID (useful for correlation).
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Builds a request from the two JSON-encoded query parameters of a
    /// `/sort?array=[..]&algorithms=[..]` call.
    ///
    /// Missing or empty parameters are [`ValidationError::MissingField`];
    /// text that is not JSON is [`ValidationError::InvalidJson`].
    pub fn from_query(array: Option<&str>, algorithms: Option<&str>) -> Result<Self, ValidationError> {
        let array = required_param("array", array)?;
        let algorithms = required_param("algorithms", algorithms)?;

        let array = decode_array(&parse_json(array)?)?;
        let algorithms = decode_identifiers(&parse_json(algorithms)?)?;

        Ok(Self::new(array, algorithms))
    }
}

fn required_param<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField {
            field: field.to_string(),
        }),
    }
}

fn parse_json(text: &str) -> Result<serde_json::Value, ValidationError> {
    serde_json::from_str(text).map_err(|e| ValidationError::InvalidJson { reason: e.to_string() })
}

/// Decodes a JSON array of numbers.
pub fn decode_array(value: &serde_json::Value) -> Result<Vec<Number>, ValidationError> {
    let Some(items) = value.as_array() else {
        return Err(ValidationError::NotASequence);
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| Number::from_json(item, index))
        .collect()
}

fn decode_identifiers(value: &serde_json::Value) -> Result<Vec<String>, ValidationError> {
    let Some(items) = value.as_array() else {
        return Err(ValidationError::InvalidJson {
            reason: "algorithms must be an array of strings".to_string(),
        });
    };
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| ValidationError::InvalidJson {
                reason: format!("algorithm identifier must be a string, got {item}"),
            })
        })
        .collect()
}
