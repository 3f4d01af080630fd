//! JSON helpers for the dispatch boundary.
//!
//! Serde already does the work; these helpers fix which error each
//! direction reports so transports stay consistent.

use serde::Serialize;

use crate::dispatch::request::SortRequest;
use crate::dispatch::response::BatchResponse;
use crate::error::{SortError, TransportError, ValidationError};

/// Serialize any dispatch type to compact JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, SortError> {
    serde_json::to_string(value).map_err(|e| {
        SortError::Transport(TransportError::SerializationFailed {
            message: e.to_string(),
        })
    })
}

/// Serialize any dispatch type to pretty JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, SortError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        SortError::Transport(TransportError::SerializationFailed {
            message: e.to_string(),
        })
    })
}

/// Deserialize a request. Malformed text is caller input, so it is a
/// validation error.
///
/// Callers should then invoke `request.validate()` before dispatching.
pub fn request_from_json(s: &str) -> Result<SortRequest, SortError> {
    serde_json::from_str(s)
        .map_err(|e| SortError::Validation(ValidationError::InvalidJson { reason: e.to_string() }))
}

/// Deserialize a response produced by [`to_json`].
pub fn response_from_json(s: &str) -> Result<BatchResponse, SortError> {
    serde_json::from_str(s).map_err(|e| {
        SortError::Transport(TransportError::DeserializationFailed {
            message: e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ints;

    #[test]
    fn request_json_roundtrip_works() {
        let req = SortRequest::new(ints(&[3, 1, 2]), ["quick", "merge"]);
        let json = to_json_pretty(&req).unwrap();
        let decoded = request_from_json(&json).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn non_numeric_array_is_invalid_input() {
        let err = request_from_json(r#"{"array": ["a"], "algorithms": ["bubble"]}"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn garbage_response_is_transport_error() {
        let err = response_from_json("not json").unwrap_err();
        assert!(err.is_transport());
    }
}
