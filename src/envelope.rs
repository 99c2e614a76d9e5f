//! Response envelope handling.
//!
//! Every endpoint of the instance answers with the same wrapper:
//! `{"status": 200, "data": ...}` on success or `{"status": <code>, "error": "..."}`
//! on failure. This module turns a raw HTTP outcome into that two-variant
//! shape and then into the operation's result, so every operation shares a
//! single error path regardless of HTTP verb.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{RequestError, REQUEST_FAILED};

/// Status code the instance uses for successful responses.
const STATUS_OK: u16 = 200;

/// The wire response shape shared by every endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// Status 200. `data` is `None` when the field was absent, `null`, `""`,
    /// `false` or `0`.
    Success { data: Option<T> },

    /// Any other status, or any body carrying an `error` field.
    Failure { status: u16, error: String },
}

/// Loosely-typed body as it arrives on the wire.
#[derive(Debug, Deserialize)]
struct WireEnvelope {
    #[serde(default)]
    status: Option<u16>,

    #[serde(default)]
    data: Option<Value>,

    #[serde(default)]
    error: Option<Value>,
}

impl Envelope<Value> {
    /// Parse a response body into an envelope.
    ///
    /// The status embedded in the body takes precedence over the HTTP status.
    /// A body carrying an `error` field is a failure whatever its status.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body is not a JSON object.
    pub fn parse(http_status: u16, body: &[u8]) -> Result<Self, serde_json::Error> {
        let wire: WireEnvelope = serde_json::from_slice(body)?;
        let status = wire.status.unwrap_or(http_status);

        if let Some(error) = wire.error {
            return Ok(Envelope::Failure {
                status,
                error: message_of(error),
            });
        }

        if status != STATUS_OK {
            // The instance rejects bad credentials with `{"status":401,"data":"Unauthorized."}`.
            let error = match wire.data {
                Some(Value::String(message)) if !message.is_empty() => message,
                _ => REQUEST_FAILED.to_string(),
            };
            return Ok(Envelope::Failure { status, error });
        }

        Ok(Envelope::Success {
            data: wire.data.filter(|data| !is_empty(data)),
        })
    }
}

impl<T> Envelope<T> {
    /// Whether this is a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// Unwrap the data carried by a success envelope.
    pub fn into_data(self) -> Result<T, RequestError> {
        match self {
            Envelope::Success { data: Some(data) } => Ok(data),
            Envelope::Success { data: None } => Err(RequestError::InvalidData),
            Envelope::Failure { status, error } => Err(RequestError::Service {
                status,
                message: error,
            }),
        }
    }
}

/// Decode a response body into the data of a success envelope.
pub fn decode<T: DeserializeOwned>(http_status: u16, body: &[u8]) -> Result<T, RequestError> {
    let envelope = Envelope::<Value>::parse(http_status, body).map_err(|e| {
        debug!(status = http_status, error = %e, "Response body is not an envelope");
        RequestError::MalformedBody(e)
    })?;

    let data = envelope.into_data()?;

    serde_json::from_value(data).map_err(|e| {
        debug!(error = %e, "Envelope data has an unexpected shape");
        RequestError::InvalidData
    })
}

/// Normalize the outcome of one HTTP exchange.
///
/// A transport failure, a body that cannot be read, an error envelope and a
/// success envelope without data all become a `RequestError`.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    outcome: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, RequestError> {
    let response = outcome.map_err(|e| {
        debug!(error = %e, "HTTP exchange failed");
        RequestError::Transport(e)
    })?;

    let status = response.status().as_u16();
    let body = response.bytes().await?;

    debug!(status = status, body_len = body.len(), "Received response");

    decode(status, &body)
}

fn message_of(error: Value) -> String {
    match error {
        Value::String(message) => message,
        other => other.to_string(),
    }
}

fn is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_success_envelope() {
        let envelope =
            Envelope::<Value>::parse(200, &body(json!({"status": 200, "data": "Event stored successfully!"})))
                .unwrap();
        assert_eq!(
            envelope,
            Envelope::Success {
                data: Some(json!("Event stored successfully!"))
            }
        );
        assert!(envelope.is_success());
    }

    #[test]
    fn test_error_field_is_failure() {
        let envelope =
            Envelope::<Value>::parse(500, &body(json!({"status": 500, "error": "db down"}))).unwrap();
        assert_eq!(
            envelope,
            Envelope::Failure {
                status: 500,
                error: "db down".to_string()
            }
        );

        // Error field wins even when the status claims success
        let envelope =
            Envelope::<Value>::parse(200, &body(json!({"status": 200, "error": "partial"}))).unwrap();
        assert!(!envelope.is_success());
    }

    #[test]
    fn test_non_ok_status_without_error_field() {
        let envelope =
            Envelope::<Value>::parse(401, &body(json!({"status": 401, "data": "Unauthorized."}))).unwrap();
        assert_eq!(
            envelope,
            Envelope::Failure {
                status: 401,
                error: "Unauthorized.".to_string()
            }
        );

        let envelope = Envelope::<Value>::parse(503, &body(json!({}))).unwrap();
        assert_eq!(
            envelope,
            Envelope::Failure {
                status: 503,
                error: REQUEST_FAILED.to_string()
            }
        );
    }

    #[test]
    fn test_body_status_takes_precedence() {
        let envelope =
            Envelope::<Value>::parse(200, &body(json!({"status": 404, "data": "Route not found."})))
                .unwrap();
        assert!(matches!(envelope, Envelope::Failure { status: 404, .. }));
    }

    #[test]
    fn test_empty_data_is_missing() {
        for value in [
            json!({"status": 200}),
            json!({"status": 200, "data": null}),
            json!({"status": 200, "data": ""}),
            json!({"status": 200, "data": false}),
            json!({"status": 200, "data": 0}),
            json!({"status": 200, "data": 0.0}),
        ] {
            let envelope = Envelope::<Value>::parse(200, &body(value)).unwrap();
            assert_eq!(envelope, Envelope::Success { data: None });
        }
    }

    #[test]
    fn test_falsy_data_is_invalid() {
        for value in [
            json!({"status": 200, "data": false}),
            json!({"status": 200, "data": 0}),
        ] {
            let err = decode::<Value>(200, &body(value)).unwrap_err();
            assert!(err.is_invalid_data());
        }

        // Non-zero and non-false values are still data
        let data: Value = decode(200, &body(json!({"status": 200, "data": 1}))).unwrap();
        assert_eq!(data, json!(1));
        let data: Value = decode(200, &body(json!({"status": 200, "data": true}))).unwrap();
        assert_eq!(data, json!(true));
    }

    #[test]
    fn test_non_json_body_is_error() {
        assert!(Envelope::<Value>::parse(502, b"<html>Bad Gateway</html>").is_err());
        assert!(Envelope::<Value>::parse(200, b"").is_err());
        assert!(Envelope::<Value>::parse(200, b"\"ok\"").is_err());
    }

    #[test]
    fn test_decode_success() {
        let data: String = decode(200, &body(json!({"status": 200, "data": "ok"}))).unwrap();
        assert_eq!(data, "ok");

        let data: BTreeMap<String, u64> =
            decode(200, &body(json!({"status": 200, "data": {"a": 1, "b": 2}}))).unwrap();
        assert_eq!(data.get("b"), Some(&2));
    }

    #[test]
    fn test_decode_service_error_message() {
        let err =
            decode::<String>(500, &body(json!({"status": 500, "error": "db down"}))).unwrap_err();
        assert_eq!(err.to_string(), "db down");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_decode_missing_data() {
        let err = decode::<String>(200, &body(json!({"status": 200}))).unwrap_err();
        assert!(err.is_invalid_data());
        assert_eq!(err.to_string(), "invalid response data");
    }

    #[test]
    fn test_decode_wrong_data_shape() {
        let err = decode::<BTreeMap<String, u64>>(200, &body(json!({"status": 200, "data": "text"})))
            .unwrap_err();
        assert!(err.is_invalid_data());
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode::<String>(500, b"Internal Server Error").unwrap_err();
        assert!(err.is_request_failed());
        assert_eq!(err.to_string(), "request failed");
    }

    #[test]
    fn test_into_data() {
        let envelope: Envelope<u32> = Envelope::Success { data: Some(3) };
        assert_eq!(envelope.into_data().unwrap(), 3);

        let envelope: Envelope<u32> = Envelope::Failure {
            status: 400,
            error: "Invalid input".to_string(),
        };
        assert!(matches!(
            envelope.into_data(),
            Err(RequestError::Service { status: 400, .. })
        ));
    }
}
