//! Error types returned by client operations.

use thiserror::Error;

use crate::config::ConfigError;

/// Message used when the exchange itself failed or produced no usable body.
pub const REQUEST_FAILED: &str = "request failed";

/// Message used when a success envelope carries no usable data.
pub const INVALID_RESPONSE_DATA: &str = "invalid response data";

/// Errors that can occur while performing an operation against the instance.
///
/// Every operation collapses its failure modes into this one type. The client
/// stays usable after any of them.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The HTTP exchange failed (connection refused, DNS, TLS, body read)
    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    /// The response body was not a JSON envelope
    #[error("request failed")]
    MalformedBody(#[source] serde_json::Error),

    /// A success envelope had no data, or data of the wrong shape
    #[error("invalid response data")]
    InvalidData,

    /// The instance reported an error
    #[error("{message}")]
    Service { status: u16, message: String },
}

impl RequestError {
    /// True for the generic "request failed" outcomes.
    pub fn is_request_failed(&self) -> bool {
        matches!(
            self,
            RequestError::Transport(_) | RequestError::MalformedBody(_)
        )
    }

    /// True when a success envelope was missing its data.
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, RequestError::InvalidData)
    }

    /// Status reported by the instance, if it reported one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Service { status, .. } => Some(*status),
            RequestError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Transport(err)
    }
}

/// Either phase of the client lifecycle failing.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_display() {
        assert_eq!(RequestError::InvalidData.to_string(), INVALID_RESPONSE_DATA);

        let err = RequestError::Service {
            status: 500,
            message: "db down".to_string(),
        };
        assert_eq!(err.to_string(), "db down");
        assert_eq!(err.status(), Some(500));

        let parse_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = RequestError::MalformedBody(parse_err);
        assert_eq!(err.to_string(), REQUEST_FAILED);
    }

    #[test]
    fn test_generic_failures_are_distinguishable() {
        let parse_err = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        let failed = RequestError::MalformedBody(parse_err);
        let invalid = RequestError::InvalidData;

        assert!(failed.is_request_failed());
        assert!(!failed.is_invalid_data());
        assert!(invalid.is_invalid_data());
        assert!(!invalid.is_request_failed());
        assert_ne!(failed.to_string(), invalid.to_string());
    }

    #[test]
    fn test_error_conversions() {
        let err: Error = ConfigError::MissingAuthorization.into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Authorization is required.");

        let err: Error = RequestError::InvalidData.into();
        assert!(matches!(err, Error::Request(_)));
        assert_eq!(err.to_string(), "invalid response data");
    }
}
