//! Error type for upstream price fetches.

use thiserror::Error;

/// Outcome of a failed upstream fetch.
///
/// The handler only needs to know which side of the line a failure falls on:
/// the upstream could not be reached (`Transport`), or something went wrong
/// with what it sent back or with building the request (`Other`).
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    /// Connection refused, DNS failure, reset, timeout or a non-success HTTP status.
    #[error("{0}")]
    Transport(String),
    /// Malformed payload, unexpected structure, invalid request.
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // A body that times out mid-read surfaces as a decode error.
        if e.is_timeout() {
            FetchError::Transport(e.to_string())
        } else if e.is_builder() || e.is_decode() {
            FetchError::Other(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_cause() {
        let e = FetchError::Transport("connection refused".to_string());
        assert_eq!(e.to_string(), "connection refused");
        assert!(e.is_transport());
    }

    #[test]
    fn test_json_error_is_other() {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let e = FetchError::from(err);
        assert!(!e.is_transport());
        assert!(e.to_string().contains("expected value"));
    }

    #[test]
    fn test_invalid_url_is_other() {
        let client = reqwest::blocking::Client::new();
        let err = client.get("not a url").send().unwrap_err();
        assert!(!FetchError::from(err).is_transport());
    }
}
