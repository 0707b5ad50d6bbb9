use thiserror::Error;

use crate::http::HttpError;

/// Why a users load did not produce records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("request timed out")]
    Timeout,
    #[error("network failure: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<HttpError> for LoadError {
    fn from(err: HttpError) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.message)
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpErrorKind;

    #[test]
    fn test_http_error_classification() {
        let timeout = HttpError::new(HttpErrorKind::Timeout, "operation timed out");
        assert_eq!(LoadError::from(timeout), LoadError::Timeout);

        let refused = HttpError::new(HttpErrorKind::Connect, "connection refused");
        assert_eq!(
            LoadError::from(refused),
            LoadError::Network("connection refused".to_owned())
        );
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(LoadError::from(err), LoadError::Malformed(_)));
    }
}
