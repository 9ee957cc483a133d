use std::time::Duration;

use dompet_core::LoadFailure;
use thiserror::Error;

/// Everything that can go wrong talking to the banking backend
#[derive(Debug, Clone, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum FetchError {
    #[error("network error calling {endpoint}: {message}")]
    Network {
        endpoint: &'static str,
        message: String,
    },
    #[error("{endpoint} timed out after {after:?}")]
    Timeout {
        endpoint: &'static str,
        after: Duration,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("malformed response from {endpoint}: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
    #[error("login rejected: {0}")]
    Auth(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    /// Network trouble and server-side errors are worth retrying; bad shapes and
    /// rejected logins are not
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network { .. } | FetchError::Timeout { .. } => true,
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::Malformed { .. } | FetchError::Auth(_) => false,
        }
    }

    pub fn to_load_failure(&self) -> LoadFailure {
        LoadFailure {
            message: self.to_string(),
            retryable: self.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        let timeout = FetchError::Timeout {
            endpoint: "/user",
            after: Duration::from_secs(10),
        };
        assert!(timeout.is_timeout());
        assert!(timeout.is_retryable());

        let bad_gateway = FetchError::Status { endpoint: "/user", status: 502 };
        assert!(bad_gateway.is_retryable());

        let not_found = FetchError::Status { endpoint: "/user", status: 404 };
        assert!(!not_found.is_retryable());

        let malformed = FetchError::Malformed {
            endpoint: "/user",
            reason: "missing field `user`".to_string(),
        };
        let failure = malformed.to_load_failure();
        assert!(!failure.retryable);
        assert!(failure.message.contains("missing field"));
    }
}
