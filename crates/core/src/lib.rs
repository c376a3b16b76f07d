//! Shared primitives for all Rust crates in ECA.

#![forbid(unsafe_code)]

/// Session primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{SessionTokens, UserSession};

/// Result type used across ECA crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Backend could not be reached (connect, timeout, offline).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with a non-success HTTP status.
    #[error("backend returned status {status}: {message}")]
    Upstream {
        /// Original HTTP status code.
        status: u16,
        /// Response body or a synthesized description.
        message: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether re-issuing the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Upstream { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }

    /// Returns the original HTTP status when the backend produced one.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns a message suitable for a user-facing notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_transient() {
            return "The service is temporarily unavailable. Please try again.".to_owned();
        }

        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound(_) => "The requested item could not be found.".to_owned(),
            Self::Unauthorized(_) => "Your session has expired. Please sign in again.".to_owned(),
            Self::Forbidden(_) => "You are not allowed to perform this action.".to_owned(),
            _ => "Something went wrong while contacting the service.".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn gateway_and_rate_limit_statuses_are_transient() {
        for status in [429_u16, 502, 503, 504] {
            let error = AppError::Upstream {
                status,
                message: String::new(),
            };
            assert!(error.is_transient(), "status {status}");
        }

        let not_found = AppError::Upstream {
            status: 404,
            message: "missing".to_owned(),
        };
        assert!(!not_found.is_transient());
        assert_eq!(not_found.http_status(), Some(404));
    }

    #[test]
    fn transient_failures_suggest_retry() {
        let error = AppError::Unavailable("connection refused".to_owned());
        assert!(error.user_message().contains("try again"));
    }
}
