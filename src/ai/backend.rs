//! Classifier backend abstraction
//!
//! This module provides the core trait and error types for implementing
//! text-classification backends. All backends must implement the
//! `ClassifierBackend` trait so the extraction pipeline can treat the
//! classification capability as an injected collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during backend operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendError {
    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Authentication failed or credentials are invalid
    AuthenticationError { message: String },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Rate limit exceeded, retry after the specified duration (in seconds)
    RateLimitError { retry_after: Option<u64> },

    /// Invalid or malformed response from the classifier
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// Configuration error (missing API keys, invalid settings, etc.)
    ConfigurationError { message: String },

    /// Network-related error
    NetworkError { message: String },

    /// Generic error for other cases
    Other { message: String },
}

impl BackendError {
    /// Whether a retry of the same call could plausibly succeed.
    ///
    /// Timeouts, rate limits, network failures, and 5xx responses are
    /// transient; authentication and configuration problems are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::TimeoutError { .. }
            | BackendError::RateLimitError { .. }
            | BackendError::NetworkError { .. } => true,
            BackendError::ApiError { status_code, .. } => {
                matches!(status_code, Some(code) if *code >= 500)
            }
            _ => false,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::AuthenticationError { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::RateLimitError { retry_after } => {
                if let Some(seconds) = retry_after {
                    write!(f, "Rate limit exceeded, retry after {} seconds", seconds)
                } else {
                    write!(f, "Rate limit exceeded")
                }
            }
            BackendError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from classifier: {}", message)
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BackendError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Core trait that all classification backends must implement
///
/// The pipeline submits one call per context window: a fixed system
/// instruction plus a task prompt ending with the window's text. The
/// backend returns the classifier's raw response text; interpretation of
/// that text belongs to the response parser, not the backend.
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    /// Sends one classification request and returns the raw response text.
    ///
    /// # Arguments
    ///
    /// * `system_instruction` - Fixed instruction establishing the
    ///   classifier's persona and objective
    /// * `task_prompt` - Task prompt with the window text appended
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the call fails, times out, or the response
    /// carries no text content.
    async fn classify(
        &self,
        system_instruction: &str,
        task_prompt: &str,
    ) -> Result<String, BackendError>;

    /// Returns the human-readable name of this backend
    fn name(&self) -> &str;

    /// Returns optional model information for this backend
    fn model_info(&self) -> Option<String> {
        None
    }
}
