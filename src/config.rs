//! Configuration management for priorscan
//!
//! Settings are loaded once at startup from environment variables with
//! sensible defaults, validated, and then passed explicitly into the
//! pipeline; the pipeline itself never reads ambient state.
//!
//! # Environment Variables
//!
//! - `PRIORSCAN_PROVIDER`: Provider selection (ollama|openai|claude|gemini|grok|groq) - default: "ollama"
//! - `PRIORSCAN_MODEL`: Model name (provider-specific) - default: "qwen2.5:7b"
//! - `PRIORSCAN_TRIGGER_PHRASE`: Candidate page trigger - default: "Prior Authorization"
//! - `PRIORSCAN_DISCARD_MARKER`: Classifier discard token - default: "NA"
//! - `PRIORSCAN_POOL_WIDTH`: Concurrent classification calls - default: "8"
//! - `PRIORSCAN_MAX_ATTEMPTS`: Attempts per classification call - default: "3"
//! - `PRIORSCAN_REQUEST_TIMEOUT`: Timeout in seconds - default: "60"
//! - `PRIORSCAN_MAX_TOKENS`: Max response tokens - default: "1500"
//! - `PRIORSCAN_LOG_LEVEL`: Logging level - default: "info"
//!
//! Provider credentials are read directly by the genai library:
//! `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GOOGLE_API_KEY`, `XAI_API_KEY`,
//! `GROQ_API_KEY`, and `OLLAMA_HOST` for local inference.

use crate::ai::backend::BackendError;
use crate::ai::genai_backend::{GenAIBackend, Provider};
use crate::extraction::locator::DEFAULT_TRIGGER_PHRASE;
use crate::extraction::pool::{PoolOptions, DEFAULT_MAX_ATTEMPTS, DEFAULT_POOL_WIDTH};
use crate::extraction::response::DEFAULT_DISCARD_MARKER;
use crate::extraction::service::PipelineConfig;
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "qwen2.5:7b";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid provider name
    #[error("{0}")]
    InvalidProvider(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Backend initialization failed
    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

/// Main configuration structure for priorscan
///
/// Created once per process, immutable thereafter. Use
/// [`PriorscanConfig::from_env`] to load it, then [`validate`] and
/// [`create_backend`]/[`pipeline`] to wire up the service.
///
/// [`validate`]: PriorscanConfig::validate
/// [`create_backend`]: PriorscanConfig::create_backend
/// [`pipeline`]: PriorscanConfig::pipeline
#[derive(Debug, Clone)]
pub struct PriorscanConfig {
    /// LLM provider for classification
    pub provider: Provider,

    /// Model name (provider-specific)
    pub model: String,

    /// Literal substring flagging candidate pages
    pub trigger_phrase: String,

    /// Literal token signaling a non-applicable window
    pub discard_marker: String,

    /// Number of concurrent in-flight classification calls
    pub pool_width: usize,

    /// Bounded attempts per classification call
    pub max_attempts: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum tokens for a classifier response
    pub max_tokens: u32,
}

impl Default for PriorscanConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Ollama,
            model: DEFAULT_MODEL.to_string(),
            trigger_phrase: DEFAULT_TRIGGER_PHRASE.to_string(),
            discard_marker: DEFAULT_DISCARD_MARKER.to_string(),
            pool_width: DEFAULT_POOL_WIDTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl PriorscanConfig {
    /// Loads configuration from `PRIORSCAN_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(provider) = env::var("PRIORSCAN_PROVIDER") {
            config.provider = provider
                .parse()
                .map_err(ConfigError::InvalidProvider)?;
        }
        if let Ok(model) = env::var("PRIORSCAN_MODEL") {
            config.model = model;
        }
        if let Ok(phrase) = env::var("PRIORSCAN_TRIGGER_PHRASE") {
            config.trigger_phrase = phrase;
        }
        if let Ok(marker) = env::var("PRIORSCAN_DISCARD_MARKER") {
            config.discard_marker = marker;
        }
        if let Ok(width) = env::var("PRIORSCAN_POOL_WIDTH") {
            config.pool_width = parse_field("PRIORSCAN_POOL_WIDTH", &width)?;
        }
        if let Ok(attempts) = env::var("PRIORSCAN_MAX_ATTEMPTS") {
            config.max_attempts = parse_field("PRIORSCAN_MAX_ATTEMPTS", &attempts)?;
        }
        if let Ok(timeout) = env::var("PRIORSCAN_REQUEST_TIMEOUT") {
            config.request_timeout_secs = parse_field("PRIORSCAN_REQUEST_TIMEOUT", &timeout)?;
        }
        if let Ok(tokens) = env::var("PRIORSCAN_MAX_TOKENS") {
            config.max_tokens = parse_field("PRIORSCAN_MAX_TOKENS", &tokens)?;
        }

        Ok(config)
    }

    /// Checks the configuration for values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model name cannot be empty".to_string(),
            ));
        }
        if self.trigger_phrase.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "trigger phrase cannot be empty".to_string(),
            ));
        }
        if self.discard_marker.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "discard marker cannot be empty".to_string(),
            ));
        }
        if self.pool_width == 0 {
            return Err(ConfigError::ValidationFailed(
                "pool width must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "max attempts must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "request timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates the classifier backend described by this configuration.
    pub fn create_backend(&self) -> Result<GenAIBackend, ConfigError> {
        let backend = GenAIBackend::with_config(
            self.provider,
            self.model.clone(),
            Some(Duration::from_secs(self.request_timeout_secs)),
            Some(self.max_tokens),
        )?;
        Ok(backend)
    }

    /// The pipeline-scoped subset of this configuration.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            trigger_phrase: self.trigger_phrase.clone(),
            discard_marker: self.discard_marker.clone(),
            pool: PoolOptions {
                width: self.pool_width,
                max_attempts: self.max_attempts,
                ..PoolOptions::default()
            },
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::ParseError {
        field: field.to_string(),
        error: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PriorscanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, Provider::Ollama);
        assert_eq!(config.trigger_phrase, "Prior Authorization");
        assert_eq!(config.discard_marker, "NA");
        assert_eq!(config.pool_width, 8);
        assert_eq!(config.max_tokens, 1500);
    }

    #[test]
    fn test_zero_pool_width_is_rejected() {
        let config = PriorscanConfig {
            pool_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_empty_trigger_phrase_is_rejected() {
        let config = PriorscanConfig {
            trigger_phrase: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_discard_marker_is_rejected() {
        let config = PriorscanConfig {
            discard_marker: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pipeline_subset_carries_pool_width() {
        let config = PriorscanConfig {
            pool_width: 3,
            ..Default::default()
        };
        let pipeline = config.pipeline();
        assert_eq!(pipeline.pool.width, 3);
        assert_eq!(pipeline.trigger_phrase, "Prior Authorization");
    }

    #[test]
    fn test_pipeline_subset_carries_retry_bound() {
        let config = PriorscanConfig {
            max_attempts: 1,
            ..Default::default()
        };
        assert_eq!(config.pipeline().pool.max_attempts, 1);

        let config = PriorscanConfig {
            max_attempts: 5,
            ..Default::default()
        };
        assert_eq!(config.pipeline().pool.max_attempts, 5);
    }

    #[test]
    fn test_parse_field_error_names_the_field() {
        let err = parse_field::<usize>("PRIORSCAN_POOL_WIDTH", "lots").unwrap_err();
        assert!(err.to_string().contains("PRIORSCAN_POOL_WIDTH"));
    }
}
