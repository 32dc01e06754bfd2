//! priorscan - LLM-powered extraction of Prior Authorization requirements
//!
//! This library extracts, from an insurance policy PDF, the set of covered
//! services that require Prior Authorization, producing a structured,
//! deduplicated list of `{service, details}` records.
//!
//! # Core Concepts
//!
//! - **Text extraction**: per-page plain text from PDF bytes
//! - **Candidate location**: pages containing the trigger phrase, each
//!   yielding a clamped three-page context window
//! - **Classification**: one LLM call per window through a pluggable
//!   backend, run with bounded concurrency
//! - **Response parsing**: a strict grammar for the classifier's
//!   `{'Service': ..., 'Details': ...}` record blocks
//! - **Deduplication**: first-seen record wins per service name
//!
//! # Example Usage
//!
//! ```no_run
//! use priorscan::ai::genai_backend::{GenAIBackend, Provider};
//! use priorscan::extraction::service::{ExtractionService, PipelineConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = GenAIBackend::new(Provider::Ollama, "qwen2.5:7b".to_string())?;
//! let service = ExtractionService::new(Arc::new(backend), PipelineConfig::default());
//!
//! let bytes = std::fs::read("policy.pdf")?;
//! let report = service.process(&bytes).await?;
//!
//! for record in &report.services {
//!     println!("{}: {}", record.service, record.details);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`ai`]: classifier backend abstraction and the genai implementation
//! - [`extraction`]: the pipeline stages and orchestration
//! - [`config`]: process-level configuration from the environment
//! - [`cli`]: command-line interface
//! - [`util`]: logging setup

// Public modules
pub mod ai;
pub mod cli;
pub mod config;
pub mod extraction;
pub mod util;

// Re-export key types for convenient access
pub use ai::backend::{BackendError, ClassifierBackend};
pub use ai::genai_backend::{GenAIBackend, Provider};
pub use config::{ConfigError, PriorscanConfig};
pub use extraction::service::{ExtractionService, PipelineConfig, PipelineError};
pub use extraction::types::{
    ContextWindow, ExtractionReport, PageText, ServiceRecord, WindowFailure,
};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_priorscan() {
        assert_eq!(NAME, "priorscan");
    }
}
