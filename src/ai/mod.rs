//! Classifier backend integrations
//!
//! This module provides the abstraction and implementations for the LLM
//! backends that power Prior Authorization classification.

pub mod backend;
pub mod genai_backend;

// Re-export commonly used types
pub use backend::{BackendError, ClassifierBackend};
pub use genai_backend::{GenAIBackend, Provider};
