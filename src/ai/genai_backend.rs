//! GenAI multi-provider classifier client
//!
//! This module provides a unified interface to multiple LLM providers using
//! the `genai` crate. It supports Ollama, Anthropic Claude, OpenAI, Google
//! Gemini, and other providers through a consistent API.
//!
//! # Example
//!
//! ```no_run
//! use priorscan::ai::backend::ClassifierBackend;
//! use priorscan::ai::genai_backend::{GenAIBackend, Provider};
//! use priorscan::extraction::prompt::{SYSTEM_INSTRUCTION, build_task_prompt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an Ollama client
//! let client = GenAIBackend::new(Provider::Ollama, "qwen2.5:7b".to_string())?;
//!
//! let prompt = build_task_prompt("Ambulance services ... Prior Authorization required.");
//! let response = client.classify(SYSTEM_INSTRUCTION, &prompt).await?;
//! println!("Classifier said: {}", response);
//! # Ok(())
//! # }
//! ```

use crate::ai::backend::{BackendError, ClassifierBackend};
use async_trait::async_trait;
use clap::ValueEnum;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Supported LLM providers
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Ollama local inference
    Ollama,
    /// OpenAI GPT models
    OpenAI,
    /// Anthropic Claude
    Claude,
    /// Google Gemini
    Gemini,
    /// xAI Grok
    Grok,
    /// Groq
    Groq,
}

impl Provider {
    /// Returns the provider prefix for genai model strings
    fn prefix(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::OpenAI => "openai",
            Provider::Claude => "claude",
            Provider::Gemini => "gemini",
            Provider::Grok => "grok",
            Provider::Groq => "groq",
        }
    }

    /// Returns the provider name for logging
    fn name(&self) -> &'static str {
        match self {
            Provider::Ollama => "Ollama",
            Provider::OpenAI => "OpenAI",
            Provider::Claude => "Claude",
            Provider::Gemini => "Gemini",
            Provider::Grok => "Grok",
            Provider::Groq => "Groq",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAI),
            "claude" => Ok(Provider::Claude),
            "gemini" => Ok(Provider::Gemini),
            "grok" => Ok(Provider::Grok),
            "groq" => Ok(Provider::Groq),
            other => Err(format!(
                "Invalid provider: {}. Valid options: ollama, openai, claude, gemini, grok, groq",
                other
            )),
        }
    }
}

/// GenAI-based classifier backend supporting multiple providers
///
/// Credentials are the provider SDK's concern, read once from the
/// environment when the client is created (`OPENAI_API_KEY`,
/// `ANTHROPIC_API_KEY`, `OLLAMA_HOST`, ...); the pipeline itself never
/// touches ambient state.
///
/// # Thread Safety
///
/// This client is thread-safe and can be shared across workers using `Arc`.
pub struct GenAIBackend {
    /// GenAI client instance
    client: Client,

    /// Full model identifier (e.g., "ollama:qwen2.5:7b")
    model: String,

    /// Provider type
    provider: Provider,

    /// Request timeout
    timeout: Duration,

    /// Maximum tokens for response
    max_tokens: Option<u32>,
}

impl GenAIBackend {
    /// Creates a new GenAI backend with default settings
    /// (60 second timeout, 1500 max tokens).
    pub fn new(provider: Provider, model: String) -> Result<Self, BackendError> {
        Self::with_config(provider, model, None, None)
    }

    /// Creates a new GenAI backend with custom configuration
    ///
    /// # Arguments
    ///
    /// * `provider` - LLM provider to use
    /// * `model` - Model name (without provider prefix)
    /// * `timeout` - Optional request timeout
    /// * `max_tokens` - Optional maximum tokens for response
    pub fn with_config(
        provider: Provider,
        model: String,
        timeout: Option<Duration>,
        max_tokens: Option<u32>,
    ) -> Result<Self, BackendError> {
        let client = Client::default();
        let full_model = format!("{}:{}", provider.prefix(), model);

        debug!(
            "Creating GenAI backend: provider={}, model={}",
            provider.name(),
            model,
        );

        Ok(Self {
            client,
            model: full_model,
            provider,
            timeout: timeout.unwrap_or(Duration::from_secs(60)),
            max_tokens,
        })
    }
}

#[async_trait]
impl ClassifierBackend for GenAIBackend {
    async fn classify(
        &self,
        system_instruction: &str,
        task_prompt: &str,
    ) -> Result<String, BackendError> {
        let chat_req = ChatRequest::new(vec![
            ChatMessage::system(system_instruction.to_string()),
            ChatMessage::user(task_prompt.to_string()),
        ]);

        // Temperature 0 for deterministic classification output
        let mut options = ChatOptions::default().with_temperature(0.0);
        if let Some(max_tokens) = self.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }

        debug!(
            "Sending request to {}: prompt_length={}",
            self.provider.name(),
            task_prompt.len()
        );

        let start = std::time::Instant::now();

        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, chat_req, Some(&options)),
        )
        .await
        .map_err(|_| {
            error!(
                "{} request exceeded {}s timeout",
                self.provider.name(),
                self.timeout.as_secs()
            );
            BackendError::TimeoutError {
                seconds: self.timeout.as_secs(),
            }
        })?
        .map_err(|e| {
            error!("{} API error: {}", self.provider.name(), e);
            BackendError::ApiError {
                message: format!("{} request failed: {}", self.provider.name(), e),
                status_code: None,
            }
        })?;

        info!(
            "{} classification completed in {:.2}s",
            self.provider.name(),
            start.elapsed().as_secs_f64()
        );

        let content = response
            .first_text()
            .ok_or_else(|| {
                error!("No text content in {} response", self.provider.name());
                BackendError::InvalidResponse {
                    message: "No text content in response".to_string(),
                    raw_response: None,
                }
            })?
            .to_string();

        debug!(
            "{} response length: {} characters",
            self.provider.name(),
            content.len()
        );

        Ok(content)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}
