//! Extraction pipeline orchestration
//!
//! `ExtractionService` is the single entry point of the core: raw PDF bytes
//! in, deduplicated `{service, details}` records out. It wires the stages
//! in strict forward order — text extraction, candidate location, pooled
//! classification, response parsing, deduplication — with no feedback
//! between stages.
//!
//! # Example
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
//! for record in &report.services {
//!     println!("{}: {}", record.service, record.details);
//! }
//! # Ok(())
//! # }
//! ```

use crate::ai::backend::ClassifierBackend;
use crate::extraction::locator::{locate_windows, DEFAULT_TRIGGER_PHRASE};
use crate::extraction::pdf::{extract_pages, DocumentError};
use crate::extraction::pool::{classify_windows, PoolOptions};
use crate::extraction::response::{parse_response, DEFAULT_DISCARD_MARKER};
use crate::extraction::types::{ExtractionReport, PageText, ServiceRecord, WindowFailure};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that fail a whole pipeline invocation.
///
/// Classification and parse failures do not appear here: they are isolated
/// per window and reported through [`ExtractionReport::failures`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input bytes are not a readable PDF document.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Pipeline-scoped configuration, passed into the constructor once.
///
/// There is no ambient lookup: everything the pipeline depends on beyond
/// the backend itself lives here.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Literal substring flagging candidate pages.
    pub trigger_phrase: String,
    /// Literal token signaling "no specific service in this window".
    pub discard_marker: String,
    /// Worker pool sizing and retry policy.
    pub pool: PoolOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            trigger_phrase: DEFAULT_TRIGGER_PHRASE.to_string(),
            discard_marker: DEFAULT_DISCARD_MARKER.to_string(),
            pool: PoolOptions::default(),
        }
    }
}

/// High-level extraction service owning the backend handle and pipeline
/// configuration for the life of the process.
pub struct ExtractionService {
    backend: Arc<dyn ClassifierBackend>,
    config: PipelineConfig,
}

impl ExtractionService {
    pub fn new(backend: Arc<dyn ClassifierBackend>, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    /// Runs the full pipeline on raw PDF bytes.
    ///
    /// Fails only if the document itself cannot be parsed; per-window
    /// classification and parse failures are collected in the report.
    pub async fn process(&self, bytes: &[u8]) -> Result<ExtractionReport, PipelineError> {
        let pages = extract_pages(bytes)?;
        Ok(self.process_pages(pages).await)
    }

    /// Runs the pipeline from already-extracted page text.
    ///
    /// Useful when the caller has its own text extraction, and for tests.
    pub async fn process_pages(&self, pages: PageText) -> ExtractionReport {
        let start = Instant::now();
        let page_count = pages.page_count();

        let windows = locate_windows(&pages, &self.config.trigger_phrase);
        let windows_submitted = windows.len();

        let outcomes =
            classify_windows(Arc::clone(&self.backend), &pages, &windows, &self.config.pool)
                .await;

        // Records accumulate in classification completion order; dedup
        // below keeps the first occurrence of each service name.
        let mut records = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(response) => {
                    match parse_response(&response, &self.config.discard_marker) {
                        Ok(parsed) => records.extend(parsed),
                        Err(e) => {
                            warn!("Window {} produced an unparseable response: {}", outcome.window, e);
                            failures.push(WindowFailure {
                                window: outcome.window,
                                stage: "parse".to_string(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
                Err(e) => {
                    warn!("Window {} failed classification: {}", outcome.window, e);
                    failures.push(WindowFailure {
                        window: outcome.window,
                        stage: "classify".to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let services = dedup_records(records);

        let report = ExtractionReport {
            services,
            failures,
            page_count,
            windows_submitted,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Extraction finished: {} service(s), {} window(s), {} failure(s) in {}ms",
            report.services.len(),
            report.windows_submitted,
            report.failures.len(),
            report.processing_time_ms
        );
        report
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

/// Collapses records sharing the same service name, keeping the first seen.
///
/// The key comparison is exact and case-sensitive. Later records with the
/// same name are dropped even if their details differ or are more complete;
/// no merging of competing descriptions is attempted.
pub fn dedup_records(records: Vec<ServiceRecord>) -> Vec<ServiceRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.service.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(service: &str, details: &str) -> ServiceRecord {
        ServiceRecord {
            service: service.to_string(),
            details: details.to_string(),
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let records = vec![
            record("MRI", "first description"),
            record("CT Scan", "imaging"),
            record("MRI", "second, longer, better description"),
        ];
        let deduped = dedup_records(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].service, "MRI");
        assert_eq!(deduped[0].details, "first description");
        assert_eq!(deduped[1].service, "CT Scan");
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let records = vec![record("MRI", "a"), record("mri", "b")];
        assert_eq!(dedup_records(records).len(), 2);
    }

    #[test]
    fn test_dedup_preserves_order() {
        let records = vec![record("C", "1"), record("A", "2"), record("B", "3")];
        let services: Vec<String> = dedup_records(records)
            .into_iter()
            .map(|r| r.service)
            .collect();
        assert_eq!(services, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_dedup_never_grows_the_list() {
        let records = vec![
            record("A", "1"),
            record("A", "2"),
            record("A", "3"),
        ];
        let input_len = records.len();
        assert!(dedup_records(records).len() <= input_len);
    }

    #[test]
    fn test_dedup_empty_input() {
        assert!(dedup_records(Vec::new()).is_empty());
    }
}
