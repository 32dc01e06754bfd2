//! The Prior Authorization extraction pipeline
//!
//! Stages run in strict forward order:
//!
//! 1. [`pdf`] — per-page text extraction from PDF bytes
//! 2. [`locator`] — trigger phrase scan producing clamped context windows
//! 3. [`pool`] — bounded-concurrency classification of each window
//! 4. [`response`] — parsing classifier responses into service records
//! 5. [`service`] — orchestration and first-wins deduplication

pub mod locator;
pub mod pdf;
pub mod pool;
pub mod prompt;
pub mod response;
pub mod service;
pub mod types;

pub use locator::{locate_windows, DEFAULT_TRIGGER_PHRASE};
pub use pdf::{extract_pages, DocumentError};
pub use pool::{PoolOptions, DEFAULT_POOL_WIDTH};
pub use response::{parse_response, RecordParseError, DEFAULT_DISCARD_MARKER};
pub use service::{dedup_records, ExtractionService, PipelineConfig, PipelineError};
pub use types::{ContextWindow, ExtractionReport, PageText, ServiceRecord, WindowFailure};
