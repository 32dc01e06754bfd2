//! Bounded-concurrency classification pool
//!
//! Submits one classification call per context window to the injected
//! backend, with a fixed number of in-flight calls. Results are collected
//! in completion order, which is non-deterministic across runs; downstream
//! deduplication must not rely on submission order.
//!
//! Failures are captured per window. Retryable backend errors (timeouts,
//! rate limits, network faults, 5xx) are retried with exponential backoff,
//! bounded by `max_attempts`; the retry is scoped to the single call, never
//! the whole batch.

use crate::ai::backend::{BackendError, ClassifierBackend};
use crate::extraction::prompt::{build_task_prompt, SYSTEM_INSTRUCTION};
use crate::extraction::types::{ContextWindow, PageText};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

/// Default number of concurrent in-flight classification calls.
pub const DEFAULT_POOL_WIDTH: usize = 8;

/// Default bound on attempts per classification call (1 initial + retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff between attempts.
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Tuning knobs for the classification pool.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum concurrent in-flight calls.
    pub width: usize,
    /// Maximum attempts per call, counting the first.
    pub max_attempts: u32,
    /// Base backoff delay; doubles per retry.
    pub base_backoff: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_POOL_WIDTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: DEFAULT_BASE_BACKOFF,
        }
    }
}

/// The outcome of classifying one window: the raw response text, or the
/// last backend error after retries were exhausted.
#[derive(Debug)]
pub struct WindowOutcome {
    pub window: ContextWindow,
    pub result: Result<String, BackendError>,
}

/// Classifies every window concurrently and returns outcomes in completion
/// order.
///
/// Window text and prompts are built up front; spawned workers only hold
/// their own prompt string and a shared handle to the backend. The returned
/// vector has one entry per input window.
pub async fn classify_windows(
    backend: Arc<dyn ClassifierBackend>,
    pages: &PageText,
    windows: &[ContextWindow],
    options: &PoolOptions,
) -> Vec<WindowOutcome> {
    if windows.is_empty() {
        return Vec::new();
    }

    info!(
        "Classifying {} window(s) with {} using pool width {}",
        windows.len(),
        backend.name(),
        options.width
    );

    let semaphore = Arc::new(Semaphore::new(options.width.max(1)));
    let (tx, mut rx) = mpsc::channel::<WindowOutcome>(windows.len());

    for window in windows.iter().copied() {
        let prompt = build_task_prompt(&pages.window_text(&window));
        let backend = Arc::clone(&backend);
        let semaphore = Arc::clone(&semaphore);
        let tx = tx.clone();
        let max_attempts = options.max_attempts;
        let base_backoff = options.base_backoff;

        tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                // Only happens if the semaphore is closed, which we never do.
                Err(_) => return,
            };
            let result =
                classify_with_retry(backend.as_ref(), &prompt, max_attempts, base_backoff).await;
            let _ = tx.send(WindowOutcome { window, result }).await;
        });
    }

    // Drop our sender so rx closes once all workers have reported.
    drop(tx);

    let mut outcomes = Vec::with_capacity(windows.len());
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }
    outcomes
}

/// Runs one classification call with bounded retries on transient errors.
async fn classify_with_retry(
    backend: &dyn ClassifierBackend,
    task_prompt: &str,
    max_attempts: u32,
    base_backoff: Duration,
) -> Result<String, BackendError> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match backend.classify(SYSTEM_INSTRUCTION, task_prompt).await {
            Ok(response) => {
                debug!("Classification succeeded on attempt {}", attempt);
                return Ok(response);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = base_backoff * 2u32.saturating_pow(attempt - 1);
                warn!(
                    "Classification attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(
                    "Classification failed on attempt {}/{}: {}",
                    attempt, max_attempts, e
                );
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that fails with a retryable error a fixed number of times,
    /// then succeeds.
    struct FlakyBackend {
        failures_before_success: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ClassifierBackend for FlakyBackend {
        async fn classify(&self, _system: &str, _prompt: &str) -> Result<String, BackendError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                Err(BackendError::TimeoutError { seconds: 1 })
            } else {
                Ok("NA".to_string())
            }
        }

        fn name(&self) -> &str {
            "Flaky"
        }
    }

    /// Backend that always fails with a non-retryable error.
    struct AuthFailBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ClassifierBackend for AuthFailBackend {
        async fn classify(&self, _system: &str, _prompt: &str) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(BackendError::AuthenticationError {
                message: "invalid key".to_string(),
            })
        }

        fn name(&self) -> &str {
            "AuthFail"
        }
    }

    fn fast_options() -> PoolOptions {
        PoolOptions {
            width: 2,
            max_attempts: 3,
            base_backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_empty_window_list_makes_no_calls() {
        let backend = Arc::new(FlakyBackend {
            failures_before_success: 0,
            calls: AtomicUsize::new(0),
        });
        let pages = PageText::new(vec!["a".into()]);
        let outcomes =
            classify_windows(backend.clone(), &pages, &[], &fast_options()).await;
        assert!(outcomes.is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried_to_success() {
        let backend = Arc::new(FlakyBackend {
            failures_before_success: 2,
            calls: AtomicUsize::new(0),
        });
        let pages = PageText::new(vec!["a".into(), "b".into(), "c".into()]);
        let windows = vec![ContextWindow::around(1, 3)];

        let outcomes =
            classify_windows(backend.clone(), &pages, &windows, &fast_options()).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].result.as_deref().unwrap(), "NA");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let backend = Arc::new(FlakyBackend {
            failures_before_success: 10,
            calls: AtomicUsize::new(0),
        });
        let pages = PageText::new(vec!["a".into()]);
        let windows = vec![ContextWindow::around(0, 1)];

        let outcomes =
            classify_windows(backend.clone(), &pages, &windows, &fast_options()).await;
        assert!(outcomes[0].result.is_err());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_errors_fail_immediately() {
        let backend = Arc::new(AuthFailBackend {
            calls: AtomicUsize::new(0),
        });
        let pages = PageText::new(vec!["a".into()]);
        let windows = vec![ContextWindow::around(0, 1)];

        let outcomes =
            classify_windows(backend.clone(), &pages, &windows, &fast_options()).await;
        assert!(outcomes[0].result.is_err());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_one_failed_window_does_not_void_others() {
        // First window's text triggers failure, second succeeds.
        struct SelectiveBackend;

        #[async_trait]
        impl ClassifierBackend for SelectiveBackend {
            async fn classify(
                &self,
                _system: &str,
                prompt: &str,
            ) -> Result<String, BackendError> {
                if prompt.contains("page-zero") {
                    Err(BackendError::AuthenticationError {
                        message: "boom".to_string(),
                    })
                } else {
                    Ok("{'Service': 'MRI', 'Details': 'Imaging.'}".to_string())
                }
            }

            fn name(&self) -> &str {
                "Selective"
            }
        }

        let pages = PageText::new(vec!["page-zero".into(), "x".into(), "page-two".into()]);
        let windows = vec![ContextWindow::around(0, 3), ContextWindow::around(2, 3)];

        let outcomes = classify_windows(
            Arc::new(SelectiveBackend),
            &pages,
            &windows,
            &fast_options(),
        )
        .await;
        assert_eq!(outcomes.len(), 2);
        let ok = outcomes.iter().filter(|o| o.result.is_ok()).count();
        let err = outcomes.iter().filter(|o| o.result.is_err()).count();
        assert_eq!((ok, err), (1, 1));
    }
}
