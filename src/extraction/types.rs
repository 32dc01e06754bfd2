use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered per-page plain text of one document.
///
/// Index 0 is the first page. Immutable once produced by the extractor;
/// the locator and the worker pool only ever read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pages: Vec<String>,
}

impl PageText {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|s| s.as_str())
    }

    /// Concatenates the three pages of a window in prev, cur, next order
    /// with no separator.
    ///
    /// The window is expected to be clamped; out-of-range indices would be
    /// a locator bug and contribute nothing here.
    pub fn window_text(&self, window: &ContextWindow) -> String {
        let mut text = String::new();
        for index in [window.prev, window.cur, window.next] {
            if let Some(page) = self.page(index) {
                text.push_str(page);
            }
        }
        text
    }
}

impl From<Vec<String>> for PageText {
    fn from(pages: Vec<String>) -> Self {
        Self::new(pages)
    }
}

/// A three-page span around one page that contains the trigger phrase.
///
/// All indices are clamped to `[0, page_count - 1]`, so `prev == cur` on the
/// first page and `next == cur` on the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub prev: usize,
    pub cur: usize,
    pub next: usize,
}

impl ContextWindow {
    /// Builds the clamped window around `cur` for a document of `page_count`
    /// pages. `cur` must itself be a valid page index.
    pub fn around(cur: usize, page_count: usize) -> Self {
        debug_assert!(cur < page_count);
        Self {
            prev: cur.saturating_sub(1),
            cur,
            next: (cur + 1).min(page_count.saturating_sub(1)),
        }
    }
}

impl fmt::Display for ContextWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pages {}..={} (hit on {})", self.prev, self.next, self.cur)
    }
}

/// One covered service requiring Prior Authorization, as extracted from a
/// classifier response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Service name. Non-empty; the deduplication key (case-sensitive,
    /// exact match).
    pub service: String,
    /// Description of the service including the Prior Authorization
    /// stipulations the classifier quoted.
    pub details: String,
}

impl fmt::Display for ServiceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.service, self.details)
    }
}

/// A window whose classification or parsing failed after retries.
///
/// Failures are captured per window so one bad response does not void the
/// rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowFailure {
    pub window: ContextWindow,
    /// Which stage failed: "classify" or "parse".
    pub stage: String,
    pub error: String,
}

/// Final output of one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Deduplicated services, first-seen-in-completion-order.
    pub services: Vec<ServiceRecord>,
    /// Windows that failed classification or parsing.
    pub failures: Vec<WindowFailure>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// Number of context windows submitted for classification.
    pub windows_submitted: usize,
    /// Wall-clock time for the whole invocation.
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clamps_at_first_page() {
        let w = ContextWindow::around(0, 5);
        assert_eq!(w, ContextWindow { prev: 0, cur: 0, next: 1 });
    }

    #[test]
    fn test_window_clamps_at_last_page() {
        let w = ContextWindow::around(4, 5);
        assert_eq!(w, ContextWindow { prev: 3, cur: 4, next: 4 });
    }

    #[test]
    fn test_window_interior_page() {
        let w = ContextWindow::around(2, 5);
        assert_eq!(w, ContextWindow { prev: 1, cur: 2, next: 3 });
    }

    #[test]
    fn test_window_single_page_document() {
        let w = ContextWindow::around(0, 1);
        assert_eq!(w, ContextWindow { prev: 0, cur: 0, next: 0 });
    }

    #[test]
    fn test_window_text_concatenates_without_separator() {
        let pages = PageText::new(vec!["a".into(), "b".into(), "c".into()]);
        let w = ContextWindow::around(1, 3);
        assert_eq!(pages.window_text(&w), "abc");
    }

    #[test]
    fn test_window_text_repeats_clamped_page() {
        // On page 0 of a 2-page document, prev == cur, so page 0 is
        // concatenated twice. Matches the clamping contract.
        let pages = PageText::new(vec!["x".into(), "y".into()]);
        let w = ContextWindow::around(0, 2);
        assert_eq!(pages.window_text(&w), "xxy");
    }

    #[test]
    fn test_report_completeness_tracks_failures() {
        let mut report = ExtractionReport {
            services: vec![],
            failures: vec![],
            page_count: 1,
            windows_submitted: 1,
            processing_time_ms: 0,
        };
        assert!(report.is_complete());

        report.failures.push(WindowFailure {
            window: ContextWindow { prev: 0, cur: 0, next: 0 },
            stage: "classify".to_string(),
            error: "timeout".to_string(),
        });
        assert!(!report.is_complete());
    }

    #[test]
    fn test_service_record_serializes() {
        let record = ServiceRecord {
            service: "Ambulance".to_string(),
            details: "Ground transport.".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"service\":\"Ambulance\""));
        assert!(json.contains("\"details\":\"Ground transport.\""));
    }
}
