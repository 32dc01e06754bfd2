//! Candidate page location
//!
//! Scans per-page text for the trigger phrase and emits one clamped
//! three-page [`ContextWindow`] per matching page. This stage is a pure
//! filter: it identifies where the classifier should look, nothing more.

use crate::extraction::types::{ContextWindow, PageText};
use tracing::debug;

/// Default trigger phrase flagging candidate pages.
pub const DEFAULT_TRIGGER_PHRASE: &str = "Prior Authorization";

/// Finds every page containing `trigger` (exact, case-sensitive substring
/// match) and returns one window per matching page, in ascending page order.
///
/// Multiple occurrences on one page still produce a single window. Adjacent
/// matching pages produce overlapping windows; the deduplicator downstream
/// absorbs the resulting repeats.
pub fn locate_windows(pages: &PageText, trigger: &str) -> Vec<ContextWindow> {
    let page_count = pages.page_count();
    let windows: Vec<ContextWindow> = pages
        .iter()
        .enumerate()
        .filter(|(_, text)| text.contains(trigger))
        .map(|(index, _)| ContextWindow::around(index, page_count))
        .collect();

    debug!(
        "Located {} candidate windows across {} pages",
        windows.len(),
        page_count
    );
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> PageText {
        PageText::new(texts.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_no_match_yields_no_windows() {
        let p = pages(&["routine coverage", "copay schedule", "definitions"]);
        assert!(locate_windows(&p, DEFAULT_TRIGGER_PHRASE).is_empty());
    }

    #[test]
    fn test_single_match_interior_page() {
        let p = pages(&["a", "Prior Authorization applies here", "c"]);
        let windows = locate_windows(&p, DEFAULT_TRIGGER_PHRASE);
        assert_eq!(windows, vec![ContextWindow { prev: 0, cur: 1, next: 2 }]);
    }

    #[test]
    fn test_match_on_first_page_is_clamped() {
        let p = pages(&["Prior Authorization required", "b", "c"]);
        let windows = locate_windows(&p, DEFAULT_TRIGGER_PHRASE);
        assert_eq!(windows, vec![ContextWindow { prev: 0, cur: 0, next: 1 }]);
    }

    #[test]
    fn test_match_on_last_page_is_clamped() {
        let p = pages(&["a", "b", "see Prior Authorization rules"]);
        let windows = locate_windows(&p, DEFAULT_TRIGGER_PHRASE);
        assert_eq!(windows, vec![ContextWindow { prev: 1, cur: 2, next: 2 }]);
    }

    #[test]
    fn test_one_window_per_page_not_per_occurrence() {
        let p = pages(&["Prior Authorization ... Prior Authorization ... Prior Authorization"]);
        let windows = locate_windows(&p, DEFAULT_TRIGGER_PHRASE);
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let p = pages(&["prior authorization", "PRIOR AUTHORIZATION"]);
        assert!(locate_windows(&p, DEFAULT_TRIGGER_PHRASE).is_empty());
    }

    #[test]
    fn test_adjacent_matches_overlap() {
        let p = pages(&[
            "Prior Authorization a",
            "b",
            "Prior Authorization c",
        ]);
        let windows = locate_windows(&p, DEFAULT_TRIGGER_PHRASE);
        assert_eq!(
            windows,
            vec![
                ContextWindow { prev: 0, cur: 0, next: 1 },
                ContextWindow { prev: 1, cur: 2, next: 2 },
            ]
        );
    }

    #[test]
    fn test_windows_emitted_in_ascending_order() {
        let p = pages(&[
            "x",
            "Prior Authorization",
            "x",
            "Prior Authorization",
            "Prior Authorization",
        ]);
        let windows = locate_windows(&p, DEFAULT_TRIGGER_PHRASE);
        let curs: Vec<usize> = windows.iter().map(|w| w.cur).collect();
        assert_eq!(curs, vec![1, 3, 4]);
        for w in &windows {
            assert!(w.prev < 5 && w.cur < 5 && w.next < 5);
            assert!(w.prev <= w.cur && w.cur <= w.next);
        }
    }

    #[test]
    fn test_custom_trigger_phrase() {
        let p = pages(&["preapproval needed", "nothing"]);
        let windows = locate_windows(&p, "preapproval");
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].cur, 0);
    }
}
