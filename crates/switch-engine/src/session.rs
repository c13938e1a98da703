//! Transient state of one open switcher session.

use tracing::debug;

use crate::{AppInfo, DisplayWindow, OverlayFrame};

/// State that exists only while the overlay is visible: the typed filter,
/// the filtered candidate list, and the selection.
///
/// Invariant: `selected < candidates.len()` whenever `candidates` is
/// non-empty; when empty, `selected` is pinned to 0 and has no display
/// meaning.
#[derive(Debug, Clone)]
pub struct SwitchSession {
    /// Full running-application snapshot taken when the session opened.
    snapshot: Vec<AppInfo>,
    /// The filter text as typed so far (always lowercase).
    filter: String,
    /// Candidates matching the filter; an order-preserving subsequence of
    /// `snapshot`.
    candidates: Vec<AppInfo>,
    /// Selection index into `candidates`.
    selected: usize,
}

impl SwitchSession {
    /// Open a session over a fresh snapshot with an empty filter.
    pub fn open(snapshot: Vec<AppInfo>) -> Self {
        let candidates = snapshot.clone();
        Self {
            snapshot,
            filter: String::new(),
            candidates,
            selected: 0,
        }
    }

    /// The current filter text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The current candidate list.
    pub fn candidates(&self) -> &[AppInfo] {
        &self.candidates
    }

    /// The globally-selected candidate, if any.
    pub fn selected_app(&self) -> Option<&AppInfo> {
        self.candidates.get(self.selected)
    }

    /// The selection index into the full candidate list.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Append a typed character to the filter and re-run filtering.
    pub fn push_char(&mut self, c: char, fuzzy: bool) {
        self.filter.extend(c.to_lowercase());
        self.refilter(fuzzy);
    }

    /// Remove the last filter character, if any, and re-run filtering.
    /// Returns false when the filter was already empty.
    pub fn pop_char(&mut self, fuzzy: bool) -> bool {
        if self.filter.pop().is_none() {
            return false;
        }
        self.refilter(fuzzy);
        true
    }

    /// Recompute `candidates` from the snapshot against the current filter.
    ///
    /// Snapshot order is preserved. The previous selection is kept when its
    /// process is still present in the new list; otherwise the selection
    /// resets to the top.
    fn refilter(&mut self, fuzzy: bool) {
        let previous = self.selected_app().map(|app| app.pid);
        if self.filter.is_empty() {
            self.candidates = self.snapshot.clone();
        } else {
            self.candidates = self
                .snapshot
                .iter()
                .filter(|app| {
                    let name = app.name.to_lowercase();
                    if fuzzy {
                        name.contains(&self.filter)
                    } else {
                        name.starts_with(&self.filter)
                    }
                })
                .cloned()
                .collect();
        }
        self.selected = previous
            .and_then(|pid| self.candidates.iter().position(|app| app.pid == pid))
            .unwrap_or(0);
        debug!(
            filter = %self.filter,
            candidates = self.candidates.len(),
            selected = self.selected,
            "refiltered"
        );
    }

    /// Move the selection one step, wrapping around. No-op when the
    /// candidate list is empty.
    pub fn cycle(&mut self, forward: bool) {
        let count = self.candidates.len();
        if count == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % count
        } else {
            (self.selected + count - 1) % count
        };
    }

    /// The immutable frame to hand to the overlay presenter, windowed to
    /// `max_visible` items.
    pub fn frame(&self, max_visible: usize) -> OverlayFrame {
        let window = DisplayWindow::compute(self.candidates.len(), self.selected, max_visible);
        OverlayFrame {
            items: self.candidates[window.start..window.end()].to_vec(),
            selected: window.selected_in_window,
            filter: self.filter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(pid: i32, name: &str) -> AppInfo {
        AppInfo {
            pid,
            bundle_id: format!("com.example.{}", name.to_lowercase()),
            name: name.into(),
        }
    }

    fn session(names: &[&str]) -> SwitchSession {
        let snapshot = names
            .iter()
            .enumerate()
            .map(|(i, n)| app(i as i32 + 1, n))
            .collect();
        SwitchSession::open(snapshot)
    }

    #[test]
    fn opens_with_full_snapshot_and_top_selection() {
        let s = session(&["Finder", "Mail", "Music"]);
        assert_eq!(s.candidates().len(), 3);
        assert_eq!(s.selected_app().map(|a| a.name.as_str()), Some("Finder"));
    }

    #[test]
    fn prefix_filter_preserves_snapshot_order() {
        let mut s = session(&["Finder", "Mail", "Music", "Firefox"]);
        s.push_char('f', false);
        s.push_char('i', false);
        let names: Vec<&str> = s.candidates().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Finder", "Firefox"]);
    }

    #[test]
    fn selection_resets_when_selected_app_filtered_out() {
        let mut s = session(&["Finder", "Mail", "Music", "Firefox"]);
        s.cycle(true); // Mail
        assert_eq!(s.selected_app().map(|a| a.name.as_str()), Some("Mail"));
        s.push_char('f', false);
        s.push_char('i', false);
        assert_eq!(s.selected_index(), 0);
        assert_eq!(s.selected_app().map(|a| a.name.as_str()), Some("Finder"));
    }

    #[test]
    fn selection_sticks_to_surviving_app() {
        let mut s = session(&["Finder", "Firefox", "Mail"]);
        s.cycle(true); // Firefox
        s.push_char('f', false);
        assert_eq!(s.selected_app().map(|a| a.name.as_str()), Some("Firefox"));
        assert_eq!(s.selected_index(), 1);
    }

    #[test]
    fn fuzzy_matches_substrings() {
        let mut s = session(&["Finder", "Mail", "Music", "Firefox"]);
        s.push_char('i', true);
        let names: Vec<&str> = s.candidates().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Finder", "Mail", "Music", "Firefox"]);
        s.push_char('r', true);
        let names: Vec<&str> = s.candidates().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Firefox"]);
    }

    #[test]
    fn backspace_restores_wider_matches() {
        let mut s = session(&["Finder", "Firefox"]);
        s.push_char('f', false);
        s.push_char('i', false);
        s.push_char('r', false);
        assert_eq!(s.candidates().len(), 1);
        assert!(s.pop_char(false));
        assert_eq!(s.candidates().len(), 2);
        // Popping an empty filter reports false and changes nothing.
        assert!(s.pop_char(false));
        assert!(s.pop_char(false));
        assert!(!s.pop_char(false));
    }

    #[test]
    fn cycle_wraps_both_directions() {
        let mut s = session(&["A", "B", "C"]);
        s.cycle(false);
        assert_eq!(s.selected_index(), 2);
        s.cycle(true);
        assert_eq!(s.selected_index(), 0);
    }

    #[test]
    fn cycle_on_empty_candidates_is_a_noop() {
        let mut s = session(&["Mail"]);
        s.push_char('z', false);
        assert!(s.candidates().is_empty());
        s.cycle(true);
        assert_eq!(s.selected_index(), 0);
    }

    #[test]
    fn frame_windows_the_candidates() {
        let mut s = session(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        for _ in 0..6 {
            s.cycle(true);
        }
        let frame = s.frame(7);
        let names: Vec<&str> = frame.items.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "D", "E", "F", "G", "H"]);
        assert_eq!(frame.selected, 5);
    }
}
