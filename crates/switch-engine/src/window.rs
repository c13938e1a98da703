//! The bounded "sliding window" view over the filtered candidate list.

/// A contiguous slice of the candidate list chosen for display, plus the
/// selection translated into slice-local coordinates.
///
/// Pure function of `(count, selected, max_visible)`; recomputed on every
/// update and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    /// Offset of the first visible candidate.
    pub start: usize,
    /// Number of visible candidates.
    pub len: usize,
    /// Selection index relative to `start`.
    pub selected_in_window: usize,
}

impl DisplayWindow {
    /// Compute the window over `count` candidates with `selected` chosen.
    ///
    /// When everything fits, the window is the whole list and the selection
    /// index is unchanged. Otherwise the start offset is
    /// `clamp(selected - max_visible/2, 0, count - max_visible)`, keeping the
    /// selection visible and centered when possible.
    pub fn compute(count: usize, selected: usize, max_visible: usize) -> Self {
        // A zero capacity would render nothing and divide the centering by
        // zero's neighborhood; treat it as one.
        let max_visible = max_visible.max(1);
        if count <= max_visible {
            return Self {
                start: 0,
                len: count,
                selected_in_window: selected,
            };
        }
        let half = max_visible / 2;
        let start = selected.saturating_sub(half).min(count - max_visible);
        Self {
            start,
            len: max_visible,
            selected_in_window: selected - start,
        }
    }

    /// The exclusive end offset of the window.
    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_list_when_it_fits() {
        let w = DisplayWindow::compute(5, 3, 7);
        assert_eq!(w, DisplayWindow { start: 0, len: 5, selected_in_window: 3 });
        let w = DisplayWindow::compute(7, 0, 7);
        assert_eq!(w.start, 0);
        assert_eq!(w.len, 7);
    }

    #[test]
    fn clamps_at_the_tail() {
        // 8 apps, capacity 7, last selected: start clamps to 1, window is
        // the last seven items, selection lands at slot 5... sixth slot.
        let w = DisplayWindow::compute(8, 6, 7);
        assert_eq!(w.start, 1);
        assert_eq!(w.end(), 8);
        assert_eq!(w.selected_in_window, 5);
    }

    #[test]
    fn clamps_at_the_head() {
        let w = DisplayWindow::compute(20, 1, 7);
        assert_eq!(w.start, 0);
        assert_eq!(w.selected_in_window, 1);
    }

    #[test]
    fn centers_in_the_middle() {
        let w = DisplayWindow::compute(20, 10, 7);
        assert_eq!(w.start, 7);
        assert_eq!(w.selected_in_window, 3);
    }

    #[test]
    fn zero_capacity_is_treated_as_one() {
        let w = DisplayWindow::compute(4, 2, 0);
        assert_eq!(w.len, 1);
        assert_eq!(w.start, 2);
        assert_eq!(w.selected_in_window, 0);
    }

    #[test]
    fn empty_list_yields_empty_window() {
        let w = DisplayWindow::compute(0, 0, 7);
        assert_eq!(w.len, 0);
        assert_eq!(w.start, 0);
    }
}
