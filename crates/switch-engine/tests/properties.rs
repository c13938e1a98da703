//! Property tests over the session and windowing invariants.

use proptest::prelude::*;
use switch_engine::{AppInfo, DisplayWindow, SwitchSession};

fn snapshot(names: Vec<String>) -> Vec<AppInfo> {
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| AppInfo {
            pid: i as i32 + 1,
            bundle_id: format!("com.example.app{i}"),
            name,
        })
        .collect()
}

proptest! {
    #[test]
    fn cycle_back_and_forth_is_identity(
        names in prop::collection::vec("[A-Za-z]{1,12}", 1..20),
        steps in 0usize..40,
    ) {
        let mut s = SwitchSession::open(snapshot(names));
        for _ in 0..steps {
            s.cycle(true);
        }
        let before = s.selected_index();
        s.cycle(true);
        s.cycle(false);
        prop_assert_eq!(s.selected_index(), before);
    }

    #[test]
    fn selection_stays_in_bounds_under_typing(
        names in prop::collection::vec("[a-z]{1,12}", 0..20),
        chars in prop::collection::vec(prop::char::range('a', 'z'), 0..8),
        fuzzy in any::<bool>(),
        cycles in 0usize..10,
    ) {
        let mut s = SwitchSession::open(snapshot(names));
        for _ in 0..cycles {
            s.cycle(true);
        }
        for c in chars {
            s.push_char(c, fuzzy);
            if s.candidates().is_empty() {
                prop_assert_eq!(s.selected_index(), 0);
            } else {
                prop_assert!(s.selected_index() < s.candidates().len());
            }
        }
    }

    #[test]
    fn typing_then_erasing_restores_the_full_list(
        names in prop::collection::vec("[a-z]{1,12}", 0..20),
        chars in prop::collection::vec(prop::char::range('a', 'z'), 1..8),
        fuzzy in any::<bool>(),
    ) {
        let count = names.len();
        let mut s = SwitchSession::open(snapshot(names));
        for &c in &chars {
            s.push_char(c, fuzzy);
        }
        for _ in 0..chars.len() {
            prop_assert!(s.pop_char(fuzzy));
        }
        prop_assert_eq!(s.candidates().len(), count);
        prop_assert!(s.filter().is_empty());
    }

    #[test]
    fn filtering_is_deterministic_across_sessions(
        names in prop::collection::vec("[a-z]{1,12}", 0..20),
        chars in prop::collection::vec(prop::char::range('a', 'z'), 0..6),
        fuzzy in any::<bool>(),
    ) {
        let mut a = SwitchSession::open(snapshot(names.clone()));
        let mut b = SwitchSession::open(snapshot(names));
        for &c in &chars {
            a.push_char(c, fuzzy);
            b.push_char(c, fuzzy);
        }
        prop_assert_eq!(a.candidates(), b.candidates());
    }

    #[test]
    fn fuzzy_matches_are_a_superset_of_prefix_matches(
        names in prop::collection::vec("[a-z]{1,12}", 0..20),
        c in prop::char::range('a', 'z'),
    ) {
        let mut prefix = SwitchSession::open(snapshot(names.clone()));
        let mut fuzzy = SwitchSession::open(snapshot(names));
        prefix.push_char(c, false);
        fuzzy.push_char(c, true);
        for app in prefix.candidates() {
            prop_assert!(fuzzy.candidates().iter().any(|a| a.pid == app.pid));
        }
    }

    #[test]
    fn window_always_contains_the_selection(
        count in 0usize..200,
        max_visible in 0usize..20,
        selected in 0usize..200,
    ) {
        let selected = if count == 0 { 0 } else { selected % count };
        let w = DisplayWindow::compute(count, selected, max_visible);
        prop_assert!(w.end() <= count.max(w.start));
        if count > 0 {
            prop_assert!(w.len >= 1);
            prop_assert!(w.selected_in_window < w.len);
            prop_assert_eq!(w.start + w.selected_in_window, selected);
        }
    }
}
