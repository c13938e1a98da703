//! quickswitch core engine.
//!
//! The engine owns the app-switch state machine: it classifies every raw
//! input event delivered by the tap, maintains the transient switch session
//! (typed filter, candidate list, selection), and decides when to commit an
//! activation. It is the single writer of all of that state — the tap
//! delivers events on one dedicated thread and [`SwitchEngine::handle_event`]
//! takes `&mut self`, so no locking guards the session.
//!
//! Everything the engine needs from the platform comes through the traits in
//! [`deps`]; presentation and activation are fire-and-forget so the event
//! path never blocks.
//!
//! Gesture model: holding the activation chord's modifiers arms the switcher
//! (`ChordHeld`); pressing the trigger key opens the session (`Switching`);
//! releasing the modifiers commits the current selection. While switching,
//! the trigger cycles (Shift reverses), typed characters narrow the
//! candidate list, and Escape cancels. OS auto-repeats of the trigger count
//! as fresh presses, so holding it down cycles continuously. App-specific
//! chord bindings are checked before the gesture machinery and win on the
//! same event.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use mac_keys::{Chord, Key, Modifiers};
use mac_tap::{EventKind, TapEvent, Verdict};
use switch_config::AppBinding;
use tracing::{debug, info, trace};

mod deps;
mod dispatch;
mod session;
pub mod test_support;
mod window;

pub use deps::{
    AppActivator, AppInfo, AppSource, OverlayFrame, OverlayPresenter, SettingsSource,
};
pub use dispatch::Dispatcher;
pub use session::SwitchSession;
pub use window::DisplayWindow;

/// The gesture state the engine is in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Activation modifiers are not held and no session is open.
    Idle,
    /// Activation modifiers are held but the trigger has not opened a
    /// session yet.
    ChordHeld,
    /// A session is open and the overlay is visible.
    Switching,
}

/// Settings-change flags shared with observer callbacks.
///
/// The settings store notifies on its own thread; callbacks only mark these
/// flags, and the engine re-reads its cached chord and binding list at the
/// top of the next event. That keeps every settings read on the tap thread.
#[derive(Debug, Default)]
pub struct ReloadFlags {
    /// Set when the activation chord changed.
    chord: AtomicBool,
    /// Set when the binding list changed.
    bindings: AtomicBool,
}

impl ReloadFlags {
    /// Mark the activation chord as stale.
    pub fn mark_chord(&self) {
        self.chord.store(true, Ordering::SeqCst);
    }

    /// Mark the binding list as stale.
    pub fn mark_bindings(&self) {
        self.bindings.store(true, Ordering::SeqCst);
    }

    /// Consume the chord flag.
    fn take_chord(&self) -> bool {
        self.chord.swap(false, Ordering::SeqCst)
    }

    /// Consume the bindings flag.
    fn take_bindings(&self) -> bool {
        self.bindings.swap(false, Ordering::SeqCst)
    }
}

/// The app-switch state machine.
///
/// Construct via [`SwitchEngine::new`], register the tap classifier to call
/// [`SwitchEngine::handle_event`] for every event, and wire the settings
/// store's change channels to [`SwitchEngine::reload_flags`].
pub struct SwitchEngine {
    /// Settings reader; chord and bindings are cached, fuzzy mode is read
    /// per filter pass.
    settings: Arc<dyn SettingsSource>,
    /// Running-application snapshot source.
    apps: Arc<dyn AppSource>,
    /// Overlay sink; receives immutable frames.
    presenter: Arc<dyn OverlayPresenter>,
    /// Activate-or-launch resolution.
    dispatcher: Dispatcher,
    /// Staleness flags set by settings observers.
    reload: Arc<ReloadFlags>,
    /// Cached activation chord.
    chord: Chord,
    /// Cached bindings, in priority order.
    bindings: Vec<AppBinding>,
    /// Whether the activation chord's modifier set is currently held.
    modifiers_held: bool,
    /// The open session, if any.
    session: Option<SwitchSession>,
}

impl SwitchEngine {
    /// Create an engine over its four collaborators.
    pub fn new(
        settings: Arc<dyn SettingsSource>,
        apps: Arc<dyn AppSource>,
        presenter: Arc<dyn OverlayPresenter>,
        activator: Arc<dyn AppActivator>,
    ) -> Self {
        let chord = settings.activation_chord();
        let bindings = settings.bindings();
        info!(chord = %chord, bindings = bindings.len(), "engine ready");
        Self {
            settings,
            apps,
            presenter,
            dispatcher: Dispatcher::new(activator),
            reload: Arc::new(ReloadFlags::default()),
            chord,
            bindings,
            modifiers_held: false,
            session: None,
        }
    }

    /// The flags settings observers should mark on change.
    pub fn reload_flags(&self) -> Arc<ReloadFlags> {
        self.reload.clone()
    }

    /// The current gesture phase.
    pub fn phase(&self) -> Phase {
        match (&self.session, self.modifiers_held) {
            (Some(_), _) => Phase::Switching,
            (None, true) => Phase::ChordHeld,
            (None, false) => Phase::Idle,
        }
    }

    /// Classify one raw input event and return the tap verdict.
    ///
    /// This is the single entry point for the tap thread. It must never
    /// block and never panic; all errors are absorbed and logged, and the
    /// only thing that escapes is the swallow/pass verdict.
    pub fn handle_event(&mut self, ev: &TapEvent) -> Verdict {
        self.refresh_cached_settings();
        let held = ev.modifiers.normalized();

        // App-specific bindings are checked before the gesture machinery and
        // win on the same event, even against the main chord.
        if ev.kind == EventKind::KeyDown
            && let Some(key) = ev.key
            && let Some(binding) = self.match_binding(key, held)
        {
            // A binding firing mid-session supersedes it; otherwise the
            // eventual modifier release would commit a second activation.
            if self.session.is_some() {
                self.cancel_session();
            }
            self.dispatcher.dispatch_binding(&binding);
            return Verdict::Swallow;
        }

        // Modifier edges drive session lifetime regardless of event kind.
        self.track_modifier_edges(held);

        if ev.kind != EventKind::KeyDown {
            return Verdict::Pass;
        }
        let Some(key) = ev.key else {
            return Verdict::Pass;
        };

        if self.session.is_some() {
            self.handle_session_key(key, ev)
        } else if self.modifiers_held && key == self.chord.key {
            self.open_session();
            Verdict::Swallow
        } else {
            Verdict::Pass
        }
    }

    /// Re-read cached settings that observers marked stale.
    fn refresh_cached_settings(&mut self) {
        if self.reload.take_chord() {
            self.chord = self.settings.activation_chord();
            debug!(chord = %self.chord, "activation chord reloaded");
        }
        if self.reload.take_bindings() {
            self.bindings = self.settings.bindings();
            debug!(bindings = self.bindings.len(), "bindings reloaded");
        }
    }

    /// First armed binding whose chord matches exactly (CapsLock ignored).
    fn match_binding(&self, key: Key, held: Modifiers) -> Option<AppBinding> {
        self.bindings
            .iter()
            .find(|binding| {
                binding.chord.is_some_and(|chord| {
                    chord.key == key && chord.modifiers.normalized() == held
                })
            })
            .cloned()
    }

    /// Whether `held` satisfies the activation chord's modifier set, with an
    /// extra Shift tolerated (Shift reverses cycle direction).
    fn modifiers_match(&self, held: Modifiers) -> bool {
        let required = self.chord.modifiers.normalized();
        held == required || held == required | Modifiers::SHIFT
    }

    /// Track the held/released edges of the activation modifiers. The
    /// release edge is the commit signal when a session is open.
    fn track_modifier_edges(&mut self, held: Modifiers) {
        let matches = self.modifiers_match(held);
        if matches == self.modifiers_held {
            return;
        }
        self.modifiers_held = matches;
        trace!(held = matches, "activation modifiers edge");
        if matches {
            return;
        }
        match self.session.take() {
            Some(session) => {
                if let Some(app) = session.selected_app() {
                    self.dispatcher.commit(app);
                } else {
                    debug!("commit with empty candidate list; dismissing only");
                }
                self.presenter.dismiss();
            }
            // Chord released before the trigger ever opened a session;
            // nothing accumulated, nothing to clear.
            None => trace!("chord released without a session"),
        }
    }

    /// Key-down handling while a session is open.
    ///
    /// A live session implies the activation modifiers are held: the release
    /// edge in `track_modifier_edges` closes the session before key handling
    /// runs.
    fn handle_session_key(&mut self, key: Key, ev: &TapEvent) -> Verdict {
        if key == Key::Escape {
            self.cancel_session();
            return Verdict::Swallow;
        }
        if key == self.chord.key {
            let forward = !ev.modifiers.contains(Modifiers::SHIFT);
            if let Some(session) = self.session.as_mut() {
                session.cycle(forward);
            }
            self.push_frame();
            return Verdict::Swallow;
        }
        if matches!(key, Key::Delete | Key::ForwardDelete) {
            // The fuzzy flag is read per pass so settings edits are honored
            // mid-session.
            let fuzzy = self.settings.fuzzy_enabled();
            if let Some(session) = self.session.as_mut()
                && session.pop_char(fuzzy)
            {
                self.push_frame();
            }
            return Verdict::Swallow;
        }
        if let Some(c) = key.filter_char() {
            let fuzzy = self.settings.fuzzy_enabled();
            if let Some(session) = self.session.as_mut() {
                session.push_char(c, fuzzy);
            }
            self.push_frame();
            return Verdict::Swallow;
        }
        Verdict::Pass
    }

    /// Fetch a fresh snapshot and show the overlay.
    fn open_session(&mut self) {
        let snapshot = self.apps.snapshot();
        info!(apps = snapshot.len(), "opening switch session");
        self.session = Some(SwitchSession::open(snapshot));
        self.push_frame();
    }

    /// Discard the session without activating anything.
    fn cancel_session(&mut self) {
        debug!("session cancelled");
        self.session = None;
        self.presenter.dismiss();
    }

    /// Hand the presenter an immutable copy of the current display state.
    fn push_frame(&self) {
        if let Some(session) = &self.session {
            self.presenter
                .present(session.frame(self.settings.max_visible()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestRig, flags, key_down};

    #[test]
    fn phases_follow_the_gesture() {
        let mut rig = TestRig::with_apps(&["Finder", "Mail"]);
        assert_eq!(rig.engine.phase(), Phase::Idle);

        rig.engine.handle_event(&flags(Modifiers::COMMAND));
        assert_eq!(rig.engine.phase(), Phase::ChordHeld);

        rig.engine
            .handle_event(&key_down(Key::Tab, Modifiers::COMMAND));
        assert_eq!(rig.engine.phase(), Phase::Switching);

        rig.engine.handle_event(&flags(Modifiers::empty()));
        assert_eq!(rig.engine.phase(), Phase::Idle);
    }

    #[test]
    fn trigger_without_modifiers_passes_through() {
        let mut rig = TestRig::with_apps(&["Finder"]);
        let verdict = rig.engine.handle_event(&key_down(Key::Tab, Modifiers::empty()));
        assert_eq!(verdict, Verdict::Pass);
        assert_eq!(rig.engine.phase(), Phase::Idle);
    }

    #[test]
    fn extra_shift_keeps_the_chord_held() {
        let mut rig = TestRig::with_apps(&["Finder", "Mail"]);
        rig.engine.handle_event(&flags(Modifiers::COMMAND));
        rig.engine
            .handle_event(&flags(Modifiers::COMMAND | Modifiers::SHIFT));
        assert_eq!(rig.engine.phase(), Phase::ChordHeld);
    }

    #[test]
    fn caps_lock_does_not_break_the_match() {
        let mut rig = TestRig::with_apps(&["Finder"]);
        rig.engine
            .handle_event(&flags(Modifiers::COMMAND | Modifiers::CAPS_LOCK));
        assert_eq!(rig.engine.phase(), Phase::ChordHeld);
    }
}
