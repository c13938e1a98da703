//! Trait seams between the engine and its platform collaborators.
//!
//! The engine never talks to AppKit or CoreGraphics directly; everything it
//! needs from the outside world comes through these traits so the state
//! machine is testable with the mocks in [`crate::test_support`].

use mac_keys::Chord;
use switch_config::AppBinding;

/// One running application, as reported by the snapshot source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Process identifier; stable for the lifetime of the process.
    pub pid: i32,
    /// Bundle identifier; empty for processes without one.
    pub bundle_id: String,
    /// Localized display name, used for filtering and the overlay.
    pub name: String,
}

/// Supplies the current set of user-activatable applications.
pub trait AppSource: Send + Sync {
    /// A fresh snapshot: the host process and background-only processes
    /// excluded, ordered by case-insensitive display name. Fetched on every
    /// session open; never cached across sessions.
    fn snapshot(&self) -> Vec<AppInfo>;
}

/// Brings applications to the foreground or launches them.
///
/// All operations are fire-and-forget from the engine's perspective: the
/// event path never waits on them and their outcomes are only logged.
pub trait AppActivator: Send + Sync {
    /// Activate an already-running instance by pid. Returns whether the
    /// activation request was accepted.
    fn activate_pid(&self, pid: i32) -> bool;
    /// Activate an already-running instance by bundle identifier. Returns
    /// false when no instance is running or activation was refused.
    fn activate_bundle(&self, bundle_id: &str) -> bool;
    /// Launch the application fresh with an activate-on-open request. The
    /// completion is asynchronous and only observable through logs.
    fn launch_bundle(&self, bundle_id: &str);
}

/// The immutable display state handed to the overlay on every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayFrame {
    /// The visible slice of filtered candidates, at most `max_visible` long.
    pub items: Vec<AppInfo>,
    /// Selection index in window-local coordinates. Meaningless when `items`
    /// is empty.
    pub selected: usize,
    /// The filter text as typed so far.
    pub filter: String,
}

/// Renders the transient switcher window. Purely observational: the
/// presenter receives value copies and makes no decisions.
pub trait OverlayPresenter: Send + Sync {
    /// Show or refresh the overlay with the given frame.
    fn present(&self, frame: OverlayFrame);
    /// Hide the overlay.
    fn dismiss(&self);
}

/// Read access to the user's settings.
///
/// The engine caches the chord and bindings and re-reads them when told to;
/// the fuzzy flag is deliberately read on every filter pass so a settings
/// change is honored mid-session.
pub trait SettingsSource: Send + Sync {
    /// The main activation chord.
    fn activation_chord(&self) -> Chord;
    /// Per-application bindings, in priority order.
    fn bindings(&self) -> Vec<AppBinding>;
    /// Whether filtering matches substrings rather than prefixes.
    fn fuzzy_enabled(&self) -> bool;
    /// Overlay capacity.
    fn max_visible(&self) -> usize;
}

impl SettingsSource for switch_config::Store {
    fn activation_chord(&self) -> Chord {
        Self::activation_chord(self)
    }
    fn bindings(&self) -> Vec<AppBinding> {
        Self::bindings(self)
    }
    fn fuzzy_enabled(&self) -> bool {
        Self::fuzzy_enabled(self)
    }
    fn max_visible(&self) -> usize {
        Self::max_visible(self)
    }
}
