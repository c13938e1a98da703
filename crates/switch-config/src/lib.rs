//! Settings for quickswitch: the activation chord, per-application chord
//! bindings, the filter-mode flag, and overlay capacity.
//!
//! Settings live in a RON file (`~/.quickswitch/settings.ron` by default) and
//! are served through [`Store`], which callers read on demand and which
//! notifies registered observers when the chord or the binding list changes.
//! Chord and binding changes are independent notification channels; an
//! observer registration returns a [`Subscription`] handle that unregisters
//! on drop.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use mac_keys::{Chord, Key, Modifiers};
use serde::{Deserialize, Serialize};

mod error;
mod store;

pub use error::{Error, Result};
pub use store::{Store, Subscription, WatchHandle};

/// One application bound to a dedicated chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppBinding {
    /// Bundle identifier of the target application.
    pub bundle_id: String,
    /// Display name, used for logging and the preferences file only.
    pub name: String,
    /// The chord that activates this application. `None` means the binding
    /// is unarmed and never matches.
    #[serde(default)]
    pub chord: Option<Chord>,
}

impl AppBinding {
    /// True when this binding has a chord and can match events.
    pub const fn armed(&self) -> bool {
        self.chord.is_some()
    }
}

/// The complete persisted settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The main activation chord: trigger key plus the modifier set that must
    /// be held to open and keep the switcher up.
    pub activation: Chord,
    /// Per-application chord bindings, in priority order.
    pub bindings: Vec<AppBinding>,
    /// When true the typed filter matches anywhere in the name; when false it
    /// must match a prefix.
    pub fuzzy_search: bool,
    /// Maximum number of candidates visible in the overlay at once.
    pub max_visible: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            activation: Chord::new(Key::Tab, Modifiers::COMMAND),
            bindings: Vec::new(),
            fuzzy_search: false,
            max_visible: 7,
        }
    }
}

impl Settings {
    /// Parse a settings document from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| Error::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Load a settings document from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Read {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;
        ron::from_str(&text).map_err(|e| Error::Parse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })
    }
}

/// Determine the preferred user settings path (`~/.quickswitch/settings.ron`).
pub fn default_settings_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".quickswitch");
    p.push("settings.ron");
    p
}

/// Resolve the effective settings path.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `~/.quickswitch/settings.ron` when it exists.
/// 3) Else `None`: the caller runs on built-in defaults.
pub fn resolve_settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let preferred = default_settings_path();
    preferred.exists().then_some(preferred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_cmd_tab_prefix_seven() {
        let s = Settings::default();
        assert_eq!(s.activation, Chord::new(Key::Tab, Modifiers::COMMAND));
        assert!(!s.fuzzy_search);
        assert_eq!(s.max_visible, 7);
        assert!(s.bindings.is_empty());
    }

    #[test]
    fn parse_full_document() {
        let text = r#"(
            activation: "opt+tab",
            fuzzy_search: true,
            max_visible: 5,
            bindings: [
                (bundle_id: "com.apple.Safari", name: "Safari", chord: Some("cmd+shift+s")),
                (bundle_id: "com.apple.mail", name: "Mail"),
            ],
        )"#;
        let s = Settings::from_ron(text).expect("parse");
        assert_eq!(s.activation, Chord::new(Key::Tab, Modifiers::OPTION));
        assert!(s.fuzzy_search);
        assert_eq!(s.max_visible, 5);
        assert_eq!(s.bindings.len(), 2);
        assert!(s.bindings[0].armed());
        assert!(!s.bindings[1].armed());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let s = Settings::from_ron("(fuzzy_search: true)").expect("parse");
        assert!(s.fuzzy_search);
        assert_eq!(s.activation, Settings::default().activation);
    }

    #[test]
    fn bad_chord_spec_is_a_parse_error() {
        let err = Settings::from_ron(r#"(activation: "cmd+nosuch")"#).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
