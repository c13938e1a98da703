//! Mock implementations of the engine's trait seams, shared between unit and
//! integration tests.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use mac_keys::{Key, Modifiers};
use mac_tap::{EventKind, TapEvent};
use parking_lot::Mutex;
use switch_config::Settings;

use crate::{AppActivator, AppInfo, AppSource, OverlayFrame, OverlayPresenter, SettingsSource};

/// Settings source backed by a mutable in-memory document.
pub struct MockSettings {
    /// Current document; tests mutate through [`MockSettings::update`].
    inner: Mutex<Settings>,
}

impl MockSettings {
    /// Create with defaults (cmd+tab, prefix matching, capacity 7).
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Settings::default()),
        }
    }

    /// Create over a specific document.
    pub fn with(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }

    /// Mutate the document in place.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.inner.lock());
    }
}

impl Default for MockSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for MockSettings {
    fn activation_chord(&self) -> mac_keys::Chord {
        self.inner.lock().activation
    }
    fn bindings(&self) -> Vec<switch_config::AppBinding> {
        self.inner.lock().bindings.clone()
    }
    fn fuzzy_enabled(&self) -> bool {
        self.inner.lock().fuzzy_search
    }
    fn max_visible(&self) -> usize {
        self.inner.lock().max_visible
    }
}

/// App source returning a programmable snapshot.
pub struct MockApps {
    /// The snapshot handed out on every call.
    apps: Mutex<Vec<AppInfo>>,
}

impl MockApps {
    /// Create from `(pid, name)` pairs; bundle ids are derived from names.
    pub fn with_names(names: &[&str]) -> Self {
        let apps = names
            .iter()
            .enumerate()
            .map(|(i, name)| AppInfo {
                pid: i as i32 + 100,
                bundle_id: format!("com.example.{}", name.to_lowercase()),
                name: (*name).to_string(),
            })
            .collect();
        Self {
            apps: Mutex::new(apps),
        }
    }

    /// Replace the snapshot returned by subsequent calls.
    pub fn set(&self, apps: Vec<AppInfo>) {
        *self.apps.lock() = apps;
    }
}

impl AppSource for MockApps {
    fn snapshot(&self) -> Vec<AppInfo> {
        self.apps.lock().clone()
    }
}

/// Presenter that records every frame and dismissal.
#[derive(Default)]
pub struct RecordingPresenter {
    /// Frames in presentation order.
    frames: Mutex<Vec<OverlayFrame>>,
    /// Number of dismiss calls.
    dismissals: Mutex<usize>,
}

impl RecordingPresenter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames presented so far.
    pub fn frames(&self) -> Vec<OverlayFrame> {
        self.frames.lock().clone()
    }

    /// The most recent frame, if any.
    pub fn last_frame(&self) -> Option<OverlayFrame> {
        self.frames.lock().last().cloned()
    }

    /// Number of dismiss calls observed.
    pub fn dismissals(&self) -> usize {
        *self.dismissals.lock()
    }
}

impl OverlayPresenter for RecordingPresenter {
    fn present(&self, frame: OverlayFrame) {
        self.frames.lock().push(frame);
    }
    fn dismiss(&self) {
        *self.dismissals.lock() += 1;
    }
}

/// Activator that records requests and can be made to refuse activation.
#[derive(Default)]
pub struct MockActivator {
    /// Pids passed to `activate_pid`.
    pids: Mutex<Vec<i32>>,
    /// Bundle ids passed to `activate_bundle`.
    bundles: Mutex<Vec<String>>,
    /// Bundle ids passed to `launch_bundle`.
    launched: Mutex<Vec<String>>,
    /// When set, both activation calls report failure.
    fail: AtomicBool,
}

impl MockActivator {
    /// Create an activator that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle whether activation calls report failure.
    pub fn fail_activation(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Recorded `activate_pid` calls.
    pub fn activated_pids(&self) -> Vec<i32> {
        self.pids.lock().clone()
    }

    /// Recorded `activate_bundle` calls.
    pub fn activated_bundles(&self) -> Vec<String> {
        self.bundles.lock().clone()
    }

    /// Recorded `launch_bundle` calls.
    pub fn launches(&self) -> Vec<String> {
        self.launched.lock().clone()
    }
}

impl AppActivator for MockActivator {
    fn activate_pid(&self, pid: i32) -> bool {
        self.pids.lock().push(pid);
        !self.fail.load(Ordering::SeqCst)
    }
    fn activate_bundle(&self, bundle_id: &str) -> bool {
        self.bundles.lock().push(bundle_id.to_string());
        !self.fail.load(Ordering::SeqCst)
    }
    fn launch_bundle(&self, bundle_id: &str) {
        self.launched.lock().push(bundle_id.to_string());
    }
}

/// Bundle of mocks plus the engine wired over them.
pub struct TestRig {
    /// The engine under test.
    pub engine: crate::SwitchEngine,
    /// Settings mock shared with the engine.
    pub settings: Arc<MockSettings>,
    /// App source mock shared with the engine.
    pub apps: Arc<MockApps>,
    /// Presenter mock shared with the engine.
    pub presenter: Arc<RecordingPresenter>,
    /// Activator mock shared with the engine.
    pub activator: Arc<MockActivator>,
}

impl TestRig {
    /// Build an engine over mocks with the given running applications.
    pub fn with_apps(names: &[&str]) -> Self {
        let settings = Arc::new(MockSettings::new());
        let apps = Arc::new(MockApps::with_names(names));
        let presenter = Arc::new(RecordingPresenter::new());
        let activator = Arc::new(MockActivator::new());
        let engine = crate::SwitchEngine::new(
            settings.clone(),
            apps.clone(),
            presenter.clone(),
            activator.clone(),
        );
        Self {
            engine,
            settings,
            apps,
            presenter,
            activator,
        }
    }
}

/// A key-down event with the given held modifiers.
pub fn key_down(key: Key, modifiers: Modifiers) -> TapEvent {
    TapEvent {
        kind: EventKind::KeyDown,
        key: Some(key),
        modifiers,
        is_repeat: false,
    }
}

/// An OS auto-repeat key-down event with the given held modifiers.
pub fn key_repeat(key: Key, modifiers: Modifiers) -> TapEvent {
    TapEvent {
        kind: EventKind::KeyDown,
        key: Some(key),
        modifiers,
        is_repeat: true,
    }
}

/// A key-up event with the given held modifiers.
pub fn key_up(key: Key, modifiers: Modifiers) -> TapEvent {
    TapEvent {
        kind: EventKind::KeyUp,
        key: Some(key),
        modifiers,
        is_repeat: false,
    }
}

/// A modifier-change event leaving `modifiers` held.
pub fn flags(modifiers: Modifiers) -> TapEvent {
    TapEvent {
        kind: EventKind::FlagsChanged,
        key: None,
        modifiers,
        is_repeat: false,
    }
}
