//! Live settings store with change observers and an optional file watcher.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use mac_keys::Chord;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{AppBinding, Error, Result, Settings};

/// Observer callback; invoked synchronously on the thread that applied the
/// settings change, after the new values are visible to readers.
type Callback = Box<dyn Fn() + Send + Sync>;

/// One observer channel: registered callbacks keyed by subscription id.
#[derive(Default)]
struct Registry {
    subscribers: Mutex<HashMap<u64, Callback>>,
}

impl Registry {
    fn notify(&self) {
        for cb in self.subscribers.lock().values() {
            cb();
        }
    }
}

/// Cancellation handle for an observer registration.
///
/// Dropping the handle unregisters the callback. Keep it alive for as long as
/// notifications are wanted.
pub struct Subscription {
    /// Channel this subscription belongs to; `Weak` so a dropped store does
    /// not keep registries alive through outstanding handles.
    registry: Weak<Registry>,
    /// Key into the registry.
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.subscribers.lock().remove(&self.id);
        }
    }
}

/// Shared state behind a [`Store`] handle.
struct StoreInner {
    /// Current settings document.
    settings: RwLock<Settings>,
    /// Observers of activation-chord changes.
    chord_subs: Arc<Registry>,
    /// Observers of binding-list changes.
    binding_subs: Arc<Registry>,
    /// Id source for subscriptions across both channels.
    next_sub_id: AtomicU64,
}

/// Thread-safe settings provider.
///
/// Readers get point-in-time copies of individual fields; there is no shared
/// mutable state handed out. Chord changes and binding-list changes fire
/// independent observer channels, so a consumer caching one does not reload
/// the other.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create a store over an already-loaded settings document.
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                settings: RwLock::new(settings),
                chord_subs: Arc::new(Registry::default()),
                binding_subs: Arc::new(Registry::default()),
                next_sub_id: AtomicU64::new(1),
            }),
        }
    }

    /// Load settings from `path` and create a store over them.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(Settings::load(path)?))
    }

    /// The configured activation chord.
    pub fn activation_chord(&self) -> Chord {
        self.inner.settings.read().activation
    }

    /// A copy of the configured bindings, in priority order.
    pub fn bindings(&self) -> Vec<AppBinding> {
        self.inner.settings.read().bindings.clone()
    }

    /// Whether the typed filter matches substrings rather than prefixes.
    pub fn fuzzy_enabled(&self) -> bool {
        self.inner.settings.read().fuzzy_search
    }

    /// Maximum number of candidates visible in the overlay at once.
    pub fn max_visible(&self) -> usize {
        self.inner.settings.read().max_visible
    }

    /// Replace the whole settings document, firing the channels whose values
    /// actually changed. Observers run synchronously on this thread, after
    /// the new values are readable.
    pub fn replace(&self, settings: Settings) {
        let (chord_changed, bindings_changed) = {
            let mut guard = self.inner.settings.write();
            let chord_changed = guard.activation != settings.activation;
            let bindings_changed = guard.bindings != settings.bindings;
            *guard = settings;
            (chord_changed, bindings_changed)
        };
        if chord_changed {
            debug!("activation chord changed; notifying");
            self.inner.chord_subs.notify();
        }
        if bindings_changed {
            debug!("binding list changed; notifying");
            self.inner.binding_subs.notify();
        }
    }

    /// Register an observer for activation-chord changes.
    pub fn on_chord_change(&self, cb: impl Fn() + Send + Sync + 'static) -> Subscription {
        Self::subscribe(&self.inner.chord_subs, &self.inner.next_sub_id, cb)
    }

    /// Register an observer for binding-list changes.
    pub fn on_bindings_change(&self, cb: impl Fn() + Send + Sync + 'static) -> Subscription {
        Self::subscribe(&self.inner.binding_subs, &self.inner.next_sub_id, cb)
    }

    /// Insert a callback into `registry` and hand back its cancellation
    /// handle.
    fn subscribe(
        registry: &Arc<Registry>,
        ids: &AtomicU64,
        cb: impl Fn() + Send + Sync + 'static,
    ) -> Subscription {
        let id = ids.fetch_add(1, Ordering::Relaxed);
        registry.subscribers.lock().insert(id, Box::new(cb));
        Subscription {
            registry: Arc::downgrade(registry),
            id,
        }
    }

    /// Watch the settings file and reload this store on every change.
    ///
    /// Reload failures leave the current settings in place and are logged;
    /// a malformed edit never takes a running switcher down.
    pub fn watch(&self, path: &Path) -> Result<WatchHandle> {
        let store = self.clone();
        let reload_path: PathBuf = path.to_path_buf();
        let file_name = path.file_name().map(std::ffi::OsStr::to_os_string);
        let mut watcher: RecommendedWatcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event)
                    if (event.kind.is_modify() || event.kind.is_create())
                        && event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == file_name.as_deref()) =>
                {
                    match Settings::load(&reload_path) {
                        Ok(settings) => {
                            info!(path = %reload_path.display(), "settings reloaded");
                            store.replace(settings);
                        }
                        Err(e) => warn!("settings reload failed, keeping previous: {e}"),
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("settings watch error: {e}"),
            })
            .map_err(|e| Error::Watch(e.to_string()))?;
        // Watch the parent directory: editors often replace the file, which
        // would otherwise drop the watch on the old inode.
        let target = path.parent().unwrap_or(path);
        watcher
            .watch(target, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(e.to_string()))?;
        Ok(WatchHandle { _watcher: watcher })
    }
}

/// Keeps the settings file watcher alive; dropping it stops watching.
pub struct WatchHandle {
    /// Owned watcher; only its lifetime matters.
    _watcher: RecommendedWatcher,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use mac_keys::{Key, Modifiers};

    use super::*;

    fn counted() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, AtomicOrdering::SeqCst);
        })
    }

    #[test]
    fn replace_fires_only_changed_channels() {
        let store = Store::new(Settings::default());
        let (chords, on_chord) = counted();
        let (bindings, on_bindings) = counted();
        let _chord_sub = store.on_chord_change(on_chord);
        let _binding_sub = store.on_bindings_change(on_bindings);

        // Same content: nothing fires.
        store.replace(Settings::default());
        assert_eq!(chords.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(bindings.load(AtomicOrdering::SeqCst), 0);

        // Chord change fires only the chord channel.
        store.replace(Settings {
            activation: Chord::new(Key::Tab, Modifiers::OPTION),
            ..Settings::default()
        });
        assert_eq!(chords.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(bindings.load(AtomicOrdering::SeqCst), 0);

        // Binding change fires only the bindings channel.
        store.replace(Settings {
            activation: Chord::new(Key::Tab, Modifiers::OPTION),
            bindings: vec![AppBinding {
                bundle_id: "com.apple.Safari".into(),
                name: "Safari".into(),
                chord: None,
            }],
            ..Settings::default()
        });
        assert_eq!(chords.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(bindings.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let store = Store::new(Settings::default());
        let (count, cb) = counted();
        let sub = store.on_chord_change(cb);
        drop(sub);
        store.replace(Settings {
            activation: Chord::new(Key::Tab, Modifiers::CONTROL),
            ..Settings::default()
        });
        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);
    }

    #[test]
    fn readers_see_replaced_values() {
        let store = Store::new(Settings::default());
        assert!(!store.fuzzy_enabled());
        store.replace(Settings {
            fuzzy_search: true,
            max_visible: 3,
            ..Settings::default()
        });
        assert!(store.fuzzy_enabled());
        assert_eq!(store.max_visible(), 3);
    }
}
