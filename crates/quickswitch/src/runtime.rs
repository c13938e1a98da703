//! Wires the settings store, permission gate, event tap, and engine
//! together and keeps the process alive.

use std::{path::Path, sync::Arc, thread, time::Duration};

use mac_apps::WorkspaceApps;
use mac_tap::Tap;
use switch_config::{Settings, Store, resolve_settings_path};
use switch_engine::SwitchEngine;
use tracing::{info, warn};

use crate::overlay::LogOverlay;

/// How often the permission preflights are re-polled while denied.
const PERMISSION_RETRY: Duration = Duration::from_secs(2);

/// Run the daemon until the process is killed.
///
/// Settings problems are never fatal: an unreadable file falls back to
/// defaults and a failed watch just means edits need a restart. The only
/// fatal error is a tap failure that is not a permission denial.
pub fn run(settings_path: Option<&Path>) -> mac_tap::Result<()> {
    let resolved = resolve_settings_path(settings_path);
    let store = match &resolved {
        Some(path) => match Settings::load(path) {
            Ok(settings) => {
                info!(path = %path.display(), "settings loaded");
                Store::new(settings)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings unreadable; using defaults");
                Store::new(Settings::default())
            }
        },
        None => {
            info!("no settings file; defaults in effect");
            Store::new(Settings::default())
        }
    };

    let _watch = resolved.as_ref().and_then(|path| match store.watch(path) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "settings watch unavailable; edits require a restart");
            None
        }
    });

    // The engine is consumed by the tap classifier, so a denied tap start
    // rebuilds it on the next attempt.
    let (_tap, _subs) = loop {
        wait_for_permissions();

        let apps = Arc::new(WorkspaceApps::new());
        let mut engine = SwitchEngine::new(
            Arc::new(store.clone()),
            apps.clone(),
            Arc::new(LogOverlay::new()),
            apps,
        );
        let flags = engine.reload_flags();
        let chord_flags = flags.clone();
        let chord_sub = store.on_chord_change(move || chord_flags.mark_chord());
        let binding_sub = store.on_bindings_change(move || flags.mark_bindings());

        match Tap::spawn(Box::new(move |ev| engine.handle_event(ev))) {
            Ok(tap) => break (tap, [chord_sub, binding_sub]),
            Err(mac_tap::Error::PermissionDenied(what)) => {
                warn!(what, "event tap denied; retrying");
                thread::sleep(PERMISSION_RETRY);
            }
            Err(e) => return Err(e),
        }
    };

    info!(chord = %store.activation_chord(), "quickswitch running");
    loop {
        thread::park();
    }
}

/// Block until both preflight checks pass, re-polling while denied.
fn wait_for_permissions() {
    let mut warned = false;
    loop {
        let status = permissions::check_permissions();
        if status.all_ok() {
            if warned {
                info!("permissions granted");
            }
            return;
        }
        if !warned {
            warn!(
                accessibility = status.accessibility_ok,
                input = status.input_ok,
                "waiting for Accessibility and Input Monitoring permission"
            );
            warned = true;
        }
        thread::sleep(PERMISSION_RETRY);
    }
}
