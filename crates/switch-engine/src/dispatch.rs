//! Resolution of a matched chord or committed selection to an application
//! activation.

use std::sync::Arc;

use switch_config::AppBinding;
use tracing::{debug, info, warn};

use crate::{AppActivator, AppInfo};

/// Turns activation decisions into activate-or-launch requests.
///
/// Everything here is fire-and-forget: the tap event that triggered the
/// dispatch has already been swallowed, and handling must return immediately
/// to keep the system tap responsive. Outcomes are only logged; failure of
/// both the activation and the fallback launch is terminal for that single
/// gesture.
pub struct Dispatcher {
    /// Activation primitive, supplied by the platform layer.
    activator: Arc<dyn AppActivator>,
}

impl Dispatcher {
    /// Create a dispatcher over an activation primitive.
    pub fn new(activator: Arc<dyn AppActivator>) -> Self {
        Self { activator }
    }

    /// Activate the application an armed binding points at, launching it
    /// fresh when no running instance accepts activation.
    pub fn dispatch_binding(&self, binding: &AppBinding) {
        debug!(app = %binding.name, bundle = %binding.bundle_id, "binding matched");
        if self.activator.activate_bundle(&binding.bundle_id) {
            info!(app = %binding.name, "activated running instance");
        } else {
            info!(app = %binding.name, "activation failed or not running; launching");
            self.activator.launch_bundle(&binding.bundle_id);
        }
    }

    /// Activate the committed switcher selection, falling back to a fresh
    /// launch of its bundle.
    pub fn commit(&self, app: &AppInfo) {
        info!(app = %app.name, pid = app.pid, "committing selection");
        if self.activator.activate_pid(app.pid) {
            return;
        }
        if app.bundle_id.is_empty() {
            warn!(app = %app.name, "activation failed and no bundle id to launch");
            return;
        }
        warn!(app = %app.name, "activation failed; falling back to launch");
        self.activator.launch_bundle(&app.bundle_id);
    }
}
