//! Inert non-macOS stand-ins; there is no workspace to talk to.

use switch_engine::AppInfo;
use tracing::warn;

/// Always empty off macOS.
pub(crate) fn snapshot() -> Vec<AppInfo> {
    Vec::new()
}

/// Activation is unavailable off macOS.
pub(crate) fn activate_pid(pid: i32) -> bool {
    warn!(pid, "activation unsupported on this platform");
    false
}

/// Activation is unavailable off macOS.
pub(crate) fn activate_bundle(bundle_id: &str) -> bool {
    warn!(bundle = bundle_id, "activation unsupported on this platform");
    false
}

/// Launching is unavailable off macOS.
pub(crate) fn launch_bundle(bundle_id: &str) {
    warn!(bundle = bundle_id, "launch unsupported on this platform");
}
