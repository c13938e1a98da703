//! Running-application enumeration and activation backed by `NSWorkspace`.
//!
//! This crate is the platform half of the engine's app seams: it produces
//! the snapshot the switcher filters over and performs the
//! activate-or-launch requests the engine decides on. `NSRunningApplication`
//! is documented thread-safe, so everything here may be called from the tap
//! thread directly.
//!
//! On non-macOS targets the crate compiles to inert stubs so the pure-logic
//! crates above it can build and test anywhere.

use switch_engine::{AppActivator, AppInfo, AppSource};

#[cfg(target_os = "macos")]
mod sys;
#[cfg(not(target_os = "macos"))]
#[path = "sys_stub.rs"]
mod sys;

/// Snapshot and activation over the shared workspace.
#[derive(Default)]
pub struct WorkspaceApps;

impl WorkspaceApps {
    /// Create the workspace-backed source/activator pair.
    pub fn new() -> Self {
        Self
    }
}

impl AppSource for WorkspaceApps {
    fn snapshot(&self) -> Vec<AppInfo> {
        sys::snapshot()
    }
}

impl AppActivator for WorkspaceApps {
    fn activate_pid(&self, pid: i32) -> bool {
        sys::activate_pid(pid)
    }

    fn activate_bundle(&self, bundle_id: &str) -> bool {
        sys::activate_bundle(bundle_id)
    }

    fn launch_bundle(&self, bundle_id: &str) {
        sys::launch_bundle(bundle_id);
    }
}
