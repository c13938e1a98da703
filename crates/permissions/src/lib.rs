//! Simple, macOS-only permission checks for quickswitch.
//!
//! Exposes a minimal API to query whether the process holds the Accessibility
//! and Input Monitoring permissions the event tap needs. There is no
//! prompting logic here: the host is responsible for guiding the user to
//! System Settings if permissions are missing, and for retrying tap creation
//! once they are granted.
//!
//! All calls are fast and side-effect free. On non-macOS targets both checks
//! report `false`, which leaves the switcher inert.

#[cfg(target_os = "macos")]
#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn CGPreflightListenEventAccess() -> bool;
}

/// Check whether the process holds the Accessibility (AX) permission.
#[cfg(target_os = "macos")]
pub fn accessibility_ok() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// Check whether the process holds the "Input Monitoring" permission.
///
/// Returns `true` when the process is allowed to listen for keyboard events
/// via a CGEvent tap, and `false` otherwise.
#[cfg(target_os = "macos")]
pub fn input_monitoring_ok() -> bool {
    unsafe { CGPreflightListenEventAccess() }
}

/// Accessibility is a macOS concept; always `false` elsewhere.
#[cfg(not(target_os = "macos"))]
pub fn accessibility_ok() -> bool {
    false
}

/// Input Monitoring is a macOS concept; always `false` elsewhere.
#[cfg(not(target_os = "macos"))]
pub fn input_monitoring_ok() -> bool {
    false
}

/// Current permission status for the process.
#[derive(Debug, Clone, Copy)]
pub struct PermissionsStatus {
    /// Accessibility (AX) permission; `true` if granted.
    pub accessibility_ok: bool,
    /// Input Monitoring permission; `true` if granted.
    pub input_ok: bool,
}

impl PermissionsStatus {
    /// True when everything the event tap needs has been granted.
    pub const fn all_ok(self) -> bool {
        self.accessibility_ok && self.input_ok
    }
}

/// Query both Accessibility and Input Monitoring permissions.
///
/// Convenience wrapper over [`accessibility_ok`] and [`input_monitoring_ok`];
/// performs no prompting and has no side effects.
pub fn check_permissions() -> PermissionsStatus {
    PermissionsStatus {
        accessibility_ok: accessibility_ok(),
        input_ok: input_monitoring_ok(),
    }
}
