//! Inert stand-in for the CoreGraphics tap on non-macOS targets.
//!
//! There is no system event tap to attach to, so creation always reports a
//! missing permission and the switcher stays inert, matching the behavior on
//! macOS before Input Monitoring has been granted.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::Classifier;

/// No-op control block mirroring the macOS API surface.
pub(crate) struct SysControl;

impl SysControl {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn set_tap_enabled(&self, _enabled: bool) {}

    pub(crate) fn stop(&self) {}
}

/// Always refuses to start; the readiness channel carries the error.
pub(crate) fn run_event_loop(
    _classifier: Classifier,
    ready: Sender<crate::Result<()>>,
    _ctrl: Arc<SysControl>,
) -> crate::Result<()> {
    let _ = ready.send(Err(crate::Error::PermissionDenied("Input Monitoring")));
    Err(crate::Error::PermissionDenied("Input Monitoring"))
}
