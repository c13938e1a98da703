//! mac-tap: global keyboard event tap adapter for macOS.
//!
//! Wraps a CoreGraphics session event tap on a dedicated run-loop thread and
//! feeds every key-down, key-up, and modifier-change event to a single
//! classifier closure registered at creation time. The classifier returns a
//! [`Verdict`] for each event: [`Verdict::Swallow`] suppresses delivery to
//! every other application, [`Verdict::Pass`] leaves the event untouched.
//!
//! The classifier runs on the tap thread, which is the only writer of
//! whatever state it captures; it must never block and never panic. Nothing
//! propagates out of the tap callback except the verdict.

use std::thread;

use crossbeam_channel as channel;
use tracing::{debug, warn};

mod error;
#[cfg(target_os = "macos")]
mod sys;
#[cfg(not(target_os = "macos"))]
mod sys_stub;
#[cfg(not(target_os = "macos"))]
use sys_stub as sys;

pub use error::{Error, Result};
use mac_keys::{Key, Modifiers};

/// The kind of raw input event delivered by the tap.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventKind {
    /// A non-modifier key was pressed (possibly an OS auto-repeat).
    KeyDown,
    /// A non-modifier key was released.
    KeyUp,
    /// The set of held modifier keys changed.
    FlagsChanged,
}

/// One raw keyboard event as seen by the tap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TapEvent {
    /// What happened.
    pub kind: EventKind,
    /// The key involved, when its scancode maps to a known [`Key`].
    /// `None` for keys outside the supported set; such events are still
    /// delivered so modifier state can be tracked.
    pub key: Option<Key>,
    /// The raw modifier set held at the time of the event (CapsLock
    /// included; normalize before comparing).
    pub modifiers: Modifiers,
    /// True for OS auto-repeat key-downs.
    pub is_repeat: bool,
}

/// The classifier's decision for a single event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// Consume the event; no other application sees it.
    Swallow,
    /// Deliver the event unmodified.
    Pass,
}

/// Classifier callback invoked for every tapped event.
pub type Classifier = Box<dyn FnMut(&TapEvent) -> Verdict + Send>;

/// Handle to a running event tap.
///
/// Dropping the handle stops the run loop and tears the tap down. Teardown
/// and [`Tap::set_enabled`] are idempotent.
pub struct Tap {
    /// Control block shared with the tap thread.
    ctrl: std::sync::Arc<sys::SysControl>,
    /// Joined on shutdown so the tap thread never outlives the handle.
    thread: Option<thread::JoinHandle<Result<()>>>,
}

impl Tap {
    /// Create the event tap and start its run loop on a dedicated thread.
    ///
    /// The `classifier` is registered once and owns whatever state it
    /// captures. Returns [`Error::PermissionDenied`] when Input Monitoring
    /// has not been granted; the caller may retry later.
    pub fn spawn(classifier: Classifier) -> Result<Self> {
        let (ready_tx, ready_rx) = channel::bounded(1);
        let ctrl = std::sync::Arc::new(sys::SysControl::new());
        let ctrl_thread = ctrl.clone();
        let thread = thread::Builder::new()
            .name("mac-tap".into())
            .spawn(move || sys::run_event_loop(classifier, ready_tx, ctrl_thread))
            .map_err(|e| Error::OsError(e.to_string()))?;

        // Block until the tap is live (or failed to start) so callers get a
        // synchronous success/failure answer.
        match ready_rx.recv() {
            Ok(Ok(())) => {
                debug!("event_tap_ready");
                Ok(Self {
                    ctrl,
                    thread: Some(thread),
                })
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(Error::EventTapStart)
            }
        }
    }

    /// Enable or disable event interception without tearing the tap down.
    ///
    /// Disabling makes the tap transparent: every event passes through.
    /// Calling with the current state is a no-op.
    pub fn set_enabled(&self, enabled: bool) {
        self.ctrl.set_tap_enabled(enabled);
    }

    /// Stop the run loop and release the tap. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.ctrl.stop();
        if let Some(handle) = self.thread.take() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("tap thread exited with error: {e}"),
                Err(_) => warn!("tap thread panicked"),
            }
        }
    }
}

impl Drop for Tap {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_event_carries_raw_modifiers() {
        let ev = TapEvent {
            kind: EventKind::KeyDown,
            key: Some(Key::Tab),
            modifiers: Modifiers::COMMAND | Modifiers::CAPS_LOCK,
            is_repeat: false,
        };
        assert_eq!(ev.modifiers.normalized(), Modifiers::COMMAND);
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn spawn_is_denied_off_platform() {
        let tap = Tap::spawn(Box::new(|_| Verdict::Pass));
        assert!(matches!(tap, Err(Error::PermissionDenied(_))));
    }
}
