//! CoreGraphics event tap integration.
//!
//! Why `core-graphics` for the tap: CoreGraphics only suppresses delivery of
//! a tapped event when the callback returns a NULL `CGEventRef`. The
//! `core-graphics` crate's `CGEventTap` maps `CallbackResult::Drop` to that
//! NULL at the C boundary, so swallowed keystrokes never reach the foreground
//! app. Wrappers that map "swallow" back to the original event ref do not
//! actually suppress anything.

use std::{
    ffi::c_void,
    sync::{
        Arc,
        atomic::{AtomicPtr, Ordering},
    },
};

use core_foundation::{
    base::TCFType,
    mach_port::CFMachPortRef,
    runloop::{CFRunLoop, kCFRunLoopCommonModes},
};
use core_graphics::event::{self as cge, CallbackResult};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{Classifier, EventKind, TapEvent, Verdict};

#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

// Minimal subset of CGEventField constants used by this module.
const FIELD_KEYBOARD_EVENT_AUTOREPEAT: u32 = 8;
const FIELD_KEYBOARD_EVENT_KEYCODE: u32 = 9;

/// Shared control handle: stops the run loop and toggles the tap from other
/// threads.
pub(crate) struct SysControl {
    /// Run loop of the tap thread, set once the loop is live.
    rl: Mutex<Option<CFRunLoop>>,
    /// The tap's mach port, for enable/disable from any thread.
    tap_port: AtomicPtr<c_void>,
}

impl SysControl {
    pub(crate) fn new() -> Self {
        Self {
            rl: Mutex::new(None),
            tap_port: AtomicPtr::new(std::ptr::null_mut()),
        }
    }

    fn set_rl(&self, rl: CFRunLoop) {
        let mut g = self.rl.lock();
        *g = Some(rl);
    }

    fn set_port(&self, port: *mut c_void) {
        self.tap_port.store(port, Ordering::SeqCst);
    }

    pub(crate) fn set_tap_enabled(&self, enabled: bool) {
        let p = self.tap_port.load(Ordering::SeqCst) as CFMachPortRef;
        if !p.is_null() {
            unsafe { CGEventTapEnable(p, enabled) };
        }
    }

    pub(crate) fn stop(&self) {
        self.set_tap_enabled(false);
        self.set_port(std::ptr::null_mut());
        let mut g = self.rl.lock();
        if let Some(rl) = g.take() {
            rl.stop();
        }
    }
}

/// Create the tap, attach it to this thread's run loop, and run until
/// stopped. Sends exactly one readiness result before entering the loop.
pub(crate) fn run_event_loop(
    classifier: Classifier,
    ready: Sender<crate::Result<()>>,
    ctrl: Arc<SysControl>,
) -> crate::Result<()> {
    // Preflight Input Monitoring permission.
    if !permissions::input_monitoring_ok() {
        warn!("input_monitoring_permission_missing");
        let _ = ready.send(Err(crate::Error::PermissionDenied("Input Monitoring")));
        return Err(crate::Error::PermissionDenied("Input Monitoring"));
    }

    // Captured for re-enabling the tap from inside the closure.
    let tap_port_ptr: Arc<AtomicPtr<c_void>> = Arc::new(AtomicPtr::new(std::ptr::null_mut()));

    debug!("creating_event_tap");
    let tap_port_ptr_cb = tap_port_ptr.clone();
    // CGEventTap takes the callback by shared reference; the classifier is
    // FnMut, so serialize access. Events arrive on one thread anyway.
    let classifier = Mutex::new(classifier);
    let tap = match cge::CGEventTap::new(
        cge::CGEventTapLocation::Session,
        cge::CGEventTapPlacement::HeadInsertEventTap,
        cge::CGEventTapOptions::Default,
        vec![
            cge::CGEventType::KeyDown,
            cge::CGEventType::KeyUp,
            cge::CGEventType::FlagsChanged,
        ],
        move |_proxy, etype, event| {
            let kind = match etype {
                cge::CGEventType::KeyDown => EventKind::KeyDown,
                cge::CGEventType::KeyUp => EventKind::KeyUp,
                cge::CGEventType::FlagsChanged => EventKind::FlagsChanged,
                cge::CGEventType::TapDisabledByTimeout
                | cge::CGEventType::TapDisabledByUserInput => {
                    let p = tap_port_ptr_cb.load(Ordering::SeqCst) as CFMachPortRef;
                    if !p.is_null() {
                        warn!("tap_disabled_by_os_reenabling");
                        unsafe { CGEventTapEnable(p, true) };
                    }
                    return CallbackResult::Keep;
                }
                _ => return CallbackResult::Keep,
            };

            let scancode = event.get_integer_value_field(FIELD_KEYBOARD_EVENT_KEYCODE) as u16;
            let is_repeat = matches!(kind, EventKind::KeyDown)
                && event.get_integer_value_field(FIELD_KEYBOARD_EVENT_AUTOREPEAT) != 0;
            let ev = TapEvent {
                kind,
                key: mac_keys::Key::from_scancode(scancode),
                modifiers: mac_keys::Modifiers::from_cg_flags(event.get_flags().bits()),
                is_repeat,
            };
            trace!(scancode, kind = ?ev.kind, key = ?ev.key, mods = ?ev.modifiers, is_repeat, "tap_event");

            let verdict = {
                let mut c = classifier.lock();
                (*c)(&ev)
            };
            match verdict {
                Verdict::Swallow => {
                    trace!("intercepting_event");
                    CallbackResult::Drop
                }
                Verdict::Pass => CallbackResult::Keep,
            }
        },
    ) {
        Ok(t) => t,
        Err(_) => {
            warn!("event_tap_create_failed");
            let _ = ready.send(Err(crate::Error::EventTapStart));
            return Err(crate::Error::EventTapStart);
        }
    };

    // Share the CFMachPort for re-enabling inside the callback and for
    // enable/disable from the handle.
    let port = tap.mach_port().as_concrete_TypeRef() as *mut c_void;
    tap_port_ptr.store(port, Ordering::SeqCst);
    ctrl.set_port(port);

    // Create a runloop source and start the tap on this thread's runloop.
    let source = match tap.mach_port().create_runloop_source(0) {
        Ok(s) => s,
        Err(_) => {
            warn!("run_loop_source_create_failed");
            let _ = ready.send(Err(crate::Error::EventTapStart));
            return Err(crate::Error::EventTapStart);
        }
    };

    let rl = CFRunLoop::get_current();
    ctrl.set_rl(rl.clone());
    let mode = unsafe { kCFRunLoopCommonModes };
    rl.add_source(&source, mode);

    tap.enable();

    let _ = ready.send(Ok(()));
    debug!("event_tap_started_run_loop");

    CFRunLoop::run_current();

    debug!("event_tap_exited");
    Ok(())
}
