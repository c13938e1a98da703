//! Log-backed overlay presenter.
//!
//! Rendering a real switcher window is out of scope; every frame is logged
//! instead. The auto-dismiss machinery is real, though: a frame left up with
//! no further updates is dismissed after a timeout, and a monotonically
//! increasing nonce invalidates timers made stale by newer activity.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::Duration,
};

use crossbeam_channel::{self as channel, RecvTimeoutError};
use switch_engine::{OverlayFrame, OverlayPresenter};
use tracing::{info, warn};

/// How long a presented frame stays up with no further updates.
const AUTO_DISMISS: Duration = Duration::from_secs(10);

/// Presenter that logs frames and auto-dismisses idle overlays.
pub struct LogOverlay {
    /// Bumped on every present and dismiss; a timer whose token no longer
    /// matches has been superseded and stays silent.
    nonce: Arc<AtomicU64>,
    /// Arms the timer thread with the token of the latest frame.
    timer_tx: channel::Sender<u64>,
}

impl LogOverlay {
    /// Create the presenter and its timer thread.
    pub fn new() -> Self {
        let nonce = Arc::new(AtomicU64::new(0));
        let (timer_tx, timer_rx) = channel::unbounded::<u64>();
        let timer_nonce = nonce.clone();
        thread::spawn(move || timer_loop(&timer_rx, &timer_nonce));
        Self { nonce, timer_tx }
    }
}

impl Default for LogOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayPresenter for LogOverlay {
    fn present(&self, frame: OverlayFrame) {
        let token = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
        let names: Vec<&str> = frame.items.iter().map(|a| a.name.as_str()).collect();
        info!(
            filter = %frame.filter,
            selected = frame.selected,
            items = ?names,
            "overlay"
        );
        if self.timer_tx.send(token).is_err() {
            warn!("overlay timer thread gone; auto-dismiss disabled");
        }
    }

    fn dismiss(&self) {
        self.nonce.fetch_add(1, Ordering::SeqCst);
        info!("overlay dismissed");
    }
}

/// Timer thread body: wait out the dismiss window after the latest frame,
/// restarting whenever a newer token arrives.
fn timer_loop(rx: &channel::Receiver<u64>, nonce: &AtomicU64) {
    let mut armed: Option<u64> = None;
    loop {
        match armed {
            Some(token) => match rx.recv_timeout(AUTO_DISMISS) {
                Ok(newer) => armed = Some(newer),
                Err(RecvTimeoutError::Timeout) => {
                    if nonce.load(Ordering::SeqCst) == token {
                        info!("overlay auto-dismissed");
                    }
                    armed = None;
                }
                Err(RecvTimeoutError::Disconnected) => return,
            },
            None => match rx.recv() {
                Ok(token) => armed = Some(token),
                Err(_) => return,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use switch_engine::OverlayFrame;

    use super::*;

    #[test]
    fn dismiss_invalidates_pending_timers() {
        let overlay = LogOverlay::new();
        overlay.present(OverlayFrame {
            items: Vec::new(),
            selected: 0,
            filter: String::new(),
        });
        let token = overlay.nonce.load(Ordering::SeqCst);
        overlay.dismiss();
        assert_ne!(overlay.nonce.load(Ordering::SeqCst), token);
    }
}
