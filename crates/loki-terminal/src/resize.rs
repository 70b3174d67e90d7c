//! Resize-pending flag (§4's Terminal collaborator: "a resize-pending flag
//! set by an async-signal-safe handler"). `crossterm` already owns SIGWINCH
//! handling internally on unix and surfaces it as an ordinary
//! `Event::Resize` through its event stream (see `loki-input::source`'s
//! `TerminalEventSource`); hand-rolling a second raw `libc` signal handler
//! here would duplicate work crossterm's backend already does and has no
//! grounding in this workspace's own dependency stack. This flag instead
//! gives the host loop a place to latch that observation: set it when an
//! `Event::Resize` arrives, clear it once the view has been resized and a
//! frame redrawn.
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ResizeFlag(AtomicBool);

impl ResizeFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn mark(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Read and clear the flag in one step, so a racing `mark()` from
    /// another resize event isn't lost between check and clear.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_after_reading() {
        let flag = ResizeFlag::new();
        assert!(!flag.take());
        flag.mark();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
