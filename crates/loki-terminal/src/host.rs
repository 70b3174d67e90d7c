//! The process-wide terminal host (§9 redesign flag: "re-architect [the
//! source's stashed context pointer for terminal restoration] as an explicit
//! `terminal_host` with a process-wide handle registered for the duration of
//! its lifetime; the signal handler touches only an atomic flag, and
//! restoration code fetches the handle"). `acquire` enforces "exactly one
//! terminal host is active at a time" (§4's Terminal collaborator); a second
//! concurrent `acquire` is refused rather than silently sharing raw-mode
//! state between two owners.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use anyhow::{bail, Result};

use crate::backend::{CrosstermBackend, TerminalBackend};
use crate::capabilities::TerminalCapabilities;
use crate::resize::ResizeFlag;

static HOST_ACTIVE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_INSTALLED: Once = Once::new();

pub struct TerminalHost {
    backend: CrosstermBackend,
    pub resize: ResizeFlag,
    pub capabilities: TerminalCapabilities,
}

impl TerminalHost {
    /// Claim the process-wide terminal host slot. Fails if another
    /// `TerminalHost` is already alive.
    pub fn acquire() -> Result<Self> {
        if HOST_ACTIVE.swap(true, Ordering::SeqCst) {
            bail!("a terminal host is already active in this process");
        }
        install_panic_restore_hook();
        Ok(Self { backend: CrosstermBackend::new(), resize: ResizeFlag::new(), capabilities: TerminalCapabilities::detect() })
    }

    pub fn enter(&mut self) -> Result<()> {
        self.backend.enter()
    }

    pub fn leave(&mut self) -> Result<()> {
        self.backend.leave()
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.backend.set_title(title)
    }

    pub fn window_size(&self) -> Result<(u16, u16)> {
        crate::window::window_size()
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        let _ = self.leave();
        HOST_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Best-effort raw-mode/alternate-screen restoration if the process panics
/// while a host is active, chained in front of whatever hook was previously
/// installed so panic messages still print normally afterward.
fn install_panic_restore_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = crate::backend::raw_mode_disable();
            let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show);
            previous(info);
        }));
    });
}
