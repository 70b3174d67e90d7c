//! Window-size query with an ANSI cursor-position-report fallback (§4's
//! Terminal collaborator). `crossterm::terminal::size` reads the kernel's
//! idea of the window directly (`TIOCGWINSZ` on unix, a console-mode call
//! on Windows) and fails only when that ioctl/API itself fails; the CPR
//! fallback below is the same technique kilo-lineage editors use when no
//! such call is available: push the cursor to the bottom-right corner and
//! ask the terminal to report back where it actually landed.
//!
//! (cols, rows) pairs throughout, matching `crossterm::terminal::size`'s
//! own ordering.

use anyhow::{Context, Result};
use crossterm::cursor::{position, MoveTo};
use crossterm::execute;
use crossterm::terminal::size as crossterm_size;

/// Far enough past any real terminal's extent that moving there clamps the
/// cursor to the bottom-right corner.
const PROBE_COORD: u16 = 9999;

pub fn window_size() -> Result<(u16, u16)> {
    match crossterm_size() {
        Ok(size) => Ok(size),
        Err(err) => {
            tracing::debug!(target: "terminal.window", error = %err, "size() failed, falling back to CPR probe");
            query_size_via_cursor_position_report().context("window-size CPR fallback failed")
        }
    }
}

fn query_size_via_cursor_position_report() -> Result<(u16, u16)> {
    execute!(std::io::stdout(), MoveTo(PROBE_COORD, PROBE_COORD))?;
    let (col, row) = position()?;
    Ok((col + 1, row + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_coord_is_past_any_real_terminal_extent() {
        assert!(PROBE_COORD > 1000);
    }
}
