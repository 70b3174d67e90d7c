//! The real terminal `Renderer` implementation (§4.13): batches one frame's
//! escape codes into a `loki_terminal::AppendBuffer` and flushes it in a
//! single write, the same append-buffer discipline `core-render`'s
//! `batch_writer`/`render_engine` use, but driving the simpler full-frame
//! callback protocol `loki-render` exposes instead of that engine's
//! partial-diff scheduler.
//!
//! Row layout mirrors the classic kilo/`ox-bin` budget: `ViewState::new`
//! reserves exactly two rows below the text area (`screen_rows - 2`), one
//! for the status line and one for the message line, with no separate row
//! budgeted for the buffer tab bar. `render_tabs` is therefore a no-op here
//! — tab metadata stays available in the view model for transports that do
//! have room for it (a JSON-RPC client, a future GUI) — and the REPL pane
//! overlays the message line rather than claiming a row of its own, since
//! `render_repl` is always called immediately after `render_message` in
//! `render_frame`'s fixed call order.

use std::io::Write;

use loki_model::Palette;
use loki_render::segment::Segment;
use loki_render::view_model::{ReplSnapshot, TabInfo};
use loki_render::Renderer;
use loki_terminal::AppendBuffer;
use loki_text::HighlightClass;

pub struct TerminalRenderer {
    buf: AppendBuffer,
    cols: usize,
    row_cursor: usize,
    message_row: usize,
    palette: Palette,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self { buf: AppendBuffer::new(), cols: 0, row_cursor: 0, message_row: 0, palette: Palette::default() }
    }

    fn move_to(&mut self, row: usize) {
        let _ = write!(self.buf, "\x1b[{};1H", row + 1);
    }

    fn clear_line_and_pad(&mut self, text: &str) {
        self.buf.push_str("\x1b[2K");
        let visible = text.chars().count();
        self.buf.push_str(text);
        if visible < self.cols {
            self.buf.push_str(&" ".repeat(self.cols - visible));
        }
    }

    fn write_segment(&mut self, seg: &Segment) {
        let invert = seg.selected || seg.class == HighlightClass::NonPrint;
        if invert {
            self.buf.push_str("\x1b[7m");
        }
        if !matches!(seg.class, HighlightClass::Normal | HighlightClass::NonPrint) {
            let _ = write!(self.buf, "\x1b[{}m", self.palette.color_for(seg.class));
        }
        self.buf.push_str(&seg.text);
        self.buf.push_str("\x1b[0m");
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn begin_frame(&mut self, cols: usize, _rows: usize) {
        self.buf.clear();
        self.cols = cols;
        self.row_cursor = 0;
    }

    fn end_frame(&mut self) {}

    fn render_tabs(&mut self, _tabs: &[TabInfo]) {}

    fn render_row(&mut self, row_num: Option<usize>, segments: &[Segment], gutter_width: usize, is_empty: bool) {
        self.move_to(self.row_cursor);
        self.buf.push_str("\x1b[2K");
        if gutter_width > 0 {
            match row_num {
                Some(n) => {
                    let num = (n + 1).to_string();
                    let pad = gutter_width.saturating_sub(1).saturating_sub(num.len());
                    self.buf.push_str(&" ".repeat(pad));
                    self.buf.push_str(&num);
                    self.buf.push_str(" ");
                }
                None => self.buf.push_str(&" ".repeat(gutter_width)),
            }
        }
        if is_empty && row_num.is_none() {
            self.buf.push_str("~");
        } else {
            for seg in segments {
                self.write_segment(seg);
            }
        }
        self.row_cursor += 1;
    }

    fn render_status(&mut self, status: &str) {
        self.move_to(self.row_cursor);
        self.buf.push_str("\x1b[2K\x1b[7m");
        let visible = status.chars().count();
        self.buf.push_str(status);
        if visible < self.cols {
            self.buf.push_str(&" ".repeat(self.cols - visible));
        }
        self.buf.push_str("\x1b[0m");
        self.row_cursor += 1;
    }

    fn render_message(&mut self, message: Option<&str>) {
        self.message_row = self.row_cursor;
        self.move_to(self.message_row);
        self.clear_line_and_pad(message.unwrap_or(""));
    }

    fn render_repl(&mut self, repl: &ReplSnapshot) {
        if !repl.active {
            return;
        }
        self.move_to(self.message_row);
        let line = format!("{}{}", repl.prompt, repl.input);
        self.clear_line_and_pad(&line);
    }

    fn set_cursor(&mut self, row: usize, col: usize) {
        let _ = write!(self.buf, "\x1b[{};{}H", row + 1, col + 1);
    }

    fn show_cursor(&mut self) {
        self.buf.push_str("\x1b[?25h");
    }

    fn hide_cursor(&mut self) {
        self.buf.push_str("\x1b[?25l");
    }

    fn clipboard_copy(&mut self, text: &str) -> anyhow::Result<()> {
        // No system-clipboard crate in this workspace's dependency stack
        // (the teacher's own `core-state` clipboard field is itself just a
        // placeholder). Logging keeps the call observable without
        // fabricating an OSC-52/X11 integration nothing here backs.
        tracing::debug!(target: "render.terminal", bytes = text.len(), "clipboard_copy is a no-op in this build");
        Ok(())
    }

    fn destroy(&mut self) {}
}

impl TerminalRenderer {
    /// Flush the accumulated frame to `w` in one write, per the append-buffer
    /// discipline this type exists to apply.
    pub fn flush(&mut self, w: &mut impl Write) -> std::io::Result<()> {
        self.buf.flush_to(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_render::view_model::ReplSnapshot;

    fn empty_repl() -> ReplSnapshot {
        ReplSnapshot { active: false, prompt: String::new(), input: String::new(), log: vec![], log_cap: 0 }
    }

    #[test]
    fn a_full_frame_produces_nonempty_output() {
        let mut r = TerminalRenderer::new();
        r.begin_frame(80, 24);
        r.render_tabs(&[]);
        r.render_row(Some(0), &[Segment { text: "hello".to_string(), class: HighlightClass::Normal, selected: false }], 0, false);
        r.render_status("[NORMAL] [No Name] Ln 1, Col 1 :");
        r.render_message(None);
        r.render_repl(&empty_repl());
        r.hide_cursor();
        r.end_frame();
        let mut out = Vec::new();
        r.flush(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hello"));
        assert!(text.contains("NORMAL"));
    }

    #[test]
    fn repl_overlay_writes_to_the_message_row() {
        let mut r = TerminalRenderer::new();
        r.begin_frame(80, 24);
        r.render_row(None, &[], 0, true);
        r.render_status("status");
        r.render_message(None);
        let repl = ReplSnapshot { active: true, prompt: "> ".to_string(), input: "1+1".to_string(), log: vec![], log_cap: 10 };
        r.render_repl(&repl);
        let mut out = Vec::new();
        r.flush(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("> 1+1"));
    }
}
