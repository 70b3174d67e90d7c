//! A `Renderer` that discards every call (§4.13), required so the rest of
//! the engine's tests can drive a full event/dispatch cycle without a real
//! terminal attached. Grounded on `core-terminal`'s cfg-gated test stub,
//! generalized into a first-class renderer implementation rather than a
//! conditional compile path.

use crate::renderer::Renderer;
use crate::segment::Segment;
use crate::view_model::{ReplSnapshot, TabInfo};

#[derive(Debug, Default, Clone)]
pub struct NullRenderer {
    pub frames_begun: usize,
    pub last_clipboard: Option<String>,
}

impl Renderer for NullRenderer {
    fn begin_frame(&mut self, _cols: usize, _rows: usize) {
        self.frames_begun += 1;
    }
    fn end_frame(&mut self) {}

    fn render_tabs(&mut self, _tabs: &[TabInfo]) {}
    fn render_row(&mut self, _row_num: Option<usize>, _segments: &[Segment], _gutter_width: usize, _is_empty: bool) {}
    fn render_status(&mut self, _status: &str) {}
    fn render_message(&mut self, _message: Option<&str>) {}
    fn render_repl(&mut self, _repl: &ReplSnapshot) {}

    fn set_cursor(&mut self, _row: usize, _col: usize) {}
    fn show_cursor(&mut self) {}
    fn hide_cursor(&mut self) {}

    fn clipboard_copy(&mut self, text: &str) -> anyhow::Result<()> {
        self.last_clipboard = Some(text.to_string());
        Ok(())
    }

    fn destroy(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_copy_records_the_text() {
        let mut r = NullRenderer::default();
        r.clipboard_copy("hello").unwrap();
        assert_eq!(r.last_clipboard.as_deref(), Some("hello"));
    }

    #[test]
    fn begin_frame_counts_calls() {
        let mut r = NullRenderer::default();
        r.begin_frame(80, 24);
        r.begin_frame(80, 24);
        assert_eq!(r.frames_begun, 2);
    }
}
