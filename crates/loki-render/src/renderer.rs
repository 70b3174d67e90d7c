//! Renderer protocol (§4.13): a callback bundle any transport implements to
//! turn a [`ViewModel`] into pixels/cells/bytes. Grounded on the redesign
//! flag in spec.md §9 calling for "abstract callback tables... interface
//! abstractions with one implementation per transport" in place of the
//! teacher's single hard-wired terminal-writer path (`core-render`'s
//! `Frame`/`Cell` grid talks directly to `core-terminal`, with no seam for a
//! second transport).

use crate::segment::Segment;

/// One callback bundle per frame. `render_row`/`render_tabs`/etc. are called
/// in the order a human would read a frame: frame bracket, tabs, rows,
/// status, message, REPL, cursor.
pub trait Renderer {
    fn begin_frame(&mut self, cols: usize, rows: usize);
    fn end_frame(&mut self);

    fn render_tabs(&mut self, tabs: &[crate::view_model::TabInfo]);
    fn render_row(&mut self, row_num: Option<usize>, segments: &[Segment], gutter_width: usize, is_empty: bool);
    fn render_status(&mut self, status: &str);
    fn render_message(&mut self, message: Option<&str>);
    fn render_repl(&mut self, repl: &crate::view_model::ReplSnapshot);

    fn set_cursor(&mut self, row: usize, col: usize);
    fn show_cursor(&mut self);
    fn hide_cursor(&mut self);

    fn clipboard_copy(&mut self, text: &str) -> anyhow::Result<()>;

    fn destroy(&mut self);
}

/// Drive one [`Renderer`] through a full frame from a [`crate::ViewModel`].
pub fn render_frame(renderer: &mut dyn Renderer, snapshot: &crate::view_model::ViewModel) {
    renderer.begin_frame(snapshot.screen_cols, snapshot.screen_rows);
    renderer.render_tabs(&snapshot.tabs);
    for row in &snapshot.rows {
        renderer.render_row(row.row_num, &row.segments, snapshot.gutter_width, row.row_num.is_none());
    }
    renderer.render_status(&snapshot.status);
    renderer.render_message(snapshot.message.as_deref());
    renderer.render_repl(&snapshot.repl);
    if snapshot.cursor.visible {
        renderer.set_cursor(snapshot.cursor.screen_row, snapshot.cursor.screen_col);
        renderer.show_cursor();
    } else {
        renderer.hide_cursor();
    }
    renderer.end_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null_renderer::NullRenderer;

    #[test]
    fn null_renderer_accepts_a_full_frame_without_panicking() {
        let mut r = NullRenderer::default();
        let snapshot = crate::view_model::ViewModel {
            screen_rows: 24,
            screen_cols: 80,
            gutter_width: 0,
            rows: vec![crate::view_model::RowView { row_num: Some(0), segments: vec![] }],
            tabs: vec![],
            status: "[NORMAL] [No Name] Ln 1, Col 1 :".to_string(),
            message: None,
            repl: crate::view_model::ReplSnapshot { active: false, prompt: String::new(), input: String::new(), log: vec![], log_cap: 0 },
            cursor: crate::view_model::CursorInfo { screen_row: 0, screen_col: 0, file_row: 0, file_col: 0, visible: true },
        };
        render_frame(&mut r, &snapshot);
    }
}
