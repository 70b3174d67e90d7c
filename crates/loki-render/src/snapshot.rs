//! Assemble one frame's [`ViewModel`] from the current buffer-manager state
//! (§4.12). Grounded on `core-render`'s top-level `render()` entry point,
//! which walked the same handful of sources (row store, status line, message,
//! cursor) to fill its `Frame`; here the destination is an owned snapshot
//! struct instead of a cell grid, so a transport-specific `Renderer` can
//! format it however it likes.

use loki_model::BufferManager;

use crate::segment::build_row_segments_windowed;
use crate::status::{build_status, StatusContext};
use crate::view_model::{CursorInfo, ReplSnapshot, RowView, TabInfo, ViewModel};

/// Line-number gutter width: digit width of the highest line number plus one
/// separator column, or zero when the toggle is off. No teacher precedent —
/// kilo has no line numbers — designed fresh against §4.9's `:set number`.
fn gutter_width(row_count: usize, enabled: bool) -> usize {
    if !enabled {
        return 0;
    }
    row_count.max(1).to_string().len() + 1
}

pub fn build_snapshot(mgr: &BufferManager) -> ViewModel {
    let ctx = mgr.current();
    let view = &ctx.view;
    let doc = &ctx.document;

    let row_count = doc.row_count();
    let gutter = gutter_width(row_count, view.flags.line_numbers);
    let text_width = view.screen_cols.saturating_sub(gutter);

    let mut rows = Vec::with_capacity(view.text_height);
    for i in 0..view.text_height {
        let line = view.row_offset + i;
        if line < row_count {
            let row = doc.rows.row(line).expect("line index checked against row_count");
            let segments = build_row_segments_windowed(row, line, &view.selection, view.col_offset, text_width);
            rows.push(RowView { row_num: Some(line), segments });
        } else {
            rows.push(RowView { row_num: None, segments: Vec::new() });
        }
    }

    let tabs = mgr
        .list()
        .into_iter()
        .map(|(id, meta)| TabInfo { label: meta.label.clone(), modified: meta.modified, current: id == mgr.current_id() })
        .collect();

    let selection_kind = match view.mode {
        loki_state::Mode::VisualChar | loki_state::Mode::VisualLine => view.selection.active.map(|s| s.kind),
        _ => None,
    };
    let line_content = doc.buffer.line(view.cursor.line).unwrap_or_default();
    let visual_col = loki_text::grapheme::visual_col(&line_content, view.cursor.byte);

    let status = build_status(&StatusContext {
        mode: view.mode,
        line: view.cursor.line,
        col: visual_col,
        command_active: view.command_line.is_active(),
        command_buffer: view.command_line.buffer(),
        file_name: doc.filename.as_deref(),
        dirty: doc.dirty > 0,
        selection: selection_kind,
    });

    let message = view.message.as_ref().filter(|m| !m.is_expired()).map(|m| m.text.clone());

    let repl = ReplSnapshot {
        active: view.repl.active,
        prompt: view.repl.prompt.clone(),
        input: view.repl.input.clone(),
        log: view.repl.log.iter().cloned().collect(),
        log_cap: view.repl.log_cap,
    };

    let row_visible = view.cursor.line >= view.row_offset && view.cursor.line < view.row_offset + view.text_height;
    let col_visible = visual_col >= view.col_offset && visual_col < view.col_offset + text_width;
    let cursor = CursorInfo {
        screen_row: view.cursor.line.saturating_sub(view.row_offset),
        screen_col: gutter + visual_col.saturating_sub(view.col_offset),
        file_row: view.cursor.line,
        file_col: visual_col,
        visible: row_visible && col_visible,
    };

    ViewModel {
        screen_rows: view.screen_rows,
        screen_cols: view.screen_cols,
        gutter_width: gutter,
        rows,
        tabs,
        status,
        message,
        repl,
        cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_model::{EditorContext, ViewState};
    use loki_state::DocumentModel;

    fn mgr(content: &str, screen_rows: usize, screen_cols: usize) -> BufferManager {
        BufferManager::new(EditorContext::new(DocumentModel::from_content("t", content, None), ViewState::new(screen_rows, screen_cols)))
    }

    #[test]
    fn rows_past_eof_have_no_row_number() {
        let m = mgr("one\ntwo", 10, 80);
        let snap = build_snapshot(&m);
        assert_eq!(snap.rows[0].row_num, Some(0));
        assert_eq!(snap.rows[1].row_num, Some(1));
        assert_eq!(snap.rows[2].row_num, None);
    }

    #[test]
    fn gutter_width_is_zero_when_line_numbers_disabled() {
        let mut m = mgr("one\ntwo", 10, 80);
        m.current_mut().view.flags.line_numbers = false;
        let snap = build_snapshot(&m);
        assert_eq!(snap.gutter_width, 0);
    }

    #[test]
    fn gutter_width_grows_with_line_count() {
        let content = (0..150).map(|_| "x").collect::<Vec<_>>().join("\n");
        let m = mgr(&content, 10, 80);
        let snap = build_snapshot(&m);
        assert_eq!(snap.gutter_width, 4); // "150".len() + 1
    }

    #[test]
    fn cursor_info_reports_screen_relative_position() {
        let mut m = mgr("abc\ndef\nghi", 10, 80);
        m.current_mut().view.flags.line_numbers = false;
        m.current_mut().view.cursor = loki_text::Position::new(1, 2);
        let snap = build_snapshot(&m);
        assert_eq!(snap.cursor.file_row, 1);
        assert_eq!(snap.cursor.file_col, 2);
        assert_eq!(snap.cursor.screen_row, 1);
        assert!(snap.cursor.visible);
    }

    #[test]
    fn tabs_mark_the_current_buffer() {
        let mut m = mgr("abc", 10, 80);
        m.create(None, 10, 80).unwrap();
        let snap = build_snapshot(&m);
        assert_eq!(snap.tabs.len(), 2);
        assert!(!snap.tabs[0].current);
        assert!(snap.tabs[1].current);
    }
}
