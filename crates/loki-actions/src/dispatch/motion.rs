//! Cursor motion dispatch (§4.4): apply a [`MotionKind`] to the current
//! view's cursor, extending the active selection first if a VISUAL mode is
//! active, then auto-scrolling to keep the cursor on screen.
//!
//! Grounded on `core-actions::dispatcher::motion`'s pairing of
//! `core-text::motion` application with `View::auto_scroll`, generalized to
//! also route through `SelectionModel::extend_to` for VISUAL motions
//! (enrichment: the teacher's VISUAL mode predates selection extension on
//! every motion and patched it in ad hoc per binding; here it is centralized
//! in one place).

use loki_model::EditorContext;
use loki_state::{Mode, SelectionKind};

use crate::MotionKind;

use super::DispatchResult;

const SCROLL_MARGIN: usize = 3;

fn auto_scroll_to_cursor(ctx: &mut EditorContext) {
    ctx.view.auto_scroll(ctx.view.cursor.line, SCROLL_MARGIN);
    let line = ctx.document.buffer.line(ctx.view.cursor.line).unwrap_or_default();
    let col = loki_text::grapheme::visual_col(&line, ctx.view.cursor.byte);
    ctx.view.auto_scroll_col(col, ctx.view.screen_cols, SCROLL_MARGIN);
}

fn apply(kind: MotionKind, ctx: &mut EditorContext) {
    let buf = &ctx.document.buffer;
    match kind {
        MotionKind::Left => loki_text::motion::left(buf, &mut ctx.view.cursor),
        MotionKind::Right => loki_text::motion::right(buf, &mut ctx.view.cursor),
        MotionKind::LineStart => loki_text::motion::line_start(buf, &mut ctx.view.cursor),
        MotionKind::LineEnd => loki_text::motion::line_end(buf, &mut ctx.view.cursor),
        MotionKind::WordForward => loki_text::motion::word_forward(buf, &mut ctx.view.cursor),
        MotionKind::WordBackward => loki_text::motion::word_backward(buf, &mut ctx.view.cursor),
        MotionKind::PrevBlankLine => loki_text::motion::prev_blank_line(buf, &mut ctx.view.cursor),
        MotionKind::NextBlankLine => loki_text::motion::next_blank_line(buf, &mut ctx.view.cursor),
        MotionKind::Up => {
            loki_text::motion::up(buf, &mut ctx.view.cursor, None);
        }
        MotionKind::Down => {
            loki_text::motion::down(buf, &mut ctx.view.cursor, None);
        }
        MotionKind::PageHalfUp => {
            let half = (ctx.view.text_height / 2).max(1);
            let mut sticky = None;
            for _ in 0..half {
                sticky = loki_text::motion::up(buf, &mut ctx.view.cursor, sticky);
            }
        }
        MotionKind::PageHalfDown => {
            let half = (ctx.view.text_height / 2).max(1);
            let mut sticky = None;
            for _ in 0..half {
                sticky = loki_text::motion::down(buf, &mut ctx.view.cursor, sticky);
            }
        }
    }
    loki_text::motion::normalize_normal_mode_position(buf, &mut ctx.view.cursor);
}

pub fn handle_motion(kind: MotionKind, ctx: &mut EditorContext) -> DispatchResult {
    apply(kind, ctx);
    if let Some(selection_kind) = selection_kind_for(ctx.view.mode) {
        ctx.view.selection.extend_to(ctx.view.cursor, selection_kind);
    }
    auto_scroll_to_cursor(ctx);
    DispatchResult::clean()
}

/// INSERT-mode shift+arrow (§4.4): begin a selection on first use, extend on
/// subsequent presses, without requiring a prior `v`/`V`.
pub fn handle_extend_selection(kind: MotionKind, ctx: &mut EditorContext) -> DispatchResult {
    if !ctx.view.selection.is_active() {
        ctx.view.selection.begin(ctx.view.cursor, SelectionKind::Characterwise);
    }
    apply(kind, ctx);
    ctx.view.selection.extend_to(ctx.view.cursor, SelectionKind::Characterwise);
    auto_scroll_to_cursor(ctx);
    DispatchResult::clean()
}

fn selection_kind_for(mode: Mode) -> Option<SelectionKind> {
    match mode {
        Mode::VisualChar => Some(SelectionKind::Characterwise),
        Mode::VisualLine => Some(SelectionKind::Linewise),
        _ => None,
    }
}
