//! Modal transitions (§4.4): entering/leaving INSERT and VISUAL.
//!
//! Grounded on `core-actions::dispatcher::mode`'s cursor-retreat-on-leave
//! behavior (NORMAL mode's block cursor can never rest past the last
//! grapheme of a non-empty line; leaving INSERT re-clamps it) and its
//! selection seeding on entering VISUAL.

use loki_model::EditorContext;
use loki_state::{Mode, SelectionKind};

use crate::ModeChange;

use super::DispatchResult;

pub fn handle_mode_change(mc: ModeChange, ctx: &mut EditorContext) -> DispatchResult {
    match mc {
        ModeChange::EnterInsert => {
            ctx.view.mode = Mode::Insert;
        }
        ModeChange::EnterInsertAfter => {
            loki_text::motion::right(&ctx.document.buffer, &mut ctx.view.cursor);
            ctx.view.mode = Mode::Insert;
        }
        ModeChange::LeaveInsert => {
            ctx.view.mode = Mode::Normal;
            loki_text::motion::normalize_normal_mode_position(&ctx.document.buffer, &mut ctx.view.cursor);
        }
        ModeChange::EnterVisualChar => {
            ctx.view.mode = Mode::VisualChar;
            ctx.view.selection.begin(ctx.view.cursor, SelectionKind::Characterwise);
        }
        ModeChange::EnterVisualLine => {
            ctx.view.mode = Mode::VisualLine;
            ctx.view.selection.begin(ctx.view.cursor, SelectionKind::Linewise);
        }
        ModeChange::LeaveVisual => {
            ctx.view.mode = Mode::Normal;
            ctx.view.selection.clear();
        }
    }
    DispatchResult::clean()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_model::ViewState;
    use loki_state::DocumentModel;
    use loki_text::Position;

    fn ctx(content: &str) -> EditorContext {
        EditorContext::new(DocumentModel::from_content("t", content, None), ViewState::new(24, 80))
    }

    #[test]
    fn leave_insert_retreats_cursor_off_trailing_newline_gap() {
        let mut c = ctx("abc");
        c.view.cursor = Position::new(0, 3);
        handle_mode_change(ModeChange::LeaveInsert, &mut c);
        assert_eq!(c.view.mode, Mode::Normal);
        assert_eq!(c.view.cursor, Position::new(0, 2));
    }

    #[test]
    fn enter_visual_char_seeds_empty_selection_at_cursor() {
        let mut c = ctx("abc");
        handle_mode_change(ModeChange::EnterVisualChar, &mut c);
        assert!(c.view.selection.is_active());
        assert!(c.view.selection.active.unwrap().is_empty());
    }

    #[test]
    fn leave_visual_clears_selection() {
        let mut c = ctx("abc");
        handle_mode_change(ModeChange::EnterVisualChar, &mut c);
        handle_mode_change(ModeChange::LeaveVisual, &mut c);
        assert!(!c.view.selection.is_active());
        assert_eq!(c.view.mode, Mode::Normal);
    }

    #[test]
    fn enter_insert_after_moves_cursor_right_first() {
        let mut c = ctx("abc");
        handle_mode_change(ModeChange::EnterInsertAfter, &mut c);
        assert_eq!(c.view.cursor, Position::new(0, 1));
        assert_eq!(c.view.mode, Mode::Insert);
    }
}
