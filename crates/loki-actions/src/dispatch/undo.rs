//! Undo/redo dispatch (§4.3): a thin wrapper around `DocumentModel::{undo,redo}`.

use loki_model::EditorContext;

use super::DispatchResult;

pub fn handle_undo(ctx: &mut EditorContext) -> DispatchResult {
    if ctx.document.undo(&mut ctx.view.cursor) {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub fn handle_redo(ctx: &mut EditorContext) -> DispatchResult {
    if ctx.document.redo(&mut ctx.view.cursor) {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_model::ViewState;
    use loki_state::DocumentModel;
    use loki_text::Position;

    #[test]
    fn undo_reports_clean_when_journal_is_empty() {
        let mut c = EditorContext::new(DocumentModel::from_content("t", "abc", None), ViewState::new(24, 80));
        assert!(!handle_undo(&mut c).dirty);
    }

    #[test]
    fn undo_after_insert_restores_content() {
        let mut c = EditorContext::new(DocumentModel::from_content("t", "ac", None), ViewState::new(24, 80));
        c.view.cursor = Position::new(0, 1);
        c.document.insert_char(&mut c.view.cursor, 'b');
        let r = handle_undo(&mut c);
        assert!(r.dirty);
        assert_eq!(c.document.buffer.line(0).unwrap(), "ac");
    }
}
