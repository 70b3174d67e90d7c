//! Interactive search dispatch (§4.5): wires `Action::Search*` into the
//! per-view `Option<SearchState>` and the document's `RowStore` overlay.

use loki_model::EditorContext;
use loki_state::SearchState;

use crate::Action;

use super::DispatchResult;

pub fn handle_search_action(action: Action, ctx: &mut EditorContext) -> DispatchResult {
    match action {
        Action::EnterSearch => {
            ctx.view.search = Some(SearchState::begin(ctx.view.cursor));
            DispatchResult::clean()
        }
        Action::SearchChar(ch) => {
            if let Some(search) = ctx.view.search.as_mut() {
                search.push_str(&ch.to_string());
                if let Some(pos) = search.update(&mut ctx.document.rows) {
                    ctx.view.cursor = pos;
                    ctx.view.auto_scroll(pos.line, 3);
                }
            }
            DispatchResult::clean()
        }
        Action::SearchBackspace => {
            if let Some(search) = ctx.view.search.as_mut() {
                search.backspace(&mut ctx.document.rows);
            }
            DispatchResult::clean()
        }
        Action::SearchDirection(dir) => {
            if let Some(search) = ctx.view.search.as_mut() {
                search.set_direction(dir);
                if let Some(pos) = search.update(&mut ctx.document.rows) {
                    ctx.view.cursor = pos;
                    ctx.view.auto_scroll(pos.line, 3);
                }
            }
            DispatchResult::clean()
        }
        Action::SearchAccept => {
            if let Some(search) = ctx.view.search.take() {
                ctx.view.cursor = search.accept(&mut ctx.document.rows);
            }
            DispatchResult::clean()
        }
        Action::SearchCancel => {
            if let Some(search) = ctx.view.search.take() {
                ctx.view.cursor = search.cancel(&mut ctx.document.rows);
            }
            DispatchResult::clean()
        }
        _ => DispatchResult::clean(),
    }
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
    fn search_char_moves_cursor_to_first_match() {
        let mut c = ctx("hello world");
        handle_search_action(Action::EnterSearch, &mut c);
        for ch in "world".chars() {
            handle_search_action(Action::SearchChar(ch), &mut c);
        }
        assert_eq!(c.view.cursor, Position::new(0, 6));
    }

    #[test]
    fn search_cancel_restores_original_cursor() {
        let mut c = ctx("hello world");
        c.view.cursor = Position::new(0, 2);
        handle_search_action(Action::EnterSearch, &mut c);
        handle_search_action(Action::SearchChar('w'), &mut c);
        handle_search_action(Action::SearchCancel, &mut c);
        assert_eq!(c.view.cursor, Position::new(0, 2));
        assert!(c.view.search.is_none());
    }
}
