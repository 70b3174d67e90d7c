//! Text-mutation dispatch (§4.4, §4.7): NORMAL/INSERT key presses that edit
//! the buffer directly rather than moving the cursor or an operator.
//!
//! Grounded on `core-actions::dispatcher::edit`'s routing of each key to its
//! `DocumentModel` method and its `maybe_electric_dedent` hook fired right
//! after every inserted character.

use loki_model::EditorContext;
use loki_text::Position;

use crate::EditKind;

use super::DispatchResult;

pub fn handle_edit(kind: EditKind, ctx: &mut EditorContext) -> DispatchResult {
    match kind {
        EditKind::InsertChar(ch) => {
            ctx.document.insert_char(&mut ctx.view.cursor, ch);
            ctx.document.maybe_electric_dedent(&mut ctx.view.cursor, ch);
        }
        EditKind::InsertNewline => {
            ctx.document.insert_newline(&mut ctx.view.cursor);
        }
        EditKind::Backspace => {
            ctx.document.delete_char_before(&mut ctx.view.cursor);
        }
        EditKind::DeleteUnder => {
            ctx.document.delete_char_at(&ctx.view.cursor);
        }
        EditKind::OpenLineBelow => {
            let line = ctx.view.cursor.line;
            let mut pos = Position::new(line, ctx.document.buffer.line_byte_len(line));
            ctx.document.insert_newline(&mut pos);
            ctx.view.cursor = pos;
            ctx.view.mode = loki_state::Mode::Insert;
        }
        EditKind::OpenLineAbove => {
            let mut pos = Position::new(ctx.view.cursor.line, 0);
            ctx.document.insert_newline(&mut pos);
            ctx.view.cursor = Position::new(ctx.view.cursor.line, 0);
            ctx.view.mode = loki_state::Mode::Insert;
        }
    }
    DispatchResult::dirty()
}
