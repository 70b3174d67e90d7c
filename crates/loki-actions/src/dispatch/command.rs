//! COMMAND-mode line entry and execution (§4.4, §4.9).
//!
//! Grounded on `core-actions::dispatcher::command`'s `handle_command_action`/
//! `execute_command` split: one function drives the mini-buffer (begin, char,
//! backspace, cancel), the other interprets a committed line against
//! [`CommandRegistry`] and acts on [`BufferManager`].

use std::path::PathBuf;

use loki_model::BufferManager;

use crate::command_registry::{CommandRegistry, ParsedCommand};
use crate::Action;

use super::DispatchResult;

pub fn handle_command_action(action: Action, mgr: &mut BufferManager, registry: &mut CommandRegistry) -> DispatchResult {
    match action {
        Action::CommandStart => {
            mgr.current_mut().view.command_line.begin();
            DispatchResult::clean()
        }
        Action::CommandChar(ch) => {
            mgr.current_mut().view.command_line.push_char(ch);
            DispatchResult::clean()
        }
        Action::CommandBackspace => {
            mgr.current_mut().view.command_line.backspace();
            DispatchResult::clean()
        }
        Action::CommandCancel => {
            mgr.current_mut().view.command_line.clear();
            DispatchResult::clean()
        }
        Action::CommandExecute(_) => {
            let raw = mgr.current_mut().view.command_line.commit();
            execute(&raw, mgr, registry)
        }
        _ => DispatchResult::clean(),
    }
}

fn execute(raw: &str, mgr: &mut BufferManager, registry: &mut CommandRegistry) -> DispatchResult {
    match registry.parse(raw) {
        ParsedCommand::Save(path) => save_current(mgr, path),
        ParsedCommand::Quit => super::buffer_nav::handle_quit(mgr, false),
        ParsedCommand::QuitForce => super::buffer_nav::handle_quit(mgr, true),
        ParsedCommand::SaveAndQuit(path) => {
            save_current(mgr, path);
            if mgr.current().document.dirty == 0 {
                super::buffer_nav::handle_quit(mgr, true)
            } else {
                DispatchResult::clean()
            }
        }
        ParsedCommand::Edit(path) => open_path(mgr, path),
        ParsedCommand::Goto(line) => {
            let ctx = mgr.current_mut();
            let target = line.saturating_sub(1).min(ctx.document.row_count().saturating_sub(1));
            ctx.view.cursor = loki_text::Position::new(target, 0);
            ctx.view.auto_scroll(target, 3);
            DispatchResult::clean()
        }
        ParsedCommand::Set { opt, value } => apply_set(mgr, &opt, value.as_deref()),
        ParsedCommand::Help(_) | ParsedCommand::Dynamic { .. } | ParsedCommand::ArityError { .. } | ParsedCommand::Unknown(_) => DispatchResult::clean(),
    }
}

fn apply_set(mgr: &mut BufferManager, opt: &str, value: Option<&str>) -> DispatchResult {
    let on = |v: Option<&str>| !matches!(v, Some("off") | Some("0") | Some("false"));
    let flags = &mut mgr.current_mut().view.flags;
    match opt {
        "number" | "nu" => flags.line_numbers = on(value),
        "wrap" => flags.word_wrap = on(value),
        _ => {}
    }
    DispatchResult::dirty()
}

pub fn save_current(mgr: &mut BufferManager, path: Option<PathBuf>) -> DispatchResult {
    let doc = &mut mgr.current_mut().document;
    let result = match path {
        Some(p) => doc.save_as(p),
        None => doc.save(),
    };
    match result {
        Ok(_) => DispatchResult::clean(),
        Err(e) => {
            tracing::warn!(target: "actions.command", error = %e, "save failed");
            DispatchResult::clean()
        }
    }
}

fn open_path(mgr: &mut BufferManager, path: PathBuf) -> DispatchResult {
    let (rows, cols) = {
        let view = &mgr.current().view;
        (view.screen_rows, view.screen_cols)
    };
    match mgr.create(Some(path.as_path()), rows, cols) {
        Ok(_) => DispatchResult::buffer_replaced(),
        Err(e) => {
            tracing::warn!(target: "actions.command", error = %e, path = %path.display(), "open failed");
            DispatchResult::clean()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_model::{EditorContext, ViewState};
    use loki_state::DocumentModel;

    fn mgr() -> BufferManager {
        BufferManager::new(EditorContext::new(DocumentModel::from_content("t", "abc\ndef\nghi", None), ViewState::new(24, 80)))
    }

    #[test]
    fn goto_moves_cursor_to_requested_line() {
        let mut m = mgr();
        let mut reg = CommandRegistry::new();
        execute("2", &mut m, &mut reg);
        assert_eq!(m.current().view.cursor.line, 1);
    }

    #[test]
    fn goto_clamps_past_last_line() {
        let mut m = mgr();
        let mut reg = CommandRegistry::new();
        execute("goto 99", &mut m, &mut reg);
        assert_eq!(m.current().view.cursor.line, 2);
    }

    #[test]
    fn set_nowrap_toggles_word_wrap_flag() {
        let mut m = mgr();
        let mut reg = CommandRegistry::new();
        assert!(!m.current().view.flags.word_wrap);
        execute("set wrap on", &mut m, &mut reg);
        assert!(m.current().view.flags.word_wrap);
        execute("set wrap off", &mut m, &mut reg);
        assert!(!m.current().view.flags.word_wrap);
    }

    #[test]
    fn save_without_filename_fails_silently() {
        let mut m = mgr();
        let mut reg = CommandRegistry::new();
        let r = execute("w", &mut m, &mut reg);
        assert!(!r.dirty);
    }

    #[test]
    fn command_start_char_backspace_roundtrip() {
        let mut m = mgr();
        let mut reg = CommandRegistry::new();
        handle_command_action(Action::CommandStart, &mut m, &mut reg);
        handle_command_action(Action::CommandChar('w'), &mut m, &mut reg);
        assert_eq!(m.current().view.command_line.buffer(), ":w");
        handle_command_action(Action::CommandBackspace, &mut m, &mut reg);
        assert_eq!(m.current().view.command_line.buffer(), ":");
    }
}
