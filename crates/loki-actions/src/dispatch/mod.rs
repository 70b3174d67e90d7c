//! Applying a translated [`Action`] to a [`BufferManager`] (§4.4, §4.8-§4.12).
//!
//! Grounded on `core-actions::dispatcher`'s module decomposition (`motion`,
//! `mode`, `edit`, `command`, `undo` submodules feeding one `dispatch` entry
//! point, plus the `DispatchResult` struct with its four constructors),
//! adapted to route through `loki_model::BufferManager::split_current` in
//! place of the teacher's `EditorModel::split_state_and_active_view` (both
//! exist for the same reason: disjoint mutable access to per-buffer state
//! and clipboard-like shared state without unsafe pointer splitting).

mod buffer_nav;
mod command;
mod edit;
mod mode;
mod motion;
mod operator;
mod search;
mod undo;

use loki_model::BufferManager;

use crate::{Action, KeyTranslator};
use crate::command_registry::CommandRegistry;

/// Result of dispatching a single [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// A structural change occurred (file replaced, multi-line span
    /// touched) that invalidates any incremental render cache; the caller
    /// should escalate to a full repaint regardless of `dirty`.
    pub buffer_replaced: bool,
    /// Text a yank/copy just produced, to be forwarded to the renderer's
    /// clipboard integration (§4.6) by whatever host holds a `Renderer`.
    pub clipboard: Option<String>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self { dirty: true, quit: false, buffer_replaced: false, clipboard: None }
    }
    pub fn clean() -> Self {
        Self { dirty: false, quit: false, buffer_replaced: false, clipboard: None }
    }
    pub fn quit() -> Self {
        Self { dirty: true, quit: true, buffer_replaced: false, clipboard: None }
    }
    pub fn buffer_replaced() -> Self {
        Self { dirty: true, quit: false, buffer_replaced: true, clipboard: None }
    }

    /// Attach clipboard text to an already-built result (used by the yank
    /// arms in `operator`, in addition to the internal register write).
    pub fn with_clipboard(mut self, text: String) -> Self {
        self.clipboard = Some(text);
        self
    }
}

/// Observes every action before it is applied (metrics, plugin hooks, a
/// recording macro). `loki-plugin` supplies the row-highlight/keymap hooks;
/// this trait is the action-level equivalent.
pub trait ActionObserver {
    fn on_action(&self, action: &Action);
}

/// Apply `action` against the current buffer. `registry` resolves
/// `CommandExecute` bodies (§4.9); `translator` is reset whenever the mode
/// changes so no stray count/operator/register state leaks across a modal
/// transition.
pub fn dispatch(
    action: Action,
    mgr: &mut BufferManager,
    registry: &mut CommandRegistry,
    translator: &mut KeyTranslator,
    observers: &[Box<dyn ActionObserver>],
) -> DispatchResult {
    for obs in observers {
        obs.on_action(&action);
    }

    if !matches!(action, Action::Quit) {
        mgr.current_mut().view.quit_confirm_presses = 0;
    }

    let result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, mgr.current_mut()),
        Action::MotionWithCount { motion: kind, count } => {
            let ctx = mgr.current_mut();
            let mut result = DispatchResult::clean();
            for _ in 0..count.max(1) {
                let r = motion::handle_motion(kind, ctx);
                result.dirty |= r.dirty;
            }
            result
        }
        Action::ExtendSelection(kind) => motion::handle_extend_selection(kind, mgr.current_mut()),
        Action::ModeChange(mc) => {
            let r = mode::handle_mode_change(mc, mgr.current_mut());
            translator.reset();
            r
        }
        Action::Edit(kind) => edit::handle_edit(kind, mgr.current_mut()),
        Action::Undo => undo::handle_undo(mgr.current_mut()),
        Action::Redo => undo::handle_redo(mgr.current_mut()),
        Action::BeginOperator(_) => DispatchResult::clean(),
        Action::ApplyOperator { op, motion, count, register } => operator::apply_operator(mgr, op, motion, count, register),
        Action::VisualOperator { op, register } => operator::visual_operator(mgr, op, register),
        Action::PasteAfter { register } => operator::paste(mgr, register, false),
        Action::PasteBefore { register } => operator::paste(mgr, register, true),
        Action::CommandStart
        | Action::CommandChar(_)
        | Action::CommandBackspace
        | Action::CommandCancel
        | Action::CommandExecute(_) => command::handle_command_action(action, mgr, registry),
        Action::HistoryPrev => {
            mgr.current_mut().view.command_line.history_prev();
            DispatchResult::dirty()
        }
        Action::HistoryNext => {
            mgr.current_mut().view.command_line.history_next();
            DispatchResult::dirty()
        }
        Action::EnterSearch | Action::SearchChar(_) | Action::SearchBackspace | Action::SearchDirection(_) | Action::SearchAccept | Action::SearchCancel => {
            search::handle_search_action(action, mgr.current_mut())
        }
        Action::BeginBufferPrefix => {
            mgr.current_mut().view.pending_prefix = Some('\u{18}');
            DispatchResult::clean()
        }
        Action::BufferPrefixKey(key) => buffer_nav::handle_buffer_prefix(mgr, key),
        Action::CreateBuffer => {
            let (rows, cols) = {
                let ctx = mgr.current();
                (ctx.view.screen_rows, ctx.view.screen_cols)
            };
            match mgr.create(None, rows, cols) {
                Ok(_) => {
                    mgr.refresh_current_meta();
                    DispatchResult::buffer_replaced()
                }
                Err(_) => DispatchResult::clean(),
            }
        }
        Action::ToggleRepl => {
            mgr.current_mut().view.repl.toggle();
            DispatchResult::dirty()
        }
        Action::Save => command::save_current(mgr, None),
        Action::Quit => buffer_nav::handle_quit(mgr, false),
        Action::QuitForce => buffer_nav::handle_quit(mgr, true),
        Action::Resize { rows, cols } => {
            mgr.current_mut().view.resize(rows as usize, cols as usize);
            DispatchResult::dirty()
        }
        Action::None => DispatchResult::clean(),
    };

    mgr.refresh_current_meta();
    result
}
