//! The session façade (§4.12): "an opaque handle owning one editor context,
//! a 'should quit' flag, and lifecycle for the optional scripting host."
//! Assembles every other crate in the workspace into the handful of
//! operations a host (a terminal loop, a JSON-RPC harness, a web server)
//! actually calls: `new`, `handle_event`, `snapshot`, `resize`, `open`,
//! `save`.
//!
//! No single teacher file plays this role directly; `loki-model`'s
//! `BufferManager`/`EditorContext` pairing plus `loki-actions::dispatch`
//! already provide the teacher-grounded mechanics (disjoint-borrow buffer
//! management, the modal dispatch table) this crate wires together, in the
//! same "thin façade over a handful of already-built subsystems" shape the
//! teacher's own binary crate uses to drive its event loop.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use loki_actions::dispatch::dispatch;
use loki_actions::{command_registry::CommandRegistry, key_translator::translate_search_key, Action, ActionObserver, KeyTranslator};
use loki_config::{Config, ConfigContext, ConfigPlatformTraits};
use loki_events::{Event, KeyEvent};
use loki_model::{BufferManager, EditorContext, ViewState};
use loki_plugin::ScriptingHost;
use loki_render::{build_snapshot, ViewModel};
use loki_state::{DocumentModel, Mode, UndoJournal};

pub use error::LokiError;

/// Result of routing one event through the modal machine (§4.12:
/// `handle_event(ev) -> {ok, quit, error}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleOutcome {
    pub ok: bool,
    pub quit: bool,
    pub error: Option<String>,
    /// Text a yank/copy just produced (§4.6); a host holding a `Renderer`
    /// forwards this to `Renderer::clipboard_copy` after handling the event.
    pub clipboard: Option<String>,
}

impl HandleOutcome {
    fn ok() -> Self {
        Self { ok: true, quit: false, error: None, clipboard: None }
    }
    fn quit() -> Self {
        Self { ok: true, quit: true, error: None, clipboard: None }
    }
    fn err(message: impl Into<String>) -> Self {
        Self { ok: false, quit: false, error: Some(message.into()), clipboard: None }
    }
}

pub struct Session {
    mgr: BufferManager,
    registry: CommandRegistry,
    translator: KeyTranslator,
    observers: Vec<Box<dyn ActionObserver>>,
    scripting: Option<Box<dyn ScriptingHost>>,
    config: Config,
    should_quit: bool,
}

impl Session {
    /// Builds the engine and, if `initial_file` is given, opens it (§4.12
    /// "builds and optionally opens an initial file"). Config's `[display]`
    /// and `[indent]`/`[undo]` tables are applied to the freshly built
    /// context immediately, so a loaded `loki.toml` takes effect before the
    /// first frame is ever drawn.
    pub fn new(config: Config, initial_file: Option<PathBuf>, rows: usize, cols: usize) -> Result<Self, LokiError> {
        let document = match &initial_file {
            Some(path) => open_document(path)?,
            None => DocumentModel::empty(),
        };
        let view = ViewState::new(rows, cols);
        let mut ctx = EditorContext::new(document, view);
        apply_config_to_context(&mut ctx, &config);

        let mut session = Self {
            mgr: BufferManager::new(ctx),
            registry: CommandRegistry::new(),
            translator: KeyTranslator::new(),
            observers: Vec::new(),
            scripting: None,
            config,
            should_quit: false,
        };
        session.config.apply_viewport_height(rows as u16);
        Ok(session)
    }

    /// Attach a scripting host. Replaces any previously attached host.
    pub fn set_scripting_host(&mut self, host: Box<dyn ScriptingHost>) {
        tracing::info!(target: "session", host = host.name(), "scripting host attached");
        self.scripting = Some(host);
    }

    pub fn register_observer(&mut self, observer: Box<dyn ActionObserver>) {
        self.observers.push(observer);
    }

    /// Route one event through the modal machine.
    ///
    /// Key routing order mirrors §6/§4.5/§4.10: an in-progress interactive
    /// search prompt takes every keystroke first (it has no `Mode` of its
    /// own); otherwise the scripting host's keymap-lookup entry point is
    /// consulted before the built-in translator, since §6 describes the
    /// host as intercepting the event, not following it.
    pub fn handle_event(&mut self, event: Event) -> HandleOutcome {
        if self.should_quit {
            return HandleOutcome::quit();
        }
        let action = match event {
            Event::Key(key) => match self.translate_key(key) {
                Some(action) => action,
                None => return HandleOutcome::ok(),
            },
            Event::Resize { rows, cols } => {
                self.resize(rows as usize, cols as usize);
                return HandleOutcome::ok();
            }
            Event::Command(body) => self.registry_command_action(&body),
            Event::Action(_) | Event::Mouse(_) | Event::None => Action::None,
            Event::Quit => Action::Quit,
        };

        let result = dispatch(action, &mut self.mgr, &mut self.registry, &mut self.translator, &self.observers);
        if result.quit {
            self.should_quit = true;
            return HandleOutcome::quit();
        }
        let mut outcome = HandleOutcome::ok();
        outcome.clipboard = result.clipboard;
        outcome
    }

    fn translate_key(&mut self, key: KeyEvent) -> Option<Action> {
        let search_active = self.mgr.current().view.search.is_some();
        if search_active {
            return Some(translate_search_key(key));
        }
        // The command line is an overlay the same way search is (§4.4):
        // nothing ever sets `view.mode` to `Mode::Command` itself, `:`
        // only starts the mini-buffer, so an active mini-buffer routes
        // through the COMMAND grammar regardless of the underlying mode.
        if self.mgr.current().view.command_line.is_active() {
            return Some(self.translator.translate(Mode::Command, key));
        }
        if let Some(host) = self.scripting.as_deref() {
            let mode = self.mgr.current().view.mode;
            let outcome = host.lookup_keymap(mode, key);
            if outcome.is_handled() {
                tracing::debug!(target: "session.scripting", host = host.name(), "key claimed by scripting host");
                return None;
            }
        }
        let mode = self.mgr.current().view.mode;
        Some(self.translator.translate(mode, key))
    }

    /// `Event::Command` carries a pre-parsed command line (used by
    /// transports, e.g. the JSON-RPC harness's `insert`, that hand the
    /// engine a whole line rather than decomposed keystrokes). Routed
    /// through the same `CommandExecute` path a `:`-typed line takes.
    fn registry_command_action(&mut self, body: &str) -> Action {
        self.mgr.current_mut().view.command_line.begin();
        for ch in body.chars() {
            self.mgr.current_mut().view.command_line.push_char(ch);
        }
        Action::CommandExecute(body.to_string())
    }

    /// Deep-copies everything a renderer needs for one frame (§4.12).
    pub fn snapshot(&self) -> ViewModel {
        build_snapshot(&self.mgr)
    }

    /// Direct pass-through: resizes the current view and recomputes the
    /// config-derived scroll margin against the new viewport height.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.mgr.current_mut().view.resize(rows, cols);
        if let Some(margin) = self.config.recompute_after_resize(rows as u16) {
            tracing::debug!(target: "session", margin, "scroll margin recomputed after resize");
        }
    }

    /// Recompute the scroll margin against a caller-supplied context (built
    /// via [`viewport_config_context`]) instead of the bare viewport height
    /// `resize` assumes. Lets a host thread real terminal-capability/overlay
    /// information (a REPL pane open, no scroll-region support) into the
    /// clamp without reaching into `Session`'s own `Config`, which stays
    /// private.
    pub fn apply_viewport_context(&mut self, ctx: ConfigContext) {
        if let Some(margin) = self.config.recompute_with_context(ctx) {
            tracing::debug!(target: "session", margin, "scroll margin recomputed from viewport context");
        }
    }

    /// Direct pass-through: opens `path` in a new buffer slot (§4.8).
    pub fn open(&mut self, path: &Path) -> Result<(), LokiError> {
        let (rows, cols) = {
            let view = &self.mgr.current().view;
            (view.screen_rows, view.screen_cols)
        };
        self.mgr
            .create(Some(path), rows, cols)
            .map(|_| ())
            .map_err(|e| LokiError::NotFound(e.to_string()))
    }

    /// Direct pass-through: saves the current buffer to its existing
    /// filename, or fails with `InvalidArgument` if it has none yet (use
    /// `:w path` / the `ParsedCommand::Save` path for "save as").
    pub fn save(&mut self) -> Result<(), LokiError> {
        let doc = &mut self.mgr.current_mut().document;
        if doc.filename.is_none() {
            return Err(LokiError::InvalidArgument("no filename set for current buffer".to_string()));
        }
        doc.save().map(|_| ()).map_err(|e| LokiError::Io(std::io::Error::other(e.to_string())))
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn current_mode(&self) -> Mode {
        self.mgr.current().view.mode
    }

    pub fn is_dirty(&self) -> bool {
        self.mgr.current().document.dirty > 0
    }

    pub fn filename(&self) -> Option<&Path> {
        self.mgr.current().document.filename.as_deref()
    }
}

fn open_document(path: &Path) -> Result<DocumentModel, LokiError> {
    DocumentModel::open(path).map_err(|e| LokiError::NotFound(e.to_string()))
}

/// Threads a loaded config's `[display]`/`[undo]`/`[indent]` tables into a
/// freshly built context. `[scroll]`/`[input]` are applied separately
/// through `Config::apply_viewport_height`/`apply_context` since they
/// depend on the live viewport rather than the document.
fn apply_config_to_context(ctx: &mut EditorContext, config: &Config) {
    ctx.view.flags.line_numbers = config.file.display.line_numbers;
    ctx.view.flags.word_wrap = config.file.display.word_wrap;
    ctx.document.indent.unit = config.file.indent.unit;
    ctx.document.undo = UndoJournal::with_config(
        config.file.undo.history_max,
        config.file.undo.byte_budget,
        Duration::from_millis(config.file.undo.idle_ms),
    );
}

/// Builds the viewport/platform context `Config::apply_context` expects,
/// given just the current terminal dimensions (§4.12 callers rarely know
/// status/overlay row counts ahead of time, so this uses the same one-row
/// status-line convention the renderer assumes elsewhere).
pub fn viewport_config_context(rows: u16, cols: u16, supports_scroll_region: bool) -> ConfigContext {
    ConfigContext::new(cols, rows, 1, 0, ConfigPlatformTraits::new(cfg!(windows), supports_scroll_region))
}
