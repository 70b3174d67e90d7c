//! Stateful key → [`Action`] translation (§4.4, §4.10).
//!
//! Grounded on `core-actions::key_translator::KeyTranslator`: count-prefix
//! accumulation, operator-pending state (`d`/`y`/`c` awaiting a motion, with
//! the `d0` → `LineStart` special case and multiplicative prefix×post-op
//! counts), and a register prefix (`"` + a-z/A-Z/0-9). Adapted to this
//! engine's `loki_state::Mode` (five variants: `Normal`, `Insert`,
//! `VisualChar`, `VisualLine`, `Command`) and `loki_events::{KeyCode,
//! KeyEvent, Modifiers}` in place of the teacher's `core_events` types.
//!
//! Operator-pending NORMAL-mode composites (`dw`, `2d3w`, `"ayy`) are not
//! named in the modal-state-machine spec's NORMAL bindings summary, which
//! only documents motions, mode changes, and `x`/`u`/`CTRL-R` — this is a
//! deliberate supplement, carried over from the teacher's fuller Vim-style
//! operator model, with VISUAL mode's `y`/`d`/`x` (the spec's only named
//! operators) as its single-keystroke-motion special case.

use loki_events::{KeyCode, KeyEvent, Modifiers};
use loki_state::{Mode, SearchDirection};

use crate::{Action, BufferPrefixKey, EditKind, ModeChange, MotionKind, OperatorKind};

#[derive(Debug, Default)]
pub struct KeyTranslator {
    pending_count: Option<u32>,
    pending_operator: Option<OperatorKind>,
    post_op_count: Option<u32>,
    pending_register: Option<char>,
    awaiting_register: bool,
}

const MAX_COUNT: u32 = 999_999;

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all accumulated count/operator/register state. Called on any
    /// mode transition so a stray count or operator never leaks across it.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Translate one key event given the mode it was received in, plus
    /// whether a `CTRL-X` buffer prefix or `"` register prefix is currently
    /// pending in the view (tracked by the caller, not this translator,
    /// since both are display-visible view state per §4.10/§4.8).
    pub fn translate(&mut self, mode: Mode, key: KeyEvent) -> Action {
        if let Some(action) = self.translate_global(key) {
            return action;
        }

        match mode {
            Mode::Command => self.translate_command(key),
            Mode::Insert => self.translate_insert(key),
            Mode::VisualChar | Mode::VisualLine => self.translate_visual(mode, key),
            Mode::Normal => self.translate_normal(key),
        }
    }

    /// Global bindings (§4.10): apply in every mode, ahead of modal
    /// delegation, and always cancel any in-progress count/operator/register
    /// accumulation since they belong to NORMAL's grammar only.
    fn translate_global(&mut self, key: KeyEvent) -> Option<Action> {
        if !key.mods.contains(Modifiers::CTRL) {
            return None;
        }
        let action = match key.code {
            KeyCode::Char('s') => Action::Save,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('f') => Action::EnterSearch,
            KeyCode::Char('l') => Action::ToggleRepl,
            KeyCode::Char('t') => Action::CreateBuffer,
            KeyCode::Char('x') => Action::BeginBufferPrefix,
            _ => return None,
        };
        self.reset();
        Some(action)
    }

    fn translate_command(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CommandCancel,
            KeyCode::Enter => Action::CommandExecute(String::new()),
            KeyCode::Backspace => Action::CommandBackspace,
            KeyCode::Up => Action::HistoryPrev,
            KeyCode::Down => Action::HistoryNext,
            KeyCode::Char(c) => Action::CommandChar(c),
            _ => Action::None,
        }
    }

    fn translate_insert(&mut self, key: KeyEvent) -> Action {
        if key.mods.contains(Modifiers::SHIFT) {
            let motion = match key.code {
                KeyCode::Up => Some(MotionKind::Up),
                KeyCode::Down => Some(MotionKind::Down),
                KeyCode::Left => Some(MotionKind::Left),
                KeyCode::Right => Some(MotionKind::Right),
                _ => None,
            };
            if let Some(m) = motion {
                return Action::ExtendSelection(m);
            }
        }
        match key.code {
            KeyCode::Esc => Action::ModeChange(ModeChange::LeaveInsert),
            KeyCode::Enter => Action::Edit(EditKind::InsertNewline),
            KeyCode::Backspace => Action::Edit(EditKind::Backspace),
            KeyCode::Delete => Action::Edit(EditKind::DeleteUnder),
            KeyCode::Up => Action::Motion(MotionKind::Up),
            KeyCode::Down => Action::Motion(MotionKind::Down),
            KeyCode::Left => Action::Motion(MotionKind::Left),
            KeyCode::Right => Action::Motion(MotionKind::Right),
            KeyCode::Tab => Action::Edit(EditKind::InsertChar('\t')),
            KeyCode::Char(c) => Action::Edit(EditKind::InsertChar(c)),
            _ => Action::None,
        }
    }

    fn translate_visual(&mut self, mode: Mode, key: KeyEvent) -> Action {
        if key.mods.contains(Modifiers::CTRL) {
            match key.code {
                KeyCode::Char('d') => return Action::Motion(MotionKind::PageHalfDown),
                KeyCode::Char('u') => return Action::Motion(MotionKind::PageHalfUp),
                _ => {}
            }
        }
        match key.code {
            KeyCode::Esc => Action::ModeChange(ModeChange::LeaveVisual),
            KeyCode::Left => Action::Motion(MotionKind::Left),
            KeyCode::Right => Action::Motion(MotionKind::Right),
            KeyCode::Up => Action::Motion(MotionKind::Up),
            KeyCode::Down => Action::Motion(MotionKind::Down),
            KeyCode::Char('h') => Action::Motion(MotionKind::Left),
            KeyCode::Char('l') => Action::Motion(MotionKind::Right),
            KeyCode::Char('j') => Action::Motion(MotionKind::Down),
            KeyCode::Char('k') => Action::Motion(MotionKind::Up),
            KeyCode::Char('0') => Action::Motion(MotionKind::LineStart),
            KeyCode::Char('$') => Action::Motion(MotionKind::LineEnd),
            KeyCode::Char('w') => Action::Motion(MotionKind::WordForward),
            KeyCode::Char('b') => Action::Motion(MotionKind::WordBackward),
            KeyCode::Char('{') => Action::Motion(MotionKind::PrevBlankLine),
            KeyCode::Char('}') => Action::Motion(MotionKind::NextBlankLine),
            KeyCode::Char('y') => Action::VisualOperator { op: OperatorKind::Yank, register: self.pending_register.take() },
            KeyCode::Char('d') => Action::VisualOperator { op: OperatorKind::Delete, register: self.pending_register.take() },
            KeyCode::Char('x') => Action::VisualOperator { op: OperatorKind::DeleteNoYank, register: self.pending_register.take() },
            KeyCode::Char('c') => Action::VisualOperator { op: OperatorKind::Change, register: self.pending_register.take() },
            KeyCode::Char('v') if mode == Mode::VisualChar => Action::ModeChange(ModeChange::LeaveVisual),
            KeyCode::Char('V') if mode == Mode::VisualLine => Action::ModeChange(ModeChange::LeaveVisual),
            _ => Action::None,
        }
    }

    fn translate_normal(&mut self, key: KeyEvent) -> Action {
        if key.mods.contains(Modifiers::CTRL) {
            match key.code {
                KeyCode::Char('d') => {
                    self.reset();
                    return Action::Motion(MotionKind::PageHalfDown);
                }
                KeyCode::Char('u') => {
                    self.reset();
                    return Action::Motion(MotionKind::PageHalfUp);
                }
                KeyCode::Char('r') => return Action::Redo,
                _ => {}
            }
        }

        if let KeyCode::Esc = key.code {
            self.reset();
            return Action::None;
        }

        if let KeyCode::Char(c) = key.code {
            if c == '"' {
                self.awaiting_register = true;
                self.pending_register = None;
                return Action::None;
            }
            if self.awaiting_register {
                self.awaiting_register = false;
                self.pending_register = c.is_ascii_alphanumeric().then_some(c);
                return Action::None;
            }

            if let Some(op) = self.pending_operator {
                return self.continue_operator(op, c, key);
            }

            if c.is_ascii_digit() {
                if c == '0' && self.pending_count.is_none() {
                    return Action::Motion(MotionKind::LineStart);
                }
                let digit = (c as u8 - b'0') as u32;
                self.pending_count = Some(self.pending_count.unwrap_or(0).saturating_mul(10).saturating_add(digit).min(MAX_COUNT));
                return Action::None;
            }

            if let Some(op) = operator_for(c) {
                self.pending_operator = Some(op);
                self.post_op_count = None;
                return Action::None;
            }

            if let Some(action) = self.non_operator_normal_key(c, key) {
                if let Some(count) = self.pending_count.take() {
                    if let Action::Motion(m) = action {
                        return Action::MotionWithCount { motion: m, count };
                    }
                }
                return action;
            }
        }

        self.fallback_normal(key)
    }

    fn continue_operator(&mut self, op: OperatorKind, c: char, key: KeyEvent) -> Action {
        if c.is_ascii_digit() {
            if c == '0' && self.post_op_count.is_none() {
                let count = self.take_operator_count();
                self.pending_operator = None;
                return Action::ApplyOperator { op, motion: MotionKind::LineStart, count, register: self.pending_register.take() };
            }
            let digit = (c as u8 - b'0') as u32;
            self.post_op_count = Some(self.post_op_count.unwrap_or(0).saturating_mul(10).saturating_add(digit).min(MAX_COUNT));
            return Action::None;
        }
        if let Some(m) = motion_for(c) {
            let count = self.take_operator_count();
            self.pending_operator = None;
            return Action::ApplyOperator { op, motion: m, count, register: self.pending_register.take() };
        }
        // Not a motion: cancel the operator and fall through to ordinary
        // NORMAL-mode translation of this key, consistent with `pending_count`
        // being retained rather than consumed (a later motion may still use it).
        self.pending_operator = None;
        self.post_op_count = None;
        self.fallback_normal(key)
    }

    fn take_operator_count(&mut self) -> u32 {
        let prefix = self.pending_count.take().unwrap_or(1);
        let post = self.post_op_count.take().unwrap_or(1);
        prefix.saturating_mul(post).min(MAX_COUNT).max(1)
    }

    fn non_operator_normal_key(&mut self, c: char, key: KeyEvent) -> Option<Action> {
        let action = match c {
            'h' => Action::Motion(MotionKind::Left),
            'l' => Action::Motion(MotionKind::Right),
            'j' => Action::Motion(MotionKind::Down),
            'k' => Action::Motion(MotionKind::Up),
            '$' => Action::Motion(MotionKind::LineEnd),
            'w' => Action::Motion(MotionKind::WordForward),
            'b' => Action::Motion(MotionKind::WordBackward),
            '{' => Action::Motion(MotionKind::PrevBlankLine),
            '}' => Action::Motion(MotionKind::NextBlankLine),
            'i' => Action::ModeChange(ModeChange::EnterInsert),
            'a' => Action::ModeChange(ModeChange::EnterInsertAfter),
            'o' => Action::Edit(EditKind::OpenLineBelow),
            'O' => Action::Edit(EditKind::OpenLineAbove),
            'v' => Action::ModeChange(ModeChange::EnterVisualChar),
            'V' => Action::ModeChange(ModeChange::EnterVisualLine),
            ':' => Action::CommandStart,
            'x' => Action::Edit(EditKind::DeleteUnder),
            'u' => Action::Undo,
            'p' => Action::PasteAfter { register: self.pending_register.take() },
            'P' => Action::PasteBefore { register: self.pending_register.take() },
            _ => return self.fallback_normal_char(c, key),
        };
        Some(action)
    }

    fn fallback_normal_char(&mut self, _c: char, _key: KeyEvent) -> Option<Action> {
        None
    }

    fn fallback_normal(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Left => Action::Motion(MotionKind::Left),
            KeyCode::Right => Action::Motion(MotionKind::Right),
            KeyCode::Up => Action::Motion(MotionKind::Up),
            KeyCode::Down => Action::Motion(MotionKind::Down),
            _ => Action::None,
        }
    }
}

fn operator_for(c: char) -> Option<OperatorKind> {
    match c {
        'd' => Some(OperatorKind::Delete),
        'y' => Some(OperatorKind::Yank),
        'c' => Some(OperatorKind::Change),
        _ => None,
    }
}

fn motion_for(c: char) -> Option<MotionKind> {
    match c {
        'h' => Some(MotionKind::Left),
        'l' => Some(MotionKind::Right),
        'j' => Some(MotionKind::Down),
        'k' => Some(MotionKind::Up),
        '0' => Some(MotionKind::LineStart),
        '$' => Some(MotionKind::LineEnd),
        'w' => Some(MotionKind::WordForward),
        'b' => Some(MotionKind::WordBackward),
        '{' => Some(MotionKind::PrevBlankLine),
        '}' => Some(MotionKind::NextBlankLine),
        _ => None,
    }
}

/// Map a `CTRL-X`-prefixed key to the buffer-navigation it selects (§4.10),
/// called by `dispatch` once the prefix flag is observed on the view.
pub fn buffer_prefix_key(key: KeyEvent) -> Option<BufferPrefixKey> {
    match key.code {
        KeyCode::Char('n') => Some(BufferPrefixKey::Next),
        KeyCode::Char('p') => Some(BufferPrefixKey::Previous),
        KeyCode::Char('k') => Some(BufferPrefixKey::CloseSoft),
        KeyCode::Char('K') => Some(BufferPrefixKey::CloseForce),
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => Some(BufferPrefixKey::Jump(c as u8 - b'0')),
        _ => None,
    }
}

/// Map a direction key inside an active search prompt (§4.5): Right/Down
/// forward, Left/Up backward.
pub fn search_direction_key(key: KeyEvent) -> Option<SearchDirection> {
    match key.code {
        KeyCode::Right | KeyCode::Down => Some(SearchDirection::Forward),
        KeyCode::Left | KeyCode::Up => Some(SearchDirection::Backward),
        _ => None,
    }
}

/// Translate one key event while an interactive search prompt is live
/// (§4.5 "coroutine-like inner loop"). The caller selects this path instead
/// of [`KeyTranslator::translate`] whenever `ViewState::search` is `Some`,
/// since search has no `Mode` variant of its own — it is overlaid on
/// whatever mode was active when `CTRL-F` was pressed.
pub fn translate_search_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::SearchCancel,
        KeyCode::Enter => Action::SearchAccept,
        KeyCode::Backspace => Action::SearchBackspace,
        _ => {
            if let Some(dir) = search_direction_key(key) {
                return Action::SearchDirection(dir);
            }
            if let KeyCode::Char(c) = key.code {
                return Action::SearchChar(c);
            }
            Action::None
        }
    }
}
