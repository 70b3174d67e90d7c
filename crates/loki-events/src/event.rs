//! The tagged-union event type and legacy keycode decomposition (§4.10).

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CTRL  = 0b0000_0001;
        const SHIFT = 0b0000_0010;
        const ALT   = 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self { code, mods: Modifiers::empty() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub button: MouseButton,
    pub pressed: bool,
    pub mods: Modifiers,
}

/// Discriminant used to index the `dispatch_all` handler table (§4.11),
/// kept separate from `Event` so the table can be a small fixed array
/// rather than hashing a payload-carrying enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Key,
    Command,
    Action,
    Resize,
    Mouse,
    Quit,
    None,
}

pub const EVENT_KIND_COUNT: usize = 7;

/// The tagged union consumed by the modal machine and the async queue (§3
/// Async event, §4.10).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Command(String),
    Action(String),
    Resize { rows: u16, cols: u16 },
    Mouse(MouseEvent),
    Quit,
    None,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Key(_) => EventKind::Key,
            Event::Command(_) => EventKind::Command,
            Event::Action(_) => EventKind::Action,
            Event::Resize { .. } => EventKind::Resize,
            Event::Mouse(_) => EventKind::Mouse,
            Event::Quit => EventKind::Quit,
            Event::None => EventKind::None,
        }
    }
}

/// Decompose a legacy keycode (one that conflates a base key and a modifier,
/// as many terminal protocols emit) into a normalized `KeyEvent`. Handles
/// shift-arrow, shift-return, and the 1-26 control-letter range (§4.10).
pub fn decompose_legacy_keycode(raw: u32) -> KeyEvent {
    match raw {
        1..=26 => {
            let ch = (b'a' + (raw as u8 - 1)) as char;
            KeyEvent::new(KeyCode::Char(ch), Modifiers::CTRL)
        }
        13 => KeyEvent::plain(KeyCode::Enter),
        // Conventional shift-arrow codes used by legacy interfaces that pack
        // the modifier into the keycode itself rather than a separate field.
        1000 => KeyEvent::new(KeyCode::Up, Modifiers::SHIFT),
        1001 => KeyEvent::new(KeyCode::Down, Modifiers::SHIFT),
        1002 => KeyEvent::new(KeyCode::Left, Modifiers::SHIFT),
        1003 => KeyEvent::new(KeyCode::Right, Modifiers::SHIFT),
        1004 => KeyEvent::new(KeyCode::Enter, Modifiers::SHIFT),
        _ => {
            if let Some(ch) = char::from_u32(raw) {
                KeyEvent::plain(KeyCode::Char(ch))
            } else {
                KeyEvent::plain(KeyCode::Esc)
            }
        }
    }
}

/// Re-compose a `KeyEvent` back into a legacy keycode, the inverse of
/// `decompose_legacy_keycode`, for interfaces that only understand the
/// conflated representation.
pub fn recompose_legacy_keycode(ev: KeyEvent) -> u32 {
    if ev.mods.contains(Modifiers::CTRL) {
        if let KeyCode::Char(c) = ev.code {
            if c.is_ascii_lowercase() {
                return (c as u32) - (b'a' as u32) + 1;
            }
        }
    }
    if ev.mods.contains(Modifiers::SHIFT) {
        match ev.code {
            KeyCode::Up => return 1000,
            KeyCode::Down => return 1001,
            KeyCode::Left => return 1002,
            KeyCode::Right => return 1003,
            KeyCode::Enter => return 1004,
            _ => {}
        }
    }
    match ev.code {
        KeyCode::Enter => 13,
        KeyCode::Char(c) => c as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_letter_range_decomposes_to_ctrl_modifier() {
        let ev = decompose_legacy_keycode(6); // CTRL-F
        assert_eq!(ev, KeyEvent::new(KeyCode::Char('f'), Modifiers::CTRL));
    }

    #[test]
    fn shift_arrow_round_trips() {
        let ev = decompose_legacy_keycode(1003);
        assert_eq!(ev, KeyEvent::new(KeyCode::Right, Modifiers::SHIFT));
        assert_eq!(recompose_legacy_keycode(ev), 1003);
    }

    #[test]
    fn ctrl_letter_round_trips() {
        let ev = KeyEvent::new(KeyCode::Char('q'), Modifiers::CTRL);
        let raw = recompose_legacy_keycode(ev);
        assert_eq!(decompose_legacy_keycode(raw), ev);
    }

    #[test]
    fn event_kind_matches_variant() {
        assert_eq!(Event::Quit.kind(), EventKind::Quit);
        assert_eq!(Event::Resize { rows: 24, cols: 80 }.kind(), EventKind::Resize);
    }
}
