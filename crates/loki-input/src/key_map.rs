//! Map `crossterm`'s key event shape onto `loki_events::KeyEvent`. Grounded
//! on `core-input/src/key_token.rs`'s `map_key_token`/`map_mod_mask`, flattened
//! to target `KeyCode`/`Modifiers` directly instead of an intermediate token
//! type (this crate has no NGI-token layer to preserve).

use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CKeyModifiers};
use loki_events::{KeyCode, KeyEvent, Modifiers};

/// Convert a crossterm key code, returning `None` for keys this editor has
/// no binding for (media keys, caps lock, etc.) rather than guessing one.
pub fn map_key_code(code: CKeyCode) -> Option<KeyCode> {
    let mapped = match code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    Some(mapped)
}

pub fn map_modifiers(mods: CKeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    out
}

pub fn map_key_event(event: CKeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(event.code)?;
    Some(KeyEvent::new(code, map_modifiers(event.modifiers)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_basic_char() {
        let ev = CKeyEvent::new(CKeyCode::Char('a'), CKeyModifiers::NONE);
        let mapped = map_key_event(ev).unwrap();
        assert_eq!(mapped.code, KeyCode::Char('a'));
        assert!(mapped.mods.is_empty());
    }

    #[test]
    fn maps_ctrl_shift_chord() {
        let ev = CKeyEvent::new(CKeyCode::Char('d'), CKeyModifiers::CONTROL | CKeyModifiers::SHIFT);
        let mapped = map_key_event(ev).unwrap();
        assert!(mapped.mods.contains(Modifiers::CTRL));
        assert!(mapped.mods.contains(Modifiers::SHIFT));
    }

    #[test]
    fn unsupported_key_returns_none() {
        let ev = CKeyEvent::new(CKeyCode::CapsLock, CKeyModifiers::NONE);
        assert!(map_key_event(ev).is_none());
    }
}
