//! Event source: a pull interface (§4.10) with a terminal-backed
//! implementation and an in-memory one for tests and scripting transports.

use std::collections::VecDeque;
use std::time::Duration;

use loki_events::{Event, KeyEvent, Modifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Event(Event),
    Timeout,
}

/// Pull interface every input transport implements (§4.10).
pub trait EventSource {
    /// Block up to `timeout_ms` for the next event.
    fn read(&mut self, timeout_ms: u64) -> anyhow::Result<ReadOutcome>;

    /// Non-blocking check for whether `read` would return immediately,
    /// without consuming anything. Each implementation provides its own —
    /// a default built on `read(0)` would consume the very event it was
    /// only meant to announce.
    fn poll(&mut self) -> anyhow::Result<bool>;
}

/// Reads from the real terminal via `crossterm`.
pub struct TerminalEventSource;

impl TerminalEventSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for TerminalEventSource {
    fn read(&mut self, timeout_ms: u64) -> anyhow::Result<ReadOutcome> {
        let timeout = Duration::from_millis(timeout_ms);
        if !crossterm::event::poll(timeout)? {
            return Ok(ReadOutcome::Timeout);
        }
        let event = match crossterm::event::read()? {
            crossterm::event::Event::Key(key) => match crate::key_map::map_key_event(key) {
                Some(mapped) => Event::Key(mapped),
                None => Event::None,
            },
            crossterm::event::Event::Resize(cols, rows) => {
                tracing::debug!(target: "input.terminal", rows, cols, "resize");
                Event::Resize { rows, cols }
            }
            crossterm::event::Event::Mouse(m) => Event::Mouse(map_mouse(m)),
            _ => Event::None,
        };
        Ok(ReadOutcome::Event(event))
    }

    fn poll(&mut self) -> anyhow::Result<bool> {
        Ok(crossterm::event::poll(Duration::from_millis(0))?)
    }
}

fn map_mouse(m: crossterm::event::MouseEvent) -> loki_events::MouseEvent {
    use crossterm::event::MouseEventKind as K;
    let (button, pressed) = match m.kind {
        K::Down(b) => (map_button(b), true),
        K::Up(b) => (map_button(b), false),
        K::Drag(b) => (map_button(b), true),
        _ => (loki_events::MouseButton::Left, false),
    };
    loki_events::MouseEvent {
        x: m.column,
        y: m.row,
        button,
        pressed,
        mods: crate::key_map::map_modifiers(m.modifiers),
    }
}

fn map_button(b: crossterm::event::MouseButton) -> loki_events::MouseButton {
    match b {
        crossterm::event::MouseButton::Left => loki_events::MouseButton::Left,
        crossterm::event::MouseButton::Right => loki_events::MouseButton::Right,
        crossterm::event::MouseButton::Middle => loki_events::MouseButton::Middle,
    }
}

/// Backed by an in-memory queue; used by tests and the scripting REPL
/// transport, which synthesize events rather than read a real terminal.
#[derive(Default)]
pub struct InMemoryEventSource {
    queue: VecDeque<Event>,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn push_key(&mut self, code: loki_events::KeyCode, mods: Modifiers) {
        self.push(Event::Key(KeyEvent::new(code, mods)));
    }
}

impl EventSource for InMemoryEventSource {
    fn read(&mut self, _timeout_ms: u64) -> anyhow::Result<ReadOutcome> {
        Ok(match self.queue.pop_front() {
            Some(event) => ReadOutcome::Event(event),
            None => ReadOutcome::Timeout,
        })
    }

    fn poll(&mut self) -> anyhow::Result<bool> {
        Ok(!self.queue.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_events::KeyCode;

    #[test]
    fn in_memory_source_returns_timeout_when_empty() {
        let mut src = InMemoryEventSource::new();
        assert_eq!(src.read(10).unwrap(), ReadOutcome::Timeout);
    }

    #[test]
    fn in_memory_source_drains_in_fifo_order() {
        let mut src = InMemoryEventSource::new();
        src.push_key(KeyCode::Char('a'), Modifiers::empty());
        src.push_key(KeyCode::Char('b'), Modifiers::empty());
        let first = src.read(0).unwrap();
        assert_eq!(first, ReadOutcome::Event(Event::Key(KeyEvent::plain(KeyCode::Char('a')))));
        let second = src.read(0).unwrap();
        assert_eq!(second, ReadOutcome::Event(Event::Key(KeyEvent::plain(KeyCode::Char('b')))));
    }

    #[test]
    fn poll_reflects_pending_events() {
        let mut src = InMemoryEventSource::new();
        assert!(!src.poll().unwrap());
        src.push(Event::Quit);
        assert!(src.poll().unwrap());
    }
}
