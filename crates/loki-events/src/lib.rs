//! Event model and async event queue (§3 Async event, §4.10, §4.11).

pub mod event;
pub mod queue;

pub use event::{
    decompose_legacy_keycode, recompose_legacy_keycode, Event, EventKind, KeyCode, KeyEvent, Modifiers, MouseButton,
    MouseEvent, EVENT_KIND_COUNT,
};
pub use queue::{AsyncEventQueue, HandlerTable, PushError};
