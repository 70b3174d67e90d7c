//! Terminal key mapping and the pull-style event source abstraction (§4.10).

pub mod key_map;
pub mod source;

pub use key_map::{map_key_code, map_key_event, map_modifiers};
pub use source::{EventSource, InMemoryEventSource, ReadOutcome, TerminalEventSource};
