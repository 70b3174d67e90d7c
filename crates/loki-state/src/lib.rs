//! Editor state above the row store: the document model, undo journal,
//! selection/clipboard, command-line, search, indent engine, and binary
//! serializer (§3 Document/View state, §4.3-4.7, §4.14).

pub mod command_line;
pub mod document;
pub mod indent;
pub mod line_ending;
pub mod registers;
pub mod search;
pub mod selection;
pub mod serializer;
pub mod undo;

pub use command_line::CommandLineState;
pub use document::DocumentModel;
pub use indent::IndentConfig;
pub use line_ending::{normalize_line_endings, LineEnding, NormalizedText};
pub use registers::{OperatorMetrics, OperatorMetricsSnapshot, PasteError, PasteSource, Registers, RegistersFacade};
pub use search::{Direction as SearchDirection, SearchState};
pub use selection::{SelectionKind, SelectionModel, SelectionSpan};
pub use undo::UndoJournal;

/// NORMAL / INSERT / VISUAL / COMMAND dispatch (§4.4). Modal transition
/// logic itself lives in `loki-actions`; this crate only carries the enum
/// so view state and document state can both reference it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    VisualChar,
    VisualLine,
    Command,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}

/// Transient status-line message with an expiry instant.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: std::time::Instant,
}

impl EphemeralMessage {
    pub fn new(text: impl Into<String>, ttl: std::time::Duration) -> Self {
        Self { text: text.into(), expires_at: std::time::Instant::now() + ttl }
    }

    pub fn is_expired(&self) -> bool {
        std::time::Instant::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_message_expires_after_ttl() {
        let msg = EphemeralMessage::new("saved", std::time::Duration::from_millis(0));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(msg.is_expired());
    }

    #[test]
    fn mode_defaults_to_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
