//! Scripting host abstraction (§6 "Scripting host": "the engine owns an
//! opaque pointer; two entry points are called if the pointer is present: a
//! 'keymap lookup' ... a 'row highlight' callback"). The scripting runtime
//! itself is external and out of scope (§1 Non-goals); this crate only
//! establishes the trait surface the `loki-model::ScriptingHandle` slot
//! expects, plus a no-op host used until a real one is attached.
//!
//! Ported from the teacher's `core-plugin::PluginHost` shape (name +
//! breadth-first stub + a noop default), but the two entry points are
//! swapped for the ones §6 and §9 actually name: `lookup_keymap` and
//! `highlight_row`. The teacher's `event_sources`/`AsyncEventSource`
//! extensibility has no counterpart here — this workspace's event queue
//! (`loki-events::AsyncEventQueue`) is a synchronous, polled structure, not
//! a tokio task scheduler, so there is nothing for a plugin to register
//! itself into at that layer.

use loki_events::{Event, KeyEvent};
use loki_state::Mode;
use loki_syntax::{HighlightOverride, OverrideResult};

/// Result of a keymap-lookup reentrancy point (§6, §9: "may claim the event
/// and return 'handled'"). A claimed event optionally carries an action name
/// fed back into the engine through the public event path — the host never
/// mutates editor state directly (§9's reentrancy constraint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapOutcome {
    NotHandled,
    Handled { action: Option<String> },
}

impl KeymapOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, KeymapOutcome::Handled { .. })
    }

    /// Recompose a `Handled` outcome into the public event the engine
    /// should enqueue, or `None` if the host claimed the key but named no
    /// action.
    pub fn into_event(self) -> Option<Event> {
        match self {
            KeymapOutcome::Handled { action: Some(action) } => Some(Event::Action(action)),
            _ => None,
        }
    }
}

/// The two reentrancy points a scripting host exposes (§6, §315). Both MUST
/// be safe to call from any mode and MUST NOT mutate editor state except
/// through the public event path.
pub trait ScriptingHost: Send + Sync {
    /// Stable identifier for logs/diagnostics.
    fn name(&self) -> &'static str;

    /// Given the active mode and a decoded key event, may claim the event.
    fn lookup_keymap(&self, mode: Mode, key: KeyEvent) -> KeymapOutcome;

    /// Row-level syntax override hook described in §4.2. Default
    /// implementation claims nothing, leaving the builtin grammar engine's
    /// highlighting untouched.
    fn highlight_row(&self, raw: &[u8], rendered: &[u8], index: usize, grammar_tag: &str) -> Option<OverrideResult> {
        let _ = (raw, rendered, index, grammar_tag);
        None
    }
}

/// Adapts any `ScriptingHost` into the `HighlightOverride` trait
/// `loki-syntax::highlight_all` expects, so a live host can be passed
/// straight through as the highlighter's overlay argument.
impl HighlightOverride for dyn ScriptingHost {
    fn override_row(&self, raw: &[u8], rendered: &[u8], index: usize, grammar_tag: &str) -> Option<OverrideResult> {
        self.highlight_row(raw, rendered, index, grammar_tag)
    }
}

/// No-op host used until a real scripting runtime is attached to
/// `loki_model::EditorContext::scripting`.
#[derive(Debug, Default)]
pub struct NoopScriptingHost;

impl NoopScriptingHost {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptingHost for NoopScriptingHost {
    fn name(&self) -> &'static str {
        "noop-scripting-host"
    }

    fn lookup_keymap(&self, _mode: Mode, _key: KeyEvent) -> KeymapOutcome {
        KeymapOutcome::NotHandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_events::KeyCode;

    #[test]
    fn noop_host_never_claims_a_key() {
        let host = NoopScriptingHost::new();
        let outcome = host.lookup_keymap(Mode::Normal, KeyEvent::plain(KeyCode::Char('x')));
        assert_eq!(outcome, KeymapOutcome::NotHandled);
        assert!(!outcome.is_handled());
    }

    #[test]
    fn noop_host_highlight_row_defers_to_builtin() {
        let host = NoopScriptingHost::new();
        assert!(host.highlight_row(b"abc", b"abc", 0, "plain").is_none());
    }

    struct ClaimEverything;
    impl ScriptingHost for ClaimEverything {
        fn name(&self) -> &'static str {
            "claim-everything"
        }
        fn lookup_keymap(&self, _mode: Mode, _key: KeyEvent) -> KeymapOutcome {
            KeymapOutcome::Handled { action: Some("custom:ping".to_string()) }
        }
    }

    #[test]
    fn handled_outcome_recomposes_into_an_action_event() {
        let host = ClaimEverything;
        let outcome = host.lookup_keymap(Mode::Insert, KeyEvent::plain(KeyCode::Enter));
        assert!(outcome.is_handled());
        assert_eq!(outcome.into_event(), Some(Event::Action("custom:ping".to_string())));
    }

    #[test]
    fn handled_outcome_with_no_action_recomposes_to_nothing() {
        let outcome = KeymapOutcome::Handled { action: None };
        assert_eq!(outcome.into_event(), None);
    }
}
