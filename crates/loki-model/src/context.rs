//! Editor context: one document paired with one view, plus the two
//! external collaborators named in §1 as out of scope for this crate's own
//! logic (§3 Editor context).

use std::any::Any;

use loki_state::DocumentModel;

use crate::view::ViewState;

/// Opaque handle to a scripting host. The scripting runtime itself lives
/// outside this workspace (§1 Non-goals); this crate only carries a slot for
/// whatever the session façade plugs in.
pub struct ScriptingHandle(pub Box<dyn Any>);

/// Opaque handle to a renderer implementation (§4.13). `loki-render` owns
/// the trait this wraps; kept `Any`-erased here so `loki-model` does not
/// need to depend on it.
pub struct RendererHandle(pub Box<dyn Any>);

/// One document bound to one view, with exclusive ownership of both and of
/// whichever external collaborators are attached.
pub struct EditorContext {
    pub document: DocumentModel,
    pub view: ViewState,
    pub scripting: Option<ScriptingHandle>,
    pub renderer: Option<RendererHandle>,
}

impl EditorContext {
    pub fn new(document: DocumentModel, view: ViewState) -> Self {
        Self { document, view, scripting: None, renderer: None }
    }

    pub fn empty(screen_rows: usize, screen_cols: usize) -> Self {
        Self::new(DocumentModel::empty(), ViewState::new(screen_rows, screen_cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_has_no_collaborators_attached() {
        let ctx = EditorContext::empty(24, 80);
        assert!(ctx.scripting.is_none());
        assert!(ctx.renderer.is_none());
        assert_eq!(ctx.document.row_count(), 1);
    }
}
