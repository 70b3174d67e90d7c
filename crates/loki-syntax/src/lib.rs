//! Syntax-highlighting pipeline: per-grammar row-highlight state machine
//! (§4.2), Markdown fenced-code dispatch, sectioned-format dispatch, and the
//! external plug-in override hook.

pub mod engine;
pub mod grammar;
pub mod markdown;
pub mod plugin;
pub mod sectioned;

pub use grammar::Grammar;
pub use plugin::{HighlightOverride, OverrideResult, OverrideSpan};

use loki_text::RowStore;

/// The document model's "opaque syntax table pointer for the currently
/// chosen grammar" (§3): which dispatch strategy applies to a buffer.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxTable {
    Base(Grammar),
    Markdown,
    Sectioned(Grammar),
}

impl SyntaxTable {
    /// Choose a table for a filename by extension, falling back to plain
    /// base highlighting (§7 `no-language` is a non-fatal status, not a
    /// hard error: the editor still opens the file).
    pub fn for_filename(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or("");
        match ext {
            "md" | "markdown" => SyntaxTable::Markdown,
            "ini" | "cfg" => SyntaxTable::Sectioned(grammar::INI),
            _ => SyntaxTable::Base(grammar::by_extension(ext)),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            SyntaxTable::Base(g) => g.tag,
            SyntaxTable::Markdown => "markdown",
            SyntaxTable::Sectioned(g) => g.tag,
        }
    }
}

/// Recompute the whole row store's highlighting under the chosen table, and
/// then apply any registered plug-in override per row (§4.2).
pub fn highlight_all(store: &mut RowStore, table: &SyntaxTable, overlay: Option<&dyn HighlightOverride>) {
    match table {
        SyntaxTable::Base(g) => engine::highlight_document(store, g),
        SyntaxTable::Markdown => markdown::highlight_document(store),
        SyntaxTable::Sectioned(g) => sectioned::highlight_document(store, g),
    }
    if let Some(overlay) = overlay {
        for idx in 0..store.len() {
            let Some(row) = store.row_mut(idx) else { continue };
            if let Some(result) = overlay.override_row(&row.raw, &row.render, row.index, table.tag()) {
                plugin::apply_override(&mut row.highlight, &result);
            }
        }
    }
}

/// Recompute starting at one row and cascade forward only (used after a
/// localized text mutation); Markdown and sectioned tables always rescan
/// from the top since their state depends on fence/section boundaries that
/// can be anywhere above the edit.
pub fn highlight_from(store: &mut RowStore, table: &SyntaxTable, start_row: usize) {
    match table {
        SyntaxTable::Base(g) => engine::highlight_from(store, g, start_row),
        SyntaxTable::Markdown => markdown::highlight_document(store),
        SyntaxTable::Sectioned(g) => sectioned::highlight_document(store, g),
    }
}
