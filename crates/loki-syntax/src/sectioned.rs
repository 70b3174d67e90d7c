//! Sectioned-format dispatch: a row carries a section tag a grammar may
//! consult (§4.2, §3 Row's "optional section tag"). Grounded on the INI
//! grammar example from the regex-highlighter reference crate.

use crate::engine::highlight_row;
use crate::grammar::Grammar;
use loki_text::{HighlightClass, RowStore};

fn section_name(trimmed: &str) -> Option<String> {
    if trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() >= 2 {
        Some(trimmed[1..trimmed.len() - 1].to_string())
    } else {
        None
    }
}

/// Recompute the whole document under sectioned dispatch, tagging each row
/// with its enclosing section and running the base row-highlight procedure.
pub fn highlight_document(store: &mut RowStore, grammar: &Grammar) {
    let mut current_section: Option<String> = None;
    for idx in 0..store.len() {
        let Some(row) = store.row_mut(idx) else { continue };
        let trimmed = String::from_utf8_lossy(&row.render).trim().to_string();
        if let Some(name) = section_name(&trimmed) {
            current_section = Some(name);
            row.section_tag = current_section.clone();
            for h in row.highlight.iter_mut() {
                *h = HighlightClass::Keyword1;
            }
            continue;
        }
        row.section_tag = current_section.clone();
        let render = row.render.clone();
        highlight_row(false, &render, &mut row.highlight, grammar);
        if let Some(eq) = render.iter().position(|&b| b == b'=') {
            mark_key(&mut row.highlight, eq);
        }
    }
}

fn mark_key(highlight: &mut [HighlightClass], eq: usize) {
    for h in &mut highlight[..eq] {
        if *h == HighlightClass::Normal {
            *h = HighlightClass::Keyword2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_text::Buffer;

    #[test]
    fn section_header_tags_subsequent_rows() {
        let buf = Buffer::from_str("t", "[core]\nname = x\n;comment").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store, &crate::grammar::INI);
        assert_eq!(store.row(1).unwrap().section_tag.as_deref(), Some("core"));
        assert_eq!(store.row(2).unwrap().section_tag.as_deref(), Some("core"));
    }

    #[test]
    fn key_before_equals_painted_keyword2() {
        let buf = Buffer::from_str("t", "[core]\nname = x").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store, &crate::grammar::INI);
        assert_eq!(store.row(1).unwrap().highlight[0], HighlightClass::Keyword2);
    }

    #[test]
    fn comment_row_painted_via_base_procedure() {
        let buf = Buffer::from_str("t", "[core]\n;a comment").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store, &crate::grammar::INI);
        assert!(store.row(1).unwrap().highlight.iter().all(|h| *h == HighlightClass::Comment));
    }
}
