//! Row-highlight procedure (§4.2) and cascading multi-line-comment
//! re-evaluation.

use crate::grammar::{Grammar, is_separator};
use loki_text::{HighlightClass, RowStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Separator,
    Number,
    Other,
}

/// Recompute one row's highlight array in place. `prev_open_ml` seeds the
/// multi-line-comment state from the previous row. Returns the row's new
/// "open multi-line comment" end state.
pub fn highlight_row(prev_open_ml: bool, raw_render: &[u8], highlight: &mut [HighlightClass], grammar: &Grammar) -> bool {
    for h in highlight.iter_mut() {
        *h = HighlightClass::Normal;
    }
    let bytes = raw_render;
    let n = bytes.len();
    let mut i = 0usize;
    let mut in_multiline = prev_open_ml;
    let mut in_string: Option<u8> = None;
    let mut prev = Prev::Separator;
    let open = grammar.ml_comment_open.as_bytes();
    let close = grammar.ml_comment_close.as_bytes();
    let sl_comment = grammar.single_line_comment.as_bytes();

    while i < n {
        if in_multiline {
            highlight[i] = HighlightClass::MlComment;
            if !close.is_empty() && starts_with_at(bytes, i, close) {
                for j in 0..close.len() {
                    highlight[i + j] = HighlightClass::MlComment;
                }
                i += close.len();
                in_multiline = false;
                prev = Prev::Other;
                continue;
            }
            i += 1;
            continue;
        }

        if let Some(quote) = in_string {
            highlight[i] = HighlightClass::String;
            if bytes[i] == b'\\' && i + 1 < n {
                highlight[i + 1] = HighlightClass::String;
                i += 2;
                continue;
            }
            if bytes[i] == quote {
                in_string = None;
            }
            i += 1;
            prev = Prev::Other;
            continue;
        }

        if !sl_comment.is_empty() && starts_with_at(bytes, i, sl_comment) && prev == Prev::Separator {
            for h in highlight[i..].iter_mut() {
                *h = HighlightClass::Comment;
            }
            break;
        }

        if !open.is_empty() && starts_with_at(bytes, i, open) {
            for j in 0..open.len() {
                highlight[i + j] = HighlightClass::MlComment;
            }
            i += open.len();
            in_multiline = true;
            continue;
        }

        let b = bytes[i];
        if b == b'"' || b == b'\'' {
            highlight[i] = HighlightClass::String;
            in_string = Some(b);
            i += 1;
            prev = Prev::Other;
            continue;
        }

        if b.is_ascii_digit() && matches!(prev, Prev::Separator | Prev::Number) {
            highlight[i] = HighlightClass::Number;
            prev = Prev::Number;
            i += 1;
            continue;
        }
        if b == b'.' && prev == Prev::Number {
            highlight[i] = HighlightClass::Number;
            i += 1;
            continue;
        }

        if prev == Prev::Separator {
            if let Some((len, class)) = match_keyword(bytes, i, grammar) {
                for h in highlight[i..i + len].iter_mut() {
                    *h = class;
                }
                i += len;
                prev = Prev::Separator;
                continue;
            }
        }

        prev = if grammar.separators.as_bytes().contains(&b) {
            Prev::Separator
        } else {
            Prev::Other
        };
        i += 1;
    }

    in_multiline
}

fn starts_with_at(bytes: &[u8], i: usize, pat: &[u8]) -> bool {
    i + pat.len() <= bytes.len() && &bytes[i..i + pat.len()] == pat
}

fn match_keyword(bytes: &[u8], i: usize, grammar: &Grammar) -> Option<(usize, HighlightClass)> {
    for kw in grammar.primary_keywords {
        if matches_keyword(bytes, i, kw, grammar) {
            return Some((kw.len(), HighlightClass::Keyword1));
        }
    }
    for kw in grammar.secondary_keywords {
        if matches_keyword(bytes, i, kw, grammar) {
            return Some((kw.len(), HighlightClass::Keyword2));
        }
    }
    None
}

fn matches_keyword(bytes: &[u8], i: usize, kw: &str, grammar: &Grammar) -> bool {
    let kb = kw.as_bytes();
    if !starts_with_at(bytes, i, kb) {
        return false;
    }
    let after = i + kb.len();
    is_separator(grammar, bytes.get(after).copied())
}

/// Recompute highlights for `start_row` and cascade forward while each
/// row's end-of-row multi-line-comment state changes (§4.2 cascading
/// update).
pub fn highlight_from(store: &mut RowStore, grammar: &Grammar, start_row: usize) {
    if store.is_empty() || start_row >= store.len() {
        return;
    }
    let mut prev_open = if start_row == 0 {
        false
    } else {
        store.row(start_row - 1).map(|r| r.open_ml_comment).unwrap_or(false)
    };
    let mut idx = start_row;
    loop {
        let Some(row) = store.row_mut(idx) else { break };
        let old_open = row.open_ml_comment;
        let render = row.render.clone();
        let new_open = highlight_row(prev_open, &render, &mut row.highlight, grammar);
        row.open_ml_comment = new_open;
        prev_open = new_open;
        let changed = new_open != old_open;
        idx += 1;
        if idx > start_row + 1 && !changed {
            break;
        }
        if idx >= store.len() {
            break;
        }
    }
}

/// Recompute the whole document from row 0.
pub fn highlight_document(store: &mut RowStore, grammar: &Grammar) {
    highlight_from(store, grammar, 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_text::Buffer;

    fn run(src: &str, grammar: &Grammar) -> RowStore {
        let buf = Buffer::from_str("t", src).unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store, grammar);
        store
    }

    #[test]
    fn single_line_comment_paints_rest_of_row() {
        let store = run("let x = 1; // hi", &crate::grammar::RUST);
        let row = store.row(0).unwrap();
        let comment_start = row.render.iter().position(|&b| b == b'/').unwrap();
        assert!(row.highlight[comment_start..].iter().all(|h| *h == HighlightClass::Comment));
    }

    #[test]
    fn keyword_requires_separator_boundaries() {
        let store = run("fn foo", &crate::grammar::RUST);
        let row = store.row(0).unwrap();
        assert_eq!(row.highlight[0], HighlightClass::Keyword1);
        assert_eq!(row.highlight[1], HighlightClass::Keyword1);
    }

    #[test]
    fn keyword_substring_not_highlighted() {
        let store = run("fnord", &crate::grammar::RUST);
        let row = store.row(0).unwrap();
        assert!(row.highlight.iter().all(|h| *h == HighlightClass::Normal));
    }

    #[test]
    fn multiline_comment_cascades_across_rows() {
        let buf = Buffer::from_str("t", "/* start\nmiddle\nend */\ncode").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store, &crate::grammar::RUST);
        assert!(store.row(0).unwrap().open_ml_comment);
        assert!(store.row(1).unwrap().open_ml_comment);
        assert!(!store.row(2).unwrap().open_ml_comment);
        assert!(store.row(1).unwrap().highlight.iter().all(|h| *h == HighlightClass::MlComment));
        assert!(store.row(3).unwrap().highlight.iter().all(|h| *h == HighlightClass::Normal));
    }

    #[test]
    fn string_with_escape_consumes_two_bytes() {
        let store = run(r#"x = "a\"b""#, &crate::grammar::RUST);
        let row = store.row(0).unwrap();
        let quote_start = row.render.iter().position(|&b| b == b'"').unwrap();
        assert_eq!(row.highlight[quote_start], HighlightClass::String);
    }

    #[test]
    fn number_literal_highlighted() {
        let store = run("x = 123", &crate::grammar::RUST);
        let row = store.row(0).unwrap();
        let digit_start = row.render.iter().position(|b| b.is_ascii_digit()).unwrap();
        assert!(row.highlight[digit_start..digit_start + 3].iter().all(|h| *h == HighlightClass::Number));
    }
}
