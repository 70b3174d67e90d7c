//! Markdown dispatch: fenced code blocks recursively highlighted with the
//! tagged grammar, plus inline heading/list/emphasis/link classes (§4.2).
//! Heading and link detection run on `regex` rather than hand-rolled byte
//! scanning; list markers, code spans and emphasis stay byte-level since
//! their grammar is a single leading/paired delimiter, not worth a pattern.
//!
//! Markdown has no native multi-line-comment construct, so the "in fenced
//! code block" continuation state rides on [`loki_text::Row::open_ml_comment`]
//! and the fence language tag on [`loki_text::Row::fence_lang`] — the same
//! cascading-state slots the base procedure uses for `/* */` regions.

use std::sync::LazyLock;

use regex::Regex;

use crate::engine::highlight_row;
use crate::grammar::{self, Grammar};
use loki_text::{HighlightClass, RowStore};

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6}) ").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").unwrap());

fn fence_tag(trimmed: &str) -> Option<String> {
    trimmed.strip_prefix("```").map(|rest| rest.trim().to_string())
}

fn mark_run(highlight: &mut [HighlightClass], start: usize, end: usize, class: HighlightClass) {
    let end = end.min(highlight.len());
    for h in &mut highlight[start.min(end)..end] {
        *h = class;
    }
}

/// Recompute the whole document under Markdown dispatch.
pub fn highlight_document(store: &mut RowStore) {
    let mut in_fence = false;
    let mut lang: Option<String> = None;
    for idx in 0..store.len() {
        let Some(row) = store.row_mut(idx) else { continue };
        let trimmed = String::from_utf8_lossy(&row.render).trim().to_string();

        if let Some(tag) = fence_tag(&trimmed) {
            for h in row.highlight.iter_mut() {
                *h = HighlightClass::Normal;
            }
            let len = row.render.len();
            mark_run(&mut row.highlight, 0, len, HighlightClass::Comment);
            if in_fence {
                in_fence = false;
                row.fence_lang = lang.take();
            } else {
                in_fence = true;
                lang = if tag.is_empty() { None } else { Some(tag) };
                row.fence_lang = lang.clone();
            }
            row.open_ml_comment = in_fence;
            continue;
        }

        row.open_ml_comment = in_fence;
        row.fence_lang = lang.clone();

        if in_fence {
            let grammar = lang.as_deref().map(grammar::by_name).unwrap_or(grammar::PLAIN);
            let render = row.render.clone();
            highlight_row(false, &render, &mut row.highlight, &grammar);
        } else {
            highlight_inline(row);
        }
    }
}

fn highlight_inline(row: &mut loki_text::Row) {
    let render = row.render.clone();
    for h in row.highlight.iter_mut() {
        *h = HighlightClass::Normal;
    }
    let n = render.len();
    let text = String::from_utf8_lossy(&render);

    if HEADING.is_match(&text) {
        mark_run(&mut row.highlight, 0, n, HighlightClass::Keyword1);
        return;
    }

    if is_list_marker(&render) {
        let marker_len = list_marker_len(&render);
        mark_run(&mut row.highlight, 0, marker_len, HighlightClass::Keyword2);
    }

    let links: Vec<(usize, usize)> = LINK
        .find_iter(&text)
        .map(|m| {
            let whole = m.as_str();
            let split = whole.find(']').map(|p| p + 1).unwrap_or(whole.len());
            mark_run(&mut row.highlight, m.start(), m.start() + split, HighlightClass::Number);
            mark_run(&mut row.highlight, m.start() + split, m.end(), HighlightClass::String);
            (m.start(), m.end())
        })
        .collect();

    let mut i = 0;
    while i < n {
        if let Some(&(_, end)) = links.iter().find(|&&(start, _)| start == i) {
            i = end;
            continue;
        }
        let b = render[i];
        if b == b'`' {
            if let Some(close) = find(&render, i + 1, b'`') {
                mark_run(&mut row.highlight, i, close + 1, HighlightClass::String);
                i = close + 1;
                continue;
            }
        }
        if b == b'*' && render.get(i + 1) == Some(&b'*') {
            if let Some(close) = find_seq(&render, i + 2, b"**") {
                mark_run(&mut row.highlight, i, close + 2, HighlightClass::Keyword1);
                i = close + 2;
                continue;
            }
        }
        if b == b'*' || b == b'_' {
            if let Some(close) = find(&render, i + 1, b) {
                mark_run(&mut row.highlight, i, close + 1, HighlightClass::Keyword2);
                i = close + 1;
                continue;
            }
        }
        i += 1;
    }
}

fn is_list_marker(render: &[u8]) -> bool {
    matches!(render.first(), Some(b'-' | b'*' | b'+')) && render.get(1) == Some(&b' ')
        || render.iter().take_while(|b| b.is_ascii_digit()).count() > 0
            && render
                .get(render.iter().take_while(|b| b.is_ascii_digit()).count())
                .copied()
                == Some(b'.')
}

fn list_marker_len(render: &[u8]) -> usize {
    if matches!(render.first(), Some(b'-' | b'*' | b'+')) {
        return 2.min(render.len());
    }
    let digits = render.iter().take_while(|b| b.is_ascii_digit()).count();
    (digits + 2).min(render.len())
}

fn find(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes.get(from..)?.iter().position(|&b| b == needle).map(|p| p + from)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_text::Buffer;

    #[test]
    fn fenced_code_dispatches_to_tagged_grammar() {
        let buf = Buffer::from_str("t", "```rust\nfn main() {}\n```\n").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store);
        assert_eq!(store.row(1).unwrap().highlight[0], HighlightClass::Keyword1);
        assert!(store.row(0).unwrap().open_ml_comment);
        assert!(!store.row(2).unwrap().open_ml_comment);
    }

    #[test]
    fn heading_painted_keyword1() {
        let buf = Buffer::from_str("t", "# Title").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store);
        assert!(store.row(0).unwrap().highlight.iter().all(|h| *h == HighlightClass::Keyword1));
    }

    #[test]
    fn inline_code_painted_string() {
        let buf = Buffer::from_str("t", "use `foo` here").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store);
        let row = store.row(0).unwrap();
        let start = row.render.iter().position(|&b| b == b'`').unwrap();
        assert_eq!(row.highlight[start], HighlightClass::String);
    }

    #[test]
    fn link_splits_text_and_url_classes() {
        let buf = Buffer::from_str("t", "[text](http://x)").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        highlight_document(&mut store);
        let row = store.row(0).unwrap();
        assert_eq!(row.highlight[0], HighlightClass::Number);
        let paren = row.render.iter().position(|&b| b == b'(').unwrap();
        assert_eq!(row.highlight[paren + 1], HighlightClass::String);
    }
}
