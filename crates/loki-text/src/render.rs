//! Row store: raw/rendered/highlight overlay on top of a [`crate::Buffer`]
//! (§3 Data model, §4.1 Row store and text mutation).
//!
//! There is no teacher precedent for a row-level highlight array; the
//! teacher's `Buffer` is rope-only. This module adds the parallel
//! rendered/highlight storage the syntax engine needs, regenerated on every
//! mutation per the spec's reallocation policy.

use crate::{Buffer, grapheme};
use unicode_segmentation::UnicodeSegmentation;

/// One of the semantic highlight classes, plus the transient MATCH overlay
/// used by incremental search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightClass {
    #[default]
    Normal,
    NonPrint,
    Comment,
    MlComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
}

/// A single row: raw bytes, tab-expanded rendered bytes, and a highlight
/// code per rendered byte. Rendered length, highlight length, and the
/// render buffer always grow or shrink together.
#[derive(Debug, Clone)]
pub struct Row {
    pub index: usize,
    pub raw: Vec<u8>,
    pub render: Vec<u8>,
    pub highlight: Vec<HighlightClass>,
    /// For each byte in `render`, the raw byte offset of the grapheme cluster
    /// it was expanded from. Lets a renderer map a rendered byte (and thus a
    /// highlight/selection decision) back to a raw document [`crate::Position`]
    /// (§4.12 segment building). Same length as `render`.
    pub raw_offset: Vec<usize>,
    pub open_ml_comment: bool,
    pub fence_lang: Option<String>,
    pub section_tag: Option<String>,
}

impl Row {
    fn new(index: usize, raw: &str) -> Self {
        let (render, raw_offset) = expand_row(raw);
        let len = render.len();
        Row {
            index,
            raw: raw.as_bytes().to_vec(),
            render,
            highlight: vec![HighlightClass::Normal; len],
            raw_offset,
            open_ml_comment: false,
            fence_lang: None,
            section_tag: None,
        }
    }

    /// Overwrite `[start, end)` of the highlight array with `MATCH`, saving
    /// the prior contents so they can be restored on the next cursor move
    /// (§4.5 search).
    pub fn apply_match_overlay(&mut self, start: usize, end: usize) -> Vec<HighlightClass> {
        let end = end.min(self.highlight.len());
        let start = start.min(end);
        let saved = self.highlight[start..end].to_vec();
        for slot in &mut self.highlight[start..end] {
            *slot = HighlightClass::Match;
        }
        saved
    }

    /// Restore a highlight range previously saved by [`Row::apply_match_overlay`].
    pub fn restore_overlay(&mut self, start: usize, saved: &[HighlightClass]) {
        let end = (start + saved.len()).min(self.highlight.len());
        let start = start.min(end);
        self.highlight[start..end].copy_from_slice(&saved[..end - start]);
    }
}

/// Expand tabs to the next multiple of 8 and render non-printable bytes as
/// sentinel escapes, per §4.1. Returns the rendered bytes alongside a
/// parallel table mapping each rendered byte back to the raw byte offset of
/// the grapheme cluster that produced it.
fn expand_row(raw: &str) -> (Vec<u8>, Vec<usize>) {
    let mut out = Vec::with_capacity(raw.len());
    let mut offsets = Vec::with_capacity(raw.len());
    let mut col = 0usize;
    for (raw_start, g) in raw.grapheme_indices(true) {
        if g == "\t" {
            let spaces = 8 - (col % 8);
            out.extend(std::iter::repeat(b' ').take(spaces));
            offsets.extend(std::iter::repeat(raw_start).take(spaces));
            col += spaces;
            continue;
        }
        let bytes = g.as_bytes();
        if bytes.len() == 1 {
            let b = bytes[0];
            if (1..=26).contains(&b) {
                out.push(b'@');
                out.push(b + b'@');
                offsets.push(raw_start);
                offsets.push(raw_start);
                col += 2;
                continue;
            }
            if b < 32 || b == 127 {
                out.push(b'?');
                offsets.push(raw_start);
                col += 1;
                continue;
            }
        }
        out.extend_from_slice(bytes);
        offsets.extend(std::iter::repeat(raw_start).take(bytes.len()));
        col += grapheme::cluster_width(g);
    }
    (out, offsets)
}

/// Returns true for the synthetic bytes `expand_row` emits in place of a
/// non-printable input byte, so the syntax engine can mark them NONPRINT.
pub fn is_nonprint_render_byte(prev_was_at: bool, b: u8) -> bool {
    prev_was_at || b == b'?'
}

/// Parallel rendered/highlight storage over a [`Buffer`]'s raw rows,
/// regenerated per mutation.
pub struct RowStore {
    rows: Vec<Row>,
}

impl RowStore {
    /// Build a fresh row store from every row currently in `buf`.
    pub fn from_buffer(buf: &Buffer) -> Self {
        let mut rows = Vec::with_capacity(buf.line_count());
        for i in 0..buf.line_count() {
            let content = buf.line(i).unwrap_or_default();
            let content = content.strip_suffix('\n').unwrap_or(&content);
            let mut row = Row::new(i, content);
            mark_nonprint(&mut row);
            rows.push(row);
        }
        RowStore { rows }
    }

    /// Regenerate the rendered/highlight overlay for a single row, e.g.
    /// after a text mutation touched only that row.
    pub fn refresh_row(&mut self, idx: usize, buf: &Buffer) {
        if idx >= buf.line_count() {
            return;
        }
        let content = buf.line(idx).unwrap_or_default();
        let content = content.strip_suffix('\n').unwrap_or(&content);
        let prior = self.rows.get(idx);
        let (fence_lang, section_tag) = prior
            .map(|r| (r.fence_lang.clone(), r.section_tag.clone()))
            .unwrap_or((None, None));
        let mut row = Row::new(idx, content);
        row.fence_lang = fence_lang;
        row.section_tag = section_tag;
        mark_nonprint(&mut row);
        if idx < self.rows.len() {
            self.rows[idx] = row;
        } else {
            self.rows.push(row);
        }
    }

    /// Full resync, e.g. after a structural edit changed the row count.
    pub fn resync(&mut self, buf: &Buffer) {
        *self = RowStore::from_buffer(buf);
    }

    pub fn row(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    pub fn row_mut(&mut self, idx: usize) -> Option<&mut Row> {
        self.rows.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

fn mark_nonprint(row: &mut Row) {
    let mut i = 0;
    while i < row.render.len() {
        let b = row.render[i];
        if b == b'@' && i + 1 < row.render.len() {
            row.highlight[i] = HighlightClass::NonPrint;
            row.highlight[i + 1] = HighlightClass::NonPrint;
            i += 2;
            continue;
        }
        if b == b'?' {
            row.highlight[i] = HighlightClass::NonPrint;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_expands_to_next_multiple_of_eight() {
        let raw = "a\tb";
        let (rendered, offsets) = expand_row(raw);
        assert_eq!(rendered.len(), 1 + 7 + 1);
        assert_eq!(rendered[0], b'a');
        assert!(rendered[1..8].iter().all(|&b| b == b' '));
        assert_eq!(rendered[8], b'b');
        // every expanded space still points back at the tab's raw offset
        assert!(offsets[1..8].iter().all(|&o| o == 1));
        assert_eq!(offsets[8], 2);
    }

    #[test]
    fn control_byte_rendered_as_at_sentinel() {
        let raw = "\x01x";
        let (rendered, offsets) = expand_row(raw);
        assert_eq!(rendered[0], b'@');
        assert_eq!(rendered[1], b'A');
        assert_eq!(rendered[2], b'x');
        assert_eq!(offsets, vec![0, 0, 1]);
    }

    #[test]
    fn lengths_track_together() {
        let buf = Buffer::from_str("t", "a\tb\nc").unwrap();
        let store = RowStore::from_buffer(&buf);
        for row in store.iter() {
            assert_eq!(row.render.len(), row.highlight.len());
            assert_eq!(row.render.len(), row.raw_offset.len());
        }
    }

    #[test]
    fn refresh_row_preserves_fence_and_section_tags() {
        let buf = Buffer::from_str("t", "```rust\ncode").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        store.row_mut(0).unwrap().fence_lang = Some("rust".to_string());
        store.refresh_row(0, &buf);
        assert_eq!(store.row(0).unwrap().fence_lang.as_deref(), Some("rust"));
    }

    #[test]
    fn match_overlay_round_trips() {
        let buf = Buffer::from_str("t", "hello world").unwrap();
        let mut store = RowStore::from_buffer(&buf);
        let row = store.row_mut(0).unwrap();
        let saved = row.apply_match_overlay(0, 5);
        assert!(row.highlight[0..5].iter().all(|h| *h == HighlightClass::Match));
        row.restore_overlay(0, &saved);
        assert!(row.highlight[0..5].iter().all(|h| *h == HighlightClass::Normal));
    }
}
