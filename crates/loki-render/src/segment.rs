//! Segment building (§4.12): a row view's segment array is "a maximal run
//! of rendered bytes with identical highlight class and selection bit".
//!
//! No teacher precedent for this exact cut — `core-render`'s `Frame`/`Cell`
//! grid tracks per-cell styling directly rather than collapsing runs into
//! segments first — but the run-length-encoding approach here is the same
//! shape as the teacher's `StyleLayer` span list (`core-render::style`),
//! generalized from "one cursor span per frame" to "every highlight/
//! selection transition in a row".

use loki_state::SelectionModel;
use loki_text::{HighlightClass, Position, Row};

/// Row views are capped at this many segments (§4.12); overflow truncates
/// the row's right side rather than ever emitting a partial/inconsistent
/// segment.
pub const MAX_SEGMENTS_PER_ROW: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    pub text: String,
    pub class: HighlightClass,
    pub selected: bool,
}

/// Build the segment array for one row. `line` is the row's document index,
/// needed to translate `row.raw_offset` entries into [`Position`]s the
/// selection model can test.
pub fn build_row_segments(row: &Row, line: usize, selection: &SelectionModel) -> Vec<Segment> {
    build_row_segments_windowed(row, line, selection, 0, row.render.len())
}

/// Same as [`build_row_segments`] but over only the rendered-byte window
/// `[start, start + width)` (clamped to the row's length). Rendered bytes are
/// single-width post tab-expansion/control-sentinel encoding, so a rendered
/// byte index doubles as a screen column — this is how horizontal scroll
/// (`col_offset`) and the line-number gutter clip a row to what's visible
/// (§4.12) without re-deriving widths.
pub fn build_row_segments_windowed(row: &Row, line: usize, selection: &SelectionModel, start: usize, width: usize) -> Vec<Segment> {
    let end = (start + width).min(row.render.len());
    let start = start.min(end);
    let mut out = Vec::new();
    let mut run: Option<(HighlightClass, bool, Vec<u8>)> = None;

    for i in start..end {
        let class = row.highlight[i];
        let selected = selection.contains(Position::new(line, row.raw_offset[i]));
        match &mut run {
            Some((c, s, bytes)) if *c == class && *s == selected => bytes.push(row.render[i]),
            _ => {
                if let Some((c, s, bytes)) = run.take() {
                    out.push(Segment { text: String::from_utf8_lossy(&bytes).into_owned(), class: c, selected: s });
                    if out.len() >= MAX_SEGMENTS_PER_ROW {
                        return out;
                    }
                }
                run = Some((class, selected, vec![row.render[i]]));
            }
        }
    }
    if let Some((c, s, bytes)) = run {
        if out.len() < MAX_SEGMENTS_PER_ROW {
            out.push(Segment { text: String::from_utf8_lossy(&bytes).into_owned(), class: c, selected: s });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_state::SelectionKind;
    use loki_text::{Buffer, RowStore};

    #[test]
    fn uniform_row_is_a_single_segment() {
        let buf = Buffer::from_str("t", "hello").unwrap();
        let store = RowStore::from_buffer(&buf);
        let segs = build_row_segments(store.row(0).unwrap(), 0, &SelectionModel::default());
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "hello");
        assert!(!segs[0].selected);
    }

    #[test]
    fn selection_splits_a_segment_into_three() {
        let buf = Buffer::from_str("t", "hello world").unwrap();
        let store = RowStore::from_buffer(&buf);
        let mut sel = SelectionModel::default();
        sel.begin(Position::new(0, 2), SelectionKind::Characterwise);
        sel.extend_to(Position::new(0, 5), SelectionKind::Characterwise);
        let segs = build_row_segments(store.row(0).unwrap(), 0, &sel);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].text, "he");
        assert!(!segs[0].selected);
        assert_eq!(segs[1].text, "llo");
        assert!(segs[1].selected);
        assert_eq!(segs[2].text, " world");
        assert!(!segs[2].selected);
    }

    #[test]
    fn segment_count_is_capped_and_truncates_right_side() {
        // Alternate highlight classes per byte so every byte starts a new run.
        let buf = Buffer::from_str("t", &"a".repeat(300)).unwrap();
        let mut store = RowStore::from_buffer(&buf);
        {
            let row = store.row_mut(0).unwrap();
            for (i, h) in row.highlight.iter_mut().enumerate() {
                *h = if i % 2 == 0 { HighlightClass::Normal } else { HighlightClass::Keyword1 };
            }
        }
        let segs = build_row_segments(store.row(0).unwrap(), 0, &SelectionModel::default());
        assert_eq!(segs.len(), MAX_SEGMENTS_PER_ROW);
    }

    #[test]
    fn windowed_segments_clip_to_the_requested_range() {
        let buf = Buffer::from_str("t", "hello world").unwrap();
        let store = RowStore::from_buffer(&buf);
        let segs = build_row_segments_windowed(store.row(0).unwrap(), 0, &SelectionModel::default(), 6, 5);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "world");
    }
}
