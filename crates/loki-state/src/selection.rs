//! Selection range over (row, column) pairs and clipboard export (§4.6).
//!
//! Ported from `core-state/src/lib.rs`'s `SelectionSpan`/`SelectionModel`,
//! generalized to `loki_text::{Buffer, Position}`.

use loki_text::{Buffer, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Characterwise,
    Linewise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub start: Position,
    pub end: Position,
    pub kind: SelectionKind,
}

impl SelectionSpan {
    /// Normalize ordering so `start <= end` (line, then byte).
    pub fn new(mut a: Position, mut b: Position, kind: SelectionKind) -> Self {
        if Self::greater(&a, &b) {
            std::mem::swap(&mut a, &mut b);
        }
        Self { start: a, end: b, kind }
    }

    fn greater(a: &Position, b: &Position) -> bool {
        a.line > b.line || (a.line == b.line && a.byte > b.byte)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `(abs_start, abs_end_exclusive)` over the lexicographically low/high
    /// endpoints — half-open, matching [`SelectionModel::contains`]'s
    /// `low <= pos < high` exactly, so this is what a row's highlight and a
    /// copy of the same span always agree on. Linewise spans still expand
    /// to whole lines, since `start`/`end` there hold the cursor's raw
    /// column rather than a line boundary.
    pub fn byte_range(&self, buffer: &Buffer) -> (usize, usize) {
        let mut a = buffer.to_absolute(self.start);
        let mut b = buffer.to_absolute(self.end);
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        match self.kind {
            SelectionKind::Characterwise => (a, b),
            SelectionKind::Linewise => {
                let low = buffer.from_absolute(a);
                let high = buffer.from_absolute(b);
                let line_start = buffer.to_absolute(Position::new(low.line, 0));
                let last_line_end = if high.line + 1 < buffer.line_count() {
                    buffer.to_absolute(Position::new(high.line + 1, 0))
                } else {
                    buffer.to_absolute(Position::new(high.line, buffer.line_byte_len(high.line)))
                };
                (line_start, last_line_end)
            }
        }
    }

    /// `(abs_start, abs_end_exclusive)` over the lexicographically low/high
    /// endpoints, expanded to include the last grapheme of a non-empty
    /// characterwise span. Used only where the end cell itself must be
    /// consumed (deletion); copying uses [`Self::byte_range`] instead, since
    /// the renderer highlights the end cell as *not* selected.
    pub fn inclusive_byte_range(&self, buffer: &Buffer) -> (usize, usize) {
        let (a, mut b) = self.byte_range(buffer);
        if a == b || self.kind != SelectionKind::Characterwise {
            return (a, b);
        }
        let high_pos = buffer.from_absolute(b);
        let line_len = buffer.line_byte_len(high_pos.line);
        if high_pos.byte < line_len {
            let content = buffer.line(high_pos.line).unwrap_or_default();
            let content = content.strip_suffix('\n').unwrap_or(&content);
            let next = loki_text::grapheme::next_boundary(content, high_pos.byte);
            b = buffer.to_absolute(Position::new(high_pos.line, next));
        }
        (a, b)
    }

    /// Serialize selected text: rows joined by `\n`, with partial
    /// leading/trailing rows trimmed to their in-selection columns. Uses
    /// the half-open range so a yank always matches what was highlighted.
    pub fn copy_text(&self, buffer: &Buffer) -> String {
        let (start, end) = self.byte_range(buffer);
        buffer.slice_bytes(start, end)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionModel {
    pub active: Option<SelectionSpan>,
    pub anchor: Option<Position>,
}

impl SelectionModel {
    pub fn clear(&mut self) {
        self.active = None;
        self.anchor = None;
    }
    pub fn set(&mut self, span: SelectionSpan) {
        self.active = Some(span);
    }
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
    /// Begin a selection anchored at `pos`.
    pub fn begin(&mut self, pos: Position, kind: SelectionKind) {
        self.anchor = Some(pos);
        self.active = Some(SelectionSpan::new(pos, pos, kind));
    }
    /// Extend the selection's end to `pos`, re-anchoring at the persistent anchor.
    pub fn extend_to(&mut self, pos: Position, kind: SelectionKind) {
        if let Some(anchor) = self.anchor {
            self.active = Some(SelectionSpan::new(anchor, pos, kind));
        } else {
            self.begin(pos, kind);
        }
    }
    /// A cell is "in selection" if low <= (row, col) < high.
    pub fn contains(&self, pos: Position) -> bool {
        match self.active {
            Some(span) => !span.is_empty() && span.start <= pos && pos < span.end,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_normalizes_reversed_endpoints() {
        let span = SelectionSpan::new(Position::new(2, 0), Position::new(0, 0), SelectionKind::Characterwise);
        assert_eq!(span.start, Position::new(0, 0));
        assert_eq!(span.end, Position::new(2, 0));
    }

    #[test]
    fn characterwise_inclusive_range_includes_last_grapheme() {
        let buf = Buffer::from_str("t", "abcdef").unwrap();
        let span = SelectionSpan::new(Position::new(0, 1), Position::new(0, 3), SelectionKind::Characterwise);
        let (s, e) = span.inclusive_byte_range(&buf);
        assert_eq!(&buf.slice_bytes(s, e), "bcd");
    }

    #[test]
    fn copy_text_matches_the_half_open_highlighted_range() {
        // low=(0,1), high=(0,3): `contains` highlights columns 1 and 2
        // ("bc"); the yank must match exactly, not pull in column 3 too.
        let buf = Buffer::from_str("t", "abcdef").unwrap();
        let span = SelectionSpan::new(Position::new(0, 1), Position::new(0, 3), SelectionKind::Characterwise);
        assert_eq!(span.copy_text(&buf), "bc");
    }

    #[test]
    fn linewise_range_spans_whole_lines() {
        let buf = Buffer::from_str("t", "a\nbb\nccc").unwrap();
        let span = SelectionSpan::new(Position::new(0, 0), Position::new(1, 1), SelectionKind::Linewise);
        let (s, e) = span.inclusive_byte_range(&buf);
        assert_eq!(&buf.slice_bytes(s, e), "a\nbb\n");
    }

    #[test]
    fn contains_is_half_open() {
        let mut model = SelectionModel::default();
        model.begin(Position::new(0, 0), SelectionKind::Characterwise);
        model.extend_to(Position::new(0, 3), SelectionKind::Characterwise);
        assert!(model.contains(Position::new(0, 0)));
        assert!(model.contains(Position::new(0, 2)));
        assert!(!model.contains(Position::new(0, 3)));
    }
}
