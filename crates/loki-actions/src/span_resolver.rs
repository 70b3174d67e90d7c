//! Motion span resolution: given a starting cursor position, a motion, and a
//! count, compute the byte range an operator (`d`/`y`/`c`, §4.4/§4.9) should
//! act on.
//!
//! Grounded on `core-actions::span_resolver::resolve_selection`, simplified
//! by routing through `Buffer::to_absolute`/`from_absolute` in place of the
//! teacher's hand-rolled line-scan helpers (this engine's `Buffer` exposes
//! both directly; the teacher's did not at the time that module was
//! written).

use loki_state::{SelectionKind, SelectionSpan};
use loki_text::{motion, Buffer, Position};

use crate::MotionKind;

fn is_vertical(kind: MotionKind) -> bool {
    matches!(kind, MotionKind::Up | MotionKind::Down | MotionKind::PageHalfUp | MotionKind::PageHalfDown)
}

fn apply_once(buffer: &Buffer, pos: &mut Position, kind: MotionKind) {
    match kind {
        MotionKind::Left => motion::left(buffer, pos),
        MotionKind::Right => motion::right(buffer, pos),
        MotionKind::LineStart => motion::line_start(buffer, pos),
        MotionKind::LineEnd => motion::line_end(buffer, pos),
        MotionKind::WordForward => motion::word_forward(buffer, pos),
        MotionKind::WordBackward => motion::word_backward(buffer, pos),
        MotionKind::PrevBlankLine => motion::prev_blank_line(buffer, pos),
        MotionKind::NextBlankLine => motion::next_blank_line(buffer, pos),
        MotionKind::Up | MotionKind::PageHalfUp => {
            let _ = motion::up(buffer, pos, None);
        }
        MotionKind::Down | MotionKind::PageHalfDown => {
            let _ = motion::down(buffer, pos, None);
        }
    }
}

/// Resolve the span `motion_kind` repeated `count` times (minimum 1) sweeps
/// out, starting from `start`. Vertical motions produce a linewise span
/// covering every full line between the original and destination row;
/// everything else produces a characterwise span with normalized ordering.
/// A motion that doesn't move the cursor resolves to an empty span at
/// `start`.
pub fn resolve_selection(buffer: &Buffer, start: Position, motion_kind: MotionKind, count: u32) -> SelectionSpan {
    let count = count.max(1);

    if is_vertical(motion_kind) {
        let mut tmp = start;
        for _ in 0..count {
            apply_once(buffer, &mut tmp, motion_kind);
        }
        if tmp.line == start.line {
            return SelectionSpan::new(start, start, SelectionKind::Characterwise);
        }
        let low_line = start.line.min(tmp.line);
        let high_line = start.line.max(tmp.line);
        return SelectionSpan::new(
            Position::new(low_line, 0),
            Position::new(high_line, 0),
            SelectionKind::Linewise,
        );
    }

    let mut pos = start;
    let orig_abs = buffer.to_absolute(start);
    for _ in 0..count {
        apply_once(buffer, &mut pos, motion_kind);
    }
    let final_abs = buffer.to_absolute(pos);
    if final_abs == orig_abs {
        return SelectionSpan::new(start, start, SelectionKind::Characterwise);
    }
    let (lo, hi) = if final_abs > orig_abs { (orig_abs, final_abs) } else { (final_abs, orig_abs) };
    SelectionSpan::new(buffer.from_absolute(lo), buffer.from_absolute(hi), SelectionKind::Characterwise)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_three_times_spans_three_bytes() {
        let buf = Buffer::from_str("t", "abcdef\n").unwrap();
        let span = resolve_selection(&buf, Position::origin(), MotionKind::Right, 3);
        assert_eq!(span.start, Position::new(0, 0));
        assert_eq!(span.end, Position::new(0, 3));
    }

    #[test]
    fn word_forward_twice_spans_past_two_words() {
        let buf = Buffer::from_str("t", "one two three\n").unwrap();
        let span = resolve_selection(&buf, Position::origin(), MotionKind::WordForward, 2);
        assert!(span.end.byte > span.start.byte);
    }

    #[test]
    fn motion_with_no_movement_resolves_empty() {
        let buf = Buffer::from_str("t", "abc\n").unwrap();
        let span = resolve_selection(&buf, Position::origin(), MotionKind::Left, 5);
        assert_eq!(span.start, span.end);
    }

    #[test]
    fn down_produces_linewise_span_over_both_rows() {
        let buf = Buffer::from_str("t", "alpha\nbeta\ngamma\n").unwrap();
        let span = resolve_selection(&buf, Position::new(0, 2), MotionKind::Down, 1);
        assert_eq!(span.kind, SelectionKind::Linewise);
        assert_eq!(span.start, Position::new(0, 0));
        assert_eq!(span.end, Position::new(1, 0));
    }
}
