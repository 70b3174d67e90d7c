//! Cursor motion helpers. Pure functions over a `Buffer` + `Position` pair,
//! free of any editor-wide state so the modal dispatcher can compose them.

use crate::{Buffer, Position, grapheme};

/// Clamp a cursor so it rests on a real character cell (never past the last
/// grapheme of a non-empty line), matching block-cursor NORMAL-mode semantics.
pub fn normalize_normal_mode_position(buf: &Buffer, pos: &mut Position) {
    if pos.line >= buf.line_count() {
        return;
    }
    let line_len = buf.line_byte_len(pos.line);
    if line_len == 0 {
        return;
    }
    if pos.byte >= line_len {
        if let Some(line_full) = buf.line(pos.line) {
            let content = line_full.strip_suffix('\n').unwrap_or(&line_full);
            pos.byte = grapheme::prev_boundary(content, content.len());
        }
    }
}

/// Move left one grapheme boundary.
pub fn left(buf: &Buffer, pos: &mut Position) {
    if pos.byte == 0 {
        return;
    }
    if let Some(line) = buf.line(pos.line) {
        let content = line.strip_suffix('\n').unwrap_or(&line);
        pos.byte = grapheme::prev_boundary(content, pos.byte);
    }
}

/// Move right one grapheme boundary.
pub fn right(buf: &Buffer, pos: &mut Position) {
    if let Some(line) = buf.line(pos.line) {
        let content = line.strip_suffix('\n').unwrap_or(&line);
        let next = grapheme::next_boundary(content, pos.byte);
        if next > pos.byte {
            pos.byte = next;
        }
    }
}

/// Move to the start of the line.
pub fn line_start(_buf: &Buffer, pos: &mut Position) {
    pos.byte = 0;
}

/// Move to the end of the line (after the last grapheme).
pub fn line_end(buf: &Buffer, pos: &mut Position) {
    pos.byte = buf.line_byte_len(pos.line);
}

/// Move up one line preserving a target visual column (sticky). Returns the
/// updated sticky column; callers thread it across vertical motions.
pub fn up(buf: &Buffer, pos: &mut Position, mut sticky_col: Option<usize>) -> Option<usize> {
    if pos.line == 0 {
        return sticky_col;
    }
    if sticky_col.is_none() {
        sticky_col = Some(current_visual_col(buf, pos));
    }
    pos.line -= 1;
    pos.byte = byte_for_visual_col(buf, pos.line, sticky_col.unwrap());
    sticky_col
}

/// Move down one line preserving sticky visual column.
pub fn down(buf: &Buffer, pos: &mut Position, mut sticky_col: Option<usize>) -> Option<usize> {
    if pos.line + 1 >= buf.line_count() {
        return sticky_col;
    }
    if sticky_col.is_none() {
        sticky_col = Some(current_visual_col(buf, pos));
    }
    pos.line += 1;
    pos.byte = byte_for_visual_col(buf, pos.line, sticky_col.unwrap());
    sticky_col
}

fn current_visual_col(buf: &Buffer, pos: &Position) -> usize {
    let current_line = buf.line(pos.line).unwrap_or_default();
    let content = current_line.strip_suffix('\n').unwrap_or(&current_line);
    grapheme::visual_col(content, pos.byte)
}

fn byte_for_visual_col(buf: &Buffer, line: usize, target_col: usize) -> usize {
    if let Some(line_str) = buf.line(line) {
        let content = line_str.strip_suffix('\n').unwrap_or(&line_str);
        let mut col = 0;
        let mut byte = 0;
        for (b, g) in unicode_segmentation::UnicodeSegmentation::grapheme_indices(content, true) {
            let w = grapheme::cluster_width(g);
            if col + w > target_col {
                return b;
            }
            col += w;
            byte = b + g.len();
        }
        return byte;
    }
    0
}

/// Move to the previous blank line (Vim `{`), or line 0 if none precedes.
pub fn prev_blank_line(buf: &Buffer, pos: &mut Position) {
    let mut line = pos.line;
    while line > 0 {
        line -= 1;
        if buf.line_byte_len(line) == 0 {
            pos.line = line;
            pos.byte = 0;
            return;
        }
    }
    pos.line = 0;
    pos.byte = 0;
}

/// Move to the next blank line (Vim `}`), or the last line if none follows.
pub fn next_blank_line(buf: &Buffer, pos: &mut Position) {
    let last = buf.line_count().saturating_sub(1);
    let mut line = pos.line;
    while line < last {
        line += 1;
        if buf.line_byte_len(line) == 0 {
            pos.line = line;
            pos.byte = 0;
            return;
        }
    }
    pos.line = last;
    pos.byte = buf.line_byte_len(last);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClusterKind {
    Word,
    Blank,
    Other,
}

fn classify_cluster(cluster: &str) -> ClusterKind {
    if grapheme::is_word(cluster) {
        ClusterKind::Word
    } else if cluster.chars().all(|c| c.is_whitespace()) {
        ClusterKind::Blank
    } else {
        ClusterKind::Other
    }
}

fn line_without_newline(buf: &Buffer, idx: usize) -> String {
    buf.line(idx)
        .map(|mut l| {
            if l.ends_with('\n') {
                l.pop();
            }
            l
        })
        .unwrap_or_default()
}

fn advance_line_forward(
    buf: &Buffer,
    line: &mut usize,
    byte: &mut usize,
    line_content: &mut String,
) -> bool {
    if *line + 1 >= buf.line_count() {
        *byte = line_content.len();
        return false;
    }
    *line += 1;
    *line_content = line_without_newline(buf, *line);
    *byte = 0;
    true
}

fn skip_blanks_forward(
    buf: &Buffer,
    line: &mut usize,
    byte: &mut usize,
    line_content: &mut String,
) -> bool {
    loop {
        if *byte >= line_content.len() {
            if !advance_line_forward(buf, line, byte, line_content) {
                return false;
            }
            if line_content.is_empty() {
                continue;
            }
        }
        let nb = grapheme::next_boundary(line_content, *byte);
        let cluster = &line_content[*byte..nb];
        if classify_cluster(cluster) == ClusterKind::Blank {
            *byte = nb;
            continue;
        }
        return true;
    }
}

fn skip_kind_in_line(line: &str, mut byte: usize, kind: ClusterKind) -> usize {
    while byte < line.len() {
        let nb = grapheme::next_boundary(line, byte);
        let cluster = &line[byte..nb];
        if classify_cluster(cluster) != kind {
            break;
        }
        byte = nb;
    }
    byte
}

fn retreat_line(
    buf: &Buffer,
    line: &mut usize,
    byte: &mut usize,
    line_content: &mut String,
) -> bool {
    if *line == 0 {
        return false;
    }
    *line -= 1;
    *line_content = line_without_newline(buf, *line);
    *byte = line_content.len();
    true
}

/// Move forward to the start of the next token (Vim `w`).
pub fn word_forward(buf: &Buffer, pos: &mut Position) {
    if buf.line_count() == 0 {
        return;
    }
    let mut line = pos.line.min(buf.line_count() - 1);
    let mut line_content = line_without_newline(buf, line);
    let mut byte = pos.byte.min(line_content.len());
    if byte >= line_content.len() {
        let _ = skip_blanks_forward(buf, &mut line, &mut byte, &mut line_content);
        pos.line = line;
        pos.byte = byte;
        return;
    }

    let nb = grapheme::next_boundary(&line_content, byte);
    let cluster = &line_content[byte..nb];
    byte = match classify_cluster(cluster) {
        ClusterKind::Blank => nb,
        ClusterKind::Word => skip_kind_in_line(&line_content, byte, ClusterKind::Word),
        ClusterKind::Other => skip_kind_in_line(&line_content, byte, ClusterKind::Other),
    };
    let _ = skip_blanks_forward(buf, &mut line, &mut byte, &mut line_content);
    pos.line = line;
    pos.byte = byte;
}

/// Move backward to the start of the previous token (Vim `b`).
pub fn word_backward(buf: &Buffer, pos: &mut Position) {
    if buf.line_count() == 0 {
        return;
    }
    let mut line = pos.line.min(buf.line_count() - 1);
    let mut line_content = line_without_newline(buf, line);
    let mut byte = pos.byte.min(line_content.len());

    loop {
        if byte == 0 {
            if !retreat_line(buf, &mut line, &mut byte, &mut line_content) {
                pos.line = 0;
                pos.byte = 0;
                return;
            }
            continue;
        }
        let prev_b = grapheme::prev_boundary(&line_content, byte);
        if prev_b == byte {
            if !retreat_line(buf, &mut line, &mut byte, &mut line_content) {
                pos.line = 0;
                pos.byte = 0;
                return;
            }
            continue;
        }
        let cluster = &line_content[prev_b..byte];
        let kind = classify_cluster(cluster);
        match kind {
            ClusterKind::Blank => {
                byte = prev_b;
                continue;
            }
            ClusterKind::Word | ClusterKind::Other => {
                byte = prev_b;
                while byte > 0 {
                    let before = grapheme::prev_boundary(&line_content, byte);
                    if before == byte {
                        break;
                    }
                    let prev_cluster = &line_content[before..byte];
                    if classify_cluster(prev_cluster) != kind {
                        break;
                    }
                    byte = before;
                }
                pos.line = line;
                pos.byte = byte;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_and_line_boundaries() {
        let buf = Buffer::from_str("t", "abc").unwrap();
        let mut pos = Position::origin();
        while pos.byte < buf.line_byte_len(0) {
            right(&buf, &mut pos);
        }
        let end = buf.line_byte_len(0);
        assert_eq!(pos.byte, end);
        left(&buf, &mut pos);
        left(&buf, &mut pos);
        assert!(pos.byte < end);
        line_start(&buf, &mut pos);
        assert_eq!(pos.byte, 0);
        line_end(&buf, &mut pos);
        assert_eq!(pos.byte, end);
    }

    #[test]
    fn vertical_motions_sticky_column() {
        let buf = Buffer::from_str("t", "ab\nx\nlonger line").unwrap();
        let mut pos = Position::new(0, 2);
        let sticky = down(&buf, &mut pos, None);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.byte, 1); // clamped to short line
        let sticky = down(&buf, &mut pos, sticky);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.byte, 2); // restored on longer line
    }

    #[test]
    fn word_forward_and_backward_basic() {
        let buf = Buffer::from_str("t", "foo bar baz").unwrap();
        let mut pos = Position::origin();
        word_forward(&buf, &mut pos);
        assert_eq!(pos.byte, 4);
        word_forward(&buf, &mut pos);
        assert_eq!(pos.byte, 8);
        word_backward(&buf, &mut pos);
        assert_eq!(pos.byte, 4);
        word_backward(&buf, &mut pos);
        assert_eq!(pos.byte, 0);
    }

    #[test]
    fn paragraph_motions() {
        let buf = Buffer::from_str("t", "a\nb\n\nc\nd\n\ne").unwrap();
        let mut pos = Position::new(0, 0);
        next_blank_line(&buf, &mut pos);
        assert_eq!(pos.line, 2);
        next_blank_line(&buf, &mut pos);
        assert_eq!(pos.line, 5);
        prev_blank_line(&buf, &mut pos);
        assert_eq!(pos.line, 2);
        prev_blank_line(&buf, &mut pos);
        assert_eq!(pos.line, 0);
    }
}
