//! Grapheme and width utilities operating on a single line.

use crate::egc_width;
use unicode_segmentation::UnicodeSegmentation;

/// Iterate grapheme clusters in a line.
pub fn iter(line: &str) -> impl Iterator<Item = &str> {
    line.graphemes(true)
}

/// Previous grapheme boundary (returns 0 if already at or below the first boundary).
pub fn prev_boundary(line: &str, byte: usize) -> usize {
    if byte == 0 || byte > line.len() {
        return 0;
    }
    let mut last = 0;
    for (idx, _) in line.grapheme_indices(true) {
        if idx >= byte {
            break;
        }
        last = idx;
    }
    last
}

/// Next grapheme boundary (returns `line.len()` if at or beyond the end).
pub fn next_boundary(line: &str, byte: usize) -> usize {
    if byte >= line.len() {
        return line.len();
    }
    for (idx, _) in line.grapheme_indices(true) {
        if idx > byte {
            return idx;
        }
    }
    line.len()
}

/// Compute the visual column (terminal cells) up to, but not including, `byte`.
pub fn visual_col(line: &str, byte: usize) -> usize {
    let mut col = 0;
    for (idx, g) in line.grapheme_indices(true) {
        if idx >= byte {
            break;
        }
        col += egc_width(g) as usize;
    }
    col
}

/// Width in terminal cells of this grapheme cluster.
pub fn cluster_width(g: &str) -> usize {
    egc_width(g) as usize
}

/// Naive word classification: alphanumeric or underscore start.
pub fn is_word(g: &str) -> bool {
    g.chars()
        .next()
        .map(|c| c == '_' || c.is_alphanumeric())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_roundtrip_ascii() {
        let s = "abc";
        let n = next_boundary(s, 0);
        assert_eq!(n, 1);
        assert_eq!(prev_boundary(s, n), 0);
    }

    #[test]
    fn combining_mark_single_cluster() {
        let s = "e\u{0301}";
        let nb = next_boundary(s, 0);
        assert_eq!(nb, s.len());
        assert_eq!(prev_boundary(s, nb), 0);
    }

    #[test]
    fn visual_col_non_decreasing() {
        let s = "a\u{00e9}bc";
        let mut last = 0;
        let mut b = 0;
        while b < s.len() {
            let next = next_boundary(s, b);
            let col = visual_col(s, next);
            assert!(col >= last);
            last = col;
            b = next;
        }
    }
}
