//! Centralized normalization + segmentation adapter.
//!
//! Input: `&str` raw input (may come from a paste or IME commit).
//! Output: `(normalized NFC String, Vec<Segment>)` where each segment is a
//! grapheme cluster with absolute byte offsets into the normalized string
//! and a display width in terminal cells.

use crate::egc_width;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub cluster: String,
    pub start: usize,
    pub end: usize,
    pub width: u16,
}

/// Normalize to NFC and segment into grapheme clusters with widths and byte ranges.
pub fn normalize_and_segment(input: &str) -> (String, Vec<Segment>) {
    let normalized: String = input.nfc().collect();
    let mut out = Vec::new();
    let mut byte = 0usize;
    for g in normalized.graphemes(true) {
        let len = g.len();
        out.push(Segment {
            cluster: g.to_string(),
            start: byte,
            end: byte + len,
            width: egc_width(g),
        });
        byte += len;
    }
    (normalized, out)
}
