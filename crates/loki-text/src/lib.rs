//! Rope-based text buffer abstraction plus the row store's rendered/highlight
//! overlay (§3 Data model, §4.1 Row store and text mutation).

use anyhow::{Result, bail};
use ropey::Rope;

pub mod grapheme;
pub mod motion;
pub mod render;
pub mod segment;
pub mod width;

pub use render::{HighlightClass, Row, RowStore};
pub use width::egc_width;

/// A text buffer backed by a `ropey::Rope`. Lines are exclusive of their
/// trailing newline from the caller's point of view except where `line()`
/// explicitly documents otherwise.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

/// A position inside a buffer expressed as (line index, byte offset within
/// that line). Offsets are always on UTF-8 / grapheme boundaries; callers
/// route through `grapheme` helpers to preserve that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
    pub fn origin() -> Self {
        Self { line: 0, byte: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.byte = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.byte > max_len {
            self.byte = max_len;
        }
    }
}

/// First kilobyte of a candidate file contains a NUL byte: reject per §1/§4.1.
pub fn looks_binary(prefix: &[u8]) -> bool {
    let n = prefix.len().min(1024);
    prefix[..n].contains(&0)
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Read a file from disk, refusing binary content (§4.1).
    pub fn open(path: &std::path::Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        if looks_binary(&bytes) {
            bail!("refusing to open binary file: {}", path.display());
        }
        let content = String::from_utf8_lossy(&bytes);
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self::from_str(name, &content)
    }

    /// Concatenate all rows separated by `\n`, write to `path` truncating
    /// first, and return the byte count written (§4.1 `save`).
    pub fn save(&self, path: &std::path::Path) -> Result<usize> {
        let mut out = String::with_capacity(self.rope.len_bytes());
        for i in 0..self.line_count() {
            let content = self.line_content_string(i);
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&content);
        }
        std::fs::write(path, &out)?;
        Ok(out.len())
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Return the requested line as an owned `String` (including the
    /// trailing newline when present, as ropey stores it).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Byte length of a line excluding any newline, for clamping purposes.
    pub fn line_byte_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let s = self.rope.line(idx).to_string();
        if s.ends_with('\n') { s.len() - 1 } else { s.len() }
    }

    fn line_content_string(&self, idx: usize) -> String {
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    fn absolute_byte_index(&self, pos: &Position) -> usize {
        let line_start_char = self.rope.line_to_char(pos.line);
        let line_start_byte = self.rope.char_to_byte(line_start_char);
        line_start_byte + pos.byte
    }

    fn byte_to_char_index(&self, line: usize, byte_in_line: usize) -> usize {
        let line_start_char = self.rope.line_to_char(line);
        let line_str = self.rope.line(line).to_string();
        let mut trimmed = line_str.as_str();
        if trimmed.ends_with('\n') {
            trimmed = &trimmed[..trimmed.len() - 1];
        }
        let within = &trimmed[..byte_in_line.min(trimmed.len())];
        line_start_char + within.chars().count()
    }

    /// Insert a grapheme cluster string (may be multi-byte) at `pos`; advances
    /// `pos` by its byte length. Inserting past row end pads with spaces
    /// first (§8 boundary: "insert char past row end pads the row").
    pub fn insert_grapheme(&mut self, pos: &mut Position, g: &str) {
        let line_len = self.line_byte_len(pos.line);
        if pos.byte > line_len {
            let pad = " ".repeat(pos.byte - line_len);
            let end_char = self.byte_to_char_index(pos.line, line_len);
            self.rope.insert(end_char, &pad);
        }
        let char_index = self.byte_to_char_index(pos.line, pos.byte);
        self.rope.insert(char_index, g);
        pos.byte += g.len();
    }

    /// Insert a literal string (may contain no newlines) at `pos`.
    pub fn insert_str(&mut self, pos: &mut Position, s: &str) {
        let char_index = self.byte_to_char_index(pos.line, pos.byte);
        self.rope.insert(char_index, s);
        pos.byte += s.len();
    }

    /// Append a string to the end of a row, without moving any cursor.
    pub fn append_to_row(&mut self, row: usize, s: &str) {
        let len = self.line_byte_len(row);
        let char_index = self.byte_to_char_index(row, len);
        self.rope.insert(char_index, s);
    }

    /// Insert an empty row at `idx`, shifting subsequent rows down.
    pub fn insert_row(&mut self, idx: usize, content: &str) {
        let line_count = self.line_count();
        if idx >= line_count {
            let char_index = self.rope.len_chars();
            let mut text = String::new();
            if self.rope.len_bytes() > 0 && !self.rope.to_string().ends_with('\n') {
                text.push('\n');
            }
            text.push_str(content);
            self.rope.insert(char_index, &text);
        } else {
            let char_index = self.rope.line_to_char(idx);
            let mut text = content.to_string();
            text.push('\n');
            self.rope.insert(char_index, &text);
        }
    }

    /// Delete an entire row (and its trailing newline, if any) at `idx`.
    /// Returns the removed content, excluding the newline.
    pub fn delete_row(&mut self, idx: usize) -> String {
        if idx >= self.line_count() {
            return String::new();
        }
        let content = self.line_content_string(idx);
        let start_char = self.rope.line_to_char(idx);
        let end_char = if idx + 1 < self.line_count() {
            self.rope.line_to_char(idx + 1)
        } else {
            self.rope.len_chars()
        };
        self.rope.remove(start_char..end_char);
        content
    }

    /// Insert a newline at `pos`, splitting the current line. The cursor
    /// moves to the start of the new line.
    pub fn insert_newline(&mut self, pos: &mut Position) {
        let char_index = self.byte_to_char_index(pos.line, pos.byte);
        self.rope.insert(char_index, "\n");
        pos.line += 1;
        pos.byte = 0;
    }

    /// Delete the grapheme cluster before `pos` (backspace semantics); joins
    /// with the previous row when at column 0 of a non-first row.
    pub fn delete_grapheme_before(&mut self, pos: &mut Position) {
        if pos.line == 0 && pos.byte == 0 {
            return;
        }
        if pos.byte == 0 {
            let prev_line = pos.line - 1;
            let prev_len = self.line_byte_len(prev_line);
            let line_start_char_prev = self.rope.line_to_char(prev_line);
            let prev_line_start_byte = self.rope.char_to_byte(line_start_char_prev);
            let newline_byte = prev_line_start_byte + prev_len;
            let newline_char_index = self.rope.byte_to_char(newline_byte);
            self.rope.remove(newline_char_index..newline_char_index + 1);
            pos.line = prev_line;
            pos.byte = prev_len;
            return;
        }
        let line_str = self.line_content_string(pos.line);
        let prev = grapheme::prev_boundary(&line_str, pos.byte);
        if prev == pos.byte {
            return;
        }
        let abs_start = self.absolute_byte_index(&Position { line: pos.line, byte: prev });
        let abs_end = self.absolute_byte_index(pos);
        let start_char = self.rope.byte_to_char(abs_start);
        let end_char = self.rope.byte_to_char(abs_end);
        self.rope.remove(start_char..end_char);
        pos.byte = prev;
    }

    /// Delete the grapheme cluster at `pos` ('x' in NORMAL mode). No-op at
    /// end of line; callers implement the (0,0)-on-empty-buffer no-op by not
    /// calling this when the buffer is empty (§8 boundary).
    pub fn delete_grapheme_at(&mut self, pos: &mut Position) {
        let line_len = self.line_byte_len(pos.line);
        if pos.byte >= line_len {
            return;
        }
        let line_str = self.line_content_string(pos.line);
        let next = grapheme::next_boundary(&line_str, pos.byte);
        if next == pos.byte {
            return;
        }
        let abs_start = self.absolute_byte_index(pos);
        let abs_end = self.absolute_byte_index(&Position { line: pos.line, byte: next });
        let start_char = self.rope.byte_to_char(abs_start);
        let end_char = self.rope.byte_to_char(abs_end);
        self.rope.remove(start_char..end_char);
    }

    /// Delete the character at the cursor with the kilo merge rule: at
    /// column 0 of a non-first row, merges with the previous row; no-op at
    /// (0, 0).
    pub fn delete_char_at_cursor(&mut self, pos: &mut Position) {
        if pos.line == 0 && pos.byte == 0 {
            return;
        }
        if pos.byte == 0 {
            self.delete_grapheme_before(pos);
            return;
        }
        let mut at_prev = *pos;
        let line_str = self.line_content_string(pos.line);
        at_prev.byte = grapheme::prev_boundary(&line_str, pos.byte);
        self.delete_grapheme_before(pos);
        *pos = at_prev;
    }

    /// Return the UTF-8 slice in the absolute byte range `[start, end)`.
    pub fn slice_bytes(&self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let total = self.rope.len_bytes();
        let s = start.min(total);
        let e = end.min(total);
        if s >= e {
            return String::new();
        }
        let start_char = self.rope.byte_to_char(s);
        let end_char = self.rope.byte_to_char(e);
        self.rope.slice(start_char..end_char).to_string()
    }

    /// Delete the UTF-8 slice in absolute byte range `[start, end)`
    /// (clamped). Returns the removed text for register/undo integration.
    pub fn delete_bytes(&mut self, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let total = self.rope.len_bytes();
        let s = start.min(total);
        let e = end.min(total);
        if s >= e {
            return String::new();
        }
        let start_char = self.rope.byte_to_char(s);
        let end_char = self.rope.byte_to_char(e);
        let removed = self.rope.slice(start_char..end_char).to_string();
        self.rope.remove(start_char..end_char);
        removed
    }

    /// Absolute byte offset of `pos` within the whole buffer.
    pub fn to_absolute(&self, pos: Position) -> usize {
        self.absolute_byte_index(&pos)
    }

    /// Inverse of [`Buffer::to_absolute`].
    pub fn from_absolute(&self, abs: usize) -> Position {
        let clamped = abs.min(self.rope.len_bytes());
        let char_idx = self.rope.byte_to_char(clamped);
        let line = self.rope.char_to_line(char_idx);
        let line_start_char = self.rope.line_to_char(line);
        let line_start_byte = self.rope.char_to_byte(line_start_char);
        Position { line, byte: clamped - line_start_byte }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_buffer_and_read_line() {
        let b = Buffer::from_str("test", "hello\nworld").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "hello\n");
        assert_eq!(b.line(1).unwrap(), "world");
    }

    #[test]
    fn insert_grapheme_past_end_pads_with_spaces() {
        let mut b = Buffer::from_str("t", "ab").unwrap();
        let mut pos = Position::new(0, 5);
        b.insert_grapheme(&mut pos, "x");
        assert_eq!(b.line(0).unwrap(), "ab   x");
    }

    #[test]
    fn insert_newline_split() {
        let mut b = Buffer::from_str("t", "abcd").unwrap();
        let mut pos = Position::new(0, 2);
        b.insert_newline(&mut pos);
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line(0).unwrap(), "ab\n");
        assert_eq!(b.line(1).unwrap(), "cd");
        assert_eq!(pos.line, 1);
        assert_eq!(pos.byte, 0);
    }

    #[test]
    fn delete_char_at_cursor_noop_at_origin() {
        let mut b = Buffer::from_str("t", "abc").unwrap();
        let mut pos = Position::origin();
        b.delete_char_at_cursor(&mut pos);
        assert_eq!(b.line(0).unwrap(), "abc");
        assert_eq!(pos, Position::origin());
    }

    #[test]
    fn delete_char_at_cursor_merges_rows() {
        let mut b = Buffer::from_str("t", "ab\ncd").unwrap();
        let mut pos = Position::new(1, 0);
        b.delete_char_at_cursor(&mut pos);
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0).unwrap(), "abcd");
        assert_eq!(pos, Position::new(0, 2));
    }

    #[test]
    fn insert_and_delete_row() {
        let mut b = Buffer::from_str("t", "a\nb\nc").unwrap();
        b.insert_row(1, "x");
        assert_eq!(b.line_count(), 4);
        assert_eq!(b.line(1).unwrap(), "x\n");
        let removed = b.delete_row(1);
        assert_eq!(removed, "x");
        assert_eq!(b.line_count(), 3);
    }

    #[test]
    fn open_rejects_binary_first_kib() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        let mut data = vec![b'a'; 512];
        data.push(0);
        data.extend(vec![b'b'; 512]);
        std::fs::write(&path, &data).unwrap();
        assert!(Buffer::open(&path).is_err());
    }

    #[test]
    fn save_writes_rows_joined_by_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let b = Buffer::from_str("t", "foo\n").unwrap();
        let n = b.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "foo\n");
        assert_eq!(n, written.len());
    }

    #[test]
    fn absolute_roundtrip() {
        let b = Buffer::from_str("t", "ab\ncd\ne").unwrap();
        let pos = Position::new(2, 1);
        let abs = b.to_absolute(pos);
        assert_eq!(b.from_absolute(abs), pos);
    }
}
