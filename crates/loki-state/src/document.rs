//! Document model: row store bound to a buffer, undo journal, indent
//! config, and syntax table, with mutation routed through all three (§3
//! Document model, §4.1 Row store and text mutation).

use anyhow::Result;
use loki_syntax::SyntaxTable;
use loki_text::{Buffer, Position, RowStore};

use crate::indent::IndentConfig;
use crate::line_ending::{normalize_line_endings, LineEnding};
use crate::undo::UndoJournal;

pub struct DocumentModel {
    pub buffer: Buffer,
    pub rows: RowStore,
    pub filename: Option<std::path::PathBuf>,
    /// Non-zero if unsaved edits exist since the last save (§3).
    pub dirty: usize,
    pub undo: UndoJournal,
    pub indent: IndentConfig,
    pub syntax: SyntaxTable,
    pub line_ending: LineEnding,
    pub had_trailing_newline: bool,
}

impl DocumentModel {
    pub fn empty() -> Self {
        Self::from_content("[No Name]", "", None)
    }

    pub fn from_content(name: &str, content: &str, filename: Option<std::path::PathBuf>) -> Self {
        let normalized = normalize_line_endings(content);
        let buffer = Buffer::from_str(name, &normalized.normalized).expect("in-memory buffer construction cannot fail");
        let rows = RowStore::from_buffer(&buffer);
        let syntax = filename
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| SyntaxTable::for_filename(&n.to_string_lossy()))
            .unwrap_or(SyntaxTable::Base(loki_syntax::grammar::PLAIN));
        let mut doc = Self {
            buffer,
            rows,
            filename,
            dirty: 0,
            undo: UndoJournal::new(),
            indent: IndentConfig::default(),
            syntax,
            line_ending: normalized.original,
            had_trailing_newline: normalized.had_trailing_newline,
        };
        loki_syntax::highlight_all(&mut doc.rows, &doc.syntax, None);
        doc
    }

    /// Open a file from disk, rejecting binary content (§4.1).
    pub fn open(path: &std::path::Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        if loki_text::looks_binary(&bytes) {
            anyhow::bail!("refusing to open binary file: {}", path.display());
        }
        let content = String::from_utf8_lossy(&bytes).to_string();
        let name = path.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        Ok(Self::from_content(&name, &content, Some(path.to_path_buf())))
    }

    /// Save, re-expanding rows with the file's original line-ending style
    /// and trailing-newline presence (§3 "original line ending" metadata)
    /// rather than `Buffer::save`'s always-LF-no-trailing-newline form, and
    /// resetting the dirty counter. Requires a filename to already be set.
    pub fn save(&mut self) -> Result<usize> {
        let path = self.filename.as_ref().ok_or_else(|| anyhow::anyhow!("no filename set"))?;
        let sep = self.line_ending.as_str();
        let line_count = self.buffer.line_count();
        let mut out = String::new();
        for i in 0..line_count {
            let mut l = self.buffer.line(i).unwrap_or_default();
            if l.ends_with('\n') {
                l.pop();
            }
            out.push_str(&l);
            if i + 1 < line_count || self.had_trailing_newline {
                out.push_str(sep);
            }
        }
        std::fs::write(path, out.as_bytes())?;
        self.dirty = 0;
        self.undo.break_group();
        Ok(out.len())
    }

    pub fn save_as(&mut self, path: std::path::PathBuf) -> Result<usize> {
        self.filename = Some(path);
        self.save()
    }

    fn resync_row(&mut self, row: usize) {
        self.rows.refresh_row(row, &self.buffer);
        loki_syntax::highlight_from(&mut self.rows, &self.syntax, row);
    }

    fn resync_all(&mut self) {
        self.rows.resync(&self.buffer);
        loki_syntax::highlight_all(&mut self.rows, &self.syntax, None);
    }

    /// Insert a single character at `pos`, advancing it, recording one
    /// `insert-char` undo entry.
    pub fn insert_char(&mut self, pos: &mut Position, ch: char) {
        let pre = *pos;
        self.undo.record_insert_char(pos.line, pos.byte, ch, pre);
        self.buffer.insert_str(pos, &ch.to_string());
        self.dirty += 1;
        self.resync_row(pre.line);
    }

    /// Backspace: delete the character before `pos`. At column 0 of a
    /// non-first row this merges with the previous row, recorded as a
    /// `delete-line` undo entry; otherwise a `delete-char` entry.
    pub fn delete_char_before(&mut self, pos: &mut Position) {
        if pos.line == 0 && pos.byte == 0 {
            return;
        }
        let pre = *pos;
        if pos.byte == 0 {
            let row_above = pos.line - 1;
            let above_len = self.buffer.line_byte_len(row_above);
            let removed = self.buffer.delete_row(pos.line);
            self.buffer.append_to_row(row_above, &removed);
            // `row` is the (pre-merge) row index being removed, matching
            // `do_merge`'s forward-replay argument; undo re-splits
            // `row - 1` at `above_len` to rebuild it (see `undo::invert`).
            self.undo.record_delete_line(pre.line, above_len, removed.clone(), removed.len(), pre);
            pos.line = row_above;
            pos.byte = above_len;
            self.dirty += 1;
            self.resync_all();
            return;
        }
        let line_str = self.buffer.line(pos.line).unwrap_or_default();
        let trimmed = line_str.strip_suffix('\n').unwrap_or(&line_str);
        let prev_byte = loki_text::grapheme::prev_boundary(trimmed, pos.byte);
        let removed_str = &trimmed[prev_byte..pos.byte];
        let removed_char = removed_str.chars().next().unwrap_or('\0');
        self.buffer.delete_grapheme_before(pos);
        self.undo.record_delete_char(pos.line, prev_byte, removed_char, pre);
        self.dirty += 1;
        self.resync_row(pos.line);
    }

    /// NORMAL-mode `x`: delete the character at `pos` without moving it.
    pub fn delete_char_at(&mut self, pos: &Position) {
        let line_len = self.buffer.line_byte_len(pos.line);
        if pos.byte >= line_len {
            return;
        }
        let line_str = self.buffer.line(pos.line).unwrap_or_default();
        let trimmed = line_str.strip_suffix('\n').unwrap_or(&line_str);
        let next = loki_text::grapheme::next_boundary(trimmed, pos.byte);
        let removed_char = trimmed[pos.byte..next].chars().next().unwrap_or('\0');
        let mut cursor = *pos;
        self.buffer.delete_grapheme_at(&mut cursor);
        self.undo.record_delete_char(pos.line, pos.byte, removed_char, *pos);
        self.dirty += 1;
        self.resync_row(pos.line);
    }

    /// Insert a newline at `pos`, seeding the new row's indent (§4.7),
    /// recording an `insert-line` undo entry.
    pub fn insert_newline(&mut self, pos: &mut Position) {
        let pre = *pos;
        let grammar = self.base_grammar();
        let tail = {
            let line_str = self.buffer.line(pos.line).unwrap_or_default();
            let trimmed = line_str.strip_suffix('\n').unwrap_or(&line_str);
            trimmed[pos.byte.min(trimmed.len())..].to_string()
        };
        self.buffer.insert_newline(pos);
        self.dirty += 1;
        self.undo.record_insert_line(pre.line, pre.byte, tail.clone(), tail.len(), pre);
        self.resync_all();
        let seed = {
            let above = self.buffer.line(pos.line - 1).unwrap_or_default();
            let above = above.strip_suffix('\n').unwrap_or(&above);
            crate::indent::seed_for_new_row(above, &grammar, &self.indent)
        };
        if !seed.is_empty() {
            self.buffer.insert_str(pos, &seed);
            self.resync_row(pos.line);
        }
    }

    /// Electric dedent hook: call right after inserting `ch` at `pos` in
    /// INSERT mode. Removes one indent level if `ch` is a closer typed at
    /// the start of otherwise-whitespace content (§4.7).
    pub fn maybe_electric_dedent(&mut self, pos: &mut Position, ch: char) {
        let grammar = self.base_grammar();
        let row_text = self.buffer.line(pos.line).unwrap_or_default();
        let row_text = row_text.strip_suffix('\n').unwrap_or(&row_text).to_string();
        let col_before_insert = pos.byte.saturating_sub(ch.len_utf8());
        if let Some(new_ws) = crate::indent::electric_dedent(&row_text, col_before_insert, ch, &grammar, &self.indent) {
            let rest = row_text[pos.byte..].to_string();
            let start = self.buffer.to_absolute(Position::new(pos.line, 0));
            let end = self.buffer.to_absolute(Position::new(pos.line, row_text.len()));
            self.buffer.delete_bytes(start, end);
            let mut write_pos = Position::new(pos.line, 0);
            self.buffer.insert_str(&mut write_pos, &format!("{new_ws}{ch}{rest}"));
            pos.byte = new_ws.len() + ch.len_utf8();
            self.dirty += 1;
            self.resync_row(pos.line);
        }
    }

    /// Delete the absolute byte range `[start, end)`, used by operator
    /// dispatch (delete/change, §4.4) to remove an arbitrary motion- or
    /// text-object-resolved span. Records one atomic undo entry regardless
    /// of how many lines the span crosses, leaves `cursor` at the deletion
    /// point, and returns the removed text for register capture.
    pub fn delete_span(&mut self, cursor: &mut Position, start: usize, end: usize) -> String {
        if start >= end {
            return String::new();
        }
        let pos = self.buffer.from_absolute(start);
        let pre = *cursor;
        let removed = self.buffer.delete_bytes(start, end);
        if removed.is_empty() {
            return removed;
        }
        self.undo.record_delete_span(pos.line, pos.byte, removed.clone(), pre);
        self.dirty += 1;
        *cursor = pos;
        self.resync_all();
        removed
    }

    /// Insert arbitrary text (a register's contents, §4.6 `p`/`P`) at
    /// `pos`, recording one atomic undo entry regardless of how many lines
    /// it spans. Mirrors `delete_span`.
    pub fn insert_text(&mut self, pos: &mut Position, text: &str) {
        if text.is_empty() {
            return;
        }
        let pre = *pos;
        self.undo.record_insert_span(pos.line, pos.byte, text.to_string(), pre);
        self.buffer.insert_str(pos, text);
        self.dirty += 1;
        self.resync_all();
    }

    /// Undo the most recent group, restoring `cursor` and re-running
    /// highlighting over the whole buffer (cheaper than tracking exactly
    /// which rows an inverted multi-line span touched). Returns `false` if
    /// there was nothing to undo.
    pub fn undo(&mut self, cursor: &mut Position) -> bool {
        match self.undo.undo(&mut self.buffer) {
            Some(pos) => {
                *cursor = pos;
                self.resync_all();
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone group. Returns `false` if there was
    /// nothing to redo.
    pub fn redo(&mut self, cursor: &mut Position) -> bool {
        match self.undo.redo(&mut self.buffer) {
            Some(pos) => {
                *cursor = pos;
                self.resync_all();
                true
            }
            None => false,
        }
    }

    fn base_grammar(&self) -> loki_syntax::Grammar {
        match self.syntax {
            SyntaxTable::Base(g) | SyntaxTable::Sectioned(g) => g,
            SyntaxTable::Markdown => loki_syntax::grammar::PLAIN,
        }
    }

    pub fn row_count(&self) -> usize {
        self.buffer.line_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_char_marks_dirty_and_updates_render() {
        let mut doc = DocumentModel::from_content("t", "ac", None);
        let mut pos = Position::new(0, 1);
        doc.insert_char(&mut pos, 'b');
        assert_eq!(doc.buffer.line(0).unwrap(), "abc");
        assert_eq!(doc.dirty, 1);
        assert_eq!(pos, Position::new(0, 2));
    }

    #[test]
    fn undo_after_insert_restores_content_and_clears_some_dirty() {
        let mut doc = DocumentModel::from_content("t", "ac", None);
        let mut pos = Position::new(0, 1);
        doc.insert_char(&mut pos, 'b');
        let cursor = doc.undo.undo(&mut doc.buffer).unwrap();
        assert_eq!(doc.buffer.line(0).unwrap(), "ac");
        assert_eq!(cursor, Position::new(0, 1));
    }

    #[test]
    fn backspace_at_column_zero_merges_rows_via_delete_line_entry() {
        let mut doc = DocumentModel::from_content("t", "ab\ncd", None);
        let mut pos = Position::new(1, 0);
        doc.delete_char_before(&mut pos);
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.buffer.line(0).unwrap(), "abcd");
        assert_eq!(pos, Position::new(0, 2));
    }

    #[test]
    fn insert_newline_seeds_indent_after_opener() {
        let mut doc = DocumentModel::from_content("t.rs", "fn main() {", None);
        doc.syntax = SyntaxTable::Base(loki_syntax::grammar::RUST);
        let mut pos = Position::new(0, 11);
        doc.insert_newline(&mut pos);
        assert_eq!(doc.buffer.line(1).unwrap(), "  ");
    }

    #[test]
    fn delete_char_at_does_not_move_cursor() {
        let mut doc = DocumentModel::from_content("t", "abc", None);
        let pos = Position::new(0, 0);
        doc.delete_char_at(&pos);
        assert_eq!(doc.buffer.line(0).unwrap(), "bc");
    }

    #[test]
    fn delete_span_removes_range_and_is_one_undo_step() {
        let mut doc = DocumentModel::from_content("t", "abc def\nghi", None);
        let mut cursor = Position::new(0, 0);
        let start = doc.buffer.to_absolute(Position::new(0, 0));
        let end = doc.buffer.to_absolute(Position::new(1, 0));
        let removed = doc.delete_span(&mut cursor, start, end);
        assert_eq!(removed, "abc def\n");
        assert_eq!(doc.buffer.line(0).unwrap(), "ghi");
        assert_eq!(cursor, Position::new(0, 0));
        assert!(doc.undo(&mut cursor));
        assert_eq!(doc.buffer.line(0).unwrap(), "abc def");
        assert_eq!(doc.buffer.line(1).unwrap(), "ghi");
        assert_eq!(cursor, Position::new(0, 0));
    }

    #[test]
    fn insert_text_is_one_undo_step_spanning_multiple_lines() {
        let mut doc = DocumentModel::from_content("t", "ghi", None);
        let mut cursor = Position::new(0, 0);
        doc.insert_text(&mut cursor, "abc\ndef\n");
        assert_eq!(doc.row_count(), 3);
        assert!(doc.undo(&mut cursor));
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.buffer.line(0).unwrap(), "ghi");
    }

    #[test]
    fn save_requires_filename() {
        let mut doc = DocumentModel::from_content("t", "abc", None);
        assert!(doc.save().is_err());
    }

    #[test]
    fn save_writes_file_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut doc = DocumentModel::from_content("t", "abc", Some(path.clone()));
        doc.dirty = 3;
        let n = doc.save().unwrap();
        assert_eq!(doc.dirty, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap().len(), n);
    }
}
