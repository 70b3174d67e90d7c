//! Undo journal: bounded record-based ring with group coalescing (§4.3).
//!
//! Grounded on `core-state/src/undo.rs`'s `UndoEngine` for the overall shape
//! (separate undo/redo stacks, `Default`, trace telemetry, a
//! `snapshots_skipped`-style counter) but the underlying record is entirely
//! different: the teacher snapshots the whole buffer per edit; the spec
//! requires per-operation entries (`insert-char`, `delete-char`,
//! `insert-line`, `delete-line`) that are exact inverses of each other, so
//! undo/redo invert or replay single operations instead of swapping clones.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

use loki_text::{Buffer, Position};

pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_ENTRIES: usize = 2000;
pub const DEFAULT_MAX_BYTES: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    InsertChar,
    DeleteChar,
    InsertLine,
    DeleteLine,
    /// An arbitrary byte-range deletion, one entry per operator application
    /// (§4.4 operator dispatch) regardless of how many lines it spans. Unlike
    /// the other kinds this never coalesces with a neighbor: one `dw` is one
    /// undo step.
    DeleteSpan,
    /// A register paste (§4.6 `p`/`P`): the mirror image of `DeleteSpan`,
    /// one undo step regardless of how many lines the pasted text spans.
    InsertSpan,
}

#[derive(Debug, Clone)]
pub enum OpData {
    Char(char),
    Line { content: String, len: usize },
    Span { content: String },
}

impl OpData {
    fn byte_size(&self) -> usize {
        match self {
            OpData::Char(c) => c.len_utf8(),
            OpData::Line { content, .. } => content.len(),
            OpData::Span { content } => content.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub kind: OpKind,
    pub row: usize,
    pub col: usize,
    pub data: OpData,
    pub pre_cursor: Position,
    pub group_id: u64,
}

pub struct UndoJournal {
    entries: Vec<UndoEntry>,
    redo: Vec<UndoEntry>,
    next_group: u64,
    last_kind: Option<OpKind>,
    last_row: Option<usize>,
    last_time: Option<Instant>,
    last_post_cursor: Option<Position>,
    pending_break: bool,
    max_entries: usize,
    max_bytes: usize,
    bytes_used: usize,
    idle_threshold: Duration,
    entries_evicted: AtomicU64,
}

impl Default for UndoJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoJournal {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            redo: Vec::new(),
            next_group: 0,
            last_kind: None,
            last_row: None,
            last_time: None,
            last_post_cursor: None,
            pending_break: false,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_bytes: DEFAULT_MAX_BYTES,
            bytes_used: 0,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            entries_evicted: AtomicU64::new(0),
        }
    }

    pub fn with_budgets(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            max_entries,
            max_bytes,
            ..Self::new()
        }
    }

    /// Like [`UndoJournal::with_budgets`], also overriding the group-break
    /// idle threshold (§4.3's "grouping heuristic"), configurable via
    /// `loki-config`'s `[undo]` table.
    pub fn with_config(max_entries: usize, max_bytes: usize, idle_threshold: Duration) -> Self {
        Self { max_entries, max_bytes, idle_threshold, ..Self::new() }
    }

    pub fn undo_depth(&self) -> usize {
        self.entries.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
    pub fn entries_evicted(&self) -> u64 {
        self.entries_evicted.load(Ordering::Relaxed)
    }

    /// Request an explicit group break (mode transition, save, external
    /// command): the *next* recorded entry starts a fresh group regardless
    /// of the other coalescing heuristics.
    pub fn break_group(&mut self) {
        self.pending_break = true;
    }

    /// Any mutation not routed through `record_*` clears the redo ring but
    /// leaves the undo ring untouched (§4.3 Invalidation).
    pub fn invalidate_redo(&mut self) {
        self.redo.clear();
    }

    /// Document replacement clears the whole journal.
    pub fn clear(&mut self) {
        *self = Self::with_budgets(self.max_entries, self.max_bytes);
    }

    pub fn record_insert_char(&mut self, row: usize, col: usize, ch: char, pre_cursor: Position) {
        self.record(OpKind::InsertChar, row, col, OpData::Char(ch), pre_cursor);
    }

    pub fn record_delete_char(&mut self, row: usize, col: usize, ch: char, pre_cursor: Position) {
        self.record(OpKind::DeleteChar, row, col, OpData::Char(ch), pre_cursor);
    }

    pub fn record_insert_line(&mut self, row: usize, col: usize, content: String, len: usize, pre_cursor: Position) {
        self.record(OpKind::InsertLine, row, col, OpData::Line { content, len }, pre_cursor);
    }

    pub fn record_delete_line(&mut self, row: usize, col: usize, content: String, len: usize, pre_cursor: Position) {
        self.record(OpKind::DeleteLine, row, col, OpData::Line { content, len }, pre_cursor);
    }

    /// Record a span deletion (operator delete/change, §4.4). `row`/`col`
    /// is the position the deleted span started at. Always opens its own
    /// group: an operator application is one undo step no matter how much
    /// text it touched.
    pub fn record_delete_span(&mut self, row: usize, col: usize, content: String, pre_cursor: Position) {
        self.pending_break = true;
        self.record(OpKind::DeleteSpan, row, col, OpData::Span { content }, pre_cursor);
        self.pending_break = true;
    }

    /// Record a register paste (§4.6). Always opens its own group, mirroring
    /// `record_delete_span`.
    pub fn record_insert_span(&mut self, row: usize, col: usize, content: String, pre_cursor: Position) {
        self.pending_break = true;
        self.record(OpKind::InsertSpan, row, col, OpData::Span { content }, pre_cursor);
        self.pending_break = true;
    }

    fn record(&mut self, kind: OpKind, row: usize, col: usize, data: OpData, pre_cursor: Position) {
        let needs_new_group = self.pending_break
            || self.last_kind != Some(kind)
            || self.last_row != Some(row)
            || self
                .last_time
                .map(|t| t.elapsed() > self.idle_threshold)
                .unwrap_or(true)
            || self
                .last_post_cursor
                .map(|c| c != pre_cursor)
                .unwrap_or(false);

        if needs_new_group {
            self.next_group += 1;
        }
        let group_id = self.next_group;

        let post_cursor = post_cursor_for(kind, row, col, &data);
        self.bytes_used += data.byte_size();
        let entry = UndoEntry { kind, row, col, data, pre_cursor, group_id };
        self.entries.push(entry);
        trace!(target: "state.undo", group = group_id, depth = self.entries.len(), "record");

        self.last_kind = Some(kind);
        self.last_row = Some(row);
        self.last_time = Some(Instant::now());
        self.last_post_cursor = Some(post_cursor);
        self.pending_break = false;
        self.redo.clear();
        self.evict_if_over_budget();
    }

    fn evict_if_over_budget(&mut self) {
        while self.entries.len() > self.max_entries || self.bytes_used > self.max_bytes {
            let Some(group_id) = self.entries.first().map(|e| e.group_id) else { break };
            while self.entries.first().map(|e| e.group_id) == Some(group_id) {
                let e = self.entries.remove(0);
                self.bytes_used = self.bytes_used.saturating_sub(e.data.byte_size());
                self.entries_evicted.fetch_add(1, Ordering::Relaxed);
            }
            trace!(target: "state.undo", "undo_group_evicted");
        }
    }

    fn reset_coalescing(&mut self) {
        self.last_kind = None;
        self.last_row = None;
        self.last_time = None;
        self.last_post_cursor = None;
        self.pending_break = false;
    }

    /// Undo the top group. Returns the cursor to restore (the pre-operation
    /// cursor of the earliest entry in the group), or `None` if empty.
    pub fn undo(&mut self, buf: &mut Buffer) -> Option<Position> {
        let group_id = self.entries.last()?.group_id;
        let mut earliest_cursor = None;
        while let Some(top) = self.entries.last() {
            if top.group_id != group_id {
                break;
            }
            let entry = self.entries.pop().unwrap();
            invert(&entry, buf);
            earliest_cursor = Some(entry.pre_cursor);
            self.bytes_used = self.bytes_used.saturating_sub(entry.data.byte_size());
            self.redo.push(entry);
        }
        trace!(target: "state.undo", redo_depth = self.redo.len(), "undo");
        self.reset_coalescing();
        earliest_cursor
    }

    /// Redo the top redo group, replaying operations in chronological
    /// order. Returns the cursor position after the last replayed entry, or
    /// `None` if there was nothing to redo.
    pub fn redo(&mut self, buf: &mut Buffer) -> Option<Position> {
        let group_id = self.redo.last()?.group_id;
        let mut last_cursor = None;
        while let Some(top) = self.redo.last() {
            if top.group_id != group_id {
                break;
            }
            let entry = self.redo.pop().unwrap();
            apply_forward(&entry, buf);
            last_cursor = Some(post_cursor_for(entry.kind, entry.row, entry.col, &entry.data));
            self.bytes_used += entry.data.byte_size();
            self.entries.push(entry);
        }
        trace!(target: "state.undo", undo_depth = self.entries.len(), "redo");
        self.reset_coalescing();
        last_cursor
    }
}

fn post_cursor_for(kind: OpKind, row: usize, col: usize, data: &OpData) -> Position {
    match kind {
        OpKind::InsertChar => {
            let len = match data {
                OpData::Char(c) => c.len_utf8(),
                _ => 0,
            };
            Position::new(row, col + len)
        }
        OpKind::DeleteChar => Position::new(row, col),
        OpKind::InsertLine => Position::new(row + 1, 0),
        OpKind::DeleteLine => Position::new(row.saturating_sub(1), col),
        OpKind::DeleteSpan => Position::new(row, col),
        // Exact end-of-paste cursor requires walking the buffer for
        // embedded newlines; undo/redo only need *a* valid position, so
        // this conservatively leaves the cursor at the paste's start.
        OpKind::InsertSpan => Position::new(row, col),
    }
}

fn do_split(buf: &mut Buffer, row_above: usize, split_at: usize, tail: &str) {
    let start = buf.to_absolute(Position::new(row_above, split_at));
    let end = buf.to_absolute(Position::new(row_above, buf.line_byte_len(row_above)));
    buf.delete_bytes(start, end);
    buf.insert_row(row_above + 1, tail);
}

fn do_merge(buf: &mut Buffer, row_idx: usize) -> String {
    let removed = buf.delete_row(row_idx);
    if row_idx > 0 {
        buf.append_to_row(row_idx - 1, &removed);
    }
    removed
}

fn invert(entry: &UndoEntry, buf: &mut Buffer) {
    match (entry.kind, &entry.data) {
        (OpKind::InsertChar, OpData::Char(_)) => {
            let mut pos = Position::new(entry.row, entry.col);
            buf.delete_grapheme_at(&mut pos);
        }
        (OpKind::DeleteChar, OpData::Char(ch)) => {
            let mut pos = Position::new(entry.row, entry.col);
            let s = ch.to_string();
            buf.insert_str(&mut pos, &s);
        }
        (OpKind::InsertLine, OpData::Line { content, .. }) => {
            do_merge(buf, entry.row + 1);
            let _ = content;
        }
        (OpKind::DeleteLine, OpData::Line { content, .. }) => {
            do_split(buf, entry.row.saturating_sub(1), entry.col, content);
        }
        (OpKind::DeleteSpan, OpData::Span { content }) => {
            let mut pos = Position::new(entry.row, entry.col);
            buf.insert_str(&mut pos, content);
        }
        (OpKind::InsertSpan, OpData::Span { content }) => {
            let start = buf.to_absolute(Position::new(entry.row, entry.col));
            buf.delete_bytes(start, start + content.len());
        }
        _ => {}
    }
}

fn apply_forward(entry: &UndoEntry, buf: &mut Buffer) {
    match (entry.kind, &entry.data) {
        (OpKind::InsertChar, OpData::Char(ch)) => {
            let mut pos = Position::new(entry.row, entry.col);
            let s = ch.to_string();
            buf.insert_str(&mut pos, &s);
        }
        (OpKind::DeleteChar, OpData::Char(_)) => {
            let mut pos = Position::new(entry.row, entry.col);
            buf.delete_grapheme_at(&mut pos);
        }
        (OpKind::InsertLine, OpData::Line { content, .. }) => {
            do_split(buf, entry.row, entry.col, content);
        }
        (OpKind::DeleteLine, OpData::Line { .. }) => {
            do_merge(buf, entry.row);
        }
        (OpKind::DeleteSpan, OpData::Span { content }) => {
            let start = buf.to_absolute(Position::new(entry.row, entry.col));
            buf.delete_bytes(start, start + content.len());
        }
        (OpKind::InsertSpan, OpData::Span { content }) => {
            let mut pos = Position::new(entry.row, entry.col);
            buf.insert_str(&mut pos, content);
        }
        _ => {}
    }
}
