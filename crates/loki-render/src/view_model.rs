//! View model (§4.12): the owned, pointer-free snapshot a renderer consumes
//! for one frame. Every string here is owned — "free is transitive" — since
//! the originating `EditorContext`/`BufferManager` may mutate or drop slots
//! before the renderer gets around to drawing.

use crate::segment::Segment;

/// One visible screen row. `row_num` is `None` for a row past end-of-file
/// (rendered as a lone `~`, kilo-style).
#[derive(Debug, Clone, serde::Serialize)]
pub struct RowView {
    pub row_num: Option<usize>,
    pub segments: Vec<Segment>,
}

/// One entry in the buffer tab bar (§4.8 display metadata).
#[derive(Debug, Clone, serde::Serialize)]
pub struct TabInfo {
    pub label: String,
    pub modified: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CursorInfo {
    pub screen_row: usize,
    pub screen_col: usize,
    pub file_row: usize,
    pub file_col: usize,
    pub visible: bool,
}

/// Scripting REPL pane snapshot, mirroring `loki_model::ReplPaneState` but
/// with the log already trimmed to its display cap and owned as a plain
/// `Vec` rather than a live `VecDeque`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReplSnapshot {
    pub active: bool,
    pub prompt: String,
    pub input: String,
    pub log: Vec<String>,
    pub log_cap: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ViewModel {
    pub screen_rows: usize,
    pub screen_cols: usize,
    pub gutter_width: usize,
    pub rows: Vec<RowView>,
    pub tabs: Vec<TabInfo>,
    pub status: String,
    pub message: Option<String>,
    pub repl: ReplSnapshot,
    pub cursor: CursorInfo,
}
