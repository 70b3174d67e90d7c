//! View state: everything about how one buffer is currently being looked at
//! and edited, as opposed to the document content itself (§3 View state).

use loki_state::{CommandLineState, EphemeralMessage, Mode, SearchState, SelectionModel};
use loki_text::render::HighlightClass;
use loki_text::Position;

/// Per-class terminal color (ANSI 256-color index), one slot per
/// `HighlightClass` member, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub normal: u8,
    pub non_print: u8,
    pub comment: u8,
    pub ml_comment: u8,
    pub keyword1: u8,
    pub keyword2: u8,
    pub string: u8,
    pub number: u8,
    pub r#match: u8,
}

impl Default for Palette {
    fn default() -> Self {
        // Classic kilo-style assignment: cyan comments, yellow/green keywords,
        // magenta strings, red numbers, blue-ish match highlight.
        Self {
            normal: 37,
            non_print: 30,
            comment: 36,
            ml_comment: 36,
            keyword1: 33,
            keyword2: 32,
            string: 35,
            number: 31,
            r#match: 34,
        }
    }
}

impl Palette {
    pub fn color_for(&self, class: HighlightClass) -> u8 {
        match class {
            HighlightClass::Normal => self.normal,
            HighlightClass::NonPrint => self.non_print,
            HighlightClass::Comment => self.comment,
            HighlightClass::MlComment => self.ml_comment,
            HighlightClass::Keyword1 => self.keyword1,
            HighlightClass::Keyword2 => self.keyword2,
            HighlightClass::String => self.string,
            HighlightClass::Number => self.number,
            HighlightClass::Match => self.r#match,
        }
    }
}

/// Display toggles, set via `:set` (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFlags {
    pub line_numbers: bool,
    pub word_wrap: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self { line_numbers: true, word_wrap: false }
    }
}

/// The keycode CTRL-X leaves pending, waiting for the key that selects a
/// buffer-manager operation (§4.10 global bindings).
pub type PendingPrefix = char;

/// Scripting REPL pane display state (§4.12 view model). The scripting host
/// itself is out of scope (`ScriptingHandle` in `context.rs` is an opaque
/// `Any` slot); this struct only carries what the pane needs to render
/// toggle state, a prompt, and a scrollback, whatever sits behind the
/// handle.
#[derive(Debug, Clone)]
pub struct ReplPaneState {
    pub active: bool,
    pub prompt: String,
    pub input: String,
    pub log: std::collections::VecDeque<String>,
    pub log_cap: usize,
}

impl ReplPaneState {
    pub fn new(log_cap: usize) -> Self {
        Self { active: false, prompt: "> ".to_string(), input: String::new(), log: std::collections::VecDeque::new(), log_cap }
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push_back(line.into());
        while self.log.len() > self.log_cap {
            self.log.pop_front();
        }
    }
}

impl Default for ReplPaneState {
    fn default() -> Self {
        Self::new(200)
    }
}

/// Everything needed to render and navigate one buffer, independent of its
/// content (§3 View state).
pub struct ViewState {
    /// Cursor position in document coordinates (§4.4 motions operate on
    /// this). The renderer projects this plus the scroll offsets into
    /// screen coordinates fresh per frame (§4.12 `CursorInfo`); `ViewState`
    /// itself carries no screen-space cursor copy to keep stale.
    pub cursor: Position,
    /// Scroll origin: first document row/column visible on screen.
    pub row_offset: usize,
    pub col_offset: usize,
    /// Full screen dimensions and the usable text area height (screen rows
    /// minus tab/status/message lines).
    pub screen_rows: usize,
    pub screen_cols: usize,
    pub text_height: usize,

    pub selection: SelectionModel,
    pub mode: Mode,
    pub command_line: CommandLineState,
    /// Live incremental search prompt (§4.5), `None` outside of search.
    pub search: Option<SearchState>,
    pub pending_prefix: Option<PendingPrefix>,
    pub message: Option<EphemeralMessage>,
    pub flags: DisplayFlags,
    pub palette: Palette,
    pub repl: ReplPaneState,
    /// Consecutive `CTRL-Q` presses seen while the current buffer is dirty
    /// (§4.10 "three-press confirmation"). Reset by any other action.
    pub quit_confirm_presses: u8,
}

impl ViewState {
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        let text_height = screen_rows.saturating_sub(2);
        Self {
            cursor: Position::origin(),
            row_offset: 0,
            col_offset: 0,
            screen_rows,
            screen_cols,
            text_height,
            selection: SelectionModel::default(),
            mode: Mode::default(),
            command_line: CommandLineState::default(),
            search: None,
            pending_prefix: None,
            message: None,
            flags: DisplayFlags::default(),
            palette: Palette::default(),
            repl: ReplPaneState::default(),
            quit_confirm_presses: 0,
        }
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.screen_rows = rows;
        self.screen_cols = cols;
        self.text_height = rows.saturating_sub(2);
    }

    /// Adjust `row_offset` so the cursor's file row stays within a margin
    /// band of the usable text height, mirroring the teacher's auto-scroll
    /// intent (see `core-model::compute_scroll_intent`), generalized to
    /// return the new offset directly rather than mutating state in place.
    pub fn auto_scroll(&mut self, cursor_line: usize, margin: usize) {
        if let Some(new_first) = compute_scroll_intent(self.row_offset, cursor_line, self.text_height, margin) {
            self.row_offset = new_first;
        }
    }

    /// Horizontal counterpart to [`ViewState::auto_scroll`]: keeps the
    /// cursor's *visual* column (tabs expanded) within `margin` columns of
    /// either edge of the screen width, per §3's "column offset into the
    /// document".
    pub fn auto_scroll_col(&mut self, cursor_col: usize, text_width: usize, margin: usize) {
        if let Some(new_first) = compute_scroll_intent(self.col_offset, cursor_col, text_width, margin) {
            self.col_offset = new_first;
        }
    }
}

/// Compute a new viewport first-line keeping `cursor_line` within `margin`
/// rows of the top/bottom of a `text_height`-row window, clamping `margin`
/// to half the window when the window is small. Ported from
/// `core-model::compute_scroll_intent`.
pub fn compute_scroll_intent(first: usize, cursor_line: usize, text_height: usize, margin: usize) -> Option<usize> {
    if text_height == 0 {
        return None;
    }
    let margin = margin.min(text_height / 2);
    let last = first + text_height.saturating_sub(1);

    if cursor_line < first + margin {
        let new_first = cursor_line.saturating_sub(margin);
        if new_first != first {
            return Some(new_first);
        }
        return None;
    }
    if cursor_line > last.saturating_sub(margin) {
        let new_first = cursor_line + margin + 1 - text_height;
        if new_first != first {
            return Some(new_first);
        }
        return None;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_view_has_zero_origin_and_derived_text_height() {
        let v = ViewState::new(24, 80);
        assert_eq!(v.row_offset, 0);
        assert_eq!(v.text_height, 22);
    }

    #[test]
    fn resize_recomputes_text_height() {
        let mut v = ViewState::new(24, 80);
        v.resize(10, 40);
        assert_eq!(v.text_height, 8);
    }

    #[test]
    fn auto_scroll_scrolls_down_when_cursor_passes_bottom_margin() {
        let mut v = ViewState::new(12, 80); // text_height = 10
        v.auto_scroll(15, 2);
        assert!(v.row_offset > 0);
    }

    #[test]
    fn auto_scroll_scrolls_up_when_cursor_above_top_margin() {
        let mut v = ViewState::new(12, 80);
        v.row_offset = 20;
        v.auto_scroll(19, 2);
        assert_eq!(v.row_offset, 17);
    }

    #[test]
    fn auto_scroll_no_op_when_cursor_within_band() {
        let mut v = ViewState::new(12, 80);
        v.row_offset = 5;
        v.auto_scroll(10, 2);
        assert_eq!(v.row_offset, 5);
    }

    #[test]
    fn auto_scroll_col_scrolls_right_when_cursor_passes_right_margin() {
        let mut v = ViewState::new(24, 20); // text_width taken as 20 below
        v.auto_scroll_col(25, 20, 2);
        assert!(v.col_offset > 0);
    }

    #[test]
    fn auto_scroll_col_no_op_when_cursor_within_band() {
        let mut v = ViewState::new(24, 20);
        v.col_offset = 5;
        v.auto_scroll_col(10, 20, 2);
        assert_eq!(v.col_offset, 5);
    }

    #[test]
    fn palette_default_assigns_distinct_colors_for_comment_and_string() {
        let p = Palette::default();
        assert_ne!(p.color_for(HighlightClass::Comment), p.color_for(HighlightClass::String));
    }
}
