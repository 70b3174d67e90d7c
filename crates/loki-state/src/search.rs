//! Interactive incremental substring search (§4.5).
//!
//! New module — the teacher has no search FSM to port; shaped after its
//! other small interactive state machines (e.g. `CommandLineState`) in
//! control-flow style.

use loki_text::{HighlightClass, Position, RowStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Overlay {
    row: usize,
    start: usize,
    end: usize,
    saved: Vec<HighlightClass>,
}

#[derive(Debug, Clone)]
pub struct SearchState {
    pub query: String,
    pub last_match_row: Option<usize>,
    pub direction: Direction,
    saved_cursor: Position,
    overlay: Option<Overlay>,
}

impl SearchState {
    pub fn begin(cursor: Position) -> Self {
        Self {
            query: String::new(),
            last_match_row: None,
            direction: Direction::Forward,
            saved_cursor: cursor,
            overlay: None,
        }
    }

    /// Shorten the query by one byte-boundary grapheme; invalidates the
    /// last match so the next `update` rescans from scratch.
    pub fn backspace(&mut self, store: &mut RowStore) {
        if !self.query.is_empty() {
            let new_len = loki_text::grapheme::prev_boundary(&self.query, self.query.len());
            self.query.truncate(new_len);
        }
        self.clear_overlay(store);
        self.last_match_row = None;
    }

    /// Extend the query; invalidates the last match so the next `update`
    /// rescans from the document top, same as kilo resetting `last_match`
    /// to -1 on every non-arrow key. Only an explicit direction change
    /// (arrow key) carries `last_match_row` forward.
    pub fn push_str(&mut self, s: &str) {
        self.query.push_str(s);
        self.last_match_row = None;
    }

    pub fn set_direction(&mut self, dir: Direction) {
        self.direction = dir;
    }

    /// ESC: restore the saved cursor and clear any overlay.
    pub fn cancel(mut self, store: &mut RowStore) -> Position {
        self.clear_overlay(store);
        self.saved_cursor
    }

    /// Enter: keep the cursor at the current match (or the saved cursor if
    /// there is none), clearing the overlay.
    pub fn accept(mut self, store: &mut RowStore) -> Position {
        let pos = self.current_match_position().unwrap_or(self.saved_cursor);
        self.clear_overlay(store);
        pos
    }

    fn current_match_position(&self) -> Option<Position> {
        self.overlay.as_ref().map(|o| Position::new(o.row, o.start))
    }

    fn clear_overlay(&mut self, store: &mut RowStore) {
        if let Some(overlay) = self.overlay.take() {
            if let Some(row) = store.row_mut(overlay.row) {
                row.restore_overlay(overlay.start, &overlay.saved);
            }
        }
    }

    /// Rescan after any state change (query edit or direction change).
    /// Returns the matched position, if any.
    pub fn update(&mut self, store: &mut RowStore) -> Option<Position> {
        self.clear_overlay(store);
        if self.query.is_empty() {
            self.last_match_row = None;
            return None;
        }
        let rows = store.len();
        if rows == 0 {
            return None;
        }
        // A fresh query (no prior match) anchors at the document top — kilo's
        // `last_match == -1` sentinel — rather than the saved cursor row, so
        // every query edit re-scans the whole buffer instead of resuming
        // from wherever the previous, shorter query happened to match.
        let start_row: isize = self.last_match_row.map(|r| r as isize).unwrap_or(-1);
        let step = self.direction.step();
        for i in 0..rows {
            let row_idx = wrap(start_row + step * (i as isize + 1), rows);
            let Some(row) = store.row(row_idx) else { continue };
            let hay = String::from_utf8_lossy(&row.render);
            if let Some(byte_off) = hay.find(self.query.as_str()) {
                let end = byte_off + self.query.len();
                self.last_match_row = Some(row_idx);
                let saved = store.row_mut(row_idx).unwrap().apply_match_overlay(byte_off, end);
                self.overlay = Some(Overlay { row: row_idx, start: byte_off, end, saved });
                return Some(Position::new(row_idx, byte_off));
            }
        }
        self.last_match_row = None;
        None
    }
}

fn wrap(idx: isize, modulus: usize) -> usize {
    let m = modulus as isize;
    (((idx % m) + m) % m) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_text::Buffer;

    fn store_for(text: &str) -> RowStore {
        let buf = Buffer::from_str("t", text).unwrap();
        RowStore::from_buffer(&buf)
    }

    #[test]
    fn finds_match_on_same_row_searching_forward() {
        let mut store = store_for("hello world");
        let mut s = SearchState::begin(Position::new(0, 0));
        s.push_str("world");
        let hit = s.update(&mut store);
        assert_eq!(hit, Some(Position::new(0, 6)));
        assert!(store.row(0).unwrap().highlight[6..11].iter().all(|h| *h == HighlightClass::Match));
    }

    #[test]
    fn wraps_around_when_searching_forward_past_last_row() {
        let mut store = store_for("needle here\nnothing\nnothing");
        let mut s = SearchState::begin(Position::new(1, 0));
        s.push_str("needle");
        let hit = s.update(&mut store);
        assert_eq!(hit, Some(Position::new(0, 0)));
    }

    #[test]
    fn backspace_clears_overlay_and_invalidates_last_match() {
        let mut store = store_for("abcabc");
        let mut s = SearchState::begin(Position::new(0, 0));
        s.push_str("abc");
        s.update(&mut store);
        assert!(store.row(0).unwrap().highlight[0..3].iter().all(|h| *h == HighlightClass::Match));
        s.backspace(&mut store);
        assert!(store.row(0).unwrap().highlight[0..3].iter().all(|h| *h != HighlightClass::Match));
        assert_eq!(s.last_match_row, None);
    }

    #[test]
    fn cancel_restores_saved_cursor_and_clears_overlay() {
        let mut store = store_for("target");
        let saved = Position::new(0, 3);
        let mut s = SearchState::begin(saved);
        s.push_str("target");
        s.update(&mut store);
        let pos = s.cancel(&mut store);
        assert_eq!(pos, saved);
        assert!(store.row(0).unwrap().highlight.iter().all(|h| *h != HighlightClass::Match));
    }

    #[test]
    fn typing_a_query_char_by_char_rescans_from_the_top_each_time() {
        // §8 scenario (c): rows "alpha"/"beta"/"alpha", cursor at row 1.
        // Typing "alpha" one character at a time must not drift the match
        // forward through the document; the first explicit Down afterwards
        // lands on row 2, and the next wraps to row 0.
        let mut store = store_for("alpha\nbeta\nalpha");
        let mut s = SearchState::begin(Position::new(1, 0));
        for ch in "alpha".chars() {
            s.push_str(&ch.to_string());
            s.update(&mut store);
        }
        let first_down = s.update(&mut store);
        assert_eq!(first_down, Some(Position::new(2, 0)));
        let second_down = s.update(&mut store);
        assert_eq!(second_down, Some(Position::new(0, 0)));
    }

    #[test]
    fn backward_direction_searches_toward_lower_rows() {
        let mut store = store_for("x\nfoo\nx\nfoo");
        let mut s = SearchState::begin(Position::new(3, 0));
        s.set_direction(Direction::Backward);
        s.push_str("foo");
        let hit = s.update(&mut store);
        assert_eq!(hit, Some(Position::new(1, 0)));
    }
}
