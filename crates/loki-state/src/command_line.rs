//! Command-line mini-buffer state (§4.4 COMMAND mode) plus a bounded
//! execution history.
//!
//! `buf`/`is_active`/`begin`/`push_char`/`backspace`/`clear` are ported from
//! `core-state/src/lib.rs`'s `CommandLineState`. The teacher's version has no
//! history; spec §4.4 requires a bounded ring with dedup of the immediately
//! previous entry, added here.

const DEFAULT_HISTORY_CAP: usize = 50;

#[derive(Debug, Clone)]
pub struct CommandLineState {
    buf: String,
    history: Vec<String>,
    history_cap: usize,
    /// Index into `history` while browsing with up/down; `None` means the
    /// live buffer (not browsing).
    browse_index: Option<usize>,
}

impl Default for CommandLineState {
    fn default() -> Self {
        Self {
            buf: String::new(),
            history: Vec::new(),
            history_cap: DEFAULT_HISTORY_CAP,
            browse_index: None,
        }
    }
}

impl CommandLineState {
    pub fn is_active(&self) -> bool {
        self.buf.starts_with(':')
    }

    pub fn buffer(&self) -> &str {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.browse_index = None;
    }

    pub fn begin(&mut self) {
        self.buf.clear();
        self.buf.push(':');
        self.browse_index = None;
    }

    pub fn push_char(&mut self, ch: char) {
        if self.buf.is_empty() && ch != ':' {
            self.buf.push(':');
        }
        self.buf.push(ch);
        self.browse_index = None;
    }

    pub fn backspace(&mut self) {
        if self.buf.len() > 1 {
            self.buf.pop();
        } else {
            self.buf.clear();
        }
        self.browse_index = None;
    }

    /// Commit the current buffer (sans leading `:`) to history, deduping
    /// against the immediately previous entry, then clear the line.
    pub fn commit(&mut self) -> String {
        let text = self.buf.trim_start_matches(':').to_string();
        if !text.is_empty() && self.history.last().map(String::as_str) != Some(text.as_str()) {
            self.history.push(text.clone());
            if self.history.len() > self.history_cap {
                self.history.remove(0);
            }
        }
        self.clear();
        text
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Step back one entry (older); loads it into the live buffer with the
    /// `:` sentinel restored. No-op at the oldest entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next_idx = match self.browse_index {
            None => self.history.len() - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.browse_index = Some(next_idx);
        self.buf = format!(":{}", self.history[next_idx]);
    }

    /// Step forward one entry (newer); past the newest entry returns to an
    /// empty live command line.
    pub fn history_next(&mut self) {
        match self.browse_index {
            None => {}
            Some(i) if i + 1 < self.history.len() => {
                self.browse_index = Some(i + 1);
                self.buf = format!(":{}", self.history[i + 1]);
            }
            Some(_) => {
                self.browse_index = None;
                self.buf = String::from(":");
            }
        }
    }
}
