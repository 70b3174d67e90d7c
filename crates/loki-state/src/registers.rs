//! Clipboard registers: unnamed, numbered ring, and named a-z (§4.6).
//!
//! Ported from `core-state/src/lib.rs`'s `Registers`/`OperatorMetrics`/
//! `RegistersFacade`/`PasteSource`/`PasteError`.

#[derive(Debug, Default, Clone)]
pub struct Registers {
    pub unnamed: String,
    numbered: Vec<String>,
    named: [String; 26],
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OperatorMetricsSnapshot {
    pub operator_delete: u64,
    pub operator_yank: u64,
    pub operator_change: u64,
    pub register_writes: u64,
    pub numbered_ring_rotations: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteSource {
    Unnamed,
    Numbered(usize),
    Named(char),
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteError {
    Unimplemented,
    OutOfRange,
    Empty,
}

#[derive(Debug, Default, Clone)]
pub struct OperatorMetrics {
    operator_delete: u64,
    operator_yank: u64,
    operator_change: u64,
    register_writes: u64,
    numbered_ring_rotations: u64,
}

impl OperatorMetrics {
    pub fn snapshot(&self) -> OperatorMetricsSnapshot {
        OperatorMetricsSnapshot {
            operator_delete: self.operator_delete,
            operator_yank: self.operator_yank,
            operator_change: self.operator_change,
            register_writes: self.register_writes,
            numbered_ring_rotations: self.numbered_ring_rotations,
        }
    }
    pub fn incr_delete(&mut self) {
        self.operator_delete += 1;
    }
    pub fn incr_yank(&mut self) {
        self.operator_yank += 1;
    }
    pub fn incr_change(&mut self) {
        self.operator_change += 1;
    }
    pub fn note_register_write(&mut self, rotated: bool) {
        self.register_writes += 1;
        if rotated {
            self.numbered_ring_rotations += 1;
        }
    }
}

/// Concentrates register mutation + metrics bookkeeping so callers never
/// reach into `Registers` directly.
pub struct RegistersFacade<'state> {
    registers: &'state mut Registers,
    metrics: &'state mut OperatorMetrics,
}

impl<'state> RegistersFacade<'state> {
    pub fn new(registers: &'state mut Registers, metrics: &'state mut OperatorMetrics) -> Self {
        Self { registers, metrics }
    }

    pub fn write_delete<S: Into<String>>(&mut self, payload: S, target: Option<char>) {
        self.metrics.incr_delete();
        let text = payload.into();
        if let Some(named) = target.filter(|c| c.is_ascii_alphabetic()) {
            self.registers.record_delete_named(named, text, self.metrics);
        } else {
            self.registers.record_delete(text, self.metrics);
        }
    }

    pub fn write_yank<S: Into<String>>(&mut self, payload: S, target: Option<char>) {
        self.metrics.incr_yank();
        let text = payload.into();
        if let Some(named) = target.filter(|c| c.is_ascii_alphabetic()) {
            self.registers.record_yank_named(named, text, self.metrics);
        } else {
            self.registers.record_yank(text, self.metrics);
        }
    }

    pub fn write_change<S: Into<String>>(&mut self, payload: S, target: Option<char>) {
        self.metrics.incr_change();
        let text = payload.into();
        if let Some(named) = target.filter(|c| c.is_ascii_alphabetic()) {
            self.registers.record_delete_named(named, text, self.metrics);
        } else {
            self.registers.record_delete(text, self.metrics);
        }
    }

    pub fn read_paste(&self, source: PasteSource) -> Result<String, PasteError> {
        let registers: &Registers = self.registers;
        match source {
            PasteSource::Unnamed => {
                if registers.unnamed.is_empty() {
                    Err(PasteError::Empty)
                } else {
                    Ok(registers.unnamed.clone())
                }
            }
            PasteSource::Numbered(idx) => {
                if idx >= registers.numbered.len() {
                    return Err(PasteError::OutOfRange);
                }
                let entry = &registers.numbered[idx];
                if entry.is_empty() {
                    Err(PasteError::Empty)
                } else {
                    Ok(entry.clone())
                }
            }
            PasteSource::Named(c) => {
                let slot = c.to_ascii_lowercase();
                if !slot.is_ascii_lowercase() {
                    return Err(PasteError::OutOfRange);
                }
                let idx = (slot as u8 - b'a') as usize;
                let entry = &registers.named[idx];
                if entry.is_empty() {
                    Err(PasteError::Empty)
                } else {
                    Ok(entry.clone())
                }
            }
            PasteSource::System => Err(PasteError::Unimplemented),
        }
    }
}

impl Registers {
    pub const MAX: usize = 10;

    pub fn new() -> Self {
        Self {
            unnamed: String::new(),
            numbered: Vec::new(),
            named: std::array::from_fn(|_| String::new()),
        }
    }

    pub fn record_yank<S: Into<String>>(&mut self, text: S, metrics: &mut OperatorMetrics) {
        let s = text.into();
        self.unnamed = s.clone();
        let rotated = self.unshift_numbered(s);
        metrics.note_register_write(rotated);
    }

    pub fn record_delete<S: Into<String>>(&mut self, text: S, metrics: &mut OperatorMetrics) {
        let s = text.into();
        self.unnamed = s.clone();
        let rotated = self.unshift_numbered(s);
        metrics.note_register_write(rotated);
    }

    pub fn numbered(&self) -> &[String] {
        &self.numbered
    }

    fn unshift_numbered(&mut self, s: String) -> bool {
        let rotated = self.numbered.len() == Self::MAX;
        if rotated {
            self.numbered.pop();
        }
        self.numbered.insert(0, s);
        rotated
    }

    fn named_index(c: char) -> Option<usize> {
        if c.is_ascii_alphabetic() {
            Some((c.to_ascii_lowercase() as u8 - b'a') as usize)
        } else {
            None
        }
    }

    pub fn get_named(&self, c: char) -> Option<&str> {
        Self::named_index(c).map(|i| self.named[i].as_str())
    }

    pub fn named_snapshot(&self) -> Vec<(char, &str)> {
        self.named
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                if s.is_empty() {
                    None
                } else {
                    Some(((b'a' + i as u8) as char, s.as_str()))
                }
            })
            .collect()
    }

    pub fn record_yank_named<S: Into<String>>(&mut self, c: char, text: S, metrics: &mut OperatorMetrics) {
        if let Some(idx) = Self::named_index(c) {
            let mut payload = text.into();
            let append = c.is_ascii_uppercase();
            if append && !self.named[idx].is_empty() {
                self.named[idx].push_str(&payload);
                payload = self.named[idx].clone();
            } else {
                self.named[idx] = payload.clone();
            }
            self.unnamed = payload.clone();
            let rotated = self.unshift_numbered(payload);
            metrics.note_register_write(rotated);
        }
    }

    pub fn record_delete_named<S: Into<String>>(&mut self, c: char, text: S, metrics: &mut OperatorMetrics) {
        self.record_yank_named(c, text, metrics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_and_ring_updated_on_yank() {
        let mut regs = Registers::new();
        let mut metrics = OperatorMetrics::default();
        regs.record_yank("hello", &mut metrics);
        assert_eq!(regs.unnamed, "hello");
        assert_eq!(regs.numbered(), &["hello"]);
        assert_eq!(metrics.snapshot().operator_yank, 0); // facade increments, not raw call
    }

    #[test]
    fn ring_evicts_oldest_past_capacity() {
        let mut regs = Registers::new();
        let mut metrics = OperatorMetrics::default();
        for i in 0..(Registers::MAX + 3) {
            regs.record_delete(format!("d{i}"), &mut metrics);
        }
        assert_eq!(regs.numbered().len(), Registers::MAX);
        assert_eq!(regs.numbered()[0], format!("d{}", Registers::MAX + 2));
        assert_eq!(metrics.numbered_ring_rotations, 3);
    }

    #[test]
    fn uppercase_named_register_appends() {
        let mut regs = Registers::new();
        let mut metrics = OperatorMetrics::default();
        regs.record_yank_named('a', "foo", &mut metrics);
        regs.record_yank_named('A', "bar", &mut metrics);
        assert_eq!(regs.get_named('a'), Some("foobar"));
    }

    #[test]
    fn facade_routes_named_target_and_tracks_metrics() {
        let mut regs = Registers::new();
        let mut metrics = OperatorMetrics::default();
        let mut facade = RegistersFacade::new(&mut regs, &mut metrics);
        facade.write_yank("xyz", Some('q'));
        assert_eq!(facade.read_paste(PasteSource::Named('q')), Ok("xyz".to_string()));
        assert_eq!(metrics.snapshot().operator_yank, 1);
    }

    #[test]
    fn paste_from_empty_unnamed_errors() {
        let mut regs = Registers::new();
        let mut metrics = OperatorMetrics::default();
        let facade = RegistersFacade::new(&mut regs, &mut metrics);
        assert_eq!(facade.read_paste(PasteSource::Unnamed), Err(PasteError::Empty));
    }
}
