//! Auto-indent and electric-dedent (§4.7).
//!
//! New module — the teacher's editor has no indent engine to port; grammar
//! opener/closer sets reuse `loki_syntax::Grammar`.

use loki_syntax::Grammar;

#[derive(Debug, Clone, Copy)]
pub struct IndentConfig {
    /// Width of one indent level, in spaces. Default two, per spec §4.7.
    pub unit: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self { unit: 2 }
    }
}

fn leading_whitespace(line: &str) -> &str {
    let end = line.find(|c: char| c != ' ' && c != '\t').unwrap_or(line.len());
    &line[..end]
}

fn ends_with_opener(line: &str, grammar: &Grammar) -> bool {
    match line.trim_end().chars().last() {
        Some(c) => grammar.openers.contains(c),
        None => false,
    }
}

/// Compute the leading whitespace to seed a freshly inserted row with, given
/// the (now previous) row's full text.
pub fn seed_for_new_row(prev_row_text: &str, grammar: &Grammar, config: &IndentConfig) -> String {
    let mut ws = leading_whitespace(prev_row_text).to_string();
    if ends_with_opener(prev_row_text, grammar) {
        ws.push_str(&" ".repeat(config.unit));
    }
    ws
}

/// Electric dedent: called when `inserted` is the character just typed at
/// `col` in `row_text`, where everything before `col` is whitespace. Returns
/// the new leading-whitespace string if a level should be removed, else
/// `None`.
pub fn electric_dedent(row_text: &str, col: usize, inserted: char, grammar: &Grammar, config: &IndentConfig) -> Option<String> {
    let prefix = row_text.get(..col)?;
    if !prefix.chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }
    let is_closer = grammar.closers.contains(inserted);
    if !is_closer {
        return None;
    }
    let current_len = prefix.chars().count();
    if current_len < config.unit {
        return None;
    }
    Some(" ".repeat(current_len - config.unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_syntax::grammar;

    #[test]
    fn new_row_inherits_previous_indent_verbatim() {
        let cfg = IndentConfig::default();
        let seeded = seed_for_new_row("    let x = 1;", &grammar::PLAIN, &cfg);
        assert_eq!(seeded, "    ");
    }

    #[test]
    fn new_row_gains_a_level_after_an_opener() {
        let cfg = IndentConfig::default();
        let seeded = seed_for_new_row("fn main() {", &grammar::RUST, &cfg);
        assert_eq!(seeded, "  ");
    }

    #[test]
    fn opener_indent_stacks_on_existing_indentation() {
        let cfg = IndentConfig::default();
        let seeded = seed_for_new_row("  if x {", &grammar::RUST, &cfg);
        assert_eq!(seeded, "    ");
    }

    #[test]
    fn electric_dedent_removes_one_level_on_closer_in_whitespace_only_prefix() {
        let cfg = IndentConfig::default();
        let result = electric_dedent("    }", 4, '}', &grammar::RUST, &cfg);
        assert_eq!(result, Some("  ".to_string()));
    }

    #[test]
    fn electric_dedent_ignores_closer_after_non_whitespace_content() {
        let cfg = IndentConfig::default();
        let result = electric_dedent("  let x = {}", 12, '}', &grammar::RUST, &cfg);
        assert_eq!(result, None);
    }

    #[test]
    fn electric_dedent_noop_below_one_indent_unit() {
        let cfg = IndentConfig::default();
        let result = electric_dedent(" }", 1, '}', &grammar::RUST, &cfg);
        assert_eq!(result, None);
    }
}
