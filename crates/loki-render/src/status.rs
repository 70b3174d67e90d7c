//! Status line composition (§4.12 "status info").
//!
//! Ported from `core-render/src/status.rs`'s segment/compose/format split —
//! kept as two stages (`compose_status` building an ordered `Vec<StatusSegment>`,
//! `format_status` rendering it to a string) so a future renderer can color
//! per segment instead of the whole line. Generalized from the teacher's
//! three-mode match arm to this engine's five `Mode` variants, and the
//! selection placeholder is populated for real since this engine actually
//! has a VISUAL mode worth reporting.

use loki_state::{Mode, SelectionKind};

pub struct StatusContext<'a> {
    pub mode: Mode,
    pub line: usize,
    pub col: usize,
    pub command_active: bool,
    pub command_buffer: &'a str,
    pub file_name: Option<&'a std::path::Path>,
    pub dirty: bool,
    pub selection: Option<SelectionKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'static str),
    FileNameCow(std::borrow::Cow<'a, str>),
    Position { line_1: usize, col_1: usize },
    Selection(&'static str),
    CommandInactive,
    CommandActive(&'a str),
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "NORMAL",
        Mode::Insert => "INSERT",
        Mode::VisualChar => "VISUAL",
        Mode::VisualLine => "V-LINE",
        Mode::Command => "COMMAND",
    }
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let file_segment: std::borrow::Cow<'_, str> = if let Some(p) = ctx.file_name {
        if let Some(name) = p.file_name().and_then(|s| s.to_str()) {
            if ctx.dirty { format!(" {}*", name).into() } else { format!(" {}", name).into() }
        } else if ctx.dirty {
            " *".into()
        } else {
            "".into()
        }
    } else if ctx.dirty {
        " [No Name]*".into()
    } else {
        " [No Name]".into()
    };

    let mut out = Vec::with_capacity(6);
    out.push(StatusSegment::Mode(mode_label(ctx.mode)));
    out.push(StatusSegment::FileNameCow(file_segment));
    if let Some(kind) = ctx.selection {
        out.push(StatusSegment::Selection(match kind {
            SelectionKind::Characterwise => " [VISUAL]",
            SelectionKind::Linewise => " [V-LINE]",
        }));
    }
    out.push(StatusSegment::Position { line_1: ctx.line + 1, col_1: ctx.col + 1 });
    if ctx.command_active {
        let display = ctx.command_buffer.strip_prefix(':').unwrap_or(ctx.command_buffer);
        out.push(StatusSegment::CommandActive(display));
    } else {
        out.push(StatusSegment::CommandInactive);
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::Mode(m) => {
                s.push('[');
                s.push_str(m);
                s.push(']');
            }
            StatusSegment::FileNameCow(name) => s.push_str(name),
            StatusSegment::Selection(tag) => s.push_str(tag),
            StatusSegment::Position { line_1, col_1 } => {
                let _ = write!(s, " Ln {}, Col {} :", line_1, col_1);
            }
            StatusSegment::CommandInactive => {}
            StatusSegment::CommandActive(cmd) => s.push_str(cmd),
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext) -> String {
    format_status(&compose_status(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(mode: Mode, dirty: bool, file: Option<&std::path::Path>) -> StatusContext<'static> {
        StatusContext { mode, line: 0, col: 0, command_active: false, command_buffer: "", file_name: file, dirty, selection: None }
    }

    #[test]
    fn no_name_clean_normal() {
        let c = ctx(Mode::Normal, false, None);
        assert_eq!(build_status(&c), "[NORMAL] [No Name] Ln 1, Col 1 :");
    }

    #[test]
    fn named_dirty_insert() {
        let p = std::path::Path::new("main.rs");
        let c = StatusContext { mode: Mode::Insert, line: 4, col: 9, command_active: false, command_buffer: "", file_name: Some(p), dirty: true, selection: None };
        assert_eq!(build_status(&c), "[INSERT] main.rs* Ln 5, Col 10 :");
    }

    #[test]
    fn visual_line_mode_reports_selection_tag() {
        let c = StatusContext { mode: Mode::VisualLine, line: 0, col: 0, command_active: false, command_buffer: "", file_name: None, dirty: false, selection: Some(SelectionKind::Linewise) };
        assert_eq!(build_status(&c), "[V-LINE] [No Name] [V-LINE] Ln 1, Col 1 :");
    }

    #[test]
    fn command_active_strips_sentinel_colon() {
        let c = StatusContext { mode: Mode::Command, line: 0, col: 0, command_active: true, command_buffer: ":wq", file_name: None, dirty: false, selection: None };
        assert_eq!(build_status(&c), "[COMMAND] [No Name] Ln 1, Col 1 :wq");
    }
}
