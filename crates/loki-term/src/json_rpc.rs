//! Line-delimited JSON-RPC harness (§6): one JSON object per line on stdin,
//! one JSON object per line of response on stdout. Exists so a test runner
//! can drive the engine deterministically without a real terminal attached,
//! the same role `--json-rpc`-style flags serve in the teacher's own binary
//! for scripted exercising, generalized here into the editor's only
//! headless transport.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use loki_events::{Event, KeyCode, KeyEvent, Modifiers};
use loki_session::{LokiError, Session};
use loki_state::Mode;

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Request {
    Load { path: String },
    Save,
    Event {
        #[serde(flatten)]
        event: EventRequest,
    },
    Resize { rows: u16, cols: u16 },
    Insert { text: String },
    Snapshot,
    Status,
    Quit,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EventRequest {
    Key {
        code: String,
        #[serde(default)]
        mods: Vec<String>,
    },
    Resize { rows: u16, cols: u16 },
    Quit,
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "normal",
        Mode::Insert => "insert",
        Mode::VisualChar => "visual_char",
        Mode::VisualLine => "visual_line",
        Mode::Command => "command",
    }
}

fn parse_mods(raw: &[String]) -> Modifiers {
    let mut mods = Modifiers::empty();
    for m in raw {
        match m.as_str() {
            "ctrl" => mods |= Modifiers::CTRL,
            "shift" => mods |= Modifiers::SHIFT,
            "alt" => mods |= Modifiers::ALT,
            _ => {}
        }
    }
    mods
}

fn parse_key_code(code: &str) -> Result<KeyCode, LokiError> {
    let mut chars = code.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    let lower = code.to_ascii_lowercase();
    if let Some(digits) = lower.strip_prefix('f') {
        if let Ok(n) = digits.parse::<u8>() {
            return Ok(KeyCode::F(n));
        }
    }
    Ok(match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ => return Err(LokiError::Protocol(format!("unknown key code: {code}"))),
    })
}

fn event_request_into_event(req: EventRequest) -> Result<Event, LokiError> {
    Ok(match req {
        EventRequest::Key { code, mods } => Event::Key(KeyEvent::new(parse_key_code(&code)?, parse_mods(&mods))),
        EventRequest::Resize { rows, cols } => Event::Resize { rows, cols },
        EventRequest::Quit => Event::Quit,
    })
}

/// Drive `session` from `stdin`, writing one JSON response per request line
/// to `stdout`. `single` stops after the first request instead of looping
/// until EOF or an explicit `quit`.
pub fn run(mut session: Session, single: bool) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = handle_line(&mut session, trimmed);
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;

        let stop = single || session.should_quit() || trimmed_is_quit(trimmed);
        if stop {
            break;
        }
    }
    Ok(())
}

fn trimmed_is_quit(line: &str) -> bool {
    matches!(serde_json::from_str::<Request>(line), Ok(Request::Quit))
}

fn handle_line(session: &mut Session, line: &str) -> Value {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => match dispatch(session, request) {
            Ok(value) => value,
            Err(e) => error_response(&e),
        },
        Err(e) => json!({ "ok": false, "kind": "protocol", "error": format!("malformed request: {e}") }),
    }
}

fn error_response(e: &LokiError) -> Value {
    json!({ "ok": false, "kind": e.kind(), "error": e.to_string() })
}

fn dispatch(session: &mut Session, request: Request) -> Result<Value, LokiError> {
    match request {
        Request::Load { path } => {
            session.open(&PathBuf::from(path))?;
            Ok(json!({ "ok": true }))
        }
        Request::Save => {
            session.save()?;
            Ok(json!({ "ok": true }))
        }
        Request::Event { event } => {
            let event = event_request_into_event(event)?;
            let outcome = session.handle_event(event);
            Ok(json!({ "ok": outcome.ok, "quit": outcome.quit, "error": outcome.error }))
        }
        Request::Resize { rows, cols } => {
            session.resize(rows as usize, cols as usize);
            Ok(json!({ "ok": true }))
        }
        Request::Insert { text } => {
            for c in text.chars() {
                let outcome = session.handle_event(Event::Key(KeyEvent::plain(KeyCode::Char(c))));
                if !outcome.ok {
                    return Ok(json!({ "ok": false, "error": outcome.error }));
                }
            }
            Ok(json!({ "ok": true }))
        }
        Request::Snapshot => {
            let snapshot = session.snapshot();
            Ok(json!({ "ok": true, "viewmodel": snapshot }))
        }
        Request::Status => Ok(json!({
            "ok": true,
            "mode": mode_name(session.current_mode()),
            "filename": session.filename().map(|p| p.display().to_string()),
            "dirty": session.is_dirty(),
        })),
        Request::Quit => {
            let outcome = session.handle_event(Event::Quit);
            Ok(json!({ "ok": outcome.ok, "quit": true, "error": outcome.error }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loki_config::Config;

    fn session() -> Session {
        Session::new(Config::default(), None, 24, 80).unwrap()
    }

    #[test]
    fn status_reports_normal_mode_and_no_filename() {
        let mut s = session();
        let resp = handle_line(&mut s, r#"{"cmd":"status"}"#);
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["mode"], "normal");
        assert_eq!(resp["filename"], Value::Null);
    }

    #[test]
    fn insert_types_text_and_dirties_the_buffer() {
        let mut s = session();
        handle_line(&mut s, r#"{"cmd":"event","type":"key","code":"i"}"#);
        handle_line(&mut s, r#"{"cmd":"insert","text":"hi"}"#);
        let resp = handle_line(&mut s, r#"{"cmd":"status"}"#);
        assert_eq!(resp["dirty"], true);
    }

    #[test]
    fn snapshot_embeds_a_viewmodel_object() {
        let mut s = session();
        let resp = handle_line(&mut s, r#"{"cmd":"snapshot"}"#);
        assert_eq!(resp["ok"], true);
        assert!(resp["viewmodel"]["screen_rows"].is_number());
    }

    #[test]
    fn quit_event_reports_quit_true() {
        let mut s = session();
        let resp = handle_line(&mut s, r#"{"cmd":"event","type":"key","code":"ctrl_q_is_not_a_single_char_so_this_is_unknown"}"#);
        assert_eq!(resp["ok"], false);
        let resp = handle_line(&mut s, r#"{"cmd":"quit"}"#);
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["quit"], true);
    }

    #[test]
    fn malformed_json_reports_a_protocol_error() {
        let mut s = session();
        let resp = handle_line(&mut s, "not json");
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["kind"], "protocol");
    }

    #[test]
    fn load_missing_file_reports_not_found() {
        let mut s = session();
        let resp = handle_line(&mut s, r#"{"cmd":"load","path":"/no/such/file.txt"}"#);
        assert_eq!(resp["ok"], false);
        assert_eq!(resp["kind"], "not-found");
    }
}
