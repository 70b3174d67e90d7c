//! Command-line parsing and the static/dynamic command registry (§4.9).
//!
//! Grounded on `core-actions::dispatcher::command_parser::CommandParser`,
//! generalized from its four hard-coded variants to the full built-in table
//! spec §4.9 names (`w`, `q`, `q!`, `wq`, `e`, `set`, `help`, `<n>`/`goto`)
//! plus a dynamic registry external modules can extend, rejecting name
//! collisions with the built-ins as required.

use std::collections::HashMap;
use std::path::PathBuf;

/// Metadata for one dynamically registered command (§4.9 "A dynamic
/// registry allows external modules to add entries").
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub min_args: usize,
    pub max_args: usize,
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Save(Option<PathBuf>),
    Quit,
    QuitForce,
    SaveAndQuit(Option<PathBuf>),
    Edit(PathBuf),
    Set { opt: String, value: Option<String> },
    Help(Option<String>),
    Goto(usize),
    Dynamic { name: String, args: Vec<String> },
    /// Parsed but rejected: wrong argument count for a known name.
    ArityError { name: String },
    Unknown(String),
}

const BUILTIN_NAMES: &[&str] = &["w", "q", "q!", "wq", "e", "set", "help", "goto"];

#[derive(Debug, Default)]
pub struct CommandRegistry {
    dynamic: HashMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an external command. Rejected if `spec.name` collides with
    /// a built-in or an already-registered dynamic command.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), String> {
        if BUILTIN_NAMES.contains(&spec.name.as_str()) {
            return Err(format!("'{}' is a built-in command", spec.name));
        }
        if self.dynamic.contains_key(&spec.name) {
            return Err(format!("'{}' is already registered", spec.name));
        }
        self.dynamic.insert(spec.name.clone(), spec);
        Ok(())
    }

    pub fn help_text(&self, name: &str) -> Option<String> {
        self.dynamic.get(name).map(|s| s.help.clone())
    }

    /// Parse one command-line body (the text after `:`, sans the colon
    /// itself) against the built-in table first, then the dynamic registry.
    pub fn parse(&self, raw: &str) -> ParsedCommand {
        let body = raw.trim();
        if body.is_empty() {
            return ParsedCommand::Unknown(String::new());
        }
        if let Ok(n) = body.parse::<usize>() {
            return ParsedCommand::Goto(n);
        }
        let (head, tail) = split_head(body);
        let args = split_args(tail);
        match head {
            "w" => arity(args, 0, 1, |a| ParsedCommand::Save(a.first().map(PathBuf::from))),
            "q" => ParsedCommand::Quit,
            "q!" => ParsedCommand::QuitForce,
            "wq" => arity(args, 0, 1, |a| ParsedCommand::SaveAndQuit(a.first().map(PathBuf::from))),
            "e" => arity(args, 1, 1, |a| ParsedCommand::Edit(PathBuf::from(&a[0]))),
            "set" => arity(args, 1, 2, |a| {
                ParsedCommand::Set { opt: a[0].clone(), value: a.get(1).cloned() }
            }),
            "help" => arity(args, 0, 1, |a| ParsedCommand::Help(a.first().cloned())),
            "goto" => arity(args, 1, 1, |a| {
                a[0].parse::<usize>().map(ParsedCommand::Goto).unwrap_or_else(|_| ParsedCommand::Unknown(body.to_string()))
            }),
            _ => {
                if let Some(spec) = self.dynamic.get(head) {
                    if args.len() < spec.min_args || args.len() > spec.max_args {
                        ParsedCommand::ArityError { name: head.to_string() }
                    } else {
                        ParsedCommand::Dynamic { name: head.to_string(), args }
                    }
                } else {
                    ParsedCommand::Unknown(head.to_string())
                }
            }
        }
    }
}

fn arity(args: Vec<String>, min: usize, max: usize, build: impl FnOnce(&[String]) -> ParsedCommand) -> ParsedCommand {
    if args.len() < min || args.len() > max {
        ParsedCommand::ArityError { name: String::new() }
    } else {
        build(&args)
    }
}

fn split_head(body: &str) -> (&str, &str) {
    match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, ""),
    }
}

fn split_args(tail: &str) -> Vec<String> {
    tail.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_is_goto() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.parse("42"), ParsedCommand::Goto(42));
    }

    #[test]
    fn goto_keyword_form() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.parse("goto 7"), ParsedCommand::Goto(7));
    }

    #[test]
    fn write_with_path() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.parse("w out.txt"), ParsedCommand::Save(Some(PathBuf::from("out.txt"))));
    }

    #[test]
    fn quit_force_is_distinct_from_quit() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.parse("q!"), ParsedCommand::QuitForce);
        assert_eq!(reg.parse("q"), ParsedCommand::Quit);
    }

    #[test]
    fn set_requires_at_least_one_arg() {
        let reg = CommandRegistry::new();
        assert!(matches!(reg.parse("set"), ParsedCommand::ArityError { .. }));
        assert_eq!(reg.parse("set wrap on"), ParsedCommand::Set { opt: "wrap".to_string(), value: Some("on".to_string()) });
    }

    #[test]
    fn dynamic_command_registers_and_rejects_builtin_collision() {
        let mut reg = CommandRegistry::new();
        assert!(reg.register(CommandSpec { name: "w".to_string(), min_args: 0, max_args: 0, help: String::new() }).is_err());
        reg.register(CommandSpec { name: "lint".to_string(), min_args: 0, max_args: 0, help: "run linter".to_string() }).unwrap();
        assert_eq!(reg.parse("lint"), ParsedCommand::Dynamic { name: "lint".to_string(), args: vec![] });
    }

    #[test]
    fn unknown_command_is_reported() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.parse("bogus"), ParsedCommand::Unknown("bogus".to_string()));
    }
}
