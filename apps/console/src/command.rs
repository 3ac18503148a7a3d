//! Typed console input mapped onto table controls.

use client_core::{view::UnknownAction, ActionKind, Click, Field};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Click(Click),
    Set {
        row: usize,
        field: Field,
        value: String,
    },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),
    #[error("'{0}' needs a row number")]
    MissingRow(String),
    #[error("'{0}' is not a row number")]
    BadRow(String),
    #[error("usage: set ROW name|start|end VALUE")]
    BadSet,
}

pub const HELP: &str = "\
commands:
  new                         append a blank row
  edit N | drop N             act on a displayed row
  add N | save N | cancel N   act on an edit row
  set N name|start|end VALUE  fill an input of an edit row
  help | quit";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Empty);
    };

    match head.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "set" => return parse_set(line),
        _ => {}
    }

    let kind: ActionKind = head.parse()?;
    if kind == ActionKind::New {
        return Ok(Command::Click(Click::new_row()));
    }
    let row = words
        .next()
        .ok_or_else(|| CommandError::MissingRow(head.to_string()))?;
    let row = parse_row(row)?;
    Ok(Command::Click(Click::on_row(kind, row)))
}

/// The value is everything after the field name, so names may contain spaces.
fn parse_set(line: &str) -> Result<Command, CommandError> {
    let rest = line.trim_start();
    let rest = rest.get(3..).unwrap_or_default().trim_start();
    let (row, rest) = rest.split_once(char::is_whitespace).ok_or(CommandError::BadSet)?;
    let row = parse_row(row)?;
    let rest = rest.trim_start();
    let (field, value) = match rest.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (rest, ""),
    };
    let field: Field = field.parse().map_err(|_| CommandError::BadSet)?;
    Ok(Command::Set {
        row,
        field,
        value: value.to_string(),
    })
}

fn parse_row(raw: &str) -> Result<usize, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::BadRow(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_row_actions_by_tag() {
        assert_eq!(parse("new"), Ok(Command::Click(Click::new_row())));
        assert_eq!(
            parse("edit 2"),
            Ok(Command::Click(Click::on_row(ActionKind::Edit, 2)))
        );
        assert_eq!(
            parse("  SAVE 0 "),
            Ok(Command::Click(Click::on_row(ActionKind::Update, 0)))
        );
        assert_eq!(
            parse("update 1"),
            Ok(Command::Click(Click::on_row(ActionKind::Update, 1)))
        );
    }

    #[test]
    fn row_actions_need_a_number() {
        assert_eq!(parse("drop"), Err(CommandError::MissingRow("drop".into())));
        assert_eq!(parse("drop x"), Err(CommandError::BadRow("x".into())));
        assert!(matches!(parse("launch 1"), Err(CommandError::UnknownAction(_))));
        assert_eq!(parse("   "), Err(CommandError::Empty));
    }

    #[test]
    fn set_keeps_spaces_in_the_value() {
        assert_eq!(
            parse("set 3 name Rust Conf 2024"),
            Ok(Command::Set {
                row: 3,
                field: Field::EventName,
                value: "Rust Conf 2024".into(),
            })
        );
        assert_eq!(
            parse("set 0 end"),
            Ok(Command::Set {
                row: 0,
                field: Field::EndDate,
                value: String::new(),
            })
        );
        assert_eq!(parse("set 0 colour red"), Err(CommandError::BadSet));
        assert_eq!(parse("set"), Err(CommandError::BadSet));
    }
}
