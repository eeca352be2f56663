//! Line-oriented action parsing.
//!
//! One action per line; the first word selects the action and the rest are its arguments.
//! Blank lines and lines starting with `#` are skipped. Text arguments run to the end of the
//! line and understand the `\n`, `\t` and `\\` escapes.

use command_core::{ColorParseError, FontWeight, FontWeightParseError, TextColor};
use thiserror::Error;

/// A single editor action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `insert <pos> <text>`
    Insert {
        /// Character position.
        position: usize,
        /// Text to insert.
        text: String,
    },
    /// `append <text>`
    Append(String),
    /// `delete <pos> <len>`
    Delete {
        /// Character position.
        position: usize,
        /// Number of characters.
        length: usize,
    },
    /// `trim <n>`: delete up to `n` characters from the end.
    Trim(usize),
    /// `size <px>`
    FontSize(u32),
    /// `weight <normal|bold>`
    FontWeight(FontWeight),
    /// `color <#rrggbb>`
    TextColor(TextColor),
    /// `format`: the "special format" macro (heading line plus 20px).
    Format,
    /// `undo`
    Undo,
    /// `redo`
    Redo,
    /// `clear`: drop the history, keep the document.
    Clear,
    /// `reset`: drop the history and restore the default document.
    Reset,
    /// `replay`: rebuild the document from the active commands.
    Replay,
    /// `history`
    History,
    /// `state`
    State,
    /// `json`: print the document snapshot as JSON.
    Json,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

/// Errors produced while parsing an action line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown action '{0}' (try 'help')")]
    /// The first word is not a known action.
    UnknownAction(String),

    #[error("'{action}' needs a {argument} argument")]
    /// A required argument is missing.
    MissingArgument {
        /// Action name.
        action: &'static str,
        /// Argument name.
        argument: &'static str,
    },

    #[error("invalid {argument} '{value}': expected a non-negative integer")]
    /// A numeric argument did not parse.
    InvalidNumber {
        /// Argument name.
        argument: &'static str,
        /// Offending text.
        value: String,
    },

    #[error(transparent)]
    /// The weight argument did not parse.
    InvalidWeight(#[from] FontWeightParseError),

    #[error(transparent)]
    /// The color argument did not parse.
    InvalidColor(#[from] ColorParseError),
}

/// Usage text printed by `help`.
pub const HELP: &str = "\
actions:
  insert <pos> <text>    insert text at a character position
  append <text>          insert text at the end
  delete <pos> <len>     delete characters
  trim <n>               delete up to n characters from the end
  size <px>              change the font size
  weight <normal|bold>   change the font weight
  color <#rrggbb>        change the text color
  format                 append a heading and set the size to 20px (one undo step)
  undo | redo            move through the history
  clear                  drop the history, keep the document
  reset                  drop the history and restore the default document
  replay                 rebuild the document from the active commands
  history | state | json print the history or the document
  help | quit";

/// Parse one input line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Action>, ParseError> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line.trim_end(), ""),
    };

    let action = match word.to_ascii_lowercase().as_str() {
        "insert" => {
            let (position, text) = split_first(rest);
            let position = number("insert", "position", position)?;
            Action::Insert {
                position,
                text: unescape(text),
            }
        }
        "append" => Action::Append(unescape(rest)),
        "delete" => {
            let (position, rest) = split_first(rest);
            let (length, _) = split_first(rest);
            Action::Delete {
                position: number("delete", "position", position)?,
                length: number("delete", "length", length)?,
            }
        }
        "trim" => Action::Trim(number("trim", "count", split_first(rest).0)?),
        "size" => {
            let size = number("size", "size", split_first(rest).0)?;
            let size = u32::try_from(size).map_err(|_| ParseError::InvalidNumber {
                argument: "size",
                value: size.to_string(),
            })?;
            Action::FontSize(size)
        }
        "weight" => Action::FontWeight(required("weight", "weight", rest)?.parse()?),
        "color" => Action::TextColor(required("color", "color", rest)?.parse()?),
        "format" => Action::Format,
        "undo" => Action::Undo,
        "redo" => Action::Redo,
        "clear" => Action::Clear,
        "reset" => Action::Reset,
        "replay" => Action::Replay,
        "history" => Action::History,
        "state" => Action::State,
        "json" => Action::Json,
        "help" | "?" => Action::Help,
        "quit" | "exit" => Action::Quit,
        _ => return Err(ParseError::UnknownAction(word.to_string())),
    };

    Ok(Some(action))
}

fn split_first(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest),
        None => (input.trim_end(), ""),
    }
}

fn required<'a>(
    action: &'static str,
    argument: &'static str,
    input: &'a str,
) -> Result<&'a str, ParseError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ParseError::MissingArgument { action, argument });
    }
    Ok(value)
}

fn number(action: &'static str, argument: &'static str, input: &str) -> Result<usize, ParseError> {
    let value = required(action, argument, input)?;
    value.parse().map_err(|_| ParseError::InvalidNumber {
        argument,
        value: value.to_string(),
    })
}

fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
