//! Command Layer
//!
//! Every document mutation is wrapped in a reversible command object.
//!
//! # Overview
//!
//! A command captures everything it needs to apply **and** reverse one operation against a shared
//! [`DocumentState`](crate::DocumentState):
//!
//! - [`InsertText`] / [`DeleteText`]: content edits
//! - [`ChangeFontSize`] / [`ChangeFontWeight`] / [`ChangeTextColor`]: formatting changes
//! - [`MacroCommand`]: an ordered group of commands applied and reversed as one
//!
//! The [`CommandHistory`](crate::CommandHistory) engine only ever talks to the [`Command`] trait, so
//! new operations can be added without touching the engine.
//!
//! # Example
//!
//! ```rust
//! use command_core::{Command, DocumentHandle, DocumentState, InsertText};
//!
//! let doc = DocumentHandle::new(DocumentState::new());
//! let mut insert = InsertText::new(&doc, "hello", 0);
//!
//! insert.execute().unwrap();
//! assert_eq!(doc.borrow().content(), "hello");
//!
//! insert.undo().unwrap();
//! assert_eq!(doc.borrow().content(), "");
//! assert_eq!(insert.describe(), "Insert: \"hello\"");
//! ```

use crate::document::{DocumentHandle, FontWeight, TextColor};
use crate::text::{PREVIEW_GRAPHEMES, preview};
use thiserror::Error;
use tracing::warn;

/// Label used by [`MacroCommand`] when none is given.
pub const DEFAULT_MACRO_LABEL: &str = "Macro";

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("position {position} is out of range (document length {len})")]
    /// A character position lies past the end of the content.
    PositionOutOfRange {
        /// Requested character position.
        position: usize,
        /// Content length in characters at the time of the request.
        len: usize,
    },

    #[error("invalid font size: {0} (must be positive)")]
    /// Font sizes must be positive.
    InvalidFontSize(u32),

    #[error("cannot undo '{0}': it has not been executed")]
    /// `undo` was called on a command whose reverse state is only captured by `execute`.
    NotApplied(String),

    #[error("macro '{label}' failed at step {step}: {source}")]
    /// A macro child failed; the macro rolled back the children it had already touched.
    MacroStep {
        /// Macro label.
        label: String,
        /// Index of the failing child.
        step: usize,
        /// The child's error.
        source: Box<CommandError>,
    },

    #[error("{0}")]
    /// Error raised by a caller-defined command.
    Other(String),
}

/// A reversible operation.
///
/// Implementations must be atomic: when `execute` or `undo` returns an error, the document must be
/// left exactly as it was before the call. The history engine relies on this to keep its cursor
/// consistent with the document.
pub trait Command {
    /// Apply the operation.
    fn execute(&mut self) -> Result<(), CommandError>;

    /// Reverse the most recent `execute`.
    fn undo(&mut self) -> Result<(), CommandError>;

    /// Short human-readable label, for display only.
    fn describe(&self) -> String;
}

/// Insert text at a character position.
#[derive(Debug, Clone)]
pub struct InsertText {
    document: DocumentHandle,
    text: String,
    position: usize,
}

impl InsertText {
    /// Create an insert command bound to `document`.
    pub fn new(document: &DocumentHandle, text: impl Into<String>, position: usize) -> Self {
        Self {
            document: document.clone(),
            text: text.into(),
            position,
        }
    }

    /// Text to insert.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character position of the insertion.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Command for InsertText {
    fn execute(&mut self) -> Result<(), CommandError> {
        self.document
            .borrow_mut()
            .insert_text(&self.text, self.position)
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        let inserted_len = self.text.chars().count();
        self.document
            .borrow_mut()
            .delete_text(self.position, inserted_len)
            .map(|_| ())
    }

    fn describe(&self) -> String {
        format!("Insert: \"{}\"", preview(&self.text, PREVIEW_GRAPHEMES))
    }
}

/// Delete a character range.
///
/// The removed text is only known once the command runs, so it is captured by `execute`.
#[derive(Debug, Clone)]
pub struct DeleteText {
    document: DocumentHandle,
    position: usize,
    length: usize,
    deleted_text: Option<String>,
}

impl DeleteText {
    /// Create a delete command bound to `document`.
    pub fn new(document: &DocumentHandle, position: usize, length: usize) -> Self {
        Self {
            document: document.clone(),
            position,
            length,
            deleted_text: None,
        }
    }

    /// Character position of the deletion start.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Requested length in characters (may exceed what was actually removed).
    pub fn length(&self) -> usize {
        self.length
    }

    /// Text removed by the last `execute`, if any.
    pub fn deleted_text(&self) -> Option<&str> {
        self.deleted_text.as_deref()
    }
}

impl Command for DeleteText {
    fn execute(&mut self) -> Result<(), CommandError> {
        let removed = self
            .document
            .borrow_mut()
            .delete_text(self.position, self.length)?;
        self.deleted_text = Some(removed);
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        let Some(deleted) = self.deleted_text.as_deref() else {
            return Err(CommandError::NotApplied(self.describe()));
        };
        self.document.borrow_mut().insert_text(deleted, self.position)
    }

    fn describe(&self) -> String {
        let deleted = self.deleted_text.as_deref().unwrap_or_default();
        format!("Delete: \"{}\"", preview(deleted, PREVIEW_GRAPHEMES))
    }
}

/// Change the font size.
///
/// The previous size is read when the command is built (for its description) and re-read on every
/// `execute`, so undo always restores what the command actually replaced.
#[derive(Debug, Clone)]
pub struct ChangeFontSize {
    document: DocumentHandle,
    new_size: u32,
    old_size: u32,
}

impl ChangeFontSize {
    /// Create a font size command bound to `document`.
    pub fn new(document: &DocumentHandle, new_size: u32) -> Self {
        let old_size = document.borrow().font_size();
        Self {
            document: document.clone(),
            new_size,
            old_size,
        }
    }
}

impl Command for ChangeFontSize {
    fn execute(&mut self) -> Result<(), CommandError> {
        let mut doc = self.document.borrow_mut();
        let previous = doc.font_size();
        doc.change_font_size(self.new_size)?;
        self.old_size = previous;
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        self.document.borrow_mut().change_font_size(self.old_size)
    }

    fn describe(&self) -> String {
        format!("Font size: {}px → {}px", self.old_size, self.new_size)
    }
}

/// Change the font weight.
#[derive(Debug, Clone)]
pub struct ChangeFontWeight {
    document: DocumentHandle,
    new_weight: FontWeight,
    old_weight: FontWeight,
}

impl ChangeFontWeight {
    /// Create a font weight command bound to `document`.
    pub fn new(document: &DocumentHandle, new_weight: FontWeight) -> Self {
        let old_weight = document.borrow().font_weight();
        Self {
            document: document.clone(),
            new_weight,
            old_weight,
        }
    }
}

impl Command for ChangeFontWeight {
    fn execute(&mut self) -> Result<(), CommandError> {
        let mut doc = self.document.borrow_mut();
        self.old_weight = doc.font_weight();
        doc.change_font_weight(self.new_weight);
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        self.document
            .borrow_mut()
            .change_font_weight(self.old_weight);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Font weight: {} → {}", self.old_weight, self.new_weight)
    }
}

/// Change the text color.
#[derive(Debug, Clone)]
pub struct ChangeTextColor {
    document: DocumentHandle,
    new_color: TextColor,
    old_color: TextColor,
}

impl ChangeTextColor {
    /// Create a text color command bound to `document`.
    pub fn new(document: &DocumentHandle, new_color: TextColor) -> Self {
        let old_color = document.borrow().text_color();
        Self {
            document: document.clone(),
            new_color,
            old_color,
        }
    }
}

impl Command for ChangeTextColor {
    fn execute(&mut self) -> Result<(), CommandError> {
        let mut doc = self.document.borrow_mut();
        self.old_color = doc.text_color();
        doc.change_text_color(self.new_color);
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        self.document.borrow_mut().change_text_color(self.old_color);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("Text color: {} → {}", self.old_color, self.new_color)
    }
}

/// An ordered group of commands applied and reversed as a single history entry.
///
/// - `execute` runs the children in order.
/// - `undo` runs the children's `undo` in **reverse** order, so each child is reversed against the
///   exact state it produced.
///
/// If a child fails, the children already touched by the current call are reversed before the
/// error is returned, leaving the document as the macro found it.
///
/// # Example
///
/// ```rust
/// use command_core::{ChangeFontSize, Command, DocumentHandle, DocumentState, InsertText, MacroCommand};
///
/// let doc = DocumentHandle::new(DocumentState::new());
/// let mut format = MacroCommand::new("Format")
///     .then(InsertText::new(&doc, "X", 0))
///     .then(ChangeFontSize::new(&doc, 20));
///
/// format.execute().unwrap();
/// assert_eq!(doc.borrow().content(), "X");
/// assert_eq!(doc.borrow().font_size(), 20);
///
/// format.undo().unwrap();
/// assert_eq!(doc.borrow().content(), "");
/// assert_eq!(doc.borrow().font_size(), 16);
/// ```
pub struct MacroCommand {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

impl MacroCommand {
    /// Create an empty macro with a display label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    /// Create a macro from an existing list of commands.
    pub fn from_commands(label: impl Into<String>, commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }

    /// Append a child command (builder style).
    pub fn then(mut self, command: impl Command + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    /// Append a boxed child command.
    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of child commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the macro has no children.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn step_error(&self, step: usize, source: CommandError) -> CommandError {
        CommandError::MacroStep {
            label: self.label.clone(),
            step,
            source: Box::new(source),
        }
    }
}

impl Default for MacroCommand {
    fn default() -> Self {
        Self::new(DEFAULT_MACRO_LABEL)
    }
}

impl std::fmt::Debug for MacroCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let children: Vec<String> = self.commands.iter().map(|c| c.describe()).collect();
        f.debug_struct("MacroCommand")
            .field("label", &self.label)
            .field("commands", &children)
            .finish()
    }
}

impl Command for MacroCommand {
    fn execute(&mut self) -> Result<(), CommandError> {
        for step in 0..self.commands.len() {
            let Err(err) = self.commands[step].execute() else {
                continue;
            };

            warn!(label = %self.label, step, error = %err, "macro step failed; rolling back");
            for done in self.commands[..step].iter_mut().rev() {
                if let Err(rollback_err) = done.undo() {
                    warn!(label = %self.label, error = %rollback_err, "macro rollback step failed");
                }
            }
            return Err(self.step_error(step, err));
        }
        Ok(())
    }

    fn undo(&mut self) -> Result<(), CommandError> {
        for step in (0..self.commands.len()).rev() {
            let Err(err) = self.commands[step].undo() else {
                continue;
            };

            warn!(label = %self.label, step, error = %err, "macro undo failed; re-applying");
            for undone in self.commands[step + 1..].iter_mut() {
                if let Err(reapply_err) = undone.execute() {
                    warn!(label = %self.label, error = %reapply_err, "macro re-apply step failed");
                }
            }
            return Err(self.step_error(step, err));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
