#![warn(missing_docs)]
//! Command Core - Headless Document Editor with Command-Based Undo/Redo
//!
//! # Overview
//!
//! `command-core` models every edit of an in-memory document as a reversible command object and
//! keeps those commands in a linear undo/redo history. It does not render anything: a frontend
//! builds commands, hands them to the history, and reads document snapshots back.
//!
//! # Core Features
//!
//! - **Document State**: rope-backed text plus font size, font weight and text color
//! - **Reversible Commands**: insert, delete, formatting changes, and composite macros
//! - **Linear History**: execute/undo/redo/clear with branch discard on new edits
//! - **Sessions**: change notifications, reset-to-defaults, and step-wise replay
//! - **Configuration**: session defaults loaded from JSON
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorSession (notifications, replay)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  CommandHistory (invoker, cursor)           │  ← Undo/Redo
//! ├─────────────────────────────────────────────┤
//! │  Command trait + concrete commands          │  ← Reversible Operations
//! ├─────────────────────────────────────────────┤
//! │  DocumentState (receiver)                   │  ← Document Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using the History Directly
//!
//! ```rust
//! use command_core::{ChangeFontSize, CommandHistory, DocumentHandle, DocumentState, InsertText};
//!
//! let doc = DocumentHandle::new(DocumentState::new());
//! let mut history = CommandHistory::new();
//!
//! history.execute(Box::new(InsertText::new(&doc, "hello", 0))).unwrap();
//! history.execute(Box::new(ChangeFontSize::new(&doc, 24))).unwrap();
//! assert_eq!(doc.borrow().font_size(), 24);
//!
//! history.undo().unwrap();
//! history.undo().unwrap();
//! assert_eq!(doc.borrow().content(), "");
//!
//! history.redo().unwrap();
//! assert_eq!(doc.borrow().content(), "hello");
//! ```
//!
//! ## Using a Session
//!
//! ```rust
//! use command_core::{EditorSession, FontWeight};
//!
//! let mut session = EditorSession::default();
//! session.append_text("Hello").unwrap();
//! session.change_font_weight(FontWeight::Bold).unwrap();
//!
//! for entry in session.history().get_history() {
//!     println!("{} (active: {})", entry.description, entry.is_active);
//! }
//! ```
//!
//! # Module Description
//!
//! - [`document`] - Document state, snapshots and the shared handle
//! - [`commands`] - The command trait and concrete commands
//! - [`history`] - The undo/redo history engine
//! - [`session`] - Session composition, notifications and replay
//! - [`config`] - Session configuration
//!
//! # Unicode Support
//!
//! - Positions and lengths are counted in Unicode scalar values
//! - Description previews are cut on grapheme cluster boundaries

pub mod commands;
pub mod config;
pub mod document;
pub mod history;
pub mod session;
mod text;

pub use commands::{
    ChangeFontSize, ChangeFontWeight, ChangeTextColor, Command, CommandError, DEFAULT_MACRO_LABEL,
    DeleteText, InsertText, MacroCommand,
};
pub use config::{
    ConfigError, DEFAULT_MAX_HISTORY, DEFAULT_REPLAY_STEP_DELAY_MS, SessionConfig,
};
pub use document::{
    ColorParseError, DEFAULT_FONT_SIZE, DocumentHandle, DocumentSnapshot, DocumentState,
    FontWeight, FontWeightParseError, TextColor,
};
pub use history::{CommandHistory, HistoryEntry};
pub use session::{
    EditorSession, Replay, ReplayStep, SessionChange, SessionChangeCallback, SessionChangeKind,
};
