//! Editor Session
//!
//! Composes one [`DocumentState`](crate::DocumentState) and one [`CommandHistory`] into the object
//! a frontend drives.
//!
//! # Overview
//!
//! - **Ownership**: the session owns the document handle; commands built through
//!   [`document()`](EditorSession::document) share it.
//! - **Version Tracking**: every successful state-changing operation increments the version.
//! - **Change Notifications**: subscribers are called with a [`SessionChange`] after each change.
//! - **Reset**: clearing the history and restoring the configured default document are separate
//!   operations; [`reset()`](EditorSession::reset) sequences both.
//! - **Replay**: [`replay()`](EditorSession::replay) rewinds to the start of the history and
//!   re-executes the active commands one step at a time.
//!
//! # Example
//!
//! ```rust
//! use command_core::EditorSession;
//!
//! let mut session = EditorSession::default();
//!
//! session.subscribe(|change| {
//!     println!("v{} -> v{}: {:?}", change.old_version, change.new_version, change.kind);
//! });
//!
//! session.append_text("hello").unwrap();
//! session.change_font_size(24).unwrap();
//! session.undo().unwrap();
//!
//! assert_eq!(session.snapshot().content, "hello");
//! assert_eq!(session.snapshot().font_size, 16);
//! assert_eq!(session.version(), 3);
//! ```

use crate::commands::{
    ChangeFontSize, ChangeFontWeight, ChangeTextColor, Command, CommandError, DeleteText,
    InsertText,
};
use crate::config::{ConfigError, SessionConfig};
use crate::document::{DocumentHandle, DocumentSnapshot, DocumentState, FontWeight, TextColor};
use crate::history::CommandHistory;
use std::collections::VecDeque;
use tracing::debug;

/// Kind of change reported to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChangeKind {
    /// A new command was executed.
    Executed,
    /// The command at the cursor was undone.
    Undone,
    /// An undone command was re-executed.
    Redone,
    /// The history was cleared; the document is unchanged.
    HistoryCleared,
    /// History cleared and document restored to the configured defaults.
    Reset,
    /// A replay started: active commands undone and the history emptied.
    ReplayStarted,
    /// One command was re-executed by a replay.
    ReplayStep,
}

/// State change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChange {
    /// Change kind
    pub kind: SessionChangeKind,
    /// Version before the change
    pub old_version: u64,
    /// Version after the change
    pub new_version: u64,
    /// Description of the command involved, if any
    pub description: Option<String>,
}

/// State change callback function type
pub type SessionChangeCallback = Box<dyn FnMut(&SessionChange)>;

/// An editing session: one document, one history, and their subscribers.
pub struct EditorSession {
    document: DocumentHandle,
    history: CommandHistory,
    config: SessionConfig,
    version: u64,
    callbacks: Vec<SessionChangeCallback>,
}

impl EditorSession {
    /// Create a session from a configuration.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let document = DocumentState::from_snapshot(&config.defaults)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(Self {
            document: DocumentHandle::new(document),
            history: history_for(&config),
            config,
            version: 0,
            callbacks: Vec::new(),
        })
    }

    /// Shared handle to the document, for building commands.
    pub fn document(&self) -> &DocumentHandle {
        &self.document
    }

    /// Snapshot of the current document.
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.document.snapshot()
    }

    /// The command history.
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current state version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the history moved away from the last clean point.
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Mark the current history position as clean.
    pub fn mark_clean(&mut self) {
        self.history.mark_clean();
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionChange) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Execute a command through the history.
    pub fn execute(&mut self, command: Box<dyn Command>) -> Result<(), CommandError> {
        self.history.execute(command)?;
        let description = self.last_active_description();
        self.notify(SessionChangeKind::Executed, description);
        Ok(())
    }

    /// Undo the last applied command. Returns `Ok(false)` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, CommandError> {
        let description = self.last_active_description();
        let undone = self.history.undo()?;
        if undone {
            self.notify(SessionChangeKind::Undone, description);
        }
        Ok(undone)
    }

    /// Redo the next undone command. Returns `Ok(false)` when there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, CommandError> {
        let redone = self.history.redo()?;
        if redone {
            let description = self.last_active_description();
            self.notify(SessionChangeKind::Redone, description);
        }
        Ok(redone)
    }

    /// Clear the history, leaving the document as it is.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.notify(SessionChangeKind::HistoryCleared, None);
    }

    /// Clear the history and restore the document to the configured defaults.
    pub fn reset(&mut self) -> Result<(), CommandError> {
        self.document.borrow_mut().set_state(&self.config.defaults)?;
        self.history.clear();
        self.history.mark_clean();
        self.notify(SessionChangeKind::Reset, None);
        Ok(())
    }

    /// Insert `text` at a character position.
    pub fn insert_text(&mut self, text: &str, position: usize) -> Result<(), CommandError> {
        let command = InsertText::new(&self.document, text, position);
        self.execute(Box::new(command))
    }

    /// Insert `text` at the end of the document.
    pub fn append_text(&mut self, text: &str) -> Result<(), CommandError> {
        let end = self.document.borrow().char_len();
        self.insert_text(text, end)
    }

    /// Delete up to `length` characters starting at `position`.
    pub fn delete_text(&mut self, position: usize, length: usize) -> Result<(), CommandError> {
        let command = DeleteText::new(&self.document, position, length);
        self.execute(Box::new(command))
    }

    /// Delete up to `count` characters from the end of the document.
    ///
    /// Returns `Ok(false)` without recording anything when the document is empty.
    pub fn delete_tail(&mut self, count: usize) -> Result<bool, CommandError> {
        let len = self.document.borrow().char_len();
        if len == 0 || count == 0 {
            return Ok(false);
        }
        let position = len.saturating_sub(count);
        self.delete_text(position, len - position)?;
        Ok(true)
    }

    /// Change the font size.
    pub fn change_font_size(&mut self, size: u32) -> Result<(), CommandError> {
        let command = ChangeFontSize::new(&self.document, size);
        self.execute(Box::new(command))
    }

    /// Change the font weight.
    pub fn change_font_weight(&mut self, weight: FontWeight) -> Result<(), CommandError> {
        let command = ChangeFontWeight::new(&self.document, weight);
        self.execute(Box::new(command))
    }

    /// Change the text color.
    pub fn change_text_color(&mut self, color: TextColor) -> Result<(), CommandError> {
        let command = ChangeTextColor::new(&self.document, color);
        self.execute(Box::new(command))
    }

    /// Start replaying the active commands from the start of the history.
    ///
    /// Before the first step every active command is undone, which puts the document back in the
    /// state the oldest retained command was recorded against (the configured defaults, unless
    /// older entries were evicted or the history was cleared), and the history is emptied. Each
    /// call to [`Replay::next`] then re-executes one command. Pacing is up to the caller (see
    /// [`SessionConfig::replay_step_delay`]).
    ///
    /// An empty history yields an empty replay and leaves the document alone. If rewinding fails,
    /// the error is returned with the document and history unchanged.
    ///
    /// Stopping early (via [`Replay::cancel`], dropping the replay, or a failing step) keeps the
    /// not-yet-replayed commands as the redoable tail of the history.
    ///
    /// # Example
    ///
    /// ```rust
    /// use command_core::EditorSession;
    ///
    /// let mut session = EditorSession::default();
    /// session.append_text("hello").unwrap();
    /// session.change_font_size(24).unwrap();
    ///
    /// let mut replay = session.replay().unwrap();
    /// let first = replay.next().unwrap().unwrap();
    /// assert_eq!(first.description, "Insert: \"hello\"");
    /// assert_eq!(replay.cancel(), 1);
    ///
    /// assert_eq!(session.snapshot().font_size, 16);
    /// session.redo().unwrap();
    /// assert_eq!(session.snapshot().font_size, 24);
    /// ```
    pub fn replay(&mut self) -> Result<Replay<'_>, CommandError> {
        if self.history.is_empty() {
            debug!("replay skipped: history is empty");
            return Ok(Replay {
                session: self,
                pending: VecDeque::new(),
                total: 0,
                finished: true,
            });
        }

        let pending: VecDeque<Box<dyn Command>> = self.history.rewind()?.into();
        let total = pending.len();

        debug!(total, "replay started");
        self.notify(SessionChangeKind::ReplayStarted, None);

        Ok(Replay {
            session: self,
            pending,
            total,
            finished: false,
        })
    }

    /// Replay every active command without pausing. Returns the number of replayed steps.
    pub fn replay_all(&mut self) -> Result<usize, CommandError> {
        let mut replay = self.replay()?;
        let mut replayed = 0;
        for step in &mut replay {
            step?;
            replayed += 1;
        }
        Ok(replayed)
    }

    fn last_active_description(&self) -> Option<String> {
        self.history
            .get_active_commands()
            .last()
            .map(|command| command.describe())
    }

    fn notify(&mut self, kind: SessionChangeKind, description: Option<String>) {
        let old_version = self.version;
        self.version += 1;

        let change = SessionChange {
            kind,
            old_version,
            new_version: self.version,
            description,
        };

        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        let config = SessionConfig::default();
        Self {
            document: DocumentHandle::new(DocumentState::new()),
            history: history_for(&config),
            config,
            version: 0,
            callbacks: Vec::new(),
        }
    }
}

fn history_for(config: &SessionConfig) -> CommandHistory {
    match config.max_history {
        Some(max_depth) => CommandHistory::with_max_depth(max_depth),
        None => CommandHistory::new(),
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("document", &self.snapshot())
            .field("history", &self.history)
            .field("version", &self.version)
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

/// One completed replay step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    /// Zero-based index of the replayed command.
    pub index: usize,
    /// Number of commands in the replay.
    pub total: usize,
    /// Description of the replayed command.
    pub description: String,
}

/// Step-wise replay of a session's active commands. See [`EditorSession::replay`].
pub struct Replay<'a> {
    session: &'a mut EditorSession,
    pending: VecDeque<Box<dyn Command>>,
    total: usize,
    finished: bool,
}

impl Replay<'_> {
    /// Number of commands in the replay.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of commands not yet replayed.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Stop replaying. Returns how many commands were left redoable.
    pub fn cancel(self) -> usize {
        self.pending.len()
    }
}

impl Iterator for Replay<'_> {
    type Item = Result<ReplayStep, CommandError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(command) = self.pending.pop_front() else {
            self.finished = true;
            debug!(total = self.total, "replay complete");
            return None;
        };

        let index = self.total - self.pending.len() - 1;
        match self.session.history.execute_or_return(command) {
            Ok(()) => {
                let description = self.session.last_active_description().unwrap_or_default();
                debug!(index, total = self.total, command = %description, "replayed command");
                self.session
                    .notify(SessionChangeKind::ReplayStep, Some(description.clone()));
                Some(Ok(ReplayStep {
                    index,
                    total: self.total,
                    description,
                }))
            }
            Err((command, err)) => {
                self.pending.push_front(command);
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl Drop for Replay<'_> {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        debug!(
            remaining = self.pending.len(),
            "replay stopped; remaining commands left redoable"
        );
        self.session.history.append_undone(self.pending.drain(..));
    }
}
