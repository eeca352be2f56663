//! Command History Engine
//!
//! [`CommandHistory`] is the invoker: it runs commands, keeps them in a single linear timeline and
//! moves a cursor back and forth over it for undo/redo.
//!
//! # Timeline
//!
//! ```text
//!   history:  [ c0 ][ c1 ][ c2 ][ c3 ]
//!                         ^
//!                       cursor          c0..=c2 active, c3 undone (redoable)
//! ```
//!
//! Executing a new command while some commands are undone discards the undone tail for good:
//! there is no redo tree, only one branch.
//!
//! # Failure handling
//!
//! The engine only edits the timeline after a command succeeds. A failing `execute`, `undo` or
//! `redo` returns the command's error and leaves both the history and the cursor as they were.
//! Combined with atomic commands, the document and the timeline never drift apart.
//!
//! # Example
//!
//! ```rust
//! use command_core::{ChangeFontSize, CommandHistory, DocumentHandle, DocumentState, InsertText};
//!
//! let doc = DocumentHandle::new(DocumentState::new());
//! let mut history = CommandHistory::new();
//!
//! history.execute(Box::new(InsertText::new(&doc, "hello", 0))).unwrap();
//! history.execute(Box::new(ChangeFontSize::new(&doc, 24))).unwrap();
//!
//! history.undo().unwrap();
//! assert_eq!(doc.borrow().font_size(), 16);
//! assert!(history.can_redo());
//!
//! history.redo().unwrap();
//! assert_eq!(doc.borrow().font_size(), 24);
//! ```

use crate::commands::{Command, CommandError};
use tracing::{debug, trace, warn};

/// One row of the read-only history projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The command's [`describe`](Command::describe) label.
    pub description: String,
    /// Whether the command's effect is currently applied.
    pub is_active: bool,
}

/// Linear undo/redo history of executed commands.
pub struct CommandHistory {
    history: Vec<Box<dyn Command>>,
    /// Number of applied commands; the cursor is `applied - 1`.
    applied: usize,
    /// Oldest entries are evicted once the history grows past this depth.
    max_depth: Option<usize>,
    /// Applied count at the last clean point, if it is still reachable.
    clean_index: Option<usize>,
}

impl CommandHistory {
    /// Create an unbounded, empty history.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            applied: 0,
            max_depth: None,
            clean_index: Some(0),
        }
    }

    /// Create an empty history that keeps at most `max_depth` entries.
    ///
    /// A depth of zero is treated as one.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth.max(1)),
            ..Self::new()
        }
    }

    /// Execute `command` and record it as the newest active entry.
    ///
    /// Any undone entries are discarded first. On error nothing is recorded.
    pub fn execute(&mut self, command: Box<dyn Command>) -> Result<(), CommandError> {
        self.execute_or_return(command).map_err(|(_, err)| err)
    }

    /// Like [`execute`](Self::execute), but hands the command back when it fails.
    pub(crate) fn execute_or_return(
        &mut self,
        mut command: Box<dyn Command>,
    ) -> Result<(), (Box<dyn Command>, CommandError)> {
        if let Err(err) = command.execute() {
            warn!(command = %command.describe(), error = %err, "command execute failed");
            return Err((command, err));
        }

        self.discard_undone();
        debug!(command = %command.describe(), index = self.history.len(), "executed command");
        self.history.push(command);
        self.applied += 1;
        self.enforce_max_depth();
        Ok(())
    }

    /// Undo the command at the cursor.
    ///
    /// Returns `Ok(false)` without doing anything when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, CommandError> {
        if !self.can_undo() {
            return Ok(false);
        }

        let index = self.applied - 1;
        let command = &mut self.history[index];
        if let Err(err) = command.undo() {
            warn!(command = %command.describe(), index, error = %err, "command undo failed");
            return Err(err);
        }

        debug!(command = %command.describe(), index, "undid command");
        self.applied -= 1;
        Ok(true)
    }

    /// Re-execute the command just after the cursor.
    ///
    /// Returns `Ok(false)` without doing anything when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, CommandError> {
        if !self.can_redo() {
            return Ok(false);
        }

        let index = self.applied;
        let command = &mut self.history[index];
        if let Err(err) = command.execute() {
            warn!(command = %command.describe(), index, error = %err, "command redo failed");
            return Err(err);
        }

        debug!(command = %command.describe(), index, "redid command");
        self.applied += 1;
        Ok(true)
    }

    /// Whether there is an applied command to undo.
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Whether there is an undone command to redo.
    pub fn can_redo(&self) -> bool {
        self.applied < self.history.len()
    }

    /// Drop every entry and reset the cursor.
    ///
    /// The document is not touched; the clean point is forgotten.
    pub fn clear(&mut self) {
        debug!(entries = self.history.len(), "cleared history");
        self.history.clear();
        self.applied = 0;
        self.clean_index = None;
    }

    /// Project the history as `(description, is_active)` rows, oldest first.
    pub fn get_history(&self) -> Vec<HistoryEntry> {
        self.history
            .iter()
            .enumerate()
            .map(|(index, command)| HistoryEntry {
                description: command.describe(),
                is_active: index < self.applied,
            })
            .collect()
    }

    /// The currently applied commands, oldest first.
    pub fn get_active_commands(&self) -> &[Box<dyn Command>] {
        &self.history[..self.applied]
    }

    /// Index of the last applied command, or `None` when nothing is applied.
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Total number of entries (active and undone).
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether the history has no entries.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Number of entries that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.applied
    }

    /// Number of entries that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.history.len() - self.applied
    }

    /// Maximum number of retained entries, if bounded.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Whether the cursor sits at the last clean point.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.applied)
    }

    /// Mark the current cursor position as clean (e.g. after saving).
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.applied);
    }

    /// Undo every applied command, then remove them from the history, leaving it empty.
    ///
    /// Afterwards the document is in the state the oldest retained command was recorded against,
    /// which differs from any configured default once entries were evicted or the history was
    /// cleared. Entries that were already undone are dropped.
    ///
    /// If an undo fails, the commands undone so far are redone and the history is left as it was.
    pub(crate) fn rewind(&mut self) -> Result<Vec<Box<dyn Command>>, CommandError> {
        let active = self.applied;

        while self.applied > 0 {
            if let Err(err) = self.undo() {
                while self.applied < active {
                    if let Err(redo_err) = self.redo() {
                        warn!(error = %redo_err, "restoring after failed rewind");
                        break;
                    }
                }
                return Err(err);
            }
        }

        trace!(commands = active, "rewound history");
        self.history.truncate(active);
        self.clean_index = None;
        Ok(std::mem::take(&mut self.history))
    }

    /// Append commands as undone entries after the cursor.
    ///
    /// Callers must guarantee the document currently reflects exactly the applied prefix, so that
    /// redoing these commands in order is valid.
    pub(crate) fn append_undone(&mut self, commands: impl IntoIterator<Item = Box<dyn Command>>) {
        self.discard_undone();
        self.history.extend(commands);
    }

    fn discard_undone(&mut self) {
        if self.applied == self.history.len() {
            return;
        }

        trace!(
            discarded = self.history.len() - self.applied,
            "discarding undone branch"
        );

        // A clean point inside the discarded branch can never be reached again.
        if let Some(clean_index) = self.clean_index
            && clean_index > self.applied
        {
            self.clean_index = None;
        }

        self.history.truncate(self.applied);
    }

    fn enforce_max_depth(&mut self) {
        let Some(max_depth) = self.max_depth else {
            return;
        };

        while self.history.len() > max_depth {
            let evicted = self.history.remove(0);
            trace!(command = %evicted.describe(), "evicted oldest history entry");
            self.applied = self.applied.saturating_sub(1);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(clean_index) => Some(clean_index - 1),
            };
        }
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("history", &self.get_history())
            .field("cursor", &self.cursor())
            .field("max_depth", &self.max_depth)
            .field("clean_index", &self.clean_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::InsertText;
    use crate::document::{DocumentHandle, DocumentState};

    fn insert(doc: &DocumentHandle, text: &str) -> Box<dyn Command> {
        let end = doc.borrow().char_len();
        Box::new(InsertText::new(doc, text, end))
    }

    #[test]
    fn test_cursor_tracks_applied_prefix() {
        let doc = DocumentHandle::default();
        let mut history = CommandHistory::new();
        assert_eq!(history.cursor(), None);

        history.execute(insert(&doc, "a")).unwrap();
        history.execute(insert(&doc, "b")).unwrap();
        assert_eq!(history.cursor(), Some(1));

        history.undo().unwrap();
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 1);
    }

    #[test]
    fn test_max_depth_evicts_oldest() {
        let doc = DocumentHandle::new(DocumentState::new());
        let mut history = CommandHistory::with_max_depth(2);

        for text in ["a", "b", "c"] {
            history.execute(insert(&doc, text)).unwrap();
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        let descriptions: Vec<_> = history
            .get_history()
            .into_iter()
            .map(|e| e.description)
            .collect();
        assert_eq!(descriptions, vec!["Insert: \"b\"", "Insert: \"c\""]);

        history.undo().unwrap();
        history.undo().unwrap();
        assert!(!history.can_undo());
        assert_eq!(doc.borrow().content(), "a");
    }

    #[test]
    fn test_clean_point_lost_when_branch_discarded() {
        let doc = DocumentHandle::default();
        let mut history = CommandHistory::new();
        assert!(history.is_clean());

        history.execute(insert(&doc, "a")).unwrap();
        history.mark_clean();
        history.undo().unwrap();
        assert!(!history.is_clean());

        history.redo().unwrap();
        assert!(history.is_clean());

        history.undo().unwrap();
        history.execute(insert(&doc, "b")).unwrap();
        assert!(!history.is_clean());
        history.undo().unwrap();
        assert!(!history.is_clean());
    }

    struct StuckUndo;

    impl Command for StuckUndo {
        fn execute(&mut self) -> Result<(), CommandError> {
            Ok(())
        }

        fn undo(&mut self) -> Result<(), CommandError> {
            Err(CommandError::Other("stuck".to_string()))
        }

        fn describe(&self) -> String {
            "Stuck".to_string()
        }
    }

    #[test]
    fn test_rewind_undoes_active_prefix_and_drops_undone() {
        let doc = DocumentHandle::default();
        let mut history = CommandHistory::new();
        for text in ["a", "b", "c"] {
            history.execute(insert(&doc, text)).unwrap();
        }
        history.undo().unwrap();

        let commands = history.rewind().unwrap();
        assert_eq!(commands.len(), 2);
        assert!(history.is_empty());
        assert_eq!(doc.borrow().content(), "");
    }

    #[test]
    fn test_rewind_starts_from_oldest_retained_entry() {
        let doc = DocumentHandle::default();
        let mut history = CommandHistory::with_max_depth(2);
        for text in ["a", "b", "c"] {
            history.execute(insert(&doc, text)).unwrap();
        }

        let commands = history.rewind().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(doc.borrow().content(), "a");
    }

    #[test]
    fn test_failed_rewind_restores_history() {
        let doc = DocumentHandle::default();
        let mut history = CommandHistory::new();
        history.execute(Box::new(StuckUndo)).unwrap();
        history.execute(insert(&doc, "a")).unwrap();

        let err = history.rewind().err().unwrap();
        assert_eq!(err, CommandError::Other("stuck".to_string()));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(doc.borrow().content(), "a");
    }
}
