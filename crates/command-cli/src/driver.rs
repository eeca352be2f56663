//! Applies parsed actions to an [`EditorSession`] and prints the results.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use command_core::{ChangeFontSize, EditorSession, InsertText, MacroCommand};
use tracing::{debug, info};

use crate::action::{Action, HELP};

/// Heading appended by the `format` action.
pub const FORMAT_HEADING: &str = "\n=== FORMATTED TEXT ===\n";
/// Font size applied by the `format` action.
pub const FORMAT_FONT_SIZE: u32 = 20;
/// Label of the `format` macro in the history.
pub const FORMAT_LABEL: &str = "Special format";

/// Whether the input loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop reading input.
    Quit,
}

/// Drives one editor session from a stream of actions.
#[derive(Debug)]
pub struct Driver {
    session: EditorSession,
    replay_delay: Duration,
}

impl Driver {
    /// Wrap a session; `replay` sleeps for the configured step delay between steps.
    pub fn new(session: EditorSession) -> Self {
        let replay_delay = session.config().replay_step_delay();
        Self {
            session,
            replay_delay,
        }
    }

    /// Override the pause between replay steps.
    pub fn with_replay_delay(mut self, delay: Duration) -> Self {
        self.replay_delay = delay;
        self
    }

    /// The driven session.
    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Apply one action, writing any report to `out`.
    ///
    /// Command failures are returned as errors; the session is unchanged in that case.
    pub fn apply(&mut self, action: Action, out: &mut impl Write) -> Result<Flow> {
        debug!(?action, "applying action");

        match action {
            Action::Insert { position, text } => self.session.insert_text(&text, position)?,
            Action::Append(text) => self.session.append_text(&text)?,
            Action::Delete { position, length } => self.session.delete_text(position, length)?,
            Action::Trim(count) => {
                if !self.session.delete_tail(count)? {
                    writeln!(out, "nothing to trim")?;
                }
            }
            Action::FontSize(size) => self.session.change_font_size(size)?,
            Action::FontWeight(weight) => self.session.change_font_weight(weight)?,
            Action::TextColor(color) => self.session.change_text_color(color)?,
            Action::Format => self.format()?,
            Action::Undo => {
                if !self.session.undo()? {
                    writeln!(out, "nothing to undo")?;
                }
            }
            Action::Redo => {
                if !self.session.redo()? {
                    writeln!(out, "nothing to redo")?;
                }
            }
            Action::Clear => self.session.clear_history(),
            Action::Reset => self.session.reset()?,
            Action::Replay => self.replay(out)?,
            Action::History => self.print_history(out)?,
            Action::State => self.print_state(out)?,
            Action::Json => {
                let json = serde_json::to_string_pretty(&self.session.snapshot())?;
                writeln!(out, "{json}")?;
            }
            Action::Help => writeln!(out, "{HELP}")?,
            Action::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn format(&mut self) -> Result<()> {
        let end = self.session.document().borrow().char_len();
        let document = self.session.document();
        let format = MacroCommand::new(FORMAT_LABEL)
            .then(InsertText::new(document, FORMAT_HEADING, end))
            .then(ChangeFontSize::new(document, FORMAT_FONT_SIZE));
        self.session.execute(Box::new(format))?;
        Ok(())
    }

    fn replay(&mut self, out: &mut impl Write) -> Result<()> {
        let delay = self.replay_delay;
        let mut replay = self.session.replay()?;
        let total = replay.total();
        info!(total, "replaying history");

        let mut first = true;
        for step in &mut replay {
            if !first && !delay.is_zero() {
                thread::sleep(delay);
            }
            first = false;

            let step = step?;
            writeln!(out, "[{}/{}] {}", step.index + 1, step.total, step.description)?;
        }
        drop(replay);

        writeln!(out, "replayed {total} command(s)")?;
        Ok(())
    }

    fn print_history(&self, out: &mut impl Write) -> Result<()> {
        let entries = self.session.history().get_history();
        if entries.is_empty() {
            writeln!(out, "(history is empty)")?;
            return Ok(());
        }

        for (index, entry) in entries.iter().enumerate() {
            let marker = if entry.is_active { '●' } else { '○' };
            writeln!(out, "{marker} {:>3}. {}", index + 1, entry.description)?;
        }
        Ok(())
    }

    fn print_state(&self, out: &mut impl Write) -> Result<()> {
        let snapshot = self.session.snapshot();
        let history = self.session.history();
        writeln!(out, "content: {:?}", snapshot.content)?;
        writeln!(
            out,
            "style:   {}px {} {}",
            snapshot.font_size, snapshot.font_weight, snapshot.text_color
        )?;
        writeln!(
            out,
            "history: {} undo / {} redo{}",
            history.undo_depth(),
            history.redo_depth(),
            if self.session.is_modified() {
                ", modified"
            } else {
                ""
            }
        )?;
        Ok(())
    }
}
