//! Line-oriented driver for [`command_core`].
//!
//! Reads editor actions one per line (from stdin or a script file), applies them to an
//! [`command_core::EditorSession`] and prints history and document state on request.
//!
//! ```
//! use command_cli::{Driver, parse_line};
//! use command_core::EditorSession;
//!
//! let mut driver = Driver::new(EditorSession::default());
//! let mut out = Vec::new();
//! for line in ["append hello", "size 24", "undo"] {
//!     if let Some(action) = parse_line(line).unwrap() {
//!         driver.apply(action, &mut out).unwrap();
//!     }
//! }
//! assert_eq!(driver.session().snapshot().content, "hello");
//! ```

#![warn(missing_docs)]

pub mod action;
pub mod driver;

pub use action::{Action, HELP, ParseError, parse_line};
pub use driver::{Driver, FORMAT_FONT_SIZE, FORMAT_HEADING, FORMAT_LABEL, Flow};

use std::io::{BufRead, Write};

use tracing::warn;

/// Feed every line of `input` to `driver`, writing reports to `out` and errors to `err`.
///
/// Bad lines and failed commands are reported and skipped. Returns the number of lines
/// that failed.
pub fn run_lines(
    driver: &mut Driver,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<usize> {
    let mut failures = 0;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;

        let action = match parse_line(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                failures += 1;
                writeln!(err, "line {line_no}: {e}")?;
                continue;
            }
        };

        match driver.apply(action, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                failures += 1;
                warn!(line = line_no, error = %e, "action failed");
                writeln!(err, "line {line_no}: {e}")?;
            }
        }
        out.flush()?;
    }

    Ok(failures)
}

/// Run a script through [`run_lines`], failing if any of its lines failed.
///
/// `name` identifies the script in the error message.
pub fn run_script(
    driver: &mut Driver,
    name: &str,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<()> {
    let failures = run_lines(driver, input, out, err)?;
    if failures > 0 {
        anyhow::bail!("{name}: {failures} line(s) failed");
    }
    Ok(())
}
