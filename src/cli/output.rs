//! Terminal progress output.
//!
//! Progress goes to stdout as `Stage...done` lines; warnings and errors go
//! to stderr. `--quiet` silences progress only. Outcomes are coloured when
//! the terminal supports it.

use console::{Style, Term};
use std::io;

/// Writes user-facing progress lines.
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
    stdout: Term,
    stderr: Term,
    stdout_colors: bool,
    stderr_colors: bool,
}

impl OutputManager {
    /// Creates an output manager, detecting colour support per stream.
    pub fn new(quiet: bool) -> Self {
        let stdout = Term::stdout();
        let stderr = Term::stderr();
        Self {
            quiet,
            stdout_colors: stdout.features().colors_supported(),
            stderr_colors: stderr.features().colors_supported(),
            stdout,
            stderr,
        }
    }

    /// Prints a full progress line.
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout.write_line(message)
    }

    /// Starts a progress line (`message...`) that [`success`] or
    /// [`failure`] completes.
    ///
    /// [`success`]: OutputManager::success
    /// [`failure`]: OutputManager::failure
    pub fn start(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout.write_str(&format!("{message}..."))?;
        self.stdout.flush()
    }

    /// Completes a progress line with a successful outcome, in green.
    pub fn success(&self, outcome: &str) -> io::Result<()> {
        self.println(&paint(self.stdout_colors, Style::new().green(), outcome))
    }

    /// Completes a progress line with a failed outcome, in red.
    pub fn failure(&self, outcome: &str) -> io::Result<()> {
        self.println(&paint(self.stdout_colors, Style::new().red().bold(), outcome))
    }

    /// Prints a warning to stderr, even in quiet mode.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        let prefix = paint(self.stderr_colors, Style::new().yellow().bold(), "Warning:");
        self.stderr.write_line(&format!("{prefix} {message}"))
    }
}

fn paint(colors: bool, style: Style, text: &str) -> String {
    if colors {
        style.force_styling(true).apply_to(text).to_string()
    } else {
        text.to_string()
    }
}
