//! Colored terminal output for CLI feedback.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes status lines to the terminal, honoring verbose and quiet modes.
///
/// Errors always print; success, warning and progress lines are dropped in
/// quiet mode; verbose lines only print in verbose mode.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout_color: ColorChoice,
    stderr_color: ColorChoice,
}

fn choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            stdout_color: choice(io::stdout().is_terminal()),
            stderr_color: choice(io::stderr().is_terminal()),
        }
    }

    fn line(
        &self,
        mut stream: StandardStream,
        color: Option<Color>,
        marker: &str,
        message: &str,
    ) -> io::Result<()> {
        if let Some(color) = color {
            stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        }
        write!(stream, "{marker}")?;
        stream.reset()?;
        writeln!(stream, "{message}")?;
        stream.flush()
    }

    fn stdout(&self) -> StandardStream {
        StandardStream::stdout(self.stdout_color)
    }

    fn stderr(&self) -> StandardStream {
        StandardStream::stderr(self.stderr_color)
    }

    /// Line shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.line(self.stdout(), Some(Color::Cyan), "  · ", message)
    }

    /// Success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.line(self.stdout(), Some(Color::Green), "✓ ", message)
    }

    /// Warning line, on stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.line(self.stderr(), Some(Color::Yellow), "⚠ ", message)
    }

    /// Error line, on stderr. Printed even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.line(self.stderr(), Some(Color::Red), "✗ ", message)
    }

    /// Progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.line(self.stdout(), Some(Color::Blue), "→ ", message)
    }

    /// Section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.line(self.stdout(), Some(Color::Magenta), title, "")
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.line(self.stdout(), None, "    ", message)
    }
}
