//! Colored terminal output for command reports.
//!
//! Everything goes to stderr so `mdc build -o -` can pipe the manifest
//! through stdout.

use std::fmt::Display;

use console::{Style, Term};

/// Width of report rules and label column padding.
const RULE_WIDTH: usize = 48;
const LABEL_WIDTH: usize = 14;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter writing to stderr.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        self.styled(&self.green, msg);
    }

    /// Print a warning (yellow). Multi-line diagnostics keep their indentation.
    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&self.yellow, msg);
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    /// Print a report heading framed by rules.
    pub(crate) fn heading(&self, title: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.styled(&self.dim, &rule);
        self.styled(&self.cyan_bold, title);
        self.styled(&self.dim, &rule);
    }

    /// Print an aligned `label: value` report row.
    pub(crate) fn row(&self, label: &str, value: impl Display) {
        let label = format!("{label}:");
        let _ = self
            .term
            .write_line(&format!("{label:<LABEL_WIDTH$}{value}"));
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
