//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{InstallerTheme, UserInterface};

/// Terminal UI implementation.
///
/// Progress and success lines go to stdout; warnings and errors go to
/// stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: InstallerTheme,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(colors: bool) -> Self {
        let theme = if colors {
            InstallerTheme::new()
        } else {
            InstallerTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_message(msg)).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.out, "{}\n", self.theme.format_header(title)).ok();
    }
}
