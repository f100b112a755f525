//! User-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait so stages report progress without knowing
//!   where it goes
//! - [`TerminalUI`] for real runs: progress on stdout, problems on stderr
//! - [`MockUI`] capturing everything for tests
//!
//! # Example
//!
//! ```
//! use vole_installer::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Building vole");
//! ui.success("Installed vole");
//! assert!(ui.has_success("Installed"));
//! ```

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, InstallerTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a progress message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);
}
