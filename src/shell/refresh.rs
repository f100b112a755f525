//! Picking up the new PATH after registration.
//!
//! Profile edits only affect shells started afterwards. When the install
//! directory was not already on the inherited PATH, the reloader extends
//! this process's PATH and then either re-enters the user's shell as a
//! login shell (interactive sessions) or tells the operator how to do it.

use std::path::{Path, PathBuf};

use crate::environment::{contains_dir, prepend_to_process_path, HostEnvironment};
use crate::ui::UserInterface;

/// What the reloader did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The directory was on the original PATH; nothing to do.
    AlreadyOnPath,
    /// Not interactive; the operator was told how to reload.
    ManualReload { instruction: String },
    /// Replacing the process failed; the operator was told how to reload.
    ExecFailed { instruction: String },
}

/// Mockable dependencies for the reloader.
pub struct ReloadContext<'a> {
    /// Replace the current process with `<shell> -l`. Only returns on
    /// failure.
    pub exec_login_shell: &'a dyn Fn(&Path) -> std::io::Error,
    /// Prepend a directory to this process's PATH.
    pub prepend_path: &'a dyn Fn(&Path),
}

/// Build the default `ReloadContext` for production use.
pub fn default_context() -> ReloadContext<'static> {
    ReloadContext {
        exec_login_shell: &exec_login_shell,
        prepend_path: &prepend_to_process_path,
    }
}

#[cfg(unix)]
fn exec_login_shell(shell: &Path) -> std::io::Error {
    use std::os::unix::process::CommandExt;
    std::process::Command::new(shell).arg("-l").exec()
}

#[cfg(not(unix))]
fn exec_login_shell(_shell: &Path) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "process replacement is not supported on this platform",
    )
}

/// The one-line manual reload instruction for `shell`.
pub fn reload_instruction(shell: &Path, binary_name: &str) -> String {
    format!(
        "Run 'exec {} -l' (or open a new terminal) to use {}.",
        shell.display(),
        binary_name
    )
}

/// Makes the install directory reachable from the operator's session.
pub struct SessionReloader<'a> {
    host: &'a HostEnvironment,
    ctx: &'a ReloadContext<'a>,
    binary_name: String,
}

impl<'a> SessionReloader<'a> {
    pub fn new(host: &'a HostEnvironment, ctx: &'a ReloadContext<'a>, binary_name: &str) -> Self {
        Self {
            host,
            ctx,
            binary_name: binary_name.to_string(),
        }
    }

    /// Reconcile the session with `bin_dir`.
    ///
    /// `original_search_path` must be captured before anything modified
    /// PATH. In an interactive session this does not return unless the
    /// exec fails.
    pub fn reconcile(
        &self,
        bin_dir: &Path,
        original_search_path: &[PathBuf],
        ui: &mut dyn UserInterface,
    ) -> ReloadOutcome {
        if contains_dir(original_search_path, bin_dir) {
            tracing::debug!(bin_dir = %bin_dir.display(), "Already on the original PATH");
            ui.message(&format!("{} is already on PATH", bin_dir.display()));
            return ReloadOutcome::AlreadyOnPath;
        }

        (self.ctx.prepend_path)(bin_dir);
        let instruction = reload_instruction(&self.host.shell, &self.binary_name);

        if !self.host.interactive {
            ui.message(&instruction);
            return ReloadOutcome::ManualReload { instruction };
        }

        ui.message(&format!(
            "Restarting {} as a login shell to pick up the new PATH",
            self.host.shell.display()
        ));
        tracing::info!(shell = %self.host.shell.display(), "Replacing process with login shell");
        let err = (self.ctx.exec_login_shell)(&self.host.shell);

        tracing::warn!(error = %err, "Could not restart shell");
        ui.warning(&format!(
            "Could not restart {}: {}",
            self.host.shell.display(),
            err
        ));
        ui.message(&instruction);
        ReloadOutcome::ExecFailed { instruction }
    }
}
