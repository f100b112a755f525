//! The captured host snapshot.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};

use super::search_path::parse_search_path;

/// Ambient state of the machine, read once at process start.
///
/// Stages never read `HOME`, `PATH` or `SHELL` themselves; they receive
/// this value instead, which keeps directory resolution and profile
/// registration testable against synthetic hosts.
///
/// # Example
///
/// ```
/// use vole_installer::environment::HostEnvironment;
/// use std::path::PathBuf;
///
/// let host = HostEnvironment::new(
///     PathBuf::from("/home/ada"),
///     vec![PathBuf::from("/usr/bin")],
/// )
/// .with_shell("/usr/bin/zsh");
///
/// assert_eq!(host.shell, PathBuf::from("/usr/bin/zsh"));
/// assert!(!host.interactive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    /// Directories of the inherited `PATH`, in order.
    pub search_path: Vec<PathBuf>,
    /// The user's home directory.
    pub home: PathBuf,
    /// The user's configured interactive shell (`$SHELL`).
    pub shell: PathBuf,
    /// Both stdin and stdout are attached to a terminal.
    pub interactive: bool,
    /// Running with effective uid 0.
    pub is_root: bool,
    /// Working directory at start.
    pub cwd: PathBuf,
    /// Where rustup puts cargo (`CARGO_HOME` or `~/.cargo`).
    pub cargo_home: PathBuf,
    /// `XDG_CONFIG_HOME`, when set.
    pub xdg_config_home: Option<PathBuf>,
}

impl HostEnvironment {
    /// Create a minimal host rooted at `home`.
    ///
    /// The shell defaults to `/bin/sh`, the session is non-interactive and
    /// unprivileged, and the working directory is `home`.
    pub fn new(home: PathBuf, search_path: Vec<PathBuf>) -> Self {
        Self {
            search_path,
            cargo_home: home.join(".cargo"),
            cwd: home.clone(),
            home,
            shell: PathBuf::from("/bin/sh"),
            interactive: false,
            is_root: false,
            xdg_config_home: None,
        }
    }

    /// Set the interactive shell.
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set whether the session is attached to a terminal.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Set whether the installer runs as root.
    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    /// Set the working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Capture the real process environment.
    pub fn capture() -> Result<Self> {
        let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
        Self::capture_with_env(|key: &str| std::env::var(key), interactive)
    }

    /// Capture with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn capture_with_env<F>(env_fn: F, interactive: bool) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let non_empty = |key: &str| env_fn(key).ok().filter(|value| !value.is_empty());

        let home = non_empty("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(InstallerError::HomeNotFound)?;

        let search_path = parse_search_path(non_empty("PATH").as_deref().map(std::ffi::OsStr::new));
        let shell = non_empty("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/bin/sh"));
        let cargo_home = non_empty("CARGO_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".cargo"));
        let xdg_config_home = non_empty("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|path| path.is_absolute());
        let cwd = std::env::current_dir()?;

        let host = Self {
            search_path,
            home,
            shell,
            interactive,
            is_root: is_elevated(),
            cwd,
            cargo_home,
            xdg_config_home,
        };
        tracing::debug!(?host, "Captured host environment");
        Ok(host)
    }

    /// Re-read `PATH` from the live process.
    ///
    /// Used where freshness matters: after provisioning, and after the
    /// installer has extended its own `PATH`.
    pub fn refreshed_search_path() -> Vec<PathBuf> {
        parse_search_path(std::env::var_os("PATH").as_deref())
    }

    /// Directory that receives fish configuration.
    pub fn fish_config_dir(&self) -> PathBuf {
        self.xdg_config_home
            .clone()
            .unwrap_or_else(|| self.home.join(".config"))
            .join("fish")
    }

    /// Expand a leading `~/` and anchor relative paths at the working directory.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        if let Ok(rest) = path.strip_prefix("~") {
            return self.home.join(rest);
        }
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
