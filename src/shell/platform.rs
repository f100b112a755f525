//! Shell detection.

use std::path::{Path, PathBuf};

use crate::environment::HostEnvironment;

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    /// `sh`, `dash` or `ash`.
    Sh,
    Unknown,
}

/// Syntax family of a profile file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFamily {
    /// Sourceable `export` syntax.
    Posix,
    /// fish's `set -gx` syntax.
    Fish,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &Path) -> Self {
        let name = exe
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "sh" | "dash" | "ash" => ShellType::Sh,
            _ => ShellType::Unknown,
        }
    }

    /// The syntax this shell's profile files use.
    pub fn family(self) -> ShellFamily {
        match self {
            ShellType::Fish => ShellFamily::Fish,
            _ => ShellFamily::Posix,
        }
    }

    /// Profile files sourced by this shell, under the host's home.
    pub fn profile_files(self, host: &HostEnvironment) -> Vec<PathBuf> {
        let home = &host.home;
        match self {
            ShellType::Bash => vec![home.join(".bashrc"), bash_login_file(home)],
            ShellType::Zsh => vec![home.join(".zshrc"), home.join(".zprofile")],
            ShellType::Fish => vec![host.fish_config_dir().join("config.fish")],
            ShellType::Sh | ShellType::Unknown => vec![home.join(".profile")],
        }
    }
}

/// The login file bash reads: `.bash_profile` when the user has one.
///
/// A new `.bash_profile` would shadow `.profile` for login shells, so it is
/// never created.
fn bash_login_file(home: &Path) -> PathBuf {
    let bash_profile = home.join(".bash_profile");
    if bash_profile.is_file() {
        bash_profile
    } else {
        home.join(".profile")
    }
}

/// Information about the user's configured shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInfo {
    /// Shell executable path.
    pub executable: PathBuf,
    /// Shell type.
    pub name: ShellType,
    /// Profile files to register in.
    pub config_files: Vec<PathBuf>,
}

impl ShellInfo {
    /// Syntax family of `config_files`.
    pub fn family(&self) -> ShellFamily {
        self.name.family()
    }
}

/// Detect the user's shell from the host snapshot.
pub fn detect_shell(host: &HostEnvironment) -> ShellInfo {
    let shell_type = ShellType::from_executable(&host.shell);
    ShellInfo {
        executable: host.shell.clone(),
        name: shell_type,
        config_files: shell_type.profile_files(host),
    }
}
