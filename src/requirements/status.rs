//! Toolchain state types.
//!
//! The toolchain moves through `ABSENT → PROVISIONING → PRESENT | FAILED`.
//! `FAILED` is carried by the error returned from provisioning; the
//! other states are [`ToolchainPhase`] values on a [`ToolchainState`].

use std::fmt;
use std::path::PathBuf;

/// Lifecycle phase of the build toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainPhase {
    /// Probed and not found.
    Absent,
    /// An install command is running.
    Provisioning,
    /// Resolvable and ready to build.
    Present,
}

/// How the toolchain came to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionMethod {
    /// Nothing ran; the tool was already on the search path.
    AlreadyPresent,
    /// Installed through a system package manager.
    PackageManager {
        /// Manager executable (e.g., "apt-get").
        name: String,
    },
    /// Installed through the rustup network installer.
    NetworkInstaller {
        /// Fetcher executable ("curl" or "wget").
        fetcher: String,
    },
}

impl fmt::Display for ProvisionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPresent => f.write_str("already installed"),
            Self::PackageManager { name } => write!(f, "{}", name),
            Self::NetworkInstaller { fetcher } => write!(f, "rustup via {}", fetcher),
        }
    }
}

/// What the installer knows about the build tool.
///
/// Read once at start, updated at most once if provisioning ran, frozen
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainState {
    /// The command name that was probed (e.g., "cargo").
    pub command: String,
    /// Current phase.
    pub phase: ToolchainPhase,
    /// How to invoke the tool. May differ from `command` when a fresh
    /// install is not yet on the inherited search path.
    pub resolved_path: Option<PathBuf>,
    /// How the tool was obtained.
    pub method: Option<ProvisionMethod>,
}

impl ToolchainState {
    /// State for a tool that was found by the initial probe.
    pub fn present(command: impl Into<String>, path: PathBuf) -> Self {
        Self {
            command: command.into(),
            phase: ToolchainPhase::Present,
            resolved_path: Some(path),
            method: Some(ProvisionMethod::AlreadyPresent),
        }
    }

    /// State for a tool that was not found.
    pub fn absent(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            phase: ToolchainPhase::Absent,
            resolved_path: None,
            method: None,
        }
    }

    /// The path or name to invoke.
    pub fn invocation(&self) -> PathBuf {
        self.resolved_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.command))
    }

    /// Whether an install actually ran.
    pub fn was_provisioned(&self) -> bool {
        matches!(
            self.method,
            Some(ProvisionMethod::PackageManager { .. } | ProvisionMethod::NetworkInstaller { .. })
        )
    }
}
