//! Error types for installer operations.
//!
//! This module defines [`InstallerError`], the error type every pipeline
//! stage returns, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is fatal: the pipeline stops at the first error
//! - Already-satisfied postconditions are outcomes, never errors
//! - Use `anyhow::Error` (via `InstallerError::Other`) for file-system
//!   failures that only need context for the operator

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for installer operations.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// A package manager was selected but no elevation mechanism exists.
    #[error("Installing cargo with {manager} requires root or sudo, and neither is available")]
    ElevationRequired { manager: String },

    /// Neither a package manager nor a network fetcher is available.
    #[error(
        "No way to install {tool}: no supported package manager and neither curl nor wget found. \
         Install Rust manually from https://rustup.rs and re-run the installer"
    )]
    NoInstallMethod { tool: String },

    /// The selected provisioning command exited unsuccessfully.
    #[error("Toolchain installation via {method} failed with exit code {code:?}")]
    ProvisioningFailed { method: String, code: Option<i32> },

    /// An explicit build tool path does not name an executable.
    #[error("Build tool {path} does not exist or is not executable. Check CARGO_BIN")]
    BuildToolNotFound { path: PathBuf },

    /// The toolchain is still absent after a provisioning attempt.
    #[error("{tool} is still not available after installation. Open a new shell and re-run the installer")]
    PostInstallVerificationFailed { tool: String },

    /// The install directory cannot be written into `PATH`.
    #[error("Install directory {path} contains the PATH separator and cannot be added to PATH")]
    InvalidInstallDir { path: PathBuf },

    /// The build step returned failure.
    #[error("Build failed with exit code {code:?}")]
    BuildFailed { code: Option<i32> },

    /// The build succeeded but produced no binary where one was expected.
    #[error("Build succeeded but no binary was found at {path}")]
    ArtifactMissing { path: PathBuf },

    /// No home directory could be determined.
    #[error("Could not determine the home directory (is HOME set?)")]
    HomeNotFound,

    /// An external command could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, InstallerError>;
