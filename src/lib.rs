//! vole-installer - builds vole from source and puts it on your PATH.
//!
//! The installer is a single idempotent pipeline that is safe to re-run on
//! a machine in any prior state: it installs cargo when missing, builds
//! vole in release mode, deploys the binary into a per-user or explicit
//! directory, and appends a guarded PATH block to the user's shell
//! profile files.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument parsing
//! - [`config`] - Flags and environment merged into one run configuration
//! - [`environment`] - Host snapshot and search path helpers
//! - [`error`] - Error types and result aliases
//! - [`install`] - Install directory resolution, build and deploy
//! - [`requirements`] - Build toolchain detection and provisioning
//! - [`runner`] - The install pipeline
//! - [`shell`] - Command execution, shell detection and PATH wiring
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use vole_installer::environment::HostEnvironment;
//! use vole_installer::install::resolve_bin_dir;
//! use std::path::{Path, PathBuf};
//!
//! let host = HostEnvironment::new(PathBuf::from("/home/ada"), vec![]);
//! let dir = resolve_bin_dir(Some(Path::new("/a")), Some(Path::new("/b")), &host);
//! assert_eq!(dir, PathBuf::from("/a"));
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod install;
pub mod requirements;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{InstallerError, Result};
