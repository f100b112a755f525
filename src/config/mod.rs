//! Run configuration.
//!
//! Flags come from the command line; everything else comes from the
//! environment:
//!
//! | variable            | effect                                        |
//! |---------------------|-----------------------------------------------|
//! | `CARGO_BIN`         | build tool to run instead of `cargo`          |
//! | `VOLE_PROJECT_ROOT` | project to build (default: working directory) |
//! | `CARGO_TARGET_DIR`  | where cargo puts build output                 |
//! | `NO_COLOR`          | disable styled output                         |

use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Name of the installed binary.
pub const BINARY_NAME: &str = "vole";

/// Build tool used when `CARGO_BIN` is unset.
pub const DEFAULT_BUILD_TOOL: &str = "cargo";

/// Everything the pipeline needs to know besides the host itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// `--bin-dir`, as given.
    pub bin_dir: Option<PathBuf>,
    /// `--prefix`, as given.
    pub prefix: Option<PathBuf>,
    /// Build tool name or path.
    pub build_tool: String,
    /// Directory `cargo build` runs in.
    pub project_root: PathBuf,
    /// `CARGO_TARGET_DIR`, as given.
    pub target_dir: Option<PathBuf>,
    /// Styled output disabled.
    pub no_color: bool,
    /// Name of the installed binary.
    pub binary_name: String,
}

impl InstallConfig {
    /// Build from parsed arguments and the process environment.
    pub fn from_args(args: &Cli, cwd: &Path) -> Self {
        Self::from_args_with_env(args, cwd, |key: &str| std::env::var(key))
    }

    /// Build with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn from_args_with_env<F>(args: &Cli, cwd: &Path, env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let non_empty = |key: &str| env_fn(key).ok().filter(|value| !value.is_empty());

        let project_root = non_empty("VOLE_PROJECT_ROOT")
            .map(PathBuf::from)
            .map(|root| if root.is_absolute() { root } else { cwd.join(root) })
            .unwrap_or_else(|| cwd.to_path_buf());

        Self {
            bin_dir: args.bin_dir.clone(),
            prefix: args.prefix.clone(),
            build_tool: non_empty("CARGO_BIN").unwrap_or_else(|| DEFAULT_BUILD_TOOL.to_string()),
            project_root,
            target_dir: non_empty("CARGO_TARGET_DIR").map(PathBuf::from),
            // Any value, even empty, disables colors.
            no_color: env_fn("NO_COLOR").is_ok(),
            binary_name: BINARY_NAME.to_string(),
        }
    }

    /// Cargo's target directory for this project.
    pub fn resolved_target_dir(&self) -> PathBuf {
        match &self.target_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.project_root.join(dir),
            None => self.project_root.join("target"),
        }
    }
}
