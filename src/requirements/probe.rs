//! Command lookup on the search path.
//!
//! The probe answers one question: does a bare command name resolve to an
//! executable through a given search path? It never runs anything.
//!
//! # Example
//!
//! ```no_run
//! use vole_installer::requirements::probe::CommandProbe;
//! use std::path::PathBuf;
//!
//! let probe = CommandProbe::new(vec![PathBuf::from("/usr/bin")]);
//! if let Some(path) = probe.resolve("cargo") {
//!     println!("cargo at {}", path.display());
//! }
//! ```

use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolve a tool's binary path by iterating over search path entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command; `which` behavior varies across systems and
/// is sometimes a shell builtin with inconsistent error handling.
/// Relative entries are skipped so the answer never depends on the
/// working directory.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .filter(|dir| dir.is_absolute())
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

/// Resolves command names against a fixed search path.
#[derive(Debug, Clone, Default)]
pub struct CommandProbe {
    search_path: Vec<PathBuf>,
}

impl CommandProbe {
    /// Create a probe over the given directories.
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }

    /// Resolve `name` to an executable path.
    ///
    /// A name containing `/` is a path and is checked directly.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        if name.contains('/') {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }
        resolve_tool_path(name, &self.search_path)
    }

    /// True iff `name` resolves to an executable.
    pub fn is_available(&self, name: &str) -> bool {
        let found = self.resolve(name);
        tracing::debug!(name, ?found, "Probed command");
        found.is_some()
    }
}
