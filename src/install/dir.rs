//! Destination directory resolution.

use std::path::{Path, PathBuf};

use crate::environment::{contains_dir, HostEnvironment};
use crate::error::{InstallerError, Result};

/// Where the binary goes.
///
/// Resolved once per run; `bin_dir` never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Install prefix, when one was given.
    pub prefix: Option<PathBuf>,
    /// Directory that receives the binary.
    pub bin_dir: PathBuf,
    /// File name of the installed binary.
    pub binary_name: String,
}

impl InstallTarget {
    /// Resolve the target from explicit settings and the host.
    pub fn resolve(
        explicit_bin_dir: Option<&Path>,
        explicit_prefix: Option<&Path>,
        binary_name: &str,
        host: &HostEnvironment,
    ) -> Self {
        Self {
            prefix: explicit_prefix.map(|prefix| host.absolutize(prefix)),
            bin_dir: resolve_bin_dir(explicit_bin_dir, explicit_prefix, host),
            binary_name: binary_name.to_string(),
        }
    }

    /// Full path of the installed binary.
    pub fn destination(&self) -> PathBuf {
        self.bin_dir.join(&self.binary_name)
    }

    /// Reject a directory that cannot appear as a single `PATH` entry.
    pub fn validate(&self) -> Result<()> {
        if std::env::join_paths([&self.bin_dir]).is_err() {
            return Err(InstallerError::InvalidInstallDir {
                path: self.bin_dir.clone(),
            });
        }
        Ok(())
    }
}

/// Compute the directory that will receive the binary.
///
/// First match wins:
/// 1. `explicit_bin_dir`
/// 2. `explicit_prefix/bin`
/// 3. `~/bin`, then `~/.local/bin`, if it exists and is on the search path
/// 4. `~/bin`, then `~/.local/bin`, if it exists
/// 5. the first search path directory that exists and is writable
/// 6. `~/.local/bin`, which the deploy step creates
///
/// Never fails, and always returns an absolute path.
pub fn resolve_bin_dir(
    explicit_bin_dir: Option<&Path>,
    explicit_prefix: Option<&Path>,
    host: &HostEnvironment,
) -> PathBuf {
    if let Some(dir) = explicit_bin_dir {
        return host.absolutize(dir);
    }
    if let Some(prefix) = explicit_prefix {
        return host.absolutize(prefix).join("bin");
    }

    let user_bin = host.home.join("bin");
    let local_bin = host.home.join(".local").join("bin");
    let preferred = [&user_bin, &local_bin];

    if let Some(dir) = preferred
        .iter()
        .find(|dir| dir.is_dir() && contains_dir(&host.search_path, dir))
    {
        tracing::debug!(dir = %dir.display(), "Using per-user bin already on PATH");
        return (*dir).clone();
    }

    if let Some(dir) = preferred.iter().find(|dir| dir.is_dir()) {
        tracing::debug!(dir = %dir.display(), "Using existing per-user bin");
        return (*dir).clone();
    }

    if let Some(dir) = host
        .search_path
        .iter()
        .find(|dir| dir.is_absolute() && dir.is_dir() && is_writable(dir))
    {
        tracing::debug!(dir = %dir.display(), "Using writable PATH entry");
        return dir.clone();
    }

    tracing::debug!(dir = %local_bin.display(), "Falling back to ~/.local/bin");
    local_bin
}

/// Whether the current user may create files in `dir`.
#[cfg(unix)]
pub fn is_writable(dir: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
pub fn is_writable(dir: &Path) -> bool {
    dir.metadata()
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}
