//! Command search path helpers.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Split a raw `PATH` value into its directories, preserving order.
///
/// Empty entries are dropped. Relative entries are kept so callers see
/// the path exactly as the shell would; lookups ignore them.
pub fn parse_search_path(raw: Option<&OsStr>) -> Vec<PathBuf> {
    raw.map(|value| {
        std::env::split_paths(value)
            .filter(|entry| !entry.as_os_str().is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Check whether `dir` is one of the entries of `search_path`.
///
/// Comparison is component-wise, so `/opt/bin/` matches `/opt/bin`.
pub fn contains_dir(search_path: &[PathBuf], dir: &Path) -> bool {
    search_path.iter().any(|entry| entry == dir)
}

/// Build a `PATH` value with `dir` in front of `search_path`.
///
/// `dir` is not added twice when it is already present. Returns `None`
/// when an entry contains the path separator and cannot be joined.
pub fn prepend_dir(dir: &Path, search_path: &[PathBuf]) -> Option<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    entries.extend(search_path.iter().filter(|entry| *entry != dir).cloned());
    std::env::join_paths(&entries).ok()
}

/// Put `dir` at the front of this process's `PATH`.
pub fn prepend_to_process_path(dir: &Path) {
    let current = parse_search_path(std::env::var_os("PATH").as_deref());
    match prepend_dir(dir, &current) {
        Some(value) => std::env::set_var("PATH", value),
        None => tracing::warn!(dir = %dir.display(), "Cannot add directory to PATH"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preserves_order() {
        let parsed = parse_search_path(Some(OsStr::new("/usr/local/bin:/usr/bin:/bin")));
        assert_eq!(
            parsed,
            vec![
                PathBuf::from("/usr/local/bin"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/bin"),
            ]
        );
    }

    #[test]
    fn parse_drops_empty_entries() {
        let parsed = parse_search_path(Some(OsStr::new("/usr/bin::/bin:")));
        assert_eq!(parsed, vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
    }

    #[test]
    fn parse_missing_path_is_empty() {
        assert!(parse_search_path(None).is_empty());
    }

    #[test]
    fn contains_dir_ignores_trailing_slash() {
        let path = vec![PathBuf::from("/home/u/.local/bin/")];
        assert!(contains_dir(&path, Path::new("/home/u/.local/bin")));
        assert!(!contains_dir(&path, Path::new("/home/u/bin")));
    }

    #[test]
    fn prepend_puts_dir_first_without_duplicates() {
        let path = vec![PathBuf::from("/usr/bin"), PathBuf::from("/opt/vole/bin")];
        let joined = prepend_dir(Path::new("/opt/vole/bin"), &path);
        assert_eq!(joined, Some(OsString::from("/opt/vole/bin:/usr/bin")));
    }

    #[cfg(unix)]
    #[test]
    fn prepend_refuses_dir_with_separator() {
        let path = vec![PathBuf::from("/usr/bin")];
        assert_eq!(prepend_dir(Path::new("/opt/a:b"), &path), None);
    }
}
