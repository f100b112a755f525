//! PATH registration in shell profile files.
//!
//! Each profile gets at most one block, introduced by [`MARKER`]. The
//! marker is the only thing checked: a file that already contains it is
//! left alone even if its block names a different directory.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::Result;
use crate::shell::platform::{ShellFamily, ShellInfo};
use crate::ui::UserInterface;

/// Line written immediately before every installer block.
pub const MARKER: &str = "# Added by vole installer";

/// One profile file and the syntax it is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub path: PathBuf,
    pub family: ShellFamily,
}

impl ProfileEntry {
    pub fn new(path: impl Into<PathBuf>, family: ShellFamily) -> Self {
        Self {
            path: path.into(),
            family,
        }
    }

    /// Entries for every profile file of `shell`.
    pub fn for_shell(shell: &ShellInfo) -> Vec<Self> {
        shell
            .config_files
            .iter()
            .map(|path| Self::new(path, shell.family()))
            .collect()
    }
}

/// What `register` did to a profile file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// A new block was written.
    Appended,
    /// The marker was already present; the file was not touched.
    AlreadyRegistered,
}

/// Appends PATH blocks to profile files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileRegistrar;

impl ProfileRegistrar {
    pub fn new() -> Self {
        Self
    }

    /// Register `bin_dir` in every entry, once per distinct path.
    pub fn register(
        &self,
        bin_dir: &Path,
        entries: &[ProfileEntry],
        ui: &mut dyn UserInterface,
    ) -> Result<Vec<(ProfileEntry, ProfileOutcome)>> {
        let mut seen = HashSet::new();
        let mut outcomes = Vec::new();

        for entry in entries {
            if !seen.insert(entry.path.clone()) {
                continue;
            }
            let outcome = self.register_one(bin_dir, entry)?;
            match outcome {
                ProfileOutcome::Appended => {
                    ui.success(&format!(
                        "Added {} to PATH in {}",
                        bin_dir.display(),
                        entry.path.display()
                    ));
                }
                ProfileOutcome::AlreadyRegistered => {
                    ui.message(&format!("{} already configured", entry.path.display()));
                }
            }
            outcomes.push((entry.clone(), outcome));
        }

        Ok(outcomes)
    }

    fn register_one(&self, bin_dir: &Path, entry: &ProfileEntry) -> Result<ProfileOutcome> {
        let path = &entry.path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let existing = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to read {}", path.display()))
                    .into())
            }
        };

        if existing.contains(MARKER) {
            tracing::debug!(profile = %path.display(), "Marker present, skipping");
            return Ok(ProfileOutcome::AlreadyRegistered);
        }

        let mut text = String::new();
        if !existing.is_empty() {
            if !existing.ends_with('\n') {
                text.push('\n');
            }
            text.push('\n');
        }
        text.push_str(&render_block(bin_dir, entry.family));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(
            profile = %path.display(),
            bin_dir = %bin_dir.display(),
            "Appended PATH block"
        );
        Ok(ProfileOutcome::Appended)
    }
}

/// Render the marker plus a guarded PATH prepend for `family`.
pub fn render_block(bin_dir: &Path, family: ShellFamily) -> String {
    let dir = bin_dir.to_string_lossy();
    match family {
        ShellFamily::Posix => {
            let dir = escape_posix(&dir);
            format!(
                "{MARKER}\ncase \":${{PATH}}:\" in\n    *:\"{dir}\":*) ;;\n    *) export PATH=\"{dir}:$PATH\" ;;\nesac\n"
            )
        }
        ShellFamily::Fish => {
            let dir = escape_fish(&dir);
            format!(
                "{MARKER}\nif not contains -- \"{dir}\" $PATH\n    set -gx PATH \"{dir}\" $PATH\nend\n"
            )
        }
    }
}

/// Escape for a POSIX double-quoted string.
fn escape_posix(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape for a fish double-quoted string.
fn escape_fish(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn posix(path: PathBuf) -> ProfileEntry {
        ProfileEntry::new(path, ShellFamily::Posix)
    }

    #[test]
    fn posix_block() {
        let block = render_block(Path::new("/home/ada/.local/bin"), ShellFamily::Posix);
        insta::assert_snapshot!(block, @r#"
        # Added by vole installer
        case ":${PATH}:" in
            *:"/home/ada/.local/bin":*) ;;
            *) export PATH="/home/ada/.local/bin:$PATH" ;;
        esac
        "#);
    }

    #[test]
    fn fish_block() {
        let block = render_block(Path::new("/home/ada/.local/bin"), ShellFamily::Fish);
        insta::assert_snapshot!(block, @r#"
        # Added by vole installer
        if not contains -- "/home/ada/.local/bin" $PATH
            set -gx PATH "/home/ada/.local/bin" $PATH
        end
        "#);
    }

    #[test]
    fn escapes_special_characters() {
        let block = render_block(Path::new("/opt/a \"b\"/$x"), ShellFamily::Posix);
        assert!(block.contains(r#"*:"/opt/a \"b\"/\$x":*"#));

        let block = render_block(Path::new("/opt/$y"), ShellFamily::Fish);
        assert!(block.contains(r#"contains -- "/opt/\$y" $PATH"#));
    }

    #[test]
    fn creates_missing_file_and_parents() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join(".config/fish/config.fish");
        let mut ui = MockUI::new();

        let outcomes = ProfileRegistrar::new()
            .register(
                Path::new("/b"),
                &[ProfileEntry::new(&profile, ShellFamily::Fish)],
                &mut ui,
            )
            .unwrap();

        assert_eq!(outcomes[0].1, ProfileOutcome::Appended);
        let content = fs::read_to_string(&profile).unwrap();
        assert!(content.starts_with(MARKER));
        assert!(content.contains("set -gx PATH \"/b\" $PATH"));
    }

    #[test]
    fn second_run_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join(".bashrc");
        let registrar = ProfileRegistrar::new();
        let mut ui = MockUI::new();
        let entries = [posix(profile.clone())];

        registrar.register(Path::new("/b"), &entries, &mut ui).unwrap();
        let once = fs::read(&profile).unwrap();
        let outcomes = registrar.register(Path::new("/b"), &entries, &mut ui).unwrap();
        let twice = fs::read(&profile).unwrap();

        assert_eq!(once, twice);
        assert_eq!(outcomes[0].1, ProfileOutcome::AlreadyRegistered);
        assert_eq!(String::from_utf8(twice).unwrap().matches(MARKER).count(), 1);
    }

    #[test]
    fn marker_blocks_further_edits_even_for_other_dir() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join(".profile");
        let original = format!("export EDITOR=vi\n{}\n# hand edited\n", MARKER);
        fs::write(&profile, &original).unwrap();
        let mut ui = MockUI::new();

        let outcomes = ProfileRegistrar::new()
            .register(Path::new("/somewhere/else"), &[posix(profile.clone())], &mut ui)
            .unwrap();

        assert_eq!(outcomes[0].1, ProfileOutcome::AlreadyRegistered);
        assert_eq!(fs::read_to_string(&profile).unwrap(), original);
    }

    #[test]
    fn separates_block_from_existing_content() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join(".zshrc");
        fs::write(&profile, "alias ll='ls -l'").unwrap();
        let mut ui = MockUI::new();

        ProfileRegistrar::new()
            .register(Path::new("/b"), &[posix(profile.clone())], &mut ui)
            .unwrap();

        let content = fs::read_to_string(&profile).unwrap();
        assert!(content.starts_with(&format!("alias ll='ls -l'\n\n{}", MARKER)));
    }

    #[test]
    fn duplicate_paths_registered_once() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join(".profile");
        let mut ui = MockUI::new();

        let outcomes = ProfileRegistrar::new()
            .register(
                Path::new("/b"),
                &[posix(profile.clone()), posix(profile.clone())],
                &mut ui,
            )
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(fs::read_to_string(&profile).unwrap().matches(MARKER).count(), 1);
    }

    #[test]
    fn registers_every_profile_of_a_shell() {
        let temp = TempDir::new().unwrap();
        let entries = [
            posix(temp.path().join(".bashrc")),
            posix(temp.path().join(".profile")),
        ];
        let mut ui = MockUI::new();

        let outcomes = ProfileRegistrar::new()
            .register(Path::new("/b"), &entries, &mut ui)
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|(_, outcome)| *outcome == ProfileOutcome::Appended));
        assert_eq!(ui.successes().len(), 2);
    }
}
