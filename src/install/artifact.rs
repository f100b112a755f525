//! Building and deploying the vole binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::{InstallerError, Result};
use crate::shell::command::{run_inherited, Invocation};
use crate::ui::UserInterface;

/// Runs the release build and copies the result into place.
#[derive(Debug, Clone)]
pub struct ArtifactBuilder {
    build_tool: PathBuf,
    project_root: PathBuf,
    target_dir: PathBuf,
    binary_name: String,
}

impl ArtifactBuilder {
    /// Create a builder.
    ///
    /// `target_dir` is cargo's target directory; the artifact is expected
    /// at `<target_dir>/release/<binary_name>`.
    pub fn new(
        build_tool: impl Into<PathBuf>,
        project_root: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        binary_name: impl Into<String>,
    ) -> Self {
        Self {
            build_tool: build_tool.into(),
            project_root: project_root.into(),
            target_dir: target_dir.into(),
            binary_name: binary_name.into(),
        }
    }

    /// Where a successful build leaves the binary.
    pub fn artifact_path(&self) -> PathBuf {
        self.target_dir.join("release").join(&self.binary_name)
    }

    /// The build command.
    pub fn build_invocation(&self) -> Invocation {
        Invocation::new(&self.build_tool)
            .args(["build", "--release"])
            .current_dir(&self.project_root)
    }

    /// Run `<build tool> build --release` in the project root.
    pub fn build(&self, ui: &mut dyn UserInterface) -> Result<PathBuf> {
        ui.message(&format!(
            "Building {} (release) in {}",
            self.binary_name,
            self.project_root.display()
        ));

        let result = run_inherited(&self.build_invocation())?;
        if !result.success {
            return Err(InstallerError::BuildFailed {
                code: result.exit_code,
            });
        }

        let artifact = self.artifact_path();
        if !artifact.is_file() {
            return Err(InstallerError::ArtifactMissing { path: artifact });
        }

        tracing::info!(
            artifact = %artifact.display(),
            duration = ?result.duration,
            "Build finished"
        );
        ui.success(&format!("Built {}", artifact.display()));
        Ok(artifact)
    }

    /// Copy `artifact` to `bin_dir/<binary_name>` with mode 0755.
    ///
    /// The copy lands in a temporary sibling first and is renamed into
    /// place, so the final name never holds a partial binary.
    pub fn deploy(
        &self,
        artifact: &Path,
        bin_dir: &Path,
        ui: &mut dyn UserInterface,
    ) -> Result<PathBuf> {
        let destination = bin_dir.join(&self.binary_name);
        ui.message(&format!("Installing {} to {}", self.binary_name, bin_dir.display()));

        fs::create_dir_all(bin_dir)
            .with_context(|| format!("Failed to create {}", bin_dir.display()))?;

        let staging = bin_dir.join(format!(".{}.tmp-{}", self.binary_name, std::process::id()));
        if let Err(e) = stage_and_swap(artifact, &staging, &destination) {
            fs::remove_file(&staging).ok();
            return Err(e);
        }

        tracing::info!(destination = %destination.display(), "Deployed binary");
        ui.success(&format!("Installed {}", destination.display()));
        Ok(destination)
    }
}

fn stage_and_swap(artifact: &Path, staging: &Path, destination: &Path) -> Result<()> {
    fs::copy(artifact, staging).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            artifact.display(),
            staging.display()
        )
    })?;
    set_executable(staging)?;
    fs::rename(staging, destination)
        .with_context(|| format!("Failed to move binary into {}", destination.display()))?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
