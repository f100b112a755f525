//! Build toolchain provisioning.
//!
//! When cargo is missing, exactly one install method is chosen from a
//! priority-ordered table: the first system package manager found on the
//! search path, else the rustup network installer via the first available
//! fetcher. Methods are never tried one after another; a failing method
//! fails the run.

use std::path::{Path, PathBuf};

use crate::environment::{contains_dir, prepend_to_process_path, HostEnvironment};
use crate::error::{InstallerError, Result};
use crate::requirements::probe::{is_executable, CommandProbe};
use crate::requirements::status::{ProvisionMethod, ToolchainPhase, ToolchainState};
use crate::shell::command::{execute, run_inherited, CommandOptions, Invocation};
use crate::ui::UserInterface;

/// A system package manager able to install cargo.
#[derive(Debug)]
pub struct ManagerDef {
    /// Executable probed on the search path.
    pub name: &'static str,
    /// Commands run in order, each elevated.
    pub steps: &'static [&'static [&'static str]],
}

/// A fetcher able to download the rustup installer.
#[derive(Debug)]
pub struct FetcherDef {
    /// Executable probed on the search path.
    pub name: &'static str,
    /// Arguments that write `RUSTUP_URL` to stdout.
    pub args: &'static [&'static str],
}

/// Known package managers, highest priority first.
pub const PACKAGE_MANAGERS: &[ManagerDef] = &[
    ManagerDef {
        name: "apt-get",
        steps: &[&["apt-get", "update"], &["apt-get", "install", "-y", "cargo"]],
    },
    ManagerDef {
        name: "dnf",
        steps: &[&["dnf", "install", "-y", "cargo"]],
    },
    ManagerDef {
        name: "yum",
        steps: &[&["yum", "install", "-y", "cargo"]],
    },
    ManagerDef {
        name: "pacman",
        steps: &[&["pacman", "-S", "--needed", "--noconfirm", "rust"]],
    },
    ManagerDef {
        name: "zypper",
        steps: &[&["zypper", "--non-interactive", "install", "cargo"]],
    },
    ManagerDef {
        name: "apk",
        steps: &[&["apk", "add", "cargo"]],
    },
];

/// Known fetchers for the network installer, highest priority first.
pub const FETCHERS: &[FetcherDef] = &[
    FetcherDef {
        name: "curl",
        args: &["--proto", "=https", "--tlsv1.2", "-sSf"],
    },
    FetcherDef {
        name: "wget",
        args: &["--https-only", "-qO-"],
    },
];

/// Where the rustup installer script is served.
pub const RUSTUP_URL: &str = "https://sh.rustup.rs";

/// The one provisioning branch selected for this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionPlan {
    /// Install with a system package manager.
    PackageManager {
        /// Manager definition from [`PACKAGE_MANAGERS`].
        manager: &'static str,
        /// Commands to run.
        steps: Vec<Invocation>,
    },
    /// Pipe the rustup installer into `sh` with auto-confirmation.
    NetworkInstaller {
        /// Fetcher name from [`FETCHERS`].
        fetcher: &'static str,
        /// The single `sh -c` command.
        step: Invocation,
    },
}

impl ProvisionPlan {
    /// Commands this plan runs, in order.
    pub fn invocations(&self) -> Vec<&Invocation> {
        match self {
            Self::PackageManager { steps, .. } => steps.iter().collect(),
            Self::NetworkInstaller { step, .. } => vec![step],
        }
    }

    /// The method recorded once the plan succeeds.
    pub fn method(&self) -> ProvisionMethod {
        match self {
            Self::PackageManager { manager, .. } => ProvisionMethod::PackageManager {
                name: (*manager).to_string(),
            },
            Self::NetworkInstaller { fetcher, .. } => ProvisionMethod::NetworkInstaller {
                fetcher: (*fetcher).to_string(),
            },
        }
    }
}

/// Choose the provisioning branch for this host.
///
/// The first package manager found wins outright: if it needs elevation
/// and none is available, this fails with `ElevationRequired` rather
/// than trying the next manager.
pub fn select_plan(
    probe: &CommandProbe,
    host: &HostEnvironment,
    tool: &str,
) -> Result<ProvisionPlan> {
    if let Some(manager) = PACKAGE_MANAGERS.iter().find(|m| probe.is_available(m.name)) {
        let use_sudo = if host.is_root {
            false
        } else if probe.is_available("sudo") {
            true
        } else {
            return Err(InstallerError::ElevationRequired {
                manager: manager.name.to_string(),
            });
        };

        let steps = manager
            .steps
            .iter()
            .map(|step| {
                Invocation::new(step[0])
                    .args(step[1..].iter().copied())
                    .elevated(use_sudo)
            })
            .collect();

        tracing::debug!(manager = manager.name, use_sudo, "Selected package manager");
        return Ok(ProvisionPlan::PackageManager {
            manager: manager.name,
            steps,
        });
    }

    if let Some(fetcher) = FETCHERS.iter().find(|f| probe.is_available(f.name)) {
        let script = format!(
            "{} {} {} | sh -s -- -y",
            fetcher.name,
            fetcher.args.join(" "),
            RUSTUP_URL
        );
        tracing::debug!(fetcher = fetcher.name, "Selected network installer");
        return Ok(ProvisionPlan::NetworkInstaller {
            fetcher: fetcher.name,
            step: Invocation::new("/bin/sh").args(["-c".to_string(), script]),
        });
    }

    Err(InstallerError::NoInstallMethod {
        tool: tool.to_string(),
    })
}

/// Mockable dependencies for the provisioner.
pub struct InstallerContext<'a> {
    /// Run a command with inherited stdio, returning its exit code
    /// (None if killed by a signal).
    pub run_command: &'a dyn Fn(&Invocation) -> Result<Option<i32>>,
    /// Read the live search path.
    pub refresh_search_path: &'a dyn Fn() -> Vec<PathBuf>,
    /// Prepend a directory to the process PATH.
    pub prepend_path: &'a dyn Fn(&Path),
}

/// Build the default `InstallerContext` for production use.
pub fn default_context() -> InstallerContext<'static> {
    InstallerContext {
        run_command: &|invocation| run_inherited(invocation).map(|result| result.exit_code),
        refresh_search_path: &HostEnvironment::refreshed_search_path,
        prepend_path: &prepend_to_process_path,
    }
}

/// Ensures the build tool is present, installing it when it is not.
pub struct ToolchainProvisioner<'a> {
    host: &'a HostEnvironment,
    ctx: &'a InstallerContext<'a>,
}

impl<'a> ToolchainProvisioner<'a> {
    /// Create a provisioner for `host`.
    pub fn new(host: &'a HostEnvironment, ctx: &'a InstallerContext<'a>) -> Self {
        Self { host, ctx }
    }

    /// The location rustup installs `command` to.
    pub fn post_install_location(&self, command: &str) -> Option<PathBuf> {
        if command.contains('/') {
            None
        } else {
            Some(self.host.cargo_home.join("bin").join(command))
        }
    }

    /// Make sure `command` is invocable, provisioning it if absent.
    pub fn ensure(&self, command: &str, ui: &mut dyn UserInterface) -> Result<ToolchainState> {
        let probe = CommandProbe::new(self.host.search_path.clone());

        if let Some(path) = probe.resolve(command) {
            tracing::debug!(command, path = %path.display(), "Toolchain present");
            return Ok(ToolchainState::present(command, path));
        }

        // No install makes an explicit path appear.
        if command.contains('/') {
            return Err(InstallerError::BuildToolNotFound {
                path: PathBuf::from(command),
            });
        }

        // A previous run may have installed rustup without the shell picking it up.
        if let Some(path) = self.existing_post_install(command) {
            ui.message(&format!(
                "Found {} at {} (not yet on PATH)",
                command,
                path.display()
            ));
            return Ok(ToolchainState::present(command, path));
        }

        let mut state = ToolchainState::absent(command);
        let plan = select_plan(&probe, self.host, command)?;
        let method = plan.method();

        ui.message(&format!("{} not found; installing with {}", command, method));
        state.phase = ToolchainPhase::Provisioning;

        for invocation in plan.invocations() {
            tracing::info!(command = %invocation, "Running toolchain install step");
            let code = (self.ctx.run_command)(invocation)?;
            if code != Some(0) {
                return Err(InstallerError::ProvisioningFailed {
                    method: method.to_string(),
                    code,
                });
            }
        }

        let path = self
            .resolve_after_install(command, &probe)
            .ok_or_else(|| InstallerError::PostInstallVerificationFailed {
                tool: command.to_string(),
            })?;

        state.phase = ToolchainPhase::Present;
        state.resolved_path = Some(path);
        state.method = Some(method);
        Ok(state)
    }

    fn existing_post_install(&self, command: &str) -> Option<PathBuf> {
        let path = self.post_install_location(command)?;
        if !is_executable(&path) {
            return None;
        }
        self.activate(&path);
        Some(path)
    }

    /// Re-resolve after an install: the known post-install location first,
    /// then the live search path, then the original one.
    fn resolve_after_install(&self, command: &str, original: &CommandProbe) -> Option<PathBuf> {
        if let Some(path) = self.existing_post_install(command) {
            return Some(path);
        }
        CommandProbe::new((self.ctx.refresh_search_path)())
            .resolve(command)
            .or_else(|| original.resolve(command))
    }

    /// Put the directory of a freshly installed tool on the process PATH.
    fn activate(&self, path: &Path) {
        let Some(dir) = path.parent() else {
            return;
        };
        if !contains_dir(&(self.ctx.refresh_search_path)(), dir) {
            tracing::debug!(dir = %dir.display(), "Adding toolchain directory to PATH");
            (self.ctx.prepend_path)(dir);
        }
    }
}

/// Report the version of the build tool, if it prints one.
pub fn toolchain_version(path: &Path) -> Option<String> {
    let result = execute(
        &Invocation::new(path).args(["--version"]),
        &CommandOptions::captured(),
    )
    .ok()?;
    if !result.success {
        return None;
    }
    extract_version(&result.stdout)
}

/// Extract a semantic version from command output.
fn extract_version(output: &str) -> Option<String> {
    let re = regex::Regex::new(r"(\d+\.\d+\.\d+)").ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
