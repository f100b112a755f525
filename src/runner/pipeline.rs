//! The install pipeline.
//!
//! Stages run in a fixed order and each one no-ops when its postcondition
//! already holds:
//!
//! 1. ensure the build tool is present
//! 2. resolve the install directory
//! 3. build and deploy the binary
//! 4. register the directory in the shell's profile files
//! 5. reconcile the current session with the new PATH
//!
//! The first failing stage stops the run.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::InstallConfig;
use crate::environment::HostEnvironment;
use crate::error::Result;
use crate::install::{ArtifactBuilder, InstallTarget};
use crate::requirements::installer::toolchain_version;
use crate::requirements::{InstallerContext, ToolchainProvisioner, ToolchainState};
use crate::shell::{
    detect_shell, ProfileEntry, ProfileOutcome, ProfileRegistrar, ReloadContext, ReloadOutcome,
    SessionReloader,
};
use crate::ui::UserInterface;

/// What a successful run did.
#[derive(Debug)]
pub struct InstallReport {
    /// Final toolchain state.
    pub toolchain: ToolchainState,
    /// Where the binary went.
    pub target: InstallTarget,
    /// Path of the deployed binary.
    pub deployed: PathBuf,
    /// One outcome per distinct profile file.
    pub profiles: Vec<(ProfileEntry, ProfileOutcome)>,
    /// What happened to the current session.
    pub reload: ReloadOutcome,
    /// Total duration.
    pub duration: Duration,
}

impl InstallReport {
    /// Number of profile files that received a new block.
    pub fn profiles_appended(&self) -> usize {
        self.profiles
            .iter()
            .filter(|(_, outcome)| *outcome == ProfileOutcome::Appended)
            .count()
    }
}

/// Runs every install stage against one host snapshot.
pub struct Installer<'a> {
    host: &'a HostEnvironment,
    config: &'a InstallConfig,
    toolchain_ctx: &'a InstallerContext<'a>,
    reload_ctx: &'a ReloadContext<'a>,
}

impl<'a> Installer<'a> {
    pub fn new(
        host: &'a HostEnvironment,
        config: &'a InstallConfig,
        toolchain_ctx: &'a InstallerContext<'a>,
        reload_ctx: &'a ReloadContext<'a>,
    ) -> Self {
        Self {
            host,
            config,
            toolchain_ctx,
            reload_ctx,
        }
    }

    /// Run the pipeline.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<InstallReport> {
        let start = Instant::now();
        ui.show_header(&format!("Installing {}", self.config.binary_name));

        let toolchain = ToolchainProvisioner::new(self.host, self.toolchain_ctx)
            .ensure(&self.config.build_tool, ui)?;
        if toolchain.was_provisioned() {
            if let Some(method) = &toolchain.method {
                ui.success(&format!("Installed {} with {}", toolchain.command, method));
            }
        }
        let build_tool = toolchain.invocation();
        match toolchain_version(&build_tool) {
            Some(version) => ui.message(&format!("Using {} {}", toolchain.command, version)),
            None => ui.message(&format!("Using {}", build_tool.display())),
        }

        let target = InstallTarget::resolve(
            self.config.bin_dir.as_deref(),
            self.config.prefix.as_deref(),
            &self.config.binary_name,
            self.host,
        );
        tracing::debug!(?target, "Resolved install target");
        target.validate()?;

        let builder = ArtifactBuilder::new(
            build_tool,
            &self.config.project_root,
            self.config.resolved_target_dir(),
            &self.config.binary_name,
        );
        let artifact = builder.build(ui)?;
        let deployed = builder.deploy(&artifact, &target.bin_dir, ui)?;

        let shell = detect_shell(self.host);
        tracing::debug!(?shell, "Detected shell");
        let entries = ProfileEntry::for_shell(&shell);
        let profiles = ProfileRegistrar::new().register(&target.bin_dir, &entries, ui)?;

        let reload = SessionReloader::new(self.host, self.reload_ctx, &self.config.binary_name)
            .reconcile(&target.bin_dir, &self.host.search_path, ui);

        ui.success(&format!(
            "{} installed to {}",
            self.config.binary_name,
            deployed.display()
        ));

        Ok(InstallReport {
            toolchain,
            target,
            deployed,
            profiles,
            reload,
            duration: start.elapsed(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::error::InstallerError;
    use crate::requirements::ProvisionMethod;
    use crate::shell::command::Invocation;
    use crate::shell::MARKER;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_script(path: &Path, body: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    struct Fixture {
        temp: TempDir,
        host: HostEnvironment,
        config: InstallConfig,
    }

    /// A host with a fake cargo on its search path and a home holding
    /// only an empty `~/.local/bin`.
    fn fixture(shell: &str, cli: Cli, extra_tools: &[&str]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let tools = temp.path().join("tools");
        let project = temp.path().join("project");
        fs::create_dir_all(home.join(".local/bin")).unwrap();
        fs::create_dir_all(project.join("target/release")).unwrap();
        create_script(
            &tools.join("cargo"),
            "if [ \"$1\" = build ]; then printf 'vole' > target/release/vole; else echo 'cargo 1.82.0'; fi",
        );
        for tool in extra_tools {
            create_script(&tools.join(tool), "exit 0");
        }

        let host = HostEnvironment::new(home, vec![tools])
            .with_shell(shell)
            .with_cwd(temp.path());
        let config = InstallConfig::from_args_with_env(&cli, temp.path(), |key: &str| {
            if key == "VOLE_PROJECT_ROOT" {
                Ok(project.to_string_lossy().into_owned())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        });
        Fixture { temp, host, config }
    }

    fn toolchain_ctx<'a>(
        run: &'a dyn Fn(&Invocation) -> Result<Option<i32>>,
    ) -> InstallerContext<'a> {
        InstallerContext {
            run_command: run,
            refresh_search_path: &|| Vec::new(),
            prepend_path: &|_| {},
        }
    }

    #[test]
    fn fresh_host_installs_and_registers_once() {
        let fx = fixture("/bin/bash", Cli::default(), &["apt-get", "sudo"]);
        let run = |_: &Invocation| -> Result<Option<i32>> { panic!("cargo is present") };
        let tctx = toolchain_ctx(&run);
        let rctx = ReloadContext {
            exec_login_shell: &|_| panic!("not interactive"),
            prepend_path: &|_| {},
        };
        let mut ui = MockUI::new();

        let report = Installer::new(&fx.host, &fx.config, &tctx, &rctx)
            .run(&mut ui)
            .unwrap();

        let local_bin = fx.host.home.join(".local/bin");
        assert_eq!(report.target.bin_dir, local_bin);
        assert_eq!(report.deployed, local_bin.join("vole"));
        assert_eq!(fs::read_to_string(&report.deployed).unwrap(), "vole");
        assert_eq!(report.toolchain.method, Some(ProvisionMethod::AlreadyPresent));
        assert_eq!(report.profiles_appended(), 2);
        let bashrc = fs::read_to_string(fx.host.home.join(".bashrc")).unwrap();
        assert_eq!(bashrc.matches(MARKER).count(), 1);
        assert!(matches!(report.reload, ReloadOutcome::ManualReload { .. }));
        assert!(ui.has_message("Using cargo 1.82.0"));
    }

    #[test]
    fn bash_without_bash_profile_registers_in_profile() {
        let fx = fixture("/bin/bash", Cli::default(), &[]);
        let dot_profile = fx.host.home.join(".profile");
        let original = "export IMPORTANT=1\n. \"$HOME/.bashrc\"\n";
        fs::write(&dot_profile, original).unwrap();
        let run = |_: &Invocation| -> Result<Option<i32>> { Ok(Some(0)) };
        let tctx = toolchain_ctx(&run);
        let rctx = ReloadContext {
            exec_login_shell: &|_| panic!("not interactive"),
            prepend_path: &|_| {},
        };

        let report = Installer::new(&fx.host, &fx.config, &tctx, &rctx)
            .run(&mut MockUI::new())
            .unwrap();

        assert!(!fx.host.home.join(".bash_profile").exists());
        let content = fs::read_to_string(&dot_profile).unwrap();
        assert!(content.starts_with(original));
        assert_eq!(content.matches(MARKER).count(), 1);
        assert_eq!(report.profiles_appended(), 2);
    }

    #[test]
    fn rerun_leaves_profiles_untouched() {
        let fx = fixture("/usr/bin/zsh", Cli::default(), &[]);
        let run = |_: &Invocation| -> Result<Option<i32>> { Ok(Some(0)) };
        let tctx = toolchain_ctx(&run);
        let rctx = ReloadContext {
            exec_login_shell: &|_| panic!("not interactive"),
            prepend_path: &|_| {},
        };

        let installer = Installer::new(&fx.host, &fx.config, &tctx, &rctx);
        installer.run(&mut MockUI::new()).unwrap();
        let before = fs::read(fx.host.home.join(".zshrc")).unwrap();
        let report = installer.run(&mut MockUI::new()).unwrap();
        let after = fs::read(fx.host.home.join(".zshrc")).unwrap();

        assert_eq!(before, after);
        assert_eq!(report.profiles_appended(), 0);
    }

    #[test]
    fn bin_dir_on_path_skips_reload_but_still_registers() {
        let custom = TempDir::new().unwrap();
        let cli = Cli {
            prefix: None,
            bin_dir: Some(custom.path().to_path_buf()),
        };
        let mut fx = fixture("/usr/bin/fish", cli, &[]);
        fx.host.search_path.push(custom.path().to_path_buf());
        let run = |_: &Invocation| -> Result<Option<i32>> { Ok(Some(0)) };
        let tctx = toolchain_ctx(&run);
        let prepended = RefCell::new(0);
        let prepend = |_: &Path| *prepended.borrow_mut() += 1;
        let rctx = ReloadContext {
            exec_login_shell: &|_| panic!("already on PATH"),
            prepend_path: &prepend,
        };
        let mut ui = MockUI::new();

        let report = Installer::new(&fx.host, &fx.config, &tctx, &rctx)
            .run(&mut ui)
            .unwrap();

        assert_eq!(report.reload, ReloadOutcome::AlreadyOnPath);
        assert_eq!(*prepended.borrow(), 0);
        assert!(custom.path().join("vole").is_file());
        let config_fish = fx.host.home.join(".config/fish/config.fish");
        assert!(fs::read_to_string(config_fish).unwrap().contains(MARKER));
    }

    #[test]
    fn missing_toolchain_is_provisioned_then_used() {
        let fx = fixture("/bin/bash", Cli::default(), &["apt-get", "sudo"]);
        let cargo = fx.temp.path().join("tools/cargo");
        let script = fs::read_to_string(&cargo).unwrap();
        fs::remove_file(&cargo).unwrap();
        let calls = RefCell::new(Vec::new());
        let run = |inv: &Invocation| -> Result<Option<i32>> {
            calls.borrow_mut().push(inv.to_string());
            fs::write(&cargo, &script).unwrap();
            fs::set_permissions(&cargo, fs::Permissions::from_mode(0o755)).unwrap();
            Ok(Some(0))
        };
        let tctx = toolchain_ctx(&run);
        let rctx = ReloadContext {
            exec_login_shell: &|_| panic!("not interactive"),
            prepend_path: &|_| {},
        };
        let mut ui = MockUI::new();

        let report = Installer::new(&fx.host, &fx.config, &tctx, &rctx)
            .run(&mut ui)
            .unwrap();

        assert_eq!(calls.borrow().len(), 2);
        assert!(report.toolchain.was_provisioned());
        assert!(ui.has_success("Installed cargo with apt-get"));
        assert!(fx.host.home.join(".local/bin/vole").is_file());
    }

    #[test]
    fn missing_toolchain_without_install_method_changes_nothing() {
        let fx = fixture("/bin/bash", Cli::default(), &[]);
        fs::remove_file(fx.temp.path().join("tools/cargo")).unwrap();
        let run = |_: &Invocation| -> Result<Option<i32>> { panic!("nothing to run") };
        let tctx = toolchain_ctx(&run);
        let rctx = ReloadContext {
            exec_login_shell: &|_| panic!("never reached"),
            prepend_path: &|_| {},
        };
        let mut ui = MockUI::new();

        let err = Installer::new(&fx.host, &fx.config, &tctx, &rctx)
            .run(&mut ui)
            .unwrap_err();

        assert!(matches!(err, InstallerError::NoInstallMethod { .. }));
        assert!(!fx.host.home.join(".local/bin/vole").exists());
        assert!(!fx.host.home.join(".bashrc").exists());
    }

    #[test]
    fn build_failure_stops_before_deploy() {
        let fx = fixture("/bin/bash", Cli::default(), &[]);
        create_script(&fx.temp.path().join("tools/cargo"), "exit 1");
        let run = |_: &Invocation| -> Result<Option<i32>> { Ok(Some(0)) };
        let tctx = toolchain_ctx(&run);
        let rctx = ReloadContext {
            exec_login_shell: &|_| panic!("never reached"),
            prepend_path: &|_| {},
        };

        let err = Installer::new(&fx.host, &fx.config, &tctx, &rctx)
            .run(&mut MockUI::new())
            .unwrap_err();

        assert!(matches!(err, InstallerError::BuildFailed { code: Some(1) }));
        assert!(!fx.host.home.join(".local/bin/vole").exists());
        assert!(!fx.host.home.join(".bashrc").exists());
    }
}
