//! vole-installer entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vole_installer::cli::Cli;
use vole_installer::config::InstallConfig;
use vole_installer::environment::HostEnvironment;
use vole_installer::requirements::installer;
use vole_installer::runner::Installer;
use vole_installer::shell::refresh;
use vole_installer::ui::{should_use_colors, TerminalUI, UserInterface};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by `RUST_LOG`; the default only shows
/// warnings. Logs go to stderr so stdout carries progress alone.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vole_installer=warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    tracing::debug!("vole-installer starting with args: {:?}", cli);

    let host = match HostEnvironment::capture() {
        Ok(host) => host,
        Err(e) => {
            TerminalUI::new(false).error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let config = InstallConfig::from_args(&cli, &host.cwd);
    let mut ui = TerminalUI::new(should_use_colors(config.no_color));

    let toolchain_ctx = installer::default_context();
    let reload_ctx = refresh::default_context();
    let pipeline = Installer::new(&host, &config, &toolchain_ctx, &reload_ctx);

    match pipeline.run(&mut ui) {
        Ok(report) => {
            tracing::debug!(?report, "Install finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
