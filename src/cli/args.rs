//! CLI argument definitions.
//!
//! The installer has a single entry point with two optional flags. The
//! main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

/// Build vole from source and install it onto your PATH.
///
/// Installs cargo first when it is missing, then wires the install
/// directory into your shell's profile files.
#[derive(Debug, Default, Parser)]
#[command(name = "vole-installer")]
#[command(author, version, about, long_about = None)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Install under PATH/bin
    #[arg(long, value_name = "PATH")]
    pub prefix: Option<PathBuf>,

    /// Install directly into PATH (takes precedence over --prefix)
    #[arg(long, value_name = "PATH")]
    pub bin_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn no_flags() {
        let cli = Cli::try_parse_from(["vole-installer"]).unwrap();
        assert!(cli.prefix.is_none());
        assert!(cli.bin_dir.is_none());
    }

    #[test]
    fn parses_both_flags() {
        let cli =
            Cli::try_parse_from(["vole-installer", "--prefix", "/b", "--bin-dir", "/a"]).unwrap();
        assert_eq!(cli.prefix, Some(PathBuf::from("/b")));
        assert_eq!(cli.bin_dir, Some(PathBuf::from("/a")));
    }

    #[test]
    fn repeated_flag_takes_last_value() {
        let cli = Cli::try_parse_from(["vole-installer", "--prefix", "/one", "--prefix", "/two"])
            .unwrap();
        assert_eq!(cli.prefix, Some(PathBuf::from("/two")));
    }

    #[test]
    fn missing_value_is_usage_error() {
        let err = Cli::try_parse_from(["vole-installer", "--bin-dir"]).unwrap_err();
        assert_ne!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        let err = Cli::try_parse_from(["vole-installer", "--frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn help_is_not_a_failure() {
        let err = Cli::try_parse_from(["vole-installer", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
