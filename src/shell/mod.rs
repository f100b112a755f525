//! Shell command execution, shell detection and PATH wiring.

pub mod command;
pub mod platform;
pub mod profile;
pub mod refresh;

pub use command::{execute, run_inherited, CommandOptions, CommandResult, Invocation};
pub use platform::{detect_shell, ShellFamily, ShellInfo, ShellType};
pub use profile::{render_block, ProfileEntry, ProfileOutcome, ProfileRegistrar, MARKER};
pub use refresh::{reload_instruction, ReloadContext, ReloadOutcome, SessionReloader};
