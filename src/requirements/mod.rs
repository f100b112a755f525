//! Build toolchain detection and provisioning.
//!
//! - [`probe`] resolves command names on a search path
//! - [`status`] tracks what is known about the toolchain
//! - [`installer`] installs cargo when it is missing

pub mod installer;
pub mod probe;
pub mod status;

pub use installer::{select_plan, InstallerContext, ProvisionPlan, ToolchainProvisioner};
pub use probe::CommandProbe;
pub use status::{ProvisionMethod, ToolchainPhase, ToolchainState};
