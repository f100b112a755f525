//! Installing the built binary.
//!
//! # Modules
//!
//! - [`dir`] - Choosing the destination directory
//! - [`artifact`] - Building the binary and deploying it

pub mod artifact;
pub mod dir;

pub use artifact::ArtifactBuilder;
pub use dir::{is_writable, resolve_bin_dir, InstallTarget};
