//! Install orchestration.

pub mod pipeline;

pub use pipeline::{InstallReport, Installer};
