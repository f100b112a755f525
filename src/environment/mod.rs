//! Host environment capture.
//!
//! Everything the installer learns about the machine it runs on is read
//! once into a [`HostEnvironment`] and threaded through the pipeline
//! stages as an argument.
//!
//! # Modules
//!
//! - [`host`] - The captured host snapshot
//! - [`search_path`] - Parsing and editing of the command search path

pub mod host;
pub mod search_path;

pub use host::{is_elevated, HostEnvironment};
pub use search_path::{contains_dir, parse_search_path, prepend_dir, prepend_to_process_path};
