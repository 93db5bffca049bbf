//! Build tool delegation
//!
//! - **params**: the `BuildParameters` record
//! - **capability**: host capability flags and the optional-capability probe
//! - **tool**: `BuildTool` trait with command-backed and dry-run tools
//! - **invoker**: the assemble → delegate → probe → warn sequence

pub mod capability;
pub mod invoker;
pub mod params;
pub mod tool;

pub use capability::SystemHost;
pub use invoker::BuildInvoker;
pub use tool::{BuildTool, CommandBuildTool, DryRunTool};
