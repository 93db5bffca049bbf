//! CLI commands for dill-setup
//!
//! - **build**: regenerate metadata and delegate to the build tool
//! - **generate**: regenerate metadata only
//! - **version**: print the resolved version
//!
//! All commands accept `&SetupContext` so configuration is loaded once.

pub mod build;
pub mod generate;
pub mod version;

pub use build::run_build;
pub use generate::run_generate;
pub use version::run_version;
