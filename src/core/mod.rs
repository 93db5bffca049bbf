//! Core building blocks shared by every dill-setup command
//!
//! - **config**: setup.toml parsing, defaults and validation
//! - **context**: project root + config, built once per invocation
//! - **error**: error types with contextual help and exit codes

pub mod config;
pub mod context;
pub mod error;
