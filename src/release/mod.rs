//! Release version resolution
//!
//! Produces the single authoritative version string for a build from the
//! `[release]` config, an optional generated module left by an earlier build,
//! and the current date.
//!
//! # Example setup.toml
//!
//! ```toml
//! [release]
//! stable_version = "0.1a1"
//! target_version = "0.2a"
//! is_release = false   # "0.2a.dev"; true gives "0.2a.dev-YYYYMMDD"
//! ```

pub mod resolver;
pub mod state;

pub use resolver::{resolve, today};
pub use state::ReleaseState;
