//! Integration tests for dill-setup
//!
//! Each test runs the real binary against a scratch project whose build tool
//! is a shell one-liner, so no Python toolchain is needed.

#![cfg(unix)]

mod helpers;
mod test_build;
mod test_version;
