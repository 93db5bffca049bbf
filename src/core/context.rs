//! Unified setup context - build once, pass everywhere
//!
//! `SetupContext` holds the project root and the loaded configuration. It is
//! built once in main.rs and passed by reference to every command, so no
//! component reads version constants from ambient state.

use crate::core::config::SetupConfig;
use crate::core::error::{SetupError, SetupResult};
use std::path::{Path, PathBuf};

/// Shared project-level data for one invocation
#[derive(Debug, Clone)]
pub struct SetupContext {
  /// Project root directory (all configured paths are relative to it)
  pub root: PathBuf,

  /// Loaded configuration (defaults when no setup.toml exists)
  pub config: SetupConfig,
}

impl SetupContext {
  /// Build the context for a project root
  pub fn build(root: &Path) -> SetupResult<Self> {
    if !root.is_dir() {
      return Err(SetupError::with_help(
        format!("Project root {} is not a directory", root.display()),
        "Pass --root <dir> pointing at the package source tree",
      ));
    }
    let config = SetupConfig::load(root)?;
    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  /// Resolve a configured path against the project root
  pub fn path(&self, relative: &Path) -> PathBuf {
    self.root.join(relative)
  }

  pub fn license_path(&self) -> PathBuf {
    self.path(&self.config.paths.license)
  }

  pub fn readme_path(&self) -> PathBuf {
    self.path(&self.config.paths.readme)
  }

  pub fn info_module_path(&self) -> PathBuf {
    self.path(&self.config.paths.info_module)
  }

  pub fn template_path(&self) -> Option<PathBuf> {
    self.config.paths.template.as_deref().map(|p| self.path(p))
  }
}
