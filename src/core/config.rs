use crate::core::error::{ConfigError, ResultExt, SetupResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for dill-setup
/// Searched in order: setup.toml, .setup.toml, .config/setup.toml
///
/// Every section is optional. A tree without any config file builds the
/// distribution with the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupConfig {
  #[serde(default)]
  pub release: ReleaseConfig,
  #[serde(default)]
  pub package: PackageConfig,
  #[serde(default)]
  pub paths: PathsConfig,
  #[serde(default)]
  pub runtime: RuntimeConfig,
  #[serde(default)]
  pub capability: CapabilityConfig,
  #[serde(default)]
  pub build_tool: BuildToolConfig,
}

/// Version facts for this build
///
/// ```toml
/// [release]
/// stable_version = "0.1a1"
/// target_version = "0.2a"
/// is_release = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
  /// Last published release identifier
  #[serde(default = "default_stable_version")]
  pub stable_version: String,

  /// Version under development
  #[serde(default = "default_target_version")]
  pub target_version: String,

  /// Final cut (dated snapshot) rather than a development snapshot
  #[serde(default)]
  pub is_release: bool,
}

fn default_stable_version() -> String {
  "0.1a1".to_string()
}

fn default_target_version() -> String {
  "0.2a".to_string()
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      stable_version: default_stable_version(),
      target_version: default_target_version(),
      is_release: false,
    }
  }
}

/// Static package identity handed to the build tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PackageConfig {
  pub name: String,
  pub description: String,
  pub author: String,
  pub maintainer: String,
  pub maintainer_email: String,
  pub license: String,
  pub url: String,
  pub platforms: Vec<String>,
  pub classifiers: Vec<String>,
  pub packages: Vec<String>,
  pub scripts: Vec<String>,
}

impl Default for PackageConfig {
  fn default() -> Self {
    Self {
      name: "dill".to_string(),
      description: "a utility for serialization of python objects".to_string(),
      author: "Mike McKerns".to_string(),
      maintainer: "Mike McKerns".to_string(),
      maintainer_email: "mmckerns@caltech.edu".to_string(),
      license: "BSD".to_string(),
      url: "http://www.cacr.caltech.edu/~mmckerns".to_string(),
      platforms: vec!["any".to_string()],
      classifiers: vec![
        "Intended Audience :: Developers".to_string(),
        "Programming Language :: Python".to_string(),
        "Topic :: Physics Programming".to_string(),
      ],
      packages: vec!["dill".to_string()],
      scripts: vec!["scripts/unpickle.py".to_string()],
    }
  }
}

/// Input and output locations, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PathsConfig {
  /// License text, embedded verbatim in the generated module
  pub license: PathBuf,
  /// Plain description file (overwritten)
  pub readme: PathBuf,
  /// Generated metadata module (overwritten, re-read on later builds)
  pub info_module: PathBuf,
  /// Optional override for the built-in description template
  pub template: Option<PathBuf>,
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      license: PathBuf::from("LICENSE"),
      readme: PathBuf::from("README"),
      info_module: PathBuf::from("dill").join("info.py"),
      template: None,
    }
  }
}

/// Target runtime the distribution is installed into
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RuntimeConfig {
  /// Interpreter program: runs the default build command and probes, and is
  /// queried with `--version` when `version` is unset
  pub interpreter: String,
  /// Interpreter version override (skips detection)
  pub version: Option<String>,
  /// Runtimes below this version lack the optional capability natively
  pub install_requires_below: String,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      interpreter: "python".to_string(),
      version: None,
      install_requires_below: "2.5.0".to_string(),
    }
  }
}

/// Optional runtime capability, required at install time only on old runtimes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CapabilityConfig {
  pub name: String,
  pub version_req: String,
  /// Command whose success means the capability can be loaded;
  /// defaults to `<interpreter> -c "import <name>"`
  pub probe: Option<Vec<String>>,
}

impl Default for CapabilityConfig {
  fn default() -> Self {
    Self {
      name: "ctypes".to_string(),
      version_req: ">=1.0.1".to_string(),
      probe: None,
    }
  }
}

impl CapabilityConfig {
  /// Probe command, run with `interpreter` unless overridden
  pub fn probe_command(&self, interpreter: &str) -> Vec<String> {
    match &self.probe {
      Some(argv) => argv.clone(),
      None => interpreter_argv(interpreter, &format!("import {}", self.name)),
    }
  }
}

/// Bootstrap handed to the interpreter: reads the JSON parameter record from
/// stdin and passes it to the packaging tool's `setup` entry point.
pub const DEFAULT_BOOTSTRAP: &str = "import json, sys
try:
    from setuptools import setup
except ImportError:
    from distutils.core import setup
setup(**json.load(sys.stdin))
";

/// External build tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BuildToolConfig {
  /// Program and leading arguments; CLI pass-through args are appended.
  /// Defaults to running [`DEFAULT_BOOTSTRAP`] with the runtime interpreter.
  pub command: Option<Vec<String>>,
  /// Whether the tool accepts install-time dependencies; probed when unset
  pub supports_install_requires: Option<bool>,
  /// Command whose success means install-time dependencies are supported;
  /// defaults to `<interpreter> -c "import setuptools"`
  pub support_probe: Option<Vec<String>>,
}

impl BuildToolConfig {
  /// Build command, run with `interpreter` unless overridden
  pub fn command_line(&self, interpreter: &str) -> Vec<String> {
    match &self.command {
      Some(argv) => argv.clone(),
      None => interpreter_argv(interpreter, DEFAULT_BOOTSTRAP),
    }
  }

  /// Support probe, run with `interpreter` unless overridden
  pub fn support_probe_command(&self, interpreter: &str) -> Vec<String> {
    match &self.support_probe {
      Some(argv) => argv.clone(),
      None => interpreter_argv(interpreter, "import setuptools"),
    }
  }
}

fn interpreter_argv(interpreter: &str, code: &str) -> Vec<String> {
  vec![interpreter.to_string(), "-c".to_string(), code.to_string()]
}

impl SetupConfig {
  /// Find config file in search order: setup.toml, .setup.toml, .config/setup.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("setup.toml"),
      path.join(".setup.toml"),
      path.join(".config").join("setup.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the project root, falling back to defaults when absent
  pub fn load(path: &Path) -> SetupResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!(root = %path.display(), "no setup.toml found, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: SetupConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded configuration");
    Ok(config)
  }

  /// Validate config values that would otherwise fail deep inside a build
  pub fn validate(&self) -> SetupResult<()> {
    if self.release.target_version.trim().is_empty() {
      return Err(invalid("release.target_version", "must not be empty"));
    }
    if self.release.stable_version.trim().is_empty() {
      return Err(invalid("release.stable_version", "must not be empty"));
    }
    if self.package.name.trim().is_empty() {
      return Err(invalid("package.name", "must not be empty"));
    }
    if self.runtime.interpreter.trim().is_empty() {
      return Err(invalid("runtime.interpreter", "must name a program"));
    }
    for (field, argv) in [
      ("build_tool.command", &self.build_tool.command),
      ("build_tool.support_probe", &self.build_tool.support_probe),
      ("capability.probe", &self.capability.probe),
    ] {
      if argv.as_ref().is_some_and(Vec::is_empty) {
        return Err(invalid(field, "must name a program"));
      }
    }
    if semver::VersionReq::parse(&self.capability.version_req).is_err() {
      return Err(invalid(
        "capability.version_req",
        &format!("'{}' is not a version requirement", self.capability.version_req),
      ));
    }
    if semver::Version::parse(&self.runtime.install_requires_below).is_err() {
      return Err(invalid(
        "runtime.install_requires_below",
        &format!("'{}' must be a full version (e.g. '2.5.0')", self.runtime.install_requires_below),
      ));
    }
    Ok(())
  }
}

fn invalid(field: &str, reason: &str) -> crate::core::error::SetupError {
  ConfigError::InvalidValue {
    field: field.to_string(),
    reason: reason.to_string(),
  }
  .into()
}
