//! Host capability checks
//!
//! Two questions are asked of the host before delegating to the build tool:
//! does the tool accept install-time dependencies, and is the target runtime
//! older than the version that ships the optional capability natively. Both
//! are answered once and recorded in [`HostCapabilities`], so the install
//! policy can be tested without a real host.
//!
//! After the build, the capability itself is probed; absence only prints a
//! warning block.

use crate::core::config::{BuildToolConfig, CapabilityConfig, RuntimeConfig};
use crate::core::error::SetupResult;
use regex::Regex;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// Side-effect-free command execution used for probing
pub trait Host {
  /// Run `argv`, discarding output; true when it exits successfully
  fn succeeds(&self, argv: &[String]) -> bool;

  /// Run `argv` and return stdout followed by stderr, if it exits successfully
  fn output(&self, argv: &[String]) -> Option<String>;
}

/// The real host: spawns processes
pub struct SystemHost;

impl Host for SystemHost {
  fn succeeds(&self, argv: &[String]) -> bool {
    let Some((program, args)) = argv.split_first() else {
      return false;
    };
    let status = Command::new(program)
      .args(args)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status();
    match status {
      Ok(status) => status.success(),
      Err(e) => {
        tracing::debug!(program = %program, error = %e, "probe could not start");
        false
      }
    }
  }

  fn output(&self, argv: &[String]) -> Option<String> {
    let (program, args) = argv.split_first()?;
    let output = Command::new(program).args(args).stdin(Stdio::null()).output().ok()?;
    if !output.status.success() {
      return None;
    }
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Some(text)
  }
}

/// Host facts that drive the install-time dependency policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
  pub supports_install_requires: bool,
  pub interpreter_below_threshold: bool,
}

impl HostCapabilities {
  /// Evaluate both flags once
  pub fn detect(tool: &BuildToolConfig, runtime: &RuntimeConfig, host: &dyn Host) -> SetupResult<Self> {
    let supports_install_requires = match tool.supports_install_requires {
      Some(flag) => flag,
      None => host.succeeds(&tool.support_probe_command(&runtime.interpreter)),
    };

    let threshold = semver::Version::parse(&runtime.install_requires_below)?;
    let interpreter_below_threshold = match interpreter_version(runtime, host) {
      Some(version) => version < threshold,
      None => {
        tracing::warn!(
          interpreter = %runtime.interpreter,
          "could not determine interpreter version; not adding install-time requirements"
        );
        false
      }
    };

    let caps = Self {
      supports_install_requires,
      interpreter_below_threshold,
    };
    tracing::debug!(?caps, "host capabilities");
    Ok(caps)
  }

  /// Require the optional capability at install time only on runtimes that
  /// lack it and only when the tool can express the requirement
  pub fn requires_capability(&self) -> bool {
    self.supports_install_requires && self.interpreter_below_threshold
  }
}

/// Configured interpreter version, or the one reported by `<interpreter> --version`
pub fn interpreter_version(runtime: &RuntimeConfig, host: &dyn Host) -> Option<semver::Version> {
  if let Some(version) = &runtime.version {
    return parse_version_text(version);
  }
  let argv = [runtime.interpreter.clone(), "--version".to_string()];
  host.output(&argv).as_deref().and_then(parse_version_text)
}

fn version_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?(?:(a|b|c|rc)(\d*))?").expect("version pattern is valid")
  })
}

/// Extract the first `major.minor[.patch][tag]` from free text
///
/// Missing patch counts as 0. An `a`, `b`, `c` or `rc` tag becomes a
/// pre-release (`c` is read as `rc`), so "2.5c1" sorts below 2.5.0. Other
/// suffixes such as "+" are ignored.
pub fn parse_version_text(text: &str) -> Option<semver::Version> {
  let captures = version_pattern().captures(text)?;
  let number = |i: usize| captures.get(i).map_or(Some(0), |m| m.as_str().parse::<u64>().ok());
  let mut version = semver::Version::new(number(1)?, number(2)?, number(3)?);

  if let Some(tag) = captures.get(4) {
    let tag = match tag.as_str() {
      "c" => "rc",
      other => other,
    };
    let pre = match captures.get(5).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
      Some(serial) => format!("{}.{}", tag, serial.parse::<u64>().ok()?),
      None => tag.to_string(),
    };
    version.pre = semver::Prerelease::new(&pre).ok()?;
  }
  Some(version)
}

/// Optional runtime capability and its required version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
  pub name: String,
  pub version_req: String,
}

impl Capability {
  pub fn from_config(config: &CapabilityConfig) -> Self {
    Self {
      name: config.name.clone(),
      version_req: config.version_req.clone(),
    }
  }

  /// Requirement string handed to the build tool, e.g. `ctypes>=1.0.1`
  pub fn constraint(&self) -> String {
    format!("{}{}", self.name, self.version_req)
  }
}

/// Best-effort check that the capability can be loaded by `interpreter`
pub fn probe(config: &CapabilityConfig, interpreter: &str, host: &dyn Host) -> bool {
  let available = host.succeeds(&config.probe_command(interpreter));
  tracing::debug!(capability = %config.name, available, "capability probe");
  available
}

const BANNER: &str = "***********************************************************";

/// Print the delimited warning for a missing capability
pub fn write_missing_warning(out: &mut dyn Write, capability: &Capability) -> io::Result<()> {
  writeln!(out)?;
  writeln!(out, "{}", BANNER)?;
  writeln!(out, "WARNING: One of the following dependencies is unresolved:")?;
  writeln!(out, "    {} {}", capability.name, capability.version_req)?;
  writeln!(out, "{}", BANNER)?;
  writeln!(out)
}
