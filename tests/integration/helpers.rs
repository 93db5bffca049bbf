//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const LICENSE_TEXT: &str = "Copyright (c) 2008 California Institute of Technology.\nAll rights reserved.\n";

/// Build tool stand-in: stores the JSON record and its arguments
const RECORDING_TOOL: &str = r#"["sh", "-c", "cat > params.json; echo \"$@\" > args.txt", "tool"]"#;

/// Knobs for the generated setup.toml
pub struct ProjectOptions {
  pub stable_version: &'static str,
  pub target_version: &'static str,
  pub is_release: bool,
  pub interpreter_version: &'static str,
  pub supports_install_requires: bool,
  pub capability_present: bool,
  /// TOML array for `build_tool.command`
  pub tool_command: String,
}

impl Default for ProjectOptions {
  fn default() -> Self {
    Self {
      stable_version: "0.1a1",
      target_version: "0.2a",
      is_release: false,
      interpreter_version: "2.7.18",
      supports_install_requires: true,
      capability_present: true,
      tool_command: RECORDING_TOOL.to_string(),
    }
  }
}

/// A scratch package source tree
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Project with a LICENSE, an empty package directory and default options
  pub fn new() -> Result<Self> {
    Self::with_options(&ProjectOptions::default())
  }

  pub fn with_options(options: &ProjectOptions) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(path.join("LICENSE"), LICENSE_TEXT)?;
    std::fs::create_dir_all(path.join("dill"))?;

    let project = Self { _root: root, path };
    project.write_config(options)?;
    Ok(project)
  }

  /// Overwrite setup.toml
  pub fn write_config(&self, options: &ProjectOptions) -> Result<()> {
    let probe = if options.capability_present { "true" } else { "false" };
    let config = format!(
      r#"[release]
stable_version = "{}"
target_version = "{}"
is_release = {}

[runtime]
version = "{}"

[capability]
probe = ["{}"]

[build_tool]
command = {}
supports_install_requires = {}
"#,
      options.stable_version,
      options.target_version,
      options.is_release,
      options.interpreter_version,
      probe,
      options.tool_command,
      options.supports_install_requires,
    );
    std::fs::write(self.path.join("setup.toml"), config)?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    std::fs::read_to_string(self.path.join(path)).with_context(|| format!("Failed to read {}", path))
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    std::fs::write(self.path.join(path), content).with_context(|| format!("Failed to write {}", path))
  }

  /// Parameter record captured by the recording build tool
  pub fn received_params(&self) -> Result<serde_json::Value> {
    let text = self.read_file("params.json")?;
    serde_json::from_str(&text).context("params.json is not valid JSON")
  }
}

/// Run dill-setup and return its output whatever the exit status
pub fn run_dill_setup_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_dill-setup"))
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run dill-setup")
}

/// Run dill-setup and fail unless it exits successfully
pub fn run_dill_setup(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_dill_setup_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "dill-setup command failed: dill-setup {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
