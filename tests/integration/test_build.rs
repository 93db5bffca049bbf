//! Tests for the `build` and `generate` commands

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_build_writes_artifacts_and_delegates() -> Result<()> {
  let project = TestProject::new()?;

  run_dill_setup(&project.path, &["build"])?;

  let readme = project.read_file("README")?;
  assert!(readme.contains("dill-0.1a1"));
  assert!(readme.contains("dill-0.2a.dev.tgz"));
  assert!(!readme.contains("{this_version}"));

  let module = project.read_file("dill/info.py")?;
  assert!(module.contains("this_version = '0.2a.dev'\n"));
  assert!(module.contains("stable_version = '0.1a1'\n"));
  assert!(module.contains("readme = (\n"));

  let params = project.received_params()?;
  assert_eq!(params["name"], "dill");
  assert_eq!(params["version"], "0.2a");
  assert_eq!(params["long_description"].as_str(), Some(readme.as_str()));
  assert_eq!(params["zip_safe"], false);
  assert!(params.get("install_requires").is_none());

  Ok(())
}

#[test]
fn test_rebuild_reads_back_same_version() -> Result<()> {
  let project = TestProject::new()?;

  run_dill_setup(&project.path, &["build"])?;
  let first = project.read_file("dill/info.py")?;

  run_dill_setup(&project.path, &["build"])?;
  let second = project.read_file("dill/info.py")?;
  assert_eq!(first, second);

  let output = run_dill_setup(&project.path, &["version", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(json["resolved_version"], "0.2a.dev");
  assert_eq!(json["source"], "prior_module");

  Ok(())
}

#[test]
fn test_generated_readme_binding_ends_with_license() -> Result<()> {
  let project = TestProject::new()?;

  run_dill_setup(&project.path, &["generate"])?;

  let module = project.read_file("dill/info.py")?;
  assert!(module.contains("'All rights reserved.\\n'"));
  assert!(!project.file_exists("params.json"));

  Ok(())
}

#[test]
fn test_old_runtime_gets_install_requirement() -> Result<()> {
  let project = TestProject::with_options(&ProjectOptions {
    interpreter_version: "2.4.3",
    ..ProjectOptions::default()
  })?;

  run_dill_setup(&project.path, &["build"])?;

  let params = project.received_params()?;
  assert_eq!(params["install_requires"], serde_json::json!(["ctypes>=1.0.1"]));

  Ok(())
}

#[test]
fn test_tool_without_install_requires_gets_none() -> Result<()> {
  let project = TestProject::with_options(&ProjectOptions {
    interpreter_version: "2.4.3",
    supports_install_requires: false,
    ..ProjectOptions::default()
  })?;

  run_dill_setup(&project.path, &["build"])?;

  let params = project.received_params()?;
  assert!(params.get("install_requires").is_none());

  Ok(())
}

#[test]
fn test_missing_capability_warns_but_succeeds() -> Result<()> {
  let project = TestProject::with_options(&ProjectOptions {
    capability_present: false,
    ..ProjectOptions::default()
  })?;

  let output = run_dill_setup(&project.path, &["build"])?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("WARNING: One of the following dependencies is unresolved:"));
  assert!(stdout.contains("ctypes >=1.0.1"));
  assert!(project.file_exists("params.json"));

  Ok(())
}

#[test]
fn test_present_capability_prints_no_warning() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_dill_setup(&project.path, &["build"])?;
  assert!(!stdout_of(&output).contains("WARNING"));

  Ok(())
}

#[test]
fn test_tool_failure_exit_code_passes_through() -> Result<()> {
  let project = TestProject::with_options(&ProjectOptions {
    tool_command: r#"["sh", "-c", "exit 7"]"#.to_string(),
    ..ProjectOptions::default()
  })?;

  let output = run_dill_setup_raw(&project.path, &["build"])?;
  assert_eq!(output.status.code(), Some(7));
  // Artifacts are written before delegation
  assert!(project.file_exists("dill/info.py"));

  Ok(())
}

#[test]
fn test_missing_license_fails_before_writing() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::remove_file(project.path.join("LICENSE"))?;

  let output = run_dill_setup_raw(&project.path, &["build"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("LICENSE"));
  assert!(!project.file_exists("README"));
  assert!(!project.file_exists("dill/info.py"));
  assert!(!project.file_exists("params.json"));

  Ok(())
}

#[test]
fn test_passthrough_args_reach_tool() -> Result<()> {
  let project = TestProject::new()?;

  run_dill_setup(&project.path, &["build", "--", "sdist", "--formats=gztar"])?;

  assert_eq!(project.read_file("args.txt")?.trim(), "sdist --formats=gztar");

  Ok(())
}

#[test]
fn test_dry_run_prints_params_only() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_dill_setup(&project.path, &["build", "--dry-run"])?;
  let params: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(params["version"], "0.2a");
  assert_eq!(params["packages"], serde_json::json!(["dill"]));

  assert!(!project.file_exists("README"));
  assert!(!project.file_exists("dill/info.py"));
  assert!(!project.file_exists("params.json"));

  Ok(())
}
