//! Tests for the `version` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_snapshot_version_by_default() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_dill_setup(&project.path, &["version"])?;
  assert_eq!(stdout_of(&output).trim(), "0.2a.dev");

  Ok(())
}

#[test]
fn test_stable_equal_to_target_is_used_verbatim() -> Result<()> {
  let project = TestProject::with_options(&ProjectOptions {
    stable_version: "0.2a",
    target_version: "0.2a",
    ..ProjectOptions::default()
  })?;

  let output = run_dill_setup(&project.path, &["version"])?;
  assert_eq!(stdout_of(&output).trim(), "0.2a");

  Ok(())
}

#[test]
fn test_release_snapshot_carries_date_stamp() -> Result<()> {
  let project = TestProject::with_options(&ProjectOptions {
    is_release: true,
    ..ProjectOptions::default()
  })?;

  let output = run_dill_setup(&project.path, &["version"])?;
  let version = stdout_of(&output).trim().to_string();
  let pattern = regex::Regex::new(r"^0\.2a\.dev-[0-9]{8}$")?;
  assert!(pattern.is_match(&version), "unexpected version: {}", version);

  Ok(())
}

#[test]
fn test_prior_module_version_wins() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(
    "dill/info.py",
    "this_version = '0.1.5'\nstable_version = '0.1a1'\nreadme = 'text'\n",
  )?;

  let output = run_dill_setup(&project.path, &["version", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(json["resolved_version"], "0.1.5");
  assert_eq!(json["source"], "prior_module");
  assert_eq!(json["target_version"], "0.2a");

  Ok(())
}

#[test]
fn test_malformed_prior_module_fails() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("dill/info.py", "this_version = '0.1.5\n")?;

  let output = run_dill_setup_raw(&project.path, &["version"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("info.py"));
  assert!(stdout_of(&output).is_empty());

  Ok(())
}

#[test]
fn test_unknown_config_key_is_rejected() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("setup.toml", "[release]\ntarget = \"0.3\"\n")?;

  let output = run_dill_setup_raw(&project.path, &["version"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_root_flag_selects_project() -> Result<()> {
  let project = TestProject::new()?;
  let elsewhere = tempfile::TempDir::new()?;
  let root = project.path.to_string_lossy().into_owned();

  let output = run_dill_setup(elsewhere.path(), &["version", "--root", &root])?;
  assert_eq!(stdout_of(&output).trim(), "0.2a.dev");

  Ok(())
}
