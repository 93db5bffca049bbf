//! Print the resolved version

use crate::commands::generate::prepare_release;
use crate::core::context::SetupContext;
use crate::core::error::SetupResult;

/// Run the version command
///
/// Plain output is the bare version string so it can be captured by scripts;
/// `--json` prints every resolved fact.
pub fn run_version(ctx: &SetupContext, json: bool) -> SetupResult<()> {
  let release = prepare_release(ctx)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&release)?);
  } else {
    println!("{}", release.resolved_version);
  }
  Ok(())
}
