//! External build tool seam
//!
//! The tool's behaviour is out of scope; the contract is that it receives a
//! complete [`BuildParameters`] record exactly once and that its failure is
//! reported as-is.

use crate::build::params::BuildParameters;
use crate::core::error::{SetupError, SetupResult, ToolError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

pub trait BuildTool {
  /// Short name for progress output
  fn name(&self) -> &str;

  /// Hand the parameter record to the tool and wait for it to finish
  fn build(&self, params: &BuildParameters) -> SetupResult<()>;
}

/// Spawns the configured command and writes the JSON record to its stdin
pub struct CommandBuildTool {
  pub command: Vec<String>,
  /// Extra arguments from the command line (e.g. `sdist`, `install`)
  pub passthrough: Vec<String>,
  pub cwd: PathBuf,
}

impl BuildTool for CommandBuildTool {
  fn name(&self) -> &str {
    self.command.first().map(String::as_str).unwrap_or("<unset>")
  }

  fn build(&self, params: &BuildParameters) -> SetupResult<()> {
    let (program, args) = self
      .command
      .split_first()
      .ok_or_else(|| SetupError::message("build_tool.command is empty"))?;
    let json = params.to_json()?;

    tracing::info!(program = %program, args = ?self.passthrough, "delegating to build tool");
    let mut child = Command::new(program)
      .args(args)
      .args(&self.passthrough)
      .current_dir(&self.cwd)
      .stdin(Stdio::piped())
      .spawn()
      .map_err(|source| ToolError::SpawnFailed {
        program: program.clone(),
        source,
      })?;

    feed_stdin(&mut child, |stdin| stdin.write_all(json.as_bytes()))?;

    let status = child.wait()?;
    if !status.success() {
      return Err(
        ToolError::Failed {
          program: program.clone(),
          code: status.code(),
        }
        .into(),
      );
    }
    Ok(())
  }
}

/// Write to the child's stdin and close it
///
/// A tool that exits without reading its input closes the pipe early; its
/// exit status is what matters. Any other write error kills and reaps the
/// child before it is returned.
fn feed_stdin(child: &mut Child, write: impl FnOnce(&mut ChildStdin) -> io::Result<()>) -> SetupResult<()> {
  let Some(mut stdin) = child.stdin.take() else {
    return Ok(());
  };
  let result = write(&mut stdin);
  drop(stdin);

  match result {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
      tracing::debug!("build tool closed stdin before reading parameters");
      Ok(())
    }
    Err(e) => {
      if let Err(kill_err) = child.kill() {
        tracing::debug!(error = %kill_err, "could not kill build tool");
      }
      if let Err(wait_err) = child.wait() {
        tracing::debug!(error = %wait_err, "could not reap build tool");
      }
      Err(e.into())
    }
  }
}

/// Prints the record instead of running anything (`--dry-run`)
pub struct DryRunTool;

impl BuildTool for DryRunTool {
  fn name(&self) -> &str {
    "dry-run"
  }

  fn build(&self, params: &BuildParameters) -> SetupResult<()> {
    let json = params.to_json()?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", json)?;
    Ok(())
  }
}
