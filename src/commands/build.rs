//! Generate metadata and delegate to the external build tool

use crate::build::{BuildInvoker, BuildTool, CommandBuildTool, DryRunTool, SystemHost};
use crate::commands::generate::{emit, prepare, print_prepared};
use crate::core::context::SetupContext;
use crate::core::error::SetupResult;
use std::io;

/// Run the build command
///
/// With `dry_run`, nothing is written and nothing is spawned apart from the
/// host probes: the parameter record is printed as JSON on stdout instead.
pub fn run_build(ctx: &SetupContext, dry_run: bool, tool_args: Vec<String>) -> SetupResult<()> {
  let prepared = prepare(ctx)?;

  if dry_run {
    let host = SystemHost;
    let tool = DryRunTool;
    let invoker = BuildInvoker::new(&tool, &host);
    let (params, _) = invoker.assemble(&ctx.config, &prepared.release, &prepared.document)?;
    return tool.build(&params);
  }

  let artifacts = emit(ctx, &prepared)?;
  print_prepared(ctx, &prepared, &artifacts);

  let tool = CommandBuildTool {
    command: ctx.config.build_tool.command_line(&ctx.config.runtime.interpreter),
    passthrough: tool_args,
    cwd: ctx.root.clone(),
  };
  let host = SystemHost;

  println!("🔨 Running build tool '{}'", tool.name());
  let report = BuildInvoker::new(&tool, &host).run(
    &ctx.config,
    &prepared.release,
    &prepared.document,
    &mut io::stdout(),
  )?;

  for requirement in &report.params.install_requires {
    println!("   install requirement: {}", requirement);
  }
  if !report.capabilities.supports_install_requires {
    tracing::debug!("build tool does not accept install-time requirements");
  }
  if report.capability_available {
    println!("✅ Build finished");
  } else {
    println!("⚠️  Build finished; {} is not available on this host", ctx.config.capability.name);
  }
  Ok(())
}
