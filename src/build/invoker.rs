//! Build invocation: assemble → delegate → probe → warn-or-noop
//!
//! Strictly linear, no retries. Only the final probe is allowed to fail
//! quietly; everything before it propagates.

use crate::build::capability::{self, Capability, Host, HostCapabilities};
use crate::build::params::BuildParameters;
use crate::build::tool::BuildTool;
use crate::core::config::SetupConfig;
use crate::core::error::SetupResult;
use crate::metadata::ComposedDocument;
use crate::release::ReleaseState;
use std::io::Write;

/// What a completed invocation did
#[derive(Debug, Clone)]
pub struct BuildReport {
  pub params: BuildParameters,
  pub capabilities: HostCapabilities,
  pub capability_available: bool,
}

pub struct BuildInvoker<'a> {
  tool: &'a dyn BuildTool,
  host: &'a dyn Host,
}

impl<'a> BuildInvoker<'a> {
  pub fn new(tool: &'a dyn BuildTool, host: &'a dyn Host) -> Self {
    Self { tool, host }
  }

  /// Build the parameter record, adding the install-time requirement when
  /// the host policy calls for it
  pub fn assemble(
    &self,
    config: &SetupConfig,
    release: &ReleaseState,
    document: &ComposedDocument,
  ) -> SetupResult<(BuildParameters, HostCapabilities)> {
    let mut params = BuildParameters::assemble(&config.package, release, document);
    let capabilities = HostCapabilities::detect(&config.build_tool, &config.runtime, self.host)?;

    if capabilities.requires_capability() {
      let constraint = Capability::from_config(&config.capability).constraint();
      tracing::info!(requirement = %constraint, "adding install-time requirement");
      params.require(constraint);
    }

    Ok((params, capabilities))
  }

  /// Run the full sequence; the missing-capability warning goes to `out`
  pub fn run(
    &self,
    config: &SetupConfig,
    release: &ReleaseState,
    document: &ComposedDocument,
    out: &mut dyn Write,
  ) -> SetupResult<BuildReport> {
    let (params, capabilities) = self.assemble(config, release, document)?;

    self.tool.build(&params)?;

    let capability_available = capability::probe(&config.capability, &config.runtime.interpreter, self.host);
    if !capability_available {
      let capability = Capability::from_config(&config.capability);
      if let Err(e) = capability::write_missing_warning(out, &capability) {
        tracing::warn!(error = %e, "could not print missing-capability warning");
      }
    }

    Ok(BuildReport {
      params,
      capabilities,
      capability_available,
    })
  }
}
