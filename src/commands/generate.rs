//! Regenerate the description file and the info module

use crate::core::context::SetupContext;
use crate::core::error::SetupResult;
use crate::metadata::{ComposedDocument, DocumentComposer, GeneratedArtifact, MetadataEmitter, PriorModule, read_license};
use crate::release::{self, ReleaseState};
use std::path::Path;

/// Resolved version plus the documents derived from it
pub struct Prepared {
  pub release: ReleaseState,
  pub document: ComposedDocument,
}

/// Resolve the version from the prior module (if any) and configuration
pub fn prepare_release(ctx: &SetupContext) -> SetupResult<ReleaseState> {
  let prior = PriorModule::read(&ctx.info_module_path())?;
  let release = release::resolve(&ctx.config.release, prior.as_ref(), release::today())?;
  tracing::debug!(?release, "resolved release state");
  Ok(release)
}

/// Resolve the version and compose both documents; nothing is written
pub fn prepare(ctx: &SetupContext) -> SetupResult<Prepared> {
  let release = prepare_release(ctx)?;

  let composer = DocumentComposer::load(ctx.template_path().as_deref())?;
  let license = read_license(&ctx.license_path())?;
  let document = composer.compose(&release, license);

  Ok(Prepared { release, document })
}

/// Write the description file, then the module
pub fn emit(ctx: &SetupContext, prepared: &Prepared) -> SetupResult<[GeneratedArtifact; 2]> {
  MetadataEmitter::new(ctx.readme_path(), ctx.info_module_path())
    .emit(&prepared.release, &prepared.document)
}

pub(crate) fn print_prepared(ctx: &SetupContext, prepared: &Prepared, artifacts: &[GeneratedArtifact]) {
  let release = &prepared.release;
  println!(
    "📦 {} {} ({})",
    ctx.config.package.name,
    release.resolved_version,
    release.source.describe()
  );
  for artifact in artifacts {
    println!("   wrote {}", relative(&ctx.root, &artifact.path).display());
  }
}

pub(crate) fn relative<'a>(root: &Path, path: &'a Path) -> &'a Path {
  path.strip_prefix(root).unwrap_or(path)
}

/// Run the generate command
pub fn run_generate(ctx: &SetupContext) -> SetupResult<()> {
  let prepared = prepare(ctx)?;
  let artifacts = emit(ctx, &prepared)?;
  print_prepared(ctx, &prepared, &artifacts);
  println!("✅ Metadata generated");
  Ok(())
}
