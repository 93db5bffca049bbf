//! Generated artifact emission
//!
//! Both artifacts are derived and fully replaced on every run. Each write
//! goes to a sibling temp file through a scoped handle and is renamed into
//! place, so a failed write never leaves a truncated module for the next
//! build's resolver to read.

use crate::core::error::{ConfigError, SetupResult};
use crate::metadata::document::ComposedDocument;
use crate::metadata::module::ModuleBindings;
use crate::release::ReleaseState;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A derived file and its full contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
  pub path: PathBuf,
  pub rendered_text: String,
}

impl GeneratedArtifact {
  /// Replace the file at `path` with `rendered_text`
  pub fn write(&self) -> SetupResult<()> {
    let temp_path = temp_sibling(&self.path);

    if let Err(source) = write_scoped(&temp_path, &self.rendered_text) {
      let _ = fs::remove_file(&temp_path);
      return Err(self.write_error(source));
    }
    if let Err(source) = fs::rename(&temp_path, &self.path) {
      let _ = fs::remove_file(&temp_path);
      return Err(self.write_error(source));
    }

    tracing::debug!(path = %self.path.display(), bytes = self.rendered_text.len(), "wrote artifact");
    Ok(())
  }

  fn write_error(&self, source: std::io::Error) -> crate::core::error::SetupError {
    ConfigError::ArtifactWrite {
      path: self.path.clone(),
      source,
    }
    .into()
  }
}

fn write_scoped(path: &Path, text: &str) -> std::io::Result<()> {
  let mut file = File::create(path)?;
  file.write_all(text.as_bytes())?;
  file.sync_all()
}

fn temp_sibling(path: &Path) -> PathBuf {
  let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".tmp");
  path.with_file_name(name)
}

/// Writes the description file and the generated module
pub struct MetadataEmitter {
  pub readme_path: PathBuf,
  pub module_path: PathBuf,
}

impl MetadataEmitter {
  pub fn new(readme_path: PathBuf, module_path: PathBuf) -> Self {
    Self {
      readme_path,
      module_path,
    }
  }

  /// Render both artifacts without touching the filesystem
  pub fn render(&self, release: &ReleaseState, document: &ComposedDocument) -> [GeneratedArtifact; 2] {
    let module = ModuleBindings {
      this_version: release.resolved_version.clone(),
      stable_version: release.stable_version.clone(),
      readme: document.with_license(),
    };

    [
      GeneratedArtifact {
        path: self.readme_path.clone(),
        rendered_text: document.description.clone(),
      },
      GeneratedArtifact {
        path: self.module_path.clone(),
        rendered_text: module.render(),
      },
    ]
  }

  /// Write the description first, then the module; stop at the first failure
  pub fn emit(&self, release: &ReleaseState, document: &ComposedDocument) -> SetupResult<[GeneratedArtifact; 2]> {
    let artifacts = self.render(release, document);
    for artifact in &artifacts {
      artifact.write()?;
    }
    Ok(artifacts)
  }
}
