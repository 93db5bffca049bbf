//! Long-form description composition
//!
//! The template is an opaque text resource. Composition substitutes the two
//! version placeholders and nothing else.

use crate::core::error::{ConfigError, SetupResult};
use crate::release::ReleaseState;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Placeholder for the last published release
pub const STABLE_PLACEHOLDER: &str = "{stable_version}";
/// Placeholder for the version being built
pub const THIS_PLACEHOLDER: &str = "{this_version}";

/// Built-in description template
pub const BUILTIN_TEMPLATE: &str = include_str!("../../templates/README.in");

/// Output of the composer: rendered description plus the verbatim license
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
  pub description: String,
  pub license: String,
}

impl ComposedDocument {
  /// Description followed by the license text, as embedded in the module
  pub fn with_license(&self) -> String {
    let mut text = String::with_capacity(self.description.len() + self.license.len());
    text.push_str(&self.description);
    text.push_str(&self.license);
    text
  }
}

pub struct DocumentComposer {
  template: Cow<'static, str>,
}

impl DocumentComposer {
  pub fn builtin() -> Self {
    Self {
      template: Cow::Borrowed(BUILTIN_TEMPLATE),
    }
  }

  pub fn with_template(template: impl Into<String>) -> Self {
    Self {
      template: Cow::Owned(template.into()),
    }
  }

  /// Load a template override, or the built-in one when `path` is `None`
  pub fn load(path: Option<&Path>) -> SetupResult<Self> {
    match path {
      None => Ok(Self::builtin()),
      Some(path) => {
        let template = fs::read_to_string(path).map_err(|source| ConfigError::TemplateUnreadable {
          path: path.to_path_buf(),
          source,
        })?;
        tracing::debug!(path = %path.display(), "using description template override");
        Ok(Self::with_template(template))
      }
    }
  }

  /// Substitute the version placeholders in one pass over the template;
  /// substituted values are never rescanned
  pub fn render(&self, stable_version: &str, this_version: &str) -> String {
    let mut out = String::with_capacity(self.template.len());
    let mut rest: &str = &self.template;

    while let Some(start) = rest.find('{') {
      out.push_str(&rest[..start]);
      let tail = &rest[start..];
      if let Some(after) = tail.strip_prefix(STABLE_PLACEHOLDER) {
        out.push_str(stable_version);
        rest = after;
      } else if let Some(after) = tail.strip_prefix(THIS_PLACEHOLDER) {
        out.push_str(this_version);
        rest = after;
      } else {
        out.push('{');
        rest = &tail[1..];
      }
    }
    out.push_str(rest);
    out
  }

  /// Compose the description for a resolved release
  pub fn compose(&self, release: &ReleaseState, license: String) -> ComposedDocument {
    ComposedDocument {
      description: self.render(&release.stable_version, &release.resolved_version),
      license,
    }
  }
}

/// Read the license text verbatim
pub fn read_license(path: &Path) -> SetupResult<String> {
  let text = fs::read_to_string(path).map_err(|source| ConfigError::LicenseUnreadable {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(text)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::release::state::VersionSource;
  use tempfile::TempDir;

  fn state(stable: &str, resolved: &str) -> ReleaseState {
    ReleaseState {
      stable_version: stable.to_string(),
      target_version: stable.to_string(),
      is_release: false,
      resolved_version: resolved.to_string(),
      source: VersionSource::Stable,
    }
  }

  #[test]
  fn test_builtin_template_has_both_placeholders() {
    assert!(BUILTIN_TEMPLATE.contains(STABLE_PLACEHOLDER));
    assert!(BUILTIN_TEMPLATE.contains(THIS_PLACEHOLDER));
  }

  #[test]
  fn test_compose_leaves_no_placeholders() {
    let doc = DocumentComposer::builtin().compose(&state("1.0", "1.0"), String::new());
    assert!(!doc.description.contains(STABLE_PLACEHOLDER));
    assert!(!doc.description.contains(THIS_PLACEHOLDER));
    assert!(doc.description.contains("dill-1.0."));
    assert!(doc.description.contains("$ tar -xvzf dill-1.0.tgz"));
  }

  #[test]
  fn test_placeholders_map_to_distinct_versions() {
    let composer = DocumentComposer::with_template("stable={stable_version} this={this_version} again={this_version}");
    assert_eq!(
      composer.render("0.1a1", "0.2a.dev"),
      "stable=0.1a1 this=0.2a.dev again=0.2a.dev"
    );
  }

  #[test]
  fn test_substituted_values_are_not_rescanned() {
    let composer = DocumentComposer::with_template("stable={stable_version} this={this_version}");
    assert_eq!(
      composer.render("{this_version}", "0.2a.dev"),
      "stable={this_version} this=0.2a.dev"
    );
    assert_eq!(composer.render("0.1", "{stable_version}"), "stable=0.1 this={stable_version}");
  }

  #[test]
  fn test_other_braces_are_left_alone() {
    let composer = DocumentComposer::with_template("{not_a_placeholder} %(relver)s {this_version}");
    assert_eq!(composer.render("a", "b"), "{not_a_placeholder} %(relver)s b");
  }

  #[test]
  fn test_license_appended_after_description() {
    let composer = DocumentComposer::with_template("about {this_version}\n");
    let doc = composer.compose(&state("1.0", "1.1.dev"), "BSD terms\n".to_string());
    assert_eq!(doc.description, "about 1.1.dev\n");
    assert_eq!(doc.with_license(), "about 1.1.dev\nBSD terms\n");
  }

  #[test]
  fn test_missing_license_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = read_license(&dir.path().join("LICENSE")).unwrap_err();
    assert!(err.to_string().contains("Failed to read license file"));
    assert_eq!(err.exit_code().as_i32(), 1);
  }

  #[test]
  fn test_license_read_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("LICENSE");
    fs::write(&path, "line one\r\n'quoted'\n").unwrap();
    assert_eq!(read_license(&path).unwrap(), "line one\r\n'quoted'\n");
  }

  #[test]
  fn test_template_override_loaded_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("README.in");
    fs::write(&path, "v{this_version}").unwrap();
    let composer = DocumentComposer::load(Some(&path)).unwrap();
    assert_eq!(composer.render("x", "2.0"), "v2.0");

    assert!(DocumentComposer::load(Some(&dir.path().join("missing.in"))).is_err());
  }
}
