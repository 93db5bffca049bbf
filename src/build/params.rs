//! The parameter record handed to the external build tool

use crate::core::config::PackageConfig;
use crate::metadata::ComposedDocument;
use crate::release::ReleaseState;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the build tool is told about the distribution
///
/// Field names follow the tool's accepted schema. Built fresh for every
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildParameters {
  pub name: String,
  pub version: String,
  pub description: String,
  pub long_description: String,
  pub author: String,
  pub maintainer: String,
  pub maintainer_email: String,
  pub license: String,
  pub url: String,
  pub platforms: Vec<String>,
  pub classifiers: Vec<String>,
  pub packages: Vec<String>,
  pub package_dir: BTreeMap<String, String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub install_requires: Vec<String>,
  pub scripts: Vec<String>,
  pub zip_safe: bool,
}

impl BuildParameters {
  /// Assemble the record from static identity and the resolved release
  ///
  /// `version` is the target version the tool names the package with; the
  /// resolved version is carried by the description and generated module.
  pub fn assemble(package: &PackageConfig, release: &ReleaseState, document: &ComposedDocument) -> Self {
    let package_dir = package
      .packages
      .iter()
      .map(|name| (name.clone(), name.replace('.', "/")))
      .collect();

    Self {
      name: package.name.clone(),
      version: release.target_version.clone(),
      description: package.description.clone(),
      long_description: document.description.clone(),
      author: package.author.clone(),
      maintainer: package.maintainer.clone(),
      maintainer_email: package.maintainer_email.clone(),
      license: package.license.clone(),
      url: package.url.clone(),
      platforms: package.platforms.clone(),
      classifiers: package.classifiers.clone(),
      packages: package.packages.clone(),
      package_dir,
      install_requires: Vec::new(),
      scripts: package.scripts.clone(),
      zip_safe: false,
    }
  }

  /// Declare an install-time requirement
  pub fn require(&mut self, constraint: String) {
    if !self.install_requires.contains(&constraint) {
      self.install_requires.push(constraint);
    }
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::release::state::VersionSource;

  fn params() -> BuildParameters {
    let release = ReleaseState {
      stable_version: "0.1a1".to_string(),
      target_version: "0.2a".to_string(),
      is_release: false,
      resolved_version: "0.2a.dev".to_string(),
      source: VersionSource::Snapshot,
    };
    let document = ComposedDocument {
      description: "long text about dill-0.2a.dev\n".to_string(),
      license: "BSD\n".to_string(),
    };
    BuildParameters::assemble(&PackageConfig::default(), &release, &document)
  }

  #[test]
  fn test_assemble_populates_every_field() {
    let params = params();
    assert_eq!(params.name, "dill");
    assert_eq!(params.version, "0.2a");
    assert_eq!(params.long_description, "long text about dill-0.2a.dev\n");
    assert_eq!(params.maintainer_email, "mmckerns@caltech.edu");
    assert_eq!(params.license, "BSD");
    assert_eq!(params.platforms, vec!["any"]);
    assert_eq!(params.classifiers.len(), 3);
    assert_eq!(params.packages, vec!["dill"]);
    assert_eq!(params.package_dir.get("dill").map(String::as_str), Some("dill"));
    assert_eq!(params.scripts, vec!["scripts/unpickle.py"]);
    assert!(params.install_requires.is_empty());
    assert!(!params.zip_safe);
  }

  #[test]
  fn test_require_is_idempotent() {
    let mut params = params();
    params.require("ctypes>=1.0.1".to_string());
    params.require("ctypes>=1.0.1".to_string());
    assert_eq!(params.install_requires, vec!["ctypes>=1.0.1"]);
  }

  #[test]
  fn test_json_omits_empty_install_requires() {
    let mut params = params();
    let json: serde_json::Value = serde_json::from_str(&params.to_json().unwrap()).unwrap();
    assert!(json.get("install_requires").is_none());
    assert_eq!(json["zip_safe"], serde_json::Value::Bool(false));
    assert_eq!(json["package_dir"]["dill"], "dill");

    params.require("ctypes>=1.0.1".to_string());
    let json: serde_json::Value = serde_json::from_str(&params.to_json().unwrap()).unwrap();
    assert_eq!(json["install_requires"][0], "ctypes>=1.0.1");
  }
}
