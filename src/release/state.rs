use serde::Serialize;

/// Which precedence rule produced the resolved version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
  /// Read from the generated module of an earlier build
  PriorModule,
  /// Stable and target versions agree
  Stable,
  /// Development snapshot (`<target>.dev`)
  Snapshot,
  /// Release-cut snapshot (`<target>.dev-YYYYMMDD`)
  DatedSnapshot,
}

/// Resolved facts for one build
///
/// Constructed once at the start of a run and passed by reference to every
/// later stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseState {
  pub stable_version: String,
  pub target_version: String,
  pub is_release: bool,
  pub resolved_version: String,
  pub source: VersionSource,
}

impl VersionSource {
  /// Human-readable label for progress output
  pub fn describe(self) -> &'static str {
    match self {
      VersionSource::PriorModule => "from generated module",
      VersionSource::Stable => "stable release",
      VersionSource::Snapshot => "development snapshot",
      VersionSource::DatedSnapshot => "release snapshot",
    }
  }
}
