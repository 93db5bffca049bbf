//! Version resolution
//!
//! Precedence, first match wins:
//!
//! 1. A generated module from an earlier build exists: its `this_version`
//!    is authoritative (source distributions reproduce their exact version).
//! 2. `stable_version == target_version`: stable release, use the target.
//! 3. Otherwise a snapshot: `<target>.dev`, plus `-YYYYMMDD` for a release cut.
//!
//! A prior module without a usable `this_version` is fatal. Falling through
//! to rules 2/3 would silently change a source distribution's version.

use crate::core::config::ReleaseConfig;
use crate::core::error::SetupResult;
use crate::metadata::module::PriorModule;
use crate::release::state::{ReleaseState, VersionSource};
use chrono::NaiveDate;

/// Suffix marking a development snapshot
pub const DEV_SUFFIX: &str = ".dev";

/// Compact date stamp appended to release-cut snapshots
pub fn date_stamp(date: NaiveDate) -> String {
  date.format("%Y%m%d").to_string()
}

/// Today's local date, the only clock input of the resolver
pub fn today() -> NaiveDate {
  chrono::Local::now().date_naive()
}

/// Resolve the authoritative version for this build
pub fn resolve(release: &ReleaseConfig, prior: Option<&PriorModule>, date: NaiveDate) -> SetupResult<ReleaseState> {
  let (resolved_version, source) = match prior {
    Some(module) => (module.this_version()?.to_string(), VersionSource::PriorModule),
    None if release.stable_version == release.target_version => {
      (release.target_version.clone(), VersionSource::Stable)
    }
    None if release.is_release => (
      format!("{}{}-{}", release.target_version, DEV_SUFFIX, date_stamp(date)),
      VersionSource::DatedSnapshot,
    ),
    None => (format!("{}{}", release.target_version, DEV_SUFFIX), VersionSource::Snapshot),
  };

  tracing::debug!(version = %resolved_version, ?source, "resolved version");

  Ok(ReleaseState {
    stable_version: release.stable_version.clone(),
    target_version: release.target_version.clone(),
    is_release: release.is_release,
    resolved_version,
    source,
  })
}
