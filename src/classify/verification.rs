use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::registry::DistroId;

const BUILTIN_SNAPSHOT: &str = include_str!("../../data/verified-flatpaks.json");

/// Snaps published by verified accounts. The Snap store has no bulk query, so
/// this list is curated rather than fetched.
pub const KNOWN_VERIFIED_SNAPS: &[&str] = &[
    "firefox",
    "thunderbird",
    "chromium",
    "brave",
    "spotify",
    "code",
    "intellij-idea-community",
    "intellij-idea-ultimate",
    "pycharm-community",
    "pycharm-professional",
    "slack",
    "discord",
    "signal-desktop",
    "telegram-desktop",
    "zoom-client",
    "obsidian",
    "bitwarden",
    "blender",
    "gimp",
    "inkscape",
    "krita",
    "vlc",
    "obs-studio",
    "libreoffice",
    "node",
    "go",
    "rustup",
    "ruby",
    "cmake",
    "docker",
    "kubectl",
    "steam",
    "retroarch",
    "vivaldi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationSource {
    Flathub,
    Snap,
}

impl VerificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationSource::Flathub => "flathub",
            VerificationSource::Snap => "snap",
        }
    }
}

impl fmt::Display for VerificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk shape written by the Flathub sync job.
#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    meta: SnapshotMeta,
    #[serde(default)]
    apps: Vec<String>,
    #[serde(default)]
    snaps: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotMeta {
    fetched_at: Option<String>,
}

/// Read-only lookup of verified publishers.
///
/// Built once and handed to whoever renders badges. `reload` swaps the
/// Flathub set in one step and keeps the old data when the new snapshot is
/// unreadable, so a stale or missing snapshot only hides badges.
#[derive(Debug, Clone, Default)]
pub struct VerificationIndex {
    flathub: HashSet<String>,
    snaps: HashSet<String>,
    fetched_at: Option<DateTime<Utc>>,
}

impl VerificationIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Curated snap publishers only, no Flathub data.
    pub fn curated() -> Self {
        Self {
            snaps: KNOWN_VERIFIED_SNAPS.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn builtin() -> Self {
        Self::from_snapshot_json(BUILTIN_SNAPSHOT).unwrap_or_else(|err| {
            log::warn!("embedded verification snapshot unreadable: {err:#}");
            Self::curated()
        })
    }

    pub fn from_snapshot_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).context("invalid verification snapshot")?;

        let fetched_at = snapshot.meta.fetched_at.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|err| log::debug!("ignoring snapshot timestamp '{raw}': {err}"))
                .ok()
        });

        let mut index = Self::curated();
        index.flathub = snapshot
            .apps
            .into_iter()
            .filter(|id| !id.trim().is_empty())
            .collect();
        index
            .snaps
            .extend(snapshot.snaps.into_iter().filter(|s| !s.trim().is_empty()));
        index.fetched_at = fetched_at;
        Ok(index)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        Self::from_snapshot_json(&file)
            .with_context(|| format!("invalid snapshot in {}", path.as_ref().display()))
    }

    /// Like [`load`](Self::load) but never fails: badges are optional.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(index) => {
                log::debug!(
                    "verification snapshot loaded: {} flathub apps",
                    index.flathub_count()
                );
                index
            }
            Err(err) => {
                log::warn!("verification badges disabled: {err:#}");
                Self::curated()
            }
        }
    }

    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let fresh = Self::load(path)?;
        *self = fresh;
        Ok(())
    }

    pub fn flathub_count(&self) -> usize {
        self.flathub.len()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_verified(&self, distro: DistroId, pkg: &str) -> bool {
        self.verification_source(distro, pkg).is_some()
    }

    pub fn verification_source(&self, distro: DistroId, pkg: &str) -> Option<VerificationSource> {
        match distro {
            DistroId::Flatpak if self.flathub.contains(pkg) => Some(VerificationSource::Flathub),
            DistroId::Snap => {
                // "code --classic" -> "code"
                let name = pkg.split_whitespace().next().unwrap_or_default();
                self.snaps
                    .contains(name)
                    .then_some(VerificationSource::Snap)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_lookup_strips_flags() {
        let index = VerificationIndex::curated();
        assert_eq!(
            index.verification_source(DistroId::Snap, "code --classic"),
            Some(VerificationSource::Snap)
        );
        assert!(index.is_verified(DistroId::Snap, "firefox"));
        assert!(!index.is_verified(DistroId::Snap, "some-random-snap"));
    }

    #[test]
    fn only_flatpak_and_snap_are_meaningful() {
        let index = VerificationIndex::builtin();
        assert!(index.is_verified(DistroId::Flatpak, "org.mozilla.firefox"));
        assert!(!index.is_verified(DistroId::Arch, "firefox"));
        assert!(!index.is_verified(DistroId::Ubuntu, "org.mozilla.firefox"));
        assert_eq!(index.verification_source(DistroId::Homebrew, "firefox"), None);
    }

    #[test]
    fn empty_index_verifies_nothing() {
        let index = VerificationIndex::empty();
        assert!(!index.is_verified(DistroId::Flatpak, "org.mozilla.firefox"));
        assert!(!index.is_verified(DistroId::Snap, "firefox"));
    }

    #[test]
    fn snapshot_parsing() {
        let json = r#"{
            "meta": { "fetchedAt": "2026-01-02T03:04:05Z" },
            "count": 2,
            "apps": ["org.gimp.GIMP", ""],
            "snaps": ["my-snap"]
        }"#;
        let index = VerificationIndex::from_snapshot_json(json).unwrap();
        assert_eq!(index.flathub_count(), 1);
        assert_eq!(
            index.fetched_at().map(|ts| ts.to_rfc3339()),
            Some("2026-01-02T03:04:05+00:00".to_string())
        );
        assert_eq!(
            index.verification_source(DistroId::Flatpak, "org.gimp.GIMP"),
            Some(VerificationSource::Flathub)
        );
        assert!(index.is_verified(DistroId::Snap, "my-snap"));
    }

    #[test]
    fn bad_timestamp_is_not_fatal() {
        let json = r#"{ "meta": { "fetchedAt": "yesterday" }, "apps": [] }"#;
        let index = VerificationIndex::from_snapshot_json(json).unwrap();
        assert!(index.fetched_at().is_none());
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        assert!(VerificationIndex::from_snapshot_json("{ not json").is_err());
    }
}
