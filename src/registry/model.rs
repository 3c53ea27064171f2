use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistroId {
    Ubuntu,
    Debian,
    Arch,
    Fedora,
    Opensuse,
    Nix,
    Flatpak,
    Snap,
    Homebrew,
}

impl DistroId {
    pub const ALL: [DistroId; 9] = [
        DistroId::Ubuntu,
        DistroId::Debian,
        DistroId::Arch,
        DistroId::Fedora,
        DistroId::Opensuse,
        DistroId::Nix,
        DistroId::Flatpak,
        DistroId::Snap,
        DistroId::Homebrew,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistroId::Ubuntu => "ubuntu",
            DistroId::Debian => "debian",
            DistroId::Arch => "arch",
            DistroId::Fedora => "fedora",
            DistroId::Opensuse => "opensuse",
            DistroId::Nix => "nix",
            DistroId::Flatpak => "flatpak",
            DistroId::Snap => "snap",
            DistroId::Homebrew => "homebrew",
        }
    }

    /// Display name used in script banners when the catalog has no record.
    pub fn label(&self) -> &'static str {
        match self {
            DistroId::Ubuntu => "Ubuntu",
            DistroId::Debian => "Debian",
            DistroId::Arch => "Arch Linux",
            DistroId::Fedora => "Fedora",
            DistroId::Opensuse => "openSUSE",
            DistroId::Nix => "Nix",
            DistroId::Flatpak => "Flatpak",
            DistroId::Snap => "Snap",
            DistroId::Homebrew => "Homebrew",
        }
    }
}

impl fmt::Display for DistroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistroId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        DistroId::ALL
            .into_iter()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| {
                let known: Vec<&str> = DistroId::ALL.iter().map(|id| id.as_str()).collect();
                anyhow::anyhow!(
                    "unknown distribution '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distro {
    pub id: DistroId,
    pub name: String,
    pub install_prefix: String,
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(deserialize_with = "present_targets")]
    pub targets: BTreeMap<DistroId, String>,
}

impl AppEntry {
    pub fn package_for(&self, distro: DistroId) -> Option<&str> {
        self.targets.get(&distro).map(String::as_str)
    }

    pub fn is_available(&self, distro: DistroId) -> bool {
        self.targets.contains_key(&distro)
    }

    /// No native package for `distro`, but a Flathub one exists.
    pub fn is_flatpak_only(&self, distro: DistroId) -> bool {
        distro != DistroId::Flatpak
            && !self.is_available(distro)
            && self.is_available(DistroId::Flatpak)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub distros: Vec<Distro>,
    pub categories: Vec<String>,
    pub apps: Vec<AppEntry>,
}

// `null` and blank targets mean "not packaged for this distro".
fn present_targets<'de, D>(deserializer: D) -> Result<BTreeMap<DistroId, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<DistroId, Option<String>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(distro, pkg)| {
            pkg.filter(|value| !value.trim().is_empty())
                .map(|value| (distro, value))
        })
        .collect())
}
