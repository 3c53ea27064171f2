use std::fs;

use which::which;

use crate::command::AurHelper;
use crate::registry::DistroId;

const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Package-manager binaries probed when os-release is missing or unknown.
const PROBES: [(&str, DistroId); 8] = [
    ("apt-get", DistroId::Debian),
    ("pacman", DistroId::Arch),
    ("dnf", DistroId::Fedora),
    ("zypper", DistroId::Opensuse),
    ("nix-env", DistroId::Nix),
    ("brew", DistroId::Homebrew),
    ("flatpak", DistroId::Flatpak),
    ("snap", DistroId::Snap),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub id_like: Vec<String>,
    pub pretty_name: Option<String>,
}

impl OsRelease {
    pub fn parse(text: &str) -> Self {
        let mut release = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            match key.trim() {
                "ID" => release.id = value.to_ascii_lowercase(),
                "ID_LIKE" => {
                    release.id_like = value
                        .split_whitespace()
                        .map(str::to_ascii_lowercase)
                        .collect()
                }
                "PRETTY_NAME" => release.pretty_name = Some(value.to_string()),
                _ => {}
            }
        }
        release
    }

    pub fn read() -> Option<Self> {
        OS_RELEASE_PATHS
            .iter()
            .find_map(|path| fs::read_to_string(path).ok())
            .map(|text| Self::parse(&text))
    }

    /// `ID` wins over `ID_LIKE`; the first recognised `ID_LIKE` entry is used.
    pub fn distro(&self) -> Option<DistroId> {
        std::iter::once(self.id.as_str())
            .chain(self.id_like.iter().map(String::as_str))
            .find_map(distro_for_os_id)
    }
}

fn distro_for_os_id(id: &str) -> Option<DistroId> {
    let distro = match id {
        "ubuntu" | "linuxmint" | "pop" | "elementary" | "zorin" | "neon" => DistroId::Ubuntu,
        "debian" | "raspbian" | "kali" => DistroId::Debian,
        "arch" | "manjaro" | "endeavouros" | "cachyos" | "garuda" | "artix" => DistroId::Arch,
        "fedora" | "nobara" | "ultramarine" => DistroId::Fedora,
        "nixos" => DistroId::Nix,
        id if id == "suse" || id.starts_with("opensuse") || id.starts_with("sles") => {
            DistroId::Opensuse
        }
        _ => return None,
    };
    Some(distro)
}

pub fn is_binary_installed(binary: &str) -> bool {
    which(binary).is_ok()
}

/// First package manager for which `installed` answers true.
pub fn probe_package_manager(installed: impl Fn(&str) -> bool) -> Option<DistroId> {
    PROBES
        .iter()
        .find(|(binary, _)| installed(binary))
        .map(|(_, distro)| *distro)
}

pub fn detect_distro() -> Option<DistroId> {
    if cfg!(target_os = "macos") {
        return Some(DistroId::Homebrew);
    }

    if let Some(release) = OsRelease::read() {
        if let Some(distro) = release.distro() {
            log::debug!("os-release id '{}' maps to {distro}", release.id);
            return Some(distro);
        }
        log::debug!("os-release id '{}' is not recognised", release.id);
    }

    let probed = probe_package_manager(is_binary_installed);
    log::debug!("package manager probe: {probed:?}");
    probed
}

/// Installed AUR helper, preferring yay.
pub fn detect_aur_helper() -> Option<AurHelper> {
    [AurHelper::Yay, AurHelper::Paru]
        .into_iter()
        .find(|helper| is_binary_installed(helper.as_str()))
}
