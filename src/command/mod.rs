//! One-line install commands for on-screen preview and clipboard copy.
//!
//! Everything here is a pure function of the catalog and its arguments. An
//! empty or unusable selection yields a sentinel comment, never an error.

pub mod format;
pub mod options;
pub mod resolve;

use chrono::{DateTime, Utc};

use crate::registry::{Catalog, DistroId};

pub use options::{AurHelper, CommandOptions};
pub use resolve::{resolve, selected_packages, PackageRef, Resolved};

pub const EMPTY_SELECTION: &str = "# Select apps above to generate command";
pub const NO_PACKAGES: &str = "# No packages selected";

pub fn unsupported_distro(distro_id: &str) -> String {
    format!("# Unsupported distribution: {distro_id}")
}

/// Install command for the selected apps on `distro_id`.
pub fn generate<S: AsRef<str>>(
    catalog: &Catalog,
    distro_id: &str,
    app_ids: &[S],
    options: &CommandOptions,
) -> String {
    match distro_id.parse::<DistroId>() {
        Ok(distro) => generate_for(catalog, distro, app_ids, options),
        Err(_) => unsupported_distro(distro_id),
    }
}

pub fn generate_for<S: AsRef<str>>(
    catalog: &Catalog,
    distro: DistroId,
    app_ids: &[S],
    options: &CommandOptions,
) -> String {
    let resolved = resolve(catalog, distro, app_ids, options.include_flatpak_fallback);
    if resolved.is_empty() {
        return EMPTY_SELECTION.to_string();
    }

    let packages = resolved.native_tokens();
    let mut command = match distro {
        DistroId::Ubuntu | DistroId::Debian => format::apt(&packages),
        DistroId::Arch => format::pacman(
            &packages,
            options.aur_helper,
            options.has_helper_installed,
        ),
        DistroId::Fedora => format::dnf(&packages),
        DistroId::Opensuse => format::zypper(&packages),
        DistroId::Nix => format::nix_env(&packages),
        DistroId::Flatpak => format::flatpak(&packages, true),
        DistroId::Snap => format::snap(&packages),
        DistroId::Homebrew => format::homebrew(&packages),
    };

    let fallback = resolved.fallback_tokens();
    if distro != DistroId::Flatpak && !fallback.is_empty() {
        let block = format!("# Install Flatpak apps:\n{}", format::flatpak(&fallback, true));
        if command.is_empty() {
            command = block;
        } else {
            command = format!("{command}\n\n{block}");
        }
    }

    if command.is_empty() {
        NO_PACKAGES.to_string()
    } else {
        command
    }
}

/// Declarative NixOS configuration fragment for the selected apps.
pub fn generate_nix_config<S: AsRef<str>>(catalog: &Catalog, app_ids: &[S]) -> String {
    let packages: Vec<&str> = selected_packages(catalog, DistroId::Nix, app_ids)
        .iter()
        .map(|p| p.pkg)
        .collect();
    if packages.is_empty() {
        return EMPTY_SELECTION.to_string();
    }
    format::nix_config(&packages)
}

/// Minimal runnable wrapper around the one-liner. Nix gets its config block.
pub fn generate_download_script<S: AsRef<str>>(
    catalog: &Catalog,
    distro_id: &str,
    app_ids: &[S],
    options: &CommandOptions,
    generated_at: DateTime<Utc>,
) -> String {
    let Ok(distro) = distro_id.parse::<DistroId>() else {
        return "#!/bin/bash\necho \"Error: Unknown distribution\"\nexit 1\n".to_string();
    };
    if distro == DistroId::Nix {
        return generate_nix_config(catalog, app_ids);
    }

    let command = generate_for(catalog, distro, app_ids, options);
    format!(
        "#!/bin/bash\n\
         # TuxMate Install Script for {}\n\
         # Generated: {}\n\
         \n\
         set -euo pipefail\n\
         \n\
         {command}\n\
         \n\
         echo \"Installation complete!\"\n",
        catalog.distro_name(distro),
        generated_at.to_rfc3339(),
    )
}

/// Installs the `flatpak` binary itself with the native package manager.
pub fn flatpak_bootstrap_for(distro: DistroId) -> Option<&'static str> {
    match distro {
        DistroId::Ubuntu | DistroId::Debian => Some("sudo apt install -y flatpak"),
        DistroId::Arch => Some("sudo pacman -S --needed --noconfirm flatpak"),
        DistroId::Fedora => Some("sudo dnf install -y flatpak"),
        DistroId::Opensuse => Some("sudo zypper install -y flatpak"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin_catalog;

    fn command(distro: &str, apps: &[&str]) -> String {
        let catalog = builtin_catalog().unwrap();
        generate(&catalog, distro, apps, &CommandOptions::default())
    }

    #[test]
    fn empty_selection_is_a_sentinel_everywhere() {
        for distro in DistroId::ALL {
            assert_eq!(command(distro.as_str(), &[]), EMPTY_SELECTION);
        }
        assert_eq!(command("ubuntu", &["discord"]), EMPTY_SELECTION);
        assert_eq!(command("gentoo", &["vlc"]), "# Unsupported distribution: gentoo");
    }

    #[test]
    fn keeps_selection_order_and_drops_duplicates() {
        assert_eq!(
            command("fedora", &["vlc", "git", "vlc", "nope"]),
            "sudo dnf install -y \\\n  vlc \\\n  git"
        );
    }

    #[test]
    fn flatpak_fallback_block() {
        let out = command("ubuntu", &["flatpaksupport", "vlc", "discord"]);
        assert_eq!(
            out,
            format!(
                "sudo apt install -y \\\n  flatpak \\\n  vlc\n\n\
                 # Install Flatpak apps:\n\
                 sudo flatpak remote-add --if-not-exists flathub {}\n\
                 flatpak install flathub -y com.discordapp.Discord",
                format::FLATHUB_REPO_URL
            )
        );
    }

    #[test]
    fn fallback_respects_option() {
        let catalog = builtin_catalog().unwrap();
        let options = CommandOptions {
            include_flatpak_fallback: false,
            ..CommandOptions::default()
        };
        assert_eq!(
            generate(&catalog, "ubuntu", &["flatpaksupport", "discord"], &options),
            "sudo apt install -y flatpak"
        );
    }

    #[test]
    fn snap_chains_installs() {
        assert_eq!(
            command("snap", &["vlc", "vscode"]),
            "sudo snap install vlc && \\\nsudo snap install code --classic"
        );
    }

    #[test]
    fn nix_config_for_selection() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(
            generate_nix_config(&catalog, &["vlc", "git"]),
            "environment.systemPackages = with pkgs; [\n    git\n    vlc\n];"
        );
        assert_eq!(generate_nix_config::<&str>(&catalog, &[]), EMPTY_SELECTION);
    }

    #[test]
    fn download_script_wraps_command() {
        let catalog = builtin_catalog().unwrap();
        let at = DateTime::parse_from_rfc3339("2026-10-19T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let out = generate_download_script(
            &catalog,
            "fedora",
            &["git"],
            &CommandOptions::default(),
            at,
        );
        assert!(out.starts_with("#!/bin/bash\n"));
        assert!(out.contains("# Generated: 2026-10-19T08:00:00+00:00\n"));
        assert!(out.contains("set -euo pipefail\n\nsudo dnf install -y git\n"));
        assert!(out.ends_with("echo \"Installation complete!\"\n"));

        let nix = generate_download_script(&catalog, "nix", &["git"], &CommandOptions::default(), at);
        assert!(nix.starts_with("environment.systemPackages"));
    }

    #[test]
    fn flatpak_bootstrap_only_for_native_managers() {
        assert_eq!(
            flatpak_bootstrap_for(DistroId::Fedora),
            Some("sudo dnf install -y flatpak")
        );
        assert_eq!(flatpak_bootstrap_for(DistroId::Snap), None);
    }
}
