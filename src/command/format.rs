use crate::classify::is_aur_package;
use crate::classify::is_unfree_package;

use super::options::AurHelper;

pub const FLATHUB_REPO_URL: &str = "https://dl.flathub.org/repo/flathub.flatpakrepo";
pub const CASK_MARKER: &str = "--cask ";

/// `prefix pkg` for one package, otherwise one package per continued line.
pub fn multi_line(prefix: &str, packages: &[&str]) -> String {
    match packages {
        [] => String::new(),
        [only] => format!("{prefix} {only}"),
        _ => format!("{prefix} \\\n  {}", packages.join(" \\\n  ")),
    }
}

pub fn apt(packages: &[&str]) -> String {
    multi_line("sudo apt install -y", packages)
}

pub fn dnf(packages: &[&str]) -> String {
    multi_line("sudo dnf install -y", packages)
}

pub fn zypper(packages: &[&str]) -> String {
    multi_line("sudo zypper install -y", packages)
}

pub fn helper_bootstrap(helper: AurHelper) -> String {
    let name = helper.as_str();
    format!(
        "sudo pacman -S --needed git base-devel && \\\n\
         git clone https://aur.archlinux.org/{name}.git /tmp/{name} && \\\n\
         cd /tmp/{name} && \\\n\
         makepkg -si --noconfirm && \\\n\
         cd - && \\\n\
         rm -rf /tmp/{name}"
    )
}

/// Official packages go through pacman; as soon as one AUR package is present
/// the helper installs everything.
pub fn pacman(packages: &[&str], helper: AurHelper, has_helper_installed: bool) -> String {
    if packages.is_empty() {
        return String::new();
    }
    if !packages.iter().any(|pkg| is_aur_package(pkg)) {
        return multi_line("sudo pacman -S --needed --noconfirm", packages);
    }

    let install = multi_line(&format!("{helper} -S --needed --noconfirm"), packages);
    if has_helper_installed {
        install
    } else {
        format!("{} && \\\n{install}", helper_bootstrap(helper))
    }
}

pub fn nix_env(packages: &[&str]) -> String {
    let attrs: Vec<String> = packages.iter().map(|pkg| format!("nixpkgs.{pkg}")).collect();
    let attrs: Vec<&str> = attrs.iter().map(String::as_str).collect();
    multi_line("nix-env -iA", &attrs)
}

/// Declarative `environment.systemPackages` block, sorted for stable diffs.
pub fn nix_config(packages: &[&str]) -> String {
    let mut sorted: Vec<&str> = packages
        .iter()
        .map(|pkg| pkg.trim())
        .filter(|pkg| !pkg.is_empty())
        .collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut out = String::new();
    let unfree: Vec<&str> = sorted
        .iter()
        .copied()
        .filter(|pkg| is_unfree_package(pkg))
        .collect();
    if !unfree.is_empty() {
        out.push_str(&format!(
            "# Unfree packages selected ({}); requires:\n# nixpkgs.config.allowUnfree = true;\n",
            unfree.join(", ")
        ));
    }

    let body: Vec<String> = sorted.iter().map(|pkg| format!("    {pkg}")).collect();
    out.push_str(&format!(
        "environment.systemPackages = with pkgs; [\n{}\n];",
        body.join("\n")
    ));
    out
}

pub fn flathub_remote() -> String {
    format!("sudo flatpak remote-add --if-not-exists flathub {FLATHUB_REPO_URL}")
}

pub fn flatpak(packages: &[&str], with_remote: bool) -> String {
    let install = multi_line("flatpak install flathub -y", packages);
    match (with_remote, install.is_empty()) {
        (true, false) => format!("{}\n{install}", flathub_remote()),
        (true, true) => flathub_remote(),
        (false, _) => install,
    }
}

/// One `snap install` per package: each token may carry its own flags.
pub fn snap(packages: &[&str]) -> String {
    packages
        .iter()
        .map(|pkg| format!("sudo snap install {pkg}"))
        .collect::<Vec<_>>()
        .join(" && \\\n")
}

pub fn split_casks<'a>(packages: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut formulae = Vec::new();
    let mut casks = Vec::new();
    for pkg in packages {
        match pkg.strip_prefix(CASK_MARKER) {
            Some(cask) => casks.push(cask.trim()),
            None => formulae.push(*pkg),
        }
    }
    (formulae, casks)
}

pub fn homebrew(packages: &[&str]) -> String {
    let (formulae, casks) = split_casks(packages);
    let mut parts = Vec::new();
    if !formulae.is_empty() {
        parts.push(multi_line("brew install", &formulae));
    }
    if !casks.is_empty() {
        parts.push(multi_line("brew install --cask", &casks));
    }
    parts.join(" && \\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_layout() {
        assert_eq!(multi_line("sudo apt install -y", &[]), "");
        assert_eq!(multi_line("sudo apt install -y", &["vlc"]), "sudo apt install -y vlc");
        assert_eq!(
            multi_line("sudo apt install -y", &["vlc", "git"]),
            "sudo apt install -y \\\n  vlc \\\n  git"
        );
    }

    #[test]
    fn pacman_without_aur() {
        assert_eq!(
            pacman(&["firefox", "git"], AurHelper::Yay, false),
            "sudo pacman -S --needed --noconfirm \\\n  firefox \\\n  git"
        );
    }

    #[test]
    fn pacman_with_aur_and_helper_present() {
        assert_eq!(
            pacman(&["firefox", "spotify"], AurHelper::Paru, true),
            "paru -S --needed --noconfirm \\\n  firefox \\\n  spotify"
        );
    }

    #[test]
    fn pacman_bootstraps_missing_helper() {
        let cmd = pacman(&["vscodium-bin"], AurHelper::Yay, false);
        assert!(cmd.starts_with("sudo pacman -S --needed git base-devel && \\\n"));
        assert!(cmd.contains("git clone https://aur.archlinux.org/yay.git /tmp/yay"));
        assert!(cmd.contains("makepkg -si --noconfirm"));
        assert!(cmd.ends_with("rm -rf /tmp/yay && \\\nyay -S --needed --noconfirm vscodium-bin"));
    }

    #[test]
    fn nix_config_sorted_and_deduplicated() {
        assert_eq!(
            nix_config(&["vlc", " ", "git", "vlc"]),
            "environment.systemPackages = with pkgs; [\n    git\n    vlc\n];"
        );
    }

    #[test]
    fn nix_config_flags_unfree() {
        let out = nix_config(&["spotify", "git"]);
        assert!(out.starts_with("# Unfree packages selected (spotify); requires:\n"));
        assert!(out.contains("nixpkgs.config.allowUnfree = true;"));
        assert!(out.ends_with("    git\n    spotify\n];"));
    }

    #[test]
    fn nix_env_prefixes_attributes() {
        assert_eq!(nix_env(&["git"]), "nix-env -iA nixpkgs.git");
    }

    #[test]
    fn flatpak_with_remote() {
        assert_eq!(
            flatpak(&["org.gimp.GIMP"], true),
            format!(
                "sudo flatpak remote-add --if-not-exists flathub {FLATHUB_REPO_URL}\n\
                 flatpak install flathub -y org.gimp.GIMP"
            )
        );
    }

    #[test]
    fn snap_one_command_per_package() {
        assert_eq!(
            snap(&["vlc", "code --classic"]),
            "sudo snap install vlc && \\\nsudo snap install code --classic"
        );
    }

    #[test]
    fn homebrew_splits_casks() {
        assert_eq!(
            homebrew(&["git", "--cask firefox", "neovim", "--cask vlc"]),
            "brew install \\\n  git \\\n  neovim && \\\nbrew install --cask \\\n  firefox \\\n  vlc"
        );
        assert_eq!(homebrew(&["--cask firefox"]), "brew install --cask firefox");
    }
}
