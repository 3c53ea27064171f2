/// Suffixes used by AUR-only packaging conventions.
pub const AUR_SUFFIXES: [&str; 3] = ["-bin", "-git", "-appimage"];

/// AUR-only packages whose names do not carry one of [`AUR_SUFFIXES`].
pub const KNOWN_AUR_PACKAGES: &[&str] = &[
    // browsers
    "google-chrome",
    "zen-browser-bin",
    "helium-browser-bin",
    "brave-bin",
    "librewolf-bin",
    // communication
    "slack-desktop",
    "zoom",
    "vesktop-bin",
    // editors
    "sublime-text-4",
    "vscodium-bin",
    "cursor-bin",
    // dev tools
    "postman-bin",
    "bruno-bin",
    "hoppscotch-bin",
    "bun-bin",
    // media
    "spotify",
    "stremio",
    // gaming
    "heroic-games-launcher-bin",
    "protonup-qt-bin",
    // office
    "onlyoffice-bin",
    "logseq-desktop-bin",
    "joplin-appimage",
    // vpn
    "proton-vpn-gtk-app",
    "mullvad-vpn-bin",
    // file sharing
    "localsend-bin",
    "dropbox",
    "ab-download-manager-bin",
    // security
    "bitwarden",
    // creative
    "orcaslicer-bin",
];

/// Whether an Arch package must be built from the AUR.
///
/// The curated list is authoritative; the suffix match is a naming heuristic.
pub fn is_aur_package(pkg: &str) -> bool {
    KNOWN_AUR_PACKAGES.contains(&pkg) || AUR_SUFFIXES.iter().any(|suffix| pkg.ends_with(suffix))
}
