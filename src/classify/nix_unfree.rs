/// Nix attributes whose license needs `allowUnfree`.
pub const KNOWN_UNFREE_PACKAGES: &[&str] = &[
    "google-chrome",
    "vscode",
    "discord",
    "slack",
    "zoom-us",
    "spotify",
    "steam",
    "obsidian",
    "sublime4",
    "postman",
    "dropbox",
    "idea-ultimate",
    "pycharm-professional",
    "webstorm",
    "clion",
    "goland",
    "rider",
    "datagrip",
    "teams-for-linux",
    "skypeforlinux",
    "vivaldi",
    "microsoft-edge",
    "anydesk",
    "teamviewer",
    "davinci-resolve",
    "nvidia-x11",
    "unrar",
    "cursor",
];

pub fn is_unfree_package(pkg: &str) -> bool {
    let clean = pkg.trim().to_lowercase();
    if clean.is_empty() {
        return false;
    }

    // Substring pass also catches namespaced attributes (jetbrains.idea-ultimate).
    KNOWN_UNFREE_PACKAGES
        .iter()
        .any(|unfree| clean == *unfree || clean.contains(unfree))
}
