use super::fragments::{self, fill, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::classify::is_aur_package;
use crate::command::{AurHelper, PackageRef};

const IS_INSTALLED: &str = r#"is_installed() { pacman -Qi "$1" &>/dev/null; }"#;

const HELPER_BOOTSTRAP: &str = r##"bootstrap_aur_helper() {
    warn "Installing {{helper}} for AUR packages..."
    sudo pacman -S --needed --noconfirm git base-devel >/dev/null 2>&1 || return 1
    local tmp
    tmp=$(mktemp -d)
    local status=0
    git clone https://aur.archlinux.org/{{helper}}.git "$tmp/{{helper}}" >/dev/null 2>&1 &&
        (cd "$tmp/{{helper}}" && makepkg -si --noconfirm >/dev/null 2>&1) || status=1
    rm -rf "$tmp"
    return $status
}

if ! command -v {{helper}} &>/dev/null; then
    if bootstrap_aur_helper && command -v {{helper}} &>/dev/null; then
        success "{{helper}} installed"
    else
        warn "{{helper}} install failed"
    fi
fi"##;

pub fn package_functions(helper: AurHelper) -> String {
    let pacman = InstallFn::new(
        "install_pacman",
        r#"sudo pacman -S --needed --noconfirm "$pkg""#,
    )
    .note("target not found", "Package not found")
    .note(
        "signature",
        "GPG issue - try: sudo pacman-key --refresh-keys",
    );
    let aur = InstallFn::new(
        "install_aur",
        format!(r#"{helper} -S --needed --noconfirm "$pkg""#),
    )
    .note("target not found", "Package not found in AUR");

    format!("{IS_INSTALLED}\n\n{}\n\n{}", pacman.render(), aur.render())
}

pub fn helper_bootstrap(helper: AurHelper) -> String {
    fill(HELPER_BOOTSTRAP, &[("helper", helper.as_str())])
}

/// AUR installs only run when the helper is usable; otherwise every AUR
/// package is reported as failed instead of disappearing from the summary.
fn aur_block(helper: AurHelper, packages: &[PackageRef<'_>]) -> String {
    if packages.is_empty() {
        return String::new();
    }
    format!(
        "if command -v {helper} &>/dev/null; then\n{}\nelse\n    error \"{helper} unavailable, cannot install AUR packages\"\n{}\nfi",
        fragments::install_calls("install_aur", packages, 4),
        fragments::mark_failed(packages, 4),
    )
}

pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    let (aur, official): (Vec<PackageRef<'_>>, Vec<PackageRef<'_>>) =
        packages.iter().copied().partition(|p| is_aur_package(p.pkg));

    let bootstrap = if aur.is_empty() {
        String::new()
    } else {
        helper_bootstrap(ctx.helper)
    };

    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions(ctx.helper))
        .section(fragments::divider())
        .section(fragments::refuse_root())
        .section(fragments::lock_wait(
            "[ -f /var/lib/pacman/db.lck ]",
            "pacman lock",
            ctx.lock_timeout_secs,
        ))
        .section(fragments::sync_step(
            "Syncing databases",
            "sudo pacman -Sy --noconfirm",
            "Synced",
            "Sync failed, continuing...",
        ))
        .section(bootstrap)
        .section(fragments::install_banner())
        .section(fragments::install_calls("install_pacman", &official, 0))
        .section(aur_block(ctx.helper, &aur))
        .section(fragments::summary(None))
        .build()
}
