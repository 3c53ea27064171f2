use super::fragments::{self, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::command::PackageRef;

// Tokens may carry flags ("code --classic"); only the first word is the snap.
const IS_INSTALLED: &str = r#"is_installed() {
    local snap_name="${1%% *}"
    snap list "$snap_name" &>/dev/null
}"#;

const START_SNAPD: &str = r#"if command -v systemctl &>/dev/null && ! systemctl is-active --quiet snapd; then
    info "Starting snapd..."
    sudo systemctl enable --now snapd.socket
    sudo systemctl start snapd
    sleep 2
    success "snapd started"
fi"#;

pub fn package_functions() -> String {
    // $pkg is left unquoted so flags split into separate arguments.
    let install = InstallFn::new("install_pkg", "sudo snap install $pkg")
        .note("not found", "Snap not found");
    format!("{IS_INSTALLED}\n\n{}", install.render())
}

pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions())
        .section(fragments::divider())
        .section(fragments::require_binary(
            "snap",
            Some("Install: sudo apt/dnf/pacman install snapd"),
        ))
        .section(START_SNAPD)
        .section(fragments::install_banner())
        .section(fragments::install_calls("install_pkg", packages, 0))
        .section(fragments::summary(None))
        .build()
}
