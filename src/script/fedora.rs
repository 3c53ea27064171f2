use super::fragments::{self, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::command::PackageRef;

/// Packages that only resolve once RPM Fusion is enabled.
pub const RPM_FUSION_PACKAGES: &[&str] = &["steam", "vlc", "ffmpeg", "obs-studio"];

const IS_INSTALLED: &str = r#"is_installed() { rpm -q "$1" &>/dev/null; }"#;

const ENABLE_RPM_FUSION: &str = r#"if ! dnf repolist 2>/dev/null | grep rpmfusion >/dev/null; then
    info "Enabling RPM Fusion..."
    sudo dnf install -y \
        "https://mirrors.rpmfusion.org/free/fedora/rpmfusion-free-release-$(rpm -E %fedora).noarch.rpm" \
        "https://mirrors.rpmfusion.org/nonfree/fedora/rpmfusion-nonfree-release-$(rpm -E %fedora).noarch.rpm" \
        >/dev/null 2>&1 && success "RPM Fusion enabled" || warn "Could not enable RPM Fusion"
fi"#;

pub fn needs_rpm_fusion(packages: &[PackageRef<'_>]) -> bool {
    packages
        .iter()
        .any(|p| RPM_FUSION_PACKAGES.contains(&p.pkg))
}

pub fn package_functions() -> String {
    let install = InstallFn::new("install_pkg", r#"sudo dnf install -y "$pkg""#)
        .note("No match", "Package not found");
    format!("{IS_INSTALLED}\n\n{}", install.render())
}

pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    let rpm_fusion = if needs_rpm_fusion(packages) {
        ENABLE_RPM_FUSION
    } else {
        ""
    };

    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions())
        .section(fragments::divider())
        .section(fragments::refuse_root())
        .section(fragments::require_binary("dnf", None))
        .section(rpm_fusion)
        .section(fragments::install_banner())
        .section(fragments::install_calls("install_pkg", packages, 0))
        .section(fragments::summary(None))
        .build()
}
