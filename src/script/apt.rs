use super::fragments::{self, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::command::PackageRef;

const IS_INSTALLED: &str = r#"is_installed() { dpkg -l "$1" 2>/dev/null | grep "^ii" >/dev/null; }

fix_deps() {
    if sudo apt-get --fix-broken install -y >/dev/null 2>&1; then
        success "Dependencies fixed"
        return 0
    fi
    return 1
}"#;

pub fn package_functions() -> String {
    let install = InstallFn::new("install_pkg", r#"sudo apt-get install -y "$pkg""#)
        .note("Unable to locate", "Package not found")
        .repair(
            "unmet dependencies",
            "Fixing dependencies...",
            "fix_deps",
            r#"sudo apt-get install -y "$pkg""#,
        );
    format!("{IS_INSTALLED}\n\n{}", install.render())
}

/// Ubuntu and Debian share this template.
pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions())
        .section(fragments::divider())
        .section(fragments::refuse_root())
        .section(fragments::lock_wait(
            "fuser /var/lib/dpkg/lock-frontend >/dev/null 2>&1",
            "package manager",
            ctx.lock_timeout_secs,
        ))
        .section(fragments::sync_step(
            "Updating package lists",
            "sudo apt-get update -qq",
            "Updated",
            "Update failed, continuing...",
        ))
        .section(fragments::install_banner())
        .section(fragments::install_calls("install_pkg", packages, 0))
        .section(fragments::summary(None))
        .build()
}
