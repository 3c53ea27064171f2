use super::fragments::{self, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::command::PackageRef;

const IS_INSTALLED: &str = r#"is_installed() { rpm -q "$1" &>/dev/null; }"#;

pub fn package_functions() -> String {
    let install = InstallFn::new(
        "install_pkg",
        r#"sudo zypper --non-interactive install --auto-agree-with-licenses "$pkg""#,
    )
    .note("not found in package names", "Package not found");
    format!("{IS_INSTALLED}\n\n{}", install.render())
}

pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions())
        .section(fragments::divider())
        .section(fragments::refuse_root())
        .section(fragments::require_binary("zypper", None))
        .section(fragments::lock_wait(
            "[ -f /var/run/zypp.pid ]",
            "zypper",
            ctx.lock_timeout_secs,
        ))
        .section(fragments::sync_step(
            "Refreshing repos",
            "sudo zypper --non-interactive refresh",
            "Refreshed",
            "Refresh failed",
        ))
        .section(fragments::install_banner())
        .section(fragments::install_calls("install_pkg", packages, 0))
        .section(fragments::summary(None))
        .build()
}
