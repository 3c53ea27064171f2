use super::fragments::{self, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::classify::is_unfree_package;
use crate::command::PackageRef;

// nix-env reports `name-version`, not attribute paths: match the last
// segment followed by a version so `git` does not match `lazygit-0.40`.
const IS_INSTALLED: &str = r#"is_installed() {
    local name="${1##*.}"
    nix-env -q 2>/dev/null | grep -E "^${name}-[0-9]" >/dev/null
}"#;

pub fn package_functions() -> String {
    let install = InstallFn::new("install_pkg", r#"nix-env -iA "nixpkgs.$pkg""#)
        .note("attribute.*not found", "Attribute not found")
        .note("unfree", "Unfree license - allowUnfree required");
    format!("{IS_INSTALLED}\n\n{}", install.render())
}

fn allow_unfree(packages: &[PackageRef<'_>]) -> String {
    let unfree: Vec<&str> = packages
        .iter()
        .map(|p| p.pkg)
        .filter(|pkg| is_unfree_package(pkg))
        .collect();
    if unfree.is_empty() {
        return String::new();
    }
    format!(
        "# Unfree: {}\nexport NIXPKGS_ALLOW_UNFREE=1",
        unfree.join(", ")
    )
}

pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions())
        .section(fragments::divider())
        .section(fragments::require_binary("nix-env", None))
        .section(allow_unfree(packages))
        .section(fragments::sync_step(
            "Updating channels",
            "nix-channel --update",
            "Updated",
            "Update failed",
        ))
        .section(fragments::install_banner())
        .section(fragments::install_calls("install_pkg", packages, 0))
        .section(fragments::summary(Some("Restart your shell for new commands.")))
        .build()
}
