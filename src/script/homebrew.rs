use super::fragments::{self, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::command::PackageRef;

const IS_INSTALLED: &str = r#"is_installed() {
    case "$1" in
        --cask\ *) brew list --cask "${1#--cask }" &>/dev/null ;;
        *) brew list --formula "$1" &>/dev/null ;;
    esac
}"#;

// Casks are macOS-only; on Linux they are reported as skipped, not failed.
const CASK_GUARD: &str = r#"if [[ "$pkg" == --cask\ * ]] && [ "$(uname -s)" != "Darwin" ]; then
    echo -e "${DIM}○${NC} $name ${DIM}(cask, macOS only)${NC}"
    SKIPPED+=("$name")
    return 0
fi"#;

pub fn package_functions() -> String {
    // Unquoted so "--cask name" splits into flag and cask.
    let install = InstallFn::new("install_pkg", "brew install $pkg")
        .guard(CASK_GUARD)
        .note("No available formula", "Formula not found")
        .note("No Cask with this name", "Cask not found");
    format!("{IS_INSTALLED}\n\n{}", install.render())
}

pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions())
        .section(fragments::divider())
        .section(fragments::require_binary(
            "brew",
            Some("Install Homebrew first: https://brew.sh"),
        ))
        .section(fragments::sync_step(
            "Updating Homebrew",
            "brew update",
            "Updated",
            "Update failed, continuing...",
        ))
        .section(fragments::install_banner())
        .section(fragments::install_calls("install_pkg", packages, 0))
        .section(fragments::summary(None))
        .build()
}
