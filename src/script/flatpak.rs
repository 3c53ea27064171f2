use super::fragments::{self, InstallFn, ScriptBuilder};
use super::ScriptContext;
use crate::command::format::FLATHUB_REPO_URL;
use crate::command::PackageRef;
use crate::script::escape::escape_shell_string;

/// From this many packages on, installs run as parallel background jobs.
pub const PARALLEL_THRESHOLD: usize = 3;

const IS_INSTALLED: &str = r#"is_installed() { flatpak info "$1" &>/dev/null; }"#;

const INSTALL_PARALLEL: &str = r#"install_parallel() {
    local pids=()
    local names=()
    local start
    start=$(date +%s)

    for pair in "$@"; do
        local name="${pair%%|*}"
        local appid="${pair##*|}"
        CURRENT=$((CURRENT + 1))

        if is_installed "$appid"; then
            skip "$name"
            SKIPPED+=("$name")
            continue
        fi

        (with_retry flatpak install flathub -y "$appid" >/dev/null 2>&1) &
        pids+=($!)
        names+=("$name")
    done

    local total=${#pids[@]}
    if [ "$total" -eq 0 ]; then
        return 0
    fi

    info "Installing $total apps in parallel..."

    local i
    for i in "${!pids[@]}"; do
        if wait "${pids[$i]}"; then
            SUCCEEDED+=("${names[$i]}")
            success "${names[$i]}"
        else
            FAILED+=("${names[$i]}")
            error "${names[$i]} failed"
        fi
    done

    local elapsed=$(($(date +%s) - start))
    echo -e "${DIM}Parallel install took ${elapsed}s${NC}"
}"#;

const ADD_FLATHUB: &str = r#"if ! flatpak remotes 2>/dev/null | grep flathub >/dev/null; then
    info "Adding Flathub..."
    flatpak remote-add --if-not-exists flathub {{url}}
    success "Flathub added"
fi"#;

pub fn package_functions(parallel: bool) -> String {
    let install = if parallel {
        INSTALL_PARALLEL.to_string()
    } else {
        InstallFn::new("install_pkg", r#"flatpak install flathub -y "$pkg""#).render()
    };
    format!("{IS_INSTALLED}\n\n{install}")
}

fn parallel_call(packages: &[PackageRef<'_>]) -> String {
    let pairs: Vec<String> = packages
        .iter()
        .map(|p| format!("\"{}|{}\"", escape_shell_string(&p.app.name), p.pkg))
        .collect();
    format!("install_parallel {}", pairs.join(" "))
}

pub fn render(ctx: &ScriptContext<'_>, packages: &[PackageRef<'_>]) -> String {
    let parallel = packages.len() >= PARALLEL_THRESHOLD;
    let calls = if parallel {
        parallel_call(packages)
    } else {
        fragments::install_calls("install_pkg", packages, 0)
    };

    ScriptBuilder::new()
        .section(fragments::header(ctx.distro_name, packages.len(), ctx.generated_at))
        .section(fragments::shared_utils(packages.len()))
        .section(package_functions(parallel))
        .section(fragments::divider())
        .section(fragments::require_binary(
            "flatpak",
            Some("Install: sudo apt/dnf/pacman install flatpak"),
        ))
        .section(fragments::fill(ADD_FLATHUB, &[("url", FLATHUB_REPO_URL)]))
        .section(fragments::install_banner())
        .section(calls)
        .section(fragments::summary(Some("Restart session for apps in menu.")))
        .build()
}
