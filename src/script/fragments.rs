//! Named pieces of shell that every install script is assembled from.
//!
//! Templates use `{{name}}` placeholders; nothing else in them is
//! interpreted, so shell `${...}` expansions are written verbatim.

use chrono::{DateTime, Utc};

use super::escape::{comment_safe, escape_shell_string};
use crate::command::PackageRef;

pub const RULE: &str =
    "# ─────────────────────────────────────────────────────────────────────────────";

/// Replace every `{{key}}` in `template`.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |out, (key, value)| {
        out.replace(&format!("{{{{{key}}}}}"), value)
    })
}

/// Ordered list of fragments joined into one script.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    sections: Vec<String>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.trim().is_empty() {
            self.sections.push(text.trim_end_matches('\n').to_string());
        }
        self
    }

    pub fn build(self) -> String {
        let mut out = self.sections.join("\n\n");
        out.push('\n');
        out
    }
}

const HEADER: &str = r##"#!/bin/bash
#
#   _                                 _
#  | |_ _   ___  ___ __ ___   __ _ __| |_ ___
#  | __| | | \ \/ / '_ ` _ \ / _` |__ __/ _ \
#  | |_| |_| |>  <| | | | | | (_| | | ||  __/
#   \__|\__,_/_/\_\_| |_| |_|\__,_| |_| \___|
#
#  Linux App Installer
#
#  Distribution: {{distro}}
#  Packages: {{count}}
#  Generated: {{generated}}
#
{{rule}}

set -euo pipefail"##;

pub fn header(distro_name: &str, pkg_count: usize, generated_at: DateTime<Utc>) -> String {
    let distro = comment_safe(distro_name);
    let count = pkg_count.to_string();
    let generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    fill(
        HEADER,
        &[
            ("distro", distro.as_str()),
            ("count", count.as_str()),
            ("generated", generated.as_str()),
            ("rule", RULE),
        ],
    )
}

const SHARED_UTILS: &str = r##"{{rule}}
#  Colors & Utilities
{{rule}}

if [ -t 1 ]; then
    RED='\033[0;31m' GREEN='\033[0;32m' YELLOW='\033[1;33m'
    BLUE='\033[0;34m' CYAN='\033[0;36m' BOLD='\033[1m' DIM='\033[2m' NC='\033[0m'
else
    RED='' GREEN='' YELLOW='' BLUE='' CYAN='' BOLD='' DIM='' NC=''
fi

info()    { echo -e "${BLUE}::${NC} $1"; }
success() { echo -e "${GREEN}✓${NC} $1"; }
warn()    { echo -e "${YELLOW}!${NC} $1"; }
error()   { echo -e "${RED}✗${NC} $1" >&2; }
skip()    { echo -e "${DIM}○${NC} $1 ${DIM}(already installed)${NC}"; }
timing()  { echo -e "${GREEN}✓${NC} $1 ${DIM}($2s)${NC}"; }

trap 'printf "\n"; warn "Installation cancelled by user"; print_summary; exit 130' INT

TOTAL={{total}}
CURRENT=0
FAILED=()
SUCCEEDED=()
SKIPPED=()
INSTALL_TIMES=()
START_TIME=$(date +%s)
AVG_TIME=8

show_progress() {
    local current=$1 total=$2 name=$3
    local percent=$((current * 100 / total))
    local filled=$((percent / 5))
    local empty=$((20 - filled))

    local remaining=$((total - current))
    local eta=$((remaining * AVG_TIME))
    local eta_str=""
    if [ $eta -ge 60 ]; then
        eta_str="~$((eta / 60))m"
    else
        eta_str="~${eta}s"
    fi

    printf "\r\033[K[${CYAN}"
    printf "%${filled}s" | tr ' ' '█'
    printf "${NC}"
    printf "%${empty}s" | tr ' ' '░'
    printf "] %3d%% (%d/%d) ${BOLD}%s${NC} ${DIM}%s left${NC}" "$percent" "$current" "$total" "$name" "$eta_str"
}

update_avg_time() {
    local new_time=$1
    if [ ${#INSTALL_TIMES[@]} -eq 0 ]; then
        AVG_TIME=$new_time
    else
        local sum=$new_time
        for t in "${INSTALL_TIMES[@]}"; do
            sum=$((sum + t))
        done
        AVG_TIME=$((sum / (${#INSTALL_TIMES[@]} + 1)))
    fi
    INSTALL_TIMES+=("$new_time")
}

run_cmd() {
    "$@" 2>&1
}

with_retry() {
    local max_attempts=3
    local attempt=1
    local delay=5
    local output

    while [ $attempt -le $max_attempts ]; do
        if output=$(run_cmd "$@"); then
            echo "$output"
            return 0
        fi

        if echo "$output" | grep -iE "network|connection|timeout|unreachable|resolve" >/dev/null; then
            if [ $attempt -lt $max_attempts ]; then
                warn "Network error, retrying in ${delay}s... (attempt $attempt/$max_attempts)" >&2
                sleep $delay
                delay=$((delay * 2))
                attempt=$((attempt + 1))
                continue
            fi
        fi

        echo "$output"
        return 1
    done
    return 1
}

print_summary() {
    local end_time
    end_time=$(date +%s)
    local duration=$((end_time - START_TIME))
    local mins=$((duration / 60))
    local secs=$((duration % 60))

    echo
    echo "─────────────────────────────────────────────────────────────────────────────"
    local installed=${#SUCCEEDED[@]}
    local skipped_count=${#SKIPPED[@]}
    local failed_count=${#FAILED[@]}

    if [ $failed_count -eq 0 ]; then
        if [ $skipped_count -gt 0 ]; then
            echo -e "${GREEN}✓${NC} Done! $installed installed, $skipped_count already installed ${DIM}(${mins}m ${secs}s)${NC}"
        else
            echo -e "${GREEN}✓${NC} All $TOTAL packages installed! ${DIM}(${mins}m ${secs}s)${NC}"
        fi
    else
        echo -e "${YELLOW}!${NC} $installed installed, $skipped_count skipped, $failed_count failed ${DIM}(${mins}m ${secs}s)${NC}"
        echo
        echo -e "${RED}Failed:${NC}"
        for pkg in "${FAILED[@]}"; do
            echo "  • $pkg"
        done
    fi
    echo "─────────────────────────────────────────────────────────────────────────────"
}"##;

/// Logging helpers, interrupt trap, progress bar, retry wrapper and summary.
pub fn shared_utils(total: usize) -> String {
    let total = total.to_string();
    fill(SHARED_UTILS, &[("rule", RULE), ("total", total.as_str())])
}

pub fn divider() -> String {
    RULE.to_string()
}

/// apt, pacman and zypper flows escalate per command with sudo.
pub fn refuse_root() -> String {
    r#"if [ "$EUID" -eq 0 ]; then
    error "Run as regular user, not root."
    exit 1
fi"#
    .to_string()
}

pub fn require_binary(binary: &str, hint: Option<&str>) -> String {
    let hint = hint
        .map(|h| format!("\n    info \"{}\"", escape_shell_string(h)))
        .unwrap_or_default();
    format!(
        "command -v {binary} &>/dev/null || {{\n    error \"{binary} not found\"{hint}\n    exit 1\n}}"
    )
}

const LOCK_WAIT: &str = r##"LOCK_TIMEOUT={{timeout}}
LOCK_WAITED=0
while {{probe}}; do
    if [ "$LOCK_TIMEOUT" -gt 0 ] && [ "$LOCK_WAITED" -ge "$LOCK_TIMEOUT" ]; then
        error "{{label}} still locked after ${LOCK_TIMEOUT}s, giving up."
        exit 1
    fi
    warn "Waiting for {{label}}..."
    sleep 2
    LOCK_WAITED=$((LOCK_WAITED + 2))
done"##;

/// Poll `probe` until the package manager lock is released.
///
/// A timeout of zero waits forever.
pub fn lock_wait(probe: &str, label: &str, timeout_secs: u64) -> String {
    let timeout = timeout_secs.to_string();
    fill(
        LOCK_WAIT,
        &[
            ("timeout", timeout.as_str()),
            ("probe", probe),
            ("label", label),
        ],
    )
}

/// Best-effort repository refresh: failure only warns.
pub fn sync_step(message: &str, command: &str, done: &str, failed: &str) -> String {
    format!(
        "info \"{message}...\"\nwith_retry {command} >/dev/null && success \"{done}\" || warn \"{failed}\""
    )
}

/// What to print (and optionally attempt) when captured output matches.
#[derive(Debug, Clone)]
pub enum Hint {
    Note {
        pattern: &'static str,
        note: &'static str,
    },
    /// Run `repair`, then `retry` once; success moves the package to SUCCEEDED.
    Repair {
        pattern: &'static str,
        note: &'static str,
        repair: &'static str,
        retry: &'static str,
    },
}

/// Template for a per-package install function.
#[derive(Debug, Clone)]
pub struct InstallFn {
    pub name: &'static str,
    /// Command run under `with_retry`; `$pkg` holds the package token.
    pub install: String,
    /// Shell run before the installed check; may `return 0` to skip.
    pub guard: Option<&'static str>,
    pub hints: Vec<Hint>,
}

impl InstallFn {
    pub fn new(name: &'static str, install: impl Into<String>) -> Self {
        Self {
            name,
            install: install.into(),
            guard: None,
            hints: Vec::new(),
        }
    }

    pub fn guard(mut self, guard: &'static str) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn note(mut self, pattern: &'static str, note: &'static str) -> Self {
        self.hints.push(Hint::Note { pattern, note });
        self
    }

    pub fn repair(
        mut self,
        pattern: &'static str,
        note: &'static str,
        repair: &'static str,
        retry: &'static str,
    ) -> Self {
        self.hints.push(Hint::Repair {
            pattern,
            note,
            repair,
            retry,
        });
        self
    }

    pub fn render(&self) -> String {
        let guard = self
            .guard
            .map(|g| indent(g, 4) + "\n\n")
            .unwrap_or_default();
        let diagnose = self.diagnose();
        fill(
            INSTALL_FN,
            &[
                ("fn", self.name),
                ("guard", guard.as_str()),
                ("install", self.install.as_str()),
                ("diagnose", diagnose.as_str()),
            ],
        )
    }

    fn diagnose(&self) -> String {
        if self.hints.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        for (i, hint) in self.hints.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "elif" };
            match hint {
                Hint::Note { pattern, note } => {
                    out.push_str(&format!(
                        "        {keyword} echo \"$output\" | grep \"{pattern}\" >/dev/null; then\n            echo -e \"    ${{DIM}}{note}${{NC}}\"\n"
                    ));
                }
                Hint::Repair {
                    pattern,
                    note,
                    repair,
                    retry,
                } => {
                    out.push_str(&fill(
                        REPAIR_BRANCH,
                        &[
                            ("keyword", keyword),
                            ("pattern", *pattern),
                            ("note", *note),
                            ("repair", *repair),
                            ("retry", *retry),
                        ],
                    ));
                }
            }
        }
        out.push_str("        fi\n");
        out
    }
}

const INSTALL_FN: &str = r##"{{fn}}() {
    local name=$1 pkg=$2
    CURRENT=$((CURRENT + 1))

{{guard}}    if is_installed "$pkg"; then
        skip "$name"
        SKIPPED+=("$name")
        return 0
    fi

    show_progress $CURRENT $TOTAL "$name"
    local start
    start=$(date +%s)

    local output
    if output=$(with_retry {{install}}); then
        local elapsed=$(($(date +%s) - start))
        update_avg_time $elapsed
        printf "\r\033[K"
        timing "$name" "$elapsed"
        SUCCEEDED+=("$name")
    else
        printf "\r\033[K${RED}✗${NC} %s\n" "$name"
{{diagnose}}        FAILED+=("$name")
    fi
}"##;

const REPAIR_BRANCH: &str = r##"        {{keyword}} echo "$output" | grep "{{pattern}}" >/dev/null; then
            echo -e "    ${DIM}{{note}}${NC}"
            if {{repair}}; then
                if {{retry}} >/dev/null 2>&1; then
                    timing "$name" "$(($(date +%s) - start))"
                    SUCCEEDED+=("$name")
                    return 0
                fi
            fi
"##;

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `info "Installing $TOTAL packages"` with surrounding blank lines.
pub fn install_banner() -> String {
    "echo\ninfo \"Installing $TOTAL packages\"\necho".to_string()
}

/// One `fn "Display Name" "pkg"` line per package.
pub fn install_calls(fn_name: &str, packages: &[PackageRef<'_>], indent_by: usize) -> String {
    let pad = " ".repeat(indent_by);
    packages
        .iter()
        .map(|p| {
            format!(
                "{pad}{fn_name} \"{}\" \"{}\"",
                escape_shell_string(&p.app.name),
                p.pkg
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Names pushed straight into FAILED when a prerequisite is missing.
pub fn mark_failed(packages: &[PackageRef<'_>], indent_by: usize) -> String {
    let pad = " ".repeat(indent_by);
    let names: Vec<String> = packages
        .iter()
        .map(|p| format!("\"{}\"", escape_shell_string(&p.app.name)))
        .collect();
    format!("{pad}FAILED+=({})", names.join(" "))
}

pub fn summary(footer: Option<&str>) -> String {
    match footer {
        Some(note) => format!("print_summary\necho\ninfo \"{}\"", escape_shell_string(note)),
        None => "print_summary".to_string(),
    }
}
