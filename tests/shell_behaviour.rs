//! Runs emitted shell fragments under bash against mocked package managers.
//! Skipped when bash is not on PATH.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use tuxmate::script::{apt, flatpak, fragments, nix};

fn bash() -> Option<PathBuf> {
    let found = which::which("bash").ok();
    if found.is_none() {
        eprintln!("bash not found, skipping");
    }
    found
}

/// Prelude + package functions + mocks + body, run with `$STATE` pointing at
/// a scratch directory.
fn run(bash: &Path, state: &TempDir, parts: &[&str]) -> Output {
    let mut script = String::from("set -euo pipefail\n\n");
    script.push_str(&parts.join("\n\n"));
    script.push('\n');

    let path = state.path().join("run.sh");
    fs::write(&path, script).unwrap();
    Command::new(bash)
        .arg(&path)
        .env("STATE", state.path())
        .output()
        .unwrap()
}

fn counts(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| line.strip_prefix("COUNTS "))
        .unwrap_or_default()
        .to_string()
}

const REPORT: &str = r#"echo "COUNTS ${#SUCCEEDED[@]} ${#SKIPPED[@]} ${#FAILED[@]}""#;

const APT_MOCKS: &str = r#"sudo() { "$@"; }
dpkg() {
    if [ -f "$STATE/$2" ]; then
        echo "ii  $2  1.0  amd64  mocked"
    fi
    return 0
}"#;

#[test]
fn installed_package_is_skipped_on_rerun() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(2);
    let functions = apt::package_functions();

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            &functions,
            APT_MOCKS,
            r#"apt-get() { touch "$STATE/$3"; echo "Setting up $3"; }"#,
            "install_pkg \"Git\" \"git\"\ninstall_pkg \"Git\" \"git\"",
            REPORT,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(state.path().join("git").exists());
    assert_eq!(counts(&out), "1 1 0");
    assert!(String::from_utf8_lossy(&out.stdout).contains("(already installed)"));
}

#[test]
fn failures_are_classified_and_counted() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(1);
    let functions = apt::package_functions();

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            &functions,
            APT_MOCKS,
            r#"apt-get() { echo "E: Unable to locate package $3"; return 100; }"#,
            "install_pkg \"Nope\" \"nope\"",
            REPORT,
            "print_summary",
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(counts(&out), "0 0 1");
    assert!(stdout.contains("Package not found"));
    assert!(stdout.contains("  • Nope"));
}

#[test]
fn broken_dependencies_are_repaired_once() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(1);
    let functions = apt::package_functions();

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            &functions,
            APT_MOCKS,
            r#"apt-get() {
    if [ "$1" = "--fix-broken" ]; then
        touch "$STATE/fixed"
        return 0
    fi
    if [ ! -f "$STATE/fixed" ]; then
        echo "E: Unmet dependencies. Try 'apt --fix-broken install'. unmet dependencies"
        return 100
    fi
    touch "$STATE/$3"
}"#,
            "install_pkg \"VLC\" \"vlc\"",
            REPORT,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(counts(&out), "1 0 0");
    assert!(state.path().join("fixed").exists());
    assert!(state.path().join("vlc").exists());
}

#[test]
fn parallel_flatpak_collects_every_job() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    fs::write(state.path().join("org.gimp.GIMP"), "").unwrap();
    let utils = fragments::shared_utils(3);
    let functions = flatpak::package_functions(true);

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            &functions,
            r#"flatpak() {
    case "$1" in
        info) [ -f "$STATE/$2" ] ;;
        install)
            [ "$4" = "com.broken.App" ] && return 1
            touch "$STATE/$4"
            ;;
    esac
}"#,
            r#"install_parallel "GIMP|org.gimp.GIMP" "VLC|org.videolan.VLC" "Broken|com.broken.App""#,
            REPORT,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(counts(&out), "1 1 1");
    assert!(state.path().join("org.videolan.VLC").exists());
}

#[test]
fn lock_wait_gives_up_after_timeout() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(1);
    let wait = fragments::lock_wait("true", "test lock", 1);

    let out = run(&bash, &state, &[&utils, &wait, "echo unreachable"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("test lock still locked after 1s"));
    assert!(!String::from_utf8_lossy(&out.stdout).contains("unreachable"));
}

#[test]
fn nix_installed_check_matches_whole_names() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(2);
    let functions = nix::package_functions();

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            &functions,
            r#"nix-env() {
    case "$1" in
        -q)
            echo "lazygit-0.40"
            if [ -f "$STATE/git" ]; then echo "git-2.44.0"; fi
            ;;
        -iA) touch "$STATE/${2#nixpkgs.}" ;;
    esac
    return 0
}"#,
            "install_pkg \"Git\" \"git\"\ninstall_pkg \"Git\" \"git\"",
            REPORT,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(state.path().join("git").exists());
    assert_eq!(counts(&out), "1 1 0");
}

fn attempts(state: &TempDir) -> usize {
    fs::read_to_string(state.path().join("attempts"))
        .map(|text| text.lines().count())
        .unwrap_or(0)
}

const SLEEP_MOCK: &str = r#"sleep() { echo "SLEEP $1" >&2; }"#;

#[test]
fn network_failures_back_off_then_give_up() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(1);

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            SLEEP_MOCK,
            r#"flaky() { echo x >> "$STATE/attempts"; echo "Connection timed out"; return 1; }"#,
            r#"if with_retry flaky >/dev/null; then echo "RESULT ok"; else echo "RESULT failed"; fi"#,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("RESULT failed"));
    assert_eq!(attempts(&state), 3);
    let sleeps: Vec<String> = String::from_utf8_lossy(&out.stderr)
        .lines()
        .filter(|line| line.starts_with("SLEEP "))
        .map(str::to_string)
        .collect();
    assert_eq!(sleeps, ["SLEEP 5", "SLEEP 10"]);
}

#[test]
fn other_failures_are_not_retried() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(1);

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            SLEEP_MOCK,
            r#"broken() { echo x >> "$STATE/attempts"; echo "E: Permission denied"; return 1; }"#,
            r#"if with_retry broken >/dev/null; then echo "RESULT ok"; else echo "RESULT failed"; fi"#,
        ],
    );

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("RESULT failed"));
    assert_eq!(attempts(&state), 1);
    assert!(!String::from_utf8_lossy(&out.stderr).contains("SLEEP"));
}

#[test]
fn interrupt_prints_summary_and_exits_130() {
    let Some(bash) = bash() else { return };
    let state = TempDir::new().unwrap();
    let utils = fragments::shared_utils(2);

    let out = run(
        &bash,
        &state,
        &[
            &utils,
            "SUCCEEDED+=(\"Git\")\nFAILED+=(\"VLC\")",
            "kill -INT $$",
            "echo unreachable",
        ],
    );

    assert_eq!(out.status.code(), Some(130));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Installation cancelled by user"));
    assert!(stdout.contains("1 installed, 0 skipped, 1 failed"));
    assert!(stdout.contains("  • VLC"));
    assert!(!stdout.contains("unreachable"));
}
