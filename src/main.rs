use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use tuxmate::classify::{is_aur_package, is_unfree_package, VerificationIndex};
use tuxmate::command::{self, AurHelper, CommandOptions};
use tuxmate::registry::{builtin_catalog, load_catalog, Catalog, DistroId};
use tuxmate::script::{self, ScriptRequest, DEFAULT_LOCK_TIMEOUT_SECS};
use tuxmate::system::os::{detect_aur_helper, detect_distro, is_binary_installed, OsRelease};
use tuxmate::utils::search::{matches_search, truncate_with_ellipsis};

#[derive(Parser, Debug)]
#[command(version, about = "Generate install commands and scripts for Linux apps")]
struct Cli {
    /// Catalog JSON to use instead of the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Flathub verification snapshot to use instead of the built-in one
    #[arg(long, global = true)]
    verified: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the one-line install command
    Command(CommandArgs),
    /// Print or write the full install script
    Script(ScriptArgs),
    /// Print a NixOS environment.systemPackages block
    NixConfig {
        #[arg(required = true)]
        apps: Vec<String>,
    },
    /// Print a minimal script wrapping the install command
    Download(CommandArgs),
    /// List catalog apps for a distribution
    List {
        #[arg(long, default_value = "auto")]
        distro: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// List known distributions
    Distros,
    /// Show the detected host distribution and AUR helper
    Detect,
}

#[derive(Args, Debug)]
struct Target {
    /// Distribution id, or `auto` to detect the host
    #[arg(long, default_value = "auto")]
    distro: String,

    /// AUR helper used on Arch
    #[arg(long, default_value_t = AurHelper::Yay)]
    helper: AurHelper,
}

#[derive(Args, Debug)]
struct CommandArgs {
    #[command(flatten)]
    target: Target,

    /// The AUR helper is already installed; skip the bootstrap
    #[arg(long)]
    has_helper: bool,

    /// Do not add a Flathub block for apps without a native package
    #[arg(long)]
    no_flatpak_fallback: bool,

    #[arg(required = true)]
    apps: Vec<String>,
}

#[derive(Args, Debug)]
struct ScriptArgs {
    #[command(flatten)]
    target: Target,

    /// Seconds to wait for a package manager lock, 0 waits forever
    #[arg(long, default_value_t = DEFAULT_LOCK_TIMEOUT_SECS)]
    lock_timeout: u64,

    /// Write the script here and mark it executable
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(required = true)]
    apps: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn load_entries(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => load_catalog(path),
        None => builtin_catalog(),
    }
}

fn load_verification(path: Option<&Path>) -> VerificationIndex {
    match path {
        Some(path) => VerificationIndex::load_or_empty(path),
        None => VerificationIndex::builtin(),
    }
}

/// Explicit ids must parse; `auto` asks the host.
fn resolve_distro(arg: &str) -> Result<(DistroId, bool)> {
    if arg.eq_ignore_ascii_case("auto") {
        let distro = detect_distro()
            .context("could not detect the host distribution, pass --distro explicitly")?;
        log::info!("detected host distribution: {distro}");
        return Ok((distro, true));
    }
    Ok((arg.parse()?, false))
}

fn warn_unknown_apps(catalog: &Catalog, apps: &[String]) {
    for id in apps {
        if catalog.app(id).is_none() {
            log::warn!("unknown app id '{id}'");
        }
    }
}

fn command_options(args: &CommandArgs, detected: bool) -> CommandOptions {
    let mut has_helper = args.has_helper;
    if detected && !has_helper && is_binary_installed(args.target.helper.as_str()) {
        log::debug!("{} found on PATH", args.target.helper);
        has_helper = true;
    }
    CommandOptions {
        aur_helper: args.target.helper,
        has_helper_installed: has_helper,
        include_flatpak_fallback: !args.no_flatpak_fallback,
    }
}

fn write_script(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to mark {} executable", path.display()))?;
    }

    Ok(())
}

fn run_command(catalog: &Catalog, args: &CommandArgs, download: bool) -> Result<()> {
    let (distro, detected) = resolve_distro(&args.target.distro)?;
    warn_unknown_apps(catalog, &args.apps);
    let options = command_options(args, detected);

    let out = if download {
        command::generate_download_script(
            catalog,
            distro.as_str(),
            &args.apps,
            &options,
            Utc::now(),
        )
    } else {
        command::generate_for(catalog, distro, &args.apps, &options)
    };
    println!("{out}");
    Ok(())
}

fn run_script(catalog: &Catalog, args: &ScriptArgs) -> Result<()> {
    let (distro, _) = resolve_distro(&args.target.distro)?;
    warn_unknown_apps(catalog, &args.apps);

    let request = ScriptRequest::new(distro.as_str(), args.apps.iter().cloned())
        .helper(args.target.helper)
        .lock_timeout(args.lock_timeout);
    let out = script::generate_install_script(catalog, &request);

    match &args.output {
        Some(path) => {
            write_script(path, &out)?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{out}"),
    }
    Ok(())
}

fn run_list(
    catalog: &Catalog,
    verified: &VerificationIndex,
    distro: &str,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let (distro, _) = resolve_distro(distro)?;
    if let Some(category) = category {
        if !catalog.categories().iter().any(|c| c == category) {
            bail!(
                "unknown category '{category}' (known: {})",
                catalog.categories().join(", ")
            );
        }
    }

    for app in catalog.apps() {
        if category.is_some_and(|c| app.category != c) {
            continue;
        }
        if !matches_search(app, search.unwrap_or_default()) {
            continue;
        }

        let flatpak_only = app.is_flatpak_only(distro);
        let Some(pkg) = app
            .package_for(distro)
            .or_else(|| app.package_for(DistroId::Flatpak).filter(|_| flatpak_only))
        else {
            continue;
        };

        let mut marks = Vec::new();
        if flatpak_only {
            marks.push("flatpak-only".to_string());
        }
        if distro == DistroId::Arch && is_aur_package(pkg) {
            marks.push("AUR".to_string());
        }
        if distro == DistroId::Nix && is_unfree_package(pkg) {
            marks.push("unfree".to_string());
        }
        if let Some(source) = verified.verification_source(distro, pkg) {
            marks.push(format!("verified:{source}"));
        }

        println!(
            "{:<16} {:<24} {:<32} {}",
            app.id,
            truncate_with_ellipsis(&app.name, 24),
            truncate_with_ellipsis(pkg, 32),
            marks.join(" ")
        );
    }
    Ok(())
}

fn run_detect() {
    match OsRelease::read().and_then(|release| release.pretty_name) {
        Some(name) => println!("os-release:  {name}"),
        None => println!("os-release:  not found"),
    }
    match detect_distro() {
        Some(distro) => println!("distro:      {distro}"),
        None => println!("distro:      unknown"),
    }
    match detect_aur_helper() {
        Some(helper) => println!("aur helper:  {helper}"),
        None => println!("aur helper:  none"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = load_entries(cli.catalog.as_deref())?;

    match &cli.command {
        Commands::Command(args) => run_command(&catalog, args, false)?,
        Commands::Download(args) => run_command(&catalog, args, true)?,
        Commands::Script(args) => run_script(&catalog, args)?,
        Commands::NixConfig { apps } => {
            warn_unknown_apps(&catalog, apps);
            println!("{}", command::generate_nix_config(&catalog, apps));
        }
        Commands::List {
            distro,
            category,
            search,
        } => {
            let verified = load_verification(cli.verified.as_deref());
            run_list(
                &catalog,
                &verified,
                distro,
                category.as_deref(),
                search.as_deref(),
            )?;
        }
        Commands::Distros => {
            for distro in DistroId::ALL {
                println!("{:<10} {}", distro.as_str(), catalog.distro_name(distro));
            }
        }
        Commands::Detect => run_detect(),
    }

    Ok(())
}
