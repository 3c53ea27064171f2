//! Full, downloadable install scripts.
//!
//! Each distro template is assembled from the fragments in [`fragments`]:
//! header, shared utilities, package functions, preamble, install calls and
//! summary. Generation is pure; the emitted script does all the work.

pub mod apt;
pub mod arch;
pub mod escape;
pub mod flatpak;
pub mod fragments;
pub mod homebrew;
pub mod fedora;
pub mod nix;
pub mod opensuse;
pub mod snap;

use chrono::{DateTime, Utc};

use crate::command::{selected_packages, AurHelper};
use crate::registry::{Catalog, DistroId};

pub use escape::escape_shell_string;

/// Default cap on how long a script waits for a package manager lock.
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 300;

pub const UNKNOWN_DISTRO_SCRIPT: &str = "#!/bin/bash\necho \"Error: Unknown distribution\"\nexit 1\n";
pub const EMPTY_SCRIPT: &str = "#!/bin/bash\necho \"No packages selected\"\nexit 0\n";

/// Values shared by every template.
#[derive(Debug, Clone, Copy)]
pub struct ScriptContext<'a> {
    pub distro_name: &'a str,
    pub generated_at: DateTime<Utc>,
    pub lock_timeout_secs: u64,
    pub helper: AurHelper,
}

#[derive(Debug, Clone)]
pub struct ScriptRequest {
    pub distro_id: String,
    pub app_ids: Vec<String>,
    pub helper: AurHelper,
    pub lock_timeout_secs: u64,
    pub generated_at: DateTime<Utc>,
}

impl ScriptRequest {
    pub fn new<I, S>(distro_id: impl Into<String>, app_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            distro_id: distro_id.into(),
            app_ids: app_ids.into_iter().map(Into::into).collect(),
            helper: AurHelper::default(),
            lock_timeout_secs: DEFAULT_LOCK_TIMEOUT_SECS,
            generated_at: Utc::now(),
        }
    }

    pub fn helper(mut self, helper: AurHelper) -> Self {
        self.helper = helper;
        self
    }

    /// Zero keeps the lock-wait loops unbounded.
    pub fn lock_timeout(mut self, secs: u64) -> Self {
        self.lock_timeout_secs = secs;
        self
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }
}

pub fn generate_install_script(catalog: &Catalog, request: &ScriptRequest) -> String {
    let Ok(distro) = request.distro_id.parse::<DistroId>() else {
        log::warn!("no script template for '{}'", request.distro_id);
        return UNKNOWN_DISTRO_SCRIPT.to_string();
    };

    let packages = selected_packages(catalog, distro, &request.app_ids);
    if packages.is_empty() {
        return EMPTY_SCRIPT.to_string();
    }

    let ctx = ScriptContext {
        distro_name: catalog.distro_name(distro),
        generated_at: request.generated_at,
        lock_timeout_secs: request.lock_timeout_secs,
        helper: request.helper,
    };
    log::debug!("rendering {} script for {} packages", distro, packages.len());

    match distro {
        DistroId::Ubuntu | DistroId::Debian => apt::render(&ctx, &packages),
        DistroId::Arch => arch::render(&ctx, &packages),
        DistroId::Fedora => fedora::render(&ctx, &packages),
        DistroId::Opensuse => opensuse::render(&ctx, &packages),
        DistroId::Nix => nix::render(&ctx, &packages),
        DistroId::Flatpak => flatpak::render(&ctx, &packages),
        DistroId::Snap => snap::render(&ctx, &packages),
        DistroId::Homebrew => homebrew::render(&ctx, &packages),
    }
}
