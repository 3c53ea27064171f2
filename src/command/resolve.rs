use std::collections::HashSet;

use crate::registry::{AppEntry, Catalog, DistroId, FLATPAK_SUPPORT_ID};

/// An app paired with the package token chosen for it.
#[derive(Debug, Clone, Copy)]
pub struct PackageRef<'a> {
    pub app: &'a AppEntry,
    pub pkg: &'a str,
}

#[derive(Debug, Default)]
pub struct Resolved<'a> {
    pub native: Vec<PackageRef<'a>>,
    pub flatpak_fallback: Vec<PackageRef<'a>>,
}

impl<'a> Resolved<'a> {
    pub fn is_empty(&self) -> bool {
        self.native.is_empty() && self.flatpak_fallback.is_empty()
    }

    pub fn native_tokens(&self) -> Vec<&'a str> {
        self.native.iter().map(|p| p.pkg).collect()
    }

    pub fn fallback_tokens(&self) -> Vec<&'a str> {
        self.flatpak_fallback.iter().map(|p| p.pkg).collect()
    }
}

/// Map selected app ids onto package tokens for `distro`, in selection order.
///
/// Unknown ids and apps not packaged for `distro` are dropped, unless the
/// Flatpak support pseudo-app is selected and `include_fallback` is set, in
/// which case their Flathub id goes to the fallback list.
pub fn resolve<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    distro: DistroId,
    app_ids: &[S],
    include_fallback: bool,
) -> Resolved<'a> {
    let ids: Vec<&str> = app_ids.iter().map(|id| id.as_ref()).collect();
    let fallback_enabled = include_fallback
        && distro != DistroId::Flatpak
        && ids.contains(&FLATPAK_SUPPORT_ID);

    let mut seen = HashSet::new();
    let mut resolved = Resolved::default();

    for id in ids {
        if !seen.insert(id) {
            continue;
        }
        let Some(app) = catalog.app(id) else {
            log::debug!("skipping unknown app id '{id}'");
            continue;
        };

        if let Some(pkg) = app.package_for(distro) {
            resolved.native.push(PackageRef { app, pkg });
        } else if let Some(pkg) = app
            .package_for(DistroId::Flatpak)
            .filter(|_| fallback_enabled)
        {
            resolved.flatpak_fallback.push(PackageRef { app, pkg });
        } else {
            log::debug!("'{id}' is not available for {distro}");
        }
    }

    resolved
}

/// Native packages for `distro` only, for script generation.
pub fn selected_packages<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    distro: DistroId,
    app_ids: &[S],
) -> Vec<PackageRef<'a>> {
    resolve(catalog, distro, app_ids, false).native
}
