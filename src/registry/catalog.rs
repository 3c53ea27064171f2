use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};

use super::model::{AppEntry, Distro, DistroId};

/// Pseudo-app that unlocks Flathub packages for apps missing a native build.
pub const FLATPAK_SUPPORT_ID: &str = "flatpaksupport";

/// Read-only registry of apps, distros and categories.
#[derive(Debug, Clone)]
pub struct Catalog {
    distros: Vec<Distro>,
    categories: Vec<String>,
    apps: Vec<AppEntry>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(distros: Vec<Distro>, categories: Vec<String>, apps: Vec<AppEntry>) -> Result<Self> {
        let known_categories: HashSet<&str> = categories.iter().map(String::as_str).collect();
        let mut by_id = HashMap::with_capacity(apps.len());

        for (index, app) in apps.iter().enumerate() {
            if app.id.trim().is_empty() {
                bail!("app at position {index} has an empty id");
            }
            if by_id.insert(app.id.clone(), index).is_some() {
                bail!("duplicate app id '{}'", app.id);
            }
            if app.targets.is_empty() {
                bail!("app '{}' has no package for any distro", app.id);
            }
            if !known_categories.contains(app.category.as_str()) {
                bail!("app '{}' uses unknown category '{}'", app.id, app.category);
            }
        }

        Ok(Self {
            distros,
            categories,
            apps,
            by_id,
        })
    }

    pub fn apps(&self) -> &[AppEntry] {
        &self.apps
    }

    pub fn distros(&self) -> &[Distro] {
        &self.distros
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn app(&self, id: &str) -> Option<&AppEntry> {
        self.by_id.get(id).and_then(|&index| self.apps.get(index))
    }

    pub fn distro(&self, id: DistroId) -> Option<&Distro> {
        self.distros.iter().find(|distro| distro.id == id)
    }

    pub fn distro_name(&self, id: DistroId) -> &str {
        self.distro(id)
            .map(|distro| distro.name.as_str())
            .unwrap_or_else(|| id.label())
    }

    pub fn apps_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a AppEntry> {
        self.apps.iter().filter(move |app| app.category == category)
    }

    pub fn package_for(&self, app_id: &str, distro: DistroId) -> Option<&str> {
        self.app(app_id)?.package_for(distro)
    }

    pub fn is_available(&self, app_id: &str, distro: DistroId) -> bool {
        self.package_for(app_id, distro).is_some()
    }

    pub fn available_count(&self, distro: DistroId) -> usize {
        self.apps
            .iter()
            .filter(|app| app.is_available(distro))
            .count()
    }
}
