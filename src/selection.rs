use crate::classify::is_aur_package;
use crate::command::{self, CommandOptions};
use crate::registry::{AppEntry, Catalog, DistroId, FLATPAK_SUPPORT_ID};
use crate::script::ScriptRequest;

/// Apps chosen for one distro plus the command options.
///
/// Generation only ever borrows a selection; all mutation goes through the
/// methods below.
#[derive(Debug, Clone)]
pub struct Selection {
    distro: DistroId,
    app_ids: Vec<String>,
    pub options: CommandOptions,
}

impl Selection {
    pub fn new(distro: DistroId) -> Self {
        Self {
            distro,
            app_ids: Vec::new(),
            options: CommandOptions::default(),
        }
    }

    pub fn distro(&self) -> DistroId {
        self.distro
    }

    pub fn app_ids(&self) -> &[String] {
        &self.app_ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.app_ids.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.app_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.app_ids.is_empty()
    }

    fn flatpak_fallback_active(&self) -> bool {
        self.options.include_flatpak_fallback && self.contains(FLATPAK_SUPPORT_ID)
    }

    fn is_selectable(&self, app: &AppEntry) -> bool {
        app.is_available(self.distro)
            || (app.is_flatpak_only(self.distro) && self.flatpak_fallback_active())
    }

    /// Flip `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, catalog: &Catalog, id: &str) -> bool {
        if let Some(pos) = self.app_ids.iter().position(|selected| selected == id) {
            self.app_ids.remove(pos);
            if id == FLATPAK_SUPPORT_ID {
                self.drop_unavailable(catalog);
            }
            return false;
        }

        match catalog.app(id) {
            Some(app) if self.is_selectable(app) => {
                self.app_ids.push(id.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn select_all(&mut self, catalog: &Catalog) {
        for app in catalog.apps() {
            if app.is_available(self.distro) && !self.contains(&app.id) {
                self.app_ids.push(app.id.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.app_ids.clear();
    }

    /// Switch distro, keeping only apps that still resolve.
    pub fn set_distro(&mut self, catalog: &Catalog, distro: DistroId) {
        self.distro = distro;
        self.drop_unavailable(catalog);
    }

    fn drop_unavailable(&mut self, catalog: &Catalog) {
        let had_fallback = self.flatpak_fallback_active();
        self.retain_available(catalog, had_fallback);
        // the support app itself may not exist on the new distro
        if had_fallback && !self.contains(FLATPAK_SUPPORT_ID) {
            self.retain_available(catalog, false);
        }
    }

    fn retain_available(&mut self, catalog: &Catalog, fallback: bool) {
        let distro = self.distro;
        self.app_ids.retain(|id| {
            catalog.app(id).is_some_and(|app| {
                app.is_available(distro) || (fallback && app.is_flatpak_only(distro))
            })
        });
    }

    /// Display names of selected apps that need the AUR helper.
    pub fn aur_apps<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        if self.distro != DistroId::Arch {
            return Vec::new();
        }
        self.app_ids
            .iter()
            .filter_map(|id| catalog.app(id))
            .filter(|app| app.package_for(DistroId::Arch).is_some_and(is_aur_package))
            .map(|app| app.name.as_str())
            .collect()
    }

    pub fn command(&self, catalog: &Catalog) -> String {
        command::generate_for(catalog, self.distro, &self.app_ids, &self.options)
    }

    pub fn script_request(&self) -> ScriptRequest {
        ScriptRequest::new(self.distro.as_str(), self.app_ids.iter().cloned())
            .helper(self.options.aur_helper)
    }
}
