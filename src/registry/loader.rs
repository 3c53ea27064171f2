use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::catalog::Catalog;
use super::model::CatalogFile;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let file = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
    parse_catalog(&file).with_context(|| format!("invalid catalog in {}", path.as_ref().display()))
}

pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let file: CatalogFile = serde_json::from_str(json).context("invalid json")?;
    let catalog = Catalog::new(file.distros, file.categories, file.apps)?;
    log::debug!(
        "catalog loaded: {} apps, {} distros",
        catalog.apps().len(),
        catalog.distros().len()
    );
    Ok(catalog)
}

pub fn builtin_catalog() -> Result<Catalog> {
    parse_catalog(BUILTIN_CATALOG).context("embedded catalog is invalid")
}
