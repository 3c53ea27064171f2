pub mod catalog;
pub mod loader;
pub mod model;

pub use catalog::{Catalog, FLATPAK_SUPPORT_ID};
pub use loader::{builtin_catalog, load_catalog, parse_catalog};
pub use model::{AppEntry, Distro, DistroId};
