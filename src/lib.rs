//! Install-command and install-script generation for Linux desktop apps.
//!
//! [`registry`] holds the app catalog, [`classify`] decides which packages
//! need extra steps, [`command`] renders one-line commands and [`script`]
//! renders full, re-runnable install scripts. Nothing here executes a
//! package manager; every output is text.

pub mod classify;
pub mod command;
pub mod registry;
pub mod script;
pub mod selection;
pub mod system;
pub mod utils;

pub use command::{AurHelper, CommandOptions};
pub use registry::{Catalog, DistroId};
pub use script::{generate_install_script, ScriptRequest};
pub use selection::Selection;
