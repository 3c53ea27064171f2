pub mod aur;
pub mod nix_unfree;
pub mod verification;

pub use aur::is_aur_package;
pub use nix_unfree::is_unfree_package;
pub use verification::{VerificationIndex, VerificationSource};
