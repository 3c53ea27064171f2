use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AurHelper {
    #[default]
    Yay,
    Paru,
}

impl AurHelper {
    pub fn as_str(&self) -> &'static str {
        match self {
            AurHelper::Yay => "yay",
            AurHelper::Paru => "paru",
        }
    }
}

impl fmt::Display for AurHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AurHelper {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yay" => Ok(AurHelper::Yay),
            "paru" => Ok(AurHelper::Paru),
            other => anyhow::bail!("unknown AUR helper '{other}' (expected yay or paru)"),
        }
    }
}

/// Knobs for the one-line command preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    pub aur_helper: AurHelper,
    pub has_helper_installed: bool,
    pub include_flatpak_fallback: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            aur_helper: AurHelper::Yay,
            has_helper_installed: false,
            include_flatpak_fallback: true,
        }
    }
}
