//! Views hosted by the storefront shell.

use serde::{Deserialize, Serialize};

use super::UnknownTag;

/// The screen currently mounted in the shell.
///
/// This is the only piece of navigation state. It is never reflected in
/// the URL: the shell always lives at `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Landing,
    Quiz,
    Designer,
    Showroom,
}

impl View {
    /// Views listed in the navigation bar, in order. Landing is reached
    /// through the brand link instead.
    pub const NAV: [Self; 3] = [Self::Quiz, Self::Designer, Self::Showroom];

    /// Form value used by `POST /navigate`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Quiz => "quiz",
            Self::Designer => "designer",
            Self::Showroom => "showroom",
        }
    }

    /// Navigation bar label.
    #[must_use]
    pub const fn nav_label(self) -> &'static str {
        match self {
            Self::Landing => "Home",
            Self::Quiz => "Gem Match",
            Self::Designer => "AI Designer",
            Self::Showroom => "Showroom",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for View {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landing" => Ok(Self::Landing),
            "quiz" => Ok(Self::Quiz),
            "designer" => Ok(Self::Designer),
            "showroom" => Ok(Self::Showroom),
            _ => Err(UnknownTag::new("view", s)),
        }
    }
}
