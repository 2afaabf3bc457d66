//! Product categories.

use serde::{Deserialize, Serialize};

use super::UnknownTag;

/// Category of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Necklaces,
    Rings,
    Earrings,
    Bracelets,
}

impl Category {
    /// All categories in picker order.
    pub const ALL: [Self; 4] = [Self::Necklaces, Self::Rings, Self::Earrings, Self::Bracelets];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Necklaces => "necklaces",
            Self::Rings => "rings",
            Self::Earrings => "earrings",
            Self::Bracelets => "bracelets",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Necklaces => "Necklaces",
            Self::Rings => "Rings",
            Self::Earrings => "Earrings",
            Self::Bracelets => "Bracelets",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "necklaces" => Ok(Self::Necklaces),
            "rings" => Ok(Self::Rings),
            "earrings" => Ok(Self::Earrings),
            "bracelets" => Ok(Self::Bracelets),
            _ => Err(UnknownTag::new("category", s)),
        }
    }
}
