//! Application roles stored in the `user_roles` collection.

use serde::{Deserialize, Serialize};

use super::UnknownTag;

/// Role held by a user.
///
/// The remote store constrains the column to these three values. A user
/// without a role record is treated as [`AppRole::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    /// Regular shopper.
    #[default]
    User,
    /// Reserved for content moderation; no extra screens today.
    Moderator,
    /// Elevated role: may open the admin panel and mutate roles and products.
    Admin,
}

impl AppRole {
    /// All roles in the order the role picker lists them.
    pub const ALL: [Self; 3] = [Self::User, Self::Moderator, Self::Admin];

    /// Wire value (`user`, `moderator`, `admin`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Capitalized label for pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Moderator => "Moderator",
            Self::Admin => "Admin",
        }
    }

    /// Whether this role grants access to the admin panel.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for AppRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppRole {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownTag::new("role", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in AppRole::ALL {
            assert_eq!(role.as_str().parse::<AppRole>(), Ok(role));
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = "owner".parse::<AppRole>().unwrap_err();
        assert_eq!(err.to_string(), "invalid role: \"owner\"");
    }

    #[test]
    fn test_only_admin_is_elevated() {
        assert!(AppRole::Admin.is_elevated());
        assert!(!AppRole::Moderator.is_elevated());
        assert!(!AppRole::User.is_elevated());
    }
}
