//! User roster for the admin panel: profiles joined with role records.

use crate::types::{AppRole, Profile, UserId, UserRole};

/// A profile with its resolved role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub profile: Profile,
    /// `user` when no role record exists.
    pub role: AppRole,
}

impl RosterEntry {
    /// Email or `N/A`.
    #[must_use]
    pub fn email_or_na(&self) -> &str {
        self.profile.email.as_deref().unwrap_or("N/A")
    }

    /// Full name or `N/A`.
    #[must_use]
    pub fn full_name_or_na(&self) -> &str {
        self.profile.full_name.as_deref().unwrap_or("N/A")
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.profile.email, &self.profile.full_name]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// How a role change must be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleWrite {
    /// A record exists for the user; update it in place.
    Update,
    /// No record yet; insert one.
    Insert,
}

/// Fetched profiles and role records, joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    roles: Vec<UserRole>,
}

impl Roster {
    /// Join profiles (kept in the order given) against role records.
    #[must_use]
    pub fn new(profiles: Vec<Profile>, roles: Vec<UserRole>) -> Self {
        let entries = profiles
            .into_iter()
            .map(|profile| RosterEntry {
                role: role_of(&roles, profile.id),
                profile,
            })
            .collect();
        Self { entries, roles }
    }

    /// Every entry.
    #[must_use]
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Entries whose email or full name contains `query`, ignoring case.
    ///
    /// A blank query keeps everyone.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&RosterEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries.iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Number of profiles.
    #[must_use]
    pub fn total_users(&self) -> usize {
        self.entries.len()
    }

    /// Number of role records granting admin.
    #[must_use]
    pub fn admin_users(&self) -> usize {
        self.roles.iter().filter(|r| r.role == AppRole::Admin).count()
    }

    /// Whether changing `user`'s role updates or inserts.
    #[must_use]
    pub fn role_write(&self, user: UserId) -> RoleWrite {
        role_write(&self.roles, user)
    }
}

/// Resolved role for `user`, defaulting to `user` when no record exists.
#[must_use]
pub fn role_of(roles: &[UserRole], user: UserId) -> AppRole {
    roles
        .iter()
        .find(|r| r.user_id == user)
        .map_or(AppRole::User, |r| r.role)
}

/// Whether a role change for `user` updates an existing record or inserts.
#[must_use]
pub fn role_write(roles: &[UserRole], user: UserId) -> RoleWrite {
    if roles.iter().any(|r| r.user_id == user) {
        RoleWrite::Update
    } else {
        RoleWrite::Insert
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::UserRoleId;

    fn profile(email: Option<&str>, name: Option<&str>) -> Profile {
        Profile {
            id: UserId::random(),
            email: email.map(str::to_owned),
            full_name: name.map(str::to_owned),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn role(user: UserId, role: AppRole) -> UserRole {
        UserRole {
            id: UserRoleId::random(),
            user_id: user,
            role,
        }
    }

    #[test]
    fn test_missing_role_record_reads_as_user() {
        let ada = profile(Some("ada@glam.test"), None);
        let roster = Roster::new(vec![ada.clone()], vec![]);

        assert_eq!(roster.entries()[0].role, AppRole::User);
        assert_eq!(roster.role_write(ada.id), RoleWrite::Insert);
    }

    #[test]
    fn test_join_uses_matching_record() {
        let ada = profile(Some("ada@glam.test"), None);
        let bob = profile(Some("bob@glam.test"), None);
        let roles = vec![role(bob.id, AppRole::Moderator), role(ada.id, AppRole::Admin)];
        let roster = Roster::new(vec![ada.clone(), bob], roles);

        assert_eq!(roster.entries()[0].role, AppRole::Admin);
        assert_eq!(roster.entries()[1].role, AppRole::Moderator);
        assert_eq!(roster.admin_users(), 1);
        assert_eq!(roster.total_users(), 2);
        assert_eq!(roster.role_write(ada.id), RoleWrite::Update);
    }

    #[test]
    fn test_search_is_case_insensitive_over_email_and_name() {
        let roster = Roster::new(
            vec![
                profile(Some("Ada@Glam.test"), Some("Ada Lovelace")),
                profile(None, Some("Grace Hopper")),
                profile(Some("linus@glam.test"), None),
            ],
            vec![],
        );

        let by_email: Vec<_> = roster.search("ada@").iter().map(|e| e.email_or_na()).collect();
        assert_eq!(by_email, ["Ada@Glam.test"]);

        let by_name = roster.search("HOPPER");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].email_or_na(), "N/A");

        assert!(roster.search("nobody").is_empty());
    }

    #[test]
    fn test_blank_search_keeps_everyone() {
        let roster = Roster::new(vec![profile(None, None), profile(Some("a@b.c"), None)], vec![]);
        assert_eq!(roster.search("   ").len(), 2);
    }

    #[test]
    fn test_promoted_user_still_matches_search() {
        let ada = profile(Some("ada@glam.test"), None);
        let before = Roster::new(vec![ada.clone()], vec![]);
        assert_eq!(before.search("ada@glam.test")[0].role, AppRole::User);

        let after = Roster::new(vec![ada.clone()], vec![role(ada.id, AppRole::Admin)]);
        let hits = after.search("ada@glam.test");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].role, AppRole::Admin);
    }
}
