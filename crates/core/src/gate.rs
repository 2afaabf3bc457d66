//! Two-stage access guard.
//!
//! Stage one resolves the visitor's session; stage two (admin pages only)
//! looks up the elevated role. Either stage may still be pending when the
//! provider cannot answer yet, in which case the page shows a loading state
//! and re-checks.
//!
//! ```
//! use gemini_glam_core::gate::{Access, Denial, Gate, RoleCheck, SessionCheck};
//!
//! let anonymous: SessionCheck<&str> = SessionCheck::Anonymous;
//! assert_eq!(
//!     Gate::Admin.evaluate(anonymous, RoleCheck::Skipped),
//!     Access::Denied(Denial::Unauthenticated)
//! );
//! assert_eq!(
//!     Gate::Admin.evaluate(SessionCheck::Signed("ada"), RoleCheck::Granted),
//!     Access::Allowed("ada")
//! );
//! ```

use std::future::Future;

/// Outcome of resolving the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck<I> {
    /// The provider has not answered yet.
    Pending,
    /// No identity is attached to this visitor.
    Anonymous,
    /// A live identity.
    Signed(I),
}

impl<I> SessionCheck<I> {
    /// The identity, when signed in.
    #[must_use]
    pub const fn identity(&self) -> Option<&I> {
        match self {
            Self::Signed(identity) => Some(identity),
            Self::Pending | Self::Anonymous => None,
        }
    }
}

/// Outcome of the elevated-role lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCheck {
    /// The lookup has not answered yet.
    Pending,
    /// The identity holds the admin role.
    Granted,
    /// The identity lacks the admin role.
    Missing,
    /// No lookup was made; the session stage already decided.
    Skipped,
}

impl From<bool> for RoleCheck {
    fn from(is_admin: bool) -> Self {
        if is_admin { Self::Granted } else { Self::Missing }
    }
}

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Send the visitor to the sign-in screen.
    Unauthenticated,
    /// Signed in, but not an admin. Notify and send home.
    NotAdmin,
}

/// Tagged guard result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<I> {
    Pending,
    Denied(Denial),
    Allowed(I),
}

/// Which checks a page requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Any signed-in visitor.
    Session,
    /// Signed-in visitor holding the admin role.
    Admin,
}

impl Gate {
    /// Combine both stage results into one decision.
    ///
    /// The role result is ignored unless this is the admin gate and the
    /// session resolved to an identity.
    #[must_use]
    pub fn evaluate<I>(self, session: SessionCheck<I>, role: RoleCheck) -> Access<I> {
        let identity = match session {
            SessionCheck::Pending => return Access::Pending,
            SessionCheck::Anonymous => return Access::Denied(Denial::Unauthenticated),
            SessionCheck::Signed(identity) => identity,
        };

        match (self, role) {
            (Self::Session, _) | (Self::Admin, RoleCheck::Granted) => Access::Allowed(identity),
            (Self::Admin, RoleCheck::Missing) => Access::Denied(Denial::NotAdmin),
            (Self::Admin, RoleCheck::Pending | RoleCheck::Skipped) => Access::Pending,
        }
    }

    /// Run the gate, calling `lookup` only when a role check is needed.
    ///
    /// Anonymous and pending sessions never reach the lookup.
    pub async fn run<I, F, Fut>(self, session: SessionCheck<I>, lookup: F) -> Access<I>
    where
        F: FnOnce(&I) -> Fut,
        Fut: Future<Output = RoleCheck>,
    {
        let role = match (self, session.identity()) {
            (Self::Admin, Some(identity)) => lookup(identity).await,
            _ => RoleCheck::Skipped,
        };
        self.evaluate(session, role)
    }
}
