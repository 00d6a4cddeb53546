//! Identity collaborator.
//!
//! Supplies the acting user, or nothing when unauthenticated. Create
//! operations attach the user id when available; workspace loading is
//! skipped entirely without one (never a crash).

/// Source of the current user identity.
pub trait Identity {
    fn current_user_id(&self) -> Option<&str>;
}

/// Fixed identity, resolved once by the host at sign-in.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<String>,
}

impl StaticIdentity {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user_id: Some(id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

impl Identity for StaticIdentity {
    fn current_user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
