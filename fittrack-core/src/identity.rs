//! Identity provider boundary.
//!
//! Authentication itself happens elsewhere; the core only asks who the
//! current user is. Pushes and pulls run only while a user is signed in.

/// Source of the signed-in user.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.current_user_id().is_some()
    }
}

/// A fixed session, typically built from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

impl IdentityProvider for Session {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone().filter(|id| !id.is_empty())
    }
}
