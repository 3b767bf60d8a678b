//! Identity collaborator.
//!
//! Authentication itself is delegated to an external identity provider;
//! the console only needs to know who is signed in and how to end the
//! session. The UI polls [`IdentityProvider::current_user`] each frame,
//! which is the immediate-mode equivalent of subscribing to auth-state
//! changes.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub display_name: String,
}

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
    fn logout(&self);
}

/// Session-held identity state. The external provider populates it via
/// [`SessionIdentity::sign_in`]; `logout` clears it locally.
#[derive(Default)]
pub struct SessionIdentity {
    user: Mutex<Option<User>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Mutex::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: User) {
        info!("signed in as {}", user.email);
        let mut guard = self.user.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(user);
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<User> {
        self.user
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn logout(&self) {
        info!("signed out");
        let mut guard = self.user.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_and_logout() {
        let identity = SessionIdentity::new();
        assert!(identity.current_user().is_none());

        identity.sign_in(User {
            email: "ops@example.com".to_string(),
            display_name: "Ops".to_string(),
        });
        assert_eq!(
            identity.current_user().map(|u| u.email),
            Some("ops@example.com".to_string())
        );

        identity.logout();
        assert!(identity.current_user().is_none());
    }
}
