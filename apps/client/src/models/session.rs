use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;
use crate::models::user::User;

/// An authenticated session: identity, bearer token and roles.
///
/// Both `user` and `token` are mandatory, so a half-restored session cannot
/// be represented; the store holds `Option<Session>` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Session {
    pub fn user_id(&self) -> Option<String> {
        self.user.id()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// True when both halves of the session carry data.
    pub fn is_complete(&self) -> bool {
        !self.token.trim().is_empty() && self.user.is_present()
    }
}

/// Response body of every authentication endpoint.
///
/// Older backend builds put the user under `data` instead of `user`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthPayload {
    pub token: Option<String>,
    pub user: Option<User>,
    pub data: Option<User>,
    pub roles: Option<Vec<String>>,
}

impl AuthPayload {
    pub fn into_session(self) -> Result<Session, GatewayError> {
        let token = self
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GatewayError::malformed(200, "missing token"))?;
        let user = self
            .user
            .or(self.data)
            .filter(User::is_present)
            .ok_or_else(|| GatewayError::malformed(200, "missing user"))?;

        Ok(Session {
            token,
            user,
            roles: self.roles.unwrap_or_default().into_iter().collect(),
        })
    }
}
