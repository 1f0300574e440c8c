//! Identity types shared by the auth backend, store, and pages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// User record as returned by the auth backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    /// Free-form profile metadata. The product reads `name` and `avatar_url`.
    #[serde(default, alias = "user_metadata")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// `false` when the backend created the account but the email address is
    /// still awaiting confirmation.
    #[serde(default = "default_true")]
    pub email_confirmed: bool,
}

fn default_true() -> bool {
    true
}

impl AuthUser {
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id: id.into(), email: email.into(), metadata: BTreeMap::new(), email_confirmed: true }
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Profile name, falling back to the local part of the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.metadata_str("name")
            .or_else(|| self.email.split('@').next().filter(|v| !v.is_empty()))
            .unwrap_or("user")
    }

    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.metadata_str("avatar_url")
    }
}

/// Authenticated identity for the current context. Exists iff the store
/// reports the user as authenticated.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user: AuthUser,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
