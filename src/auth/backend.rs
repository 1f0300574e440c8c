//! Auth backend seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store never talks HTTP itself. It drives an `AuthBackend`, which in
//! production is the GoTrue client in `supabase.rs` and in tests a stub.

use super::types::AuthUser;

/// Failure reported by the auth backend. Only the human-readable message is
/// carried; the store decides how to classify it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Identity operations delegated to the external auth provider.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Currently valid session user. `Ok(None)` means there is no session,
    /// which is not an error.
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError>;

    /// Bearer token for user-scoped REST calls, if a session is held.
    async fn access_token(&self) -> Option<String> {
        None
    }
}
