//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page controllers read this store to decide redirects and to render error
//! banners. It is the only holder of session state; nothing else mutates it.
//!
//! DESIGN
//! ======
//! State lives in a `tokio::sync::watch` channel so every transition is
//! applied atomically and observers (route guards) wake on each change.
//! One request slot is tracked. Overlapping operations share it and the one
//! that resolves last wins; callers keep submits disabled while
//! `is_loading()` is true.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::backend::{AuthBackend, BackendError};
use super::failure::{AuthFailure, AuthOp};
use super::types::{AuthUser, Session};
use crate::request::RequestStatus;

pub type AuthRequest = RequestStatus<AuthOp, AuthFailure>;

/// Snapshot of authentication state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub request: AuthRequest,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.request.is_pending()
    }

    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn error(&self) -> Option<&AuthFailure> {
        self.request.error()
    }
}

/// Shared handle to the auth store. Clones observe and mutate the same state.
#[derive(Clone)]
pub struct AuthStore {
    backend: Arc<dyn AuthBackend>,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthStore {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { backend, state: Arc::new(tx) }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver that is notified after every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub(crate) fn backend(&self) -> &Arc<dyn AuthBackend> {
        &self.backend
    }

    fn begin(&self, op: AuthOp) {
        debug!(%op, "auth request dispatched");
        self.state.send_modify(|s| s.request = RequestStatus::Pending(op));
    }

    fn fail(&self, op: AuthOp, err: &BackendError) -> AuthFailure {
        let failure = AuthFailure::classify(op, &err.message);
        warn!(%op, error = %failure, "auth request failed");
        self.state.send_modify(|s| {
            s.request = RequestStatus::Failed { op, error: failure.clone() };
        });
        failure
    }

    fn authenticate(&self, op: AuthOp, user: AuthUser) {
        debug!(%op, user_id = %user.id, "auth request succeeded");
        self.state.send_modify(|s| {
            s.session = Some(Session { user });
            s.request = RequestStatus::Succeeded(op);
        });
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded on the store.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthFailure> {
        self.begin(AuthOp::SignIn);
        match self.backend.sign_in(email, password).await {
            Ok(user) => {
                self.authenticate(AuthOp::SignIn, user.clone());
                Ok(user)
            }
            Err(e) => Err(self.fail(AuthOp::SignIn, &e)),
        }
    }

    /// Create an account. Same contract as [`Self::sign_in`]: success signs the
    /// user in, even while the email is still unconfirmed. A
    /// confirmation-email delivery failure comes back classified as
    /// [`FailureKind::ConfirmationEmail`](super::failure::FailureKind).
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded on the store.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthFailure> {
        self.begin(AuthOp::SignUp);
        match self.backend.sign_up(email, password).await {
            Ok(user) => {
                if !user.email_confirmed {
                    debug!(user_id = %user.id, "sign-up awaiting email confirmation");
                }
                self.authenticate(AuthOp::SignUp, user.clone());
                Ok(user)
            }
            Err(e) => Err(self.fail(AuthOp::SignUp, &e)),
        }
    }

    /// Sign out. The local session is cleared whether or not the backend
    /// call succeeds; a backend failure is still recorded as the error.
    ///
    /// # Errors
    ///
    /// Returns the backend failure, after the local session was cleared.
    pub async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.begin(AuthOp::SignOut);
        let result = self.backend.sign_out().await;
        let failure = result.as_ref().err().map(|e| AuthFailure::classify(AuthOp::SignOut, &e.message));
        if let Some(failure) = &failure {
            warn!(error = %failure, "backend sign-out failed; clearing local session anyway");
        }
        self.state.send_modify(|s| {
            s.session = None;
            s.request = match &failure {
                Some(error) => RequestStatus::Failed { op: AuthOp::SignOut, error: error.clone() },
                None => RequestStatus::Succeeded(AuthOp::SignOut),
            };
        });
        failure.map_or(Ok(()), Err)
    }

    /// Reconcile with the backend at startup. Never surfaces an error: a
    /// missing session or a failed check both leave the store signed out.
    pub async fn restore_session(&self) {
        self.begin(AuthOp::Restore);
        match self.backend.current_user().await {
            Ok(Some(user)) => self.authenticate(AuthOp::Restore, user),
            Ok(None) => {
                debug!("no session to restore");
                self.state.send_modify(|s| {
                    s.session = None;
                    s.request = RequestStatus::Succeeded(AuthOp::Restore);
                });
            }
            Err(e) => {
                warn!(error = %e, "session restore failed");
                self.state.send_modify(|s| {
                    s.session = None;
                    s.request = RequestStatus::Idle;
                });
            }
        }
    }

    /// Dismiss the current error, if any.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| {
            let had_error = s.error().is_some();
            s.request.dismiss_error();
            had_error
        });
    }

    /// Replace the session directly, e.g. with a user obtained out of band.
    /// Library API for embedding UIs that receive auth events from elsewhere;
    /// the CLI only changes the session through the backend operations.
    pub fn set_user(&self, user: Option<AuthUser>) {
        self.state.send_modify(|s| s.session = user.map(|user| Session { user }));
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
