//! Email + password sign-in form.

use super::guard::{PageDecision, Route, decide};
use super::{Banner, SubmitOutcome, validate_credentials_input};
use crate::auth::store::AuthStore;

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;

/// Controller for the login screen. Dropping it dismisses any auth error so
/// the next screen starts clean.
pub struct LoginPage {
    auth: AuthStore,
}

impl LoginPage {
    #[must_use]
    pub fn new(auth: AuthStore) -> Self {
        Self { auth }
    }

    #[must_use]
    pub fn decision(&self) -> PageDecision {
        decide(Route::Login, &self.auth.state())
    }

    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.auth.is_loading() { "Signing in..." } else { "Sign in" }
    }

    #[must_use]
    pub fn banner(&self) -> Option<Banner> {
        self.auth.state().error().map(|e| Banner::Error(e.message.clone()))
    }

    pub async fn submit(&self, email: &str, password: &str) -> SubmitOutcome {
        let (email, password) = match validate_credentials_input(email, password) {
            Ok(fields) => fields,
            Err(msg) => return SubmitOutcome::Invalid(msg),
        };
        if self.auth.is_loading() {
            return SubmitOutcome::Busy;
        }
        match self.auth.sign_in(&email, &password).await {
            Ok(_) => SubmitOutcome::Navigate(Route::Dashboard),
            Err(failure) => SubmitOutcome::Show(Banner::Error(failure.message)),
        }
    }
}

impl Drop for LoginPage {
    fn drop(&mut self) {
        self.auth.clear_error();
    }
}
