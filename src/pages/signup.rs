//! Account creation form.
//!
//! A confirmation-email delivery failure is a provider setup problem, so it
//! gets its own banner with setup steps instead of the generic error.

use super::guard::{PageDecision, Route, decide};
use super::{Banner, SubmitOutcome, validate_credentials_input};
use crate::auth::failure::AuthFailure;
use crate::auth::store::AuthStore;

#[cfg(test)]
#[path = "signup_test.rs"]
mod tests;

pub const CONFIRMATION_GUIDANCE: &[&str] = &[
    "Configure an SMTP provider in your Supabase project (Project → Settings → Email).",
    "Or disable email confirmations in Supabase Auth settings for testing.",
];
pub const CONFIRMATION_DOCS_URL: &str = "https://supabase.com/docs/guides/auth#email";
pub const CHECK_EMAIL_NOTICE: &str =
    "Signup successful. Check your email for a confirmation link if email confirmations are enabled.";
pub const BENEFITS: [&str; 4] = [
    "Track calories, nutrition, and exercise effortlessly",
    "Get AI-powered meal and workout recommendations",
    "Monitor your progress with detailed analytics",
    "Achieve your health goals faster with personalized plans",
];

fn failure_banner(failure: &AuthFailure) -> Banner {
    if failure.is_confirmation_email() {
        Banner::ConfirmationEmail {
            message: failure.message.clone(),
            guidance: CONFIRMATION_GUIDANCE,
            docs_url: CONFIRMATION_DOCS_URL,
        }
    } else {
        Banner::Error(failure.message.clone())
    }
}

/// Controller for the signup screen. Dropping it dismisses any auth error.
pub struct SignupPage {
    auth: AuthStore,
}

impl SignupPage {
    #[must_use]
    pub fn new(auth: AuthStore) -> Self {
        Self { auth }
    }

    #[must_use]
    pub fn decision(&self) -> PageDecision {
        decide(Route::Signup, &self.auth.state())
    }

    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.auth.is_loading() { "Creating account..." } else { "Create account" }
    }

    #[must_use]
    pub fn banner(&self) -> Option<Banner> {
        self.auth.state().error().map(failure_banner)
    }

    pub async fn submit(&self, email: &str, password: &str) -> SubmitOutcome {
        let (email, password) = match validate_credentials_input(email, password) {
            Ok(fields) => fields,
            Err(msg) => return SubmitOutcome::Invalid(msg),
        };
        if self.auth.is_loading() {
            return SubmitOutcome::Busy;
        }
        match self.auth.sign_up(&email, &password).await {
            Ok(user) if user.email_confirmed => SubmitOutcome::Navigate(Route::Dashboard),
            Ok(_) => SubmitOutcome::Show(Banner::Success(CHECK_EMAIL_NOTICE.to_owned())),
            Err(failure) => SubmitOutcome::Show(failure_banner(&failure)),
        }
    }
}

impl Drop for SignupPage {
    fn drop(&mut self) {
        self.auth.clear_error();
    }
}
