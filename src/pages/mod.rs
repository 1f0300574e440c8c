//! Page controllers for the auth screens and the dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! A page controller is the testable half of a screen: it validates input,
//! dispatches store actions, and turns store state into render or redirect
//! decisions. The CLI drives these the same way a browser view would.

pub mod dashboard;
pub mod guard;
pub mod login;
pub mod signup;

use guard::Route;

/// Inline message shown under an auth form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Banner {
    /// The auth provider could not send the confirmation email. Carries
    /// setup guidance rather than blaming the user.
    ConfirmationEmail { message: String, guidance: &'static [&'static str], docs_url: &'static str },
    Error(String),
    Success(String),
}

/// Result of submitting an auth form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected before dispatch.
    Invalid(&'static str),
    /// A request is already in flight.
    Busy,
    Navigate(Route),
    /// Stay on the page and show a banner.
    Show(Banner),
}

/// Both fields are required; the email is trimmed, the password is not.
///
/// # Errors
///
/// Returns the inline message to show when either field is blank.
pub fn validate_credentials_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
