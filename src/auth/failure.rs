//! Auth operation names and user-facing failure classification.

use std::fmt;

/// Operation tracked by the auth store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOp {
    SignIn,
    SignUp,
    SignOut,
    Restore,
}

impl AuthOp {
    /// Message used when the backend fails without one.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::SignIn => "Login failed",
            Self::SignUp => "Signup failed",
            Self::SignOut => "Logout failed",
            Self::Restore => "Auth check failed",
        }
    }
}

impl fmt::Display for AuthOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SignIn => "sign-in",
            Self::SignUp => "sign-up",
            Self::SignOut => "sign-out",
            Self::Restore => "restore-session",
        };
        f.write_str(name)
    }
}

const CONFIRMATION_EMAIL_MARKER: &str = "error sending confirmation";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider could not deliver the sign-up confirmation email. This is
    /// a provider configuration problem, not a user mistake.
    ConfirmationEmail,
    Generic,
}

/// Error state held by the auth store after a failed operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl AuthFailure {
    /// Classify a backend message for `op`. Blank messages are replaced with
    /// the operation's fallback text.
    #[must_use]
    pub fn classify(op: AuthOp, message: &str) -> Self {
        let message = if message.trim().is_empty() {
            op.fallback_message().to_owned()
        } else {
            message.to_owned()
        };
        let kind = if op == AuthOp::SignUp && message.to_lowercase().contains(CONFIRMATION_EMAIL_MARKER) {
            FailureKind::ConfirmationEmail
        } else {
            FailureKind::Generic
        };
        Self { kind, message }
    }

    #[must_use]
    pub fn is_confirmation_email(&self) -> bool {
        self.kind == FailureKind::ConfirmationEmail
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
#[path = "failure_test.rs"]
mod tests;
