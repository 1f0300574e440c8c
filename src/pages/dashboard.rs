//! Protected dashboard.

use tracing::debug;

use super::guard::{PageDecision, Route, decide};
use crate::auth::store::AuthStore;

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

pub const UPCOMING_FEATURES: [&str; 4] = [
    "Track your daily calories, macros, and water intake",
    "Monitor your weight progress with interactive charts",
    "Get AI-powered meal and workout recommendations",
    "View detailed analytics and progress reports",
];

/// What the dashboard shows for a signed-in user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardView {
    pub greeting: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub upcoming: &'static [&'static str],
}

pub struct DashboardPage {
    auth: AuthStore,
}

impl DashboardPage {
    #[must_use]
    pub fn new(auth: AuthStore) -> Self {
        Self { auth }
    }

    #[must_use]
    pub fn decision(&self) -> PageDecision {
        decide(Route::Dashboard, &self.auth.state())
    }

    /// `None` unless the page should render.
    #[must_use]
    pub fn view(&self) -> Option<DashboardView> {
        if self.decision() != PageDecision::Render {
            return None;
        }
        let state = self.auth.state();
        let user = state.user()?;
        Some(DashboardView {
            greeting: format!("Welcome back, {}!", user.display_name()),
            email: user.email.clone(),
            avatar_url: user.avatar_url().map(str::to_owned),
            upcoming: &UPCOMING_FEATURES,
        })
    }

    /// Sign out and return to the landing page. The local session is gone
    /// even if the backend call failed.
    pub async fn logout(&self) -> Route {
        if let Err(e) = self.auth.sign_out().await {
            debug!(error = %e, "logout finished with backend error");
        }
        Route::Home
    }
}
