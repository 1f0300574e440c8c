//! Route access rules and the redirect watcher shared by all pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page applies the same rule: wait while auth is loading, send
//! signed-out users away from protected views, and send signed-in users away
//! from the login and signup forms.

use tokio::task::JoinHandle;

use crate::auth::store::{AuthState, AuthStore};

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Login and signup: only useful while signed out.
    AuthEntry,
    Protected,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Dashboard => "/dashboard",
        }
    }

    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Self::Home => Access::Public,
            Self::Login | Self::Signup => Access::AuthEntry,
            Self::Dashboard => Access::Protected,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageDecision {
    Loading,
    Render,
    Redirect(Route),
}

/// What `route` should do for the given auth snapshot.
#[must_use]
pub fn decide(route: Route, state: &AuthState) -> PageDecision {
    match route.access() {
        Access::Public => PageDecision::Render,
        _ if state.is_loading() => PageDecision::Loading,
        Access::AuthEntry if state.is_authenticated() => PageDecision::Redirect(Route::Dashboard),
        Access::Protected if !state.is_authenticated() => PageDecision::Redirect(Route::Login),
        _ => PageDecision::Render,
    }
}

/// Evaluate `route` now and after every store change, calling `navigate`
/// when a redirect is due. Repeated identical redirects for consecutive
/// states are collapsed. The task ends when the store is dropped or the
/// handle is aborted.
///
/// Library API for long-lived UIs embedding the page controllers. The CLI
/// runs one command per process and checks [`decide`] once instead.
pub fn install_redirect<F>(auth: &AuthStore, route: Route, navigate: F) -> JoinHandle<()>
where
    F: Fn(Route) + Send + 'static,
{
    let mut rx = auth.subscribe();
    tokio::spawn(async move {
        let mut last = None;
        loop {
            let decision = decide(route, &rx.borrow_and_update());
            match decision {
                PageDecision::Redirect(target) if last != Some(decision) => navigate(target),
                _ => {}
            }
            last = Some(decision);
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
