//! Shared application context.
//!
//! DESIGN
//! ======
//! `AppContext` is built once in `main` and handed explicitly to page
//! controllers and commands. It owns the auth store, the health store, and
//! the REST client. Stores are `Clone` handles over shared state, so the
//! context itself is cheap to clone.

use std::sync::Arc;

use crate::auth::backend::{AuthBackend, BackendError};
use crate::auth::session_file::SessionFile;
use crate::auth::store::AuthStore;
use crate::auth::supabase::SupabaseAuth;
use crate::config::AppConfig;
use crate::health::api::{ApiError, HealthApi};
use crate::health::store::HealthStore;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Auth(#[from] BackendError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub auth: AuthStore,
    pub api: Arc<HealthApi>,
    pub health: HealthStore,
}

impl AppContext {
    /// Wire production collaborators from config.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn from_config(config: AppConfig) -> Result<Self, ContextError> {
        let storage = SessionFile::new(&config.session_file);
        let backend: Arc<dyn AuthBackend> =
            Arc::new(SupabaseAuth::new(config.auth.clone(), storage, config.http_timeout_secs)?);
        let api = Arc::new(HealthApi::new(&config.api_base_url, config.http_timeout_secs)?);
        Ok(Self::new(config, backend, api))
    }

    #[must_use]
    pub fn new(config: AppConfig, backend: Arc<dyn AuthBackend>, api: Arc<HealthApi>) -> Self {
        let auth = AuthStore::new(backend);
        let health = HealthStore::new(api.clone());
        Self { config: Arc::new(config), auth, api, health }
    }

    /// Hand the current session's access token to the REST client.
    pub async fn sync_api_token(&self) {
        let token = if self.auth.is_authenticated() {
            self.auth.backend().access_token().await
        } else {
            None
        };
        self.api.set_bearer(token);
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

// =============================================================================
// TEST HELPERS
// =============================================================================
