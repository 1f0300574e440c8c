//! GoTrue (Supabase Auth) REST client.
//!
//! Thin HTTP wrapper for `/auth/v1/*`. Response parsing lives in free
//! functions so it can be tested without a server.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::backend::{AuthBackend, BackendError};
use super::session_file::{SessionFile, StoredSession, unix_now};
use super::types::AuthUser;
use crate::config::AuthBackendConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const NOT_CONFIGURED: &str =
    "auth backend is not configured (set HEALITHM_SUPABASE_URL and HEALITHM_SUPABASE_ANON_KEY)";

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseAuth {
    http: reqwest::Client,
    config: Option<AuthBackendConfig>,
    storage: SessionFile,
}

impl SupabaseAuth {
    /// Build the client. A `None` config yields a client whose every call
    /// fails with a "not configured" message.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        config: Option<AuthBackendConfig>,
        storage: SessionFile,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::new(format!("http client build failed: {e}")))?;
        Ok(Self { http, config, storage })
    }

    fn config(&self) -> Result<&AuthBackendConfig, BackendError> {
        self.config.as_ref().ok_or_else(|| BackendError::new(NOT_CONFIGURED))
    }

    async fn stored_session(&self) -> Option<StoredSession> {
        match self.storage.load().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, path = %self.storage.path().display(), "ignoring unreadable session file");
                None
            }
        }
    }

    async fn persist(&self, session: &StoredSession) {
        if let Err(e) = self.storage.save(session).await {
            warn!(error = %e, "failed to persist auth session");
        }
    }

    async fn forget(&self) {
        if let Err(e) = self.storage.clear().await {
            warn!(error = %e, "failed to remove auth session file");
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<(u16, String), BackendError> {
        let config = self.config()?;
        let mut req = self
            .http
            .post(format!("{}{path}", config.url))
            .header("apikey", &config.anon_key)
            .json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        send(req).await
    }

    async fn token_grant(&self, grant_type: &str, body: &serde_json::Value) -> Result<StoredSession, BackendError> {
        let (status, text) = self
            .post_json(&format!("/auth/v1/token?grant_type={grant_type}"), body, None)
            .await?;
        if !is_success(status) {
            return Err(BackendError::new(error_message(status, &text)));
        }
        parse_token_response(&text, unix_now())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredSession, BackendError> {
        debug!("refreshing auth session");
        let session = self
            .token_grant("refresh_token", &serde_json::json!({ "refresh_token": refresh_token }))
            .await?;
        self.persist(&session).await;
        Ok(session)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<UserFetch, BackendError> {
        let config = self.config()?;
        let req = self
            .http
            .get(format!("{}/auth/v1/user", config.url))
            .header("apikey", &config.anon_key)
            .bearer_auth(access_token);
        let (status, text) = send(req).await?;
        match status {
            200..=299 => Ok(UserFetch::Found(parse_user(&text)?)),
            401 | 403 => Ok(UserFetch::Rejected),
            _ => Err(BackendError::new(error_message(status, &text))),
        }
    }
}

enum UserFetch {
    Found(AuthUser),
    Rejected,
}

async fn send(req: reqwest::RequestBuilder) -> Result<(u16, String), BackendError> {
    let resp = req
        .send()
        .await
        .map_err(|e| BackendError::new(format!("auth request failed: {e}")))?;
    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .map_err(|e| BackendError::new(format!("auth response read failed: {e}")))?;
    Ok((status, text))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait::async_trait]
impl AuthBackend for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        let session = self
            .token_grant("password", &serde_json::json!({ "email": email, "password": password }))
            .await?;
        self.persist(&session).await;
        Ok(session.user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, BackendError> {
        let (status, text) = self
            .post_json("/auth/v1/signup", &serde_json::json!({ "email": email, "password": password }), None)
            .await?;
        if !is_success(status) {
            return Err(BackendError::new(error_message(status, &text)));
        }
        match parse_signup_response(&text, unix_now())? {
            SignUpOutcome::Session(session) => {
                self.persist(&session).await;
                Ok(session.user)
            }
            SignUpOutcome::Unconfirmed(user) => Ok(user),
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let config = self.config();
        let session = self.stored_session().await;
        // Local tokens go regardless of what the server says.
        self.forget().await;
        config?;
        let Some(session) = session else {
            return Ok(());
        };
        let (status, text) = self
            .post_json("/auth/v1/logout", &serde_json::json!({}), Some(&session.access_token))
            .await?;
        match status {
            200..=299 | 401 | 403 | 404 => Ok(()),
            _ => Err(BackendError::new(error_message(status, &text))),
        }
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        self.config()?;
        let Some(mut session) = self.stored_session().await else {
            return Ok(None);
        };

        let mut refreshed = false;
        if session.is_expired(unix_now()) {
            if let Some(rt) = session.refresh_token.clone() {
                session = self.refresh(&rt).await?;
                refreshed = true;
            }
        }

        match self.fetch_user(&session.access_token).await? {
            UserFetch::Found(user) => Ok(Some(user)),
            UserFetch::Rejected => {
                if let (false, Some(rt)) = (refreshed, session.refresh_token.clone()) {
                    let session = self.refresh(&rt).await?;
                    if let UserFetch::Found(user) = self.fetch_user(&session.access_token).await? {
                        return Ok(Some(user));
                    }
                }
                debug!("stored session rejected by auth backend");
                self.forget().await;
                Ok(None)
            }
        }
    }

    async fn access_token(&self) -> Option<String> {
        self.stored_session().await.map(|s| s.access_token)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: BTreeMap<String, serde_json::Value>,
    email_confirmed_at: Option<String>,
    confirmed_at: Option<String>,
}

impl From<WireUser> for AuthUser {
    fn from(w: WireUser) -> Self {
        Self {
            id: w.id,
            email: w.email.unwrap_or_default(),
            metadata: w.user_metadata,
            email_confirmed: w.email_confirmed_at.is_some() || w.confirmed_at.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    expires_at: Option<u64>,
    user: WireUser,
}

impl TokenResponse {
    fn into_session(self, now: u64) -> StoredSession {
        let expires_at = self.expires_at.or_else(|| self.expires_in.map(|secs| now.saturating_add(secs)));
        StoredSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

#[derive(Debug)]
enum SignUpOutcome {
    Session(StoredSession),
    /// Account created; the provider wants the email confirmed before it
    /// hands out tokens.
    Unconfirmed(AuthUser),
}

fn parse_failed(e: &serde_json::Error) -> BackendError {
    BackendError::new(format!("unexpected auth response: {e}"))
}

fn parse_token_response(body: &str, now: u64) -> Result<StoredSession, BackendError> {
    let resp: TokenResponse = serde_json::from_str(body).map_err(|e| parse_failed(&e))?;
    Ok(resp.into_session(now))
}

fn parse_user(body: &str) -> Result<AuthUser, BackendError> {
    let user: WireUser = serde_json::from_str(body).map_err(|e| parse_failed(&e))?;
    Ok(user.into())
}

fn parse_signup_response(body: &str, now: u64) -> Result<SignUpOutcome, BackendError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| parse_failed(&e))?;
    if value.get("access_token").is_some() {
        let resp: TokenResponse = serde_json::from_value(value).map_err(|e| parse_failed(&e))?;
        return Ok(SignUpOutcome::Session(resp.into_session(now)));
    }
    let user_value = value.get("user").cloned().unwrap_or(value);
    let user: WireUser = serde_json::from_value(user_value).map_err(|e| parse_failed(&e))?;
    Ok(SignUpOutcome::Unconfirmed(user.into()))
}

/// Pull a human-readable message out of a GoTrue error body.
fn error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        ["msg", "error_description", "message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(serde_json::Value::as_str).map(str::to_owned))
    });
    from_json
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("auth request failed with status {status}")
            } else {
                format!("{status}: {body}")
            }
        })
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;
