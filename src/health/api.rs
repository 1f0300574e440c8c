//! Typed client for the health, AI, and analytics REST surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server side of these routes is not part of this crate. The client
//! only knows the declared contracts: paths, verbs, and camelCase bodies.
//!
//! DESIGN
//! ======
//! GET queries go through a [`QueryCache`] keyed by full URL; each mutation
//! invalidates the tag its query family provides. The bearer token is set
//! from the auth session and swapping it drops the cache, since cached bodies
//! belong to the previous identity.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::cache::{QueryCache, QueryTag};
use super::types::{
    DailyLog, DailyLogPatch, HealthMetrics, MealRecommendation, NewDailyLog, NewWeightEntry, NutritionAnalysis,
    ProgressPeriod, WeightEntry, WorkoutRecommendation,
};

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("API request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("{message} (status {status})")]
    Response { status: u16, message: String },

    #[error("API response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    /// Message a server put in its error body, if it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Response { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Operations the health store needs from the REST layer.
#[async_trait::async_trait]
pub trait HealthSource: Send + Sync {
    async fn health_metrics(&self, user_id: &str) -> Result<HealthMetrics, ApiError>;

    async fn update_health_metrics(&self, user_id: &str, metrics: &HealthMetrics) -> Result<HealthMetrics, ApiError>;

    async fn daily_logs(&self, user_id: &str, start: &str, end: &str) -> Result<Vec<DailyLog>, ApiError>;

    async fn add_daily_log(&self, user_id: &str, log: &NewDailyLog) -> Result<DailyLog, ApiError>;

    async fn weight_history(&self, user_id: &str) -> Result<Vec<WeightEntry>, ApiError>;

    async fn add_weight_entry(&self, user_id: &str, entry: &NewWeightEntry) -> Result<WeightEntry, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HealthApi {
    http: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
    cache: QueryCache,
}

impl HealthApi {
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, bearer: RwLock::new(None), cache: QueryCache::new() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token. A different token clears the cache.
    pub fn set_bearer(&self, token: Option<String>) {
        let mut bearer = self.bearer.write().unwrap_or_else(PoisonError::into_inner);
        if *bearer != token {
            *bearer = token;
            self.cache.clear();
        }
    }

    fn bearer(&self) -> Option<String> {
        self.bearer.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}{path}", self.base_url);
        if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        }
        .map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    async fn send<B: Serialize + Sync>(&self, method: Method, url: Url, body: Option<&B>) -> Result<String, ApiError> {
        debug!(%method, %url, "api request");
        let mut req = self.http.request(method, url);
        if let Some(token) = self.bearer() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(ApiError::Response { status, message: error_message(status, &text) });
        }
        Ok(text)
    }

    async fn query<T: DeserializeOwned>(&self, url: Url, tag: QueryTag) -> Result<T, ApiError> {
        let key = url.to_string();
        if let Some(cached) = self.cache.get(&key) {
            debug!(url = %key, %tag, "api cache hit");
            return serde_json::from_value(cached).map_err(|e| ApiError::Parse(e.to_string()));
        }
        let text = self.send::<()>(Method::GET, url, None).await?;
        let value = parse_body(&text)?;
        let parsed = serde_json::from_value(value.clone()).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.cache.insert(key, tag, value);
        Ok(parsed)
    }

    async fn mutate<B, T>(&self, method: Method, url: Url, body: Option<&B>, tag: Option<QueryTag>) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let text = self.send(method, url, body).await?;
        if let Some(tag) = tag {
            let dropped = self.cache.invalidate(tag);
            debug!(%tag, dropped, "api cache invalidated");
        }
        serde_json::from_value(parse_body(&text)?).map_err(|e| ApiError::Parse(e.to_string()))
    }

    // -------------------------------------------------------------------------
    // Health metrics
    // -------------------------------------------------------------------------

    /// `GET /health/metrics/{userId}`
    pub async fn get_health_metrics(&self, user_id: &str) -> Result<HealthMetrics, ApiError> {
        let url = self.url(&format!("/health/metrics/{user_id}"), &[])?;
        self.query(url, QueryTag::HealthMetrics).await
    }

    /// `PUT /health/metrics/{userId}`
    pub async fn put_health_metrics(&self, user_id: &str, metrics: &HealthMetrics) -> Result<HealthMetrics, ApiError> {
        let url = self.url(&format!("/health/metrics/{user_id}"), &[])?;
        self.mutate(Method::PUT, url, Some(metrics), Some(QueryTag::HealthMetrics)).await
    }

    // -------------------------------------------------------------------------
    // Daily logs
    // -------------------------------------------------------------------------

    /// `GET /health/logs/{userId}?start=&end=`
    pub async fn get_daily_logs(&self, user_id: &str, start: &str, end: &str) -> Result<Vec<DailyLog>, ApiError> {
        let url = self.url(&format!("/health/logs/{user_id}"), &[("start", start), ("end", end)])?;
        self.query(url, QueryTag::DailyLogs).await
    }

    /// `POST /health/logs/{userId}`
    pub async fn post_daily_log(&self, user_id: &str, log: &NewDailyLog) -> Result<DailyLog, ApiError> {
        let url = self.url(&format!("/health/logs/{user_id}"), &[])?;
        self.mutate(Method::POST, url, Some(log), Some(QueryTag::DailyLogs)).await
    }

    /// `PATCH /health/logs/{userId}/{logId}`
    pub async fn patch_daily_log(&self, user_id: &str, log_id: &str, patch: &DailyLogPatch) -> Result<DailyLog, ApiError> {
        let url = self.url(&format!("/health/logs/{user_id}/{log_id}"), &[])?;
        self.mutate(Method::PATCH, url, Some(patch), Some(QueryTag::DailyLogs)).await
    }

    /// `DELETE /health/logs/{userId}/{logId}`
    pub async fn delete_daily_log(&self, user_id: &str, log_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/health/logs/{user_id}/{log_id}"), &[])?;
        self.send::<()>(Method::DELETE, url, None).await?;
        self.cache.invalidate(QueryTag::DailyLogs);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Weight history
    // -------------------------------------------------------------------------

    /// `GET /health/weight/{userId}`
    pub async fn get_weight_history(&self, user_id: &str) -> Result<Vec<WeightEntry>, ApiError> {
        let url = self.url(&format!("/health/weight/{user_id}"), &[])?;
        self.query(url, QueryTag::WeightHistory).await
    }

    /// `POST /health/weight/{userId}`
    pub async fn post_weight_entry(&self, user_id: &str, entry: &NewWeightEntry) -> Result<WeightEntry, ApiError> {
        let url = self.url(&format!("/health/weight/{user_id}"), &[])?;
        self.mutate(Method::POST, url, Some(entry), Some(QueryTag::WeightHistory)).await
    }

    // -------------------------------------------------------------------------
    // AI + analytics
    // -------------------------------------------------------------------------

    /// `GET /ai/meals/{userId}?preferences=a,b`
    pub async fn get_meal_recommendations(
        &self,
        user_id: &str,
        preferences: Option<&[String]>,
    ) -> Result<Vec<MealRecommendation>, ApiError> {
        let joined = preferences.map(|p| p.join(","));
        let params: Vec<(&str, &str)> = joined.iter().map(|p| ("preferences", p.as_str())).collect();
        let url = self.url(&format!("/ai/meals/{user_id}"), &params)?;
        self.query(url, QueryTag::Recommendations).await
    }

    /// `GET /ai/workouts/{userId}?goals=a,b`
    pub async fn get_workout_recommendations(
        &self,
        user_id: &str,
        goals: Option<&[String]>,
    ) -> Result<Vec<WorkoutRecommendation>, ApiError> {
        let joined = goals.map(|g| g.join(","));
        let params: Vec<(&str, &str)> = joined.iter().map(|g| ("goals", g.as_str())).collect();
        let url = self.url(&format!("/ai/workouts/{user_id}"), &params)?;
        self.query(url, QueryTag::Recommendations).await
    }

    /// `POST /ai/analyze-nutrition/{userId}`
    pub async fn analyze_nutrition(&self, user_id: &str, food_items: &[String]) -> Result<NutritionAnalysis, ApiError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            food_items: &'a [String],
        }
        let url = self.url(&format!("/ai/analyze-nutrition/{user_id}"), &[])?;
        self.mutate(Method::POST, url, Some(&Body { food_items }), None).await
    }

    /// `GET /analytics/progress/{userId}?period=` (free-form body, not cached).
    pub async fn get_progress_analytics(&self, user_id: &str, period: ProgressPeriod) -> Result<serde_json::Value, ApiError> {
        let url = self.url(&format!("/analytics/progress/{user_id}"), &[("period", period.as_str())])?;
        let text = self.send::<()>(Method::GET, url, None).await?;
        parse_body(&text)
    }
}

#[async_trait::async_trait]
impl HealthSource for HealthApi {
    async fn health_metrics(&self, user_id: &str) -> Result<HealthMetrics, ApiError> {
        self.get_health_metrics(user_id).await
    }

    async fn update_health_metrics(&self, user_id: &str, metrics: &HealthMetrics) -> Result<HealthMetrics, ApiError> {
        self.put_health_metrics(user_id, metrics).await
    }

    async fn daily_logs(&self, user_id: &str, start: &str, end: &str) -> Result<Vec<DailyLog>, ApiError> {
        self.get_daily_logs(user_id, start, end).await
    }

    async fn add_daily_log(&self, user_id: &str, log: &NewDailyLog) -> Result<DailyLog, ApiError> {
        self.post_daily_log(user_id, log).await
    }

    async fn weight_history(&self, user_id: &str) -> Result<Vec<WeightEntry>, ApiError> {
        self.get_weight_history(user_id).await
    }

    async fn add_weight_entry(&self, user_id: &str, entry: &NewWeightEntry) -> Result<WeightEntry, ApiError> {
        self.post_weight_entry(user_id, entry).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Empty bodies (204 and friends) read as JSON `null`.
fn parse_body(text: &str) -> Result<serde_json::Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(serde_json::Value::as_str).map(str::to_owned))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"))
}
