//! Health-data state: metrics, daily logs, and weight history.
//!
//! DESIGN
//! ======
//! Same shape as the auth store: a `watch` channel holding one snapshot and
//! one tracked request. Each async action clears the previous error on
//! dispatch and records either its payload or a failure message. Server
//! messages are kept; transport and parse failures become the action's
//! generic message.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::api::{ApiError, HealthSource};
use super::types::{DailyLog, HealthMetrics, NewDailyLog, NewWeightEntry, WeightEntry, upsert_by_id};
use crate::request::RequestStatus;

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthOp {
    FetchMetrics,
    UpdateMetrics,
    FetchDailyLogs,
    AddDailyLog,
    FetchWeightHistory,
    AddWeightEntry,
}

impl HealthOp {
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::FetchMetrics => "Failed to fetch health metrics",
            Self::UpdateMetrics => "Failed to update health metrics",
            Self::FetchDailyLogs => "Failed to fetch daily logs",
            Self::AddDailyLog => "Failed to add daily log",
            Self::FetchWeightHistory => "Failed to fetch weight history",
            Self::AddWeightEntry => "Failed to add weight entry",
        }
    }
}

impl fmt::Display for HealthOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FetchMetrics => "fetch-metrics",
            Self::UpdateMetrics => "update-metrics",
            Self::FetchDailyLogs => "fetch-daily-logs",
            Self::AddDailyLog => "add-daily-log",
            Self::FetchWeightHistory => "fetch-weight-history",
            Self::AddWeightEntry => "add-weight-entry",
        };
        f.write_str(name)
    }
}

pub type HealthRequest = RequestStatus<HealthOp, String>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HealthState {
    pub metrics: HealthMetrics,
    pub daily_logs: Vec<DailyLog>,
    pub weight_history: Vec<WeightEntry>,
    pub current_daily_log: Option<DailyLog>,
    pub request: HealthRequest,
}

impl HealthState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.request.is_pending()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.request.error().map(String::as_str)
    }
}

#[derive(Clone)]
pub struct HealthStore {
    source: Arc<dyn HealthSource>,
    state: Arc<watch::Sender<HealthState>>,
}

impl HealthStore {
    #[must_use]
    pub fn new(source: Arc<dyn HealthSource>) -> Self {
        let (tx, _rx) = watch::channel(HealthState::default());
        Self { source, state: Arc::new(tx) }
    }

    #[must_use]
    pub fn state(&self) -> HealthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HealthState> {
        self.state.subscribe()
    }

    async fn run<T, F, A>(&self, op: HealthOp, call: F, apply: A) -> Result<T, String>
    where
        T: Clone,
        F: Future<Output = Result<T, ApiError>>,
        A: FnOnce(&mut HealthState, T),
    {
        debug!(%op, "health request dispatched");
        self.state.send_modify(|s| s.request = RequestStatus::Pending(op));
        match call.await {
            Ok(value) => {
                let out = value.clone();
                self.state.send_modify(|s| {
                    apply(s, value);
                    s.request = RequestStatus::Succeeded(op);
                });
                Ok(out)
            }
            Err(e) => {
                warn!(%op, error = %e, "health request failed");
                let message = e.server_message().unwrap_or(op.fallback_message()).to_owned();
                self.state.send_modify(|s| {
                    s.request = RequestStatus::Failed { op, error: message.clone() };
                });
                Err(message)
            }
        }
    }

    /// # Errors
    ///
    /// Returns the failure message that was also recorded on the store.
    pub async fn fetch_health_metrics(&self, user_id: &str) -> Result<HealthMetrics, String> {
        self.run(HealthOp::FetchMetrics, self.source.health_metrics(user_id), |s, m| s.metrics = m)
            .await
    }

    /// # Errors
    ///
    /// Returns the failure message that was also recorded on the store.
    pub async fn update_health_metrics(&self, user_id: &str, metrics: &HealthMetrics) -> Result<HealthMetrics, String> {
        self.run(
            HealthOp::UpdateMetrics,
            self.source.update_health_metrics(user_id, metrics),
            |s, m| s.metrics = m,
        )
        .await
    }

    /// Merge `patch` onto the server's current metrics and save the result.
    /// A failed read, such as a user with no metrics record yet, starts from
    /// empty metrics instead of aborting the save.
    ///
    /// # Errors
    ///
    /// Returns the save failure message that was also recorded on the store.
    pub async fn patch_health_metrics(&self, user_id: &str, patch: &HealthMetrics) -> Result<HealthMetrics, String> {
        let mut merged = match self.source.health_metrics(user_id).await {
            Ok(current) => current,
            Err(e) => {
                debug!(error = %e, "current metrics unavailable; saving onto an empty record");
                HealthMetrics::default()
            }
        };
        merged.merge(patch);
        self.update_health_metrics(user_id, &merged).await
    }

    /// Replace the loaded logs with the server's `[start, end]` range.
    ///
    /// # Errors
    ///
    /// Returns the failure message that was also recorded on the store.
    pub async fn fetch_daily_logs(&self, user_id: &str, start: &str, end: &str) -> Result<Vec<DailyLog>, String> {
        self.run(
            HealthOp::FetchDailyLogs,
            self.source.daily_logs(user_id, start, end),
            |s, logs| s.daily_logs = logs,
        )
        .await
    }

    /// Append the created log and make it the current one.
    ///
    /// # Errors
    ///
    /// Returns the failure message that was also recorded on the store.
    pub async fn add_daily_log(&self, user_id: &str, log: &NewDailyLog) -> Result<DailyLog, String> {
        self.run(HealthOp::AddDailyLog, self.source.add_daily_log(user_id, log), |s, created| {
            s.current_daily_log = Some(created.clone());
            upsert_by_id(&mut s.daily_logs, created);
        })
        .await
    }

    /// # Errors
    ///
    /// Returns the failure message that was also recorded on the store.
    pub async fn fetch_weight_history(&self, user_id: &str) -> Result<Vec<WeightEntry>, String> {
        self.run(
            HealthOp::FetchWeightHistory,
            self.source.weight_history(user_id),
            |s, history| s.weight_history = history,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns the failure message that was also recorded on the store.
    pub async fn add_weight_entry(&self, user_id: &str, entry: &NewWeightEntry) -> Result<WeightEntry, String> {
        self.run(
            HealthOp::AddWeightEntry,
            self.source.add_weight_entry(user_id, entry),
            |s, created| upsert_by_id(&mut s.weight_history, created),
        )
        .await
    }

    pub fn clear_health_error(&self) {
        self.state.send_if_modified(|s| {
            let had_error = s.error().is_some();
            s.request.dismiss_error();
            had_error
        });
    }

    pub fn set_current_daily_log(&self, log: Option<DailyLog>) {
        self.state.send_modify(|s| s.current_daily_log = log);
    }

    /// Merge set fields of `patch` into the local metrics without a request.
    pub fn update_local_metrics(&self, patch: &HealthMetrics) {
        self.state.send_modify(|s| s.metrics.merge(patch));
    }
}
