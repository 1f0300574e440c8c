use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use serde_json::{Value, json};

use super::*;
use crate::state::test_helpers::spawn_http_stub;

#[derive(Clone, Default)]
struct Hits {
    metrics_gets: Arc<AtomicUsize>,
    log_gets: Arc<AtomicUsize>,
}

fn log_json(id: &str, date: &str) -> Value {
    json!({
        "id": id, "date": date, "calories": 2000, "protein": 100, "carbs": 250,
        "fats": 70, "water": 2.0, "steps": 9000
    })
}

async fn get_metrics(State(hits): State<Hits>, Path(user): Path<String>, headers: HeaderMap) -> Response {
    hits.metrics_gets.fetch_add(1, Ordering::SeqCst);
    if user == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "no metrics for user" }))).into_response();
    }
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or("");
    let weight = if auth == "Bearer tok-a" { 70 } else { 80 };
    Json(json!({ "weight": weight, "activityLevel": "moderate" })).into_response()
}

async fn put_metrics(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn get_logs(State(hits): State<Hits>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    hits.log_gets.fetch_add(1, Ordering::SeqCst);
    let start = q.get("start").cloned().unwrap_or_default();
    Json(json!([log_json("l1", &start)]))
}

async fn post_log(Json(body): Json<Value>) -> Response {
    if body.get("id").is_some() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let mut created = body;
    created["id"] = json!("l2");
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn patch_log(Path((_user, log_id)): Path<(String, String)>, Json(body): Json<Value>) -> Json<Value> {
    let mut log = log_json(&log_id, "2025-03-01");
    if let Some(notes) = body.get("notes") {
        log["notes"] = notes.clone();
    }
    Json(log)
}

async fn delete_log() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn get_weight() -> Json<Value> {
    Json(json!([{ "id": "w1", "date": "2025-01-01", "weight": 82 }]))
}

async fn post_weight(Json(body): Json<Value>) -> Json<Value> {
    let mut created = body;
    created["id"] = json!("w2");
    Json(created)
}

async fn meals(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let prefs = q.get("preferences").cloned().unwrap_or_else(|| "none".into());
    Json(json!([{
        "id": "m1", "name": prefs, "calories": 450, "protein": 35, "carbs": 30, "fats": 15,
        "ingredients": ["salmon"], "instructions": ["grill"]
    }]))
}

async fn workouts(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let goals = q.get("goals").cloned().unwrap_or_default();
    Json(json!([{
        "id": "w1", "name": goals, "duration": 30, "difficulty": "advanced", "caloriesBurned": 350,
        "exercises": [{ "name": "Squats", "sets": 3, "reps": 12 }]
    }]))
}

async fn analyze(Json(body): Json<Value>) -> Json<Value> {
    let count = body["foodItems"].as_array().map_or(0, Vec::len);
    Json(json!({
        "totalCalories": count * 100,
        "macros": { "protein": 10, "carbs": 20, "fats": 5 },
        "recommendations": []
    }))
}

async fn progress(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "period": q.get("period"), "weightChange": -2.5 }))
}

async fn health_stub() -> (HealthApi, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/api/health/metrics/{user}", get(get_metrics).put(put_metrics))
        .route("/api/health/logs/{user}", get(get_logs).post(post_log))
        .route("/api/health/logs/{user}/{log}", patch(patch_log).delete(delete_log))
        .route("/api/health/weight/{user}", get(get_weight).post(post_weight))
        .route("/api/ai/meals/{user}", get(meals))
        .route("/api/ai/workouts/{user}", get(workouts))
        .route("/api/ai/analyze-nutrition/{user}", post(analyze))
        .route("/api/analytics/progress/{user}", get(progress))
        .with_state(hits.clone());
    let base = spawn_http_stub(router).await;
    let api = HealthApi::new(&format!("{base}/api/"), 5).unwrap();
    (api, hits)
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

#[test]
fn new_trims_trailing_slash() {
    let api = HealthApi::new("http://localhost:3000/api/", 5).unwrap();
    assert_eq!(api.base_url(), "http://localhost:3000/api");
}

#[test]
fn new_rejects_relative_base() {
    assert!(matches!(HealthApi::new("/api", 5), Err(ApiError::InvalidUrl(_))));
}

// =============================================================================
// QUERIES + CACHE
// =============================================================================

#[tokio::test]
async fn metrics_query_is_cached_until_mutation() {
    let (api, hits) = health_stub().await;
    let first = api.get_health_metrics("u1").await.unwrap();
    assert_eq!(first.weight, Some(80.0));
    api.get_health_metrics("u1").await.unwrap();
    assert_eq!(hits.metrics_gets.load(Ordering::SeqCst), 1);

    let updated = api
        .put_health_metrics("u1", &HealthMetrics { weight: Some(79.0), ..HealthMetrics::default() })
        .await
        .unwrap();
    assert_eq!(updated.weight, Some(79.0));

    api.get_health_metrics("u1").await.unwrap();
    assert_eq!(hits.metrics_gets.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn changing_bearer_drops_cache_and_sends_token() {
    let (api, hits) = health_stub().await;
    api.get_health_metrics("u1").await.unwrap();
    api.set_bearer(Some("tok-a".into()));
    assert!(api.cache().is_empty());

    let metrics = api.get_health_metrics("u1").await.unwrap();
    assert_eq!(metrics.weight, Some(70.0));
    assert_eq!(hits.metrics_gets.load(Ordering::SeqCst), 2);

    api.set_bearer(Some("tok-a".into()));
    assert_eq!(api.cache().len(), 1);
}

#[tokio::test]
async fn daily_logs_cache_is_keyed_by_range() {
    let (api, hits) = health_stub().await;
    let logs = api.get_daily_logs("u1", "2025-03-01", "2025-03-07").await.unwrap();
    assert_eq!(logs[0].fields.date, "2025-03-01");
    api.get_daily_logs("u1", "2025-03-08", "2025-03-14").await.unwrap();
    api.get_daily_logs("u1", "2025-03-01", "2025-03-07").await.unwrap();
    assert_eq!(hits.log_gets.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn log_mutations_invalidate_daily_logs() {
    let (api, hits) = health_stub().await;
    api.get_daily_logs("u1", "a", "b").await.unwrap();

    let created = api
        .post_daily_log("u1", &NewDailyLog { date: "2025-03-02".into(), ..NewDailyLog::default() })
        .await
        .unwrap();
    assert_eq!(created.id, "l2");
    assert_eq!(created.fields.date, "2025-03-02");
    api.get_daily_logs("u1", "a", "b").await.unwrap();
    assert_eq!(hits.log_gets.load(Ordering::SeqCst), 2);

    let patched = api
        .patch_daily_log("u1", "l1", &DailyLogPatch { notes: Some("rest day".into()), ..DailyLogPatch::default() })
        .await
        .unwrap();
    assert_eq!(patched.fields.notes.as_deref(), Some("rest day"));

    api.get_daily_logs("u1", "a", "b").await.unwrap();
    api.delete_daily_log("u1", "l1").await.unwrap();
    api.get_daily_logs("u1", "a", "b").await.unwrap();
    assert_eq!(hits.log_gets.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn weight_history_and_entry() {
    let (api, _) = health_stub().await;
    let history = api.get_weight_history("u1").await.unwrap();
    assert_eq!(history[0].id, "w1");
    let entry = api
        .post_weight_entry("u1", &NewWeightEntry { date: "2025-02-01".into(), weight: 80.5 })
        .await
        .unwrap();
    assert_eq!(entry.id, "w2");
    assert!((entry.fields.weight - 80.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn recommendations_join_list_params() {
    let (api, _) = health_stub().await;
    let prefs = vec!["vegan".to_owned(), "high protein".to_owned()];
    let meals = api.get_meal_recommendations("u1", Some(&prefs)).await.unwrap();
    assert_eq!(meals[0].name, "vegan,high protein");

    let meals = api.get_meal_recommendations("u2", None).await.unwrap();
    assert_eq!(meals[0].name, "none");

    let goals = vec!["strength".to_owned()];
    let workouts = api.get_workout_recommendations("u1", Some(&goals)).await.unwrap();
    assert_eq!(workouts[0].name, "strength");
    assert_eq!(workouts[0].exercises[0].sets, Some(3));
}

#[tokio::test]
async fn analyze_nutrition_sends_food_items() {
    let (api, _) = health_stub().await;
    let items = vec!["apple".to_owned(), "rice".to_owned()];
    let analysis = api.analyze_nutrition("u1", &items).await.unwrap();
    assert!((analysis.total_calories - 200.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn progress_analytics_passes_period() {
    let (api, _) = health_stub().await;
    let body = api.get_progress_analytics("u1", ProgressPeriod::Month).await.unwrap();
    assert_eq!(body["period"], "month");
}

// =============================================================================
// ERRORS
// =============================================================================

#[tokio::test]
async fn non_success_status_carries_server_message() {
    let (api, _) = health_stub().await;
    let err = api.get_health_metrics("missing").await.unwrap_err();
    assert_eq!(err, ApiError::Response { status: 404, message: "no metrics for user".into() });
    assert_eq!(err.server_message(), Some("no metrics for user"));
    assert!(api.cache().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let api = HealthApi::new("http://127.0.0.1:9/api", 1).unwrap();
    let err = api.get_weight_history("u1").await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert_eq!(err.server_message(), None);
}

#[test]
fn error_message_falls_back_to_status() {
    assert_eq!(error_message(500, ""), "request failed with status 500");
    assert_eq!(error_message(400, r#"{"error":"bad range"}"#), "bad range");
    assert_eq!(error_message(400, r#"{"message":" "}"#), "request failed with status 400");
}

#[test]
fn empty_body_parses_as_null() {
    assert_eq!(parse_body("  ").unwrap(), Value::Null);
    assert!(matches!(parse_body("<html>"), Err(ApiError::Parse(_))));
}
