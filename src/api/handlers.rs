//! Request handlers for the REST surface
//!
//! Each wire payload maps to an explicit request struct with
//! `deny_unknown_fields`; unknown or missing fields are rejected at the
//! boundary rather than coerced. Date and time fields arrive as strings and
//! are parsed here so a bad value yields a validation error, not a generic
//! deserialization failure.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::domain::{LogEntry, Task, TimeBlock, WeeklyPlan};

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!(
            "{} must be a valid YYYY-MM-DD date, got \"{}\"",
            field, value
        ))
    })
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            ApiError::BadRequest(format!(
                "{} must be a valid HH:MM time, got \"{}\"",
                field, value
            ))
        })
}

// --- Health ---

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// --- Tasks ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    pub subject: String,
    pub priority_score: i64,
    pub deadline: String,
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let deadline = parse_date("deadline", &req.deadline)?;
    let task = state
        .engine
        .write()
        .await
        .add_task(&req.title, &req.subject, req.priority_score, deadline)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.engine.read().await.tasks())
}

pub async fn top_task(State(state): State<AppState>) -> Response {
    match state.engine.read().await.top_task() {
        Some(task) => (StatusCode::OK, Json(task)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompleteTaskRequest {
    pub duration_hours: f64,
    #[serde(default)]
    pub notes: String,
}

pub async fn complete_top(
    State(state): State<AppState>,
    Json(req): Json<CompleteTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = state
        .engine
        .write()
        .await
        .complete_top(req.duration_hours, &req.notes)?;
    Ok(Json(task))
}

// --- Subjects ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddDependencyRequest {
    pub prerequisite: String,
    pub dependent: String,
}

pub async fn add_dependency(
    State(state): State<AppState>,
    Json(req): Json<AddDependencyRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    state
        .engine
        .write()
        .await
        .add_dependency(&req.prerequisite, &req.dependent)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "prerequisite": req.prerequisite,
            "dependent": req.dependent,
        })),
    ))
}

pub async fn study_path(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let path = state.engine.read().await.study_path()?;
    Ok(Json(json!({ "path": path })))
}

pub async fn list_subjects(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine.read().await.subjects())
}

// --- Study log ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogSessionRequest {
    pub subject: String,
    pub duration_hours: f64,
    #[serde(default)]
    pub notes: String,
}

pub async fn log_session(
    State(state): State<AppState>,
    Json(req): Json<LogSessionRequest>,
) -> ApiResult<(StatusCode, Json<LogEntry>)> {
    let entry = state
        .engine
        .write()
        .await
        .log_session(&req.subject, req.duration_hours, &req.notes)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list_logs(State(state): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(state.engine.read().await.log_entries())
}

pub async fn summary(State(state): State<AppState>) -> Json<BTreeMap<String, f64>> {
    Json(state.engine.read().await.summary())
}

// --- Schedule ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddBlockRequest {
    pub start: String,
    pub end: String,
}

pub async fn add_block(
    State(state): State<AppState>,
    Json(req): Json<AddBlockRequest>,
) -> ApiResult<(StatusCode, Json<TimeBlock>)> {
    let start = parse_time("start", &req.start)?;
    let end = parse_time("end", &req.end)?;
    let block = state.engine.write().await.add_block(start, end)?;
    Ok((StatusCode::CREATED, Json(block)))
}

pub async fn list_blocks(State(state): State<AppState>) -> Json<Vec<TimeBlock>> {
    Json(state.engine.read().await.blocks())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WeeklyPlanRequest {
    #[serde(default)]
    pub slots_per_day: Option<u32>,
}

pub async fn weekly_plan(
    State(state): State<AppState>,
    body: Option<Json<WeeklyPlanRequest>>,
) -> ApiResult<Json<WeeklyPlan>> {
    let slots_per_day = body.and_then(|Json(req)| req.slots_per_day);
    let plan = state.engine.read().await.weekly_plan(slots_per_day)?;
    Ok(Json(plan))
}

// --- Undo / redo ---

pub async fn undo(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let message = state.engine.write().await.undo()?;
    Ok(Json(json!({ "status": "ok", "message": message })))
}

pub async fn redo(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let message = state.engine.write().await.redo()?;
    Ok(Json(json!({ "status": "ok", "message": message })))
}
