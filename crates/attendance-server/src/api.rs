use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use application::DailyReport;
use domain::{
    AttendanceId, AttendanceInput, AttendanceRecord, AttendanceType, Employee, EmployeeFilter, EmployeeId,
    EmployeeInput, EmployeeUpdate, HistoryFilter,
};

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/{id}/deactivate", post(deactivate_employee))
        .route("/employees/rfid/{tag}", get(get_employee_by_rfid))
        .route("/attendances", get(get_attendances).post(record_attendance))
        .route("/attendances/entries", post(add_attendance_entry))
        .route("/attendances/{id}", get(get_attendance))
        .route(
            "/attendances/employee/{employee_id}",
            get(get_employee_attendances),
        )
        .route("/attendances/date/{date}", get(get_attendances_on))
        .route("/reports/daily/{date}", get(get_daily_report))
        .route("/test-attendance/check-in/{id}", post(check_in))
        .route("/test-attendance/check-out/{id}", post(check_out))
        .route("/actuator/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut body = json!({
        "status": "UP",
        "attendanceRecordsTotal": state.service.records_processed(),
    });
    if let Some(mqtt) = &state.mqtt {
        body["mqtt"] = json!(if mqtt.is_connected() { "UP" } else { "DOWN" });
    }
    Json(body)
}

fn employee_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<EmployeeId> {
    let Path(id) = path?;
    Ok(EmployeeId::new(id))
}

// --- Employees ---

async fn list_employees(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<EmployeeFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Employee>>> {
    let Query(filter) = filter?;
    Ok(Json(state.service.list_employees(&filter).await?))
}

async fn create_employee(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let Json(input) = payload?;
    let employee = state.service.create_employee(input).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.service.get_employee(employee_id(id)?).await?))
}

async fn update_employee(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let id = employee_id(id)?;
    let Json(update) = payload?;
    Ok(Json(state.service.update_employee(id, update).await?))
}

async fn delete_employee(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    state.service.delete_employee(employee_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn deactivate_employee(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(
        state.service.deactivate_employee(employee_id(id)?).await?,
    ))
}

async fn get_employee_by_rfid(
    State(state): State<Arc<AppState>>,
    Path(tag): Path<String>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.service.find_employee_by_rfid(&tag).await?))
}

// --- Attendances ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordAttendanceRequest {
    employee_id: EmployeeId,
    #[serde(rename = "type")]
    kind: AttendanceType,
    /// Defaults to the server clock
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

async fn get_attendances(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<HistoryFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let Query(filter) = filter?;
    Ok(Json(state.service.get_attendance_history(&filter).await?))
}

async fn get_attendance(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<AttendanceRecord>> {
    let Path(id) = id?;
    Ok(Json(state.service.get_attendance(AttendanceId::new(id)).await?))
}

async fn get_employee_attendances(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let id = employee_id(id)?;
    // Unknown employees are a 404 rather than an empty list
    state.service.get_employee(id).await?;
    Ok(Json(state.service.get_employee_attendances(id).await?))
}

async fn get_attendances_on(
    State(state): State<Arc<AppState>>,
    date: Result<Path<NaiveDate>, PathRejection>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let Path(date) = date?;
    Ok(Json(state.service.get_attendances_on(date).await?))
}

async fn record_attendance(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordAttendanceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    let Json(req) = payload?;
    let record = state
        .service
        .record_attendance(req.employee_id, req.kind, req.timestamp)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn add_attendance_entry(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AttendanceInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    let Json(input) = payload?;
    let record = state.service.add_attendance_entry(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_daily_report(
    State(state): State<Arc<AppState>>,
    date: Result<Path<NaiveDate>, PathRejection>,
) -> ApiResult<Json<DailyReport>> {
    let Path(date) = date?;
    Ok(Json(state.service.get_daily_report(date).await?))
}

// --- Legacy convenience routes ---

async fn check_in(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<AttendanceRecord>> {
    Ok(Json(state.service.check_in(employee_id(id)?).await?))
}

async fn check_out(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<AttendanceRecord>> {
    Ok(Json(state.service.check_out(employee_id(id)?).await?))
}
