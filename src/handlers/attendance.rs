// src/handlers/attendance.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::AdminOnly},
    models::attendance::{AttendanceFilter, AttendanceRecord, MarkAttendancePayload},
};

#[utoipa::path(
    post,
    path = "/api/attendance/mark",
    tag = "Attendance",
    request_body = MarkAttendancePayload,
    responses(
        (status = 201, description = "Presença registrada (sobrescreve o mesmo dia)", body = AttendanceRecord),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Funcionário marcando para outro")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_attendance(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<MarkAttendancePayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state
        .attendance_service
        .mark_attendance(&principal, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    tag = "Attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Todos os registros de presença", body = Vec<AttendanceRecord>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_attendance(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Query(filter): Query<AttendanceFilter>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let records = app_state.attendance_service.list_attendance(&filter).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/employee",
    tag = "Attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Presença do funcionário", body = Vec<AttendanceRecord>),
        (status = 400, description = "Admin sem employeeId"),
        (status = 403, description = "Funcionário consultando outro")
    ),
    security(("api_jwt" = []))
)]
pub async fn employee_attendance(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(filter): Query<AttendanceFilter>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let records = app_state
        .attendance_service
        .list_employee_attendance(&principal, filter)
        .await?;
    Ok(Json(records))
}
