// src/handlers/employees.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::AdminOnly,
    models::employee::{Employee, EmployeeFilter, EmployeePayload},
};

#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = Employee),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Código ou e-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.employee_service.create_employee(payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Funcionários (mais recentes primeiro)", body = Vec<Employee>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Query(filter): Query<EmployeeFilter>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = app_state.employee_service.list_employees(&filter).await?;
    Ok(Json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do Funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, AppError> {
    let employee = app_state.employee_service.get_employee(id).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    request_body = EmployeePayload,
    params(("id" = Uuid, Path, description = "ID do Funcionário")),
    responses(
        (status = 200, description = "Funcionário atualizado", body = Employee),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 409, description = "Código ou e-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeePayload>,
) -> Result<Json<Employee>, AppError> {
    let employee = app_state.employee_service.update_employee(id, payload).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do Funcionário")),
    responses(
        (status = 200, description = "Funcionário removido"),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 409, description = "Ainda há folha, presença ou conta vinculada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.employee_service.delete_employee(id).await?;
    Ok(Json(json!({ "message": "Employee deleted successfully." })))
}
