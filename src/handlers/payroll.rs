// src/handlers/payroll.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::AdminOnly},
    models::payroll::{
        ComputePayrollPayload, GeneratePayrollPayload, PayrollDetail, PayrollFilter, PayrollRecord,
        UpdatePayrollStatusPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/payroll/generate",
    tag = "Payroll",
    request_body = GeneratePayrollPayload,
    responses(
        (status = 201, description = "Folha criada em Pending, valores zerados", body = PayrollRecord),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 409, description = "Já existe folha para o período")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_payroll(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Json(payload): Json<GeneratePayrollPayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state.payroll_service.generate_payroll(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    post,
    path = "/api/payroll/{id}/compute",
    tag = "Payroll",
    request_body = ComputePayrollPayload,
    params(("id" = Uuid, Path, description = "ID da Folha")),
    responses(
        (status = 200, description = "Valores calculados e gravados", body = PayrollRecord),
        (status = 404, description = "Folha ou funcionário não encontrado"),
        (status = 409, description = "A folha não está mais em Pending")
    ),
    security(("api_jwt" = []))
)]
pub async fn compute_payroll(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Path(id): Path<Uuid>,
    Json(payload): Json<ComputePayrollPayload>,
) -> Result<Json<PayrollRecord>, AppError> {
    let record = app_state.payroll_service.compute_payroll(id, payload).await?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    tag = "Payroll",
    params(PayrollFilter),
    responses(
        (status = 200, description = "Admin vê todas; funcionário só as próprias", body = Vec<PayrollDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payrolls(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Query(filter): Query<PayrollFilter>,
) -> Result<Json<Vec<PayrollDetail>>, AppError> {
    let records = app_state.payroll_service.list_payrolls(&principal, filter).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/payroll/{id}",
    tag = "Payroll",
    params(("id" = Uuid, Path, description = "ID da Folha")),
    responses(
        (status = 200, description = "Folha", body = PayrollDetail),
        (status = 403, description = "A folha é de outro funcionário"),
        (status = 404, description = "Folha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payroll(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PayrollDetail>, AppError> {
    let detail = app_state.payroll_service.get_payroll(&principal, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/payroll/{id}/status",
    tag = "Payroll",
    request_body = UpdatePayrollStatusPayload,
    params(("id" = Uuid, Path, description = "ID da Folha")),
    responses(
        (status = 200, description = "Status atualizado", body = PayrollRecord),
        (status = 404, description = "Folha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_payroll_status(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePayrollStatusPayload>,
) -> Result<Json<PayrollRecord>, AppError> {
    let record = app_state.payroll_service.update_status(id, payload).await?;
    Ok(Json(record))
}

#[utoipa::path(
    get,
    path = "/api/payroll/employee/{employee_id}/payslips",
    tag = "Payroll",
    params(("employee_id" = Uuid, Path, description = "ID do Funcionário")),
    responses(
        (status = 200, description = "Folhas do funcionário", body = Vec<PayrollDetail>),
        (status = 403, description = "Funcionário consultando outro funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn employee_payslips(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Vec<PayrollDetail>>, AppError> {
    let records = app_state
        .payroll_service
        .payslips_for_employee(&principal, employee_id)
        .await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/payroll/{id}/download",
    tag = "Payroll",
    params(("id" = Uuid, Path, description = "ID da Folha")),
    responses(
        (status = 200, description = "Holerite em PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 403, description = "A folha é de outro funcionário"),
        (status = 404, description = "Folha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_payslip(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Mesma regra de posse do GET
    let detail = app_state.payroll_service.get_payroll(&principal, id).await?;

    // 2. Renderiza
    let (filename, pdf) = app_state.document_service.render_payslip(&detail).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
    ];
    Ok((headers, pdf))
}
