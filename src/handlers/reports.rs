// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::AdminOnly,
    models::report::{DepartmentReportRow, MonthlySummaryRow, ReportPeriod, ReportYear, YearlyComparisonRow},
};

#[utoipa::path(
    get,
    path = "/api/reports/department-wise",
    tag = "Reports",
    params(ReportPeriod),
    responses(
        (status = 200, description = "Totais do período por departamento", body = Vec<DepartmentReportRow>)
    ),
    security(("api_jwt" = []))
)]
pub async fn department_wise(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Query(period): Query<ReportPeriod>,
) -> Result<Json<Vec<DepartmentReportRow>>, AppError> {
    let rows = app_state.report_service.department_wise(period).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/monthly-summary",
    tag = "Reports",
    params(ReportYear),
    responses(
        (status = 200, description = "Doze linhas, uma por mês", body = Vec<MonthlySummaryRow>)
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_summary(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
    Query(params): Query<ReportYear>,
) -> Result<Json<Vec<MonthlySummaryRow>>, AppError> {
    let rows = app_state.report_service.monthly_summary(params.year).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/reports/yearly-comparison",
    tag = "Reports",
    responses(
        (status = 200, description = "Ano corrente e os dois anteriores", body = Vec<YearlyComparisonRow>)
    ),
    security(("api_jwt" = []))
)]
pub async fn yearly_comparison(
    State(app_state): State<AppState>,
    _guard: AdminOnly,
) -> Result<Json<Vec<YearlyComparisonRow>>, AppError> {
    let rows = app_state.report_service.yearly_comparison().await?;
    Ok(Json(rows))
}
