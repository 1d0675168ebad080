// src/models/report.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::employee::Department;

// 1. Relatório por departamento (um mês/ano)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentReportRow {
    pub department: Department,
    pub employee_count: i64,
    pub total_gross_salary: Decimal,
    pub total_deductions: Decimal,
    pub total_net_salary: Decimal,
}

// 2. Resumo mensal (sempre 12 linhas)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryRow {
    pub month: i32,
    pub employee_count: i64,
    pub total_gross_salary: Decimal,
    pub total_deductions: Decimal,
    pub total_net_salary: Decimal,
}

// 3. Comparativo anual (ano corrente e os dois anteriores)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearlyComparisonRow {
    pub year: i32,
    pub total_gross_salary: Decimal,
    pub total_net_salary: Decimal,
    pub employee_count: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportPeriod {
    #[param(minimum = 1, maximum = 12)]
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportYear {
    pub year: i32,
}
