// src/models/payroll.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::employee::{validate_amount, Department};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processed,
    Paid,
}

// --- Composição do holerite ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    pub basic_salary: Decimal,
    pub hra: Decimal,
    pub da: Decimal,
    pub other_allowances: Decimal,
    pub bonus: Decimal,
    pub overtime: Decimal,
}

impl Earnings {
    /// Soma dos proventos; `None` se estourar o `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        [self.hra, self.da, self.other_allowances, self.bonus, self.overtime]
            .into_iter()
            .try_fold(self.basic_salary, Decimal::checked_add)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deductions {
    pub pf: Decimal,
    pub tax: Decimal,
    pub insurance: Decimal,
    pub loan_deduction: Decimal,
    pub late_deduction: Decimal,
}

impl Deductions {
    pub fn total(&self) -> Option<Decimal> {
        [self.tax, self.insurance, self.loan_deduction, self.late_deduction]
            .into_iter()
            .try_fold(self.pf, Decimal::checked_add)
    }
}

// --- Registro da folha (uma linha por funcionário/mês/ano) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub id: Uuid,
    pub employee_id: Uuid,

    #[schema(example = 1, minimum = 1, maximum = 12)]
    pub month: i32,

    #[schema(example = 2024)]
    pub year: i32,

    pub working_days: i32,
    pub present_days: i32,

    #[sqlx(flatten)]
    pub earnings: Earnings,

    #[sqlx(flatten)]
    pub deductions: Deductions,

    pub gross_salary: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,

    pub payment_status: PaymentStatus,

    #[schema(value_type = Option<String>, format = Date, example = "2024-02-01")]
    pub payment_date: Option<NaiveDate>,

    pub remarks: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registro da folha junto com os dados do funcionário referenciado.
/// Os campos do funcionário são opcionais: a referência pode não resolver.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub payroll: PayrollRecord,

    pub employee_code: Option<String>,
    pub employee_name: Option<String>,
    pub department: Option<Department>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayrollPayload {
    pub employee_id: Uuid,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12."))]
    #[schema(example = 1)]
    pub month: i32,

    #[validate(range(min = 1900, max = 9999, message = "Year is invalid."))]
    #[schema(example = 2024)]
    pub year: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_attendance_counts"))]
pub struct ComputePayrollPayload {
    #[validate(range(min = 0, message = "Working days cannot be negative."))]
    #[schema(example = 22)]
    pub working_days: i32,

    // Se não vier, é derivado do registro de presença do mês
    #[validate(range(min = 0, message = "Present days cannot be negative."))]
    #[schema(example = 20)]
    pub present_days: Option<i32>,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    pub bonus: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    pub overtime: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    pub loan_deduction: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    pub late_deduction: Decimal,

    pub remarks: Option<String>,
}

fn validate_attendance_counts(payload: &ComputePayrollPayload) -> Result<(), ValidationError> {
    if let Some(present) = payload.present_days {
        if present > payload.working_days {
            let mut err = ValidationError::new("present_days_exceed_working_days");
            err.message = Some("Present days cannot exceed working days.".into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayrollStatusPayload {
    pub payment_status: PaymentStatus,

    #[schema(value_type = Option<String>, format = Date, example = "2024-02-01")]
    pub payment_date: Option<NaiveDate>,
}

/// Filtros reconhecidos na listagem da folha.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayrollFilter {
    pub month: Option<i32>,
    pub year: Option<i32>,
}

/// Consulta interna ao store (o filtro por funcionário vem da regra de posse).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayrollQuery {
    pub employee_id: Option<Uuid>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}
