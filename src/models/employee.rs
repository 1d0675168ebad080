// src/models/employee.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "department")]
pub enum Department {
    #[sqlx(rename = "IT")]
    #[serde(rename = "IT")]
    It,
    #[sqlx(rename = "HR")]
    #[serde(rename = "HR")]
    Hr,
    Finance,
    Operations,
    Sales,
    Marketing,
}

impl Department {
    /// Nome como aparece na API e no banco.
    pub fn label(&self) -> &'static str {
        match self {
            Department::It => "IT",
            Department::Hr => "HR",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employment_type")]
pub enum EmploymentType {
    #[default]
    #[sqlx(rename = "Full-time")]
    #[serde(rename = "Full-time")]
    FullTime,
    #[sqlx(rename = "Part-time")]
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Intern,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_status")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    Terminated,
}

// ---
// Validação Customizada
// ---
/// Maior valor aceito nas colunas `NUMERIC(14, 2)`.
pub(crate) fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Valor monetário: não negativo, até `max_amount()` e no máximo 2 casas decimais.
pub(crate) fn validate_amount(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Amount cannot be negative.".into());
        return Err(err);
    }
    if *val > max_amount() {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &max_amount().to_string());
        err.message = Some("Amount exceeds the maximum of 999999999999.99.".into());
        return Err(err);
    }
    if val.normalize().scale() > 2 {
        let mut err = ValidationError::new("scale");
        err.message = Some("Amount cannot have more than 2 decimal places.".into());
        return Err(err);
    }
    Ok(())
}

/// Código usado em URLs e no nome do holerite: letras, dígitos, `-`, `_` e `.`.
fn validate_employee_code(code: &str) -> Result<(), ValidationError> {
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        let mut err = ValidationError::new("employee_code");
        err.message = Some("Employee code may only contain letters, digits, '-', '_' and '.'.".into());
        return Err(err);
    }
    Ok(())
}

// --- Estruturas aninhadas (colunas "achatadas" na tabela employees) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Estrutura de remuneração mensal (valores cheios, antes do rateio por presença).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStructure {
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = 50000.0)]
    pub basic_salary: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 5000.0)]
    pub hra: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 2000.0)]
    pub da: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 1000.0)]
    pub other_allowances: Decimal,
}

/// Descontos fixos mensais (não sofrem rateio por presença).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeductionStructure {
    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 1000.0)]
    pub pf: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 2000.0)]
    pub tax: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 500.0)]
    pub insurance: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch: Option<String>,
}

// --- Funcionário ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,

    #[schema(example = "EMP001")]
    pub employee_code: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,

    #[schema(value_type = String, format = Date, example = "1990-05-17")]
    pub date_of_birth: NaiveDate,

    pub gender: Gender,

    #[sqlx(flatten)]
    pub address: Address,

    pub department: Department,
    pub designation: String,

    #[schema(value_type = String, format = Date, example = "2022-01-10")]
    pub date_of_joining: NaiveDate,

    pub employment_type: EmploymentType,

    #[sqlx(flatten)]
    pub salary: SalaryStructure,

    #[sqlx(flatten)]
    pub deductions: DeductionStructure,

    #[sqlx(flatten)]
    pub bank_details: BankDetails,

    pub status: EmployeeStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// --- Payloads ---

/// Usado tanto na criação quanto na atualização (PUT substitui os campos editáveis).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[validate(
        length(min = 1, max = 32, message = "Employee code must have between 1 and 32 characters."),
        custom(function = "validate_employee_code")
    )]
    #[schema(example = "EMP001")]
    pub employee_code: String,

    #[validate(length(min = 1, message = "First name is required."))]
    #[schema(example = "Asha")]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required."))]
    #[schema(example = "Verma")]
    pub last_name: String,

    #[validate(email(message = "Invalid email address."))]
    #[schema(example = "asha.verma@company.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required."))]
    pub phone: String,

    #[schema(value_type = String, format = Date, example = "1990-05-17")]
    pub date_of_birth: NaiveDate,

    pub gender: Gender,

    #[serde(default)]
    pub address: Address,

    pub department: Department,

    #[validate(length(min = 1, message = "Designation is required."))]
    #[schema(example = "Software Engineer")]
    pub designation: String,

    // Se não vier, assume hoje
    #[schema(value_type = Option<String>, format = Date, example = "2022-01-10")]
    pub date_of_joining: Option<NaiveDate>,

    #[serde(default)]
    pub employment_type: EmploymentType,

    #[validate(nested)]
    pub salary: SalaryStructure,

    #[validate(nested)]
    #[serde(default)]
    pub deductions: DeductionStructure,

    #[serde(default)]
    pub bank_details: BankDetails,

    #[serde(default)]
    pub status: EmployeeStatus,
}

/// Filtros reconhecidos na listagem de funcionários.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    pub department: Option<Department>,
    pub status: Option<EmployeeStatus>,
    /// Busca parcial (sem diferenciar maiúsculas) em nome, sobrenome, código e e-mail
    pub search: Option<String>,
}

impl EmployeeFilter {
    /// Termo de busca normalizado: `None` quando vazio.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
