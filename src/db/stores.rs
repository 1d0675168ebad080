// src/db/stores.rs

// Contratos de persistência usados pelos serviços. Os repositórios
// Postgres implementam estes traits; os testes usam versões em memória.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        attendance::{AttendanceFilter, AttendanceRecord, NewAttendance},
        auth::{NewUser, User},
        employee::{Employee, EmployeeFilter, EmployeePayload},
        payroll::{Deductions, Earnings, PaymentStatus, PayrollDetail, PayrollQuery, PayrollRecord},
    },
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn admin_exists(&self) -> Result<bool, AppError>;

    /// Falha com `EmailAlreadyExists`/`UsernameAlreadyExists` em duplicidade.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Cria o admin de primeiro acesso. Checagem e inserção são atômicas:
    /// `None` quando já existe algum admin.
    async fn create_first_admin(&self, new_user: NewUser) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn create(&self, payload: &EmployeePayload, date_of_joining: NaiveDate) -> Result<Employee, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError>;

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError>;

    async fn update(
        &self,
        id: Uuid,
        payload: &EmployeePayload,
        date_of_joining: NaiveDate,
    ) -> Result<Option<Employee>, AppError>;

    /// `false` quando não existe. Falha com `Conflict` se ainda houver referências.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Valores calculados que a etapa de cálculo grava no registro.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollAmounts {
    pub working_days: i32,
    pub present_days: i32,
    pub earnings: Earnings,
    pub deductions: Deductions,
    pub gross_salary: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
    pub remarks: Option<String>,
}

#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Insere o registro zerado em `Pending`. A unicidade de
    /// (funcionário, mês, ano) é garantida aqui: duplicidade vira
    /// `PayrollAlreadyExists`, mesmo sob concorrência.
    async fn insert_pending(&self, employee_id: Uuid, month: i32, year: i32) -> Result<PayrollRecord, AppError>;

    async fn find_detail(&self, id: Uuid) -> Result<Option<PayrollDetail>, AppError>;

    async fn list(&self, query: &PayrollQuery) -> Result<Vec<PayrollDetail>, AppError>;

    /// Grava os valores somente se o registro ainda estiver `Pending`.
    /// `None` quando o registro não existe ou já saiu de `Pending`.
    async fn save_amounts(&self, id: Uuid, amounts: &PayrollAmounts) -> Result<Option<PayrollRecord>, AppError>;

    /// A data de pagamento só é substituída quando informada.
    async fn update_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        payment_date: Option<NaiveDate>,
    ) -> Result<Option<PayrollRecord>, AppError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Um registro por (funcionário, dia): marcar de novo sobrescreve.
    async fn upsert(&self, entry: &NewAttendance) -> Result<AttendanceRecord, AppError>;

    async fn list(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, AppError>;

    async fn count_present(&self, employee_id: Uuid, month: i32, year: i32) -> Result<i64, AppError>;
}
