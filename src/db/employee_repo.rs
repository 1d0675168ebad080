// src/db/employee_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{contains_pattern, map_constraint_error},
        error::AppError,
    },
    db::stores::EmployeeStore,
    models::employee::{Employee, EmployeeFilter, EmployeePayload},
};

const EMPLOYEE_COLUMNS: &str = r#"
    id, employee_code, first_name, last_name, email, phone, date_of_birth, gender,
    street, city, state, zip_code, country,
    department, designation, date_of_joining, employment_type,
    basic_salary, hra, da, other_allowances,
    pf, tax, insurance,
    account_number, bank_name, ifsc_code, branch,
    status, created_at, updated_at
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Binda os 28 campos editáveis na ordem $1..$28 usada por INSERT e UPDATE
macro_rules! bind_employee_payload {
    ($query:expr, $payload:expr, $date_of_joining:expr) => {
        $query
            .bind(&$payload.employee_code)
            .bind(&$payload.first_name)
            .bind(&$payload.last_name)
            .bind($payload.email.to_lowercase())
            .bind(&$payload.phone)
            .bind($payload.date_of_birth)
            .bind($payload.gender)
            .bind(&$payload.address.street)
            .bind(&$payload.address.city)
            .bind(&$payload.address.state)
            .bind(&$payload.address.zip_code)
            .bind(&$payload.address.country)
            .bind($payload.department)
            .bind(&$payload.designation)
            .bind($date_of_joining)
            .bind($payload.employment_type)
            .bind($payload.salary.basic_salary)
            .bind($payload.salary.hra)
            .bind($payload.salary.da)
            .bind($payload.salary.other_allowances)
            .bind($payload.deductions.pf)
            .bind($payload.deductions.tax)
            .bind($payload.deductions.insurance)
            .bind(&$payload.bank_details.account_number)
            .bind(&$payload.bank_details.bank_name)
            .bind(&$payload.bank_details.ifsc_code)
            .bind(&$payload.bank_details.branch)
            .bind($payload.status)
    };
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn create(&self, payload: &EmployeePayload, date_of_joining: NaiveDate) -> Result<Employee, AppError> {
        let sql = format!(
            r#"
            INSERT INTO employees (
                employee_code, first_name, last_name, email, phone, date_of_birth, gender,
                street, city, state, zip_code, country,
                department, designation, date_of_joining, employment_type,
                basic_salary, hra, da, other_allowances,
                pf, tax, insurance,
                account_number, bank_name, ifsc_code, branch,
                status
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11, $12,
                $13, $14, $15, $16,
                $17, $18, $19, $20,
                $21, $22, $23,
                $24, $25, $26, $27,
                $28
            )
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        );

        bind_employee_payload!(sqlx::query_as::<_, Employee>(&sql), payload, date_of_joining)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, || AppError::Conflict("Employee reference is invalid.".into())))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        // Filtros opcionais: parâmetro nulo desliga a condição
        let employees = sqlx::query_as::<_, Employee>(&format!(
            r#"
            SELECT {EMPLOYEE_COLUMNS}
            FROM employees
            WHERE ($1::department IS NULL OR department = $1)
              AND ($2::employee_status IS NULL OR status = $2)
              AND (
                    $3::text IS NULL
                    OR first_name ILIKE $3 ESCAPE '\'
                    OR last_name ILIKE $3 ESCAPE '\'
                    OR employee_code ILIKE $3 ESCAPE '\'
                    OR email ILIKE $3 ESCAPE '\'
              )
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.department)
        .bind(filter.status)
        .bind(filter.search_term().map(contains_pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    async fn update(
        &self,
        id: Uuid,
        payload: &EmployeePayload,
        date_of_joining: NaiveDate,
    ) -> Result<Option<Employee>, AppError> {
        let sql = format!(
            r#"
            UPDATE employees SET
                employee_code = $1, first_name = $2, last_name = $3, email = $4, phone = $5,
                date_of_birth = $6, gender = $7,
                street = $8, city = $9, state = $10, zip_code = $11, country = $12,
                department = $13, designation = $14, date_of_joining = $15, employment_type = $16,
                basic_salary = $17, hra = $18, da = $19, other_allowances = $20,
                pf = $21, tax = $22, insurance = $23,
                account_number = $24, bank_name = $25, ifsc_code = $26, branch = $27,
                status = $28,
                updated_at = NOW()
            WHERE id = $29
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        );

        bind_employee_payload!(sqlx::query_as::<_, Employee>(&sql), payload, date_of_joining)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, || AppError::Conflict("Employee reference is invalid.".into())))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        // As FKs são ON DELETE RESTRICT: se houver folha, presença ou conta vinculada, o banco recusa
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_error(e, || {
                    AppError::Conflict(
                        "Employee still has payroll, attendance or user account records.".into(),
                    )
                })
            })?;

        Ok(result.rows_affected() > 0)
    }
}
