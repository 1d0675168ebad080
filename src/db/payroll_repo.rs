// src/db/payroll_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    db::stores::{PayrollAmounts, PayrollStore},
    models::payroll::{PaymentStatus, PayrollDetail, PayrollQuery, PayrollRecord},
};

const PAYROLL_COLUMNS: &str = r#"
    id, employee_id, month, year, working_days, present_days,
    basic_salary, hra, da, other_allowances, bonus, overtime,
    pf, tax, insurance, loan_deduction, late_deduction,
    gross_salary, total_deductions, net_salary,
    payment_status, payment_date, remarks, created_at, updated_at
"#;

// Registro + dados do funcionário (LEFT JOIN: a referência pode não resolver)
const PAYROLL_DETAIL_SELECT: &str = r#"
    SELECT
        p.id, p.employee_id, p.month, p.year, p.working_days, p.present_days,
        p.basic_salary, p.hra, p.da, p.other_allowances, p.bonus, p.overtime,
        p.pf, p.tax, p.insurance, p.loan_deduction, p.late_deduction,
        p.gross_salary, p.total_deductions, p.net_salary,
        p.payment_status, p.payment_date, p.remarks, p.created_at, p.updated_at,
        e.employee_code,
        e.first_name || ' ' || e.last_name AS employee_name,
        e.department
    FROM payrolls p
    LEFT JOIN employees e ON e.id = p.employee_id
"#;

#[derive(Clone)]
pub struct PayrollRepository {
    pool: PgPool,
}

impl PayrollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayrollStore for PayrollRepository {
    async fn insert_pending(&self, employee_id: Uuid, month: i32, year: i32) -> Result<PayrollRecord, AppError> {
        // Os valores monetários e os dias nascem zerados (defaults da tabela).
        // A unique (employee_id, month, year) decide quem ganha numa corrida.
        sqlx::query_as::<_, PayrollRecord>(&format!(
            r#"
            INSERT INTO payrolls (employee_id, month, year, payment_status)
            VALUES ($1, $2, $3, $4)
            RETURNING {PAYROLL_COLUMNS}
            "#
        ))
        .bind(employee_id)
        .bind(month)
        .bind(year)
        .bind(PaymentStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, || AppError::NotFound("Employee")))
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<PayrollDetail>, AppError> {
        let detail = sqlx::query_as::<_, PayrollDetail>(&format!("{PAYROLL_DETAIL_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    async fn list(&self, query: &PayrollQuery) -> Result<Vec<PayrollDetail>, AppError> {
        let rows = sqlx::query_as::<_, PayrollDetail>(&format!(
            r#"
            {PAYROLL_DETAIL_SELECT}
            WHERE ($1::uuid IS NULL OR p.employee_id = $1)
              AND ($2::int IS NULL OR p.month = $2)
              AND ($3::int IS NULL OR p.year = $3)
            ORDER BY p.year DESC, p.month DESC, p.created_at DESC
            "#
        ))
        .bind(query.employee_id)
        .bind(query.month)
        .bind(query.year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn save_amounts(&self, id: Uuid, amounts: &PayrollAmounts) -> Result<Option<PayrollRecord>, AppError> {
        let record = sqlx::query_as::<_, PayrollRecord>(&format!(
            r#"
            UPDATE payrolls SET
                working_days = $2, present_days = $3,
                basic_salary = $4, hra = $5, da = $6, other_allowances = $7, bonus = $8, overtime = $9,
                pf = $10, tax = $11, insurance = $12, loan_deduction = $13, late_deduction = $14,
                gross_salary = $15, total_deductions = $16, net_salary = $17,
                remarks = COALESCE($18, remarks),
                updated_at = NOW()
            WHERE id = $1 AND payment_status = $19
            RETURNING {PAYROLL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(amounts.working_days)
        .bind(amounts.present_days)
        .bind(amounts.earnings.basic_salary)
        .bind(amounts.earnings.hra)
        .bind(amounts.earnings.da)
        .bind(amounts.earnings.other_allowances)
        .bind(amounts.earnings.bonus)
        .bind(amounts.earnings.overtime)
        .bind(amounts.deductions.pf)
        .bind(amounts.deductions.tax)
        .bind(amounts.deductions.insurance)
        .bind(amounts.deductions.loan_deduction)
        .bind(amounts.deductions.late_deduction)
        .bind(amounts.gross_salary)
        .bind(amounts.total_deductions)
        .bind(amounts.net_salary)
        .bind(&amounts.remarks)
        .bind(PaymentStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        payment_date: Option<NaiveDate>,
    ) -> Result<Option<PayrollRecord>, AppError> {
        let record = sqlx::query_as::<_, PayrollRecord>(&format!(
            r#"
            UPDATE payrolls SET
                payment_status = $2,
                payment_date = COALESCE($3, payment_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PAYROLL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(payment_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
