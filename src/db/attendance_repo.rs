// src/db/attendance_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    db::stores::AttendanceStore,
    models::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus, NewAttendance},
};

const ATTENDANCE_COLUMNS: &str =
    "id, employee_id, date, status, check_in, check_out, hours_worked, remarks, created_at, updated_at";

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    async fn upsert(&self, entry: &NewAttendance) -> Result<AttendanceRecord, AppError> {
        // UPSERT (Insert or Update) no par (funcionário, dia)
        sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO attendance (employee_id, date, status, check_in, check_out, hours_worked, remarks)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (employee_id, date)
            DO UPDATE SET
                status = EXCLUDED.status,
                check_in = EXCLUDED.check_in,
                check_out = EXCLUDED.check_out,
                hours_worked = EXCLUDED.hours_worked,
                remarks = EXCLUDED.remarks,
                updated_at = NOW()
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(entry.employee_id)
        .bind(entry.date)
        .bind(entry.status)
        .bind(entry.check_in)
        .bind(entry.check_out)
        .bind(entry.hours_worked)
        .bind(&entry.remarks)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, || AppError::NotFound("Employee")))
    }

    async fn list(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance
            WHERE ($1::uuid IS NULL OR employee_id = $1)
              AND ($2::int IS NULL OR EXTRACT(MONTH FROM date)::int = $2)
              AND ($3::int IS NULL OR EXTRACT(YEAR FROM date)::int = $3)
            ORDER BY date DESC
            "#
        ))
        .bind(filter.employee_id)
        .bind(filter.month)
        .bind(filter.year)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count_present(&self, employee_id: Uuid, month: i32, year: i32) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM attendance
            WHERE employee_id = $1
              AND status = $2
              AND EXTRACT(MONTH FROM date)::int = $3
              AND EXTRACT(YEAR FROM date)::int = $4
            "#,
        )
        .bind(employee_id)
        .bind(AttendanceStatus::Present)
        .bind(month)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
