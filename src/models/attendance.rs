// src/models/attendance.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

// Um registro por funcionário por dia
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub check_in: Option<NaiveTime>,

    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub check_out: Option<NaiveTime>,

    #[schema(example = 9.0)]
    pub hours_worked: Option<Decimal>,

    pub remarks: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendancePayload {
    // Obrigatório para admin; funcionário marca a própria presença
    pub employee_id: Option<Uuid>,

    // Se não vier, assume hoje (UTC)
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-15")]
    pub date: Option<NaiveDate>,

    pub status: AttendanceStatus,

    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub check_in: Option<NaiveTime>,

    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub check_out: Option<NaiveTime>,

    #[validate(length(max = 500, message = "Remarks are too long."))]
    pub remarks: Option<String>,
}

// O que o repositório grava (já resolvido pelo serviço)
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub hours_worked: Option<Decimal>,
    pub remarks: Option<String>,
}

/// Filtros reconhecidos na listagem de presença.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    pub employee_id: Option<Uuid>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}
