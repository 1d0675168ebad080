// src/services/attendance_service.rs

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::AttendanceStore,
    models::{
        attendance::{AttendanceFilter, AttendanceRecord, MarkAttendancePayload, NewAttendance},
        auth::Principal,
    },
};

#[derive(Clone)]
pub struct AttendanceService {
    repo: Arc<dyn AttendanceStore>,
}

impl AttendanceService {
    pub fn new(repo: Arc<dyn AttendanceStore>) -> Self {
        Self { repo }
    }

    /// Marca a presença do dia. Funcionário marca só a própria; admin
    /// precisa dizer de quem é.
    pub async fn mark_attendance(
        &self,
        principal: &Principal,
        payload: MarkAttendancePayload,
    ) -> Result<AttendanceRecord, AppError> {
        payload.validate()?;

        // 1. Resolve o funcionário alvo
        let employee_id = if principal.is_admin() {
            payload
                .employee_id
                .ok_or_else(|| AppError::BadRequest("Employee id is required.".into()))?
        } else {
            let own = principal.employee_id.ok_or(AppError::Forbidden)?;
            if payload.employee_id.is_some_and(|requested| requested != own) {
                return Err(AppError::Forbidden);
            }
            own
        };

        // 2. Horas trabalhadas a partir da entrada/saída
        let hours_worked = match (payload.check_in, payload.check_out) {
            (Some(check_in), Some(check_out)) => Some(hours_between(check_in, check_out)?),
            _ => None,
        };

        let entry = NewAttendance {
            employee_id,
            date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
            status: payload.status,
            check_in: payload.check_in,
            check_out: payload.check_out,
            hours_worked,
            remarks: payload.remarks,
        };

        self.repo.upsert(&entry).await
    }

    pub async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, AppError> {
        self.repo.list(filter).await
    }

    /// Funcionário: os próprios registros. Admin: os do `employeeId` informado.
    pub async fn list_employee_attendance(
        &self,
        principal: &Principal,
        filter: AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let employee_id = if principal.is_admin() {
            filter
                .employee_id
                .ok_or_else(|| AppError::BadRequest("Employee id is required.".into()))?
        } else {
            let own = principal.employee_id.ok_or(AppError::Forbidden)?;
            principal.ensure_can_access_employee(filter.employee_id.unwrap_or(own))?;
            own
        };

        self.repo
            .list(&AttendanceFilter { employee_id: Some(employee_id), ..filter })
            .await
    }
}

fn hours_between(check_in: NaiveTime, check_out: NaiveTime) -> Result<Decimal, AppError> {
    if check_out < check_in {
        return Err(AppError::BadRequest("Check-out cannot be before check-in.".into()));
    }
    let seconds = (check_out - check_in).num_seconds();
    Ok((Decimal::from(seconds) / Decimal::from(3600)).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryStore;
    use crate::db::EmployeeStore;
    use crate::models::attendance::AttendanceStatus;
    use crate::models::auth::Role;
    use crate::services::test_support::employee_payload;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn admin() -> Principal {
        Principal { user_id: Uuid::new_v4(), role: Role::Admin, employee_id: None }
    }

    fn employee(employee_id: Uuid) -> Principal {
        Principal { user_id: Uuid::new_v4(), role: Role::Employee, employee_id: Some(employee_id) }
    }

    fn mark(employee_id: Option<Uuid>, day: u32) -> MarkAttendancePayload {
        MarkAttendancePayload {
            employee_id,
            date: NaiveDate::from_ymd_opt(2024, 1, day),
            status: AttendanceStatus::Present,
            check_in: NaiveTime::from_hms_opt(9, 0, 0),
            check_out: NaiveTime::from_hms_opt(17, 30, 0),
            remarks: None,
        }
    }

    async fn setup() -> (AttendanceService, Uuid, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let joined = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let e1 = store.create(&employee_payload("EMP001"), joined).await.unwrap();
        let e2 = store.create(&employee_payload("EMP002"), joined).await.unwrap();
        (AttendanceService::new(store), e1.id, e2.id)
    }

    #[tokio::test]
    async fn employee_marks_own_attendance_with_hours() {
        let (service, e1, _) = setup().await;

        let record = service.mark_attendance(&employee(e1), mark(None, 2)).await.unwrap();
        assert_eq!(record.employee_id, e1);
        assert_eq!(record.hours_worked, Some(dec!(8.5)));
    }

    #[tokio::test]
    async fn marking_for_someone_else_is_forbidden() {
        let (service, e1, e2) = setup().await;

        let err = service.mark_attendance(&employee(e1), mark(Some(e2), 2)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let err = service.mark_attendance(&admin(), mark(None, 2)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        assert!(service.mark_attendance(&admin(), mark(Some(e2), 2)).await.is_ok());
    }

    #[tokio::test]
    async fn marking_twice_overwrites_the_day() {
        let (service, e1, _) = setup().await;
        service.mark_attendance(&employee(e1), mark(None, 2)).await.unwrap();

        let mut again = mark(None, 2);
        again.status = AttendanceStatus::Leave;
        again.check_in = None;
        service.mark_attendance(&employee(e1), again).await.unwrap();

        let records = service.list_employee_attendance(&employee(e1), AttendanceFilter::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Leave);
        assert_eq!(records[0].hours_worked, None);
    }

    #[tokio::test]
    async fn check_out_before_check_in_is_rejected() {
        let (service, e1, _) = setup().await;
        let mut payload = mark(None, 2);
        payload.check_out = NaiveTime::from_hms_opt(8, 0, 0);

        let err = service.mark_attendance(&employee(e1), payload).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn own_listing_is_scoped_by_role() {
        let (service, e1, e2) = setup().await;
        service.mark_attendance(&employee(e1), mark(None, 2)).await.unwrap();
        service.mark_attendance(&employee(e2), mark(None, 3)).await.unwrap();

        let err = service
            .list_employee_attendance(&employee(e1), AttendanceFilter { employee_id: Some(e2), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let err = service.list_employee_attendance(&admin(), AttendanceFilter::default()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let records = service
            .list_employee_attendance(&admin(), AttendanceFilter { employee_id: Some(e2), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_id, e2);

        let all = service.list_attendance(&AttendanceFilter { month: Some(1), year: Some(2024), ..Default::default() }).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
