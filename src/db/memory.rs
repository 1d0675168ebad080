// src/db/memory.rs

// Store em memória para os testes: implementa os quatro contratos sobre
// as mesmas tabelas, emulando as constraints do Postgres (unique e FK).

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::{AttendanceStore, EmployeeStore, PayrollAmounts, PayrollStore, UserStore},
    models::{
        attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus, NewAttendance},
        auth::{NewUser, Role, User},
        employee::{Employee, EmployeeFilter, EmployeePayload},
        payroll::{Deductions, Earnings, PaymentStatus, PayrollDetail, PayrollQuery, PayrollRecord},
    },
};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    employees: RwLock<Vec<Employee>>,
    payrolls: RwLock<Vec<PayrollRecord>>,
    attendance: RwLock<Vec<AttendanceRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn employee_exists(&self, id: Uuid) -> bool {
        self.employees.read().await.iter().any(|e| e.id == id)
    }

    // FK users.employee_id
    async fn check_user_employee(&self, new_user: &NewUser) -> Result<(), AppError> {
        if let Some(employee_id) = new_user.employee_id {
            if !self.employee_exists(employee_id).await {
                return Err(AppError::NotFound("Employee"));
            }
        }
        Ok(())
    }

    async fn with_employee(&self, payroll: PayrollRecord) -> PayrollDetail {
        let employees = self.employees.read().await;
        let employee = employees.iter().find(|e| e.id == payroll.employee_id);
        PayrollDetail {
            employee_code: employee.map(|e| e.employee_code.clone()),
            employee_name: employee.map(Employee::full_name),
            department: employee.map(|e| e.department),
            payroll,
        }
    }
}

fn employee_from_payload(id: Uuid, payload: &EmployeePayload, date_of_joining: NaiveDate) -> Employee {
    let now = Utc::now();
    Employee {
        id,
        employee_code: payload.employee_code.clone(),
        first_name: payload.first_name.clone(),
        last_name: payload.last_name.clone(),
        email: payload.email.to_lowercase(),
        phone: payload.phone.clone(),
        date_of_birth: payload.date_of_birth,
        gender: payload.gender,
        address: payload.address.clone(),
        department: payload.department,
        designation: payload.designation.clone(),
        date_of_joining,
        employment_type: payload.employment_type,
        salary: payload.salary.clone(),
        deductions: payload.deductions.clone(),
        bank_details: payload.bank_details.clone(),
        status: payload.status,
        created_at: now,
        updated_at: now,
    }
}

// Mesmas regras das constraints users_email_key / users_username_key
fn push_user(users: &mut Vec<User>, new_user: NewUser) -> Result<User, AppError> {
    let email = new_user.email.to_lowercase();
    if users.iter().any(|u| u.email == email) {
        return Err(AppError::EmailAlreadyExists);
    }
    if users.iter().any(|u| u.username == new_user.username) {
        return Err(AppError::UsernameAlreadyExists);
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        username: new_user.username,
        email,
        password_hash: new_user.password_hash,
        role: new_user.role,
        employee_id: new_user.employee_id,
        created_at: now,
        updated_at: now,
    };
    users.push(user.clone());
    Ok(user)
}

// Mesmas regras das constraints employees_employee_code_key / employees_email_key
fn check_employee_uniqueness(employees: &[Employee], payload: &EmployeePayload, except: Option<Uuid>) -> Result<(), AppError> {
    let email = payload.email.to_lowercase();
    for other in employees.iter().filter(|e| Some(e.id) != except) {
        if other.employee_code == payload.employee_code {
            return Err(AppError::EmployeeCodeAlreadyExists);
        }
        if other.email == email {
            return Err(AppError::EmailAlreadyExists);
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn admin_exists(&self) -> Result<bool, AppError> {
        Ok(self.users.read().await.iter().any(|u| u.role == Role::Admin))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        self.check_user_employee(&new_user).await?;
        push_user(&mut *self.users.write().await, new_user)
    }

    async fn create_first_admin(&self, new_user: NewUser) -> Result<Option<User>, AppError> {
        self.check_user_employee(&new_user).await?;

        // Mesmo lock de escrita cobre a checagem e a inserção
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.role == Role::Admin) {
            return Ok(None);
        }
        push_user(&mut users, new_user).map(Some)
    }
}

#[async_trait]
impl EmployeeStore for InMemoryStore {
    async fn create(&self, payload: &EmployeePayload, date_of_joining: NaiveDate) -> Result<Employee, AppError> {
        let mut employees = self.employees.write().await;
        check_employee_uniqueness(&employees, payload, None)?;

        let employee = employee_from_payload(Uuid::new_v4(), payload, date_of_joining);
        employees.push(employee.clone());
        Ok(employee)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        Ok(self.employees.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let term = filter.search_term().map(str::to_lowercase);
        let mut found: Vec<Employee> = self
            .employees
            .read()
            .await
            .iter()
            .filter(|e| filter.department.is_none_or(|d| e.department == d))
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .filter(|e| {
                term.as_deref().is_none_or(|t| {
                    [&e.first_name, &e.last_name, &e.employee_code, &e.email]
                        .iter()
                        .any(|field| field.to_lowercase().contains(t))
                })
            })
            .cloned()
            .collect();

        // Mais recentes primeiro; a ordem de inserção desempata
        found.reverse();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update(
        &self,
        id: Uuid,
        payload: &EmployeePayload,
        date_of_joining: NaiveDate,
    ) -> Result<Option<Employee>, AppError> {
        let mut employees = self.employees.write().await;
        let Some(index) = employees.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        check_employee_uniqueness(&employees, payload, Some(id))?;

        let mut updated = employee_from_payload(id, payload, date_of_joining);
        updated.created_at = employees[index].created_at;
        employees[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let referenced = self.users.read().await.iter().any(|u| u.employee_id == Some(id))
            || self.payrolls.read().await.iter().any(|p| p.employee_id == id)
            || self.attendance.read().await.iter().any(|a| a.employee_id == id);
        if referenced {
            return Err(AppError::Conflict(
                "Employee still has payroll, attendance or user account records.".into(),
            ));
        }

        let mut employees = self.employees.write().await;
        let before = employees.len();
        employees.retain(|e| e.id != id);
        Ok(employees.len() < before)
    }
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn insert_pending(&self, employee_id: Uuid, month: i32, year: i32) -> Result<PayrollRecord, AppError> {
        if !self.employee_exists(employee_id).await {
            return Err(AppError::NotFound("Employee"));
        }

        // O lock de escrita cobre verificação e inserção, como a unique do banco
        let mut payrolls = self.payrolls.write().await;
        if payrolls
            .iter()
            .any(|p| p.employee_id == employee_id && p.month == month && p.year == year)
        {
            return Err(AppError::PayrollAlreadyExists);
        }

        let now = Utc::now();
        let record = PayrollRecord {
            id: Uuid::new_v4(),
            employee_id,
            month,
            year,
            working_days: 0,
            present_days: 0,
            earnings: Earnings::default(),
            deductions: Deductions::default(),
            gross_salary: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            payment_status: PaymentStatus::Pending,
            payment_date: None,
            remarks: None,
            created_at: now,
            updated_at: now,
        };
        payrolls.push(record.clone());
        Ok(record)
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<PayrollDetail>, AppError> {
        let record = self.payrolls.read().await.iter().find(|p| p.id == id).cloned();
        match record {
            Some(record) => Ok(Some(self.with_employee(record).await)),
            None => Ok(None),
        }
    }

    async fn list(&self, query: &PayrollQuery) -> Result<Vec<PayrollDetail>, AppError> {
        let mut records: Vec<PayrollRecord> = self
            .payrolls
            .read()
            .await
            .iter()
            .filter(|p| query.employee_id.is_none_or(|id| p.employee_id == id))
            .filter(|p| query.month.is_none_or(|m| p.month == m))
            .filter(|p| query.year.is_none_or(|y| p.year == y))
            .cloned()
            .collect();
        records.sort_by(|a, b| (b.year, b.month, b.created_at).cmp(&(a.year, a.month, a.created_at)));

        let mut details = Vec::with_capacity(records.len());
        for record in records {
            details.push(self.with_employee(record).await);
        }
        Ok(details)
    }

    async fn save_amounts(&self, id: Uuid, amounts: &PayrollAmounts) -> Result<Option<PayrollRecord>, AppError> {
        let mut payrolls = self.payrolls.write().await;
        let Some(record) = payrolls
            .iter_mut()
            .find(|p| p.id == id && p.payment_status == PaymentStatus::Pending)
        else {
            return Ok(None);
        };

        record.working_days = amounts.working_days;
        record.present_days = amounts.present_days;
        record.earnings = amounts.earnings.clone();
        record.deductions = amounts.deductions.clone();
        record.gross_salary = amounts.gross_salary;
        record.total_deductions = amounts.total_deductions;
        record.net_salary = amounts.net_salary;
        if amounts.remarks.is_some() {
            record.remarks = amounts.remarks.clone();
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        payment_date: Option<NaiveDate>,
    ) -> Result<Option<PayrollRecord>, AppError> {
        let mut payrolls = self.payrolls.write().await;
        let Some(record) = payrolls.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        record.payment_status = status;
        if payment_date.is_some() {
            record.payment_date = payment_date;
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn upsert(&self, entry: &NewAttendance) -> Result<AttendanceRecord, AppError> {
        if !self.employee_exists(entry.employee_id).await {
            return Err(AppError::NotFound("Employee"));
        }

        let mut attendance = self.attendance.write().await;
        let now = Utc::now();
        if let Some(existing) = attendance
            .iter_mut()
            .find(|a| a.employee_id == entry.employee_id && a.date == entry.date)
        {
            existing.status = entry.status;
            existing.check_in = entry.check_in;
            existing.check_out = entry.check_out;
            existing.hours_worked = entry.hours_worked;
            existing.remarks = entry.remarks.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: entry.employee_id,
            date: entry.date,
            status: entry.status,
            check_in: entry.check_in,
            check_out: entry.check_out,
            hours_worked: entry.hours_worked,
            remarks: entry.remarks.clone(),
            created_at: now,
            updated_at: now,
        };
        attendance.push(record.clone());
        Ok(record)
    }

    async fn list(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, AppError> {
        let mut records: Vec<AttendanceRecord> = self
            .attendance
            .read()
            .await
            .iter()
            .filter(|a| filter.employee_id.is_none_or(|id| a.employee_id == id))
            .filter(|a| filter.month.is_none_or(|m| a.date.month() as i32 == m))
            .filter(|a| filter.year.is_none_or(|y| a.date.year() == y))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn count_present(&self, employee_id: Uuid, month: i32, year: i32) -> Result<i64, AppError> {
        let count = self
            .attendance
            .read()
            .await
            .iter()
            .filter(|a| {
                a.employee_id == employee_id
                    && a.status == AttendanceStatus::Present
                    && a.date.month() as i32 == month
                    && a.date.year() == year
            })
            .count();
        Ok(count as i64)
    }
}
