// src/services/employee_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::EmployeeStore,
    models::employee::{Employee, EmployeeFilter, EmployeePayload},
};

#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeStore>) -> Self {
        Self { repo }
    }

    pub async fn create_employee(&self, payload: EmployeePayload) -> Result<Employee, AppError> {
        payload.validate()?;
        let date_of_joining = payload.date_of_joining.unwrap_or_else(|| Utc::now().date_naive());

        let employee = self.repo.create(&payload, date_of_joining).await?;
        tracing::info!("🧑‍💼 Funcionário {} ({}) criado", employee.employee_code, employee.full_name());
        Ok(employee)
    }

    pub async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Employee, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Employee"))
    }

    /// PUT: substitui todos os campos editáveis.
    pub async fn update_employee(&self, id: Uuid, payload: EmployeePayload) -> Result<Employee, AppError> {
        payload.validate()?;

        // Sem data informada, mantém a admissão atual
        let date_of_joining = match payload.date_of_joining {
            Some(date) => date,
            None => self.get_employee(id).await?.date_of_joining,
        };

        self.repo
            .update(id, &payload, date_of_joining)
            .await?
            .ok_or(AppError::NotFound("Employee"))
    }

    pub async fn delete_employee(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Employee"));
        }
        tracing::info!("🗑️ Funcionário {} removido", id);
        Ok(())
    }
}
