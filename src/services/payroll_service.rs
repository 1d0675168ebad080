// src/services/payroll_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{AttendanceStore, EmployeeStore, PayrollAmounts, PayrollStore},
    models::{
        auth::Principal,
        payroll::{
            ComputePayrollPayload, GeneratePayrollPayload, PaymentStatus, PayrollDetail, PayrollFilter,
            PayrollQuery, PayrollRecord, UpdatePayrollStatusPayload,
        },
    },
    services::payroll_calculator::{calculate_payroll, PayrollAdjustments},
};

#[derive(Clone)]
pub struct PayrollService {
    payroll_repo: Arc<dyn PayrollStore>,
    employee_repo: Arc<dyn EmployeeStore>,
    attendance_repo: Arc<dyn AttendanceStore>,
}

impl PayrollService {
    pub fn new(
        payroll_repo: Arc<dyn PayrollStore>,
        employee_repo: Arc<dyn EmployeeStore>,
        attendance_repo: Arc<dyn AttendanceStore>,
    ) -> Self {
        Self { payroll_repo, employee_repo, attendance_repo }
    }

    /// Primeira fase: cria o registro zerado em `Pending` para o período.
    pub async fn generate_payroll(&self, payload: GeneratePayrollPayload) -> Result<PayrollRecord, AppError> {
        payload.validate()?;

        if self.employee_repo.find_by_id(payload.employee_id).await?.is_none() {
            return Err(AppError::NotFound("Employee"));
        }

        // A unicidade do período fica com o store (atômica sob concorrência)
        let record = self
            .payroll_repo
            .insert_pending(payload.employee_id, payload.month, payload.year)
            .await?;

        tracing::info!(
            "📄 Folha {} gerada para o funcionário {} ({}/{})",
            record.id,
            record.employee_id,
            record.month,
            record.year
        );
        Ok(record)
    }

    /// Segunda fase: calcula e grava os valores de um registro ainda `Pending`.
    pub async fn compute_payroll(&self, id: Uuid, payload: ComputePayrollPayload) -> Result<PayrollRecord, AppError> {
        payload.validate()?;

        // 1. Registro e estado
        let detail = self.payroll_repo.find_detail(id).await?.ok_or(AppError::NotFound("Payroll"))?;
        let record = detail.payroll;
        if record.payment_status != PaymentStatus::Pending {
            return Err(AppError::Conflict("Only pending payroll records can be computed.".into()));
        }

        // 2. Estrutura salarial atual do funcionário
        let employee = self
            .employee_repo
            .find_by_id(record.employee_id)
            .await?
            .ok_or(AppError::NotFound("Employee"))?;

        // 3. Dias presentes: informados ou contados no registro de presença
        let present_days = match payload.present_days {
            Some(days) => days,
            None => {
                let counted = self
                    .attendance_repo
                    .count_present(record.employee_id, record.month, record.year)
                    .await?;
                i32::try_from(counted).map_err(|e| anyhow::anyhow!("Contagem de presença inválida: {}", e))?
            }
        };
        if present_days > payload.working_days {
            return Err(AppError::BadRequest("Present days cannot exceed working days.".into()));
        }

        // 4. Cálculo
        let adjustments = PayrollAdjustments {
            bonus: payload.bonus,
            overtime: payload.overtime,
            loan_deduction: payload.loan_deduction,
            late_deduction: payload.late_deduction,
        };
        let computation = calculate_payroll(&employee.salary, &employee.deductions, payload.working_days, present_days)?
            .with_adjustments(&adjustments)?;

        let amounts = PayrollAmounts {
            working_days: payload.working_days,
            present_days,
            earnings: computation.earnings,
            deductions: computation.deductions,
            gross_salary: computation.gross_salary,
            total_deductions: computation.total_deductions,
            net_salary: computation.net_salary,
            remarks: payload.remarks,
        };

        // 5. Grava somente se ninguém mudou o estado no meio do caminho
        let saved = self
            .payroll_repo
            .save_amounts(id, &amounts)
            .await?
            .ok_or_else(|| AppError::Conflict("Only pending payroll records can be computed.".into()))?;

        tracing::info!("🧮 Folha {} calculada: líquido {}", saved.id, saved.net_salary.round_dp(2));
        Ok(saved)
    }

    /// Admin vê tudo; funcionário só os próprios registros.
    pub async fn list_payrolls(&self, principal: &Principal, filter: PayrollFilter) -> Result<Vec<PayrollDetail>, AppError> {
        let employee_id = if principal.is_admin() {
            None
        } else {
            Some(principal.employee_id.ok_or(AppError::Forbidden)?)
        };

        self.payroll_repo
            .list(&PayrollQuery { employee_id, month: filter.month, year: filter.year })
            .await
    }

    pub async fn get_payroll(&self, principal: &Principal, id: Uuid) -> Result<PayrollDetail, AppError> {
        let detail = self.payroll_repo.find_detail(id).await?.ok_or(AppError::NotFound("Payroll"))?;
        principal.ensure_can_access_employee(detail.payroll.employee_id)?;
        Ok(detail)
    }

    pub async fn payslips_for_employee(
        &self,
        principal: &Principal,
        employee_id: Uuid,
    ) -> Result<Vec<PayrollDetail>, AppError> {
        principal.ensure_can_access_employee(employee_id)?;
        self.payroll_repo
            .list(&PayrollQuery { employee_id: Some(employee_id), ..Default::default() })
            .await
    }

    /// Qualquer status a partir de qualquer status; a data só muda quando informada.
    pub async fn update_status(
        &self,
        id: Uuid,
        payload: UpdatePayrollStatusPayload,
    ) -> Result<PayrollRecord, AppError> {
        let record = self
            .payroll_repo
            .update_status(id, payload.payment_status, payload.payment_date)
            .await?
            .ok_or(AppError::NotFound("Payroll"))?;

        tracing::info!("💸 Folha {} agora está {:?}", record.id, record.payment_status);
        Ok(record)
    }
}
