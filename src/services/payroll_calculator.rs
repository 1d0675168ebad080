// src/services/payroll_calculator.rs

//! Cálculo puro da folha: nenhum I/O, mesma entrada, mesma saída.

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        employee::{DeductionStructure, SalaryStructure},
        payroll::{Deductions, Earnings},
    },
};

fn out_of_range() -> AppError {
    AppError::BadRequest("Payroll amounts are out of range.".into())
}

/// Resultado do cálculo de um período.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollComputation {
    pub earnings: Earnings,
    pub deductions: Deductions,
    pub gross_salary: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
}

/// Ajustes avulsos do período. Bônus e hora extra não sofrem rateio.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayrollAdjustments {
    pub bonus: Decimal,
    pub overtime: Decimal,
    pub loan_deduction: Decimal,
    pub late_deduction: Decimal,
}

/// Fator de presença: `present / working`, ou zero quando não há dias úteis.
pub fn attendance_factor(working_days: i32, present_days: i32) -> Decimal {
    if working_days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(present_days) / Decimal::from(working_days)
}

/// Rateia os proventos pela presença e repassa os descontos fixos inteiros.
pub fn calculate_payroll(
    salary: &SalaryStructure,
    deductions: &DeductionStructure,
    working_days: i32,
    present_days: i32,
) -> Result<PayrollComputation, AppError> {
    let factor = attendance_factor(working_days, present_days);
    let prorate = |amount: Decimal| amount.checked_mul(factor).ok_or_else(out_of_range);

    let earnings = Earnings {
        basic_salary: prorate(salary.basic_salary)?,
        hra: prorate(salary.hra)?,
        da: prorate(salary.da)?,
        other_allowances: prorate(salary.other_allowances)?,
        bonus: Decimal::ZERO,
        overtime: Decimal::ZERO,
    };

    let deductions = Deductions {
        pf: deductions.pf,
        tax: deductions.tax,
        insurance: deductions.insurance,
        loan_deduction: Decimal::ZERO,
        late_deduction: Decimal::ZERO,
    };

    PayrollComputation::from_parts(earnings, deductions)
}

impl PayrollComputation {
    fn from_parts(earnings: Earnings, deductions: Deductions) -> Result<Self, AppError> {
        let gross_salary = earnings.total().ok_or_else(out_of_range)?;
        let total_deductions = deductions.total().ok_or_else(out_of_range)?;
        let net_salary = gross_salary.checked_sub(total_deductions).ok_or_else(out_of_range)?;

        Ok(Self { earnings, deductions, gross_salary, total_deductions, net_salary })
    }

    /// Soma os ajustes do período e recalcula os totais. O líquido pode ficar negativo.
    pub fn with_adjustments(self, adjustments: &PayrollAdjustments) -> Result<Self, AppError> {
        let add = |base: Decimal, extra: Decimal| base.checked_add(extra).ok_or_else(out_of_range);

        let earnings = Earnings {
            bonus: add(self.earnings.bonus, adjustments.bonus)?,
            overtime: add(self.earnings.overtime, adjustments.overtime)?,
            ..self.earnings
        };
        let deductions = Deductions {
            loan_deduction: add(self.deductions.loan_deduction, adjustments.loan_deduction)?,
            late_deduction: add(self.deductions.late_deduction, adjustments.late_deduction)?,
            ..self.deductions
        };

        Self::from_parts(earnings, deductions)
    }
}
