// src/services/report_service.rs

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PayrollStore,
    models::{
        payroll::{PayrollDetail, PayrollQuery},
        report::{DepartmentReportRow, MonthlySummaryRow, ReportPeriod, YearlyComparisonRow},
    },
};

// Acumulador comum aos três relatórios
#[derive(Default)]
struct Totals {
    employees: HashSet<Uuid>,
    gross: Decimal,
    deductions: Decimal,
    net: Decimal,
}

impl Totals {
    fn add(&mut self, detail: &PayrollDetail) {
        self.employees.insert(detail.payroll.employee_id);
        self.gross += detail.payroll.gross_salary;
        self.deductions += detail.payroll.total_deductions;
        self.net += detail.payroll.net_salary;
    }

    fn employee_count(&self) -> i64 {
        self.employees.len() as i64
    }
}

/// Relatórios recalculados a cada chamada a partir dos registros da folha.
#[derive(Clone)]
pub struct ReportService {
    payroll_repo: Arc<dyn PayrollStore>,
}

impl ReportService {
    pub fn new(payroll_repo: Arc<dyn PayrollStore>) -> Self {
        Self { payroll_repo }
    }

    pub async fn department_wise(&self, period: ReportPeriod) -> Result<Vec<DepartmentReportRow>, AppError> {
        if !(1..=12).contains(&period.month) {
            return Err(AppError::BadRequest("Month must be between 1 and 12.".into()));
        }
        let records = self
            .payroll_repo
            .list(&PayrollQuery { employee_id: None, month: Some(period.month), year: Some(period.year) })
            .await?;
        Ok(group_by_department(&records))
    }

    pub async fn monthly_summary(&self, year: i32) -> Result<Vec<MonthlySummaryRow>, AppError> {
        let records = self
            .payroll_repo
            .list(&PayrollQuery { year: Some(year), ..Default::default() })
            .await?;
        Ok(summarize_months(&records))
    }

    /// Ano corrente (UTC) e os dois anteriores.
    pub async fn yearly_comparison(&self) -> Result<Vec<YearlyComparisonRow>, AppError> {
        let current_year = Utc::now().year();
        let mut records = Vec::new();
        for year in (current_year - 2)..=current_year {
            records.extend(
                self.payroll_repo
                    .list(&PayrollQuery { year: Some(year), ..Default::default() })
                    .await?,
            );
        }
        Ok(compare_years(&records, current_year))
    }
}

/// Agrupa pelo departamento do funcionário; registros sem funcionário são ignorados.
pub fn group_by_department(records: &[PayrollDetail]) -> Vec<DepartmentReportRow> {
    let mut groups = BTreeMap::new();
    for detail in records {
        let Some(department) = detail.department else {
            continue;
        };
        groups.entry(department).or_insert_with(Totals::default).add(detail);
    }

    groups
        .into_iter()
        .map(|(department, totals)| DepartmentReportRow {
            department,
            employee_count: totals.employee_count(),
            total_gross_salary: totals.gross,
            total_deductions: totals.deductions,
            total_net_salary: totals.net,
        })
        .collect()
}

/// Sempre 12 linhas, meses sem registro zerados.
pub fn summarize_months(records: &[PayrollDetail]) -> Vec<MonthlySummaryRow> {
    let mut months: Vec<Totals> = (0..12).map(|_| Totals::default()).collect();
    for detail in records {
        if let Some(totals) = usize::try_from(detail.payroll.month - 1).ok().and_then(|i| months.get_mut(i)) {
            totals.add(detail);
        }
    }

    months
        .into_iter()
        .zip(1..)
        .map(|(totals, month)| MonthlySummaryRow {
            month,
            employee_count: totals.employee_count(),
            total_gross_salary: totals.gross,
            total_deductions: totals.deductions,
            total_net_salary: totals.net,
        })
        .collect()
}

/// Linhas para `[Y-2, Y-1, Y]`, contando funcionários distintos por ano.
pub fn compare_years(records: &[PayrollDetail], current_year: i32) -> Vec<YearlyComparisonRow> {
    ((current_year - 2)..=current_year)
        .map(|year| {
            let mut totals = Totals::default();
            records
                .iter()
                .filter(|detail| detail.payroll.year == year)
                .for_each(|detail| totals.add(detail));

            YearlyComparisonRow {
                year,
                total_gross_salary: totals.gross,
                total_net_salary: totals.net,
                employee_count: totals.employee_count(),
            }
        })
        .collect()
}
