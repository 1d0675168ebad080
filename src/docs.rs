// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Employees ---
        handlers::employees::create_employee,
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,

        // --- Payroll ---
        handlers::payroll::generate_payroll,
        handlers::payroll::compute_payroll,
        handlers::payroll::list_payrolls,
        handlers::payroll::get_payroll,
        handlers::payroll::update_payroll_status,
        handlers::payroll::employee_payslips,
        handlers::payroll::download_payslip,

        // --- Attendance ---
        handlers::attendance::mark_attendance,
        handlers::attendance::list_attendance,
        handlers::attendance::employee_attendance,

        // --- Reports ---
        handlers::reports::department_wise,
        handlers::reports::monthly_summary,
        handlers::reports::yearly_comparison,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Employees ---
            models::employee::Department,
            models::employee::Gender,
            models::employee::EmploymentType,
            models::employee::EmployeeStatus,
            models::employee::Address,
            models::employee::SalaryStructure,
            models::employee::DeductionStructure,
            models::employee::BankDetails,
            models::employee::Employee,
            models::employee::EmployeePayload,

            // --- Payroll ---
            models::payroll::PaymentStatus,
            models::payroll::Earnings,
            models::payroll::Deductions,
            models::payroll::PayrollRecord,
            models::payroll::PayrollDetail,
            models::payroll::GeneratePayrollPayload,
            models::payroll::ComputePayrollPayload,
            models::payroll::UpdatePayrollStatusPayload,

            // --- Attendance ---
            models::attendance::AttendanceStatus,
            models::attendance::AttendanceRecord,
            models::attendance::MarkAttendancePayload,

            // --- Reports ---
            models::report::DepartmentReportRow,
            models::report::MonthlySummaryRow,
            models::report::YearlyComparisonRow,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Employees", description = "Cadastro de Funcionários"),
        (name = "Payroll", description = "Folha de Pagamento e Holerites"),
        (name = "Attendance", description = "Registro de Presença"),
        (name = "Reports", description = "Relatórios Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
