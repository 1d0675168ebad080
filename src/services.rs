pub mod attendance_service;
pub mod auth;
pub mod document_service;
pub mod employee_service;
pub mod payroll_calculator;
pub mod payroll_service;
pub mod report_service;

#[cfg(test)]
pub mod test_support;
