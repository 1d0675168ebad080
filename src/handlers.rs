pub mod attendance;
pub mod auth;
pub mod employees;
pub mod payroll;
pub mod reports;
