pub mod attendance;
pub mod auth;
pub mod employee;
pub mod payroll;
pub mod report;
