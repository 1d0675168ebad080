pub mod stores;
pub use stores::{AttendanceStore, EmployeeStore, PayrollAmounts, PayrollStore, UserStore};
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod payroll_repo;
pub use payroll_repo::PayrollRepository;
pub mod attendance_repo;
pub use attendance_repo::AttendanceRepository;

#[cfg(test)]
pub mod memory;
