// src/services/test_support.rs

// Fixtures compartilhadas pelos testes dos serviços e das rotas.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::models::employee::{
    Address, BankDetails, DeductionStructure, Department, EmployeePayload, EmployeeStatus, EmploymentType,
    Gender, SalaryStructure,
};

// Custo mínimo aceito pelo bcrypt, para os testes não ficarem lentos
pub const TEST_BCRYPT_COST: u32 = 4;

/// Funcionário de IT com a estrutura 50000/5000/2000/1000 e descontos 1000/2000/500.
pub fn employee_payload(code: &str) -> EmployeePayload {
    EmployeePayload {
        employee_code: code.to_owned(),
        first_name: "Asha".into(),
        last_name: "Verma".into(),
        email: format!("{}@company.com", code.to_lowercase()),
        phone: "+91 98765 43210".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        gender: Gender::Female,
        address: Address { city: Some("Pune".into()), ..Default::default() },
        department: Department::It,
        designation: "Software Engineer".into(),
        date_of_joining: None,
        employment_type: EmploymentType::FullTime,
        salary: SalaryStructure {
            basic_salary: dec!(50000),
            hra: dec!(5000),
            da: dec!(2000),
            other_allowances: dec!(1000),
        },
        deductions: DeductionStructure { pf: dec!(1000), tax: dec!(2000), insurance: dec!(500) },
        bank_details: BankDetails::default(),
        status: EmployeeStatus::Active,
    }
}
