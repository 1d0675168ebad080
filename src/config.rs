// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use crate::{
    db::{
        AttendanceRepository, AttendanceStore, EmployeeRepository, EmployeeStore, PayrollRepository,
        PayrollStore, UserRepository, UserStore,
    },
    services::{
        attendance_service::AttendanceService,
        auth::AuthService,
        document_service::{DocumentService, PayslipSettings},
        employee_service::EmployeeService,
        payroll_service::PayrollService,
        report_service::ReportService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in_days: i64,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub bcrypt_cost: u32,
    pub payslip: PayslipSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            jwt_expires_in_days: var_or("JWT_EXPIRES_IN_DAYS", 30)?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(var_or("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            bcrypt_cost: var_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            payslip: PayslipSettings {
                company_name: env::var("PAYSLIP_COMPANY_NAME")
                    .unwrap_or_else(|_| "Payroll Management System".to_string()),
                currency: env::var("PAYSLIP_CURRENCY").unwrap_or_else(|_| "Rs.".to_string()),
                font_dir: PathBuf::from(env::var("PAYSLIP_FONT_DIR").unwrap_or_else(|_| "./fonts".to_string())),
                font_family: env::var("PAYSLIP_FONT_FAMILY").unwrap_or_else(|_| "LiberationSans".to_string()),
            },
        })
    }
}

// Variável opcional com valor padrão; presente porém inválida é erro
fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} possui um valor inválido: '{raw}'")),
        Err(_) => Ok(default),
    }
}

pub async fn connect_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(pool)
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub employee_service: EmployeeService,
    pub payroll_service: PayrollService,
    pub attendance_service: AttendanceService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
}

impl AppState {
    /// Estado de produção: repositórios Postgres sobre o pool.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        Self::with_stores(
            config,
            Arc::new(UserRepository::new(db_pool.clone())),
            Arc::new(EmployeeRepository::new(db_pool.clone())),
            Arc::new(PayrollRepository::new(db_pool.clone())),
            Arc::new(AttendanceRepository::new(db_pool)),
        )
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_stores(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        employees: Arc<dyn EmployeeStore>,
        payrolls: Arc<dyn PayrollStore>,
        attendance: Arc<dyn AttendanceStore>,
    ) -> Self {
        let auth_service = AuthService::new(
            users,
            employees.clone(),
            config.jwt_secret.clone(),
            config.jwt_expires_in_days,
            config.bcrypt_cost,
        );
        let employee_service = EmployeeService::new(employees.clone());
        let payroll_service = PayrollService::new(payrolls.clone(), employees, attendance.clone());
        let attendance_service = AttendanceService::new(attendance);
        let report_service = ReportService::new(payrolls);
        let document_service = DocumentService::new(config.payslip.clone());

        Self {
            config: Arc::new(config),
            auth_service,
            employee_service,
            payroll_service,
            attendance_service,
            report_service,
            document_service,
        }
    }
}
