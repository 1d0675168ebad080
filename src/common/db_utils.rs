use crate::common::error::AppError;

// Códigos SQLSTATE do Postgres
const FOREIGN_KEY_VIOLATION: &str = "23503";
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

// ---
// Helper: traduz violações de constraint em erros de domínio
// ---
/// Converte erros de unicidade (pelo nome da constraint) e de chave
/// estrangeira nas variantes do `AppError`. Valores que não cabem na
/// coluna viram `BadRequest`. Qualquer outro erro vira `DatabaseError`.
pub(crate) fn map_constraint_error(
    e: sqlx::Error,
    on_foreign_key: impl FnOnce() -> AppError,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => AppError::EmailAlreadyExists,
                Some("users_username_key") => AppError::UsernameAlreadyExists,
                Some("employees_employee_code_key") => AppError::EmployeeCodeAlreadyExists,
                Some("employees_email_key") => AppError::EmailAlreadyExists,
                Some("payrolls_employee_period_key") => AppError::PayrollAlreadyExists,
                Some(other) => AppError::Conflict(format!("Unique constraint '{}' violated.", other)),
                None => AppError::Conflict("Unique constraint violated.".into()),
            };
        }

        match db_err.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => return on_foreign_key(),
            Some(STRING_DATA_RIGHT_TRUNCATION | NUMERIC_VALUE_OUT_OF_RANGE) => {
                return AppError::BadRequest("Value is out of range for the stored field.".into());
            }
            _ => {}
        }
    }
    e.into()
}

/// Padrão de `ILIKE ... ESCAPE '\'` para busca por substring literal.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
