// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    db::stores::UserStore,
    models::auth::{NewUser, Role, User},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, employee_id, created_at, updated_at";

// Chave do advisory lock que serializa o cadastro do primeiro admin
const FIRST_ADMIN_LOCK_KEY: i64 = 0x5041_5952_4F4C_4C01;

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // Busca um usuário pelo seu e-mail
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn admin_exists(&self) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role = $1)")
            .bind(Role::Admin)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    // Cria um novo usuário no banco de dados
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        insert_user(&self.pool, &new_user).await
    }

    async fn create_first_admin(&self, new_user: NewUser) -> Result<Option<User>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Dois cadastros simultâneos esperam um pelo outro aqui
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(FIRST_ADMIN_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let admin_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE role = $1)")
            .bind(Role::Admin)
            .fetch_one(&mut *tx)
            .await?;
        if admin_exists {
            return Ok(None);
        }

        let user = insert_user(&mut *tx, &new_user).await?;
        tx.commit().await?;
        Ok(Some(user))
    }
}

// Com tratamento de erro específico para e-mail/username duplicados.
async fn insert_user<'e, E>(executor: E, new_user: &NewUser) -> Result<User, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, password_hash, role, employee_id)
        VALUES ($1, lower($2), $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(new_user.role)
    .bind(new_user.employee_id)
    .fetch_one(executor)
    .await
    .map_err(|e| map_constraint_error(e, || AppError::NotFound("Employee")))
}
