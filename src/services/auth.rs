// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{EmployeeStore, UserStore},
    models::auth::{
        AuthResponse, Claims, LoginUserPayload, NewUser, Principal, RegisterUserPayload, Role, User,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserStore>,
    employee_repo: Arc<dyn EmployeeStore>,
    jwt_secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserStore>,
        employee_repo: Arc<dyn EmployeeStore>,
        jwt_secret: String,
        token_ttl_days: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repo,
            employee_repo,
            jwt_secret,
            token_ttl: Duration::days(token_ttl_days),
            bcrypt_cost,
        }
    }

    /// Cria uma conta. Contas admin exigem um chamador admin, exceto
    /// enquanto nenhum admin existir (primeiro acesso).
    pub async fn register_user(
        &self,
        payload: RegisterUserPayload,
        caller: Option<&Principal>,
    ) -> Result<AuthResponse, AppError> {
        payload.validate()?;

        // 1. Regras de papel
        match payload.role {
            Role::Admin => {
                let caller_is_admin = caller.is_some_and(Principal::is_admin);
                if !caller_is_admin && self.user_repo.admin_exists().await? {
                    return Err(AppError::Forbidden);
                }
            }
            Role::Employee => {
                let employee_id = payload.employee_id.ok_or_else(|| {
                    AppError::BadRequest("Employee id is required for employee accounts.".into())
                })?;
                if self.employee_repo.find_by_id(employee_id).await?.is_none() {
                    return Err(AppError::NotFound("Employee"));
                }
            }
        }

        // 2. Hashing (CPU-bound, fora do runtime)
        let password = payload.password;
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            role: payload.role,
            employee_id: payload.employee_id,
        };

        // 3. Persiste (duplicidade de e-mail/username vira Conflict no store)
        let bootstrap = payload.role == Role::Admin && !caller.is_some_and(Principal::is_admin);
        let user = if bootstrap {
            // Outro primeiro admin pode ter sido criado depois da checagem acima
            self.user_repo.create_first_admin(new_user).await?.ok_or(AppError::Forbidden)?
        } else {
            self.user_repo.create_user(new_user).await?
        };

        tracing::info!("👤 Usuário '{}' registrado com papel {:?}", user.username, user.role);

        self.auth_response(user)
    }

    pub async fn login_user(&self, payload: LoginUserPayload) -> Result<AuthResponse, AppError> {
        payload.validate()?;

        // E-mail desconhecido e senha errada respondem igual
        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = payload.password;
        let password_hash = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.auth_response(user)
    }

    /// Verifica o token e monta o contexto da sessão a partir do usuário atual.
    pub async fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(Principal::from(&user))
    }

    pub async fn get_me(&self, principal: &Principal) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(principal.user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn auth_response(&self, user: User) -> Result<AuthResponse, AppError> {
        let token = self.create_token(&user)?;
        Ok(AuthResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            employee_id: user.employee_id,
            token,
        })
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            role: user.role,
            employee_id: user.employee_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
