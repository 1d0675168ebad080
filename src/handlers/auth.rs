// src/handlers/auth.rs

use axum::{extract::State, http::{HeaderMap, StatusCode}, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{bearer_token, AuthenticatedUser},
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, User},
};

// ---
// Handler: register
// ---
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta criada", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Criar admin exige um token de admin"),
        (status = 409, description = "E-mail ou username já em uso")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn register(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Rota pública: o token só importa para criar outro admin
    let caller = match bearer_token(&headers) {
        Some(token) => Some(app_state.auth_service.validate_token(&token).await?),
        None => None,
    };

    let response = app_state
        .auth_service
        .register_user(payload, caller.as_ref())
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// ---
// Handler: login
// ---
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = app_state.auth_service.login_user(payload).await?;
    Ok(Json(response))
}

// ---
// Handler: get_me (rota protegida)
// ---
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Conta autenticada", body = User),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<User>, AppError> {
    let user = app_state.auth_service.get_me(&principal).await?;
    Ok(Json(user))
}
