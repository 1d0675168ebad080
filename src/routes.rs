// src/routes.rs

use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

async fn root(State(app_state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": format!("{} API", app_state.config.payslip.company_name) }))
}

/// Router completo da API (rotas, middlewares e documentação).
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    let employee_routes = Router::new()
        .route(
            "/",
            post(handlers::employees::create_employee).get(handlers::employees::list_employees),
        )
        .route(
            "/{id}",
            get(handlers::employees::get_employee)
                .put(handlers::employees::update_employee)
                .delete(handlers::employees::delete_employee),
        );

    let payroll_routes = Router::new()
        .route("/", get(handlers::payroll::list_payrolls))
        .route("/generate", post(handlers::payroll::generate_payroll))
        .route("/{id}", get(handlers::payroll::get_payroll))
        .route("/{id}/status", put(handlers::payroll::update_payroll_status))
        .route("/{id}/compute", post(handlers::payroll::compute_payroll))
        .route("/{id}/download", get(handlers::payroll::download_payslip))
        .route(
            "/employee/{employee_id}/payslips",
            get(handlers::payroll::employee_payslips),
        );

    let attendance_routes = Router::new()
        .route("/", get(handlers::attendance::list_attendance))
        .route("/mark", post(handlers::attendance::mark_attendance))
        .route("/employee", get(handlers::attendance::employee_attendance));

    let report_routes = Router::new()
        .route("/department-wise", get(handlers::reports::department_wise))
        .route("/monthly-summary", get(handlers::reports::monthly_summary))
        .route("/yearly-comparison", get(handlers::reports::yearly_comparison));

    // Tudo abaixo exige token; o papel é checado nos handlers
    let protected_routes = Router::new()
        .nest("/employees", employee_routes)
        .nest("/payroll", payroll_routes)
        .nest("/attendance", attendance_routes)
        .nest("/reports", report_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        db::memory::InMemoryStore,
        services::{
            document_service::PayslipSettings,
            test_support::{employee_payload, TEST_BCRYPT_COST},
        },
    };
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use std::{path::PathBuf, sync::Arc, time::Duration};
    use tower::ServiceExt;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://unused".into(),
            jwt_secret: "router-test-secret".into(),
            jwt_expires_in_days: 30,
            server_addr: "127.0.0.1:0".into(),
            db_max_connections: 1,
            db_acquire_timeout: Duration::from_secs(1),
            bcrypt_cost: TEST_BCRYPT_COST,
            payslip: PayslipSettings {
                company_name: "Payroll Management System".into(),
                currency: "Rs.".into(),
                font_dir: PathBuf::from("./fonts-that-do-not-exist"),
                font_family: "LiberationSans".into(),
            },
        }
    }

    fn app() -> Router {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::with_stores(test_config(), store.clone(), store.clone(), store.clone(), store);
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn amount(value: &Value) -> f64 {
        value.as_f64().unwrap()
    }

    #[tokio::test]
    async fn health_and_root_are_public() {
        let app = app();
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, body) = send(&app, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Payroll Management System API");
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_or_bad_tokens() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/payroll", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, "GET", "/api/auth/me", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn payroll_flow_from_registration_to_payslip() {
        let app = app();

        // 1. Primeiro admin (bootstrap) e login
        let (status, _) = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "username": "admin1", "email": "admin1@payroll.com", "password": "admin@123", "role": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, login) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin1@payroll.com", "password": "admin@123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let admin_token = login["token"].as_str().unwrap().to_owned();

        // 2. Funcionário
        let (status, employee) = send(
            &app,
            "POST",
            "/api/employees",
            Some(&admin_token),
            Some(employee_payload_json("EMP001")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let employee_id = employee["id"].as_str().unwrap().to_owned();

        // 3. Gera e calcula a folha de janeiro/2024
        let generate = json!({ "employeeId": employee_id, "month": 1, "year": 2024 });
        let (status, record) = send(&app, "POST", "/api/payroll/generate", Some(&admin_token), Some(generate.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["paymentStatus"], "Pending");
        assert_eq!(amount(&record["grossSalary"]), 0.0);
        let payroll_id = record["id"].as_str().unwrap().to_owned();

        let (status, _) = send(&app, "POST", "/api/payroll/generate", Some(&admin_token), Some(generate)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, computed) = send(
            &app,
            "POST",
            &format!("/api/payroll/{payroll_id}/compute"),
            Some(&admin_token),
            Some(json!({ "workingDays": 22, "presentDays": 20 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!((amount(&computed["earnings"]["basicSalary"]) - 45454.55).abs() < 0.01);
        assert!((amount(&computed["grossSalary"]) - 52727.27).abs() < 0.01);
        assert_eq!(amount(&computed["totalDeductions"]), 3500.0);
        assert!((amount(&computed["netSalary"]) - 49227.27).abs() < 0.01);

        // 4. Conta do funcionário e regra de posse
        let (status, employee_auth) = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "username": "emp001",
                "email": "emp001@payroll.com",
                "password": "emp@123",
                "role": "employee",
                "employeeId": employee_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let employee_token = employee_auth["token"].as_str().unwrap().to_owned();

        let (status, own) = send(&app, "GET", &format!("/api/payroll/{payroll_id}"), Some(&employee_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(own["employeeCode"], "EMP001");

        let (status, list) = send(&app, "GET", "/api/payroll", Some(&employee_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().map(Vec::len), Some(1));

        let (status, body) = send(&app, "GET", "/api/employees", Some(&employee_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Access denied." }));

        let (status, _) = send(&app, "GET", "/api/reports/yearly-comparison", Some(&employee_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // 5. Status e relatório
        let (status, paid) = send(
            &app,
            "PUT",
            &format!("/api/payroll/{payroll_id}/status"),
            Some(&admin_token),
            Some(json!({ "paymentStatus": "Paid", "paymentDate": "2024-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(paid["paymentDate"], "2024-02-01");

        let (status, rows) = send(
            &app,
            "GET",
            "/api/reports/department-wise?month=1&year=2024",
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows[0]["department"], "IT");
        assert_eq!(rows[0]["employeeCount"], 1);

        let (status, months) = send(&app, "GET", "/api/reports/monthly-summary?year=2024", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(months.as_array().map(Vec::len), Some(12));

        // 6. Sem fontes instaladas o download falha com erro interno genérico
        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/payroll/{payroll_id}/download"),
            Some(&employee_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred.");
    }

    #[tokio::test]
    async fn second_admin_needs_an_admin_token() {
        let app = app();
        let admin = json!({ "username": "admin1", "email": "admin1@payroll.com", "password": "admin@123", "role": "admin" });
        let (status, _) = send(&app, "POST", "/api/auth/register", None, Some(admin)).await;
        assert_eq!(status, StatusCode::CREATED);

        let second = json!({ "username": "admin2", "email": "admin2@payroll.com", "password": "admin@123", "role": "admin" });
        let (status, _) = send(&app, "POST", "/api/auth/register", None, Some(second)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn invalid_payload_reports_field_details() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "username": "ab", "email": "not-an-email", "password": "123", "role": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["username"].is_array());
        assert!(body["details"]["email"].is_array());
        assert!(body["details"]["password"].is_array());
    }

    // O payload de teste em JSON, como o cliente enviaria
    fn employee_payload_json(code: &str) -> Value {
        let payload = employee_payload(code);
        json!({
            "employeeCode": payload.employee_code,
            "firstName": payload.first_name,
            "lastName": payload.last_name,
            "email": payload.email,
            "phone": payload.phone,
            "dateOfBirth": payload.date_of_birth,
            "gender": payload.gender,
            "department": payload.department,
            "designation": payload.designation,
            "salary": payload.salary,
            "deductions": payload.deductions,
        })
    }
}
