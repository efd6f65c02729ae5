use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use models::account::Role;
use server::{build_router, AppState};
use service::auth::domain::PublicAccount;
use service::auth::TokenIssuer;

const SECRET: &str = "test-secret";

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect_with_config(&models::db::DatabaseConfig::in_memory_sqlite()).await?;
    migration::Migrator::up(&db, None).await?;
    let auth = configs::AuthConfig { jwt_secret: SECRET.into(), token_ttl_secs: 3600 };
    Ok(build_router(AppState::new(db, &auth), cors()))
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok((status, json))
}

/// Register an account and return its token.
async fn register(app: &Router, email: &str, role: &str) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": email, "password": "S3curePass", "full_name": "Tester", "role": role})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    Ok(body["token"].as_str().expect("token").to_string())
}

#[tokio::test]
async fn test_health_is_public() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_json_404() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/api/nothing-here", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Route not found"}));
    Ok(())
}

#[tokio::test]
async fn test_unregistered_method_is_json_404() -> anyhow::Result<()> {
    let app = build_app().await?;
    for (method, uri) in [("DELETE", "/health"), ("GET", "/api/auth/login"), ("PUT", "/api/auth/register")] {
        let (status, body) = send(&app, method, uri, None, None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body, json!({"error": "Route not found"}), "{method} {uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_register_login_me_flow() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "Flow@Example.com", "password": "S3curePass", "full_name": "Flow", "role": "manager"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "flow@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "flow@example.com", "password": "S3curePass"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_string();
    let claims = TokenIssuer::new(SECRET, 3600).verify(&token)?;
    assert_eq!(claims.role, Role::Manager);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Flow");
    assert_eq!(body["role"], "manager");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "twice@example.com", "user").await?;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "TWICE@example.com", "password": "another1", "full_name": "Second"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // the first account still logs in with its own password
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "twice@example.com", "password": "S3curePass"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "real@example.com", "user").await?;

    let unknown = send(&app, "POST", "/api/auth/login", None, Some(json!({"email": "unknown@x.com", "password": "anything"}))).await?;
    let wrong = send(&app, "POST", "/api/auth/login", None, Some(json!({"email": "real@example.com", "password": "wrongpassword"}))).await?;
    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);

    let (status, _) = send(&app, "POST", "/api/auth/login", None, Some(json!({"email": "real@example.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_register_validation_errors() -> anyhow::Result<()> {
    let app = build_app().await?;
    for body in [
        json!({"email": "a@b.com", "password": "short", "full_name": "A"}),
        json!({"email": "not-an-email", "password": "longenough", "full_name": "A"}),
        json!({"email": "a@b.com", "password": "longenough", "full_name": "  "}),
        json!({"email": "a@b.com", "password": "longenough", "full_name": "A", "role": "superuser"}),
    ] {
        let (status, resp) = send(&app, "POST", "/api/auth/register", None, Some(body)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
    }

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_token_gate() -> anyhow::Result<()> {
    let app = build_app().await?;
    let token = register(&app, "gate@example.com", "user").await?;

    let (status, body) = send(&app, "GET", "/api/customers", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let req = Request::builder()
        .uri("/api/customers")
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/customers", Some("garbage.token.value"), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let claims = TokenIssuer::new(SECRET, 3600).verify(&token)?;
    let account = PublicAccount {
        id: claims.id,
        email: claims.email,
        full_name: "Tester".into(),
        role: claims.role,
        created_at: chrono::Utc::now().into(),
    };
    let expired = TokenIssuer::new(SECRET, 60).issue_at(&account, chrono::Utc::now().timestamp() - 3600)?;
    let (status, _) = send(&app, "GET", "/api/customers", Some(&expired), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/customers", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .uri("/api/customers")
        .header(header::AUTHORIZATION, format!("bearer {token}"))
        .body(Body::empty())?;
    assert_eq!(app.clone().oneshot(req).await?.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_me_for_missing_account_is_404() -> anyhow::Result<()> {
    let app = build_app().await?;
    let ghost = PublicAccount {
        id: 999,
        email: "ghost@example.com".into(),
        full_name: "Ghost".into(),
        role: Role::User,
        created_at: chrono::Utc::now().into(),
    };
    let token = TokenIssuer::new(SECRET, 3600).issue(&ghost)?;
    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_role_gates() -> anyhow::Result<()> {
    let app = build_app().await?;
    let user = register(&app, "user@example.com", "user").await?;
    let manager = register(&app, "manager@example.com", "manager").await?;
    let admin = register(&app, "admin@example.com", "admin").await?;

    // admin-only
    assert_eq!(send(&app, "GET", "/api/auth/users", Some(&user), None).await?.0, StatusCode::FORBIDDEN);
    assert_eq!(send(&app, "GET", "/api/auth/users", Some(&manager), None).await?.0, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, "GET", "/api/auth/users", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    // any authenticated user may create customers, only admin/manager may delete
    let (status, customer) = send(&app, "POST", "/api/customers", Some(&user), Some(json!({"name": "Acme"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/customers/{}", customer["id"]);
    assert_eq!(send(&app, "DELETE", &uri, Some(&user), None).await?.0, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, "DELETE", &uri, Some(&manager), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], customer["id"]);

    // product writes need admin/manager
    let product = json!({"name": "Bolt", "price": 1.5, "cost": 0.5});
    assert_eq!(send(&app, "POST", "/api/products", Some(&user), Some(product.clone())).await?.0, StatusCode::FORBIDDEN);
    assert_eq!(send(&app, "POST", "/api/products", Some(&admin), Some(product)).await?.0, StatusCode::CREATED);
    assert_eq!(send(&app, "GET", "/api/products", Some(&user), None).await?.0, StatusCode::OK);
    Ok(())
}
