use std::net::SocketAddr;

use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use server::{build_router, startup, AppState};

struct TestApp {
    base_url: String,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let db = startup::connect_database(&configs::DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        auto_migrate: false,
        ..Default::default()
    })
    .await?;
    migration::Migrator::up(&db, None).await?;

    let auth = configs::AuthConfig { jwt_secret: "e2e-secret".into(), token_ttl_secs: 3600 };
    let cors = startup::build_cors(&configs::CorsConfig::default())?;
    let app = build_router(AppState::new(db.clone(), &auth), cors);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(startup::serve(listener, app, db, async move {
        let _ = rx.await;
    }));

    Ok(TestApp { base_url, shutdown: tx, handle })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().build().expect("reqwest client")
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "OK");

    app.shutdown.send(()).ok();
    app.handle.await??;
    Ok(())
}

#[tokio::test]
async fn e2e_register_login_and_crud() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({"email": "e2e@example.com", "password": "E2ePassw0rd", "full_name": "E2E", "role": "admin"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c
        .post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({"email": "e2e@example.com", "password": "E2ePassw0rd"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    let token = body["token"].as_str().expect("token").to_string();

    let res = c
        .post(format!("{}/api/products", app.base_url))
        .bearer_auth(&token)
        .json(&json!({"name": "Desk", "price": 120.0, "cost": 80.0, "sku": "DSK-1", "stock_quantity": 3}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let product: Value = res.json().await?;

    let res = c
        .get(format!("{}/api/products?search=dsk", app.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let page: Value = res.json().await?;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], product["id"]);

    let res = c.get(format!("{}/api/products", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    app.shutdown.send(()).ok();
    app.handle.await??;
    Ok(())
}

#[tokio::test]
async fn e2e_cors_preflight_for_configured_origin() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .request(reqwest::Method::OPTIONS, format!("{}/api/customers", app.base_url))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization")
        .send()
        .await?;
    assert!(res.status().is_success());
    assert_eq!(
        res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );

    app.shutdown.send(()).ok();
    app.handle.await??;
    Ok(())
}
