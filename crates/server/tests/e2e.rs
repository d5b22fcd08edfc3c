use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
}

fn test_config(root: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.db_file = root.join("data/db.json");
    cfg.web.public_dir = root.join("public");
    cfg
}

async fn start_server(cfg: &AppConfig) -> anyhow::Result<TestApp> {
    let app = server::startup::build_app(cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn temp_root() -> PathBuf {
    PathBuf::from(format!("target/test-data/{}", Uuid::new_v4()))
}

#[tokio::test]
async fn e2e_health_and_empty_store_file() -> anyhow::Result<()> {
    let root = temp_root();
    let cfg = test_config(&root);
    let app = start_server(&cfg).await?;

    let res = reqwest::get(format!("{}/api/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["ok"], true);

    // startup creates the backing file with the empty state
    let on_disk: Value = serde_json::from_slice(&tokio::fs::read(&cfg.storage.db_file).await?)?;
    assert_eq!(on_disk, json!({ "records": [], "next_id": 1 }));

    let _ = tokio::fs::remove_dir_all(&root).await;
    Ok(())
}

#[tokio::test]
async fn e2e_state_survives_restart() -> anyhow::Result<()> {
    let root = temp_root();
    let cfg = test_config(&root);
    let c = reqwest::Client::new();

    let first = start_server(&cfg).await?;
    for title in ["A", "B", "C"] {
        let res = c
            .post(format!("{}/api/todos", first.base_url))
            .json(&json!({ "title": title, "done": title == "B" }))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }
    let res = c.delete(format!("{}/api/todos/3", first.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let before = c.get(format!("{}/api/todos", first.base_url)).send().await?.json::<Value>().await?;

    // a second app over the same file stands in for a process restart
    let second = start_server(&cfg).await?;
    let after = c.get(format!("{}/api/todos", second.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(before, after);

    let res = c
        .post(format!("{}/api/todos", second.base_url))
        .json(&json!({ "title": "D" }))
        .send()
        .await?;
    let created = res.json::<Value>().await?;
    assert_eq!(created["id"], 4);

    let _ = tokio::fs::remove_dir_all(&root).await;
    Ok(())
}

#[tokio::test]
async fn e2e_corrupt_file_starts_empty() -> anyhow::Result<()> {
    let root = temp_root();
    let cfg = test_config(&root);
    tokio::fs::create_dir_all(root.join("data")).await?;
    tokio::fs::write(&cfg.storage.db_file, b"not json at all").await?;

    let app = start_server(&cfg).await?;
    let list = reqwest::get(format!("{}/api/todos", app.base_url)).await?.json::<Value>().await?;
    assert_eq!(list, json!([]));

    let _ = tokio::fs::remove_dir_all(&root).await;
    Ok(())
}
