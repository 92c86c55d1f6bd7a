use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

const SERVER_BIN: &str = "target/debug/expense-tracker-api";

/// Integration tests need a reachable Postgres and the built server binary.
/// Without either, tests skip rather than fail.
pub fn test_env_ready() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skipping: DATABASE_URL is not set");
        return false;
    }
    if !std::path::Path::new(SERVER_BIN).exists() {
        eprintln!("skipping: {} not built", SERVER_BIN);
        return false;
    }
    true
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new(SERVER_BIN);
        cmd.env("EXPENSE_API_PORT", port.to_string())
            .env("JWT_SECRET", "integration-test-secret")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL from .env or the shell
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Consider server ready on any non-404 response
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Register a throwaway user and return (token, email).
#[allow(dead_code)]
pub async fn register_user(base_url: &str) -> Result<(String, String)> {
    let client = reqwest::Client::new();
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4());

    let res = client
        .post(format!("{}/api/users/register", base_url))
        .json(&serde_json::json!({
            "name": "Test User",
            "email": email,
            "password": "hunter22"
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    let token = body["token"]
        .as_str()
        .context("missing token in register response")?
        .to_string();

    Ok((token, email))
}
