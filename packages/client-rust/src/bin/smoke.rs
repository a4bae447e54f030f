//! Runs the endpoint scenarios against a live Lumen server and prints a
//! pass/fail summary. Exits with status 1 if any scenario fails.

use std::future::Future;
use std::process::ExitCode;

use anyhow::{bail, ensure};
use clap::Parser;
use lumen_client::{ApiClient, ClientError};
use lumen_core::{EchoRequest, ErrorCode};
use serde_json::{json, Map, Value};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "lumen-smoke", version, about = "Smoke-test a running Lumen server")]
struct Args {
    /// Server base URL.
    #[arg(long, env = "LUMEN_API_URL", default_value = "http://localhost:3001")]
    base_url: String,

    /// Path prefix the server mounts its endpoints under.
    #[arg(long, env = "LUMEN_API_PREFIX", default_value = "/api")]
    prefix: String,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn expect_api_error<T: std::fmt::Debug>(
    result: Result<T, ClientError>,
    status: u16,
    code: ErrorCode,
) -> anyhow::Result<()> {
    match result {
        Err(ClientError::Api { status: got, error }) => {
            ensure!(got == status, "expected status {status}, got {got}");
            ensure!(error.code == code, "expected {code}, got {}", error.code);
            Ok(())
        }
        other => bail!("expected {code} error, got {other:?}"),
    }
}

struct Summary {
    passed: usize,
    failed: usize,
}

impl Summary {
    async fn check<F>(&mut self, name: &str, scenario: F)
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        match scenario.await {
            Ok(()) => {
                self.passed += 1;
                info!(scenario = name, "PASS");
            }
            Err(err) => {
                self.failed += 1;
                error!(scenario = name, error = %err, "FAIL");
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let args = Args::parse();
    let client = ApiClient::new(args.base_url)?.with_prefix(args.prefix);
    let mut summary = Summary { passed: 0, failed: 0 };

    summary
        .check("hello", async {
            let greeting = client.get_hello().await?;
            ensure!(greeting == "Hello World!", "unexpected greeting {greeting:?}");
            Ok(())
        })
        .await;

    summary
        .check("health", async {
            let report = client.get_health().await?;
            ensure!(report.status == "healthy", "unexpected status {}", report.status);
            Ok(())
        })
        .await;

    summary
        .check("api info", async {
            let info = client.get_api_info().await?;
            ensure!(info.endpoints.len() == 4, "expected 4 endpoints");
            Ok(())
        })
        .await;

    summary
        .check("echo", async {
            let mut data = Map::new();
            data.insert("source".to_string(), json!("smoke"));
            let reply = client
                .echo_message(&EchoRequest::new("Hello from smoke test").with_data(data.clone()))
                .await?;
            ensure!(reply.original_message == "Hello from smoke test", "message not echoed");
            ensure!(reply.received_data == Some(data), "data not echoed");
            ensure!(reply.request_id.starts_with("client_"), "request id not propagated");
            Ok(())
        })
        .await;

    summary
        .check("echo without message", async {
            let result = client.post::<_, Value>("/echo", &json!({ "data": {} }), None).await;
            expect_api_error(result, 400, ErrorCode::VALIDATION_ERROR)
        })
        .await;

    summary
        .check("unknown endpoint", async {
            let result = client.get::<Value>("/does-not-exist", None).await;
            expect_api_error(result, 404, ErrorCode::NOT_FOUND)
        })
        .await;

    info!(passed = summary.passed, failed = summary.failed, "smoke test finished");

    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
