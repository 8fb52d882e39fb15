use httpmock::prelude::*;
use medalizer_setup::adapters::mock::RecordingRunner;
use medalizer_setup::app::steps::server::DevServer;
use medalizer_setup::core::{HealthProbe, Platform, ServerLauncher, VenvPaths};
use medalizer_setup::{HttpHealthProbe, SetupError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn dev_server(port: u16, attempts: u32) -> (Arc<RecordingRunner>, DevServer) {
    let runner = Arc::new(RecordingRunner::new());
    let server = DevServer::new(
        runner.clone(),
        Arc::new(HttpHealthProbe::new()),
        PathBuf::from("."),
        VenvPaths::resolve(Path::new("venv"), Platform::current()),
        "127.0.0.1",
        port,
    )
    .with_readiness(attempts, Duration::from_millis(10));
    (runner, server)
}

#[tokio::test]
async fn test_probe_accepts_healthy_endpoint() {
    let mock_server = MockServer::start();
    let health = mock_server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(r#"{"status":"healthy"}"#);
    });

    let probe = HttpHealthProbe::new();
    let url = Url::parse(&mock_server.url("/health")).unwrap();

    assert!(probe.is_ready(&url).await);
    health.assert();
}

#[tokio::test]
async fn test_probe_rejects_error_status() {
    let mock_server = MockServer::start();
    mock_server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(500);
    });

    let probe = HttpHealthProbe::new();
    let url = Url::parse(&mock_server.url("/health")).unwrap();
    assert!(!probe.is_ready(&url).await);
}

#[tokio::test]
async fn test_launch_reports_ready_once_health_answers() {
    let mock_server = MockServer::start();
    let health = mock_server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200).body(r#"{"status":"healthy"}"#);
    });

    let (runner, server) = dev_server(mock_server.port(), 5);

    let exit = server.launch_and_wait().await.unwrap();

    assert_eq!(exit, 0);
    assert_eq!(runner.launch_count(), 1);
    health.assert_hits(1);
}

#[tokio::test]
async fn test_launch_gives_up_on_never_healthy_server() {
    let mock_server = MockServer::start();
    let health = mock_server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(503);
    });

    let (runner, server) = dev_server(mock_server.port(), 3);

    let result = server.launch_and_wait().await;

    assert!(matches!(
        result,
        Err(SetupError::ServerNotReady { attempts: 3, .. })
    ));
    assert_eq!(runner.launch_count(), 1);
    health.assert_hits(3);
}
