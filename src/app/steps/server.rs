use crate::domain::model::{CommandSpec, VenvPaths};
use crate::domain::ports::{HealthProbe, ProcessRunner, ServerLauncher};
use crate::utils::error::{Result, SetupError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const DEFAULT_READY_ATTEMPTS: u32 = 20;
const DEFAULT_READY_DELAY: Duration = Duration::from_millis(500);

/// Launches the uvicorn development server with auto-reload, confirms it
/// answers its health endpoint, then stays in the foreground until the
/// server exits (or the operator interrupts it).
pub struct DevServer {
    runner: Arc<dyn ProcessRunner>,
    probe: Arc<dyn HealthProbe>,
    root: PathBuf,
    venv: VenvPaths,
    host: String,
    port: u16,
    ready_attempts: u32,
    ready_delay: Duration,
}

impl DevServer {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        probe: Arc<dyn HealthProbe>,
        root: PathBuf,
        venv: VenvPaths,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            runner,
            probe,
            root,
            venv,
            host: host.into(),
            port,
            ready_attempts: DEFAULT_READY_ATTEMPTS,
            ready_delay: DEFAULT_READY_DELAY,
        }
    }

    pub fn with_readiness(mut self, attempts: u32, delay: Duration) -> Self {
        self.ready_attempts = attempts;
        self.ready_delay = delay;
        self
    }

    fn command(&self) -> CommandSpec {
        let port = self.port.to_string();
        CommandSpec::new(self.venv.python.to_string_lossy(), &self.root)
            .args(["-m", "uvicorn", "app.main:app", "--reload"])
            .args(["--host", self.host.as_str()])
            .args(["--port", port.as_str()])
    }

    /// A wildcard bind address is not connectable; probe loopback instead.
    fn probe_host(&self) -> &str {
        match self.host.as_str() {
            "0.0.0.0" | "::" => "127.0.0.1",
            host => host,
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("http://{}:{}{}", self.probe_host(), self.port, path);
        Url::parse(&raw).map_err(|e| SetupError::ConfigError {
            message: format!("cannot build server URL {}: {}", raw, e),
        })
    }

    pub fn health_url(&self) -> Result<Url> {
        self.url("/health")
    }

    pub fn docs_url(&self) -> Result<Url> {
        self.url("/docs")
    }

    async fn wait_until_ready(&self) -> Result<()> {
        let url = self.health_url()?;
        for attempt in 1..=self.ready_attempts {
            if self.probe.is_ready(&url).await {
                tracing::debug!("Health check passed on attempt {}", attempt);
                return Ok(());
            }
            tokio::time::sleep(self.ready_delay).await;
        }

        Err(SetupError::ServerNotReady {
            url: url.to_string(),
            attempts: self.ready_attempts,
        })
    }
}

#[async_trait::async_trait]
impl ServerLauncher for DevServer {
    async fn launch_and_wait(&self) -> Result<i32> {
        let spec = self.command();
        tracing::info!(
            "🚀 Launching development server on {}:{} (auto-reload enabled)...",
            self.host,
            self.port
        );
        tracing::debug!("Running: {}", spec.display_line());

        let mut child = self.runner.launch(&spec).await?;

        if let Err(e) = self.wait_until_ready().await {
            // The child is useless if it never became healthy; reap it
            // before surfacing the readiness failure.
            let _ = child.kill().await;
            return Err(e);
        }

        tracing::info!("✅ Server ready at http://{}:{}", self.host, self.port);
        tracing::info!("📚 Interactive API docs: {}", self.docs_url()?);

        child.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{CallKind, RecordingRunner};
    use crate::domain::model::Platform;
    use std::path::Path;

    struct StaticProbe {
        ready: bool,
    }

    #[async_trait::async_trait]
    impl HealthProbe for StaticProbe {
        async fn is_ready(&self, _url: &Url) -> bool {
            self.ready
        }
    }

    fn dev_server(runner: Arc<RecordingRunner>, ready: bool) -> DevServer {
        DevServer::new(
            runner,
            Arc::new(StaticProbe { ready }),
            PathBuf::from("."),
            VenvPaths::resolve(Path::new("venv"), Platform::Unix),
            "0.0.0.0",
            8000,
        )
        .with_readiness(2, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_launches_uvicorn_and_waits_for_exit() {
        let runner = Arc::new(RecordingRunner::new());
        let server = dev_server(runner.clone(), true);

        let exit = server.launch_and_wait().await.unwrap();

        assert_eq!(exit, 0);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, CallKind::Launch);
        assert_eq!(
            runner.command_lines(),
            vec!["venv/bin/python -m uvicorn app.main:app --reload --host 0.0.0.0 --port 8000"]
        );
    }

    #[tokio::test]
    async fn test_wildcard_host_is_probed_on_loopback() {
        let runner = Arc::new(RecordingRunner::new());
        let server = dev_server(runner, true);

        assert_eq!(
            server.health_url().unwrap().as_str(),
            "http://127.0.0.1:8000/health"
        );
        assert_eq!(
            server.docs_url().unwrap().as_str(),
            "http://127.0.0.1:8000/docs"
        );
    }

    #[tokio::test]
    async fn test_never_ready_server_exhausts_attempts() {
        let runner = Arc::new(RecordingRunner::new());
        let server = dev_server(runner, false);

        let result = server.launch_and_wait().await;

        assert!(matches!(
            result,
            Err(SetupError::ServerNotReady { attempts: 2, .. })
        ));
    }
}
