use crate::domain::ports::HealthProbe;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Single-attempt HTTP readiness probe. Connection errors, timeouts and
/// non-success statuses all mean the server is not ready yet.
pub struct HttpHealthProbe {
    client: Client,
}

impl HttpHealthProbe {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn is_ready(&self, url: &Url) -> bool {
        match self.client.get(url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health probe not ready yet: {}", e);
                false
            }
        }
    }
}
