use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::config::CatalogConfig;
use crate::domain::DomainError;
use crate::ports::HttpClient;

/// HttpGateway is the single exit point for outbound HTTP.
/// In offline mode every request is refused; otherwise only hosts on the
/// allowlist (or their subdomains) may be contacted.
pub struct HttpGateway {
    client: Client,
    offline: bool,
    allowed_domains: Vec<String>,
}

impl HttpGateway {
    /// Build a gateway from the catalog settings.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, DomainError> {
        Self::try_with_config(
            config.offline,
            config.allowed_domains.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn try_with_config(
        offline: bool,
        allowed_domains: Vec<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(format!("Storefront/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            offline = offline,
            allowed_domains = ?allowed_domains,
            "HttpGateway initialized"
        );

        Ok(Self {
            client,
            offline,
            allowed_domains,
        })
    }

    /// Whether every request is refused.
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    fn is_url_allowed(&self, url: &str) -> Result<(), DomainError> {
        if self.offline {
            warn!(url = url, "Network request blocked: offline mode enabled");
            return Err(DomainError::NetworkBlocked {
                reason: "Offline mode is enabled. All network requests are blocked.".to_string(),
            });
        }

        let parsed = Url::parse(url).map_err(|e| DomainError::HttpRequest(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| DomainError::HttpRequest("Invalid URL: no host".to_string()))?;

        if !self
            .allowed_domains
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{}", d)))
        {
            warn!(url = url, host = host, "Network request blocked: domain not in allowlist");
            return Err(DomainError::NetworkBlocked {
                reason: format!("Domain '{}' is not in the allowed list", host),
            });
        }

        debug!(url = url, "Network request allowed");
        Ok(())
    }
}

#[async_trait]
impl HttpClient for HttpGateway {
    async fn post_json<T: Serialize + Send + Sync, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<R, DomainError> {
        self.is_url_allowed(url)?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::HttpRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::HttpRequest(format!(
                "HTTP {} for {}",
                status, url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::HttpRequest(e.to_string()))
    }
}
