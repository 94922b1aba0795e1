//! DNA Center REST Client
//!
//! Two calls per run, awaited one after the other:
//!
//! 1. `POST {base_url}/dna/system/api/v1/auth/token` with HTTP Basic credentials,
//!    answered by `{"Token": "..."}`.
//! 2. `GET {base_url}/dna/intent/api/v1/interface` with the token in the
//!    `x-auth-token` header, answered by `{"response": [...]}`.
//!
//! Controllers are commonly deployed with self-signed certificates, so certificate
//! validation follows `verify_ssl` (off by default). Requests time out after
//! `timeout_seconds`.
//!
//! The listing is not paginated: whatever the controller returns in one response is
//! the whole result set.
//!
//! # Example
//!
//! ```no_run
//! use dnac_interface_collector::config::DnacConfig;
//! use dnac_interface_collector::dnac::DnacClient;
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = DnacConfig {
//!     base_url: "https://dnac.example.net".to_string(),
//!     username: "admin".to_string(),
//!     password: SecretString::from("secret"),
//!     verify_ssl: false,
//!     timeout_seconds: 30,
//!     token_header: "x-auth-token".to_string(),
//! };
//!
//! let client = DnacClient::new(config)?;
//! let token = client.authenticate().await?;
//! let interfaces = client.fetch_interfaces(&token).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::DnacConfig;
use crate::dnac::types::{AuthResponse, Interface, InterfaceListResponse};
use crate::error::{CollectorError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, info};

pub const AUTH_PATH: &str = "/dna/system/api/v1/auth/token";
pub const INTERFACE_PATH: &str = "/dna/intent/api/v1/interface";

/// Builds the `Authorization` value for HTTP Basic authentication.
///
/// ```
/// use dnac_interface_collector::dnac::client::basic_auth_header;
///
/// assert_eq!(basic_auth_header("admin", "secret"), "Basic YWRtaW46c2VjcmV0");
/// ```
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

/// Client for the controller REST API
pub struct DnacClient {
    config: DnacConfig,
    http: reqwest::Client,
}

impl DnacClient {
    pub fn new(config: DnacConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Exchanges the configured credentials for a bearer token.
    ///
    /// Fails with [`CollectorError::Auth`] on a rejected login or a response without a
    /// usable `Token` (absent, or empty after ASCII normalization), so no request is ever
    /// made with an empty token.
    pub async fn authenticate(&self) -> Result<SecretString> {
        let url = self.url(AUTH_PATH);
        debug!("Requesting token from {}", url);

        let response = self
            .http
            .post(&url)
            .header(
                AUTHORIZATION,
                basic_auth_header(&self.config.username, self.config.password.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/json")
            .body("")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CollectorError::Auth(format!("{}: {}", status, text)));
        }

        let body = response.text().await?;
        let auth: AuthResponse = serde_json::from_str(&body)?;
        let token = auth.into_token()?;

        info!("Obtained controller token for {}", self.config.username);
        Ok(SecretString::from(token))
    }

    /// Fetches the complete interface listing in one request.
    pub async fn fetch_interfaces(&self, token: &SecretString) -> Result<Vec<Interface>> {
        let url = self.url(INTERFACE_PATH);
        debug!("Fetching interfaces from {}", url);

        let response = self
            .http
            .get(&url)
            .header(self.config.token_header.as_str(), token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CollectorError::DnacApi(format!("{}: {}", status, text)));
        }

        let body = response.text().await?;
        let listing: InterfaceListResponse = serde_json::from_str(&body)?;

        info!("Fetched {} interfaces", listing.response.len());
        Ok(listing.response)
    }
}
