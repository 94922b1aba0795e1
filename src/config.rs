use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dnac: DnacConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub records: RecordsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DnacConfig {
    /// Controller base URL, e.g. `https://dnac.example.net`
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_token_header")]
    pub token_header: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,
    #[serde(default = "default_index_name")]
    pub name: String,
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub tag_timestamp: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Run log file; standard output when unset
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RecordsConfig {
    /// Fill `lastUpdated` from `adminStatus` as older collectors did
    #[serde(default)]
    pub legacy_last_updated: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            name: default_index_name(),
            doc_type: default_doc_type(),
            timeout_seconds: default_timeout(),
            tag_timestamp: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: None,
            threshold: default_threshold(),
        }
    }
}

fn default_verify_ssl() -> bool {
    false
}

fn default_timeout() -> u64 {
    30
}

fn default_token_header() -> String {
    "x-auth-token".to_string()
}

fn default_index_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_index_name() -> String {
    "dnac-interfaces".to_string()
}

fn default_doc_type() -> String {
    "_doc".to_string()
}

fn default_threshold() -> u8 {
    2
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_overrides(path, &[])
    }

    /// Loads the file and environment layers, then applies `overrides` (dotted keys such as
    /// `dnac.base_url`). `None` values leave the layered value in place.
    pub fn load_with_overrides(path: &str, overrides: &[(&str, Option<String>)]) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("DNAC_COLLECTOR").separator("__"));

        for (key, value) in overrides {
            builder = builder
                .set_override_option(*key, value.clone())
                .with_context(|| format!("Invalid override for {}", key))?;
        }

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
