//! Index Store
//!
//! Documents are upserted by key into a named index. The store reports whether a write
//! created a new document or replaced an existing one; anything else is a per-document
//! failure that the caller logs and moves past.
//!
//! [`ElasticsearchStore`] speaks the Elasticsearch document API:
//!
//! ```text
//! PUT {url}/{index}/{doc_type}/{key}
//! → {"_id": "1", "result": "created", ...}
//! ```

use crate::config::IndexConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Outcome of a single upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    /// The document was not written; the reason is for logging only
    Failed(String),
}

impl UpsertOutcome {
    /// Store result label (`created` / `updated`), `None` for failures.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            UpsertOutcome::Created => Some("created"),
            UpsertOutcome::Updated => Some("updated"),
            UpsertOutcome::Failed(_) => None,
        }
    }
}

/// A document store addressed by integer key
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn upsert<D>(&self, key: u64, document: &D) -> UpsertOutcome
    where
        D: Serialize + Sync;
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    #[serde(default)]
    result: Option<String>,
}

/// Elasticsearch (or OpenSearch) index over HTTP
pub struct ElasticsearchStore {
    config: IndexConfig,
    http: reqwest::Client,
}

impl ElasticsearchStore {
    pub fn new(config: IndexConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, http })
    }

    pub fn document_url(&self, key: u64) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.url.trim_end_matches('/'),
            self.config.name,
            self.config.doc_type,
            key
        )
    }
}

#[async_trait]
impl IndexStore for ElasticsearchStore {
    async fn upsert<D>(&self, key: u64, document: &D) -> UpsertOutcome
    where
        D: Serialize + Sync,
    {
        let url = self.document_url(key);
        debug!("Indexing document {}", url);

        let response = match self.http.put(&url).json(document).send().await {
            Ok(response) => response,
            Err(e) => return UpsertOutcome::Failed(format!("request failed: {}", e)),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return UpsertOutcome::Failed(format!("{} not found", self.config.name));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return UpsertOutcome::Failed(format!("{}: {}", status, text));
        }

        match response.json::<WriteResponse>().await {
            Ok(body) => match body.result.as_deref() {
                Some("created") => UpsertOutcome::Created,
                Some("updated") => UpsertOutcome::Updated,
                Some(other) => UpsertOutcome::Failed(format!("unexpected result {}", other)),
                None => UpsertOutcome::Failed("response has no result".to_string()),
            },
            Err(e) => UpsertOutcome::Failed(format!("unreadable response: {}", e)),
        }
    }
}
