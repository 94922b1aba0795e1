//! Interface Collection Pipeline
//!
//! One pass per invocation: authenticate, fetch the interface listing, keep the
//! physical ports and upsert one document per port.
//!
//! # Keys
//!
//! Documents are keyed `1..=K` in the order the controller listed the physical
//! interfaces. Keys are scoped to a run, so each run overwrites the previous run's
//! documents at the same keys.
//!
//! # Error Handling
//!
//! - Controller failures (transport, status, body) abort the run with an `Err`.
//! - A document the store refuses is logged and skipped; the run continues.
//! - Run log write failures abort the run with
//!   [`CollectorError::LogWrite`](crate::error::CollectorError::LogWrite).

use crate::dnac::types::Interface;
use crate::dnac::DnacClient;
use crate::error::Result;
use crate::index::{IndexStore, UpsertOutcome};
use crate::normalize::to_ascii;
use crate::runlog;
use crate::runlog::RunLog;
use serde::Serialize;
use tracing::{info, warn};

/// Run log level of the per-interface summary line
pub const INTERFACE_LEVEL: u8 = 2;
/// Run log level of store outcomes
pub const STORE_LEVEL: u8 = 3;

/// How far in the past the `collectedAt` stamp is placed, in milliseconds.
const COLLECTED_AT_OFFSET_MS: i64 = 60_000;

/// Indexed snapshot of one physical interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRecord {
    pub port_name: String,
    pub series: String,
    pub media_type: String,
    pub op_status: String,
    pub adm_status: String,
    pub last_updated: String,
    pub serial_no: String,
    pub ipv4_addr: String,
    pub pid: String,
    pub port_mode: String,
}

impl InterfaceRecord {
    /// Builds an ASCII record from a listing element.
    ///
    /// With `legacy_last_updated`, `lastUpdated` repeats the admin status the way
    /// earlier collectors filled it.
    pub fn from_interface(interface: &Interface, legacy_last_updated: bool) -> Self {
        let last_updated = if legacy_last_updated {
            &interface.admin_status
        } else {
            &interface.last_updated
        };

        Self {
            port_name: to_ascii(&interface.port_name),
            series: to_ascii(&interface.series),
            media_type: to_ascii(&interface.media_type),
            op_status: to_ascii(&interface.status),
            adm_status: to_ascii(&interface.admin_status),
            last_updated: to_ascii(last_updated),
            serial_no: to_ascii(&interface.serial_no),
            ipv4_addr: to_ascii(&interface.ipv4_address),
            pid: to_ascii(&interface.pid),
            port_mode: to_ascii(&interface.port_mode),
        }
    }
}

/// Body written to the store
#[derive(Debug, Serialize)]
pub struct IndexDocument<'a> {
    #[serde(flatten)]
    pub record: &'a InterfaceRecord,
    #[serde(rename = "collectedAt", skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<i64>,
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Physical interfaces seen, and the highest key used
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub failed: u64,
    /// Non-physical interfaces ignored
    pub skipped: u64,
}

/// Epoch milliseconds used for `collectedAt`, one minute before now.
pub fn collection_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis() - COLLECTED_AT_OFFSET_MS
}

/// State of one collection run
///
/// Built once per invocation and owned by the caller; nothing here is global.
pub struct CollectionRun<'a, S: IndexStore> {
    client: &'a DnacClient,
    store: &'a S,
    log: &'a mut RunLog,
    legacy_last_updated: bool,
    collected_at: Option<i64>,
    summary: RunSummary,
}

impl<'a, S: IndexStore> CollectionRun<'a, S> {
    pub fn new(client: &'a DnacClient, store: &'a S, log: &'a mut RunLog) -> Self {
        Self {
            client,
            store,
            log,
            legacy_last_updated: false,
            collected_at: None,
            summary: RunSummary::default(),
        }
    }

    pub fn legacy_last_updated(mut self, enabled: bool) -> Self {
        self.legacy_last_updated = enabled;
        self
    }

    /// Tags every document with `collectedAt`.
    pub fn collected_at(mut self, stamp: Option<i64>) -> Self {
        self.collected_at = stamp;
        self
    }

    /// Authenticates, fetches the listing and indexes it.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let token = self.client.authenticate().await?;
        let interfaces = self.client.fetch_interfaces(&token).await?;
        self.index_interfaces(&interfaces).await
    }

    /// Indexes the physical interfaces of `interfaces`, in order.
    pub async fn index_interfaces(&mut self, interfaces: &[Interface]) -> Result<RunSummary> {
        for interface in interfaces {
            if !interface.is_physical() {
                self.summary.skipped += 1;
                continue;
            }

            self.summary.processed += 1;
            let key = self.summary.processed;
            let record = InterfaceRecord::from_interface(interface, self.legacy_last_updated);

            runlog!(
                self.log,
                INTERFACE_LEVEL,
                "-- intf:",
                record.serial_no,
                record.port_name,
                record.media_type,
                record.op_status
            )?;

            let document = IndexDocument {
                record: &record,
                collected_at: self.collected_at,
            };

            let outcome = self.store.upsert(key, &document).await;
            match &outcome {
                UpsertOutcome::Created => self.summary.created += 1,
                UpsertOutcome::Updated => self.summary.updated += 1,
                UpsertOutcome::Failed(reason) => {
                    self.summary.failed += 1;
                    warn!("Document {} not indexed: {}", key, reason);
                    runlog!(self.log, STORE_LEVEL, "[es.write]", key, "es.index failed", reason)?;
                    continue;
                }
            }

            runlog!(
                self.log,
                STORE_LEVEL,
                "[es.index]",
                key,
                "creation. return code:",
                outcome.label().unwrap_or_default()
            )?;
        }

        info!(
            "Indexed {} physical interfaces ({} created, {} updated, {} failed, {} skipped)",
            self.summary.processed,
            self.summary.created,
            self.summary.updated,
            self.summary.failed,
            self.summary.skipped
        );

        Ok(self.summary)
    }
}
