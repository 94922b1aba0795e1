//! Collection pipeline tests
//!
//! Runs the filter/normalize/upsert pass against an in-memory store.

use async_trait::async_trait;
use dnac_interface_collector::collector::{CollectionRun, InterfaceRecord, RunSummary};
use dnac_interface_collector::config::DnacConfig;
use dnac_interface_collector::dnac::types::Interface;
use dnac_interface_collector::dnac::DnacClient;
use dnac_interface_collector::index::{IndexStore, UpsertOutcome};
use dnac_interface_collector::runlog::RunLog;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Mutex;
use tempfile::tempdir;

/// Store that records every write and can refuse chosen keys
#[derive(Default)]
struct MemoryStore {
    writes: Mutex<Vec<(u64, Value)>>,
    existing: HashSet<u64>,
    refused: HashSet<u64>,
}

#[async_trait]
impl IndexStore for MemoryStore {
    async fn upsert<D>(&self, key: u64, document: &D) -> UpsertOutcome
    where
        D: Serialize + Sync,
    {
        if self.refused.contains(&key) {
            return UpsertOutcome::Failed("index_not_found_exception".to_string());
        }
        let body = serde_json::to_value(document).expect("document serializes");
        self.writes.lock().unwrap().push((key, body));
        if self.existing.contains(&key) {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        }
    }
}

/// Client that is never called by `index_interfaces`
fn create_test_client() -> DnacClient {
    DnacClient::new(DnacConfig {
        base_url: "https://127.0.0.1:9".to_string(),
        username: "admin".to_string(),
        password: SecretString::from("secret"),
        verify_ssl: false,
        timeout_seconds: 1,
        token_header: "x-auth-token".to_string(),
    })
    .expect("Failed to build client")
}

fn interfaces(value: Value) -> Vec<Interface> {
    serde_json::from_value(value).expect("Failed to parse interfaces")
}

#[tokio::test]
async fn test_only_physical_interfaces_are_indexed() {
    // Given: One physical and one virtual interface
    let client = create_test_client();
    let store = MemoryStore::default();
    let mut log = RunLog::stdout(10);
    let listing = interfaces(json!([
        {"interfaceType": "Physical", "portName": "Gi1/0/1", "serialNo": "FOC1"},
        {"interfaceType": "Virtual", "portName": "Vlan1"}
    ]));

    // When: Indexing the listing
    let summary = CollectionRun::new(&client, &store, &mut log)
        .index_interfaces(&listing)
        .await
        .unwrap();

    // Then: Exactly one document is written under key 1
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    let writes = store.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, 1);
    assert_eq!(writes[0].1["portName"], "Gi1/0/1");
}

#[tokio::test]
async fn test_keys_follow_listing_order() {
    // Given: Physical interfaces interleaved with other types
    let client = create_test_client();
    let store = MemoryStore::default();
    let mut log = RunLog::stdout(10);
    let listing = interfaces(json!([
        {"interfaceType": "Loopback", "portName": "Lo0"},
        {"interfaceType": "Physical", "portName": "Gi1/0/1"},
        {"interfaceType": "Virtual", "portName": "Vlan10"},
        {"interfaceType": "Physical", "portName": "Gi1/0/2"},
        {"interfaceType": "Physical", "portName": "Te1/1/1"}
    ]));

    // When: Indexing the listing
    let summary = CollectionRun::new(&client, &store, &mut log)
        .index_interfaces(&listing)
        .await
        .unwrap();

    // Then: Keys are 1..=3 in listing order
    let writes = store.writes.lock().unwrap();
    let written: Vec<(u64, &str)> = writes
        .iter()
        .map(|(k, v)| (*k, v["portName"].as_str().unwrap()))
        .collect();
    assert_eq!(written, vec![(1, "Gi1/0/1"), (2, "Gi1/0/2"), (3, "Te1/1/1")]);
    assert_eq!(
        summary,
        RunSummary {
            processed: 3,
            created: 3,
            updated: 0,
            failed: 0,
            skipped: 2
        }
    );
}

#[tokio::test]
async fn test_refused_write_does_not_stop_the_run() {
    // Given: A store that refuses key 2 and already holds key 3
    let client = create_test_client();
    let store = MemoryStore {
        refused: HashSet::from([2]),
        existing: HashSet::from([3]),
        ..Default::default()
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.log");
    let mut log = RunLog::open(2, Some(path.to_str().unwrap())).unwrap();
    let listing = interfaces(json!([
        {"interfaceType": "Physical", "portName": "Gi1/0/1"},
        {"interfaceType": "Physical", "portName": "Gi1/0/2"},
        {"interfaceType": "Physical", "portName": "Gi1/0/3"}
    ]));

    // When: Indexing the listing
    let summary = CollectionRun::new(&client, &store, &mut log)
        .index_interfaces(&listing)
        .await
        .unwrap();
    log.close().unwrap();

    // Then: Every physical interface is counted and the failure is logged
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 1);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "only level 3 store lines pass threshold 2");
    assert!(lines[0].ends_with("[es.index] 1 creation. return code: created"));
    assert!(lines[1].contains("[es.write] 2 es.index failed index_not_found_exception"));
    assert!(lines[2].ends_with("[es.index] 3 creation. return code: updated"));
}

#[tokio::test]
async fn test_interface_summary_line_is_logged() {
    // Given: A run log that accepts level 2
    let client = create_test_client();
    let store = MemoryStore::default();
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.log");
    let mut log = RunLog::open(1, Some(path.to_str().unwrap())).unwrap();
    let listing = interfaces(json!([{
        "interfaceType": "Physical",
        "portName": "Gi1/0/1",
        "serialNo": "FOC2145X0AB",
        "mediaType": "10/100/1000BaseTX",
        "status": "up"
    }]));

    // When: Indexing the listing
    CollectionRun::new(&client, &store, &mut log)
        .index_interfaces(&listing)
        .await
        .unwrap();
    log.close().unwrap();

    // Then: The summary line precedes the store outcome
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("-- intf: FOC2145X0AB Gi1/0/1 10/100/1000BaseTX up"));
}

#[tokio::test]
async fn test_document_fields_are_normalized() {
    // Given: An interface with non-ASCII text
    let client = create_test_client();
    let store = MemoryStore::default();
    let mut log = RunLog::stdout(10);
    let listing = interfaces(json!([{
        "interfaceType": "Physical",
        "portName": "Gi1/0/1",
        "series": "Catalyst Série 9300",
        "adminStatus": "UP",
        "lastUpdated": "2026-10-18"
    }]));

    // When: Indexing the listing
    CollectionRun::new(&client, &store, &mut log)
        .index_interfaces(&listing)
        .await
        .unwrap();

    // Then: The document has the ten ASCII fields and no timestamp
    let writes = store.writes.lock().unwrap();
    let doc = writes[0].1.as_object().unwrap();
    assert_eq!(doc.len(), 10);
    assert_eq!(doc["series"], "Catalyst Serie 9300");
    assert_eq!(doc["admStatus"], "UP");
    assert_eq!(doc["lastUpdated"], "2026-10-18");
    assert_eq!(doc["ipv4Addr"], "");
}

#[tokio::test]
async fn test_legacy_last_updated_copies_admin_status() {
    let client = create_test_client();
    let store = MemoryStore::default();
    let mut log = RunLog::stdout(10);
    let listing = interfaces(json!([{
        "interfaceType": "Physical",
        "adminStatus": "DOWN",
        "lastUpdated": "2026-10-18"
    }]));

    CollectionRun::new(&client, &store, &mut log)
        .legacy_last_updated(true)
        .index_interfaces(&listing)
        .await
        .unwrap();

    let writes = store.writes.lock().unwrap();
    assert_eq!(writes[0].1["lastUpdated"], "DOWN");
}

#[tokio::test]
async fn test_collected_at_is_added_when_set() {
    let client = create_test_client();
    let store = MemoryStore::default();
    let mut log = RunLog::stdout(10);
    let listing = interfaces(json!([{"interfaceType": "Physical"}]));

    CollectionRun::new(&client, &store, &mut log)
        .collected_at(Some(1_760_000_000_000))
        .index_interfaces(&listing)
        .await
        .unwrap();

    let writes = store.writes.lock().unwrap();
    assert_eq!(writes[0].1["collectedAt"], 1_760_000_000_000i64);
}

#[test]
fn test_record_from_interface() {
    let interface = Interface {
        interface_type: "Physical".to_string(),
        port_name: "Gi1/0/1".to_string(),
        status: "down".to_string(),
        ipv4_address: "10.0.0.1".to_string(),
        ..Default::default()
    };

    let record = InterfaceRecord::from_interface(&interface, false);
    assert_eq!(record.op_status, "down");
    assert_eq!(record.ipv4_addr, "10.0.0.1");
    assert_eq!(record.port_mode, "");
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_log_write_failure_aborts_the_run() {
    // Given: A run log whose destination rejects writes
    let client = create_test_client();
    let store = MemoryStore::default();
    let mut log = RunLog::open(0, Some("/dev/full")).expect("/dev/full opens");
    let listing = interfaces(json!([
        {"interfaceType": "Physical", "portName": "Gi1/0/1"},
        {"interfaceType": "Physical", "portName": "Gi1/0/2"}
    ]));

    // When: Indexing the listing
    let result = CollectionRun::new(&client, &store, &mut log)
        .index_interfaces(&listing)
        .await;

    // Then: The run stops at the first line with a fatal log error
    let err = result.expect_err("log failure must abort the run");
    assert!(err.is_log_failure());
    assert!(store.writes.lock().unwrap().is_empty());
}
