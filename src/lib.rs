//! DNA Center Interface Collector
//!
//! Polls a Cisco DNA Center controller for the status of wired switch interfaces and
//! writes one document per physical port into an Elasticsearch index.
//!
//! # Overview
//!
//! The collector is a batch job meant to be started by an external scheduler (cron,
//! systemd timer). Each invocation authenticates, fetches the interface listing once,
//! indexes the physical ports and exits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   REST (HTTPS)    ┌──────────────┐
//! │ DNA Center  │ ◄───────────────► │  Collector   │
//! │ controller  │  token + listing  │              │
//! └─────────────┘                   │  ┌────────┐  │   PUT /{index}/_doc/{key}  ┌───────────────┐
//!                                   │  │Pipeline│  │ ─────────────────────────► │ Elasticsearch │
//!                                   │  └────────┘  │                            └───────────────┘
//!                                   │  ┌────────┐  │
//!                                   │  │Run log │  │ ──► file / stdout
//!                                   │  └────────┘  │
//!                                   └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`dnac`] - Controller client and API type definitions
//! - [`index`] - Index store abstraction and Elasticsearch implementation
//! - [`collector`] - Filter, normalize and upsert pipeline
//! - [`normalize`] - ASCII normalization of controller text
//! - [`runlog`] - Leveled run log
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use dnac_interface_collector::collector::CollectionRun;
//! use dnac_interface_collector::config::Config;
//! use dnac_interface_collector::dnac::DnacClient;
//! use dnac_interface_collector::index::ElasticsearchStore;
//! use dnac_interface_collector::runlog::RunLog;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     let client = DnacClient::new(config.dnac.clone())?;
//!     let store = ElasticsearchStore::new(config.index.clone())?;
//!     let mut log = RunLog::open(config.log.threshold, config.log.path.as_deref())?;
//!
//!     let summary = CollectionRun::new(&client, &store, &mut log).run().await?;
//!     println!("number of wired nodes: {}", summary.processed);
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod config;
pub mod dnac;
pub mod error;
pub mod index;
pub mod normalize;
pub mod runlog;
