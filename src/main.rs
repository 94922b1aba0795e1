use anyhow::Result;
use clap::Parser;
use dnac_interface_collector::collector::{collection_timestamp, CollectionRun};
use dnac_interface_collector::config::Config;
use dnac_interface_collector::dnac::DnacClient;
use dnac_interface_collector::error::CollectorError;
use dnac_interface_collector::index::ElasticsearchStore;
use dnac_interface_collector::runlog::RunLog;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit status for run log failures
const LOG_FAILURE_EXIT: i32 = 255;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Controller base URL (overrides config)
    #[arg(long, env = "DNAC_BASE_URL")]
    base_url: Option<String>,

    /// Controller API user (overrides config)
    #[arg(long, env = "DNAC_USERNAME")]
    username: Option<String>,

    /// Controller API password (overrides config)
    #[arg(long, env = "DNAC_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Elasticsearch URL (overrides config)
    #[arg(long, env = "DNAC_INDEX_URL")]
    index_url: Option<String>,

    /// Run log file, standard output when unset (overrides config)
    #[arg(long, env = "DNAC_LOG_FILE")]
    log_file: Option<String>,

    /// Run log threshold; only levels above it are written (overrides config)
    #[arg(long, env = "DNAC_LOG_THRESHOLD")]
    log_threshold: Option<u8>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting DNA Center interface collector v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration, CLI values taking precedence
    let config = Config::load_with_overrides(
        &args.config,
        &[
            ("dnac.base_url", args.base_url),
            ("dnac.username", args.username),
            ("dnac.password", args.password),
            ("index.url", args.index_url),
            ("log.path", args.log_file),
            ("log.threshold", args.log_threshold.map(|t| t.to_string())),
        ],
    )?;

    info!("Configuration loaded successfully");
    info!("Controller: {}", config.dnac.base_url);
    info!("Index: {}/{}", config.index.url, config.index.name);

    match collect(config).await {
        Ok(processed) => {
            println!("number of wired nodes: {}", processed);
            Ok(())
        }
        Err(e) if e.is_log_failure() => {
            println!("Exit(-1). {}", e);
            std::process::exit(LOG_FAILURE_EXIT);
        }
        Err(e) => {
            error!("Collection failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn collect(config: Config) -> Result<u64, CollectorError> {
    let mut log = RunLog::open(config.log.threshold, config.log.path.as_deref())?;
    let client = DnacClient::new(config.dnac)?;
    let store = ElasticsearchStore::new(config.index.clone())?;

    let collected_at = config.index.tag_timestamp.then(collection_timestamp);

    let summary = CollectionRun::new(&client, &store, &mut log)
        .legacy_last_updated(config.records.legacy_last_updated)
        .collected_at(collected_at)
        .run()
        .await?;

    log.close()?;
    Ok(summary.processed)
}
