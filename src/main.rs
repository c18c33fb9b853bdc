//! cs-soak - drives a content store with a synthetic forwarder workload
//!
//! Interleaves inserts and lookups over a rotating name space, with a share
//! of the content carrying ExpiryTime or RecommendedCacheTime, while the
//! background trim task runs. Prints the final statistics as JSON.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use icn_content_store::{
    spawn_trim_task, Config, ContentObject, ContentStore, MonotonicClock, Name, SharedContentStore,
    StoreError, TickClock,
};

const DEFAULT_ITERATIONS: u64 = 100_000;
const STATS_EVERY: u64 = 10_000;

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared content store
/// 4. Start the background trim task
/// 5. Run the workload until done or until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info", can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "icn_content_store=info,cs_soak=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::try_from_env().context("loading content store configuration")?;
    let iterations = soak_iterations()?;
    info!(
        capacity = config.capacity,
        trim_interval_ms = config.trim_interval_ms,
        tick_ms = config.tick_ms,
        iterations,
        "Configuration loaded"
    );

    let store: SharedContentStore<ContentObject> =
        Arc::new(RwLock::new(ContentStore::from_config(&config)));
    let clock = Arc::new(MonotonicClock::new(config.tick()));

    let trim_handle = spawn_trim_task(store.clone(), clock.clone(), config.trim_interval());
    info!("Background trim task started");

    tokio::select! {
        result = run_workload(store.clone(), clock, config.capacity, iterations) => {
            result?;
            info!("Workload finished");
        }
        _ = shutdown_signal() => {}
    }

    trim_handle.abort();
    warn!("Trim task aborted");

    let guard = store.read().await;
    guard.log_stats();
    println!(
        "{}",
        serde_json::to_string_pretty(&guard.stats()).context("serializing statistics")?
    );
    Ok(())
}

fn soak_iterations() -> anyhow::Result<u64> {
    match std::env::var("CS_SOAK_ITERATIONS") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("CS_SOAK_ITERATIONS={:?} is not a number", raw)),
        Err(_) => Ok(DEFAULT_ITERATIONS),
    }
}

/// Runs `iterations` rounds of one insert and one lookup each.
///
/// Names rotate over twice the capacity so the store keeps evicting. Every
/// third object expires shortly after insert, every fifth carries a
/// recommended cache time.
async fn run_workload<C: TickClock>(
    store: SharedContentStore<ContentObject>,
    clock: Arc<C>,
    capacity: usize,
    iterations: u64,
) -> anyhow::Result<()> {
    let span = (capacity.max(1) as u64) * 2;

    for i in 0..iterations {
        let now = clock.now();
        let name = Name::from_uri(&format!("/soak/item{}", i % span));

        let mut object = ContentObject::new(name, format!("content {}", i));
        if i % 3 == 0 {
            object = object.with_expiry_time(now + 50);
        }
        if i % 5 == 0 {
            object = object.with_recommended_cache_time(now + 20);
        }

        let lookup = Name::from_uri(&format!("/soak/item{}", (i * 7) % span));

        {
            let mut guard = store.write().await;
            match guard.insert(Arc::new(object), now) {
                Ok(()) | Err(StoreError::Expired { .. }) | Err(StoreError::PastRecommendedCacheTime { .. }) => {}
                Err(err) => return Err(err).context("inserting workload content"),
            }
            let _ = guard.serve(&lookup, now);

            if (i + 1) % STATS_EVERY == 0 {
                guard.log_stats();
            }
        }

        if i % 1000 == 0 {
            tokio::task::yield_now().await;
        }
    }

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping workload...");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping workload...");
        }
    }
}
