//! Report Usage - end-to-end walkthrough against a running Analytics Engine
//!
//! Records a couple of events, prints the aggregated statistics and the
//! instance's resource metrics.
//!
//! ## Configuration
//!
//! - `ANALYTICS_ENGINE_URL`: Instance URL (default: http://localhost:8080)
//! - `ANALYTICS_ENGINE_AUTH`: Authorization credential (required)
//! - `RUST_LOG`: Logging level filter (default: info)
//!
//! Run with `cargo run --example report_usage`.

use std::env;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use analytics_engine_client::{
    AnalyticsClient, ClientConfig, Event, Granularity, StatisticsQuery,
};

/// Default instance URL
const DEFAULT_INSTANCE_URL: &str = "http://localhost:8080";

#[tokio::main]
async fn main() {
    init_tracing();

    let instance_url =
        env::var("ANALYTICS_ENGINE_URL").unwrap_or_else(|_| DEFAULT_INSTANCE_URL.to_string());
    let authorization = env::var("ANALYTICS_ENGINE_AUTH").unwrap_or_default();

    if let Err(e) = run(ClientConfig::new(authorization, instance_url)).await {
        error!(error = %e, "Report failed");
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig) -> Result<(), analytics_engine_client::Error> {
    let client = AnalyticsClient::connect(config).await?;
    info!(instance_url = %client.instance_url(), "Connected to Analytics Engine");

    client.record_event("demo_started").await?;
    client
        .record_event(Event::new("login").unique_id("demo-user"))
        .await?;
    info!("Events recorded");

    let statistics = client
        .get_statistics::<String>(Some(&StatisticsQuery::new().lookback(7)))
        .await?;
    info!(
        daily_total = statistics.global.total(Granularity::Daily),
        weekly_total = statistics.global.total(Granularity::Weekly),
        monthly_total = statistics.global.total(Granularity::Monthly),
        "Global statistics"
    );
    for (name, bucket) in &statistics.usages {
        info!(
            usage = %name,
            daily_total = bucket.total(Granularity::Daily),
            "Usage statistics"
        );
    }

    let stats = client.get_stats().await?;
    info!(
        total_keys = stats.total_keys,
        cpu_usage = stats.cpu_usage,
        ram_usage = %stats.ram_usage,
        system_uptime = %stats.system_uptime,
        routine_count = stats.routine_count,
        "Instance stats"
    );

    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}
