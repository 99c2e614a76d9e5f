//! Analytics Engine Client Library
//!
//! Async client for an Analytics Engine instance: record usage events, read
//! aggregated daily/weekly/monthly statistics, flush them, and read the
//! instance's resource metrics.
//!
//! - **config**: Connection settings and their validation
//! - **client**: The HTTP client, one method per endpoint
//! - **envelope**: The `{status, data | error}` response wrapper and its normalization
//! - **event**: Usage events and their wire payload
//! - **query**: Statistics and flush filters, endpoint URL construction
//! - **models**: Statistics and resource metric response types
//! - **error**: Errors returned by operations
//!
//! # Example
//!
//! ```no_run
//! use analytics_engine_client::{AnalyticsClient, ClientConfig, FlushFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), analytics_engine_client::Error> {
//!     // Validates the config and probes the instance before returning
//!     let client = AnalyticsClient::connect(ClientConfig::new(
//!         "secret",
//!         "https://analytics.example.com",
//!     ))
//!     .await?;
//!
//!     client.record_event("app_open").await?;
//!
//!     let stats = client.get_stats().await?;
//!     println!("{} keys, {} uptime", stats.total_keys, stats.system_uptime);
//!
//!     client.flush_statistics(Some(&FlushFilter::event_type("web"))).await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod models;
pub mod query;

// Re-export commonly used types at crate root for convenience
pub use client::AnalyticsClient;
pub use config::{ClientConfig, ConfigError};
pub use envelope::Envelope;
pub use error::{Error, RequestError};
pub use event::Event;
pub use models::{AnalyticsResult, Granularity, RawServiceStats, ServiceStats, TimeSeriesBucket};
pub use query::{FlushFilter, QueryParams, StatisticsQuery};
