//! HTTP client for an Analytics Engine instance.
//!
//! `AnalyticsClient` validates its configuration and probes the instance
//! before it hands out a client, then exposes one method per endpoint. Each
//! method performs exactly one HTTP exchange and runs the response through
//! the shared envelope normalization.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{ClientConfig, ConfigError};
use crate::envelope::read_envelope;
use crate::error::RequestError;
use crate::event::Event;
use crate::models::{AnalyticsResult, RawServiceStats, ServiceStats};
use crate::query::{endpoint_url, FlushFilter, QueryParams, StatisticsQuery};

/// How long idle pooled connections are kept.
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Maximum idle connections kept per host.
const POOL_MAX_IDLE_PER_HOST: usize = 10;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for recording events and reading statistics.
///
/// The client holds only read-only state and is cheap to clone; clones share
/// the underlying connection pool. Concurrent calls are independent.
///
/// # Example
///
/// ```no_run
/// use analytics_engine_client::{AnalyticsClient, ClientConfig, Event, StatisticsQuery};
///
/// #[tokio::main]
/// async fn main() -> Result<(), analytics_engine_client::Error> {
///     let config = ClientConfig::new("secret", "https://analytics.example.com");
///     let client = AnalyticsClient::connect(config).await?;
///
///     client.record_event("app_open").await?;
///     client.record_event(Event::new("login").unique_id("user-42")).await?;
///
///     let stats = client
///         .get_statistics::<String>(Some(&StatisticsQuery::new().lookback(30)))
///         .await?;
///     println!("{} usage keys", stats.usages.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    /// The underlying HTTP client (reused for connection pooling)
    client: Client,

    /// Validated base URL of the instance
    base_url: Url,

    /// Headers sent with every operation
    headers: HeaderMap,
}

impl AnalyticsClient {
    /// Validate the config, probe the instance and return a ready client.
    ///
    /// The probe is a plain `GET` of the instance URL. This method does not
    /// return until it has completed, so a returned client always points at
    /// an instance that answered.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - the authorization or instance URL is empty
    /// - the instance URL is not an absolute URL with a host
    /// - the probe fails or answers with a non-200 status
    /// - the probe answers with an error payload
    pub async fn connect(config: ClientConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Self::connect_with(config, client).await
    }

    /// Like [`connect`](Self::connect), using a caller-supplied HTTP client.
    ///
    /// Use this to apply timeouts, proxies or TLS settings.
    pub async fn connect_with(config: ClientConfig, client: Client) -> Result<Self, ConfigError> {
        let analytics = Self::assemble(&config, client)?;
        analytics.probe().await?;

        debug!(instance_url = %analytics.base_url, "Analytics Engine instance verified");
        Ok(analytics)
    }

    /// Build a client from a validated config without probing.
    fn assemble(config: &ClientConfig, client: Client) -> Result<Self, ConfigError> {
        let base_url = config.validate()?;

        let authorization = HeaderValue::from_str(config.authorization())
            .map_err(|e| ConfigError::InvalidAuthorization(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    /// Check that the instance answers with a 200 and no error payload.
    async fn probe(&self) -> Result<(), ConfigError> {
        let url = self.base_url.as_str();

        let response = self.client.get(self.base_url.clone()).send().await.map_err(|e| {
            debug!(instance_url = %url, error = %e, "Instance probe failed");
            ConfigError::Unreachable {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(instance_url = %url, status = %status, "Instance probe returned non-200 status");
            return Err(ConfigError::Unreachable {
                url: url.to_string(),
                reason: format!("status {}", status),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            debug!(instance_url = %url, error = %e, "Instance probe body could not be read");
            ConfigError::Unreachable {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        // A 200 body is not required to be JSON; only an error payload fails the probe.
        if let Ok(ProbeBody {
            error: Some(Value::String(message)),
        }) = serde_json::from_slice::<ProbeBody>(&body)
        {
            debug!(instance_url = %url, error = %message, "Instance probe reported an error");
            return Err(ConfigError::Instance(message));
        }

        Ok(())
    }

    /// Record a usage event.
    ///
    /// Accepts an [`Event`] or a bare name. `createdAt` is set to the current
    /// time when the event does not carry one.
    ///
    /// Returns `true` when the instance acknowledged the event.
    pub async fn record_event(&self, event: impl Into<Event>) -> Result<bool, RequestError> {
        let payload = event.into().into_payload(Utc::now());

        let url = endpoint_url(&self.base_url, "event", None);
        debug!(url = %url, name = %payload.name, "Recording event");

        let outcome = self
            .request(Method::POST, url)
            .json(&payload)
            .send()
            .await;

        let acknowledgement: Value = read_envelope(outcome).await?;
        Ok(!acknowledgement.is_null())
    }

    /// Fetch aggregated statistics.
    ///
    /// `K` is the usage key type; use `String` unless the set of event names
    /// is known up front.
    pub async fn get_statistics<K>(
        &self,
        query: Option<&StatisticsQuery>,
    ) -> Result<AnalyticsResult<K>, RequestError>
    where
        K: Ord + DeserializeOwned,
    {
        let url = endpoint_url(
            &self.base_url,
            "analytics",
            query.map(|q| q as &dyn QueryParams),
        );
        self.send(Method::GET, url).await
    }

    /// Delete recorded statistics, optionally for a single event type.
    ///
    /// Returns `true` when the instance acknowledged the flush.
    pub async fn flush_statistics(&self, filter: Option<&FlushFilter>) -> Result<bool, RequestError> {
        let url = endpoint_url(
            &self.base_url,
            "analytics",
            filter.map(|f| f as &dyn QueryParams),
        );
        let acknowledgement: Value = self.send(Method::DELETE, url).await?;
        Ok(!acknowledgement.is_null())
    }

    /// Fetch resource metrics of the instance.
    pub async fn get_stats(&self) -> Result<ServiceStats, RequestError> {
        let url = endpoint_url(&self.base_url, "stats", None);
        let raw: RawServiceStats = self.send(Method::GET, url).await?;
        Ok(raw.into())
    }

    /// Base URL of the instance this client talks to.
    pub fn instance_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a body-less request and normalize its response.
    async fn send<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T, RequestError> {
        debug!(method = %method, url = %url, "Sending request");
        let outcome = self.request(method, url).send().await;
        read_envelope(outcome).await
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.headers.clone())
    }
}

/// The only part of a probe response that matters.
#[derive(Debug, Deserialize)]
struct ProbeBody {
    #[serde(default)]
    error: Option<Value>,
}
