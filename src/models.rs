//! Response models: aggregated statistics and service resource metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bucket granularity of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Keyed by `YYYY-MM-DD`
    Daily,
    /// Keyed by the `YYYY-MM-DD` of the week's first day
    Weekly,
    /// Keyed by `YYYY-MM`
    Monthly,
}

impl Granularity {
    pub fn all() -> &'static [Granularity] {
        &[Granularity::Daily, Granularity::Weekly, Granularity::Monthly]
    }
}

/// Event counts per daily, weekly and monthly bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesBucket {
    #[serde(default)]
    pub daily: BTreeMap<String, u64>,

    #[serde(default)]
    pub weekly: BTreeMap<String, u64>,

    #[serde(default)]
    pub monthly: BTreeMap<String, u64>,
}

impl TimeSeriesBucket {
    /// The series for one granularity.
    pub fn series(&self, granularity: Granularity) -> &BTreeMap<String, u64> {
        match granularity {
            Granularity::Daily => &self.daily,
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
        }
    }

    /// Sum of all buckets of one granularity.
    pub fn total(&self, granularity: Granularity) -> u64 {
        self.series(granularity).values().sum()
    }
}

/// Aggregated statistics: a global series plus one series per usage key.
///
/// Usage keys are whatever names events were recorded with. `K` defaults to
/// `String`; any ordered, deserializable key type works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Ord + Serialize",
    deserialize = "K: Ord + Deserialize<'de>"
))]
pub struct AnalyticsResult<K = String> {
    pub global: TimeSeriesBucket,

    #[serde(default)]
    pub usages: BTreeMap<K, TimeSeriesBucket>,
}

impl<K: Ord> AnalyticsResult<K> {
    /// The series recorded for one usage key.
    pub fn usage<Q>(&self, key: &Q) -> Option<&TimeSeriesBucket>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.usages.get(key)
    }
}

/// Resource metrics as the instance sends them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawServiceStats {
    pub total_redis_keys: u64,
    pub cpu_usage: f64,
    pub ram_usage: String,
    pub ram_usage_bytes: u64,
    pub system_uptime: String,
    #[serde(default)]
    pub system_uptime_seconds: Option<u64>,
    pub go_routines: u64,
}

/// Resource metrics of the instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    /// Number of keys held by the backing store
    pub total_keys: u64,

    /// CPU usage in percent
    pub cpu_usage: f64,

    /// Memory usage, human readable (e.g. `"10.00MB"`)
    pub ram_usage: String,

    pub ram_usage_bytes: u64,

    /// Process uptime, human readable
    pub system_uptime: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_uptime_seconds: Option<u64>,

    /// Concurrency units reported by the instance runtime
    #[serde(rename = "goRoutimeCount")]
    pub routine_count: u64,
}

impl From<RawServiceStats> for ServiceStats {
    fn from(raw: RawServiceStats) -> Self {
        Self {
            total_keys: raw.total_redis_keys,
            cpu_usage: raw.cpu_usage,
            ram_usage: raw.ram_usage,
            ram_usage_bytes: raw.ram_usage_bytes,
            system_uptime: raw.system_uptime,
            system_uptime_seconds: raw.system_uptime_seconds,
            routine_count: raw.go_routines,
        }
    }
}
