//! Query filters and endpoint URL construction.
//!
//! Filters are serialized into the query string field by field. Unset fields
//! are left out entirely rather than sent as empty values; set fields are
//! always sent, including `0`.

use url::Url;

/// Filter types that serialize into query parameters.
pub trait QueryParams {
    /// Name/value pairs for every field that is set, in a stable order.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Filters for statistics retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsQuery {
    /// How many days (or weeks, or months, per bucket) to aggregate; the
    /// instance uses 7 when unset
    pub lookback: Option<u32>,

    /// Only count events attributed to this identifier
    pub unique_id: Option<String>,

    /// Read from the keyspace of this event type
    pub event_type: Option<String>,
}

impl StatisticsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookback(mut self, lookback: u32) -> Self {
        self.lookback = Some(lookback);
        self
    }

    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }
}

impl QueryParams for StatisticsQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(lookback) = self.lookback {
            pairs.push(("lookback", lookback.to_string()));
        }
        if let Some(unique_id) = &self.unique_id {
            pairs.push(("uniqueId", unique_id.clone()));
        }
        if let Some(event_type) = &self.event_type {
            pairs.push(("type", event_type.clone()));
        }
        pairs
    }
}

/// Filter for flushing statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushFilter {
    /// Flush only the keyspace of this event type
    pub event_type: Option<String>,
}

impl FlushFilter {
    /// Flush a single event type.
    pub fn event_type(event_type: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
        }
    }
}

impl QueryParams for FlushFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.event_type
            .iter()
            .map(|event_type| ("type", event_type.clone()))
            .collect()
    }
}

/// Build `{base}/{path}` with the filter's query parameters appended.
///
/// `base` must be a validated instance URL. Any query or fragment on the base
/// is replaced; no `?` is emitted when there are no parameters.
pub fn endpoint_url(base: &Url, path: &str, params: Option<&dyn QueryParams>) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.set_query(None);

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
    }

    let pairs = params.map(|p| p.query_pairs()).unwrap_or_default();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    url
}
