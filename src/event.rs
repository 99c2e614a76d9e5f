//! Usage events reported to the instance.
//!
//! An event is a name plus optional attribution: a unique id (typically a
//! user or device), a creation timestamp and a type. The type routes the event
//! into its own keyspace on the instance, so statistics and flushes can be
//! scoped to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single usage event.
///
/// A bare name converts into an event with every optional field unset:
///
/// ```
/// use analytics_engine_client::event::Event;
///
/// let event: Event = "ping".into();
/// assert_eq!(event.name, "ping");
/// assert!(event.unique_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Name of the tracked usage, e.g. `"login"`
    pub name: String,

    /// Identifier the event is attributed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,

    /// Milliseconds since the Unix epoch; defaults to the send time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Keyspace the event is stored under
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl Event {
    /// Create a new event with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique_id: None,
            created_at: None,
            event_type: None,
        }
    }

    /// Attribute the event to an identifier.
    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Set the creation time in milliseconds since the Unix epoch.
    pub fn created_at(mut self, millis: i64) -> Self {
        self.created_at = Some(millis);
        self
    }

    /// Set the creation time from a timestamp.
    pub fn created_at_time(self, timestamp: DateTime<Utc>) -> Self {
        self.created_at(timestamp.timestamp_millis())
    }

    /// Set the event type.
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Build the request body, filling `createdAt` with `now` when unset.
    pub fn into_payload(self, now: DateTime<Utc>) -> Event {
        Event {
            created_at: Some(self.created_at.unwrap_or_else(|| now.timestamp_millis())),
            ..self
        }
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Event::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Event::new(name)
    }
}
