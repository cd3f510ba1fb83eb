//! Event stream types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Event stream types a subscription can ask for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Check results for hosts and services
    CheckResult,
    /// Host/service state changes
    StateChange,
    /// Notifications including notified users
    Notification,
    AcknowledgementSet,
    AcknowledgementCleared,
    CommentAdded,
    CommentRemoved,
    DowntimeAdded,
    DowntimeRemoved,
    DowntimeTriggered,
    /// Any other name, sent as-is for the server to accept or reject
    Other(String),
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        EventType::CheckResult,
        EventType::StateChange,
        EventType::Notification,
        EventType::AcknowledgementSet,
        EventType::AcknowledgementCleared,
        EventType::CommentAdded,
        EventType::CommentRemoved,
        EventType::DowntimeAdded,
        EventType::DowntimeRemoved,
        EventType::DowntimeTriggered,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventType::CheckResult => "CheckResult",
            EventType::StateChange => "StateChange",
            EventType::Notification => "Notification",
            EventType::AcknowledgementSet => "AcknowledgementSet",
            EventType::AcknowledgementCleared => "AcknowledgementCleared",
            EventType::CommentAdded => "CommentAdded",
            EventType::CommentRemoved => "CommentRemoved",
            EventType::DowntimeAdded => "DowntimeAdded",
            EventType::DowntimeRemoved => "DowntimeRemoved",
            EventType::DowntimeTriggered => "DowntimeTriggered",
            EventType::Other(name) => name,
        }
    }
}

impl FromStr for EventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .cloned()
            .unwrap_or_else(|| EventType::Other(s.to_string())))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or(EventType::Other(name)))
    }
}

/// Body of a `/v1/events` subscription request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscribeRequest {
    pub types: Vec<EventType>,
    pub queue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

impl SubscribeRequest {
    pub fn new(types: impl IntoIterator<Item = EventType>, queue: impl Into<String>) -> Self {
        Self {
            types: types.into_iter().collect(),
            queue: queue.into(),
            filters: None,
        }
    }

    /// Only deliver events matching this filter expression
    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }
}

/// One event from the stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Unix timestamp with fractional seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Type-specific attributes (`check_result`, `state`, `author`, ...)
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
    /// The object exactly as the server sent it
    #[serde(skip)]
    raw: Value,
}

impl Event {
    /// Parse an event, keeping the original object for [`Event::raw`]
    pub fn from_value(raw: Value) -> serde_json::Result<Self> {
        let mut event: Event = serde_json::from_value(raw.clone())?;
        event.raw = raw;
        Ok(event)
    }

    /// Server object this event was parsed from; `Null` when not built by [`Event::from_value`]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_known_and_other_types() {
        assert_eq!(
            "DowntimeTriggered".parse::<EventType>().unwrap(),
            EventType::DowntimeTriggered
        );
        assert_eq!(
            "ObjectCreated".parse::<EventType>().unwrap(),
            EventType::Other("ObjectCreated".to_string())
        );
    }

    #[test]
    fn test_subscribe_body_omits_missing_filters() {
        let request = SubscribeRequest::new([EventType::CheckResult], "michi");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"types": ["CheckResult"], "queue": "michi"})
        );

        let request = SubscribeRequest::new(
            [EventType::StateChange, EventType::Other("Custom".into())],
            "michi",
        )
        .with_filters("event.check_result.exit_status==2");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "types": ["StateChange", "Custom"],
                "queue": "michi",
                "filters": "event.check_result.exit_status==2"
            })
        );
    }

    #[test]
    fn test_event_keeps_extra_attributes() {
        let raw = json!({
            "type": "CheckResult",
            "timestamp": 1446388806.123,
            "host": "web01",
            "service": "ping4",
            "check_result": {"exit_status": 2, "output": "PING CRITICAL"}
        });

        let event: Event = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(event.event_type, EventType::CheckResult);
        assert_eq!(event.host.as_deref(), Some("web01"));
        assert_eq!(event.attr("check_result").unwrap()["exit_status"], 2);
        assert_eq!(serde_json::to_value(&event).unwrap(), raw);
    }

    #[test]
    fn test_from_value_keeps_null_attributes() {
        let raw = json!({"type": "AcknowledgementCleared", "host": "web01", "service": null});
        let event = Event::from_value(raw.clone()).unwrap();
        assert_eq!(event.service, None);
        assert_eq!(event.raw(), &raw);
        assert_ne!(serde_json::to_value(&event).unwrap(), raw);
    }

    #[test]
    fn test_event_requires_type() {
        assert!(serde_json::from_value::<Event>(json!({"host": "web01"})).is_err());
        assert!(serde_json::from_value::<Event>(json!(["CheckResult"])).is_err());
    }
}
