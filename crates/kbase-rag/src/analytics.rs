//! Fire-and-forget analytics events.
//!
//! Events are buffered in memory and written to the `analytics` tracing
//! target. Raw queries are never recorded, only their xxhash64.
use std::hash::Hasher;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::info;
use twox_hash::XxHash64;

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub event: String,
    pub properties: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct AnalyticsTracker {
    events: Mutex<Vec<AnalyticsEvent>>,
}

pub fn hash_query(query: &str) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(query.as_bytes());
    format!("{:016x}", hasher.finish())
}

impl AnalyticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<AnalyticsEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn track(&self, event: &str, properties: Map<String, Value>) {
        let event = AnalyticsEvent { event: event.to_string(), properties, timestamp: Utc::now() };
        info!(
            target: "analytics",
            event = %event.event,
            properties = %serde_json::Value::Object(event.properties.clone()),
            "analytics event"
        );
        self.buffer().push(event);
    }

    pub fn track_assistant_response(&self, query: &str, response_time: Duration, citation_count: usize) {
        let properties = json!({
            "query_length": query.chars().count(),
            "response_time_ms": response_time.as_millis() as u64,
            "citation_count": citation_count,
            "query_hash": hash_query(query),
        });
        self.track("assistant_response", into_map(properties));
    }

    pub fn track_follow_up_click(&self, follow_up: &str, original_query: &str) {
        let properties = json!({
            "followup_text": follow_up,
            "original_query_hash": hash_query(original_query),
        });
        self.track("followup_click", into_map(properties));
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.buffer().clone()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_event_hides_query() {
        let tracker = AnalyticsTracker::new();
        let query = "is there a startup plan";
        tracker.track_assistant_response(query, Duration::from_millis(42), 3);

        let events = tracker.events();
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.event, "assistant_response");
        assert_eq!(e.properties["citation_count"], 3);
        assert_eq!(e.properties["response_time_ms"], 42);
        assert_eq!(e.properties["query_length"], query.len());
        assert_eq!(e.properties["query_hash"], hash_query(query));
        let dump = serde_json::to_string(e).unwrap();
        assert!(!dump.contains(query));
    }

    #[test]
    fn hash_is_stable_and_distinct() {
        assert_eq!(hash_query("soc 2"), hash_query("soc 2"));
        assert_ne!(hash_query("soc 2"), hash_query("soc 3"));
        assert_ne!(hash_query("soc 2"), "soc 2");
    }

    #[test]
    fn clear_drops_buffer() {
        let tracker = AnalyticsTracker::new();
        tracker.track_follow_up_click("Are there any setup fees?", "pricing");
        assert_eq!(tracker.events()[0].properties["followup_text"], "Are there any setup fees?");
        tracker.clear();
        assert!(tracker.events().is_empty());
    }
}
