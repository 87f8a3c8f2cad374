//! History entry marker payload
//!
//! A small record stored under a reserved key inside a history entry's state
//! object, tagging that entry as belonging to one or more open modal
//! sessions. The state object is shared, last-writer-wins: each session only
//! adds its own id and must preserve whatever unrelated fields other code
//! put there, so reads and writes go through [`read_marker`] /
//! [`write_marker`] rather than replacing the object wholesale.
//!
//! Earlier payloads carried a single `id` slot instead of the `ids` list;
//! those still deserialize and are normalized to the list form.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key for the marker inside the history entry state object.
pub const MARKER_STATE_KEY: &str = "__modalHistory";

/// Current marker payload version.
pub const MARKER_VERSION: u32 = 1;

/// Marker attached to a history entry while modal sessions own it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryMarker {
    pub version: u32,
    /// Session ids believed to have a live entry at or below this position.
    pub ids: Vec<String>,
    /// Creation time in epoch milliseconds. Informational only.
    pub timestamp: i64,
}

impl HistoryMarker {
    /// Marker carrying `ids`, stamped with the current time.
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            version: MARKER_VERSION,
            ids,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// The marker a session pushes: the current entry's ids plus its own.
    pub fn joined(current: Option<HistoryMarker>, id: &str) -> Self {
        let mut ids = current.map(|marker| marker.ids).unwrap_or_default();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
        Self::new(ids)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Id of the most recently opened session recorded here, i.e. the owner
    /// of the entry on top of the stack.
    pub fn topmost(&self) -> Option<&str> {
        self.ids.last().map(String::as_str)
    }
}

impl Default for HistoryMarker {
    fn default() -> Self {
        Self {
            version: MARKER_VERSION,
            ids: Vec::new(),
            timestamp: 0,
        }
    }
}

/// Wire shape, tolerant of missing fields and of the legacy single-id form.
#[derive(Deserialize)]
struct RawMarker {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    ids: Option<Vec<String>>,
    /// Legacy payloads stored one id per entry.
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

impl<'de> Deserialize<'de> for HistoryMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawMarker::deserialize(deserializer)?;
        let ids = match (raw.ids, raw.id) {
            (Some(ids), _) => ids,
            (None, Some(id)) => vec![id],
            (None, None) => Vec::new(),
        };
        Ok(HistoryMarker {
            version: raw.version.unwrap_or(MARKER_VERSION),
            ids,
            timestamp: raw.timestamp.unwrap_or(0),
        })
    }
}

/// Read the marker out of a history entry state object.
///
/// An absent, non-object, or malformed state yields `None`; callers treat
/// that as an empty marker rather than an error.
pub fn read_marker(state: Option<&Value>) -> Option<HistoryMarker> {
    state
        .and_then(|state| state.get(MARKER_STATE_KEY))
        .and_then(|raw| serde_json::from_value(raw.clone()).ok())
}

/// Merge the marker into a history entry state object.
///
/// Unrelated fields already present on the state object are preserved; only
/// the reserved marker slot is replaced.
pub fn write_marker(state: Option<Value>, marker: &HistoryMarker) -> Value {
    let mut object = match state {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    object.insert(
        MARKER_STATE_KEY.to_string(),
        serde_json::to_value(marker).unwrap_or(Value::Null),
    );
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_joined_appends_own_id() {
        let current = HistoryMarker::new(vec!["settings".into()]);
        let next = HistoryMarker::joined(Some(current), "profile");
        assert_eq!(next.ids, vec!["settings", "profile"]);
        assert_eq!(next.version, MARKER_VERSION);
    }

    #[test]
    fn test_joined_does_not_duplicate() {
        let current = HistoryMarker::new(vec!["settings".into()]);
        let next = HistoryMarker::joined(Some(current), "settings");
        assert_eq!(next.ids, vec!["settings"]);
    }

    #[test]
    fn test_joined_from_empty() {
        let next = HistoryMarker::joined(None, "settings");
        assert_eq!(next.ids, vec!["settings"]);
    }

    #[test]
    fn test_read_marker_absent_state() {
        assert_eq!(read_marker(None), None);
        assert_eq!(read_marker(Some(&Value::Null)), None);
        assert_eq!(read_marker(Some(&json!({"other": 1}))), None);
    }

    #[test]
    fn test_read_marker_malformed_is_none() {
        let state = json!({ MARKER_STATE_KEY: "not an object" });
        assert_eq!(read_marker(Some(&state)), None);
    }

    #[test]
    fn test_read_marker_legacy_single_id() {
        let state = json!({ MARKER_STATE_KEY: { "version": 1, "id": "settings", "timestamp": 7 } });
        let marker = read_marker(Some(&state)).unwrap();
        assert_eq!(marker.ids, vec!["settings"]);
        assert_eq!(marker.timestamp, 7);
    }

    #[test]
    fn test_read_marker_missing_fields_default() {
        let state = json!({ MARKER_STATE_KEY: {} });
        let marker = read_marker(Some(&state)).unwrap();
        assert_eq!(marker.version, MARKER_VERSION);
        assert!(marker.ids.is_empty());
        assert_eq!(marker.timestamp, 0);
    }

    #[test]
    fn test_write_marker_preserves_unrelated_fields() {
        let state = json!({ "scroll": 42, "nested": { "a": true } });
        let marker = HistoryMarker::new(vec!["m".into()]);
        let merged = write_marker(Some(state), &marker);
        assert_eq!(merged["scroll"], 42);
        assert_eq!(merged["nested"]["a"], true);
        assert_eq!(
            read_marker(Some(&merged)).unwrap().ids,
            vec!["m".to_string()]
        );
    }

    #[test]
    fn test_write_marker_over_non_object_state() {
        let marker = HistoryMarker::new(vec!["m".into()]);
        let merged = write_marker(Some(json!("scalar")), &marker);
        assert!(merged.is_object());
        assert!(read_marker(Some(&merged)).is_some());
    }

    #[test]
    fn test_roundtrip_list_form() {
        let marker = HistoryMarker::new(vec!["a".into(), "b".into()]);
        let value = serde_json::to_value(&marker).unwrap();
        let back: HistoryMarker = serde_json::from_value(value).unwrap();
        assert_eq!(back, marker);
    }
}
