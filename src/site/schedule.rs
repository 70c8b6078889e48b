//! Conference schedule
//!
//! Read-only session data keyed by session ID, loaded once at startup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::SiteError;
use crate::routing::RESERVED_PREFIX;

/// One schedule entry
///
/// Fields other than `name`, `time` and `description` are kept verbatim
/// and handed to templates as part of the session payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human readable time label, e.g. "Day 1, 10:30"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionRecord {
    /// Full record as JSON, for the template's `session` field
    pub fn payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    sessions: HashMap<String, SessionRecord>,
}

impl Schedule {
    /// Load `{ "sessions": { "<id>": { ... } } }` from disk
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let bytes = std::fs::read(path).map_err(|source| SiteError::ScheduleIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| SiteError::ScheduleParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_sessions(sessions: HashMap<String, SessionRecord>) -> Self {
        Self { sessions }
    }

    /// Look up a public session
    ///
    /// IDs starting with `_` are internal and never returned, even when
    /// present in the data.
    pub fn session(&self, id: &str) -> Option<&SessionRecord> {
        if id.starts_with(RESERVED_PREFIX) {
            return None;
        }
        self.sessions.get(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "sessions": {
            "keynote": {
                "name": "Opening Keynote",
                "time": "Day 1, 09:30",
                "description": "Welcome and roadmap.",
                "speakers": ["ada", "grace"],
                "room": "Main Hall"
            },
            "lunch": {},
            "_draft": { "name": "Secret" }
        },
        "generated": "2026-10-01"
    }"#;

    fn sample() -> Schedule {
        serde_json::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_keeps_extra_fields() {
        let schedule = sample();
        assert_eq!(schedule.len(), 3);

        let keynote = schedule.session("keynote").unwrap();
        assert_eq!(keynote.name.as_deref(), Some("Opening Keynote"));
        assert_eq!(keynote.time.as_deref(), Some("Day 1, 09:30"));
        assert_eq!(keynote.extra["room"], "Main Hall");

        let payload = keynote.payload();
        assert_eq!(payload["name"], "Opening Keynote");
        assert_eq!(payload["speakers"][1], "grace");
    }

    #[test]
    fn test_empty_record() {
        let lunch = sample().session("lunch").cloned().unwrap();
        assert_eq!(lunch, SessionRecord::default());
        assert_eq!(lunch.payload(), serde_json::json!({}));
    }

    #[test]
    fn test_reserved_and_unknown_ids() {
        let schedule = sample();
        assert!(schedule.session("_draft").is_none());
        assert!(schedule.session("closing").is_none());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Schedule::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, SiteError::ScheduleIo { .. }));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ \"sessions\": [").unwrap();
        let err = Schedule::load(&broken).unwrap_err();
        assert!(matches!(err, SiteError::ScheduleParse { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let schedule = Schedule::load(&path).unwrap();
        assert!(schedule.session("keynote").is_some());
    }
}
