//! Session records for narrative answers
//!
//! A [`SessionRecord`] snapshots the choices made at each gate once a run
//! completes. Sinks store it as an opaque JSON value under a string key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::sim::{GateTrack, NarrativeSession, OptionSide};

/// Storage key prefix for session records
pub const SESSION_KEY_PREFIX: &str = "gate_runner_session_";

/// One answered gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub gate_id: u32,
    pub question: String,
    pub selected_option: OptionSide,
    pub selected_lane: u8,
    /// Label of the selected option
    pub answer: String,
    /// The runner was in neither tagged lane
    #[serde(default)]
    pub fallback: bool,
}

/// Snapshot of a completed run's narrative choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    /// Host timestamps (ms)
    pub start_time: f64,
    pub end_time: f64,
    /// In crossing order
    pub responses: Vec<Response>,
}

impl SessionRecord {
    /// Pair each recorded choice with its gate's question and answer text
    pub fn from_session(
        session_id: impl Into<String>,
        start_time: f64,
        end_time: f64,
        gates: &GateTrack,
        narrative: &NarrativeSession,
    ) -> Self {
        let responses = narrative
            .choices()
            .iter()
            .filter_map(|choice| {
                let Some(gate) = gates.gates().iter().find(|g| g.id == choice.gate_id) else {
                    log::warn!("Choice for unknown gate {} dropped", choice.gate_id);
                    return None;
                };
                Some(Response {
                    gate_id: gate.id,
                    question: gate.question.clone(),
                    selected_option: choice.option,
                    selected_lane: choice.lane,
                    answer: gate.option(choice.option).label.clone(),
                    fallback: choice.fallback,
                })
            })
            .collect();

        Self {
            session_id: session_id.into(),
            start_time,
            end_time,
            responses,
        }
    }

    /// Key under which this record is stored
    pub fn storage_key(&self) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, self.session_id)
    }

    pub fn to_json(&self) -> Result<String, SinkError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SinkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Flat `gate_<id>` -> answer pairs, in crossing order
    pub fn to_key_values(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("session_id".to_string(), self.session_id.clone()),
            ("start_time".to_string(), self.start_time.to_string()),
            ("end_time".to_string(), self.end_time.to_string()),
        ];
        pairs.extend(self.responses.iter().map(|r| {
            (
                format!("gate_{}", r.gate_id),
                format!("{} ({})", r.answer, r.selected_option.as_str()),
            )
        }));
        pairs
    }
}

/// Destination for completed session records
pub trait PersistenceSink {
    fn store(&mut self, key: &str, record: &SessionRecord) -> Result<(), SinkError>;
}

/// In-memory store (native runs and tests)
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    entries: HashMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Decode a stored record
    pub fn load(&self, key: &str) -> Option<Result<SessionRecord, SinkError>> {
        self.get(key).map(SessionRecord::from_json)
    }
}

impl PersistenceSink for MemorySink {
    fn store(&mut self, key: &str, record: &SessionRecord) -> Result<(), SinkError> {
        let json = record.to_json()?;
        self.entries.insert(key.to_string(), json);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{PersistenceSink, SessionRecord};
    use crate::error::SinkError;

    /// Browser LocalStorage store
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStorageSink;

    impl LocalStorageSink {
        fn storage() -> Result<web_sys::Storage, SinkError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or_else(|| SinkError::Unavailable("LocalStorage".to_string()))
        }
    }

    impl PersistenceSink for LocalStorageSink {
        fn store(&mut self, key: &str, record: &SessionRecord) -> Result<(), SinkError> {
            let json = record.to_json()?;
            Self::storage()?
                .set_item(key, &json)
                .map_err(|e| SinkError::Other(format!("{:?}", e)))?;
            log::info!("Session {} saved", record.session_id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Choice, default_gates};
    use crate::tuning::Tuning;

    fn answered(choices: &[(u32, u8, OptionSide, bool)]) -> (GateTrack, NarrativeSession) {
        let tuning = Tuning::default();
        let track = GateTrack::new(default_gates(), &tuning);
        let mut narrative = NarrativeSession::default();
        for &(gate_id, lane, option, fallback) in choices {
            narrative.record(Choice {
                gate_id,
                lane,
                option,
                fallback,
            });
        }
        (track, narrative)
    }

    #[test]
    fn test_record_carries_answers_in_order() {
        let (track, narrative) = answered(&[
            (1, 0, OptionSide::Left, false),
            (2, 2, OptionSide::Right, false),
            (3, 1, OptionSide::Left, true),
        ]);
        let record = SessionRecord::from_session("abc", 10.0, 90.0, &track, &narrative);
        let gates = default_gates();

        assert_eq!(record.responses.len(), 3);
        assert_eq!(record.responses[0].question, gates[0].question);
        assert_eq!(record.responses[0].answer, gates[0].left.label);
        assert_eq!(record.responses[1].selected_option, OptionSide::Right);
        assert_eq!(record.responses[1].answer, gates[1].right.label);
        assert!(record.responses[2].fallback);
        assert_eq!(record.storage_key(), "gate_runner_session_abc");
    }

    #[test]
    fn test_selected_option_serializes_lowercase() {
        let (track, narrative) = answered(&[(1, 0, OptionSide::Left, false)]);
        let record = SessionRecord::from_session("s", 0.0, 1.0, &track, &narrative);
        let json = record.to_json().unwrap();
        assert!(json.contains(r#""selected_option":"left""#));
        assert_eq!(SessionRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_key_values() {
        let (track, narrative) = answered(&[(2, 2, OptionSide::Right, false)]);
        let record = SessionRecord::from_session("s1", 5.0, 6.0, &track, &narrative);
        let pairs = record.to_key_values();
        assert_eq!(pairs[0], ("session_id".to_string(), "s1".to_string()));
        let (key, value) = &pairs[3];
        assert_eq!(key, "gate_2");
        assert!(value.ends_with("(right)"));
    }

    #[test]
    fn test_memory_sink_stores_json() {
        let (track, narrative) = answered(&[(1, 2, OptionSide::Right, false)]);
        let record = SessionRecord::from_session("m", 0.0, 2.0, &track, &narrative);

        let mut sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.store(&record.storage_key(), &record).unwrap();
        assert_eq!(sink.len(), 1);
        let loaded = sink.load(&record.storage_key()).unwrap().unwrap();
        assert_eq!(loaded, record);
        assert!(sink.load("missing").is_none());
    }
}
