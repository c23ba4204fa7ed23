//! Error types
//!
//! The simulation itself never fails. Errors only come from loading
//! configuration and from the collaborators the frame driver talks to.

use thiserror::Error;

/// Invalid tuning or gate configuration, rejected at load time
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(String),
    #[error("{field} must be {requirement}, got {value}")]
    InvalidValue {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },
    #[error("lane count must be at least 1")]
    NoLanes,
    #[error("initial lane {lane} is outside 0..{lanes}")]
    InitialLaneOutOfRange { lane: u8, lanes: u8 },
    #[error("gate sequence must contain at least one gate")]
    NoGates,
    #[error("gate {gate_id}: option lane {lane} is outside 0..{lanes}")]
    GateLaneOutOfRange { gate_id: u32, lane: u8, lanes: u8 },
    #[error("gate {gate_id}: both options use lane {lane}")]
    GateLanesNotDistinct { gate_id: u32, lane: u8 },
    #[error("gate {gate_id} appears more than once")]
    DuplicateGate { gate_id: u32 },
    #[error("gate {gate_id}: threshold {threshold} must be finite and non-negative")]
    InvalidThreshold { gate_id: u32, threshold: f32 },
    #[error("gate {gate_id}: threshold {threshold} does not increase past {previous}")]
    ThresholdsNotIncreasing {
        gate_id: u32,
        threshold: f32,
        previous: f32,
    },
    #[error("gate {gate_id} has an empty question")]
    EmptyQuestion { gate_id: u32 },
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// A collaborator (renderer, audio, storage) failed to do its job
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SinkError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("serialization failed: {0}")]
    Serialize(String),
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for SinkError {
    fn from(e: serde_json::Error) -> Self {
        SinkError::Serialize(e.to_string())
    }
}
