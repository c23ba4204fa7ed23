//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod entity;
pub mod gate;
pub mod lane;
pub mod level;
pub mod projection;
pub mod runner;
pub mod spawn;
pub mod state;
pub mod tick;

pub use entity::{DeathAnim, death_anim};
pub use gate::{
    Choice, Gate, GateOption, GateTrack, NarrativeSession, OptionSide, default_gates,
    gates_from_json, validate_gates,
};
pub use lane::{adjacent_lanes, lane_to_x};
pub use projection::{Camera, Projected};
pub use runner::Runner;
pub use spawn::{SequenceRng, SpawnRng, generate_level, layout_batch};
pub use state::{
    DeathCause, EntityKind, FinishMarker, GameEvent, GamePhase, GameProgress, GameState,
    WorldEntity,
};
pub use tick::{Steer, TickInput, tick};
