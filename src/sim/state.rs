//! Game state and core simulation types
//!
//! Everything a run depends on lives in [`GameState`]; there is no ambient
//! global state. The struct is serializable so a run can be snapshotted.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::gate::{Gate, GateTrack, NarrativeSession, OptionSide};
use super::runner::Runner;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World scrolling, input accepted
    Running,
    /// Frozen until unpaused
    Paused,
    /// Finish reached; only a restart is accepted
    Completed,
}

/// What a world entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Coin,
    Hazard,
}

/// Why an entity started dying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Collected,
    HitRunner,
    /// Scrolled past the runner
    Retired,
}

/// Smallest death timer stored when an entity dies during a zero-length tick
pub const MIN_DEATH_TIMER: f32 = 1e-6;

/// A coin or hazard on the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEntity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec3,
    /// 0 while alive, otherwise seconds since death
    pub death_timer: f32,
    /// Set once, when the entity dies
    pub death_cause: Option<DeathCause>,
    /// Screen-plane drift per second of death animation
    pub drift: Vec2,
}

impl WorldEntity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec3) -> Self {
        Self {
            id,
            kind,
            pos,
            death_timer: 0.0,
            death_cause: None,
            drift: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.death_timer == 0.0
    }

    /// Transition to dying. No-op if already dying.
    pub fn kill(&mut self, cause: DeathCause, drift: Vec2, dt: f32) {
        if !self.is_alive() {
            return;
        }
        self.death_timer = dt.max(MIN_DEATH_TIMER);
        self.death_cause = Some(cause);
        self.drift = drift;
    }
}

/// Finish line that appears once the last level is run through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishMarker {
    pub z: f32,
}

/// Distance, level, speed and score bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameProgress {
    /// Total forward distance covered
    pub distance: f32,
    /// Distance covered since the current level's batch spawned
    pub level_progress: f32,
    /// 0 before the first spawn, capped at the configured maximum
    pub level: u32,
    /// Current forward speed (after any finish ramp-down)
    pub speed: f32,
    /// Seconds of unpaused running
    pub elapsed: f32,
    /// Coins collected
    pub score: u64,
    /// Hazards that hurt the runner
    pub hits: u32,
    /// Set once when the finish is reached
    pub completed: bool,
}

impl GameProgress {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            distance: 0.0,
            level_progress: 0.0,
            level: 0,
            speed: tuning.base_speed,
            elapsed: 0.0,
            score: 0,
            hits: 0,
            completed: false,
        }
    }
}

/// Things that happened during a tick, consumed by the frame driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    CoinCollected { entity_id: u32 },
    RunnerHit { entity_id: u32 },
    Jumped,
    GateCrossed {
        gate_id: u32,
        side: OptionSide,
        lane: u8,
        fallback: bool,
    },
    FinishSpawned,
    Completed,
    Paused,
    Resumed,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawner randomness, seeded from `seed`
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub runner: Runner,
    /// Live and dying entities, in spawn (id) order
    pub entities: Vec<WorldEntity>,
    pub gates: GateTrack,
    pub narrative: NarrativeSession,
    pub progress: GameProgress,
    pub finish: Option<FinishMarker>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed and gate sequence
    pub fn new(seed: u64, tuning: &Tuning, gates: Vec<Gate>) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            runner: Runner::new(tuning),
            entities: Vec::new(),
            gates: GateTrack::new(gates, tuning),
            narrative: NarrativeSession::default(),
            progress: GameProgress::new(tuning),
            finish: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.progress.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_is_set_once() {
        let mut entity = WorldEntity::new(1, EntityKind::Coin, Vec3::ZERO);
        assert!(entity.is_alive());
        entity.kill(DeathCause::Collected, Vec2::new(0.0, -1.0), 0.02);
        assert_eq!(entity.death_timer, 0.02);

        entity.kill(DeathCause::Retired, Vec2::ZERO, 0.5);
        assert_eq!(entity.death_timer, 0.02);
        assert_eq!(entity.death_cause, Some(DeathCause::Collected));
    }

    #[test]
    fn test_kill_at_zero_dt_still_dies() {
        let mut entity = WorldEntity::new(1, EntityKind::Hazard, Vec3::ZERO);
        entity.kill(DeathCause::HitRunner, Vec2::ZERO, 0.0);
        assert!(!entity.is_alive());
        assert!(entity.death_timer > 0.0);
    }

    #[test]
    fn test_new_state_is_level_zero() {
        let tuning = Tuning::default();
        let state = GameState::new(7, &tuning, Vec::new());
        assert_eq!(state.progress.level, 0);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.entities.is_empty());
        assert!(!state.is_completed());
    }
}
