//! Simulation tick
//!
//! One synchronous step in fixed order: input, runner physics, entities,
//! gates, then level progress and completion.

use serde::{Deserialize, Serialize};

use super::entity::update_entities;
use super::gate::update_gates;
use super::level::update_level;
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Lateral lane change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    pub fn delta(self) -> i8 {
        match self {
            Steer::Left => -1,
            Steer::Right => 1,
        }
    }
}

/// Input commands for a single tick (last write wins within a frame)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub steer: Option<Steer>,
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, tuning: &Tuning, input: &TickInput, dt: f32) {
    state.events.clear();

    // Nothing moves after the finish
    if state.phase == GamePhase::Completed {
        return;
    }

    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::Completed => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.time_ticks += 1;

    // Lane change and jump are independent and may happen together
    if let Some(steer) = input.steer {
        state.runner.steer(steer.delta(), tuning.lanes);
    }
    if input.jump && state.runner.jump(tuning.jump_speed) {
        state.events.push(GameEvent::Jumped);
    }
    state.runner.update(tuning, dt);

    let travel = state.progress.speed * dt;
    update_entities(state, tuning, travel, dt);
    update_gates(state, travel);
    update_level(state, tuning, travel, dt);
}
