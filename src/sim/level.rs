//! Level progression, speed ramp and the finish condition

use super::spawn::generate_level;
use super::state::{FinishMarker, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Speed multiplier while the finish marker approaches
pub fn finish_speed_factor(gap: f32, tuning: &Tuning) -> f32 {
    (gap / tuning.finish_ramp_distance).clamp(tuning.finish_min_speed_fraction, 1.0)
}

/// Level step of the tick: distance, spawns, finish marker, completion, speed
pub fn update_level(state: &mut GameState, tuning: &Tuning, travel: f32, dt: f32) {
    if state.progress.completed {
        return;
    }

    // First spawn turns level 0 into level 1
    if state.progress.level == 0 {
        start_level(state, tuning, 1);
    }

    let progress = &mut state.progress;
    progress.elapsed += dt.max(0.0);
    progress.distance += travel;
    progress.level_progress += travel;

    if let Some(finish) = &mut state.finish {
        finish.z -= travel;
    }

    if state.progress.level_progress >= tuning.level_length {
        if state.progress.level < tuning.max_level {
            let next = state.progress.level + 1;
            start_level(state, tuning, next);
        } else if state.finish.is_none() {
            state.finish = Some(FinishMarker {
                z: tuning.spawn_first_z,
            });
            state.events.push(GameEvent::FinishSpawned);
            log::info!(
                "Finish line in sight at distance {:.0}",
                state.progress.distance
            );
        }
    }

    // Edge-triggered completion, guarded by the set-once flag
    if let Some(finish) = state.finish {
        if finish.z - tuning.runner_z <= tuning.finish_stop_margin {
            state.progress.completed = true;
            state.phase = GamePhase::Completed;
            state.events.push(GameEvent::Completed);
            log::info!(
                "Run complete: score {}, distance {:.0}, {} choices",
                state.progress.score,
                state.progress.distance,
                state.narrative.len()
            );
            return;
        }
    }

    let base = tuning.base_speed + tuning.speed_accel * state.progress.elapsed;
    let factor = state
        .finish
        .map(|f| finish_speed_factor(f.z - tuning.runner_z, tuning))
        .unwrap_or(1.0);
    state.progress.speed = base * factor;
}

fn start_level(state: &mut GameState, tuning: &Tuning, level: u32) {
    state.progress.level = level;
    state.progress.level_progress = 0.0;
    generate_level(state, tuning);
    state.events.push(GameEvent::LevelStarted { level });
    log::info!("Level {} started", level);
}
