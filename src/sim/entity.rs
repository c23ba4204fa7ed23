//! Entity lifecycle: scroll, collide, die, animate, remove
//!
//! Live entities (death timer 0) scroll toward the runner and are tested for
//! collection or damage. Dying entities only age; their on-screen animation
//! is a pure function of the death timer, see [`death_anim`].

use glam::{Vec2, Vec3};

use super::state::{DeathCause, EntityKind, GameEvent, GameState, WorldEntity};
use crate::tuning::Tuning;

/// Upward drift of a collected coin (world units/s, negative is up)
pub const COIN_RISE_SPEED: f32 = -220.0;
/// Sideways knock of a hazard that hit the runner (world units/s)
pub const HAZARD_KNOCK_SPEED: f32 = 320.0;
/// Upward kick of a knocked hazard
pub const HAZARD_KNOCK_LIFT: f32 = -160.0;
/// Scale gained per second of death animation
pub const DEATH_GROWTH: f32 = 1.6;
/// Spin of dying entities (degrees/s)
pub const DEATH_SPIN_DEG_PER_SEC: f32 = 540.0;

/// Coin pickup: plain euclidean distance
#[inline]
pub fn coin_collected(runner: Vec3, coin: Vec3, radius: f32) -> bool {
    runner.distance(coin) <= radius
}

/// Hazard contact: three independent per-axis tests, not a box overlap
#[inline]
pub fn hazard_hits(runner: Vec3, hazard: Vec3, tuning: &Tuning) -> bool {
    let d = (runner - hazard).abs();
    d.x < tuning.hazard_dx && d.y < tuning.hazard_dy && d.z < tuning.hazard_dz
}

/// How a dying entity is drawn at a given moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathAnim {
    /// World-space x/y offset from the entity position
    pub offset: Vec2,
    /// Size multiplier
    pub scale: f32,
    /// 1 = opaque, 0 = gone
    pub opacity: f32,
    pub rotation_deg: f32,
}

impl DeathAnim {
    pub const ALIVE: DeathAnim = DeathAnim {
        offset: Vec2::ZERO,
        scale: 1.0,
        opacity: 1.0,
        rotation_deg: 0.0,
    };
}

/// Death animation for an entity, driven only by its death timer
pub fn death_anim(entity: &WorldEntity, death_duration: f32) -> DeathAnim {
    if entity.is_alive() {
        return DeathAnim::ALIVE;
    }
    let t = entity.death_timer;
    let spin = match entity.death_cause {
        Some(DeathCause::Retired) | None => 0.0,
        Some(_) => DEATH_SPIN_DEG_PER_SEC * t,
    };
    DeathAnim {
        offset: entity.drift * t,
        scale: 1.0 + DEATH_GROWTH * t,
        opacity: (1.0 - t / death_duration).clamp(0.0, 1.0),
        rotation_deg: spin % 360.0,
    }
}

/// Entity step of the tick
pub fn update_entities(state: &mut GameState, tuning: &Tuning, travel: f32, dt: f32) {
    let dt = dt.max(0.0);
    let runner_pos = state.runner.pos;

    for entity in &mut state.entities {
        if !entity.is_alive() {
            entity.death_timer += dt;
            continue;
        }

        entity.pos.z -= travel;

        match entity.kind {
            EntityKind::Coin => {
                if coin_collected(runner_pos, entity.pos, tuning.collect_radius) {
                    entity.kill(
                        DeathCause::Collected,
                        Vec2::new(0.0, COIN_RISE_SPEED),
                        dt,
                    );
                    state.progress.score += 1;
                    state.events.push(GameEvent::CoinCollected {
                        entity_id: entity.id,
                    });
                }
            }
            EntityKind::Hazard => {
                if state.runner.is_vulnerable() && hazard_hits(runner_pos, entity.pos, tuning) {
                    state.runner.take_hit(tuning.damage_cooldown);
                    let side = if entity.pos.x < runner_pos.x { -1.0 } else { 1.0 };
                    entity.kill(
                        DeathCause::HitRunner,
                        Vec2::new(side * HAZARD_KNOCK_SPEED, HAZARD_KNOCK_LIFT),
                        dt,
                    );
                    state.progress.hits += 1;
                    state.events.push(GameEvent::RunnerHit {
                        entity_id: entity.id,
                    });
                }
            }
        }

        if entity.is_alive() && entity.pos.z < tuning.retire_z {
            entity.kill(DeathCause::Retired, Vec2::ZERO, dt);
        }
    }

    let duration = tuning.death_duration;
    state.entities.retain(|e| e.is_alive() || e.death_timer <= duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::lane_to_x;
    use proptest::prelude::*;

    fn state_with(entities: Vec<WorldEntity>) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning, Vec::new());
        state.entities = entities;
        (state, tuning)
    }

    #[test]
    fn test_hazard_in_runner_lane_hits_once() {
        let tuning = Tuning::default();
        let x = lane_to_x(1, tuning.lanes, tuning.lane_width);
        let (mut state, tuning) = state_with(vec![
            WorldEntity::new(1, EntityKind::Hazard, Vec3::new(x, 0.0, tuning.runner_z)),
            WorldEntity::new(2, EntityKind::Hazard, Vec3::new(x, 0.0, tuning.runner_z + 5.0)),
        ]);
        state.runner.lane = 1;

        update_entities(&mut state, &tuning, 0.0, 0.016);

        let hits: Vec<_> = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunnerHit { .. }))
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(state.runner.damage_cooldown, tuning.damage_cooldown);
        assert!(state.entities[0].death_timer > 0.0);
        // Second hazard ignored while the cooldown runs
        assert!(state.entities[1].is_alive());
        assert_eq!(state.progress.hits, 1);
    }

    #[test]
    fn test_hazard_in_other_lane_misses() {
        let tuning = Tuning::default();
        let x = lane_to_x(0, tuning.lanes, tuning.lane_width);
        let (mut state, tuning) = state_with(vec![WorldEntity::new(
            1,
            EntityKind::Hazard,
            Vec3::new(x, 0.0, tuning.runner_z),
        )]);
        update_entities(&mut state, &tuning, 0.0, 0.016);
        assert!(state.entities[0].is_alive());
        assert!(state.runner.is_vulnerable());
    }

    #[test]
    fn test_jumping_clears_hazard() {
        let (mut state, tuning) = state_with(vec![WorldEntity::new(
            1,
            EntityKind::Hazard,
            Vec3::new(0.0, 0.0, 0.0),
        )]);
        state.runner.pos.y = -60.0;
        update_entities(&mut state, &tuning, 0.0, 0.016);
        assert!(state.entities[0].is_alive());
    }

    #[test]
    fn test_coin_collected_within_radius() {
        let (mut state, tuning) = state_with(vec![
            WorldEntity::new(1, EntityKind::Coin, Vec3::new(0.0, 0.0, 40.0)),
            WorldEntity::new(2, EntityKind::Coin, Vec3::new(0.0, 0.0, 200.0)),
        ]);
        // Scroll 20 units: first coin ends up 20 away, second 180
        update_entities(&mut state, &tuning, 20.0, 0.016);
        assert_eq!(state.progress.score, 1);
        assert!(!state.entities[0].is_alive());
        assert_eq!(state.entities[0].death_cause, Some(DeathCause::Collected));
        assert!(state.entities[1].is_alive());
        assert_eq!(state.entities[1].pos.z, 180.0);
    }

    #[test]
    fn test_entities_behind_runner_retire_then_vanish() {
        let (mut state, tuning) = state_with(vec![WorldEntity::new(
            1,
            EntityKind::Coin,
            Vec3::new(142.0, 0.0, -90.0),
        )]);
        update_entities(&mut state, &tuning, 20.0, 0.1);
        assert_eq!(state.entities[0].death_cause, Some(DeathCause::Retired));
        assert_eq!(state.progress.score, 0);

        for _ in 0..3 {
            update_entities(&mut state, &tuning, 20.0, 0.1);
        }
        assert_eq!(state.entities.len(), 1);
        update_entities(&mut state, &tuning, 20.0, 0.1);
        update_entities(&mut state, &tuning, 20.0, 0.1);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_death_anim_progresses() {
        let mut coin = WorldEntity::new(1, EntityKind::Coin, Vec3::ZERO);
        assert_eq!(death_anim(&coin, 0.5), DeathAnim::ALIVE);

        coin.kill(DeathCause::Collected, Vec2::new(0.0, COIN_RISE_SPEED), 0.25);
        let anim = death_anim(&coin, 0.5);
        assert!((anim.opacity - 0.5).abs() < 1e-6);
        assert!(anim.scale > 1.0);
        assert!(anim.offset.y < 0.0);
        assert!(anim.rotation_deg > 0.0);

        coin.death_timer = 0.75;
        assert_eq!(death_anim(&coin, 0.5).opacity, 0.0);
    }

    proptest! {
        #[test]
        fn prop_death_timer_never_resets(
            dts in prop::collection::vec(0.0f32..0.05, 1..100),
            xs in prop::collection::vec(-150.0f32..150.0, 1..20),
        ) {
            let tuning = Tuning::default();
            let entities = xs
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    let kind = if i % 2 == 0 { EntityKind::Coin } else { EntityKind::Hazard };
                    WorldEntity::new(i as u32, kind, Vec3::new(x, 0.0, i as f32 * 15.0))
                })
                .collect();
            let (mut state, _) = state_with(entities);
            let mut timers: Vec<(u32, f32)> = Vec::new();
            let mut last_score = 0;

            for dt in dts {
                update_entities(&mut state, &tuning, 300.0 * dt, dt);
                prop_assert!(state.progress.score >= last_score);
                last_score = state.progress.score;
                for (id, prev) in &timers {
                    if let Some(e) = state.entities.iter().find(|e| e.id == *id) {
                        prop_assert!(e.death_timer > 0.0);
                        prop_assert!(e.death_timer >= *prev);
                    }
                }
                timers = state
                    .entities
                    .iter()
                    .filter(|e| !e.is_alive())
                    .map(|e| (e.id, e.death_timer))
                    .collect();
            }
        }
    }
}
