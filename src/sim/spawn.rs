//! Level layout: a directional random walk over lanes and heights
//!
//! A cursor starts in the center lane on the ground. Every few entities it
//! is redirected to an adjacent lane or toggles between ground and the
//! elevated row. Each slot gets one entity, coin or hazard.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::lane::{adjacent_lanes, center_lane, lane_to_x};
use super::state::{EntityKind, GameState, WorldEntity};
use crate::tuning::Tuning;

/// Source of uniform draws in `[0, 1)` for the spawner
pub trait SpawnRng {
    fn next_unit(&mut self) -> f32;
}

impl SpawnRng for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f32>,
    index: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, index: 0 }
    }
}

impl SpawnRng for SequenceRng {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.index % self.values.len()];
        self.index += 1;
        v.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

/// Where the walk can turn when redirected
#[derive(Debug, Clone, Copy, PartialEq)]
enum Redirect {
    ToggleElevated,
    Lane(u8),
}

/// One placed slot of a batch, before it gets an entity id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSlot {
    pub lane: u8,
    pub kind: EntityKind,
    pub pos: Vec3,
}

/// Lay out one level's batch
pub fn layout_batch<R: SpawnRng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Vec<SpawnSlot> {
    let mut lane = center_lane(tuning.lanes);
    let mut elevated = false;
    let mut z = tuning.spawn_first_z;
    let mut slots = Vec::with_capacity(tuning.spawn_batch);

    // A zero period never redirects
    for i in 0..tuning.spawn_batch {
        if i > 0 && i.is_multiple_of(tuning.spawn_redirect_every) {
            let mut options = vec![Redirect::ToggleElevated];
            options.extend(adjacent_lanes(lane, tuning.lanes).map(Redirect::Lane));
            let pick = ((rng.next_unit() * options.len() as f32) as usize).min(options.len() - 1);
            match options[pick] {
                Redirect::ToggleElevated => elevated = !elevated,
                Redirect::Lane(l) => lane = l,
            }
        }

        let kind = if rng.next_unit() < tuning.hazard_chance {
            EntityKind::Hazard
        } else {
            EntityKind::Coin
        };
        let y = if elevated { tuning.elevated_y } else { 0.0 };
        slots.push(SpawnSlot {
            lane,
            kind,
            pos: Vec3::new(lane_to_x(lane, tuning.lanes, tuning.lane_width), y, z),
        });

        z += tuning.spawn_gap;
    }

    slots
}

/// Spawn the next level's batch into the state using its seeded RNG
pub fn generate_level(state: &mut GameState, tuning: &Tuning) {
    let slots = layout_batch(&mut state.rng, tuning);
    let hazards = slots.iter().filter(|s| s.kind == EntityKind::Hazard).count();
    log::debug!(
        "Spawned {} entities ({} hazards) for level {}",
        slots.len(),
        hazards,
        state.progress.level
    );

    for slot in slots {
        let id = state.next_entity_id();
        state.entities.push(WorldEntity::new(id, slot.kind, slot.pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_scripted_first_block() {
        let tuning = Tuning::default();
        let mut rng = SequenceRng::new(vec![0.1, 0.9, 0.2, 0.5, 0.25, 0.7]);
        let slots = layout_batch(&mut rng, &tuning);

        let kinds: Vec<_> = slots[..6].iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Hazard,
                EntityKind::Coin,
                EntityKind::Hazard,
                EntityKind::Coin,
                EntityKind::Hazard,
                EntityKind::Coin,
            ]
        );
        for (i, slot) in slots[..6].iter().enumerate() {
            assert_eq!(slot.lane, 1);
            assert_eq!(slot.pos.x, 0.0);
            assert_eq!(slot.pos.y, 0.0);
            assert_eq!(slot.pos.z, 1000.0 + i as f32 * 120.0);
        }
    }

    #[test]
    fn test_redirect_choices() {
        let tuning = Tuning::default();
        // Six kind draws, then redirect 0.1 -> toggle (1 of 3 options)
        let mut draws = vec![0.9; 6];
        draws.extend([0.1, 0.9]);
        // Five more kinds, then redirect 0.5 -> lane 0
        draws.extend([0.9; 5]);
        draws.extend([0.5, 0.9]);
        let mut rng = SequenceRng::new(draws);
        let slots = layout_batch(&mut rng, &tuning);

        assert_eq!(slots[6].lane, 1);
        assert_eq!(slots[6].pos.y, tuning.elevated_y);
        assert_eq!(slots[12].lane, 0);
        assert_eq!(slots[12].pos.x, -tuning.lane_width);
        assert_eq!(slots[12].pos.y, tuning.elevated_y);
    }

    #[test]
    fn test_batch_shape() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let slots = layout_batch(&mut rng, &tuning);
        assert_eq!(slots.len(), tuning.spawn_batch);
        for pair in slots.windows(2) {
            assert_eq!(pair[1].pos.z - pair[0].pos.z, tuning.spawn_gap);
            // The walk moves at most one lane at a time
            assert!(pair[0].lane.abs_diff(pair[1].lane) <= 1);
        }
        assert!(slots.iter().all(|s| s.lane < tuning.lanes));
    }

    #[test]
    fn test_zero_redirect_period_keeps_one_lane() {
        let tuning = Tuning {
            spawn_redirect_every: 0,
            ..Tuning::default()
        };
        assert!(tuning.validate().is_err());

        let slots = layout_batch(&mut Pcg32::seed_from_u64(11), &tuning);
        assert_eq!(slots.len(), tuning.spawn_batch);
        assert!(slots.iter().all(|s| s.lane == 1 && s.pos.y == 0.0));

        // Unvalidated tuning still runs through the tick
        let mut state = GameState::new(11, &tuning, Vec::new());
        crate::sim::tick(&mut state, &tuning, &Default::default(), 0.0);
        assert_eq!(state.entities.len(), tuning.spawn_batch);
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let tuning = Tuning::default();
        let a = layout_batch(&mut Pcg32::seed_from_u64(7), &tuning);
        let b = layout_batch(&mut Pcg32::seed_from_u64(7), &tuning);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_level_assigns_ids() {
        let tuning = Tuning::default();
        let mut state = GameState::new(3, &tuning, Vec::new());
        generate_level(&mut state, &tuning);
        generate_level(&mut state, &tuning);
        assert_eq!(state.entities.len(), 2 * tuning.spawn_batch);
        let ids: Vec<_> = state.entities.iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
    }
}
