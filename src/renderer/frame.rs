//! Frame building: simulation state to depth-sorted sprites
//!
//! Every object goes through the same [`Camera`] so draw order is globally
//! consistent. Sprites are sorted far-to-near (painter's order).

use glam::{Vec2, Vec3};

use crate::error::SinkError;
use crate::sim::{Camera, EntityKind, GamePhase, GameState, OptionSide, death_anim, lane_to_x};
use crate::tuning::Tuning;

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Runner { airborne: bool },
    Coin,
    Hazard,
    GateOption { gate_id: u32, side: OptionSide },
    FinishLine,
}

/// One projected object, ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Offset from the vanishing origin, screen units
    pub screen: Vec2,
    pub scale: f32,
    /// Larger is farther
    pub depth: f32,
    pub opacity: f32,
    pub rotation_deg: f32,
}

/// Heads-up summary drawn over the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub distance: f32,
    pub phase: GamePhase,
    /// Question of the next gate once its marker is in view
    pub question: Option<String>,
    /// Answer labels (left, right) for `question`
    pub answers: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

/// Consumer of built frames (canvas, DOM, test recorder...)
pub trait RenderSink {
    fn draw(&mut self, frame: &Frame) -> Result<(), SinkError>;
}

/// Blink period of the runner while immune after a hit (seconds)
const HURT_BLINK: f32 = 0.1;

fn push(
    sprites: &mut Vec<Sprite>,
    camera: &Camera,
    kind: SpriteKind,
    pos: Vec3,
    rescale: f32,
    opacity: f32,
    rotation_deg: f32,
) {
    let p = camera.project_scaled(pos, rescale);
    if !p.is_visible() {
        return;
    }
    sprites.push(Sprite {
        kind,
        screen: p.screen,
        scale: p.scale,
        depth: p.depth,
        opacity,
        rotation_deg,
    });
}

/// Build the drawable frame for the current state
pub fn build_frame(state: &GameState, tuning: &Tuning, reduced_motion: bool) -> Frame {
    let camera = Camera::from_tuning(tuning);
    let mut sprites = Vec::with_capacity(state.entities.len() + 8);

    // Runner
    let runner = &state.runner;
    let blink_off = runner.damage_cooldown > 0.0
        && ((runner.damage_cooldown / HURT_BLINK) as u32).is_multiple_of(2);
    push(
        &mut sprites,
        &camera,
        SpriteKind::Runner {
            airborne: !runner.on_ground(),
        },
        runner.pos,
        1.0,
        if blink_off { 0.35 } else { 1.0 },
        0.0,
    );

    // Coins and hazards, alive or dying
    for entity in &state.entities {
        let anim = death_anim(entity, tuning.death_duration);
        let kind = match entity.kind {
            EntityKind::Coin => SpriteKind::Coin,
            EntityKind::Hazard => SpriteKind::Hazard,
        };
        let pos = entity.pos + anim.offset.extend(0.0);
        push(
            &mut sprites,
            &camera,
            kind,
            pos,
            anim.scale,
            anim.opacity,
            if reduced_motion { 0.0 } else { anim.rotation_deg },
        );
    }

    // Pending gates within spawn range
    let mut question = None;
    let mut answers = None;
    for (gate, z) in state.gates.pending_markers() {
        if z > tuning.spawn_first_z {
            break;
        }
        if question.is_none() {
            question = Some(gate.question.clone());
            answers = Some((gate.left.label.clone(), gate.right.label.clone()));
        }
        for side in [OptionSide::Left, OptionSide::Right] {
            let lane = gate.option(side).lane;
            let x = lane_to_x(lane, tuning.lanes, tuning.lane_width);
            push(
                &mut sprites,
                &camera,
                SpriteKind::GateOption {
                    gate_id: gate.id,
                    side,
                },
                Vec3::new(x, 0.0, z),
                1.0,
                1.0,
                0.0,
            );
        }
    }

    if let Some(finish) = state.finish {
        push(
            &mut sprites,
            &camera,
            SpriteKind::FinishLine,
            Vec3::new(0.0, 0.0, finish.z),
            1.0,
            1.0,
            0.0,
        );
    }

    sprites.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    Frame {
        sprites,
        hud: Hud {
            score: state.progress.score,
            level: state.progress.level,
            distance: state.progress.distance,
            phase: state.phase,
            question,
            answers,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, default_gates, tick};

    #[test]
    fn test_frame_is_sorted_far_to_near() {
        let tuning = Tuning::default();
        let mut state = GameState::new(8, &tuning, default_gates());
        tick(&mut state, &tuning, &TickInput::default(), 0.016);

        let frame = build_frame(&state, &tuning, false);
        assert!(frame.sprites.len() > 1);
        assert!(frame.sprites.windows(2).all(|w| w[0].depth >= w[1].depth));
        assert!(
            frame
                .sprites
                .iter()
                .any(|s| matches!(s.kind, SpriteKind::Runner { .. }))
        );
        assert_eq!(frame.hud.level, 1);
    }

    #[test]
    fn test_gate_options_appear_when_near() {
        let tuning = Tuning::default();
        let mut state = GameState::new(8, &tuning, default_gates());
        let frame = build_frame(&state, &tuning, false);
        assert!(frame.hud.question.is_none());

        state.gates.scroll(2500.0);
        let frame = build_frame(&state, &tuning, false);
        let options = frame
            .sprites
            .iter()
            .filter(|s| matches!(s.kind, SpriteKind::GateOption { gate_id: 1, .. }))
            .count();
        assert_eq!(options, 2);
        assert_eq!(
            frame.hud.question.as_deref(),
            Some(default_gates()[0].question.as_str())
        );
    }

    #[test]
    fn test_reduced_motion_disables_spin() {
        use crate::sim::state::{DeathCause, WorldEntity};

        let tuning = Tuning::default();
        let mut state = GameState::new(8, &tuning, Vec::new());
        let mut coin = WorldEntity::new(1, EntityKind::Coin, Vec3::new(0.0, 0.0, 10.0));
        coin.kill(DeathCause::Collected, Vec2::new(0.0, -100.0), 0.2);
        state.entities.push(coin);

        let spin = |reduced| {
            build_frame(&state, &tuning, reduced)
                .sprites
                .iter()
                .find(|s| s.kind == SpriteKind::Coin)
                .map(|s| s.rotation_deg)
                .unwrap()
        };
        assert!(spin(false) > 0.0);
        assert_eq!(spin(true), 0.0);
    }
}
