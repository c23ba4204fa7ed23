//! Runner physics: lane glide, jump/gravity, damage cooldown

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::lane::{lane_to_x, step_lane};
use crate::tuning::Tuning;

/// The player-controlled runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    /// World position; z never changes during a run, y <= 0 (negative is up)
    pub pos: Vec3,
    /// Target lane the runner glides toward
    pub lane: u8,
    /// Vertical velocity (negative is up)
    pub y_speed: f32,
    /// Seconds of hazard immunity left
    pub damage_cooldown: f32,
}

impl Runner {
    /// Runner standing in the configured initial lane
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec3::new(
                lane_to_x(tuning.init_lane, tuning.lanes, tuning.lane_width),
                0.0,
                tuning.runner_z,
            ),
            lane: tuning.init_lane,
            y_speed: 0.0,
            damage_cooldown: 0.0,
        }
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.pos.y == 0.0
    }

    /// Shift the target lane by one, clamped to the road
    pub fn steer(&mut self, delta: i8, lanes: u8) {
        self.lane = step_lane(self.lane, delta, lanes);
    }

    /// Start a jump. Returns false (and does nothing) while airborne.
    pub fn jump(&mut self, jump_speed: f32) -> bool {
        if !self.on_ground() {
            return false;
        }
        self.y_speed = jump_speed;
        true
    }

    /// Whether hazards can currently hurt the runner
    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        self.damage_cooldown <= 0.0
    }

    /// Start the post-hit immunity window
    pub fn take_hit(&mut self, cooldown: f32) {
        self.damage_cooldown = cooldown;
    }

    /// Integrate one step of lateral, vertical and cooldown motion
    pub fn update(&mut self, tuning: &Tuning, dt: f32) {
        let dt = dt.max(0.0);

        // Lateral glide, never overshooting the lane center
        let target_x = lane_to_x(self.lane, tuning.lanes, tuning.lane_width);
        let max_step = tuning.x_speed * dt;
        if self.pos.x < target_x {
            self.pos.x = (self.pos.x + max_step).min(target_x);
        } else if self.pos.x > target_x {
            self.pos.x = (self.pos.x - max_step).max(target_x);
        }

        // Gravity only applies while airborne; the ground is a hard floor
        if self.pos.y < 0.0 {
            self.y_speed += tuning.gravity * dt;
        }
        self.pos.y = (self.pos.y + self.y_speed * dt).min(0.0);
        if self.pos.y == 0.0 && self.y_speed > 0.0 {
            self.y_speed = 0.0;
        }

        self.damage_cooldown = (self.damage_cooldown - dt).max(0.0);
    }
}
