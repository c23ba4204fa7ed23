//! Data-driven game balance
//!
//! Every number the simulation depends on lives in [`Tuning`]. Defaults come
//! from [`crate::consts`]; a JSON document can override any subset of them.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Balance constants threaded through every simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lanes ===
    pub lanes: u8,
    pub lane_width: f32,
    pub init_lane: u8,

    // === Runner ===
    pub x_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub runner_z: f32,
    pub damage_cooldown: f32,

    // === Scrolling ===
    pub base_speed: f32,
    pub speed_accel: f32,

    // === Spawner ===
    pub spawn_batch: usize,
    pub spawn_redirect_every: usize,
    pub spawn_first_z: f32,
    pub spawn_gap: f32,
    pub hazard_chance: f32,
    pub elevated_y: f32,

    // === Collision / lifecycle ===
    pub collect_radius: f32,
    /// Per-axis hazard thresholds (empirical, not derived from geometry)
    pub hazard_dx: f32,
    pub hazard_dy: f32,
    pub hazard_dz: f32,
    pub retire_z: f32,
    pub death_duration: f32,

    // === Levels ===
    pub level_length: f32,
    pub max_level: u32,
    pub finish_stop_margin: f32,
    pub finish_ramp_distance: f32,
    pub finish_min_speed_fraction: f32,

    // === Camera ===
    pub camera_angle_deg: f32,
    pub focal_length: f32,

    // === Clock ===
    /// Longest frame step simulated at once (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lanes: LANES,
            lane_width: LANE_WIDTH,
            init_lane: INIT_LANE,

            x_speed: X_SPEED,
            jump_speed: JUMP_SPEED,
            gravity: GRAVITY,
            runner_z: RUNNER_Z,
            damage_cooldown: DAMAGE_COOLDOWN,

            base_speed: BASE_SPEED,
            speed_accel: SPEED_ACCEL,

            spawn_batch: SPAWN_BATCH,
            spawn_redirect_every: SPAWN_REDIRECT_EVERY,
            spawn_first_z: SPAWN_FIRST_Z,
            spawn_gap: SPAWN_GAP,
            hazard_chance: HAZARD_CHANCE,
            elevated_y: ELEVATED_Y,

            collect_radius: COLLECT_RADIUS,
            hazard_dx: HAZARD_DX,
            hazard_dy: HAZARD_DY,
            hazard_dz: HAZARD_DZ,
            retire_z: RETIRE_Z,
            death_duration: DEATH_DURATION,

            level_length: LEVEL_LENGTH,
            max_level: MAX_LEVEL,
            finish_stop_margin: FINISH_STOP_MARGIN,
            finish_ramp_distance: FINISH_RAMP_DISTANCE,
            finish_min_speed_fraction: FINISH_MIN_SPEED_FRACTION,

            camera_angle_deg: CAMERA_ANGLE_DEG,
            focal_length: FOCAL_LENGTH,

            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            requirement: "finite and positive",
            value,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            requirement: "finite and non-negative",
            value,
        })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            requirement: "finite",
            value,
        })
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.init_lane >= self.lanes {
            return Err(ConfigError::InitialLaneOutOfRange {
                lane: self.init_lane,
                lanes: self.lanes,
            });
        }

        positive("lane_width", self.lane_width)?;
        positive("x_speed", self.x_speed)?;
        positive("gravity", self.gravity)?;
        if !(self.jump_speed.is_finite() && self.jump_speed < 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "jump_speed",
                requirement: "finite and negative",
                value: self.jump_speed,
            });
        }
        finite("runner_z", self.runner_z)?;
        non_negative("damage_cooldown", self.damage_cooldown)?;

        positive("base_speed", self.base_speed)?;
        non_negative("speed_accel", self.speed_accel)?;

        if self.spawn_batch == 0 {
            return Err(ConfigError::InvalidValue {
                field: "spawn_batch",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        if self.spawn_redirect_every == 0 {
            return Err(ConfigError::InvalidValue {
                field: "spawn_redirect_every",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        finite("spawn_first_z", self.spawn_first_z)?;
        positive("spawn_gap", self.spawn_gap)?;
        if !(0.0..=1.0).contains(&self.hazard_chance) {
            return Err(ConfigError::InvalidValue {
                field: "hazard_chance",
                requirement: "between 0 and 1",
                value: self.hazard_chance,
            });
        }
        finite("elevated_y", self.elevated_y)?;

        non_negative("collect_radius", self.collect_radius)?;
        non_negative("hazard_dx", self.hazard_dx)?;
        non_negative("hazard_dy", self.hazard_dy)?;
        non_negative("hazard_dz", self.hazard_dz)?;
        finite("retire_z", self.retire_z)?;
        if self.retire_z >= self.runner_z {
            return Err(ConfigError::InvalidValue {
                field: "retire_z",
                requirement: "behind runner_z",
                value: self.retire_z,
            });
        }
        positive("death_duration", self.death_duration)?;

        positive("level_length", self.level_length)?;
        if self.max_level == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_level",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        non_negative("finish_stop_margin", self.finish_stop_margin)?;
        positive("finish_ramp_distance", self.finish_ramp_distance)?;
        if !(self.finish_min_speed_fraction > 0.0 && self.finish_min_speed_fraction <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "finish_min_speed_fraction",
                requirement: "in (0, 1]",
                value: self.finish_min_speed_fraction,
            });
        }

        finite("camera_angle_deg", self.camera_angle_deg)?;
        positive("focal_length", self.focal_length)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "lanes": 5, "init_lane": 2 }"#).unwrap();
        assert_eq!(tuning.lanes, 5);
        assert_eq!(tuning.init_lane, 2);
        assert_eq!(tuning.lane_width, LANE_WIDTH);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            Tuning::from_json(r#"{ "lanes": 0 }"#),
            Err(ConfigError::NoLanes)
        );
        assert_eq!(
            Tuning::from_json(r#"{ "init_lane": 3 }"#),
            Err(ConfigError::InitialLaneOutOfRange { lane: 3, lanes: 3 })
        );
        assert!(matches!(
            Tuning::from_json(r#"{ "jump_speed": 10.0 }"#),
            Err(ConfigError::InvalidValue { field: "jump_speed", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "hazard_chance": 1.5 }"#),
            Err(ConfigError::InvalidValue { field: "hazard_chance", .. })
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
