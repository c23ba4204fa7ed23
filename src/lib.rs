//! Gate Runner - A pseudo-3D lane runner with a branching storyline
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner physics, entities, gates, levels)
//! - `renderer`: Projection of simulation state into depth-sorted sprites
//! - `platform`: Frame clock and input mapping
//! - `persistence`: Session snapshots for narrative answers
//! - `audio`: Event-to-cue mapping and the Web Audio synthesizer
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance
//! - `game`: Frame driver tying the simulation to its collaborators

pub mod audio;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SinkError};
pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Number of lanes
    pub const LANES: u8 = 3;
    /// Lateral distance between lane centers
    pub const LANE_WIDTH: f32 = 142.0;
    /// Lane the runner starts in
    pub const INIT_LANE: u8 = 1;

    /// Runner physics
    pub const X_SPEED: f32 = 500.0;
    /// Negative is up
    pub const JUMP_SPEED: f32 = -450.0;
    pub const GRAVITY: f32 = 800.0;
    /// Runner's fixed forward coordinate
    pub const RUNNER_Z: f32 = 0.0;
    /// Seconds of hazard immunity after a hit
    pub const DAMAGE_COOLDOWN: f32 = 1.0;

    /// Forward scroll speed at the start of a run
    pub const BASE_SPEED: f32 = 400.0;
    /// Speed gained per second of running
    pub const SPEED_ACCEL: f32 = 4.0;

    /// Spawner layout
    pub const SPAWN_BATCH: usize = 30;
    pub const SPAWN_REDIRECT_EVERY: usize = 6;
    pub const SPAWN_FIRST_Z: f32 = 1000.0;
    pub const SPAWN_GAP: f32 = 120.0;
    pub const HAZARD_CHANCE: f32 = 0.3;
    /// Height of the elevated spawn row (negative is up)
    pub const ELEVATED_Y: f32 = -90.0;

    /// Collision
    pub const COLLECT_RADIUS: f32 = 30.0;
    pub const HAZARD_DX: f32 = 50.0;
    pub const HAZARD_DY: f32 = 40.0;
    pub const HAZARD_DZ: f32 = 20.0;
    /// Entities behind this z are retired
    pub const RETIRE_Z: f32 = -100.0;
    /// Seconds a dying entity stays visible
    pub const DEATH_DURATION: f32 = 0.5;

    /// Level layout
    pub const LEVEL_LENGTH: f32 = 4600.0;
    pub const MAX_LEVEL: u32 = 3;
    /// Finish marker stops the run this close to the runner
    pub const FINISH_STOP_MARGIN: f32 = 40.0;
    /// Speed begins ramping down this far from the runner
    pub const FINISH_RAMP_DISTANCE: f32 = 600.0;
    /// Minimum speed fraction during the ramp-down
    pub const FINISH_MIN_SPEED_FRACTION: f32 = 0.2;

    /// Camera
    pub const CAMERA_ANGLE_DEG: f32 = 60.0;
    pub const FOCAL_LENGTH: f32 = 600.0;

    /// Largest frame delta the clock will hand to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
}
