//! Frame driver
//!
//! [`Game`] owns one run and turns host timestamps into ticks. Each frame it
//! drains buffered input, steps the simulation, forwards events to the audio
//! sink, hands a built frame to the renderer and, on completion, stores the
//! session record. Sink failures are logged and never stop the run.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::{AudioCue, AudioSink, cues_for_event};
use crate::error::{ConfigError, SinkError};
use crate::persistence::{PersistenceSink, SessionRecord};
use crate::platform::{FrameClock, InputBuffer, InputEvent};
use crate::renderer::{RenderSink, build_frame};
use crate::settings::Settings;
use crate::sim::{Gate, GameEvent, GamePhase, GameState, tick, validate_gates};
use crate::tuning::Tuning;

/// Collaborators a frame talks to
pub struct Sinks<'a> {
    pub renderer: &'a mut dyn RenderSink,
    pub audio: &'a mut dyn AudioSink,
    pub persistence: &'a mut dyn PersistenceSink,
}

/// Identity of the current run's session
#[derive(Debug, Clone, PartialEq)]
struct Session {
    id: String,
    start_time: f64,
}

pub struct Game {
    state: GameState,
    tuning: Tuning,
    /// Gate sequence for every run (restarts included)
    gates: Vec<Gate>,
    settings: Settings,
    clock: FrameClock,
    input: InputBuffer,
    base_seed: u64,
    /// Runs started so far, the current one included
    runs: u64,
    /// Opened on the first frame of each run
    session: Option<Session>,
    /// Record of this run already handed to persistence
    saved: bool,
}

fn warn_sink(what: &str, result: Result<(), SinkError>) {
    if let Err(e) = result {
        log::warn!("{} failed: {}", what, e);
    }
}

impl Game {
    /// Validate configuration and set up the first run
    pub fn new(
        seed: u64,
        tuning: Tuning,
        gates: Vec<Gate>,
        settings: Settings,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        validate_gates(&gates, tuning.lanes)?;

        let clock = FrameClock::new(tuning.max_frame_dt);
        let state = GameState::new(seed, &tuning, gates.clone());
        log::info!("Game created with seed {} and {} gates", seed, gates.len());

        Ok(Self {
            state,
            tuning,
            gates,
            settings,
            clock,
            input: InputBuffer::default(),
            base_seed: seed,
            runs: 1,
            session: None,
            saved: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Flip mute and persist the preference
    pub fn toggle_mute(&mut self) -> &Settings {
        self.settings.muted = !self.settings.muted;
        self.settings.save();
        log::info!("Audio {}", if self.settings.muted { "muted" } else { "unmuted" });
        &self.settings
    }

    /// ID of the current session, once its first frame ran
    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    /// Buffer an input event for the next frame
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Request a pause if the run is currently moving (focus loss, hidden tab).
    /// Returns true when a pause was requested.
    pub fn auto_pause(&mut self) -> bool {
        if self.state.phase == GamePhase::Running {
            self.input.push(InputEvent::Pause);
            true
        } else {
            false
        }
    }

    /// Seed for the n-th run
    fn run_seed(&self) -> u64 {
        self.base_seed ^ (self.runs - 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    fn open_session(&mut self, now_ms: f64) {
        let mut rng = Pcg32::seed_from_u64(self.state.seed ^ now_ms.to_bits());
        let id = format!("{:016x}", rng.next_u64());
        log::info!("Session {} started", id);
        self.session = Some(Session {
            id,
            start_time: now_ms,
        });
    }

    /// Replace the run wholesale between ticks
    fn restart(&mut self, audio: &mut dyn AudioSink) {
        warn_sink("Audio", audio.play(AudioCue::StopLoop));

        self.runs += 1;
        self.state = GameState::new(self.run_seed(), &self.tuning, self.gates.clone());
        self.clock.reset();
        self.session = None;
        self.saved = false;
        log::info!("Restarted (run {}, seed {})", self.runs, self.state.seed);
    }

    fn persist(&mut self, now_ms: f64, persistence: &mut dyn PersistenceSink) {
        if self.saved {
            return;
        }
        self.saved = true;

        let Some(session) = &self.session else {
            return;
        };
        let record = SessionRecord::from_session(
            session.id.clone(),
            session.start_time,
            now_ms,
            &self.state.gates,
            &self.state.narrative,
        );
        log::info!(
            "Run complete: {} answers, score {}",
            record.responses.len(),
            self.state.progress.score
        );
        warn_sink(
            "Persistence",
            persistence.store(&record.storage_key(), &record),
        );
    }

    /// Run one frame at host time `now_ms`. Returns the dt that was simulated.
    pub fn frame(&mut self, now_ms: f64, sinks: Sinks<'_>) -> f32 {
        let Sinks {
            renderer,
            audio,
            persistence,
        } = sinks;

        if self.input.take_mute_toggle() {
            audio.apply_settings(self.toggle_mute());
        }
        let (input, restart) = self.input.take();
        if restart {
            self.restart(audio);
        }
        if self.session.is_none() {
            self.open_session(now_ms);
        }

        let dt = self.clock.delta(now_ms);
        tick(&mut self.state, &self.tuning, &input, dt);

        let mut completed = false;
        for event in &self.state.events {
            for &cue in cues_for_event(event) {
                warn_sink("Audio", audio.play(cue));
            }
            completed |= *event == GameEvent::Completed;
        }
        if completed {
            self.persist(now_ms, persistence);
        }

        let frame = build_frame(&self.state, &self.tuning, self.settings.reduced_motion);
        warn_sink("Render", renderer.draw(&frame));

        dt
    }
}
