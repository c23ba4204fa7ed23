//! Audio cues and the Web Audio synthesizer
//!
//! The simulation only emits [`GameEvent`]s; [`cues_for_event`] turns them
//! into cues for an [`AudioSink`]. On the web, [`AudioManager`] synthesizes
//! every cue with oscillators - no external files needed.

use crate::error::SinkError;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound requests understood by every audio sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Coin picked up
    PlayCollect,
    /// Runner hit a hazard
    PlayHurt,
    /// Level cleared or course finished
    PlayLevelComplete,
    /// Start (or resume) the background loop
    StartLoop,
    /// Silence the loop without tearing it down
    PauseLoop,
    StopLoop,
}

/// Consumer of audio cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue) -> Result<(), SinkError>;

    /// Pick up changed volumes (mute toggles included)
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Cues triggered by one simulation event, in playback order
pub fn cues_for_event(event: &GameEvent) -> &'static [AudioCue] {
    match event {
        GameEvent::CoinCollected { .. } => &[AudioCue::PlayCollect],
        GameEvent::RunnerHit { .. } => &[AudioCue::PlayHurt],
        GameEvent::LevelStarted { level: 1 } => &[AudioCue::StartLoop],
        GameEvent::LevelStarted { .. } => &[AudioCue::PlayLevelComplete],
        GameEvent::Completed => &[AudioCue::PlayLevelComplete, AudioCue::StopLoop],
        GameEvent::Paused => &[AudioCue::PauseLoop],
        GameEvent::Resumed => &[AudioCue::StartLoop],
        GameEvent::Jumped | GameEvent::GateCrossed { .. } | GameEvent::FinishSpawned => &[],
    }
}

/// Sink that drops every cue (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: AudioCue) -> Result<(), SinkError> {
        log::trace!("audio cue {:?} (silent)", cue);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioSink};
    use crate::error::SinkError;
    use crate::settings::Settings;

    /// Base frequency of the background drone (Hz)
    const LOOP_FREQ: f32 = 110.0;
    /// Loop level relative to music volume
    const LOOP_GAIN: f32 = 0.12;

    fn js_err(e: wasm_bindgen::JsValue) -> SinkError {
        SinkError::Other(format!("{:?}", e))
    }

    /// Web Audio backend for [`AudioCue`]s
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        /// Running background oscillator and its gain stage
        background: Option<(OscillatorNode, GainNode)>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
                background: None,
            }
        }

        fn context(&self) -> Result<&AudioContext, SinkError> {
            let ctx = self
                .ctx
                .as_ref()
                .ok_or_else(|| SinkError::Unavailable("no AudioContext".to_string()))?;
            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Ok(ctx)
        }

        /// Create an oscillator routed through its own gain node
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), SinkError> {
            let osc = ctx.create_oscillator().map_err(js_err)?;
            let gain = ctx.create_gain().map_err(js_err)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(js_err)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(js_err)?;

            Ok((osc, gain))
        }

        /// Coin - rising three-note ding
        fn play_collect(ctx: &AudioContext, vol: f32) -> Result<(), SinkError> {
            for (i, freq) in [660.0, 880.0, 1100.0].iter().enumerate() {
                let (osc, gain) = Self::create_osc(ctx, *freq, OscillatorType::Sine)?;
                let t = ctx.current_time() + i as f64 * 0.06;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).map_err(js_err)?;
                osc.stop_with_when(t + 0.15).map_err(js_err)?;
            }
            Ok(())
        }

        /// Hazard - falling thump with a grit layer
        fn play_hurt(ctx: &AudioContext, vol: f32) -> Result<(), SinkError> {
            let t = ctx.current_time();

            let (osc, gain) = Self::create_osc(ctx, 180.0, OscillatorType::Sine)?;
            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                .ok();
            osc.start().map_err(js_err)?;
            osc.stop_with_when(t + 0.3).map_err(js_err)?;

            let (osc, gain) = Self::create_osc(ctx, 90.0, OscillatorType::Sawtooth)?;
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().map_err(js_err)?;
            osc.stop_with_when(t + 0.2).map_err(js_err)?;
            Ok(())
        }

        /// Level cleared - fanfare
        fn play_level_complete(ctx: &AudioContext, vol: f32) -> Result<(), SinkError> {
            for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                let (osc, gain) = Self::create_osc(ctx, *freq, OscillatorType::Triangle)?;
                let t = ctx.current_time() + i as f64 * 0.1;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).map_err(js_err)?;
                osc.stop_with_when(t + 0.5).map_err(js_err)?;
            }
            Ok(())
        }

        fn start_loop(&mut self) -> Result<(), SinkError> {
            let level = self.music_volume * LOOP_GAIN;
            let ctx = self.context()?;
            let t = ctx.current_time();

            if let Some((_, gain)) = &self.background {
                gain.gain().set_value_at_time(level, t).ok();
                return Ok(());
            }

            let (osc, gain) = Self::create_osc(ctx, LOOP_FREQ, OscillatorType::Triangle)?;
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(level, t + 0.5)
                .ok();
            osc.start().map_err(js_err)?;
            self.background = Some((osc, gain));
            Ok(())
        }

        fn pause_loop(&mut self) -> Result<(), SinkError> {
            let ctx = self.context()?;
            if let Some((_, gain)) = &self.background {
                gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
            }
            Ok(())
        }

        fn stop_loop(&mut self) -> Result<(), SinkError> {
            if let Some((osc, _)) = self.background.take() {
                osc.stop().map_err(js_err)?;
            }
            Ok(())
        }
    }

    impl AudioSink for AudioManager {
        fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
            if let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.background) {
                gain.gain()
                    .set_value_at_time(self.music_volume * LOOP_GAIN, ctx.current_time())
                    .ok();
            }
        }

        fn play(&mut self, cue: AudioCue) -> Result<(), SinkError> {
            let vol = self.sfx_volume;
            match cue {
                AudioCue::StartLoop => self.start_loop(),
                AudioCue::PauseLoop => self.pause_loop(),
                AudioCue::StopLoop => self.stop_loop(),
                _ if vol <= 0.0 => Ok(()),
                AudioCue::PlayCollect => Self::play_collect(self.context()?, vol),
                AudioCue::PlayHurt => Self::play_hurt(self.context()?, vol),
                AudioCue::PlayLevelComplete => Self::play_level_complete(self.context()?, vol),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::OptionSide;

    #[test]
    fn test_gameplay_cues() {
        assert_eq!(
            cues_for_event(&GameEvent::CoinCollected { entity_id: 4 }),
            &[AudioCue::PlayCollect]
        );
        assert_eq!(
            cues_for_event(&GameEvent::RunnerHit { entity_id: 4 }),
            &[AudioCue::PlayHurt]
        );
        assert!(cues_for_event(&GameEvent::Jumped).is_empty());
        assert!(
            cues_for_event(&GameEvent::GateCrossed {
                gate_id: 1,
                side: OptionSide::Left,
                lane: 0,
                fallback: false,
            })
            .is_empty()
        );
    }

    #[test]
    fn test_loop_follows_lifecycle() {
        assert_eq!(
            cues_for_event(&GameEvent::LevelStarted { level: 1 }),
            &[AudioCue::StartLoop]
        );
        assert_eq!(
            cues_for_event(&GameEvent::LevelStarted { level: 2 }),
            &[AudioCue::PlayLevelComplete]
        );
        assert_eq!(cues_for_event(&GameEvent::Paused), &[AudioCue::PauseLoop]);
        assert_eq!(cues_for_event(&GameEvent::Resumed), &[AudioCue::StartLoop]);
        assert_eq!(
            cues_for_event(&GameEvent::Completed),
            &[AudioCue::PlayLevelComplete, AudioCue::StopLoop]
        );
    }

    #[test]
    fn test_silent_sink_accepts_everything() {
        let mut sink = SilentAudio;
        assert!(sink.play(AudioCue::StopLoop).is_ok());
    }
}
