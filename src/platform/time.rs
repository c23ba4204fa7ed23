//! Frame clock: host timestamps in, clamped delta-time out

use crate::consts::MAX_FRAME_DT;

/// Turns monotonically increasing millisecond timestamps into frame deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`.
    /// The first call returns 0. A long gap (suspended tab) is cut to
    /// `max_dt` instead of teleporting the world.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        // Keep the newest timestamp even if the host went backwards
        self.last_ms = Some(self.last_ms.map_or(now_ms, |last| last.max(now_ms)));

        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Forget the previous timestamp (after restart or resume)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_ms
    }
}
