//! Narrative gates
//!
//! A run carries a fixed, ordered sequence of gates. Each gate sits at a
//! forward distance and offers two answers, each tagged with a lane. When the
//! runner's distance reaches the next pending gate, the runner's lane picks
//! the answer and the gate is done for good.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Which of a gate's two options was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Left,
    Right,
}

impl OptionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSide::Left => "left",
            OptionSide::Right => "right",
        }
    }
}

/// One answer of a gate, chosen by being in `lane`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOption {
    pub lane: u8,
    pub label: String,
}

/// A narrative checkpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    /// Forward distance at which the gate is crossed
    pub threshold: f32,
    pub question: String,
    pub left: GateOption,
    pub right: GateOption,
}

impl Gate {
    pub fn option(&self, side: OptionSide) -> &GateOption {
        match side {
            OptionSide::Left => &self.left,
            OptionSide::Right => &self.right,
        }
    }

    /// Pick the option for a lane. The bool is true when the lane matched
    /// neither option and the answer fell back to left.
    pub fn resolve(&self, lane: u8) -> (OptionSide, bool) {
        if lane == self.left.lane {
            (OptionSide::Left, false)
        } else if lane == self.right.lane {
            (OptionSide::Right, false)
        } else {
            (OptionSide::Left, true)
        }
    }
}

/// A recorded answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub gate_id: u32,
    pub lane: u8,
    pub option: OptionSide,
    /// Lane matched neither option
    pub fallback: bool,
}

/// Append-only record of the answers given during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSession {
    choices: Vec<Choice>,
}

impl NarrativeSession {
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub(crate) fn record(&mut self, choice: Choice) {
        self.choices.push(choice);
    }
}

/// The gate sequence plus the cursor over it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateTrack {
    gates: Vec<Gate>,
    /// Index of the next pending gate; equals `gates.len()` once complete
    cursor: usize,
    /// Scrolling z of each gate's marker, for drawing only
    marker_z: Vec<f32>,
}

impl GateTrack {
    pub fn new(gates: Vec<Gate>, tuning: &Tuning) -> Self {
        let marker_z = gates
            .iter()
            .map(|g| tuning.runner_z + g.threshold)
            .collect();
        Self {
            gates,
            cursor: 0,
            marker_z,
        }
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.gates.len()
    }

    /// Pending gates with their current marker z
    pub fn pending_markers(&self) -> impl Iterator<Item = (&Gate, f32)> {
        self.gates[self.cursor..]
            .iter()
            .zip(self.marker_z[self.cursor..].iter().copied())
    }

    /// Passive forward motion, same as world entities
    pub fn scroll(&mut self, travel: f32) {
        for z in &mut self.marker_z {
            *z -= travel;
        }
    }

    /// Resolve the next pending gate if `distance` has reached it.
    /// At most one gate is resolved per call.
    pub fn check_crossing(&mut self, distance: f32, lane: u8) -> Option<Choice> {
        let gate = self.gates.get(self.cursor)?;
        if distance < gate.threshold {
            return None;
        }
        let (option, fallback) = gate.resolve(lane);
        let choice = Choice {
            gate_id: gate.id,
            lane,
            option,
            fallback,
        };
        self.cursor += 1;
        Some(choice)
    }
}

/// Gate step of the tick: scroll markers, then record a crossing if any.
/// Crossings are judged at the distance reached after this tick's travel,
/// in step with the scrolled markers.
pub fn update_gates(state: &mut GameState, travel: f32) {
    state.gates.scroll(travel);

    let lane = state.runner.lane;
    let reached = state.progress.distance + travel;
    let Some(choice) = state.gates.check_crossing(reached, lane) else {
        return;
    };

    if choice.fallback {
        log::warn!(
            "Gate {}: lane {} matches neither option, defaulting to left",
            choice.gate_id,
            lane
        );
    } else {
        log::info!(
            "Gate {} crossed in lane {} -> {}",
            choice.gate_id,
            lane,
            choice.option.as_str()
        );
    }

    state.events.push(GameEvent::GateCrossed {
        gate_id: choice.gate_id,
        side: choice.option,
        lane,
        fallback: choice.fallback,
    });
    state.narrative.record(choice);
}

/// Check a gate sequence against the lane layout
pub fn validate_gates(gates: &[Gate], lanes: u8) -> Result<(), ConfigError> {
    if gates.is_empty() {
        return Err(ConfigError::NoGates);
    }

    let mut previous: Option<f32> = None;
    for (i, gate) in gates.iter().enumerate() {
        if gates[..i].iter().any(|g| g.id == gate.id) {
            return Err(ConfigError::DuplicateGate { gate_id: gate.id });
        }
        if gate.question.trim().is_empty() {
            return Err(ConfigError::EmptyQuestion { gate_id: gate.id });
        }
        for option in [&gate.left, &gate.right] {
            if option.lane >= lanes {
                return Err(ConfigError::GateLaneOutOfRange {
                    gate_id: gate.id,
                    lane: option.lane,
                    lanes,
                });
            }
        }
        if gate.left.lane == gate.right.lane {
            return Err(ConfigError::GateLanesNotDistinct {
                gate_id: gate.id,
                lane: gate.left.lane,
            });
        }
        if !(gate.threshold.is_finite() && gate.threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold {
                gate_id: gate.id,
                threshold: gate.threshold,
            });
        }
        if let Some(prev) = previous {
            if gate.threshold <= prev {
                return Err(ConfigError::ThresholdsNotIncreasing {
                    gate_id: gate.id,
                    threshold: gate.threshold,
                    previous: prev,
                });
            }
        }
        previous = Some(gate.threshold);
    }
    Ok(())
}

/// Parse and validate a JSON array of gates
pub fn gates_from_json(json: &str, lanes: u8) -> Result<Vec<Gate>, ConfigError> {
    let gates: Vec<Gate> = serde_json::from_str(json)?;
    validate_gates(&gates, lanes)?;
    Ok(gates)
}

fn gate(id: u32, threshold: f32, question: &str, left: (u8, &str), right: (u8, &str)) -> Gate {
    Gate {
        id,
        threshold,
        question: question.to_string(),
        left: GateOption {
            lane: left.0,
            label: left.1.to_string(),
        },
        right: GateOption {
            lane: right.0,
            label: right.1.to_string(),
        },
    }
}

/// Built-in storyline for a 3-lane road
pub fn default_gates() -> Vec<Gate> {
    vec![
        gate(
            1,
            3000.0,
            "The road splits at the old mill. Which way?",
            (0, "Through the pine forest"),
            (2, "Along the river"),
        ),
        gate(
            2,
            7600.0,
            "A stranger asks you to carry a letter. Do you?",
            (0, "Take the letter"),
            (2, "Keep running"),
        ),
        gate(
            3,
            12000.0,
            "The city gates are in sight. How do you arrive?",
            (0, "Quietly, by the side gate"),
            (2, "Loudly, through the main square"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Steer, TickInput, tick};

    fn track() -> GateTrack {
        GateTrack::new(default_gates(), &Tuning::default())
    }

    #[test]
    fn test_default_gates_are_valid() {
        assert_eq!(validate_gates(&default_gates(), 3), Ok(()));
    }

    #[test]
    fn test_crossing_exactly_at_threshold_in_left_lane() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning, default_gates());
        state.progress.level = 1; // skip the initial spawn
        state.progress.distance = 3000.0;
        state.runner.lane = 0;

        tick(&mut state, &tuning, &TickInput::default(), 0.0);

        let choices = state.narrative.choices();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].gate_id, 1);
        assert_eq!(choices[0].option, OptionSide::Left);
        assert_eq!(choices[0].option.as_str(), "left");
        assert!(!choices[0].fallback);
        assert_eq!(state.gates.cursor(), 1);
    }

    #[test]
    fn test_crossing_uses_lane_of_the_crossing_tick() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning, default_gates());
        state.progress.level = 1; // skip the initial spawn
        state.progress.distance = 2990.0;
        state.gates.scroll(2990.0);
        state.runner.lane = 0;

        // 400 units/s for 0.05 s carries the runner past 3000 this tick
        tick(&mut state, &tuning, &TickInput::default(), 0.05);
        assert_eq!(state.narrative.len(), 1);
        assert_eq!(state.gates.cursor(), 1);

        // Steering away afterwards cannot change the recorded answer
        let steer = TickInput {
            steer: Some(Steer::Right),
            ..Default::default()
        };
        tick(&mut state, &tuning, &steer, 0.05);

        let choices = state.narrative.choices();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].lane, 0);
        assert_eq!(choices[0].option, OptionSide::Left);
        assert!(!choices[0].fallback);
    }

    #[test]
    fn test_right_lane_and_fallback() {
        let mut t = track();
        let choice = t.check_crossing(3000.0, 2).unwrap();
        assert_eq!(choice.option, OptionSide::Right);
        assert!(!choice.fallback);

        let choice = t.check_crossing(8000.0, 1).unwrap();
        assert_eq!(choice.option, OptionSide::Left);
        assert!(choice.fallback);
    }

    #[test]
    fn test_one_gate_per_check_and_never_revisited() {
        let mut t = track();
        assert!(t.check_crossing(2999.0, 0).is_none());
        assert_eq!(t.cursor(), 0);

        // Far past every threshold: still one at a time
        assert_eq!(t.check_crossing(1e9, 0).unwrap().gate_id, 1);
        assert_eq!(t.check_crossing(1e9, 0).unwrap().gate_id, 2);
        assert_eq!(t.check_crossing(1e9, 0).unwrap().gate_id, 3);
        assert!(t.is_complete());
        assert!(t.check_crossing(1e9, 0).is_none());
        assert_eq!(t.cursor(), 3);
    }

    #[test]
    fn test_markers_scroll_but_do_not_cross() {
        let mut t = track();
        t.scroll(5000.0);
        let (gate, z) = t.pending_markers().next().unwrap();
        assert_eq!(gate.id, 1);
        assert_eq!(z, -2000.0);
        assert_eq!(t.cursor(), 0);
    }

    #[test]
    fn test_validation_fails_fast() {
        let mut gates = default_gates();
        gates[1].right.lane = 3;
        assert_eq!(
            validate_gates(&gates, 3),
            Err(ConfigError::GateLaneOutOfRange {
                gate_id: 2,
                lane: 3,
                lanes: 3
            })
        );

        let mut gates = default_gates();
        gates[2].threshold = 100.0;
        assert!(matches!(
            validate_gates(&gates, 3),
            Err(ConfigError::ThresholdsNotIncreasing { gate_id: 3, .. })
        ));

        let mut gates = default_gates();
        gates[0].right.lane = 0;
        assert!(matches!(
            validate_gates(&gates, 3),
            Err(ConfigError::GateLanesNotDistinct { gate_id: 1, .. })
        ));

        let mut gates = default_gates();
        gates[2].id = 1;
        assert_eq!(
            validate_gates(&gates, 3),
            Err(ConfigError::DuplicateGate { gate_id: 1 })
        );

        assert_eq!(validate_gates(&[], 3), Err(ConfigError::NoGates));
    }

    #[test]
    fn test_gates_from_json() {
        let json = r#"[
            { "id": 9, "threshold": 50.0, "question": "Coffee or tea?",
              "left": { "lane": 0, "label": "Coffee" },
              "right": { "lane": 1, "label": "Tea" } }
        ]"#;
        let gates = gates_from_json(json, 2).unwrap();
        assert_eq!(gates[0].id, 9);
        assert_eq!(gates[0].right.label, "Tea");

        assert!(matches!(
            gates_from_json(json, 1),
            Err(ConfigError::GateLaneOutOfRange { .. })
        ));
    }
}
