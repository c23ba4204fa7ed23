//! Discrete lanes and their lateral positions

/// Lateral x of a lane's center. The middle lane sits at x = 0.
#[inline]
pub fn lane_to_x(lane: u8, lanes: u8, lane_width: f32) -> f32 {
    (lane as f32 - (lanes / 2) as f32) * lane_width
}

/// Valid neighbours of a lane, left first
pub fn adjacent_lanes(lane: u8, lanes: u8) -> impl Iterator<Item = u8> {
    let left = lane.checked_sub(1);
    let right = lane.checked_add(1).filter(|&l| l < lanes);
    left.into_iter().chain(right)
}

/// Move one lane left (`-1`) or right (`+1`), clamped to the road
pub fn step_lane(lane: u8, delta: i8, lanes: u8) -> u8 {
    let max = lanes.saturating_sub(1) as i16;
    (lane as i16 + delta as i16).clamp(0, max) as u8
}

/// Index of the center lane
#[inline]
pub fn center_lane(lanes: u8) -> u8 {
    lanes / 2
}
