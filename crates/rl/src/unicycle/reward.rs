//! Reward and termination. Pure functions of the poses and thresholds.

use physics::Pose;

/// `-1` when the robot moved away from the goal or sits below
/// `penalty_height`, otherwise `+1`. Standing still counts as progress.
#[must_use]
pub fn reward(goal: [f32; 3], previous: &Pose, current: &Pose, penalty_height: f32) -> f32 {
    let previous_distance = previous.distance_to(goal);
    let current_distance = current.distance_to(goal);
    if previous_distance < current_distance || current.position[2] < penalty_height {
        -1.0
    } else {
        1.0
    }
}

#[must_use]
pub fn is_done(current: [f32; 3], fall_height: f32) -> bool {
    current[2] < fall_height
}
