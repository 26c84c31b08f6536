use physics::Pose;

pub const OBSERVATION_SIZE: usize = 12;

/// Observation vector:
///
/// | index | value |
/// |-------|-------|
/// | 0..3  | goal minus base position |
/// | 3..7  | base orientation quaternion `x, y, z, w` |
/// | 7..10 | base orientation as roll, pitch, yaw |
/// | 10    | human joint position |
/// | 11    | wheel joint velocity |
#[must_use]
pub fn observation(goal: [f32; 3], pose: &Pose, human_position: f32, wheel_velocity: f32) -> Vec<f32> {
    let mut obs = Vec::with_capacity(OBSERVATION_SIZE);
    obs.extend(goal.iter().zip(&pose.position).map(|(g, p)| g - p));
    obs.extend_from_slice(&pose.orientation);
    obs.extend_from_slice(&pose.euler());
    obs.push(human_position);
    obs.push(wheel_velocity);
    obs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_at_start_pose() {
        let pose = Pose::new([0.0, 0.0, 0.3], [0.0, 0.0, 0.0, 1.0]);
        let obs = observation([5.0, 0.0, 0.3], &pose, 0.02, -1.5);
        assert_eq!(obs.len(), OBSERVATION_SIZE);
        assert_eq!(&obs[0..3], &[5.0, 0.0, 0.0]);
        assert_eq!(&obs[3..7], &[0.0, 0.0, 0.0, 1.0]);
        assert!(obs[7..10].iter().all(|a| a.abs() < 1e-6));
        assert_eq!(obs[10], 0.02);
        assert_eq!(obs[11], -1.5);
    }

    #[test]
    fn euler_block_matches_quaternion() {
        let pose = Pose::from_euler([1.0, 2.0, 0.5], [0.2, -0.1, 0.7]);
        let obs = observation([0.0; 3], &pose, 0.0, 0.0);
        assert_eq!(&obs[0..3], &[-1.0, -2.0, -0.5]);
        for (got, want) in obs[7..10].iter().zip([0.2, -0.1, 0.7]) {
            assert!((got - want).abs() < 1e-5, "{got} vs {want}");
        }
    }
}
