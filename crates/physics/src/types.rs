use std::fmt;

use crate::transform;

/// Handle of a body loaded into a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Index into a body's joint array. Joint `i` drives link `i`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointIndex(pub usize);

impl fmt::Display for JointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "joint#{}", self.0)
    }
}

/// Handle of a registered debug slider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DebugParamId(pub usize);

impl fmt::Display for DebugParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "param#{}", self.0)
    }
}

/// How a session was opened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Interactive session, meant to be watched and driven through sliders.
    Gui,
    /// Headless session.
    Direct,
}

/// Frame in which an external force or torque vector is expressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ForceFrame {
    /// Local frame of the link the torque is applied to.
    Link,
    /// World frame.
    World,
}

/// World-frame position and orientation of a body's root frame.
///
/// The quaternion is stored as `[x, y, z, w]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    pub position: [f32; 3],
    pub orientation: [f32; 4],
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: [0.0, 0.0, 0.0],
        orientation: [0.0, 0.0, 0.0, 1.0],
    };

    #[must_use]
    pub const fn new(position: [f32; 3], orientation: [f32; 4]) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Builds a pose from a position and roll/pitch/yaw angles in radians.
    #[must_use]
    pub fn from_euler(position: [f32; 3], rpy: [f32; 3]) -> Self {
        Self {
            position,
            orientation: transform::quaternion_from_euler(rpy),
        }
    }

    /// Orientation as roll/pitch/yaw angles in radians.
    #[must_use]
    pub fn euler(&self) -> [f32; 3] {
        transform::euler_from_quaternion(self.orientation)
    }

    /// Euclidean distance from the pose's position to `point`.
    #[must_use]
    pub fn distance_to(&self, point: [f32; 3]) -> f32 {
        let dx = point[0] - self.position[0];
        let dy = point[1] - self.position[1];
        let dz = point[2] - self.position[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Kind of a robot joint, mirroring the URDF joint types the engine supports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JointKind {
    Revolute,
    Continuous,
    Prismatic,
    Fixed,
}

impl JointKind {
    #[must_use]
    pub const fn is_actuated(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous | Self::Prismatic)
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
        };
        f.write_str(name)
    }
}

/// Static metadata of one joint of a loaded body.
#[derive(Clone, Debug, PartialEq)]
pub struct JointInfo {
    pub index: JointIndex,
    pub name: String,
    pub kind: JointKind,
    pub parent_link: String,
    pub child_link: String,
    /// Lower position limit (rad or m). `None` means unbounded.
    pub lower: Option<f32>,
    /// Upper position limit (rad or m). `None` means unbounded.
    pub upper: Option<f32>,
    /// Force or torque cap of the position servo.
    pub max_force: f32,
    /// Speed limit of the position servo: each command moves the target at
    /// most `max_velocity * dt` from the current position. Externally applied
    /// torques are not limited. 0 means unlimited.
    pub max_velocity: f32,
}

/// Generalized position and velocity of a joint.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JointState {
    pub position: f32,
    pub velocity: f32,
}

/// Pinhole camera used for frame capture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Rays that travel further than this see the sky.
    pub far: f32,
}

impl CameraConfig {
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 320,
            eye: [1.2, -2.4, 1.1],
            target: [1.0, 0.0, 0.25],
            up: [0.0, 0.0, 1.0],
            fov_y: 60.0,
            far: 100.0,
        }
    }
}

/// Raw RGBA8 pixels of a captured frame, row-major from the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl CameraImage {
    /// Creates an image filled with a single color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            rgba: color.repeat(pixels),
        }
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
