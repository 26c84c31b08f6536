//! URDF robot descriptions, parsed with `urdf-rs`.
//!
//! Only what the engine consumes is kept: link inertia, collision shapes, a
//! display color per link, and the joint tree. Joints stay in file order so
//! that joint indices match the order in which they are declared.

// urdf-rs works in f64; the engine runs in f32.
#![allow(clippy::cast_possible_truncation)]

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rapier3d::prelude::{Isometry, Real};

use crate::error::PhysicsError;
use crate::transform::origin_to_isometry;
use crate::types::JointKind;

#[derive(Clone, Debug)]
pub struct RobotDescription {
    pub name: String,
    pub links: Vec<LinkDescription>,
    pub joints: Vec<JointDescription>,
    pub root_link: String,
}

#[derive(Clone, Debug)]
pub struct LinkDescription {
    pub name: String,
    /// `None` when the URDF declares no positive mass; the engine then derives
    /// mass from the collision shapes.
    pub inertial: Option<Inertial>,
    pub collisions: Vec<CollisionShape>,
    pub color: Option<[f32; 4]>,
}

#[derive(Clone, Debug)]
pub struct Inertial {
    pub origin: Origin,
    pub mass: f32,
    /// Diagonal of the inertia tensor (`ixx`, `iyy`, `izz`).
    pub principal_inertia: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct CollisionShape {
    pub origin: Origin,
    pub geometry: Geometry,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Geometry {
    Box { half_extents: [f32; 3] },
    Sphere { radius: f32 },
    /// Axis along the link's local Z, as in URDF.
    Cylinder { radius: f32, length: f32 },
    /// Axis along the link's local Z, as in URDF.
    Capsule { radius: f32, length: f32 },
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Origin {
    pub xyz: [f32; 3],
    pub rpy: [f32; 3],
}

impl Origin {
    #[must_use]
    pub fn isometry(&self) -> Isometry<Real> {
        origin_to_isometry(self.xyz, self.rpy)
    }
}

#[derive(Clone, Debug)]
pub struct JointDescription {
    pub name: String,
    pub kind: JointKind,
    pub parent: String,
    pub child: String,
    /// Pose of the child link frame in the parent link frame.
    pub origin: Origin,
    /// Joint axis in the child link frame.
    pub axis: [f32; 3],
    pub lower: Option<f32>,
    pub upper: Option<f32>,
    pub effort: f32,
    pub velocity: f32,
}

impl RobotDescription {
    #[must_use]
    pub fn link(&self, name: &str) -> Option<&LinkDescription> {
        self.links.iter().find(|l| l.name == name)
    }

    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&JointDescription> {
        self.joints.iter().find(|j| j.name == name)
    }
}

/// Parses a URDF file from disk.
///
/// # Errors
///
/// Returns [`PhysicsError::Io`] if the file cannot be read, and any error of
/// [`parse_str`].
pub fn parse_file(path: &Path) -> Result<RobotDescription, PhysicsError> {
    let xml = std::fs::read_to_string(path).map_err(|source| PhysicsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&xml)
}

/// Parses a URDF document.
///
/// # Errors
///
/// Returns [`PhysicsError::UrdfParse`] for malformed XML and the structural
/// errors ([`PhysicsError::UnsupportedJoint`], [`PhysicsError::UnsupportedGeometry`],
/// [`PhysicsError::UnknownLink`], [`PhysicsError::NoRootLink`],
/// [`PhysicsError::InvalidTree`]) for documents
/// the engine cannot build.
pub fn parse_str(xml: &str) -> Result<RobotDescription, PhysicsError> {
    let robot =
        urdf_rs::read_from_string(xml).map_err(|e| PhysicsError::UrdfParse(e.to_string()))?;
    convert_robot(&robot)
}

fn convert_robot(robot: &urdf_rs::Robot) -> Result<RobotDescription, PhysicsError> {
    let materials: HashMap<&str, [f32; 4]> = robot
        .materials
        .iter()
        .filter_map(|m| m.color.as_ref().map(|c| (m.name.as_str(), rgba(&c.rgba))))
        .collect();

    let links = robot
        .links
        .iter()
        .map(|l| convert_link(l, &materials))
        .collect::<Result<Vec<_>, _>>()?;
    let joints = robot
        .joints
        .iter()
        .map(convert_joint)
        .collect::<Result<Vec<_>, _>>()?;

    let names: HashSet<&str> = links.iter().map(|l| l.name.as_str()).collect();
    for joint in &joints {
        for link in [&joint.parent, &joint.child] {
            if !names.contains(link.as_str()) {
                return Err(PhysicsError::UnknownLink {
                    joint: joint.name.clone(),
                    link: link.clone(),
                });
            }
        }
    }

    let mut children: HashSet<&str> = HashSet::new();
    for joint in &joints {
        if !children.insert(joint.child.as_str()) {
            return Err(PhysicsError::InvalidTree {
                link: joint.child.clone(),
                reason: "has more than one parent joint",
            });
        }
    }
    let root_link = links
        .iter()
        .find(|l| !children.contains(l.name.as_str()))
        .ok_or(PhysicsError::NoRootLink)?
        .name
        .clone();

    // With one parent per link, anything the root cannot reach is either a
    // second root or part of a joint loop.
    let mut reached: HashSet<&str> = HashSet::from([root_link.as_str()]);
    let mut queue = vec![root_link.as_str()];
    while let Some(parent) = queue.pop() {
        for joint in joints.iter().filter(|j| j.parent == parent) {
            if reached.insert(joint.child.as_str()) {
                queue.push(joint.child.as_str());
            }
        }
    }
    if let Some(stray) = links.iter().find(|l| !reached.contains(l.name.as_str())) {
        return Err(PhysicsError::InvalidTree {
            link: stray.name.clone(),
            reason: "is not reachable from the root link",
        });
    }

    Ok(RobotDescription {
        name: robot.name.clone(),
        links,
        joints,
        root_link,
    })
}

fn convert_link(
    link: &urdf_rs::Link,
    materials: &HashMap<&str, [f32; 4]>,
) -> Result<LinkDescription, PhysicsError> {
    let inertial = (link.inertial.mass.value > 0.0).then(|| {
        let i = &link.inertial.inertia;
        Inertial {
            origin: convert_pose(&link.inertial.origin),
            mass: link.inertial.mass.value as f32,
            principal_inertia: [i.ixx as f32, i.iyy as f32, i.izz as f32],
        }
    });

    let collisions = link
        .collision
        .iter()
        .map(|c| {
            Ok(CollisionShape {
                origin: convert_pose(&c.origin),
                geometry: convert_geometry(&link.name, &c.geometry)?,
            })
        })
        .collect::<Result<Vec<_>, PhysicsError>>()?;

    // Inline colors win over named materials declared at robot level.
    let color = link.visual.iter().find_map(|v| {
        let material = v.material.as_ref()?;
        material
            .color
            .as_ref()
            .map(|c| rgba(&c.rgba))
            .or_else(|| materials.get(material.name.as_str()).copied())
    });

    Ok(LinkDescription {
        name: link.name.clone(),
        inertial,
        collisions,
        color,
    })
}

fn convert_joint(joint: &urdf_rs::Joint) -> Result<JointDescription, PhysicsError> {
    let kind = match joint.joint_type {
        urdf_rs::JointType::Revolute => JointKind::Revolute,
        urdf_rs::JointType::Continuous => JointKind::Continuous,
        urdf_rs::JointType::Prismatic => JointKind::Prismatic,
        urdf_rs::JointType::Fixed => JointKind::Fixed,
        urdf_rs::JointType::Floating => return Err(unsupported_joint(joint, "floating")),
        urdf_rs::JointType::Planar => return Err(unsupported_joint(joint, "planar")),
        urdf_rs::JointType::Spherical => return Err(unsupported_joint(joint, "spherical")),
    };

    // urdf-rs reports 0..0 for joints declared without position limits.
    let limit = &joint.limit;
    let limited = kind != JointKind::Continuous && (limit.upper - limit.lower).abs() > f64::EPSILON;

    Ok(JointDescription {
        name: joint.name.clone(),
        kind,
        parent: joint.parent.link.clone(),
        child: joint.child.link.clone(),
        origin: convert_pose(&joint.origin),
        axis: vec3(&joint.axis.xyz),
        lower: limited.then_some(limit.lower as f32),
        upper: limited.then_some(limit.upper as f32),
        effort: limit.effort as f32,
        velocity: limit.velocity as f32,
    })
}

fn unsupported_joint(joint: &urdf_rs::Joint, kind: &str) -> PhysicsError {
    PhysicsError::UnsupportedJoint {
        joint: joint.name.clone(),
        kind: kind.to_owned(),
    }
}

fn convert_geometry(link: &str, geometry: &urdf_rs::Geometry) -> Result<Geometry, PhysicsError> {
    Ok(match geometry {
        urdf_rs::Geometry::Box { size } => {
            let s = vec3(size);
            Geometry::Box {
                half_extents: [s[0] * 0.5, s[1] * 0.5, s[2] * 0.5],
            }
        }
        urdf_rs::Geometry::Sphere { radius } => Geometry::Sphere {
            radius: *radius as f32,
        },
        urdf_rs::Geometry::Cylinder { radius, length } => Geometry::Cylinder {
            radius: *radius as f32,
            length: *length as f32,
        },
        urdf_rs::Geometry::Capsule { radius, length } => Geometry::Capsule {
            radius: *radius as f32,
            length: *length as f32,
        },
        urdf_rs::Geometry::Mesh { filename, .. } => {
            return Err(PhysicsError::UnsupportedGeometry {
                link: link.to_owned(),
                kind: format!("mesh ({filename})"),
            })
        }
    })
}

fn convert_pose(pose: &urdf_rs::Pose) -> Origin {
    Origin {
        xyz: vec3(&pose.xyz),
        rpy: vec3(&pose.rpy),
    }
}

const fn vec3(v: &[f64; 3]) -> [f32; 3] {
    [v[0] as f32, v[1] as f32, v[2] as f32]
}

const fn rgba(v: &[f64; 4]) -> [f32; 4] {
    [v[0] as f32, v[1] as f32, v[2] as f32, v[3] as f32]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_JOINT_URDF: &str = r#"
        <robot name="cart">
            <material name="blue">
                <color rgba="0 0 1 1"/>
            </material>
            <link name="base">
                <inertial>
                    <mass value="2.0"/>
                    <inertia ixx="0.1" ixy="0" ixz="0" iyy="0.2" iyz="0" izz="0.3"/>
                </inertial>
                <visual>
                    <geometry><box size="0.2 0.4 0.6"/></geometry>
                    <material name="blue"/>
                </visual>
                <collision>
                    <geometry><box size="0.2 0.4 0.6"/></geometry>
                </collision>
            </link>
            <link name="roller">
                <collision>
                    <origin xyz="0 0 0" rpy="1.5708 0 0"/>
                    <geometry><cylinder radius="0.1" length="0.05"/></geometry>
                </collision>
            </link>
            <link name="slider"/>
            <joint name="spin" type="continuous">
                <parent link="base"/>
                <child link="roller"/>
                <origin xyz="0 0 -0.3" rpy="0 0 0"/>
                <axis xyz="0 1 0"/>
            </joint>
            <joint name="slide" type="prismatic">
                <parent link="base"/>
                <child link="slider"/>
                <axis xyz="1 0 0"/>
                <limit lower="-0.1" upper="0.1" effort="20" velocity="1"/>
            </joint>
        </robot>
    "#;

    #[test]
    fn parse_joint_tree_in_file_order() {
        let robot = parse_str(TWO_JOINT_URDF).unwrap();
        assert_eq!(robot.name, "cart");
        assert_eq!(robot.root_link, "base");
        let names: Vec<_> = robot.joints.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, ["spin", "slide"]);
    }

    #[test]
    fn joint_kinds_and_limits() {
        let robot = parse_str(TWO_JOINT_URDF).unwrap();
        let spin = robot.joint("spin").unwrap();
        assert_eq!(spin.kind, JointKind::Continuous);
        assert_eq!(spin.lower, None);
        assert_eq!(spin.axis, [0.0, 1.0, 0.0]);
        assert!((spin.origin.xyz[2] + 0.3).abs() < 1e-6);

        let slide = robot.joint("slide").unwrap();
        assert_eq!(slide.kind, JointKind::Prismatic);
        assert!((slide.lower.unwrap() + 0.1).abs() < 1e-6);
        assert!((slide.upper.unwrap() - 0.1).abs() < 1e-6);
        assert!((slide.effort - 20.0).abs() < 1e-6);
    }

    #[test]
    fn link_inertia_geometry_and_color() {
        let robot = parse_str(TWO_JOINT_URDF).unwrap();
        let base = robot.link("base").unwrap();
        let inertial = base.inertial.as_ref().unwrap();
        assert!((inertial.mass - 2.0).abs() < 1e-6);
        let expected = [0.1, 0.2, 0.3];
        for (got, want) in inertial.principal_inertia.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }
        let Geometry::Box { half_extents } = base.collisions[0].geometry else {
            panic!("expected a box collision shape");
        };
        for (got, want) in half_extents.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }
        assert_eq!(base.color, Some([0.0, 0.0, 1.0, 1.0]));

        let slider = robot.link("slider").unwrap();
        assert!(slider.inertial.is_none());
        assert!(slider.collisions.is_empty());
    }

    #[test]
    fn mesh_geometry_is_rejected() {
        let xml = r#"
            <robot name="meshy">
                <link name="base">
                    <collision><geometry><mesh filename="body.stl"/></geometry></collision>
                </link>
            </robot>
        "#;
        assert!(matches!(
            parse_str(xml),
            Err(PhysicsError::UnsupportedGeometry { link, .. }) if link == "base"
        ));
    }

    #[test]
    fn floating_joint_is_rejected() {
        let xml = r#"
            <robot name="free">
                <link name="a"/>
                <link name="b"/>
                <joint name="float" type="floating">
                    <parent link="a"/>
                    <child link="b"/>
                </joint>
            </robot>
        "#;
        assert!(matches!(
            parse_str(xml),
            Err(PhysicsError::UnsupportedJoint { joint, .. }) if joint == "float"
        ));
    }

    #[test]
    fn dangling_joint_is_rejected() {
        let xml = r#"
            <robot name="dangling">
                <link name="a"/>
                <joint name="j" type="fixed">
                    <parent link="a"/>
                    <child link="ghost"/>
                </joint>
            </robot>
        "#;
        assert!(matches!(
            parse_str(xml),
            Err(PhysicsError::UnknownLink { link, .. }) if link == "ghost"
        ));
    }

    #[test]
    fn invalid_xml() {
        assert!(matches!(
            parse_str("<robot"),
            Err(PhysicsError::UrdfParse(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            parse_file(Path::new("/nonexistent/robot.urdf")),
            Err(PhysicsError::Io { .. })
        ));
    }

    #[test]
    fn link_with_two_parents_is_rejected() {
        let xml = r#"
            <robot name="loop">
                <link name="body"/>
                <link name="wheel"/>
                <link name="human"/>
                <joint name="wheel" type="continuous">
                    <parent link="body"/>
                    <child link="wheel"/>
                </joint>
                <joint name="human" type="prismatic">
                    <parent link="wheel"/>
                    <child link="human"/>
                    <limit lower="-0.1" upper="0.1" effort="10" velocity="1"/>
                </joint>
                <joint name="back" type="fixed">
                    <parent link="human"/>
                    <child link="wheel"/>
                </joint>
            </robot>
        "#;
        assert!(matches!(
            parse_str(xml),
            Err(PhysicsError::InvalidTree { link, .. }) if link == "wheel"
        ));
    }

    #[test]
    fn detached_joint_loop_is_rejected() {
        let xml = r#"
            <robot name="island">
                <link name="base"/>
                <link name="a"/>
                <link name="b"/>
                <joint name="ab" type="fixed">
                    <parent link="a"/>
                    <child link="b"/>
                </joint>
                <joint name="ba" type="fixed">
                    <parent link="b"/>
                    <child link="a"/>
                </joint>
            </robot>
        "#;
        assert!(matches!(
            parse_str(xml),
            Err(PhysicsError::InvalidTree { reason, .. }) if reason.contains("not reachable")
        ));
    }
}
