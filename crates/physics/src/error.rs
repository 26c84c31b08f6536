use std::path::PathBuf;

use thiserror::Error;

use crate::types::{BodyId, DebugParamId, JointIndex};

#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("URDF parse error: {0}")]
    UrdfParse(String),
    #[error("robot description has no root link")]
    NoRootLink,
    #[error("joint {joint} references unknown link {link}")]
    UnknownLink { joint: String, link: String },
    #[error("link {link} {reason}")]
    InvalidTree { link: String, reason: &'static str },
    #[error("joint {joint} has unsupported type {kind}")]
    UnsupportedJoint { joint: String, kind: String },
    #[error("link {link} has unsupported geometry {kind}")]
    UnsupportedGeometry { link: String, kind: String },
    #[error("unknown body {0}")]
    UnknownBody(BodyId),
    #[error("body {body} has no joint {joint}")]
    UnknownJoint { body: BodyId, joint: JointIndex },
    #[error("unknown debug parameter {0}")]
    UnknownDebugParameter(DebugParamId),
}
