use std::path::PathBuf;

use physics::PhysicsError;
use render::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("physics: {0}")]
    Physics(#[from] PhysicsError),

    #[error("recording: {0}")]
    Record(#[from] RecordError),

    #[error("robot has no joint named {0:?}")]
    MissingJoint(&'static str),

    #[error("frame recording is disabled for this environment")]
    RecordingDisabled,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("cannot read configuration {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_joint_names_the_joint() {
        assert_eq!(
            EnvError::MissingJoint("human").to_string(),
            "robot has no joint named \"human\""
        );
    }

    #[test]
    fn physics_errors_convert() {
        let err: EnvError = PhysicsError::NoRootLink.into();
        assert!(matches!(err, EnvError::Physics(PhysicsError::NoRootLink)));
    }
}
