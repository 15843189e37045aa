//! Interfaces of the external scene renderer and the audio player

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// Value written to a named scene variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for SceneValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneValue::Number(n) => write!(f, "{}", n),
            SceneValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Transform axis on a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The animated scene, as far as navigation is concerned
pub trait SceneSink: Send {
    /// Write a named variable
    fn set_variable(&mut self, name: &str, value: SceneValue) -> Result<(), CollaboratorError>;

    /// Write one rotation component (radians) of a named object
    fn set_object_rotation(
        &mut self,
        object: &str,
        axis: Axis,
        radians: f32,
    ) -> Result<(), CollaboratorError>;
}

/// Narration playback. Loading is asynchronous on the other side; `play`
/// only has to accept the request.
pub trait AudioSink: Send {
    fn play(&mut self, asset_path: &str) -> Result<(), CollaboratorError>;

    fn stop(&mut self);
}
