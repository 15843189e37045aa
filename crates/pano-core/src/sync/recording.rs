//! Recording collaborators for tests

use std::sync::Arc;
use parking_lot::Mutex;

use super::{AudioSink, Axis, SceneSink, SceneValue};
use crate::error::CollaboratorError;

#[derive(Debug, Clone, PartialEq)]
pub enum SceneCall {
    Variable { name: String, value: SceneValue },
    Rotation { object: String, axis: Axis, radians: f32 },
}

/// Scene double; clones share the same call log
#[derive(Clone, Default)]
pub struct RecordingScene {
    calls: Arc<Mutex<Vec<SceneCall>>>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SceneCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Values written to one variable, oldest first
    pub fn variable_writes(&self, name: &str) -> Vec<SceneValue> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SceneCall::Variable { name: n, value } if n == name => Some(value.clone()),
                _ => None,
            })
            .collect()
    }
}

impl SceneSink for RecordingScene {
    fn set_variable(&mut self, name: &str, value: SceneValue) -> Result<(), CollaboratorError> {
        self.calls.lock().push(SceneCall::Variable { name: name.to_string(), value });
        Ok(())
    }

    fn set_object_rotation(
        &mut self,
        object: &str,
        axis: Axis,
        radians: f32,
    ) -> Result<(), CollaboratorError> {
        self.calls.lock().push(SceneCall::Rotation { object: object.to_string(), axis, radians });
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play(String),
    Stop,
}

/// Audio double; `fail_with` makes every later `play` fail
#[derive(Clone, Default)]
pub struct RecordingAudio {
    calls: Arc<Mutex<Vec<AudioCall>>>,
    failure: Arc<Mutex<Option<CollaboratorError>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().clone()
    }

    pub fn plays(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                AudioCall::Play(path) => Some(path.clone()),
                AudioCall::Stop => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn fail_with(&self, error: CollaboratorError) {
        *self.failure.lock() = Some(error);
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, asset_path: &str) -> Result<(), CollaboratorError> {
        self.calls.lock().push(AudioCall::Play(asset_path.to_string()));
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn stop(&mut self) {
        self.calls.lock().push(AudioCall::Stop);
    }
}
