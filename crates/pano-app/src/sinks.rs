//! Collaborators that report to the log instead of a real scene / speaker

use pano_core::{AudioSink, Axis, CollaboratorError, SceneSink, SceneValue};
use tracing::{debug, info};

/// Stand-in for the animated scene
#[derive(Default)]
pub struct LoggingScene;

impl SceneSink for LoggingScene {
    fn set_variable(&mut self, name: &str, value: SceneValue) -> Result<(), CollaboratorError> {
        info!("scene: {} = {}", name, value);
        Ok(())
    }

    fn set_object_rotation(
        &mut self,
        object: &str,
        axis: Axis,
        radians: f32,
    ) -> Result<(), CollaboratorError> {
        debug!("scene: {}.rotation.{:?} = {:.3}", object, axis, radians);
        Ok(())
    }
}

/// Stand-in for the narration player
#[derive(Default)]
pub struct LoggingAudio {
    playing: Option<String>,
}

impl AudioSink for LoggingAudio {
    fn play(&mut self, asset_path: &str) -> Result<(), CollaboratorError> {
        if asset_path.trim().is_empty() {
            return Err(CollaboratorError::AssetMissing("<empty path>".to_string()));
        }
        info!("audio: play {}", asset_path);
        self.playing = Some(asset_path.to_string());
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(path) = self.playing.take() {
            info!("audio: stop {}", path);
        }
    }
}
