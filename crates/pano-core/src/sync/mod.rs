//! Fan-out of committed section changes to the scene and the audio player

mod collaborators;
#[cfg(test)]
pub(crate) mod recording;

pub use collaborators::{AudioSink, Axis, SceneSink, SceneValue};

use std::f32::consts::TAU;

use crate::config::{AudioSettings, SceneBindings};
use crate::navigation::ScrollGeometry;
use crate::sections::Section;

/// Pushes navigation results to the external collaborators.
///
/// Section dispatch happens at most once per distinct committed index.
/// Progress is a separate presentational channel and never touches audio.
pub struct SyncDispatcher {
    scene: Option<Box<dyn SceneSink>>,
    audio: Option<Box<dyn AudioSink>>,
    bindings: SceneBindings,
    audio_settings: AudioSettings,
    last_committed: Option<usize>,
    last_progress: Option<f32>,
    narrating: Option<String>,
}

impl SyncDispatcher {
    pub fn new(bindings: SceneBindings, audio_settings: AudioSettings) -> Self {
        Self {
            scene: None,
            audio: None,
            bindings,
            audio_settings,
            last_committed: None,
            last_progress: None,
            narrating: None,
        }
    }

    pub fn last_committed(&self) -> Option<usize> {
        self.last_committed
    }

    /// Asset currently requested from the audio player
    pub fn narrating(&self) -> Option<&str> {
        self.narrating.as_deref()
    }

    /// Scene finished loading. The committed section is pushed to it once.
    pub fn attach_scene(
        &mut self,
        scene: Box<dyn SceneSink>,
        current: &Section,
        geometry: ScrollGeometry,
    ) {
        tracing::info!("Scene attached");
        self.scene = Some(scene);
        self.last_progress = None;
        self.write_section(current, geometry);
    }

    pub fn attach_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = Some(audio);
    }

    /// Narration path for a section
    pub fn narration_path(&self, section: &Section) -> String {
        match &section.narration_asset_id {
            Some(asset) => asset.clone(),
            None => self.audio_settings.asset_for(section.index),
        }
    }

    /// Canonical section change. Returns false when `section` was already
    /// the last dispatched index.
    pub fn dispatch_section(
        &mut self,
        section: &Section,
        geometry: ScrollGeometry,
        audio_enabled: bool,
    ) -> bool {
        if self.last_committed == Some(section.index) {
            tracing::debug!("Section {} already dispatched", section.index);
            return false;
        }
        self.last_committed = Some(section.index);

        self.write_section(section, geometry);
        if audio_enabled {
            self.play_narration(section);
        }
        true
    }

    /// Continuous progress in [0, 1] while the offset moves
    pub fn dispatch_progress(&mut self, progress: f32) {
        if self.last_progress == Some(progress) {
            return;
        }
        self.last_progress = Some(progress);
        self.write_rotation(progress);
    }

    /// Stop whatever is playing and request the section's narration
    pub fn play_narration(&mut self, section: &Section) {
        let path = self.narration_path(section);
        let Some(audio) = self.audio.as_mut() else {
            tracing::debug!("No audio player; skipping narration {}", path);
            return;
        };

        audio.stop();
        tracing::info!("Playing narration {} for section {}", path, section.index + 1);
        match audio.play(&path) {
            Ok(()) => self.narrating = Some(path),
            Err(e) => {
                tracing::warn!("Narration {} failed: {}", path, e);
                self.narrating = None;
            }
        }
    }

    pub fn stop_audio(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.stop();
        }
        self.narrating = None;
    }

    fn write_section(&mut self, section: &Section, geometry: ScrollGeometry) {
        let progress = geometry.index_progress(section.index);
        self.last_progress = Some(progress);
        self.write_rotation(progress);

        let Some(scene) = self.scene.as_mut() else {
            tracing::debug!("Scene not loaded; skipping variables for section {}", section.index);
            return;
        };

        let number = (section.index + 1) as f64;
        let section_value = SceneValue::Number(number);
        if let Err(e) = scene.set_variable(&self.bindings.section_variable, section_value) {
            tracing::warn!("Failed to set {}: {}", self.bindings.section_variable, e);
        } else {
            tracing::info!("Updated scene {} to: {}", self.bindings.section_variable, number);
        }

        if let Some(text) = &section.display_text {
            let text_value = SceneValue::Text(text.clone());
            if let Err(e) = scene.set_variable(&self.bindings.text_variable, text_value) {
                tracing::warn!("Failed to set {}: {}", self.bindings.text_variable, e);
            }
        }
    }

    fn write_rotation(&mut self, progress: f32) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let radians = progress * TAU * self.bindings.rotation_turns;
        let object = &self.bindings.rotation_object;
        if let Err(e) = scene.set_object_rotation(object, Axis::Y, radians) {
            tracing::debug!("Rotation update skipped: {}", e);
        }
    }
}
