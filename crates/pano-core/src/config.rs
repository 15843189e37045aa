//! Engine tunables and deck file loading

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::sections::{SectionRegistry, SectionSpec};

/// How wheel input is gated while a transition is running
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WheelPolicy {
    /// Drop wheel steps until the cool-down window after a request elapses
    #[default]
    IgnoreDuringCooldown,
    /// Never drop; step relative to the section under the live scroll offset
    FromScrollPosition,
}

/// Names used when talking to the external scene
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneBindings {
    /// Variable receiving the 1-based committed section number
    pub section_variable: String,

    /// Variable receiving the per-section display text
    pub text_variable: String,

    /// Object whose Y rotation follows scroll progress
    pub rotation_object: String,

    /// Full turns of the rotation object across the whole deck
    pub rotation_turns: f32,

    /// Prefix of interactive scene regions that act as section buttons
    pub button_prefix: String,
}

impl Default for SceneBindings {
    fn default() -> Self {
        Self {
            section_variable: "Section".to_string(),
            text_variable: "txtSection01".to_string(),
            rotation_object: "myObject".to_string(),
            rotation_turns: 1.0,
            button_prefix: "button".to_string(),
        }
    }
}

/// Narration asset naming
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    /// Directory holding narration files
    pub asset_dir: String,

    /// File name prefix, followed by the two-digit section number
    pub asset_prefix: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            asset_dir: "/audio".to_string(),
            asset_prefix: "vo".to_string(),
        }
    }
}

impl AudioSettings {
    /// Default narration path for a 0-based section index
    pub fn asset_for(&self, index: usize) -> String {
        format!(
            "{}/{}{:02}.mp3",
            self.asset_dir.trim_end_matches('/'),
            self.asset_prefix,
            index + 1
        )
    }
}

/// Tunables for input handling, animation and synchronization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Width of one section in pixel-equivalent units
    pub viewport_width: f32,

    /// Multiplier applied to drag distance (>= 1 feels heavier than 1:1)
    pub drag_gain: f32,

    /// Window after a navigation request during which wheel steps are dropped
    pub wheel_cooldown_ms: u64,

    /// Wheel gating policy
    pub wheel_policy: WheelPolicy,

    /// Duration of the eased programmatic scroll (0 = jump)
    pub scroll_duration_ms: u64,

    /// Per-tick multiplicative velocity decay after a drag release
    pub momentum_decay: f32,

    /// Offset units applied per unit of velocity per tick
    pub momentum_scale: f32,

    /// Velocity magnitude below which momentum stops and snaps
    pub momentum_stop_velocity: f32,

    /// Hard bound on momentum ticks
    pub momentum_max_ticks: u32,

    /// Host frame cadence
    pub frame_interval_ms: u64,

    /// Scene variable and object names
    pub scene: SceneBindings,

    /// Narration naming
    pub audio: AudioSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            viewport_width: 1000.0,
            drag_gain: 1.5,
            wheel_cooldown_ms: 500,
            wheel_policy: WheelPolicy::default(),
            scroll_duration_ms: 400,
            momentum_decay: 0.95,
            momentum_scale: 10.0,
            momentum_stop_velocity: 0.1,
            momentum_max_ticks: 600,
            frame_interval_ms: 16,
            scene: SceneBindings::default(),
            audio: AudioSettings::default(),
        }
    }
}

impl EngineSettings {
    /// Reject values that would break the physics or the geometry
    pub fn validate(&self) -> Result<(), DeckError> {
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            return Err(DeckError::InvalidSetting(format!(
                "viewport_width must be positive, got {}", self.viewport_width
            )));
        }
        if !(self.drag_gain.is_finite() && self.drag_gain >= 1.0) {
            return Err(DeckError::InvalidSetting(format!(
                "drag_gain must be >= 1, got {}", self.drag_gain
            )));
        }
        if !(self.momentum_decay > 0.0 && self.momentum_decay < 1.0) {
            return Err(DeckError::InvalidSetting(format!(
                "momentum_decay must be in (0, 1), got {}", self.momentum_decay
            )));
        }
        if !(self.momentum_scale.is_finite() && self.momentum_scale > 0.0) {
            return Err(DeckError::InvalidSetting(format!(
                "momentum_scale must be positive, got {}", self.momentum_scale
            )));
        }
        if !(self.momentum_stop_velocity.is_finite() && self.momentum_stop_velocity > 0.0) {
            return Err(DeckError::InvalidSetting(format!(
                "momentum_stop_velocity must be positive, got {}", self.momentum_stop_velocity
            )));
        }
        if self.momentum_max_ticks == 0 {
            return Err(DeckError::InvalidSetting(
                "momentum_max_ticks must be at least 1".to_string(),
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(DeckError::InvalidSetting(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.scene.button_prefix.is_empty() {
            return Err(DeckError::InvalidSetting(
                "scene.button_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A deck file: settings plus the ordered section list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub settings: EngineSettings,
    pub sections: Vec<SectionSpec>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
            sections: SectionSpec::builtin_deck(),
        }
    }
}

impl DeckConfig {
    /// Parse a deck from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, DeckError> {
        let config: DeckConfig = serde_json::from_str(json)?;
        config.settings.validate()?;
        Ok(config)
    }

    /// Load a deck from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            "Loaded deck from {} ({} sections)",
            path.display(),
            config.sections.len()
        );
        Ok(config)
    }

    /// Build the immutable registry and hand back the settings
    pub fn into_parts(self) -> Result<(SectionRegistry, EngineSettings), DeckError> {
        self.settings.validate()?;
        let registry = SectionRegistry::from_specs(self.sections)?;
        Ok((registry, self.settings))
    }
}
