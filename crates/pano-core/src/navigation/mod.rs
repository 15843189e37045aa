mod engine;
mod position;

pub use engine::NavigationEngine;
pub use position::ScrollGeometry;

use serde::Serialize;

/// Navigation state owned by the state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// Committed section, always a valid index
    pub current_section: usize,
    /// At most one expanded section; cleared on every commit
    pub expanded_section: Option<usize>,
    /// Set once by the consent decision
    pub audio_enabled: bool,
    /// Lock covering the in-flight transition and the wheel cool-down
    pub transition_in_flight: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current_section: 0,
            expanded_section: None,
            audio_enabled: false,
            transition_in_flight: false,
        }
    }
}

/// Read-only view for hosts that draw chrome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationContext {
    pub state: NavigationState,
    /// Target of the running transition
    pub target_section: Option<usize>,
    /// Section under the live scroll offset (uncommitted)
    pub live_section: usize,
    pub scroll_offset: f32,
    pub progress: f32,
    pub dragging: bool,
    pub total_sections: usize,
}
