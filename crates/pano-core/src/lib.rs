//! Section navigation and synchronization engine
//!
//! This crate owns the single source of truth for which section of a
//! horizontally paginated deck is active. Wheel, key, indicator, scene and
//! drag input all funnel into one state machine; a scroll animator drives
//! the continuous offset onto section boundaries, and every committed change
//! is fanned out once to the external scene and the narration player.

pub mod animator;
pub mod config;
pub mod error;
pub mod events;
pub mod gesture;
pub mod input;
pub mod navigation;
pub mod sections;
pub mod sync;

// Re-export commonly used types
pub use config::{AudioSettings, DeckConfig, EngineSettings, SceneBindings, WheelPolicy};
pub use error::{CollaboratorError, DeckError};
pub use events::EventBus;
pub use input::{Intent, IntentSource, RawInput};
pub use navigation::{NavigationContext, NavigationEngine, NavigationState, ScrollGeometry};
pub use sections::{
    ContentOverflowMap, EdgeDirection, ExpandAffordance, Indicator, Section, SectionRegistry,
    SectionSpec,
};
pub use sync::{AudioSink, Axis, SceneSink, SceneValue, SyncDispatcher};
