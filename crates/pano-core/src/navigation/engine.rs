//! Navigation state machine
//!
//! Owns the committed section and the transition lock. Every input source
//! ends up in `navigate`, so only one target is ever in
//! flight: a new request for the same target is a no-op, a different target
//! supersedes the running one (the animator retargets, nothing is queued).

use std::sync::Arc;

use super::{NavigationContext, NavigationState, ScrollGeometry};
use crate::animator::{AnimatorEvent, MotionSettings, ScrollAnimator};
use crate::config::{DeckConfig, EngineSettings};
use crate::error::DeckError;
use crate::events::events::{
    AudioConsent, ExpansionChanged, OverflowRemeasureRequested, SectionChanged, TransitionRequested,
};
use crate::events::EventBus;
use crate::gesture::GestureTracker;
use crate::input::{InputNormalizer, Intent, IntentSource, RawInput, StepBasis};
use crate::sections::{ContentOverflowMap, ExpandAffordance, Indicator, Section, SectionRegistry};
use crate::sync::{AudioSink, SceneSink, SyncDispatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    target: usize,
    source: IntentSource,
}

/// The section navigation and synchronization engine.
///
/// Time is supplied by the caller (`now_ms` on every call), so the engine
/// runs the same under a frame timer, a test harness or a replay.
pub struct NavigationEngine {
    registry: SectionRegistry,
    settings: EngineSettings,
    state: NavigationState,
    transition: Option<Transition>,
    cooldown_until: Option<u64>,
    consent_given: bool,
    overflow: ContentOverflowMap,
    gesture: GestureTracker,
    normalizer: InputNormalizer,
    animator: ScrollAnimator,
    dispatcher: SyncDispatcher,
    event_bus: Arc<EventBus>,
}

impl NavigationEngine {
    /// Create an engine resting on section 0
    pub fn new(registry: SectionRegistry, settings: EngineSettings) -> Self {
        let geometry = ScrollGeometry::new(settings.viewport_width, registry.len());
        let normalizer = InputNormalizer::new(
            registry.len(),
            settings.scene.button_prefix.clone(),
            settings.wheel_policy,
        );
        let mut dispatcher = SyncDispatcher::new(settings.scene.clone(), settings.audio.clone());
        if let Some(first) = registry.get(0) {
            // section 0 counts as dispatched; there is no audio consent yet
            dispatcher.dispatch_section(first, geometry, false);
        }

        Self {
            gesture: GestureTracker::new(settings.drag_gain),
            animator: ScrollAnimator::new(geometry, MotionSettings::from(&settings)),
            normalizer,
            dispatcher,
            registry,
            settings,
            state: NavigationState::default(),
            transition: None,
            cooldown_until: None,
            consent_given: false,
            overflow: ContentOverflowMap::new(),
            event_bus: Arc::new(EventBus::new()),
        }
    }

    /// Build from a loaded deck file
    pub fn from_deck(deck: DeckConfig) -> Result<Self, DeckError> {
        let (registry, settings) = deck.into_parts()?;
        Ok(Self::new(registry, settings))
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_section(&self) -> &Section {
        self.registry.section(self.state.current_section)
    }

    /// Narration asset last requested from the audio player
    pub fn narrating(&self) -> Option<&str> {
        self.dispatcher.narrating()
    }

    pub fn context(&self) -> NavigationContext {
        NavigationContext {
            state: self.state.clone(),
            target_section: self.transition.map(|t| t.target),
            live_section: self.animator.live_index(),
            scroll_offset: self.animator.offset(),
            progress: self.animator.progress(),
            dragging: self.gesture.is_dragging(),
            total_sections: self.registry.len(),
        }
    }

    /// True when nothing is moving and no lock is held
    pub fn is_idle(&self) -> bool {
        !self.state.transition_in_flight
            && !self.animator.is_animating()
            && !self.gesture.is_dragging()
    }

    /// Scene finished loading
    pub fn attach_scene(&mut self, scene: Box<dyn SceneSink>) {
        let geometry = self.animator.geometry();
        let index = self.state.current_section;
        if let Some(section) = self.registry.get(index) {
            self.dispatcher.attach_scene(scene, section, geometry);
        }
    }

    pub fn attach_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.dispatcher.attach_audio(audio);
    }

    /// Single entry point for raw input
    pub fn handle_input(&mut self, input: RawInput, now_ms: u64) {
        self.refresh_lock(now_ms);
        match input {
            RawInput::DragStart { x } => self.drag_start(x, now_ms),
            RawInput::DragMove { x } => self.drag_move(x, now_ms),
            RawInput::DragEnd => self.drag_end(),
            other => {
                let locked = self.state.transition_in_flight;
                if let Some(intent) = self.normalizer.normalize(&other, locked) {
                    self.apply_intent(intent, now_ms);
                }
            }
        }
    }

    pub fn apply_intent(&mut self, intent: Intent, now_ms: u64) {
        match intent {
            Intent::Goto { index, source } => self.navigate(index, source, now_ms),
            Intent::Step { delta, basis, source } => {
                let base = match basis {
                    StepBasis::Committed => self.state.current_section,
                    StepBasis::LiveOffset => self.animator.live_index(),
                };
                self.navigate(base as i64 + delta, source, now_ms);
            }
        }
    }

    /// Programmatic navigation; out-of-range targets are clamped
    pub fn request_navigate(&mut self, target: i64, now_ms: u64) {
        self.refresh_lock(now_ms);
        self.navigate(target, IntentSource::Programmatic, now_ms);
    }

    fn navigate(&mut self, target: i64, source: IntentSource, now_ms: u64) {
        let target = self.registry.clamp_index(target);

        if let Some(transition) = self.transition {
            if transition.target == target {
                tracing::debug!("Already transitioning to section {}", target);
                return;
            }
        }
        if self.gesture.is_dragging() {
            self.gesture.cancel();
        }

        if self.transition.is_none() && target == self.state.current_section {
            // Nothing to commit; just put the offset back on the boundary
            tracing::debug!("Section {} already current; settling offset", target);
            self.animator.scroll_to(target, now_ms);
            self.publish_progress();
            return;
        }

        let from = self.state.current_section;
        tracing::info!("Navigating from section {} to {} ({:?})", from, target, source);

        self.transition = Some(Transition { target, source });
        self.cooldown_until = Some(now_ms + self.settings.wheel_cooldown_ms);
        self.state.transition_in_flight = true;
        self.set_expanded(None);
        self.event_bus.publish(TransitionRequested { from, target, source });

        if let Some(AnimatorEvent::Arrived { index }) = self.animator.scroll_to(target, now_ms) {
            self.publish_progress();
            self.on_arrival(index, now_ms);
        }
    }

    /// Advance animations and timers by one frame
    pub fn tick(&mut self, now_ms: u64) {
        let before = self.animator.offset();
        let event = self.animator.tick(now_ms);
        if self.animator.offset() != before {
            self.publish_progress();
        }

        match event {
            Some(AnimatorEvent::Arrived { index }) => self.on_arrival(index, now_ms),
            Some(AnimatorEvent::MomentumSettled { index }) => {
                self.navigate(index as i64, IntentSource::Gesture, now_ms)
            }
            None => {}
        }
        self.refresh_lock(now_ms);
    }

    fn on_arrival(&mut self, index: usize, now_ms: u64) {
        match self.transition {
            Some(transition) if transition.target == index => {
                self.transition = None;
                self.commit(index, transition.source);
            }
            _ => {}
        }
        self.refresh_lock(now_ms);
    }

    fn commit(&mut self, index: usize, source: IntentSource) {
        let from = self.state.current_section;
        self.state.current_section = index;
        self.set_expanded(None);

        if from == index {
            return;
        }

        tracing::info!("Section changed from {} to {} ({:?})", from, index, source);
        let geometry = self.animator.geometry();
        let audio_enabled = self.state.audio_enabled;
        if let Some(section) = self.registry.get(index) {
            self.dispatcher.dispatch_section(section, geometry, audio_enabled);
        }
        self.event_bus.publish(SectionChanged { from, to: index });
    }

    /// The lock is held while a transition runs and until the cool-down
    /// window after the last accepted request has passed
    fn refresh_lock(&mut self, now_ms: u64) {
        if let Some(until) = self.cooldown_until {
            if now_ms >= until {
                self.cooldown_until = None;
            }
        }
        self.state.transition_in_flight =
            self.transition.is_some() || self.cooldown_until.is_some();
    }

    fn drag_start(&mut self, x: f32, now_ms: u64) {
        self.animator.cancel();
        if let Some(abandoned) = self.transition.take() {
            tracing::debug!("Drag abandons transition to section {}", abandoned.target);
        }
        self.gesture.on_drag_start(x, now_ms, self.animator.offset());
        self.refresh_lock(now_ms);
    }

    fn drag_move(&mut self, x: f32, now_ms: u64) {
        if let Some(offset) = self.gesture.on_drag_move(x, now_ms) {
            self.animator.drag_to(offset);
            self.publish_progress();
        }
    }

    fn drag_end(&mut self) {
        if let Some(velocity) = self.gesture.on_drag_end() {
            self.animator.start_momentum(velocity);
        }
    }

    fn publish_progress(&mut self) {
        self.dispatcher.dispatch_progress(self.animator.progress());
    }

    /// Toggle expansion of the current section. Returns false (and does
    /// nothing) for any other index.
    pub fn request_expand(&mut self, index: usize) -> bool {
        if index != self.state.current_section {
            tracing::debug!("Expand ignored: section {} is not current", index);
            return false;
        }
        let next = if self.state.expanded_section == Some(index) {
            None
        } else {
            Some(index)
        };
        self.set_expanded(next);
        true
    }

    fn set_expanded(&mut self, expanded: Option<usize>) {
        let previous = self.state.expanded_section;
        if previous == expanded {
            return;
        }
        self.state.expanded_section = expanded;
        let (section, is_expanded) = match (previous, expanded) {
            (_, Some(section)) => (section, true),
            (Some(section), None) => (section, false),
            (None, None) => return,
        };
        self.event_bus.publish(ExpansionChanged { section, expanded: is_expanded });
    }

    /// Merge overflow measurements; returns true when any flag changed
    pub fn set_content_overflow(
        &mut self,
        measurements: impl IntoIterator<Item = (usize, bool)>,
    ) -> bool {
        self.overflow.apply(measurements)
    }

    /// `More` when the section overflows, `Less` while it is expanded
    pub fn expand_affordance(&self, index: usize) -> Option<ExpandAffordance> {
        if self.state.expanded_section == Some(index) {
            Some(ExpandAffordance::Less)
        } else if self.overflow.is_overflowing(index) {
            Some(ExpandAffordance::More)
        } else {
            None
        }
    }

    pub fn indicators(&self) -> Vec<Indicator> {
        self.registry
            .iter()
            .map(|section| Indicator {
                index: section.index,
                active: section.index == self.state.current_section,
                label: format!("Go to section {}", section.index + 1),
            })
            .collect()
    }

    /// One-time audio decision. Later calls are ignored.
    pub fn set_audio_consent(&mut self, enabled: bool, now_ms: u64) {
        if self.consent_given {
            tracing::debug!("Audio consent already decided; ignoring");
            return;
        }
        self.consent_given = true;
        self.state.audio_enabled = enabled;
        tracing::info!("Audio consent: {}", if enabled { "enabled" } else { "disabled" });
        self.event_bus.publish(AudioConsent { enabled });

        self.refresh_lock(now_ms);
        let at_start = self.state.current_section == 0;
        self.navigate(0, IntentSource::Programmatic, now_ms);

        // Section 0 is already committed, so returning to it dispatches nothing
        if enabled && at_start {
            if let Some(first) = self.registry.get(0) {
                self.dispatcher.play_narration(first);
            }
        }
    }

    /// Viewport width changed; the same section stays in view
    pub fn resize(&mut self, viewport_width: f32) {
        if !(viewport_width.is_finite() && viewport_width > 0.0) {
            tracing::warn!("Ignoring invalid viewport width {}", viewport_width);
            return;
        }
        self.settings.viewport_width = viewport_width;
        self.animator.resize(viewport_width);
        self.publish_progress();
        self.event_bus.publish(OverflowRemeasureRequested { viewport_width });
    }

    /// Stop narration when the host tears down
    pub fn shutdown(&mut self) {
        self.animator.cancel();
        self.gesture.cancel();
        self.dispatcher.stop_audio();
    }
}
