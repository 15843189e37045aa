use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Bus for outward notifications (chrome, logging, analytics hosts)
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by the navigation engine
pub mod events {
    use super::Event;
    use crate::input::IntentSource;

    /// Canonical section change, fired exactly once per commit
    #[derive(Debug, Clone, PartialEq)]
    pub struct SectionChanged {
        pub from: usize,
        pub to: usize,
    }

    /// A transition was accepted and the lock taken
    #[derive(Debug, Clone, PartialEq)]
    pub struct TransitionRequested {
        pub from: usize,
        pub target: usize,
        pub source: IntentSource,
    }

    /// Expand/collapse toggled on the current section
    #[derive(Debug, Clone, PartialEq)]
    pub struct ExpansionChanged {
        pub section: usize,
        pub expanded: bool,
    }

    /// The one-time audio decision was made
    #[derive(Debug, Clone, PartialEq)]
    pub struct AudioConsent {
        pub enabled: bool,
    }

    /// Viewport changed; overflow flags should be measured again
    #[derive(Debug, Clone, PartialEq)]
    pub struct OverflowRemeasureRequested {
        pub viewport_width: f32,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        SectionChanged,
        TransitionRequested,
        ExpansionChanged,
        AudioConsent,
        OverflowRemeasureRequested
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_default().push(handler);
    }

    /// Publish an event. Handlers must not publish back into the bus.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

/// Create a handler that only sees events of type `E`
pub fn typed_handler<E, F>(mut f: F) -> Box<dyn EventHandler>
where
    E: Event,
    F: FnMut(&E) + Send + Sync + 'static,
{
    handler_from_fn(move |event| {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            f(event);
        }
    })
}
