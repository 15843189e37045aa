//! Scroll animator: converges the continuous offset onto a section boundary
//!
//! Two driving modes share the single offset:
//! - programmatic: ease-out from the current offset to `index * width`
//! - momentum: geometric velocity decay after a drag release, which ends
//!   by reporting the nearest section so the caller can snap to it
//!
//! Starting either mode (or a drag) cancels whatever was running.

use crate::config::EngineSettings;
use crate::navigation::ScrollGeometry;

/// Physics and timing knobs pulled from [`EngineSettings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    pub scroll_duration_ms: u64,
    pub decay: f32,
    pub scale: f32,
    pub stop_velocity: f32,
    pub max_ticks: u32,
}

impl From<&EngineSettings> for MotionSettings {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            scroll_duration_ms: settings.scroll_duration_ms,
            decay: settings.momentum_decay,
            scale: settings.momentum_scale,
            stop_velocity: settings.momentum_stop_velocity,
            max_ticks: settings.momentum_max_ticks,
        }
    }
}

/// Something the owner has to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorEvent {
    /// Programmatic scroll reached the boundary of `index`
    Arrived { index: usize },
    /// Momentum died out; `index` is the nearest boundary
    MomentumSettled { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Programmatic {
        from: f32,
        to: f32,
        index: usize,
        started_ms: u64,
    },
    Momentum {
        velocity: f32,
        ticks: u32,
    },
}

/// Sole writer of the scroll offset
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    offset: f32,
    geometry: ScrollGeometry,
    settings: MotionSettings,
    motion: Motion,
}

/// Ease-out cubic on `t` in [0, 1]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

impl ScrollAnimator {
    pub fn new(geometry: ScrollGeometry, settings: MotionSettings) -> Self {
        Self {
            offset: 0.0,
            geometry,
            settings,
            motion: Motion::Idle,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn geometry(&self) -> ScrollGeometry {
        self.geometry
    }

    /// Section under the current offset
    pub fn live_index(&self) -> usize {
        self.geometry.index_for_offset(self.offset)
    }

    pub fn progress(&self) -> f32 {
        self.geometry.progress(self.offset)
    }

    pub fn is_animating(&self) -> bool {
        self.motion != Motion::Idle
    }

    pub fn cancel(&mut self) {
        if self.motion != Motion::Idle {
            tracing::debug!("Cancelling scroll animation at offset {:.1}", self.offset);
        }
        self.motion = Motion::Idle;
    }

    /// Direct offset write while the user is dragging
    pub fn drag_to(&mut self, offset: f32) {
        self.motion = Motion::Idle;
        self.offset = self.geometry.clamp_offset(offset);
    }

    /// Start (or retarget) an eased scroll. Returns the arrival right away
    /// when there is nothing to animate.
    pub fn scroll_to(&mut self, index: usize, now_ms: u64) -> Option<AnimatorEvent> {
        let to = self.geometry.offset_for_index(index);
        let index = self.geometry.index_for_offset(to);

        if self.settings.scroll_duration_ms == 0 || (to - self.offset).abs() < f32::EPSILON {
            self.motion = Motion::Idle;
            self.offset = to;
            return Some(AnimatorEvent::Arrived { index });
        }

        self.motion = Motion::Programmatic {
            from: self.offset,
            to,
            index,
            started_ms: now_ms,
        };
        None
    }

    /// Begin coasting with the release velocity from the gesture tracker
    pub fn start_momentum(&mut self, velocity: f32) {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.motion = Motion::Momentum { velocity, ticks: 0 };
    }

    /// Advance one frame
    pub fn tick(&mut self, now_ms: u64) -> Option<AnimatorEvent> {
        match self.motion {
            Motion::Idle => None,
            Motion::Programmatic { from, to, index, started_ms } => {
                let elapsed = now_ms.saturating_sub(started_ms) as f32;
                let t = elapsed / self.settings.scroll_duration_ms as f32;
                if t >= 1.0 {
                    self.offset = to;
                    self.motion = Motion::Idle;
                    return Some(AnimatorEvent::Arrived { index });
                }
                self.offset = from + (to - from) * ease_out(t);
                None
            }
            Motion::Momentum { velocity, ticks } => {
                let velocity = velocity * self.settings.decay;
                let ticks = ticks + 1;
                self.offset = self
                    .geometry
                    .clamp_offset(self.offset - velocity * self.settings.scale);

                if velocity.abs() < self.settings.stop_velocity
                    || ticks >= self.settings.max_ticks
                {
                    self.motion = Motion::Idle;
                    let index = self.live_index();
                    tracing::debug!(
                        "Momentum settled after {} ticks at offset {:.1} -> section {}",
                        ticks,
                        self.offset,
                        index
                    );
                    return Some(AnimatorEvent::MomentumSettled { index });
                }
                self.motion = Motion::Momentum { velocity, ticks };
                None
            }
        }
    }

    /// Keep the same section in view when the viewport width changes
    pub fn resize(&mut self, viewport_width: f32) {
        let old = self.geometry;
        let new = ScrollGeometry::new(viewport_width, old.section_count);
        let rescale = |offset: f32| offset / old.viewport_width * new.viewport_width;

        self.geometry = new;
        self.offset = new.clamp_offset(rescale(self.offset));
        if let Motion::Programmatic { from, index, started_ms, .. } = self.motion {
            self.motion = Motion::Programmatic {
                from: rescale(from),
                to: new.offset_for_index(index),
                index,
                started_ms,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn animator() -> ScrollAnimator {
        let settings = EngineSettings::default();
        ScrollAnimator::new(ScrollGeometry::new(1000.0, 5), MotionSettings::from(&settings))
    }

    fn run_until_event(anim: &mut ScrollAnimator, start_ms: u64) -> (AnimatorEvent, u32) {
        let mut now = start_ms;
        for ticks in 1..=10_000 {
            now += 16;
            if let Some(event) = anim.tick(now) {
                return (event, ticks);
            }
        }
        panic!("animator never produced an event");
    }

    #[test]
    fn test_ease_out_endpoints() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert!(ease_out(0.5) > 0.5);
    }

    #[test]
    fn test_programmatic_arrives_at_boundary() {
        let mut anim = animator();
        assert_eq!(anim.scroll_to(3, 0), None);
        anim.tick(200);
        assert!(anim.offset() > 1500.0 && anim.offset() < 3000.0);
        assert_eq!(anim.tick(400), Some(AnimatorEvent::Arrived { index: 3 }));
        assert_eq!(anim.offset(), 3000.0);
        assert!(!anim.is_animating());
    }

    #[test]
    fn test_zero_duration_arrives_immediately() {
        let settings = EngineSettings { scroll_duration_ms: 0, ..Default::default() };
        let mut anim = ScrollAnimator::new(
            ScrollGeometry::new(1000.0, 5),
            MotionSettings::from(&settings),
        );
        assert_eq!(anim.scroll_to(2, 0), Some(AnimatorEvent::Arrived { index: 2 }));
        assert_eq!(anim.offset(), 2000.0);
    }

    #[test]
    fn test_already_at_target_arrives_immediately() {
        let mut anim = animator();
        assert_eq!(anim.scroll_to(0, 0), Some(AnimatorEvent::Arrived { index: 0 }));
    }

    #[test]
    fn test_retarget_starts_from_current_offset() {
        let mut anim = animator();
        anim.scroll_to(4, 0);
        anim.tick(100);
        let mid = anim.offset();
        anim.scroll_to(1, 100);
        anim.tick(100);
        assert_eq!(anim.offset(), mid);
        assert_eq!(anim.tick(500), Some(AnimatorEvent::Arrived { index: 1 }));
    }

    #[test]
    fn test_drag_cancels_programmatic() {
        let mut anim = animator();
        anim.scroll_to(4, 0);
        anim.drag_to(1234.0);
        assert!(!anim.is_animating());
        assert_eq!(anim.tick(1000), None);
        assert_eq!(anim.offset(), 1234.0);
    }

    #[test]
    fn test_drag_offset_is_clamped() {
        let mut anim = animator();
        anim.drag_to(-50.0);
        assert_eq!(anim.offset(), 0.0);
        anim.drag_to(99_999.0);
        assert_eq!(anim.offset(), 4000.0);
    }

    #[test]
    fn test_momentum_moves_against_velocity_sign() {
        let mut anim = animator();
        anim.drag_to(1000.0);
        // finger moving left -> negative velocity -> offset grows
        anim.start_momentum(-2.0);
        anim.tick(16);
        assert!(anim.offset() > 1000.0);
    }

    #[test]
    fn test_momentum_settles_to_nearest() {
        let mut anim = animator();
        anim.drag_to(1300.0);
        anim.start_momentum(0.0);
        assert_eq!(anim.tick(16), Some(AnimatorEvent::MomentumSettled { index: 1 }));
    }

    #[test]
    fn test_momentum_stopped_by_tick_bound() {
        let settings = EngineSettings { momentum_max_ticks: 3, ..Default::default() };
        let mut anim = ScrollAnimator::new(
            ScrollGeometry::new(1000.0, 5),
            MotionSettings::from(&settings),
        );
        anim.start_momentum(-1.0e6);
        let (event, ticks) = run_until_event(&mut anim, 0);
        assert!(matches!(event, AnimatorEvent::MomentumSettled { .. }));
        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_resize_keeps_section_in_view() {
        let mut anim = animator();
        anim.drag_to(2000.0);
        anim.resize(500.0);
        assert_eq!(anim.offset(), 1000.0);
        assert_eq!(anim.live_index(), 2);
    }

    proptest! {
        #[test]
        fn momentum_terminates_on_nearest_boundary(
            start in 0.0f32..4000.0,
            velocity in prop_oneof![-50.0f32..-0.01, 0.01f32..50.0],
        ) {
            let mut anim = animator();
            anim.drag_to(start);
            anim.start_momentum(velocity);
            let (event, ticks) = run_until_event(&mut anim, 0);
            prop_assert!(ticks <= 600);
            let expected = ((anim.offset() / 1000.0).round()).clamp(0.0, 4.0) as usize;
            prop_assert_eq!(event, AnimatorEvent::MomentumSettled { index: expected });
        }
    }
}
