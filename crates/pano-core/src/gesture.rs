//! Drag tracking: turns pointer samples into a live offset and a release velocity

/// One pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub pointer_x: f32,
    pub timestamp_ms: u64,
}

/// Tracks a single-finger horizontal drag.
///
/// Velocity is in pointer pixels per millisecond, positive when the finger
/// moves right (which scrolls toward lower offsets).
#[derive(Debug, Clone)]
pub struct GestureTracker {
    drag_gain: f32,
    dragging: bool,
    start_x: f32,
    start_offset: f32,
    last: Option<GestureSample>,
    velocity: f32,
}

impl GestureTracker {
    pub fn new(drag_gain: f32) -> Self {
        Self {
            drag_gain,
            dragging: false,
            start_x: 0.0,
            start_offset: 0.0,
            last: None,
            velocity: 0.0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Reset samples and remember where the scroll offset was
    pub fn on_drag_start(&mut self, x: f32, t: u64, current_offset: f32) {
        self.dragging = true;
        self.start_x = x;
        self.start_offset = current_offset;
        self.last = Some(GestureSample { pointer_x: x, timestamp_ms: t });
        self.velocity = 0.0;
        tracing::debug!("Drag start at x={} offset={}", x, current_offset);
    }

    /// Returns the offset the scroll position should move to, or `None` when
    /// no drag is active
    pub fn on_drag_move(&mut self, x: f32, t: u64) -> Option<f32> {
        if !self.dragging {
            return None;
        }
        let walk = (self.start_x - x) * self.drag_gain;

        if let Some(last) = self.last {
            // Out-of-order or same-millisecond samples count as 1ms apart
            let dt = t.saturating_sub(last.timestamp_ms).max(1) as f32;
            self.velocity = (x - last.pointer_x) / dt;
        }
        self.last = Some(GestureSample { pointer_x: x, timestamp_ms: t });

        Some(self.start_offset + walk)
    }

    /// Ends the drag and hands back the release velocity
    pub fn on_drag_end(&mut self) -> Option<f32> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.last = None;
        let velocity = self.velocity;
        self.velocity = 0.0;
        tracing::debug!("Drag end with velocity {:.3}", velocity);
        Some(velocity)
    }

    /// Abandon the drag without producing a release velocity
    pub fn cancel(&mut self) {
        self.dragging = false;
        self.last = None;
        self.velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_applies_gain() {
        let mut tracker = GestureTracker::new(1.5);
        tracker.on_drag_start(500.0, 0, 1000.0);
        let offset = tracker.on_drag_move(400.0, 10).unwrap();
        assert_eq!(offset, 1150.0);
    }

    #[test]
    fn test_velocity_from_last_two_samples() {
        let mut tracker = GestureTracker::new(1.0);
        tracker.on_drag_start(500.0, 0, 0.0);
        tracker.on_drag_move(480.0, 10);
        tracker.on_drag_move(440.0, 20);
        assert_eq!(tracker.velocity(), -4.0);
    }

    #[test]
    fn test_zero_time_delta_is_guarded() {
        let mut tracker = GestureTracker::new(1.0);
        tracker.on_drag_start(100.0, 50, 0.0);
        tracker.on_drag_move(90.0, 50);
        assert!(tracker.velocity().is_finite());
        assert_eq!(tracker.velocity(), -10.0);

        // clock going backwards
        tracker.on_drag_move(80.0, 40);
        assert_eq!(tracker.velocity(), -10.0);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut tracker = GestureTracker::new(1.5);
        assert_eq!(tracker.on_drag_move(10.0, 5), None);
        assert_eq!(tracker.on_drag_end(), None);
    }

    #[test]
    fn test_end_hands_over_velocity_and_resets() {
        let mut tracker = GestureTracker::new(1.0);
        tracker.on_drag_start(300.0, 0, 0.0);
        tracker.on_drag_move(250.0, 25);
        assert_eq!(tracker.on_drag_end(), Some(-2.0));
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn test_restart_resets_samples() {
        let mut tracker = GestureTracker::new(1.0);
        tracker.on_drag_start(300.0, 0, 0.0);
        tracker.on_drag_move(100.0, 10);
        tracker.on_drag_start(300.0, 100, 200.0);
        assert_eq!(tracker.velocity(), 0.0);
        assert_eq!(tracker.on_drag_move(300.0, 110), Some(200.0));
        assert_eq!(tracker.velocity(), 0.0);
    }
}
