//! Input normalization: every raw source becomes a single navigation intent

use crate::config::WheelPolicy;
use crate::sections::EdgeDirection;

/// Raw input as delivered by the host environment
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Mouse wheel; only the sign of `delta_y` matters
    Wheel { delta_y: f32 },
    /// Printable key press
    Key(char),
    /// Indicator dot for an absolute section
    IndicatorClick(usize),
    /// Interaction with a named region in the external scene
    SceneEvent { target_name: String },
    /// Edge arrow on a given section
    EdgeArrow { section: usize, direction: EdgeDirection },
    DragStart { x: f32 },
    DragMove { x: f32 },
    DragEnd,
}

/// Where an intent came from (kept for logging and events)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentSource {
    Wheel,
    Keyboard,
    Indicator,
    Scene,
    EdgeArrow,
    Gesture,
    Programmatic,
}

/// What a relative step is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepBasis {
    /// The committed section
    Committed,
    /// The section under the live scroll offset
    LiveOffset,
}

/// Normalized navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Goto { index: i64, source: IntentSource },
    Step { delta: i64, basis: StepBasis, source: IntentSource },
}

/// Turns discrete raw inputs into intents. Drag samples are not handled
/// here; they go to the gesture tracker.
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    section_count: usize,
    button_prefix: String,
    wheel_policy: WheelPolicy,
}

impl InputNormalizer {
    pub fn new(
        section_count: usize,
        button_prefix: impl Into<String>,
        wheel_policy: WheelPolicy,
    ) -> Self {
        Self {
            section_count,
            button_prefix: button_prefix.into(),
            wheel_policy,
        }
    }

    /// Normalize one input. `transition_in_flight` is the state machine's
    /// lock flag, which includes the wheel cool-down window.
    pub fn normalize(&self, input: &RawInput, transition_in_flight: bool) -> Option<Intent> {
        match input {
            RawInput::Wheel { delta_y } => self.wheel(*delta_y, transition_in_flight),
            RawInput::Key(key) => self.digit_key(*key),
            RawInput::IndicatorClick(index) => Some(Intent::Goto {
                index: *index as i64,
                source: IntentSource::Indicator,
            }),
            RawInput::SceneEvent { target_name } => self.scene_button(target_name),
            RawInput::EdgeArrow { section, direction } => self.edge_arrow(*section, *direction),
            RawInput::DragStart { .. } | RawInput::DragMove { .. } | RawInput::DragEnd => None,
        }
    }

    fn wheel(&self, delta_y: f32, transition_in_flight: bool) -> Option<Intent> {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return None;
        }
        let delta = if delta_y > 0.0 { 1 } else { -1 };

        match self.wheel_policy {
            WheelPolicy::IgnoreDuringCooldown => {
                if transition_in_flight {
                    tracing::debug!("Wheel step {} dropped during cool-down", delta);
                    return None;
                }
                Some(Intent::Step {
                    delta,
                    basis: StepBasis::Committed,
                    source: IntentSource::Wheel,
                })
            }
            WheelPolicy::FromScrollPosition => {
                Some(Intent::Step {
                    delta,
                    basis: StepBasis::LiveOffset,
                    source: IntentSource::Wheel,
                })
            }
        }
    }

    fn digit_key(&self, key: char) -> Option<Intent> {
        let digit = key.to_digit(10)? as i64;
        let index = digit - 1;
        if index < 0 || index as usize >= self.section_count {
            tracing::debug!("Key '{}' does not name a section", key);
            return None;
        }
        Some(Intent::Goto { index, source: IntentSource::Keyboard })
    }

    fn scene_button(&self, target_name: &str) -> Option<Intent> {
        let suffix = target_name.strip_prefix(self.button_prefix.as_str())?;
        let number: i64 = match suffix.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::debug!("Ignoring malformed scene button '{}'", target_name);
                return None;
            }
        };
        let index = number - 1;
        if index < 0 || index as usize >= self.section_count {
            tracing::debug!("Scene button '{}' is out of range", target_name);
            return None;
        }
        Some(Intent::Goto { index, source: IntentSource::Scene })
    }

    fn edge_arrow(&self, section: usize, direction: EdgeDirection) -> Option<Intent> {
        let has_arrow = match direction {
            EdgeDirection::Left => section > 0,
            EdgeDirection::Right => section + 1 < self.section_count,
        };
        if !has_arrow {
            return None;
        }
        Some(Intent::Goto {
            index: section as i64 + direction.step(),
            source: IntentSource::EdgeArrow,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> InputNormalizer {
        InputNormalizer::new(5, "button", WheelPolicy::IgnoreDuringCooldown)
    }

    fn goto(index: i64, source: IntentSource) -> Option<Intent> {
        Some(Intent::Goto { index, source })
    }

    #[test]
    fn test_wheel_sign_gives_step() {
        let n = normalizer();
        assert_eq!(
            n.normalize(&RawInput::Wheel { delta_y: 120.0 }, false),
            Some(Intent::Step {
                delta: 1,
                basis: StepBasis::Committed,
                source: IntentSource::Wheel,
            })
        );
        assert_eq!(
            n.normalize(&RawInput::Wheel { delta_y: -3.0 }, false),
            Some(Intent::Step {
                delta: -1,
                basis: StepBasis::Committed,
                source: IntentSource::Wheel,
            })
        );
        assert_eq!(n.normalize(&RawInput::Wheel { delta_y: 0.0 }, false), None);
    }

    #[test]
    fn test_wheel_dropped_while_locked() {
        let n = normalizer();
        assert_eq!(n.normalize(&RawInput::Wheel { delta_y: 50.0 }, true), None);
    }

    #[test]
    fn test_live_offset_policy_never_drops() {
        let n = InputNormalizer::new(5, "button", WheelPolicy::FromScrollPosition);
        assert_eq!(
            n.normalize(&RawInput::Wheel { delta_y: 50.0 }, true),
            Some(Intent::Step {
                delta: 1,
                basis: StepBasis::LiveOffset,
                source: IntentSource::Wheel,
            })
        );
    }

    #[test]
    fn test_digit_keys() {
        let n = normalizer();
        assert_eq!(n.normalize(&RawInput::Key('3'), false), goto(2, IntentSource::Keyboard));
        assert_eq!(n.normalize(&RawInput::Key('1'), true), goto(0, IntentSource::Keyboard));
        assert_eq!(n.normalize(&RawInput::Key('0'), false), None);
        assert_eq!(n.normalize(&RawInput::Key('6'), false), None);
        assert_eq!(n.normalize(&RawInput::Key('x'), false), None);
    }

    #[test]
    fn test_scene_buttons() {
        let n = normalizer();
        let event = |name: &str| RawInput::SceneEvent { target_name: name.to_string() };
        assert_eq!(n.normalize(&event("button4"), false), goto(3, IntentSource::Scene));
        assert_eq!(n.normalize(&event("button9"), false), None);
        assert_eq!(n.normalize(&event("button0"), false), None);
        assert_eq!(n.normalize(&event("buttonX"), false), None);
        assert_eq!(n.normalize(&event("button"), false), None);
        assert_eq!(n.normalize(&event("sphere2"), false), None);
    }

    #[test]
    fn test_indicator_passes_index_through() {
        let n = normalizer();
        assert_eq!(
            n.normalize(&RawInput::IndicatorClick(7), true),
            goto(7, IntentSource::Indicator)
        );
    }

    #[test]
    fn test_edge_arrows() {
        let n = normalizer();
        let arrow = |section, direction| RawInput::EdgeArrow { section, direction };
        assert_eq!(
            n.normalize(&arrow(2, EdgeDirection::Left), false),
            goto(1, IntentSource::EdgeArrow)
        );
        assert_eq!(
            n.normalize(&arrow(2, EdgeDirection::Right), false),
            goto(3, IntentSource::EdgeArrow)
        );
        assert_eq!(n.normalize(&arrow(0, EdgeDirection::Left), false), None);
        assert_eq!(n.normalize(&arrow(4, EdgeDirection::Right), false), None);
    }

    #[test]
    fn test_drag_is_not_an_intent() {
        let n = normalizer();
        assert_eq!(n.normalize(&RawInput::DragStart { x: 1.0 }, false), None);
        assert_eq!(n.normalize(&RawInput::DragEnd, false), None);
    }
}
