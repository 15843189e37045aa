use serde::{Deserialize, Serialize};

/// Mapping between the continuous scroll offset and discrete section indices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScrollGeometry {
    /// Width of one section
    pub viewport_width: f32,
    /// Number of sections (at least 1)
    pub section_count: usize,
}

impl ScrollGeometry {
    pub fn new(viewport_width: f32, section_count: usize) -> Self {
        Self { viewport_width, section_count: section_count.max(1) }
    }

    /// Largest reachable offset (left edge of the last section)
    pub fn max_offset(&self) -> f32 {
        (self.section_count - 1) as f32 * self.viewport_width
    }

    /// Resting offset for a section
    pub fn offset_for_index(&self, index: usize) -> f32 {
        index.min(self.section_count - 1) as f32 * self.viewport_width
    }

    /// `round(offset / width)` clamped to range. Both the passive scroll
    /// listener and the momentum settle step go through here.
    pub fn index_for_offset(&self, offset: f32) -> usize {
        if !offset.is_finite() || self.viewport_width <= 0.0 {
            return 0;
        }
        let raw = (offset / self.viewport_width).round();
        raw.clamp(0.0, (self.section_count - 1) as f32) as usize
    }

    pub fn clamp_offset(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }

    /// Continuous position across the deck in [0, 1]
    pub fn progress(&self, offset: f32) -> f32 {
        let max = self.max_offset();
        if max <= 0.0 {
            0.0
        } else {
            (offset / max).clamp(0.0, 1.0)
        }
    }

    /// Committed-index progress, `index / (N-1)`
    pub fn index_progress(&self, index: usize) -> f32 {
        if self.section_count <= 1 {
            0.0
        } else {
            index.min(self.section_count - 1) as f32 / (self.section_count - 1) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rounding_is_nearest() {
        let geo = ScrollGeometry::new(1000.0, 5);
        assert_eq!(geo.index_for_offset(1300.0), 1);
        assert_eq!(geo.index_for_offset(1500.0), 2);
        assert_eq!(geo.index_for_offset(1499.0), 1);
        assert_eq!(geo.index_for_offset(-400.0), 0);
        assert_eq!(geo.index_for_offset(9000.0), 4);
    }

    #[test]
    fn test_single_section_progress() {
        let geo = ScrollGeometry::new(800.0, 1);
        assert_eq!(geo.max_offset(), 0.0);
        assert_eq!(geo.progress(0.0), 0.0);
        assert_eq!(geo.index_progress(0), 0.0);
    }

    #[test]
    fn test_index_progress() {
        let geo = ScrollGeometry::new(1000.0, 5);
        assert_eq!(geo.index_progress(0), 0.0);
        assert_eq!(geo.index_progress(2), 0.5);
        assert_eq!(geo.index_progress(4), 1.0);
    }

    proptest! {
        #[test]
        fn index_for_offset_always_in_range(
            offset in -1.0e6f32..1.0e6,
            width in 1.0f32..4000.0,
            n in 1usize..12,
        ) {
            let geo = ScrollGeometry::new(width, n);
            prop_assert!(geo.index_for_offset(offset) < n);
        }

        #[test]
        fn resting_offset_maps_back_to_index(
            index in 0usize..12,
            width in 1.0f32..4000.0,
            n in 1usize..12,
        ) {
            let geo = ScrollGeometry::new(width, n);
            let index = index.min(n - 1);
            prop_assert_eq!(geo.index_for_offset(geo.offset_for_index(index)), index);
        }
    }
}
