//! Section registry and per-section presentation helpers

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::DeckError;

/// Opaque color token handed through to the renderer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AccentColor(pub String);

impl Default for AccentColor {
    fn default() -> Self {
        Self("#2f2f2f".to_string())
    }
}

/// Section as written in a deck file (the index comes from its position)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SectionSpec {
    pub title: String,
    pub body_text: String,
    pub accent_color: AccentColor,
    /// Text pushed to the scene when this section is committed
    pub display_text: Option<String>,
    /// Overrides the default narration path
    pub narration_asset_id: Option<String>,
}

impl SectionSpec {
    /// The five-section deck used when a deck file lists none
    pub fn builtin_deck() -> Vec<SectionSpec> {
        let bullets: String = (1..=10).map(|i| format!("\n  • Bullet point {}", i)).collect();
        let entries = [
            (
                "This is the content for section 1.".to_string(),
                "#2f2f2f",
                "This is section 1, isn't it lovely and working perfectly?",
            ),
            (
                "Here's some information for section 2.".to_string(),
                "#595959",
                "Welcome to section 2, where the magic continues!",
            ),
            (
                format!("Section 3 contains this text.{}", bullets),
                "#2f2f2f",
                "Section 3 is here, full of bullet points and excitement!",
            ),
            (
                format!("Welcome to section 4. This section now contains more content:{}", bullets),
                "#595959",
                "You've reached section 4, the content keeps getting better!",
            ),
            (
                "This is the final section.".to_string(),
                "#2f2f2f",
                "The grand finale! Section 5 wraps up our journey.",
            ),
        ];

        entries
            .into_iter()
            .enumerate()
            .map(|(i, (body, color, text))| SectionSpec {
                title: format!("Section {}", i + 1),
                body_text: body,
                accent_color: AccentColor(color.to_string()),
                display_text: Some(text.to_string()),
                narration_asset_id: None,
            })
            .collect()
    }
}

/// One page of the deck. Never mutated after the registry is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub index: usize,
    pub title: String,
    pub body_text: String,
    pub accent_color: AccentColor,
    pub display_text: Option<String>,
    pub narration_asset_id: Option<String>,
}

/// Ordered, immutable list of sections
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    /// Build the registry; indices are assigned densely in list order
    pub fn from_specs(specs: Vec<SectionSpec>) -> Result<Self, DeckError> {
        if specs.is_empty() {
            return Err(DeckError::EmptyDeck);
        }
        let sections = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| Section {
                index,
                title: spec.title,
                body_text: spec.body_text,
                accent_color: spec.accent_color,
                display_text: spec.display_text,
                narration_asset_id: spec.narration_asset_id,
            })
            .collect();
        Ok(Self { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; an empty registry cannot be built
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.sections.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Section at `index`, clamped into range
    pub fn section(&self, index: usize) -> &Section {
        &self.sections[index.min(self.last_index())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Clamp any requested index into `[0, N-1]`
    pub fn clamp_index(&self, index: i64) -> usize {
        index.clamp(0, self.last_index() as i64) as usize
    }
}

/// Per-section "content exceeds visible bounds" flags.
///
/// Produced by an external measurement pass; missing entries count as
/// not overflowing.
#[derive(Debug, Clone, Default)]
pub struct ContentOverflowMap {
    flags: AHashMap<usize, bool>,
}

impl ContentOverflowMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_overflowing(&self, index: usize) -> bool {
        self.flags.get(&index).copied().unwrap_or(false)
    }

    /// Merge fresh measurements; returns true when any flag changed
    pub fn apply(&mut self, measurements: impl IntoIterator<Item = (usize, bool)>) -> bool {
        let mut changed = false;
        for (index, overflowing) in measurements {
            let previous = self.flags.insert(index, overflowing);
            if previous.unwrap_or(false) != overflowing {
                changed = true;
            }
        }
        changed
    }
}

/// Label and state of the expand/collapse control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandAffordance {
    More,
    Less,
}

impl ExpandAffordance {
    pub fn label(&self) -> &'static str {
        match self {
            ExpandAffordance::More => "More",
            ExpandAffordance::Less => "Less",
        }
    }
}

/// Which side of a section an edge arrow sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Left,
    Right,
}

impl EdgeDirection {
    pub fn step(&self) -> i64 {
        match self {
            EdgeDirection::Left => -1,
            EdgeDirection::Right => 1,
        }
    }
}

/// One indicator dot
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub index: usize,
    pub active: bool,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(n: usize) -> SectionRegistry {
        let specs = (0..n)
            .map(|i| SectionSpec { title: format!("S{}", i), ..Default::default() })
            .collect();
        SectionRegistry::from_specs(specs).unwrap()
    }

    #[test]
    fn test_indices_are_dense() {
        let reg = registry(4);
        let indices: Vec<usize> = reg.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(reg.get(2).unwrap().title, "S2");
    }

    #[test]
    fn test_clamp_index() {
        let reg = registry(5);
        assert_eq!(reg.clamp_index(-1), 0);
        assert_eq!(reg.clamp_index(5), 4);
        assert_eq!(reg.clamp_index(3), 3);
    }

    #[test]
    fn test_section_lookup_is_clamped() {
        let reg = registry(3);
        assert_eq!(reg.section(1).index, 1);
        assert_eq!(reg.section(7).index, 2);
    }

    #[test]
    fn test_overflow_apply_reports_changes_only() {
        let mut map = ContentOverflowMap::new();
        assert!(map.apply([(2, true), (3, true)]));
        assert!(!map.apply([(2, true)]));
        assert!(!map.apply([(0, false)]));
        assert!(map.apply([(3, false)]));
        assert!(map.is_overflowing(2));
        assert!(!map.is_overflowing(3));
        assert!(!map.is_overflowing(9));
    }

    #[test]
    fn test_builtin_deck_carries_display_text() {
        let deck = SectionSpec::builtin_deck();
        assert_eq!(deck.len(), 5);
        assert!(deck.iter().all(|s| s.display_text.is_some()));
        assert!(deck[2].body_text.contains("Bullet point 10"));
    }
}
