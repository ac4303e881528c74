//! The six alchemical elements shared by both games

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Shadow,
}

/// Per-element counts of an element multiset, indexed by `Element::index`
pub type ElementCounts = [u8; Element::COUNT];

impl Element {
    pub const COUNT: usize = 6;

    /// Every element in catalog order
    pub const ALL: [Element; Element::COUNT] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Light,
        Element::Shadow,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Light => "Light",
            Element::Shadow => "Shadow",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::Fire => "🔥",
            Element::Water => "💧",
            Element::Earth => "🌍",
            Element::Air => "💨",
            Element::Light => "✨",
            Element::Shadow => "🌑",
        }
    }

    /// Score for destroying this element's arcade target
    pub fn points(self) -> u32 {
        match self {
            Element::Fire => 100,
            Element::Water => 80,
            Element::Earth => 90,
            Element::Air => 70,
            Element::Light => 120,
            Element::Shadow => 110,
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Element::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s))
    }

    /// Order-independent, duplicate-sensitive view of an element list
    pub fn counts(elements: &[Element]) -> ElementCounts {
        let mut counts = [0u8; Element::COUNT];
        for e in elements {
            counts[e.index()] = counts[e.index()].saturating_add(1);
        }
        counts
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
