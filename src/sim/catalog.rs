//! Static game data: the recipe book and the mission list

use serde::Serialize;

use super::element::Element;
use super::element::Element::{Air, Earth, Fire, Light, Shadow, Water};

pub type RecipeId = u32;

/// A potion and the element multiset that brews it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: &'static str,
    pub description: &'static str,
    pub symbol: &'static str,
    /// Required elements; order is irrelevant, duplicates count
    pub elements: &'static [Element],
    pub points: u32,
}

impl Recipe {
    /// Exact multiset match against a cauldron
    pub fn matches(&self, elements: &[Element]) -> bool {
        elements.len() == self.elements.len()
            && Element::counts(elements) == Element::counts(self.elements)
    }

    /// True if every required element is in `allowed`
    pub fn is_brewable_with(&self, allowed: &[Element]) -> bool {
        self.elements.iter().all(|e| allowed.contains(e))
    }
}

static RECIPES: [Recipe; 10] = [
    Recipe {
        id: 1,
        name: "Steam Cloud",
        description: "Fire meets Water",
        symbol: "☁️",
        elements: &[Fire, Water],
        points: 50,
    },
    Recipe {
        id: 2,
        name: "Lava Flow",
        description: "Earth heated by Fire",
        symbol: "🌋",
        elements: &[Earth, Fire],
        points: 60,
    },
    Recipe {
        id: 3,
        name: "Dust Storm",
        description: "Earth swept by Air",
        symbol: "💨",
        elements: &[Earth, Air],
        points: 55,
    },
    Recipe {
        id: 4,
        name: "Rain Cloud",
        description: "Water carried by Air",
        symbol: "🌧️",
        elements: &[Water, Air],
        points: 45,
    },
    Recipe {
        id: 5,
        name: "Volcanic Ash",
        description: "Elemental fury aftermath",
        symbol: "🌫️",
        elements: &[Fire, Earth, Air],
        points: 100,
    },
    Recipe {
        id: 6,
        name: "Healing Spring",
        description: "Blessed waters",
        symbol: "💫",
        elements: &[Water, Earth, Light],
        points: 120,
    },
    Recipe {
        id: 7,
        name: "Shadow Flame",
        description: "Fire consuming light",
        symbol: "🔥",
        elements: &[Fire, Shadow, Air],
        points: 150,
    },
    Recipe {
        id: 8,
        name: "Starlight Elixir",
        description: "Pure light captured",
        symbol: "⭐",
        elements: &[Light, Light, Air],
        points: 200,
    },
    Recipe {
        id: 9,
        name: "Abyssal Tincture",
        description: "Essence of nothingness",
        symbol: "⚫",
        elements: &[Shadow, Shadow, Water],
        points: 180,
    },
    Recipe {
        id: 10,
        name: "Elemental Harmony",
        description: "Perfect balance",
        symbol: "🌈",
        elements: &[Fire, Water, Earth, Air],
        points: 300,
    },
];

/// Read-only recipe catalog
pub struct RecipeBook;

impl RecipeBook {
    /// All recipes in definition order
    pub fn all() -> &'static [Recipe] {
        &RECIPES
    }

    pub fn get(id: RecipeId) -> Option<&'static Recipe> {
        RECIPES.iter().find(|r| r.id == id)
    }

    /// First recipe (in definition order) brewed by exactly these elements
    pub fn find_match(elements: &[Element]) -> Option<&'static Recipe> {
        RECIPES.iter().find(|r| r.matches(elements))
    }

    /// Recipes that only need elements from `allowed`
    pub fn available_for(allowed: &[Element]) -> impl Iterator<Item = &'static Recipe> + '_ {
        RECIPES.iter().filter(move |r| r.is_brewable_with(allowed))
    }
}

/// Mission difficulty label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::Master => "Master",
        }
    }
}

/// Rules for one recipe-puzzle playthrough
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mission {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    /// Elements the player may use
    pub elements: &'static [Element],
    /// Distinct potions needed to win
    pub potions_to_discover: usize,
    pub move_budget: u32,
    pub difficulty: Difficulty,
}

static MISSIONS: [Mission; 5] = [
    Mission {
        id: 1,
        title: "Apprentice Brewer",
        description: "Learn basic element combinations",
        elements: &[Fire, Water],
        potions_to_discover: 3,
        move_budget: 15,
        difficulty: Difficulty::Easy,
    },
    Mission {
        id: 2,
        title: "Novice Alchemist",
        description: "Master earth and air elements",
        elements: &[Fire, Water, Earth, Air],
        potions_to_discover: 5,
        move_budget: 20,
        difficulty: Difficulty::Medium,
    },
    Mission {
        id: 3,
        title: "Adept Wizard",
        description: "Discover the power of light",
        elements: &[Fire, Water, Earth, Air, Light],
        potions_to_discover: 8,
        move_budget: 25,
        difficulty: Difficulty::Hard,
    },
    Mission {
        id: 4,
        title: "Expert Sorcerer",
        description: "Harness shadow magic",
        elements: &Element::ALL,
        potions_to_discover: 12,
        move_budget: 30,
        difficulty: Difficulty::Expert,
    },
    Mission {
        id: 5,
        title: "Master Archmage",
        description: "Ultimate brewing challenge",
        elements: &Element::ALL,
        potions_to_discover: 15,
        move_budget: 35,
        difficulty: Difficulty::Master,
    },
];

/// Read-only mission list
pub struct MissionCatalog;

impl MissionCatalog {
    pub fn all() -> &'static [Mission] {
        &MISSIONS
    }

    pub fn get(id: u32) -> Option<&'static Mission> {
        MISSIONS.iter().find(|m| m.id == id)
    }
}
