//! Deterministic game engines
//!
//! All gameplay logic lives here. Engines must stay pure and reproducible:
//! - Injected, seedable RNG only
//! - Stable iteration order (catalog order, target creation order)
//! - No rendering or platform dependencies

pub mod arcade;
pub mod catalog;
pub mod clock;
pub mod collision;
pub mod element;
pub mod recipe;
pub mod tick;

pub use arcade::{ArcadeEngine, ArcadeEvent, ArcadeState, Target};
pub use catalog::{Difficulty, Mission, MissionCatalog, Recipe, RecipeBook, RecipeId};
pub use clock::FixedStepClock;
pub use collision::Aabb;
pub use element::{Element, ElementCounts};
pub use recipe::{ElementCard, RecipeEngine, RecipeEvent, RecipeState, RecipeStatus};
pub use tick::{paddle_bounds, resting_ball_pos, step};
