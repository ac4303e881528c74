//! Recipe-matching engine
//!
//! The player toggles element cards into a cauldron. As soon as two or more
//! elements sit in the cauldron they are checked against the recipe book:
//! a match brews the potion, anything else is a wrong combination. Either
//! way the attempt costs one move and the cauldron is emptied.

use rand::Rng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{Mission, Recipe, RecipeBook, RecipeId};
use super::element::Element;
use crate::consts::{CAULDRON_CAPACITY, MIN_COMBINATION};
use crate::notice::{Notice, NoticeSlot};
use crate::tuning::RecipeTuning;

/// A selectable element in the mission's hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCard {
    pub element: Element,
    pub selected: bool,
}

/// Observable state of one playthrough
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeState {
    pub score: u32,
    pub moves_remaining: u32,
    /// Distinct recipes brewed so far, oldest first
    pub discovered: Vec<RecipeId>,
    pub current_goal: Option<RecipeId>,
    /// Terminal once set
    pub has_won: bool,
    /// Selected elements in insertion order
    pub cauldron: Vec<Element>,
    /// One card per mission element
    pub cards: Vec<ElementCard>,
}

impl RecipeState {
    fn new(mission: &Mission) -> Self {
        Self {
            score: 0,
            moves_remaining: mission.move_budget,
            discovered: Vec::new(),
            current_goal: None,
            has_won: false,
            cauldron: Vec::with_capacity(CAULDRON_CAPACITY),
            cards: mission
                .elements
                .iter()
                .map(|&element| ElementCard {
                    element,
                    selected: false,
                })
                .collect(),
        }
    }

    pub fn goal(&self) -> Option<&'static Recipe> {
        self.current_goal.and_then(RecipeBook::get)
    }

    pub fn is_discovered(&self, id: RecipeId) -> bool {
        self.discovered.contains(&id)
    }

    /// Discovered recipes, oldest first
    pub fn discovered_recipes(&self) -> impl Iterator<Item = &'static Recipe> + '_ {
        self.discovered.iter().filter_map(|&id| RecipeBook::get(id))
    }
}

/// Where a playthrough stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecipeStatus {
    Playing,
    Won,
    /// Out of moves without reaching the discovery target
    Lost,
}

/// Things that happened in response to an intent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum RecipeEvent {
    ElementAdded { element: Element },
    ElementRemoved { element: Element },
    GoalSelected { recipe: RecipeId },
    PotionBrewed { recipe: RecipeId, points: u32 },
    PotionDiscovered { recipe: RecipeId },
    GoalComplete { recipe: RecipeId, bonus: u32 },
    WrongCombination { elements: Vec<Element> },
    CauldronCleared,
    MissionWon { score: u32 },
    OutOfMoves { score: u32 },
}

impl RecipeEvent {
    /// Banner text for events the player should see animated
    fn banner(&self) -> Option<String> {
        match self {
            RecipeEvent::ElementAdded { element } => {
                Some(format!("{} {} added", element.symbol(), element.name()))
            }
            RecipeEvent::PotionDiscovered { recipe } => RecipeBook::get(*recipe)
                .map(|r| format!("{} New potion: {}! +{}", r.symbol, r.name, r.points)),
            RecipeEvent::GoalComplete { bonus, .. } => Some(format!("Goal complete! +{bonus}")),
            RecipeEvent::WrongCombination { .. } => Some("Wrong combination".to_string()),
            RecipeEvent::CauldronCleared => Some("Cauldron cleared".to_string()),
            _ => None,
        }
    }
}

/// Recipe puzzle engine for one mission
#[derive(Debug, Clone)]
pub struct RecipeEngine<R = Pcg32> {
    mission: Mission,
    tuning: RecipeTuning,
    rng: R,
    state: RecipeState,
    events: Vec<RecipeEvent>,
    notice: NoticeSlot<RecipeEvent>,
}

impl RecipeEngine<Pcg32> {
    /// Engine with a seeded generator for reproducible goal picks
    pub fn seeded(mission: Mission, seed: u64) -> Self {
        Self::new(mission, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> RecipeEngine<R> {
    pub fn new(mission: Mission, rng: R) -> Self {
        Self::with_tuning(mission, RecipeTuning::default(), rng)
    }

    pub fn with_tuning(mission: Mission, tuning: RecipeTuning, rng: R) -> Self {
        let notice = NoticeSlot::new(tuning.notice_secs);
        let mut engine = Self {
            state: RecipeState::new(&mission),
            mission,
            tuning,
            rng,
            events: Vec::new(),
            notice,
        };
        log::info!(
            "Mission {} \"{}\": discover {} potions in {} moves",
            mission.id,
            mission.title,
            mission.potions_to_discover,
            mission.move_budget
        );
        engine.select_goal();
        engine
    }

    /// Put an element into the cauldron, or take it back out.
    ///
    /// Returns false (and changes nothing) when the game is over, the element
    /// is not part of this mission, or the cauldron is full.
    pub fn toggle_element(&mut self, element: Element) -> bool {
        if self.is_over() {
            log::debug!("Ignoring {element}: game over");
            return false;
        }
        let Some(card) = self.state.cards.iter().position(|c| c.element == element) else {
            log::debug!("Ignoring {element}: not in mission {}", self.mission.id);
            return false;
        };

        if let Some(pos) = self.state.cauldron.iter().position(|&e| e == element) {
            self.state.cauldron.remove(pos);
            self.state.cards[card].selected = self.state.cauldron.contains(&element);
            self.emit(RecipeEvent::ElementRemoved { element });
        } else if self.state.cauldron.len() < CAULDRON_CAPACITY {
            self.state.cauldron.push(element);
            self.state.cards[card].selected = true;
            self.emit(RecipeEvent::ElementAdded { element });
        } else {
            log::debug!("Ignoring {element}: cauldron full");
            return false;
        }

        self.resolve_cauldron();
        true
    }

    /// Empty the cauldron at the cost of one move
    pub fn clear_cauldron(&mut self) -> bool {
        if self.state.cauldron.is_empty() || self.is_over() {
            return false;
        }
        self.spend_move();
        self.reset_cauldron();
        self.emit(RecipeEvent::CauldronCleared);
        self.check_out_of_moves();
        true
    }

    /// Start the same mission over
    pub fn reset_game(&mut self) {
        self.state = RecipeState::new(&self.mission);
        self.events.clear();
        self.notice.cancel();
        log::info!("Mission {} restarted", self.mission.id);
        self.select_goal();
    }

    /// Let wall-clock time pass for the banner
    pub fn advance_time(&mut self, dt: f32) {
        self.notice.advance(dt);
    }

    pub fn status(&self) -> RecipeStatus {
        if self.state.has_won {
            RecipeStatus::Won
        } else if self.state.moves_remaining == 0 {
            RecipeStatus::Lost
        } else {
            RecipeStatus::Playing
        }
    }

    pub fn state(&self) -> &RecipeState {
        &self.state
    }

    pub fn snapshot(&self) -> RecipeState {
        self.state.clone()
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    pub fn cards(&self) -> &[ElementCard] {
        &self.state.cards
    }

    /// The potion shown in the discovery sheet
    pub fn latest_discovery(&self) -> Option<&'static Recipe> {
        self.state.discovered.last().copied().and_then(RecipeBook::get)
    }

    pub fn notice(&self) -> Option<&Notice<RecipeEvent>> {
        self.notice.current()
    }

    /// Take all events emitted since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<RecipeEvent> {
        std::mem::take(&mut self.events)
    }

    fn is_over(&self) -> bool {
        self.state.has_won || self.state.moves_remaining == 0
    }

    fn select_goal(&mut self) {
        let eligible: Vec<&'static Recipe> =
            RecipeBook::available_for(self.mission.elements).collect();
        self.state.current_goal = eligible.choose(&mut self.rng).map(|r| r.id);

        match self.state.goal() {
            Some(goal) => {
                log::info!("New goal: {} ({} pts)", goal.name, goal.points);
                self.emit(RecipeEvent::GoalSelected { recipe: goal.id });
            }
            None => log::info!("Mission {} has no brewable goal", self.mission.id),
        }
    }

    fn resolve_cauldron(&mut self) {
        if self.state.cauldron.len() < MIN_COMBINATION {
            return;
        }

        match RecipeBook::find_match(&self.state.cauldron) {
            Some(recipe) => self.brew(recipe),
            None => {
                self.spend_move();
                let elements = std::mem::take(&mut self.state.cauldron);
                log::debug!("Wrong combination: {elements:?}");
                self.reset_cauldron();
                self.emit(RecipeEvent::WrongCombination { elements });
            }
        }
        self.check_out_of_moves();
    }

    fn brew(&mut self, recipe: &'static Recipe) {
        self.state.score += recipe.points;
        self.spend_move();
        self.emit(RecipeEvent::PotionBrewed {
            recipe: recipe.id,
            points: recipe.points,
        });

        if !self.state.is_discovered(recipe.id) {
            self.state.discovered.push(recipe.id);
            log::info!(
                "Discovered {} ({}/{})",
                recipe.name,
                self.state.discovered.len(),
                self.mission.potions_to_discover
            );
            self.emit(RecipeEvent::PotionDiscovered { recipe: recipe.id });
        }

        if self.state.current_goal == Some(recipe.id) {
            let bonus = self.tuning.goal_bonus;
            self.state.score += bonus;
            self.select_goal();
            self.emit(RecipeEvent::GoalComplete {
                recipe: recipe.id,
                bonus,
            });
        }

        if self.state.discovered.len() >= self.mission.potions_to_discover {
            self.state.has_won = true;
            log::info!("Mission {} won with {} points", self.mission.id, self.state.score);
            self.emit(RecipeEvent::MissionWon {
                score: self.state.score,
            });
        }

        self.reset_cauldron();
    }

    fn spend_move(&mut self) {
        self.state.moves_remaining = self.state.moves_remaining.saturating_sub(1);
    }

    fn check_out_of_moves(&mut self) {
        if self.state.moves_remaining == 0 && !self.state.has_won {
            log::info!("Mission {} out of moves at {} points", self.mission.id, self.state.score);
            self.emit(RecipeEvent::OutOfMoves {
                score: self.state.score,
            });
        }
    }

    fn reset_cauldron(&mut self) {
        self.state.cauldron.clear();
        for card in &mut self.state.cards {
            card.selected = false;
        }
    }

    fn emit(&mut self, event: RecipeEvent) {
        log::debug!("{event:?}");
        if let Some(banner) = event.banner() {
            self.notice.show(event.clone(), banner);
        }
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{Difficulty, MissionCatalog};
    use Element::*;

    fn mission(id: u32) -> Mission {
        *MissionCatalog::get(id).unwrap()
    }

    fn recipe_named(name: &str) -> &'static Recipe {
        RecipeBook::all().iter().find(|r| r.name == name).unwrap()
    }

    /// Toggle each element in turn
    fn toggle_all(engine: &mut RecipeEngine, elements: &[Element]) {
        for &e in elements {
            assert!(engine.toggle_element(e), "toggle {e} rejected");
        }
    }

    #[test]
    fn new_game_state() {
        let engine = RecipeEngine::seeded(mission(2), 7);
        let state = engine.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.moves_remaining, 20);
        assert!(state.discovered.is_empty());
        assert!(state.cauldron.is_empty());
        assert!(!state.has_won);
        assert_eq!(state.cards.len(), 4);
        assert!(state.cards.iter().all(|c| !c.selected));

        let goal = state.goal().unwrap();
        assert!(goal.is_brewable_with(mission(2).elements));
        assert_eq!(engine.status(), RecipeStatus::Playing);
    }

    #[test]
    fn steam_cloud_goal_scenario() {
        let mut engine = RecipeEngine::seeded(mission(1), 1);
        // Steam Cloud is the only recipe brewable from Fire and Water
        assert_eq!(engine.state().goal().unwrap().name, "Steam Cloud");

        assert!(engine.toggle_element(Fire));
        assert_eq!(engine.state().cauldron, vec![Fire]);
        assert_eq!(engine.state().moves_remaining, 15);
        assert!(engine.cards()[0].selected);

        engine.drain_events();
        assert!(engine.toggle_element(Water));
        let state = engine.state();
        assert_eq!(state.score, 150);
        assert_eq!(state.moves_remaining, 14);
        assert_eq!(state.discovered, vec![recipe_named("Steam Cloud").id]);
        assert!(state.cauldron.is_empty());
        assert!(state.cards.iter().all(|c| !c.selected));
        assert_eq!(state.current_goal, Some(recipe_named("Steam Cloud").id));

        let events = engine.drain_events();
        assert!(matches!(events[0], RecipeEvent::ElementAdded { element: Water }));
        assert!(matches!(events[1], RecipeEvent::PotionBrewed { points: 50, .. }));
        assert!(matches!(events[2], RecipeEvent::PotionDiscovered { .. }));
        assert!(matches!(events[3], RecipeEvent::GoalSelected { .. }));
        assert!(matches!(events[4], RecipeEvent::GoalComplete { bonus: 100, .. }));
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn rediscovery_scores_without_duplicating() {
        let mut engine = RecipeEngine::seeded(mission(2), 3);
        engine.state.current_goal = None;

        toggle_all(&mut engine, &[Earth, Air]);
        toggle_all(&mut engine, &[Air, Earth]);

        let state = engine.state();
        assert_eq!(state.score, 110);
        assert_eq!(state.discovered, vec![recipe_named("Dust Storm").id]);
        assert_eq!(state.moves_remaining, 18);
    }

    #[test]
    fn wrong_combination_costs_a_move() {
        let mut engine = RecipeEngine::seeded(mission(4), 9);
        engine.drain_events();

        toggle_all(&mut engine, &[Fire, Light]);
        let state = engine.state();
        assert_eq!(state.moves_remaining, 29);
        assert_eq!(state.score, 0);
        assert!(state.cauldron.is_empty());
        assert!(state.discovered.is_empty());

        let events = engine.drain_events();
        assert_eq!(
            events.last(),
            Some(&RecipeEvent::WrongCombination {
                elements: vec![Fire, Light]
            })
        );
        assert_eq!(engine.notice().unwrap().message, "Wrong combination");
    }

    #[test]
    fn deselecting_removes_from_cauldron() {
        let mut engine = RecipeEngine::seeded(mission(2), 5);
        assert!(engine.toggle_element(Fire));
        assert!(engine.toggle_element(Fire));
        assert!(engine.state().cauldron.is_empty());
        assert!(!engine.cards()[0].selected);
        // Single-element toggles never resolve
        assert_eq!(engine.state().moves_remaining, 20);
    }

    #[test]
    fn three_element_recipe() {
        let mut engine = RecipeEngine::seeded(mission(2), 5);
        engine.state.current_goal = None;
        // Two elements always resolve, so seed a pair the toggles can't leave behind
        engine.state.cauldron = vec![Fire, Earth];
        engine.toggle_element(Air);
        assert_eq!(engine.state().discovered, vec![recipe_named("Volcanic Ash").id]);
        assert_eq!(engine.state().score, 100);
    }

    #[test]
    fn cauldron_rejects_fifth_element() {
        let mut engine = RecipeEngine::seeded(mission(4), 11);
        engine.state.cauldron = vec![Fire, Water, Earth, Air];
        let before = engine.snapshot();

        assert!(!engine.toggle_element(Light));
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.state().cauldron.len(), 4);
    }

    #[test]
    fn element_outside_mission_is_rejected() {
        let mut engine = RecipeEngine::seeded(mission(1), 2);
        assert!(!engine.toggle_element(Shadow));
        assert!(engine.state().cauldron.is_empty());
    }

    #[test]
    fn clear_cauldron_costs_a_move() {
        let mut engine = RecipeEngine::seeded(mission(3), 4);
        assert!(!engine.clear_cauldron());
        assert_eq!(engine.state().moves_remaining, 25);

        engine.toggle_element(Light);
        assert!(engine.clear_cauldron());
        assert_eq!(engine.state().moves_remaining, 24);
        assert!(engine.state().cauldron.is_empty());
        assert!(engine.cards().iter().all(|c| !c.selected));
        assert_eq!(engine.notice().unwrap().message, "Cauldron cleared");
    }

    #[test]
    fn win_locks_further_intents() {
        let custom = Mission {
            id: 99,
            title: "Quick Study",
            description: "Two potions",
            elements: &[Fire, Water, Earth, Air],
            potions_to_discover: 2,
            move_budget: 10,
            difficulty: Difficulty::Easy,
        };
        let mut engine = RecipeEngine::seeded(custom, 8);
        engine.state.current_goal = None;

        toggle_all(&mut engine, &[Fire, Water]);
        assert!(!engine.state().has_won);
        toggle_all(&mut engine, &[Water, Air]);
        assert!(engine.state().has_won);
        assert_eq!(engine.status(), RecipeStatus::Won);
        assert!(engine.drain_events().contains(&RecipeEvent::MissionWon { score: 95 }));

        let before = engine.snapshot();
        assert!(!engine.toggle_element(Fire));
        assert!(!engine.clear_cauldron());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn running_out_of_moves_loses() {
        let custom = Mission {
            move_budget: 2,
            ..mission(2)
        };
        let mut engine = RecipeEngine::seeded(custom, 12);
        toggle_all(&mut engine, &[Fire, Air]);
        toggle_all(&mut engine, &[Water, Earth]);

        assert_eq!(engine.state().moves_remaining, 0);
        assert_eq!(engine.status(), RecipeStatus::Lost);
        assert!(matches!(
            engine.drain_events().last(),
            Some(RecipeEvent::OutOfMoves { .. })
        ));
        assert!(!engine.toggle_element(Fire));
        assert_eq!(engine.state().moves_remaining, 0);
    }

    #[test]
    fn mission_without_recipes_has_no_goal() {
        let custom = Mission {
            elements: &[Shadow, Light],
            ..mission(4)
        };
        let mut engine = RecipeEngine::seeded(custom, 13);
        assert!(engine.state().current_goal.is_none());

        toggle_all(&mut engine, &[Shadow, Light]);
        assert_eq!(engine.state().moves_remaining, 29);
        assert!(engine.state().current_goal.is_none());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut engine = RecipeEngine::seeded(mission(2), 21);
        engine.state.current_goal = None;
        toggle_all(&mut engine, &[Fire, Water]);
        engine.toggle_element(Earth);

        engine.reset_game();
        let state = engine.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.moves_remaining, 20);
        assert!(state.discovered.is_empty());
        assert!(state.cauldron.is_empty());
        assert!(state.current_goal.is_some());
        assert!(engine.notice().is_none());
    }

    #[test]
    fn banner_expires() {
        let mut engine = RecipeEngine::seeded(mission(2), 1);
        engine.toggle_element(Air);
        assert!(engine.notice().is_some());
        engine.advance_time(1.0);
        assert!(engine.notice().is_some());
        engine.advance_time(0.6);
        assert!(engine.notice().is_none());
    }

    #[test]
    fn latest_discovery_is_most_recent() {
        let mut engine = RecipeEngine::seeded(mission(2), 6);
        engine.state.current_goal = None;
        assert!(engine.latest_discovery().is_none());
        toggle_all(&mut engine, &[Fire, Water]);
        toggle_all(&mut engine, &[Earth, Fire]);
        assert_eq!(engine.latest_discovery().unwrap().name, "Lava Flow");
    }

    #[test]
    fn same_seed_same_goals() {
        let a = RecipeEngine::seeded(mission(5), 42);
        let b = RecipeEngine::seeded(mission(5), 42);
        assert_eq!(a.state().current_goal, b.state().current_goal);
    }
}
