//! Potion Arcade headless driver
//!
//! Plays either mini-game without a renderer: a simple autopilot feeds
//! intents into the engine and the result is printed at the end.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use potion_arcade::Tuning;
use potion_arcade::consts::SIM_DT;
use potion_arcade::sim::{
    ArcadeEngine, ArcadeEvent, Element, FixedStepClock, MissionCatalog, Recipe, RecipeBook, RecipeEngine,
    RecipeStatus,
};

#[derive(Debug, Parser)]
#[command(name = "potion-arcade", version, about = "Headless runs of the potion mini-games")]
struct Cli {
    /// Seed for goal picks, target layout and throws
    #[arg(long, global = true, default_value_t = 1)]
    seed: u64,

    /// JSON tuning file (missing fields keep their defaults)
    #[arg(long, global = true)]
    tuning: Option<PathBuf>,

    /// Print the final state as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the recipe-puzzle missions
    Missions,
    /// Auto-play one recipe-puzzle mission
    Recipe {
        #[arg(long, default_value_t = 1)]
        mission: u32,
    },
    /// Auto-play the ball-throw game
    Arcade {
        /// Simulated seconds before giving up
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,
        #[arg(long, default_value_t = 300.0)]
        width: f32,
        #[arg(long, default_value_t = 500.0)]
        height: f32,
    },
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let tuning = cli
        .tuning
        .as_deref()
        .map(Tuning::load_or_default)
        .unwrap_or_default();
    for warning in tuning.validate() {
        log::warn!("tuning: {warning}");
    }

    match cli.command {
        Command::Missions => list_missions(),
        Command::Recipe { mission } => play_recipe(&tuning, mission, cli.seed, cli.json),
        Command::Arcade {
            seconds,
            width,
            height,
        } => play_arcade(&tuning, Vec2::new(width, height), seconds, cli.seed, cli.json),
    }
}

fn list_missions() {
    for m in MissionCatalog::all() {
        let elements: Vec<_> = m.elements.iter().map(|e| e.symbol()).collect();
        println!(
            "{}. {:<18} {:<7} discover {:>2} in {:>2} moves  {}",
            m.id,
            m.title,
            m.difficulty.as_str(),
            m.potions_to_discover,
            m.move_budget,
            elements.join(" ")
        );
    }
}

/// A recipe the autopilot can reach: toggling one card per element means
/// only pairs of distinct elements ever sit in the cauldron together
fn reachable(recipe: &Recipe, allowed: &[Element]) -> bool {
    recipe.elements.len() == 2 && recipe.elements[0] != recipe.elements[1] && recipe.is_brewable_with(allowed)
}

/// Undiscovered goal first, then anything new, then the goal for its bonus
fn pick_recipe(engine: &RecipeEngine) -> Option<&'static Recipe> {
    let state = engine.state();
    let allowed = engine.mission().elements;
    let goal = state.goal().filter(|g| reachable(g, allowed));
    let fresh = RecipeBook::all()
        .iter()
        .find(|r| reachable(r, allowed) && !state.is_discovered(r.id));

    match (goal, fresh) {
        (Some(g), _) if !state.is_discovered(g.id) => Some(g),
        (_, Some(r)) => Some(r),
        (g, None) => g,
    }
}

fn play_recipe(tuning: &Tuning, mission_id: u32, seed: u64, json: bool) {
    let Some(&mission) = MissionCatalog::get(mission_id) else {
        log::error!("No mission {mission_id}; see `potion-arcade missions`");
        std::process::exit(2);
    };

    let mut engine =
        RecipeEngine::with_tuning(mission, tuning.recipe.clone(), Pcg32::seed_from_u64(seed));

    while engine.status() == RecipeStatus::Playing {
        let Some(recipe) = pick_recipe(&engine) else {
            log::info!("Nothing left to brew");
            break;
        };
        log::debug!("Brewing {}", recipe.name);
        for &element in recipe.elements {
            engine.toggle_element(element);
        }
        engine.advance_time(1.0);
    }

    let state = engine.state();
    if json {
        print_json(state);
        return;
    }

    let discovered: Vec<_> = state.discovered_recipes().map(|r| r.name).collect();
    println!("{} ({})", mission.title, mission.difficulty.as_str());
    println!("  status:     {:?}", engine.status());
    println!("  score:      {}", state.score);
    println!("  moves left: {}", state.moves_remaining);
    println!(
        "  discovered: {}/{} {}",
        discovered.len(),
        mission.potions_to_discover,
        discovered.join(", ")
    );
}

fn play_arcade(tuning: &Tuning, area: Vec2, seconds: f32, seed: u64, json: bool) {
    let mut engine = ArcadeEngine::with_tuning(tuning.arcade.clone(), Pcg32::seed_from_u64(seed));
    if !engine.setup_initial_positions(area) {
        log::error!("Play area {area} is empty");
        std::process::exit(2);
    }

    let mut clock = FixedStepClock::start(&engine);
    let frames = (seconds.max(0.0) / SIM_DT) as u64;
    let mut misses = 0;

    for frame in 0..frames {
        if !engine.state().is_active {
            break;
        }
        if engine.is_resting() {
            engine.throw_ball();
        } else {
            // Track the ball with a drifting offset so rallies don't loop
            let state = engine.state();
            let t = frame as f32 * 0.02;
            let offset = t.sin() * 30.0 + (t * 0.7).sin() * 15.0;
            let lead = state.ball_vel.x * 6.0;
            let x = state.ball_pos.x + lead + offset;
            engine.move_paddle(x);
        }

        clock.advance(&mut engine, SIM_DT);
        misses += engine
            .drain_events()
            .iter()
            .filter(|e| matches!(e, ArcadeEvent::BallMissed))
            .count();
    }

    let state = engine.state();
    if json {
        print_json(state);
        return;
    }

    println!("Ball throw ({}x{})", area.x, area.y);
    println!("  result:    {}", if state.is_active { "time up" } else { "cleared" });
    println!("  score:     {}", state.score);
    println!("  destroyed: {}/{}", state.items_destroyed, state.total_items);
    println!("  misses:    {misses}");
    println!("  steps:     {}", clock.steps());
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not serialize state: {err}"),
    }
}
