//! Potion Arcade - game-state engines for two casual mini-games
//!
//! Core modules:
//! - `sim`: Deterministic engines (recipe puzzle, arcade physics, catalogs)
//! - `notice`: Single-slot transient notifications (toasts, banners)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, navigation and audio live outside this crate. A presentation
//! layer forwards intents into an engine and re-renders from its state.

pub mod notice;
pub mod sim;
pub mod tuning;

pub use notice::{Notice, NoticeSlot};
pub use tuning::{ArcadeTuning, RecipeTuning, Tuning};

/// Game configuration constants
pub mod consts {
    /// Arcade clock rate (steps per second)
    pub const SIM_HZ: f32 = 60.0;
    /// Wall-clock duration of one arcade step
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Maximum number of elements the cauldron holds
    pub const CAULDRON_CAPACITY: usize = 4;
    /// Smallest cauldron that is checked against the recipe book
    pub const MIN_COMBINATION: usize = 2;
}
