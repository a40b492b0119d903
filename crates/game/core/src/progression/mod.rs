//! Consequences of XP changes and player death.
pub mod death;
pub mod leveling;

pub use death::{DeathOutcome, death_penalty, handle_player_death};
pub use leveling::{LevelUpReport, process_xp};
