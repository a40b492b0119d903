//! Encounter control: camp draws, kills, respawns, flee and camp travel.
//!
//! Every operation here reads static data through a
//! [`ContentOracle`](crate::env::ContentOracle) and validates what it needs
//! before touching [`CombatState`](crate::state::CombatState).
pub mod kill;
pub mod spawn;
pub mod travel;

pub use kill::{
    KillGuard, KillOutcome, KillRecord, KillReward, LootDrop, handle_kill, loot_quantity, xp_award,
};
pub use spawn::{
    SpawnOutcome, draw_spawn, normalize_template, select_weighted, spawn, validate_camp_pool,
};
pub use travel::{
    FleeOutcome, RespawnOutcome, TravelOutcome, attempt_flee, enter_camp, enter_zone, respawn,
};

/// A pending respawn for `camp_id`, valid only while the encounter epoch is
/// still `epoch`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RespawnTicket {
    pub epoch: u64,
    pub camp_id: String,
    pub delay_ms: u64,
}
