//! Deterministic camp combat rules.
//!
//! `combat-core` holds the rules for one player fighting one mob at a time:
//! hit and resist math, damage resolution against live pools, timed effects,
//! camp spawns and kills, leveling and death. Nothing here performs I/O.
//! Static data comes in through [`env::ContentOracle`], randomness through
//! [`env::CombatRng`], and every side effect (combat log, saves, inventory)
//! leaves through the collaborator traits in [`env`].
//!
//! All mutation goes through a [`state::CombatState`] passed by `&mut`, so
//! the hosting runtime decides how operations are serialized.
pub mod combat;
pub mod config;
pub mod effects;
pub mod encounter;
pub mod env;
pub mod error;
pub mod progression;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

pub use combat::{
    CombatEvent, ConColor, DamageKind, DamageResolution, HitOutcome, HitRequest, MobAttackOutcome,
    ResistOutcome, ResistProfile, apply_hit, apply_resist, dodge_chance, flee_chance,
    resolve_damage, resolve_mob_attack,
};
pub use config::{CombatConfig, DodgeConfig, FleeConfig};
pub use effects::{Effect, EffectBook, EffectId, EffectKind, EffectSet, EffectSpec, TickReport};
pub use encounter::{
    FleeOutcome, KillGuard, KillOutcome, KillReward, LootDrop, RespawnOutcome, RespawnTicket,
    SpawnOutcome, TravelOutcome, attempt_flee, enter_camp, enter_zone, handle_kill, respawn, spawn,
};
pub use env::{
    CampDefinition, CampSpawn, ClassDefinition, Collaborators, CombatLog, CombatRng,
    ContentOracle, Inventory, ItemDefinition, ItemInstance, LogEntry, LogKind, LootEntry,
    LootTable, MobTemplate, PcgRng, SaveOptions, SaveScheduler, ScriptedRng, ZoneDefinition,
};
pub use error::{CombatError, CombatResult, ConfigError, ContractError, ErrorSeverity, GameError};
pub use progression::{DeathOutcome, LevelUpReport, handle_player_death, process_xp};
pub use state::{
    ActiveMob, Character, CharacterPatch, CombatState, EncounterContext, GameMode, MobInstance,
    MobKey, MobRole, Target, Timestamp,
};
pub use stats::{
    Attribute, Attributes, DamageSchool, Resource, ResourcePool, ResistValues, StatKey, StatMods,
    VitalMaxima, VitalSnapshot, Vitals,
};
