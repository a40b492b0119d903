//! Combat resolution.
//!
//! - [`hit`]: pure single-hit math (mitigation, runes, damage shield report)
//! - [`resist`]: spell mitigation with the level-gap adjustment
//! - [`resolution`]: applies hits to [`CombatState`](crate::state::CombatState)
//!   and raises death events
//! - [`evasion`]: flee and dodge probabilities
//! - [`con`]: display-only level difference bands

pub mod con;
pub mod evasion;
pub mod hit;
pub mod resist;
pub mod resolution;

pub use con::ConColor;
pub use evasion::{dodge_chance, flee_chance};
pub use hit::{DamageKind, HitOutcome, HitRequest, apply_hit};
pub use resist::{
    MobCasterMods, ResistOutcome, ResistProfile, apply_resist, level_adjustment,
    mitigate_incoming_spell, mitigate_outgoing_spell, mob_caster_mods,
};
pub use resolution::{
    CombatEvent, DamageResolution, MobAttackOutcome, resolve_damage, resolve_mob_attack,
};
