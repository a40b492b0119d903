//! Camp travel, zone lines, respawns and fleeing.

use super::RespawnTicket;
use super::spawn::{SpawnOutcome, spawn, validate_camp_pool};
use crate::combat::flee_chance;
use crate::config::CombatConfig;
use crate::env::{CombatLog, CombatRng, ContentOracle, LogKind, SaveOptions, SaveScheduler};
use crate::error::{CombatError, CombatResult};
use crate::state::{CharacterPatch, CombatState};

#[derive(Clone, Debug, PartialEq)]
pub struct TravelOutcome {
    pub zone_id: String,
    pub camp_id: String,
    pub spawn: SpawnOutcome,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RespawnOutcome {
    Spawned(SpawnOutcome),
    /// The ticket no longer matches the encounter; nothing spawned.
    Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FleeOutcome {
    Escaped { respawn: RespawnTicket },
    Failed,
    NothingToFlee,
}

/// Move to `camp_id`, which must be listed in the current camp's
/// connections and have every content flag enabled.
///
/// A camp with a target zone is a zone line and moves the player into that
/// zone's entry camp instead. The destination pool is validated before the
/// player leaves, so a misconfigured camp leaves the encounter untouched.
pub fn enter_camp(
    state: &mut CombatState,
    camp_id: &str,
    content: &(impl ContentOracle + ?Sized),
    rng: &mut (impl CombatRng + ?Sized),
    config: &CombatConfig,
    log: &mut (impl CombatLog + ?Sized),
    saves: &mut (impl SaveScheduler + ?Sized),
) -> CombatResult<TravelOutcome> {
    if state.character.is_dead() {
        return Err(CombatError::CharacterDead);
    }
    let from = content.require_camp(&state.encounter.camp_id)?;
    if !from.is_connected_to(camp_id) {
        return Err(CombatError::CampNotConnected {
            from: state.encounter.camp_id.clone(),
            to: camp_id.to_string(),
        });
    }
    let target = content.require_camp(camp_id)?;
    if let Some(flag) = target
        .content_flags
        .iter()
        .find(|flag| !config.is_content_enabled(flag))
    {
        return Err(CombatError::CampLocked {
            camp: camp_id.to_string(),
            flag: flag.clone(),
        });
    }

    if let Some(zone_id) = &target.target_zone_id {
        return enter_zone(state, zone_id, content, rng, log, saves);
    }

    let zone_id = if target.zone_id.is_empty() {
        state.encounter.zone_id.clone()
    } else {
        target.zone_id.clone()
    };
    validate_camp_pool(camp_id, content)?;

    log.add_log(format!("You travel to {}.", target.name), LogKind::System);
    relocate(state, zone_id, camp_id.to_string(), saves);
    let spawn = spawn(state, content, rng, log)?;
    Ok(TravelOutcome {
        zone_id: state.encounter.zone_id.clone(),
        camp_id: state.encounter.camp_id.clone(),
        spawn,
    })
}

/// Enter `zone_id` at its entry camp.
pub fn enter_zone(
    state: &mut CombatState,
    zone_id: &str,
    content: &(impl ContentOracle + ?Sized),
    rng: &mut (impl CombatRng + ?Sized),
    log: &mut (impl CombatLog + ?Sized),
    saves: &mut (impl SaveScheduler + ?Sized),
) -> CombatResult<TravelOutcome> {
    if state.character.is_dead() {
        return Err(CombatError::CharacterDead);
    }
    let zone = content.require_zone(zone_id)?;
    validate_camp_pool(&zone.entry_camp, content)?;

    log.add_log(format!("You have entered {}.", zone.name), LogKind::System);
    relocate(state, zone_id.to_string(), zone.entry_camp.clone(), saves);
    let spawn = spawn(state, content, rng, log)?;
    Ok(TravelOutcome {
        zone_id: state.encounter.zone_id.clone(),
        camp_id: state.encounter.camp_id.clone(),
        spawn,
    })
}

fn relocate(
    state: &mut CombatState,
    zone_id: String,
    camp_id: String,
    saves: &mut (impl SaveScheduler + ?Sized),
) {
    state.clear_mob();
    state.encounter.relocate(zone_id.clone(), camp_id.clone());
    state.character.zone_id = zone_id.clone();
    state.character.camp_id = Some(camp_id.clone());
    saves.schedule_save(
        CharacterPatch {
            zone_id: Some(zone_id),
            camp_id: Some(camp_id),
            ..CharacterPatch::default()
        },
        SaveOptions::DEFERRED,
    );
}

/// Spawn the next mob for a ticket issued by a kill or flee.
pub fn respawn(
    state: &mut CombatState,
    ticket: &RespawnTicket,
    content: &(impl ContentOracle + ?Sized),
    rng: &mut (impl CombatRng + ?Sized),
    log: &mut (impl CombatLog + ?Sized),
) -> CombatResult<RespawnOutcome> {
    if ticket.epoch != state.encounter.epoch
        || ticket.camp_id != state.encounter.camp_id
        || state.mob.is_some()
        || state.character.is_dead()
    {
        return Ok(RespawnOutcome::Stale);
    }
    spawn(state, content, rng, log).map(RespawnOutcome::Spawned)
}

/// Try to disengage from the active mob.
///
/// On success the mob is dropped and a respawn ticket for the current camp
/// is returned.
pub fn attempt_flee(
    state: &mut CombatState,
    content: &(impl ContentOracle + ?Sized),
    rng: &mut (impl CombatRng + ?Sized),
    config: &CombatConfig,
    log: &mut (impl CombatLog + ?Sized),
) -> CombatResult<FleeOutcome> {
    if state.character.is_dead() {
        return Err(CombatError::CharacterDead);
    }
    let Some(mob) = state.mob.as_ref() else {
        return Ok(FleeOutcome::NothingToFlee);
    };
    let camp_id = state.encounter.camp_id.clone();
    let delay_ms = content.require_camp(&camp_id)?.respawn_delay_ms(&camp_id)?;

    let player_speed = state.character.effective_movespeed(&state.player_mods());
    let mob_speed = mob.instance.effective_movespeed(&state.mob_mods());
    let chance = flee_chance(mob.engaged, player_speed, mob_speed, &config.flee)?;

    if !rng.chance(chance) {
        log.add_log(
            format!("You fail to escape from {}!", mob.name()),
            LogKind::Flee,
        );
        return Ok(FleeOutcome::Failed);
    }

    let name = mob.name().to_string();
    state.clear_mob();
    log.add_log(format!("You flee from {name}."), LogKind::Flee);
    Ok(FleeOutcome::Escaped {
        respawn: RespawnTicket {
            epoch: state.encounter.epoch,
            camp_id,
            delay_ms,
        },
    })
}
