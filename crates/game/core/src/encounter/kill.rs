//! Mob kill handling: XP, loot, level-ups and the respawn ticket.

use super::RespawnTicket;
use crate::config::CombatConfig;
use crate::env::{Collaborators, CombatRng, ContentOracle, ItemInstance, LogKind, SaveOptions};
use crate::error::{CombatResult, ContractError};
use crate::progression::{LevelUpReport, process_xp};
use crate::state::{CharacterPatch, CombatState, MobKey, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KillRecord {
    pub mob_key: MobKey,
    pub at: Timestamp,
}

/// Suppresses a second kill signal for the same mob inside the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KillGuard {
    last: Option<KillRecord>,
}

impl KillGuard {
    pub fn is_duplicate(&self, mob_key: MobKey, now: Timestamp, window_ms: u64) -> bool {
        self.last
            .is_some_and(|record| record.mob_key == mob_key && now.since(record.at) < window_ms)
    }

    pub fn record(&mut self, mob_key: MobKey, now: Timestamp) {
        self.last = Some(KillRecord { mob_key, at: now });
    }

    /// Record the kill unless it duplicates the last one.
    pub fn admit(&mut self, mob_key: MobKey, now: Timestamp, window_ms: u64) -> bool {
        if self.is_duplicate(mob_key, now, window_ms) {
            return false;
        }
        self.record(mob_key, now);
        true
    }

    pub fn last(&self) -> Option<KillRecord> {
        self.last
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LootDrop {
    pub item: ItemInstance,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KillReward {
    pub mob_key: MobKey,
    pub mob_name: String,
    pub xp: u64,
    pub loot: Vec<LootDrop>,
    pub level_up: LevelUpReport,
    pub respawn: RespawnTicket,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KillOutcome {
    /// Same mob reported dead again inside the dedupe window.
    Duplicate,
    /// The mob is no longer the active mob.
    Stale,
    Awarded(KillReward),
}

/// XP for killing a mob worth `base_xp`.
pub fn xp_award(
    base_xp: u64,
    xp_bonus_pct: f64,
    xp_rate: f64,
    character_mod: f64,
    zone_mod: f64,
    camp_mod: f64,
) -> Result<u64, ContractError> {
    let raw = base_xp as f64
        * (1.0 + xp_bonus_pct / 100.0)
        * xp_rate
        * character_mod
        * zone_mod
        * camp_mod;
    let raw = ContractError::finite("xp award", raw)?;
    Ok(raw.max(0.0).floor() as u64)
}

/// Loot quantity for one dropped entry: `max(min_qty, ceil(draw * max_qty))`.
pub fn loot_quantity(draw: f64, min_qty: u32, max_qty: u32) -> u32 {
    let rolled = (draw * f64::from(max_qty)).ceil().clamp(0.0, f64::from(u32::MAX)) as u32;
    rolled.max(min_qty)
}

/// Handle the death of mob `key`.
///
/// Everything the kill depends on (camp spawn time, zone, loot table, items,
/// class) is validated before any state changes. Then: XP is awarded and
/// saved immediately, every loot entry rolls independently, level-ups are
/// processed and a respawn ticket for the current camp is returned.
pub fn handle_kill(
    state: &mut CombatState,
    key: MobKey,
    now: Timestamp,
    content: &(impl ContentOracle + ?Sized),
    rng: &mut (impl CombatRng + ?Sized),
    config: &CombatConfig,
    io: &mut Collaborators<'_>,
) -> CombatResult<KillOutcome> {
    if state
        .kill_guard
        .is_duplicate(key, now, config.kill_dedupe_window_ms)
    {
        return Ok(KillOutcome::Duplicate);
    }
    let Some(mob) = state.mob.as_ref().filter(|mob| mob.key() == key) else {
        return Ok(KillOutcome::Stale);
    };

    let camp_id = state.encounter.camp_id.clone();
    let camp = content.require_camp(&camp_id)?;
    let delay_ms = camp.respawn_delay_ms(&camp_id)?;
    let zone = content.require_zone(&state.encounter.zone_id)?;
    let loot_table = match &mob.instance.loot_table_id {
        Some(id) => Some(content.require_loot_table(id)?),
        None => None,
    };
    let mut loot_items = Vec::new();
    for entry in loot_table.map(|table| table.entries.as_slice()).unwrap_or_default() {
        loot_items.push((entry, content.require_item(&entry.item_id)?));
    }
    let class = content.require_class(&state.character.class_id)?;
    let xp = xp_award(
        mob.instance.xp,
        state.character.xp_bonus_pct,
        config.xp_rate,
        state.character.xp_mod,
        zone.xp_mod,
        camp.xp_mod,
    )?;

    state.kill_guard.record(key, now);
    let Some(mob) = state.clear_mob() else {
        return Ok(KillOutcome::Stale);
    };
    let mob_name = mob.instance.name;

    io.log
        .add_log(format!("You have slain {mob_name}!"), LogKind::Kill);

    state.character.xp = state.character.xp.saturating_add(xp);
    io.log
        .add_log(format!("You gain {xp} experience."), LogKind::Xp);
    io.saves
        .schedule_save(CharacterPatch::xp(state.character.xp), SaveOptions::IMMEDIATE);

    let mut loot = Vec::new();
    for (entry, definition) in loot_items {
        if !rng.chance(entry.drop_chance) {
            continue;
        }
        let quantity = loot_quantity(rng.next_f64(), entry.min_qty, entry.max_qty);
        if quantity == 0 {
            continue;
        }
        let item = io.inventory.create_item_instance(&entry.item_id, definition);
        io.log.add_log(
            format!("You receive {quantity}x {}.", item.name),
            LogKind::Loot,
        );
        io.inventory.add_item_to_inventory(item.clone(), quantity);
        loot.push(LootDrop { item, quantity });
    }

    let level_up = process_xp(&mut state.character, class, config, &mut *io.log, &mut *io.saves);
    if level_up.leveled() {
        state.refresh_maxima();
    }

    Ok(KillOutcome::Awarded(KillReward {
        mob_key: key,
        mob_name,
        xp,
        loot,
        level_up,
        respawn: RespawnTicket {
            epoch: state.encounter.epoch,
            camp_id,
            delay_ms,
        },
    }))
}
