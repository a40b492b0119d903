//! Effect tick processing.
//!
//! Per effect, in order:
//! 1. expiry: the effect is dropped and nothing else happens this tick
//! 2. root break roll (roots only)
//! 3. the periodic action, if `last_tick + tick_interval <= now`
//!
//! Damage ticks never take the player below 1 HP. On the mob they floor at 0
//! and report a death on the positive-to-zero transition only.

use super::{Effect, EffectKind};
use crate::config::CombatConfig;
use crate::env::{CombatLog, CombatRng, LogKind};
use crate::state::{CombatState, Target, Timestamp};
use crate::stats::Resource;

/// What happened during one scheduler pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub expired: Vec<(Target, String)>,
    pub broke_free: Vec<(Target, String)>,
    /// The active mob reached 0 HP during this pass.
    pub mob_died: bool,
}

/// Chance per tick that a root with this caster charisma breaks.
pub fn root_break_chance(caster_cha: i32, config: &CombatConfig) -> f64 {
    let divisor = config.root_break_cha_divisor;
    let reduction = if divisor > 0.0 {
        f64::from(caster_cha) / divisor
    } else {
        0.0
    };
    (config.root_break_base - reduction).max(0.0)
}

/// Advance every effect on both combatants to `now`.
pub fn advance(
    state: &mut CombatState,
    now: Timestamp,
    rng: &mut (impl CombatRng + ?Sized),
    config: &CombatConfig,
    log: &mut (impl CombatLog + ?Sized),
) -> TickReport {
    let mut report = TickReport::default();

    advance_target(state, Target::Player, now, rng, config, log, &mut report);
    if state.mob.is_some() {
        advance_target(state, Target::Mob, now, rng, config, log, &mut report);
    }

    if report.mob_died {
        state.effects.clear(Target::Mob);
    }
    state.refresh_maxima();
    report
}

fn advance_target(
    state: &mut CombatState,
    target: Target,
    now: Timestamp,
    rng: &mut (impl CombatRng + ?Sized),
    config: &CombatConfig,
    log: &mut (impl CombatLog + ?Sized),
    report: &mut TickReport,
) {
    for id in state.effects.set(target).ids() {
        if target == Target::Mob && report.mob_died {
            break;
        }
        let Some(effect) = state.effects.set(target).get(id).cloned() else {
            continue;
        };

        if effect.is_expired(now) {
            state.effects.remove(target, id);
            if let Some(message) = &effect.on_expire {
                log.add_log(message.clone(), LogKind::System);
            }
            report.expired.push((target, effect.name));
            continue;
        }

        if let EffectKind::Root { caster_cha } = effect.kind
            && rng.chance(root_break_chance(caster_cha, config))
        {
            state.effects.remove(target, id);
            log.add_log(
                format!("{} breaks free of {}.", state.name_of(target), effect.name),
                LogKind::System,
            );
            report.broke_free.push((target, effect.name));
            continue;
        }

        if !effect.kind.is_periodic() || !effect.is_due(now) {
            continue;
        }
        if let Some(live) = state.effects.set_mut(target).get_mut(id) {
            live.last_tick = now;
        }
        apply_periodic(state, target, &effect, log, report);
    }
}

fn apply_periodic(
    state: &mut CombatState,
    target: Target,
    effect: &Effect,
    log: &mut (impl CombatLog + ?Sized),
    report: &mut TickReport,
) {
    match effect.kind {
        EffectKind::PeriodicDamage { amount, siphon } => {
            let dealt = drain_tick(state, target, Resource::Hp, amount, report);
            if dealt > 0 {
                log.add_log(
                    format!(
                        "{} takes {dealt} damage from {}.",
                        state.name_of(target),
                        effect.name
                    ),
                    LogKind::Damage,
                );
            }
            if siphon {
                siphon_to(state, target.opposite(), Resource::Hp, dealt, effect, log);
            }
        }
        EffectKind::PeriodicHeal { amount } => {
            let healed = state
                .vitals_mut(target)
                .map_or(0, |vitals| vitals.hp.restore(amount));
            if healed > 0 {
                log.add_log(
                    format!(
                        "{} is healed for {healed} by {}.",
                        state.name_of(target),
                        effect.name
                    ),
                    LogKind::Heal,
                );
            }
        }
        EffectKind::ResourceTick {
            resource,
            amount,
            siphon,
        } => {
            if amount >= 0 {
                if let Some(vitals) = state.vitals_mut(target) {
                    vitals.pool_mut(resource).restore(amount.unsigned_abs());
                }
            } else {
                let drained = drain_tick(state, target, resource, amount.unsigned_abs(), report);
                if siphon {
                    siphon_to(state, target.opposite(), resource, drained, effect, log);
                }
            }
        }
        EffectKind::Root { .. }
        | EffectKind::Rune { .. }
        | EffectKind::DamageShield { .. }
        | EffectKind::StatMod => {}
    }
}

/// Drain a pool on `target` under the tick floor rules. Returns the amount drained.
fn drain_tick(
    state: &mut CombatState,
    target: Target,
    resource: Resource,
    amount: u32,
    report: &mut TickReport,
) -> u32 {
    let Some(vitals) = state.vitals_mut(target) else {
        return 0;
    };
    let pool = vitals.pool_mut(resource);
    match (target, resource) {
        (Target::Player, Resource::Hp) => pool.drain_to_floor(amount, 1),
        (Target::Mob, Resource::Hp) => {
            let was_alive = !pool.is_depleted();
            let drained = pool.drain(amount);
            if was_alive && pool.is_depleted() {
                report.mob_died = true;
            }
            drained
        }
        _ => pool.drain(amount),
    }
}

fn siphon_to(
    state: &mut CombatState,
    receiver: Target,
    resource: Resource,
    amount: u32,
    effect: &Effect,
    log: &mut (impl CombatLog + ?Sized),
) {
    if amount == 0 {
        return;
    }
    if receiver == Target::Mob && state.mob.as_ref().is_none_or(|mob| mob.is_dead()) {
        return;
    }
    let restored = state
        .vitals_mut(receiver)
        .map_or(0, |vitals| vitals.pool_mut(resource).restore(amount));
    if restored > 0 {
        log.add_log(
            format!(
                "{} drains {restored} {resource} through {}.",
                state.name_of(receiver),
                effect.name
            ),
            LogKind::Heal,
        );
    }
}
