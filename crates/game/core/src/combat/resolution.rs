//! Applies hits to live combat state.
//!
//! This is the only place direct damage touches a pool. Mitigation inputs
//! (armor, resists, percent reduction) are read fresh from base values plus
//! active effects on every call.

use super::evasion::dodge_chance;
use super::hit::{DamageKind, HitRequest, apply_hit, spell_base};
use super::resist::ResistProfile;
use crate::config::CombatConfig;
use crate::env::{CombatLog, CombatRng, LogKind};
use crate::error::{CombatError, CombatResult};
use crate::state::{CombatState, MobKey, Target};

/// Death raised while resolving a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// `deferred` deaths came from a reflect and must be handled on the next
    /// turn of the owning actor, never inside the current resolution.
    PlayerDied { deferred: bool },
    MobDied { key: MobKey },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DamageResolution {
    pub target: Target,
    pub resisted: bool,
    pub final_damage: u32,
    pub absorbed: u32,
    pub new_hp: Option<u32>,
    /// Damage shield damage dealt back to the attacker.
    pub reflected: u32,
    /// The target mob died from this hit.
    pub killed: bool,
    pub events: Vec<CombatEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MobAttackOutcome {
    Dodged,
    Hit(DamageResolution),
}

/// Apply `raw_damage` of `kind` to `target`. The opposite combatant is the
/// attacker for level adjustment and damage shield purposes.
///
/// # Errors
///
/// - [`CombatError::NoActiveMob`] when targeting a mob that does not exist
/// - [`CombatError::Contract`] for non-finite damage
pub fn resolve_damage(
    state: &mut CombatState,
    target: Target,
    raw_damage: f64,
    kind: DamageKind,
    config: &CombatConfig,
    log: &mut (impl CombatLog + ?Sized),
) -> CombatResult<DamageResolution> {
    let attacker = target.opposite();
    let mods = state.effects.stat_modifiers(target);
    let (ac, profile) = match target {
        Target::Player => {
            let character = &state.character;
            (
                character.effective_ac(&mods),
                ResistProfile::player(
                    &character.resists,
                    character.spell_reduction_pct,
                    character.level,
                    &mods,
                ),
            )
        }
        Target::Mob => {
            let mob = state.mob.as_ref().ok_or(CombatError::NoActiveMob)?;
            (
                mob.instance.effective_ac(&mods),
                ResistProfile::mob(
                    &mob.instance.resists,
                    &mob.instance.attributes,
                    mob.instance.level,
                    &mods,
                ),
            )
        }
    };

    let attacker_present = state.vitals(attacker).is_some();
    let attacker_level = state.level_of(attacker);
    let cap = config.level_adjust_cap;
    let request = HitRequest {
        raw_damage,
        kind,
        mitigation: u32::try_from(ac.max(0)).unwrap_or(0) / config.ac_divisor.max(1),
        current_hp: state.vitals(target).map_or(0, |vitals| vitals.hp.current()),
        damage_shield: state.effects.set(target).damage_shield(),
    };

    let mut died = false;
    let runes = state.effects.set_mut(target);
    let outcome = apply_hit(
        &request,
        |amount| runes.consume_rune(amount),
        |raw, school| profile.mitigate(spell_base(raw), school, attacker_level, cap),
        || died = true,
    )?;

    if let Some(mob) = state.mob.as_mut() {
        mob.engaged = true;
    }

    let attacker_name = state.name_of(attacker).to_string();
    let defender_name = state.name_of(target).to_string();
    let log_kind = match target {
        Target::Mob => LogKind::Damage,
        Target::Player => LogKind::MobAttack,
    };

    let mut resolution = DamageResolution {
        target,
        resisted: outcome.resisted,
        final_damage: outcome.final_damage,
        absorbed: outcome.absorbed,
        new_hp: Some(request.current_hp),
        reflected: 0,
        killed: false,
        events: Vec::new(),
    };

    if outcome.resisted {
        if let DamageKind::Spell(school) = kind {
            log.add_log(
                format!("{defender_name} resists {attacker_name}'s {school} spell!"),
                log_kind,
            );
        }
        return Ok(resolution);
    }

    let final_damage = outcome.final_damage;
    resolution.new_hp = state
        .vitals_mut(target)
        .map(|vitals| vitals.hp.update(|current| current.saturating_sub(final_damage)));

    let mut message = format!("{attacker_name} hits {defender_name} for {final_damage} damage.");
    if outcome.absorbed > 0 {
        message.push_str(&format!(" ({} absorbed)", outcome.absorbed));
    }
    log.add_log(message, log_kind);

    let player_killed = died && target == Target::Player;
    if died && target == Target::Mob {
        resolution.killed = true;
        push_mob_death(state, &mut resolution);
    }

    let reflected = outcome.damage_shield_reflected;
    if reflected > 0 && attacker_present {
        let (was_alive, now_dead, dealt) = match state.vitals_mut(attacker) {
            Some(vitals) => {
                let was_alive = !vitals.hp.is_depleted();
                let dealt = vitals.hp.drain(reflected);
                (was_alive, vitals.hp.is_depleted(), dealt)
            }
            None => (false, false, 0),
        };
        resolution.reflected = dealt;
        if dealt > 0 {
            log.add_log(
                format!(
                    "{attacker_name} is hit by {defender_name}'s damage shield for {dealt} damage."
                ),
                LogKind::Damage,
            );
        }
        if was_alive && now_dead {
            match attacker {
                Target::Mob => push_mob_death(state, &mut resolution),
                Target::Player => resolution
                    .events
                    .push(CombatEvent::PlayerDied { deferred: true }),
            }
        }
    }

    // A swing that kills the player while the player's shield kills the mob
    // settles the kill first; the player death waits for the next turn.
    if player_killed {
        let mob_died = resolution
            .events
            .iter()
            .any(|event| matches!(event, CombatEvent::MobDied { .. }));
        resolution
            .events
            .push(CombatEvent::PlayerDied { deferred: mob_died });
    }

    Ok(resolution)
}

fn push_mob_death(state: &mut CombatState, resolution: &mut DamageResolution) {
    if let Some(mob) = state.mob.as_ref() {
        resolution.events.push(CombatEvent::MobDied { key: mob.key() });
    }
    state.effects.clear(Target::Mob);
}

/// One melee swing from the active mob, with a dodge roll first.
pub fn resolve_mob_attack(
    state: &mut CombatState,
    rng: &mut (impl CombatRng + ?Sized),
    config: &CombatConfig,
    log: &mut (impl CombatLog + ?Sized),
) -> CombatResult<MobAttackOutcome> {
    let mob = state.mob.as_mut().ok_or(CombatError::NoActiveMob)?;
    if mob.is_dead() {
        return Err(CombatError::NoActiveMob);
    }
    mob.engaged = true;
    let raw = f64::from(mob.instance.damage);
    let mob_name = mob.name().to_string();

    let agility = state
        .character
        .effective_attributes(&state.player_mods())
        .agi;
    let chance = dodge_chance(f64::from(agility), &config.dodge)?;
    if rng.chance(chance) {
        log.add_log(
            format!("{} dodges {mob_name}'s attack.", state.character.name),
            LogKind::MobAttack,
        );
        return Ok(MobAttackOutcome::Dodged);
    }

    resolve_damage(state, Target::Player, raw, DamageKind::Melee, config, log)
        .map(MobAttackOutcome::Hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DodgeConfig;
    use crate::effects::{EffectKind, EffectSpec};
    use crate::env::{LogEntry, ScriptedRng};
    use crate::state::Timestamp;
    use crate::stats::{DamageSchool, ResistValues, StatKey, StatMods};
    use crate::testing;

    fn mob_hp(state: &CombatState) -> u32 {
        state.mob.as_ref().map_or(0, |mob| mob.vitals.hp.current())
    }

    fn add(state: &mut CombatState, target: Target, spec: EffectSpec) {
        state.effects.add(target, spec, Timestamp::ZERO, 2_000);
    }

    #[test]
    fn melee_on_mob_applies_armor_and_engages() {
        let mut state = testing::state_with_mob();
        let mut log = Vec::<LogEntry>::new();

        // ac 10 / divisor 10 = 1 point of mitigation
        let result = resolve_damage(
            &mut state,
            Target::Mob,
            12.0,
            DamageKind::Melee,
            &CombatConfig::default(),
            &mut log,
        )
        .unwrap();

        assert_eq!(result.final_damage, 11);
        assert_eq!(result.new_hp, Some(29));
        assert_eq!(mob_hp(&state), 29);
        assert!(!result.killed);
        assert!(state.mob.as_ref().is_some_and(|mob| mob.engaged));
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, LogKind::Damage);
    }

    #[test]
    fn lethal_hit_on_mob_raises_one_death_and_clears_its_effects() {
        let mut state = testing::state_with_mob();
        let key = state.mob.as_ref().map(|mob| mob.key()).unwrap();
        add(&mut state, Target::Mob, EffectSpec::new("Snare", EffectKind::StatMod, 60_000));

        let config = CombatConfig::default();
        let result = resolve_damage(
            &mut state,
            Target::Mob,
            500.0,
            DamageKind::Melee,
            &config,
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        assert!(result.killed);
        assert_eq!(result.events, vec![CombatEvent::MobDied { key }]);
        assert!(state.effects.set(Target::Mob).is_empty());

        let again = resolve_damage(
            &mut state,
            Target::Mob,
            500.0,
            DamageKind::Melee,
            &config,
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();
        assert!(again.events.is_empty());
    }

    #[test]
    fn player_damage_shield_can_kill_the_attacking_mob() {
        let mut state = testing::state_with_mob();
        if let Some(mob) = state.mob.as_mut() {
            mob.vitals.hp.set(5);
        }
        add(
            &mut state,
            Target::Player,
            EffectSpec::new("Shield of Thistles", EffectKind::DamageShield { amount: 8 }, 60_000),
        );

        let result = resolve_damage(
            &mut state,
            Target::Player,
            6.0,
            DamageKind::Melee,
            &CombatConfig::default(),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        assert_eq!(result.reflected, 5);
        assert_eq!(mob_hp(&state), 0);
        assert!(matches!(result.events.as_slice(), [CombatEvent::MobDied { .. }]));
    }

    #[test]
    fn lethal_reflect_onto_the_player_is_deferred() {
        let mut state = testing::state_with_mob();
        state.player.hp.set(3);
        add(
            &mut state,
            Target::Mob,
            EffectSpec::new("Thorns", EffectKind::DamageShield { amount: 10 }, 60_000),
        );

        let result = resolve_damage(
            &mut state,
            Target::Mob,
            4.0,
            DamageKind::Melee,
            &CombatConfig::default(),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        assert_eq!(state.player.hp.current(), 0);
        assert_eq!(result.events, vec![CombatEvent::PlayerDied { deferred: true }]);
    }

    #[test]
    fn direct_hit_can_kill_the_player() {
        let mut state = testing::state_with_mob();
        state.player.hp.set(4);

        let result = resolve_damage(
            &mut state,
            Target::Player,
            50.0,
            DamageKind::Melee,
            &CombatConfig::default(),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        assert_eq!(result.new_hp, Some(0));
        assert_eq!(result.events, vec![CombatEvent::PlayerDied { deferred: false }]);
    }

    #[test]
    fn trade_of_blows_settles_the_kill_before_the_player_death() {
        let mut state = testing::state_with_mob();
        let key = state.mob.as_ref().map(|mob| mob.key()).unwrap();
        state.player.hp.set(5);
        if let Some(mob) = state.mob.as_mut() {
            mob.vitals.hp.set(5);
        }
        add(
            &mut state,
            Target::Player,
            EffectSpec::new("Shield of Thistles", EffectKind::DamageShield { amount: 50 }, 60_000),
        );

        let result = resolve_damage(
            &mut state,
            Target::Player,
            50.0,
            DamageKind::Melee,
            &CombatConfig::default(),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        assert_eq!(state.player.hp.current(), 0);
        assert_eq!(mob_hp(&state), 0);
        assert_eq!(
            result.events,
            vec![
                CombatEvent::MobDied { key },
                CombatEvent::PlayerDied { deferred: true },
            ]
        );
    }

    #[test]
    fn resisted_spell_logs_without_mutation() {
        let mut state = testing::state_with_mob();
        state.character.resists = ResistValues::uniform(200);
        let hp_before = state.player.hp.current();
        let mut log = Vec::<LogEntry>::new();

        let result = resolve_damage(
            &mut state,
            Target::Player,
            40.0,
            DamageKind::Spell(DamageSchool::Fire),
            &CombatConfig::default(),
            &mut log,
        )
        .unwrap();

        assert!(result.resisted);
        assert_eq!(state.player.hp.current(), hp_before);
        assert_eq!(log.len(), 1);
        assert!(log[0].message.contains("resists"));
    }

    #[test]
    fn spell_percent_reduction_comes_from_effects() {
        let mut state = testing::state_with_mob();
        add(
            &mut state,
            Target::Player,
            EffectSpec::new("Mind Barrier", EffectKind::StatMod, 60_000)
                .with_mods(StatMods::new().with(StatKey::SpellReductionPct, 50)),
        );

        let result = resolve_damage(
            &mut state,
            Target::Player,
            40.0,
            DamageKind::Spell(DamageSchool::Magic),
            &CombatConfig::default(),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        assert_eq!(result.final_damage, 20);
    }

    #[test]
    fn runes_on_target_absorb_damage() {
        let mut state = testing::state_with_mob();
        add(&mut state, Target::Player, EffectSpec::new("Rune I", EffectKind::Rune { remaining: 7 }, 60_000));
        let hp_before = state.player.hp.current();

        let result = resolve_damage(
            &mut state,
            Target::Player,
            10.0,
            DamageKind::Melee,
            &CombatConfig::default(),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        assert_eq!(result.absorbed, 7);
        assert_eq!(state.player.hp.current(), hp_before - 3);
        assert!(state.effects.set(Target::Player).by_name("Rune I").is_none());
    }

    #[test]
    fn targeting_a_missing_mob_is_rejected() {
        let mut state = testing::state();
        let err = resolve_damage(
            &mut state,
            Target::Mob,
            10.0,
            DamageKind::Melee,
            &CombatConfig::default(),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap_err();
        assert_eq!(err, CombatError::NoActiveMob);
    }

    #[test]
    fn mob_swing_can_be_dodged() {
        let mut state = testing::state_with_mob();
        let hp_before = state.player.hp.current();
        let config = CombatConfig {
            dodge: DodgeConfig {
                base: 0.2,
                ..DodgeConfig::default()
            },
            ..CombatConfig::default()
        };

        let dodged = resolve_mob_attack(
            &mut state,
            &mut ScriptedRng::constant(0.0),
            &config,
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();
        assert_eq!(dodged, MobAttackOutcome::Dodged);
        assert_eq!(state.player.hp.current(), hp_before);

        let hit = resolve_mob_attack(
            &mut state,
            &mut ScriptedRng::constant(0.99),
            &config,
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();
        assert!(matches!(hit, MobAttackOutcome::Hit(ref res) if res.final_damage == 6));
        assert_eq!(state.player.hp.current(), hp_before - 6);
    }
}
