//! Player death.
//!
//! Hardcore characters are marked dead once and never respawn. Normal
//! characters lose XP, are restored to full and moved to their bind zone.

use crate::config::CombatConfig;
use crate::env::{CombatLog, ContentOracle, LogKind, SaveOptions, SaveScheduler};
use crate::error::{CombatResult, ConfigError};
use crate::state::{CharacterPatch, CombatState, Target};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeathOutcome {
    /// First hardcore death. Return to character select after the delay.
    Permadeath { killed_at: i64, return_after_ms: u64 },
    /// Hardcore character already marked dead; nothing changed.
    AlreadyDead,
    Respawned {
        xp_lost: u64,
        zone_id: String,
        camp_id: String,
    },
}

/// XP lost on a normal-mode death at `level`:
/// `ceil(xp_base * level * min(1, level / 100))`.
pub fn death_penalty(xp_base: u64, level: u32) -> u64 {
    let level = u128::from(level);
    let scale = level.min(u128::from(CombatConfig::DEATH_PENALTY_FULL_LEVEL));
    let numerator = u128::from(xp_base) * level * scale;
    let full = u128::from(CombatConfig::DEATH_PENALTY_FULL_LEVEL);
    numerator.div_ceil(full).min(u128::from(u64::MAX)) as u64
}

/// Resolve a player death.
///
/// `wall_clock_ms` is the unix time recorded as `killed_at` in hardcore mode.
///
/// # Errors
///
/// Normal mode without a bind zone, or with a bind zone whose entry camp is
/// unknown, fails before anything is mutated.
pub fn handle_player_death(
    state: &mut CombatState,
    content: &(impl ContentOracle + ?Sized),
    config: &CombatConfig,
    wall_clock_ms: i64,
    log: &mut (impl CombatLog + ?Sized),
    saves: &mut (impl SaveScheduler + ?Sized),
) -> CombatResult<DeathOutcome> {
    if state.character.is_hardcore() {
        if state.character.is_dead() {
            return Ok(DeathOutcome::AlreadyDead);
        }
        state.character.killed_at = Some(wall_clock_ms);
        saves.schedule_save(
            CharacterPatch {
                killed_at: Some(wall_clock_ms),
                ..CharacterPatch::default()
            },
            SaveOptions::IMMEDIATE,
        );
        log.add_log(
            format!("{} has perished. Their journey ends here.", state.character.name),
            LogKind::System,
        );
        return Ok(DeathOutcome::Permadeath {
            killed_at: wall_clock_ms,
            return_after_ms: config.hardcore_return_delay_ms,
        });
    }

    let bind_zone = state
        .character
        .bind_zone_id
        .clone()
        .ok_or(ConfigError::MissingBindZone)?;
    let zone = content.require_zone(&bind_zone)?;
    content.require_camp(&zone.entry_camp)?;
    let camp_id = zone.entry_camp.clone();

    let xp_lost = death_penalty(config.xp_base, state.character.level).min(state.character.xp);
    state.character.xp -= xp_lost;

    state.effects.clear(Target::Player);
    state.clear_mob();
    state.refresh_maxima();
    state.player.refill();

    state.encounter.relocate(bind_zone.clone(), camp_id.clone());
    state.character.zone_id = bind_zone.clone();
    state.character.camp_id = Some(camp_id.clone());
    state.character.vitals = Some(state.player.snapshot());

    saves.schedule_save(
        CharacterPatch {
            level: Some(state.character.level),
            xp: Some(state.character.xp),
            zone_id: Some(bind_zone.clone()),
            camp_id: Some(camp_id.clone()),
            vitals: Some(state.player.snapshot()),
            ..CharacterPatch::default()
        },
        SaveOptions::IMMEDIATE,
    );
    log.add_log(
        format!("You have been slain! You lose {xp_lost} experience and return to {}.", zone.name),
        LogKind::System,
    );

    Ok(DeathOutcome::Respawned {
        xp_lost,
        zone_id: bind_zone,
        camp_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectKind, EffectSpec};
    use crate::env::LogEntry;
    use crate::error::CombatError;
    use crate::state::{GameMode, Timestamp};
    use crate::testing::{self, RecordingSaves};

    #[test]
    fn penalty_scales_with_level_up_to_a_full_level() {
        assert_eq!(death_penalty(100, 10), 100);
        assert_eq!(death_penalty(100, 1), 1);
        assert_eq!(death_penalty(100, 15), 225);
        assert_eq!(death_penalty(100, 100), 10_000);
        assert_eq!(death_penalty(100, 120), 12_000);
    }

    #[test]
    fn normal_death_at_level_ten() {
        let content = testing::content();
        let mut state = testing::state_with_mob();
        state.character.level = 10;
        state.character.xp = 140;
        state.character.bind_zone_id = Some(testing::OTHER_ZONE.into());
        state.player.hp.set(0);
        state.player.mana.set(3);
        state
            .effects
            .add(Target::Player, EffectSpec::new("Poison", EffectKind::StatMod, 60_000), Timestamp::ZERO, 2_000);
        let epoch = state.encounter.epoch;
        let mut saves = RecordingSaves::default();

        let outcome = handle_player_death(
            &mut state,
            &content,
            &CombatConfig::default(),
            1_700_000_000_000,
            &mut Vec::<LogEntry>::new(),
            &mut saves,
        )
        .unwrap();

        assert_eq!(
            outcome,
            DeathOutcome::Respawned {
                xp_lost: 100,
                zone_id: testing::OTHER_ZONE.into(),
                camp_id: testing::OTHER_CAMP.into(),
            }
        );
        assert_eq!(state.character.xp, 40);
        assert_eq!(state.character.level, 10);
        assert_eq!(state.player.hp.current(), state.player.hp.max());
        assert_eq!(state.player.mana.current(), state.player.mana.max());
        assert_eq!(state.character.zone_id, testing::OTHER_ZONE);
        assert!(state.effects.set(Target::Player).is_empty());
        assert!(state.mob.is_none());
        assert_eq!(state.encounter.epoch, epoch + 1);

        let (patch, opts) = &saves.saves[0];
        assert!(opts.immediate);
        assert_eq!(patch.xp, Some(40));
        assert_eq!(patch.level, Some(10));
    }

    #[test]
    fn xp_never_goes_negative() {
        let content = testing::content();
        let mut state = testing::state();
        state.character.level = 10;
        state.character.xp = 30;

        let outcome = handle_player_death(
            &mut state,
            &content,
            &CombatConfig::default(),
            0,
            &mut Vec::<LogEntry>::new(),
            &mut RecordingSaves::default(),
        )
        .unwrap();

        assert!(matches!(outcome, DeathOutcome::Respawned { xp_lost: 30, .. }));
        assert_eq!(state.character.xp, 0);
    }

    #[test]
    fn missing_bind_zone_is_fatal_and_mutates_nothing() {
        let content = testing::content();
        let mut state = testing::state();
        state.character.bind_zone_id = None;
        state.character.xp = 70;
        state.player.hp.set(0);
        let mut saves = RecordingSaves::default();

        let err = handle_player_death(
            &mut state,
            &content,
            &CombatConfig::default(),
            0,
            &mut Vec::<LogEntry>::new(),
            &mut saves,
        )
        .unwrap_err();

        assert_eq!(err, CombatError::Config(ConfigError::MissingBindZone));
        assert_eq!(state.character.xp, 70);
        assert_eq!(state.player.hp.current(), 0);
        assert!(saves.saves.is_empty());
    }

    #[test]
    fn hardcore_death_is_recorded_once_without_touching_vitals_or_xp() {
        let content = testing::content();
        let mut state = testing::state();
        state.character.mode = GameMode::Hardcore;
        state.character.xp = 55;
        state.player.hp.set(0);
        let mut saves = RecordingSaves::default();
        let config = CombatConfig::default();

        let first = handle_player_death(
            &mut state,
            &content,
            &config,
            1_000,
            &mut Vec::<LogEntry>::new(),
            &mut saves,
        )
        .unwrap();
        let second = handle_player_death(
            &mut state,
            &content,
            &config,
            9_000,
            &mut Vec::<LogEntry>::new(),
            &mut saves,
        )
        .unwrap();

        assert_eq!(
            first,
            DeathOutcome::Permadeath {
                killed_at: 1_000,
                return_after_ms: 2_000
            }
        );
        assert_eq!(second, DeathOutcome::AlreadyDead);
        assert_eq!(state.character.killed_at, Some(1_000));
        assert_eq!(state.character.xp, 55);
        assert_eq!(state.player.hp.current(), 0);
        assert_eq!(saves.saves.len(), 1);
        assert!(saves.saves[0].1.immediate);
    }
}
