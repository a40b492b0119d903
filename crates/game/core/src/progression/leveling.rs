//! Level-up processing.

use crate::config::CombatConfig;
use crate::env::{ClassDefinition, CombatLog, LogKind, SaveOptions, SaveScheduler};
use crate::state::{Character, CharacterPatch};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub level: u32,
    pub xp: u64,
}

impl LevelUpReport {
    pub fn leveled(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Consume XP into levels.
///
/// The threshold is `xp_base * level` at the level the character held when
/// this XP arrived. While `xp` covers it, the threshold is subtracted and the
/// level increases, adding the class growth each time. Level, XP and grown
/// base values are saved once after all level-ups.
pub fn process_xp(
    character: &mut Character,
    class: &ClassDefinition,
    config: &CombatConfig,
    log: &mut (impl CombatLog + ?Sized),
    saves: &mut (impl SaveScheduler + ?Sized),
) -> LevelUpReport {
    let mut levels_gained = 0;
    let threshold = config.xp_threshold(character.level);
    while threshold > 0 && character.xp >= threshold {
        character.xp -= threshold;
        character.level += 1;
        character.base_stats = character.base_stats.saturating_add(&class.growth_stats);
        character.base_vitals = character.base_vitals.saturating_add(&class.growth_vitals);
        levels_gained += 1;
        log.add_log(
            format!("You have reached level {}!", character.level),
            LogKind::LevelUp,
        );
    }

    if levels_gained > 0 {
        saves.schedule_save(
            CharacterPatch {
                level: Some(character.level),
                xp: Some(character.xp),
                base_stats: Some(character.base_stats),
                base_vitals: Some(character.base_vitals),
                ..CharacterPatch::default()
            },
            SaveOptions::IMMEDIATE,
        );
    }

    LevelUpReport {
        levels_gained,
        level: character.level,
        xp: character.xp,
    }
}
