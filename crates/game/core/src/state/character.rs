//! Persistent player record.

use crate::env::ClassDefinition;
use crate::stats::{Attributes, ResistValues, StatKey, StatMods, VitalMaxima, VitalSnapshot, apply_signed};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameMode {
    #[default]
    Normal,
    /// Death is permanent.
    Hardcore,
}

/// The player character as stored by the character repository.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub name: String,
    pub class_id: String,
    pub level: u32,
    pub xp: u64,
    pub base_stats: Attributes,
    pub base_vitals: VitalMaxima,
    pub resists: ResistValues,
    pub ac: i32,
    /// Total spell damage reduction, in percent.
    pub spell_reduction_pct: i32,
    pub movespeed: f64,
    pub xp_bonus_pct: f64,
    pub xp_mod: f64,
    pub zone_id: String,
    pub camp_id: Option<String>,
    pub bind_zone_id: Option<String>,
    pub mode: GameMode,
    /// Wall-clock death time (unix millis); only ever set in hardcore mode.
    pub killed_at: Option<i64>,
    /// Current vitals at the last save.
    pub vitals: Option<VitalSnapshot>,
}

impl Character {
    /// A level 1 character of `class` standing in `zone_id`.
    pub fn new(
        name: impl Into<String>,
        class_id: impl Into<String>,
        class: &ClassDefinition,
        zone_id: impl Into<String>,
    ) -> Self {
        let zone_id = zone_id.into();
        Self {
            name: name.into(),
            class_id: class_id.into(),
            level: 1,
            xp: 0,
            base_stats: class.base_stats,
            base_vitals: class.base_vitals,
            resists: ResistValues::default(),
            ac: 0,
            spell_reduction_pct: 0,
            movespeed: 1.0,
            xp_bonus_pct: 0.0,
            xp_mod: 1.0,
            bind_zone_id: Some(zone_id.clone()),
            zone_id,
            camp_id: None,
            mode: GameMode::Normal,
            killed_at: None,
            vitals: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_hardcore(&self) -> bool {
        self.mode == GameMode::Hardcore
    }

    /// A hardcore character that has died.
    pub fn is_dead(&self) -> bool {
        self.killed_at.is_some()
    }

    pub fn effective_attributes(&self, mods: &StatMods) -> Attributes {
        mods.apply_to_attributes(&self.base_stats)
    }

    pub fn effective_maxima(&self, mods: &StatMods) -> VitalMaxima {
        VitalMaxima::new(
            apply_signed(self.base_vitals.hp, mods.get(StatKey::HpMax)),
            apply_signed(self.base_vitals.mana, mods.get(StatKey::ManaMax)),
            apply_signed(self.base_vitals.endurance, mods.get(StatKey::EnduranceMax)),
        )
    }

    pub fn effective_ac(&self, mods: &StatMods) -> i32 {
        self.ac.saturating_add(mods.get(StatKey::Ac))
    }

    pub fn effective_movespeed(&self, mods: &StatMods) -> f64 {
        self.movespeed + f64::from(mods.get(StatKey::MoveSpeed)) / 100.0
    }
}

/// Partial character update handed to the save scheduler.
///
/// `None` leaves the stored field unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterPatch {
    pub level: Option<u32>,
    pub xp: Option<u64>,
    pub base_stats: Option<Attributes>,
    pub base_vitals: Option<VitalMaxima>,
    pub zone_id: Option<String>,
    pub camp_id: Option<String>,
    pub vitals: Option<VitalSnapshot>,
    pub killed_at: Option<i64>,
}

impl CharacterPatch {
    pub fn xp(xp: u64) -> Self {
        Self {
            xp: Some(xp),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fold a newer patch over this one; newer fields win.
    pub fn merge(&mut self, newer: CharacterPatch) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if newer.$field.is_some() {
                    self.$field = newer.$field;
                })*
            };
        }
        take!(level, xp, base_stats, base_vitals, zone_id, camp_id, vitals, killed_at);
    }

    pub fn apply_to(&self, character: &mut Character) {
        if let Some(level) = self.level {
            character.level = level;
        }
        if let Some(xp) = self.xp {
            character.xp = xp;
        }
        if let Some(stats) = self.base_stats {
            character.base_stats = stats;
        }
        if let Some(vitals) = self.base_vitals {
            character.base_vitals = vitals;
        }
        if let Some(zone_id) = &self.zone_id {
            character.zone_id = zone_id.clone();
        }
        if let Some(camp_id) = &self.camp_id {
            character.camp_id = Some(camp_id.clone());
        }
        if let Some(vitals) = self.vitals {
            character.vitals = Some(vitals);
        }
        if let Some(killed_at) = self.killed_at {
            character.killed_at = Some(killed_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warrior() -> ClassDefinition {
        ClassDefinition {
            name: "Warrior".into(),
            base_stats: Attributes::new(20, 20, 15, 15, 5, 5, 5),
            base_vitals: VitalMaxima::new(100, 0, 80),
            ..ClassDefinition::default()
        }
    }

    #[test]
    fn new_character_binds_to_starting_zone() {
        let character = Character::new("Tester", "warrior", &warrior(), "qeynos_hills");
        assert_eq!(character.level, 1);
        assert_eq!(character.bind_zone_id.as_deref(), Some("qeynos_hills"));
        assert_eq!(character.base_vitals.hp, 100);
    }

    #[test]
    fn newer_patch_fields_win() {
        let mut patch = CharacterPatch::xp(10);
        patch.merge(CharacterPatch {
            xp: Some(25),
            level: Some(3),
            ..CharacterPatch::default()
        });

        let mut character = Character::new("Tester", "warrior", &warrior(), "qeynos_hills");
        patch.apply_to(&mut character);
        assert_eq!(character.xp, 25);
        assert_eq!(character.level, 3);
    }

    #[test]
    fn maxima_include_effect_mods() {
        let character = Character::new("Tester", "warrior", &warrior(), "qeynos_hills");
        let mods = StatMods::new().with(StatKey::HpMax, 40).with(StatKey::EnduranceMax, -100);

        let maxima = character.effective_maxima(&mods);
        assert_eq!(maxima.hp, 140);
        assert_eq!(maxima.endurance, 0);
    }
}
