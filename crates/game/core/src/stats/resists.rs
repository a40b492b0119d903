//! Damage schools and per-school resist values.
//!
//! Static data has historically spelled resist fields several ways
//! (`pr`, `poison_resist`, `poisonResist`, ...). All spellings are accepted at
//! ingestion through serde aliases; combat math only ever sees [`ResistValues`].

use strum::{Display, EnumIter};

use super::modifiers::{StatKey, StatMods};

/// Spell damage school.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum DamageSchool {
    Poison,
    Disease,
    Fire,
    Cold,
    Magic,
}

/// Flat resist per school.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResistValues {
    #[cfg_attr(
        feature = "serde",
        serde(alias = "pr", alias = "poison_resist", alias = "poisonResist")
    )]
    pub poison: i32,
    #[cfg_attr(
        feature = "serde",
        serde(alias = "dr", alias = "disease_resist", alias = "diseaseResist")
    )]
    pub disease: i32,
    #[cfg_attr(
        feature = "serde",
        serde(alias = "fr", alias = "fire_resist", alias = "fireResist")
    )]
    pub fire: i32,
    #[cfg_attr(
        feature = "serde",
        serde(alias = "cr", alias = "cold_resist", alias = "coldResist")
    )]
    pub cold: i32,
    #[cfg_attr(
        feature = "serde",
        serde(alias = "mr", alias = "magic_resist", alias = "magicResist")
    )]
    pub magic: i32,
}

impl ResistValues {
    pub const fn uniform(value: i32) -> Self {
        Self {
            poison: value,
            disease: value,
            fire: value,
            cold: value,
            magic: value,
        }
    }

    pub fn get(&self, school: DamageSchool) -> i32 {
        match school {
            DamageSchool::Poison => self.poison,
            DamageSchool::Disease => self.disease,
            DamageSchool::Fire => self.fire,
            DamageSchool::Cold => self.cold,
            DamageSchool::Magic => self.magic,
        }
    }

    /// Base resists plus the resist entries of `mods`.
    pub fn with_mods(&self, mods: &StatMods) -> Self {
        let add = |base: i32, school| base.saturating_add(mods.get(StatKey::resist(school)));
        Self {
            poison: add(self.poison, DamageSchool::Poison),
            disease: add(self.disease, DamageSchool::Disease),
            fire: add(self.fire, DamageSchool::Fire),
            cold: add(self.cold, DamageSchool::Cold),
            magic: add(self.magic, DamageSchool::Magic),
        }
    }
}
