//! Spawned mob instances.

use crate::stats::{Attributes, ResistValues, StatKey, StatMods, VitalMaxima, Vitals, apply_signed};

/// Spawn serial; unique within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobKey(pub u64);

impl core::fmt::Display for MobKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "mob#{}", self.0)
    }
}

/// What a spawn is for. Only `Combat` spawns become the active mob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MobRole {
    #[default]
    Combat,
    Merchant,
    Banker,
}

impl MobRole {
    /// Role implied by template tags (case-insensitive).
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let has = |wanted: &str| tags.iter().any(|tag| tag.as_ref().eq_ignore_ascii_case(wanted));
        if has("merchant") {
            Self::Merchant
        } else if has("banker") {
            Self::Banker
        } else {
            Self::Combat
        }
    }

    pub fn is_combat(self) -> bool {
        self == Self::Combat
    }
}

/// A normalized mob. Every combat field is present and validated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobInstance {
    pub key: MobKey,
    pub template_id: String,
    pub name: String,
    /// Rolled level.
    pub level: u32,
    pub max_level: Option<u32>,
    pub hp: u32,
    pub mana: u32,
    pub endurance: u32,
    pub damage: u32,
    pub xp: u64,
    pub ac: i32,
    pub delay: f64,
    pub movespeed: f64,
    pub melee_range: f64,
    pub aggro_range: f64,
    pub tags: Vec<String>,
    pub race_id: Option<u32>,
    pub gender: u8,
    pub texture_id: u32,
    pub loot_table_id: Option<String>,
    pub distance: f64,
    pub role: MobRole,
    pub resists: ResistValues,
    pub attributes: Attributes,
}

impl MobInstance {
    pub fn base_maxima(&self) -> VitalMaxima {
        VitalMaxima::new(self.hp, self.mana, self.endurance)
    }

    pub fn effective_maxima(&self, mods: &StatMods) -> VitalMaxima {
        VitalMaxima::new(
            apply_signed(self.hp, mods.get(StatKey::HpMax)),
            apply_signed(self.mana, mods.get(StatKey::ManaMax)),
            apply_signed(self.endurance, mods.get(StatKey::EnduranceMax)),
        )
    }

    pub fn effective_attributes(&self, mods: &StatMods) -> Attributes {
        mods.apply_to_attributes(&self.attributes)
    }

    pub fn effective_ac(&self, mods: &StatMods) -> i32 {
        self.ac.saturating_add(mods.get(StatKey::Ac))
    }

    pub fn effective_movespeed(&self, mods: &StatMods) -> f64 {
        self.movespeed + f64::from(mods.get(StatKey::MoveSpeed)) / 100.0
    }
}

/// The mob currently in combat with the player.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveMob {
    pub instance: MobInstance,
    pub vitals: Vitals,
    /// Set once either side has landed or attempted a hit.
    pub engaged: bool,
}

impl ActiveMob {
    pub fn new(instance: MobInstance) -> Self {
        let vitals = Vitals::at_max(&instance.base_maxima());
        Self {
            instance,
            vitals,
            engaged: false,
        }
    }

    pub fn key(&self) -> MobKey {
        self.instance.key
    }

    pub fn name(&self) -> &str {
        &self.instance.name
    }

    pub fn is_dead(&self) -> bool {
        self.vitals.hp.is_depleted()
    }
}
