//! Additive stat modifiers carried by timed effects.
//!
//! Every effect may carry a [`StatMods`] map. The effect scheduler sums the
//! maps of all active effects on a target into one map on demand; nothing is
//! cached, so the totals always reflect the current effect set.

use std::collections::BTreeMap;

use strum::{Display, EnumIter};

use super::core::{Attribute, Attributes};
use super::resists::DamageSchool;

/// Every stat an effect can modify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKey {
    Str,
    Sta,
    Agi,
    Dex,
    Wis,
    Int,
    Cha,
    /// Armor class.
    Ac,
    HpMax,
    ManaMax,
    EnduranceMax,
    PoisonResist,
    DiseaseResist,
    FireResist,
    ColdResist,
    MagicResist,
    /// Total spell damage reduction, in percent.
    SpellReductionPct,
    /// Movement speed, in hundredths.
    MoveSpeed,
}

impl StatKey {
    pub const fn attribute(attribute: Attribute) -> Self {
        match attribute {
            Attribute::Str => Self::Str,
            Attribute::Sta => Self::Sta,
            Attribute::Agi => Self::Agi,
            Attribute::Dex => Self::Dex,
            Attribute::Wis => Self::Wis,
            Attribute::Int => Self::Int,
            Attribute::Cha => Self::Cha,
        }
    }

    pub const fn resist(school: DamageSchool) -> Self {
        match school {
            DamageSchool::Poison => Self::PoisonResist,
            DamageSchool::Disease => Self::DiseaseResist,
            DamageSchool::Fire => Self::FireResist,
            DamageSchool::Cold => Self::ColdResist,
            DamageSchool::Magic => Self::MagicResist,
        }
    }
}

/// Sparse additive modifier map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatMods(BTreeMap<StatKey, i32>);

impl StatMods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style single modifier.
    #[must_use]
    pub fn with(mut self, key: StatKey, amount: i32) -> Self {
        self.add(key, amount);
        self
    }

    pub fn add(&mut self, key: StatKey, amount: i32) {
        let entry = self.0.entry(key).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Sum `other` into `self`.
    pub fn merge(&mut self, other: &StatMods) {
        for (&key, &amount) in &other.0 {
            self.add(key, amount);
        }
    }

    /// Modifier for `key`, zero when absent.
    pub fn get(&self, key: StatKey) -> i32 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&amount| amount == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, i32)> + '_ {
        self.0.iter().map(|(&key, &amount)| (key, amount))
    }

    /// Apply the attribute modifiers to a base attribute set.
    pub fn apply_to_attributes(&self, base: &Attributes) -> Attributes {
        use strum::IntoEnumIterator;

        let mut result = *base;
        for attribute in Attribute::iter() {
            let slot = result.get_mut(attribute);
            *slot = slot.saturating_add(self.get(StatKey::attribute(attribute)));
        }
        result
    }
}

impl FromIterator<(StatKey, i32)> for StatMods {
    fn from_iter<I: IntoIterator<Item = (StatKey, i32)>>(iter: I) -> Self {
        let mut mods = Self::new();
        for (key, amount) in iter {
            mods.add(key, amount);
        }
        mods
    }
}

/// Apply a signed modifier to an unsigned base value, flooring at zero.
pub fn apply_signed(base: u32, modifier: i32) -> u32 {
    (i64::from(base) + i64::from(modifier)).clamp(0, i64::from(u32::MAX)) as u32
}
