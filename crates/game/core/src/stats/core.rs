//! Core attributes.
//!
//! The seven attributes are the only stats stored on a character. Effective
//! values (base + active effect modifiers) are recomputed on demand and never
//! stored.
//!
//! - **STR** (Strength): melee power
//! - **STA** (Stamina): health and endurance
//! - **AGI** (Agility): avoidance, dodge chance
//! - **DEX** (Dexterity): weapon skill
//! - **WIS** (Wisdom): healing power
//! - **INT** (Intelligence): spell damage
//! - **CHA** (Charisma): spell mitigation, root durability

use strum::{Display, EnumIter};

/// Attribute selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Attribute {
    Str,
    Sta,
    Agi,
    Dex,
    Wis,
    Int,
    Cha,
}

/// A full set of the seven attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Attributes {
    #[cfg_attr(feature = "serde", serde(alias = "strength"))]
    pub str: i32,
    #[cfg_attr(feature = "serde", serde(alias = "stamina"))]
    pub sta: i32,
    #[cfg_attr(feature = "serde", serde(alias = "agility"))]
    pub agi: i32,
    #[cfg_attr(feature = "serde", serde(alias = "dexterity"))]
    pub dex: i32,
    #[cfg_attr(feature = "serde", serde(alias = "wisdom"))]
    pub wis: i32,
    #[cfg_attr(feature = "serde", serde(alias = "intelligence"))]
    pub int: i32,
    #[cfg_attr(feature = "serde", serde(alias = "charisma"))]
    pub cha: i32,
}

impl Attributes {
    pub const fn new(str: i32, sta: i32, agi: i32, dex: i32, wis: i32, int: i32, cha: i32) -> Self {
        Self {
            str,
            sta,
            agi,
            dex,
            wis,
            int,
            cha,
        }
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Str => self.str,
            Attribute::Sta => self.sta,
            Attribute::Agi => self.agi,
            Attribute::Dex => self.dex,
            Attribute::Wis => self.wis,
            Attribute::Int => self.int,
            Attribute::Cha => self.cha,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Str => &mut self.str,
            Attribute::Sta => &mut self.sta,
            Attribute::Agi => &mut self.agi,
            Attribute::Dex => &mut self.dex,
            Attribute::Wis => &mut self.wis,
            Attribute::Int => &mut self.int,
            Attribute::Cha => &mut self.cha,
        }
    }

    /// Component-wise sum.
    pub fn saturating_add(&self, other: &Self) -> Self {
        Self {
            str: self.str.saturating_add(other.str),
            sta: self.sta.saturating_add(other.sta),
            agi: self.agi.saturating_add(other.agi),
            dex: self.dex.saturating_add(other.dex),
            wis: self.wis.saturating_add(other.wis),
            int: self.int.saturating_add(other.int),
            cha: self.cha.saturating_add(other.cha),
        }
    }
}
