//! Static content definitions.
//!
//! These types are deserialized from RON by the content crate and handed to
//! the rules through [`ContentOracle`](super::ContentOracle). Numeric fields
//! on [`MobTemplate`] are optional at the schema level so a missing value can
//! be reported as a configuration error at spawn time instead of silently
//! defaulting.

use crate::error::ConfigError;
use crate::stats::{Attributes, ResistValues, VitalMaxima};

/// Raw mob template as authored.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MobTemplate {
    pub name: String,
    pub level: Option<f64>,
    #[cfg_attr(feature = "serde", serde(alias = "maxLevel"))]
    pub max_level: Option<f64>,
    pub hp: Option<f64>,
    pub mana: Option<f64>,
    pub endurance: Option<f64>,
    pub damage: Option<f64>,
    pub xp: Option<f64>,
    pub ac: Option<f64>,
    /// Milliseconds between melee swings.
    pub delay: Option<f64>,
    pub movespeed: Option<f64>,
    #[cfg_attr(feature = "serde", serde(alias = "meleeRange"))]
    pub melee_range: Option<f64>,
    #[cfg_attr(feature = "serde", serde(alias = "aggroRange"))]
    pub aggro_range: Option<f64>,
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(alias = "raceId"))]
    pub race_id: Option<u32>,
    pub gender: u8,
    #[cfg_attr(feature = "serde", serde(alias = "textureId"))]
    pub texture_id: u32,
    #[cfg_attr(feature = "serde", serde(alias = "lootTableId"))]
    pub loot_table_id: Option<String>,
    pub resists: ResistValues,
    pub attributes: Attributes,
}

/// One weighted entry of a camp's spawn pool.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CampSpawn {
    #[cfg_attr(feature = "serde", serde(alias = "templateId", alias = "mob"))]
    pub template_id: String,
    pub weight: f64,
}

/// A camp: the unit of encounter within a zone.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CampDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(alias = "zoneId"))]
    pub zone_id: String,
    /// Respawn delay in seconds.
    #[cfg_attr(feature = "serde", serde(alias = "spawnTime"))]
    pub spawn_time: Option<f64>,
    /// Radius used to place spawned mobs.
    #[cfg_attr(feature = "serde", serde(alias = "campArea"))]
    pub camp_area: f64,
    #[cfg_attr(feature = "serde", serde(alias = "contentFlags"))]
    pub content_flags: Vec<String>,
    /// Set on zone lines: entering this camp moves the player to that zone.
    #[cfg_attr(feature = "serde", serde(alias = "targetZoneId"))]
    pub target_zone_id: Option<String>,
    pub connected: Vec<String>,
    pub pool: Vec<CampSpawn>,
    #[cfg_attr(feature = "serde", serde(alias = "xpMod"))]
    pub xp_mod: f64,
}

impl Default for CampDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            zone_id: String::new(),
            spawn_time: None,
            camp_area: 0.0,
            content_flags: Vec::new(),
            target_zone_id: None,
            connected: Vec::new(),
            pool: Vec::new(),
            xp_mod: 1.0,
        }
    }
}

impl CampDefinition {
    /// Respawn delay, failing when the camp has no positive finite spawn time.
    pub fn respawn_delay_ms(&self, camp_id: &str) -> Result<u64, ConfigError> {
        match self.spawn_time {
            Some(seconds) if seconds.is_finite() && seconds > 0.0 => {
                Ok((seconds * 1_000.0).round() as u64)
            }
            _ => Err(ConfigError::MissingSpawnTime {
                camp: camp_id.to_string(),
            }),
        }
    }

    pub fn is_connected_to(&self, camp_id: &str) -> bool {
        self.connected.iter().any(|id| id == camp_id)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ZoneDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(alias = "xpMod"))]
    pub xp_mod: f64,
    /// Camp the player lands in when entering the zone.
    #[cfg_attr(feature = "serde", serde(alias = "entryCamp"))]
    pub entry_camp: String,
}

impl Default for ZoneDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            xp_mod: 1.0,
            entry_camp: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    #[cfg_attr(feature = "serde", serde(alias = "itemId"))]
    pub item_id: String,
    #[cfg_attr(feature = "serde", serde(alias = "dropChance"))]
    pub drop_chance: f64,
    #[cfg_attr(feature = "serde", serde(alias = "minQty", default = "one"))]
    pub min_qty: u32,
    #[cfg_attr(feature = "serde", serde(alias = "maxQty", default = "one"))]
    pub max_qty: u32,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LootTable {
    pub entries: Vec<LootEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ItemDefinition {
    pub name: String,
    pub stackable: bool,
}

/// Starting values and per-level growth for a class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ClassDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(alias = "baseStats"))]
    pub base_stats: Attributes,
    #[cfg_attr(feature = "serde", serde(alias = "baseVitals"))]
    pub base_vitals: VitalMaxima,
    #[cfg_attr(feature = "serde", serde(alias = "statGrowth"))]
    pub growth_stats: Attributes,
    #[cfg_attr(feature = "serde", serde(alias = "vitalGrowth"))]
    pub growth_vitals: VitalMaxima,
}
