//! Write-only collaborator interfaces.

use strum::{Display, EnumIter, EnumString};

use super::content::ItemDefinition;
use crate::state::CharacterPatch;

/// Category of a combat log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum LogKind {
    Damage,
    Kill,
    Xp,
    Loot,
    #[strum(serialize = "levelup")]
    #[cfg_attr(feature = "serde", serde(rename = "levelup"))]
    LevelUp,
    #[strum(serialize = "mobattack")]
    #[cfg_attr(feature = "serde", serde(rename = "mobattack"))]
    MobAttack,
    Spawn,
    System,
    Flee,
    Error,
    Normal,
    Heal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub message: String,
    pub kind: LogKind,
}

/// Combat log sink.
pub trait CombatLog {
    fn add_log(&mut self, message: String, kind: LogKind);
}

impl CombatLog for Vec<LogEntry> {
    fn add_log(&mut self, message: String, kind: LogKind) {
        self.push(LogEntry { message, kind });
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Persist before the next combat outcome can happen.
    pub immediate: bool,
}

impl SaveOptions {
    pub const IMMEDIATE: Self = Self { immediate: true };
    pub const DEFERRED: Self = Self { immediate: false };
}

/// Fire-and-forget persistence.
pub trait SaveScheduler {
    fn schedule_save(&mut self, patch: CharacterPatch, opts: SaveOptions);
}

/// A concrete item handed to the inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub instance_id: u64,
    pub item_id: String,
    pub name: String,
}

pub trait Inventory {
    fn create_item_instance(&mut self, item_id: &str, definition: &ItemDefinition) -> ItemInstance;
    fn add_item_to_inventory(&mut self, item: ItemInstance, quantity: u32);
}

/// Bundle of the collaborators kill handling needs.
pub struct Collaborators<'a> {
    pub log: &'a mut dyn CombatLog,
    pub saves: &'a mut dyn SaveScheduler,
    pub inventory: &'a mut dyn Inventory,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        log: &'a mut dyn CombatLog,
        saves: &'a mut dyn SaveScheduler,
        inventory: &'a mut dyn Inventory,
    ) -> Self {
        Self {
            log,
            saves,
            inventory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_kinds_use_wire_names() {
        assert_eq!(LogKind::LevelUp.to_string(), "levelup");
        assert_eq!(LogKind::MobAttack.to_string(), "mobattack");
        assert_eq!(LogKind::Xp.to_string(), "xp");
    }
}
