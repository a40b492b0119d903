//! Read-only inputs and side-channel collaborators.
//!
//! [`ContentOracle`] exposes static data by id. The collaborator traits in
//! [`collaborators`] are the only way the rules reach the outside world
//! (combat log, saves, inventory); none of them are ever read back.
mod collaborators;
mod content;
mod rng;

pub use collaborators::{
    CombatLog, Collaborators, Inventory, ItemInstance, LogEntry, LogKind, SaveOptions,
    SaveScheduler,
};
pub use content::{
    CampDefinition, CampSpawn, ClassDefinition, ItemDefinition, LootEntry, LootTable,
    MobTemplate, ZoneDefinition,
};
pub use rng::{CombatRng, PcgRng, ScriptedRng};

use crate::error::ConfigError;

/// Static content lookup by id.
pub trait ContentOracle: Send + Sync {
    fn mob_template(&self, id: &str) -> Option<&MobTemplate>;
    fn camp(&self, id: &str) -> Option<&CampDefinition>;
    fn zone(&self, id: &str) -> Option<&ZoneDefinition>;
    fn loot_table(&self, id: &str) -> Option<&LootTable>;
    fn item(&self, id: &str) -> Option<&ItemDefinition>;
    fn class(&self, id: &str) -> Option<&ClassDefinition>;

    fn require_mob_template(&self, id: &str) -> Result<&MobTemplate, ConfigError> {
        self.mob_template(id)
            .ok_or_else(|| ConfigError::unknown("mob template", id))
    }

    fn require_camp(&self, id: &str) -> Result<&CampDefinition, ConfigError> {
        self.camp(id).ok_or_else(|| ConfigError::unknown("camp", id))
    }

    fn require_zone(&self, id: &str) -> Result<&ZoneDefinition, ConfigError> {
        self.zone(id).ok_or_else(|| ConfigError::unknown("zone", id))
    }

    fn require_loot_table(&self, id: &str) -> Result<&LootTable, ConfigError> {
        self.loot_table(id)
            .ok_or_else(|| ConfigError::unknown("loot table", id))
    }

    fn require_item(&self, id: &str) -> Result<&ItemDefinition, ConfigError> {
        self.item(id).ok_or_else(|| ConfigError::unknown("item", id))
    }

    fn require_class(&self, id: &str) -> Result<&ClassDefinition, ConfigError> {
        self.class(id).ok_or_else(|| ConfigError::unknown("class", id))
    }
}
