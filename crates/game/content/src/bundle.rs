//! In-memory content catalog.

use std::collections::HashMap;

use combat_core::{
    CampDefinition, ClassDefinition, ConfigError, ContentOracle, ItemDefinition, LootTable,
    MobTemplate, ZoneDefinition,
};

/// Every static definition the combat rules read, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    pub mobs: HashMap<String, MobTemplate>,
    pub camps: HashMap<String, CampDefinition>,
    pub zones: HashMap<String, ZoneDefinition>,
    pub loot: HashMap<String, LootTable>,
    pub items: HashMap<String, ItemDefinition>,
    pub classes: HashMap<String, ClassDefinition>,
}

impl ContentBundle {
    /// Check cross-references between catalogs.
    ///
    /// Numeric mob fields are not checked here; they are validated when a
    /// template is instantiated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (camp_id, camp) in sorted(&self.camps) {
            for entry in &camp.pool {
                self.require_mob_template(&entry.template_id)?;
            }
            for neighbor in &camp.connected {
                self.require_camp(neighbor)?;
            }
            if let Some(zone_id) = &camp.target_zone_id {
                self.require_zone(zone_id)?;
            }
            if camp.target_zone_id.is_none() && !camp.pool.is_empty() {
                camp.respawn_delay_ms(camp_id)?;
            }
        }
        for (_, zone) in sorted(&self.zones) {
            self.require_camp(&zone.entry_camp)?;
        }
        for (_, mob) in sorted(&self.mobs) {
            if let Some(table) = &mob.loot_table_id {
                self.require_loot_table(table)?;
            }
        }
        for (_, table) in sorted(&self.loot) {
            for entry in &table.entries {
                self.require_item(&entry.item_id)?;
            }
        }
        Ok(())
    }
}

fn sorted<T>(map: &HashMap<String, T>) -> Vec<(&String, &T)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

impl ContentOracle for ContentBundle {
    fn mob_template(&self, id: &str) -> Option<&MobTemplate> {
        self.mobs.get(id)
    }

    fn camp(&self, id: &str) -> Option<&CampDefinition> {
        self.camps.get(id)
    }

    fn zone(&self, id: &str) -> Option<&ZoneDefinition> {
        self.zones.get(id)
    }

    fn loot_table(&self, id: &str) -> Option<&LootTable> {
        self.loot.get(id)
    }

    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn class(&self, id: &str) -> Option<&ClassDefinition> {
        self.classes.get(id)
    }
}
