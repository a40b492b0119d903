//! Runtime implementations of the rule collaborators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;

use combat_core::{
    CharacterPatch, CombatLog, CombatRng, Inventory, ItemDefinition, ItemInstance, LogEntry,
    LogKind, SaveOptions, SaveScheduler,
};

use super::persistence::PersistenceCommand;
use crate::events::{Event, EventBus};

/// Publishes combat log lines on the `Log` topic.
pub struct BusLog {
    bus: EventBus,
}

impl BusLog {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl CombatLog for BusLog {
    fn add_log(&mut self, message: String, kind: LogKind) {
        tracing::debug!(target: "runtime::session", %kind, "{}", message);
        self.bus.publish(Event::Log(LogEntry { message, kind }));
    }
}

/// Forwards save requests to the persistence worker without waiting.
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<PersistenceCommand>,
}

impl SaveQueue {
    pub fn new(tx: mpsc::UnboundedSender<PersistenceCommand>) -> Self {
        Self { tx }
    }
}

impl SaveScheduler for SaveQueue {
    fn schedule_save(&mut self, patch: CharacterPatch, opts: SaveOptions) {
        if self.tx.send(PersistenceCommand::Save { patch, opts }).is_err() {
            tracing::warn!(target: "runtime::session", "persistence worker gone, save dropped");
        }
    }
}

/// Session-local bag of looted items. Stackable items share one entry.
#[derive(Debug, Default)]
pub struct SessionInventory {
    next_instance_id: u64,
    stacks: Vec<(ItemInstance, u32)>,
    stackable: std::collections::HashSet<String>,
}

impl SessionInventory {
    pub fn items(&self) -> &[(ItemInstance, u32)] {
        &self.stacks
    }
}

impl Inventory for SessionInventory {
    fn create_item_instance(&mut self, item_id: &str, definition: &ItemDefinition) -> ItemInstance {
        self.next_instance_id += 1;
        if definition.stackable {
            self.stackable.insert(item_id.to_string());
        }
        ItemInstance {
            instance_id: self.next_instance_id,
            item_id: item_id.to_string(),
            name: definition.name.clone(),
        }
    }

    fn add_item_to_inventory(&mut self, item: ItemInstance, quantity: u32) {
        if self.stackable.contains(&item.item_id)
            && let Some((_, count)) = self
                .stacks
                .iter_mut()
                .find(|(existing, _)| existing.item_id == item.item_id)
        {
            *count = count.saturating_add(quantity);
            return;
        }
        self.stacks.push((item, quantity));
    }
}

/// [`CombatRng`] backed by a seedable `StdRng`.
pub struct SessionRng(StdRng);

impl SessionRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl CombatRng for SessionRng {
    fn next_f64(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}
