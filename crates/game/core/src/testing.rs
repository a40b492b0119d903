//! Shared fixtures for unit tests.

use std::collections::HashMap;

use crate::env::{
    CampDefinition, CampSpawn, ClassDefinition, ContentOracle, Inventory, ItemDefinition,
    ItemInstance, LootEntry, LootTable, MobTemplate, SaveOptions, SaveScheduler, ZoneDefinition,
};
use crate::state::{
    ActiveMob, Character, CharacterPatch, CombatState, EncounterContext, MobInstance, MobKey,
    MobRole,
};
use crate::stats::{Attributes, ResistValues, VitalMaxima};

pub const ZONE: &str = "qeynos_hills";
pub const CAMP: &str = "rat_hill";
pub const NEXT_CAMP: &str = "wolf_den";
pub const ZONE_LINE: &str = "to_blackburrow";
pub const OTHER_ZONE: &str = "blackburrow";
pub const OTHER_CAMP: &str = "gnoll_pit";

pub fn warrior_class() -> ClassDefinition {
    ClassDefinition {
        name: "Warrior".into(),
        base_stats: Attributes::new(20, 20, 15, 15, 5, 5, 5),
        base_vitals: VitalMaxima::new(100, 50, 80),
        growth_stats: Attributes::new(2, 2, 1, 1, 0, 0, 0),
        growth_vitals: VitalMaxima::new(15, 2, 10),
    }
}

pub fn character() -> Character {
    let mut character = Character::new("Tester", "warrior", &warrior_class(), ZONE);
    character.camp_id = Some(CAMP.into());
    character
}

pub fn mob_instance(key: MobKey) -> MobInstance {
    MobInstance {
        key,
        template_id: "large_rat".into(),
        name: "a large rat".into(),
        level: 1,
        max_level: None,
        hp: 40,
        mana: 30,
        endurance: 20,
        damage: 6,
        xp: 100,
        ac: 10,
        delay: 2_000.0,
        movespeed: 1.0,
        melee_range: 5.0,
        aggro_range: 20.0,
        tags: Vec::new(),
        race_id: Some(36),
        gender: 2,
        texture_id: 0,
        loot_table_id: Some("rat_loot".into()),
        distance: 3.0,
        role: MobRole::Combat,
        resists: ResistValues::default(),
        attributes: Attributes::default(),
    }
}

pub fn state() -> CombatState {
    CombatState::new(character(), EncounterContext::new(ZONE, CAMP))
}

pub fn state_with_mob() -> CombatState {
    let mut state = state();
    let key = state.allocate_mob_key();
    state.install_mob(ActiveMob::new(mob_instance(key)));
    state
}

fn template(name: &str, level: f64, hp: f64, tags: &[&str]) -> MobTemplate {
    MobTemplate {
        name: name.into(),
        level: Some(level),
        max_level: None,
        hp: Some(hp),
        mana: Some(0.0),
        endurance: Some(0.0),
        damage: Some(5.0),
        xp: Some(100.0),
        ac: Some(10.0),
        delay: Some(2_000.0),
        movespeed: Some(1.0),
        melee_range: Some(5.0),
        aggro_range: Some(20.0),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        loot_table_id: Some("rat_loot".into()),
        ..MobTemplate::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct TestContent {
    pub templates: HashMap<String, MobTemplate>,
    pub camps: HashMap<String, CampDefinition>,
    pub zones: HashMap<String, ZoneDefinition>,
    pub loot: HashMap<String, LootTable>,
    pub items: HashMap<String, ItemDefinition>,
    pub classes: HashMap<String, ClassDefinition>,
}

impl TestContent {
    pub fn camp_mut(&mut self, id: &str) -> &mut CampDefinition {
        self.camps.entry(id.to_string()).or_default()
    }
}

pub fn content() -> TestContent {
    let mut content = TestContent::default();

    content
        .templates
        .insert("large_rat".into(), template("a large rat", 1.0, 40.0, &[]));
    content
        .templates
        .insert("gray_wolf".into(), template("a gray wolf", 3.0, 90.0, &[]));
    content
        .templates
        .insert("merchant".into(), template("Merchant Tanal", 20.0, 500.0, &["Merchant"]));

    content.camps.insert(
        CAMP.into(),
        CampDefinition {
            name: "Rat Hill".into(),
            zone_id: ZONE.into(),
            spawn_time: Some(30.0),
            camp_area: 10.0,
            connected: vec![NEXT_CAMP.into(), ZONE_LINE.into(), "hidden_grove".into()],
            pool: vec![CampSpawn {
                template_id: "large_rat".into(),
                weight: 1.0,
            }],
            ..CampDefinition::default()
        },
    );
    content.camps.insert(
        NEXT_CAMP.into(),
        CampDefinition {
            name: "Wolf Den".into(),
            zone_id: ZONE.into(),
            spawn_time: Some(45.0),
            camp_area: 20.0,
            connected: vec![CAMP.into()],
            pool: vec![CampSpawn {
                template_id: "gray_wolf".into(),
                weight: 1.0,
            }],
            xp_mod: 1.5,
            ..CampDefinition::default()
        },
    );
    content.camps.insert(
        "hidden_grove".into(),
        CampDefinition {
            name: "Hidden Grove".into(),
            zone_id: ZONE.into(),
            spawn_time: Some(30.0),
            content_flags: vec!["expansion_kunark".into()],
            connected: vec![CAMP.into()],
            pool: vec![CampSpawn {
                template_id: "large_rat".into(),
                weight: 1.0,
            }],
            ..CampDefinition::default()
        },
    );
    content.camps.insert(
        ZONE_LINE.into(),
        CampDefinition {
            name: "Blackburrow Entrance".into(),
            zone_id: ZONE.into(),
            target_zone_id: Some(OTHER_ZONE.into()),
            connected: vec![CAMP.into()],
            ..CampDefinition::default()
        },
    );
    content.camps.insert(
        OTHER_CAMP.into(),
        CampDefinition {
            name: "Gnoll Pit".into(),
            zone_id: OTHER_ZONE.into(),
            spawn_time: Some(60.0),
            camp_area: 15.0,
            connected: vec![],
            pool: vec![CampSpawn {
                template_id: "gray_wolf".into(),
                weight: 1.0,
            }],
            ..CampDefinition::default()
        },
    );

    content.zones.insert(
        ZONE.into(),
        ZoneDefinition {
            name: "Qeynos Hills".into(),
            xp_mod: 1.0,
            entry_camp: CAMP.into(),
        },
    );
    content.zones.insert(
        OTHER_ZONE.into(),
        ZoneDefinition {
            name: "Blackburrow".into(),
            xp_mod: 2.0,
            entry_camp: OTHER_CAMP.into(),
        },
    );

    content.loot.insert(
        "rat_loot".into(),
        LootTable {
            entries: vec![
                LootEntry {
                    item_id: "rat_whiskers".into(),
                    drop_chance: 0.5,
                    min_qty: 1,
                    max_qty: 3,
                },
                LootEntry {
                    item_id: "rat_ear".into(),
                    drop_chance: 0.1,
                    min_qty: 2,
                    max_qty: 2,
                },
            ],
        },
    );
    content.items.insert(
        "rat_whiskers".into(),
        ItemDefinition {
            name: "Rat Whiskers".into(),
            stackable: true,
        },
    );
    content.items.insert(
        "rat_ear".into(),
        ItemDefinition {
            name: "Rat Ear".into(),
            stackable: true,
        },
    );
    content.classes.insert("warrior".into(), warrior_class());
    content
}

impl ContentOracle for TestContent {
    fn mob_template(&self, id: &str) -> Option<&MobTemplate> {
        self.templates.get(id)
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

#[derive(Clone, Debug, Default)]
pub struct RecordingSaves {
    pub saves: Vec<(CharacterPatch, SaveOptions)>,
}

impl SaveScheduler for RecordingSaves {
    fn schedule_save(&mut self, patch: CharacterPatch, opts: SaveOptions) {
        self.saves.push((patch, opts));
    }
}

#[derive(Clone, Debug, Default)]
pub struct TestInventory {
    pub items: Vec<(ItemInstance, u32)>,
    next_id: u64,
}

impl Inventory for TestInventory {
    fn create_item_instance(&mut self, item_id: &str, definition: &ItemDefinition) -> ItemInstance {
        self.next_id += 1;
        ItemInstance {
            instance_id: self.next_id,
            item_id: item_id.to_string(),
            name: definition.name.clone(),
        }
    }

    fn add_item_to_inventory(&mut self, item: ItemInstance, quantity: u32) {
        self.items.push((item, quantity));
    }
}
