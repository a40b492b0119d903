//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use combat_content::ContentBundle;
use combat_core::{
    CampDefinition, CampSpawn, Character, ClassDefinition, CombatConfig, GameMode, MobTemplate,
    VitalMaxima, ZoneDefinition,
};
use runtime::{CharacterRepository, OracleManager, Runtime, RuntimeConfig};

pub const RAT_HP: u32 = 20;
pub const RAT_XP: u64 = 10;
pub const PLAYER_HP: u32 = 100;
pub const SPAWN_TIME_MS: u64 = 30_000;

fn mob(name: &str, level: f64, hp: f64, damage: f64, xp: f64) -> MobTemplate {
    MobTemplate {
        name: name.into(),
        level: Some(level),
        hp: Some(hp),
        mana: Some(0.0),
        endurance: Some(0.0),
        damage: Some(damage),
        xp: Some(xp),
        ac: Some(0.0),
        delay: Some(2_000.0),
        movespeed: Some(1.0),
        melee_range: Some(5.0),
        aggro_range: Some(20.0),
        ..MobTemplate::default()
    }
}

fn camp(name: &str, template: &str, connected: &[&str]) -> CampDefinition {
    CampDefinition {
        name: name.into(),
        zone_id: "hills".into(),
        spawn_time: Some(SPAWN_TIME_MS as f64 / 1_000.0),
        camp_area: 10.0,
        connected: connected.iter().map(|id| id.to_string()).collect(),
        pool: vec![CampSpawn {
            template_id: template.into(),
            weight: 1.0,
        }],
        ..CampDefinition::default()
    }
}

/// Two connected camps in one zone: a rat field and an ogre ridge.
pub fn content() -> ContentBundle {
    let mut bundle = ContentBundle::default();
    bundle
        .mobs
        .insert("rat".into(), mob("a large rat", 1.0, f64::from(RAT_HP), 3.0, RAT_XP as f64));
    bundle
        .mobs
        .insert("ogre".into(), mob("a hill ogre", 5.0, 500.0, 10_000.0, 1_000.0));
    bundle
        .camps
        .insert("field".into(), camp("Rat Field", "rat", &["ridge"]));
    bundle
        .camps
        .insert("ridge".into(), camp("Ogre Ridge", "ogre", &["field"]));
    bundle.zones.insert(
        "hills".into(),
        ZoneDefinition {
            name: "The Hills".into(),
            xp_mod: 1.0,
            entry_camp: "field".into(),
        },
    );
    bundle.classes.insert("warrior".into(), warrior());
    bundle
}

pub fn warrior() -> ClassDefinition {
    ClassDefinition {
        name: "Warrior".into(),
        base_vitals: VitalMaxima::new(PLAYER_HP, 0, 50),
        ..ClassDefinition::default()
    }
}

pub fn character(mode: GameMode) -> Character {
    Character::new("Tester", "warrior", &warrior(), "hills").with_mode(mode)
}

pub async fn start(character: Character, repository: Arc<dyn CharacterRepository>) -> Runtime {
    Runtime::builder()
        .oracles(OracleManager::from_bundle(content(), CombatConfig::default()))
        .character(character)
        .repository(repository)
        .config(RuntimeConfig {
            rng_seed: Some(7),
            ..RuntimeConfig::default()
        })
        .build()
        .await
        .expect("runtime should build")
}
