//! Command handling on a live session: deaths, travel, flee and persistence.

mod common;

use std::sync::Arc;

use combat_core::{
    CombatError, EffectKind, EffectSpec, FleeOutcome, GameMode, MobAttackOutcome, Target,
};
use runtime::{
    CharacterRepository, EncounterEvent, Event, FileCharacterRepository, InMemoryCharacterRepo,
    ProgressionEvent, RuntimeError, Topic,
};

use common::{PLAYER_HP, RAT_HP, RAT_XP, character, start};

#[tokio::test]
async fn second_attack_after_kill_has_no_target() {
    let runtime = start(character(GameMode::Normal), Arc::new(InMemoryCharacterRepo::new())).await;
    let handle = runtime.handle();

    assert!(handle.attack(1_000.0).await.unwrap().killed);
    let err = handle.attack(1_000.0).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Combat(CombatError::NoActiveMob)));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.character.xp, RAT_XP);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn normal_death_costs_xp_and_returns_to_bind_camp() {
    let repo = Arc::new(InMemoryCharacterRepo::new());
    let mut hero = character(GameMode::Normal);
    hero.level = 10;
    hero.xp = 500;
    let runtime = start(hero, repo.clone()).await;
    let handle = runtime.handle();
    let mut progression = handle.subscribe(Topic::Progression);

    handle.travel("ridge").await.unwrap();
    let swing = handle.mob_swing().await.unwrap();
    assert!(matches!(swing, MobAttackOutcome::Hit(_)));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.character.xp, 400);
    assert_eq!(state.character.level, 10);
    assert_eq!(state.player.hp, PLAYER_HP);
    assert_eq!(state.encounter.camp_id, "field");
    assert_eq!(state.mob.as_ref().map(|mob| mob.template_id.as_str()), Some("rat"));
    assert!(matches!(
        progression.try_recv(),
        Ok(Event::Progression(ProgressionEvent::Respawned { xp_lost: 100, .. }))
    ));

    handle.flush_saves().await.unwrap();
    let stored = repo.load("Tester").unwrap().unwrap();
    assert_eq!(stored.xp, 400);
    assert_eq!(stored.zone_id, "hills");
    assert_eq!(stored.camp_id.as_deref(), Some("field"));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn lethal_reflect_is_handled_after_the_hit() {
    let runtime = start(character(GameMode::Normal), Arc::new(InMemoryCharacterRepo::new())).await;
    let handle = runtime.handle();

    let shield = EffectSpec::new("Thorns", EffectKind::DamageShield { amount: 1_000 }, 60_000);
    handle.apply_effect(Target::Mob, shield).await.unwrap();

    let hit = handle.attack(1.0).await.unwrap();
    assert!(!hit.killed);
    assert_eq!(hit.reflected, PLAYER_HP);

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.player.hp, PLAYER_HP);
    assert!(state.mob_effects.is_empty());
    assert_eq!(state.mob.map(|mob| mob.vitals.hp), Some(RAT_HP));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn hardcore_trade_of_blows_still_awards_the_kill() {
    let repo = Arc::new(InMemoryCharacterRepo::new());
    let runtime = start(character(GameMode::Hardcore), repo.clone()).await;
    let handle = runtime.handle();

    handle.travel("ridge").await.unwrap();
    let shield = EffectSpec::new("Thorns", EffectKind::DamageShield { amount: 1_000 }, 60_000);
    handle.apply_effect(Target::Player, shield).await.unwrap();
    let mut encounter = handle.subscribe(Topic::Encounter);
    let mut progression = handle.subscribe(Topic::Progression);

    let swing = handle.mob_swing().await.unwrap();
    let MobAttackOutcome::Hit(hit) = swing else {
        panic!("ogre swing should land");
    };
    assert_eq!(hit.new_hp, Some(0));

    let state = handle.query_state().await.unwrap();
    assert!(state.mob.is_none());
    assert!(state.is_dead());
    assert!(state.character.xp > 0);

    let killed = encounter.try_recv().unwrap();
    assert!(matches!(
        killed,
        Event::Encounter(EncounterEvent::Killed { xp, .. }) if xp > 0
    ));
    let permadeath = loop {
        match progression.try_recv().unwrap() {
            Event::Progression(ProgressionEvent::LevelUp { .. }) => continue,
            other => break other,
        }
    };
    assert!(matches!(
        permadeath,
        Event::Progression(ProgressionEvent::Permadeath { .. })
    ));

    handle.flush_saves().await.unwrap();
    let stored = repo.load("Tester").unwrap().unwrap();
    assert_eq!(stored.xp, state.character.xp);
    assert!(stored.killed_at.is_some());

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn dead_character_cannot_flee_or_travel() {
    let runtime = start(character(GameMode::Hardcore), Arc::new(InMemoryCharacterRepo::new())).await;
    let handle = runtime.handle();

    handle.travel("ridge").await.unwrap();
    handle.mob_swing().await.unwrap();
    assert!(handle.query_state().await.unwrap().is_dead());

    let err = handle.flee().await.unwrap_err();
    assert!(matches!(err, RuntimeError::Combat(CombatError::CharacterDead)));
    let err = handle.travel("field").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Combat(CombatError::CharacterDead)));
    assert_eq!(handle.query_state().await.unwrap().encounter.camp_id, "ridge");

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn travel_rejects_unconnected_camps() {
    let runtime = start(character(GameMode::Normal), Arc::new(InMemoryCharacterRepo::new())).await;
    let handle = runtime.handle();

    let err = handle.travel("field").await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Combat(CombatError::CampNotConnected { .. })
    ));
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.encounter.epoch, 0);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn fleeing_an_unengaged_mob_always_succeeds() {
    let runtime = start(character(GameMode::Normal), Arc::new(InMemoryCharacterRepo::new())).await;
    let handle = runtime.handle();

    let outcome = handle.flee().await.unwrap();
    assert!(matches!(outcome, FleeOutcome::Escaped { .. }));
    let state = handle.query_state().await.unwrap();
    assert!(state.mob.is_none());
    assert!(state.pending_respawn.is_some());

    assert_eq!(handle.flee().await.unwrap(), FleeOutcome::NothingToFlee);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn kill_is_persisted_to_the_file_repository() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(FileCharacterRepository::new(dir.path()).unwrap());
    let runtime = start(character(GameMode::Normal), repo.clone()).await;
    let handle = runtime.handle();

    handle.attack(1_000.0).await.unwrap();
    handle.flush_saves().await.unwrap();

    let stored = repo.load("Tester").unwrap().expect("character file");
    assert_eq!(stored.xp, RAT_XP);

    drop(handle);
    runtime.shutdown().await.unwrap();
    assert_eq!(repo.list().unwrap(), vec!["Tester".to_string()]);
}
