//! Automatic fighting loop driven through [`RuntimeHandle`].
//!
//! Each round the driver looks at the session, decides between fleeing,
//! swinging and casting, then lets the mob answer. Outcomes are counted from
//! the encounter and progression topics rather than from command replies, so
//! kills from damage over time are counted too.
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::{self, Instant, MissedTickBehavior};

use combat_core::{DamageSchool, ErrorSeverity};
use runtime::{
    EncounterEvent, Event, ProgressionEvent, RuntimeError, RuntimeHandle, SessionSnapshot, Topic,
};

#[derive(Clone, Debug)]
pub struct BattleSettings {
    pub duration: Duration,
    pub round: Duration,
    /// Flee an engaged mob once HP drops below this share of maximum.
    pub flee_below: f64,
    /// Every n-th round is a fire spell instead of a melee swing.
    pub spell_every: u32,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(120),
            round: Duration::from_secs(1),
            flee_below: 0.2,
            spell_every: 4,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BattleSummary {
    pub rounds: u32,
    pub kills: u32,
    pub deaths: u32,
    pub fled: u32,
    pub level: u32,
    pub xp: u64,
    pub returned_to_select: bool,
}

pub struct AutoBattle {
    handle: RuntimeHandle,
    settings: BattleSettings,
    encounter: broadcast::Receiver<Event>,
    progression: broadcast::Receiver<Event>,
    summary: BattleSummary,
}

impl AutoBattle {
    pub fn new(handle: RuntimeHandle, settings: BattleSettings) -> Self {
        let encounter = handle.subscribe(Topic::Encounter);
        let progression = handle.subscribe(Topic::Progression);
        Self {
            handle,
            settings,
            encounter,
            progression,
            summary: BattleSummary::default(),
        }
    }

    pub async fn run(mut self) -> Result<BattleSummary, RuntimeError> {
        let deadline = Instant::now() + self.settings.duration;
        let mut rounds = time::interval(self.settings.round);
        rounds.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = time::sleep_until(deadline) => break,
                _ = rounds.tick() => {}
            }

            self.drain_events();
            if self.summary.returned_to_select {
                break;
            }

            self.summary.rounds += 1;
            let snapshot = self.handle.query_state().await?;
            if snapshot.is_dead() {
                continue;
            }
            self.play_round(&snapshot).await?;
        }

        self.drain_events();
        let snapshot = self.handle.query_state().await?;
        self.summary.level = snapshot.character.level;
        self.summary.xp = snapshot.character.xp;
        tracing::info!(summary = ?self.summary, "auto battle finished");
        Ok(self.summary)
    }

    async fn play_round(&mut self, snapshot: &SessionSnapshot) -> Result<(), RuntimeError> {
        let Some(mob) = &snapshot.mob else {
            tracing::trace!("waiting for a spawn");
            return Ok(());
        };

        let hurt = below_share(
            snapshot.player.hp,
            snapshot.player_max.hp,
            self.settings.flee_below,
        );
        if mob.engaged && hurt {
            tracing::debug!(hp = snapshot.player.hp, "attempting to flee");
            return tolerate(self.handle.flee().await);
        }

        let level = snapshot.character.level;
        let spell_round = self.settings.spell_every > 0
            && self.summary.rounds % self.settings.spell_every == 0;
        let outgoing = if spell_round {
            self.handle
                .cast(spell_damage(level), DamageSchool::Fire)
                .await
        } else {
            self.handle.attack(melee_damage(level)).await
        };
        tolerate(outgoing)?;
        tolerate(self.handle.mob_swing().await)
    }

    fn drain_events(&mut self) {
        drain(&mut self.encounter, &mut self.summary);
        drain(&mut self.progression, &mut self.summary);
    }
}

fn drain(rx: &mut broadcast::Receiver<Event>, summary: &mut BattleSummary) {
    loop {
        match rx.try_recv() {
            Ok(event) => record(summary, &event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "battle driver missed events");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn record(summary: &mut BattleSummary, event: &Event) {
    match event {
        Event::Encounter(EncounterEvent::Killed { .. }) => summary.kills += 1,
        Event::Encounter(EncounterEvent::Fled) => summary.fled += 1,
        Event::Progression(ProgressionEvent::Respawned { .. })
        | Event::Progression(ProgressionEvent::Permadeath { .. }) => summary.deaths += 1,
        Event::Progression(ProgressionEvent::ReturnToCharacterSelect) => {
            summary.returned_to_select = true;
        }
        _ => {}
    }
}

/// Rule rejections (no mob, dead character) are expected between rounds.
fn tolerate<T>(result: Result<T, RuntimeError>) -> Result<(), RuntimeError> {
    match result {
        Ok(_) => Ok(()),
        Err(err)
            if matches!(
                err.severity(),
                ErrorSeverity::Recoverable | ErrorSeverity::Validation
            ) =>
        {
            tracing::debug!(error = %err, "action skipped");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn below_share(current: u32, max: u32, share: f64) -> bool {
    max > 0 && f64::from(current) < f64::from(max) * share
}

fn melee_damage(level: u32) -> f64 {
    4.0 + f64::from(level) * 2.0
}

fn spell_damage(level: u32) -> f64 {
    6.0 + f64::from(level) * 3.0
}
