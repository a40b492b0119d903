//! Session worker that owns the live [`CombatState`].
//!
//! Every mutation of a session happens on this task. Client commands, the
//! effect tick, the pending respawn and the hardcore return timer are arms of
//! one `select!` loop, so vitals are never touched concurrently.
//!
//! A player death raised by a damage shield reflect is only flagged while the
//! hit resolves; it is handled at the top of the next loop iteration after a
//! `yield_now`.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use combat_core::{
    CharacterPatch, Collaborators, CombatError, CombatEvent, CombatLog, CombatState, ContentOracle,
    DamageKind, DamageResolution, DamageSchool, DeathOutcome, EffectId, EffectSpec, ErrorSeverity,
    FleeOutcome, GameError, KillOutcome, LogKind, MobAttackOutcome, MobKey, RespawnOutcome,
    RespawnTicket, SaveOptions, SaveScheduler, SpawnOutcome, Target, Timestamp, TravelOutcome,
    attempt_flee, effects, enter_camp, handle_kill, handle_player_death, resolve_damage,
    resolve_mob_attack, respawn, spawn,
};

use super::collaborators::{BusLog, SaveQueue, SessionInventory, SessionRng};
use crate::api::{Result, SessionSnapshot};
use crate::events::{
    CombatFeed, EffectEndReason, EncounterEvent, Event, EventBus, ProgressionEvent,
};
use crate::oracle::OracleManager;

/// Commands accepted by the session worker.
pub enum Command {
    /// Player melee swing for `raw_damage` against the active mob.
    Attack {
        raw_damage: f64,
        reply: oneshot::Sender<Result<DamageResolution>>,
    },
    /// Player spell against the active mob.
    Cast {
        raw_damage: f64,
        school: DamageSchool,
        reply: oneshot::Sender<Result<DamageResolution>>,
    },
    /// The active mob swings at the player.
    MobSwing {
        reply: oneshot::Sender<Result<MobAttackOutcome>>,
    },
    /// The active mob casts at the player.
    MobCast {
        raw_damage: f64,
        school: DamageSchool,
        reply: oneshot::Sender<Result<DamageResolution>>,
    },
    ApplyEffect {
        target: Target,
        spec: EffectSpec,
        reply: oneshot::Sender<Result<EffectId>>,
    },
    RemoveEffect {
        target: Target,
        id: EffectId,
        reply: oneshot::Sender<Result<bool>>,
    },
    ClearEffects {
        target: Target,
        reply: oneshot::Sender<Result<()>>,
    },
    Flee {
        reply: oneshot::Sender<Result<FleeOutcome>>,
    },
    Travel {
        camp_id: String,
        reply: oneshot::Sender<Result<TravelOutcome>>,
    },
    QueryState {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

pub struct SessionWorker {
    state: CombatState,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    log: BusLog,
    saves: SaveQueue,
    inventory: SessionInventory,
    rng: SessionRng,
    started: Instant,
    pending_respawn: Option<(Instant, RespawnTicket)>,
    return_at: Option<Instant>,
    pending_death: bool,
}

impl SessionWorker {
    pub fn new(
        state: CombatState,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        saves: SaveQueue,
        rng: SessionRng,
    ) -> Self {
        info!(
            target: "runtime::session",
            character = %state.character.name,
            zone = %state.encounter.zone_id,
            camp = %state.encounter.camp_id,
            "session worker initialized"
        );
        Self {
            log: BusLog::new(event_bus.clone()),
            state,
            oracles,
            command_rx,
            event_bus,
            saves,
            inventory: SessionInventory::default(),
            rng,
            started: Instant::now(),
            pending_respawn: None,
            return_at: None,
            pending_death: false,
        }
    }

    /// Main worker loop. Exits once every command sender is dropped.
    pub async fn run(mut self) {
        if self.state.character.is_dead() {
            warn!(target: "runtime::session", "character is dead, no encounter started");
        } else {
            self.spawn_current();
        }

        let tick_every = Duration::from_millis(self.oracles.config().effect_tick_ms.max(1));
        let mut effect_tick = time::interval_at(Instant::now() + tick_every, tick_every);
        effect_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if self.pending_death {
                tokio::task::yield_now().await;
                self.on_player_death();
            }

            let return_at = self.return_at;
            let respawn_at = self.pending_respawn.as_ref().map(|(at, _)| *at);

            tokio::select! {
                biased;
                _ = time::sleep_until(return_at.unwrap_or_else(Instant::now)), if return_at.is_some() => {
                    self.return_to_character_select();
                }
                _ = time::sleep_until(respawn_at.unwrap_or_else(Instant::now)), if respawn_at.is_some() => {
                    self.fire_respawn();
                }
                _ = effect_tick.tick() => {
                    self.on_effect_tick();
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
            }
        }

        info!(target: "runtime::session", character = %self.state.character.name, "session worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Attack { raw_damage, reply } => {
                let result = self.player_hit(raw_damage, DamageKind::Melee);
                respond("attack", reply, result);
            }
            Command::Cast {
                raw_damage,
                school,
                reply,
            } => {
                let result = self.player_hit(raw_damage, DamageKind::Spell(school));
                respond("cast", reply, result);
            }
            Command::MobSwing { reply } => {
                let result = self.mob_swing();
                respond("mob_swing", reply, result);
            }
            Command::MobCast {
                raw_damage,
                school,
                reply,
            } => {
                let result = self.mob_cast(raw_damage, school);
                respond("mob_cast", reply, result);
            }
            Command::ApplyEffect {
                target,
                spec,
                reply,
            } => {
                let result = self.apply_effect(target, spec);
                respond("apply_effect", reply, result);
            }
            Command::RemoveEffect { target, id, reply } => {
                let result = self.remove_effect(target, id);
                respond("remove_effect", reply, result);
            }
            Command::ClearEffects { target, reply } => {
                self.state.effects.clear(target);
                self.state.refresh_maxima();
                self.event_bus
                    .publish(Event::Combat(CombatFeed::EffectsCleared { target }));
                respond("clear_effects", reply, Ok(()));
            }
            Command::Flee { reply } => {
                let result = self.flee();
                respond("flee", reply, result);
            }
            Command::Travel { camp_id, reply } => {
                let result = self.travel(&camp_id);
                respond("travel", reply, result);
            }
            Command::QueryState { reply } => {
                let snapshot = SessionSnapshot::capture(
                    &self.state,
                    self.now(),
                    self.pending_respawn.as_ref().map(|(_, ticket)| ticket),
                    self.inventory.items(),
                );
                if reply.send(snapshot).is_err() {
                    debug!(target: "runtime::session", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Milliseconds since the session started.
    fn now(&self) -> Timestamp {
        let elapsed = self.started.elapsed().as_millis();
        Timestamp::from_millis(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.state.character.is_dead() {
            return Err(CombatError::CharacterDead.into());
        }
        Ok(())
    }

    fn player_hit(&mut self, raw_damage: f64, kind: DamageKind) -> Result<DamageResolution> {
        self.ensure_alive()?;
        let resolution = resolve_damage(
            &mut self.state,
            Target::Mob,
            raw_damage,
            kind,
            self.oracles.config(),
            &mut self.log,
        )?;
        self.event_bus
            .publish(Event::Combat(CombatFeed::damage(&resolution)));
        self.process_events(&resolution.events);
        self.sync_vitals();
        Ok(resolution)
    }

    fn mob_swing(&mut self) -> Result<MobAttackOutcome> {
        self.ensure_alive()?;
        let outcome = resolve_mob_attack(
            &mut self.state,
            &mut self.rng,
            self.oracles.config(),
            &mut self.log,
        )?;
        match &outcome {
            MobAttackOutcome::Dodged => {
                self.event_bus.publish(Event::Combat(CombatFeed::Dodged));
            }
            MobAttackOutcome::Hit(resolution) => {
                self.event_bus
                    .publish(Event::Combat(CombatFeed::damage(resolution)));
                self.process_events(&resolution.events);
            }
        }
        self.sync_vitals();
        Ok(outcome)
    }

    fn mob_cast(&mut self, raw_damage: f64, school: DamageSchool) -> Result<DamageResolution> {
        self.ensure_alive()?;
        match self.state.mob.as_mut() {
            Some(mob) if !mob.is_dead() => mob.engaged = true,
            _ => return Err(CombatError::NoActiveMob.into()),
        }
        let resolution = resolve_damage(
            &mut self.state,
            Target::Player,
            raw_damage,
            DamageKind::Spell(school),
            self.oracles.config(),
            &mut self.log,
        )?;
        self.event_bus
            .publish(Event::Combat(CombatFeed::damage(&resolution)));
        self.process_events(&resolution.events);
        self.sync_vitals();
        Ok(resolution)
    }

    fn apply_effect(&mut self, target: Target, spec: EffectSpec) -> Result<EffectId> {
        self.ensure_alive()?;
        if target == Target::Mob && self.state.mob.is_none() {
            return Err(CombatError::NoActiveMob.into());
        }
        let now = self.now();
        let name = spec.name.clone();
        let id = self.state.effects.add(
            target,
            spec,
            now,
            self.oracles.config().default_effect_interval_ms,
        );
        self.state.refresh_maxima();
        self.event_bus
            .publish(Event::Combat(CombatFeed::EffectApplied { target, id, name }));
        Ok(id)
    }

    fn remove_effect(&mut self, target: Target, id: EffectId) -> Result<bool> {
        let Some(effect) = self.state.effects.remove(target, id) else {
            return Ok(false);
        };
        self.state.refresh_maxima();
        self.event_bus
            .publish(Event::Combat(CombatFeed::EffectEnded {
                target,
                name: effect.name,
                reason: EffectEndReason::Removed,
            }));
        Ok(true)
    }

    fn flee(&mut self) -> Result<FleeOutcome> {
        self.ensure_alive()?;
        let outcome = attempt_flee(
            &mut self.state,
            self.oracles.content(),
            &mut self.rng,
            self.oracles.config(),
            &mut self.log,
        )?;
        match &outcome {
            FleeOutcome::Escaped { respawn } => {
                self.event_bus
                    .publish(Event::Encounter(EncounterEvent::Fled));
                self.schedule_respawn(respawn.clone());
            }
            FleeOutcome::Failed => {
                self.event_bus
                    .publish(Event::Encounter(EncounterEvent::FleeFailed));
            }
            FleeOutcome::NothingToFlee => {}
        }
        Ok(outcome)
    }

    fn travel(&mut self, camp_id: &str) -> Result<TravelOutcome> {
        self.ensure_alive()?;
        let outcome = enter_camp(
            &mut self.state,
            camp_id,
            self.oracles.content(),
            &mut self.rng,
            self.oracles.config(),
            &mut self.log,
            &mut self.saves,
        )?;
        self.event_bus
            .publish(Event::Encounter(EncounterEvent::Travelled {
                zone_id: outcome.zone_id.clone(),
                camp_id: outcome.camp_id.clone(),
            }));
        self.after_spawn(&outcome.spawn);
        Ok(outcome)
    }

    fn process_events(&mut self, events: &[CombatEvent]) {
        // Kills settle before any player death raised by the same resolution.
        for event in events {
            if let CombatEvent::MobDied { key } = *event {
                self.on_mob_death(key);
            }
        }
        for event in events {
            match *event {
                CombatEvent::PlayerDied { deferred: true } => {
                    debug!(target: "runtime::session", "player death deferred to next turn");
                    self.pending_death = true;
                }
                CombatEvent::PlayerDied { deferred: false } => self.on_player_death(),
                CombatEvent::MobDied { .. } => {}
            }
        }
    }

    fn on_mob_death(&mut self, key: MobKey) {
        let now = self.now();
        let mut io = Collaborators::new(&mut self.log, &mut self.saves, &mut self.inventory);
        let outcome = handle_kill(
            &mut self.state,
            key,
            now,
            self.oracles.content(),
            &mut self.rng,
            self.oracles.config(),
            &mut io,
        );

        match outcome {
            Ok(KillOutcome::Awarded(reward)) => {
                self.event_bus
                    .publish(Event::Encounter(EncounterEvent::Killed {
                        key: reward.mob_key,
                        name: reward.mob_name,
                        xp: reward.xp,
                        loot: reward
                            .loot
                            .iter()
                            .map(|drop| (drop.item.item_id.clone(), drop.quantity))
                            .collect(),
                    }));
                if reward.level_up.leveled() {
                    self.event_bus
                        .publish(Event::Progression(ProgressionEvent::LevelUp {
                            level: reward.level_up.level,
                            levels_gained: reward.level_up.levels_gained,
                        }));
                }
                self.schedule_respawn(reward.respawn);
            }
            Ok(KillOutcome::Duplicate) => {
                debug!(target: "runtime::session", %key, "duplicate kill ignored");
            }
            Ok(KillOutcome::Stale) => {
                debug!(target: "runtime::session", %key, "kill for inactive mob ignored");
            }
            Err(err) => self.report(err),
        }
    }

    fn on_player_death(&mut self) {
        self.pending_death = false;
        let wall_clock_ms = Utc::now().timestamp_millis();
        let outcome = handle_player_death(
            &mut self.state,
            self.oracles.content(),
            self.oracles.config(),
            wall_clock_ms,
            &mut self.log,
            &mut self.saves,
        );

        match outcome {
            Ok(DeathOutcome::Permadeath {
                killed_at,
                return_after_ms,
            }) => {
                info!(target: "runtime::session", killed_at, "hardcore character died");
                self.pending_respawn = None;
                self.return_at = Some(Instant::now() + Duration::from_millis(return_after_ms));
                self.event_bus
                    .publish(Event::Progression(ProgressionEvent::Permadeath { killed_at }));
            }
            Ok(DeathOutcome::AlreadyDead) => {}
            Ok(DeathOutcome::Respawned {
                xp_lost,
                zone_id,
                camp_id,
            }) => {
                self.pending_respawn = None;
                self.event_bus
                    .publish(Event::Combat(CombatFeed::EffectsCleared {
                        target: Target::Player,
                    }));
                self.event_bus
                    .publish(Event::Progression(ProgressionEvent::Respawned {
                        xp_lost,
                        zone_id,
                        camp_id,
                    }));
                self.spawn_current();
            }
            Err(err) => self.report(err),
        }
    }

    fn spawn_current(&mut self) {
        match spawn(
            &mut self.state,
            self.oracles.content(),
            &mut self.rng,
            &mut self.log,
        ) {
            Ok(outcome) => self.after_spawn(&outcome),
            Err(err) => self.report(err),
        }
    }

    fn after_spawn(&mut self, outcome: &SpawnOutcome) {
        match outcome {
            SpawnOutcome::Combat { key, con } => {
                if let Some(mob) = self.state.mob.as_ref() {
                    self.event_bus
                        .publish(Event::Encounter(EncounterEvent::Spawned {
                            key: *key,
                            name: mob.name().to_string(),
                            level: mob.instance.level,
                            con: *con,
                        }));
                }
            }
            SpawnOutcome::Interaction(instance) => {
                self.event_bus
                    .publish(Event::Encounter(EncounterEvent::Interaction {
                        name: instance.name.clone(),
                        role: instance.role,
                    }));
                // The camp keeps cycling after a merchant or banker.
                let camp_id = self.state.encounter.camp_id.clone();
                let epoch = self.state.encounter.epoch;
                let delay = self
                    .oracles
                    .content()
                    .require_camp(&camp_id)
                    .and_then(|camp| camp.respawn_delay_ms(&camp_id));
                match delay {
                    Ok(delay_ms) => self.schedule_respawn(RespawnTicket {
                        epoch,
                        camp_id,
                        delay_ms,
                    }),
                    Err(err) => self.report(err.into()),
                }
            }
        }
        self.sync_vitals();
    }

    fn schedule_respawn(&mut self, ticket: RespawnTicket) {
        debug!(
            target: "runtime::session",
            camp = %ticket.camp_id,
            epoch = ticket.epoch,
            delay_ms = ticket.delay_ms,
            "respawn scheduled"
        );
        self.event_bus
            .publish(Event::Encounter(EncounterEvent::RespawnScheduled {
                camp_id: ticket.camp_id.clone(),
                delay_ms: ticket.delay_ms,
            }));
        let at = Instant::now() + Duration::from_millis(ticket.delay_ms);
        self.pending_respawn = Some((at, ticket));
    }

    fn fire_respawn(&mut self) {
        let Some((_, ticket)) = self.pending_respawn.take() else {
            return;
        };
        match respawn(
            &mut self.state,
            &ticket,
            self.oracles.content(),
            &mut self.rng,
            &mut self.log,
        ) {
            Ok(RespawnOutcome::Spawned(outcome)) => self.after_spawn(&outcome),
            Ok(RespawnOutcome::Stale) => {
                debug!(
                    target: "runtime::session",
                    camp = %ticket.camp_id,
                    epoch = ticket.epoch,
                    current_epoch = self.state.encounter.epoch,
                    "stale respawn dropped"
                );
            }
            Err(err) => self.report(err),
        }
    }

    fn return_to_character_select(&mut self) {
        self.return_at = None;
        info!(target: "runtime::session", "returning to character select");
        self.event_bus
            .publish(Event::Progression(ProgressionEvent::ReturnToCharacterSelect));
    }

    fn on_effect_tick(&mut self) {
        if self.state.character.is_dead() {
            return;
        }
        let active = !self.state.effects.set(Target::Player).is_empty()
            || !self.state.effects.set(Target::Mob).is_empty();
        if !active {
            return;
        }

        let now = self.now();
        let report = effects::advance(
            &mut self.state,
            now,
            &mut self.rng,
            self.oracles.config(),
            &mut self.log,
        );

        let ended = report
            .expired
            .into_iter()
            .map(|entry| (entry, EffectEndReason::Expired))
            .chain(
                report
                    .broke_free
                    .into_iter()
                    .map(|entry| (entry, EffectEndReason::BrokeFree)),
            );
        for ((target, name), reason) in ended {
            self.event_bus
                .publish(Event::Combat(CombatFeed::EffectEnded {
                    target,
                    name,
                    reason,
                }));
        }

        if report.mob_died
            && let Some(key) = self.state.mob.as_ref().map(|mob| mob.key())
        {
            self.on_mob_death(key);
        }
        self.sync_vitals();
    }

    /// Publish current vitals and queue them for the next deferred save.
    fn sync_vitals(&mut self) {
        let player = self.state.player.snapshot();
        self.event_bus.publish(Event::Combat(CombatFeed::Vitals {
            player,
            mob: self.state.mob.as_ref().map(|mob| mob.vitals.snapshot()),
        }));
        if !self.state.character.is_dead() {
            self.state.character.vitals = Some(player);
            self.saves.schedule_save(
                CharacterPatch {
                    vitals: Some(player),
                    ..CharacterPatch::default()
                },
                SaveOptions::DEFERRED,
            );
        }
    }

    /// Failure inside a follow-up (kill, death, respawn) with no caller to
    /// return it to.
    fn report(&mut self, err: CombatError) {
        error!(
            target: "runtime::session",
            code = err.error_code(),
            error = %err,
            "session follow-up failed"
        );
        self.log.add_log(err.to_string(), LogKind::Error);
    }
}

fn respond<T>(command: &'static str, reply: oneshot::Sender<Result<T>>, result: Result<T>) {
    if let Err(err) = &result {
        match err.severity() {
            ErrorSeverity::Recoverable | ErrorSeverity::Validation => {
                warn!(target: "runtime::session", command, error = %err, "command rejected");
            }
            ErrorSeverity::Internal | ErrorSeverity::Fatal => {
                error!(target: "runtime::session", command, error = %err, "command failed");
            }
        }
    }
    if reply.send(result).is_err() {
        debug!(target: "runtime::session", command, "reply channel closed (caller dropped)");
    }
}
