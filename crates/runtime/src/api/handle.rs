//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving combat or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{
    DamageResolution, DamageSchool, EffectId, EffectSpec, FleeOutcome, MobAttackOutcome, Target,
    TravelOutcome,
};

use super::errors::{Result, RuntimeError};
use super::snapshot::SessionSnapshot;
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, PersistenceCommand};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    persistence_tx: mpsc::UnboundedSender<PersistenceCommand>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        persistence_tx: mpsc::UnboundedSender<PersistenceCommand>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            command_tx,
            persistence_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Melee swing against the active mob with the caller's raw damage roll.
    pub async fn attack(&self, raw_damage: f64) -> Result<DamageResolution> {
        self.request(|reply| Command::Attack { raw_damage, reply })
            .await
    }

    /// Spell against the active mob.
    pub async fn cast(&self, raw_damage: f64, school: DamageSchool) -> Result<DamageResolution> {
        self.request(|reply| Command::Cast {
            raw_damage,
            school,
            reply,
        })
        .await
    }

    /// Let the active mob swing at the player.
    pub async fn mob_swing(&self) -> Result<MobAttackOutcome> {
        self.request(|reply| Command::MobSwing { reply }).await
    }

    /// Let the active mob cast at the player.
    pub async fn mob_cast(&self, raw_damage: f64, school: DamageSchool) -> Result<DamageResolution> {
        self.request(|reply| Command::MobCast {
            raw_damage,
            school,
            reply,
        })
        .await
    }

    /// Apply an effect; a same-named effect on the target is replaced.
    pub async fn apply_effect(&self, target: Target, spec: EffectSpec) -> Result<EffectId> {
        self.request(|reply| Command::ApplyEffect {
            target,
            spec,
            reply,
        })
        .await
    }

    /// Remove an effect by id. Returns whether it was present.
    pub async fn remove_effect(&self, target: Target, id: EffectId) -> Result<bool> {
        self.request(|reply| Command::RemoveEffect { target, id, reply })
            .await
    }

    pub async fn clear_effects(&self, target: Target) -> Result<()> {
        self.request(|reply| Command::ClearEffects { target, reply })
            .await
    }

    pub async fn flee(&self) -> Result<FleeOutcome> {
        self.request(|reply| Command::Flee { reply }).await
    }

    /// Move to a connected camp (or through a zone line).
    pub async fn travel(&self, camp_id: impl Into<String>) -> Result<TravelOutcome> {
        let camp_id = camp_id.into();
        self.request(|reply| Command::Travel { camp_id, reply })
            .await
    }

    /// Query the current session (read-only snapshot)
    pub async fn query_state(&self) -> Result<SessionSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Write any deferred character changes now.
    pub async fn flush_saves(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.persistence_tx
            .send(PersistenceCommand::Flush { reply: reply_tx })
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx
            .await
            .map_err(RuntimeError::ReplyChannelClosed)?
            .map_err(RuntimeError::from)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Log` - combat log lines
    /// - `Topic::Combat` - damage, effects and vitals
    /// - `Topic::Encounter` - spawns, kills, respawns, flee and travel
    /// - `Topic::Progression` - level-ups, deaths and return to character select
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut log_rx = handle.subscribe(Topic::Log);
    /// while let Ok(event) = log_rx.recv().await {
    ///     // Print combat log lines
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
