//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a combat session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use combat_core::{Character, CombatError, CombatState, ContentOracle, EncounterContext};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::repository::{CharacterRepository, InMemoryCharacterRepo};
use crate::workers::{Command, PersistenceWorker, SaveQueue, SessionRng, SessionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Fixed RNG seed for reproducible sessions; entropy when `None`.
    pub rng_seed: Option<u64>,
    /// How often deferred character changes are written.
    pub save_flush_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            rng_seed: None,
            save_flush_interval: Duration::from_secs(5),
        }
    }
}

/// Main runtime that hosts one combat session.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    session_worker_handle: JoinHandle<()>,
    persistence_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully.
    ///
    /// Waits for the session to stop (every handle clone must be dropped)
    /// and for pending saves to be written.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.session_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.persistence_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    character: Option<Character>,
    repository: Option<Arc<dyn CharacterRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            character: None,
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Set the character to play (required)
    pub fn character(mut self, character: Character) -> Self {
        self.character = Some(character);
        self
    }

    /// Set the character store. Defaults to an in-memory repository.
    pub fn repository(mut self, repository: Arc<dyn CharacterRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    /// Build the runtime and start its workers.
    ///
    /// The session resumes at the character's saved camp when it still
    /// exists, otherwise at the entry camp of the character's zone.
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let mut character = self.character.ok_or(RuntimeError::MissingCharacter)?;
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryCharacterRepo::new()));

        let content = oracles.content();
        if content.class(&character.class_id).is_none() {
            return Err(RuntimeError::UnknownClass(character.class_id));
        }
        let camp_id = match character.camp_id.as_deref() {
            Some(camp_id) if content.camp(camp_id).is_some() => camp_id.to_string(),
            _ => content
                .require_zone(&character.zone_id)
                .map_err(CombatError::from)?
                .entry_camp
                .clone(),
        };
        character.camp_id = Some(camp_id.clone());
        repository.save(&character)?;

        let encounter = EncounterContext::new(character.zone_id.clone(), camp_id);
        let state = CombatState::new(character.clone(), encounter);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (persistence_tx, persistence_rx) = mpsc::unbounded_channel();
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, persistence_tx.clone(), event_bus.clone());

        let persistence_worker = PersistenceWorker::new(
            character,
            repository,
            persistence_rx,
            self.config.save_flush_interval,
        );
        let persistence_worker_handle = tokio::spawn(async move {
            persistence_worker.run().await;
        });

        let rng = match self.config.rng_seed {
            Some(seed) => SessionRng::seeded(seed),
            None => SessionRng::from_entropy(),
        };
        let session_worker = SessionWorker::new(
            state,
            oracles,
            command_rx,
            event_bus,
            SaveQueue::new(persistence_tx),
            rng,
        );
        let session_worker_handle = tokio::spawn(async move {
            session_worker.run().await;
        });

        Ok(Runtime {
            handle,
            session_worker_handle,
            persistence_worker_handle,
        })
    }
}
