//! Persistence worker.
//!
//! Owns the stored copy of the session's character. Save requests from the
//! session are merged into it as they arrive; immediate saves are written
//! through the repository at once, deferred saves on the next flush tick or
//! at shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use combat_core::{Character, CharacterPatch, SaveOptions};

use crate::repository::{CharacterRepository, Result};

/// Commands accepted by the persistence worker.
pub enum PersistenceCommand {
    Save {
        patch: CharacterPatch,
        opts: SaveOptions,
    },
    /// Write any pending deferred changes and report the outcome.
    Flush { reply: oneshot::Sender<Result<()>> },
}

pub struct PersistenceWorker {
    character: Character,
    repository: Arc<dyn CharacterRepository>,
    command_rx: mpsc::UnboundedReceiver<PersistenceCommand>,
    flush_interval: Duration,
    dirty: bool,
}

impl PersistenceWorker {
    pub fn new(
        character: Character,
        repository: Arc<dyn CharacterRepository>,
        command_rx: mpsc::UnboundedReceiver<PersistenceCommand>,
        flush_interval: Duration,
    ) -> Self {
        Self {
            character,
            repository,
            command_rx,
            flush_interval,
            dirty: false,
        }
    }

    /// Main worker loop. Exits once every sender is dropped.
    pub async fn run(mut self) {
        let mut flush = tokio::time::interval(self.flush_interval);
        flush.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        flush.tick().await;

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = flush.tick(), if self.dirty => {
                    if let Err(err) = self.write() {
                        error!(target: "runtime::persistence", error = %err, "deferred save failed");
                    }
                }
            }
        }

        if self.dirty
            && let Err(err) = self.write()
        {
            error!(target: "runtime::persistence", error = %err, "final save failed");
        }
        info!(target: "runtime::persistence", character = %self.character.name, "persistence worker stopped");
    }

    fn handle_command(&mut self, cmd: PersistenceCommand) {
        match cmd {
            PersistenceCommand::Save { patch, opts } => {
                if patch.is_empty() {
                    return;
                }
                patch.apply_to(&mut self.character);
                self.dirty = true;
                debug!(
                    target: "runtime::persistence",
                    immediate = opts.immediate,
                    "save requested"
                );
                if opts.immediate
                    && let Err(err) = self.write()
                {
                    error!(target: "runtime::persistence", error = %err, "immediate save failed");
                }
            }
            PersistenceCommand::Flush { reply } => {
                let result = if self.dirty { self.write() } else { Ok(()) };
                let _ = reply.send(result);
            }
        }
    }

    fn write(&mut self) -> Result<()> {
        self.repository.save(&self.character)?;
        self.dirty = false;
        Ok(())
    }
}
