//! Runtime orchestration for a camp combat session.
//!
//! This crate wires the pure rules in `combat-core` to tokio: a session actor
//! owns the live combat state and serializes every mutation, a persistence
//! worker writes character changes in the background, and an event bus fans
//! out combat log lines and outcomes. Consumers embed [`Runtime`] and interact
//! with the session through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{MobView, Result, RuntimeError, RuntimeHandle, SessionSnapshot};
pub use events::{
    CombatFeed, EffectEndReason, EncounterEvent, Event, EventBus, ProgressionEvent, Topic,
};
pub use oracle::OracleManager;
pub use repository::{
    CharacterRepository, FileCharacterRepository, InMemoryCharacterRepo, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
