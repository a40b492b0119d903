//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the live combat state and serializes every
//! mutation; the persistence worker writes character changes in the
//! background.

mod collaborators;
mod persistence;
mod session;

pub use collaborators::{BusLog, SaveQueue, SessionInventory, SessionRng};
pub use persistence::{PersistenceCommand, PersistenceWorker};
pub use session::{Command, SessionWorker};
