//! Repository layer for character records.
//!
//! Repositories hold data that changes during play. Static content (mobs,
//! camps, loot) comes from the oracles instead.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileCharacterRepository;
pub use memory::InMemoryCharacterRepo;
pub use traits::CharacterRepository;
