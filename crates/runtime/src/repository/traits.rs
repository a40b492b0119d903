//! Repository contract for saving and loading characters.

use combat_core::Character;

use super::error::Result;

/// Repository for persistent character records.
///
/// Characters are keyed by name. Implementations must make `save` atomic: a
/// crash mid-write leaves the previous record readable.
pub trait CharacterRepository: Send + Sync {
    fn save(&self, character: &Character) -> Result<()>;

    fn load(&self, name: &str) -> Result<Option<Character>>;

    fn exists(&self, name: &str) -> bool;

    fn delete(&self, name: &str) -> Result<()>;

    /// Names of every stored character, sorted.
    fn list(&self) -> Result<Vec<String>>;
}
