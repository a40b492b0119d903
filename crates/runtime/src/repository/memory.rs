//! In-memory [`CharacterRepository`] for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::Character;

use super::error::{RepositoryError, Result};
use super::traits::CharacterRepository;

#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<String, Character>>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(character: Character) -> Self {
        let mut characters = HashMap::new();
        characters.insert(character.name.clone(), character);
        Self {
            characters: RwLock::new(characters),
        }
    }
}

impl CharacterRepository for InMemoryCharacterRepo {
    fn save(&self, character: &Character) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(character.name.clone(), character.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<Character>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(name).cloned())
    }

    fn exists(&self, name: &str) -> bool {
        self.characters
            .read()
            .map(|characters| characters.contains_key(name))
            .unwrap_or(false)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.remove(name);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut names: Vec<String> = characters.keys().cloned().collect();
        names.sort_unstable();
        Ok(names)
    }
}
