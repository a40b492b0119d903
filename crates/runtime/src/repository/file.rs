//! File-based [`CharacterRepository`].

use std::fs;
use std::path::{Path, PathBuf};

use combat_core::Character;

use super::error::{RepositoryError, Result};
use super::traits::CharacterRepository;

/// Stores each character as `{name}.bin` in bincode format.
///
/// Writes go to a temporary file first and are moved into place with an
/// atomic rename.
pub struct FileCharacterRepository {
    base_dir: PathBuf,
}

impl FileCharacterRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    /// Repository under the platform data directory (`.../characters`).
    pub fn in_default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "camp-combat")
            .ok_or(RepositoryError::NoDataDir)?;
        Self::new(dirs.data_dir().join("characters"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn character_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::InvalidName(name.to_string()));
        }
        Ok(self.base_dir.join(format!("{}.bin", name)))
    }
}

impl CharacterRepository for FileCharacterRepository {
    fn save(&self, character: &Character) -> Result<()> {
        let path = self.character_path(&character.name)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(character)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            target: "runtime::persistence",
            character = %character.name,
            path = %path.display(),
            "saved character"
        );
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<Character>> {
        let path = self.character_path(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let character: Character = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(Some(character))
    }

    fn exists(&self, name: &str) -> bool {
        self.character_path(name)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.character_path(name)?;
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)? {
            let path = entry.map_err(RepositoryError::Io)?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(name) = filename.strip_suffix(".bin")
            {
                names.push(name.to_string());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}
