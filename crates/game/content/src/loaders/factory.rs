//! Content factory for building a content bundle from data files.

use std::path::{Path, PathBuf};

use combat_core::{
    CampDefinition, ClassDefinition, CombatConfig, ItemDefinition, LootTable, MobTemplate,
    ZoneDefinition,
};

use crate::bundle::ContentBundle;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── mobs.ron
/// ├── camps.ron
/// ├── zones.ron
/// ├── loot.ron
/// ├── items.ron
/// └── classes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tunables from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::info!(
                target: "content::loader",
                path = %path.display(),
                "no config file, using defaults"
            );
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load every catalog and check cross-references.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            mobs: CatalogLoader::load::<MobTemplate>(&self.data_dir.join("mobs.ron"), "mob")?,
            camps: CatalogLoader::load::<CampDefinition>(&self.data_dir.join("camps.ron"), "camp")?,
            zones: CatalogLoader::load::<ZoneDefinition>(&self.data_dir.join("zones.ron"), "zone")?,
            loot: CatalogLoader::load::<LootTable>(&self.data_dir.join("loot.ron"), "loot")?,
            items: CatalogLoader::load::<ItemDefinition>(&self.data_dir.join("items.ron"), "item")?,
            classes: CatalogLoader::load::<ClassDefinition>(
                &self.data_dir.join("classes.ron"),
                "class",
            )?,
        };
        bundle
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid content in {}: {}", self.data_dir.display(), e))?;

        tracing::info!(
            target: "content::loader",
            mobs = bundle.mobs.len(),
            camps = bundle.camps.len(),
            zones = bundle.zones.len(),
            "content loaded"
        );
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The sample data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }
}
