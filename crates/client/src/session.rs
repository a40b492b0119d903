//! Session bootstrap: content, character store and runtime.
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use combat_content::ContentFactory;
use combat_core::{Character, ContentOracle, GameMode};
use runtime::{CharacterRepository, FileCharacterRepository, OracleManager, Runtime};

use crate::config::ClientConfig;

/// Load content, resolve the character and start the runtime.
pub async fn start_session(config: &ClientConfig) -> Result<Runtime> {
    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    tracing::info!("loading content from {}", factory.data_dir().display());
    let oracles = OracleManager::load(&factory).context("failed to load content")?;

    let repository: Arc<dyn CharacterRepository> = match &config.save_dir {
        Some(dir) => Arc::new(FileCharacterRepository::new(dir)?),
        None => Arc::new(FileCharacterRepository::in_default_location()?),
    };

    let character = load_or_create(repository.as_ref(), oracles.content(), config)?;
    if character.is_dead() {
        bail!(
            "{} has perished and cannot enter the world again",
            character.name
        );
    }

    let mut builder = Runtime::builder()
        .oracles(oracles)
        .character(character)
        .repository(repository);
    if let Some(seed) = config.seed {
        builder = builder.rng_seed(seed);
    }
    Ok(builder.build().await?)
}

/// Load the configured character, or create a level 1 one.
pub fn load_or_create(
    repository: &dyn CharacterRepository,
    content: &dyn ContentOracle,
    config: &ClientConfig,
) -> Result<Character> {
    if let Some(existing) = repository.load(&config.character_name)? {
        tracing::info!(
            name = %existing.name,
            level = existing.level,
            zone = %existing.zone_id,
            "loaded character"
        );
        return Ok(existing);
    }

    let class = content
        .class(&config.class_id)
        .with_context(|| format!("unknown class '{}'", config.class_id))?;
    content.require_zone(&config.start_zone)?;

    let mode = if config.hardcore {
        GameMode::Hardcore
    } else {
        GameMode::Normal
    };
    tracing::info!(
        name = %config.character_name,
        class = %config.class_id,
        ?mode,
        "creating character"
    );
    Ok(Character::new(
        config.character_name.clone(),
        config.class_id.clone(),
        class,
        config.start_zone.clone(),
    )
    .with_mode(mode))
}
