//! Static content and tunables shared with the session worker.
//!
//! Content is immutable at runtime; dynamic state lives in the session's
//! [`combat_core::CombatState`] and in the character repository.

use std::sync::Arc;

use combat_content::{ContentBundle, ContentFactory};
use combat_core::{CombatConfig, ContentOracle};

use crate::api::{Result, RuntimeError};

/// Bundles the content oracle with the combat configuration.
#[derive(Clone)]
pub struct OracleManager {
    content: Arc<dyn ContentOracle>,
    config: Arc<CombatConfig>,
}

impl OracleManager {
    pub fn new(content: Arc<dyn ContentOracle>, config: CombatConfig) -> Self {
        Self {
            content,
            config: Arc::new(config),
        }
    }

    pub fn from_bundle(bundle: ContentBundle, config: CombatConfig) -> Self {
        Self::new(Arc::new(bundle), config)
    }

    /// Load content and config from a data directory.
    pub fn load(factory: &ContentFactory) -> Result<Self> {
        let bundle = factory
            .load_bundle()
            .map_err(|e| RuntimeError::ContentLoad(format!("{e:#}")))?;
        let config = factory
            .load_config()
            .map_err(|e| RuntimeError::ContentLoad(format!("{e:#}")))?;
        Ok(Self::from_bundle(bundle, config))
    }

    pub fn content(&self) -> &dyn ContentOracle {
        self.content.as_ref()
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }
}
