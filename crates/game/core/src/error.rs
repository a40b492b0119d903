//! Common error infrastructure for combat-core.
//!
//! Three failure classes exist:
//!
//! - **Configuration** ([`ConfigError`]): static data is missing or invalid.
//!   Raised before any state is mutated and surfaced to the player as an
//!   actionable message.
//! - **Contract** ([`ContractError`]): a caller passed a non-finite number.
//!   These are programming errors.
//! - **Rejected commands** ([`CombatError`] variants such as `NoActiveMob`):
//!   the request is valid but does not apply to the current state.
//!
//! Expected outcomes (resisted hits, dodges, failed flees, empty loot) are
//! plain return values, never errors.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative command.
    Recoverable,
    /// Invalid request for the current state; do not retry unchanged.
    Validation,
    /// Programming error; indicates a bug in the caller.
    Internal,
    /// Static data is unusable; the operation cannot proceed.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or corrupt data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Static data is missing or invalid.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("mob template '{template}' is missing required field '{field}'")]
    MissingField {
        template: String,
        field: &'static str,
    },

    #[error("mob template '{template}' has invalid {field} ({value})")]
    InvalidField {
        template: String,
        field: &'static str,
        value: f64,
    },

    #[error("camp '{camp}' lists template '{template}' with invalid weight {weight}")]
    InvalidWeight {
        camp: String,
        template: String,
        weight: f64,
    },

    #[error("camp '{camp}' has no spawn candidates")]
    EmptyPool { camp: String },

    #[error("camp '{camp}' is misconfigured: missing a positive spawn time")]
    MissingSpawnTime { camp: String },

    #[error("character has no bind zone; cannot respawn")]
    MissingBindZone,

    #[error("unknown {kind} '{id}'")]
    UnknownReference { kind: &'static str, id: String },
}

impl ConfigError {
    pub fn unknown(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownReference {
            kind,
            id: id.into(),
        }
    }
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "CONFIG_MISSING_FIELD",
            Self::InvalidField { .. } => "CONFIG_INVALID_FIELD",
            Self::InvalidWeight { .. } => "CONFIG_INVALID_WEIGHT",
            Self::EmptyPool { .. } => "CONFIG_EMPTY_POOL",
            Self::MissingSpawnTime { .. } => "CONFIG_MISSING_SPAWN_TIME",
            Self::MissingBindZone => "CONFIG_MISSING_BIND_ZONE",
            Self::UnknownReference { .. } => "CONFIG_UNKNOWN_REFERENCE",
        }
    }
}

/// A caller broke a numeric contract.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ContractError {
    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl ContractError {
    /// Pass `value` through if finite.
    pub fn finite(what: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { what, value })
        }
    }
}

impl GameError for ContractError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonFinite { .. } => "CONTRACT_NON_FINITE",
        }
    }
}

/// Top-level error returned by combat operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("no mob is engaged")]
    NoActiveMob,

    #[error("camp '{to}' is not reachable from '{from}'")]
    CampNotConnected { from: String, to: String },

    #[error("camp '{camp}' requires content '{flag}'")]
    CampLocked { camp: String, flag: String },

    #[error("character is dead")]
    CharacterDead,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(err) => err.severity(),
            Self::Contract(err) => err.severity(),
            Self::NoActiveMob
            | Self::CampNotConnected { .. }
            | Self::CampLocked { .. }
            | Self::CharacterDead => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(err) => err.error_code(),
            Self::Contract(err) => err.error_code(),
            Self::NoActiveMob => "COMBAT_NO_ACTIVE_MOB",
            Self::CampNotConnected { .. } => "COMBAT_CAMP_NOT_CONNECTED",
            Self::CampLocked { .. } => "COMBAT_CAMP_LOCKED",
            Self::CharacterDead => "COMBAT_CHARACTER_DEAD",
        }
    }
}

pub type CombatResult<T> = Result<T, CombatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_follow_failure_class() {
        let config: CombatError = ConfigError::MissingBindZone.into();
        let contract: CombatError = ContractError::NonFinite {
            what: "raw damage",
            value: f64::NAN,
        }
        .into();

        assert_eq!(config.severity(), ErrorSeverity::Fatal);
        assert_eq!(contract.severity(), ErrorSeverity::Internal);
        assert_eq!(CombatError::NoActiveMob.severity(), ErrorSeverity::Validation);
        assert_eq!(config.error_code(), "CONFIG_MISSING_BIND_ZONE");
    }

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert!(ContractError::finite("x", 1.5).is_ok());
        assert!(ContractError::finite("x", f64::INFINITY).is_err());
        assert!(ContractError::finite("x", f64::NAN).is_err());
    }

    #[test]
    fn missing_spawn_time_message_is_actionable() {
        let err = ConfigError::MissingSpawnTime {
            camp: "Rat Cellar".into(),
        };
        assert!(err.to_string().contains("misconfigured"));
    }
}
