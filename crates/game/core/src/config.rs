//! Combat tunables.
//!
//! Every field has a default so a partial TOML file (or none at all) yields a
//! working configuration.

/// Flee probability model parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FleeConfig {
    /// Base success chance while engaged.
    pub engaged_base: f64,
    /// Chance gained per point of speed advantage over the mob.
    pub speed_factor: f64,
    /// Bound on the speed adjustment, applied symmetrically.
    pub max_speed_adjust: f64,
    pub min_chance: f64,
    pub max_chance: f64,
}

impl Default for FleeConfig {
    fn default() -> Self {
        Self {
            engaged_base: 0.5,
            speed_factor: 0.25,
            max_speed_adjust: 0.25,
            min_chance: 0.05,
            max_chance: 0.95,
        }
    }
}

/// Dodge probability model parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DodgeConfig {
    pub base: f64,
    pub per_agility: f64,
    pub max: f64,
}

impl Default for DodgeConfig {
    fn default() -> Self {
        Self {
            base: 0.0,
            per_agility: 0.0005,
            max: 0.25,
        }
    }
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatConfig {
    /// XP needed per level: the threshold at level `n` is `xp_base * n`.
    pub xp_base: u64,
    /// Global XP multiplier.
    pub xp_rate: f64,
    /// Bound on the level-difference resist adjustment.
    pub level_adjust_cap: i32,
    /// Armor class points per point of flat melee mitigation.
    pub ac_divisor: u32,
    /// Scheduler poll interval.
    pub effect_tick_ms: u64,
    /// Per-effect tick interval when the effect does not carry its own.
    pub default_effect_interval_ms: u64,
    pub kill_dedupe_window_ms: u64,
    pub hardcore_return_delay_ms: u64,
    pub root_break_base: f64,
    pub root_break_cha_divisor: f64,
    pub flee: FleeConfig,
    pub dodge: DodgeConfig,
    /// Content flags that unlock gated camps.
    pub enabled_content: Vec<String>,
}

impl CombatConfig {
    /// Level at which the death penalty reaches a full level's worth of XP.
    pub const DEATH_PENALTY_FULL_LEVEL: u32 = 100;

    pub const DEFAULT_XP_BASE: u64 = 100;
    pub const DEFAULT_LEVEL_ADJUST_CAP: i32 = 10;
    pub const DEFAULT_AC_DIVISOR: u32 = 10;
    pub const DEFAULT_EFFECT_TICK_MS: u64 = 3_000;
    pub const DEFAULT_EFFECT_INTERVAL_MS: u64 = 2_000;
    pub const DEFAULT_KILL_DEDUPE_WINDOW_MS: u64 = 1_000;
    pub const DEFAULT_HARDCORE_RETURN_DELAY_MS: u64 = 2_000;

    pub fn new() -> Self {
        Self {
            xp_base: Self::DEFAULT_XP_BASE,
            xp_rate: 1.0,
            level_adjust_cap: Self::DEFAULT_LEVEL_ADJUST_CAP,
            ac_divisor: Self::DEFAULT_AC_DIVISOR,
            effect_tick_ms: Self::DEFAULT_EFFECT_TICK_MS,
            default_effect_interval_ms: Self::DEFAULT_EFFECT_INTERVAL_MS,
            kill_dedupe_window_ms: Self::DEFAULT_KILL_DEDUPE_WINDOW_MS,
            hardcore_return_delay_ms: Self::DEFAULT_HARDCORE_RETURN_DELAY_MS,
            root_break_base: 0.15,
            root_break_cha_divisor: 1_000.0,
            flee: FleeConfig::default(),
            dodge: DodgeConfig::default(),
            enabled_content: Vec::new(),
        }
    }

    pub fn with_enabled_content<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_content = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_content_enabled(&self, flag: &str) -> bool {
        self.enabled_content.iter().any(|enabled| enabled == flag)
    }

    /// XP required to advance from `level`.
    pub fn xp_threshold(&self, level: u32) -> u64 {
        self.xp_base.saturating_mul(u64::from(level))
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
