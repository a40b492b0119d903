//! Flee and dodge probabilities.

use crate::config::{DodgeConfig, FleeConfig};
use crate::error::ContractError;

/// Probability that a flee attempt succeeds.
///
/// Unengaged mobs can always be left behind. Otherwise the chance starts at
/// `engaged_base`, moves with the speed difference (bounded by
/// `max_speed_adjust`) and is clamped to `[min_chance, max_chance]`.
pub fn flee_chance(
    engaged: bool,
    player_speed: f64,
    mob_speed: f64,
    config: &FleeConfig,
) -> Result<f64, ContractError> {
    let player_speed = ContractError::finite("player movespeed", player_speed)?;
    let mob_speed = ContractError::finite("mob movespeed", mob_speed)?;
    if !engaged {
        return Ok(1.0);
    }

    let bound = config.max_speed_adjust.abs();
    let adjust = ((player_speed - mob_speed) * config.speed_factor).clamp(-bound, bound);
    let (lo, hi) = if config.min_chance <= config.max_chance {
        (config.min_chance, config.max_chance)
    } else {
        (config.max_chance, config.min_chance)
    };
    Ok((config.engaged_base + adjust).clamp(lo, hi))
}

/// Probability that the player avoids a melee swing.
pub fn dodge_chance(agility: f64, config: &DodgeConfig) -> Result<f64, ContractError> {
    let agility = ContractError::finite("agility", agility)?;
    let raw = config.base + agility * config.per_agility;
    Ok(raw.clamp(0.0, config.max.max(0.0)))
}
