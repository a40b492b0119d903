//! Event payloads for each topic.

use serde::{Deserialize, Serialize};

use combat_core::{
    ConColor, DamageResolution, EffectId, MobKey, MobRole, Target, VitalSnapshot,
};

/// Why an effect left its combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectEndReason {
    Expired,
    BrokeFree,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatFeed {
    Damage {
        target: Target,
        resisted: bool,
        final_damage: u32,
        absorbed: u32,
        reflected: u32,
        new_hp: Option<u32>,
    },
    Dodged,
    EffectApplied {
        target: Target,
        id: EffectId,
        name: String,
    },
    EffectEnded {
        target: Target,
        name: String,
        reason: EffectEndReason,
    },
    EffectsCleared {
        target: Target,
    },
    Vitals {
        player: VitalSnapshot,
        mob: Option<VitalSnapshot>,
    },
}

impl CombatFeed {
    pub fn damage(resolution: &DamageResolution) -> Self {
        Self::Damage {
            target: resolution.target,
            resisted: resolution.resisted,
            final_damage: resolution.final_damage,
            absorbed: resolution.absorbed,
            reflected: resolution.reflected,
            new_hp: resolution.new_hp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncounterEvent {
    Spawned {
        key: MobKey,
        name: String,
        level: u32,
        con: ConColor,
    },
    /// A merchant or banker appeared. It never becomes the active mob.
    Interaction {
        name: String,
        role: MobRole,
    },
    Killed {
        key: MobKey,
        name: String,
        xp: u64,
        loot: Vec<(String, u32)>,
    },
    RespawnScheduled {
        camp_id: String,
        delay_ms: u64,
    },
    Fled,
    FleeFailed,
    Travelled {
        zone_id: String,
        camp_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    LevelUp {
        level: u32,
        levels_gained: u32,
    },
    Respawned {
        xp_lost: u64,
        zone_id: String,
        camp_id: String,
    },
    Permadeath {
        killed_at: i64,
    },
    ReturnToCharacterSelect,
}
