//! Timed effects on the player and the active mob.
//!
//! Each combatant owns an [`EffectSet`]. Names are unique within a set: adding
//! an effect whose name is already present replaces the old one. Periodic
//! work is driven by [`scheduler::advance`].
pub mod scheduler;

use crate::state::{Target, Timestamp};
use crate::stats::{Resource, StatMods};

pub use scheduler::{TickReport, advance};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u64);

/// What an effect does. At most one periodic action per effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Damage over time. With `siphon`, the opposing combatant heals by the
    /// amount dealt.
    PeriodicDamage { amount: u32, siphon: bool },
    PeriodicHeal { amount: u32 },
    /// Signed change to a pool per tick. Negative drains.
    ResourceTick {
        resource: Resource,
        amount: i32,
        siphon: bool,
    },
    /// Rooted until it expires or the target breaks free.
    Root { caster_cha: i32 },
    /// Absorbs incoming hit damage until depleted.
    Rune { remaining: u32 },
    /// Reflects this much damage onto melee attackers.
    DamageShield { amount: u32 },
    /// Carries only stat modifiers.
    StatMod,
}

impl EffectKind {
    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            Self::PeriodicDamage { .. } | Self::PeriodicHeal { .. } | Self::ResourceTick { .. }
        )
    }
}

/// Registration request for a new effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub name: String,
    pub kind: EffectKind,
    pub duration_ms: u64,
    /// Falls back to the configured default when absent.
    pub tick_interval_ms: Option<u64>,
    pub stat_mods: StatMods,
    /// Logged when the effect runs out.
    pub on_expire: Option<String>,
}

impl EffectSpec {
    pub fn new(name: impl Into<String>, kind: EffectKind, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            kind,
            duration_ms,
            tick_interval_ms: None,
            stat_mods: StatMods::new(),
            on_expire: None,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = Some(interval_ms);
        self
    }

    #[must_use]
    pub fn with_mods(mut self, stat_mods: StatMods) -> Self {
        self.stat_mods = stat_mods;
        self
    }

    #[must_use]
    pub fn with_expire_message(mut self, message: impl Into<String>) -> Self {
        self.on_expire = Some(message.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub id: EffectId,
    pub name: String,
    pub kind: EffectKind,
    pub expires_at: Timestamp,
    pub tick_interval_ms: u64,
    pub last_tick: Timestamp,
    pub stat_mods: StatMods,
    pub on_expire: Option<String>,
}

impl Effect {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.last_tick.plus_millis(self.tick_interval_ms) <= now
    }
}

/// Active effects on one combatant, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectSet {
    effects: Vec<Effect>,
}

impl EffectSet {
    /// Insert `effect`, returning the same-named effect it replaced.
    pub fn add(&mut self, effect: Effect) -> Option<Effect> {
        let replaced = self
            .effects
            .iter()
            .position(|existing| existing.name == effect.name)
            .map(|index| self.effects.remove(index));
        self.effects.push(effect);
        replaced
    }

    pub fn remove(&mut self, id: EffectId) -> Option<Effect> {
        let index = self.effects.iter().position(|effect| effect.id == id)?;
        Some(self.effects.remove(index))
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.iter().find(|effect| effect.id == id)
    }

    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut Effect> {
        self.effects.iter_mut().find(|effect| effect.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Effect> {
        self.effects.iter().find(|effect| effect.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn ids(&self) -> Vec<EffectId> {
        self.effects.iter().map(|effect| effect.id).collect()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Summed stat modifiers of every active effect.
    pub fn stat_modifiers(&self) -> StatMods {
        let mut total = StatMods::new();
        for effect in &self.effects {
            total.merge(&effect.stat_mods);
        }
        total
    }

    /// Total reflect damage of all damage shields.
    pub fn damage_shield(&self) -> u32 {
        self.effects
            .iter()
            .filter_map(|effect| match effect.kind {
                EffectKind::DamageShield { amount } => Some(amount),
                _ => None,
            })
            .fold(0u32, u32::saturating_add)
    }

    pub fn is_rooted(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect.kind, EffectKind::Root { .. }))
    }

    /// Absorb up to `amount` with runes, oldest first. Depleted runes drop.
    ///
    /// Returns the amount absorbed.
    pub fn consume_rune(&mut self, amount: u32) -> u32 {
        let mut left = amount;
        for effect in &mut self.effects {
            if left == 0 {
                break;
            }
            if let EffectKind::Rune { remaining } = &mut effect.kind {
                let taken = (*remaining).min(left);
                *remaining -= taken;
                left -= taken;
            }
        }
        self.effects
            .retain(|effect| !matches!(effect.kind, EffectKind::Rune { remaining: 0 }));
        amount - left
    }
}

/// Effect sets for both combatants plus the id allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectBook {
    player: EffectSet,
    mob: EffectSet,
    next_id: u64,
}

impl Default for EffectBook {
    fn default() -> Self {
        Self {
            player: EffectSet::default(),
            mob: EffectSet::default(),
            next_id: 1,
        }
    }
}

impl EffectBook {
    /// Register `spec` on `target` at `now`, replacing any same-named effect.
    pub fn add(
        &mut self,
        target: Target,
        spec: EffectSpec,
        now: Timestamp,
        default_interval_ms: u64,
    ) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        let effect = Effect {
            id,
            name: spec.name,
            kind: spec.kind,
            expires_at: now.plus_millis(spec.duration_ms),
            tick_interval_ms: spec.tick_interval_ms.unwrap_or(default_interval_ms),
            last_tick: now,
            stat_mods: spec.stat_mods,
            on_expire: spec.on_expire,
        };
        self.set_mut(target).add(effect);
        id
    }

    pub fn remove(&mut self, target: Target, id: EffectId) -> Option<Effect> {
        self.set_mut(target).remove(id)
    }

    pub fn clear(&mut self, target: Target) {
        self.set_mut(target).clear();
    }

    pub fn set(&self, target: Target) -> &EffectSet {
        match target {
            Target::Player => &self.player,
            Target::Mob => &self.mob,
        }
    }

    pub fn set_mut(&mut self, target: Target) -> &mut EffectSet {
        match target {
            Target::Player => &mut self.player,
            Target::Mob => &mut self.mob,
        }
    }

    pub fn stat_modifiers(&self, target: Target) -> StatMods {
        self.set(target).stat_modifiers()
    }
}
