//! Resource pools (HP, mana, endurance).
//!
//! Pools are split the same way the rest of the stat system is:
//! - Maximum values: derived from character/mob base values plus effect
//!   modifiers (NOT owned by the pool, pushed in through [`ResourcePool::set_max`])
//! - Current values: combat state, always clamped to `[0, max]`
//!
//! Every mutation goes through a clamped setter. Callers that need to derive a
//! new value from the current one use [`ResourcePool::update`] so the value is
//! re-read at the moment of mutation instead of being written back from a
//! stale copy.

use strum::{Display, EnumIter};

/// Enum representing individual resource types.
///
/// Used by effects (resource ticks, siphons) and by save patches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    /// Health points.
    Hp,
    /// Mana points.
    Mana,
    /// Endurance (stamina) points.
    Endurance,
}

/// A single bounded resource value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    current: u32,
    max: u32,
}

impl ResourcePool {
    /// Create a pool, clamping `current` into `[0, max]`.
    pub const fn new(current: u32, max: u32) -> Self {
        let current = if current > max { max } else { current };
        Self { current, max }
    }

    /// Create a pool at its maximum.
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Create an exhausted pool (used for non-combat spawns).
    pub const fn empty() -> Self {
        Self { current: 0, max: 0 }
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Set the current value, clamped. Returns the stored value.
    pub fn set(&mut self, value: u32) -> u32 {
        self.current = value.min(self.max);
        self.current
    }

    /// Functional update: `current -> new`, clamped. Returns the stored value.
    pub fn update(&mut self, f: impl FnOnce(u32) -> u32) -> u32 {
        let next = f(self.current);
        self.set(next)
    }

    /// Remove up to `amount`. Returns how much was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let before = self.current;
        let after = self.update(|current| current.saturating_sub(amount));
        before - after
    }

    /// Remove up to `amount` but never below `floor`.
    ///
    /// A pool already at or below `floor` is left untouched.
    pub fn drain_to_floor(&mut self, amount: u32, floor: u32) -> u32 {
        let before = self.current;
        if before <= floor {
            return 0;
        }
        let after = self.update(|current| current.saturating_sub(amount).max(floor));
        before - after
    }

    /// Add up to `amount`, bounded by max. Returns how much was actually added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let before = self.current;
        let after = self.update(|current| current.saturating_add(amount));
        after - before
    }

    /// Restore to the maximum value.
    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Replace the maximum and re-clamp the current value.
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.current = self.current.min(max);
    }
}

/// Maximum resource values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VitalMaxima {
    pub hp: u32,
    pub mana: u32,
    pub endurance: u32,
}

impl VitalMaxima {
    pub const fn new(hp: u32, mana: u32, endurance: u32) -> Self {
        Self { hp, mana, endurance }
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Hp => self.hp,
            Resource::Mana => self.mana,
            Resource::Endurance => self.endurance,
        }
    }

    /// Component-wise sum (used for per-level growth).
    pub fn saturating_add(&self, other: &Self) -> Self {
        Self {
            hp: self.hp.saturating_add(other.hp),
            mana: self.mana.saturating_add(other.mana),
            endurance: self.endurance.saturating_add(other.endurance),
        }
    }
}

/// Current HP/mana/endurance of one combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub hp: ResourcePool,
    pub mana: ResourcePool,
    pub endurance: ResourcePool,
}

impl Vitals {
    /// All pools full.
    pub const fn at_max(max: &VitalMaxima) -> Self {
        Self {
            hp: ResourcePool::full(max.hp),
            mana: ResourcePool::full(max.mana),
            endurance: ResourcePool::full(max.endurance),
        }
    }

    /// All pools zeroed with zero maxima.
    pub const fn zeroed() -> Self {
        Self {
            hp: ResourcePool::empty(),
            mana: ResourcePool::empty(),
            endurance: ResourcePool::empty(),
        }
    }

    pub fn pool(&self, resource: Resource) -> &ResourcePool {
        match resource {
            Resource::Hp => &self.hp,
            Resource::Mana => &self.mana,
            Resource::Endurance => &self.endurance,
        }
    }

    pub fn pool_mut(&mut self, resource: Resource) -> &mut ResourcePool {
        match resource {
            Resource::Hp => &mut self.hp,
            Resource::Mana => &mut self.mana,
            Resource::Endurance => &mut self.endurance,
        }
    }

    pub fn maxima(&self) -> VitalMaxima {
        VitalMaxima::new(self.hp.max(), self.mana.max(), self.endurance.max())
    }

    /// Push new maxima, re-clamping every pool.
    pub fn set_maxima(&mut self, max: &VitalMaxima) {
        self.hp.set_max(max.hp);
        self.mana.set_max(max.mana);
        self.endurance.set_max(max.endurance);
    }

    pub fn refill(&mut self) {
        self.hp.refill();
        self.mana.refill();
        self.endurance.refill();
    }

    pub fn snapshot(&self) -> VitalSnapshot {
        VitalSnapshot {
            hp: self.hp.current(),
            mana: self.mana.current(),
            endurance: self.endurance.current(),
        }
    }
}

/// Plain current values, used in save patches and event payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VitalSnapshot {
    pub hp: u32,
    pub mana: u32,
    pub endurance: u32,
}
