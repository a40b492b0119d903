//! Live combat state owned by one session.
//!
//! [`CombatState`] is the single mutable cell of the rules. Callers pass it by
//! `&mut` into every operation; pools are changed only through their clamped
//! setters.
mod character;
mod mob;
mod time;

pub use character::{Character, CharacterPatch, GameMode};
pub use mob::{ActiveMob, MobInstance, MobKey, MobRole};
pub use time::Timestamp;

use crate::effects::EffectBook;
use crate::encounter::KillGuard;
use crate::stats::{StatMods, VitalMaxima, Vitals};

/// Which combatant an operation applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Player,
    Mob,
}

impl Target {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Player => Self::Mob,
            Self::Mob => Self::Player,
        }
    }
}

/// Where the player is fighting.
///
/// `epoch` increases on every camp or zone change so timers scheduled in an
/// older context can be recognized and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterContext {
    pub zone_id: String,
    pub camp_id: String,
    pub epoch: u64,
}

impl EncounterContext {
    pub fn new(zone_id: impl Into<String>, camp_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            camp_id: camp_id.into(),
            epoch: 0,
        }
    }

    /// Move to a new location and invalidate older timers.
    pub fn relocate(&mut self, zone_id: impl Into<String>, camp_id: impl Into<String>) {
        self.zone_id = zone_id.into();
        self.camp_id = camp_id.into();
        self.epoch += 1;
    }
}

#[derive(Clone, Debug)]
pub struct CombatState {
    pub character: Character,
    pub player: Vitals,
    pub mob: Option<ActiveMob>,
    pub effects: EffectBook,
    pub encounter: EncounterContext,
    pub kill_guard: KillGuard,
    next_mob_key: u64,
}

impl CombatState {
    /// Session state for `character` at `encounter`.
    ///
    /// Vitals resume from the character's last saved snapshot when present.
    pub fn new(character: Character, encounter: EncounterContext) -> Self {
        let maxima = character.effective_maxima(&StatMods::new());
        let mut player = Vitals::at_max(&maxima);
        if let Some(saved) = character.vitals {
            player.hp.set(saved.hp);
            player.mana.set(saved.mana);
            player.endurance.set(saved.endurance);
        }
        Self {
            character,
            player,
            mob: None,
            effects: EffectBook::default(),
            encounter,
            kill_guard: KillGuard::default(),
            next_mob_key: 1,
        }
    }

    pub fn allocate_mob_key(&mut self) -> MobKey {
        let key = MobKey(self.next_mob_key);
        self.next_mob_key += 1;
        key
    }

    pub fn player_mods(&self) -> StatMods {
        self.effects.stat_modifiers(Target::Player)
    }

    pub fn mob_mods(&self) -> StatMods {
        self.effects.stat_modifiers(Target::Mob)
    }

    pub fn player_maxima(&self) -> VitalMaxima {
        self.character.effective_maxima(&self.player_mods())
    }

    /// Re-derive both combatants' maxima from base values and active effects.
    pub fn refresh_maxima(&mut self) {
        let player_max = self.player_maxima();
        self.player.set_maxima(&player_max);

        let mob_mods = self.mob_mods();
        if let Some(mob) = self.mob.as_mut() {
            let mob_max = mob.instance.effective_maxima(&mob_mods);
            mob.vitals.set_maxima(&mob_max);
        }
    }

    pub fn vitals(&self, target: Target) -> Option<&Vitals> {
        match target {
            Target::Player => Some(&self.player),
            Target::Mob => self.mob.as_ref().map(|mob| &mob.vitals),
        }
    }

    pub fn vitals_mut(&mut self, target: Target) -> Option<&mut Vitals> {
        match target {
            Target::Player => Some(&mut self.player),
            Target::Mob => self.mob.as_mut().map(|mob| &mut mob.vitals),
        }
    }

    /// Display name of a combatant.
    pub fn name_of(&self, target: Target) -> &str {
        match target {
            Target::Player => &self.character.name,
            Target::Mob => self.mob.as_ref().map_or("something", |mob| mob.name()),
        }
    }

    pub fn level_of(&self, target: Target) -> u32 {
        match target {
            Target::Player => self.character.level,
            Target::Mob => self
                .mob
                .as_ref()
                .map_or(self.character.level, |mob| mob.instance.level),
        }
    }

    /// Drop the active mob and every effect on it.
    pub fn clear_mob(&mut self) -> Option<ActiveMob> {
        self.effects.clear(Target::Mob);
        self.mob.take()
    }

    /// Install a freshly spawned mob, wiping effects left from the previous one.
    pub fn install_mob(&mut self, mob: ActiveMob) {
        self.effects.clear(Target::Mob);
        self.mob = Some(mob);
    }
}
