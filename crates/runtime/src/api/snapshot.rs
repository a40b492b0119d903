//! Read-only view of a session returned by [`RuntimeHandle::query_state`].
//!
//! [`RuntimeHandle::query_state`]: super::RuntimeHandle::query_state

use serde::Serialize;

use combat_core::{
    Character, CombatState, ConColor, Effect, EncounterContext, ItemInstance, MobKey,
    RespawnTicket, Target, Timestamp, VitalMaxima, VitalSnapshot,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobView {
    pub key: MobKey,
    pub template_id: String,
    pub name: String,
    pub level: u32,
    pub con: ConColor,
    pub vitals: VitalSnapshot,
    pub max: VitalMaxima,
    pub engaged: bool,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Session clock at the time of the query.
    pub now: Timestamp,
    pub character: Character,
    pub player: VitalSnapshot,
    pub player_max: VitalMaxima,
    pub mob: Option<MobView>,
    pub player_effects: Vec<Effect>,
    pub mob_effects: Vec<Effect>,
    pub encounter: EncounterContext,
    pub pending_respawn: Option<RespawnTicket>,
    pub inventory: Vec<(ItemInstance, u32)>,
}

impl SessionSnapshot {
    pub(crate) fn capture(
        state: &CombatState,
        now: Timestamp,
        pending_respawn: Option<&RespawnTicket>,
        inventory: &[(ItemInstance, u32)],
    ) -> Self {
        let mob = state.mob.as_ref().map(|mob| MobView {
            key: mob.key(),
            template_id: mob.instance.template_id.clone(),
            name: mob.name().to_string(),
            level: mob.instance.level,
            con: ConColor::of(state.character.level, mob.instance.level),
            vitals: mob.vitals.snapshot(),
            max: mob.instance.effective_maxima(&state.mob_mods()),
            engaged: mob.engaged,
            distance: mob.instance.distance,
        });

        Self {
            now,
            character: state.character.clone(),
            player: state.player.snapshot(),
            player_max: state.player_maxima(),
            mob,
            player_effects: state.effects.set(Target::Player).iter().cloned().collect(),
            mob_effects: state.effects.set(Target::Mob).iter().cloned().collect(),
            encounter: state.encounter.clone(),
            pending_respawn: pending_respawn.cloned(),
            inventory: inventory.to_vec(),
        }
    }

    /// The character died in hardcore mode.
    pub fn is_dead(&self) -> bool {
        self.character.is_dead()
    }

    pub fn mob_key(&self) -> Option<MobKey> {
        self.mob.as_ref().map(|mob| mob.key)
    }
}
