//! Spell mitigation.
//!
//! Both directions (mob casting on the player, player casting on the mob) use
//! the same reducer:
//!
//! ```text
//! after_flat = max(0, base - resist)
//! after_pct  = floor(after_flat * (100 - pct) / 100)     pct clamped to [0, 100]
//! ```
//!
//! The defender's resist is adjusted by the level gap: every level the
//! attacker has over the defender removes one point of resist, bounded by
//! `level_adjust_cap` in both directions.

use crate::stats::{Attributes, DamageSchool, ResistValues, StatKey, StatMods};

/// Result of [`apply_resist`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResistOutcome {
    pub final_amount: u32,
    /// Removed by the flat resist stage.
    pub resist_reduced: u32,
    /// Removed by the percent stage.
    pub total_reduced: u32,
}

pub fn apply_resist(base: u32, resist: i32, total_pct: i32) -> ResistOutcome {
    let after_flat = (i64::from(base) - i64::from(resist)).max(0);
    let pct = i64::from(total_pct.clamp(0, 100));
    let after_pct = after_flat * (100 - pct) / 100;

    ResistOutcome {
        final_amount: after_pct.clamp(0, i64::from(u32::MAX)) as u32,
        resist_reduced: i64::from(base).saturating_sub(after_flat).max(0) as u32,
        total_reduced: (after_flat - after_pct).clamp(0, i64::from(u32::MAX)) as u32,
    }
}

/// Level gap clamped to `[-cap, cap]`.
pub fn level_adjustment(level_diff: i64, cap: i32) -> i32 {
    let cap = i64::from(cap.max(0));
    level_diff.clamp(-cap, cap) as i32
}

/// Defender-side inputs for spell mitigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResistProfile {
    pub resists: ResistValues,
    /// Total percent reduction before clamping.
    pub total_pct: i32,
    pub level: u32,
}

impl ResistProfile {
    /// Player profile: base resists and reduction plus effect modifiers.
    pub fn player(
        resists: &ResistValues,
        spell_reduction_pct: i32,
        level: u32,
        mods: &StatMods,
    ) -> Self {
        Self {
            resists: resists.with_mods(mods),
            total_pct: spell_reduction_pct.saturating_add(mods.get(StatKey::SpellReductionPct)),
            level,
        }
    }

    /// Mob profile: charisma folds `floor(cha / 10)` into the percent total.
    pub fn mob(
        resists: &ResistValues,
        attributes: &Attributes,
        level: u32,
        mods: &StatMods,
    ) -> Self {
        let attributes = mods.apply_to_attributes(attributes);
        Self {
            resists: resists.with_mods(mods),
            total_pct: attributes
                .cha
                .div_euclid(10)
                .saturating_add(mods.get(StatKey::SpellReductionPct)),
            level,
        }
    }

    /// School resist after the level adjustment against `attacker_level`.
    pub fn effective_resist(&self, school: DamageSchool, attacker_level: u32, cap: i32) -> i32 {
        let diff = i64::from(attacker_level) - i64::from(self.level);
        self.resists
            .get(school)
            .saturating_sub(level_adjustment(diff, cap))
    }

    pub fn mitigate(
        &self,
        base: u32,
        school: DamageSchool,
        attacker_level: u32,
        cap: i32,
    ) -> ResistOutcome {
        apply_resist(
            base,
            self.effective_resist(school, attacker_level, cap),
            self.total_pct,
        )
    }
}

/// Mob spell damage landing on the player.
pub fn mitigate_incoming_spell(
    base: u32,
    school: DamageSchool,
    player: &ResistProfile,
    mob_level: u32,
    cap: i32,
) -> ResistOutcome {
    player.mitigate(base, school, mob_level, cap)
}

/// Player spell damage landing on the mob.
pub fn mitigate_outgoing_spell(
    base: u32,
    school: DamageSchool,
    mob: &ResistProfile,
    player_level: u32,
    cap: i32,
) -> ResistOutcome {
    mob.mitigate(base, school, player_level, cap)
}

/// Caster bonuses a mob derives from its attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MobCasterMods {
    pub spell_damage_mod: i32,
    pub heal_mod: i32,
}

pub fn mob_caster_mods(attributes: &Attributes) -> MobCasterMods {
    MobCasterMods {
        spell_damage_mod: attributes.int.div_euclid(10),
        heal_mod: attributes.wis.div_euclid(10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_then_percent() {
        let outcome = apply_resist(100, 20, 25);
        assert_eq!(outcome.final_amount, 60);
        assert_eq!(outcome.resist_reduced, 20);
        assert_eq!(outcome.total_reduced, 20);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(apply_resist(100, 0, 150).final_amount, 0);
        assert_eq!(apply_resist(100, 0, -50).final_amount, 100);
    }

    #[test]
    fn resist_above_base_fully_resists() {
        let outcome = apply_resist(30, 45, 0);
        assert_eq!(outcome.final_amount, 0);
        assert_eq!(outcome.resist_reduced, 30);
    }

    #[test]
    fn non_increasing_in_resist_and_pct() {
        for base in [0u32, 1, 7, 50, 333, 10_000] {
            let mut last_by_resist = u32::MAX;
            for resist in -20..=120 {
                let value = apply_resist(base, resist, 10).final_amount;
                assert!(value <= last_by_resist);
                last_by_resist = value;
            }

            let mut last_by_pct = u32::MAX;
            for pct in -10..=110 {
                let value = apply_resist(base, 15, pct).final_amount;
                assert!(value <= last_by_pct);
                last_by_pct = value;
            }
        }
    }

    #[test]
    fn level_adjustment_is_capped() {
        assert_eq!(level_adjustment(25, 10), 10);
        assert_eq!(level_adjustment(-25, 10), -10);
        assert_eq!(level_adjustment(3, 10), 3);
    }

    #[test]
    fn higher_level_attacker_lowers_defender_resist() {
        let player = ResistProfile {
            resists: ResistValues::uniform(30),
            total_pct: 0,
            level: 5,
        };
        // Mob five levels above: effective resist 25.
        assert_eq!(player.effective_resist(DamageSchool::Fire, 10, 10), 25);
        assert_eq!(mitigate_incoming_spell(100, DamageSchool::Fire, &player, 10, 10).final_amount, 75);
        // Mob far below: capped bonus of 10.
        assert_eq!(player.effective_resist(DamageSchool::Fire, 1, 3), 33);
    }

    #[test]
    fn outgoing_subtracts_player_level_advantage() {
        let mob = ResistProfile::mob(
            &ResistValues::uniform(40),
            &Attributes::default(),
            2,
            &StatMods::new(),
        );
        let outcome = mitigate_outgoing_spell(100, DamageSchool::Magic, &mob, 8, 10);
        // resist 40 - (8 - 2) = 34
        assert_eq!(outcome.final_amount, 66);
    }

    #[test]
    fn mob_charisma_and_caster_mods() {
        let attributes = Attributes {
            cha: 57,
            int: 83,
            wis: 29,
            ..Attributes::default()
        };
        let profile = ResistProfile::mob(&ResistValues::default(), &attributes, 1, &StatMods::new());
        assert_eq!(profile.total_pct, 5);

        let mods = mob_caster_mods(&attributes);
        assert_eq!(mods.spell_damage_mod, 8);
        assert_eq!(mods.heal_mod, 2);
    }
}
