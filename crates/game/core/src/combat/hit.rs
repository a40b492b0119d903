//! Single-hit resolution.

use super::resist::ResistOutcome;
use crate::error::ContractError;
use crate::stats::DamageSchool;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    Melee,
    Spell(DamageSchool),
}

impl DamageKind {
    pub fn is_spell(self) -> bool {
        matches!(self, Self::Spell(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRequest {
    pub raw_damage: f64,
    pub kind: DamageKind,
    /// Flat reduction for melee hits.
    pub mitigation: u32,
    pub current_hp: u32,
    /// Reflect amount of the defender's damage shields.
    pub damage_shield: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitOutcome {
    pub resisted: bool,
    pub final_damage: u32,
    pub absorbed: u32,
    pub new_hp: u32,
    /// Damage the caller must apply to the attacker. Zero for spells.
    pub damage_shield_reflected: u32,
}

/// Resolve one hit.
///
/// - melee: `max(1, floor(raw) - mitigation)`, negative raw counts as 0
/// - spell: `mitigate_spell(raw, school).final_amount`; zero means resisted, in
///   which case runes are untouched and HP is unchanged
/// - `consume_rune` absorbs from the mitigated amount
/// - `on_death` fires once when HP goes from positive to zero
///
/// # Errors
///
/// [`ContractError::NonFinite`] when `raw_damage` is NaN or infinite.
pub fn apply_hit(
    request: &HitRequest,
    consume_rune: impl FnOnce(u32) -> u32,
    mitigate_spell: impl FnOnce(f64, DamageSchool) -> ResistOutcome,
    on_death: impl FnOnce(),
) -> Result<HitOutcome, ContractError> {
    let raw = ContractError::finite("raw damage", request.raw_damage)?;

    let mitigated = match request.kind {
        DamageKind::Melee => {
            let floored = raw.max(0.0).floor().min(f64::from(u32::MAX)) as u32;
            floored.saturating_sub(request.mitigation).max(1)
        }
        DamageKind::Spell(school) => {
            let outcome = mitigate_spell(raw, school);
            if outcome.final_amount == 0 {
                return Ok(HitOutcome {
                    resisted: true,
                    final_damage: 0,
                    absorbed: 0,
                    new_hp: request.current_hp,
                    damage_shield_reflected: 0,
                });
            }
            outcome.final_amount
        }
    };

    let absorbed = consume_rune(mitigated).min(mitigated);
    let final_damage = mitigated - absorbed;
    let new_hp = request.current_hp.saturating_sub(final_damage);

    if request.current_hp > 0 && new_hp == 0 {
        on_death();
    }

    Ok(HitOutcome {
        resisted: false,
        final_damage,
        absorbed,
        new_hp,
        damage_shield_reflected: if request.kind.is_spell() {
            0
        } else {
            request.damage_shield
        },
    })
}

/// Spell damage as an unsigned base amount.
pub fn spell_base(raw: f64) -> u32 {
    raw.max(0.0).floor().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::resist::apply_resist;

    fn melee(raw: f64, mitigation: u32, current_hp: u32) -> HitRequest {
        HitRequest {
            raw_damage: raw,
            kind: DamageKind::Melee,
            mitigation,
            current_hp,
            damage_shield: 0,
        }
    }

    fn no_rune(_: u32) -> u32 {
        0
    }

    fn unused_mitigation(_: f64, _: DamageSchool) -> ResistOutcome {
        unreachable!("melee hits never consult spell mitigation")
    }

    #[test]
    fn melee_always_lands_at_least_one() {
        for raw in [0.0, 0.4, 3.0, 9.9, 250.0] {
            for mitigation in [0, 5, 1_000] {
                let outcome = apply_hit(&melee(raw, mitigation, 50), no_rune, unused_mitigation, || {})
                    .unwrap();
                assert!(outcome.final_damage >= 1);
                assert!(outcome.new_hp < 50);
            }
        }
    }

    #[test]
    fn negative_raw_is_treated_as_zero() {
        let outcome = apply_hit(&melee(-40.0, 0, 10), no_rune, unused_mitigation, || {}).unwrap();
        assert_eq!(outcome.final_damage, 1);
        assert_eq!(outcome.new_hp, 9);
    }

    #[test]
    fn non_finite_raw_is_a_contract_violation() {
        let err = apply_hit(&melee(f64::NAN, 0, 10), no_rune, unused_mitigation, || {}).unwrap_err();
        assert!(matches!(err, ContractError::NonFinite { .. }));
        assert!(apply_hit(&melee(f64::INFINITY, 0, 10), no_rune, unused_mitigation, || {}).is_err());
    }

    #[test]
    fn fully_mitigated_spell_is_resisted_and_keeps_runes() {
        let request = HitRequest {
            raw_damage: 30.0,
            kind: DamageKind::Spell(DamageSchool::Cold),
            mitigation: 0,
            current_hp: 80,
            damage_shield: 12,
        };
        let mut rune_calls = 0;
        let outcome = apply_hit(
            &request,
            |amount| {
                rune_calls += 1;
                amount
            },
            |raw, _| apply_resist(spell_base(raw), 60, 0),
            || panic!("no death"),
        )
        .unwrap();

        assert!(outcome.resisted);
        assert_eq!(outcome.final_damage, 0);
        assert_eq!(outcome.new_hp, 80);
        assert_eq!(outcome.damage_shield_reflected, 0);
        assert_eq!(rune_calls, 0);
    }

    #[test]
    fn runes_absorb_before_hp() {
        let outcome = apply_hit(&melee(20.0, 0, 50), |amount| amount.min(15), unused_mitigation, || {})
            .unwrap();
        assert_eq!(outcome.absorbed, 15);
        assert_eq!(outcome.final_damage, 5);
        assert_eq!(outcome.new_hp, 45);
    }

    #[test]
    fn death_fires_once_on_transition_only() {
        let mut deaths = 0;
        apply_hit(&melee(100.0, 0, 10), no_rune, unused_mitigation, || deaths += 1).unwrap();
        assert_eq!(deaths, 1);

        let mut deaths = 0;
        let outcome =
            apply_hit(&melee(100.0, 0, 0), no_rune, unused_mitigation, || deaths += 1).unwrap();
        assert_eq!(deaths, 0);
        assert_eq!(outcome.new_hp, 0);
    }

    #[test]
    fn damage_shield_reflects_only_melee() {
        let mut request = melee(10.0, 0, 50);
        request.damage_shield = 7;
        let outcome = apply_hit(&request, no_rune, unused_mitigation, || {}).unwrap();
        assert_eq!(outcome.damage_shield_reflected, 7);

        request.kind = DamageKind::Spell(DamageSchool::Fire);
        let outcome = apply_hit(&request, no_rune, |raw, _| apply_resist(spell_base(raw), 0, 0), || {})
            .unwrap();
        assert_eq!(outcome.damage_shield_reflected, 0);
        assert_eq!(outcome.final_damage, 10);
    }
}
