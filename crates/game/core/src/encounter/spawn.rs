//! Camp draws and mob instantiation.

use crate::combat::ConColor;
use crate::env::{CampDefinition, CampSpawn, CombatLog, CombatRng, ContentOracle, LogKind, MobTemplate};
use crate::error::{CombatResult, ConfigError};
use crate::state::{ActiveMob, CombatState, MobInstance, MobKey, MobRole};

/// Result of a spawn attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnOutcome {
    /// A combat mob is now the active mob.
    Combat { key: MobKey, con: ConColor },
    /// A merchant or banker appeared; it is never the active mob.
    Interaction(MobInstance),
}

/// Cumulative weight scan. `draw` is uniform in `[0, 1)`.
///
/// Weights must already be validated as finite and positive.
pub fn select_weighted<T>(items: &[T], weight_of: impl Fn(&T) -> f64, draw: f64) -> Option<&T> {
    let total: f64 = items.iter().map(&weight_of).sum();
    let threshold = draw * total;
    let mut cumulative = 0.0;
    for item in items {
        cumulative += weight_of(item);
        if cumulative > threshold {
            return Some(item);
        }
    }
    items.last()
}

/// Draw one spawn entry from a camp pool.
///
/// # Errors
///
/// Any entry without a finite positive weight, or an empty pool.
pub fn draw_spawn<'a>(
    camp_id: &str,
    camp: &'a CampDefinition,
    rng: &mut (impl CombatRng + ?Sized),
) -> Result<&'a CampSpawn, ConfigError> {
    check_weights(camp_id, camp)?;
    select_weighted(&camp.pool, |entry| entry.weight, rng.next_f64()).ok_or_else(|| {
        ConfigError::EmptyPool {
            camp: camp_id.to_string(),
        }
    })
}

fn check_weights(camp_id: &str, camp: &CampDefinition) -> Result<(), ConfigError> {
    match camp
        .pool
        .iter()
        .find(|entry| !(entry.weight.is_finite() && entry.weight > 0.0))
    {
        Some(bad) => Err(ConfigError::InvalidWeight {
            camp: camp_id.to_string(),
            template: bad.template_id.clone(),
            weight: bad.weight,
        }),
        None => Ok(()),
    }
}

/// Check that every draw from `camp_id` can produce a mob.
///
/// Covers the pool weights and every template's numeric fields, so callers
/// can validate a destination before leaving the current camp.
pub fn validate_camp_pool(
    camp_id: &str,
    content: &(impl ContentOracle + ?Sized),
) -> Result<(), ConfigError> {
    let camp = content.require_camp(camp_id)?;
    if camp.pool.is_empty() {
        return Err(ConfigError::EmptyPool {
            camp: camp_id.to_string(),
        });
    }
    check_weights(camp_id, camp)?;
    for entry in &camp.pool {
        let template = content.require_mob_template(&entry.template_id)?;
        TemplateFields::check(&entry.template_id, template)?;
    }
    Ok(())
}

fn required(template_id: &str, field: &'static str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::MissingField {
        template: template_id.to_string(),
        field,
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidField {
            template: template_id.to_string(),
            field,
            value,
        });
    }
    Ok(value)
}

fn whole(value: f64) -> u32 {
    value.floor().min(f64::from(u32::MAX)) as u32
}

/// Numeric fields of a template after validation.
struct TemplateFields {
    level: f64,
    hp: f64,
    mana: f64,
    endurance: f64,
    damage: f64,
    xp: f64,
    ac: f64,
    delay: f64,
    movespeed: f64,
    melee_range: f64,
    aggro_range: f64,
}

impl TemplateFields {
    fn check(template_id: &str, template: &MobTemplate) -> Result<Self, ConfigError> {
        let field = |name, value| required(template_id, name, value);
        let invalid = |field, value| ConfigError::InvalidField {
            template: template_id.to_string(),
            field,
            value,
        };

        let level = field("level", template.level)?;
        if level < 1.0 {
            return Err(invalid("level", level));
        }
        if let Some(max) = template.max_level
            && !max.is_finite()
        {
            return Err(invalid("max_level", max));
        }
        let hp = field("hp", template.hp)?;
        // A combat mob at 0 HP can never die.
        if MobRole::from_tags(&template.tags).is_combat() && whole(hp) == 0 {
            return Err(invalid("hp", hp));
        }

        Ok(Self {
            level,
            hp,
            mana: field("mana", template.mana)?,
            endurance: field("endurance", template.endurance)?,
            damage: field("damage", template.damage)?,
            xp: field("xp", template.xp)?,
            ac: field("ac", template.ac)?,
            delay: field("delay", template.delay)?,
            movespeed: field("movespeed", template.movespeed)?,
            melee_range: field("melee_range", template.melee_range)?,
            aggro_range: field("aggro_range", template.aggro_range)?,
        })
    }
}

/// Validate a raw template and produce a mob instance.
///
/// Every combat field must be present, finite and non-negative; level must be
/// at least 1 and a combat mob needs at least 1 HP. With a `max_level` above
/// `level`, the level is rolled uniformly in that range. Distance is uniform
/// within `camp_area`.
pub fn normalize_template(
    template_id: &str,
    template: &MobTemplate,
    key: MobKey,
    camp_area: f64,
    rng: &mut (impl CombatRng + ?Sized),
) -> Result<MobInstance, ConfigError> {
    let TemplateFields {
        level,
        hp,
        mana,
        endurance,
        damage,
        xp,
        ac,
        delay,
        movespeed,
        melee_range,
        aggro_range,
    } = TemplateFields::check(template_id, template)?;

    let base_level = whole(level);
    let max_level = template.max_level.map(|max| whole(max.max(0.0)));
    let level = match max_level {
        Some(max) if max > base_level => rng.range_inclusive(base_level, max),
        _ => base_level,
    };

    let area = if camp_area.is_finite() { camp_area.max(0.0) } else { 0.0 };
    let distance = rng.next_f64() * area;

    Ok(MobInstance {
        key,
        template_id: template_id.to_string(),
        name: template.name.clone(),
        level,
        max_level,
        hp: whole(hp),
        mana: whole(mana),
        endurance: whole(endurance),
        damage: whole(damage),
        xp: xp.floor() as u64,
        ac: whole(ac).min(i32::MAX as u32) as i32,
        delay,
        movespeed,
        melee_range,
        aggro_range,
        tags: template.tags.clone(),
        race_id: template.race_id,
        gender: template.gender,
        texture_id: template.texture_id,
        loot_table_id: template.loot_table_id.clone(),
        distance,
        role: MobRole::from_tags(&template.tags),
        resists: template.resists,
        attributes: template.attributes,
    })
}

/// Spawn the next mob of the current camp.
///
/// Combat mobs replace the active mob (and its effects). Merchants and
/// bankers clear the active mob and are returned as an interaction with
/// zeroed vitals.
pub fn spawn(
    state: &mut CombatState,
    content: &(impl ContentOracle + ?Sized),
    rng: &mut (impl CombatRng + ?Sized),
    log: &mut (impl CombatLog + ?Sized),
) -> CombatResult<SpawnOutcome> {
    let camp_id = state.encounter.camp_id.clone();
    let camp = content.require_camp(&camp_id)?;
    let entry = draw_spawn(&camp_id, camp, rng)?;
    let template = content.require_mob_template(&entry.template_id)?;
    let key = state.allocate_mob_key();
    let mut instance = normalize_template(&entry.template_id, template, key, camp.camp_area, rng)?;

    if !instance.role.is_combat() {
        state.clear_mob();
        instance.hp = 0;
        instance.mana = 0;
        instance.endurance = 0;
        log.add_log(
            format!("{} is here to help travelers.", instance.name),
            LogKind::Normal,
        );
        return Ok(SpawnOutcome::Interaction(instance));
    }

    let con = ConColor::of(state.character.level, instance.level);
    log.add_log(
        format!("{} (level {}) comes into view.", instance.name, instance.level),
        LogKind::Spawn,
    );
    state.install_mob(ActiveMob::new(instance));
    state.refresh_maxima();
    Ok(SpawnOutcome::Combat { key, con })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{LogEntry, PcgRng, ScriptedRng};
    use crate::error::CombatError;
    use crate::testing;

    #[test]
    fn weighted_draw_converges_to_weight_share() {
        let weights = [1.0, 1.0, 2.0];
        let mut rng = PcgRng::seeded(7);
        let draws = 20_000;
        let mut third = 0;
        for _ in 0..draws {
            let picked = select_weighted(&weights, |w| *w, rng.next_f64());
            if picked.is_some_and(|w| std::ptr::eq(w, &weights[2])) {
                third += 1;
            }
        }
        let share = f64::from(third) / f64::from(draws);
        assert!((share - 0.5).abs() < 0.02, "share was {share}");
    }

    #[test]
    fn first_candidate_past_the_draw_wins() {
        let weights = [1.0, 1.0, 2.0];
        assert_eq!(select_weighted(&weights, |w| *w, 0.0), Some(&weights[0]));
        assert!(std::ptr::eq(select_weighted(&weights, |w| *w, 0.25).unwrap(), &weights[1]));
        assert!(std::ptr::eq(select_weighted(&weights, |w| *w, 0.5).unwrap(), &weights[2]));
    }

    #[test]
    fn non_positive_weight_is_a_config_error() {
        let mut content = testing::content();
        content.camp_mut(testing::CAMP).pool.push(CampSpawn {
            template_id: "gray_wolf".into(),
            weight: 0.0,
        });
        let camp = &content.camps[testing::CAMP];

        let err = draw_spawn(testing::CAMP, camp, &mut ScriptedRng::constant(0.1)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { weight, .. } if weight == 0.0));
    }

    #[test]
    fn missing_numeric_field_is_never_defaulted() {
        let template = MobTemplate {
            damage: None,
            ..testing::content().templates["large_rat"].clone()
        };
        let err = normalize_template("large_rat", &template, MobKey(1), 10.0, &mut ScriptedRng::constant(0.5))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingField {
                template: "large_rat".into(),
                field: "damage"
            }
        );
    }

    #[test]
    fn non_finite_field_is_rejected() {
        let template = MobTemplate {
            hp: Some(f64::NAN),
            ..testing::content().templates["large_rat"].clone()
        };
        let err = normalize_template("large_rat", &template, MobKey(1), 10.0, &mut ScriptedRng::constant(0.5))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { field: "hp", .. }));
    }

    #[test]
    fn combat_template_needs_at_least_one_hp() {
        for hp in [0.0, 0.4] {
            let template = MobTemplate {
                hp: Some(hp),
                ..testing::content().templates["large_rat"].clone()
            };
            let err = normalize_template("large_rat", &template, MobKey(1), 10.0, &mut ScriptedRng::constant(0.5))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidField { field: "hp", .. }));
        }

        let merchant = MobTemplate {
            hp: Some(0.0),
            ..testing::content().templates["merchant"].clone()
        };
        assert!(normalize_template("merchant", &merchant, MobKey(1), 10.0, &mut ScriptedRng::constant(0.5)).is_ok());
    }

    #[test]
    fn zero_hp_template_never_spawns() {
        let mut content = testing::content();
        if let Some(rat) = content.templates.get_mut("large_rat") {
            rat.hp = Some(0.0);
        }
        let mut state = testing::state();

        let err = spawn(
            &mut state,
            &content,
            &mut ScriptedRng::constant(0.3),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CombatError::Config(ConfigError::InvalidField { field: "hp", .. })
        ));
        assert!(state.mob.is_none());
    }

    #[test]
    fn camp_pool_validation_covers_every_template() {
        let mut content = testing::content();
        assert_eq!(validate_camp_pool(testing::NEXT_CAMP, &content), Ok(()));

        if let Some(wolf) = content.templates.get_mut("gray_wolf") {
            wolf.xp = None;
        }
        assert_eq!(
            validate_camp_pool(testing::NEXT_CAMP, &content),
            Err(ConfigError::MissingField {
                template: "gray_wolf".into(),
                field: "xp"
            })
        );
        assert!(matches!(
            validate_camp_pool(testing::ZONE_LINE, &content),
            Err(ConfigError::EmptyPool { .. })
        ));
    }

    #[test]
    fn level_is_rolled_within_range_and_distance_within_area() {
        let template = MobTemplate {
            level: Some(4.0),
            max_level: Some(8.0),
            ..testing::content().templates["large_rat"].clone()
        };
        // level draw 0.99 -> 8, distance draw 0.5 -> 5.0
        let mob = normalize_template(
            "large_rat",
            &template,
            MobKey(3),
            10.0,
            &mut ScriptedRng::new(vec![0.99, 0.5]),
        )
        .unwrap();
        assert_eq!(mob.level, 8);
        assert_eq!(mob.max_level, Some(8));
        assert!((mob.distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn combat_spawn_becomes_the_active_mob() {
        let content = testing::content();
        let mut state = testing::state();
        let mut log = Vec::<LogEntry>::new();

        let outcome = spawn(&mut state, &content, &mut ScriptedRng::constant(0.3), &mut log).unwrap();

        let SpawnOutcome::Combat { key, con } = outcome else {
            panic!("expected combat spawn");
        };
        assert_eq!(con, ConColor::White);
        let mob = state.mob.as_ref().unwrap();
        assert_eq!(mob.key(), key);
        assert_eq!(mob.vitals.hp.current(), 40);
        assert_eq!(log[0].kind, LogKind::Spawn);
    }

    #[test]
    fn merchant_spawn_never_becomes_the_active_mob() {
        let mut content = testing::content();
        content.camp_mut(testing::CAMP).pool = vec![CampSpawn {
            template_id: "merchant".into(),
            weight: 1.0,
        }];
        let mut state = testing::state_with_mob();

        let outcome = spawn(
            &mut state,
            &content,
            &mut ScriptedRng::constant(0.3),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap();

        let SpawnOutcome::Interaction(instance) = outcome else {
            panic!("expected interaction");
        };
        assert_eq!(instance.role, MobRole::Merchant);
        assert_eq!((instance.hp, instance.mana, instance.endurance), (0, 0, 0));
        assert!(state.mob.is_none());
    }

    #[test]
    fn unknown_camp_is_a_config_error() {
        let content = testing::content();
        let mut state = testing::state();
        state.encounter.camp_id = "nowhere".into();

        let err = spawn(
            &mut state,
            &content,
            &mut ScriptedRng::constant(0.3),
            &mut Vec::<LogEntry>::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CombatError::Config(ConfigError::UnknownReference { kind: "camp", .. })
        ));
    }
}
