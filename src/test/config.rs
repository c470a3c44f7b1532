use crate::config::{
    DEFAULT_TARGET_ARMOR, DEFAULT_TARGET_LEVEL, EffectRegistry, OutcomeSpec, SimSpec,
    build_simulation,
};
use crate::encounter::Simulation;
use crate::error::{ConfigError, SimError};
use crate::log::CombatEventKind;
use crate::resource::ResourceKind;
use crate::spell::ActionId;
use crate::stats::Stat;
use crate::unit::UnitId;
use serde_json::{Value, json};
use std::path::Path;

fn nuke_spec(target: Value, player_extra: Value) -> Value {
    let mut player = json!({
        "name": "mage",
        "spells": [
            { "name": "nuke", "id": 1, "school": "fire", "damage": { "kind": "flat", "amount": 100.0 } }
        ],
        "rotation": ["nuke"]
    });
    if let (Some(p), Some(extra)) = (player.as_object_mut(), player_extra.as_object()) {
        for (k, v) in extra {
            p.insert(k.clone(), v.clone());
        }
    }
    json!({
        "schema_version": 1,
        "iterations": 2,
        "seed": 11,
        "encounter": { "duration_secs": 60.0, "targets": [target] },
        "player": player
    })
}

fn build(spec: &Value) -> Result<Simulation, ConfigError> {
    let spec = SimSpec::from_json(&spec.to_string()).expect("parse");
    build_simulation(&spec, &EffectRegistry::with_defaults())
}

#[test]
fn minimal_spec_fills_defaults() {
    let spec = SimSpec::from_json(&nuke_spec(json!({}), json!({})).to_string()).expect("parse");
    assert_eq!(spec.iterations, Some(2));
    assert_eq!(spec.seed, Some(11));
    let target = &spec.encounter.targets[0];
    assert_eq!((target.level, target.armor), (None, None));
    let spell = &spec.player.spells[0];
    assert_eq!(spell.outcome, OutcomeSpec::AlwaysHit);
    assert_eq!(spell.threat_multiplier, 1.0);
    assert_eq!(spell.gcd_secs, None);

    let sim = build_simulation(&spec, &EffectRegistry::with_defaults()).expect("build");
    let world = sim.world();
    let boss = world.unit(world.primary_target());
    assert_eq!(boss.level, DEFAULT_TARGET_LEVEL);
    assert_eq!(boss.initial_stats()[Stat::Armor], DEFAULT_TARGET_ARMOR);
    assert_eq!(sim.base_seed(), 11);
}

#[test]
fn school_debuffs_multiply_spell_damage() {
    let spec = nuke_spec(
        json!({ "debuffs": [{ "name": "curse_of_elements" }, { "name": "misery" }] }),
        json!({}),
    );
    let mut sim = build(&spec).expect("build");
    let report = sim.run_iteration(0);

    let player = report.unit(UnitId(0)).expect("player");
    assert_eq!(player.spells[0].casts, 40);
    assert!((player.damage - 40.0 * 100.0 * 1.10 * 1.05).abs() < 1e-6);
    let boss = report.unit(UnitId(1)).expect("boss");
    assert_eq!(boss.auras.len(), 2);
    assert!(boss.auras.iter().all(|a| (a.uptime_pct - 1.0).abs() < 1e-9));
}

#[test]
fn curse_of_elements_accepts_a_custom_multiplier() {
    let spec = nuke_spec(
        json!({ "debuffs": [{ "name": "curse_of_elements", "value": 1.13 }] }),
        json!({}),
    );
    let mut sim = build(&spec).expect("build");
    let report = sim.run_iteration(0);
    assert!((report.units[0].damage - 40.0 * 113.0).abs() < 1e-6);
}

#[test]
fn sunder_and_expose_do_not_stack_but_faerie_fire_does() {
    let spec = nuke_spec(
        json!({
            "armor": 7000.0,
            "debuffs": [{ "name": "sunder_armor" }, { "name": "expose_armor" }, { "name": "faerie_fire" }]
        }),
        json!({}),
    );
    let mut sim = build(&spec).expect("build");
    sim.run_iteration(0);

    let world = sim.world();
    let boss = world.unit(world.primary_target());
    assert_eq!(boss.stats[Stat::Armor], 7000.0 - 2050.0 - 610.0);
}

#[test]
fn judgement_of_wisdom_returns_mana_to_the_caster() {
    let mut spec = nuke_spec(
        json!({ "debuffs": [{ "name": "judgement_of_wisdom" }] }),
        json!({
            "stats": { "mana": 1000.0 },
            "resources": { "mana": {} }
        }),
    );
    spec["encounter"]["duration_secs"] = json!(3.0);
    spec["player"]["spells"][0]["resource"] = json!("mana");
    spec["player"]["spells"][0]["cost"] = json!(100.0);
    let mut sim = build(&spec).expect("build");
    let report = sim.run_iteration(0);

    let player = &report.units[0];
    assert_eq!(player.spells[0].casts, 2);
    let jow = player
        .resources
        .iter()
        .find(|r| r.action == ActionId::Spell(27164) && r.resource == ResourceKind::Mana)
        .expect("judgement of wisdom mana");
    assert_eq!(jow.gain_events, 2);
    assert_eq!(jow.gained, 74.0);
    let mana = sim.world().unit(UnitId(0)).resource_available(ResourceKind::Mana);
    assert_eq!(mana, Some(874.0));
}

#[test]
fn player_buffs_apply_stats() {
    let spec = nuke_spec(
        json!({}),
        json!({
            "stats": { "intellect": 100.0, "attack_power": 1000.0 },
            "buffs": [{ "name": "blessing_of_kings" }, { "name": "battle_shout" }]
        }),
    );
    let mut sim = build(&spec).expect("build");
    sim.run_iteration(0);

    let player = sim.world().unit(UnitId(0));
    assert!((player.initial_stats()[Stat::Intellect] - 110.0).abs() < 1e-9);
    assert_eq!(player.stats[Stat::AttackPower], 1305.0);
}

fn first_cooldown_use(spec: &Value) -> u64 {
    let mut sim = build(spec).expect("build");
    sim.set_logging(true);
    sim.run_iteration(0);
    sim.take_log()
        .iter()
        .find(|e| matches!(e.kind, CombatEventKind::MajorCooldownUsed { .. }))
        .map(|e| e.t_ns)
        .expect("cooldown used")
}

#[test]
fn armor_debuff_delays_untimed_dps_cooldowns() {
    let berserking = json!({
        "delay_dps_cooldowns_for_armor_debuffs": true,
        "cooldowns": [{
            "kind": "buff",
            "id": 26297,
            "name": "Berserking",
            "duration_secs": 10.0,
            "cooldown_secs": 180.0,
            "damage_multiplier": 1.1,
            "cooldown_type": "dps"
        }]
    });
    let plain = nuke_spec(json!({}), berserking.clone());
    assert_eq!(first_cooldown_use(&plain), 0);

    let sundered = nuke_spec(json!({ "debuffs": [{ "name": "sunder_armor" }] }), berserking);
    // 10 秒之后的第一个代理回合
    assert_eq!(first_cooldown_use(&sundered), 10_500_000_000);

    let mut sim = build(&sundered).expect("build");
    let report = sim.run_iteration(0);
    let player = &report.units[0];
    assert_eq!(player.cooldowns[0].usages, 1);
    assert!((player.damage - (33.0 * 100.0 + 7.0 * 110.0)).abs() < 1e-6);
}

#[test]
fn spell_cooldown_is_cast_before_the_rotation() {
    let mut spec = nuke_spec(
        json!({}),
        json!({ "cooldowns": [{ "kind": "spell", "spell": "blast", "priority": 1.0 }] }),
    );
    spec["player"]["spells"]
        .as_array_mut()
        .expect("spells")
        .push(json!({
            "name": "blast",
            "id": 2,
            "school": "fire",
            "cooldown_secs": 30.0,
            "damage": { "kind": "flat", "amount": 500.0 }
        }));
    let mut sim = build(&spec).expect("build");
    let report = sim.run_iteration(0);

    let player = &report.units[0];
    let casts = |label: &str| {
        player
            .spells
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.casts)
            .expect("spell report")
    };
    // 0 与 30 秒施放冷却技能，其余 38 个 GCD 给主技能
    assert_eq!(casts("blast"), 2);
    assert_eq!(casts("nuke"), 38);
    assert_eq!(player.cooldowns[0].usages, 2);
}

#[test]
fn dot_spell_from_config_ticks() {
    let mut spec = nuke_spec(json!({}), json!({}));
    spec["player"]["spells"][0] = json!({
        "name": "nuke",
        "id": 3,
        "school": "shadow",
        "gcd_secs": 0.0,
        "cooldown_secs": 100.0,
        "dot": { "num_ticks": 6, "tick_secs": 3.0, "damage": { "kind": "flat", "amount": 20.0 } }
    });
    let mut sim = build(&spec).expect("build");
    let report = sim.run_iteration(0);

    let spell = &report.units[0].spells[0];
    assert_eq!(spell.casts, 1);
    assert_eq!(spell.targets[0].ticks, 6);
    assert_eq!(spell.damage, 120.0);
}

#[test]
fn unknown_names_are_config_errors() {
    let spec = nuke_spec(json!({ "debuffs": [{ "name": "hunters_mark_of_doom" }] }), json!({}));
    assert_eq!(
        build(&spec).err(),
        Some(ConfigError::UnknownEffect("hunters_mark_of_doom".into()))
    );

    let mut spec = nuke_spec(json!({}), json!({}));
    spec["player"]["rotation"] = json!(["nuke", "pyroblast"]);
    assert_eq!(build(&spec).err(), Some(ConfigError::UnknownSpell("pyroblast".into())));

    let spec = nuke_spec(
        json!({}),
        json!({ "cooldowns": [{ "kind": "spell", "spell": "combustion" }] }),
    );
    assert_eq!(build(&spec).err(), Some(ConfigError::UnknownSpell("combustion".into())));
}

#[test]
fn malformed_encounters_are_rejected() {
    let mut spec = nuke_spec(json!({}), json!({}));
    spec["schema_version"] = json!(2);
    assert!(matches!(build(&spec), Err(ConfigError::Invalid(_))));

    let mut spec = nuke_spec(json!({}), json!({}));
    spec["encounter"]["duration_secs"] = json!(0.0);
    assert!(matches!(build(&spec), Err(ConfigError::Invalid(_))));

    let mut spec = nuke_spec(json!({}), json!({}));
    spec["encounter"]["targets"] = json!([]);
    assert!(matches!(build(&spec), Err(ConfigError::NoTargets)));

    let mut spec = nuke_spec(json!({}), json!({}));
    let dup = spec["player"]["spells"][0].clone();
    spec["player"]["spells"].as_array_mut().expect("spells").push(dup);
    assert!(matches!(build(&spec), Err(ConfigError::Invalid(_))));
}

#[test]
fn parse_and_io_errors_are_distinguished() {
    assert!(matches!(SimSpec::from_json("{ not json"), Err(SimError::Parse(_))));
    let missing = Path::new("/definitely/not/here/sim.json");
    match SimSpec::load(missing) {
        Err(SimError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn registry_lists_its_effects() {
    let registry = EffectRegistry::with_defaults();
    assert!(registry.has_debuff("misery"));
    assert!(registry.has_buff("battle_shout"));
    assert!(!registry.has_buff("misery"));
    assert!(registry.is_armor_debuff("faerie_fire"));
    assert!(!registry.is_armor_debuff("curse_of_elements"));
    let names: Vec<&str> = registry.debuff_names().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}
