use super::fixture::{Encounter, encounter, fire_nuke, ready};
use crate::cooldown::{
    ARMOR_DEBUFF_DELAY, ActivationFactory, CooldownActivation, CooldownCondition, CooldownType,
    MajorCooldownConfig, activate_major_cooldown, try_use_major_cooldowns,
};
use crate::encounter::CombatWorld;
use crate::error::ConfigError;
use crate::sim::{SimTime, Simulator};
use crate::spell::ActionId;
use crate::unit::UnitId;
use std::sync::{Arc, Mutex};

type UseLog = Arc<Mutex<Vec<u32>>>;

/// 60 秒冷却的物品类大招，激活时记录自己的编号并启动冷却。
fn item_cooldown(
    world: &mut CombatWorld,
    unit: UnitId,
    id: u32,
    priority: f64,
    kind: CooldownType,
    log: &UseLog,
) -> MajorCooldownConfig {
    let cd = world.new_cooldown(unit, SimTime::from_secs(60));
    let log = log.clone();
    let factory: ActivationFactory = Arc::new(move |_world: &CombatWorld, _unit: UnitId| {
        let log = log.clone();
        let activation: CooldownActivation =
            Box::new(move |sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId| {
                cd.start(&mut world.unit_mut(unit).timers, sim.now());
                log.lock().expect("use log").push(id);
            });
        activation
    });
    MajorCooldownConfig {
        action_id: Some(ActionId::Item(id)),
        cooldown: Some(cd),
        priority,
        kind,
        activation_factory: Some(factory),
        ..MajorCooldownConfig::default()
    }
}

/// 三个同时就绪的大招：1 号优先级 0，2 号优先级 2，3 号优先级 1。
fn three_items(configure: impl Fn(u32, &mut MajorCooldownConfig)) -> (Encounter, UseLog) {
    let mut enc = encounter(SimTime::from_secs(120), 0.5);
    let log = UseLog::default();
    for (id, priority) in [(1, 0.0), (2, 2.0), (3, 1.0)] {
        let mut config = item_cooldown(&mut enc.world, enc.player, id, priority, CooldownType::Dps, &log);
        configure(id, &mut config);
        enc.world.add_major_cooldown(enc.player, config).expect("add cooldown");
    }
    ready(&mut enc);
    (enc, log)
}

fn order(enc: &Encounter) -> Vec<ActionId> {
    enc.world
        .unit(enc.player)
        .cooldowns
        .iter()
        .map(|m| m.action_id)
        .collect()
}

fn used(log: &UseLog) -> Vec<u32> {
    log.lock().expect("use log").clone()
}

#[test]
fn ready_cooldowns_are_ordered_by_priority() {
    let (enc, _log) = three_items(|_, _| {});
    assert_eq!(
        order(&enc),
        vec![ActionId::Item(2), ActionId::Item(3), ActionId::Item(1)]
    );
    let unit = enc.world.unit(enc.player);
    assert!(unit.cooldowns.is_sorted(&unit.timers));
}

#[test]
fn off_gcd_cooldowns_are_all_used_in_one_pass() {
    let (mut enc, log) = three_items(|_, _| {});
    let mut sim = Simulator::default();

    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(used(&log), vec![2, 3, 1]);

    let unit = enc.world.unit(enc.player);
    assert!(unit.cooldowns.is_sorted(&unit.timers));
    for m in unit.cooldowns.iter() {
        assert_eq!(m.usages(), 1);
        assert_eq!(m.ready_at(&unit.timers), SimTime::from_secs(60));
    }

    // 全部在冷却中，再扫描一次什么也不做
    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(used(&log).len(), 3);
}

#[test]
fn gcd_cooldown_stops_the_scan() {
    let (mut enc, log) = three_items(|id, config| config.uses_gcd = id != 1);
    let mut sim = Simulator::default();

    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(used(&log), vec![2]);
    assert_eq!(
        order(&enc),
        vec![ActionId::Item(3), ActionId::Item(1), ActionId::Item(2)]
    );

    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(used(&log), vec![2, 3]);
}

#[test]
fn cooldown_waits_for_the_global_cooldown() {
    let (mut enc, log) = three_items(|_, config| config.uses_gcd = true);
    let mut sim = Simulator::default();
    enc.world
        .unit_mut(enc.player)
        .gcd
        .start(SimTime::ZERO, SimTime::from_millis(1500));

    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert!(used(&log).is_empty());
}

#[test]
fn disabled_cooldowns_are_skipped_but_can_be_forced() {
    let (mut enc, log) = three_items(|_, _| {});
    let mut sim = Simulator::default();
    enc.world.unit_mut(enc.player).cooldowns.disable(ActionId::Item(2));

    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(used(&log), vec![3, 1]);

    assert!(activate_major_cooldown(&mut sim, &mut enc.world, enc.player, ActionId::Item(2)));
    assert_eq!(used(&log), vec![3, 1, 2]);
    // 冷却中的不能强制使用
    assert!(!activate_major_cooldown(&mut sim, &mut enc.world, enc.player, ActionId::Item(2)));
    assert!(!activate_major_cooldown(&mut sim, &mut enc.world, enc.player, ActionId::Item(99)));
}

#[test]
fn disable_all_by_type_returns_what_it_changed() {
    let mut enc = encounter(SimTime::from_secs(120), 0.5);
    let log = UseLog::default();
    for (id, kind) in [(1, CooldownType::Dps), (2, CooldownType::Mana), (3, CooldownType::Dps)] {
        let config = item_cooldown(&mut enc.world, enc.player, id, 0.0, kind, &log);
        enc.world.add_major_cooldown(enc.player, config).expect("add cooldown");
    }
    ready(&mut enc);
    let mgr = &mut enc.world.unit_mut(enc.player).cooldowns;

    mgr.disable(ActionId::Item(3));
    let changed = mgr.disable_all_enabled(CooldownType::Dps);
    assert_eq!(changed, vec![ActionId::Item(1)]);
    assert!(mgr.get(ActionId::Item(2)).is_some_and(|m| m.is_enabled()));

    let all = mgr.disable_all_enabled(CooldownType::Unknown);
    assert_eq!(all, vec![ActionId::Item(2)]);

    mgr.enable_all(&changed);
    assert!(mgr.get(ActionId::Item(1)).is_some_and(|m| m.is_enabled()));
    assert!(mgr.get(ActionId::Item(3)).is_some_and(|m| !m.is_enabled()));
}

#[test]
fn fixed_timings_override_the_condition() {
    let mut enc = encounter(SimTime::from_secs(120), 0.5);
    let log = UseLog::default();
    let config = item_cooldown(&mut enc.world, enc.player, 7, 0.0, CooldownType::Dps, &log);
    let never: CooldownCondition = Arc::new(|_: &Simulator, _: &CombatWorld, _: UnitId| false);
    enc.world
        .add_major_cooldown(
            enc.player,
            MajorCooldownConfig {
                should_activate: Some(never),
                ..config
            },
        )
        .expect("add cooldown");
    enc.world
        .unit_mut(enc.player)
        .cooldowns
        .set_timings(ActionId::Item(7), vec![SimTime::from_secs(10)])
        .expect("set timings");
    ready(&mut enc);
    let mut sim = Simulator::default();

    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert!(used(&log).is_empty());

    sim.run_until(SimTime::from_secs(10), &mut enc.world);
    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(used(&log), vec![7]);

    // 固定时刻用完后回到条件判断
    sim.run_until(SimTime::from_secs(70), &mut enc.world);
    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(used(&log), vec![7]);
}

#[test]
fn can_activate_gates_every_use() {
    let (mut enc, log) = {
        let mut enc = encounter(SimTime::from_secs(120), 0.5);
        let log = UseLog::default();
        let config = item_cooldown(&mut enc.world, enc.player, 8, 0.0, CooldownType::Mana, &log);
        let casting_only: CooldownCondition =
            Arc::new(|_: &Simulator, world: &CombatWorld, unit: UnitId| world.unit(unit).is_casting());
        enc.world
            .add_major_cooldown(
                enc.player,
                MajorCooldownConfig {
                    can_activate: Some(casting_only),
                    ..config
                },
            )
            .expect("add cooldown");
        ready(&mut enc);
        (enc, log)
    };
    let mut sim = Simulator::default();
    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert!(used(&log).is_empty());
}

#[test]
fn armor_debuff_delay_only_touches_untimed_dps_cooldowns() {
    let mut enc = encounter(SimTime::from_secs(120), 0.5);
    let log = UseLog::default();
    for (id, kind) in [(1, CooldownType::Dps), (2, CooldownType::Mana), (3, CooldownType::Dps)] {
        let config = item_cooldown(&mut enc.world, enc.player, id, 0.0, kind, &log);
        enc.world.add_major_cooldown(enc.player, config).expect("add cooldown");
    }
    {
        let mgr = &mut enc.world.unit_mut(enc.player).cooldowns;
        mgr.set_timings(ActionId::Item(3), vec![SimTime::from_secs(30)])
            .expect("set timings");
        mgr.delay_dps_cooldowns(ARMOR_DEBUFF_DELAY);
    }
    ready(&mut enc);

    let mgr = &enc.world.unit(enc.player).cooldowns;
    let timings = |id| mgr.get(ActionId::Item(id)).map(|m| m.timings().to_vec());
    assert_eq!(timings(1), Some(vec![SimTime::from_secs(10)]));
    assert_eq!(timings(2), Some(vec![]));
    assert_eq!(timings(3), Some(vec![SimTime::from_secs(30)]));
}

#[test]
fn spell_cooldown_casts_the_spell_at_the_primary_target() {
    let mut enc = encounter(SimTime::from_secs(300), 0.5);
    let mut config = fire_nuke(12472, "Icy Veins", 0.0);
    config.gcd = SimTime::ZERO;
    config.cooldown = Some(SimTime::from_secs(180));
    let spell = enc.world.register_spell(enc.player, config).expect("register");
    enc.world
        .add_major_cooldown(
            enc.player,
            MajorCooldownConfig {
                spell: Some(spell),
                ..MajorCooldownConfig::default()
            },
        )
        .expect("add cooldown");
    ready(&mut enc);
    let mut sim = Simulator::default();

    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    assert_eq!(enc.world.spell(spell).casts, 1);
    let unit = enc.world.unit(enc.player);
    let mcd = unit
        .cooldowns
        .get(ActionId::Spell(12472))
        .expect("registered from spell");
    assert!(!mcd.uses_gcd);
    assert_eq!(mcd.usages(), 1);
    assert_eq!(mcd.ready_at(&unit.timers), SimTime::from_secs(180));
}

#[test]
fn reset_rebuilds_cooldowns_for_the_next_iteration() {
    let (mut enc, log) = three_items(|_, _| {});
    let mut sim = Simulator::default();
    try_use_major_cooldowns(&mut sim, &mut enc.world, enc.player);
    enc.world.unit_mut(enc.player).cooldowns.disable(ActionId::Item(1));

    enc.world.reset(1, 1);
    let unit = enc.world.unit(enc.player);
    assert_eq!(unit.cooldowns.len(), 3);
    for m in unit.cooldowns.iter() {
        assert_eq!(m.usages(), 0);
        assert!(m.is_enabled());
        assert!(m.is_ready(&unit.timers, SimTime::ZERO));
    }
    assert_eq!(used(&log).len(), 3);
}

#[test]
fn registration_errors_surface_before_the_fight() {
    let mut enc = encounter(SimTime::from_secs(60), 0.5);
    assert_eq!(
        enc.world
            .add_major_cooldown(enc.player, MajorCooldownConfig::default()),
        Err(ConfigError::MissingActionId)
    );
    assert_eq!(
        enc.world.add_major_cooldown(
            enc.player,
            MajorCooldownConfig {
                action_id: Some(ActionId::Item(5)),
                ..MajorCooldownConfig::default()
            }
        ),
        Err(ConfigError::MissingActivation(ActionId::Item(5)))
    );
    assert!(
        enc.world
            .unit_mut(enc.player)
            .cooldowns
            .set_timings(ActionId::Item(5), vec![SimTime::ZERO])
            .is_err()
    );

    ready(&mut enc);
    let log = UseLog::default();
    let config = item_cooldown(&mut enc.world, enc.player, 6, 0.0, CooldownType::Dps, &log);
    assert_eq!(
        enc.world.add_major_cooldown(enc.player, config),
        Err(ConfigError::Finalized {
            what: "major cooldown"
        })
    );
}
