use super::fixture::{encounter, ready};
use crate::resource::{
    self, ENERGY_PER_TICK, EnergyBar, ManaBar, RAGE_CONVERSION_70, RageBar, ResourceKind,
    mana_per_tick, rage_from_white_hit,
};
use crate::sim::{SimTime, Simulator};
use crate::spell::{ActionId, OtherAction};
use crate::stats::{Stat, Stats};

#[test]
fn energy_regenerates_every_two_seconds() {
    let mut enc = encounter(SimTime::from_secs(60), 0.5);
    enc.world.unit_mut(enc.player).energy = Some(EnergyBar::new(100.0, 0.0));
    ready(&mut enc);
    let mut sim = Simulator::default();

    resource::start_regen(&mut sim, &enc.world, enc.player);
    sim.run_until(SimTime::from_secs(8), &mut enc.world);

    let energy = enc.world.unit(enc.player).resource_available(ResourceKind::Energy);
    let energy = energy.expect("energy bar");
    assert!((energy - 4.0 * ENERGY_PER_TICK).abs() < 1e-9, "energy = {energy}");
    assert!((energy - 80.8).abs() < 1e-9);

    let regen = enc
        .world
        .unit(enc.player)
        .metrics
        .resource(ActionId::Other(OtherAction::EnergyRegen), ResourceKind::Energy);
    assert_eq!(regen.gain_events, 4);
}

#[test]
fn energy_overflow_is_tracked_separately_from_gain() {
    let mut enc = encounter(SimTime::from_secs(60), 0.5);
    enc.world.unit_mut(enc.player).energy = Some(EnergyBar::new(100.0, 90.0));
    ready(&mut enc);
    let mut sim = Simulator::default();

    let gained = resource::add_resource(
        &mut sim,
        &mut enc.world,
        enc.player,
        ResourceKind::Energy,
        25.0,
        ActionId::Spell(13750),
    );
    assert_eq!(gained, 10.0);
    let m = enc
        .world
        .unit(enc.player)
        .metrics
        .resource(ActionId::Spell(13750), ResourceKind::Energy);
    assert_eq!((m.requested, m.gained), (25.0, 10.0));
}

#[test]
fn energy_tick_adjustment_applies_once() {
    let mut bar = EnergyBar::new(100.0, 0.0);
    bar.next_tick_adjustment = 5.0;
    bar.tick_multiplier = 2.0;
    assert_eq!(bar.take_tick_amount(), ENERGY_PER_TICK * 2.0 + 5.0);
    assert_eq!(bar.take_tick_amount(), ENERGY_PER_TICK * 2.0);
}

#[test]
fn energy_bar_reset_restores_initial_value() {
    let mut bar = EnergyBar::new(120.0, 40.0);
    bar.add(50.0);
    bar.spend(20.0);
    bar.reset();
    assert_eq!((bar.current(), bar.max()), (40.0, 120.0));
}

#[test]
#[should_panic(expected = "trying to spend")]
fn overspending_energy_panics() {
    let mut bar = EnergyBar::new(100.0, 30.0);
    bar.spend(30.5);
}

#[test]
#[should_panic(expected = "cannot gain negative Rage")]
fn negative_rage_gain_panics() {
    RageBar::new(10.0).add(-1.0);
}

#[test]
#[should_panic(expected = "trying to spend 1 Mana with only 0 available")]
fn overspending_an_empty_mana_bar_names_the_resource() {
    ManaBar::new(false).spend(1.0);
}

#[test]
#[should_panic(expected = "has no Rage bar")]
fn spending_from_a_missing_bar_panics() {
    let mut enc = encounter(SimTime::from_secs(60), 0.5);
    ready(&mut enc);
    let mut sim = Simulator::default();
    resource::spend_resource(
        &mut sim,
        &mut enc.world,
        enc.player,
        ResourceKind::Rage,
        10.0,
        ActionId::Spell(25231),
    );
}

#[test]
fn rage_is_capped_at_one_hundred() {
    let mut bar = RageBar::new(90.0);
    assert_eq!(bar.add(30.0), 10.0);
    assert_eq!(bar.current(), 100.0);
    bar.spend(15.0);
    assert_eq!(bar.current(), 85.0);
    bar.reset();
    assert_eq!(bar.current(), 90.0);
}

#[test]
fn white_hit_rage_follows_the_conversion_formula() {
    let hit = rage_from_white_hit(1000.0, false, false, 2.6, 70);
    let expected = 15.0 * 1000.0 / (4.0 * RAGE_CONVERSION_70) + 3.5 * 2.6 / 2.0;
    assert!((hit - expected).abs() < 1e-9);

    let crit = rage_from_white_hit(1000.0, true, false, 2.6, 70);
    assert!(crit > hit);
    let offhand = rage_from_white_hit(1000.0, false, true, 2.6, 70);
    assert!(offhand < hit);

    // 伤害很小时受 15 × 伤害 / c 的上限约束
    let tiny = rage_from_white_hit(10.0, false, false, 3.8, 70);
    assert!((tiny - 15.0 * 10.0 / RAGE_CONVERSION_70).abs() < 1e-9);
    assert_eq!(rage_from_white_hit(0.0, true, false, 2.6, 70), 0.0);
}

#[test]
fn mana_pool_comes_from_stats_and_regenerates_from_mp5() {
    let mut enc = encounter(SimTime::from_secs(60), 0.5);
    enc.world.unit_mut(enc.player).mana = Some(ManaBar::new(true));
    enc.world
        .unit_mut(enc.player)
        .add_base_stats(&Stats::from_pairs(&[(Stat::Mana, 1000.0), (Stat::Mp5, 50.0)]))
        .expect("base stats");
    ready(&mut enc);
    let mut sim = Simulator::default();

    assert_eq!(enc.world.unit(enc.player).resource_available(ResourceKind::Mana), Some(1000.0));
    resource::spend_resource(
        &mut sim,
        &mut enc.world,
        enc.player,
        ResourceKind::Mana,
        300.0,
        ActionId::Spell(27209),
    );
    resource::start_regen(&mut sim, &enc.world, enc.player);
    sim.run_until(SimTime::from_secs(4), &mut enc.world);

    assert_eq!(mana_per_tick(50.0), 20.0);
    assert_eq!(enc.world.unit(enc.player).resource_available(ResourceKind::Mana), Some(740.0));
}

#[test]
fn mana_without_regen_schedules_no_ticks() {
    let mut enc = encounter(SimTime::from_secs(60), 0.5);
    enc.world.unit_mut(enc.player).mana = Some(ManaBar::new(false));
    ready(&mut enc);
    let mut sim = Simulator::default();

    resource::start_regen(&mut sim, &enc.world, enc.player);
    assert_eq!(sim.pending(), 0);
}
