//! 测试共用的小型遭遇：一个玩家、一个目标、固定的随机数。

use crate::encounter::CombatWorld;
use crate::random::ConstantDraw;
use crate::sim::SimTime;
use crate::spell::{
    ActionId, ApplyEffects, BaseDamage, OutcomeApplier, SpellConfig, SpellEffect, SpellSchool,
};
use crate::unit::UnitId;

pub(super) struct Encounter {
    pub world: CombatWorld,
    pub player: UnitId,
    pub target: UnitId,
}

/// 未定版的遭遇；所有掷骰都返回 `draw`。
pub(super) fn encounter(duration: SimTime, draw: f64) -> Encounter {
    let mut world = CombatWorld::with_rng(duration, Box::new(ConstantDraw(draw)));
    let player = world.add_player("player", 70).expect("add player");
    let target = world.add_target("boss", 73).expect("add target");
    Encounter {
        world,
        player,
        target,
    }
}

/// 定版并重置，相当于一次迭代开始前的状态。
pub(super) fn ready(enc: &mut Encounter) {
    enc.world.finalize().expect("finalize");
    enc.world.reset(0, 0);
}

/// 必中的火焰瞬发技能，固定伤害。
pub(super) fn fire_nuke(id: u32, label: &str, damage: f64) -> SpellConfig {
    let mut config = SpellConfig::new(ActionId::Spell(id), label);
    config.school = SpellSchool::Fire;
    config.apply_effects = ApplyEffects::Direct(SpellEffect {
        base_damage: BaseDamage::Flat(damage),
        outcome_applier: OutcomeApplier::AlwaysHit,
        ..SpellEffect::default()
    });
    config
}
