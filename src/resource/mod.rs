//! 资源条：能量、怒气、法力
//!
//! 资源条本身只管数值与边界；这里的函数在数值之外负责记账、写战斗日志、
//! 触发资源钩子并唤醒代理。

mod energy;
mod mana;
mod pool;
mod rage;

pub use energy::{DEFAULT_MAX_ENERGY, ENERGY_PER_TICK, ENERGY_TICK_INTERVAL, EnergyBar};
pub use mana::{MANA_TICK_INTERVAL, ManaBar, mana_per_tick};
pub use rage::{DEFAULT_MAX_RAGE, RAGE_CONVERSION_70, RageBar, rage_from_white_hit};

use crate::aura;
use crate::encounter::{CombatWorld, combat_world, wake_agent};
use crate::log::CombatEventKind;
use crate::sim::{Event, PRIORITY_REGEN, Simulator, World};
use crate::spell::{ActionId, OtherAction};
use crate::stats::Stat;
use crate::unit::UnitId;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Mana,
    Energy,
    Rage,
}

/// 给单位增加资源，返回实际增加量。没有对应资源条时什么也不做。
///
/// 获得怒气会触发 `on_resource_tick`，能量与法力的钩子只在回复跳动时触发。
pub fn add_resource(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit_id: UnitId,
    kind: ResourceKind,
    amount: f64,
    action: ActionId,
) -> f64 {
    let unit = world.unit_mut(unit_id);
    let (gained, current) = match kind {
        ResourceKind::Energy => match unit.energy.as_mut() {
            Some(bar) => (bar.add(amount), bar.current()),
            None => return 0.0,
        },
        ResourceKind::Rage => match unit.rage.as_mut() {
            Some(bar) => (bar.add(amount), bar.current()),
            None => return 0.0,
        },
        ResourceKind::Mana => match unit.mana.as_mut() {
            Some(bar) => (bar.add(amount), bar.current()),
            None => return 0.0,
        },
    };
    unit.metrics.record_gain(action, kind, amount, gained);
    trace!(unit = unit_id.0, ?kind, %action, requested = amount, gained, current, "获得资源");
    if world.logging() {
        world.log_event(
            sim.now(),
            unit_id,
            CombatEventKind::ResourceGain {
                resource: kind,
                action,
                requested: amount,
                gained,
                current,
            },
        );
    }
    if kind == ResourceKind::Rage {
        aura::dispatch_resource_tick(sim, world, unit_id, kind);
        wake_agent(sim, world, unit_id);
    }
    gained
}

/// 消耗资源。超额消耗或负数是逻辑错误（panic）。
pub fn spend_resource(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit_id: UnitId,
    kind: ResourceKind,
    amount: f64,
    action: ActionId,
) {
    let unit = world.unit_mut(unit_id);
    let current = match kind {
        ResourceKind::Energy => unit.energy.as_mut().map(|bar| {
            bar.spend(amount);
            bar.current()
        }),
        ResourceKind::Rage => unit.rage.as_mut().map(|bar| {
            bar.spend(amount);
            bar.current()
        }),
        ResourceKind::Mana => unit.mana.as_mut().map(|bar| {
            bar.spend(amount);
            bar.current()
        }),
    };
    let Some(current) = current else {
        panic!("{} has no {kind:?} bar to spend {amount} from", unit.label);
    };
    unit.metrics.record_spend(action, kind, amount);
    trace!(unit = unit_id.0, ?kind, %action, amount, current, "消耗资源");
    if world.logging() {
        world.log_event(
            sim.now(),
            unit_id,
            CombatEventKind::ResourceSpend {
                resource: kind,
                action,
                amount,
                current,
            },
        );
    }
}

/// 为单位启动周期回复（迭代开始时调用）。
pub fn start_regen(sim: &mut Simulator, world: &CombatWorld, unit_id: UnitId) {
    let unit = world.unit(unit_id);
    let now = sim.now();
    if unit.energy.is_some() {
        sim.schedule_with_priority(
            now.saturating_add(ENERGY_TICK_INTERVAL),
            PRIORITY_REGEN,
            EnergyTick { unit: unit_id },
        );
    }
    if unit.mana.as_ref().is_some_and(|m| m.regen_enabled) {
        sim.schedule_with_priority(
            now.saturating_add(MANA_TICK_INTERVAL),
            PRIORITY_REGEN,
            ManaTick { unit: unit_id },
        );
    }
}

/// 能量回复跳动；自我重复调度。
pub struct EnergyTick {
    pub unit: UnitId,
}

impl Event for EnergyTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let EnergyTick { unit } = *self;
        let w = combat_world(world);
        let Some(amount) = w.unit_mut(unit).energy.as_mut().map(|b| b.take_tick_amount()) else {
            return;
        };
        add_resource(
            sim,
            w,
            unit,
            ResourceKind::Energy,
            amount,
            ActionId::Other(OtherAction::EnergyRegen),
        );
        aura::dispatch_resource_tick(sim, w, unit, ResourceKind::Energy);
        wake_agent(sim, w, unit);

        let next = sim.now().saturating_add(ENERGY_TICK_INTERVAL);
        sim.schedule_with_priority(next, PRIORITY_REGEN, EnergyTick { unit });
    }
}

/// 法力回复跳动（MP5）；自我重复调度。
pub struct ManaTick {
    pub unit: UnitId,
}

impl Event for ManaTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let ManaTick { unit } = *self;
        let w = combat_world(world);
        if w.unit(unit).mana.is_none() {
            return;
        }
        let amount = mana_per_tick(w.unit(unit).stats[Stat::Mp5]);
        if amount > 0.0 {
            add_resource(
                sim,
                w,
                unit,
                ResourceKind::Mana,
                amount,
                ActionId::Other(OtherAction::ManaRegen),
            );
        }
        aura::dispatch_resource_tick(sim, w, unit, ResourceKind::Mana);
        wake_agent(sim, w, unit);

        let next = sim.now().saturating_add(MANA_TICK_INTERVAL);
        sim.schedule_with_priority(next, PRIORITY_REGEN, ManaTick { unit });
    }
}
