//! 代理决策循环
//!
//! 每个单位同一时刻最多挂一个有效的 `AgentTurn`：新请求让序号加一，
//! 旧的回合在触发时发现序号不匹配便直接返回。
//! 占 GCD 的施法只有整个 GCD 落在战斗时长之内才会开始。

use super::world::{CombatWorld, combat_world};
use crate::cooldown::try_use_major_cooldowns;
use crate::sim::{Event, PRIORITY_LOW, SimTime, Simulator, World};
use crate::spell::{self, CastFailure, CastStart};
use crate::unit::{AgentAction, UnitId};
use tracing::{debug, trace, warn};

/// 请求在 `at` 时刻让代理决策。已有更早（或同时）的回合挂起时忽略。
pub fn request_agent_turn(sim: &mut Simulator, world: &mut CombatWorld, unit_id: UnitId, at: SimTime) {
    let at = at.max(sim.now());
    if at >= world.duration {
        return;
    }
    let unit = world.unit_mut(unit_id);
    if unit.turn_pending.is_some_and(|pending| pending <= at) {
        return;
    }
    unit.turn_seq += 1;
    unit.turn_pending = Some(at);
    let seq = unit.turn_seq;
    trace!(unit = unit_id.0, seq, at = ?at, "请求代理回合");
    sim.schedule_with_priority(at, PRIORITY_LOW, AgentTurn { unit: unit_id, seq });
}

/// 资源变化、读条完成等事件后唤醒代理（没有代理的单位不做任何事）。
pub fn wake_agent(sim: &mut Simulator, world: &mut CombatWorld, unit_id: UnitId) {
    if world.unit(unit_id).agent.is_none() {
        return;
    }
    let now = sim.now();
    request_agent_turn(sim, world, unit_id, now);
}

/// 代理回合事件。
pub struct AgentTurn {
    pub unit: UnitId,
    pub seq: u64,
}

impl Event for AgentTurn {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AgentTurn { unit, seq } = *self;
        let w = combat_world(world);
        {
            let u = w.unit_mut(unit);
            if u.turn_seq != seq {
                return;
            }
            u.turn_pending = None;
        }
        run_agent_turn(sim, w, unit);
    }
}

#[tracing::instrument(skip(sim, world), fields(now = ?sim.now()))]
fn run_agent_turn(sim: &mut Simulator, world: &mut CombatWorld, unit_id: UnitId) {
    let now = sim.now();
    if now >= world.duration {
        return;
    }
    if let Some(cast) = world.unit(unit_id).casting {
        // 读条完成事件会再唤醒
        trace!(completes_at = ?cast.completes_at, "读条中");
        return;
    }

    try_use_major_cooldowns(sim, world, unit_id);
    // 大招可能开始了读条
    if world.unit(unit_id).is_casting() {
        return;
    }

    let gcd = world.unit(unit_id).gcd;
    if !gcd.is_ready(now) {
        request_agent_turn(sim, world, unit_id, gcd.ready_at());
        return;
    }

    let Some(mut agent) = world.unit_mut(unit_id).agent.take() else {
        return;
    };
    let action = agent.choose_action(sim, world, unit_id);
    let next = match action {
        AgentAction::Wait(at) if at > now => Some(at),
        AgentAction::Wait(at) => {
            warn!(unit = unit_id.0, at = ?at, "代理要求等待到过去的时刻，按空闲处理");
            None
        }
        AgentAction::Idle => None,
        AgentAction::Cast { spell, .. }
            if now.saturating_add(spell::gcd_length(world, spell)) > world.duration =>
        {
            // 放不下完整 GCD 的动作不再开始
            debug!(unit = unit_id.0, spell = spell.0, "GCD 超出战斗结束时间，停止行动");
            None
        }
        AgentAction::Cast { spell, target } => match spell::cast(sim, world, spell, target) {
            Ok(start) => {
                agent.on_action_accepted(sim, world, unit_id, &action);
                match start {
                    CastStart::Instant => Some(world.unit(unit_id).gcd.ready_at().max(sim.now())),
                    CastStart::Casting { .. } => None,
                }
            }
            Err(CastFailure::GcdNotReady { ready_at }) | Err(CastFailure::OnCooldown { ready_at }) => {
                debug!(unit = unit_id.0, spell = spell.0, ready_at = ?ready_at, "施法未就绪，稍后重试");
                Some(ready_at)
            }
            Err(err) => {
                debug!(unit = unit_id.0, spell = spell.0, %err, "施法失败，等待唤醒");
                None
            }
        },
    };
    world.unit_mut(unit_id).agent = Some(agent);

    if let Some(at) = next {
        request_agent_turn(sim, world, unit_id, at);
    }
}
