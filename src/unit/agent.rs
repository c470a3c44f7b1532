//! 代理（轮转策略）接口
//!
//! 代理只负责“下一步做什么”；调度、GCD、冷却检查由编排层负责。

use super::unit::UnitId;
use crate::encounter::CombatWorld;
use crate::sim::{SimTime, Simulator};
use crate::spell::SpellId;

/// 代理给出的下一步动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentAction {
    /// 在指定时刻再来询问（必须晚于当前时刻）。
    Wait(SimTime),
    Cast { spell: SpellId, target: UnitId },
    /// 无事可做，等待资源回复、读条完成等事件唤醒。
    Idle,
}

pub trait UnitBehavior: Send {
    /// 迭代开始前的预置（如战前增益）。
    fn buff_up(&mut self, _sim: &mut Simulator, _world: &mut CombatWorld, _unit: UnitId) {}

    /// 每次迭代重置内部状态。
    fn reset(&mut self) {}

    fn choose_action(&mut self, sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId) -> AgentAction;

    /// 动作被接受（施法成功开始）后回调。
    fn on_action_accepted(
        &mut self,
        _sim: &mut Simulator,
        _world: &mut CombatWorld,
        _unit: UnitId,
        _action: &AgentAction,
    ) {
    }
}
