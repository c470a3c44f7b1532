//! 按优先级施法的代理

use crate::encounter::CombatWorld;
use crate::sim::{SimTime, Simulator};
use crate::spell::{CastFailure, SpellId, can_cast};
use crate::unit::{AgentAction, UnitBehavior, UnitId};

/// 施放列表中第一个能施放的技能；都在冷却则等到最早就绪的那个；
/// 都缺资源则空闲，等回复跳动唤醒。
#[derive(Debug, Clone, Default)]
pub struct PriorityRotation {
    pub priorities: Vec<SpellId>,
}

impl PriorityRotation {
    pub fn new(priorities: Vec<SpellId>) -> Self {
        Self { priorities }
    }
}

impl UnitBehavior for PriorityRotation {
    fn choose_action(&mut self, sim: &mut Simulator, world: &mut CombatWorld, _unit: UnitId) -> AgentAction {
        let now = sim.now();
        let target = world.primary_target();
        let mut earliest: Option<SimTime> = None;
        for &spell in &self.priorities {
            match can_cast(world, spell, now) {
                Ok(()) => return AgentAction::Cast { spell, target },
                Err(CastFailure::OnCooldown { ready_at }) | Err(CastFailure::GcdNotReady { ready_at }) => {
                    earliest = Some(earliest.map_or(ready_at, |e| e.min(ready_at)));
                }
                Err(_) => {}
            }
        }
        match earliest {
            Some(at) if at > now => AgentAction::Wait(at),
            _ => AgentAction::Idle,
        }
    }
}
