//! 周期伤害（DoT）
//!
//! 施加时在目标身上挂一个可见光环，并按固定间隔调度跳动事件。
//! 每次施加换一个世代号，旧世代的跳动在触发时发现不匹配便不做任何事。

use super::SpellId;
use super::effect::SpellEffect;
use super::pipeline::apply_effect;
use super::proc_mask::ProcMask;
use super::spell::ApplyEffects;
use crate::aura::{self, Aura, AuraId};
use crate::encounter::{CombatWorld, combat_world};
use crate::sim::{Event, PRIORITY_DOT, SimTime, Simulator, World};
use crate::unit::UnitId;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DotConfig {
    pub label: String,
    /// 目标身上的光环；注册时若为空会自动分配。
    pub aura_id: Option<AuraId>,
    pub num_ticks: u32,
    pub tick_length: SimTime,
    pub tick_effect: SpellEffect,
}

impl DotConfig {
    pub fn duration(&self) -> SimTime {
        SimTime(self.tick_length.0.saturating_mul(u64::from(self.num_ticks)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DotState {
    pub generation: u64,
    pub ticks_remaining: u32,
}

/// 施加（或覆盖）`spell` 在 `target` 上的周期伤害。
pub(crate) fn apply_dot(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    spell_id: SpellId,
    target: UnitId,
    dot: &DotConfig,
) {
    if dot.num_ticks == 0 {
        return;
    }
    let now = sim.now();
    let generation = {
        let spell = world.spell_mut(spell_id);
        spell.next_dot_generation += 1;
        let generation = spell.next_dot_generation;
        spell.dots.insert(
            target,
            DotState {
                generation,
                ticks_remaining: dot.num_ticks,
            },
        );
        generation
    };
    debug!(spell = spell_id.0, target = target.0, generation, now = ?now, "施加周期伤害");

    if let Some(aura_id) = dot.aura_id {
        let action_id = world.spell(spell_id).action_id;
        aura::add_aura(
            sim,
            world,
            target,
            Aura::new(aura_id, dot.label.clone())
                .with_action(action_id)
                .with_duration(dot.duration()),
        );
    }

    sim.schedule_with_priority(
        now.saturating_add(dot.tick_length),
        PRIORITY_DOT,
        DotTick {
            spell: spell_id,
            target,
            generation,
        },
    );
}

/// 周期伤害跳动事件。
pub struct DotTick {
    pub spell: SpellId,
    pub target: UnitId,
    pub generation: u64,
}

impl Event for DotTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DotTick {
            spell,
            target,
            generation,
        } = *self;
        let w = combat_world(world);

        match w.spell(spell).dots.get(&target) {
            Some(state) if state.generation == generation => {}
            _ => return,
        }
        let (mut effect, tick_length) = match &w.spell(spell).apply_effects {
            ApplyEffects::Dot { dot, .. } => (dot.tick_effect.clone(), dot.tick_length),
            _ => return,
        };
        effect.target = target;
        effect.is_periodic = true;
        effect.proc_mask |= ProcMask::PERIODIC_DAMAGE;
        apply_effect(sim, w, spell, effect);

        // 钩子里可能覆盖或清除了这个 DoT
        let now = sim.now();
        let spell_ref = w.spell_mut(spell);
        let Some(state) = spell_ref.dots.get_mut(&target) else {
            return;
        };
        if state.generation != generation {
            return;
        }
        state.ticks_remaining = state.ticks_remaining.saturating_sub(1);
        if state.ticks_remaining == 0 {
            spell_ref.dots.remove(&target);
            return;
        }
        sim.schedule_with_priority(
            now.saturating_add(tick_length),
            PRIORITY_DOT,
            DotTick {
                spell,
                target,
                generation,
            },
        );
    }
}
