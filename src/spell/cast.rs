//! 施法流程
//!
//! 检查（读条中、GCD、冷却、资源）全部在任何状态修改之前完成；通过后
//! 扣除消耗、启动 GCD 与冷却、触发施法钩子。有读条时间的技能登记为
//! “正在读条”并调度完成事件；瞬发技能立即生效。

use super::SpellId;
use super::constants::GCD_MIN;
use super::dot::apply_dot;
use super::pipeline::apply_effect;
use super::spell::ApplyEffects;
use crate::aura;
use crate::encounter::{CombatWorld, combat_world, wake_agent};
use crate::log::CombatEventKind;
use crate::resource::{self, ResourceKind};
use crate::sim::{Event, PRIORITY_DEFAULT, SimTime, Simulator, World};
use crate::unit::{CastInProgress, UnitId};
use tracing::{debug, trace};

/// 施法失败原因（正常的运行期结果，不是错误）。
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CastFailure {
    #[error("already casting")]
    AlreadyCasting,
    #[error("global cooldown not ready until {ready_at}")]
    GcdNotReady { ready_at: SimTime },
    #[error("on cooldown until {ready_at}")]
    OnCooldown { ready_at: SimTime },
    #[error("not enough {kind:?}: need {needed}, have {available}")]
    NotEnoughResource {
        kind: ResourceKind,
        needed: f64,
        available: f64,
    },
    #[error("unit has no {kind:?} bar")]
    NoResourceBar { kind: ResourceKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastStart {
    Instant,
    Casting { completes_at: SimTime },
}

/// 只读检查：此刻能否施放。
pub fn can_cast(world: &CombatWorld, spell_id: SpellId, now: SimTime) -> Result<(), CastFailure> {
    let spell = world.spell(spell_id);
    let unit = world.unit(spell.unit);

    if unit.casting.is_some() {
        return Err(CastFailure::AlreadyCasting);
    }
    if spell.gcd > SimTime::ZERO && !unit.gcd.is_ready(now) {
        return Err(CastFailure::GcdNotReady {
            ready_at: unit.gcd.ready_at(),
        });
    }
    for cd in [spell.cooldown, spell.shared_cooldown].into_iter().flatten() {
        if !cd.is_ready(&unit.timers, now) {
            return Err(CastFailure::OnCooldown {
                ready_at: cd.ready_at(&unit.timers),
            });
        }
    }
    if let Some(kind) = spell.resource {
        if spell.cost > 0.0 {
            let Some(available) = unit.resource_available(kind) else {
                return Err(CastFailure::NoResourceBar { kind });
            };
            if available < spell.cost {
                return Err(CastFailure::NotEnoughResource {
                    kind,
                    needed: spell.cost,
                    available,
                });
            }
        }
    }
    Ok(())
}

/// 施放后 GCD 的实际长度（受急速影响，不低于 `GCD_MIN`）；不占 GCD 的技能为零。
pub fn gcd_length(world: &CombatWorld, spell_id: SpellId) -> SimTime {
    let spell = world.spell(spell_id);
    if spell.gcd == SimTime::ZERO || spell.flags.ignore_haste {
        return spell.gcd;
    }
    let speed = world.unit(spell.unit).cast_speed();
    spell.gcd.mul_f64(1.0 / speed).max(GCD_MIN)
}

/// 施放技能。
#[tracing::instrument(skip(sim, world), fields(now = ?sim.now()))]
pub fn cast(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    spell_id: SpellId,
    target: UnitId,
) -> Result<CastStart, CastFailure> {
    let now = sim.now();
    can_cast(world, spell_id, now)?;

    let spell = world.spell(spell_id);
    let unit_id = spell.unit;
    let action = spell.action_id;
    let cost = spell.cost;
    let resource = spell.resource;
    let ignore_haste = spell.flags.ignore_haste;
    let base_cast_time = spell.cast_time;
    let cooldowns = [spell.cooldown, spell.shared_cooldown];

    if let Some(kind) = resource {
        if cost > 0.0 {
            resource::spend_resource(sim, world, unit_id, kind, cost, action);
        }
    }

    let speed = if ignore_haste {
        1.0
    } else {
        world.unit(unit_id).cast_speed()
    };
    let gcd = gcd_length(world, spell_id);
    {
        let unit = world.unit_mut(unit_id);
        if gcd > SimTime::ZERO {
            unit.gcd.start(now, gcd);
        }
        for cd in cooldowns.into_iter().flatten() {
            cd.start(&mut unit.timers, now);
        }
    }
    world.spell_mut(spell_id).casts += 1;

    let cast_time = base_cast_time.mul_f64(1.0 / speed);
    debug!(spell = %world.spell(spell_id).label, unit = unit_id.0, cast_time = ?cast_time, "开始施法");

    aura::dispatch_cast(sim, world, unit_id, spell_id);

    if cast_time > SimTime::ZERO {
        let completes_at = now.saturating_add(cast_time);
        let unit = world.unit_mut(unit_id);
        unit.cast_seq += 1;
        let seq = unit.cast_seq;
        unit.casting = Some(CastInProgress {
            seq,
            spell: spell_id,
            target,
            started_at: now,
            completes_at,
        });
        if world.logging() {
            world.log_event(
                now,
                unit_id,
                CombatEventKind::CastStart {
                    action,
                    target: target.0,
                    completes_ns: completes_at.0,
                },
            );
        }
        sim.schedule_with_priority(completes_at, PRIORITY_DEFAULT, CastComplete { unit: unit_id, seq });
        Ok(CastStart::Casting { completes_at })
    } else {
        if world.logging() {
            world.log_event(
                now,
                unit_id,
                CombatEventKind::CastStart {
                    action,
                    target: target.0,
                    completes_ns: now.0,
                },
            );
        }
        complete_cast(sim, world, spell_id, target);
        Ok(CastStart::Instant)
    }
}

/// 打断读条。消耗不返还；挂起的完成事件会因序号不匹配而失效。
pub fn interrupt_cast(sim: &mut Simulator, world: &mut CombatWorld, unit_id: UnitId) -> bool {
    let Some(casting) = world.unit_mut(unit_id).casting.take() else {
        return false;
    };
    debug!(unit = unit_id.0, spell = casting.spell.0, now = ?sim.now(), "读条被打断");
    if world.logging() {
        let action = world.spell(casting.spell).action_id;
        world.log_event(sim.now(), unit_id, CombatEventKind::CastInterrupted { action });
    }
    true
}

fn complete_cast(sim: &mut Simulator, world: &mut CombatWorld, spell_id: SpellId, target: UnitId) {
    let unit_id = world.spell(spell_id).unit;
    aura::dispatch_cast_complete(sim, world, unit_id, spell_id);
    if world.logging() {
        let action = world.spell(spell_id).action_id;
        world.log_event(
            sim.now(),
            unit_id,
            CombatEventKind::CastComplete {
                action,
                target: target.0,
            },
        );
    }
    apply_spell_effects(sim, world, spell_id, target);
}

/// 不经过施法检查、消耗与冷却，直接让技能生效（触发类技能）。
pub fn trigger_spell(sim: &mut Simulator, world: &mut CombatWorld, spell_id: SpellId, target: UnitId) {
    world.spell_mut(spell_id).casts += 1;
    trace!(spell = spell_id.0, target = target.0, "触发技能");
    apply_spell_effects(sim, world, spell_id, target);
}

/// 按 `ApplyEffects` 把技能作用到目标。
pub fn apply_spell_effects(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    spell_id: SpellId,
    target: UnitId,
) {
    match world.spell(spell_id).apply_effects.clone() {
        ApplyEffects::None => {}
        ApplyEffects::Direct(mut effect) => {
            effect.target = target;
            let result = apply_effect(sim, world, spell_id, effect);
            if !result.landed() {
                refund_on_miss(sim, world, spell_id);
            }
        }
        ApplyEffects::Aoe {
            effect,
            max_targets,
        } => {
            let limit = max_targets.unwrap_or(usize::MAX);
            let targets: Vec<UnitId> = world.targets.iter().copied().take(limit).collect();
            for t in targets {
                let mut e = effect.clone();
                e.target = t;
                apply_effect(sim, world, spell_id, e);
            }
        }
        ApplyEffects::Dot { apply, dot } => {
            if let Some(mut initial) = apply {
                initial.target = target;
                let result = apply_effect(sim, world, spell_id, initial);
                if !result.landed() {
                    refund_on_miss(sim, world, spell_id);
                    return;
                }
            }
            apply_dot(sim, world, spell_id, target, &dot);
        }
        ApplyEffects::Custom(f) => f(sim, world, spell_id, target),
    }
}

fn refund_on_miss(sim: &mut Simulator, world: &mut CombatWorld, spell_id: SpellId) {
    let spell = world.spell(spell_id);
    let (Some(kind), fraction) = (spell.resource, spell.refund_on_miss) else {
        return;
    };
    if fraction <= 0.0 || spell.cost <= 0.0 {
        return;
    }
    let amount = spell.cost * fraction;
    let (unit, action) = (spell.unit, spell.action_id);
    resource::add_resource(sim, world, unit, kind, amount, action);
}

/// 读条完成事件（按序号守卫）。
pub struct CastComplete {
    pub unit: UnitId,
    pub seq: u64,
}

impl Event for CastComplete {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let CastComplete { unit, seq } = *self;
        let w = combat_world(world);
        let casting = match w.unit(unit).casting {
            Some(c) if c.seq == seq => c,
            _ => return,
        };
        w.unit_mut(unit).casting = None;
        complete_cast(sim, w, casting.spell, casting.target);
        wake_agent(sim, w, unit);
    }
}
