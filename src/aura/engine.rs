//! 光环的增删、过期与钩子分发
//!
//! 过期通过 `AuraExpire` 事件完成，事件携带世代号；光环被替换、刷新或
//! 提前移除后，旧事件在触发时发现不匹配就什么也不做。

use super::aura::{Aura, AuraBehavior, AuraId, ReplaceContext, ReplaceDecision};
use super::tracker::AuraRecord;
use crate::encounter::{CombatWorld, combat_world};
use crate::log::CombatEventKind;
use crate::resource::ResourceKind;
use crate::sim::{Event, PRIORITY_AURA_EXPIRE, SimTime, Simulator, World};
use crate::spell::{SpellEffect, SpellId};
use crate::unit::UnitId;
use tracing::{debug, trace};

/// 加入光环的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuraAddOutcome {
    Added,
    /// 同标识的旧实例被移除后加入。
    Replaced,
    /// 同标识的旧实例被延长，新实例丢弃。
    Refreshed,
    /// 同标识的旧实例被缩短，新实例丢弃。
    Shortened,
}

/// 在 `unit` 上加入光环。
#[tracing::instrument(skip(sim, world, aura), fields(unit = unit.0, aura = aura.id.0, now = ?sim.now()))]
pub fn add_aura(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId, aura: Aura) -> AuraAddOutcome {
    let now = sim.now();
    let mut outcome = AuraAddOutcome::Added;

    let existing = world
        .unit(unit)
        .auras
        .find(aura.id)
        .map(|r| (r.expires, r.policy));
    if let Some((expires, policy)) = existing {
        if expires <= now {
            // 已到期但过期事件还没轮到
            remove_aura(sim, world, unit, aura.id);
        } else {
            let ctx = ReplaceContext {
                now,
                existing: aura.id,
                incoming: aura.id,
                existing_expires: expires,
                incoming_duration: aura.duration,
            };
            match policy.decide(&ctx) {
                ReplaceDecision::Replace => {
                    remove_aura(sim, world, unit, aura.id);
                    outcome = AuraAddOutcome::Replaced;
                }
                ReplaceDecision::Refresh => {
                    refresh_aura(sim, world, unit, aura.id, aura.duration);
                    return AuraAddOutcome::Refreshed;
                }
                ReplaceDecision::Shorten { expires } => {
                    shorten_aura(sim, world, unit, aura.id, expires);
                    return AuraAddOutcome::Shortened;
                }
            }
        }
    }

    if let Some(tag) = aura.tag {
        let conflicts = world
            .unit(unit)
            .auras
            .conflicts(tag, aura.id, aura.exclusive, now);
        for (other, other_expires, policy) in conflicts {
            let ctx = ReplaceContext {
                now,
                existing: other,
                incoming: aura.id,
                existing_expires: other_expires,
                incoming_duration: aura.duration,
            };
            match policy.decide(&ctx) {
                ReplaceDecision::Replace => {
                    remove_aura(sim, world, unit, other);
                }
                ReplaceDecision::Refresh => {}
                ReplaceDecision::Shorten { expires } => {
                    shorten_aura(sim, world, unit, other, expires);
                }
            }
        }
    }

    let Aura {
        id,
        label,
        action_id,
        tag,
        exclusive,
        duration,
        policy,
        mut behavior,
    } = aura;
    let expires = duration.map_or(SimTime::NEVER, |d| now.saturating_add(d));
    let tracker = &mut world.unit_mut(unit).auras;
    let generation = tracker.alloc_generation();
    debug!(label = %label, expires = ?expires, generation, "获得光环");
    if world.logging() {
        world.log_event(
            now,
            unit,
            CombatEventKind::AuraGained {
                aura: id.0,
                label: label.clone(),
                expires_ns: (!expires.is_never()).then_some(expires.0),
            },
        );
    }
    world.unit_mut(unit).auras.push(AuraRecord {
        id,
        label,
        action_id,
        tag,
        exclusive,
        policy,
        gained_at: now,
        expires,
        generation,
        behavior: None,
    });
    if !expires.is_never() {
        sim.schedule_with_priority(
            expires,
            PRIORITY_AURA_EXPIRE,
            AuraExpire {
                unit,
                aura: id,
                generation,
            },
        );
    }

    behavior.on_gain(sim, world, unit);
    restore_behavior(sim, world, unit, id, generation, behavior);
    outcome
}

fn refresh_aura(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit: UnitId,
    id: AuraId,
    duration: Option<SimTime>,
) {
    let now = sim.now();
    let expires = duration.map_or(SimTime::NEVER, |d| now.saturating_add(d));
    let tracker = &mut world.unit_mut(unit).auras;
    let Some(record) = tracker.find_mut(id) else {
        return;
    };
    record.expires = expires;
    let generation = record.generation;
    let label = record.label.clone();
    tracker.record_refresh(id);
    trace!(unit = unit.0, aura = id.0, expires = ?expires, "刷新光环");
    if world.logging() {
        world.log_event(
            now,
            unit,
            CombatEventKind::AuraRefreshed {
                aura: id.0,
                label,
                expires_ns: (!expires.is_never()).then_some(expires.0),
            },
        );
    }
    if !expires.is_never() {
        sim.schedule_with_priority(
            expires,
            PRIORITY_AURA_EXPIRE,
            AuraExpire {
                unit,
                aura: id,
                generation,
            },
        );
    }
}

/// 把光环缩短到 `expires`；不会延长。
fn shorten_aura(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId, id: AuraId, expires: SimTime) {
    let now = sim.now();
    let Some(record) = world.unit_mut(unit).auras.find_mut(id) else {
        return;
    };
    if expires >= record.expires {
        return;
    }
    let expires = expires.max(now);
    record.expires = expires;
    let generation = record.generation;
    let label = record.label.clone();
    trace!(unit = unit.0, aura = id.0, expires = ?expires, "缩短光环");
    if world.logging() {
        world.log_event(
            now,
            unit,
            CombatEventKind::AuraShortened {
                aura: id.0,
                label,
                expires_ns: expires.0,
            },
        );
    }
    sim.schedule_with_priority(
        expires,
        PRIORITY_AURA_EXPIRE,
        AuraExpire {
            unit,
            aura: id,
            generation,
        },
    );
}

/// 移除光环。幂等：不存在时返回 false。
#[tracing::instrument(skip(sim, world), fields(now = ?sim.now()))]
pub fn remove_aura(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId, id: AuraId) -> bool {
    let now = sim.now();
    let Some(record) = world.unit_mut(unit).auras.take_record(id, now) else {
        return false;
    };
    debug!(label = %record.label, "光环消失");
    if world.logging() {
        world.log_event(
            now,
            unit,
            CombatEventKind::AuraExpired {
                aura: id.0,
                label: record.label.clone(),
            },
        );
    }
    // 行为被借出时由归还方补调 on_expire
    if let Some(mut behavior) = record.behavior {
        behavior.on_expire(sim, world, unit);
    }
    true
}

/// 移除带某标签的全部光环，返回移除个数。
pub fn remove_auras_with_tag(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId, tag: &str) -> usize {
    let now = sim.now();
    let ids: Vec<AuraId> = world
        .unit(unit)
        .auras
        .active_ids(now)
        .into_iter()
        .filter(|id| {
            world
                .unit(unit)
                .auras
                .find(*id)
                .is_some_and(|r| r.tag == Some(tag))
        })
        .collect();
    ids.into_iter()
        .filter(|id| remove_aura(sim, world, unit, *id))
        .count()
}

/// 激活单位的全部永久光环（迭代开始时）。
pub fn activate_permanent_auras(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId) {
    for factory in world.unit(unit).auras.permanent_factories() {
        let aura = factory(unit);
        add_aura(sim, world, unit, aura);
    }
}

fn restore_behavior(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit: UnitId,
    id: AuraId,
    generation: u64,
    behavior: Box<dyn AuraBehavior>,
) {
    if let Err(mut behavior) = world.unit_mut(unit).auras.checkin(id, generation, behavior) {
        // 钩子执行期间光环已被移除
        behavior.on_expire(sim, world, unit);
    }
}

fn dispatch(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit: UnitId,
    mut f: impl FnMut(&mut dyn AuraBehavior, &mut Simulator, &mut CombatWorld),
) {
    let handles = world.unit(unit).auras.active_handles(sim.now());
    for (id, generation) in handles {
        let now = sim.now();
        let Some(mut behavior) = world.unit_mut(unit).auras.checkout(id, generation, now) else {
            continue;
        };
        f(behavior.as_mut(), sim, world);
        restore_behavior(sim, world, unit, id, generation, behavior);
    }
}

pub fn dispatch_before_spell_hit(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit: UnitId,
    spell: SpellId,
    effect: &mut SpellEffect,
) {
    dispatch(sim, world, unit, |b, sim, world| {
        b.on_before_spell_hit(sim, world, unit, spell, effect)
    });
}

pub fn dispatch_spell_hit(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit: UnitId,
    spell: SpellId,
    effect: &mut SpellEffect,
) {
    dispatch(sim, world, unit, |b, sim, world| {
        b.on_spell_hit(sim, world, unit, spell, effect)
    });
}

pub fn dispatch_periodic_damage(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    unit: UnitId,
    spell: SpellId,
    effect: &mut SpellEffect,
) {
    dispatch(sim, world, unit, |b, sim, world| {
        b.on_periodic_damage(sim, world, unit, spell, effect)
    });
}

pub fn dispatch_cast(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId, spell: SpellId) {
    dispatch(sim, world, unit, |b, sim, world| b.on_cast(sim, world, unit, spell));
}

pub fn dispatch_cast_complete(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId, spell: SpellId) {
    dispatch(sim, world, unit, |b, sim, world| {
        b.on_cast_complete(sim, world, unit, spell)
    });
}

pub fn dispatch_resource_tick(sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId, kind: ResourceKind) {
    dispatch(sim, world, unit, |b, sim, world| {
        b.on_resource_tick(sim, world, unit, kind)
    });
}

/// 光环过期事件（按世代守卫）。
pub struct AuraExpire {
    pub unit: UnitId,
    pub aura: AuraId,
    pub generation: u64,
}

impl Event for AuraExpire {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AuraExpire {
            unit,
            aura,
            generation,
        } = *self;
        let w = combat_world(world);
        let due = w
            .unit(unit)
            .auras
            .find(aura)
            .is_some_and(|r| r.generation == generation && r.expires <= sim.now());
        if due {
            remove_aura(sim, w, unit, aura);
        }
    }
}
