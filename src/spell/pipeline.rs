//! 效果结算流水线
//!
//! 初始化 → 施法者/目标的命中前钩子 → 基础伤害 → 攻击者倍率 → 抗性/护甲
//! → 目标倍率 → 结算掷骰 → 统计与仇恨 → 命中后触发（效果、施法者、目标）。

use super::SpellId;
use super::action_id::{ActionId, OtherAction};
use super::effect::{DamageContext, SpellEffect};
use super::outcome::{HitOutcome, OutcomeContext};
use super::proc_mask::ProcMask;
use crate::aura;
use crate::encounter::CombatWorld;
use crate::log::CombatEventKind;
use crate::resource::{self, ResourceKind, rage_from_white_hit};
use crate::sim::Simulator;
use tracing::trace;

/// 把一个效果结算到 `effect.target` 上，返回带结果的效果。
#[tracing::instrument(skip_all, fields(spell = spell_id.0, target = effect.target.0))]
pub fn apply_effect(
    sim: &mut Simulator,
    world: &mut CombatWorld,
    spell_id: SpellId,
    mut effect: SpellEffect,
) -> SpellEffect {
    let caster_id = world.spell(spell_id).unit;
    let target_id = effect.target;

    // 初始化阶段：效果自身钩子，然后施法者、目标身上的光环
    if let Some(hook) = effect.on_init.clone() {
        hook(sim, world, spell_id, &mut effect);
    }
    aura::dispatch_before_spell_hit(sim, world, caster_id, spell_id, &mut effect);
    if target_id != caster_id {
        aura::dispatch_before_spell_hit(sim, world, target_id, spell_id, &mut effect);
    }

    {
        let (caster, target, spell, rng) = world.resolve_parts(caster_id, target_id, spell_id);
        let mut damage = {
            let mut ctx = DamageContext {
                caster,
                target,
                spell,
                effect: &effect,
                rng: &mut *rng,
            };
            effect.base_damage.calculate(&mut ctx)
        };

        if !spell.flags.ignore_modifiers {
            effect.apply_attacker_modifiers(caster, spell, &mut damage);
            effect.apply_resistances(caster, target, spell, &mut damage);
            effect.apply_target_modifiers(target, spell, &mut damage);
        }
        effect.preoutcome_damage = damage;

        let applier = effect.outcome_applier;
        let mut octx = OutcomeContext {
            caster,
            target,
            spell,
            rng,
        };
        applier.apply(&mut octx, &mut effect, &mut damage);

        effect.damage = damage.max(0.0);
        effect.threat = effect.calc_threat(caster);
    }

    finalize_effect(sim, world, spell_id, &mut effect);
    effect
}

fn finalize_effect(sim: &mut Simulator, world: &mut CombatWorld, spell_id: SpellId, effect: &mut SpellEffect) {
    let now = sim.now();
    let caster_id = world.spell(spell_id).unit;
    let target_id = effect.target;

    if let Some(idx) = world.unit(target_id).target_index {
        if let Some(m) = world.spell_mut(spell_id).metrics.get_mut(idx) {
            m.record(effect);
        }
    }
    trace!(
        now = ?now,
        spell = %world.spell(spell_id).label,
        outcome = effect.outcome.name(),
        damage = effect.damage,
        threat = effect.threat,
        "效果结算完成"
    );
    if world.logging() {
        let action = world.spell(spell_id).action_id;
        world.log_event(
            now,
            caster_id,
            CombatEventKind::Damage {
                action,
                target: target_id.0,
                outcome: effect.outcome.name().to_string(),
                damage: effect.damage,
                threat: effect.threat,
                periodic: effect.is_periodic,
            },
        );
    }

    // 白字攻击命中产生怒气
    if effect.landed()
        && effect.proc_mask.matches(ProcMask::MELEE_AUTO)
        && world.unit(caster_id).rage.is_some()
    {
        let offhand = effect.proc_mask.matches(ProcMask::MELEE_OH_AUTO);
        let crit = effect.outcome.matches(HitOutcome::CRIT);
        let speed = world.unit(caster_id).pseudo.weapon_speed;
        let level = world.unit(caster_id).level;
        let rage = rage_from_white_hit(effect.damage, crit, offhand, speed, level);
        resource::add_resource(
            sim,
            world,
            caster_id,
            ResourceKind::Rage,
            rage,
            ActionId::Other(OtherAction::RageGain),
        );
    }

    if effect.is_periodic {
        if let Some(hook) = effect.on_periodic_damage.clone() {
            hook(sim, world, spell_id, effect);
        }
        aura::dispatch_periodic_damage(sim, world, caster_id, spell_id, effect);
        if target_id != caster_id {
            aura::dispatch_periodic_damage(sim, world, target_id, spell_id, effect);
        }
    } else {
        if let Some(hook) = effect.on_spell_hit.clone() {
            hook(sim, world, spell_id, effect);
        }
        aura::dispatch_spell_hit(sim, world, caster_id, spell_id, effect);
        if target_id != caster_id {
            aura::dispatch_spell_hit(sim, world, target_id, spell_id, effect);
        }
    }
}
