//! 由 `SimSpec` 构建可运行的 `Simulation`

use super::registry::EffectRegistry;
use super::rotation::PriorityRotation;
use super::spec::{
    CooldownSpec, DamageSpec, OutcomeSpec, PlayerSpec, SCHEMA_VERSION, SimSpec, SpellSpec,
    TargetSpec,
};
use crate::aura::{self, Aura, StatBuff};
use crate::cooldown::{
    ARMOR_DEBUFF_DELAY, ActivationFactory, CooldownActivation, CooldownType, MajorCooldownConfig,
};
use crate::encounter::{CombatWorld, Simulation};
use crate::error::ConfigError;
use crate::resource::{DEFAULT_MAX_ENERGY, EnergyBar, ManaBar, RageBar};
use crate::sim::{SimTime, Simulator};
use crate::spell::constants::{DEFAULT_CRIT_MULTIPLIER, DEFAULT_SPELL_CRIT_MULTIPLIER, GCD_DEFAULT};
use crate::spell::{
    ActionId, ApplyEffects, BaseDamage, DotConfig, OutcomeApplier, ProcMask, SpellConfig,
    SpellEffect, SpellFlags, SpellId, SpellSchool,
};
use crate::stats::Stat;
use crate::unit::UnitId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_PLAYER_LEVEL: u32 = 70;
pub const DEFAULT_TARGET_LEVEL: u32 = 73;
/// 团队副本首领的默认护甲
pub const DEFAULT_TARGET_ARMOR: f64 = 7684.0;

/// 构建并定版。之后的注册都会返回 `ConfigError::Finalized`。
pub fn build_simulation(spec: &SimSpec, registry: &EffectRegistry) -> Result<Simulation, ConfigError> {
    if spec.schema_version != SCHEMA_VERSION {
        return Err(ConfigError::Invalid(format!(
            "unsupported schema_version {} (expected {SCHEMA_VERSION})",
            spec.schema_version
        )));
    }
    let duration_secs = spec.encounter.duration_secs;
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "encounter duration must be positive, got {duration_secs}"
        )));
    }
    if spec.encounter.targets.is_empty() {
        return Err(ConfigError::NoTargets);
    }

    let mut world = CombatWorld::new(SimTime::from_secs_f64(duration_secs));
    let mut armor_debuffed = false;
    for (idx, t) in spec.encounter.targets.iter().enumerate() {
        let id = build_target(&mut world, registry, idx, t)?;
        if idx == 0 {
            armor_debuffed = t.debuffs.iter().any(|d| registry.is_armor_debuff(&d.name));
        }
        info!(target = id.0, debuffs = t.debuffs.len(), "目标就绪");
    }

    let player = build_player(&mut world, registry, &spec.player)?;
    if spec.player.delay_dps_cooldowns_for_armor_debuffs && armor_debuffed {
        world
            .unit_mut(player)
            .cooldowns
            .delay_dps_cooldowns(ARMOR_DEBUFF_DELAY);
    }

    Simulation::new(world, spec.seed.unwrap_or(0))
}

fn build_target(
    world: &mut CombatWorld,
    registry: &EffectRegistry,
    idx: usize,
    spec: &TargetSpec,
) -> Result<UnitId, ConfigError> {
    let label = spec.name.clone().unwrap_or_else(|| format!("Target {}", idx + 1));
    let id = world.add_target(label, spec.level.unwrap_or(DEFAULT_TARGET_LEVEL))?;
    let mut stats = spec.stats;
    stats[Stat::Armor] += spec.armor.unwrap_or(DEFAULT_TARGET_ARMOR);
    let unit = world.unit_mut(id);
    unit.mob_type = spec.mob_type;
    unit.add_base_stats(&stats)?;
    for debuff in &spec.debuffs {
        registry.apply_debuff(world, id, &debuff.name, debuff.value)?;
    }
    Ok(id)
}

fn build_player(
    world: &mut CombatWorld,
    registry: &EffectRegistry,
    spec: &PlayerSpec,
) -> Result<UnitId, ConfigError> {
    let label = spec.name.clone().unwrap_or_else(|| "Player".to_string());
    let id = world.add_player(label, spec.level.unwrap_or(DEFAULT_PLAYER_LEVEL))?;
    {
        let unit = world.unit_mut(id);
        unit.add_base_stats(&spec.stats)?;
        unit.pseudo.in_front_of_target = spec.in_front_of_target;
        if let Some(speed) = spec.weapon_speed {
            if speed <= 0.0 {
                return Err(ConfigError::Invalid(format!("weapon speed must be positive, got {speed}")));
            }
            unit.pseudo.weapon_speed = speed;
        }
        if let Some(energy) = &spec.resources.energy {
            let max = energy.max.unwrap_or(DEFAULT_MAX_ENERGY);
            unit.energy = Some(EnergyBar::new(max, energy.initial.unwrap_or(max)));
        }
        if let Some(rage) = &spec.resources.rage {
            unit.rage = Some(RageBar::new(rage.initial));
        }
        if let Some(mana) = &spec.resources.mana {
            unit.mana = Some(ManaBar::new(mana.regen));
        }
    }
    for buff in &spec.buffs {
        registry.apply_buff(world, id, &buff.name, buff.value)?;
    }

    let mut by_name: BTreeMap<&str, SpellId> = BTreeMap::new();
    for s in &spec.spells {
        if by_name.contains_key(s.name.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate spell name '{}'", s.name)));
        }
        let spell = world.register_spell(id, spell_config(s))?;
        by_name.insert(s.name.as_str(), spell);
    }
    let lookup = |name: &str| {
        by_name
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownSpell(name.to_string()))
    };

    if !spec.rotation.is_empty() {
        let priorities = spec
            .rotation
            .iter()
            .map(|n| lookup(n.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        world.unit_mut(id).agent = Some(Box::new(PriorityRotation::new(priorities)));
    }

    for cd in &spec.cooldowns {
        let config = match cd {
            CooldownSpec::Spell {
                spell,
                priority,
                cooldown_type,
                timings_secs,
            } => MajorCooldownConfig {
                spell: Some(lookup(spell.as_str())?),
                priority: *priority,
                kind: *cooldown_type,
                timings: timings(timings_secs),
                ..Default::default()
            },
            CooldownSpec::Buff {
                id: action,
                name,
                duration_secs,
                cooldown_secs,
                stats,
                cast_speed_multiplier,
                damage_multiplier,
                priority,
                cooldown_type,
                timings_secs,
            } => buff_cooldown(
                world,
                id,
                BuffCooldown {
                    action: ActionId::Spell(*action),
                    label: name.clone(),
                    duration: SimTime::from_secs_f64(*duration_secs),
                    cooldown: SimTime::from_secs_f64(*cooldown_secs),
                    behavior: StatBuff::new(*stats)
                        .with_cast_speed(cast_speed_multiplier.unwrap_or(1.0))
                        .with_damage(damage_multiplier.unwrap_or(1.0)),
                    priority: *priority,
                    kind: *cooldown_type,
                    timings: timings(timings_secs),
                },
            ),
        };
        world.add_major_cooldown(id, config)?;
    }
    Ok(id)
}

fn timings(secs: &[f64]) -> Vec<SimTime> {
    secs.iter().map(|s| SimTime::from_secs_f64(*s)).collect()
}

struct BuffCooldown {
    action: ActionId,
    label: String,
    duration: SimTime,
    cooldown: SimTime,
    behavior: StatBuff,
    priority: f64,
    kind: CooldownType,
    timings: Vec<SimTime>,
}

/// 不占 GCD 的自身增益大招：激活时给自己挂一个限时属性光环。
fn buff_cooldown(world: &mut CombatWorld, unit: UnitId, b: BuffCooldown) -> MajorCooldownConfig {
    let aura_id = world.new_aura_id();
    let cooldown = world.new_cooldown(unit, b.cooldown);
    let (action, label, duration, behavior) = (b.action, b.label, b.duration, b.behavior);
    let factory: ActivationFactory = Arc::new(move |_world: &CombatWorld, _unit: UnitId| {
        let label = label.clone();
        let behavior = behavior.clone();
        let activation: CooldownActivation =
            Box::new(move |sim: &mut Simulator, world: &mut CombatWorld, unit: UnitId| {
                cooldown.start(&mut world.unit_mut(unit).timers, sim.now());
                let aura = Aura::new(aura_id, label.clone())
                    .with_action(action)
                    .with_duration(duration)
                    .with_behavior(behavior.clone());
                aura::add_aura(sim, world, unit, aura);
            });
        activation
    });
    MajorCooldownConfig {
        action_id: Some(action),
        cooldown: Some(cooldown),
        priority: b.priority,
        kind: b.kind,
        activation_factory: Some(factory),
        timings: b.timings,
        ..Default::default()
    }
}

fn base_damage(spec: &DamageSpec) -> BaseDamage {
    match *spec {
        DamageSpec::None => BaseDamage::None,
        DamageSpec::Flat { amount } => BaseDamage::Flat(amount),
        DamageSpec::Roll { min, max } => BaseDamage::Roll { min, max },
        DamageSpec::SpellPower {
            min,
            max,
            coefficient,
        } => BaseDamage::SpellPower {
            min,
            max,
            coefficient,
        },
        DamageSpec::AttackPower { flat, coefficient } => BaseDamage::AttackPower { flat, coefficient },
    }
}

fn outcome_and_mask(outcome: OutcomeSpec, school: SpellSchool, crit: Option<f64>) -> (OutcomeApplier, ProcMask) {
    let melee_crit = crit.unwrap_or(DEFAULT_CRIT_MULTIPLIER);
    let spell_crit = crit.unwrap_or(DEFAULT_SPELL_CRIT_MULTIPLIER);
    match outcome {
        OutcomeSpec::AlwaysHit if school.is_physical() => {
            (OutcomeApplier::AlwaysHit, ProcMask::MELEE_MH_SPECIAL)
        }
        OutcomeSpec::AlwaysHit => (OutcomeApplier::AlwaysHit, ProcMask::SPELL_DAMAGE),
        OutcomeSpec::MagicHit => (OutcomeApplier::MagicHit, ProcMask::SPELL_DAMAGE),
        OutcomeSpec::MagicHitAndCrit => (
            OutcomeApplier::MagicHitAndCrit {
                crit_multiplier: spell_crit,
            },
            ProcMask::SPELL_DAMAGE,
        ),
        OutcomeSpec::MagicCrit => (
            OutcomeApplier::MagicCrit {
                crit_multiplier: spell_crit,
            },
            ProcMask::SPELL_DAMAGE,
        ),
        OutcomeSpec::MeleeSpecial => (
            OutcomeApplier::MeleeSpecial {
                crit_multiplier: melee_crit,
            },
            ProcMask::MELEE_MH_SPECIAL,
        ),
        OutcomeSpec::MeleeWhite => (
            OutcomeApplier::MeleeWhite {
                crit_multiplier: melee_crit,
            },
            ProcMask::MELEE_MH_AUTO,
        ),
        OutcomeSpec::Ranged => (
            OutcomeApplier::Ranged {
                crit_multiplier: melee_crit,
            },
            ProcMask::RANGED_SPECIAL,
        ),
    }
}

fn spell_config(s: &SpellSpec) -> SpellConfig {
    let mut config = SpellConfig::new(ActionId::Spell(s.id), s.name.clone());
    config.school = s.school;
    config.flags = SpellFlags {
        ignore_haste: s.ignore_haste,
        binary: s.binary,
        ..SpellFlags::default()
    };
    config.resource = s.resource;
    config.base_cost = s.cost;
    config.refund_on_miss = s.refund_on_miss;
    config.cast_time = SimTime::from_secs_f64(s.cast_time_secs);
    config.gcd = s.gcd_secs.map_or(GCD_DEFAULT, SimTime::from_secs_f64);
    config.cooldown = s.cooldown_secs.map(SimTime::from_secs_f64);

    let (outcome_applier, proc_mask) = outcome_and_mask(s.outcome, s.school, s.crit_multiplier);
    let effect = SpellEffect {
        proc_mask,
        threat_multiplier: s.threat_multiplier,
        flat_threat_bonus: s.flat_threat,
        base_damage: base_damage(&s.damage),
        outcome_applier,
        ..SpellEffect::default()
    };

    config.apply_effects = if let Some(dot) = &s.dot {
        let tick_effect = SpellEffect {
            proc_mask: ProcMask::PERIODIC_DAMAGE,
            threat_multiplier: s.threat_multiplier,
            base_damage: base_damage(&dot.damage),
            outcome_applier: OutcomeApplier::Tick,
            ..SpellEffect::default()
        };
        ApplyEffects::Dot {
            apply: dot.with_initial_hit.then_some(effect),
            dot: DotConfig {
                label: s.name.clone(),
                aura_id: None,
                num_ticks: dot.num_ticks,
                tick_length: SimTime::from_secs_f64(dot.tick_secs),
                tick_effect,
            },
        }
    } else if let Some(aoe) = &s.aoe {
        ApplyEffects::Aoe {
            effect,
            max_targets: aoe.max_targets,
        }
    } else {
        ApplyEffects::Direct(effect)
    };
    config
}
