//! 技能定义与注册
//!
//! `SpellConfig` 描述技能；注册到世界后成为 `Spell`，消耗在注册时确定，
//! 冷却计时器在施法者的 `TimerBank` 中分配。

use super::action_id::ActionId;
use super::constants::GCD_DEFAULT;
use super::dot::{DotConfig, DotState};
use super::effect::SpellEffect;
use super::outcome::HitOutcome;
use super::school::SpellSchool;
use crate::encounter::CombatWorld;
use crate::resource::ResourceKind;
use crate::sim::{SimTime, Simulator};
use crate::timer::Cooldown;
use crate::unit::UnitId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 技能标识（`CombatWorld::spells` 下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpellId(pub usize);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpellFlags {
    /// 跳过所有倍率、抗性与结算掷骰。
    pub ignore_modifiers: bool,
    /// GCD 与读条不受施法速度影响。
    pub ignore_haste: bool,
    /// 触发类技能：不经过施法流程，由 `trigger_spell` 直接生效。
    pub phantom: bool,
    /// 二元法术：不吃部分抵抗。
    pub binary: bool,
}

pub type CustomApply = Arc<dyn Fn(&mut Simulator, &mut CombatWorld, SpellId, UnitId) + Send + Sync>;

/// 技能施放完成后如何作用到目标。
#[derive(Clone, Default)]
pub enum ApplyEffects {
    #[default]
    None,
    Direct(SpellEffect),
    /// 对遭遇中的目标依次结算（最多 `max_targets` 个）。
    Aoe {
        effect: SpellEffect,
        max_targets: Option<usize>,
    },
    /// 可选的初始命中，命中后挂上周期伤害。
    Dot {
        apply: Option<SpellEffect>,
        dot: DotConfig,
    },
    Custom(CustomApply),
}

impl fmt::Debug for ApplyEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyEffects::None => write!(f, "None"),
            ApplyEffects::Direct(e) => f.debug_tuple("Direct").field(e).finish(),
            ApplyEffects::Aoe {
                effect,
                max_targets,
            } => f
                .debug_struct("Aoe")
                .field("effect", effect)
                .field("max_targets", max_targets)
                .finish(),
            ApplyEffects::Dot { apply, dot } => f
                .debug_struct("Dot")
                .field("apply", apply)
                .field("dot", dot)
                .finish(),
            ApplyEffects::Custom(_) => write!(f, "Custom"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpellConfig {
    pub action_id: ActionId,
    pub label: String,
    pub school: SpellSchool,
    pub flags: SpellFlags,

    pub resource: Option<ResourceKind>,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    pub cost_reduction: f64,
    /// 未造成效果时返还的消耗比例（如终结技未命中返还能量）。
    pub refund_on_miss: f64,

    pub cast_time: SimTime,
    pub gcd: SimTime,
    pub cooldown: Option<SimTime>,
    /// 与其它技能共享的冷却（计时器由调用方在单位上分配）。
    pub shared_cooldown: Option<Cooldown>,

    pub apply_effects: ApplyEffects,
}

impl SpellConfig {
    pub fn new(action_id: ActionId, label: impl Into<String>) -> Self {
        Self {
            action_id,
            label: label.into(),
            school: SpellSchool::Physical,
            flags: SpellFlags::default(),
            resource: None,
            base_cost: 0.0,
            cost_multiplier: 1.0,
            cost_reduction: 0.0,
            refund_on_miss: 0.0,
            cast_time: SimTime::ZERO,
            gcd: GCD_DEFAULT,
            cooldown: None,
            shared_cooldown: None,
            apply_effects: ApplyEffects::None,
        }
    }

    pub fn final_cost(&self) -> f64 {
        (self.base_cost * self.cost_multiplier - self.cost_reduction).max(0.0)
    }
}

/// 技能对单个目标的累计统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetedSpellMetrics {
    pub hits: u32,
    pub crits: u32,
    pub misses: u32,
    pub dodges: u32,
    pub parries: u32,
    pub blocks: u32,
    pub glances: u32,
    pub ticks: u32,
    pub damage: f64,
    pub threat: f64,
}

impl TargetedSpellMetrics {
    pub(crate) fn record(&mut self, effect: &SpellEffect) {
        self.damage += effect.damage;
        self.threat += effect.threat;
        if effect.is_periodic {
            self.ticks += 1;
            if effect.outcome.matches(HitOutcome::CRIT) {
                self.crits += 1;
            }
            return;
        }
        let o = effect.outcome;
        if o.matches(HitOutcome::CRIT) {
            self.crits += 1;
        } else if o.matches(HitOutcome::GLANCE) {
            self.glances += 1;
        } else if o.matches(HitOutcome::BLOCK) {
            self.blocks += 1;
        } else if o.matches(HitOutcome::HIT) {
            self.hits += 1;
        } else if o.matches(HitOutcome::DODGE) {
            self.dodges += 1;
        } else if o.matches(HitOutcome::PARRY) {
            self.parries += 1;
        } else if o.matches(HitOutcome::MISS) {
            self.misses += 1;
        }
    }

    pub fn landed(&self) -> u32 {
        self.hits + self.crits + self.glances + self.blocks
    }
}

#[derive(Debug)]
pub struct Spell {
    pub id: SpellId,
    pub unit: UnitId,
    pub action_id: ActionId,
    pub label: String,
    pub school: SpellSchool,
    pub flags: SpellFlags,
    pub resource: Option<ResourceKind>,
    pub cost: f64,
    pub refund_on_miss: f64,
    pub cast_time: SimTime,
    pub gcd: SimTime,
    pub cooldown: Option<Cooldown>,
    pub shared_cooldown: Option<Cooldown>,
    pub apply_effects: ApplyEffects,

    pub casts: u32,
    /// 按目标序号索引。
    pub metrics: Vec<TargetedSpellMetrics>,
    pub(crate) dots: HashMap<UnitId, DotState>,
    pub(crate) next_dot_generation: u64,
}

impl Spell {
    pub(crate) fn from_config(
        id: SpellId,
        unit: UnitId,
        config: SpellConfig,
        cooldown: Option<Cooldown>,
        num_targets: usize,
    ) -> Self {
        let cost = config.final_cost();
        Self {
            id,
            unit,
            action_id: config.action_id,
            label: config.label,
            school: config.school,
            flags: config.flags,
            resource: config.resource,
            cost,
            refund_on_miss: config.refund_on_miss,
            cast_time: config.cast_time,
            gcd: config.gcd,
            cooldown,
            shared_cooldown: config.shared_cooldown,
            apply_effects: config.apply_effects,
            casts: 0,
            metrics: vec![TargetedSpellMetrics::default(); num_targets],
            dots: HashMap::new(),
            next_dot_generation: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.casts = 0;
        for m in &mut self.metrics {
            *m = TargetedSpellMetrics::default();
        }
        self.dots.clear();
    }

    pub fn total_damage(&self) -> f64 {
        self.metrics.iter().map(|m| m.damage).sum()
    }

    pub fn total_threat(&self) -> f64 {
        self.metrics.iter().map(|m| m.threat).sum()
    }

    /// 该目标身上是否有本技能的周期伤害在跳。
    pub fn dot_active_on(&self, target: UnitId) -> bool {
        self.dots.contains_key(&target)
    }
}
