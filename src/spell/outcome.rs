//! 命中结果与结算表
//!
//! `HitOutcome` 是位掩码；`OutcomeApplier` 决定一次效果怎样掷骰。
//! 命中/暴击几率在换算阶段可以为负（压制大于加成），只在掷骰处截断。

use super::constants::*;
use super::effect::SpellEffect;
use super::proc_mask::ProcMask;
use super::spell::Spell;
use crate::random::RandomDraw;
use crate::unit::Unit;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitOutcome(pub u16);

impl HitOutcome {
    pub const NONE: HitOutcome = HitOutcome(0);
    pub const MISS: HitOutcome = HitOutcome(1 << 0);
    pub const HIT: HitOutcome = HitOutcome(1 << 1);
    pub const CRIT: HitOutcome = HitOutcome(1 << 2);
    pub const DODGE: HitOutcome = HitOutcome(1 << 3);
    pub const PARRY: HitOutcome = HitOutcome(1 << 4);
    pub const BLOCK: HitOutcome = HitOutcome(1 << 5);
    pub const GLANCE: HitOutcome = HitOutcome(1 << 6);

    /// 造成了效果（命中、暴击、偏斜、格挡）。
    pub const LANDED: HitOutcome = HitOutcome(
        Self::HIT.0 | Self::CRIT.0 | Self::BLOCK.0 | Self::GLANCE.0,
    );

    pub fn matches(self, other: HitOutcome) -> bool {
        self.0 & other.0 != 0
    }

    pub fn landed(self) -> bool {
        self.matches(Self::LANDED)
    }

    pub fn name(self) -> &'static str {
        if self.matches(Self::CRIT) {
            "crit"
        } else if self.matches(Self::GLANCE) {
            "glance"
        } else if self.matches(Self::BLOCK) {
            "block"
        } else if self.matches(Self::HIT) {
            "hit"
        } else if self.matches(Self::DODGE) {
            "dodge"
        } else if self.matches(Self::PARRY) {
            "parry"
        } else if self.matches(Self::MISS) {
            "miss"
        } else {
            "none"
        }
    }
}

impl fmt::Debug for HitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HitOutcome({})", self.name())
    }
}

/// 目标一侧的攻击结算表。默认值对应比攻击者高 3 级的首领。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTable {
    pub melee_miss: f64,
    pub spell_miss: f64,
    pub dodge: f64,
    pub parry: f64,
    pub glance: f64,
    pub block: f64,
    pub block_value: f64,
    pub hit_suppression: f64,
    pub crit_suppression: f64,
}

impl Default for AttackTable {
    fn default() -> Self {
        Self {
            melee_miss: 0.08,
            spell_miss: 0.17,
            dodge: 0.065,
            parry: 0.14,
            glance: 0.24,
            block: 0.0,
            block_value: 0.0,
            hit_suppression: 0.01,
            crit_suppression: 0.048,
        }
    }
}

impl AttackTable {
    /// 与攻击者同级的目标（训练假人、小怪）。
    pub fn same_level() -> Self {
        Self {
            melee_miss: 0.05,
            spell_miss: 0.04,
            dodge: 0.05,
            parry: 0.05,
            glance: 0.10,
            block: 0.0,
            block_value: 0.0,
            hit_suppression: 0.0,
            crit_suppression: 0.0,
        }
    }
}

/// 结算方式。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutcomeApplier {
    #[default]
    AlwaysHit,
    /// 周期伤害：不掷骰，不暴击。
    Tick,
    MagicHit,
    MagicHitAndCrit { crit_multiplier: f64 },
    MagicCrit { crit_multiplier: f64 },
    /// 特殊攻击：一次掷骰决定 未命中/躲闪/招架/格挡，命中后再掷暴击。
    MeleeSpecial { crit_multiplier: f64 },
    /// 白字攻击：单次掷骰的完整攻击表（含偏斜）。
    MeleeWhite { crit_multiplier: f64 },
    Ranged { crit_multiplier: f64 },
}

pub(crate) struct OutcomeContext<'a> {
    pub caster: &'a Unit,
    pub target: &'a Unit,
    pub spell: &'a Spell,
    pub rng: &'a mut dyn RandomDraw,
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

impl OutcomeApplier {
    pub(crate) fn apply(self, ctx: &mut OutcomeContext<'_>, effect: &mut SpellEffect, damage: &mut f64) {
        let caster = ctx.caster;
        let target = ctx.target;
        match self {
            OutcomeApplier::AlwaysHit | OutcomeApplier::Tick => {
                effect.outcome = HitOutcome::HIT;
            }
            OutcomeApplier::MagicHit => {
                if roll_spell_hit(ctx, effect) {
                    effect.outcome = HitOutcome::HIT;
                } else {
                    effect.outcome = HitOutcome::MISS;
                    *damage = 0.0;
                }
            }
            OutcomeApplier::MagicHitAndCrit { crit_multiplier } => {
                if !roll_spell_hit(ctx, effect) {
                    effect.outcome = HitOutcome::MISS;
                    *damage = 0.0;
                    return;
                }
                let crit = clamp01(effect.spell_crit_chance(caster, target, ctx.spell));
                if ctx.rng.draw("Spell Crit") < crit {
                    effect.outcome = HitOutcome::CRIT;
                    *damage *= crit_multiplier;
                } else {
                    effect.outcome = HitOutcome::HIT;
                }
            }
            OutcomeApplier::MagicCrit { crit_multiplier } => {
                let crit = clamp01(effect.spell_crit_chance(caster, target, ctx.spell));
                if ctx.rng.draw("Spell Crit") < crit {
                    effect.outcome = HitOutcome::CRIT;
                    *damage *= crit_multiplier;
                } else {
                    effect.outcome = HitOutcome::HIT;
                }
            }
            OutcomeApplier::MeleeSpecial { crit_multiplier } => {
                let table = &target.table;
                let in_front = caster.pseudo.in_front_of_target;
                let roll = ctx.rng.draw("Special Hit Table");
                let mut chance = clamp01(table.melee_miss - effect.physical_hit_chance(caster, target));
                if roll < chance {
                    effect.outcome = HitOutcome::MISS;
                    *damage = 0.0;
                    return;
                }
                chance += effect.dodge_chance(caster, target);
                if roll < chance {
                    effect.outcome = HitOutcome::DODGE;
                    *damage = 0.0;
                    return;
                }
                if in_front {
                    chance += effect.parry_chance(caster, target);
                    if roll < chance {
                        effect.outcome = HitOutcome::PARRY;
                        *damage = 0.0;
                        return;
                    }
                    chance += table.block;
                    if roll < chance {
                        effect.outcome = HitOutcome::BLOCK;
                        *damage = (*damage - table.block_value).max(0.0);
                        return;
                    }
                }
                let crit = clamp01(effect.physical_crit_chance(caster, target));
                if ctx.rng.draw("Physical Crit") < crit {
                    effect.outcome = HitOutcome::CRIT;
                    *damage *= crit_multiplier;
                } else {
                    effect.outcome = HitOutcome::HIT;
                }
            }
            OutcomeApplier::MeleeWhite { crit_multiplier } => {
                let table = &target.table;
                let in_front = caster.pseudo.in_front_of_target;
                let roll = ctx.rng.draw("White Hit Table");
                let mut chance = clamp01(table.melee_miss - effect.physical_hit_chance(caster, target));
                if roll < chance {
                    effect.outcome = HitOutcome::MISS;
                    *damage = 0.0;
                    return;
                }
                chance += effect.dodge_chance(caster, target);
                if roll < chance {
                    effect.outcome = HitOutcome::DODGE;
                    *damage = 0.0;
                    return;
                }
                if in_front {
                    chance += effect.parry_chance(caster, target);
                    if roll < chance {
                        effect.outcome = HitOutcome::PARRY;
                        *damage = 0.0;
                        return;
                    }
                }
                chance += table.glance;
                if roll < chance {
                    effect.outcome = HitOutcome::GLANCE;
                    *damage *= GLANCE_MULTIPLIER;
                    return;
                }
                if in_front {
                    chance += table.block;
                    if roll < chance {
                        effect.outcome = HitOutcome::BLOCK;
                        *damage = (*damage - table.block_value).max(0.0);
                        return;
                    }
                }
                chance += clamp01(effect.physical_crit_chance(caster, target));
                if roll < chance {
                    effect.outcome = HitOutcome::CRIT;
                    *damage *= crit_multiplier;
                } else {
                    effect.outcome = HitOutcome::HIT;
                }
            }
            OutcomeApplier::Ranged { crit_multiplier } => {
                let miss = clamp01(target.table.melee_miss - effect.physical_hit_chance(caster, target));
                if ctx.rng.draw("Ranged Hit") < miss {
                    effect.outcome = HitOutcome::MISS;
                    *damage = 0.0;
                    return;
                }
                let crit = clamp01(effect.physical_crit_chance(caster, target));
                if ctx.rng.draw("Ranged Crit") < crit {
                    effect.outcome = HitOutcome::CRIT;
                    *damage *= crit_multiplier;
                } else {
                    effect.outcome = HitOutcome::HIT;
                }
            }
        }
    }

    /// 按触发掩码给出常用的结算方式。
    pub fn default_for(mask: ProcMask) -> OutcomeApplier {
        if mask.matches(ProcMask::MELEE_AUTO) {
            OutcomeApplier::MeleeWhite {
                crit_multiplier: DEFAULT_CRIT_MULTIPLIER,
            }
        } else if mask.matches(ProcMask::MELEE_SPECIAL) {
            OutcomeApplier::MeleeSpecial {
                crit_multiplier: DEFAULT_CRIT_MULTIPLIER,
            }
        } else if mask.matches(ProcMask::RANGED) {
            OutcomeApplier::Ranged {
                crit_multiplier: DEFAULT_CRIT_MULTIPLIER,
            }
        } else if mask.matches(ProcMask::PERIODIC_DAMAGE) {
            OutcomeApplier::Tick
        } else {
            OutcomeApplier::MagicHitAndCrit {
                crit_multiplier: DEFAULT_SPELL_CRIT_MULTIPLIER,
            }
        }
    }
}

fn roll_spell_hit(ctx: &mut OutcomeContext<'_>, effect: &SpellEffect) -> bool {
    let hit = effect.spell_hit_chance(ctx.caster, ctx.target);
    let miss = (ctx.target.table.spell_miss - hit).max(1.0 - SPELL_MAX_HIT_CHANCE);
    ctx.rng.draw("Spell Hit") >= clamp01(miss)
}
