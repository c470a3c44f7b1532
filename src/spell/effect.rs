//! 技能效果
//!
//! `SpellEffect` 是技能对单个目标的一次结算记录：施放前可被钩子修改的
//! 加成与倍率，以及结算后的结果（命中类型、伤害、仇恨）。

use super::SpellId;
use super::constants::*;
use super::outcome::{HitOutcome, OutcomeApplier};
use super::proc_mask::ProcMask;
use super::school::SpellSchool;
use super::spell::Spell;
use crate::encounter::CombatWorld;
use crate::random::RandomDraw;
use crate::sim::Simulator;
use crate::stats::Stat;
use crate::unit::{Unit, UnitId};
use std::fmt;
use std::sync::Arc;

/// 效果钩子：初始化或命中后调用，可读写效果。
pub type EffectHook =
    Arc<dyn Fn(&mut Simulator, &mut CombatWorld, SpellId, &mut SpellEffect) + Send + Sync>;

/// 自定义基础伤害。
pub type CustomDamage = Arc<dyn Fn(&mut DamageContext<'_>) -> f64 + Send + Sync>;

/// 计算基础伤害时可见的上下文。
pub struct DamageContext<'a> {
    pub caster: &'a Unit,
    pub target: &'a Unit,
    pub spell: &'a Spell,
    pub effect: &'a SpellEffect,
    pub rng: &'a mut dyn RandomDraw,
}

impl DamageContext<'_> {
    /// 施法者对该目标的法术强度（含效果加成与种族强度）。
    pub fn spell_power(&self) -> f64 {
        let mut sp = self.caster.spell_power(self.spell.school) + self.effect.bonus_spell_power;
        if self.target.mob_type.is_demon_or_undead() {
            sp += self.caster.pseudo.mob_type_spell_power;
        }
        sp
    }

    /// 施法者对该目标的攻击强度；远程掩码使用远程攻击强度。
    pub fn attack_power(&self) -> f64 {
        let base = if self.effect.proc_mask.matches(ProcMask::RANGED) {
            self.caster.stats[Stat::RangedAttackPower]
        } else {
            self.caster.stats[Stat::AttackPower]
        };
        let mut ap = base + self.effect.bonus_attack_power;
        if self.target.mob_type.is_demon_or_undead() {
            ap += self.caster.pseudo.mob_type_attack_power;
        }
        ap
    }
}

#[derive(Clone, Default)]
pub enum BaseDamage {
    #[default]
    None,
    Flat(f64),
    Roll { min: f64, max: f64 },
    SpellPower { min: f64, max: f64, coefficient: f64 },
    AttackPower { flat: f64, coefficient: f64 },
    Custom(CustomDamage),
}

impl BaseDamage {
    pub fn calculate(&self, ctx: &mut DamageContext<'_>) -> f64 {
        match self {
            BaseDamage::None => 0.0,
            BaseDamage::Flat(v) => *v,
            BaseDamage::Roll { min, max } => roll(*min, *max, ctx.rng),
            BaseDamage::SpellPower {
                min,
                max,
                coefficient,
            } => roll(*min, *max, ctx.rng) + coefficient * ctx.spell_power(),
            BaseDamage::AttackPower { flat, coefficient } => flat + coefficient * ctx.attack_power(),
            BaseDamage::Custom(f) => f(ctx),
        }
    }
}

fn roll(min: f64, max: f64, rng: &mut dyn RandomDraw) -> f64 {
    if max > min {
        min + (max - min) * rng.draw("Damage Roll")
    } else {
        min
    }
}

impl fmt::Debug for BaseDamage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseDamage::None => write!(f, "None"),
            BaseDamage::Flat(v) => write!(f, "Flat({v})"),
            BaseDamage::Roll { min, max } => write!(f, "Roll({min}..{max})"),
            BaseDamage::SpellPower {
                min,
                max,
                coefficient,
            } => write!(f, "SpellPower({min}..{max} + {coefficient}×SP)"),
            BaseDamage::AttackPower { flat, coefficient } => {
                write!(f, "AttackPower({flat} + {coefficient}×AP)")
            }
            BaseDamage::Custom(_) => write!(f, "Custom"),
        }
    }
}

#[derive(Clone)]
pub struct SpellEffect {
    pub target: UnitId,
    pub proc_mask: ProcMask,
    pub is_periodic: bool,

    pub bonus_hit_rating: f64,
    pub bonus_crit_rating: f64,
    pub bonus_spell_power: f64,
    pub bonus_attack_power: f64,
    pub bonus_expertise_rating: f64,

    /// 可被钩子修改的伤害倍率。
    pub damage_multiplier: f64,
    /// 天赋等固定倍率。
    pub static_damage_multiplier: f64,
    pub threat_multiplier: f64,
    pub flat_threat_bonus: f64,
    /// 目标侧固定承伤加成的系数；0 表示不吃这类加成。
    pub target_coefficient: f64,

    pub base_damage: BaseDamage,
    pub outcome_applier: OutcomeApplier,

    pub on_init: Option<EffectHook>,
    pub on_spell_hit: Option<EffectHook>,
    pub on_periodic_damage: Option<EffectHook>,

    // 结算结果
    pub outcome: HitOutcome,
    pub damage: f64,
    pub threat: f64,
    pub preoutcome_damage: f64,
}

impl Default for SpellEffect {
    fn default() -> Self {
        Self {
            target: UnitId::default(),
            proc_mask: ProcMask::EMPTY,
            is_periodic: false,
            bonus_hit_rating: 0.0,
            bonus_crit_rating: 0.0,
            bonus_spell_power: 0.0,
            bonus_attack_power: 0.0,
            bonus_expertise_rating: 0.0,
            damage_multiplier: 1.0,
            static_damage_multiplier: 1.0,
            threat_multiplier: 1.0,
            flat_threat_bonus: 0.0,
            target_coefficient: 1.0,
            base_damage: BaseDamage::None,
            outcome_applier: OutcomeApplier::AlwaysHit,
            on_init: None,
            on_spell_hit: None,
            on_periodic_damage: None,
            outcome: HitOutcome::NONE,
            damage: 0.0,
            threat: 0.0,
            preoutcome_damage: 0.0,
        }
    }
}

impl fmt::Debug for SpellEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpellEffect")
            .field("target", &self.target)
            .field("proc_mask", &self.proc_mask)
            .field("is_periodic", &self.is_periodic)
            .field("base_damage", &self.base_damage)
            .field("outcome_applier", &self.outcome_applier)
            .field("outcome", &self.outcome)
            .field("damage", &self.damage)
            .field("threat", &self.threat)
            .finish_non_exhaustive()
    }
}

impl SpellEffect {
    pub fn landed(&self) -> bool {
        self.outcome.landed()
    }

    /// 物理命中几率（可为负）。
    pub fn physical_hit_chance(&self, caster: &Unit, target: &Unit) -> f64 {
        let rating = caster.stats[Stat::MeleeHit]
            + self.bonus_hit_rating
            + target.pseudo.bonus_melee_hit_rating_taken;
        rating / (MELEE_HIT_RATING_PER_HIT_CHANCE * 100.0) - target.table.hit_suppression
    }

    fn expertise_reduction(&self, caster: &Unit) -> f64 {
        let rating = caster.stats[Stat::Expertise] + self.bonus_expertise_rating;
        (rating / EXPERTISE_PER_QUARTER_PERCENT_REDUCTION).floor() / 400.0
    }

    pub fn dodge_chance(&self, caster: &Unit, target: &Unit) -> f64 {
        (target.table.dodge - self.expertise_reduction(caster)).max(0.0)
    }

    pub fn parry_chance(&self, caster: &Unit, target: &Unit) -> f64 {
        (target.table.parry - self.expertise_reduction(caster)).max(0.0)
    }

    /// 物理暴击几率（可为负）。
    pub fn physical_crit_chance(&self, caster: &Unit, target: &Unit) -> f64 {
        let mut rating = caster.stats[Stat::MeleeCrit]
            + self.bonus_crit_rating
            + target.pseudo.bonus_crit_rating_taken;
        if self.proc_mask.matches(ProcMask::RANGED) {
            rating += caster.pseudo.bonus_ranged_crit_rating;
        } else {
            rating += caster.pseudo.bonus_melee_crit_rating;
        }
        rating / (MELEE_CRIT_RATING_PER_CRIT_CHANCE * 100.0) - target.table.crit_suppression
    }

    pub fn spell_hit_chance(&self, caster: &Unit, target: &Unit) -> f64 {
        let rating = caster.stats[Stat::SpellHit]
            + self.bonus_hit_rating
            + target.pseudo.bonus_spell_hit_rating_taken;
        rating / (SPELL_HIT_RATING_PER_HIT_CHANCE * 100.0)
    }

    pub fn spell_crit_chance(&self, caster: &Unit, target: &Unit, spell: &Spell) -> f64 {
        let mut rating = caster.stats[Stat::SpellCrit]
            + self.bonus_crit_rating
            + target.pseudo.bonus_spell_crit_rating_taken;
        match spell.school {
            SpellSchool::Fire => rating += caster.pseudo.bonus_fire_crit_rating,
            SpellSchool::Frost => rating += target.pseudo.bonus_frost_crit_rating_taken,
            _ => {}
        }
        rating / (SPELL_CRIT_RATING_PER_CRIT_CHANCE * 100.0)
    }

    pub(crate) fn apply_attacker_modifiers(&self, caster: &Unit, spell: &Spell, damage: &mut f64) {
        *damage *= self.damage_multiplier * self.static_damage_multiplier;
        *damage *= caster.pseudo.damage_dealt(spell.school);
        if self.proc_mask.matches(ProcMask::RANGED) {
            *damage *= caster.pseudo.ranged_damage_dealt_multiplier;
        }
    }

    /// 护甲（物理直接伤害）或平均部分抵抗（魔法，二元法术除外）。
    pub(crate) fn apply_resistances(&self, caster: &Unit, target: &Unit, spell: &Spell, damage: &mut f64) {
        if spell.school.is_physical() {
            // 物理周期伤害无视护甲
            if self.is_periodic {
                return;
            }
            let armor = target.stats[Stat::Armor] - caster.stats[Stat::ArmorPenetration];
            *damage *= 1.0 - armor_mitigation(armor, caster.level);
        } else if let Some(stat) = spell.school.resistance_stat() {
            if spell.flags.binary {
                return;
            }
            let resist = target.stats[stat] - caster.stats[Stat::SpellPenetration];
            *damage *= 1.0 - average_resistance(resist, caster.level);
        }
    }

    /// 先乘全局承伤倍率，再加目标侧固定加成（按 `target_coefficient` 门控/缩放），最后乘系别倍率。
    pub(crate) fn apply_target_modifiers(&self, target: &Unit, spell: &Spell, damage: &mut f64) {
        let pseudo = &target.pseudo;
        *damage *= pseudo.damage_taken_multiplier;
        match spell.school {
            SpellSchool::Physical => {
                if self.target_coefficient > 0.0 {
                    *damage += pseudo.bonus_physical_damage_taken;
                }
                *damage *= pseudo.school_damage_taken_multiplier[spell.school.index()];
                if self.is_periodic {
                    *damage *= pseudo.periodic_physical_damage_taken_multiplier;
                }
            }
            SpellSchool::Holy => {
                *damage += pseudo.bonus_holy_damage_taken * self.target_coefficient;
                *damage *= pseudo.school_damage_taken_multiplier[spell.school.index()];
            }
            school => *damage *= pseudo.school_damage_taken_multiplier[school.index()],
        }
    }

    /// 仇恨 =（伤害 + 固定加成）× 效果倍率 × 单位倍率；未造成效果时为 0。
    pub fn calc_threat(&self, caster: &Unit) -> f64 {
        if !self.landed() {
            return 0.0;
        }
        (self.damage + self.flat_threat_bonus) * self.threat_multiplier * caster.pseudo.threat_multiplier
    }
}
